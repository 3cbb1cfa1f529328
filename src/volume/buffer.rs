//! Typed in-memory storage for the voxel payload.

use crate::error::{NiftiError, Result};
use crate::typedef::NiftiType;
use crate::util::{widen_u16, widen_u32, widen_u64, widen_u8};
use num_complex::Complex;
use rgb::RGB8;

/// The single typed backing store of a volume.
///
/// Element kinds that share a scalar width after decoding share a
/// variant: both complex halves and RGB channels are stored interleaved
/// in the flat vector, and 128-bit floats are narrowed to `f64` at
/// decode time.
#[derive(Debug, Clone, PartialEq)]
pub enum VoxelData {
    /// Unpacked 1-bit elements.
    Bool(Vec<bool>),
    /// Unsigned bytes, also the store for interleaved RGB channels.
    U8(Vec<u8>),
    /// Signed bytes.
    I8(Vec<i8>),
    /// Signed 16-bit integers.
    I16(Vec<i16>),
    /// Unsigned 16-bit integers.
    U16(Vec<u16>),
    /// Signed 32-bit integers.
    I32(Vec<i32>),
    /// Unsigned 32-bit integers.
    U32(Vec<u32>),
    /// Signed 64-bit integers.
    I64(Vec<i64>),
    /// Unsigned 64-bit integers.
    U64(Vec<u64>),
    /// 32-bit floats, also the store for interleaved 64-bit complex pairs.
    F32(Vec<f32>),
    /// 64-bit floats, also the store for interleaved wider complex pairs
    /// and for narrowed 128-bit floats.
    F64(Vec<f64>),
}

impl VoxelData {
    /// The number of scalar components in the store.
    pub fn len(&self) -> usize {
        use VoxelData::*;
        match self {
            Bool(v) => v.len(),
            U8(v) => v.len(),
            I8(v) => v.len(),
            I16(v) => v.len(),
            U16(v) => v.len(),
            I32(v) => v.len(),
            U32(v) => v.len(),
            I64(v) => v.len(),
            U64(v) => v.len(),
            F32(v) => v.len(),
            F64(v) => v.len(),
        }
    }

    /// Whether the store holds no components.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The scalar component at the given flat index, widened to `f64`.
    ///
    /// Unsigned integer kinds go through the compatibility widening
    /// formula in [`crate::util`].
    fn component_f64(&self, index: usize) -> f64 {
        use VoxelData::*;
        match self {
            Bool(v) => {
                if v[index] {
                    1.
                } else {
                    0.
                }
            }
            U8(v) => widen_u8(v[index] as i8),
            I8(v) => f64::from(v[index]),
            I16(v) => f64::from(v[index]),
            U16(v) => widen_u16(v[index] as i16),
            I32(v) => f64::from(v[index]),
            U32(v) => widen_u32(v[index] as i32),
            I64(v) => v[index] as f64,
            U64(v) => widen_u64(v[index] as i64),
            F32(v) => f64::from(v[index]),
            F64(v) => v[index],
        }
    }
}

/// A 5-dimensional volume of homogeneously typed values, value-interleaved
/// in memory.
///
/// The axes are, in coordinate order, the value index within a voxel,
/// then column, row, slice and time point. Multi-component values
/// (complex pairs, RGB channels) occupy consecutive components of the
/// backing store, so the value axis stride equals the component count of
/// the element kind and the column stride spans all of a voxel's values.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelBuffer {
    data: VoxelData,
    data_type: NiftiType,
    /// `[columns, rows, slices, time points, values per voxel]`
    dims: [usize; 5],
    /// component strides for `[value, column, row, slice, time]`
    steps: [usize; 5],
}

impl VoxelBuffer {
    /// Build a buffer from a filled backing store.
    ///
    /// The store's variant must agree with the element kind
    /// ([`NiftiError::UnsupportedDataType`] otherwise) and its length
    /// with the dimensions
    /// ([`NiftiError::IncorrectVolumeDimensionality`] otherwise).
    pub fn from_parts(data: VoxelData, data_type: NiftiType, dims: [usize; 5]) -> Result<Self> {
        let steps = component_steps(data_type, dims);
        if !store_matches(&data, data_type) {
            return Err(NiftiError::UnsupportedDataType(data_type));
        }
        let expected: usize = dims.iter().product::<usize>() * data_type.components();
        if data.len() != expected {
            return Err(NiftiError::IncorrectVolumeDimensionality(expected, data.len()));
        }
        Ok(VoxelBuffer {
            data,
            data_type,
            dims,
            steps,
        })
    }

    /// Allocate a zero-filled buffer for the given element kind and
    /// dimensions.
    pub fn allocate(data_type: NiftiType, dims: [usize; 5]) -> Self {
        let total: usize = dims.iter().product::<usize>() * data_type.components();
        use NiftiType::*;
        let data = match data_type {
            Binary => VoxelData::Bool(vec![false; total]),
            Uint8 | Rgb24 => VoxelData::U8(vec![0; total]),
            Int8 => VoxelData::I8(vec![0; total]),
            Int16 => VoxelData::I16(vec![0; total]),
            Uint16 => VoxelData::U16(vec![0; total]),
            Int32 => VoxelData::I32(vec![0; total]),
            Uint32 => VoxelData::U32(vec![0; total]),
            Int64 => VoxelData::I64(vec![0; total]),
            Uint64 => VoxelData::U64(vec![0; total]),
            Float32 | Complex64 => VoxelData::F32(vec![0.; total]),
            Float64 | Float128 | Complex128 | Complex256 => VoxelData::F64(vec![0.; total]),
        };
        VoxelBuffer {
            data,
            data_type,
            dims: [dims[0], dims[1], dims[2], dims[3], dims[4]],
            steps: component_steps(data_type, dims),
        }
    }

    /// The element kind of the stored values.
    pub fn data_type(&self) -> NiftiType {
        self.data_type
    }

    /// The buffer's dimensions:
    /// `[columns, rows, slices, time points, values per voxel]`.
    pub fn dims(&self) -> [usize; 5] {
        self.dims
    }

    /// The number of values stored per voxel.
    pub fn num_values_per_voxel(&self) -> usize {
        self.dims[4]
    }

    /// Access to the backing store.
    pub fn data(&self) -> &VoxelData {
        &self.data
    }

    /// Resolve 5-D coordinates to the flat index of the value's first
    /// scalar component, checking every axis bound.
    pub fn index(&self, v: usize, i: usize, j: usize, k: usize, t: usize) -> Result<usize> {
        let [ni, nj, nk, nt, nv] = self.dims;
        if v >= nv || i >= ni || j >= nj || k >= nk || t >= nt {
            return Err(NiftiError::OutOfBounds([v, i, j, k, t]));
        }
        let [vstep, istep, jstep, kstep, tstep] = self.steps;
        Ok(v * vstep + i * istep + j * jstep + k * kstep + t * tstep)
    }

    /// Fetch a single value as `f64`.
    ///
    /// Multi-component kinds yield their first scalar component (the
    /// real part, or the red channel); use [`Self::complex_value`] or
    /// [`Self::rgb_value`] for the full value.
    pub fn value(&self, v: usize, i: usize, j: usize, k: usize, t: usize) -> Result<f64> {
        let index = self.index(v, i, j, k, t)?;
        Ok(self.data.component_f64(index))
    }

    /// Fetch a complex value. Fails with
    /// [`NiftiError::UnsupportedDataType`] for non-complex element kinds.
    pub fn complex_value(
        &self,
        v: usize,
        i: usize,
        j: usize,
        k: usize,
        t: usize,
    ) -> Result<Complex<f64>> {
        if !self.data_type.is_complex() {
            return Err(NiftiError::UnsupportedDataType(self.data_type));
        }
        let index = self.index(v, i, j, k, t)?;
        Ok(Complex::new(
            self.data.component_f64(index),
            self.data.component_f64(index + 1),
        ))
    }

    /// Fetch an RGB value. Fails with
    /// [`NiftiError::UnsupportedDataType`] for other element kinds.
    pub fn rgb_value(&self, v: usize, i: usize, j: usize, k: usize, t: usize) -> Result<RGB8> {
        let channels = match (self.data_type, &self.data) {
            (NiftiType::Rgb24, VoxelData::U8(c)) => c,
            _ => return Err(NiftiError::UnsupportedDataType(self.data_type)),
        };
        let index = self.index(v, i, j, k, t)?;
        Ok(RGB8 {
            r: channels[index],
            g: channels[index + 1],
            b: channels[index + 2],
        })
    }

    /// Iterate over every scalar component widened to `f64`, in backing
    /// store order.
    pub(crate) fn components_f64(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.data.len()).map(move |i| self.data.component_f64(i))
    }
}

/// Component strides for the `[value, column, row, slice, time]` axes.
fn component_steps(data_type: NiftiType, dims: [usize; 5]) -> [usize; 5] {
    let [ni, nj, nk, _, nv] = dims;
    let vstep = data_type.components();
    let istep = vstep * nv;
    let jstep = istep * ni;
    let kstep = jstep * nj;
    let tstep = kstep * nk;
    [vstep, istep, jstep, kstep, tstep]
}

fn store_matches(data: &VoxelData, data_type: NiftiType) -> bool {
    use NiftiType::*;
    match (data_type, data) {
        (Binary, VoxelData::Bool(_))
        | (Uint8, VoxelData::U8(_))
        | (Rgb24, VoxelData::U8(_))
        | (Int8, VoxelData::I8(_))
        | (Int16, VoxelData::I16(_))
        | (Uint16, VoxelData::U16(_))
        | (Int32, VoxelData::I32(_))
        | (Uint32, VoxelData::U32(_))
        | (Int64, VoxelData::I64(_))
        | (Uint64, VoxelData::U64(_))
        | (Float32, VoxelData::F32(_))
        | (Complex64, VoxelData::F32(_))
        | (Float64, VoxelData::F64(_))
        | (Float128, VoxelData::F64(_))
        | (Complex128, VoxelData::F64(_))
        | (Complex256, VoxelData::F64(_)) => true,
        _ => false,
    }
}
