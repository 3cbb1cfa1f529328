//! Binary decoding of the voxel payload into a typed buffer.

use super::buffer::{VoxelBuffer, VoxelData};
use crate::error::Result;
use crate::typedef::NiftiType;
use crate::util::binary128_to_f64;
use byteordered::{ByteOrdered, Endianness};
use std::io::Read;

impl VoxelBuffer {
    /// Decode a voxel payload from the given byte source.
    ///
    /// The source must be positioned at the first stored element. On
    /// disk, elements are laid out with the column axis varying fastest
    /// and the value axis slowest; the decoder rearranges them into the
    /// value-interleaved memory layout as it reads. Sub-byte elements
    /// are unpacked most significant bit first, 128-bit floats are
    /// narrowed to `f64`, and complex kinds keep their (real, imaginary)
    /// interleaving.
    pub fn from_reader<R: Read>(
        source: R,
        data_type: NiftiType,
        endianness: Endianness,
        dims: [usize; 5],
    ) -> Result<VoxelBuffer> {
        let total: usize = dims.iter().product::<usize>() * data_type.components();

        use NiftiType::*;
        let data = if data_type == Binary {
            let mut bits = BitReader::new(source);
            let mut data = vec![false; total];
            scan_stored_order(dims, 1, |index| {
                data[index] = bits.read_bit()?;
                Ok(())
            })?;
            VoxelData::Bool(data)
        } else {
            let mut input = ByteOrdered::runtime(source, endianness);
            macro_rules! fill {
                ($variant:ident, $zero:expr, $read:expr) => {{
                    let mut data = vec![$zero; total];
                    scan_stored_order(dims, data_type.components(), |index| {
                        for c in 0..data_type.components() {
                            data[index + c] = $read(&mut input)?;
                        }
                        Ok(())
                    })?;
                    VoxelData::$variant(data)
                }};
            }
            match data_type {
                Binary => unreachable!(),
                Uint8 | Rgb24 => fill!(U8, 0u8, |s: &mut ByteOrdered<R, _>| s.read_u8()),
                Int8 => fill!(I8, 0i8, |s: &mut ByteOrdered<R, _>| s.read_i8()),
                Int16 => fill!(I16, 0i16, |s: &mut ByteOrdered<R, _>| s.read_i16()),
                Uint16 => fill!(U16, 0u16, |s: &mut ByteOrdered<R, _>| s.read_u16()),
                Int32 => fill!(I32, 0i32, |s: &mut ByteOrdered<R, _>| s.read_i32()),
                Uint32 => fill!(U32, 0u32, |s: &mut ByteOrdered<R, _>| s.read_u32()),
                Int64 => fill!(I64, 0i64, |s: &mut ByteOrdered<R, _>| s.read_i64()),
                Uint64 => fill!(U64, 0u64, |s: &mut ByteOrdered<R, _>| s.read_u64()),
                Float32 | Complex64 => fill!(F32, 0f32, |s: &mut ByteOrdered<R, _>| s.read_f32()),
                Float64 | Complex128 => fill!(F64, 0f64, |s: &mut ByteOrdered<R, _>| s.read_f64()),
                Float128 | Complex256 => fill!(F64, 0f64, |s: &mut ByteOrdered<R, _>| s
                    .read_u128()
                    .map(binary128_to_f64)),
            }
        };

        VoxelBuffer::from_parts(data, data_type, dims)
    }
}

/// Visit the first-component index of every value in on-disk order:
/// column fastest, then row, slice, time point and value index.
fn scan_stored_order<F>(dims: [usize; 5], components: usize, mut visit: F) -> Result<()>
where
    F: FnMut(usize) -> Result<()>,
{
    let [ni, nj, nk, nt, nv] = dims;
    let vstep = components;
    let istep = vstep * nv;
    let jstep = istep * ni;
    let kstep = jstep * nj;
    let tstep = kstep * nk;
    for v in 0..nv {
        for t in 0..nt {
            for k in 0..nk {
                for j in 0..nj {
                    for i in 0..ni {
                        visit(v * vstep + i * istep + j * jstep + k * kstep + t * tstep)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Unpacks single bits from a byte stream, most significant bit first.
struct BitReader<R> {
    inner: R,
    current: u8,
    remaining: u8,
}

impl<R: Read> BitReader<R> {
    fn new(inner: R) -> Self {
        BitReader {
            inner,
            current: 0,
            remaining: 0,
        }
    }

    fn read_bit(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            self.inner.read_exact(&mut byte)?;
            self.current = byte[0];
            self.remaining = 8;
        }
        self.remaining -= 1;
        Ok((self.current >> self.remaining) & 1 == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteordered::Endianness;

    #[test]
    fn int16_both_byte_orders() {
        let values: [i16; 4] = [1, -2, 300, -400];
        let mut le = Vec::new();
        let mut be = Vec::new();
        for v in &values {
            le.extend_from_slice(&v.to_le_bytes());
            be.extend_from_slice(&v.to_be_bytes());
        }
        let dims = [2, 2, 1, 1, 1];

        let a =
            VoxelBuffer::from_reader(&le[..], NiftiType::Int16, Endianness::Little, dims).unwrap();
        let b = VoxelBuffer::from_reader(&be[..], NiftiType::Int16, Endianness::Big, dims).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.value(0, 1, 0, 0, 0).unwrap(), -2.);
        assert_eq!(a.value(0, 0, 1, 0, 0).unwrap(), 300.);
    }

    #[test]
    fn binary_bits_unpack_msb_first() {
        // 0b1010_0110 -> true, false, true, false, false, true, true, false
        let source = [0b1010_0110u8];
        let buffer = VoxelBuffer::from_reader(
            &source[..],
            NiftiType::Binary,
            Endianness::Little,
            [8, 1, 1, 1, 1],
        )
        .unwrap();
        let bits: Vec<f64> = (0..8)
            .map(|i| buffer.value(0, i, 0, 0, 0).unwrap())
            .collect();
        assert_eq!(bits, vec![1., 0., 1., 0., 0., 1., 1., 0.]);
    }

    #[test]
    fn truncated_bit_stream_is_an_error() {
        let source = [0xFFu8];
        let e = VoxelBuffer::from_reader(
            &source[..],
            NiftiType::Binary,
            Endianness::Little,
            [9, 1, 1, 1, 1],
        );
        assert!(e.is_err());
    }

    #[test]
    fn complex_pairs_stay_interleaved() {
        let mut source = Vec::new();
        for v in &[1.0f32, -1.0, 2.5, 0.5] {
            source.extend_from_slice(&v.to_le_bytes());
        }
        let buffer = VoxelBuffer::from_reader(
            &source[..],
            NiftiType::Complex64,
            Endianness::Little,
            [2, 1, 1, 1, 1],
        )
        .unwrap();
        let z0 = buffer.complex_value(0, 0, 0, 0, 0).unwrap();
        let z1 = buffer.complex_value(0, 1, 0, 0, 0).unwrap();
        assert_eq!((z0.re, z0.im), (1.0, -1.0));
        assert_eq!((z1.re, z1.im), (2.5, 0.5));
    }

    #[test]
    fn rgb_channels() {
        let source = [10u8, 20, 30, 40, 50, 60];
        let buffer = VoxelBuffer::from_reader(
            &source[..],
            NiftiType::Rgb24,
            Endianness::Little,
            [2, 1, 1, 1, 1],
        )
        .unwrap();
        let px = buffer.rgb_value(0, 1, 0, 0, 0).unwrap();
        assert_eq!((px.r, px.g, px.b), (40, 50, 60));
    }

    #[test]
    fn float128_elements_narrow_to_f64() {
        // 1.0 and -2.0 in binary128
        let one = 0x3FFFu128 << 112;
        let minus_two = (1u128 << 127) | (0x4000u128 << 112);
        let mut source = Vec::new();
        source.extend_from_slice(&one.to_be_bytes());
        source.extend_from_slice(&minus_two.to_be_bytes());

        let buffer = VoxelBuffer::from_reader(
            &source[..],
            NiftiType::Float128,
            Endianness::Big,
            [2, 1, 1, 1, 1],
        )
        .unwrap();
        assert_eq!(buffer.value(0, 0, 0, 0, 0).unwrap(), 1.0);
        assert_eq!(buffer.value(0, 1, 0, 0, 0).unwrap(), -2.0);
    }

    #[test]
    fn value_axis_is_slowest_on_disk() {
        // two values per voxel over a 2-column line: stored v0 plane then v1 plane
        let source = [1u8, 2, 3, 4];
        let buffer = VoxelBuffer::from_reader(
            &source[..],
            NiftiType::Uint8,
            Endianness::Little,
            [2, 1, 1, 1, 2],
        )
        .unwrap();
        assert_eq!(buffer.value(0, 0, 0, 0, 0).unwrap(), 1.);
        assert_eq!(buffer.value(0, 1, 0, 0, 0).unwrap(), 2.);
        assert_eq!(buffer.value(1, 0, 0, 0, 0).unwrap(), 3.);
        assert_eq!(buffer.value(1, 1, 0, 0, 0).unwrap(), 4.);
    }
}
