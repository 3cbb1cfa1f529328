//! The high-level volume object: a header, a typed voxel buffer and the
//! value scaling declared between them.

use crate::affine::{qform_affine, scaled_affine, srow_affine};
use crate::error::{NiftiError, Result};
use crate::header::NiftiHeader;
use crate::typedef::{NiftiType, XForm};
use crate::util::{is_gz_file, PositionTracker};
use crate::volume::VoxelBuffer;
use flate2::bufread::GzDecoder;
use nalgebra::Matrix4;
use num_complex::Complex;
use rgb::RGB8;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// The coordinate interpretation to use when mapping voxel indices to
/// world space.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ImageSpace {
    /// Raw voxel indices, an identity mapping.
    Voxel,
    /// Voxel indices scaled by the grid spacings (Method 1).
    Scaled,
    /// The quaternion transform (Method 2), regardless of the affine rows.
    Qform,
    /// The explicit affine rows (Method 3), regardless of the quaternion.
    Sform,
    /// Whichever method the header declares valid: the quaternion first,
    /// then the affine rows, then the grid spacings.
    Detect,
}

/// A fully decoded volume.
///
/// Besides tying the header to the voxel payload, this object applies
/// the header's value scaling: when `scl_slope` is non-zero, scalar and
/// complex values are eagerly mapped through
/// `scl_inter + scl_slope * raw` and reads return the scaled `f64`
/// values. RGB volumes are never scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiImage {
    header: NiftiHeader,
    raw: VoxelBuffer,
    /// component-aligned scaled values, when scaling applies
    rescaled: Option<Vec<f64>>,
}

impl NiftiImage {
    /// Retrieve the full contents of a NIFTI file, both header and
    /// voxel payload. If the file's name ends with ".gz", the file is
    /// assumed to need GZip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<NiftiImage> {
        let gz = is_gz_file(&path);
        let file = BufReader::new(File::open(path)?);
        if gz {
            NiftiImage::from_reader(GzDecoder::new(file))
        } else {
            NiftiImage::from_reader(file)
        }
    }

    /// Retrieve a volume from a header file and a separate payload file,
    /// each optionally GZip-compressed.
    pub fn from_file_pair<P, Q>(hdr_path: P, vol_path: Q) -> Result<NiftiImage>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let header = NiftiHeader::from_file(hdr_path)?;

        let gz = is_gz_file(&vol_path);
        let file = BufReader::new(File::open(vol_path)?);
        if gz {
            NiftiImage::payload_from_reader(header, GzDecoder::new(file))
        } else {
            NiftiImage::payload_from_reader(header, file)
        }
    }

    /// Retrieve the full contents of a NIFTI volume from a single byte
    /// source holding both the header and the payload.
    ///
    /// After the header and its extensions, the source is advanced to
    /// the declared `vox_offset` before decoding. An offset behind the
    /// bytes already consumed fails with
    /// [`NiftiError::InvalidVoxOffset`].
    pub fn from_reader<R: Read>(source: R) -> Result<NiftiImage> {
        let mut source = PositionTracker::new(source);
        let header = NiftiHeader::from_reader(&mut source)?;

        let offset = header.vox_offset.max(0) as u64;
        if source.position() > offset {
            return Err(NiftiError::InvalidVoxOffset(offset, source.position()));
        }
        source.skip(offset - source.position())?;
        NiftiImage::payload_from_reader(header, source)
    }

    /// Decode the voxel payload for an already obtained header from its
    /// own byte source.
    ///
    /// The source is read from its current position: a split-form image
    /// file carries no header to skip, so `vox_offset` does not apply
    /// here.
    pub fn payload_from_reader<R: Read>(header: NiftiHeader, source: R) -> Result<NiftiImage> {
        let data_type = header.data_type()?;
        let volume =
            VoxelBuffer::from_reader(source, data_type, header.endianness, header.resolved_dims())?;
        Ok(NiftiImage::from_parts(header, volume))
    }

    /// Assemble a volume from an already decoded header and buffer,
    /// applying the header's value scaling.
    pub fn from_parts(header: NiftiHeader, volume: VoxelBuffer) -> NiftiImage {
        let rescaled = rescale(&header, &volume);
        NiftiImage {
            header,
            raw: volume,
            rescaled,
        }
    }

    /// The volume's header.
    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// The raw typed buffer, without value scaling.
    pub fn raw_volume(&self) -> &VoxelBuffer {
        &self.raw
    }

    /// The element kind of the stored values.
    pub fn data_type(&self) -> NiftiType {
        self.raw.data_type()
    }

    /// The volume's dimensions:
    /// `[columns, rows, slices, time points, values per voxel]`.
    pub fn dims(&self) -> [usize; 5] {
        self.raw.dims()
    }

    /// Whether reads go through the header's value scaling.
    pub fn is_rescaled(&self) -> bool {
        self.rescaled.is_some()
    }

    /// Fetch a single value as `f64`, scaled if the header declares a
    /// non-zero slope.
    pub fn value(&self, v: usize, i: usize, j: usize, k: usize, t: usize) -> Result<f64> {
        match &self.rescaled {
            Some(data) => Ok(data[self.raw.index(v, i, j, k, t)?]),
            None => self.raw.value(v, i, j, k, t),
        }
    }

    /// Fetch a complex value, scaled component-wise if the header
    /// declares a non-zero slope.
    pub fn complex_value(
        &self,
        v: usize,
        i: usize,
        j: usize,
        k: usize,
        t: usize,
    ) -> Result<Complex<f64>> {
        match &self.rescaled {
            Some(data) => {
                if !self.data_type().is_complex() {
                    return Err(NiftiError::UnsupportedDataType(self.data_type()));
                }
                let index = self.raw.index(v, i, j, k, t)?;
                Ok(Complex::new(data[index], data[index + 1]))
            }
            None => self.raw.complex_value(v, i, j, k, t),
        }
    }

    /// Fetch an RGB value. Value scaling never applies to RGB volumes.
    pub fn rgb_value(&self, v: usize, i: usize, j: usize, k: usize, t: usize) -> Result<RGB8> {
        self.raw.rgb_value(v, i, j, k, t)
    }

    /// The voxel-to-world transform for the requested coordinate
    /// interpretation.
    ///
    /// Asking for a method the header does not declare valid (an
    /// `Unknown` or unrecognized mapping code) yields the identity
    /// rather than an error.
    pub fn voxel_transform(&self, space: ImageSpace) -> Matrix4<f64> {
        let h = &self.header;
        // a code outside the known set counts as undeclared
        let qform_valid = matches!(h.qform(), Ok(x) if x != XForm::Unknown);
        let sform_valid = matches!(h.sform(), Ok(x) if x != XForm::Unknown);
        match space {
            ImageSpace::Voxel => Matrix4::identity(),
            ImageSpace::Scaled => scaled_affine(h),
            ImageSpace::Qform => {
                if qform_valid {
                    qform_affine(h)
                } else {
                    Matrix4::identity()
                }
            }
            ImageSpace::Sform => {
                if sform_valid {
                    srow_affine(h)
                } else {
                    Matrix4::identity()
                }
            }
            ImageSpace::Detect => {
                if qform_valid {
                    qform_affine(h)
                } else if sform_valid {
                    srow_affine(h)
                } else {
                    scaled_affine(h)
                }
            }
        }
    }
}

/// The scaled component vector, when the header asks for scaling.
fn rescale(header: &NiftiHeader, volume: &VoxelBuffer) -> Option<Vec<f64>> {
    let slope = header.scl_slope;
    if slope == 0. || volume.data_type() == NiftiType::Rgb24 {
        return None;
    }
    let inter = header.scl_inter;
    Some(
        volume
            .components_f64()
            .map(|x| inter + slope * x)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::VoxelData;

    fn int16_image(slope: f64, inter: f64, values: Vec<i16>) -> NiftiImage {
        let dims = [values.len(), 1, 1, 1, 1];
        let volume =
            VoxelBuffer::from_parts(VoxelData::I16(values), NiftiType::Int16, dims).unwrap();
        let mut header = NiftiHeader::default();
        header.datatype = NiftiType::Int16 as i16;
        header.scl_slope = slope;
        header.scl_inter = inter;
        NiftiImage::from_parts(header, volume)
    }

    #[test]
    fn zero_slope_reads_raw_values() {
        let image = int16_image(0., 100., vec![10, -5]);
        assert!(!image.is_rescaled());
        assert_eq!(image.value(0, 0, 0, 0, 0).unwrap(), 10.);
        assert_eq!(image.value(0, 1, 0, 0, 0).unwrap(), -5.);
    }

    #[test]
    fn rescaling_is_linear_in_the_stored_value() {
        let image = int16_image(2., 1., vec![10, -5, 0, 32767]);
        assert!(image.is_rescaled());
        let out: Vec<f64> = (0..4).map(|i| image.value(0, i, 0, 0, 0).unwrap()).collect();
        assert_eq!(out, vec![21., -9., 1., 65535.]);
    }

    #[test]
    fn complex_values_scale_component_wise() {
        let volume = VoxelBuffer::from_parts(
            VoxelData::F32(vec![1., -2.]),
            NiftiType::Complex64,
            [1, 1, 1, 1, 1],
        )
        .unwrap();
        let mut header = NiftiHeader::default();
        header.datatype = NiftiType::Complex64 as i16;
        header.scl_slope = 3.;
        header.scl_inter = 0.5;
        let image = NiftiImage::from_parts(header, volume);
        let z = image.complex_value(0, 0, 0, 0, 0).unwrap();
        assert_eq!((z.re, z.im), (3.5, -5.5));
    }

    #[test]
    fn rgb_volumes_are_never_rescaled() {
        let volume = VoxelBuffer::from_parts(
            VoxelData::U8(vec![10, 20, 30]),
            NiftiType::Rgb24,
            [1, 1, 1, 1, 1],
        )
        .unwrap();
        let mut header = NiftiHeader::default();
        header.datatype = NiftiType::Rgb24 as i16;
        header.scl_slope = 2.;
        let image = NiftiImage::from_parts(header, volume);
        assert!(!image.is_rescaled());
        let px = image.rgb_value(0, 0, 0, 0, 0).unwrap();
        assert_eq!((px.r, px.g, px.b), (10, 20, 30));
    }

    #[test]
    fn unrecognized_transform_codes_yield_identity() {
        let volume = VoxelBuffer::allocate(NiftiType::Uint8, [1, 1, 1, 1, 1]);
        let mut header = NiftiHeader::default();
        header.datatype = NiftiType::Uint8 as i16;
        header.pixdim = [0., 1., 1., 1., 0., 0., 0., 0.];
        // a half-turn quaternion, so applying the qform would be visible
        header.quatern_b = 1.0;
        header.qform_code = 7;
        header.sform_code = 99;
        header.srow_x = [2., 0., 0., 0.];
        let image = NiftiImage::from_parts(header, volume);

        assert_eq!(
            image.voxel_transform(ImageSpace::Qform),
            Matrix4::identity()
        );
        assert_eq!(
            image.voxel_transform(ImageSpace::Sform),
            Matrix4::identity()
        );
        // detection skips both undeclared methods
        assert_eq!(
            image.voxel_transform(ImageSpace::Detect),
            image.voxel_transform(ImageSpace::Scaled)
        );
    }

    #[test]
    fn transform_detection_order() {
        let volume = VoxelBuffer::allocate(NiftiType::Uint8, [1, 1, 1, 1, 1]);
        let mut header = NiftiHeader::default();
        header.datatype = NiftiType::Uint8 as i16;
        header.pixdim = [0., 2., 2., 2., 0., 0., 0., 0.];
        header.srow_x = [0., 1., 0., 0.];
        header.srow_y = [1., 0., 0., 0.];
        header.srow_z = [0., 0., 1., 0.];

        // neither method declared: detection falls back to the spacings
        let image = NiftiImage::from_parts(header.clone(), volume.clone());
        assert_eq!(
            image.voxel_transform(ImageSpace::Detect),
            image.voxel_transform(ImageSpace::Scaled)
        );
        // explicit requests for undeclared methods yield the identity
        assert_eq!(
            image.voxel_transform(ImageSpace::Sform),
            Matrix4::identity()
        );

        header.sform_code = 2;
        let image = NiftiImage::from_parts(header.clone(), volume.clone());
        assert_eq!(image.voxel_transform(ImageSpace::Detect)[(0, 1)], 1.);

        // the quaternion wins over the affine rows
        header.qform_code = 1;
        header.pixdim = [0., 1., 1., 1., 0., 0., 0., 0.];
        let image = NiftiImage::from_parts(header, volume);
        assert_eq!(
            image.voxel_transform(ImageSpace::Detect),
            image.voxel_transform(ImageSpace::Qform)
        );
        assert_eq!(
            image.voxel_transform(ImageSpace::Detect),
            Matrix4::identity()
        );
    }
}
