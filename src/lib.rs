//! Rust implementation of the NIfTI-1 and NIfTI-2 neuroimaging file formats.
//!
//! This crate reads the two on-disk header layouts (348-byte NIfTI-1 and
//! 540-byte NIfTI-2) with automatic byte-order detection, decodes the voxel
//! payload into a typed multi-dimensional buffer, applies the header's linear
//! value scaling, and resolves the voxel-to-world geometric transform from
//! either the quaternion (`qform`) or affine (`sform`) specification.
//!
//! # Example
//!
//! ```no_run
//! use nivox::{ImageSpace, NiftiImage};
//! # use nivox::Result;
//!
//! # fn run() -> Result<()> {
//! let image = NiftiImage::from_file("volume.nii.gz")?;
//! let value = image.value(0, 10, 20, 5, 0)?;
//! let world = image.voxel_transform(ImageSpace::Detect);
//! # Ok(())
//! # }
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts)]

pub mod error;
pub mod extension;
pub mod header;
pub mod image;
pub mod pixel;
pub mod typedef;
pub mod volume;

mod affine;
mod util;

pub use crate::error::{NiftiError, Result};
pub use crate::header::NiftiHeader;
pub use crate::image::{ImageSpace, NiftiImage};
pub use crate::typedef::NiftiType;
pub use crate::volume::VoxelBuffer;
pub use byteordered::Endianness;
