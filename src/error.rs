//! Types for error handling go here.

use crate::typedef::NiftiType;
use quick_error::quick_error;
use std::io::Error as IoError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum NiftiError {
        /// The header's declared size is not one of the two known layouts
        /// (348 for NIfTI-1, 540 for NIfTI-2).
        InvalidHeaderSize(size: i32) {
            display("Invalid header size {} (expected 348 or 540)", size)
        }
        /// An invalid code was found for the given named field.
        InvalidCode(ident: &'static str, code: i32) {
            display("invalid code `{}` for {}", code, ident)
        }
        /// The voxel data type is recognized but not supported
        /// for the attempted operation.
        UnsupportedDataType(t: NiftiType) {
            display("unsupported data type {:?}", t)
        }
        /// An extension frame declared a size smaller than its own
        /// fixed preamble.
        InvalidExtensionSize(esize: i32) {
            display("invalid extension size {}", esize)
        }
        /// Attempted to read a voxel outside the volume's boundaries.
        /// Coordinates are in `(value, column, row, slice, time)` order.
        OutOfBounds(coords: [usize; 5]) {
            display("out of bounds access to volume at {:?}", coords)
        }
        /// The backing store's length does not cover the declared
        /// dimensions.
        IncorrectVolumeDimensionality(expected: usize, got: usize) {
            display("expected a volume of {} components, got {}", expected, got)
        }
        /// The declared voxel payload offset lies behind data already
        /// consumed from the stream.
        InvalidVoxOffset(offset: u64, position: u64) {
            display("voxel data offset {} behind stream position {}", offset, position)
        }
        /// I/O error: includes truncated fixed-width reads and short
        /// extension payloads.
        Io(err: IoError) {
            from()
            source(err)
            display("{}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, NiftiError>;
