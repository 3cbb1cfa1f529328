//! This module contains the in-memory representation of the voxel
//! payload and its binary decoder.
//!
//! A [`VoxelBuffer`](buffer::VoxelBuffer) keeps the payload in exactly
//! one typed backing store, chosen by the declared element kind, and
//! resolves 5-dimensional coordinates through precomputed strides. The
//! decoder in this module's private half fills such a buffer from any
//! byte source, handling byte order, sub-byte elements, interleaved
//! complex pairs and the narrowing of 128-bit floats.

pub mod buffer;
mod decode;

pub use self::buffer::{VoxelBuffer, VoxelData};
