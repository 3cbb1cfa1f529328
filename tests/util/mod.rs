//! Builders for synthetic NIFTI byte streams used across the
//! integration tests.
#![allow(dead_code)]

use byteordered::{ByteOrdered, Endianness};
use std::io::Write;

/// The writable subset of the version 1 fixed layout.
pub struct V1Header {
    pub dim: [i16; 8],
    pub datatype: i16,
    pub bitpix: i16,
    pub pixdim: [f32; 8],
    pub vox_offset: f32,
    pub scl_slope: f32,
    pub scl_inter: f32,
    pub descrip: &'static [u8],
    pub qform_code: i16,
    pub sform_code: i16,
    pub quatern: [f32; 6],
    pub srow: [[f32; 4]; 3],
    pub magic: [u8; 4],
}

impl Default for V1Header {
    fn default() -> Self {
        V1Header {
            dim: [1, 0, 0, 0, 0, 0, 0, 0],
            datatype: 2,
            bitpix: 8,
            pixdim: [0.; 8],
            vox_offset: 352.,
            scl_slope: 0.,
            scl_inter: 0.,
            descrip: b"",
            qform_code: 0,
            sform_code: 0,
            quatern: [0.; 6],
            srow: [[0.; 4]; 3],
            magic: *b"n+1\0",
        }
    }
}

/// Encode a 348-byte fixed layout in the given byte order, without any
/// extender or payload.
pub fn encode_v1(h: &V1Header, endianness: Endianness) -> Vec<u8> {
    let mut out = ByteOrdered::runtime(Vec::new(), endianness);
    out.write_i32(348).unwrap();
    // data_type, db_name, extents, session_error, regular, dim_info
    out.write_all(&[0u8; 36]).unwrap();
    for v in &h.dim {
        out.write_i16(*v).unwrap();
    }
    for _ in 0..3 {
        out.write_f32(0.).unwrap(); // intent_p1..p3
    }
    out.write_i16(0).unwrap(); // intent_code
    out.write_i16(h.datatype).unwrap();
    out.write_i16(h.bitpix).unwrap();
    out.write_i16(0).unwrap(); // slice_start
    for v in &h.pixdim {
        out.write_f32(*v).unwrap();
    }
    out.write_f32(h.vox_offset).unwrap();
    out.write_f32(h.scl_slope).unwrap();
    out.write_f32(h.scl_inter).unwrap();
    out.write_i16(0).unwrap(); // slice_end
    out.write_all(&[0u8; 2]).unwrap(); // slice_code, xyzt_units
    for _ in 0..4 {
        out.write_f32(0.).unwrap(); // cal_max, cal_min, slice_duration, toffset
    }
    out.write_i32(0).unwrap(); // glmax
    out.write_i32(0).unwrap(); // glmin
    out.write_all(&padded(h.descrip, 80)).unwrap();
    out.write_all(&[0u8; 24]).unwrap(); // aux_file
    out.write_i16(h.qform_code).unwrap();
    out.write_i16(h.sform_code).unwrap();
    for v in &h.quatern {
        out.write_f32(*v).unwrap();
    }
    for row in &h.srow {
        for v in row {
            out.write_f32(*v).unwrap();
        }
    }
    out.write_all(&[0u8; 16]).unwrap(); // intent_name
    out.write_all(&h.magic).unwrap();

    let bytes = out.into_inner();
    assert_eq!(bytes.len(), 348);
    bytes
}

/// The writable subset of the version 2 fixed layout.
pub struct V2Header {
    pub dim: [i64; 8],
    pub datatype: i16,
    pub bitpix: i16,
    pub pixdim: [f64; 8],
    pub vox_offset: i64,
    pub scl_slope: f64,
    pub scl_inter: f64,
    pub magic: [u8; 8],
}

impl Default for V2Header {
    fn default() -> Self {
        V2Header {
            dim: [1, 0, 0, 0, 0, 0, 0, 0],
            datatype: 2,
            bitpix: 8,
            pixdim: [0.; 8],
            vox_offset: 544,
            scl_slope: 0.,
            scl_inter: 0.,
            magic: *b"n+2\0\r\n\x1a\n",
        }
    }
}

/// Encode a 540-byte fixed layout in the given byte order, without any
/// extender or payload.
pub fn encode_v2(h: &V2Header, endianness: Endianness) -> Vec<u8> {
    let mut out = ByteOrdered::runtime(Vec::new(), endianness);
    out.write_i32(540).unwrap();
    out.write_all(&h.magic).unwrap();
    out.write_i16(h.datatype).unwrap();
    out.write_i16(h.bitpix).unwrap();
    for v in &h.dim {
        out.write_i64(*v).unwrap();
    }
    for _ in 0..3 {
        out.write_f64(0.).unwrap(); // intent_p1..p3
    }
    for v in &h.pixdim {
        out.write_f64(*v).unwrap();
    }
    out.write_i64(h.vox_offset).unwrap();
    out.write_f64(h.scl_slope).unwrap();
    out.write_f64(h.scl_inter).unwrap();
    for _ in 0..4 {
        out.write_f64(0.).unwrap(); // cal_max, cal_min, slice_duration, toffset
    }
    out.write_i64(0).unwrap(); // slice_start
    out.write_i64(0).unwrap(); // slice_end
    out.write_all(&[0u8; 80]).unwrap(); // descrip
    out.write_all(&[0u8; 24]).unwrap(); // aux_file
    out.write_i32(0).unwrap(); // qform_code
    out.write_i32(0).unwrap(); // sform_code
    for _ in 0..6 {
        out.write_f64(0.).unwrap(); // quatern b,c,d + qoffset x,y,z
    }
    for _ in 0..12 {
        out.write_f64(0.).unwrap(); // srow
    }
    out.write_i32(0).unwrap(); // slice_code
    out.write_i32(0).unwrap(); // xyzt_units
    out.write_i32(0).unwrap(); // intent_code
    out.write_all(&[0u8; 16]).unwrap(); // intent_name
    out.write_all(&[0u8; 16]).unwrap(); // dim_info + reserved

    let bytes = out.into_inner();
    assert_eq!(bytes.len(), 540);
    bytes
}

/// The 4-byte extender code: a non-zero first byte announces extension
/// frames.
pub fn extender(has_extensions: bool) -> [u8; 4] {
    if has_extensions {
        [1, 0, 0, 0]
    } else {
        [0, 0, 0, 0]
    }
}

fn padded(text: &[u8], width: usize) -> Vec<u8> {
    let mut field = vec![0u8; width];
    field[..text.len()].copy_from_slice(text);
    field
}
