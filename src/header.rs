//! This module defines the `NiftiHeader` struct, the decoded form of the
//! fixed-layout file header, and the binary decoder for both on-disk
//! schema versions (NIfTI-1, 348 bytes; NIfTI-2, 540 bytes).

use crate::error::{NiftiError, Result};
use crate::extension::ExtensionSequence;
use crate::typedef::{Intent, NiftiType, SliceOrder, Unit, XForm};
use crate::util::{is_gz_file, trimmed_string};
use byteordered::{ByteOrdered, Endianness};
use flate2::bufread::GzDecoder;
use num_traits::FromPrimitive;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Magic code for NIfTI-1 header files (extension ".hdr[.gz]").
pub const MAGIC_CODE_NI1: &[u8; 4] = b"ni1\0";
/// Magic code for full NIfTI-1 files (extension ".nii[.gz]").
pub const MAGIC_CODE_NIP1: &[u8; 4] = b"n+1\0";
/// Magic code for NIfTI-2 header files.
pub const MAGIC_CODE_NI2: &[u8; 8] = b"ni2\0\r\n\x1a\n";
/// Magic code for full NIfTI-2 files.
pub const MAGIC_CODE_NIP2: &[u8; 8] = b"n+2\0\r\n\x1a\n";

/// The byte-swapped bit pattern of 348, as read from a header of the
/// opposite byte order.
const SWAPPED_SIZE_V1: i32 = 0x5C01_0000;
/// The byte-swapped bit pattern of 540.
const SWAPPED_SIZE_V2: i32 = 0x1C02_0000;

/// The decoded header record, one unified shape for both schema versions.
///
/// Fields are public and named after the specification's header file,
/// held at the widest width used by either version (NIfTI-2), so that a
/// version-1 header decodes into the same record. Free-text fields are
/// NUL-trimmed at decode time.
///
/// # Examples
///
/// ```no_run
/// use nivox::NiftiHeader;
/// # use nivox::Result;
///
/// # fn run() -> Result<()> {
/// let hdr1 = NiftiHeader::from_file("0000.hdr")?;
/// let hdr2 = NiftiHeader::from_file("4321.nii.gz")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    /// Header size, 348 (version 1) or 540 (version 2)
    pub sizeof_hdr: i32,
    /// Magic signature: 4 bytes in version 1, 8 bytes in version 2
    pub magic: Vec<u8>,
    /// Defines the data type
    pub datatype: i16,
    /// Number of bits per voxel
    pub bitpix: i16,
    /// Data array dimensions; `dim[0]` is the number of used dimensions
    pub dim: [i64; 8],
    /// 1st intent parameter
    pub intent_p1: f64,
    /// 2nd intent parameter
    pub intent_p2: f64,
    /// 3rd intent parameter
    pub intent_p3: f64,
    /// Grid spacings; `pixdim[0]` holds the qfac sign flag
    pub pixdim: [f64; 8],
    /// Offset into the file where the voxel data begins
    pub vox_offset: i64,
    /// Data scaling: slope
    pub scl_slope: f64,
    /// Data scaling: offset
    pub scl_inter: f64,
    /// Max display intensity
    pub cal_max: f64,
    /// Min display intensity
    pub cal_min: f64,
    /// Time for 1 slice
    pub slice_duration: f64,
    /// Time axis shift
    pub toffset: f64,
    /// First slice index
    pub slice_start: i64,
    /// Last slice index
    pub slice_end: i64,
    /// Any text you like
    pub descrip: String,
    /// Auxiliary filename
    pub aux_file: String,
    /// NIFTI_XFORM_* code for the quaternion transform
    pub qform_code: i32,
    /// NIFTI_XFORM_* code for the affine transform
    pub sform_code: i32,
    /// Quaternion b param
    pub quatern_b: f64,
    /// Quaternion c param
    pub quatern_c: f64,
    /// Quaternion d param
    pub quatern_d: f64,
    /// Quaternion x shift
    pub qoffset_x: f64,
    /// Quaternion y shift
    pub qoffset_y: f64,
    /// Quaternion z shift
    pub qoffset_z: f64,
    /// 1st row affine transform
    pub srow_x: [f64; 4],
    /// 2nd row affine transform
    pub srow_y: [f64; 4],
    /// 3rd row affine transform
    pub srow_z: [f64; 4],
    /// Slice timing order
    pub slice_code: i32,
    /// Units of pixdim[1..4], a packed bitfield
    pub xyzt_units: i32,
    /// NIFTI_INTENT_* code
    pub intent_code: i32,
    /// 'name' or meaning of data
    pub intent_name: String,
    /// MRI slice ordering
    pub dim_info: u8,
    /// Original data byte order
    pub endianness: Endianness,
    /// Extension frames found between the fixed layout and the voxel data
    pub extensions: ExtensionSequence,
}

impl Default for NiftiHeader {
    fn default() -> NiftiHeader {
        NiftiHeader {
            sizeof_hdr: 348,
            magic: MAGIC_CODE_NIP1.to_vec(),
            datatype: 0,
            bitpix: 0,
            dim: [1, 0, 0, 0, 0, 0, 0, 0],
            intent_p1: 0.,
            intent_p2: 0.,
            intent_p3: 0.,
            pixdim: [0.; 8],
            vox_offset: 352,
            scl_slope: 0.,
            scl_inter: 0.,
            cal_max: 0.,
            cal_min: 0.,
            slice_duration: 0.,
            toffset: 0.,
            slice_start: 0,
            slice_end: 0,
            descrip: String::new(),
            aux_file: String::new(),
            qform_code: 0,
            sform_code: 0,
            quatern_b: 0.,
            quatern_c: 0.,
            quatern_d: 0.,
            qoffset_x: 0.,
            qoffset_y: 0.,
            qoffset_z: 0.,
            srow_x: [0.; 4],
            srow_y: [0.; 4],
            srow_z: [0.; 4],
            slice_code: 0,
            xyzt_units: 0,
            intent_code: 0,
            intent_name: String::new(),
            dim_info: 0,
            endianness: Endianness::Little,
            extensions: ExtensionSequence::empty(),
        }
    }
}

impl NiftiHeader {
    /// Retrieve a NIFTI header, along with its extensions, from a file in
    /// the file system. If the file's name ends with ".gz", the file is
    /// assumed to need GZip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<NiftiHeader> {
        let gz = is_gz_file(&path);
        let file = BufReader::new(File::open(path)?);
        if gz {
            NiftiHeader::from_reader(GzDecoder::new(file))
        } else {
            NiftiHeader::from_reader(file)
        }
    }

    /// Read a NIFTI header from the given byte source. It is assumed that
    /// the input is currently at the start of the header.
    ///
    /// The 4-byte size preamble is read little-endian first; if it holds
    /// the byte-swapped pattern of 348 or 540, the remaining fields are
    /// read big-endian instead. Any other value fails with
    /// [`NiftiError::InvalidHeaderSize`]. The extension chain following
    /// the fixed layout is consumed as well; a source that ends right
    /// after the fixed layout yields an empty extension sequence.
    pub fn from_reader<R: Read>(source: R) -> Result<NiftiHeader> {
        let mut preamble = ByteOrdered::le(source);
        let size = preamble.read_i32()?;
        let (sizeof_hdr, endianness) = match size {
            348 | 540 => (size, Endianness::Little),
            SWAPPED_SIZE_V1 => (348, Endianness::Big),
            SWAPPED_SIZE_V2 => (540, Endianness::Big),
            _ => return Err(NiftiError::InvalidHeaderSize(size)),
        };

        let mut input = ByteOrdered::runtime(preamble.into_inner(), endianness);
        let mut h = NiftiHeader {
            sizeof_hdr,
            endianness,
            ..NiftiHeader::default()
        };
        if sizeof_hdr == 348 {
            parse_layout_v1(&mut input, &mut h)?;
        } else {
            parse_layout_v2(&mut input, &mut h)?;
        }
        h.extensions = ExtensionSequence::from_reader(input)?;
        Ok(h)
    }

    /// Get the data type as a validated enum.
    pub fn data_type(&self) -> Result<NiftiType> {
        FromPrimitive::from_i16(self.datatype)
            .ok_or_else(|| NiftiError::InvalidCode("datatype", i32::from(self.datatype)))
    }

    /// Get the spatial units type as a validated unit enum.
    pub fn space_units(&self) -> Result<Unit> {
        let code = self.xyzt_units & 0o0007;
        FromPrimitive::from_i32(code).ok_or(NiftiError::InvalidCode("xyzt units (space)", code))
    }

    /// Get the time units type as a validated unit enum.
    pub fn time_units(&self) -> Result<Unit> {
        let code = self.xyzt_units & 0o0070;
        FromPrimitive::from_i32(code).ok_or(NiftiError::InvalidCode("xyzt units (time)", code))
    }

    /// Get the slice order as a validated enum.
    pub fn slice_order(&self) -> Result<SliceOrder> {
        FromPrimitive::from_i32(self.slice_code)
            .ok_or(NiftiError::InvalidCode("slice order", self.slice_code))
    }

    /// Get the intent as a validated enum.
    pub fn intent(&self) -> Result<Intent> {
        FromPrimitive::from_i32(self.intent_code)
            .ok_or(NiftiError::InvalidCode("intent", self.intent_code))
    }

    /// Get the quaternion coordinate mapping method as a validated enum.
    pub fn qform(&self) -> Result<XForm> {
        FromPrimitive::from_i32(self.qform_code)
            .ok_or(NiftiError::InvalidCode("qform", self.qform_code))
    }

    /// Get the affine coordinate mapping method as a validated enum.
    pub fn sform(&self) -> Result<XForm> {
        FromPrimitive::from_i32(self.sform_code)
            .ok_or(NiftiError::InvalidCode("sform", self.sform_code))
    }

    /// Recover the full rotation quaternion `[a, b, c, d]` from the three
    /// stored components, deriving the scalar component as
    /// `a = sqrt(1 - b² - c² - d²)`.
    ///
    /// A negative radicand (non-unit stored components) is clamped to
    /// zero, yielding a 180-degree rotation instead of a NaN matrix.
    pub fn quaternion(&self) -> [f64; 4] {
        let (b, c, d) = (self.quatern_b, self.quatern_c, self.quatern_d);
        let radicand = 1.0 - (b * b + c * c + d * d);
        let a = if radicand > 0.0 { radicand.sqrt() } else { 0.0 };
        [a, b, c, d]
    }

    /// The qfac handedness flag stored in `pixdim[0]`, resolved to
    /// exactly +1 or -1. -1 is selected only when the stored value
    /// is ≤ -0.5.
    pub fn qfac(&self) -> f64 {
        if self.pixdim[0] <= -0.5 {
            -1.0
        } else {
            1.0
        }
    }

    /// Resolve the declared dimension array to the five payload axes
    /// `(columns, rows, slices, time points, values per voxel)`.
    ///
    /// A rank-3 volume has a single time point and value; a rank-4
    /// volume treats its trailing dimension as values per voxel with one
    /// implicit time point; otherwise `dim[1..=5]` map directly.
    pub fn resolved_dims(&self) -> [usize; 5] {
        let d = |i: usize| self.dim[i].max(0) as usize;
        match self.dim[0] {
            3 => [d(1), d(2), d(3), 1, 1],
            4 => [d(1), d(2), d(3), 1, d(4)],
            _ => [d(1), d(2), d(3), d(4), d(5)],
        }
    }
}

fn parse_layout_v1<S: Read>(
    input: &mut ByteOrdered<S, Endianness>,
    h: &mut NiftiHeader,
) -> Result<()> {
    // data_type[10] and db_name[18], unused since ANALYZE 7.5
    let mut unused = [0u8; 28];
    input.read_exact(&mut unused)?;
    let _extents = input.read_i32()?;
    let _session_error = input.read_i16()?;
    let _regular = input.read_u8()?;
    h.dim_info = input.read_u8()?;

    for v in &mut h.dim {
        *v = i64::from(input.read_i16()?);
    }
    h.intent_p1 = f64::from(input.read_f32()?);
    h.intent_p2 = f64::from(input.read_f32()?);
    h.intent_p3 = f64::from(input.read_f32()?);
    h.intent_code = i32::from(input.read_i16()?);
    h.datatype = input.read_i16()?;
    h.bitpix = input.read_i16()?;
    h.slice_start = i64::from(input.read_i16()?);
    for v in &mut h.pixdim {
        *v = f64::from(input.read_f32()?);
    }
    h.vox_offset = input.read_f32()? as i64;
    h.scl_slope = f64::from(input.read_f32()?);
    h.scl_inter = f64::from(input.read_f32()?);
    h.slice_end = i64::from(input.read_i16()?);
    h.slice_code = i32::from(input.read_u8()?);
    h.xyzt_units = i32::from(input.read_u8()?);
    h.cal_max = f64::from(input.read_f32()?);
    h.cal_min = f64::from(input.read_f32()?);
    h.slice_duration = f64::from(input.read_f32()?);
    h.toffset = f64::from(input.read_f32()?);
    let _glmax = input.read_i32()?;
    let _glmin = input.read_i32()?;

    let mut descrip = [0u8; 80];
    input.read_exact(&mut descrip)?;
    h.descrip = trimmed_string(&descrip);
    let mut aux_file = [0u8; 24];
    input.read_exact(&mut aux_file)?;
    h.aux_file = trimmed_string(&aux_file);

    h.qform_code = i32::from(input.read_i16()?);
    h.sform_code = i32::from(input.read_i16()?);
    h.quatern_b = f64::from(input.read_f32()?);
    h.quatern_c = f64::from(input.read_f32()?);
    h.quatern_d = f64::from(input.read_f32()?);
    h.qoffset_x = f64::from(input.read_f32()?);
    h.qoffset_y = f64::from(input.read_f32()?);
    h.qoffset_z = f64::from(input.read_f32()?);
    for row in &mut [&mut h.srow_x, &mut h.srow_y, &mut h.srow_z] {
        for v in row.iter_mut() {
            *v = f64::from(input.read_f32()?);
        }
    }

    let mut intent_name = [0u8; 16];
    input.read_exact(&mut intent_name)?;
    h.intent_name = trimmed_string(&intent_name);

    let mut magic = [0u8; 4];
    input.read_exact(&mut magic)?;
    h.magic = magic.to_vec();
    Ok(())
}

fn parse_layout_v2<S: Read>(
    input: &mut ByteOrdered<S, Endianness>,
    h: &mut NiftiHeader,
) -> Result<()> {
    let mut magic = [0u8; 8];
    input.read_exact(&mut magic)?;
    h.magic = magic.to_vec();

    h.datatype = input.read_i16()?;
    h.bitpix = input.read_i16()?;
    for v in &mut h.dim {
        *v = input.read_i64()?;
    }
    h.intent_p1 = input.read_f64()?;
    h.intent_p2 = input.read_f64()?;
    h.intent_p3 = input.read_f64()?;
    for v in &mut h.pixdim {
        *v = input.read_f64()?;
    }
    h.vox_offset = input.read_i64()?;
    h.scl_slope = input.read_f64()?;
    h.scl_inter = input.read_f64()?;
    h.cal_max = input.read_f64()?;
    h.cal_min = input.read_f64()?;
    h.slice_duration = input.read_f64()?;
    h.toffset = input.read_f64()?;
    h.slice_start = input.read_i64()?;
    h.slice_end = input.read_i64()?;

    let mut descrip = [0u8; 80];
    input.read_exact(&mut descrip)?;
    h.descrip = trimmed_string(&descrip);
    let mut aux_file = [0u8; 24];
    input.read_exact(&mut aux_file)?;
    h.aux_file = trimmed_string(&aux_file);

    h.qform_code = input.read_i32()?;
    h.sform_code = input.read_i32()?;
    h.quatern_b = input.read_f64()?;
    h.quatern_c = input.read_f64()?;
    h.quatern_d = input.read_f64()?;
    h.qoffset_x = input.read_f64()?;
    h.qoffset_y = input.read_f64()?;
    h.qoffset_z = input.read_f64()?;
    for row in &mut [&mut h.srow_x, &mut h.srow_y, &mut h.srow_z] {
        for v in row.iter_mut() {
            *v = input.read_f64()?;
        }
    }

    h.slice_code = input.read_i32()?;
    h.xyzt_units = input.read_i32()?;
    h.intent_code = input.read_i32()?;

    let mut intent_name = [0u8; 16];
    input.read_exact(&mut intent_name)?;
    h.intent_name = trimmed_string(&intent_name);

    h.dim_info = input.read_u8()?;
    let mut unused = [0u8; 15];
    input.read_exact(&mut unused)?;
    Ok(())
}
