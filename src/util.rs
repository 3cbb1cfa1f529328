//! Private utility module
use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// Check that the given path ends with a ".gz" extension.
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|e| e.to_string_lossy() == "gz")
        .unwrap_or(false)
}

/// Interpret a fixed-width header field as a NUL-terminated string.
pub fn trimmed_string(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Widen a stored signed 8-bit value to its unsigned interpretation.
///
/// This reproduces the original decoder's formula, `MAX + (-d)` for
/// negative `d`, which is kept verbatim for compatibility even though it
/// is off by one from true two's-complement widening (`0x80` maps to 255
/// instead of 128, `0xFF` maps to 128 instead of 255).
pub fn widen_u8(d: i8) -> f64 {
    if d >= 0 {
        f64::from(d)
    } else {
        f64::from(i8::max_value()) + -f64::from(d)
    }
}

/// Widen a stored signed 16-bit value, same formula as [`widen_u8`].
pub fn widen_u16(d: i16) -> f64 {
    if d >= 0 {
        f64::from(d)
    } else {
        f64::from(i16::max_value()) + -f64::from(d)
    }
}

/// Widen a stored signed 32-bit value, same formula as [`widen_u8`].
pub fn widen_u32(d: i32) -> f64 {
    if d >= 0 {
        f64::from(d)
    } else {
        f64::from(i32::max_value()) + -f64::from(d)
    }
}

/// Widen a stored signed 64-bit value, same formula as [`widen_u8`].
pub fn widen_u64(d: i64) -> f64 {
    if d >= 0 {
        d as f64
    } else {
        i64::max_value() as f64 + -(d as f64)
    }
}

/// Narrow an IEEE 754 binary128 value, given as its raw bit pattern,
/// to the nearest `f64`. Out-of-range exponents saturate to infinity,
/// values too small for a normal `f64` flush to signed zero, and the
/// mantissa is truncated.
pub fn binary128_to_f64(bits: u128) -> f64 {
    let neg = (bits >> 127) & 1 == 1;
    let exp = ((bits >> 112) & 0x7FFF) as i32;
    let frac = bits & ((1u128 << 112) - 1);

    if exp == 0x7FFF {
        if frac == 0 {
            return if neg { f64::NEG_INFINITY } else { f64::INFINITY };
        }
        return f64::NAN;
    }
    if exp == 0 {
        // binary128 subnormals are far below the f64 range
        return if neg { -0.0 } else { 0.0 };
    }

    let exp64 = exp - 16383 + 1023;
    if exp64 >= 0x7FF {
        return if neg { f64::NEG_INFINITY } else { f64::INFINITY };
    }
    if exp64 <= 0 {
        return if neg { -0.0 } else { 0.0 };
    }

    let sign = if neg { 1u64 << 63 } else { 0 };
    let frac64 = (frac >> 60) as u64;
    f64::from_bits(sign | ((exp64 as u64) << 52) | frac64)
}

/// A reader adaptor that tracks the number of bytes consumed, so that
/// the payload can be located at the header's declared `vox_offset`.
#[derive(Debug)]
pub struct PositionTracker<R> {
    inner: R,
    position: u64,
}

impl<R> PositionTracker<R> {
    pub fn new(inner: R) -> Self {
        PositionTracker { inner, position: 0 }
    }

    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<R: Read> PositionTracker<R> {
    /// Read and discard `count` bytes.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        let mut chunk = [0u8; 512];
        let mut remaining = count;
        while remaining > 0 {
            let len = remaining.min(chunk.len() as u64) as usize;
            self.read_exact(&mut chunk[..len])?;
            remaining -= len as u64;
        }
        Ok(())
    }
}

impl<R: Read> Read for PositionTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> ::std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}
