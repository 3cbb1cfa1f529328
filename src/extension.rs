//! This module contains definitions for the extension and related types.
//! Extensions are optional data frames sitting between the fixed header
//! and the voxel data. Each frame is preceded by a 4-byte extender code;
//! a first extender byte of 0 terminates the chain.

use crate::error::{NiftiError, Result};
use byteordered::{ByteOrdered, Endian};
use std::io::{ErrorKind as IoErrorKind, Read};

/// Data type for the extender code.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct Extender([u8; 4]);

impl Extender {
    /// Fetch the extender code from the given source, while expecting it to exist.
    pub fn from_reader<S: Read>(mut source: S) -> Result<Self> {
        let mut extender = [0u8; 4];
        source.read_exact(&mut extender)?;
        Ok(extender.into())
    }

    /// Fetch the extender code from the given source, while
    /// being possible to not be available.
    /// Returns `None` if the source reaches EoF prematurely.
    /// Any other I/O error is delegated to a `NiftiError`.
    pub fn from_reader_optional<S: Read>(mut source: S) -> Result<Option<Self>> {
        let mut extender = [0u8; 4];
        match source.read_exact(&mut extender) {
            Ok(()) => Ok(Some(extender.into())),
            Err(ref e) if e.kind() == IoErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(NiftiError::from(e)),
        }
    }

    /// Whether another extension frame follows upon this extender code.
    pub fn has_extensions(&self) -> bool {
        self.0[0] != 0
    }

    /// Get the extender's bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for Extender {
    fn from(extender: [u8; 4]) -> Self {
        Extender(extender)
    }
}

/// Data type for the raw contents of an extension.
/// Users of this type have to reinterpret the data
/// to suit their needs.
#[derive(Debug, PartialEq, Clone)]
pub struct Extension {
    esize: i32,
    ecode: i32,
    edata: Vec<u8>,
}

impl Extension {
    /// Create an extension out of its main components.
    ///
    /// # Panics
    /// If `esize` does not account for the full size of the frame in
    /// bytes: `16 + edata.len()`.
    pub fn new(esize: i32, ecode: i32, edata: Vec<u8>) -> Self {
        if esize as usize != 16 + edata.len() {
            panic!(
                "Illegal extension size: esize is {}, but full size is {}",
                esize,
                16 + edata.len()
            );
        }

        Extension {
            esize,
            ecode,
            edata,
        }
    }

    /// Obtain the claimed extension frame size (`esize` field).
    pub fn size(&self) -> i32 {
        self.esize
    }

    /// Obtain the extension's type code (`ecode` field).
    pub fn code(&self) -> i32 {
        self.ecode
    }

    /// Obtain the extension's data (`edata` field).
    pub fn data(&self) -> &[u8] {
        &self.edata
    }

    /// Take the extension's raw data, discarding the rest.
    pub fn into_data(self) -> Vec<u8> {
        self.edata
    }
}

/// Data type for aggregating the extender code and all extensions.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct ExtensionSequence {
    extender: Extender,
    extensions: Vec<Extension>,
}

impl IntoIterator for ExtensionSequence {
    type Item = Extension;
    type IntoIter = ::std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.extensions.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExtensionSequence {
    type Item = &'a Extension;
    type IntoIter = ::std::slice::Iter<'a, Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl ExtensionSequence {
    /// An extension sequence with no frames, as used when the header
    /// stream ends right after the fixed layout.
    pub fn empty() -> Self {
        ExtensionSequence::default()
    }

    /// Read a chain of extensions from a source positioned right after
    /// the fixed header layout.
    ///
    /// The chain starts with a 4-byte extender probe; a source exhausted
    /// at the probe means no extensions. While the probe's first byte is
    /// non-zero, one frame is read (`esize`, `ecode`, then `esize - 16`
    /// bytes of opaque payload) and the probe is fetched again.
    pub fn from_reader<S, E>(mut source: ByteOrdered<S, E>) -> Result<Self>
    where
        S: Read,
        E: Endian,
    {
        let first = match Extender::from_reader_optional(&mut source)? {
            Some(e) => e,
            None => return Ok(Self::empty()),
        };

        let mut extensions = Vec::new();
        let mut extender = first;
        while extender.has_extensions() {
            let esize = source.read_i32()?;
            let ecode = source.read_i32()?;
            if esize < 16 {
                return Err(NiftiError::InvalidExtensionSize(esize));
            }
            let mut edata = vec![0u8; esize as usize - 16];
            source.read_exact(&mut edata)?;
            extensions.push(Extension {
                esize,
                ecode,
                edata,
            });
            extender = Extender::from_reader(&mut source)?;
        }

        Ok(ExtensionSequence {
            extender: first,
            extensions,
        })
    }

    /// Obtain an iterator to the extensions.
    pub fn iter(&self) -> ::std::slice::Iter<Extension> {
        self.extensions.iter()
    }

    /// Whether the sequence of extensions is empty.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Obtain the number of extensions available.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Get the extender code from this extension sequence.
    pub fn extender(&self) -> Extender {
        self.extender
    }
}
