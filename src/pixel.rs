//! The pixel-generation seam: strategies that map raw decoded values to
//! display-ready color channels for an external renderer.
//!
//! The core's only obligation here is the strided, typed buffer access
//! from [`crate::volume`]; the strategy decides which component of
//! which value feeds each output channel and how values are windowed
//! into bytes. Renderers cache generated pixels and use the strategy's
//! monotonic version counter to notice parameter changes.

use crate::error::Result;
use crate::typedef::NiftiType;
use crate::util::{widen_u16, widen_u32, widen_u64, widen_u8};
use crate::volume::{VoxelBuffer, VoxelData};
use rgb::RGB8;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which decoded component of a value feeds an output channel.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ChannelInput {
    /// The plain scalar value.
    Value,
    /// The real half of a complex value.
    Real,
    /// The imaginary half of a complex value.
    Imaginary,
    /// The red channel of an RGB value.
    Red,
    /// The green channel of an RGB value.
    Green,
    /// The blue channel of an RGB value.
    Blue,
}

/// The source of one output channel: an input selector plus the index
/// of the value within the voxel it selects from.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct ChannelBinding {
    /// Which component of the selected value to read.
    pub input: ChannelInput,
    /// The index along the value axis to read from.
    pub value_index: usize,
}

impl ChannelBinding {
    /// A binding to the given component of the voxel's first value.
    pub fn new(input: ChannelInput) -> Self {
        ChannelBinding {
            input,
            value_index: 0,
        }
    }

    fn fetch(&self, volume: &VoxelBuffer, i: usize, j: usize, k: usize, t: usize) -> Result<f64> {
        let v = self.value_index;
        match self.input {
            ChannelInput::Value => volume.value(v, i, j, k, t),
            ChannelInput::Real => Ok(volume.complex_value(v, i, j, k, t)?.re),
            ChannelInput::Imaginary => Ok(volume.complex_value(v, i, j, k, t)?.im),
            ChannelInput::Red => Ok(f64::from(volume.rgb_value(v, i, j, k, t)?.r)),
            ChannelInput::Green => Ok(f64::from(volume.rgb_value(v, i, j, k, t)?.g)),
            ChannelInput::Blue => Ok(f64::from(volume.rgb_value(v, i, j, k, t)?.b)),
        }
    }
}

/// One of the generator's output channels.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum OutputChannel {
    /// The red output byte.
    Red = 0,
    /// The green output byte.
    Green = 1,
    /// The blue output byte.
    Blue = 2,
}

/// A strategy that produces one output pixel per voxel position.
///
/// Implementations carry mutable windowing parameters; the version
/// counter must increase on every parameter change so that renderers
/// can invalidate cached pixels.
pub trait PixelGenerator {
    /// A monotonic counter that increases whenever a parameter affecting
    /// the generated pixels changes.
    fn version(&self) -> u64;

    /// Generate the output pixel for the given voxel position.
    fn pixel(&self, volume: &VoxelBuffer, i: usize, j: usize, k: usize, t: usize) -> Result<RGB8>;
}

/// The stock strategy: a per-channel binding (or none, in which case
/// the channel outputs 0) and a linear windowing range mapping any
/// selected component into a byte.
#[derive(Debug)]
pub struct MappedPixelGenerator {
    /// bindings in output order red, green, blue
    bindings: [Option<ChannelBinding>; 3],
    window_min: f64,
    window_max: f64,
    version: AtomicU64,
}

impl Default for MappedPixelGenerator {
    fn default() -> Self {
        MappedPixelGenerator::grayscale(0)
    }
}

impl MappedPixelGenerator {
    /// A generator with explicit bindings for the red, green and blue
    /// output channels and a `[0, 255]` window.
    pub fn new(bindings: [Option<ChannelBinding>; 3]) -> Self {
        MappedPixelGenerator {
            bindings,
            window_min: 0.,
            window_max: 255.,
            version: AtomicU64::new(0),
        }
    }

    /// A grayscale generator fed by the plain scalar value at the given
    /// value index.
    pub fn grayscale(value_index: usize) -> Self {
        let binding = Some(ChannelBinding {
            input: ChannelInput::Value,
            value_index,
        });
        MappedPixelGenerator::new([binding; 3])
    }

    /// A pass-through generator for RGB volumes.
    pub fn rgb() -> Self {
        MappedPixelGenerator::new([
            Some(ChannelBinding::new(ChannelInput::Red)),
            Some(ChannelBinding::new(ChannelInput::Green)),
            Some(ChannelBinding::new(ChannelInput::Blue)),
        ])
    }

    /// Reset the bindings and the window from the volume itself.
    ///
    /// Bindings start as plain values: with two values per voxel the
    /// second value feeds green and blue goes dark, with three or more
    /// the first three values feed the three channels. Complex kinds
    /// map the real half to red and the imaginary half to green; RGB
    /// volumes show their first value on all channels. The window is
    /// set to the range of the stored components ({0, 1} for 1-bit
    /// volumes, the unsigned range for unsigned integer kinds).
    pub fn detect_default(&mut self, volume: &VoxelBuffer) {
        let value = |value_index| {
            Some(ChannelBinding {
                input: ChannelInput::Value,
                value_index,
            })
        };
        self.bindings = [value(0), value(0), value(0)];
        let nv = volume.num_values_per_voxel();
        if nv == 2 {
            self.bindings[1] = value(1);
            self.bindings[2] = None;
        } else if nv >= 3 {
            self.bindings[1] = value(1);
            self.bindings[2] = value(2);
        }

        use NiftiType::*;
        match volume.data_type() {
            Binary => {
                self.window_min = 0.;
                self.window_max = 1.;
            }
            Complex64 | Complex128 | Complex256 => {
                self.bindings[0] = Some(ChannelBinding::new(ChannelInput::Real));
                self.bindings[1] = Some(ChannelBinding::new(ChannelInput::Imaginary));
                self.bindings[2] = None;
                let (min, max) = component_range(volume);
                self.window_min = min;
                self.window_max = max;
            }
            Rgb24 => {
                // show only the first value
                self.bindings[1] = value(0);
                self.bindings[2] = value(0);
                let (min, max) = component_range(volume);
                self.window_min = min;
                self.window_max = max;
            }
            _ => {
                let (min, max) = component_range(volume);
                self.window_min = min;
                self.window_max = max;
            }
        }
        self.bump();
    }

    /// The windowing range as `(min, max)`.
    pub fn window(&self) -> (f64, f64) {
        (self.window_min, self.window_max)
    }

    /// Replace the windowing range by its bounds.
    pub fn set_window_limits(&mut self, min: f64, max: f64) {
        self.window_min = min;
        self.window_max = max;
        self.bump();
    }

    /// Replace the windowing range by its center and width.
    pub fn set_window(&mut self, center: f64, width: f64) {
        self.window_min = center - width / 2.;
        self.window_max = center + width / 2.;
        self.bump();
    }

    /// The midpoint of the windowing range.
    pub fn window_center(&self) -> f64 {
        (self.window_max + self.window_min) / 2.
    }

    /// Move the windowing range, keeping its width.
    pub fn set_window_center(&mut self, center: f64) {
        let width = self.window_width();
        self.window_min = center - width / 2.;
        self.window_max = center + width / 2.;
        self.bump();
    }

    /// The extent of the windowing range.
    pub fn window_width(&self) -> f64 {
        self.window_max - self.window_min
    }

    /// Widen or narrow the windowing range around its center.
    pub fn set_window_width(&mut self, width: f64) {
        let center = self.window_center();
        self.window_min = center - width / 2.;
        self.window_max = center + width / 2.;
        self.bump();
    }

    /// The current channel bindings, in output order red, green, blue.
    pub fn bindings(&self) -> &[Option<ChannelBinding>; 3] {
        &self.bindings
    }

    /// Replace the binding of one output channel. `None` turns the
    /// channel off: it outputs 0.
    pub fn set_binding(&mut self, channel: OutputChannel, binding: Option<ChannelBinding>) {
        self.bindings[channel as usize] = binding;
        self.bump();
    }

    fn bump(&self) {
        self.version.fetch_add(1, Ordering::Relaxed);
    }

    /// Window a component value into a single output byte:
    /// `clamp((x - min) / (max - min) * 255)`.
    fn interp(&self, x: f64) -> u8 {
        if x <= self.window_min {
            0
        } else if x >= self.window_max {
            255
        } else {
            ((x - self.window_min) * 255. / (self.window_max - self.window_min)) as u8
        }
    }
}

impl PixelGenerator for MappedPixelGenerator {
    fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }

    fn pixel(&self, volume: &VoxelBuffer, i: usize, j: usize, k: usize, t: usize) -> Result<RGB8> {
        let mut out = [0u8; 3];
        for (slot, binding) in out.iter_mut().zip(&self.bindings) {
            if let Some(b) = binding {
                *slot = self.interp(b.fetch(volume, i, j, k, t)?);
            }
        }
        Ok(RGB8 {
            r: out[0],
            g: out[1],
            b: out[2],
        })
    }
}

/// The `(min, max)` range over every stored component. Unsigned
/// integer kinds go through the unsigned widening; RGB channels and
/// signed kinds are scanned as stored.
fn component_range(volume: &VoxelBuffer) -> (f64, f64) {
    use VoxelData::*;
    match volume.data() {
        Bool(_) => (0., 1.),
        U8(v) if volume.data_type() == NiftiType::Uint8 => {
            range_of(v, |x| widen_u8(x as i8))
        }
        U8(v) => range_of(v, |x| f64::from(x as i8)),
        I8(v) => range_of(v, f64::from),
        I16(v) => range_of(v, f64::from),
        U16(v) => range_of(v, |x| widen_u16(x as i16)),
        I32(v) => range_of(v, f64::from),
        U32(v) => range_of(v, |x| widen_u32(x as i32)),
        I64(v) => range_of(v, |x| x as f64),
        U64(v) => range_of(v, |x| widen_u64(x as i64)),
        F32(v) => range_of(v, f64::from),
        F64(v) => range_of(v, |x| x),
    }
}

fn range_of<T: Copy>(values: &[T], as_f64: impl Fn(T) -> f64) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &x in values {
        let d = as_f64(x);
        if d < min {
            min = d;
        }
        if d > max {
            max = d;
        }
    }
    (min, max)
}
