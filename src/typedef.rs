//! This module contains multiple types defined by the standard.
//! All of them are closed code sets: primitive integer values read from a
//! header can be converted to these types and vice-versa.

use num_derive::FromPrimitive;

/// Data type for representing the element kind of a volume.
///
/// The discriminant values are the on-disk `datatype` codes.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum NiftiType {
    /// 1 bit per voxel, packed.
    // DT_BINARY                  1
    Binary = 1,
    /// unsigned char.
    // NIFTI_TYPE_UINT8           2
    Uint8 = 2,
    /// signed short.
    // NIFTI_TYPE_INT16           4
    Int16 = 4,
    /// signed int.
    // NIFTI_TYPE_INT32           8
    Int32 = 8,
    /// 32 bit float.
    // NIFTI_TYPE_FLOAT32        16
    Float32 = 16,
    /// 64 bit complex = 2 32 bit floats.
    // NIFTI_TYPE_COMPLEX64      32
    Complex64 = 32,
    /// 64 bit float = double.
    // NIFTI_TYPE_FLOAT64        64
    Float64 = 64,
    /// 3 8 bit bytes.
    // NIFTI_TYPE_RGB24         128
    Rgb24 = 128,
    /// signed char.
    // NIFTI_TYPE_INT8          256
    Int8 = 256,
    /// unsigned short.
    // NIFTI_TYPE_UINT16        512
    Uint16 = 512,
    /// unsigned int.
    // NIFTI_TYPE_UINT32        768
    Uint32 = 768,
    /// signed long long.
    // NIFTI_TYPE_INT64        1024
    Int64 = 1024,
    /// unsigned long long.
    // NIFTI_TYPE_UINT64       1280
    Uint64 = 1280,
    /// 128 bit float = long double.
    // NIFTI_TYPE_FLOAT128     1536
    Float128 = 1536,
    /// 128 bit complex = 2 64 bit floats.
    // NIFTI_TYPE_COMPLEX128   1792
    Complex128 = 1792,
    /// 256 bit complex = 2 128 bit floats.
    // NIFTI_TYPE_COMPLEX256   2048
    Complex256 = 2048,
}

impl NiftiType {
    /// Retrieve the size of an element of this data type, in bytes.
    /// `Binary` elements are sub-byte and report 0.
    pub fn size_of(self) -> usize {
        use NiftiType::*;
        match self {
            Binary => 0,
            Int8 | Uint8 => 1,
            Int16 | Uint16 => 2,
            Rgb24 => 3,
            Int32 | Uint32 | Float32 => 4,
            Int64 | Uint64 | Float64 | Complex64 => 8,
            Float128 | Complex128 => 16,
            Complex256 => 32,
        }
    }

    /// The number of scalar components stored per value:
    /// 2 for complex kinds, 3 for RGB, 1 otherwise.
    pub fn components(self) -> usize {
        use NiftiType::*;
        match self {
            Complex64 | Complex128 | Complex256 => 2,
            Rgb24 => 3,
            _ => 1,
        }
    }

    /// Whether this kind stores an interleaved (real, imaginary) pair.
    pub fn is_complex(self) -> bool {
        use NiftiType::*;
        match self {
            Complex64 | Complex128 | Complex256 => true,
            _ => false,
        }
    }

    /// Whether stored values are to be interpreted as unsigned.
    /// RGB channels are unsigned bytes.
    pub fn is_unsigned(self) -> bool {
        use NiftiType::*;
        match self {
            Uint8 | Uint16 | Uint32 | Uint64 | Rgb24 => true,
            _ => false,
        }
    }
}

/// An enum type which represents a unit type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum Unit {
    /// NIFTI code for unspecified units.
    Unknown = 0,
    /* Space codes are multiples of 1. */
    /// NIFTI code for meters.
    Meter = 1,
    /// NIFTI code for millimeters.
    Mm = 2,
    /// NIFTI code for micrometers.
    Micron = 3,
    /* Time codes are multiples of 8. */
    /// NIFTI code for seconds.
    Sec = 8,
    /// NIFTI code for milliseconds.
    Msec = 16,
    /// NIFTI code for microseconds.
    Usec = 24,
    /* These units are for spectral data: */
    /// NIFTI code for Hertz.
    Hz = 32,
    /// NIFTI code for ppm.
    Ppm = 40,
    /// NIFTI code for radians per second.
    Rads = 48,
}

/// An enum type for representing a NIFTI intent code.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum Intent {
    /// default: no intention is indicated in the header.
    None = 0,
    /// Correlation coefficient R (1 param): p1 = DOF.
    Correl = 2,
    /// Student t statistic (1 param): p1 = DOF.
    Ttest = 3,
    /// Fisher F statistic (2 params).
    Ftest = 4,
    /// Standard normal (0 params).
    Zscore = 5,
    /// Chi-squared (1 param): p1 = DOF.
    Chisq = 6,
    /// Beta distribution (2 params): p1 = a, p2 = b.
    Beta = 7,
    /// Binomial distribution (2 params).
    Binom = 8,
    /// Gamma distribution (2 params): p1 = shape, p2 = scale.
    Gamma = 9,
    /// Poisson distribution (1 param): p1 = mean.
    Poisson = 10,
    /// Normal distribution (2 params): p1 = mean, p2 = standard deviation.
    Normal = 11,
    /// Noncentral F statistic (3 params).
    FtestNonc = 12,
    /// Noncentral chi-squared statistic (2 params).
    ChisqNonc = 13,
    /// Logistic distribution (2 params): p1 = location, p2 = scale.
    Logistic = 14,
    /// Laplace distribution (2 params): p1 = location, p2 = scale.
    Laplace = 15,
    /// Uniform distribution: p1 = lower end, p2 = upper end.
    Uniform = 16,
    /// Noncentral t statistic (2 params).
    TtestNonc = 17,
    /// Weibull distribution (3 params).
    Weibull = 18,
    /// Chi distribution (1 param): p1 = DOF.
    Chi = 19,
    /// Inverse Gaussian (2 params): p1 = mu, p2 = lambda.
    Invgauss = 20,
    /// Extreme value type I (2 params): p1 = location, p2 = scale.
    Extval = 21,
    /// Data is a 'p-value' (no params).
    Pval = 22,
    /// Data is ln(p-value) (no params).
    Logpval = 23,
    /// Data is log10(p-value) (no params).
    Log10pval = 24,
    /* --- these values aren't for statistics --- */
    /// Each voxel is an estimate of some parameter, named in `intent_name`.
    Estimate = 1001,
    /// Each voxel is an index into some set of labels.
    Label = 1002,
    /// Each voxel is an index into the NeuroNames labels set.
    Neuroname = 1003,
    /// Each voxel holds an M x N matrix (dim[5] = M*N).
    Genmatrix = 1004,
    /// Each voxel holds an NxN symmetric matrix (dim[5] = N*(N+1)/2).
    Symmatrix = 1005,
    /// The vector value at each voxel is a displacement field.
    Dispvect = 1006,
    /// The vector value at each voxel is any other kind of vector.
    Vector = 1007,
    /// The vector value at each voxel is a spatial coordinate.
    Pointset = 1008,
    /// The vector value at each voxel is a triple of vertex indexes.
    Triangle = 1009,
    /// The vector value at each voxel is a quaternion (dim[5] = 4).
    Quaternion = 1010,
    /// Dimensionless value (no params).
    Dimless = 1011,
}

impl Intent {
    /// Check whether this intent code is used for statistics.
    pub fn is_statcode(self) -> bool {
        self as i32 >= 2 && self as i32 <= 24
    }
}

/// An enum type for representing the validity of a spatial transform
/// specification (`qform`/`sform`).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum XForm {
    /// Arbitrary coordinates (Method 1).
    Unknown = 0,
    /// Scanner-based anatomical coordinates.
    ScannerAnat = 1,
    /// Coordinates aligned to another file's,
    /// or to anatomical "truth".
    AlignedAnat = 2,
    /// Coordinates aligned to the Talairach-Tournoux Atlas.
    Talairach = 3,
    /// MNI 152 normalized coordinates.
    Mni152 = 4,
}

/// An enum type for representing the slice order.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum SliceOrder {
    /// NIFTI_SLICE_UNKNOWN
    Unknown = 0,
    /// NIFTI_SLICE_SEQ_INC
    SeqInc = 1,
    /// NIFTI_SLICE_SEQ_DEC
    SeqDec = 2,
    /// NIFTI_SLICE_ALT_INC
    AltInc = 3,
    /// NIFTI_SLICE_ALT_DEC
    AltDec = 4,
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn datatype_codes() {
        assert_eq!(NiftiType::from_i16(4), Some(NiftiType::Int16));
        assert_eq!(NiftiType::from_i16(2048), Some(NiftiType::Complex256));
        assert_eq!(NiftiType::from_i16(3), None);
        assert_eq!(NiftiType::from_i16(0), None);
    }

    #[test]
    fn datatype_shapes() {
        assert_eq!(NiftiType::Int16.size_of(), 2);
        assert_eq!(NiftiType::Complex256.size_of(), 32);
        assert_eq!(NiftiType::Binary.size_of(), 0);
        assert_eq!(NiftiType::Complex64.components(), 2);
        assert_eq!(NiftiType::Rgb24.components(), 3);
        assert_eq!(NiftiType::Float64.components(), 1);
        assert!(NiftiType::Uint16.is_unsigned());
        assert!(!NiftiType::Int16.is_unsigned());
        assert!(NiftiType::Complex128.is_complex());
    }

    #[test]
    fn intent_statcodes() {
        assert!(Intent::Ttest.is_statcode());
        assert!(!Intent::Label.is_statcode());
        assert_eq!(Intent::from_i32(1005), Some(Intent::Symmatrix));
    }
}
