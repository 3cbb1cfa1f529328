//! Construction of the voxel-to-world affine transforms declared by a
//! header: the fallback spacing scale, the quaternion method and the
//! explicit affine rows.

use crate::header::NiftiHeader;
use nalgebra::{Matrix3, Matrix4, Vector3};

/// Method 1: scale each voxel axis by its grid spacing. No rotation,
/// no translation.
pub(crate) fn scaled_affine(h: &NiftiHeader) -> Matrix4<f64> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(h.pixdim[1], h.pixdim[2], h.pixdim[3]))
}

/// Method 2: rotate by the header's quaternion, scale by the grid
/// spacings with the qfac sign on the slice axis, then translate by the
/// quaternion offset.
pub(crate) fn qform_affine(h: &NiftiHeader) -> Matrix4<f64> {
    let r = quaternion_rotation(h.quaternion());
    let spacing = Vector3::new(h.pixdim[1], h.pixdim[2], h.qfac() * h.pixdim[3]);
    let mut affine = Matrix4::identity();
    for col in 0..3 {
        affine
            .fixed_view_mut::<3, 1>(0, col)
            .copy_from(&(r.column(col) * spacing[col]));
    }
    affine
        .fixed_view_mut::<3, 1>(0, 3)
        .copy_from(&Vector3::new(h.qoffset_x, h.qoffset_y, h.qoffset_z));
    affine
}

/// Method 3: the explicit affine rows stored in the header.
pub(crate) fn srow_affine(h: &NiftiHeader) -> Matrix4<f64> {
    #[rustfmt::skip]
    let affine = Matrix4::new(
        h.srow_x[0], h.srow_x[1], h.srow_x[2], h.srow_x[3],
        h.srow_y[0], h.srow_y[1], h.srow_y[2], h.srow_y[3],
        h.srow_z[0], h.srow_z[1], h.srow_z[2], h.srow_z[3],
        0., 0., 0., 1.,
    );
    affine
}

/// Rotation matrix of the unit quaternion `[a, b, c, d]` (scalar first).
fn quaternion_rotation(q: [f64; 4]) -> Matrix3<f64> {
    let [a, b, c, d] = q;
    Matrix3::new(
        a * a + b * b - c * c - d * d,
        2. * (b * c - a * d),
        2. * (b * d + a * c),
        2. * (b * c + a * d),
        a * a + c * c - b * b - d * d,
        2. * (c * d - a * b),
        2. * (b * d - a * c),
        2. * (c * d + a * b),
        a * a + d * d - b * b - c * c,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn header_with_spacing(pixdim: [f64; 4]) -> NiftiHeader {
        let mut h = NiftiHeader::default();
        h.pixdim[0] = pixdim[0];
        h.pixdim[1] = pixdim[1];
        h.pixdim[2] = pixdim[2];
        h.pixdim[3] = pixdim[3];
        h
    }

    #[test]
    fn identity_quaternion_gives_spacing_affine() {
        let mut h = header_with_spacing([1., 2., 3., 4.]);
        h.qoffset_x = -10.;
        let affine = qform_affine(&h);
        let expected = Matrix4::new(
            2., 0., 0., -10., //
            0., 3., 0., 0., //
            0., 0., 4., 0., //
            0., 0., 0., 1.,
        );
        assert_abs_diff_eq!(affine, expected, epsilon = 1e-12);
    }

    #[test]
    fn half_turn_about_x() {
        let mut h = header_with_spacing([1., 1., 1., 1.]);
        h.quatern_b = 1.0;
        let affine = qform_affine(&h);
        let expected = Matrix4::new(
            1., 0., 0., 0., //
            0., -1., 0., 0., //
            0., 0., -1., 0., //
            0., 0., 0., 1.,
        );
        assert_abs_diff_eq!(affine, expected, epsilon = 1e-12);
    }

    #[test]
    fn qfac_flips_the_slice_axis() {
        let h = header_with_spacing([-1., 1., 1., 2.]);
        let affine = qform_affine(&h);
        assert_abs_diff_eq!(affine[(2, 2)], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn srow_rows_are_taken_verbatim() {
        let mut h = NiftiHeader::default();
        h.srow_x = [1., 0., 0., 5.];
        h.srow_y = [0., 0., -1., 6.];
        h.srow_z = [0., 1., 0., 7.];
        let affine = srow_affine(&h);
        assert_eq!(affine[(0, 3)], 5.);
        assert_eq!(affine[(1, 2)], -1.);
        assert_eq!(affine[(2, 1)], 1.);
        assert_eq!(affine[(3, 3)], 1.);
    }

    #[test]
    fn scaled_affine_is_diagonal() {
        let h = header_with_spacing([0., 0.5, 0.5, 2.5]);
        let affine = scaled_affine(&h);
        assert_eq!(affine[(0, 0)], 0.5);
        assert_eq!(affine[(2, 2)], 2.5);
        assert_eq!(affine[(0, 3)], 0.);
    }
}
