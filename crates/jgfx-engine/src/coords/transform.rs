use super::Vec2;

/// 2D affine transform stored as a 4×4 column-major matrix.
///
/// Only the nine entries of the embedded 3×3 transform are meaningful;
/// the full 16-float layout exists so the matrix can be handed to a
/// graphics backend without conversion.
#[derive(Debug, Copy, Clone)]
pub struct Transform {
    m: [f32; 16],
}

impl Transform {
    #[rustfmt::skip]
    pub const IDENTITY: Transform = Transform {
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Builds a transform from the nine entries of a 3×3 matrix,
    /// given in row-major order (`a00` is row 0, column 0).
    #[rustfmt::skip]
    #[inline]
    pub const fn new(
        a00: f32, a01: f32, a02: f32,
        a10: f32, a11: f32, a12: f32,
        a20: f32, a21: f32, a22: f32,
    ) -> Self {
        Transform {
            m: [
                a00, a10, 0.0, a20,
                a01, a11, 0.0, a21,
                0.0, 0.0, 1.0, 0.0,
                a02, a12, 0.0, a22,
            ],
        }
    }

    /// Column-major 4×4 matrix, as consumed by backend matrix loads.
    #[inline]
    pub const fn matrix(&self) -> &[f32; 16] {
        &self.m
    }

    #[inline]
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0] * point.x + self.m[4] * point.y + self.m[12],
            self.m[1] * point.x + self.m[5] * point.y + self.m[13],
        )
    }

    /// Combined transform applying `other` first, then `self`.
    pub fn combine(&self, other: &Transform) -> Transform {
        let a = &self.m;
        let b = &other.m;

        Transform::new(
            a[0] * b[0] + a[4] * b[1] + a[12] * b[3],
            a[0] * b[4] + a[4] * b[5] + a[12] * b[7],
            a[0] * b[12] + a[4] * b[13] + a[12] * b[15],
            a[1] * b[0] + a[5] * b[1] + a[13] * b[3],
            a[1] * b[4] + a[5] * b[5] + a[13] * b[7],
            a[1] * b[12] + a[5] * b[13] + a[13] * b[15],
            a[3] * b[0] + a[7] * b[1] + a[15] * b[3],
            a[3] * b[4] + a[7] * b[5] + a[15] * b[7],
            a[3] * b[12] + a[7] * b[13] + a[15] * b[15],
        )
    }

    /// Inverse transform, or identity if the matrix is not invertible.
    pub fn inverse(&self) -> Transform {
        let m = &self.m;

        let det = m[0] * (m[15] * m[5] - m[7] * m[13])
            - m[1] * (m[15] * m[4] - m[7] * m[12])
            + m[3] * (m[13] * m[4] - m[5] * m[12]);

        if det == 0.0 {
            return Transform::IDENTITY;
        }

        let inv = 1.0 / det;
        Transform::new(
            (m[15] * m[5] - m[7] * m[13]) * inv,
            -(m[15] * m[4] - m[7] * m[12]) * inv,
            (m[13] * m[4] - m[5] * m[12]) * inv,
            -(m[15] * m[1] - m[3] * m[13]) * inv,
            (m[15] * m[0] - m[3] * m[12]) * inv,
            -(m[13] * m[0] - m[1] * m[12]) * inv,
            (m[7] * m[1] - m[3] * m[5]) * inv,
            -(m[7] * m[0] - m[3] * m[4]) * inv,
            (m[5] * m[0] - m[1] * m[4]) * inv,
        )
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Transform {
        let translation = Transform::new(
            1.0, 0.0, offset.x, //
            0.0, 1.0, offset.y, //
            0.0, 0.0, 1.0,
        );
        self.combine(&translation)
    }

    /// Rotation around the origin, in degrees (clockwise with +Y down).
    pub fn rotate(self, degrees: f32) -> Transform {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();

        let rotation = Transform::new(
            cos, -sin, 0.0, //
            sin, cos, 0.0, //
            0.0, 0.0, 1.0,
        );
        self.combine(&rotation)
    }

    pub fn scale(self, factors: Vec2) -> Transform {
        let scaling = Transform::new(
            factors.x, 0.0, 0.0, //
            0.0, factors.y, 0.0, //
            0.0, 0.0, 1.0,
        );
        self.combine(&scaling)
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl PartialEq for Transform {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.m == other.m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!(
            (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4,
            "{a:?} != {b:?}"
        );
    }

    // ── transform_point ───────────────────────────────────────────────────

    #[test]
    fn identity_leaves_points_unchanged() {
        let p = Vec2::new(3.0, -7.5);
        assert_eq!(Transform::IDENTITY.transform_point(p), p);
    }

    #[test]
    fn translation_offsets_points() {
        let t = Transform::IDENTITY.translate(Vec2::new(10.0, -5.0));
        assert_eq!(t.transform_point(Vec2::new(1.0, 2.0)), Vec2::new(11.0, -3.0));
    }

    #[test]
    fn scale_multiplies_components() {
        let t = Transform::IDENTITY.scale(Vec2::new(2.0, 3.0));
        assert_eq!(t.transform_point(Vec2::new(4.0, 5.0)), Vec2::new(8.0, 15.0));
    }

    #[test]
    fn rotation_quarter_turn() {
        let t = Transform::IDENTITY.rotate(90.0);
        assert_close(t.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0));
    }

    // ── combine ───────────────────────────────────────────────────────────

    #[test]
    fn combine_applies_right_hand_side_first() {
        let scale = Transform::IDENTITY.scale(Vec2::new(2.0, 2.0));
        let translate = Transform::IDENTITY.translate(Vec2::new(1.0, 0.0));

        // translate ∘ scale: scale first, then translate.
        let combined = translate.combine(&scale);
        assert_eq!(
            combined.transform_point(Vec2::new(1.0, 1.0)),
            Vec2::new(3.0, 2.0)
        );
    }

    #[test]
    fn combine_with_identity_is_noop() {
        let t = Transform::IDENTITY
            .translate(Vec2::new(3.0, 4.0))
            .rotate(30.0);
        assert_eq!(t.combine(&Transform::IDENTITY), t);
        assert_eq!(Transform::IDENTITY.combine(&t), t);
    }

    // ── inverse ───────────────────────────────────────────────────────────

    #[test]
    fn inverse_round_trips_points() {
        let t = Transform::IDENTITY
            .translate(Vec2::new(12.0, -4.0))
            .rotate(42.0)
            .scale(Vec2::new(1.5, 0.5));
        let p = Vec2::new(7.0, 9.0);

        assert_close(t.inverse().transform_point(t.transform_point(p)), p);
    }

    #[test]
    fn singular_matrix_inverts_to_identity() {
        let t = Transform::IDENTITY.scale(Vec2::new(0.0, 0.0));
        assert_eq!(t.inverse(), Transform::IDENTITY);
    }
}
