//! Helpers for shader programs: texture lookups, varying blends, lighting

use super::image::Image;
use super::math::{Mat4, Vec2, Vec3, Vec4};

/// Nearest-texel lookup.
///
/// `texcoord` must lie in [0, 1] on both axes; there is no wrapping. Missing
/// channels read as 0, so a gray texture yields (g, 0, 0, 0).
pub fn sample_texture(texture: &Image, texcoord: Vec2) -> Vec4 {
    let (u, v) = (texcoord.x, texcoord.y);
    assert!((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v), "texcoord out of range");
    assert!((1..=4).contains(&texture.channels));

    let col = ((texture.width - 1) as f32 * u + 0.5) as usize;
    let row = ((texture.height - 1) as f32 * v + 0.5) as usize;

    let mut color = [0.0f32; 4];
    for (dst, &src) in color.iter_mut().zip(texture.pixel(row, col)) {
        *dst = src as f32 / 255.0;
    }
    Vec4::new(color[0], color[1], color[2], color[3])
}

pub fn interp_vec2(vs: &[Vec2; 3], weights: Vec3) -> Vec2 {
    vs[0] * weights.x + vs[1] * weights.y + vs[2] * weights.z
}

pub fn interp_vec3(vs: &[Vec3; 3], weights: Vec3) -> Vec3 {
    vs[0] * weights.x + vs[1] * weights.y + vs[2] * weights.z
}

pub fn interp_vec4(vs: &[Vec4; 3], weights: Vec3) -> Vec4 {
    vs[0] * weights.x + vs[1] * weights.y + vs[2] * weights.z
}

/// Mirror the incident `light` about `normal` (which must be normalized)
pub fn reflect_light(light: Vec3, normal: Vec3) -> Vec3 {
    light - normal * (2.0 * light.dot(normal))
}

/// Matrix for transforming normals by `model_view`
pub fn normal_matrix(model_view: &Mat4) -> Mat4 {
    model_view.inverse_transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gradient_texture() -> Image {
        let mut tex = Image::new(3, 2, 3);
        for (i, b) in tex.buffer.iter_mut().enumerate() {
            *b = (i * 10) as u8;
        }
        tex
    }

    #[test]
    fn test_sample_corners() {
        let tex = gradient_texture();
        let c = sample_texture(&tex, Vec2::new(0.0, 0.0));
        assert_eq!(c, Vec4::new(0.0, 10.0 / 255.0, 20.0 / 255.0, 0.0));

        let c = sample_texture(&tex, Vec2::new(1.0, 1.0));
        assert_eq!(c, Vec4::new(150.0 / 255.0, 160.0 / 255.0, 170.0 / 255.0, 0.0));
    }

    #[test]
    fn test_sample_rounds_to_nearest() {
        let tex = gradient_texture();
        // (3 - 1) * 0.3 + 0.5 = 1.1 -> column 1; (2 - 1) * 0.6 + 0.5 = 1.1 -> row 1
        let c = sample_texture(&tex, Vec2::new(0.3, 0.6));
        assert_eq!(c.x, 120.0 / 255.0);
    }

    #[test]
    fn test_sample_gray_zero_fills() {
        let mut tex = Image::new(1, 1, 1);
        tex.buffer[0] = 255;
        assert_eq!(sample_texture(&tex, Vec2::new(0.5, 0.5)), Vec4::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    #[should_panic]
    fn test_sample_out_of_range_panics() {
        let tex = gradient_texture();
        sample_texture(&tex, Vec2::new(1.01, 0.0));
    }

    #[test]
    fn test_interp_at_corner_weights() {
        let vs = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0), Vec3::new(7.0, 8.0, 9.0)];
        assert_eq!(interp_vec3(&vs, Vec3::new(0.0, 1.0, 0.0)), vs[1]);

        let uv = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        assert_eq!(interp_vec2(&uv, Vec3::new(0.5, 0.25, 0.25)), Vec2::new(0.25, 0.25));

        let colors = [Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::new(0.0, 1.0, 0.0, 1.0), Vec4::ZERO];
        assert_eq!(
            interp_vec4(&colors, Vec3::new(0.5, 0.5, 0.0)),
            Vec4::new(0.5, 0.5, 0.0, 1.0)
        );
    }

    proptest! {
        #[test]
        fn prop_interp_of_equal_values_is_identity(
            x in -10.0f32..10.0, y in -10.0f32..10.0, z in -10.0f32..10.0,
            w0 in 0.0f32..1.0, w1 in 0.0f32..1.0,
        ) {
            prop_assume!(w0 + w1 <= 1.0);
            let weights = Vec3::new(w0, w1, 1.0 - w0 - w1);
            let v = Vec3::new(x, y, z);
            let out = interp_vec3(&[v, v, v], weights);
            prop_assert!((out - v).len() < 1e-4);
        }
    }

    #[test]
    fn test_reflect_light() {
        let light = Vec3::new(1.0, -1.0, 0.0);
        let r = reflect_light(light, Vec3::UP);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        let mv = Mat4::scaling(2.0, 1.0, 1.0).mul_mat4(&Mat4::rotation_z(0.4));
        let tangent = Vec4::new(1.0, 1.0, 0.0, 0.0);
        let normal = Vec4::new(1.0, -1.0, 0.0, 0.0);

        let t = Vec3::from_vec4(mv.mul_vec4(tangent));
        let n = Vec3::from_vec4(normal_matrix(&mv).mul_vec4(normal));
        assert!(t.dot(n).abs() < 1e-5);
    }
}
