//! Triangle rasterization
//!
//! Screen-space (affine) interpolation: depth and varyings are blended with
//! weights computed on the projected triangle, not corrected for w.

use super::context::Context;
use super::math::{Vec2, Vec3, Vec4};
use super::program::{Program, Shader};

/// Barycentric weights of `p` with respect to triangle (a, b, c).
///
/// Solves `P = A + s*AB + t*AC` and returns `(1 - s - t, s, t)`. The point
/// lies in the triangle iff all three weights are >= 0. A zero-area
/// triangle divides by zero and yields non-finite weights, which fail that
/// test.
///
/// The first weight is divided out from its own numerator rather than
/// subtracted from 1, so points exactly on the BC edge get an exact zero.
pub fn barycentric(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let denom = ab.x * ac.y - ab.y * ac.x;
    let s = ac.y * ap.x - ac.x * ap.y;
    let t = ab.x * ap.y - ab.y * ap.x;

    Vec3::new((denom - s - t) / denom, s / denom, t / denom)
}

/// Inclusive pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// Pixel box around the points, clamped to the target.
///
/// The box is inverted (min > max) when the points lie entirely left of or
/// below the target.
pub fn bounding_box(width: usize, height: usize, points: &[Vec2; 3]) -> BoundingBox {
    let xs = points.map(|p| p.x);
    let ys = points.map(|p| p.y);

    let min_x = xs[0].min(xs[1]).min(xs[2]).max(0.0);
    let min_y = ys[0].min(ys[1]).min(ys[2]).max(0.0);
    let max_x = xs[0].max(xs[1]).max(xs[2]).min((width - 1) as f32);
    let max_y = ys[0].max(ys[1]).max(ys[2]).min((height - 1) as f32);

    BoundingBox {
        min_x: min_x as i32,
        min_y: min_y as i32,
        max_x: (max_x + 0.5) as i32,
        max_y: (max_y + 0.5) as i32,
    }
}

/// Outside the clip volume -w <= x, y, z <= w. A negative w fails every
/// comparison pair and counts as invisible.
fn is_vertex_invisible(clip: Vec4) -> bool {
    let Vec4 { x, y, z, w } = clip;
    x < -w || x > w || y < -w || y > w || z < -w || z > w
}

/// Clockwise winding in NDC x/y
fn is_back_facing(ndc: &[Vec4; 3]) -> bool {
    let a = Vec3::from_vec4(ndc[0]);
    let b = Vec3::from_vec4(ndc[1]);
    let c = Vec3::from_vec4(ndc[2]);
    (b - a).cross(c - a).z < 0.0
}

fn interpolate_depth(screen: &[Vec4; 3], weights: Vec3) -> f32 {
    screen[0].z * weights.x + screen[1].z * weights.y + screen[2].z * weights.z
}

/// Run `program` for one triangle and write the covered fragments.
///
/// The triangle is dropped whole when any vertex falls outside the clip
/// volume or when it winds clockwise after projection. Fragments are shaded
/// only when strictly closer than what the depth buffer holds; pixels on an
/// edge shared by two triangles are covered by both.
pub fn draw_triangle<S: Shader>(context: &mut Context, program: &mut Program<S>) {
    let width = context.width();
    let height = context.height();

    let mut clip_coords = [Vec4::ZERO; 3];
    for (i, clip) in clip_coords.iter_mut().enumerate() {
        *clip = program.shader.vertex(
            i,
            &program.attribs,
            &mut program.varyings,
            &program.uniforms,
        );
        if is_vertex_invisible(*clip) {
            return;
        }
    }

    let ndc_coords = clip_coords.map(|clip| clip.scale(1.0 / clip.w));
    if is_back_facing(&ndc_coords) {
        return;
    }

    let viewport = *context.viewport();
    let screen_coords = ndc_coords.map(|ndc| viewport.mul_vec4(ndc));
    let screen_points = screen_coords.map(|s| Vec2::new(s.x, s.y));

    let bbox = bounding_box(width, height, &screen_points);
    for x in bbox.min_x..=bbox.max_x {
        for y in bbox.min_y..=bbox.max_y {
            let point = Vec2::new(x as f32, y as f32);
            let weights = barycentric(screen_points[0], screen_points[1], screen_points[2], point);
            if !(weights.x >= 0.0 && weights.y >= 0.0 && weights.z >= 0.0) {
                continue;
            }

            let (x, y) = (x as usize, y as usize);
            let depth = interpolate_depth(&screen_coords, weights);
            if !context.passes_depth(y * width + x, depth) {
                continue;
            }

            program.shader.interp_varyings(&mut program.varyings, weights);
            let color = program.shader.fragment(&program.varyings, &program.uniforms);
            context.write_fragment(x, y, depth, color.to_array());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Clip-space positions passed straight through, constant color
    struct FlatShader {
        color: Vec4,
    }

    impl Shader for FlatShader {
        type Attribs = [Vec4; 3];
        type Varyings = Vec3;
        type Uniforms = ();

        fn vertex(&self, nth: usize, attribs: &[Vec4; 3], _: &mut Vec3, _: &()) -> Vec4 {
            attribs[nth]
        }

        fn interp_varyings(&self, varyings: &mut Vec3, weights: Vec3) {
            *varyings = weights;
        }

        fn fragment(&self, _: &Vec3, _: &()) -> Vec4 {
            self.color
        }
    }

    /// Counts stage invocations to observe early rejection
    #[derive(Default)]
    struct Counters {
        vertex: usize,
        fragment: std::cell::Cell<usize>,
    }

    struct CountingShader;

    impl Shader for CountingShader {
        type Attribs = [Vec4; 3];
        type Varyings = Counters;
        type Uniforms = ();

        fn vertex(&self, nth: usize, attribs: &[Vec4; 3], v: &mut Counters, _: &()) -> Vec4 {
            v.vertex += 1;
            attribs[nth]
        }

        fn interp_varyings(&self, _: &mut Counters, _: Vec3) {}

        fn fragment(&self, v: &Counters, _: &()) -> Vec4 {
            v.fragment.set(v.fragment.get() + 1);
            Vec4::new(1.0, 1.0, 1.0, 1.0)
        }
    }

    fn red_program(clip: [Vec4; 3]) -> Program<FlatShader> {
        Program::new(
            FlatShader { color: Vec4::new(1.0, 0.0, 0.0, 1.0) },
            clip,
            Vec3::ZERO,
            (),
        )
    }

    /// Clip coordinates (w = 1) that land on the given pixel positions of a
    /// `size` x `size` target
    fn clip_for_pixels(size: f32, pixels: [(f32, f32, f32); 3]) -> [Vec4; 3] {
        pixels.map(|(x, y, z)| Vec4::new(x * 2.0 / size - 1.0, y * 2.0 / size - 1.0, z, 1.0))
    }

    fn covered(ctx: &Context) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..ctx.height() {
            for x in 0..ctx.width() {
                if ctx.depth_at(x, y) != f32::MAX {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(7.0, 2.0);
        let c = Vec2::new(3.0, 9.0);
        let wa = barycentric(a, b, c, a);
        let wb = barycentric(a, b, c, b);
        let wc = barycentric(a, b, c, c);
        assert!((wa.x - 1.0).abs() < 1e-6 && wa.y.abs() < 1e-6 && wa.z.abs() < 1e-6);
        assert!(wb.x.abs() < 1e-6 && (wb.y - 1.0).abs() < 1e-6 && wb.z.abs() < 1e-6);
        assert!(wc.x.abs() < 1e-6 && wc.y.abs() < 1e-6 && (wc.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_barycentric_degenerate_is_rejected() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 1.0);
        let c = Vec2::new(2.0, 2.0);
        let w = barycentric(a, b, c, Vec2::new(1.0, 1.0));
        assert!(!(w.x >= 0.0 && w.y >= 0.0 && w.z >= 0.0));
    }

    proptest! {
        #[test]
        fn prop_barycentric_sums_to_one(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            cx in -100.0f32..100.0, cy in -100.0f32..100.0,
            px in -100.0f32..100.0, py in -100.0f32..100.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let c = Vec2::new(cx, cy);
            let area = (b - a).x * (c - a).y - (b - a).y * (c - a).x;
            prop_assume!(area.abs() > 100.0);

            let w = barycentric(a, b, c, Vec2::new(px, py));
            prop_assert!((w.x + w.y + w.z - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_bounding_box_clamps() {
        let pts = [Vec2::new(-3.0, 1.2), Vec2::new(2.6, -1.0), Vec2::new(9.0, 3.4)];
        let bbox = bounding_box(4, 4, &pts);
        assert_eq!(bbox, BoundingBox { min_x: 0, min_y: 0, max_x: 3, max_y: 3 });

        let pts = [Vec2::new(1.2, 1.2), Vec2::new(2.4, 1.0), Vec2::new(1.0, 2.6)];
        let bbox = bounding_box(8, 8, &pts);
        assert_eq!(bbox, BoundingBox { min_x: 1, min_y: 1, max_x: 2, max_y: 3 });
    }

    #[test]
    fn test_bounding_box_offscreen_is_empty() {
        let pts = [Vec2::new(-9.0, -9.0), Vec2::new(-5.0, -9.0), Vec2::new(-9.0, -5.0)];
        let bbox = bounding_box(4, 4, &pts);
        assert!((bbox.min_x..=bbox.max_x).is_empty());
        assert!((bbox.min_y..=bbox.max_y).is_empty());
    }

    #[test]
    fn test_lower_left_triangle_on_4x4() {
        let mut ctx = Context::new(4, 4);
        let clip = clip_for_pixels(4.0, [(0.0, 0.0, 0.0), (3.0, 0.0, 0.0), (0.0, 3.0, 0.0)]);
        draw_triangle(&mut ctx, &mut red_program(clip));

        for y in 0..4 {
            for x in 0..4 {
                let expected = if x + y <= 3 { [255, 0, 0] } else { [0, 0, 0] };
                assert_eq!(ctx.color_at(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_back_facing_triangle_writes_nothing() {
        let mut ctx = Context::new(4, 4);
        let clip = clip_for_pixels(4.0, [(0.0, 0.0, 0.0), (0.0, 3.0, 0.0), (3.0, 0.0, 0.0)]);
        draw_triangle(&mut ctx, &mut red_program(clip));
        assert!(covered(&ctx).is_empty());
        assert!(ctx.color_buffer().buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_vertex_outside_volume_rejects_whole_triangle() {
        let mut ctx = Context::new(8, 8);
        let clip = [
            Vec4::new(-0.5, -0.5, 0.0, 1.0),
            Vec4::new(1.5, -0.5, 0.0, 1.0),
            Vec4::new(-0.5, 0.5, 0.0, 1.0),
        ];
        draw_triangle(&mut ctx, &mut red_program(clip));
        assert!(covered(&ctx).is_empty());

        let clip = [
            Vec4::new(-0.5, -0.5, 0.0, 1.0),
            Vec4::new(0.5, -0.5, 1.01, 1.0),
            Vec4::new(-0.5, 0.5, 0.0, 1.0),
        ];
        draw_triangle(&mut ctx, &mut red_program(clip));
        assert!(covered(&ctx).is_empty());
    }

    #[test]
    fn test_negative_w_rejects_triangle() {
        let mut ctx = Context::new(8, 8);
        let clip = [
            Vec4::new(0.0, 0.0, 0.0, -1.0),
            Vec4::new(0.5, 0.0, 0.0, 1.0),
            Vec4::new(0.0, 0.5, 0.0, 1.0),
        ];
        draw_triangle(&mut ctx, &mut red_program(clip));
        assert!(covered(&ctx).is_empty());
    }

    #[test]
    fn test_rejected_vertex_stops_vertex_stage() {
        let mut ctx = Context::new(8, 8);
        let clip = [
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(2.0, 0.0, 0.0, 1.0),
            Vec4::new(0.0, 0.5, 0.0, 1.0),
        ];
        let mut program = Program::new(CountingShader, clip, Counters::default(), ());
        draw_triangle(&mut ctx, &mut program);
        assert_eq!(program.varyings.vertex, 2);
        assert_eq!(program.varyings.fragment.get(), 0);
    }

    #[test]
    fn test_degenerate_triangle_writes_nothing() {
        let mut ctx = Context::new(8, 8);
        let clip = [
            Vec4::new(-0.5, -0.5, 0.0, 1.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(0.5, 0.5, 0.0, 1.0),
        ];
        draw_triangle(&mut ctx, &mut red_program(clip));
        assert!(covered(&ctx).is_empty());
    }

    #[test]
    fn test_depth_is_screen_space_blend() {
        let mut ctx = Context::new(8, 8);
        let clip = clip_for_pixels(8.0, [(0.0, 0.0, 0.1), (7.0, 0.0, 0.5), (0.0, 7.0, 0.9)]);
        draw_triangle(&mut ctx, &mut red_program(clip));

        let screen = clip.map(|c| ctx.viewport().mul_vec4(c));
        let points = screen.map(|s| Vec2::new(s.x, s.y));
        let pixels = covered(&ctx);
        assert!(!pixels.is_empty());
        for (x, y) in pixels {
            let w = barycentric(points[0], points[1], points[2], Vec2::new(x as f32, y as f32));
            let expected = interpolate_depth(&screen, w);
            assert!((ctx.depth_at(x, y) - expected).abs() < 1e-6);
            assert_eq!(ctx.color_at(x, y), [255, 0, 0]);
        }
    }

    #[test]
    fn test_same_depth_is_drawn_once() {
        let mut ctx = Context::new(8, 8);
        let clip = clip_for_pixels(8.0, [(1.0, 1.0, 0.2), (6.0, 1.0, 0.2), (1.0, 6.0, 0.2)]);
        let mut program = Program::new(CountingShader, clip, Counters::default(), ());

        draw_triangle(&mut ctx, &mut program);
        let first = program.varyings.fragment.get();
        assert!(first > 0);
        let snapshot = ctx.color_buffer().clone();

        draw_triangle(&mut ctx, &mut program);
        assert_eq!(program.varyings.fragment.get(), first);
        assert_eq!(ctx.color_buffer(), &snapshot);
    }

    #[test]
    fn test_nearer_triangle_wins() {
        let mut ctx = Context::new(8, 8);
        let near = clip_for_pixels(8.0, [(0.0, 0.0, -0.5), (7.0, 0.0, -0.5), (0.0, 7.0, -0.5)]);
        let far = clip_for_pixels(8.0, [(0.0, 0.0, 0.5), (7.0, 0.0, 0.5), (0.0, 7.0, 0.5)]);

        draw_triangle(&mut ctx, &mut red_program(near));
        let mut blue = Program::new(
            FlatShader { color: Vec4::new(0.0, 0.0, 1.0, 1.0) },
            far,
            Vec3::ZERO,
            (),
        );
        draw_triangle(&mut ctx, &mut blue);
        assert_eq!(ctx.color_at(1, 1), [255, 0, 0]);

        ctx.clear();
        draw_triangle(&mut ctx, &mut blue);
        draw_triangle(&mut ctx, &mut red_program(near));
        assert_eq!(ctx.color_at(1, 1), [255, 0, 0]);
    }

    #[test]
    fn test_shared_edge_is_covered_by_both_triangles() {
        let lower = clip_for_pixels(8.0, [(0.0, 0.0, 0.5), (6.0, 0.0, 0.5), (0.0, 6.0, 0.5)]);
        let upper = clip_for_pixels(8.0, [(6.0, 0.0, 0.0), (6.0, 6.0, 0.0), (0.0, 6.0, 0.0)]);

        // (3, 3) lies on the shared hypotenuse
        for clip in [lower, upper] {
            let mut ctx = Context::new(8, 8);
            draw_triangle(&mut ctx, &mut red_program(clip));
            assert_eq!(ctx.color_at(3, 3), [255, 0, 0]);
        }

        let mut ctx = Context::new(8, 8);
        draw_triangle(&mut ctx, &mut red_program(lower));
        let mut green = Program::new(
            FlatShader { color: Vec4::new(0.0, 1.0, 0.0, 1.0) },
            upper,
            Vec3::ZERO,
            (),
        );
        draw_triangle(&mut ctx, &mut green);
        assert_eq!(ctx.color_at(3, 3), [0, 255, 0]);
        assert_eq!(ctx.color_at(1, 1), [255, 0, 0]);
    }

    #[test]
    fn test_clear_restores_fresh_output() {
        let clip = clip_for_pixels(8.0, [(0.0, 0.0, 0.3), (7.0, 2.0, 0.6), (2.0, 7.0, 0.9)]);

        let mut fresh = Context::new(8, 8);
        draw_triangle(&mut fresh, &mut red_program(clip));

        let mut reused = Context::new(8, 8);
        let other = clip_for_pixels(8.0, [(0.0, 0.0, -0.9), (7.0, 0.0, -0.9), (0.0, 7.0, -0.9)]);
        draw_triangle(&mut reused, &mut red_program(other));
        reused.clear();
        draw_triangle(&mut reused, &mut red_program(clip));

        assert_eq!(fresh.color_buffer(), reused.color_buffer());
        assert_eq!(fresh.depth_buffer(), reused.depth_buffer());
    }

    #[test]
    fn test_interpolator_receives_fragment_weights() {
        struct WeightShader;
        impl Shader for WeightShader {
            type Attribs = [Vec4; 3];
            type Varyings = Vec3;
            type Uniforms = ();

            fn vertex(&self, nth: usize, attribs: &[Vec4; 3], _: &mut Vec3, _: &()) -> Vec4 {
                attribs[nth]
            }

            fn interp_varyings(&self, varyings: &mut Vec3, weights: Vec3) {
                *varyings = weights;
            }

            fn fragment(&self, v: &Vec3, _: &()) -> Vec4 {
                Vec4::new(v.x, v.y, v.z, 1.0)
            }
        }

        let mut ctx = Context::new(4, 4);
        let clip = clip_for_pixels(4.0, [(0.0, 0.0, 0.0), (3.0, 0.0, 0.0), (0.0, 3.0, 0.0)]);
        let mut program = Program::new(WeightShader, clip, Vec3::ZERO, ());
        draw_triangle(&mut ctx, &mut program);

        assert_eq!(ctx.color_at(0, 0), [255, 0, 0]);
        assert_eq!(ctx.color_at(3, 0), [0, 255, 0]);
        assert_eq!(ctx.color_at(0, 3), [0, 0, 255]);
    }
}
