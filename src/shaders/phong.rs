//! Textured Phong lighting: ambient + diffuse + specular
//!
//! Normals come from a normal map in model space, the specular strength from
//! the red channel of a specular map. Lighting is computed in view space,
//! where the eye sits at the origin.

use crate::rasterizer::{
    interp_vec2, interp_vec3, reflect_light, sample_texture, Image, Mat4, Shader, Vec2, Vec3, Vec4,
};

/// One triangle of mesh input
#[derive(Debug, Clone, Copy, Default)]
pub struct PhongAttribs {
    pub positions: [Vec3; 3],
    pub texcoords: [Vec2; 3],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PhongVaryings {
    /// Vertex stage outputs
    pub vs_out_texcoords: [Vec2; 3],
    pub vs_out_view_pos: [Vec3; 3],
    /// Fragment stage inputs
    pub fs_in_texcoord: Vec2,
    pub fs_in_view_pos: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct PhongUniforms {
    pub light_direction: Vec3,
    pub light_ambient: Vec3,
    pub light_diffuse: Vec3,
    pub light_specular: Vec3,
    pub view_matrix: Mat4,
    pub normal_matrix: Mat4,
    pub mv_matrix: Mat4,
    pub mvp_matrix: Mat4,
    pub shininess: f32,
}

/// Texture maps sampled by the fragment stage
#[derive(Debug, Clone, Copy)]
pub struct PhongShader<'a> {
    pub diffuse_map: &'a Image,
    pub normal_map: &'a Image,
    pub specular_map: &'a Image,
}

impl Shader for PhongShader<'_> {
    type Attribs = PhongAttribs;
    type Varyings = PhongVaryings;
    type Uniforms = PhongUniforms;

    fn vertex(
        &self,
        nth_vertex: usize,
        attribs: &PhongAttribs,
        varyings: &mut PhongVaryings,
        uniforms: &PhongUniforms,
    ) -> Vec4 {
        let position = Vec4::from_vec3(attribs.positions[nth_vertex], 1.0);

        let view_pos = uniforms.mv_matrix.mul_vec4(position);
        varyings.vs_out_view_pos[nth_vertex] = Vec3::from_vec4(view_pos);
        varyings.vs_out_texcoords[nth_vertex] = attribs.texcoords[nth_vertex];

        uniforms.mvp_matrix.mul_vec4(position)
    }

    fn interp_varyings(&self, varyings: &mut PhongVaryings, weights: Vec3) {
        varyings.fs_in_texcoord = interp_vec2(&varyings.vs_out_texcoords, weights);
        varyings.fs_in_view_pos = interp_vec3(&varyings.vs_out_view_pos, weights);
    }

    fn fragment(&self, varyings: &PhongVaryings, uniforms: &PhongUniforms) -> Vec4 {
        let texcoord = clamp_texcoord(varyings.fs_in_texcoord);
        let in_diffuse = Vec3::from_vec4(sample_texture(self.diffuse_map, texcoord));
        let in_normal = sample_texture(self.normal_map, texcoord);
        let in_specular = sample_texture(self.specular_map, texcoord).x;

        let normal = {
            let n = Vec4::new(
                in_normal.x * 2.0 - 1.0,
                in_normal.y * 2.0 - 1.0,
                in_normal.z * 2.0 - 1.0,
                0.0,
            );
            Vec3::from_vec4(uniforms.normal_matrix.mul_vec4(n)).normalize()
        };
        let light = {
            let l = Vec4::from_vec3(uniforms.light_direction, 0.0);
            Vec3::from_vec4(uniforms.view_matrix.mul_vec4(l)).normalize()
        };

        let ambient = uniforms.light_ambient.modulate(in_diffuse);

        let diffuse_factor = (-normal.dot(light)).max(0.0);
        let diffuse = uniforms.light_diffuse.modulate(in_diffuse) * diffuse_factor;

        let specular = {
            let reflected = reflect_light(light, normal);
            let view_dir = varyings.fs_in_view_pos.normalize();
            let strength = (-reflected.dot(view_dir)).max(0.0);
            let factor = strength.powf(uniforms.shininess);
            uniforms.light_specular * (factor * in_specular)
        };

        let color = ambient + diffuse + specular;
        Vec4::from_vec3(color, 1.0)
    }
}

/// Screen-space interpolation can overshoot [0, 1] by a rounding error at
/// triangle edges.
fn clamp_texcoord(t: Vec2) -> Vec2 {
    Vec2::new(t.x.clamp(0.0, 1.0), t.y.clamp(0.0, 1.0))
}
