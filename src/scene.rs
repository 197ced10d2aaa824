//! Drawing whole models with the Phong program

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::model::Model;
use crate::rasterizer::{
    draw_triangle, normal_matrix, Color, Context, Image, Mat4, Program, Vec3, Vec4,
};
use crate::shaders::{PhongAttribs, PhongShader, PhongUniforms, PhongVaryings};

/// Directional light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-1.0, -1.0, -1.0),
            ambient: Vec3::new(0.2, 0.2, 0.2),
            diffuse: Vec3::new(0.5, 0.5, 0.5),
            specular: Vec3::new(1.0, 1.0, 1.0),
            shininess: 32.0,
        }
    }
}

/// Diffuse, normal and specular maps of one model
pub struct Material {
    pub diffuse_map: Image,
    pub normal_map: Image,
    pub specular_map: Image,
}

impl Material {
    /// White diffuse, flat +Z normals, no specular
    pub fn plain() -> Self {
        let solid = |color: Color| {
            let mut img = Image::new(1, 1, 3);
            img.set_color(0, 0, color);
            img
        };
        Self {
            diffuse_map: solid(Color::WHITE),
            normal_map: solid(Color::new(128, 128, 255)),
            specular_map: solid(Color::BLACK),
        }
    }
}

/// Draw every face of `model`, transformed by `model_matrix`
pub fn draw_model(
    context: &mut Context,
    camera: &Camera,
    model: &Model,
    material: &Material,
    lighting: &Lighting,
    model_matrix: &Mat4,
) {
    let view_matrix = camera.view_matrix();
    let proj_matrix = camera.proj_matrix();
    let mv_matrix = view_matrix.mul_mat4(model_matrix);

    let uniforms = PhongUniforms {
        light_direction: lighting.direction,
        light_ambient: lighting.ambient,
        light_diffuse: lighting.diffuse,
        light_specular: lighting.specular,
        view_matrix,
        normal_matrix: normal_matrix(&mv_matrix),
        mv_matrix,
        mvp_matrix: proj_matrix.mul_mat4(&mv_matrix),
        shininess: lighting.shininess,
    };
    let shader = PhongShader {
        diffuse_map: &material.diffuse_map,
        normal_map: &material.normal_map,
        specular_map: &material.specular_map,
    };
    let mut program = Program::new(
        shader,
        PhongAttribs::default(),
        PhongVaryings::default(),
        uniforms,
    );

    for face in 0..model.num_faces() {
        for nth in 0..3 {
            program.attribs.positions[nth] = model.position(face, nth);
            program.attribs.texcoords[nth] = model.texcoord(face, nth);
        }
        draw_triangle(context, &mut program);
    }
}

/// Pixel-space outline of every face inside the view volume
pub fn wireframe(
    context: &Context,
    camera: &Camera,
    model: &Model,
    model_matrix: &Mat4,
) -> Vec<[(i32, i32); 3]> {
    let mvp = camera.viewproj_matrix().mul_mat4(model_matrix);
    let viewport = context.viewport();

    (0..model.num_faces())
        .filter_map(|face| {
            let mut points = [(0, 0); 3];
            for (nth, point) in points.iter_mut().enumerate() {
                let clip = mvp.mul_vec4(Vec4::from_vec3(model.position(face, nth), 1.0));
                let w = clip.w;
                if w <= 0.0 || clip.x.abs() > w || clip.y.abs() > w || clip.z.abs() > w {
                    return None;
                }
                let screen = viewport.mul_vec4(clip.scale(1.0 / clip.w));
                *point = (screen.x as i32, screen.y as i32);
            }
            Some(points)
        })
        .collect()
}
