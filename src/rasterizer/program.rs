//! Programmable shader stages

use super::math::{Vec3, Vec4};

/// The three programmable stages of a draw call.
///
/// The rasterizer never looks inside the attribute, varying or uniform
/// types; it only hands them to the stages:
///
/// 1. `vertex` runs once per corner (0, 1, 2) and returns a clip-space
///    position. It may stage per-vertex outputs in the varyings.
/// 2. `interp_varyings` runs once per fragment that survives the depth test
///    and blends the staged outputs with the barycentric weights.
/// 3. `fragment` turns the blended varyings into an RGBA color in [0, 1].
///    Alpha is accepted but not written.
pub trait Shader {
    type Attribs;
    type Varyings;
    type Uniforms;

    fn vertex(
        &self,
        nth_vertex: usize,
        attribs: &Self::Attribs,
        varyings: &mut Self::Varyings,
        uniforms: &Self::Uniforms,
    ) -> Vec4;

    fn interp_varyings(&self, varyings: &mut Self::Varyings, weights: Vec3);

    fn fragment(&self, varyings: &Self::Varyings, uniforms: &Self::Uniforms) -> Vec4;
}

/// A shader together with the data of one draw call.
///
/// Owned by the caller; refill `attribs` between triangles and reuse the
/// program for a whole mesh.
pub struct Program<S: Shader> {
    pub shader: S,
    pub attribs: S::Attribs,
    pub varyings: S::Varyings,
    pub uniforms: S::Uniforms,
}

impl<S: Shader> Program<S> {
    pub fn new(shader: S, attribs: S::Attribs, varyings: S::Varyings, uniforms: S::Uniforms) -> Self {
        Self {
            shader,
            attribs,
            varyings,
            uniforms,
        }
    }
}

impl<S> Program<S>
where
    S: Shader,
    S::Attribs: Default,
    S::Varyings: Default,
{
    /// Program with empty attributes and varyings
    pub fn with_uniforms(shader: S, uniforms: S::Uniforms) -> Self {
        Self::new(shader, S::Attribs::default(), S::Varyings::default(), uniforms)
    }
}
