//! Wavefront OBJ loading
//!
//! Only triangulated meshes with full `v/vt/vn` face corners are accepted.
//! Faces are flattened into per-corner arrays so a draw call can copy three
//! consecutive entries straight into the shader attributes.

use std::fs;
use std::path::Path;
use std::str::SplitWhitespace;

use crate::error::{Error, Result};
use crate::rasterizer::{Vec2, Vec3};

/// Unit cube centered on the origin, counter-clockwise faces
const CUBE_OBJ: &str = "\
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
vn 0 0 -1
vn 1 0 0
vn -1 0 0
vn 0 1 0
vn 0 -1 0
f 5/1/1 6/2/1 7/3/1
f 5/1/1 7/3/1 8/4/1
f 2/1/2 1/2/2 4/3/2
f 2/1/2 4/3/2 3/4/2
f 6/1/3 2/2/3 3/3/3
f 6/1/3 3/3/3 7/4/3
f 1/1/4 5/2/4 8/3/4
f 1/1/4 8/3/4 4/4/4
f 8/1/5 7/2/5 3/3/5
f 8/1/5 3/3/5 4/4/5
f 1/1/6 2/2/6 6/3/6
f 1/1/6 6/3/6 5/4/6
";

#[derive(Debug, Clone, Default)]
pub struct Model {
    positions: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    normals: Vec<Vec3>,
}

impl Model {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_obj_str(&src)?;
        log::info!("Loaded model {} ({} faces)", path.display(), model.num_faces());
        Ok(model)
    }

    pub fn from_obj_str(src: &str) -> Result<Self> {
        let mut positions = Vec::new();
        let mut texcoords = Vec::new();
        let mut normals = Vec::new();
        let mut corners: Vec<[usize; 3]> = Vec::new();
        let mut corner_lines = Vec::new();

        for (idx, raw) in src.lines().enumerate() {
            let line_no = idx + 1;
            let mut tokens = raw.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                    positions.push(Vec3::new(x, y, z));
                }
                Some("vt") => {
                    let [u, v] = parse_floats::<2>(&mut tokens, line_no)?;
                    texcoords.push(Vec2::new(u, v));
                }
                Some("vn") => {
                    let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                    normals.push(Vec3::new(x, y, z));
                }
                Some("f") => {
                    let face: Vec<&str> = tokens.collect();
                    if face.len() != 3 {
                        return Err(obj_error(line_no, "only triangular faces are supported"));
                    }
                    for corner in face {
                        corners.push(parse_corner(corner, line_no)?);
                        corner_lines.push(line_no);
                    }
                }
                _ => {}
            }
        }

        if corners.is_empty() {
            return Err(Error::EmptyModel);
        }

        let mut model = Model {
            positions: Vec::with_capacity(corners.len()),
            texcoords: Vec::with_capacity(corners.len()),
            normals: Vec::with_capacity(corners.len()),
        };
        for ([p, t, n], line_no) in corners.into_iter().zip(corner_lines) {
            model.positions.push(lookup(&positions, p, line_no, "position")?);
            model.texcoords.push(lookup(&texcoords, t, line_no, "texcoord")?);
            model.normals.push(lookup(&normals, n, line_no, "normal")?);
        }

        log::debug!(
            "Parsed OBJ: {} positions, {} texcoords, {} normals, {} faces",
            positions.len(),
            texcoords.len(),
            normals.len(),
            model.num_faces()
        );
        Ok(model)
    }

    /// Built-in cube, used when no model file is configured
    pub fn cube() -> Self {
        match Self::from_obj_str(CUBE_OBJ) {
            Ok(model) => model,
            Err(e) => unreachable!("built-in cube is malformed: {}", e),
        }
    }

    pub fn num_faces(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn position(&self, face: usize, nth: usize) -> Vec3 {
        self.positions[face * 3 + nth]
    }

    pub fn texcoord(&self, face: usize, nth: usize) -> Vec2 {
        self.texcoords[face * 3 + nth]
    }

    pub fn normal(&self, face: usize, nth: usize) -> Vec3 {
        self.normals[face * 3 + nth]
    }
}

fn obj_error(line: usize, message: impl Into<String>) -> Error {
    Error::Obj {
        line,
        message: message.into(),
    }
}

fn parse_floats<const N: usize>(tokens: &mut SplitWhitespace<'_>, line: usize) -> Result<[f32; N]> {
    let mut out = [0.0f32; N];
    for slot in out.iter_mut() {
        let token = tokens
            .next()
            .ok_or_else(|| obj_error(line, format!("expected {} numbers", N)))?;
        *slot = token
            .parse()
            .map_err(|_| obj_error(line, format!("invalid number '{}'", token)))?;
    }
    Ok(out)
}

/// `p/t/n`, 1-based, converted to 0-based
fn parse_corner(corner: &str, line: usize) -> Result<[usize; 3]> {
    let parts: Vec<&str> = corner.split('/').collect();
    if parts.len() != 3 {
        return Err(obj_error(line, format!("face corner '{}' is not v/vt/vn", corner)));
    }
    let mut out = [0usize; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        let index: usize = part
            .parse()
            .map_err(|_| obj_error(line, format!("invalid index '{}'", part)))?;
        if index == 0 {
            return Err(obj_error(line, "indices are 1-based"));
        }
        *slot = index - 1;
    }
    Ok(out)
}

fn lookup<T: Copy>(items: &[T], index: usize, line: usize, kind: &str) -> Result<T> {
    items
        .get(index)
        .copied()
        .ok_or_else(|| obj_error(line, format!("{} index {} out of range", kind, index + 1)))
}
