//! Vector and matrix math for the rasterizer
//!
//! Column vectors, row-major `Mat4` storage (`m[row][col]`), right-handed
//! coordinates with the camera looking down -Z.

use std::ops::{Add, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

/// 2D Vector (texture coordinates, screen points)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        self.scale(s)
    }
}

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Drop the w component
    pub fn from_vec4(v: Vec4) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Component-wise product (used to modulate colors)
    pub fn modulate(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Homogeneous 4D Vector (clip coordinates, colors)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4 { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn from_vec3(v: Vec3, w: f32) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
            w,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn scale(self, s: f32) -> Vec4 {
        Vec4 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
            w: self.w * s,
        }
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, other: Vec4) -> Vec4 {
        Vec4 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            w: self.w + other.w,
        }
    }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;
    fn mul(self, s: f32) -> Vec4 {
        self.scale(s)
    }
}

/// 4x4 matrix, row-major
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        let v = v.to_array();
        let mut out = [0.0f32; 4];
        for (i, row) in self.m.iter().enumerate() {
            out[i] = row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3];
        }
        Vec4::new(out[0], out[1], out[2], out[3])
    }

    pub fn mul_mat4(&self, other: &Mat4) -> Mat4 {
        let mut m = [[0.0f32; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Mat4 { m }
    }

    pub fn transpose(&self) -> Mat4 {
        let mut m = [[0.0f32; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.m[j][i];
            }
        }
        Mat4 { m }
    }

    fn minor(&self, r: usize, c: usize) -> f32 {
        let mut sub = [[0.0f32; 3]; 3];
        for (i, row) in sub.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                let src_row = if i < r { i } else { i + 1 };
                let src_col = if j < c { j } else { j + 1 };
                *cell = self.m[src_row][src_col];
            }
        }
        sub[0][0] * (sub[1][1] * sub[2][2] - sub[1][2] * sub[2][1])
            + sub[0][1] * (sub[1][2] * sub[2][0] - sub[1][0] * sub[2][2])
            + sub[0][2] * (sub[1][0] * sub[2][1] - sub[1][1] * sub[2][0])
    }

    fn cofactor(&self, r: usize, c: usize) -> f32 {
        let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(r, c)
    }

    /// Inverse of the transpose, computed as cofactors / determinant.
    ///
    /// Panics if the matrix is singular.
    pub fn inverse_transpose(&self) -> Mat4 {
        let mut adjoint = [[0.0f32; 4]; 4];
        for (i, row) in adjoint.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.cofactor(i, j);
            }
        }
        let determinant: f32 = (0..4).map(|i| self.m[0][i] * adjoint[0][i]).sum();
        assert!(determinant.abs() > 1.0e-6, "matrix is not invertible");

        for row in adjoint.iter_mut() {
            for cell in row.iter_mut() {
                *cell /= determinant;
            }
        }
        Mat4 { m: adjoint }
    }

    pub fn inverse(&self) -> Mat4 {
        self.inverse_transpose().transpose()
    }

    pub fn translation(dx: f32, dy: f32, dz: f32) -> Mat4 {
        let mut m = Mat4::identity();
        m.m[0][3] = dx;
        m.m[1][3] = dy;
        m.m[2][3] = dz;
        m
    }

    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
        assert!(sx != 0.0 && sy != 0.0 && sz != 0.0);
        let mut m = Mat4::identity();
        m.m[0][0] = sx;
        m.m[1][1] = sy;
        m.m[2][2] = sz;
        m
    }

    /// Rotation of `angle` radians around the axis (vx, vy, vz)
    pub fn rotation(angle: f32, vx: f32, vy: f32, vz: f32) -> Mat4 {
        let n = Vec3::new(vx, vy, vz);
        assert!(n.len() > 1.0e-6, "rotation axis must be non-zero");
        let n = n.normalize();
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        let mut m = Mat4::identity();
        m.m[0][0] = n.x * n.x * t + c;
        m.m[0][1] = n.x * n.y * t - n.z * s;
        m.m[0][2] = n.x * n.z * t + n.y * s;
        m.m[1][0] = n.y * n.x * t + n.z * s;
        m.m[1][1] = n.y * n.y * t + c;
        m.m[1][2] = n.y * n.z * t - n.x * s;
        m.m[2][0] = n.z * n.x * t - n.y * s;
        m.m[2][1] = n.z * n.y * t + n.x * s;
        m.m[2][2] = n.z * n.z * t + c;
        m
    }

    pub fn rotation_x(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m.m[1][1] = c;
        m.m[1][2] = -s;
        m.m[2][1] = s;
        m.m[2][2] = c;
        m
    }

    pub fn rotation_y(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m.m[0][0] = c;
        m.m[0][2] = s;
        m.m[2][0] = -s;
        m.m[2][2] = c;
        m
    }

    pub fn rotation_z(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m.m[0][0] = c;
        m.m[0][1] = -s;
        m.m[1][0] = s;
        m.m[1][1] = c;
        m
    }

    /// Orthographic projection of the box [l,r] x [b,t] x [-n,-f]
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let x_range = right - left;
        let y_range = top - bottom;
        let z_range = far - near;
        assert!(near > 0.0 && far > 0.0 && far > near);
        assert!(x_range > 0.0 && y_range > 0.0);

        let mut m = Mat4::identity();
        m.m[0][0] = 2.0 / x_range;
        m.m[1][1] = 2.0 / y_range;
        m.m[2][2] = -2.0 / z_range;
        m.m[0][3] = -(left + right) / x_range;
        m.m[1][3] = -(bottom + top) / y_range;
        m.m[2][3] = -(near + far) / z_range;
        m
    }

    /// Perspective projection of an (optionally asymmetric) frustum
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let x_range = right - left;
        let y_range = top - bottom;
        let z_range = far - near;
        assert!(near > 0.0 && far > 0.0 && far > near);
        assert!(x_range > 0.0 && y_range > 0.0);

        let mut m = Mat4::identity();
        m.m[0][0] = 2.0 * near / x_range;
        m.m[1][1] = 2.0 * near / y_range;
        m.m[0][2] = (left + right) / x_range;
        m.m[1][2] = (bottom + top) / y_range;
        m.m[2][2] = -(near + far) / z_range;
        m.m[2][3] = -2.0 * near * far / z_range;
        m.m[3][2] = -1.0;
        m.m[3][3] = 0.0;
        m
    }

    /// Symmetric orthographic projection sized like a perspective one
    /// (`fovy` in radians)
    pub fn orthographic(fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        assert!(fovy > 0.0 && aspect > 0.0);
        assert!(near > 0.0 && far > 0.0 && far > near);
        let z_range = far - near;
        let zoom_y = 1.0 / (fovy / 2.0).tan();
        let zoom_x = zoom_y / aspect;

        let mut m = Mat4::identity();
        m.m[0][0] = zoom_x;
        m.m[1][1] = zoom_y;
        m.m[2][2] = -2.0 / z_range;
        m.m[2][3] = -(near + far) / z_range;
        m
    }

    /// Symmetric perspective projection (`fovy` in radians)
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        assert!(fovy > 0.0 && aspect > 0.0);
        assert!(near > 0.0 && far > 0.0 && far > near);
        let z_range = far - near;
        let zoom_y = 1.0 / (fovy / 2.0).tan();
        let zoom_x = zoom_y / aspect;

        let mut m = Mat4::identity();
        m.m[0][0] = zoom_x;
        m.m[1][1] = zoom_y;
        m.m[2][2] = -(near + far) / z_range;
        m.m[2][3] = -2.0 * near * far / z_range;
        m.m[3][2] = -1.0;
        m.m[3][3] = 0.0;
        m
    }

    /// View matrix for an eye at `eye` looking at `center`
    pub fn lookat(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
        let z_axis = (eye - center).normalize();
        let x_axis = up.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis);

        let mut m = Mat4::identity();
        m.m[0] = [x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(eye)];
        m.m[1] = [y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(eye)];
        m.m[2] = [z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(eye)];
        m
    }

    /// Map NDC x/y in [-1,1] onto the pixel rectangle at (x, y) of size
    /// width x height. The z row is left as identity.
    pub fn viewport(x: usize, y: usize, width: usize, height: usize) -> Mat4 {
        assert!(width > 0 && height > 0);
        let mut m = Mat4::identity();
        m.m[0][0] = width as f32 / 2.0;
        m.m[0][3] = x as f32 + width as f32 / 2.0;
        m.m[1][1] = height as f32 / 2.0;
        m.m[1][3] = y as f32 + height as f32 / 2.0;
        m
    }
}
