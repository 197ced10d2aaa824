//! Fly camera: WASD movement, drag-to-rotate, hold-to-zoom
//!
//! Angles are stored in degrees. The camera never rolls; world up is +Y.

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Mat4, Vec3};

const WORLD_UP: Vec3 = Vec3::UP;

/// Camera tuning and projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraOptions {
    /// World units per second
    pub move_speed: f32,
    /// Degrees per pixel of cursor travel per second
    pub rotate_speed: f32,
    /// Degrees of fovy per second
    pub zoom_speed: f32,
    pub pitch_upper: f32,
    pub pitch_lower: f32,
    pub fovy_default: f32,
    pub fovy_minimum: f32,
    pub aspect: f32,
    pub depth_near: f32,
    pub depth_far: f32,
}

impl CameraOptions {
    /// Default tuning for a viewport of the given aspect ratio
    pub fn with_aspect(aspect: f32) -> Self {
        Self {
            move_speed: 2.5,
            rotate_speed: 10.0,
            zoom_speed: 100.0,
            pitch_upper: 89.0,
            pitch_lower: -89.0,
            fovy_default: 60.0,
            fovy_minimum: 15.0,
            aspect,
            depth_near: 1.0,
            depth_far: 100.0,
        }
    }

    fn validate(&self) {
        assert!(self.pitch_upper >= self.pitch_lower, "pitch range is inverted");
        assert!(self.fovy_default >= self.fovy_minimum, "fovy range is inverted");
        assert!(self.fovy_minimum > 0.0, "fovy must be positive");
        assert!(self.aspect > 0.0, "aspect must be positive");
        assert!(
            self.depth_far > self.depth_near && self.depth_near > 0.0,
            "depth range must satisfy far > near > 0"
        );
    }
}

/// Input snapshot for one frame, filled in by the windowing layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    /// Cursor position in window pixels
    pub cursor: (f32, f32),
    /// Rotate while held (left mouse button in the viewer)
    pub rotate: bool,
    /// Zoom in while held, relax back otherwise (right mouse button)
    pub zoom: bool,
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    pitch: f32,
    yaw: f32,
    fovy: f32,
    last_cursor: Option<(f32, f32)>,
    options: CameraOptions,
}

impl Camera {
    /// Panics if `forward` is zero or parallel to world up, or if
    /// `aspect` is not positive.
    pub fn new(position: Vec3, forward: Vec3, aspect: f32) -> Self {
        assert!(forward.len() > 1.0e-6, "forward must be non-zero");
        assert!(
            forward.cross(WORLD_UP).len() > 1.0e-6,
            "forward must not be parallel to world up"
        );
        assert!(aspect > 0.0, "aspect must be positive");

        let front = forward.normalize();
        let right = front.cross(WORLD_UP);
        let up = right.cross(front);
        let options = CameraOptions::with_aspect(aspect);

        Self {
            position,
            front,
            right,
            up,
            pitch: pitch_of(front),
            yaw: yaw_of(front),
            fovy: options.fovy_default,
            last_cursor: None,
            options,
        }
    }

    pub fn options(&self) -> CameraOptions {
        self.options
    }

    /// Replace the tuning. Panics on inconsistent ranges.
    pub fn set_options(&mut self, options: CameraOptions) {
        options.validate();
        log::debug!("Camera options: {:?}", options);
        self.options = options;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn process_input(&mut self, input: &CameraInput, delta_time: f32) {
        self.rotate(input, delta_time);
        self.zoom(input, delta_time);
        self.translate(input, delta_time);
    }

    fn rotate(&mut self, input: &CameraInput, delta_time: f32) {
        if !input.rotate {
            self.last_cursor = None;
            return;
        }

        // The first frame of a drag only records the anchor
        if let Some((last_x, last_y)) = self.last_cursor {
            let speed = self.options.rotate_speed * delta_time;
            self.yaw -= (input.cursor.0 - last_x) * speed;
            self.pitch += (input.cursor.1 - last_y) * speed;
            self.pitch = self.pitch.clamp(self.options.pitch_lower, self.options.pitch_upper);
            self.update_orientation();
        }
        self.last_cursor = Some(input.cursor);
    }

    fn zoom(&mut self, input: &CameraInput, delta_time: f32) {
        let opts = self.options;
        let step = opts.zoom_speed * delta_time;
        self.fovy = self.fovy.clamp(opts.fovy_minimum, opts.fovy_default);
        if input.zoom {
            self.fovy = (self.fovy - step).max(opts.fovy_minimum);
        } else {
            self.fovy = (self.fovy + step).min(opts.fovy_default);
        }
    }

    fn translate(&mut self, input: &CameraInput, delta_time: f32) {
        let mut direction = Vec3::ZERO;
        if input.left {
            direction = direction - self.right;
        }
        if input.right {
            direction = direction + self.right;
        }
        if input.backward {
            direction = direction - self.front;
        }
        if input.forward {
            direction = direction + self.front;
        }

        if direction.len() > 1.0e-6 {
            let distance = self.options.move_speed * delta_time;
            self.position = self.position + direction.normalize() * distance;
        }
    }

    fn update_orientation(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        self.front = Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.front.cross(WORLD_UP);
        self.up = self.right.cross(self.front);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::lookat(self.position, self.position + self.front, WORLD_UP)
    }

    pub fn proj_matrix(&self) -> Mat4 {
        let opts = &self.options;
        Mat4::perspective(self.fovy.to_radians(), opts.aspect, opts.depth_near, opts.depth_far)
    }

    pub fn viewproj_matrix(&self) -> Mat4 {
        self.proj_matrix().mul_mat4(&self.view_matrix())
    }
}

/// Elevation above the horizon, degrees
fn pitch_of(front: Vec3) -> f32 {
    let angle = front.dot(WORLD_UP).clamp(-1.0, 1.0).acos();
    (std::f32::consts::FRAC_PI_2 - angle).to_degrees()
}

/// Heading in the XZ plane, degrees from +X toward +Z
fn yaw_of(front: Vec3) -> f32 {
    front.z.atan2(front.x).to_degrees()
}
