//! Viewer configuration, stored as RON

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CameraOptions};
use crate::error::{Error, Result};
use crate::model::Model;
use crate::rasterizer::{Image, Vec3};
use crate::scene::{Lighting, Material};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: usize,
    pub height: usize,
    /// OBJ file; the built-in cube when unset
    pub model: Option<PathBuf>,
    pub diffuse_map: Option<PathBuf>,
    pub normal_map: Option<PathBuf>,
    pub specular_map: Option<PathBuf>,
    pub camera_position: Vec3,
    pub camera_forward: Vec3,
    /// Overrides the tuning derived from the window aspect
    pub camera_options: Option<CameraOptions>,
    pub lighting: Lighting,
    /// Model rotation around +Y, radians per second
    pub spin_speed: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            model: None,
            diffuse_map: None,
            normal_map: None,
            specular_map: None,
            camera_position: Vec3::new(0.0, 0.0, 2.5),
            camera_forward: Vec3::new(0.0, 0.0, -1.0),
            camera_options: None,
            lighting: Lighting::default(),
            spin_speed: 0.5,
        }
    }
}

impl ViewerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_str(&contents)?;
        log::info!("Loaded config {}", path.display());
        Ok(config)
    }

    /// Missing file falls back to defaults; a malformed one is still an error
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn camera(&self) -> Camera {
        let mut camera = Camera::new(self.camera_position, self.camera_forward, self.aspect());
        if let Some(options) = self.camera_options {
            camera.set_options(options);
        }
        camera
    }

    pub fn load_model(&self) -> Result<Model> {
        match &self.model {
            Some(path) => Model::load(path),
            None => Ok(Model::cube()),
        }
    }

    /// Unset maps keep the plain material's defaults
    pub fn load_material(&self) -> Result<Material> {
        let mut material = Material::plain();
        if let Some(path) = &self.diffuse_map {
            material.diffuse_map = load_texture(path)?;
        }
        if let Some(path) = &self.normal_map {
            material.normal_map = load_texture(path)?;
        }
        if let Some(path) = &self.specular_map {
            material.specular_map = load_texture(path)?;
        }
        Ok(material)
    }
}

fn load_texture(path: &Path) -> Result<Image> {
    let image = Image::load(path)?;
    log::info!(
        "Loaded texture {} ({}x{}, {} channels)",
        path.display(),
        image.width,
        image.height,
        image.channels
    );
    Ok(image)
}
