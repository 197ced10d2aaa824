//! softraster: programmable CPU triangle rasterizer
//!
//! The [`rasterizer`] module is the core: a caller-supplied [`Shader`]
//! drives vertex, interpolation and fragment stages, and
//! [`draw_triangle`] turns one triangle into depth-tested pixels of a
//! [`Context`]. The remaining modules build a small model viewer on top.
//!
//! ```no_run
//! use softraster::{Context, ViewerConfig, scene};
//!
//! let config = ViewerConfig::default();
//! let mut context = Context::new(config.width, config.height);
//! let camera = config.camera();
//! let model = config.load_model()?;
//! let material = config.load_material()?;
//! scene::draw_model(
//!     &mut context,
//!     &camera,
//!     &model,
//!     &material,
//!     &config.lighting,
//!     &softraster::Mat4::identity(),
//! );
//! context.color_buffer().save("frame.png")?;
//! # Ok::<(), softraster::Error>(())
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod model;
pub mod rasterizer;
pub mod scene;
pub mod shaders;

pub use camera::{Camera, CameraInput, CameraOptions};
pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use model::Model;
pub use rasterizer::{draw_triangle, Context, Image, Mat4, Program, Shader, Vec2, Vec3, Vec4};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
