//! Ready-made shader programs

mod phong;

pub use phong::*;
