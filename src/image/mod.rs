pub mod geom;
pub mod image_formats;
pub mod transform;

pub use image_formats::{RasterImage, Rgba};
pub use transform::{Resample, Rotation};
