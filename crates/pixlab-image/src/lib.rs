#![deny(missing_docs)]
//! Image types and traits for generating and manipulating images

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// runtime color-mode image used at application boundaries.
pub mod raster;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
pub use crate::raster::{ColorMode, RasterImage};
