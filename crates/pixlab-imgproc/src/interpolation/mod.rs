//! Pixel interpolation methods for image transformations.
//!
//! This module provides the interpolation kernels used when resampling images during
//! geometric transformations like rotation or translation.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels
//! - **Lanczos3**: Only available through [`crate::resize::resize_fast`]

mod bilinear;
mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};
pub(crate) use interpolate::sampler;
