#![deny(missing_docs)]
//! Parameterized image transformation engine.
//!
//! The engine groups classical image operations into four [`Category`] families and
//! exposes a [`TransformDispatcher`] that turns a source image plus a validated
//! [`ParameterSet`] into four labelled results.

/// Apply a function that is generic over the channel count to the image held by a
/// [`pixlab_image::RasterImage`], keeping the color mode of the input.
macro_rules! map_raster {
    ($image:expr, $f:ident $(, $arg:expr)* $(,)?) => {
        match $image {
            pixlab_image::RasterImage::Gray(img) => {
                $f(img $(, $arg)*).map(pixlab_image::RasterImage::from)
            }
            pixlab_image::RasterImage::Rgb(img) => {
                $f(img $(, $arg)*).map(pixlab_image::RasterImage::from)
            }
        }
    };
}

/// Transform families.
pub mod category;

/// Request fan-out.
pub mod dispatcher;

/// Brightness, contrast, grayscale and histogram equalization.
pub mod enhance;

/// Engine error type.
pub mod error;

/// Translate, rotate, scale and mirror.
pub mod geometric;

/// Parameter schema.
pub mod params;

/// Thresholding, edges and region growing.
pub mod segment;

/// Mean, gaussian and median filters.
pub mod smooth;

pub use crate::category::Category;
pub use crate::dispatcher::{dispatch, DispatchOptions, TransformDispatcher, TransformResult};
pub use crate::error::EngineError;
pub use crate::params::{
    EnhanceParams, GeometricParams, ParamKind, ParamSpec, ParamValue, ParameterSet,
    SegmentParams, SmoothParams, FLOAT_STEP, PARAMETER_CATALOG,
};
pub use crate::segment::SeedPoint;

pub use pixlab_image::{ColorMode, Image, ImageSize, RasterImage};
pub use pixlab_imgproc::parallel::ExecutionStrategy;
