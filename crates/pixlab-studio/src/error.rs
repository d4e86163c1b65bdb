use pixlab_image::ImageError;
use pixlab_imgproc::parallel::ParallelError;

/// An error type for the transformation engine.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EngineError {
    /// Error when a parameter or required input is outside its domain.
    #[error("Invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// The name of the parameter.
        name: String,
        /// The rejected value, rendered for display.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Error when a parameter name is not in the catalog.
    #[error("Unknown parameter `{0}`")]
    UnknownParameter(String),

    /// Error raised by an image kernel.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error raised while scheduling work.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

impl EngineError {
    /// Build an [`EngineError::InvalidParameter`].
    pub fn invalid(
        name: impl Into<String>,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// The error reported when no image has been loaded.
    pub fn no_image() -> Self {
        EngineError::invalid("image", "none", "no image loaded")
    }
}
