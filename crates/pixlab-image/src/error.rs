/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image size is not valid or two image sizes do not match.
    #[error("Invalid image size ({0}, {1}) vs ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds {1}")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the number of elements of an image does not fit in memory.
    #[error("Image of size ({0}, {1}) with {2} channels is too large")]
    ImageTooLarge(usize, usize, usize),

    /// Error when a value cannot be cast to the target type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when the number of histogram bins is not valid.
    #[error("Invalid histogram bins {0}")]
    InvalidHistogramBins(usize),

    /// Error when a filter kernel has an invalid length.
    #[error("Invalid kernel length {0}, expected an odd length of at least {1}")]
    InvalidKernelLength(usize, usize),

    /// Error when a seed point lies outside the image.
    #[error("Seed point (row: {0}, col: {1}) is outside the image ({2}x{3})")]
    InvalidSeedPoint(usize, usize, usize, usize),

    /// Error when a pair of thresholds is not ordered.
    #[error("Invalid thresholds: low ({0}) must not exceed high ({1})")]
    InvalidThreshold(f32, f32),

    /// Error when two images have incompatible pixel types.
    #[error("Incompatible pixel types")]
    IncompatiblePixelTypes,

    /// Error when an operation does not support the requested interpolation mode.
    #[error("Interpolation mode {0} is not supported by this operation")]
    UnsupportedInterpolation(String),

    /// Error reported by the resampling backend.
    #[error("Failed to resize image: {0}")]
    ResizeFailed(String),
}
