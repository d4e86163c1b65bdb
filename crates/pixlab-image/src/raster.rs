use crate::error::ImageError;
use crate::image::{Image, ImageSize};

/// Color layout of a [`RasterImage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Single channel, 8-bit intensity.
    Gray,
    /// Three interleaved 8-bit channels in R, G, B order.
    Rgb,
}

impl ColorMode {
    /// Number of channels per pixel for the mode.
    pub fn num_channels(&self) -> usize {
        match self {
            ColorMode::Gray => 1,
            ColorMode::Rgb => 3,
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ColorMode::Gray => write!(f, "L"),
            ColorMode::Rgb => write!(f, "RGB"),
        }
    }
}

/// An 8-bit image whose color mode is only known at runtime.
///
/// This is the type exchanged with an application shell: decoded files come in as
/// a `RasterImage` and every result goes out as one. The typed kernels operate on the
/// inner [`Image`] of the matching variant.
///
/// # Examples
///
/// ```
/// use pixlab_image::{ColorMode, ImageSize, RasterImage};
///
/// let raster = RasterImage::from_raw(
///     ImageSize { width: 2, height: 1 },
///     ColorMode::Rgb,
///     vec![255, 0, 0, 0, 255, 0],
/// ).unwrap();
///
/// assert_eq!(raster.color_mode(), ColorMode::Rgb);
/// assert_eq!(raster.num_channels(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum RasterImage {
    /// A grayscale image.
    Gray(Image<u8, 1>),
    /// An RGB image.
    Rgb(Image<u8, 3>),
}

impl RasterImage {
    /// Create a raster image from raw interleaved bytes.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `mode` - The color mode describing the byte layout.
    /// * `data` - The pixel bytes, `width * height * channels` long.
    ///
    /// # Errors
    ///
    /// If the buffer length does not match the size and mode, an error is returned.
    pub fn from_raw(size: ImageSize, mode: ColorMode, data: Vec<u8>) -> Result<Self, ImageError> {
        Ok(match mode {
            ColorMode::Gray => RasterImage::Gray(Image::new(size, data)?),
            ColorMode::Rgb => RasterImage::Rgb(Image::new(size, data)?),
        })
    }

    /// Create a raster image filled with a constant byte value.
    pub fn from_size_val(size: ImageSize, mode: ColorMode, val: u8) -> Result<Self, ImageError> {
        Ok(match mode {
            ColorMode::Gray => RasterImage::Gray(Image::from_size_val(size, val)?),
            ColorMode::Rgb => RasterImage::Rgb(Image::from_size_val(size, val)?),
        })
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            RasterImage::Gray(img) => img.size(),
            RasterImage::Rgb(img) => img.size(),
        }
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size().width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size().height
    }

    /// Get the color mode of the image.
    pub fn color_mode(&self) -> ColorMode {
        match self {
            RasterImage::Gray(_) => ColorMode::Gray,
            RasterImage::Rgb(_) => ColorMode::Rgb,
        }
    }

    /// Get the number of channels per pixel.
    pub fn num_channels(&self) -> usize {
        self.color_mode().num_channels()
    }

    /// Get the pixel bytes in (H, W, C) order.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            RasterImage::Gray(img) => img.as_slice(),
            RasterImage::Rgb(img) => img.as_slice(),
        }
    }

    /// Consume the image and return its pixel bytes.
    pub fn into_vec(self) -> Vec<u8> {
        match self {
            RasterImage::Gray(img) => img.into_vec(),
            RasterImage::Rgb(img) => img.into_vec(),
        }
    }

    /// Borrow the grayscale image, if this is one.
    pub fn as_gray(&self) -> Option<&Image<u8, 1>> {
        match self {
            RasterImage::Gray(img) => Some(img),
            RasterImage::Rgb(_) => None,
        }
    }

    /// Borrow the RGB image, if this is one.
    pub fn as_rgb(&self) -> Option<&Image<u8, 3>> {
        match self {
            RasterImage::Rgb(img) => Some(img),
            RasterImage::Gray(_) => None,
        }
    }
}

impl From<Image<u8, 1>> for RasterImage {
    fn from(img: Image<u8, 1>) -> Self {
        RasterImage::Gray(img)
    }
}

impl From<Image<u8, 3>> for RasterImage {
    fn from(img: Image<u8, 3>) -> Self {
        RasterImage::Rgb(img)
    }
}

impl TryFrom<RasterImage> for Image<u8, 1> {
    type Error = ImageError;

    fn try_from(raster: RasterImage) -> Result<Self, Self::Error> {
        match raster {
            RasterImage::Gray(img) => Ok(img),
            RasterImage::Rgb(_) => Err(ImageError::IncompatiblePixelTypes),
        }
    }
}

impl TryFrom<RasterImage> for Image<u8, 3> {
    type Error = ImageError;

    fn try_from(raster: RasterImage) -> Result<Self, Self::Error> {
        match raster {
            RasterImage::Rgb(img) => Ok(img),
            RasterImage::Gray(_) => Err(ImageError::IncompatiblePixelTypes),
        }
    }
}
