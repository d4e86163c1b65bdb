use pixlab_image::{Image, RasterImage};
use pixlab_imgproc::{color, core, enhance, histogram};

use crate::error::EngineError;
use crate::params::check_factor;

/// Convert an image to a single channel intensity image.
///
/// RGB input uses the ITU-R 601-2 luma weights; gray input is copied.
pub fn to_gray(image: &RasterImage) -> Result<Image<u8, 1>, EngineError> {
    match image {
        RasterImage::Gray(img) => Ok(img.clone()),
        RasterImage::Rgb(img) => {
            let mut gray = Image::from_size_val(img.size(), 0)?;
            color::gray_from_rgb_u8(img, &mut gray)?;
            Ok(gray)
        }
    }
}

/// Convert an image to grayscale.
///
/// # Example
///
/// ```
/// use pixlab_studio::{enhance::grayscale, ColorMode, Image, ImageSize, RasterImage};
///
/// let image = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![255, 0, 0])?;
/// let gray = grayscale(&RasterImage::from(image))?;
/// assert_eq!(gray.color_mode(), ColorMode::Gray);
/// assert_eq!(gray.as_slice(), &[76]);
/// # Ok::<(), pixlab_studio::EngineError>(())
/// ```
pub fn grayscale(image: &RasterImage) -> Result<RasterImage, EngineError> {
    to_gray(image).map(RasterImage::from)
}

/// Multiply every channel value by `factor`, rounding and saturating to `[0, 255]`.
///
/// # Errors
///
/// Returns an error if the factor is negative or not finite.
pub fn adjust_brightness(image: &RasterImage, factor: f32) -> Result<RasterImage, EngineError> {
    check_factor("brightness", factor)?;
    map_raster!(image, brightness_image, factor)
}

fn brightness_image<const C: usize>(
    src: &Image<u8, C>,
    factor: f32,
) -> Result<Image<u8, C>, EngineError> {
    let mut dst = Image::from_size_val(src.size(), 0)?;
    enhance::adjust_brightness(src, &mut dst, factor)?;
    Ok(dst)
}

/// Stretch every channel value away from the mean gray level by `factor`.
///
/// The pivot is the rounded mean of the grayscale conversion of the image, shared by
/// all channels.
///
/// # Errors
///
/// Returns an error if the factor is negative or not finite.
pub fn adjust_contrast(image: &RasterImage, factor: f32) -> Result<RasterImage, EngineError> {
    check_factor("contrast", factor)?;
    let [pivot] = core::mean(&to_gray(image)?);
    map_raster!(image, contrast_image, factor, pivot.round() as f32)
}

fn contrast_image<const C: usize>(
    src: &Image<u8, C>,
    factor: f32,
    pivot: f32,
) -> Result<Image<u8, C>, EngineError> {
    let mut dst = Image::from_size_val(src.size(), 0)?;
    enhance::adjust_contrast(src, &mut dst, factor, pivot)?;
    Ok(dst)
}

/// Equalize the histogram of the grayscale conversion of an image.
///
/// The result is always grayscale. An image with a single intensity comes back as its
/// grayscale conversion.
pub fn equalize(image: &RasterImage) -> Result<RasterImage, EngineError> {
    let gray = to_gray(image)?;
    let mut dst = Image::from_size_val(gray.size(), 0)?;
    histogram::equalize_histogram(&gray, &mut dst)?;
    Ok(dst.into())
}
