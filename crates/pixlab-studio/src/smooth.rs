use pixlab_image::{Image, RasterImage};
use pixlab_imgproc::filter;

use crate::error::EngineError;
use crate::params::check_radius;

/// Kernel length covering `radius` pixels on each side.
fn kernel_length(radius: i32) -> usize {
    2 * radius as usize + 1
}

/// Average every pixel over its `(2 * radius + 1)` square neighbourhood.
///
/// Borders replicate the nearest edge pixel and color images are filtered per channel.
///
/// # Errors
///
/// Returns an error if the radius is smaller than one.
pub fn mean_filter(image: &RasterImage, radius: i32) -> Result<RasterImage, EngineError> {
    check_radius("mean_radius", radius)?;
    map_raster!(image, mean_image, kernel_length(radius))
}

fn mean_image<const C: usize>(
    src: &Image<u8, C>,
    kernel_size: usize,
) -> Result<Image<u8, C>, EngineError> {
    let mut dst = Image::from_size_val(src.size(), 0)?;
    filter::box_blur(src, &mut dst, (kernel_size, kernel_size))?;
    Ok(dst)
}

/// Blur with a normalized gaussian of length `2 * radius + 1` and sigma `radius / 2`.
///
/// # Errors
///
/// Returns an error if the radius is smaller than one.
pub fn gaussian_filter(image: &RasterImage, radius: i32) -> Result<RasterImage, EngineError> {
    check_radius("gaussian_radius", radius)?;
    map_raster!(image, gaussian_image, radius)
}

fn gaussian_image<const C: usize>(
    src: &Image<u8, C>,
    radius: i32,
) -> Result<Image<u8, C>, EngineError> {
    let kernel_size = kernel_length(radius);
    let sigma = radius as f32 / 2.0;
    let mut dst = Image::from_size_val(src.size(), 0)?;
    filter::gaussian_blur(src, &mut dst, (kernel_size, kernel_size), (sigma, sigma))?;
    Ok(dst)
}

/// Replace every pixel by the median of its `(2 * radius + 1)` square neighbourhood.
///
/// # Errors
///
/// Returns an error if the radius is smaller than one.
pub fn median_filter(image: &RasterImage, radius: i32) -> Result<RasterImage, EngineError> {
    check_radius("median_radius", radius)?;
    map_raster!(image, median_image, radius as usize)
}

fn median_image<const C: usize>(
    src: &Image<u8, C>,
    radius: usize,
) -> Result<Image<u8, C>, EngineError> {
    let mut dst = Image::from_size_val(src.size(), 0)?;
    filter::median_blur(src, &mut dst, radius)?;
    Ok(dst)
}
