use pixlab_image::{Image, ImageDtype, ImageError};

use crate::parallel;

/// Adjust the brightness of an image by a multiplicative factor.
///
/// dst(x,y,c) = src(x,y,c) * factor
///
/// For 8-bit images the result is rounded and saturated to [0, 255]. A factor of 1.0
/// leaves the image unchanged and 0.0 gives a black image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image to store the result.
/// * `factor` - The brightness factor.
///
/// # Errors
///
/// Returns an error if the sizes of `src` and `dst` do not match.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::enhance::adjust_brightness;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![10, 100, 200]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// adjust_brightness(&image, &mut dst, 1.5).unwrap();
/// assert_eq!(dst.as_slice(), &[15, 150, 255]);
/// ```
pub fn adjust_brightness<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    factor: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |&src_pixel, dst_pixel| {
        let val: f32 = src_pixel.into();
        *dst_pixel = T::from_f32(val * factor);
    });

    Ok(())
}

/// Adjust the contrast of an image around a pivot intensity.
///
/// dst(x,y,c) = pivot + factor * (src(x,y,c) - pivot)
///
/// The pivot is usually the mean gray level of the image. A factor of 1.0 leaves the
/// image unchanged and 0.0 gives a flat image at the pivot value.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image to store the result.
/// * `factor` - The contrast factor.
/// * `pivot` - The intensity that stays fixed.
///
/// # Errors
///
/// Returns an error if the sizes of `src` and `dst` do not match.
pub fn adjust_contrast<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    factor: f32,
    pivot: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |&src_pixel, dst_pixel| {
        let val: f32 = src_pixel.into();
        *dst_pixel = T::from_f32(pivot + factor * (val - pivot));
    });

    Ok(())
}
