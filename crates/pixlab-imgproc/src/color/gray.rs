use crate::parallel;
use pixlab_image::{Image, ImageError};

/// Fixed-point RGB weights for the grayscale conversion (ITU-R 601-2 luma scaled by 2^16).
const RW: u32 = 19595;
const GW: u32 = 38470;
const BW: u32 = 7471;

/// Convert an RGB8 image to grayscale using the formula:
///
/// Y = (19595 * R + 38470 * G + 7471 * B + 2^15) >> 16
///
/// which is the ITU-R 601-2 luma transform `0.299 R + 0.587 G + 0.114 B` rounded to
/// the nearest integer.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 255, 255, 255, 0, 0],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255, 76]);
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as u32;
        let g = src_pixel[1] as u32;
        let b = src_pixel[2] as u32;
        dst_pixel[0] = ((r * RW + g * GW + b * BW + (1 << 15)) >> 16) as u8;
    });

    Ok(())
}
