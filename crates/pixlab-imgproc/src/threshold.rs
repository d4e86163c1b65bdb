use num_traits::Zero;
use std::cmp::PartialOrd;

use pixlab_image::{Image, ImageError};

use crate::parallel;

/// Apply a binary threshold to an image.
///
/// Values greater than or equal to `threshold` become `max_value`, all others zero.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The value written where the input reaches the threshold.
///
/// # Examples
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 150, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel >= threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use pixlab_image::{Image, ImageError, ImageSize};

    #[test]
    fn threshold_binary() -> Result<(), ImageError> {
        let data = vec![100u8, 200, 50, 150, 200, 250];
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            data,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;

        super::threshold_binary(&image, &mut thresholded, 100, 255)?;
        assert_eq!(thresholded.as_slice(), &[255, 255, 0, 255, 255, 255]);

        super::threshold_binary(&image, &mut thresholded, 0, 255)?;
        assert!(thresholded.as_slice().iter().all(|&v| v == 255));

        Ok(())
    }

    #[test]
    fn threshold_binary_f32() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([3, 1].into(), vec![0.1, 0.5, 0.9])?;
        let mut dst = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;
        super::threshold_binary(&image, &mut dst, 0.5, 1.0)?;
        assert_eq!(dst.as_slice(), &[0.0, 1.0, 1.0]);
        Ok(())
    }
}
