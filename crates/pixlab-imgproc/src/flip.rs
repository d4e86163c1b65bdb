use pixlab_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

/// Flip the input image horizontally.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output image with shape (H, W, C).
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::flip::horizontal_flip;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 3,
///         height: 1,
///     },
///     vec![1, 2, 3],
/// )
/// .unwrap();
///
/// let mut flipped = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// horizontal_flip(&image, &mut flipped).unwrap();
///
/// assert_eq!(flipped.as_slice(), &[3, 2, 1]);
/// ```
pub fn horizontal_flip<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let row_len = src.cols() * C;
    dst.as_slice_mut()
        .par_chunks_exact_mut(row_len)
        .zip(src.as_slice().par_chunks_exact(row_len))
        .for_each(|(dst_row, src_row)| {
            dst_row
                .chunks_exact_mut(C)
                .zip(src_row.chunks_exact(C).rev())
                .for_each(|(dst_pixel, src_pixel)| {
                    dst_pixel.copy_from_slice(src_pixel);
                });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use pixlab_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_hflip() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            (0..18).collect::<Vec<u8>>(),
        )?;
        let data_expected = vec![
            3, 4, 5, 0, 1, 2, 9, 10, 11, 6, 7, 8, 15, 16, 17, 12, 13, 14,
        ];
        let mut flipped = Image::<_, 3>::from_size_val(image.size(), 0u8)?;
        super::horizontal_flip(&image, &mut flipped)?;
        assert_eq!(flipped.as_slice(), &data_expected);

        Ok(())
    }

    #[test]
    fn test_hflip_twice_is_identity() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([5, 2].into(), (0..10).collect())?;
        let mut once = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        let mut twice = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::horizontal_flip(&image, &mut once)?;
        super::horizontal_flip(&once, &mut twice)?;
        assert_eq!(twice, image);
        Ok(())
    }
}
