use crate::interpolation::InterpolationMode;
use fast_image_resize as fr;
use pixlab_image::{Image, ImageError};

/// Image dimensions as accepted by the resizer.
fn resizer_dims(width: usize, height: usize) -> Result<(u32, u32), ImageError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ImageError::ResizeFailed(format!(
            "size {width}x{height} exceeds the resizer limit of {} pixels per side",
            u32::MAX
        ))),
    }
}

/// Resize an 8-bit image to a new size using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// The output size is taken from `dst`. Only 1, 3 and 4 channel images are supported.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::resize::resize_fast;
/// use pixlab_imgproc::interpolation::InterpolationMode;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0u8; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0).unwrap();
///
/// resize_fast(
///     &image,
///     &mut image_resized,
///     InterpolationMode::Lanczos3,
/// )
/// .unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
///
/// # Errors
///
/// The function returns an error if the channel count is not supported, a side is
/// longer than `u32::MAX` pixels or the resizer fails.
pub fn resize_fast<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let pixel_type = match C {
        1 => fr::PixelType::U8,
        3 => fr::PixelType::U8x3,
        4 => fr::PixelType::U8x4,
        _ => return Err(ImageError::IncompatiblePixelTypes),
    };

    // same size needs no resampling
    if src.size() == dst.size() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let (src_width, src_height) = resizer_dims(src.width(), src.height())?;
    let (dst_width, dst_height) = resizer_dims(dst.width(), dst.height())?;

    let src_image = fr::images::ImageRef::new(
        src_width,
        src_height,
        src.as_slice(),
        pixel_type,
    )
    .map_err(|e| ImageError::ResizeFailed(e.to_string()))?;

    let mut dst_image =
        fr::images::Image::from_slice_u8(dst_width, dst_height, dst.as_slice_mut(), pixel_type)
            .map_err(|e| ImageError::ResizeFailed(e.to_string()))?;

    let algorithm = match interpolation {
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
    };
    let options = fr::ResizeOptions::new().resize_alg(algorithm);

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| ImageError::ResizeFailed(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::InterpolationMode;
    use pixlab_image::{Image, ImageError, ImageSize};

    #[test]
    fn resize_fast_constant_ch1() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 8,
                height: 6,
            },
            120,
        )?;

        let mut image_resized = Image::<u8, 1>::from_size_val([3, 2].into(), 0)?;
        super::resize_fast(&image, &mut image_resized, InterpolationMode::Lanczos3)?;

        assert!(image_resized
            .as_slice()
            .iter()
            .all(|&v| (119..=121).contains(&v)));
        Ok(())
    }

    #[test]
    fn resize_fast_same_size_is_copy() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([2, 2].into(), (0..12).collect())?;
        let mut dst = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::resize_fast(&image, &mut dst, InterpolationMode::Lanczos3)?;
        assert_eq!(dst, image);
        Ok(())
    }

    #[test]
    fn resize_fast_unsupported_channels() -> Result<(), ImageError> {
        let image = Image::<u8, 2>::from_size_val([2, 2].into(), 0)?;
        let mut dst = Image::<u8, 2>::from_size_val([1, 1].into(), 0)?;
        assert_eq!(
            super::resize_fast(&image, &mut dst, InterpolationMode::Bilinear),
            Err(ImageError::IncompatiblePixelTypes)
        );
        Ok(())
    }

    #[test]
    fn resizer_dims_limit() {
        assert_eq!(super::resizer_dims(3, 4), Ok((3, 4)));
        assert!(matches!(
            super::resizer_dims(u32::MAX as usize + 1, 4),
            Err(ImageError::ResizeFailed(_))
        ));
    }
}
