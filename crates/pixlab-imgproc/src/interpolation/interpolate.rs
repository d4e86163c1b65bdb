use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use pixlab_image::{Image, ImageDtype, ImageError};

/// Interpolation mode for the resampling operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
    /// Lanczos interpolation with a window of 3 lobes.
    ///
    /// Convolution based, so only the resizer supports it.
    Lanczos3,
}

/// A per-pixel sampling kernel: `(image, u, v, channel) -> value`.
pub(crate) type Sampler<T, const C: usize> = fn(&Image<T, C>, f32, f32, usize) -> f32;

/// Select the point sampler of an interpolation mode.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedInterpolation`] for modes without a point sampler.
pub(crate) fn sampler<T: ImageDtype, const C: usize>(
    interpolation: InterpolationMode,
) -> Result<Sampler<T, C>, ImageError> {
    match interpolation {
        InterpolationMode::Bilinear => Ok(bilinear_interpolation::<T, C>),
        InterpolationMode::Nearest => Ok(nearest_neighbor_interpolation::<T, C>),
        InterpolationMode::Lanczos3 => Err(ImageError::UnsupportedInterpolation(format!(
            "{interpolation:?}"
        ))),
    }
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated pixel value. Coordinates outside the image are clamped to the
/// nearest edge.
///
/// # Errors
///
/// Returns an error for [`InterpolationMode::Lanczos3`], which has no point sampler.
pub fn interpolate_pixel<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
    interpolation: InterpolationMode,
) -> Result<f32, ImageError> {
    sampler::<T, C>(interpolation).map(|sample| sample(image, u, v, c))
}

#[cfg(test)]
mod tests {
    use super::{interpolate_pixel, InterpolationMode};
    use pixlab_image::{Image, ImageError, ImageSize};

    #[test]
    fn interpolate_at_integer_coordinates() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![0, 10, 20, 30, 40, 50],
        )?;

        for mode in [InterpolationMode::Nearest, InterpolationMode::Bilinear] {
            let val = interpolate_pixel(&image, 1.0, 1.0, 0, mode)?;
            approx::assert_relative_eq!(val, 40.0, epsilon = 1e-3);
        }

        Ok(())
    }

    #[test]
    fn interpolate_bilinear_midpoint() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([2, 2].into(), vec![0.0, 10.0, 20.0, 30.0])?;
        let val = interpolate_pixel(&image, 0.5, 0.5, 0, InterpolationMode::Bilinear)?;
        approx::assert_relative_eq!(val, 15.0);
        Ok(())
    }

    #[test]
    fn interpolate_lanczos_is_unsupported() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        assert_eq!(
            interpolate_pixel(&image, 0.0, 0.0, 0, InterpolationMode::Lanczos3),
            Err(ImageError::UnsupportedInterpolation("Lanczos3".to_string()))
        );
        Ok(())
    }
}
