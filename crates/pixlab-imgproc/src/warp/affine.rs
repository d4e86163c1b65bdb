use std::f32::consts::PI;

use pixlab_image::{Image, ImageDtype, ImageError};

use crate::interpolation::{sampler, InterpolationMode};
use crate::parallel;

/// Tolerance, in pixels, for source positions that land just outside the image
/// because of floating point error in the inverse mapping.
const BORDER_EPS: f32 = 1e-3;

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix. A singular matrix inverts to all
/// zeros.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    // follow OpenCV: check for determinant == 0
    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns a 2x3 rotation matrix for a 2D rotation around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// With the origin at the top-left corner, positive angles rotate the content
/// counter-clockwise.
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
///
/// # Example
///
/// ```
/// use pixlab_imgproc::warp::get_rotation_matrix2d;
///
/// let rotation_matrix = get_rotation_matrix2d((0.0, 0.0), 90.0, 1.0);
/// assert!((rotation_matrix[1] - 1.0).abs() < 1e-6);
/// ```
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> [f32; 6] {
    let angle = angle * PI / 180.0f32;
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    [alpha, beta, tx, -beta, alpha, ty]
}

/// Returns a 2x3 matrix that moves the content by `(tx, ty)` pixels.
pub fn get_translation_matrix2d(tx: f32, ty: f32) -> [f32; 6] {
    [1.0, 0.0, tx, 0.0, 1.0, ty]
}

/// Applies an affine transformation to a point.
fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// Every destination pixel is mapped back into the source through the inverse of `m`.
/// Positions that fall outside the source are filled with `fill_value`; they never
/// wrap around.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (new_height, new_width, channels).
/// * `m` - The 2x3 affine transformation matrix, mapping source to destination.
/// * `interpolation` - The interpolation mode to use.
/// * `fill_value` - The value written where no source pixel maps.
///
/// # Errors
///
/// Returns an error if `interpolation` is [`InterpolationMode::Lanczos3`], which has no
/// point sampler.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::interpolation::InterpolationMode;
/// use pixlab_imgproc::warp::warp_affine;
///
/// let src = Image::<_, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     1u8,
/// ).unwrap();
///
/// let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
///
/// let mut dst = Image::<_, 3>::from_size_val(src.size(), 0u8).unwrap();
///
/// warp_affine(&src, &mut dst, &m, InterpolationMode::Nearest, 0).unwrap();
///
/// assert_eq!(dst, src);
/// ```
pub fn warp_affine<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f32; 6],
    interpolation: InterpolationMode,
    fill_value: T,
) -> Result<(), ImageError> {
    let sample = sampler::<T, C>(interpolation)?;

    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let max_x = (src.cols() - 1) as f32 + BORDER_EPS;
    let max_y = (src.rows() - 1) as f32 + BORDER_EPS;

    parallel::par_iter_rows_indexed(dst, |x, y, dst_pixel| {
        let (u, v) = transform_point(x as f32, y as f32, &m_inv);

        // check if the position is within the bounds of the src image
        if u >= -BORDER_EPS && u <= max_x && v >= -BORDER_EPS && v <= max_y {
            dst_pixel.iter_mut().enumerate().for_each(|(k, pixel)| {
                *pixel = T::from_f32(sample(src, u, v, k))
            });
        } else {
            dst_pixel.iter_mut().for_each(|pixel| *pixel = fill_value);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::InterpolationMode;
    use pixlab_image::{Image, ImageError, ImageSize};

    #[test]
    fn warp_affine_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0f32; 4 * 5 * 3],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };

        let mut image_transformed = Image::<_, 3>::from_size_val(new_size, 0.0)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            InterpolationMode::Bilinear,
            0.0,
        )?;

        assert_eq!(image_transformed.num_channels(), 3);
        assert_eq!(image_transformed.size().width, 2);
        assert_eq!(image_transformed.size().height, 3);

        Ok(())
    }

    #[test]
    fn warp_affine_translate() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![
                1, 2, 3,
                4, 5, 6,
                7, 8, 9,
            ],
        )?;

        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 42)?;
        let m = super::get_translation_matrix2d(1.0, 0.0);
        super::warp_affine(&image, &mut dst, &m, InterpolationMode::Nearest, 0)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0, 1, 2,
                0, 4, 5,
                0, 7, 8,
            ]
        );

        Ok(())
    }

    #[test]
    fn warp_affine_rotate_90() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![
                1, 2, 3,
                4, 5, 6,
                7, 8, 9,
            ],
        )?;

        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        let m = super::get_rotation_matrix2d((1.0, 1.0), 90.0, 1.0);
        super::warp_affine(&image, &mut dst, &m, InterpolationMode::Bilinear, 0)?;

        // counter-clockwise: the right column becomes the top row
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                3, 6, 9,
                2, 5, 8,
                1, 4, 7,
            ]
        );

        Ok(())
    }

    #[test]
    fn warp_affine_rejects_lanczos() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        let m = super::get_translation_matrix2d(1.0, 0.0);
        assert!(matches!(
            super::warp_affine(&image, &mut dst, &m, InterpolationMode::Lanczos3, 0),
            Err(ImageError::UnsupportedInterpolation(_))
        ));
        Ok(())
    }

    #[test]
    fn invert_affine_roundtrip() {
        let m = super::get_rotation_matrix2d((3.0, 2.0), 30.0, 2.0);
        let m_inv = super::invert_affine_transform(&m);
        let (u, v) = super::transform_point(5.0, 7.0, &m);
        let (x, y) = super::transform_point(u, v, &m_inv);
        approx::assert_relative_eq!(x, 5.0, epsilon = 1e-4);
        approx::assert_relative_eq!(y, 7.0, epsilon = 1e-4);
    }
}
