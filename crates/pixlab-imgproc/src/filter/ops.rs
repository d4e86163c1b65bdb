use pixlab_image::{Image, ImageDtype, ImageError};

use super::{kernels, separable_filter};

/// Blur an image using a box blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y), odd.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::filter::box_blur;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![0, 90, 0]).unwrap();
/// let mut blurred = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// box_blur(&image, &mut blurred, (3, 1)).unwrap();
/// assert_eq!(blurred.as_slice(), &[30, 30, 30]);
/// ```
pub fn box_blur<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_size: (usize, usize),
) -> Result<(), ImageError> {
    let kernel_x = kernels::box_blur_kernel_1d(kernel_size.0);
    let kernel_y = kernels::box_blur_kernel_1d(kernel_size.1);
    separable_filter(src, dst, &kernel_x, &kernel_y)?;
    Ok(())
}

/// Blur an image using a gaussian blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y), odd.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_size: (usize, usize),
    sigma: (f32, f32),
) -> Result<(), ImageError> {
    let kernel_x = kernels::gaussian_kernel_1d(kernel_size.0, sigma.0);
    let kernel_y = kernels::gaussian_kernel_1d(kernel_size.1, sigma.1);
    separable_filter(src, dst, &kernel_x, &kernel_y)?;
    Ok(())
}

/// Compute the first order image derivatives with the sobel operator.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dx` - The horizontal derivative with shape (H, W, C).
/// * `dy` - The vertical derivative with shape (H, W, C).
/// * `kernel_size` - The size of the sobel kernel, 3 or 5.
///
/// PRECONDITION: `src`, `dx` and `dy` must have the same shape.
pub fn spatial_gradient<const C: usize>(
    src: &Image<f32, C>,
    dx: &mut Image<f32, C>,
    dy: &mut Image<f32, C>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    // get the sobel kernels
    let (derivative, smoothing) = kernels::sobel_kernel_1d(kernel_size)?;

    separable_filter(src, dx, &derivative, &smoothing)?;
    separable_filter(src, dy, &smoothing, &derivative)?;

    Ok(())
}
