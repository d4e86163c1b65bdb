use pixlab_image::{Image, ImageDtype};
use rayon::prelude::*;

/// Compute the per-channel mean of an image.
///
/// The sums are accumulated in parallel over rows in `f64`.
///
/// # Arguments
///
/// * `image` - The input image to compute the mean of.
///
/// # Returns
///
/// An array holding the mean of each channel.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::core::mean;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 2,
///     },
///     vec![0, 1, 2, 253, 254, 255, 128, 129, 130, 64, 65, 66],
/// ).unwrap();
///
/// assert_eq!(mean(&image), [111.25, 112.25, 113.25]);
/// ```
pub fn mean<T: ImageDtype, const C: usize>(image: &Image<T, C>) -> [f64; C] {
    let sum = image
        .as_slice()
        .par_chunks_exact(image.cols() * C)
        .fold(
            || [0f64; C],
            |mut acc, row| {
                for pixel in row.chunks_exact(C) {
                    for (a, &v) in acc.iter_mut().zip(pixel.iter()) {
                        let v: f32 = v.into();
                        *a += v as f64;
                    }
                }
                acc
            },
        )
        .reduce(
            || [0f64; C],
            |mut a, b| {
                a.iter_mut().zip(b.iter()).for_each(|(a, b)| *a += b);
                a
            },
        );

    let n = (image.width() * image.height()) as f64;
    sum.map(|s| s / n)
}
