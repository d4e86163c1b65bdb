use pixlab_image::{Image, ImageError};
use rayon::prelude::*;

use crate::parallel;

/// Compute the pixel intensity histogram of an image.
///
/// NOTE: this is limited to 8-bit 1-channel images.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
/// * `hist` - The output histogram, accumulated into.
/// * `num_bins` - The number of bins to use for the histogram.
///
/// # Errors
///
/// Returns an error if the number of bins is invalid.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let mut histogram = vec![0; 3];
///
/// compute_histogram(&image, &mut histogram, 3).unwrap();
/// assert_eq!(histogram, vec![3, 3, 3]);
/// ```
pub fn compute_histogram(
    src: &Image<u8, 1>,
    hist: &mut [usize],
    num_bins: usize,
) -> Result<(), ImageError> {
    if num_bins == 0 || num_bins > 256 {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    if hist.len() != num_bins {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    let mut bin_lut = [0usize; 256];
    for (i, bin) in bin_lut.iter_mut().enumerate() {
        *bin = (i * num_bins) >> 8;
    }

    let counts = src
        .as_slice()
        .par_chunks(4096)
        .fold(
            || vec![0usize; num_bins],
            |mut local, chunk| {
                for &px in chunk {
                    local[bin_lut[px as usize]] += 1;
                }
                local
            },
        )
        .reduce(
            || vec![0usize; num_bins],
            |mut a, b| {
                for (i, val) in b.iter().enumerate() {
                    a[i] += val;
                }
                a
            },
        );

    for (h, c) in hist.iter_mut().zip(counts.iter()) {
        *h += c;
    }

    Ok(())
}

/// Equalize the histogram of a grayscale image.
///
/// Intensities are remapped through the normalized cumulative distribution:
///
/// dst = round((cdf(v) - cdf_min) / (total - cdf_min) * 255)
///
/// where `cdf_min` is the cumulative count at the darkest occurring intensity. The
/// darkest intensity maps to 0 and the brightest to 255. An image with a single
/// intensity is copied unchanged.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output grayscale image.
///
/// # Errors
///
/// Returns an error if the sizes of `src` and `dst` do not match.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::histogram::equalize_histogram;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 4, height: 1 }, vec![50, 50, 60, 70]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// equalize_histogram(&image, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 0, 128, 255]);
/// ```
pub fn equalize_histogram(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let mut hist = vec![0usize; 256];
    compute_histogram(src, &mut hist, 256)?;

    let mut cdf = [0usize; 256];
    let mut acc = 0;
    for (c, &h) in cdf.iter_mut().zip(hist.iter()) {
        acc += h;
        *c = acc;
    }

    let total = acc;
    let cdf_min = hist
        .iter()
        .zip(cdf.iter())
        .find(|(&h, _)| h > 0)
        .map_or(0, |(_, &c)| c);

    if total == cdf_min {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let denom = (total - cdf_min) as f64;
    let mut lut = [0u8; 256];
    for (l, &c) in lut.iter_mut().zip(cdf.iter()) {
        let val = (c.saturating_sub(cdf_min) as f64 / denom * 255.0).round();
        *l = val.clamp(0.0, 255.0) as u8;
    }

    parallel::par_iter_rows_val(src, dst, |&src_pixel, dst_pixel| {
        *dst_pixel = lut[src_pixel as usize];
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use pixlab_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_compute_histogram() -> Result<(), ImageError> {
        let image = Image::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
        )?;

        let mut histogram = vec![0; 3];

        super::compute_histogram(&image, &mut histogram, 3)?;
        assert_eq!(histogram, vec![3, 3, 3]);

        let mut bad = vec![0; 2];
        assert_eq!(
            super::compute_histogram(&image, &mut bad, 3),
            Err(ImageError::InvalidHistogramBins(3))
        );

        Ok(())
    }

    #[test]
    fn test_equalize_full_range() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 2,
            },
            vec![100, 100, 101, 101, 102, 102, 103, 110],
        )?;

        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::equalize_histogram(&image, &mut dst)?;

        let min = dst.as_slice().iter().min().copied();
        let max = dst.as_slice().iter().max().copied();
        assert_eq!(min, Some(0));
        assert_eq!(max, Some(255));

        // monotonic mapping
        assert!(dst.as_slice().windows(2).all(|w| w[0] <= w[1]));

        Ok(())
    }

    #[test]
    fn test_equalize_constant() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 77)?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::equalize_histogram(&image, &mut dst)?;
        assert_eq!(dst, image);
        Ok(())
    }
}
