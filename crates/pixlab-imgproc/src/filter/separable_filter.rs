use pixlab_image::{Image, ImageDtype, ImageError};
use rayon::prelude::*;

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
///
/// Out-of-range taps are clamped to the nearest row or column, so the source image is
/// virtually extended by replicating its edge pixels. The clamped column indices of
/// every tap are precomputed once per filter.
struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    half_x: isize,
    half_y: isize,
}

impl<'a> SeparableFilter<'a> {
    fn new(kernel_x: &'a [f32], kernel_y: &'a [f32]) -> Self {
        Self {
            kernel_x,
            kernel_y,
            half_x: (kernel_x.len() / 2) as isize,
            half_y: (kernel_y.len() / 2) as isize,
        }
    }

    /// Source column for every (output column, tap) pair, laid out row-major.
    fn column_lut(&self, cols: usize) -> Vec<usize> {
        let last = cols as isize - 1;
        (0..cols as isize)
            .flat_map(|c| {
                (0..self.kernel_x.len() as isize)
                    .map(move |k| (c + k - self.half_x).clamp(0, last) as usize)
            })
            .collect()
    }

    fn apply<T: ImageDtype, const C: usize>(&self, src: &Image<T, C>, dst: &mut Image<T, C>) {
        let rows = src.rows();
        let cols = src.cols();
        let row_len = cols * C;
        let taps_x = self.kernel_x.len();
        let col_lut = self.column_lut(cols);
        let src_data = src.as_slice();

        // horizontal pass into a float buffer
        let mut temp = vec![0.0f32; rows * row_len];
        temp.par_chunks_exact_mut(row_len)
            .zip(src_data.par_chunks_exact(row_len))
            .for_each(|(row_temp, row_src)| {
                for c in 0..cols {
                    let taps = &col_lut[c * taps_x..(c + 1) * taps_x];
                    let mut acc = [0.0f32; C];
                    for (&k, &x) in self.kernel_x.iter().zip(taps.iter()) {
                        let px = &row_src[x * C..(x + 1) * C];
                        for (acc_val, &v) in acc.iter_mut().zip(px.iter()) {
                            let v: f32 = v.into();
                            *acc_val += v * k;
                        }
                    }
                    row_temp[c * C..(c + 1) * C].copy_from_slice(&acc);
                }
            });

        // vertical pass back into the destination
        let last_row = rows as isize - 1;
        dst.as_slice_mut()
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(r, row_dst)| {
                let mut acc = vec![0.0f32; row_len];
                for (i, &k) in self.kernel_y.iter().enumerate() {
                    let y = (r as isize + i as isize - self.half_y).clamp(0, last_row) as usize;
                    let row_temp = &temp[y * row_len..(y + 1) * row_len];
                    for (acc_val, &v) in acc.iter_mut().zip(row_temp.iter()) {
                        *acc_val += v * k;
                    }
                }
                for (out, &v) in row_dst.iter_mut().zip(acc.iter()) {
                    *out = T::from_f32(v);
                }
            });
    }
}

/// Apply a separable filter to an image.
///
/// The image borders are handled by replicating the nearest edge pixel. For 8-bit
/// images the accumulated value is rounded once, after both passes.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel, of odd length.
/// * `kernel_y` - The vertical kernel, of odd length.
///
/// # Errors
///
/// Returns an error if a kernel is empty or of even length, or if the image sizes
/// do not match.
pub fn separable_filter<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    for kernel in [kernel_x, kernel_y] {
        if kernel.len() % 2 == 0 {
            return Err(ImageError::InvalidKernelLength(kernel.len(), 1));
        }
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    SeparableFilter::new(kernel_x, kernel_y).apply(src, dst);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixlab_image::ImageSize;

    #[test]
    fn test_separable_filter_f32() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        #[rustfmt::skip]
        let img = Image::new(
            size,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 9.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let mut dst = Image::<_, 1>::from_size_val(size, 0f32)?;
        let kernel_x = vec![1.0, 1.0, 1.0];
        let kernel_y = vec![1.0, 1.0, 1.0];
        separable_filter(&img, &mut dst, &kernel_x, &kernel_y)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 9.0, 9.0, 9.0, 0.0,
                0.0, 9.0, 9.0, 9.0, 0.0,
                0.0, 9.0, 9.0, 9.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );

        Ok(())
    }

    #[test]
    fn test_separable_filter_replicates_border() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::new([3, 1].into(), vec![3.0, 0.0, 0.0])?;
        let mut dst = Image::<f32, 1>::from_size_val(img.size(), 0.0)?;
        separable_filter(&img, &mut dst, &[1.0, 1.0, 1.0], &[1.0])?;

        // the left tap of column 0 reads column 0 again
        assert_eq!(dst.as_slice(), &[6.0, 3.0, 0.0]);

        Ok(())
    }

    #[test]
    fn test_separable_filter_even_kernel() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut dst = img.clone();
        assert_eq!(
            separable_filter(&img, &mut dst, &[0.5, 0.5], &[1.0]),
            Err(ImageError::InvalidKernelLength(2, 1))
        );
        Ok(())
    }
}
