use pixlab_image::{Image, ImageError};
use rayon::prelude::*;

/// Running 256-bin histogram of one channel inside the sliding window.
struct WindowHistogram {
    bins: [u32; 256],
}

impl WindowHistogram {
    fn new() -> Self {
        Self { bins: [0; 256] }
    }

    fn add(&mut self, v: u8) {
        self.bins[v as usize] += 1;
    }

    fn remove(&mut self, v: u8) {
        self.bins[v as usize] -= 1;
    }

    /// Value at 0-based `rank` in sorted order.
    fn nth(&self, rank: u32) -> u8 {
        let mut acc = 0;
        for (v, &count) in self.bins.iter().enumerate() {
            acc += count;
            if acc > rank {
                return v as u8;
            }
        }
        u8::MAX
    }
}

/// Blur an 8-bit image with a median filter.
///
/// Each output value is the median of the `(2 * radius + 1)^2` neighbourhood of the
/// same channel. The window slides along every row keeping a running histogram, so
/// each step only adds and removes one window column. Out-of-range taps replicate
/// the nearest edge pixel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `radius` - The radius of the square window, at least 1.
///
/// # Errors
///
/// Returns an error if the radius is zero or the image sizes do not match.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::filter::median_blur;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 3, height: 3 },
///     vec![10, 10, 10, 10, 255, 10, 10, 10, 10],
/// ).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// median_blur(&image, &mut dst, 1).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 10));
/// ```
pub fn median_blur<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    radius: usize,
) -> Result<(), ImageError> {
    if radius == 0 {
        return Err(ImageError::InvalidKernelLength(1, 3));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let rows = src.rows() as isize;
    let cols = src.cols() as isize;
    let r = radius as isize;
    let row_len = src.cols() * C;
    let median_rank = ((2 * radius + 1) * (2 * radius + 1) / 2) as u32;
    let src_data = src.as_slice();

    let clamp_row = |y: isize| y.clamp(0, rows - 1) as usize;
    let clamp_col = |x: isize| x.clamp(0, cols - 1) as usize;

    dst.as_slice_mut()
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row_dst)| {
            let window_rows = (y as isize - r..=y as isize + r)
                .map(|yy| &src_data[clamp_row(yy) * row_len..(clamp_row(yy) + 1) * row_len])
                .collect::<Vec<_>>();

            let mut hists: [WindowHistogram; C] = std::array::from_fn(|_| WindowHistogram::new());

            // initial window centered on column 0
            for row in &window_rows {
                for xx in -r..=r {
                    let x = clamp_col(xx);
                    for (ch, hist) in hists.iter_mut().enumerate() {
                        hist.add(row[x * C + ch]);
                    }
                }
            }

            for x in 0..cols {
                if x > 0 {
                    let leaving = clamp_col(x - r - 1);
                    let entering = clamp_col(x + r);
                    for row in &window_rows {
                        for (ch, hist) in hists.iter_mut().enumerate() {
                            hist.remove(row[leaving * C + ch]);
                            hist.add(row[entering * C + ch]);
                        }
                    }
                }

                let out = &mut row_dst[x as usize * C..(x as usize + 1) * C];
                for (o, hist) in out.iter_mut().zip(hists.iter()) {
                    *o = hist.nth(median_rank);
                }
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use pixlab_image::{Image, ImageError, ImageSize};

    /// Brute force median with replicated borders.
    fn median_reference(src: &Image<u8, 1>, radius: usize) -> Vec<u8> {
        let (rows, cols) = (src.rows() as isize, src.cols() as isize);
        let r = radius as isize;
        let mut out = Vec::new();
        for y in 0..rows {
            for x in 0..cols {
                let mut window = Vec::new();
                for yy in y - r..=y + r {
                    for xx in x - r..=x + r {
                        let yc = yy.clamp(0, rows - 1) as usize;
                        let xc = xx.clamp(0, cols - 1) as usize;
                        window.push(src.as_slice()[yc * cols as usize + xc]);
                    }
                }
                window.sort_unstable();
                out.push(window[window.len() / 2]);
            }
        }
        out
    }

    #[test]
    fn test_median_matches_reference() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 7,
            height: 5,
        };
        let data = (0..35u32).map(|i| ((i * 73 + 11) % 256) as u8).collect();
        let img = Image::<u8, 1>::new(size, data)?;

        for radius in [1, 2, 4] {
            let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
            super::median_blur(&img, &mut dst, radius)?;
            assert_eq!(dst.as_slice(), median_reference(&img, radius).as_slice());
        }

        Ok(())
    }

    #[test]
    fn test_median_per_channel() -> Result<(), ImageError> {
        let mut img = Image::<u8, 3>::from_size_val([3, 3].into(), 50)?;
        img.set_pixel(1, 1, 0, 255)?;
        img.set_pixel(1, 1, 2, 0)?;
        let mut dst = Image::<u8, 3>::from_size_val(img.size(), 0)?;
        super::median_blur(&img, &mut dst, 1)?;
        assert!(dst.as_slice().iter().all(|&v| v == 50));
        Ok(())
    }

    #[test]
    fn test_median_zero_radius() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut dst = img.clone();
        assert!(super::median_blur(&img, &mut dst, 0).is_err());
        Ok(())
    }
}
