use pixlab_image::{Image, ImageError};
use rayon::prelude::*;

use crate::filter::{gaussian_blur, spatial_gradient};

/// tan(22.5°), boundary between the horizontal and diagonal direction bins.
const TAN_22_5_DEG: f32 = 0.414_213_57;

/// Size of the pre-smoothing gaussian kernel.
const SMOOTHING_KERNEL_SIZE: usize = 5;

/// Sigma of the pre-smoothing gaussian kernel.
const SMOOTHING_SIGMA: f32 = 1.4;

const NOT_EDGE: u8 = 0;
const WEAK_EDGE: u8 = 1;
const STRONG_EDGE: u8 = 2;

/// Suppress non-maximum gradient responses and classify the survivors.
///
/// The gradient direction is quantized to 0°, 45°, 90° and 135°. A pixel survives if
/// its magnitude is strictly greater than the neighbour behind it and not smaller than
/// the neighbour ahead of it, so a two pixel wide ridge keeps one of its pixels. The
/// outermost pixel frame is never an edge.
fn non_maximum_suppression(
    mag: &[f32],
    gx: &[f32],
    gy: &[f32],
    cols: usize,
    rows: usize,
    low: f32,
    high: f32,
) -> Vec<u8> {
    let mut classes = vec![NOT_EDGE; cols * rows];
    if cols < 3 || rows < 3 {
        return classes;
    }

    classes
        .par_chunks_exact_mut(cols)
        .enumerate()
        .skip(1)
        .take(rows - 2)
        .for_each(|(y, class_row)| {
            let mag_prev = &mag[(y - 1) * cols..y * cols];
            let mag_row = &mag[y * cols..(y + 1) * cols];
            let mag_next = &mag[(y + 1) * cols..(y + 2) * cols];

            for x in 1..cols - 1 {
                let m = mag_row[x];
                if m <= low {
                    continue;
                }

                let dx = gx[y * cols + x];
                let dy = gy[y * cols + x];
                let (abs_dx, abs_dy) = (dx.abs(), dy.abs());

                // y points down, so equal signs mean the gradient runs along the main diagonal
                let same_sign = (dx >= 0.0) == (dy >= 0.0);

                let (behind, ahead) = if abs_dy <= abs_dx * TAN_22_5_DEG {
                    (mag_row[x - 1], mag_row[x + 1])
                } else if abs_dx <= abs_dy * TAN_22_5_DEG {
                    (mag_prev[x], mag_next[x])
                } else if same_sign {
                    (mag_prev[x - 1], mag_next[x + 1])
                } else {
                    (mag_next[x - 1], mag_prev[x + 1])
                };

                if m > behind && m >= ahead {
                    class_row[x] = if m > high { STRONG_EDGE } else { WEAK_EDGE };
                }
            }
        });

    classes
}

/// Keep weak edges that are 8-connected, directly or through other weak edges, to a
/// strong edge.
fn hysteresis(classes: &[u8], cols: usize, rows: usize, dst: &mut [u8]) {
    dst.iter_mut().for_each(|v| *v = 0);

    let mut stack = classes
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == STRONG_EDGE)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    for &i in &stack {
        dst[i] = 255;
    }

    while let Some(i) = stack.pop() {
        let (y, x) = ((i / cols) as isize, (i % cols) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if ny < 0 || nx < 0 || ny >= rows as isize || nx >= cols as isize {
                    continue;
                }
                let n = ny as usize * cols + nx as usize;
                if classes[n] == WEAK_EDGE && dst[n] == 0 {
                    dst[n] = 255;
                    stack.push(n);
                }
            }
        }
    }
}

/// Detect edges with the Canny algorithm.
///
/// The image is smoothed with a 5x5 gaussian (sigma 1.4), differentiated with the
/// 3x3 sobel operator and the gradient magnitude taken as `|dx| + |dy|`. After
/// non-maximum suppression, pixels with magnitude above `high` are strong edges and
/// pixels above `low` are kept only when connected to a strong edge.
///
/// The outermost one-pixel frame of `dst` is always 0, since the suppression step
/// has no full neighbourhood there.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output edge map, 255 on edges and 0 elsewhere.
/// * `low` - The lower hysteresis threshold.
/// * `high` - The upper hysteresis threshold.
///
/// # Errors
///
/// Returns an error if `low > high`, a threshold is not finite or the image sizes do
/// not match.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::features::canny;
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 8, height: 8 }, 90).unwrap();
/// let mut edges = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// canny(&image, &mut edges, 50.0, 150.0).unwrap();
/// assert!(edges.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn canny(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    low: f32,
    high: f32,
) -> Result<(), ImageError> {
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(ImageError::InvalidThreshold(low, high));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (cols, rows) = (src.cols(), src.rows());

    let src_f32 = src.cast::<f32>()?;
    let mut smoothed = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    gaussian_blur(
        &src_f32,
        &mut smoothed,
        (SMOOTHING_KERNEL_SIZE, SMOOTHING_KERNEL_SIZE),
        (SMOOTHING_SIGMA, SMOOTHING_SIGMA),
    )?;

    let mut gx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    let mut gy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    spatial_gradient(&smoothed, &mut gx, &mut gy, 3)?;

    let mag = gx
        .as_slice()
        .par_iter()
        .zip(gy.as_slice().par_iter())
        .map(|(dx, dy)| dx.abs() + dy.abs())
        .collect::<Vec<_>>();

    let classes =
        non_maximum_suppression(&mag, gx.as_slice(), gy.as_slice(), cols, rows, low, high);

    hysteresis(&classes, cols, rows, dst.as_slice_mut());

    Ok(())
}

#[cfg(test)]
mod tests {
    use pixlab_image::{Image, ImageError, ImageSize};

    fn step_image() -> Result<Image<u8, 1>, ImageError> {
        let size = ImageSize {
            width: 12,
            height: 10,
        };
        let data = (0..size.height)
            .flat_map(|_| (0..size.width).map(|x| if x < 6 { 0 } else { 200 }))
            .collect();
        Image::new(size, data)
    }

    #[test]
    fn canny_uniform_has_no_edges() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([9, 7].into(), 123)?;
        let mut edges = Image::<u8, 1>::from_size_val(image.size(), 7)?;
        super::canny(&image, &mut edges, 0.0, 0.0)?;
        assert!(edges.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn canny_vertical_step() -> Result<(), ImageError> {
        let image = step_image()?;
        let mut edges = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::canny(&image, &mut edges, 50.0, 150.0)?;

        assert!(edges.as_slice().iter().all(|&v| v == 0 || v == 255));

        // every interior row has exactly one edge pixel, next to the step
        for y in 1..image.rows() - 1 {
            let row = &edges.as_slice()[y * image.cols()..(y + 1) * image.cols()];
            let hits = row
                .iter()
                .enumerate()
                .filter(|(_, &v)| v == 255)
                .map(|(x, _)| x)
                .collect::<Vec<_>>();
            assert_eq!(hits.len(), 1);
            assert!(hits[0] == 5 || hits[0] == 6);
        }

        // the frame is never an edge
        let (cols, rows) = (image.cols(), image.rows());
        for (i, &v) in edges.as_slice().iter().enumerate() {
            let (x, y) = (i % cols, i / cols);
            if x == 0 || y == 0 || x == cols - 1 || y == rows - 1 {
                assert_eq!(v, 0);
            }
        }

        Ok(())
    }

    #[test]
    fn hysteresis_follows_diagonal_chain() {
        use super::{NOT_EDGE as N, STRONG_EDGE as S, WEAK_EDGE as W};

        let (cols, rows) = (6, 5);
        // strong seed at (1, 1), weak chain running diagonally then right,
        // isolated weak pixel at (5, 0)
        #[rustfmt::skip]
        let classes = vec![
            N, N, N, N, N, W,
            N, S, N, N, N, N,
            N, N, W, N, N, N,
            N, N, N, W, W, N,
            N, N, N, N, N, N,
        ];
        let mut dst = vec![7u8; cols * rows];

        super::hysteresis(&classes, cols, rows, &mut dst);

        #[rustfmt::skip]
        let expected = vec![
            0,   0,   0,   0,   0, 0,
            0, 255,   0,   0,   0, 0,
            0,   0, 255,   0,   0, 0,
            0,   0,   0, 255, 255, 0,
            0,   0,   0,   0,   0, 0,
        ];
        assert_eq!(dst, expected);
    }

    #[test]
    fn canny_high_threshold_suppresses_everything() -> Result<(), ImageError> {
        let image = step_image()?;
        let mut edges = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::canny(&image, &mut edges, 10_000.0, 10_000.0)?;
        assert!(edges.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn canny_invalid_thresholds() -> Result<(), ImageError> {
        let image = step_image()?;
        let mut edges = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        assert_eq!(
            super::canny(&image, &mut edges, 100.0, 50.0),
            Err(ImageError::InvalidThreshold(100.0, 50.0))
        );
        Ok(())
    }
}
