use std::collections::VecDeque;

use pixlab_image::{Image, ImageError};

/// Order in which the region growing work list is drained.
///
/// Both orders include exactly the same pixels; they differ only in the memory access
/// pattern and the peak size of the work list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Last in, first out.
    #[default]
    DepthFirst,
    /// First in, first out.
    BreadthFirst,
}

/// Pending pixels, stored as flat indices.
enum WorkList {
    Stack(Vec<usize>),
    Queue(VecDeque<usize>),
}

impl WorkList {
    fn new(traversal: Traversal) -> Self {
        match traversal {
            Traversal::DepthFirst => WorkList::Stack(Vec::new()),
            Traversal::BreadthFirst => WorkList::Queue(VecDeque::new()),
        }
    }

    fn push(&mut self, idx: usize) {
        match self {
            WorkList::Stack(stack) => stack.push(idx),
            WorkList::Queue(queue) => queue.push_back(idx),
        }
    }

    fn pop(&mut self) -> Option<usize> {
        match self {
            WorkList::Stack(stack) => stack.pop(),
            WorkList::Queue(queue) => queue.pop_front(),
        }
    }
}

/// Segment the region connected to a seed pixel by intensity similarity.
///
/// Starting from `seed`, 8-connected neighbours are included while their intensity
/// differs from the *seed's* intensity by strictly less than `threshold`. Every pixel
/// is visited at most once, so the work is linear in the image size.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output mask, 255 inside the region and 0 elsewhere.
/// * `seed` - The seed pixel as (row, col).
/// * `threshold` - The similarity threshold. With 0 only the seed is included.
/// * `traversal` - The order in which candidates are explored.
///
/// # Returns
///
/// The number of pixels in the region, the seed included.
///
/// # Errors
///
/// Returns an error if the seed lies outside the image or the image sizes do not match.
///
/// # Example
///
/// ```
/// use pixlab_image::{Image, ImageSize};
/// use pixlab_imgproc::segmentation::{region_growing, Traversal};
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![10, 12, 90],
/// ).unwrap();
/// let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// let count = region_growing(&image, &mut mask, (0, 0), 5, Traversal::DepthFirst).unwrap();
/// assert_eq!(count, 2);
/// assert_eq!(mask.as_slice(), &[255, 255, 0]);
/// ```
pub fn region_growing(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    seed: (usize, usize),
    threshold: u8,
    traversal: Traversal,
) -> Result<usize, ImageError> {
    let (rows, cols) = (src.rows(), src.cols());
    let (seed_row, seed_col) = seed;

    if seed_row >= rows || seed_col >= cols {
        return Err(ImageError::InvalidSeedPoint(seed_row, seed_col, cols, rows));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let intensity = src.as_slice();
    let mask = dst.as_slice_mut();
    mask.iter_mut().for_each(|v| *v = 0);

    let seed_idx = seed_row * cols + seed_col;
    let seed_value = intensity[seed_idx] as i16;
    let threshold = threshold as i16;

    mask[seed_idx] = 255;
    let mut count = 1;

    let mut pending = WorkList::new(traversal);
    pending.push(seed_idx);

    while let Some(idx) = pending.pop() {
        let (r, c) = (idx / cols, idx % cols);

        for nr in r.saturating_sub(1)..=(r + 1).min(rows - 1) {
            for nc in c.saturating_sub(1)..=(c + 1).min(cols - 1) {
                let n = nr * cols + nc;
                if mask[n] != 0 {
                    continue;
                }
                if (intensity[n] as i16 - seed_value).abs() < threshold {
                    mask[n] = 255;
                    count += 1;
                    pending.push(n);
                }
            }
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::Traversal;
    use pixlab_image::{Image, ImageError, ImageSize};

    #[test]
    fn region_growing_center_block() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            vec![
                0,  0,  0, 0,
                0, 50, 50, 0,
                0, 50, 50, 0,
                0,  0,  0, 0,
            ],
        )?;

        let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        let count = super::region_growing(&image, &mut mask, (1, 1), 10, Traversal::DepthFirst)?;

        assert_eq!(count, 4);
        #[rustfmt::skip]
        assert_eq!(
            mask.as_slice(),
            &[
                0,   0,   0, 0,
                0, 255, 255, 0,
                0, 255, 255, 0,
                0,   0,   0, 0,
            ]
        );

        Ok(())
    }

    #[test]
    fn region_growing_zero_threshold_is_seed_only() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([5, 5].into(), 42)?;
        let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        let count = super::region_growing(&image, &mut mask, (2, 3), 0, Traversal::DepthFirst)?;
        assert_eq!(count, 1);
        assert_eq!(mask.get_pixel(3, 2, 0)?, &255);
        assert_eq!(mask.as_slice().iter().filter(|&&v| v == 255).count(), 1);
        Ok(())
    }

    #[test]
    fn region_growing_compares_against_seed() -> Result<(), ImageError> {
        // a smooth ramp: each step is small, but the far end drifts away from the seed
        let image = Image::<u8, 1>::new([6, 1].into(), vec![0, 4, 8, 12, 16, 20])?;
        let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        let count = super::region_growing(&image, &mut mask, (0, 0), 10, Traversal::DepthFirst)?;
        assert_eq!(count, 3);
        assert_eq!(mask.as_slice(), &[255, 255, 255, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn region_growing_diagonal_connectivity() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![
                9, 0, 0,
                0, 9, 0,
                0, 0, 9,
            ],
        )?;
        let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        let count = super::region_growing(&image, &mut mask, (0, 0), 1, Traversal::BreadthFirst)?;
        assert_eq!(count, 3);
        Ok(())
    }

    #[test]
    fn region_growing_traversals_agree() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 17,
            height: 13,
        };
        let data = (0..size.width * size.height)
            .map(|i| ((i * 37 + i / 5) % 64) as u8)
            .collect();
        let image = Image::<u8, 1>::new(size, data)?;

        let mut dfs = Image::<u8, 1>::from_size_val(size, 0)?;
        let mut bfs = Image::<u8, 1>::from_size_val(size, 0)?;
        let n_dfs = super::region_growing(&image, &mut dfs, (6, 8), 20, Traversal::DepthFirst)?;
        let n_bfs = super::region_growing(&image, &mut bfs, (6, 8), 20, Traversal::BreadthFirst)?;

        assert_eq!(n_dfs, n_bfs);
        assert_eq!(dfs, bfs);

        Ok(())
    }

    #[test]
    fn region_growing_seed_out_of_bounds() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([4, 3].into(), 0)?;
        let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        assert_eq!(
            super::region_growing(&image, &mut mask, (3, 0), 10, Traversal::DepthFirst),
            Err(ImageError::InvalidSeedPoint(3, 0, 4, 3))
        );
        Ok(())
    }
}
