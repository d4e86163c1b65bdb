use pixlab_image::{Image, RasterImage};
use pixlab_imgproc::{features, segmentation, threshold};

pub use pixlab_imgproc::segmentation::Traversal;

use crate::enhance::to_gray;
use crate::error::EngineError;
use crate::params::check_unit_range;

/// Mask value of selected pixels.
const FOREGROUND: u8 = 255;

/// A pixel coordinate used to start region growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedPoint {
    /// Row index, from the top.
    pub row: usize,
    /// Column index, from the left.
    pub col: usize,
}

impl SeedPoint {
    /// The center pixel `(H / 2, W / 2)` of an image.
    pub fn center_of(image: &RasterImage) -> Self {
        Self {
            row: image.height() / 2,
            col: image.width() / 2,
        }
    }
}

/// Binarize the grayscale conversion of an image.
///
/// Pixels with an intensity of at least `threshold` become 255, all others 0.
///
/// # Errors
///
/// Returns an error if the threshold is outside `[0, 255]`.
pub fn threshold_segment(image: &RasterImage, threshold: i32) -> Result<RasterImage, EngineError> {
    check_unit_range("threshold", threshold)?;

    let gray = to_gray(image)?;
    let mut dst = Image::from_size_val(gray.size(), 0)?;
    threshold::threshold_binary(&gray, &mut dst, threshold as u8, FOREGROUND)?;

    Ok(dst.into())
}

/// Detect edges with the Canny detector.
///
/// The grayscale conversion is smoothed with a 5x5 gaussian, differentiated with 3x3
/// Sobel kernels and thinned by non-maximum suppression. Pixels above `high` seed the
/// edges and pixels above `low` join them when 8-connected to a seed.
///
/// The outermost one-pixel frame of the result is never marked as an edge, even where
/// an intensity step reaches the border.
///
/// # Errors
///
/// Returns an error if a threshold is outside `[0, 255]` or `low > high`.
pub fn canny_edge(image: &RasterImage, low: i32, high: i32) -> Result<RasterImage, EngineError> {
    check_unit_range("edge_low", low)?;
    check_unit_range("edge_high", high)?;
    if low > high {
        return Err(EngineError::invalid(
            "edge_low",
            low,
            format!("greater than edge_high ({high})"),
        ));
    }

    let gray = to_gray(image)?;
    let mut dst = Image::from_size_val(gray.size(), 0)?;
    features::canny(&gray, &mut dst, low as f32, high as f32)?;

    Ok(dst.into())
}

/// Grow a region from `seed` over pixels whose intensity is close to the seed's.
///
/// See [`region_growing_with`] for the traversal and the returned pixel count.
///
/// # Example
///
/// ```
/// use pixlab_studio::{segment::region_growing, Image, ImageSize, RasterImage, SeedPoint};
///
/// #[rustfmt::skip]
/// let image = Image::<u8, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0,  0,  0, 0,
///     0, 50, 50, 0,
///     0, 50, 50, 0,
///     0,  0,  0, 0,
/// ])?;
///
/// let mask = region_growing(&RasterImage::from(image), SeedPoint { row: 1, col: 1 }, 10)?;
///
/// #[rustfmt::skip]
/// assert_eq!(mask.as_slice(), &[
///     0,   0,   0, 0,
///     0, 255, 255, 0,
///     0, 255, 255, 0,
///     0,   0,   0, 0,
/// ]);
/// # Ok::<(), pixlab_studio::EngineError>(())
/// ```
pub fn region_growing(
    image: &RasterImage,
    seed: SeedPoint,
    similarity_threshold: i32,
) -> Result<RasterImage, EngineError> {
    region_growing_with(image, seed, similarity_threshold, Traversal::default())
        .map(|(mask, _)| mask)
}

/// Grow a region from `seed` and report its size.
///
/// A pixel joins the region when it is 8-connected to the region and its intensity
/// differs from the seed intensity by less than `similarity_threshold`. The mask is the
/// same for every [`Traversal`].
///
/// # Returns
///
/// The single channel mask, 255 inside the region, and the number of region pixels.
///
/// # Errors
///
/// Returns an error if the seed lies outside the image or the threshold is outside
/// `[0, 255]`.
pub fn region_growing_with(
    image: &RasterImage,
    seed: SeedPoint,
    similarity_threshold: i32,
    traversal: Traversal,
) -> Result<(RasterImage, usize), EngineError> {
    check_unit_range("region_threshold", similarity_threshold)?;

    if seed.row >= image.height() || seed.col >= image.width() {
        return Err(EngineError::invalid(
            "seed",
            format!("({}, {})", seed.row, seed.col),
            format!("outside the {} image", image.size()),
        ));
    }

    let gray = to_gray(image)?;
    let mut dst = Image::from_size_val(gray.size(), 0)?;
    let count = segmentation::region_growing(
        &gray,
        &mut dst,
        (seed.row, seed.col),
        similarity_threshold as u8,
        traversal,
    )?;

    log::debug!(
        "region from ({}, {}) covers {} of {} pixels",
        seed.row,
        seed.col,
        count,
        gray.size().area()
    );

    Ok((dst.into(), count))
}
