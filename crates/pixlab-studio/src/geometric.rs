use pixlab_image::{Image, RasterImage};
use pixlab_imgproc::{flip, interpolation::InterpolationMode, resize, warp};

use crate::error::EngineError;

/// Background of translated and rotated images.
const BLACK: u8 = 0;

/// Background of scaled images.
const WHITE: u8 = 255;

/// Largest intermediate image `scale` will allocate, in pixels.
pub const MAX_SCALED_PIXELS: u64 = 1 << 30;

/// Shift an image by `(tx, ty)` pixels.
///
/// The output keeps the input size and samples `output(x, y) = input(x + tx, y + ty)`,
/// so positive offsets move the content left and up. Pixels that map outside the
/// source are black.
///
/// # Example
///
/// ```
/// use pixlab_studio::{geometric::translate, ImageSize, RasterImage, Image};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![1, 2, 3])?;
/// let shifted = translate(&RasterImage::from(image), 1, 0)?;
/// assert_eq!(shifted.as_slice(), &[2, 3, 0]);
/// # Ok::<(), pixlab_studio::EngineError>(())
/// ```
pub fn translate(image: &RasterImage, tx: i32, ty: i32) -> Result<RasterImage, EngineError> {
    map_raster!(image, translate_image, tx, ty)
}

fn translate_image<const C: usize>(
    src: &Image<u8, C>,
    tx: i32,
    ty: i32,
) -> Result<Image<u8, C>, EngineError> {
    let mut dst = Image::from_size_val(src.size(), BLACK)?;
    // the warp takes the source to destination map
    let m = warp::get_translation_matrix2d(-(tx as f32), -(ty as f32));
    warp::warp_affine(src, &mut dst, &m, InterpolationMode::Nearest, BLACK)?;
    Ok(dst)
}

/// Rotate an image counter-clockwise about its center.
///
/// The canvas keeps the input size, so corners are clipped. Samples are bilinear and
/// uncovered pixels are black. Multiples of 360 degrees return an exact copy.
///
/// # Errors
///
/// Returns an error if the angle is not finite.
pub fn rotate(image: &RasterImage, angle_deg: f32) -> Result<RasterImage, EngineError> {
    if !angle_deg.is_finite() {
        return Err(EngineError::invalid("rotate", angle_deg, "angle must be finite"));
    }

    if angle_deg % 360.0 == 0.0 {
        return Ok(image.clone());
    }

    map_raster!(image, rotate_image, angle_deg)
}

fn rotate_image<const C: usize>(
    src: &Image<u8, C>,
    angle_deg: f32,
) -> Result<Image<u8, C>, EngineError> {
    let center = (
        (src.cols() as f32 - 1.0) / 2.0,
        (src.rows() as f32 - 1.0) / 2.0,
    );
    let m = warp::get_rotation_matrix2d(center, angle_deg, 1.0);

    let mut dst = Image::from_size_val(src.size(), BLACK)?;
    warp::warp_affine(src, &mut dst, &m, InterpolationMode::Bilinear, BLACK)?;
    Ok(dst)
}

/// Resize the content of an image by `factor` while keeping the canvas size.
///
/// The content is resampled with Lanczos-3 to `max(1, floor(W * factor))` by
/// `max(1, floor(H * factor))` pixels and pasted centered on a white canvas of the
/// original size. Factors above one crop the enlarged content.
///
/// # Errors
///
/// Returns an error if the factor is not finite or not positive, or if the resized
/// content would have a side longer than `u32::MAX` or more than
/// [`MAX_SCALED_PIXELS`] pixels.
pub fn scale(image: &RasterImage, factor: f64) -> Result<RasterImage, EngineError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(EngineError::invalid(
            "scale",
            factor,
            "factor must be finite and positive",
        ));
    }

    map_raster!(image, scale_image, factor)
}

fn scale_image<const C: usize>(
    src: &Image<u8, C>,
    factor: f64,
) -> Result<Image<u8, C>, EngineError> {
    let (cols, rows) = (src.cols(), src.rows());
    let new_cols = scaled_len(cols, factor)?;
    let new_rows = scaled_len(rows, factor)?;

    if new_cols as u64 * new_rows as u64 > MAX_SCALED_PIXELS {
        return Err(EngineError::invalid(
            "scale",
            factor,
            format!(
                "scaled image of {new_cols}x{new_rows} exceeds {MAX_SCALED_PIXELS} pixels"
            ),
        ));
    }

    if new_cols == cols && new_rows == rows {
        return Ok(src.clone());
    }

    let mut resized = Image::<u8, C>::from_size_val([new_cols, new_rows].into(), 0)?;
    resize::resize_fast(src, &mut resized, InterpolationMode::Lanczos3)?;

    let mut dst = Image::from_size_val(src.size(), WHITE)?;
    paste(&resized, &mut dst, centered_offset(cols, new_cols), centered_offset(rows, new_rows));

    Ok(dst)
}

/// `max(1, floor(len * factor))`, bounded by the resizer limit of `u32::MAX` pixels.
fn scaled_len(len: usize, factor: f64) -> Result<usize, EngineError> {
    let scaled = (len as f64 * factor).floor();
    if scaled > u32::MAX as f64 {
        return Err(EngineError::invalid(
            "scale",
            factor,
            format!("scaled side of {scaled} pixels exceeds {}", u32::MAX),
        ));
    }
    Ok((scaled as usize).max(1))
}

/// Offset that centers a span of `inner` pixels in `outer` pixels, rounded down.
fn centered_offset(outer: usize, inner: usize) -> i64 {
    (outer as i64 - inner as i64).div_euclid(2)
}

/// Copy `patch` into `canvas` with its top-left corner at `(x0, y0)`, clipping what
/// falls outside the canvas.
fn paste<const C: usize>(patch: &Image<u8, C>, canvas: &mut Image<u8, C>, x0: i64, y0: i64) {
    let (canvas_cols, canvas_rows) = (canvas.cols() as i64, canvas.rows() as i64);
    let (patch_cols, patch_rows) = (patch.cols() as i64, patch.rows() as i64);

    let x_start = x0.max(0);
    let x_end = (x0 + patch_cols).min(canvas_cols);
    let y_start = y0.max(0);
    let y_end = (y0 + patch_rows).min(canvas_rows);

    if x_start >= x_end || y_start >= y_end {
        return;
    }

    let span = (x_end - x_start) as usize * C;
    let patch_data = patch.as_slice();
    let canvas_data = canvas.as_slice_mut();

    for y in y_start..y_end {
        let src_offset = (((y - y0) * patch_cols + (x_start - x0)) as usize) * C;
        let dst_offset = ((y * canvas_cols + x_start) as usize) * C;
        canvas_data[dst_offset..dst_offset + span]
            .copy_from_slice(&patch_data[src_offset..src_offset + span]);
    }
}

/// Flip an image horizontally.
pub fn mirror(image: &RasterImage) -> Result<RasterImage, EngineError> {
    map_raster!(image, mirror_image)
}

fn mirror_image<const C: usize>(src: &Image<u8, C>) -> Result<Image<u8, C>, EngineError> {
    let mut dst = Image::from_size_val(src.size(), 0)?;
    flip::horizontal_flip(src, &mut dst)?;
    Ok(dst)
}
