use std::time::Instant;

use pixlab_image::RasterImage;
use pixlab_imgproc::parallel::{join_with, ExecutionStrategy};

use crate::category::Category;
use crate::error::EngineError;
use crate::params::ParameterSet;
use crate::segment::SeedPoint;
use crate::{enhance, geometric, segment, smooth};

/// One output of a transform request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    /// The transformed image.
    pub image: RasterImage,
    /// Human readable caption with the parameters used.
    pub label: String,
}

impl TransformResult {
    /// Create a new result.
    pub fn new(image: RasterImage, label: impl Into<String>) -> Self {
        Self {
            image,
            label: label.into(),
        }
    }
}

/// Options of a [`TransformDispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOptions {
    /// How the four operations of a request are scheduled.
    pub strategy: ExecutionStrategy,
}

type Job<'a> = Box<dyn FnOnce() -> Result<TransformResult, EngineError> + Send + 'a>;

/// Turns a category and a parameter set into four labelled results.
///
/// The dispatcher holds no state between requests: the same input always yields the
/// same results, in this order:
///
/// | category  | 1             | 2                | 3               | 4        |
/// |-----------|---------------|------------------|-----------------|----------|
/// | geometric | translate     | rotate           | scale           | mirror   |
/// | enhance   | grayscale     | brightness       | contrast        | equalize |
/// | smooth    | mean          | gaussian         | median          | original |
/// | segment   | canny edges   | threshold        | region growing  | original |
///
/// # Example
///
/// ```
/// use pixlab_studio::{Category, ColorMode, ParameterSet, RasterImage, TransformDispatcher};
///
/// let image = RasterImage::from_size_val([16, 16].into(), ColorMode::Rgb, 128)?;
/// let dispatcher = TransformDispatcher::default();
///
/// let results = dispatcher.dispatch(Some(&image), Category::Smooth, &ParameterSet::default())?;
/// assert_eq!(results[0].label, "Mean filter (radius: 3)");
/// assert_eq!(results[3].image, image);
/// # Ok::<(), pixlab_studio::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransformDispatcher {
    options: DispatchOptions,
}

impl TransformDispatcher {
    /// Create a dispatcher with the given options.
    pub fn new(options: DispatchOptions) -> Self {
        Self { options }
    }

    /// Create a dispatcher that schedules work with `strategy`.
    pub fn with_strategy(strategy: ExecutionStrategy) -> Self {
        Self::new(DispatchOptions { strategy })
    }

    /// The options of the dispatcher.
    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Run the four transforms of `category` on `source`.
    ///
    /// Parameters are validated before any image is processed.
    ///
    /// # Arguments
    ///
    /// * `source` - The loaded image, if any.
    /// * `category` - The transform family to run.
    /// * `params` - The current parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if no image is loaded, a parameter is outside the domain of its
    /// operation, an operation fails or the worker pool cannot be built.
    pub fn dispatch(
        &self,
        source: Option<&RasterImage>,
        category: Category,
        params: &ParameterSet,
    ) -> Result<[TransformResult; 4], EngineError> {
        let image = source.ok_or_else(EngineError::no_image)?;

        let start = Instant::now();
        let jobs = match category {
            Category::Geometric => geometric_jobs(image, params)?,
            Category::Enhance => enhance_jobs(image, params)?,
            Category::Smooth => smooth_jobs(image, params)?,
            Category::Segment => segment_jobs(image, params)?,
        };
        let results = run_jobs(self.options.strategy, jobs)?;

        log::debug!(
            "dispatched {} on {} {} image in {:?}",
            category,
            image.size(),
            image.color_mode(),
            start.elapsed()
        );

        Ok(results)
    }
}

/// Run the four transforms of `category` with the default options.
///
/// See [`TransformDispatcher::dispatch`].
pub fn dispatch(
    source: Option<&RasterImage>,
    category: Category,
    params: &ParameterSet,
) -> Result<[TransformResult; 4], EngineError> {
    TransformDispatcher::default().dispatch(source, category, params)
}

/// Run four jobs as two pairs, keeping their order.
fn run_jobs(
    strategy: ExecutionStrategy,
    jobs: [Job<'_>; 4],
) -> Result<[TransformResult; 4], EngineError> {
    let [a, b, c, d] = jobs;
    let inner = strategy.nested();

    let (first, second) = join_with(
        strategy,
        || join_with(inner, a, b),
        || join_with(inner, c, d),
    )?;
    let (ra, rb) = first?;
    let (rc, rd) = second?;

    Ok([ra?, rb?, rc?, rd?])
}

fn comparison(image: &RasterImage) -> Job<'_> {
    Box::new(move || Ok(TransformResult::new(image.clone(), "Original (comparison)")))
}

fn geometric_jobs<'a>(
    image: &'a RasterImage,
    params: &ParameterSet,
) -> Result<[Job<'a>; 4], EngineError> {
    let p = params.geometric()?;
    p.validate()?;

    let jobs: [Job<'a>; 4] = [
        Box::new(move || {
            geometric::translate(image, p.translate_x, p.translate_y).map(|img| {
                TransformResult::new(
                    img,
                    format!("Translate (x: {}, y: {})", p.translate_x, p.translate_y),
                )
            })
        }),
        Box::new(move || {
            geometric::rotate(image, p.rotate as f32)
                .map(|img| TransformResult::new(img, format!("Rotate (angle: {}°)", p.rotate)))
        }),
        Box::new(move || {
            geometric::scale(image, p.scale)
                .map(|img| TransformResult::new(img, format!("Scale (factor: {:.1})", p.scale)))
        }),
        Box::new(move || geometric::mirror(image).map(|img| TransformResult::new(img, "Mirror"))),
    ];

    Ok(jobs)
}

fn enhance_jobs<'a>(
    image: &'a RasterImage,
    params: &ParameterSet,
) -> Result<[Job<'a>; 4], EngineError> {
    let p = params.enhance()?;
    p.validate()?;

    let jobs: [Job<'a>; 4] = [
        Box::new(move || {
            enhance::grayscale(image).map(|img| TransformResult::new(img, "Grayscale"))
        }),
        Box::new(move || {
            enhance::adjust_brightness(image, p.brightness).map(|img| {
                TransformResult::new(img, format!("Brightness (factor: {:.1})", p.brightness))
            })
        }),
        Box::new(move || {
            enhance::adjust_contrast(image, p.contrast).map(|img| {
                TransformResult::new(img, format!("Contrast (factor: {:.1})", p.contrast))
            })
        }),
        Box::new(move || {
            enhance::equalize(image).map(|img| TransformResult::new(img, "Histogram equalization"))
        }),
    ];

    Ok(jobs)
}

fn smooth_jobs<'a>(
    image: &'a RasterImage,
    params: &ParameterSet,
) -> Result<[Job<'a>; 4], EngineError> {
    let p = params.smooth()?;
    p.validate()?;

    let jobs: [Job<'a>; 4] = [
        Box::new(move || {
            smooth::mean_filter(image, p.mean_radius).map(|img| {
                TransformResult::new(img, format!("Mean filter (radius: {})", p.mean_radius))
            })
        }),
        Box::new(move || {
            smooth::gaussian_filter(image, p.gaussian_radius).map(|img| {
                TransformResult::new(
                    img,
                    format!("Gaussian filter (radius: {})", p.gaussian_radius),
                )
            })
        }),
        Box::new(move || {
            smooth::median_filter(image, p.median_radius).map(|img| {
                TransformResult::new(img, format!("Median filter (radius: {})", p.median_radius))
            })
        }),
        comparison(image),
    ];

    Ok(jobs)
}

fn segment_jobs<'a>(
    image: &'a RasterImage,
    params: &ParameterSet,
) -> Result<[Job<'a>; 4], EngineError> {
    let p = params.segment()?;
    p.validate()?;
    let seed = SeedPoint::center_of(image);

    let jobs: [Job<'a>; 4] = [
        Box::new(move || {
            segment::canny_edge(image, p.edge_low, p.edge_high).map(|img| {
                TransformResult::new(
                    img,
                    format!("Canny edges (thresholds: {}-{})", p.edge_low, p.edge_high),
                )
            })
        }),
        Box::new(move || {
            segment::threshold_segment(image, p.threshold).map(|img| {
                TransformResult::new(img, format!("Threshold (value: {})", p.threshold))
            })
        }),
        Box::new(move || {
            segment::region_growing(image, seed, p.region_threshold).map(|img| {
                TransformResult::new(
                    img,
                    format!("Region growing (threshold: {})", p.region_threshold),
                )
            })
        }),
        comparison(image),
    ];

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixlab_image::{ColorMode, Image, ImageSize};

    fn gradient() -> Result<RasterImage, EngineError> {
        let (width, height) = (24, 16);
        let data = (0..width * height)
            .flat_map(|i| {
                let (x, y) = (i % width, i / width);
                [(x * 10) as u8, (y * 15) as u8, 90]
            })
            .collect();
        Ok(Image::<u8, 3>::new(ImageSize { width, height }, data)?.into())
    }

    fn labels(results: &[TransformResult; 4]) -> Vec<&str> {
        results.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn default_labels() -> Result<(), EngineError> {
        let image = gradient()?;
        let params = ParameterSet::default();

        let results = dispatch(Some(&image), Category::Geometric, &params)?;
        assert_eq!(
            labels(&results),
            [
                "Translate (x: 0, y: 0)",
                "Rotate (angle: 90°)",
                "Scale (factor: 1.0)",
                "Mirror"
            ]
        );

        let results = dispatch(Some(&image), Category::Enhance, &params)?;
        assert_eq!(
            labels(&results),
            [
                "Grayscale",
                "Brightness (factor: 1.0)",
                "Contrast (factor: 1.0)",
                "Histogram equalization"
            ]
        );
        assert_eq!(results[0].image.color_mode(), ColorMode::Gray);
        assert_eq!(results[1].image, image);
        assert_eq!(results[3].image.color_mode(), ColorMode::Gray);

        let results = dispatch(Some(&image), Category::Smooth, &params)?;
        assert_eq!(
            labels(&results),
            [
                "Mean filter (radius: 3)",
                "Gaussian filter (radius: 3)",
                "Median filter (radius: 3)",
                "Original (comparison)"
            ]
        );

        let results = dispatch(Some(&image), Category::Segment, &params)?;
        assert_eq!(
            labels(&results),
            [
                "Canny edges (thresholds: 50-150)",
                "Threshold (value: 128)",
                "Region growing (threshold: 30)",
                "Original (comparison)"
            ]
        );
        assert_eq!(results[3].image, image);

        Ok(())
    }

    #[test]
    fn labels_follow_parameters() -> Result<(), EngineError> {
        let image = gradient()?;
        let mut params = ParameterSet::default();
        params.set("translate_x", -12)?;
        params.set("translate_y", 7)?;
        params.set("rotate", 45)?;
        params.set("scale", 0.5)?;

        let results = dispatch(Some(&image), Category::Geometric, &params)?;
        assert_eq!(results[0].label, "Translate (x: -12, y: 7)");
        assert_eq!(results[1].label, "Rotate (angle: 45°)");
        assert_eq!(results[2].label, "Scale (factor: 0.5)");

        Ok(())
    }

    #[test]
    fn missing_image() {
        let params = ParameterSet::default();
        for category in Category::ALL {
            assert_eq!(
                dispatch(None, category, &params),
                Err(EngineError::no_image())
            );
        }
    }

    #[test]
    fn zero_thread_pool_is_an_error() -> Result<(), EngineError> {
        let image = gradient()?;
        let dispatcher = TransformDispatcher::with_strategy(ExecutionStrategy::Fixed(0));
        assert!(matches!(
            dispatcher.dispatch(Some(&image), Category::Smooth, &ParameterSet::default()),
            Err(EngineError::Parallel(_))
        ));
        Ok(())
    }
}
