//! Parameter schema and validated parameter sets.
//!
//! Every tunable value of the engine is declared once in [`PARAMETER_CATALOG`] with its
//! kind, range and default. A [`ParameterSet`] only ever holds catalog names with
//! in-range values, and the per-category views re-check the domain constraints the
//! operations enforce so that hand-built views are rejected before any computation.

use std::collections::BTreeMap;

use crate::category::Category;
use crate::error::EngineError;

/// Slider resolution of floating point parameters.
pub const FLOAT_STEP: f64 = 0.1;

/// Numeric kind of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Whole numbers only.
    Int,
    /// Floating point, with a [`FLOAT_STEP`] slider resolution.
    Float,
}

/// Declaration of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Parameter name, the key used in a [`ParameterSet`].
    pub name: &'static str,
    /// Numeric kind.
    pub kind: ParamKind,
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value.
    pub max: f64,
    /// Value used until set.
    pub default: f64,
    /// Category whose transforms consume the parameter.
    pub category: Category,
}

impl ParamSpec {
    const fn int(name: &'static str, min: f64, max: f64, default: f64, category: Category) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            min,
            max,
            default,
            category,
        }
    }

    const fn float(
        name: &'static str,
        min: f64,
        max: f64,
        default: f64,
        category: Category,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            min,
            max,
            default,
            category,
        }
    }

    fn default_value(&self) -> ParamValue {
        match self.kind {
            ParamKind::Int => ParamValue::Int(self.default as i64),
            ParamKind::Float => ParamValue::Float(self.default),
        }
    }
}

/// Every parameter the engine understands.
pub static PARAMETER_CATALOG: &[ParamSpec] = &[
    ParamSpec::int("translate_x", -100.0, 100.0, 0.0, Category::Geometric),
    ParamSpec::int("translate_y", -100.0, 100.0, 0.0, Category::Geometric),
    ParamSpec::int("rotate", 0.0, 360.0, 90.0, Category::Geometric),
    ParamSpec::float("scale", 0.1, 3.0, 1.0, Category::Geometric),
    ParamSpec::float("brightness", 0.1, 3.0, 1.0, Category::Enhance),
    ParamSpec::float("contrast", 0.1, 3.0, 1.0, Category::Enhance),
    ParamSpec::int("mean_radius", 1.0, 20.0, 3.0, Category::Smooth),
    ParamSpec::int("gaussian_radius", 1.0, 20.0, 3.0, Category::Smooth),
    ParamSpec::int("median_radius", 1.0, 20.0, 3.0, Category::Smooth),
    ParamSpec::int("threshold", 0.0, 255.0, 128.0, Category::Segment),
    ParamSpec::int("edge_low", 0.0, 255.0, 50.0, Category::Segment),
    ParamSpec::int("edge_high", 0.0, 255.0, 150.0, Category::Segment),
    ParamSpec::int("region_threshold", 0.0, 255.0, 30.0, Category::Segment),
];

/// Look up a parameter declaration by name.
pub fn param_spec(name: &str) -> Result<&'static ParamSpec, EngineError> {
    PARAMETER_CATALOG
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| EngineError::UnknownParameter(name.to_string()))
}

/// A parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    /// An integer value.
    Int(i64),
    /// A floating point value.
    Float(f64),
}

impl ParamValue {
    /// The value as a float.
    pub fn as_f64(&self) -> f64 {
        match *self {
            ParamValue::Int(v) => v as f64,
            ParamValue::Float(v) => v,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v as f64)
    }
}

/// A validated mapping from parameter name to value.
///
/// The set always holds every catalog parameter. Values can only be changed through
/// [`ParameterSet::set`], which rejects unknown names and out-of-range values, or
/// [`ParameterSet::set_clamped`], which coerces values into range.
///
/// # Example
///
/// ```
/// use pixlab_studio::{EngineError, ParameterSet};
///
/// let mut params = ParameterSet::default();
/// params.set("mean_radius", 5)?;
/// assert_eq!(params.smooth()?.mean_radius, 5);
///
/// assert!(params.set("mean_radius", 50).is_err());
/// assert!(params.set("sharpness", 1.0).is_err());
/// # Ok::<(), EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "BTreeMap<String, ParamValue>",
        into = "BTreeMap<String, ParamValue>"
    )
)]
pub struct ParameterSet {
    values: BTreeMap<&'static str, ParamValue>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            values: PARAMETER_CATALOG
                .iter()
                .map(|spec| (spec.name, spec.default_value()))
                .collect(),
        }
    }
}

impl ParameterSet {
    /// Set a parameter, rejecting anything outside its declared domain.
    ///
    /// # Errors
    ///
    /// * [`EngineError::UnknownParameter`] if the name is not in the catalog.
    /// * [`EngineError::InvalidParameter`] if the value is not finite, not a whole
    ///   number for an integer parameter, or outside `[min, max]`.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<(), EngineError> {
        let spec = param_spec(name)?;
        let value = value.into();
        let v = value.as_f64();

        if !v.is_finite() {
            return Err(EngineError::invalid(name, value, "value must be finite"));
        }

        if spec.kind == ParamKind::Int && v.fract() != 0.0 {
            return Err(EngineError::invalid(name, value, "expected an integer"));
        }

        if v < spec.min || v > spec.max {
            return Err(EngineError::invalid(
                name,
                value,
                format!("outside [{}, {}]", spec.min, spec.max),
            ));
        }

        let stored = match spec.kind {
            ParamKind::Int => ParamValue::Int(v as i64),
            ParamKind::Float => ParamValue::Float(v),
        };
        self.values.insert(spec.name, stored);

        Ok(())
    }

    /// Set a parameter from a slider position, coercing it into range.
    ///
    /// Integer parameters are rounded to the nearest whole number and float parameters
    /// to the slider step, then clamped to `[min, max]`.
    ///
    /// # Returns
    ///
    /// The value actually stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or the value is NaN.
    pub fn set_clamped(&mut self, name: &str, value: f64) -> Result<ParamValue, EngineError> {
        let spec = param_spec(name)?;

        if value.is_nan() {
            return Err(EngineError::invalid(name, value, "value must be a number"));
        }

        let snapped = match spec.kind {
            ParamKind::Int => value.round(),
            ParamKind::Float => (value / FLOAT_STEP).round() / (1.0 / FLOAT_STEP),
        };
        let clamped = snapped.clamp(spec.min, spec.max);

        if clamped != value {
            log::warn!(
                "parameter `{}` = {} coerced to {} (range [{}, {}])",
                name,
                value,
                clamped,
                spec.min,
                spec.max
            );
        }

        let stored = match spec.kind {
            ParamKind::Int => ParamValue::Int(clamped as i64),
            ParamKind::Float => ParamValue::Float(clamped),
        };
        self.values.insert(spec.name, stored);

        Ok(stored)
    }

    /// Get the value of a parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not in the catalog.
    pub fn get(&self, name: &str) -> Result<ParamValue, EngineError> {
        let spec = param_spec(name)?;
        Ok(self
            .values
            .get(spec.name)
            .copied()
            .unwrap_or_else(|| spec.default_value()))
    }

    fn get_int(&self, name: &str) -> Result<i32, EngineError> {
        match self.get(name)? {
            ParamValue::Int(v) => i32::try_from(v)
                .map_err(|_| EngineError::invalid(name, v, "does not fit in 32 bits")),
            value @ ParamValue::Float(_) => {
                Err(EngineError::invalid(name, value, "expected an integer"))
            }
        }
    }

    fn get_float(&self, name: &str) -> Result<f64, EngineError> {
        Ok(self.get(name)?.as_f64())
    }

    /// Iterate over all parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        self.values.iter().map(|(&name, &value)| (name, value))
    }

    /// The parameters of the geometric transforms.
    pub fn geometric(&self) -> Result<GeometricParams, EngineError> {
        Ok(GeometricParams {
            translate_x: self.get_int("translate_x")?,
            translate_y: self.get_int("translate_y")?,
            rotate: self.get_int("rotate")?,
            scale: self.get_float("scale")?,
        })
    }

    /// The parameters of the enhancement transforms.
    pub fn enhance(&self) -> Result<EnhanceParams, EngineError> {
        Ok(EnhanceParams {
            brightness: self.get_float("brightness")? as f32,
            contrast: self.get_float("contrast")? as f32,
        })
    }

    /// The parameters of the smoothing filters.
    pub fn smooth(&self) -> Result<SmoothParams, EngineError> {
        Ok(SmoothParams {
            mean_radius: self.get_int("mean_radius")?,
            gaussian_radius: self.get_int("gaussian_radius")?,
            median_radius: self.get_int("median_radius")?,
        })
    }

    /// The parameters of the segmentation transforms.
    pub fn segment(&self) -> Result<SegmentParams, EngineError> {
        Ok(SegmentParams {
            threshold: self.get_int("threshold")?,
            edge_low: self.get_int("edge_low")?,
            edge_high: self.get_int("edge_high")?,
            region_threshold: self.get_int("region_threshold")?,
        })
    }
}

impl TryFrom<BTreeMap<String, ParamValue>> for ParameterSet {
    type Error = EngineError;

    /// Start from the defaults and apply every entry with [`ParameterSet::set`].
    fn try_from(map: BTreeMap<String, ParamValue>) -> Result<Self, Self::Error> {
        let mut params = ParameterSet::default();
        for (name, value) in map {
            params.set(&name, value)?;
        }
        Ok(params)
    }
}

impl From<ParameterSet> for BTreeMap<String, ParamValue> {
    fn from(params: ParameterSet) -> Self {
        params
            .values
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

pub(crate) fn check_unit_range(name: &str, value: i32) -> Result<(), EngineError> {
    if !(0..=255).contains(&value) {
        return Err(EngineError::invalid(name, value, "outside [0, 255]"));
    }
    Ok(())
}

pub(crate) fn check_radius(name: &str, radius: i32) -> Result<(), EngineError> {
    if radius <= 0 {
        return Err(EngineError::invalid(name, radius, "radius must be at least 1"));
    }
    Ok(())
}

pub(crate) fn check_factor(name: &str, factor: f32) -> Result<(), EngineError> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(EngineError::invalid(
            name,
            factor,
            "factor must be finite and not negative",
        ));
    }
    Ok(())
}

/// Parameters of the geometric category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricParams {
    /// Horizontal shift in pixels.
    pub translate_x: i32,
    /// Vertical shift in pixels.
    pub translate_y: i32,
    /// Counter-clockwise rotation in degrees.
    pub rotate: i32,
    /// Scale factor, kept in double precision so `floor(W * scale)` matches the decimal
    /// slider value.
    pub scale: f64,
}

impl GeometricParams {
    /// Check the values against the domains of the geometric transforms.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(EngineError::invalid(
                "scale",
                self.scale,
                "factor must be finite and positive",
            ));
        }
        Ok(())
    }
}

/// Parameters of the enhance category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhanceParams {
    /// Brightness factor.
    pub brightness: f32,
    /// Contrast factor.
    pub contrast: f32,
}

impl EnhanceParams {
    /// Check the values against the domains of the enhancement transforms.
    pub fn validate(&self) -> Result<(), EngineError> {
        check_factor("brightness", self.brightness)?;
        check_factor("contrast", self.contrast)
    }
}

/// Parameters of the smooth category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    /// Radius of the mean filter.
    pub mean_radius: i32,
    /// Radius of the gaussian filter.
    pub gaussian_radius: i32,
    /// Radius of the median filter.
    pub median_radius: i32,
}

impl SmoothParams {
    /// Check the values against the domains of the smoothing filters.
    pub fn validate(&self) -> Result<(), EngineError> {
        check_radius("mean_radius", self.mean_radius)?;
        check_radius("gaussian_radius", self.gaussian_radius)?;
        check_radius("median_radius", self.median_radius)
    }
}

/// Parameters of the segment category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentParams {
    /// Global threshold.
    pub threshold: i32,
    /// Lower Canny threshold.
    pub edge_low: i32,
    /// Upper Canny threshold.
    pub edge_high: i32,
    /// Similarity threshold of region growing.
    pub region_threshold: i32,
}

impl SegmentParams {
    /// Check the values against the domains of the segmentation transforms.
    pub fn validate(&self) -> Result<(), EngineError> {
        check_unit_range("threshold", self.threshold)?;
        check_unit_range("edge_low", self.edge_low)?;
        check_unit_range("edge_high", self.edge_high)?;
        check_unit_range("region_threshold", self.region_threshold)?;
        if self.edge_low > self.edge_high {
            return Err(EngineError::invalid(
                "edge_low",
                self.edge_low,
                format!("greater than edge_high ({})", self.edge_high),
            ));
        }
        Ok(())
    }
}
