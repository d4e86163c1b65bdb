use crate::error::EngineError;

/// A family of four related transforms shown together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    /// Translate, rotate, scale and mirror.
    Geometric,
    /// Grayscale, brightness, contrast and histogram equalization.
    Enhance,
    /// Mean, gaussian and median filters.
    Smooth,
    /// Canny edges, global threshold and region growing.
    Segment,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Category; 4] = [
        Category::Geometric,
        Category::Enhance,
        Category::Smooth,
        Category::Segment,
    ];

    /// The lowercase name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Geometric => "geometric",
            Category::Enhance => "enhance",
            Category::Smooth => "smooth",
            Category::Segment => "segment",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                EngineError::invalid(
                    "category",
                    s,
                    "expected one of geometric, enhance, smooth, segment",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn category_round_trips_through_str() {
        for category in Category::ALL {
            let parsed: Category = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!("  Smooth ".parse::<Category>().ok(), Some(Category::Smooth));
        assert!("blur".parse::<Category>().is_err());
    }
}
