//! Layer descriptors.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Problems with a layer descriptor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("Layer key '{0}' must be non-empty and contain no whitespace")]
    InvalidKey(String),

    #[error("Layer '{key}': {reason}")]
    InvalidStyle { key: String, reason: String },

    #[error("Layer '{0}' has no source")]
    MissingSource(String),
}

/// Stable identifier for one toggle-able overlay.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerKey(String);

impl LayerKey {
    /// Creates a key, rejecting empty or whitespace-bearing names.
    pub fn new(key: impl Into<String>) -> Result<Self, SpecError> {
        let key = key.into();
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(SpecError::InvalidKey(key));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LayerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap())
}

/// How a layer is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    pub stroke_color: String,
    pub fill_color: String,
    /// 0.0 (transparent) to 1.0 (opaque).
    pub fill_opacity: f64,
    /// Outline width in pixels.
    pub stroke_weight: f64,
}

impl StyleSpec {
    /// Same color for outline and fill, 2px outline.
    pub fn solid(color: &str, fill_opacity: f64) -> Self {
        Self {
            stroke_color: color.to_string(),
            fill_color: color.to_string(),
            fill_opacity,
            stroke_weight: 2.0,
        }
    }

    fn validate(&self, key: &LayerKey) -> Result<(), SpecError> {
        let invalid = |reason: String| SpecError::InvalidStyle {
            key: key.to_string(),
            reason,
        };

        for (name, color) in [
            ("stroke_color", &self.stroke_color),
            ("fill_color", &self.fill_color),
        ] {
            if !color_pattern().is_match(color) {
                return Err(invalid(format!(
                    "{} '{}' is not a #rgb or #rrggbb color",
                    name, color
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(invalid(format!(
                "fill_opacity {} is outside 0 to 1",
                self.fill_opacity
            )));
        }
        if !self.stroke_weight.is_finite() || self.stroke_weight < 0.0 {
            return Err(invalid(format!(
                "stroke_weight {} must be a non-negative number",
                self.stroke_weight
            )));
        }
        Ok(())
    }
}

/// Immutable description of one zone layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub key: LayerKey,
    /// Label shown next to the toggle.
    pub title: String,
    /// Absolute URL, or a path relative to the registry's base URL.
    pub source: String,
    pub style: StyleSpec,
    pub start_visible: bool,
}

impl LayerSpec {
    /// Creates and validates a layer spec titled with its key.
    pub fn new(
        key: &str,
        source: impl Into<String>,
        style: StyleSpec,
        start_visible: bool,
    ) -> Result<Self, SpecError> {
        let key = LayerKey::new(key)?;
        let spec = Self {
            title: key.to_string(),
            key,
            source: source.into(),
            style,
            start_visible,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Replaces the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Checks the source and style.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.source.trim().is_empty() {
            return Err(SpecError::MissingSource(self.key.to_string()));
        }
        self.style.validate(&self.key)
    }
}

/// The seven zone shells of the Florida deployment.
///
/// Grocery distance rings first (Publix shown at start), then the geology
/// tiers (hidden at start).
pub fn default_layers() -> Vec<LayerSpec> {
    let layer = |key: &str, title: &str, source: &str, color: &str, opacity: f64, visible| {
        LayerSpec {
            key: LayerKey(key.to_string()),
            title: title.to_string(),
            source: source.to_string(),
            style: StyleSpec::solid(color, opacity),
            start_visible: visible,
        }
    };

    vec![
        layer("publix15", "Publix ≤15 mi", "data/Publix_15mi.geojson", "#ff0000", 0.5, true),
        layer("publix25", "Publix ≤25 mi", "data/Publix_25mi.geojson", "#ff0000", 0.3, true),
        layer("wf30", "Whole Foods ≤30 mi", "data/WF_30mi.geojson", "#0000ff", 0.5, false),
        layer("wf50", "Whole Foods ≤50 mi", "data/WF_50mi.geojson", "#0000ff", 0.3, false),
        layer(
            "geo_upland",
            "Geology: upland / ridge",
            "data/geology_upland_union.geojson",
            "#2E7D32",
            0.12,
            false,
        ),
        layer(
            "geo_karst",
            "Geology: karst caution",
            "data/geology_karst_union.geojson",
            "#F9A825",
            0.22,
            false,
        ),
        layer(
            "geo_lowland",
            "Geology: lowland / coastal no-go",
            "data/geology_lowland_union.geojson",
            "#C62828",
            0.35,
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rejects_blank_and_whitespace() {
        assert!(LayerKey::new("wf30").is_ok());
        assert_eq!(LayerKey::new(""), Err(SpecError::InvalidKey(String::new())));
        assert!(LayerKey::new("wf 30").is_err());
    }

    #[test]
    fn test_spec_title_defaults_to_key() {
        let spec = LayerSpec::new("tier1", "t.geojson", StyleSpec::solid("#abc", 0.2), true)
            .unwrap();
        assert_eq!(spec.title, "tier1");
        assert_eq!(spec.with_title("Tier 1").title, "Tier 1");
    }

    #[test]
    fn test_style_validation() {
        let bad_color = StyleSpec::solid("red", 0.5);
        assert!(matches!(
            LayerSpec::new("a", "a.geojson", bad_color, true),
            Err(SpecError::InvalidStyle { .. })
        ));

        let bad_opacity = StyleSpec::solid("#ff0000", 1.5);
        assert!(LayerSpec::new("a", "a.geojson", bad_opacity, true).is_err());

        let mut bad_weight = StyleSpec::solid("#ff0000", 0.5);
        bad_weight.stroke_weight = -1.0;
        assert!(LayerSpec::new("a", "a.geojson", bad_weight, true).is_err());
    }

    #[test]
    fn test_missing_source() {
        assert_eq!(
            LayerSpec::new("a", "  ", StyleSpec::solid("#fff", 0.1), true),
            Err(SpecError::MissingSource("a".to_string()))
        );
    }

    #[test]
    fn test_default_layers_are_valid_and_unique() {
        let layers = default_layers();
        assert_eq!(layers.len(), 7);
        for spec in &layers {
            spec.validate().unwrap();
        }
        let visible: Vec<&str> = layers
            .iter()
            .filter(|s| s.start_visible)
            .map(|s| s.key.as_str())
            .collect();
        assert_eq!(visible, vec!["publix15", "publix25"]);

        let mut keys: Vec<&str> = layers.iter().map(|s| s.key.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 7);
    }
}
