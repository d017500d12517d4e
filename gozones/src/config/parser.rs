//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};
use reqwest::Url;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::LatLng;
use crate::layer::{LayerSpec, StyleSpec};

/// Prefix of per-layer section names (`[layer.wf30]`).
pub(super) const LAYER_SECTION_PREFIX: &str = "layer.";

/// Fallback style for layers that name no colors.
const DEFAULT_LAYER_COLOR: &str = "#3388ff";
const DEFAULT_LAYER_OPACITY: f64 = 0.2;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
/// Declaring any `[layer.<key>]` section replaces the built-in layer list.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        let map = &mut config.map;
        let lat = match section.get("center_lat") {
            Some(v) => parse_value("map", "center_lat", v, "must be a number")?,
            None => map.center.lat,
        };
        let lng = match section.get("center_lng") {
            Some(v) => parse_value("map", "center_lng", v, "must be a number")?,
            None => map.center.lng,
        };
        map.center = LatLng::new(lat, lng).map_err(|e| ConfigFileError::InvalidValue {
            section: "map".to_string(),
            key: "center".to_string(),
            value: format!("{}, {}", lat, lng),
            reason: e.to_string(),
        })?;

        if let Some(v) = section.get("zoom") {
            map.zoom = parse_value("map", "zoom", v, "must be an integer from 0 to 255")?;
        }
        if let Some(v) = section.get("min_zoom") {
            map.min_zoom = parse_value("map", "min_zoom", v, "must be an integer from 0 to 255")?;
        }
        if let Some(v) = section.get("max_zoom") {
            map.max_zoom = parse_value("map", "max_zoom", v, "must be an integer from 0 to 255")?;
        }
        if map.min_zoom > map.max_zoom {
            return Err(ConfigFileError::InvalidValue {
                section: "map".to_string(),
                key: "min_zoom".to_string(),
                value: map.min_zoom.to_string(),
                reason: format!("must not exceed max_zoom ({})", map.max_zoom),
            });
        }

        if let Some(v) = non_empty(section, "tile_url") {
            map.base_layer.url_template = v.to_string();
        }
        if let Some(v) = section.get("tile_attribution") {
            map.base_layer.attribution = v.trim().to_string();
        }
        if let Some(v) = section.get("tile_max_zoom") {
            map.base_layer.max_zoom =
                parse_value("map", "tile_max_zoom", v, "must be an integer from 0 to 255")?;
        }
    }

    // [layers] section
    if let Some(section) = ini.section(Some("layers")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            Url::parse(v).map_err(|e| ConfigFileError::InvalidValue {
                section: "layers".to_string(),
                key: "base_url".to_string(),
                value: v.to_string(),
                reason: e.to_string(),
            })?;
            config.layers.base_url = v.to_string();
        }
    }

    // [layer.<key>] sections
    let mut specs = Vec::new();
    let mut seen = HashSet::new();
    for (name, section) in ini.iter() {
        let Some(key) = name.and_then(|n| n.strip_prefix(LAYER_SECTION_PREFIX)) else {
            continue;
        };
        if !seen.insert(key.to_string()) {
            return Err(ConfigFileError::DuplicateLayer(key.to_string()));
        }
        specs.push(parse_layer(key, section)?);
    }
    if !specs.is_empty() {
        config.layers.specs = specs;
    }

    // [geocoder] section
    if let Some(section) = ini.section(Some("geocoder")) {
        let geocoder = &mut config.geocoder;
        if let Some(v) = non_empty(section, "census_url") {
            geocoder.census_url = v.to_string();
        }
        if let Some(v) = non_empty(section, "census_benchmark") {
            geocoder.census_benchmark = v.to_string();
        }
        if let Some(v) = non_empty(section, "nominatim_url") {
            geocoder.nominatim_url = v.to_string();
        }
        if let Some(v) = non_empty(section, "user_agent") {
            geocoder.user_agent = v.to_string();
        }
        if let Some(v) = section.get("timeout") {
            geocoder.timeout_secs = parse_seconds("geocoder", "timeout", v)?;
        }
        if let Some(v) = section.get("http_timeout") {
            geocoder.http_timeout_secs = parse_seconds("geocoder", "http_timeout", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn parse_layer(key: &str, section: &Properties) -> Result<LayerSpec, ConfigFileError> {
    let section_name = format!("{}{}", LAYER_SECTION_PREFIX, key);
    let invalid = |field: &str, value: &str, reason: &str| ConfigFileError::InvalidValue {
        section: section_name.clone(),
        key: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let source = non_empty(section, "source")
        .ok_or_else(|| invalid("source", "", "every layer needs a source path or URL"))?;

    let base_color = non_empty(section, "color").unwrap_or(DEFAULT_LAYER_COLOR);
    let mut style = StyleSpec::solid(base_color, DEFAULT_LAYER_OPACITY);
    if let Some(v) = non_empty(section, "stroke_color") {
        style.stroke_color = v.to_string();
    }
    if let Some(v) = non_empty(section, "fill_color") {
        style.fill_color = v.to_string();
    }
    if let Some(v) = section.get("fill_opacity") {
        style.fill_opacity = parse_value(&section_name, "fill_opacity", v, "must be a number")?;
    }
    if let Some(v) = section.get("stroke_weight") {
        style.stroke_weight = parse_value(&section_name, "stroke_weight", v, "must be a number")?;
    }

    let visible = section.get("visible").map(parse_bool).unwrap_or(false);

    let mut spec = LayerSpec::new(key, source, style, visible).map_err(|e| {
        ConfigFileError::InvalidLayer {
            section: section_name.clone(),
            error: e,
        }
    })?;
    if let Some(title) = non_empty(section, "title") {
        spec = spec.with_title(title);
    }
    Ok(spec)
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
}

fn parse_seconds(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    let secs: u64 = parse_value(section, key, value, "must be a positive integer (seconds)")?;
    if secs == 0 {
        return Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive integer (seconds)".to_string(),
        });
    }
    Ok(secs)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LAYERS_BASE_URL;
    use crate::layer::SpecError;
    use crate::provider::DEFAULT_GEOCODE_TIMEOUT_SECS;

    fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(text).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.layers.specs.len(), 7);
        assert_eq!(config.layers.base_url, DEFAULT_LAYERS_BASE_URL);
    }

    #[test]
    fn test_map_section() {
        let config = parse(
            "[map]\ncenter_lat = 27.0\ncenter_lng = -81.5\nzoom = 8\nmin_zoom = 4\nmax_zoom = 16\ntile_url = https://tiles.test/{z}/{x}/{y}.png\ntile_attribution = Test tiles\n",
        )
        .unwrap();

        assert_eq!(config.map.center, LatLng { lat: 27.0, lng: -81.5 });
        assert_eq!((config.map.zoom, config.map.min_zoom, config.map.max_zoom), (8, 4, 16));
        assert_eq!(
            config.map.base_layer.url_template,
            "https://tiles.test/{z}/{x}/{y}.png"
        );
        assert_eq!(config.map.base_layer.attribution, "Test tiles");
    }

    #[test]
    fn test_map_rejects_bad_values() {
        assert!(matches!(
            parse("[map]\ncenter_lat = 95\n"),
            Err(ConfigFileError::InvalidValue { key, .. }) if key == "center"
        ));
        assert!(matches!(
            parse("[map]\nzoom = close\n"),
            Err(ConfigFileError::InvalidValue { key, .. }) if key == "zoom"
        ));
        assert!(matches!(
            parse("[map]\nmin_zoom = 12\nmax_zoom = 10\n"),
            Err(ConfigFileError::InvalidValue { key, .. }) if key == "min_zoom"
        ));
    }

    #[test]
    fn test_layer_sections_replace_defaults() {
        let config = parse(
            "[layers]\nbase_url = https://zones.test/static/\n\n\
             [layer.tier1]\ntitle = Tier 1\nsource = data/tier1.geojson\ncolor = #2E7D32\nfill_opacity = 0.4\nvisible = yes\n\n\
             [layer.tier2]\nsource = https://cdn.test/tier2.geojson\nstroke_color = #000\nfill_color = #F9A825\nstroke_weight = 1.5\n",
        )
        .unwrap();

        assert_eq!(config.layers.base_url, "https://zones.test/static/");
        let specs = &config.layers.specs;
        assert_eq!(specs.len(), 2);

        assert_eq!(specs[0].key.as_str(), "tier1");
        assert_eq!(specs[0].title, "Tier 1");
        assert_eq!(specs[0].style.fill_color, "#2E7D32");
        assert_eq!(specs[0].style.fill_opacity, 0.4);
        assert!(specs[0].start_visible);

        assert_eq!(specs[1].title, "tier2");
        assert_eq!(specs[1].style.stroke_color, "#000");
        assert_eq!(specs[1].style.fill_color, "#F9A825");
        assert_eq!(specs[1].style.stroke_weight, 1.5);
        assert!(!specs[1].start_visible);
    }

    #[test]
    fn test_layer_without_source() {
        assert!(matches!(
            parse("[layer.tier1]\ncolor = #ff0000\n"),
            Err(ConfigFileError::InvalidValue { key, .. }) if key == "source"
        ));
    }

    #[test]
    fn test_layer_with_bad_style() {
        let result = parse("[layer.tier1]\nsource = a.geojson\nfill_opacity = 2\n");
        assert!(matches!(
            result,
            Err(ConfigFileError::InvalidLayer {
                error: SpecError::InvalidStyle { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_bad_base_url() {
        assert!(matches!(
            parse("[layers]\nbase_url = zones\n"),
            Err(ConfigFileError::InvalidValue { key, .. }) if key == "base_url"
        ));
    }

    #[test]
    fn test_geocoder_section() {
        let config = parse(
            "[geocoder]\nnominatim_url = http://localhost:7070/search\nuser_agent = test-agent/1.0\ntimeout = 4\n",
        )
        .unwrap();

        assert_eq!(config.geocoder.nominatim_url, "http://localhost:7070/search");
        assert_eq!(config.geocoder.user_agent, "test-agent/1.0");
        assert_eq!(config.geocoder.timeout_secs, 4);
        assert_eq!(
            config.geocoder.census_url,
            crate::provider::CENSUS_BASE_URL
        );

        assert!(parse("[geocoder]\ntimeout = 0\n").is_err());
        assert_eq!(
            parse("").unwrap().geocoder.timeout_secs,
            DEFAULT_GEOCODE_TIMEOUT_SECS
        );
    }

    #[test]
    fn test_logging_file() {
        let config = parse("[logging]\nfile = /var/log/gozones/session.log\n").unwrap();
        assert_eq!(
            config.logging.file,
            PathBuf::from("/var/log/gozones/session.log")
        );
    }

    #[test]
    fn test_parse_bool() {
        for v in ["true", "TRUE", "1", "yes", "on"] {
            assert!(parse_bool(v), "{}", v);
        }
        for v in ["false", "0", "no", "off", ""] {
            assert!(!parse_bool(v), "{}", v);
        }
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/logs/a.log"), home.join("logs/a.log"));
        }
    }
}
