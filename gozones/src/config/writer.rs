//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::fmt::Write;
use std::path::Path;

use super::parser::LAYER_SECTION_PREFIX;
use super::settings::ConfigFile;
use crate::layer::LayerSpec;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let map = &config.map;
    let geocoder = &config.geocoder;

    let mut out = format!(
        r#"[map]
; Initial view when the map opens
center_lat = {}
center_lng = {}
zoom = {}
; The view is never zoomed outside this range
min_zoom = {}
max_zoom = {}
; Base tile layer ({{s}}, {{z}}, {{x}}, {{y}} are filled in by the map)
tile_url = {}
tile_attribution = {}
tile_max_zoom = {}

[layers]
; Relative layer sources are loaded from this URL
base_url = {}

[geocoder]
; Primary geocoder (US Census one-line address endpoint)
census_url = {}
census_benchmark = {}
; Secondary geocoder, tried when the primary finds nothing
nominatim_url = {}
; Sent as User-Agent to the secondary geocoder, which requires one
user_agent = {}
; Seconds to wait for each geocoder before moving on
timeout = {}
; Transport timeout for all HTTP requests, in seconds
http_timeout = {}

[logging]
file = {}
"#,
        map.center.lat,
        map.center.lng,
        map.zoom,
        map.min_zoom,
        map.max_zoom,
        map.base_layer.url_template,
        map.base_layer.attribution,
        map.base_layer.max_zoom,
        config.layers.base_url,
        geocoder.census_url,
        geocoder.census_benchmark,
        geocoder.nominatim_url,
        geocoder.user_agent,
        geocoder.timeout_secs,
        geocoder.http_timeout_secs,
        path_to_string(&config.logging.file),
    );

    out.push_str(
        "\n; Zone layers, one [layer.<key>] section each, drawn in this order.\n\
         ; visible = true shows the layer when the map opens.\n",
    );
    for spec in &config.layers.specs {
        write_layer(&mut out, spec);
    }

    out
}

fn write_layer(out: &mut String, spec: &LayerSpec) {
    let style = &spec.style;
    // Writing to a String cannot fail
    let _ = write!(
        out,
        "\n[{}{}]\ntitle = {}\nsource = {}\nstroke_color = {}\nfill_color = {}\nfill_opacity = {}\nstroke_weight = {}\nvisible = {}\n",
        LAYER_SECTION_PREFIX,
        spec.key,
        spec.title,
        spec.source,
        style.stroke_color,
        style.fill_color,
        style.fill_opacity,
        style.stroke_weight,
        spec.start_visible,
    );
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
