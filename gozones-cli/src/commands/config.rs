//! Configuration CLI commands.
//!
//! Provides `config path` and `config show`.

use std::path::Path;

use clap::Subcommand;
use gozones::config::ConfigFile;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration (file values over defaults)
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(config_path),
        ConfigCommands::Show => run_show(config_path),
    }
}

fn run_path(config_path: &Path) -> Result<(), CliError> {
    println!("{}", config_path.display());
    Ok(())
}

fn run_show(config_path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(config_path)?;
    print!("{}", describe(&config));
    Ok(())
}

/// Human-readable listing of every setting.
fn describe(config: &ConfigFile) -> String {
    let map = &config.map;
    let geocoder = &config.geocoder;
    let mut lines = vec![
        "[map]".to_string(),
        format!("  center = {}", map.center),
        format!(
            "  zoom = {} (range {}-{})",
            map.zoom, map.min_zoom, map.max_zoom
        ),
        format!("  tile_url = {}", map.base_layer.url_template),
        format!("  tile_attribution = {}", map.base_layer.attribution),
        String::new(),
        "[layers]".to_string(),
        format!("  base_url = {}", config.layers.base_url),
    ];

    for spec in &config.layers.specs {
        lines.push(format!(
            "  {} = {} [{}] fill {} @ {}, stroke {} {}px{}",
            spec.key,
            spec.title,
            spec.source,
            spec.style.fill_color,
            spec.style.fill_opacity,
            spec.style.stroke_color,
            spec.style.stroke_weight,
            if spec.start_visible { ", visible" } else { "" }
        ));
    }

    lines.extend([
        String::new(),
        "[geocoder]".to_string(),
        format!(
            "  primary = {} (benchmark {})",
            geocoder.census_url, geocoder.census_benchmark
        ),
        format!("  secondary = {}", geocoder.nominatim_url),
        format!("  user_agent = {}", geocoder.user_agent),
        format!(
            "  timeout = {}s per geocoder, {}s per request",
            geocoder.timeout_secs, geocoder.http_timeout_secs
        ),
        String::new(),
        "[logging]".to_string(),
        format!("  file = {}", config.logging.file.display()),
    ]);

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
