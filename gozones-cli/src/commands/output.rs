//! Console formatting shared by the commands.

use console::style;

use gozones::coord::{LatLng, ResolvedPoint};
use gozones::layer::{LayerSnapshot, LoadReport, LoadStatus};
use gozones::resolver::ResolveError;

/// One line per layer: visibility box, key, title and load state.
pub fn format_layer(entry: &LayerSnapshot) -> String {
    let checkbox = if entry.desired_visible { "[x]" } else { "[ ]" };
    let state = match &entry.status {
        LoadStatus::Unloaded => "unloaded".to_string(),
        LoadStatus::Loading => "loading".to_string(),
        LoadStatus::Loaded { features } => {
            let on_map = if entry.visible { "shown" } else { "hidden" };
            format!("{} ({} features)", on_map, features)
        }
        LoadStatus::Failed { reason } => format!("failed: {}", reason),
    };
    format!("{} {:<12} {:<34} {}", checkbox, entry.key, entry.title, state)
}

pub fn print_layers(entries: &[LayerSnapshot]) {
    println!("{}", style("Layers").bold());
    for entry in entries {
        let line = format_layer(entry);
        match entry.status {
            LoadStatus::Failed { .. } => println!("  {}", style(line).red()),
            LoadStatus::Loaded { .. } if entry.visible => println!("  {}", style(line).green()),
            _ => println!("  {}", line),
        }
    }
}

pub fn print_load_report(report: &LoadReport) {
    if report.all_loaded() {
        println!(
            "{} {} layers loaded",
            style("✓").green(),
            report.loaded.len()
        );
        return;
    }
    println!(
        "{} {} layers loaded, {} failed",
        style("!").yellow(),
        report.loaded.len(),
        report.failed.len()
    );
    for (key, error) in &report.failed {
        println!("    {}: {}", key, error);
    }
}

pub fn print_point(point: &ResolvedPoint, view: (LatLng, u8)) {
    println!("{} {}", style("✓").green(), style(&point.label).bold());
    println!("  Position: {:.6}, {:.6}", point.lat, point.lng);
    println!("  Provider: {}", point.provider);
    println!("  View:     {} @ zoom {}", view.0, view.1);
}

/// Acknowledgement block for a failed lookup.
pub fn format_lookup_failure(error: &ResolveError) -> String {
    let (title, detail) = match error {
        ResolveError::NotFound(detail) => ("Location not found", detail.as_str()),
        ResolveError::InvalidInput(detail) => ("Invalid input", detail.as_str()),
        ResolveError::Superseded => ("Search replaced", "A newer search is in progress"),
    };
    format!("{}\n  {}", title, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gozones::layer::LayerKey;

    fn snapshot(status: LoadStatus, desired: bool, visible: bool) -> LayerSnapshot {
        LayerSnapshot {
            key: LayerKey::new("wf30").unwrap(),
            title: "Whole Foods ≤30 mi".to_string(),
            status,
            desired_visible: desired,
            visible,
        }
    }

    #[test]
    fn test_format_loaded_layer() {
        let line = format_layer(&snapshot(LoadStatus::Loaded { features: 3 }, true, true));
        assert!(line.starts_with("[x] wf30"));
        assert!(line.ends_with("shown (3 features)"));
    }

    #[test]
    fn test_format_pending_toggle() {
        let line = format_layer(&snapshot(LoadStatus::Loading, true, false));
        assert!(line.starts_with("[x]"));
        assert!(line.ends_with("loading"));
    }

    #[test]
    fn test_format_failed_layer() {
        let line = format_layer(&snapshot(
            LoadStatus::Failed {
                reason: "Fetch failed: HTTP 404".to_string(),
            },
            false,
            false,
        ));
        assert!(line.starts_with("[ ]"));
        assert!(line.ends_with("failed: Fetch failed: HTTP 404"));
    }

    #[test]
    fn test_lookup_failure_block() {
        let text = format_lookup_failure(&ResolveError::NotFound("nothing matched".to_string()));
        assert_eq!(text, "Location not found\n  nothing matched");
    }
}
