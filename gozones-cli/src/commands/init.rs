//! Init command - initialize configuration file.

use std::path::Path;

use gozones::config::ConfigFile;

use crate::error::CliError;

/// Run the init command.
pub fn run(config_path: &Path) -> Result<(), CliError> {
    let created = ConfigFile::ensure_exists(config_path)?;

    if created {
        println!("Created configuration file: {}", config_path.display());
    } else {
        println!("Configuration file already exists: {}", config_path.display());
    }
    println!();
    println!("Edit this file to change the initial view, zone layers or geocoders.");
    println!("Layer sources are resolved against [layers] base_url.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_once() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        run(&path).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        assert!(first.contains("[layer.publix15]"));

        std::fs::write(&path, "[map]\nzoom = 7\n").unwrap();
        run(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[map]\nzoom = 7\n");
    }
}
