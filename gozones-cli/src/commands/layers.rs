//! Layers command - load every zone layer and show its state.

use tracing::info;

use gozones::layer::ToggleEffect;

use super::output::{print_layers, print_load_report};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the layers command.
pub struct LayersArgs {
    pub show: Vec<String>,
    pub hide: Vec<String>,
}

/// Run the layers command.
///
/// Toggles are applied while the layers are still loading; each one takes
/// effect as soon as its layer arrives.
pub fn run(runner: &CliRunner, args: LayersArgs) -> Result<(), CliError> {
    runner.log_startup("layers");
    let app = runner.start_app()?;
    let runtime = runner.runtime()?;

    let report = runtime.block_on(async {
        let loading = app.spawn_layer_loading();

        for (keys, visible) in [(&args.hide, false), (&args.show, true)] {
            for key in keys {
                let effect = app.registry().set_visibility(key, visible)?;
                if effect == ToggleEffect::Deferred {
                    info!(key = %key, visible, "Applied once loaded");
                }
            }
        }

        let report = loading
            .await
            .map_err(|e| CliError::Config(format!("layer loading task failed: {}", e)))?;
        Ok::<_, CliError>(report)
    })?;

    print_load_report(&report);
    println!();
    print_layers(&app.registry().entries());
    Ok(())
}
