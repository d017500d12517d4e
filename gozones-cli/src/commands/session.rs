//! Session command - an interactive map session on stdin.
//!
//! Layers load in the background while commands are accepted, so a layer
//! can be shown or hidden before its data has arrived.

use std::io::Write;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use gozones::app::GoZonesApp;
use gozones::coord::ResolvedPoint;
use gozones::layer::ToggleEffect;
use gozones::resolver::ResolveError;

use super::output::{format_lookup_failure, print_layers, print_load_report, print_point};
use crate::error::CliError;
use crate::runner::CliRunner;

const HELP: &str = "\
Commands:
  show KEY          show a zone layer
  hide KEY          hide a zone layer
  layers            list layers and their state
  search ADDRESS    find an address and mark it
  plot LAT, LNG     mark coordinates
  clear             remove the marker
  status            show the lookup status and view
  help              show this help
  quit              end the session";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Show(String),
    Hide(String),
    Layers,
    Search(String),
    Plot(String),
    Clear,
    Status,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let needs = |what: &str| format!("'{}' needs {}", word, what);

    let command = match word.to_lowercase().as_str() {
        "show" if rest.is_empty() => return Err(needs("a layer key")),
        "hide" if rest.is_empty() => return Err(needs("a layer key")),
        "search" if rest.is_empty() => return Err(needs("an address")),
        "plot" if rest.is_empty() => return Err(needs("coordinates, e.g. plot 28.4, -82.5")),
        "show" => SessionCommand::Show(rest.to_string()),
        "hide" => SessionCommand::Hide(rest.to_string()),
        "search" | "find" => SessionCommand::Search(rest.to_string()),
        "plot" => SessionCommand::Plot(rest.to_string()),
        "layers" => SessionCommand::Layers,
        "clear" => SessionCommand::Clear,
        "status" => SessionCommand::Status,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(Some(command))
}

/// Run the session command.
pub fn run(runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("session");
    let app = runner.start_app()?;
    let runtime = runner.runtime()?;

    runtime.block_on(async {
        let loading = app.spawn_layer_loading();
        tokio::spawn(async move {
            if let Ok(report) = loading.await {
                println!();
                print_load_report(&report);
            }
        });

        println!("{}", style("Go Zones session").bold());
        println!("{}", HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush().ok();

            let Some(line) = lines.next_line().await.map_err(CliError::Input)? else {
                break;
            };
            match parse_command(&line) {
                Ok(Some(SessionCommand::Quit)) => break,
                Ok(Some(command)) => execute(&app, command).await,
                Ok(None) => {}
                Err(message) => println!("{}", style(message).yellow()),
            }
        }
        Ok::<(), CliError>(())
    })
}

async fn execute(app: &GoZonesApp, command: SessionCommand) {
    match command {
        SessionCommand::Show(key) => toggle(app, &key, true),
        SessionCommand::Hide(key) => toggle(app, &key, false),
        SessionCommand::Layers => print_layers(&app.registry().entries()),
        SessionCommand::Search(address) => {
            println!("Searching for \"{}\"...", address);
            let result = app.resolver().resolve_address(&address).await;
            report_lookup(app, result);
        }
        SessionCommand::Plot(coordinates) => {
            let result = app.resolver().resolve_coordinates(&coordinates);
            report_lookup(app, result);
        }
        SessionCommand::Clear => {
            app.resolver().clear_marker();
            println!("Marker cleared");
        }
        SessionCommand::Status => {
            let (center, zoom) = app.surface().lock().view();
            println!("{}", app.resolver().status());
            println!("View: {} @ zoom {}", center, zoom);
        }
        SessionCommand::Help => println!("{}", HELP),
        SessionCommand::Quit => {}
    }
}

fn toggle(app: &GoZonesApp, key: &str, visible: bool) {
    let verb = if visible { "shown" } else { "hidden" };
    match app.registry().set_visibility(key, visible) {
        Ok(ToggleEffect::Deferred) => {
            println!("{} will be {} once it has loaded", key, verb)
        }
        Ok(ToggleEffect::Unchanged) => println!("{} is already {}", key, verb),
        Ok(_) => println!("{} {}", key, verb),
        Err(e) => println!("{}", style(e).yellow()),
    }
}

fn report_lookup(app: &GoZonesApp, result: Result<ResolvedPoint, ResolveError>) {
    match result {
        Ok(point) => {
            let view = app.surface().lock().view();
            print_point(&point, view);
        }
        Err(ResolveError::Superseded) => {}
        Err(e) => {
            println!("{}", style(format_lookup_failure(&e)).red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layer_toggles() {
        assert_eq!(
            parse_command("show wf30"),
            Ok(Some(SessionCommand::Show("wf30".to_string())))
        );
        assert_eq!(
            parse_command("  HIDE   publix15 "),
            Ok(Some(SessionCommand::Hide("publix15".to_string())))
        );
    }

    #[test]
    fn test_parse_search_keeps_full_address() {
        assert_eq!(
            parse_command("search 400 N Tampa St, Tampa, FL"),
            Ok(Some(SessionCommand::Search(
                "400 N Tampa St, Tampa, FL".to_string()
            )))
        );
        assert_eq!(
            parse_command("plot 28.4, -82.5"),
            Ok(Some(SessionCommand::Plot("28.4, -82.5".to_string())))
        );
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(parse_command("layers"), Ok(Some(SessionCommand::Layers)));
        assert_eq!(parse_command("clear"), Ok(Some(SessionCommand::Clear)));
        assert_eq!(parse_command("status"), Ok(Some(SessionCommand::Status)));
        assert_eq!(parse_command("?"), Ok(Some(SessionCommand::Help)));
        assert_eq!(parse_command("exit"), Ok(Some(SessionCommand::Quit)));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("show").unwrap_err().contains("layer key"));
        assert!(parse_command("search   ").unwrap_err().contains("address"));
        assert!(parse_command("zoom 5").unwrap_err().contains("Unknown command 'zoom'"));
    }
}
