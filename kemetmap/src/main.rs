use clap::Parser;
use kemetdata::AssetLayout;

mod args;
mod console;
mod highlight;
mod info;
mod loader;
pub mod logger;
mod ops;
mod session;
#[cfg(test)]
mod testing;

use args::{Cli, Commands};
use console::Console;
use loader::Loader;
use session::PickerSession;

/// Plain stderr logging for the one-shot commands.
fn init_cli_logger(level: log::LevelFilter) {
    // Another logger may already be installed (tests)
    let _ = env_logger::Builder::new().filter_level(level).try_init();
}

fn run(args: Cli) -> Result<(), String> {
    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    let layout = AssetLayout::new(&args.assets);

    match &args.command {
        None | Some(Commands::Session) => {
            let log = logger::init(level).map_err(|e| format!("logger: {}", e))?;
            let session = PickerSession::new(layout.clone(), args.players);
            let stdout = std::io::stdout();
            let mut console = Console::new(session, Loader::new(layout), log, stdout.lock());
            console
                .run(std::io::stdin().lock())
                .map_err(|e| e.to_string())?;
        }
        Some(Commands::Pick {
            x,
            y,
            width,
            height,
            json,
        }) => {
            init_cli_logger(level);
            ops::pick(&layout, args.players, (*x, *y), *width, *height, *json)?;
        }
        Some(Commands::Render {
            x,
            y,
            width,
            height,
            output,
        }) => {
            init_cli_logger(level);
            ops::render(&layout, args.players, (*x, *y), *width, *height, output)?;
        }
        Some(Commands::Validate) => {
            init_cli_logger(level);
            let report = ops::validate(&layout, args.players)?;
            for issue in &report.issues {
                println!("- {}", issue);
            }
            println!(
                "{} regions checked, {} issues ({} fatal)",
                report.regions,
                report.issues.len(),
                report.fatal
            );
            if report.fatal > 0 {
                return Err(format!(
                    "{} region colors do not map to a single region",
                    report.fatal
                ));
            }
        }
        Some(Commands::Counts) => {
            init_cli_logger(level);
            let counts = ops::counts(&layout)?;
            if counts.is_empty() {
                println!("No map data found under {}", args.assets.display());
            } else {
                println!("Available player counts:");
                for players in counts {
                    println!("- {}", players);
                }
            }
        }
    }

    Ok(())
}

fn main() -> Result<(), String> {
    run(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{create_mock_assets, four_players, three_players};
    use tempfile::tempdir;

    fn cli(assets: &std::path::Path, command: Commands) -> Cli {
        Cli {
            assets: assets.to_path_buf(),
            players: three_players(),
            log_level: "info".to_string(),
            command: Some(command),
        }
    }

    #[test]
    fn test_run_pick() {
        let dir = tempdir().unwrap();
        create_mock_assets(dir.path());
        let args = cli(
            dir.path(),
            Commands::Pick {
                x: 0.5,
                y: 1.5,
                width: None,
                height: None,
                json: false,
            },
        );
        assert!(run(args).is_ok());
    }

    #[test]
    fn test_run_pick_missing_data() {
        let dir = tempdir().unwrap();
        let mut args = cli(
            dir.path(),
            Commands::Pick {
                x: 0.0,
                y: 0.0,
                width: None,
                height: None,
                json: true,
            },
        );
        args.players = four_players();
        assert!(run(args).is_err());
    }

    #[test]
    fn test_run_validate_and_counts() {
        let dir = tempdir().unwrap();
        create_mock_assets(dir.path());
        assert!(run(cli(dir.path(), Commands::Validate)).is_ok());
        assert!(run(cli(dir.path(), Commands::Counts)).is_ok());
    }

    #[test]
    fn test_run_validate_duplicate_color_fails() {
        let dir = tempdir().unwrap();
        let layout = create_mock_assets(dir.path());
        std::fs::write(
            layout.catalog(three_players()),
            r##"{
                "A": { "name": "A", "type": "city", "hitboxColor": "#FF0000" },
                "B": { "name": "B", "type": "city", "hitboxColor": "#ff0000" }
            }"##,
        )
        .unwrap();
        assert!(run(cli(dir.path(), Commands::Validate)).is_err());
    }
}
