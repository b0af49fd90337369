use anyhow::Result;
use kancli::{config::GlobalConfig, logging, tui};
use std::path::PathBuf;

const USAGE: &str = "\
Usage: kancli [DB_PATH]

A kanban board in your terminal.

Arguments:
  DB_PATH        Board database file (default: platform data directory)

Options:
  -h, --help     Print help
  -V, --version  Print version

Keys:
  ←/h →/l  switch column     ↑/k ↓/j  select task
  n        new task          Enter    advance task
  d        delete task       q/Esc    save and quit
  Ctrl+C   quit without saving";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let db_override = match args.get(1).map(|s| s.as_str()) {
        Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some("-V") | Some("--version") => {
            println!("kancli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(path) => Some(PathBuf::from(path)),
        None => None,
    };

    let config = GlobalConfig::load()?;
    let db_path = config.resolve_database_path(db_override.as_deref())?;

    // Keep the guard alive so buffered log lines are written on exit
    let _log_guard = logging::init(&config, &GlobalConfig::log_dir()?)?;
    tracing::info!(db = %db_path.display(), "starting kancli");

    // Initialize and run the app
    let mut app = tui::App::new(config, &db_path)?;
    let result = app.run().await;

    // Restore the terminal before any error is printed
    drop(app);
    if let Err(err) = &result {
        tracing::error!(error = %format!("{:#}", err), "kancli exited with an error");
    }
    result
}
