use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use tracing::info;

mod controller;
mod dataset;
mod display;
mod domain;
mod inputter;
mod logging;
mod model;
mod ui;

use controller::Controller;
use dataset::Field;
use domain::{RvConfig, RvError};
use model::{Model, Status};
use ui::RosterUI;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Json file with account records, the bundled roster is used when omitted
    data: Option<String>,

    /// Initial filter column (id, first_name, last_name, ip_address, balance)
    #[arg(long)]
    field: Option<String>,

    /// Event poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    /// Log file path, defaults to rv.log in the working directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level for the log file (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = run(cli);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    match result {
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(cli: Cli) -> Result<(), RvError> {
    let level = cli
        .log_level
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e| RvError::LoadingFailed(format!("Bad log level: {e}")))?;
    logging::init(cli.log_file, level)?;

    let (name, records) = match cli.data {
        Some(raw) => {
            let expanded = shellexpand::full(&raw)
                .map_err(|e| RvError::LoadingFailed(e.to_string()))?;
            let path = PathBuf::from(expanded.as_ref());
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("???")
                .to_string();
            (name, dataset::load_file(&path)?)
        }
        None => ("accounts".to_string(), dataset::load_bundled()?),
    };

    let initial_field = cli.field.as_deref().map(Field::from_name).transpose()?;
    let cfg = RvConfig {
        event_poll_time: cli.poll_ms,
        ..RvConfig::default()
    };
    info!("Starting rv with {} records", records.len());

    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;
    let size = terminal.size()?;

    let mut model = Model::new(
        name,
        records,
        &cfg,
        initial_field,
        size.width as usize,
        size.height as usize,
    )?;
    let mut ui = RosterUI::new(&cfg);
    let controller = Controller::new(&cfg);

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(model.get_uidata(), f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    Ok(())
}
