use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use clap::Parser;

use motorclub_onboard::app::{AddVehicleScreen, AppError, FetchState, Navigator, Route, ScreenView};
use motorclub_onboard::config::FlowConfig;
use motorclub_onboard::logging;
use motorclub_onboard::platform::{SimulatedEnvironment, SystemClock, TimerQueue};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";

/// Slack on top of the lookup delay before giving up on the event loop
const STALL_GRACE: Duration = Duration::from_secs(5);

/// Runs the add-vehicle flow against a simulated device
#[derive(Debug, Parser)]
#[command(name = "motorclub-onboard", version, about)]
struct Cli {
    /// Registration number keystrokes, typed one character at a time
    registration: String,

    /// Platform identifier reported by the simulated device
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Hold the simulated device in landscape
    #[arg(long)]
    landscape: bool,

    /// Flow configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(%route, "navigation requested");
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    logging::init(logging::level_for_verbosity(cli.verbose))?;

    let config = match &cli.config {
        Some(path) => FlowConfig::load(path)?,
        None => FlowConfig::default(),
    };

    let environment = Rc::new(SimulatedEnvironment::new(cli.user_agent, !cli.landscape));
    let timers = TimerQueue::new(Rc::new(SystemClock));
    let deadline = config.lookup_delay() + STALL_GRACE;

    let mut screen = AddVehicleScreen::mount_simulated(
        environment,
        Rc::new(LoggingNavigator),
        timers.clone(),
        config,
    );

    if let ScreenView::Gated(notice) = screen.view() {
        println!("{}", notice.title());
        println!("{}", notice.message());
        return Ok(());
    }

    for ch in cli.registration.chars() {
        if !screen.type_text(&ch.to_string()) {
            tracing::warn!(%ch, "keystroke rejected, input is full");
        }
        if let ScreenView::Interactive(form) = screen.view() {
            tracing::debug!(display = %form.display, "input changed");
        }
    }

    let ScreenView::Interactive(form) = screen.view() else {
        return Ok(());
    };
    println!("Registration: {}", form.display);
    if let Some(error) = &form.validation_error {
        println!("Warning: {error}");
    }
    if !screen.submit() {
        println!("Nothing to submit");
        return Ok(());
    }
    if let ScreenView::Interactive(form) = screen.view() {
        println!("{}", form.submit_label);
    }

    let started = timers.now();
    while !screen.poll() {
        if timers.now().duration_since(started) > deadline {
            return Err(AppError::Stalled(deadline));
        }
        let wait = timers.time_until_next().unwrap_or(Duration::from_millis(10));
        thread::sleep(wait.max(Duration::from_millis(1)));
    }

    match screen.fetch_state() {
        Some(FetchState::Completed(record)) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Some(FetchState::Failed(error)) => Err(error.into()),
        _ => Ok(()),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
