//! The interactive timer session.
//!
//! Runs the timer driver in the foreground and renders its callbacks
//! onto the terminal: a rewritten status line for the countdown, plain
//! lines for session counts, the bell for interval chimes. Control
//! comes from stdin, one command per line.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use pomotally_core::{
    Beeminder, ChannelSet, Config, CoreError, Indicator, Mode, Presenter, Pushover,
    SessionStore, SideChannel, SoundKind, TimerDriver,
};

const COMMANDS: &str = "Commands: start, stop, break, count, status, quit";

#[derive(Args)]
pub struct RunArgs {
    /// Focus interval length in seconds
    #[arg(long)]
    pub focus_secs: Option<u32>,
    /// Break interval length in seconds
    #[arg(long)]
    pub break_secs: Option<u32>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_loop(args))?;
    Ok(())
}

async fn run_loop(args: RunArgs) -> Result<(), CoreError> {
    let mut config = Config::load_or_default();
    if let Some(focus) = args.focus_secs {
        config.intervals.focus_secs = focus;
    }
    if let Some(brk) = args.break_secs {
        config.intervals.break_secs = brk;
    }

    let presenter = Arc::new(TerminalPresenter::new());
    let store = match SessionStore::open_default() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            presenter.on_fatal_error(&format!("cannot open the session store: {e}"));
            crate::common::log_error(&e);
            std::process::exit(1);
        }
    };
    let driver = TimerDriver::new(
        &config,
        store,
        Arc::clone(&presenter) as Arc<dyn Presenter>,
        build_channels(&config),
    );

    println!("{COMMANDS}");
    driver.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                match line? {
                    None => break,
                    Some(input) => {
                        if !handle_command(&driver, input.trim())? {
                            break;
                        }
                    }
                }
            }
        }
    }

    // Let any in-flight session recording land before the process ends.
    driver.stop();
    driver.settle().await;
    println!();
    Ok(())
}

/// Apply one line of input. Returns false when the session should end.
fn handle_command(driver: &TimerDriver, input: &str) -> Result<bool, CoreError> {
    match input {
        "" => {}
        "start" => driver.start(),
        "stop" => driver.stop(),
        "break" => driver.manual_break(),
        "count" => println!("\nSessions today: {}", driver.today_count()?),
        "status" => println!("\n{}", serde_json::to_string_pretty(&driver.snapshot())?),
        "help" => println!("\n{COMMANDS}"),
        "quit" | "exit" => return Ok(false),
        other => eprintln!("\nunknown command: {other}"),
    }
    Ok(true)
}

/// Assemble the side channels the current configuration enables and the
/// keyring has credentials for.
fn build_channels(config: &Config) -> Arc<ChannelSet> {
    let mut channels: Vec<Arc<dyn SideChannel>> = Vec::new();
    if config.notifications.enabled {
        let pushover = Pushover::new();
        if pushover.is_configured() {
            channels.push(Arc::new(pushover));
        }
    }
    if config.habit.enabled && !config.habit.goal.is_empty() {
        let beeminder = Beeminder::new();
        if beeminder.is_configured() {
            channels.push(Arc::new(beeminder));
        }
    }
    Arc::new(ChannelSet::new(channels))
}

/// Renders timer callbacks onto the terminal.
///
/// The countdown redraws in place with a carriage return; everything
/// else prints on its own line, starting with a newline to step off the
/// status line first.
struct TerminalPresenter {
    indicator: Mutex<Indicator>,
}

impl TerminalPresenter {
    fn new() -> Self {
        Self {
            indicator: Mutex::new(Indicator::Idle),
        }
    }

    fn glyph(indicator: Indicator) -> &'static str {
        match indicator {
            Indicator::Idle => " ",
            Indicator::Active => "●",
            Indicator::Break => "○",
        }
    }
}

impl Presenter for TerminalPresenter {
    fn on_display_update(&self, mode: Mode, time: &str) {
        let indicator = *self.indicator.lock().unwrap_or_else(PoisonError::into_inner);
        print!("\r{} {} {}   ", Self::glyph(indicator), mode.label(), time);
        let _ = io::stdout().flush();
    }

    fn on_session_completed(&self, count: u32) {
        println!("\nSessions today: {count}");
    }

    fn on_sound(&self, _sound: SoundKind) {
        // Terminal bell stands in for the desktop chime.
        print!("\x07");
        let _ = io::stdout().flush();
    }

    fn on_indicator(&self, indicator: Indicator) {
        *self.indicator.lock().unwrap_or_else(PoisonError::into_inner) = indicator;
    }

    fn on_fatal_error(&self, message: &str) {
        eprintln!("fatal: {message}");
    }
}
