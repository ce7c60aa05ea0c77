mod activity;
mod config;
mod models;
mod pattern;
mod report;
mod system;
mod utils;

use activity::{ActiveHours, ActivityLoop, RunOptions, Shutdown};
use anyhow::Result;
use clap::{Parser, Subcommand};
use fd_lock::RwLock;
use models::ScreenSize;
use std::fs::OpenOptions;
use std::io;
use system::{Cursor, EnigoPointer};

#[derive(Parser)]
#[command(name = "nudge")]
#[command(about = "Keeps the session awake by moving the mouse through a pattern", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start moving the mouse periodically
    Start {
        /// Minutes between pattern runs
        #[arg(short, long)]
        interval: Option<f64>,
        /// Run the pattern once and exit
        #[arg(long)]
        once: bool,
        /// Do not abort when the pointer is pushed into a screen corner
        #[arg(long)]
        no_fail_safe: bool,
        /// Start time (HH:MM)
        #[arg(long)]
        start_time: Option<String>,
        /// End time (HH:MM)
        #[arg(long)]
        end_time: Option<String>,
        /// Timeout duration (e.g. 8h, 30m)
        #[arg(short, long)]
        timeout: Option<String>,
    },
    /// Print the coordinates of the pattern for a given screen size
    Pattern {
        #[arg(long, default_value_t = 1920)]
        width: u32,
        #[arg(long, default_value_t = 1080)]
        height: u32,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = config::load_config()?;

    match cli.command {
        Commands::Start {
            interval,
            once,
            no_fail_safe,
            start_time,
            end_time,
            timeout,
        } => {
            let lock_path = config::base_dir()?.join("nudge.lock");
            let lock_file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(lock_path)?;

            let mut lock = RwLock::new(lock_file);
            let _guard = lock.try_write().map_err(|_| {
                anyhow::anyhow!("Another instance of nudge is already running. Please close it before starting a new one.")
            })?;

            let interval_mins = interval.unwrap_or(config.interval_mins);
            config::validate_interval(interval_mins)?;
            let start_time = start_time.or(config.start_time);
            let end_time = end_time.or(config.end_time);
            let timeout = timeout.or(config.timeout);

            let options = RunOptions {
                interval: utils::interval_from_minutes(interval_mins)?,
                once,
                timeout: timeout.as_deref().map(utils::parse_timeout).transpose()?,
                active_hours: ActiveHours {
                    start: start_time.as_deref().map(utils::parse_hhmm).transpose()?,
                    end: end_time.as_deref().map(utils::parse_hhmm).transpose()?,
                },
                params: config.pattern,
            };

            let shutdown = Shutdown::new();
            let handler = shutdown.clone();
            ctrlc::set_handler(move || handler.trigger())?;

            let cursor = Cursor::new(EnigoPointer::new()?, config.fail_safe && !no_fail_safe)?;
            report::write_system_info(
                &mut io::stdout().lock(),
                cursor.screen(),
                cursor.location()?,
            )?;
            if !once {
                report::print_banner(options.interval);
            }

            let mut activity = ActivityLoop::new(cursor, options, shutdown);
            let session = activity.run()?;
            report::print_summary(&session);
        }
        Commands::Pattern {
            width,
            height,
            json,
        } => {
            anyhow::ensure!(width > 0 && height > 0, "Screen size must be positive");
            let pattern = pattern::generate(ScreenSize { width, height }, &config.pattern);
            report::write_pattern(&mut io::stdout().lock(), &pattern, json)?;
        }
    }

    Ok(())
}
