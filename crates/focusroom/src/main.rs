//! focusroom - command-line Pomodoro timer
//!
//! Wires together:
//! - Configuration loading (focus-mode preset plus overrides)
//! - The clock-driven session timer
//! - An experience-points logger subscribed to completions
//! - A once-per-second countdown display

use anyhow::{Context, Result};
use clap::Parser;
use focusroom_config::{FocusMode, SettingsPatch, TimerConfig, load_config_or_default};
use focusroom_core::{EngineEvent, SessionEngine, SessionKind, Timer, TokioClock};
use focusroom_util::{config_path_without_env, format_clock_time, format_minutes};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// focusroom - Pomodoro timer with focus-mode presets
#[derive(Parser, Debug)]
#[command(name = "focusroom")]
#[command(about = "Pomodoro timer with focus-mode presets", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/focusroom/config.toml)
    #[arg(short, long, env = "FOCUSROOM_CONFIG", default_value_os_t = config_path_without_env())]
    config: PathBuf,

    /// Work interval in minutes (overrides the config)
    #[arg(long)]
    work: Option<u32>,

    /// Short break in minutes (overrides the config)
    #[arg(long)]
    short_break: Option<u32>,

    /// Long break in minutes (overrides the config)
    #[arg(long)]
    long_break: Option<u32>,

    /// Work sessions between long breaks (overrides the config)
    #[arg(long)]
    sessions_until_long_break: Option<u32>,

    /// Exit after this many completed intervals (default: run until interrupted)
    #[arg(long)]
    cycles: Option<u32>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> SettingsPatch {
        SettingsPatch {
            work_duration: self.work,
            short_break: self.short_break,
            long_break: self.long_break,
            sessions_until_long_break: self.sessions_until_long_break,
        }
    }
}

/// Experience earned for a completed interval. Breaks earn nothing.
fn experience_for(mode: FocusMode, kind: SessionKind, minutes: u32) -> u32 {
    match kind {
        SessionKind::Work => mode.xp_for_minutes(minutes),
        SessionKind::ShortBreak | SessionKind::LongBreak => 0,
    }
}

struct Runner {
    timer: Timer<TokioClock>,
    config: TimerConfig,
    cycles: Option<u32>,
    experience: Arc<AtomicU32>,
}

impl Runner {
    fn new(args: &Args) -> Result<Self> {
        let config = load_config_or_default(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?
            .with_overrides(&args.overrides())
            .context("Invalid timer overrides")?;

        info!(
            config_path = %args.config.display(),
            focus_mode = %config.focus_mode,
            work = config.settings.work_duration,
            short_break = config.settings.short_break,
            long_break = config.settings.long_break,
            sessions_until_long_break = config.settings.sessions_until_long_break,
            daily_goal = config.daily_goal,
            "Configuration loaded"
        );

        let clock = TokioClock::current().context("No tokio runtime available")?;
        let timer = Timer::with_engine(clock, SessionEngine::with_settings(config.settings));
        timer.set_daily_goal(config.daily_goal)?;

        let mode = config.focus_mode;
        let experience = Arc::new(AtomicU32::new(0));
        let earned = experience.clone();
        timer.subscribe(move |session| {
            let xp = experience_for(mode, session.kind, session.duration);
            earned.fetch_add(xp, Ordering::Relaxed);
            println!(
                "\r[{}] {} finished: {} ({} xp)",
                format_clock_time(&session.ended_at),
                session.kind,
                format_minutes(session.duration),
                xp
            );
            Ok(())
        })?;

        Ok(Self {
            timer,
            config,
            cycles: args.cycles,
            experience,
        })
    }

    async fn run(self) -> Result<()> {
        let result = self.event_loop().await;

        self.timer.shutdown();
        self.print_summary();

        info!("Shutdown complete");
        result
    }

    async fn event_loop(&self) -> Result<()> {
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

        let mut display = tokio::time::interval(Duration::from_secs(1));
        let mut completions = 0u32;

        self.timer.start()?;
        info!(mode = self.config.focus_mode.display_name(), "Timer started");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, stopping timer");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, stopping timer");
                    break;
                }

                _ = display.tick() => {
                    let mut done = false;

                    for event in self.timer.take_events()? {
                        match event {
                            EngineEvent::SessionCompleted { next_kind, .. } => {
                                completions += 1;
                                if self.cycles.is_some_and(|limit| completions >= limit) {
                                    done = true;
                                    continue;
                                }
                                info!(next = %next_kind, "Starting next interval");
                                self.timer.start()?;
                            }
                            EngineEvent::SubscriberFailed { subscription, error } => {
                                warn!(subscription = %subscription, error = %error, "Completion hook failed");
                            }
                        }
                    }

                    if done {
                        info!(completions, "Requested cycles finished");
                        break;
                    }

                    self.render()?;
                }
            }
        }

        Ok(())
    }

    fn render(&self) -> Result<()> {
        let state = self.timer.state()?;
        let remaining = self.timer.format_remaining()?;
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "\r{:>11} {}  ", state.current_kind.as_str(), remaining)?;
        stdout.flush()?;
        Ok(())
    }

    fn print_summary(&self) {
        let stats = match self.timer.stats() {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Failed to compute statistics");
                return;
            }
        };

        println!();
        println!("Summary ({}):", self.config.focus_mode.display_name());
        println!("  Work sessions: {}", stats.total_sessions);
        println!("  Focus time: {}", format_minutes(stats.total_focus_time));
        println!("  Focus time today: {}", format_minutes(stats.focus_time_today));
        println!("  Streak: {}", stats.current_streak);
        println!(
            "  Daily goal: {}/{}{}",
            stats.sessions_today,
            stats.daily_goal,
            if stats.daily_goal_reached { " (reached)" } else { "" }
        );
        println!("  Experience: {} xp", self.experience.load(Ordering::Relaxed));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "focusroom starting");

    let runner = Runner::new(&args)?;
    runner.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_earn_no_experience() {
        assert_eq!(experience_for(FocusMode::DeepFocus, SessionKind::Work, 50), 75);
        assert_eq!(experience_for(FocusMode::DeepFocus, SessionKind::LongBreak, 30), 0);
        assert_eq!(experience_for(FocusMode::Flexible, SessionKind::ShortBreak, 5), 0);
    }

    #[test]
    fn cli_overrides_become_a_patch() {
        let args = Args::parse_from(["focusroom", "--work", "40", "--cycles", "2"]);
        let patch = args.overrides();
        assert_eq!(patch.work_duration, Some(40));
        assert_eq!(patch.short_break, None);
        assert_eq!(args.cycles, Some(2));
    }
}
