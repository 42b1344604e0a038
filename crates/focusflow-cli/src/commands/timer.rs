//! Foreground timer: the driver ticks the engine while stdin feeds it
//! single-letter commands.

use std::io::Write;
use std::rc::Rc;

use clap::Subcommand;
use focusflow_core::interstitial::CoinSide;
use focusflow_core::notify::Notifier;
use focusflow_core::storage::SettingsStore;
use focusflow_core::timer::format_time;
use focusflow_core::{
    Config, ConfigStore, Database, DriverEvent, Event, PcgRandom, TimerCommand, TimerDriver,
    TimerEngine, TimerHandle, TimerPorts, TimerSettings,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

const HELP: &str = "keys: s start/pause, k skip, r reset, i pattern interrupt, t two-minute rule, c reload config, q quit";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground, reading commands from stdin
    Run {
        /// Start the first study block right away
        #[arg(long)]
        start: bool,
        /// Print events as JSON lines instead of a countdown
        #[arg(long)]
        json: bool,
    },
    /// Print the state a new timer would start in
    Status,
}

/// Rings the terminal bell and prints to stderr.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, message: &str, play_sound: bool) {
        let bell = if play_sound { "\x07" } else { "" };
        eprintln!("{bell}{title} {message}");
    }
}

fn build_engine(config: &Config) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    let db = Rc::new(Database::open()?);
    let ports = TimerPorts {
        session_log: Box::new(Rc::clone(&db)),
        streak: Box::new(Rc::clone(&db)),
        catalog: Box::new(db),
        notifier: Box::new(TerminalNotifier),
        rng: Box::new(PcgRandom::from_entropy()),
    };
    Ok(TimerEngine::new(config.timer.clone(), ports).with_sound(config.notifications.sound))
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { start, json } => {
            let engine = build_engine(&Config::load()?)?;
            // The engine's stores are not Send, so everything stays on one thread.
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(async {
                let (driver, handle, events) = TimerDriver::new(engine);
                let (engine, result) = tokio::join!(driver.run(), async move {
                    let result = interact(&handle, events, start, json).await;
                    // Close a running segment so it lands in the log.
                    handle.send(TimerCommand::Pause).await;
                    handle.send(TimerCommand::Shutdown).await;
                    result
                });
                tracing::debug!(
                    mode = %engine.mode(),
                    cycles = engine.cycles_completed(),
                    "timer stopped"
                );
                result
            })
        }
        TimerAction::Status => {
            let engine = build_engine(&Config::load_or_default())?;
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            println!("{}", serde_json::json!({ "streak": engine.streak() }));
            Ok(())
        }
    }
}

fn reload_settings() -> Result<TimerSettings, Box<dyn std::error::Error>> {
    Ok(ConfigStore::open()?.read()?)
}

async fn interact(
    handle: &TimerHandle,
    mut events: UnboundedReceiver<DriverEvent>,
    start: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut coin = PcgRandom::from_entropy();

    if !json {
        eprintln!("{HELP}");
    }
    handle.send(TimerCommand::Snapshot).await;
    if start {
        handle.send(TimerCommand::Start).await;
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match line.trim() {
                    "" => continue,
                    "s" => TimerCommand::Toggle,
                    "k" => TimerCommand::Skip,
                    "r" => TimerCommand::Reset,
                    "i" => TimerCommand::PatternInterrupt,
                    "t" => TimerCommand::TwoMinuteRule,
                    "c" => match reload_settings() {
                        Ok(settings) => TimerCommand::SettingsChanged(settings),
                        Err(e) => {
                            tracing::warn!(error = %e, "settings reload failed");
                            eprintln!("keeping current settings: {e}");
                            continue;
                        }
                    },
                    "q" => break,
                    other => {
                        eprintln!("unknown command '{other}'; {HELP}");
                        continue;
                    }
                };
                if !handle.send(command).await {
                    break;
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    DriverEvent::Timer(ev) => {
                        render(&ev, json)?;
                        if let Event::SessionCompleted { .. } = ev {
                            let side = CoinSide::flip(&mut coin);
                            if json {
                                println!("{}", serde_json::json!({ "type": "coin_flip", "side": side }));
                            } else {
                                println!("{}", side.message());
                            }
                            handle.send(TimerCommand::DismissInterstitial).await;
                        }
                    }
                    DriverEvent::Rejected(e) => eprintln!("{e}"),
                    DriverEvent::Ticked { mode, time_left } => {
                        if !json {
                            print!("\r{mode} {}  ", format_time(time_left));
                            std::io::stdout().flush()?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn render(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    let line = match event {
        Event::TimerStarted {
            mode,
            time_left_secs,
            ..
        } => format!("{mode} started, {} left", format_time(*time_left_secs)),
        Event::TimerPaused {
            mode,
            time_left_secs,
            ..
        } => format!("{mode} paused at {}", format_time(*time_left_secs)),
        Event::SessionCompleted {
            mode,
            next_mode,
            streak,
            break_activity,
            ..
        } => {
            let mut line = format!("{mode} finished, next: {next_mode}");
            if let Some(streak) = streak {
                line.push_str(&format!(" (streak {streak})"));
            }
            if let Some(activity) = break_activity {
                line.push_str(&format!("\nbreak idea: {}", activity.name));
            }
            line
        }
        Event::TimerSkipped {
            from_mode, to_mode, ..
        } => format!("skipped {from_mode}, now {to_mode}"),
        Event::TimerReset { .. } => "timer reset".to_string(),
        Event::SettingsApplied {
            mode,
            time_left_secs,
            ..
        } => format!("settings applied, {mode} {}", format_time(*time_left_secs)),
        Event::PatternInterrupt { suggestion, .. } => format!("pattern interrupt: {suggestion}"),
        Event::TwoMinuteRule { .. } => "two-minute rule: just start, 02:00 on the clock".to_string(),
        Event::StateSnapshot {
            mode,
            time_left_secs,
            block_label,
            ..
        } => format!("{block_label}: {mode} {}", format_time(*time_left_secs)),
    };
    println!("\r{line}");
    Ok(())
}
