//! Async driver that feeds a [`TimerEngine`] its one-second ticks.
//!
//! The driver is the only owner of the engine. Commands arrive on a single
//! queue and are applied one at a time, interleaved with ticks, so no
//! command ever observes a half-applied tick. The tick source is a single
//! `Interval` created when the engine starts running and dropped when it
//! stops; any transition re-arms it, so two tick sources never coexist.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::{TimerEngine, TimerMode};
use crate::error::TimerError;
use crate::events::Event;
use crate::settings::TimerSettings;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub enum TimerCommand {
    Toggle,
    Start,
    Pause,
    Skip,
    Reset,
    PatternInterrupt,
    TwoMinuteRule,
    DismissInterstitial,
    SettingsChanged(TimerSettings),
    Snapshot,
    Shutdown,
}

/// What the driver reports back to the front end.
#[derive(Debug, Clone)]
pub enum DriverEvent {
    Timer(Event),
    Rejected(TimerError),
    /// A tick that did not finish the segment.
    Ticked { mode: TimerMode, time_left: u64 },
}

/// Sending half of the command queue.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    tx: mpsc::Sender<TimerCommand>,
}

impl TimerHandle {
    /// Queue a command. Returns `false` once the driver has stopped.
    pub async fn send(&self, command: TimerCommand) -> bool {
        self.tx.send(command).await.is_ok()
    }
}

pub struct TimerDriver {
    engine: TimerEngine,
    commands: mpsc::Receiver<TimerCommand>,
    events: mpsc::UnboundedSender<DriverEvent>,
    ticker: Option<Interval>,
}

enum Step {
    Command(Option<TimerCommand>),
    Tick,
}

impl TimerDriver {
    pub fn new(
        engine: TimerEngine,
    ) -> (Self, TimerHandle, mpsc::UnboundedReceiver<DriverEvent>) {
        let (tx, commands) = mpsc::channel(32);
        let (events, events_rx) = mpsc::unbounded_channel();
        let driver = Self {
            engine,
            commands,
            events,
            ticker: None,
        };
        (driver, TimerHandle { tx }, events_rx)
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    /// Whether a tick source is currently armed.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Process commands and ticks until `Shutdown` or every handle is
    /// dropped. Hands the engine back.
    pub async fn run(mut self) -> TimerEngine {
        loop {
            let step = tokio::select! {
                cmd = self.commands.recv() => Step::Command(cmd),
                _ = next_tick(&mut self.ticker) => Step::Tick,
            };
            match step {
                Step::Command(None) | Step::Command(Some(TimerCommand::Shutdown)) => break,
                Step::Command(Some(cmd)) => self.apply(cmd),
                Step::Tick => self.on_tick(),
            }
        }
        self.ticker = None;
        self.engine
    }

    fn apply(&mut self, command: TimerCommand) {
        let outcome = match command {
            TimerCommand::Toggle => Ok(self.engine.toggle()),
            TimerCommand::Start => Ok(self.engine.start()),
            TimerCommand::Pause => Ok(self.engine.pause()),
            TimerCommand::Skip => self.engine.skip().map(Some),
            TimerCommand::Reset => Ok(Some(self.engine.reset())),
            TimerCommand::PatternInterrupt => Ok(Some(self.engine.pattern_interrupt())),
            TimerCommand::TwoMinuteRule => Ok(Some(self.engine.two_minute_rule())),
            TimerCommand::DismissInterstitial => {
                self.engine.dismiss_interstitial();
                Ok(None)
            }
            TimerCommand::SettingsChanged(settings) => {
                Ok(self.engine.on_settings_changed(settings))
            }
            TimerCommand::Snapshot => {
                self.emit(DriverEvent::Timer(self.engine.snapshot()));
                return;
            }
            TimerCommand::Shutdown => return,
        };

        match outcome {
            Ok(Some(event)) => {
                self.rearm();
                self.emit(DriverEvent::Timer(event));
            }
            Ok(None) => {}
            Err(rejection) => self.emit(DriverEvent::Rejected(rejection)),
        }
    }

    fn on_tick(&mut self) {
        match self.engine.tick() {
            Some(event) => {
                self.rearm();
                self.emit(DriverEvent::Timer(event));
            }
            None if self.engine.is_active() => self.emit(DriverEvent::Ticked {
                mode: self.engine.mode(),
                time_left: self.engine.time_left(),
            }),
            None => self.rearm(),
        }
    }

    /// Drop the current tick source and, if the engine is running, start a
    /// fresh one a full period from now.
    fn rearm(&mut self) {
        self.ticker = None;
        if self.engine.is_active() {
            let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.ticker = Some(ticker);
        }
    }

    fn emit(&self, event: DriverEvent) {
        // Nobody listening is fine; the engine state is authoritative.
        let _ = self.events.send(event);
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySessionLog;
    use crate::timer::TimerPorts;

    fn engine(study_min: i64, log: &MemorySessionLog) -> TimerEngine {
        let settings = TimerSettings {
            study_duration: study_min,
            short_break_duration: 1,
            long_break_duration: 1,
            ..TimerSettings::default()
        };
        let ports = TimerPorts {
            session_log: Box::new(log.clone()),
            ..TimerPorts::in_memory()
        };
        TimerEngine::new(settings, ports)
    }

    async fn until_completed(rx: &mut mpsc::UnboundedReceiver<DriverEvent>) -> (u32, Event) {
        let mut ticks = 0;
        while let Some(ev) = rx.recv().await {
            match ev {
                DriverEvent::Ticked { .. } => ticks += 1,
                DriverEvent::Timer(e @ Event::SessionCompleted { .. }) => return (ticks, e),
                _ => {}
            }
        }
        panic!("driver stopped before completion");
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_once_per_second() {
        let log = MemorySessionLog::new();
        let (driver, handle, mut rx) = TimerDriver::new(engine(1, &log));
        let began = Instant::now();

        let (engine, ticks) = tokio::join!(driver.run(), async {
            handle.send(TimerCommand::Start).await;
            let (ticks, _) = until_completed(&mut rx).await;
            assert_eq!(began.elapsed(), Duration::from_secs(60));
            handle.send(TimerCommand::Shutdown).await;
            ticks
        });

        assert_eq!(ticks, 59);
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
        assert!(!engine.is_active());
        assert_eq!(log.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_does_not_double_tick() {
        let log = MemorySessionLog::new();
        let (driver, handle, mut rx) = TimerDriver::new(engine(1, &log));

        let engine = tokio::join!(driver.run(), async {
            handle.send(TimerCommand::Start).await;
            tokio::time::sleep(Duration::from_millis(10_500)).await;
            handle.send(TimerCommand::Pause).await;
            handle.send(TimerCommand::Start).await;
            handle.send(TimerCommand::Start).await;
            let resumed = Instant::now();
            let (_, done) = until_completed(&mut rx).await;
            assert!(matches!(done, Event::SessionCompleted { .. }));
            // 10 ticks landed before the pause; 50 remain at one per second.
            assert_eq!(resumed.elapsed(), Duration::from_secs(50));
            handle.send(TimerCommand::Shutdown).await;
        })
        .0;

        // One incomplete entry from the pause, one completed entry.
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].completed);
        assert!(entries[1].completed);
        assert!(!engine.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn strict_skip_is_reported_as_rejection() {
        let log = MemorySessionLog::new();
        let mut e = engine(25, &log);
        let mut strict = e.settings().clone();
        strict.strict_mode = true;
        e.on_settings_changed(strict);
        let (driver, handle, mut rx) = TimerDriver::new(e);

        let (engine, rejected) = tokio::join!(driver.run(), async {
            handle.send(TimerCommand::Start).await;
            handle.send(TimerCommand::Skip).await;
            let mut rejected = false;
            while let Some(ev) = rx.recv().await {
                if let DriverEvent::Rejected(TimerError::StrictModeSkip) = ev {
                    rejected = true;
                    break;
                }
            }
            handle.send(TimerCommand::Shutdown).await;
            rejected
        });

        assert!(rejected);
        assert_eq!(engine.mode(), TimerMode::Study);
        assert!(engine.is_active());
        assert!(log.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_driver() {
        let log = MemorySessionLog::new();
        let (driver, handle, _rx) = TimerDriver::new(engine(25, &log));
        assert!(!driver.is_ticking());
        drop(handle);
        let engine = driver.run().await;
        assert_eq!(engine.time_left(), 25 * 60);
    }
}
