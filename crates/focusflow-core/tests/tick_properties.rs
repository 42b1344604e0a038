//! Property tests over arbitrary command sequences.

use focusflow_core::storage::MemorySessionLog;
use focusflow_core::{Event, TimerEngine, TimerPorts, TimerSettings};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Tick,
    Toggle,
    Skip,
    Reset,
    Interrupt,
    TwoMinute,
    Dismiss,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        10 => Just(Op::Tick),
        2 => Just(Op::Toggle),
        1 => Just(Op::Skip),
        1 => Just(Op::Reset),
        1 => Just(Op::Interrupt),
        1 => Just(Op::TwoMinute),
        2 => Just(Op::Dismiss),
    ]
}

fn settings() -> impl Strategy<Value = TimerSettings> {
    (-1i64..4, -1i64..3, -1i64..3, -1i64..5, any::<bool>()).prop_map(
        |(study, short, long, cycles, strict)| TimerSettings {
            study_duration: study,
            short_break_duration: short,
            long_break_duration: long,
            cycles_per_super_block: cycles,
            strict_mode: strict,
            ..TimerSettings::default()
        },
    )
}

proptest! {
    #[test]
    fn ticks_never_raise_time_left(s in settings(), ops in prop::collection::vec(op(), 0..400)) {
        let mut engine = TimerEngine::new(s, TimerPorts::in_memory());
        for op in ops {
            match op {
                Op::Tick => {
                    let mode = engine.mode();
                    let before = engine.time_left();
                    let completed = engine.tick().is_some();
                    if !completed {
                        prop_assert_eq!(engine.mode(), mode);
                        prop_assert!(engine.time_left() <= before);
                        if engine.is_active() {
                            prop_assert_eq!(engine.time_left(), before - 1);
                        }
                    }
                }
                Op::Toggle => { engine.toggle(); }
                Op::Skip => { let _ = engine.skip(); }
                Op::Reset => { engine.reset(); }
                Op::Interrupt => { engine.pattern_interrupt(); }
                Op::TwoMinute => { engine.two_minute_rule(); }
                Op::Dismiss => { engine.dismiss_interstitial(); }
            }
            prop_assert!(engine.time_left() <= engine.total_secs());
            prop_assert!((0.0..=100.0).contains(&engine.progress_pct()));
        }
    }

    #[test]
    fn every_logged_entry_matches_an_event(ops in prop::collection::vec(op(), 0..300)) {
        let log = MemorySessionLog::new();
        let ports = TimerPorts {
            session_log: Box::new(log.clone()),
            ..TimerPorts::in_memory()
        };
        let s = TimerSettings {
            study_duration: 1,
            short_break_duration: 1,
            long_break_duration: 1,
            ..TimerSettings::default()
        };
        let mut engine = TimerEngine::new(s, ports);
        let mut reported = Vec::new();
        for op in ops {
            let ev: Option<Event> = match op {
                Op::Tick => engine.tick(),
                Op::Toggle => engine.toggle(),
                Op::Skip => engine.skip().ok(),
                Op::Reset => Some(engine.reset()),
                Op::Interrupt => Some(engine.pattern_interrupt()),
                Op::TwoMinute => Some(engine.two_minute_rule()),
                Op::Dismiss => { engine.dismiss_interstitial(); None }
            };
            if let Some(session) = ev.as_ref().and_then(Event::logged) {
                reported.push(session.id.clone());
            }
        }
        let logged: Vec<_> = log.entries().into_iter().map(|s| s.id).collect();
        prop_assert_eq!(logged, reported);
    }
}
