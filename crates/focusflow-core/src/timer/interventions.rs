//! Fixed content for the pattern-interrupt and two-minute-rule actions.

/// Length of a two-minute-rule study segment, in seconds.
pub const TWO_MINUTE_SECS: u64 = 2 * 60;

/// Short physical or mental resets offered by a pattern interrupt.
pub const INTERVENTIONS: [&str; 5] = [
    "Stand up and do 10 jumping jacks.",
    "Splash water on your face (if possible).",
    "Take 5 deep breaths, focusing on your exhale.",
    "Quick Brain Dump: Type out frustrations for 60 seconds on a piece of paper.",
    "Stretch your arms and neck for 30 seconds.",
];
