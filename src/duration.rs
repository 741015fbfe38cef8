//! Duration model: hours/minutes/seconds entry, total-seconds arithmetic and
//! `HH:MM:SS` rendering

use serde::{Deserialize, Serialize};

/// Upper bounds enforced by the duration entry surface
pub const MAX_ENTRY_HOURS: i64 = 23;
pub const MAX_ENTRY_MINUTES: i64 = 59;
pub const MAX_ENTRY_SECONDS: i64 = 59;

/// Convert an hours/minutes/seconds triple to a total-seconds count.
///
/// No validation is done here; range checks belong to the entry surface
/// (see [`DurationInput::clamped`]).
pub fn to_seconds(hours: i64, minutes: i64, seconds: i64) -> i64 {
    hours * 3600 + minutes * 60 + seconds
}

/// Render a total-seconds count as zero-padded `HH:MM:SS`.
///
/// Hours are not wrapped at 24: `90000` renders as `25:00:00`.
pub fn format_time(total_seconds: u64) -> String {
    let parts = DurationParts::from_seconds(total_seconds);
    format!(
        "{:02}:{:02}:{:02}",
        parts.hours, parts.minutes, parts.seconds
    )
}

/// A total-seconds count split back into display components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    pub fn from_seconds(total_seconds: u64) -> Self {
        Self {
            hours: total_seconds / 3600,
            minutes: (total_seconds % 3600) / 60,
            seconds: total_seconds % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

/// Raw duration as typed by the user, before clamping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationInput {
    #[serde(default)]
    pub hours: i64,
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub seconds: i64,
}

impl DurationInput {
    pub fn new(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self { hours, minutes, seconds }
    }

    /// Clamp each field into the range offered by the entry form
    pub fn clamped(&self) -> Self {
        Self {
            hours: self.hours.clamp(0, MAX_ENTRY_HOURS),
            minutes: self.minutes.clamp(0, MAX_ENTRY_MINUTES),
            seconds: self.seconds.clamp(0, MAX_ENTRY_SECONDS),
        }
    }

    /// Clamp, then convert to a non-negative total
    pub fn total_seconds(&self) -> u64 {
        let c = self.clamped();
        // clamped fields are non-negative, so the sum is too
        to_seconds(c.hours, c.minutes, c.seconds).max(0) as u64
    }
}

/// Quick-pick duration offered next to the entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub label: &'static str,
    pub hours: i64,
    pub minutes: i64,
}

pub const PRESETS: [Preset; 4] = [
    Preset { label: "4:00", hours: 4, minutes: 0 },
    Preset { label: "5:00", hours: 5, minutes: 0 },
    Preset { label: "9:30", hours: 9, minutes: 30 },
    Preset { label: "10:00", hours: 10, minutes: 0 },
];

impl Preset {
    /// Look up a preset by its label (e.g. `"9:30"`)
    pub fn find(label: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| p.label == label)
    }

    /// Presets always set seconds to zero
    pub fn input(&self) -> DurationInput {
        DurationInput::new(self.hours, self.minutes, 0)
    }
}
