//! Daily tournament identity and the entry window.

use time::macros::time;
use time::{Date, Duration, OffsetDateTime, Time, UtcOffset};

pub const TOURNAMENT_DURATION: Duration = Duration::hours(24);
pub const DEFAULT_ENTRY_CUTOFF: Time = time!(12:00);

/// `YYYY-MM-DD` of the given UTC date.
pub fn tournament_id_for(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Identity and bounds of a tournament started at `now`.
pub fn tournament_bounds(now: OffsetDateTime) -> (String, OffsetDateTime, OffsetDateTime) {
    let now = now.to_offset(UtcOffset::UTC);
    (
        tournament_id_for(now.date()),
        now,
        now + TOURNAMENT_DURATION,
    )
}

/// Entries are accepted up to and including `cutoff` on every UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryWindow {
    pub cutoff: Time,
}

impl EntryWindow {
    /// `None` unless `hour` is 1..=24; 24 keeps the window open all day.
    pub fn from_hour(hour: u8) -> Option<Self> {
        match hour {
            24 => Some(Self {
                cutoff: time!(23:59:59.999_999_999),
            }),
            1..=23 => Time::from_hms(hour, 0, 0)
                .ok()
                .map(|cutoff| Self { cutoff }),
            _ => None,
        }
    }

    pub fn is_open(&self, now: OffsetDateTime) -> bool {
        now.to_offset(UtcOffset::UTC).time() <= self.cutoff
    }
}

impl Default for EntryWindow {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_ENTRY_CUTOFF,
        }
    }
}
