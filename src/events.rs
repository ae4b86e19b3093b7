// 📅 Event Impact - market events near a set's release date
// Each release gets one label: the strongest impact among events within ±30 days (to the second).

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnalysisError;
use crate::tables::EventInfluence;

/// Days on either side of a release that still count (inclusive)
pub const EVENT_WINDOW_DAYS: i64 = 30;

// ============================================================================
// EVENT IMPACT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventImpact {
    Positive,
    Neutral,
    Negative,
    /// No recognised event inside the window
    None,
}

impl EventImpact {
    /// Highest priority first
    pub const PRIORITY: [EventImpact; 3] =
        [EventImpact::Positive, EventImpact::Neutral, EventImpact::Negative];

    pub fn label(&self) -> &'static str {
        match self {
            EventImpact::Positive => "Positive",
            EventImpact::Neutral => "Neutral",
            EventImpact::Negative => "Negative",
            EventImpact::None => "None",
        }
    }
}

impl fmt::Display for EventImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// DATE PARSING
// ============================================================================

/// Parse a date cell. Blank → Ok(None); anything unparseable is an error.
///
/// Supports YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD (midnight) and ISO datetimes.
pub fn parse_date(value: Option<&str>, field: &'static str) -> Result<Option<NaiveDateTime>, AnalysisError> {
    let raw = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(None),
    };

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(Some(date.and_time(chrono::NaiveTime::MIN)));
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(datetime));
        }
    }

    Err(AnalysisError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

// ============================================================================
// DATED EVENTS
// ============================================================================

/// An event whose date has been parsed
#[derive(Debug, Clone, PartialEq)]
pub struct DatedEvent {
    /// None when the source cell was blank; such events never match a window
    pub date: Option<NaiveDateTime>,
    pub likely_impact: Option<String>,
}

/// Parse the date of every event up front so lookups compare real dates.
pub fn parse_events(events: &[EventInfluence]) -> Result<Vec<DatedEvent>, AnalysisError> {
    events
        .iter()
        .map(|event| {
            Ok(DatedEvent {
                date: parse_date(event.date.as_deref(), "Date")?,
                likely_impact: event.likely_impact.clone(),
            })
        })
        .collect()
}

/// Label for a release date: strongest impact among events within the window.
///
/// Priority is Positive > Neutral > Negative. An empty window, a missing
/// release date, or a window holding only unrecognised impacts gives `None`.
pub fn event_impact(release: Option<NaiveDateTime>, events: &[DatedEvent]) -> EventImpact {
    let release = match release {
        Some(date) => date,
        None => return EventImpact::None,
    };

    let window = Duration::days(EVENT_WINDOW_DAYS);
    let in_window: Vec<&str> = events
        .iter()
        .filter(|event| {
            event
                .date
                .map_or(false, |date| (date - release).abs() <= window)
        })
        .filter_map(|event| event.likely_impact.as_deref())
        .collect();

    EventImpact::PRIORITY
        .into_iter()
        .find(|impact| in_window.contains(&impact.label()))
        .unwrap_or(EventImpact::None)
}

// ============================================================================
// TESTS
// ============================================================================
