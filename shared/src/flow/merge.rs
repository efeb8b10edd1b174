//! Merging event streams into one timeline

use super::event::{EventStreams, FlowEvent};
use crate::types::parse_calendar_date;

/// A dated, ordered timeline plus the number of rows that could not be placed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedEvents {
    pub events: Vec<FlowEvent>,
    pub dropped: usize,
}

/// Merge the four streams into one timeline ordered by `(date, kind)`.
///
/// Rows without a parsable date are dropped. The sort is stable, so rows of
/// the same kind on the same date keep their input order.
pub fn merge_events(streams: EventStreams) -> MergedEvents {
    let mut dropped = 0;

    let mut events: Vec<FlowEvent> = streams
        .into_tagged()
        .filter_map(|(kind, raw)| {
            match raw.date.as_deref().and_then(parse_calendar_date) {
                Some(date) => Some(FlowEvent::new(kind, date, raw.quantity, raw.label)),
                None => {
                    dropped += 1;
                    None
                }
            }
        })
        .collect();

    events.sort_by_key(|event| (event.date, event.kind));

    MergedEvents { events, dropped }
}
