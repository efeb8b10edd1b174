//! Flow events and the raw rows they are built from

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of a flow event.
///
/// Variant order is the same-date tie-break used by [`merge`](super::merge):
/// shipments, then transfers in, then transfers out, then snapshots. A stock
/// count taken on a given day therefore always sees that day's movements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Shipment,
    TransferIn,
    TransferOut,
    Snapshot,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Shipment => "shipment",
            EventKind::TransferIn => "transfer_in",
            EventKind::TransferOut => "transfer_out",
            EventKind::Snapshot => "snapshot",
        }
    }

    /// Shipments and incoming transfers add stock to the tracked flow
    pub fn is_receiving(&self) -> bool {
        matches!(self, EventKind::Shipment | EventKind::TransferIn)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Shipment => write!(f, "Shipment"),
            EventKind::TransferIn => write!(f, "Transfer In"),
            EventKind::TransferOut => write!(f, "Transfer Out"),
            EventKind::Snapshot => write!(f, "Inventory Count"),
        }
    }
}

/// An event row as returned by the loader, before its date is validated.
///
/// `quantity` is already signed: negative for outgoing transfers, the
/// absolute on-hand count for snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawEvent {
    pub date: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub label: String,
}

impl RawEvent {
    pub fn new(date: impl Into<String>, quantity: i64, label: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            quantity,
            label: label.into(),
        }
    }

    pub fn undated(quantity: i64, label: impl Into<String>) -> Self {
        Self {
            date: None,
            quantity,
            label: label.into(),
        }
    }
}

/// The four event collections for one report scope
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EventStreams {
    pub shipments: Vec<RawEvent>,
    pub transfers_in: Vec<RawEvent>,
    pub transfers_out: Vec<RawEvent>,
    pub snapshots: Vec<RawEvent>,
}

impl EventStreams {
    pub fn len(&self) -> usize {
        self.shipments.len()
            + self.transfers_in.len()
            + self.transfers_out.len()
            + self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tag every row with its kind, in stream order
    pub fn into_tagged(self) -> impl Iterator<Item = (EventKind, RawEvent)> {
        let tag = |kind: EventKind, rows: Vec<RawEvent>| rows.into_iter().map(move |r| (kind, r));

        tag(EventKind::Shipment, self.shipments)
            .chain(tag(EventKind::TransferIn, self.transfers_in))
            .chain(tag(EventKind::TransferOut, self.transfers_out))
            .chain(tag(EventKind::Snapshot, self.snapshots))
    }
}

/// A dated event ready for replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEvent {
    pub kind: EventKind,
    pub date: NaiveDate,
    pub quantity: i64,
    pub label: String,
}

impl FlowEvent {
    pub fn new(kind: EventKind, date: NaiveDate, quantity: i64, label: impl Into<String>) -> Self {
        Self {
            kind,
            date,
            quantity,
            label: label.into(),
        }
    }
}
