use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Resource ids are unique within a kind (tables and rooms number independently).
pub type ResourceId = u64;

/// Booking ids are unique and monotonic across the whole ledger.
pub type BookingId = u64;

/// Package names with fixed fee/cutoff semantics. The package field itself is
/// an open string domain — anything else falls into the default fee branch.
pub const DAY_TOUR: &str = "Day Tour";
pub const OVERNIGHT: &str = "Overnight";
pub const COMPLETE_STAY: &str = "Complete Stay";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Table,
    Room,
}

impl ResourceKind {
    /// Upper bound on subset size for the planner's combinatorial fallback.
    pub fn combination_bound(&self) -> usize {
        match self {
            ResourceKind::Table => crate::policy::MAX_TABLE_COMBINATION,
            ResourceKind::Room => crate::policy::MAX_ROOM_COMBINATION,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Table => write!(f, "Table"),
            ResourceKind::Room => write!(f, "Room"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceStatus {
    Available,
    Occupied,
}

/// A bookable physical unit. Status is written only by the engine's commit
/// path; everyone else sees cloned snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub name: String,
    pub capacity: u32,
    pub price: f64,
    pub status: ResourceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    /// Checked-out and cancelled are terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::CheckedIn)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::CheckedIn => write!(f, "checked-in"),
            BookingStatus::CheckedOut => write!(f, "checked-out"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub guest_name: String,
    pub booking_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
    /// adults + children at creation time; not recomputed on edit.
    pub guest_count: u32,
    pub package: String,
    pub table_ids: Vec<ResourceId>,
    pub room_ids: Vec<ResourceId>,
    pub table_fee: f64,
    pub room_fee: f64,
    pub entrance_fee: f64,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub status: BookingStatus,
    pub checkin_time: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn resource_ids(&self, kind: ResourceKind) -> &[ResourceId] {
        match kind {
            ResourceKind::Table => &self.table_ids,
            ResourceKind::Room => &self.room_ids,
        }
    }

    /// True if this booking references the given resource.
    pub fn references(&self, kind: ResourceKind, id: ResourceId) -> bool {
        self.resource_ids(kind).contains(&id)
    }
}

/// Input shape for creating a booking. Fees are supplied by the caller
/// (the fee calculator is a separate pure surface); the entrance fee and
/// guest count are derived inside the transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub guest_name: String,
    pub booking_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub package: String,
    pub table_ids: Vec<ResourceId>,
    pub room_ids: Vec<ResourceId>,
    pub table_fee: f64,
    pub room_fee: f64,
    pub total_amount: f64,
    pub amount_paid: f64,
}

/// Partial update of a booking's mutable fields. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingPatch {
    pub guest_name: Option<String>,
    pub booking_date: Option<NaiveDate>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub package: Option<String>,
    pub table_ids: Option<Vec<ResourceId>>,
    pub room_ids: Option<Vec<ResourceId>>,
    pub table_fee: Option<f64>,
    pub room_fee: Option<f64>,
    pub total_amount: Option<f64>,
    pub amount_paid: Option<f64>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        *self == BookingPatch::default()
    }

    pub fn apply(&self, booking: &mut Booking) {
        if let Some(ref v) = self.guest_name {
            booking.guest_name = v.clone();
        }
        if let Some(v) = self.booking_date {
            booking.booking_date = v;
        }
        if let Some(v) = self.adults {
            booking.adults = v;
        }
        if let Some(v) = self.children {
            booking.children = v;
        }
        if let Some(ref v) = self.package {
            booking.package = v.clone();
        }
        if let Some(ref v) = self.table_ids {
            booking.table_ids = v.clone();
        }
        if let Some(ref v) = self.room_ids {
            booking.room_ids = v.clone();
        }
        if let Some(v) = self.table_fee {
            booking.table_fee = v;
        }
        if let Some(v) = self.room_fee {
            booking.room_fee = v;
        }
        if let Some(v) = self.total_amount {
            booking.total_amount = v;
        }
        if let Some(v) = self.amount_paid {
            booking.amount_paid = v;
        }
    }
}

/// The event types — flat, no nesting. This is the WAL record format.
/// `BookingCreated` carries the whole booking so the insert and the
/// occupancy flips commit as one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ResourceSeeded {
        id: ResourceId,
        kind: ResourceKind,
        name: String,
        capacity: u32,
        price: f64,
    },
    ResourceStatusSet {
        kind: ResourceKind,
        ids: Vec<ResourceId>,
        status: ResourceStatus,
    },
    BookingCreated {
        booking: Booking,
    },
    BookingEdited {
        id: BookingId,
        patch: BookingPatch,
        updated_at: NaiveDateTime,
    },
    PaymentAdded {
        id: BookingId,
        amount: f64,
        updated_at: NaiveDateTime,
    },
    BookingCheckedOut {
        id: BookingId,
        updated_at: NaiveDateTime,
    },
    BookingCancelled {
        id: BookingId,
        updated_at: NaiveDateTime,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking() -> Booking {
        Booking {
            id: 1,
            guest_name: "Dela Cruz".into(),
            booking_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            adults: 2,
            children: 1,
            guest_count: 3,
            package: DAY_TOUR.into(),
            table_ids: vec![3, 4],
            room_ids: vec![],
            table_fee: 600.0,
            room_fee: 0.0,
            entrance_fee: 430.0,
            total_amount: 1030.0,
            amount_paid: 500.0,
            status: BookingStatus::CheckedIn,
            checkin_time: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn booking_references_by_kind() {
        let b = sample_booking();
        assert!(b.references(ResourceKind::Table, 3));
        assert!(!b.references(ResourceKind::Table, 5));
        assert!(!b.references(ResourceKind::Room, 3));
    }

    #[test]
    fn status_display_matches_ledger_wording() {
        assert_eq!(BookingStatus::CheckedIn.to_string(), "checked-in");
        assert_eq!(BookingStatus::CheckedOut.to_string(), "checked-out");
        assert_eq!(BookingStatus::Cancelled.to_string(), "cancelled");
        assert!(!BookingStatus::CheckedIn.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut b = sample_booking();
        let patch = BookingPatch {
            guest_name: Some("Reyes".into()),
            amount_paid: Some(1030.0),
            ..Default::default()
        };
        patch.apply(&mut b);
        assert_eq!(b.guest_name, "Reyes");
        assert_eq!(b.amount_paid, 1030.0);
        // untouched fields keep their values
        assert_eq!(b.package, DAY_TOUR);
        assert_eq!(b.guest_count, 3);
    }

    #[test]
    fn empty_patch_detected() {
        assert!(BookingPatch::default().is_empty());
        let p = BookingPatch {
            adults: Some(4),
            ..Default::default()
        };
        assert!(!p.is_empty());
    }

    #[test]
    fn event_serialization_roundtrip() {
        let event = Event::BookingCreated {
            booking: sample_booking(),
        };
        let bytes = bincode::serialize(&event).unwrap();
        let decoded: Event = bincode::deserialize(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}
