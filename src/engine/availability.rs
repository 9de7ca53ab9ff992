use chrono::NaiveDate;

use crate::model::*;

use super::{Engine, EngineError, Ledger};

/// True iff `id` is referenced by a checked-in booking on that exact date.
/// Cancelled and checked-out bookings are history and never conflict.
pub(crate) fn booked_on(
    ledger: &Ledger,
    kind: ResourceKind,
    id: ResourceId,
    date: NaiveDate,
) -> bool {
    ledger.ids_on(date).iter().any(|bid| {
        ledger
            .get(*bid)
            .is_some_and(|b| b.status == BookingStatus::CheckedIn && b.references(kind, id))
    })
}

/// Check a full candidate set against one ledger snapshot, returning the
/// first conflict found. Tables are checked before rooms.
pub(crate) fn validate_against(
    ledger: &Ledger,
    date: NaiveDate,
    table_ids: &[ResourceId],
    room_ids: &[ResourceId],
) -> Result<(), EngineError> {
    for &id in table_ids {
        if booked_on(ledger, ResourceKind::Table, id, date) {
            return Err(EngineError::Conflict {
                kind: ResourceKind::Table,
                id,
                date,
            });
        }
    }
    for &id in room_ids {
        if booked_on(ledger, ResourceKind::Room, id, date) {
            return Err(EngineError::Conflict {
                kind: ResourceKind::Room,
                id,
                date,
            });
        }
    }
    Ok(())
}

impl Engine {
    /// Is any of `ids` committed on `date` by an active booking?
    /// Empty input is vacuously free.
    pub async fn is_booked(
        &self,
        kind: ResourceKind,
        ids: &[ResourceId],
        date: NaiveDate,
    ) -> bool {
        if ids.is_empty() {
            return false;
        }
        let ledger = self.ledger.read().await;
        ids.iter().any(|&id| booked_on(&ledger, kind, id, date))
    }

    /// Advisory availability check for callers assembling a booking.
    /// Returns `(true, "OK")` or `(false, message)` naming the first conflict.
    ///
    /// This is a snapshot read; `create_booking` re-validates under its own
    /// write lock, so a positive answer here can still lose the race.
    pub async fn check_availability(
        &self,
        date: NaiveDate,
        table_ids: &[ResourceId],
        room_ids: &[ResourceId],
    ) -> (bool, String) {
        let ledger = self.ledger.read().await;
        match validate_against(&ledger, date, table_ids, room_ids) {
            Ok(()) => (true, "OK".to_string()),
            Err(e) => (false, e.to_string()),
        }
    }
}
