use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::*;
use crate::policy::CHECKOUT_CUTOFF_HOUR;

use super::{Engine, EngineError};

impl Engine {
    pub async fn get_booking(&self, id: BookingId) -> Result<Booking, EngineError> {
        let ledger = self.ledger.read().await;
        ledger
            .get(id)
            .cloned()
            .ok_or(EngineError::BookingNotFound(id))
    }

    /// Bookings for an exact date, ordered by id.
    pub async fn bookings_on(&self, date: NaiveDate) -> Vec<Booking> {
        let ledger = self.ledger.read().await;
        let mut rows: Vec<Booking> = ledger
            .ids_on(date)
            .iter()
            .filter_map(|id| ledger.get(*id).cloned())
            .collect();
        rows.sort_by_key(|b| b.id);
        rows
    }

    /// Bookings with `from <= booking_date <= to`, ordered by (date, id).
    pub async fn bookings_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<Booking> {
        let ledger = self.ledger.read().await;
        let mut rows: Vec<Booking> = ledger
            .iter()
            .filter(|b| b.booking_date >= from && b.booking_date <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.booking_date, b.id));
        rows
    }

    /// Every booking on record, ordered by (date, id).
    pub async fn list_bookings(&self) -> Vec<Booking> {
        self.bookings_between(NaiveDate::MIN, NaiveDate::MAX).await
    }

    /// Checked-in bookings whose expected checkout has passed, in id order.
    ///
    /// Nothing is flagged before the daily cutoff. Packages matching
    /// "overnight" or "complete stay" (case-insensitive) are due at the
    /// cutoff on the day after their booking date; Day Tour never expires.
    /// Read-only — remediation (manual checkout) is the caller's call.
    pub async fn find_overdue(&self, now: NaiveDateTime) -> Vec<BookingId> {
        let cutoff_time = NaiveTime::from_hms_opt(CHECKOUT_CUTOFF_HOUR, 0, 0).unwrap();
        if now < now.date().and_time(cutoff_time) {
            return Vec::new();
        }

        let ledger = self.ledger.read().await;
        let mut overdue = Vec::new();
        for booking in ledger.iter() {
            if booking.status != BookingStatus::CheckedIn {
                continue;
            }
            let package = booking.package.to_lowercase();
            if package != "overnight" && package != "complete stay" {
                continue;
            }
            let deadline = (booking.booking_date + Duration::days(1)).and_time(cutoff_time);
            if now >= deadline {
                overdue.push(booking.id);
            }
        }
        overdue
    }
}
