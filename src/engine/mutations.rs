use chrono::NaiveDateTime;
use tracing::info;

use crate::model::*;
use crate::observability;
use crate::policy::{MAX_GUEST_NAME_LEN, MAX_PACKAGE_LEN};

use super::availability::validate_against;
use super::{Engine, EngineError};

fn now_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Drop duplicate ids, keeping first occurrence order.
fn dedup_ordered(ids: &[ResourceId]) -> Vec<ResourceId> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn validate_request(req: &BookingRequest) -> Result<(), EngineError> {
    if req.guest_name.trim().is_empty() {
        return Err(EngineError::Validation("guest name is required".into()));
    }
    if req.guest_name.len() > MAX_GUEST_NAME_LEN {
        return Err(EngineError::Validation("guest name too long".into()));
    }
    if req.package.len() > MAX_PACKAGE_LEN {
        return Err(EngineError::Validation("package name too long".into()));
    }
    if req.adults + req.children == 0 {
        return Err(EngineError::Validation(
            "at least one guest is required".into(),
        ));
    }
    if req.table_fee < 0.0
        || req.room_fee < 0.0
        || req.total_amount < 0.0
        || req.amount_paid < 0.0
    {
        return Err(EngineError::Validation(
            "amounts must be non-negative".into(),
        ));
    }
    if req.package == DAY_TOUR && !req.room_ids.is_empty() {
        return Err(EngineError::Validation(
            "Day Tour bookings cannot include rooms".into(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Create a booking and mark every referenced resource occupied, as one
    /// atomic unit: the availability re-check, the WAL record, and the state
    /// mutations all happen under the ledger write lock, so two concurrent
    /// requests for the same resource and date cannot both succeed.
    pub async fn create_booking(&self, req: BookingRequest) -> Result<BookingId, EngineError> {
        validate_request(&req)?;
        let table_ids = dedup_ordered(&req.table_ids);
        let room_ids = dedup_ordered(&req.room_ids);

        let mut tables = Vec::with_capacity(table_ids.len());
        for &id in &table_ids {
            tables.push(self.resource(ResourceKind::Table, id).ok_or(
                EngineError::ResourceNotFound {
                    kind: ResourceKind::Table,
                    id,
                },
            )?);
        }
        let mut rooms = Vec::with_capacity(room_ids.len());
        for &id in &room_ids {
            rooms.push(self.resource(ResourceKind::Room, id).ok_or(
                EngineError::ResourceNotFound {
                    kind: ResourceKind::Room,
                    id,
                },
            )?);
        }

        let mut ledger = self.ledger.write().await;

        if let Err(e) = validate_against(&ledger, req.booking_date, &table_ids, &room_ids) {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(e);
        }

        let now = now_local();
        let booking = Booking {
            id: ledger.next_id(),
            guest_name: req.guest_name,
            booking_date: req.booking_date,
            adults: req.adults,
            children: req.children,
            guest_count: req.adults + req.children,
            package: req.package,
            table_ids,
            room_ids,
            table_fee: req.table_fee,
            room_fee: req.room_fee,
            entrance_fee: super::entrance_fee(Some(req.adults), Some(req.children)),
            total_amount: req.total_amount,
            amount_paid: req.amount_paid,
            status: BookingStatus::CheckedIn,
            checkin_time: now,
            updated_at: now,
        };

        self.wal_append(&Event::BookingCreated {
            booking: booking.clone(),
        })
        .await?;

        for rs in tables.iter().chain(rooms.iter()) {
            rs.write().await.status = ResourceStatus::Occupied;
        }
        let id = booking.id;
        let date = booking.booking_date;
        ledger.insert(booking);

        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
        info!(booking = id, %date, "booking checked in");
        Ok(id)
    }

    /// Partial update of a booking's mutable fields. The guest count is not
    /// recomputed. An empty patch is a no-op.
    pub async fn edit_booking(
        &self,
        id: BookingId,
        patch: BookingPatch,
    ) -> Result<(), EngineError> {
        if let Some(ref name) = patch.guest_name
            && name.trim().is_empty() {
                return Err(EngineError::Validation("guest name is required".into()));
            }

        let mut ledger = self.ledger.write().await;
        if ledger.get(id).is_none() {
            return Err(EngineError::BookingNotFound(id));
        }
        if patch.is_empty() {
            return Ok(());
        }

        let updated_at = now_local();
        self.wal_append(&Event::BookingEdited {
            id,
            patch: patch.clone(),
            updated_at,
        })
        .await?;
        ledger.apply_patch(id, &patch, updated_at);
        info!(booking = id, "booking edited");
        Ok(())
    }

    /// Record a payment increment. Negative amounts are allowed (corrections);
    /// no floor is enforced.
    pub async fn add_payment(&self, id: BookingId, amount: f64) -> Result<(), EngineError> {
        let mut ledger = self.ledger.write().await;
        if ledger.get(id).is_none() {
            return Err(EngineError::BookingNotFound(id));
        }

        let updated_at = now_local();
        self.wal_append(&Event::PaymentAdded {
            id,
            amount,
            updated_at,
        })
        .await?;
        let booking = ledger.get_mut(id).expect("checked above");
        booking.amount_paid += amount;
        booking.updated_at = updated_at;

        metrics::counter!(observability::PAYMENTS_RECORDED_TOTAL).increment(1);
        info!(booking = id, amount, "payment recorded");
        Ok(())
    }

    /// Transition to checked-out. Terminal: a second call (or a call on a
    /// cancelled booking) leaves the status untouched and reports no error.
    /// Resource occupancy is not freed here; see `set_status`.
    pub async fn checkout(&self, id: BookingId) -> Result<(), EngineError> {
        self.transition(id, BookingStatus::CheckedOut).await
    }

    /// Transition to cancelled. Same terminal-state rules as `checkout`.
    pub async fn cancel(&self, id: BookingId) -> Result<(), EngineError> {
        self.transition(id, BookingStatus::Cancelled).await
    }

    async fn transition(&self, id: BookingId, to: BookingStatus) -> Result<(), EngineError> {
        let mut ledger = self.ledger.write().await;
        let Some(booking) = ledger.get(id) else {
            return Err(EngineError::BookingNotFound(id));
        };
        if booking.status.is_terminal() {
            return Ok(());
        }

        let updated_at = now_local();
        let event = match to {
            BookingStatus::CheckedOut => Event::BookingCheckedOut { id, updated_at },
            BookingStatus::Cancelled => Event::BookingCancelled { id, updated_at },
            BookingStatus::CheckedIn => unreachable!("checked-in is the initial state"),
        };
        self.wal_append(&event).await?;

        let booking = ledger.get_mut(id).expect("checked above");
        booking.status = to;
        booking.updated_at = updated_at;
        info!(booking = id, status = %to, "booking closed");
        Ok(())
    }
}
