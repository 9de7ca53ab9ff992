mod availability;
mod catalog;
mod error;
mod fees;
mod mutations;
mod planner;
mod queries;

pub use error::EngineError;
pub use fees::{entrance_fee, total};

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};

use crate::model::*;
use crate::wal::Wal;

pub type SharedResource = Arc<RwLock<Resource>>;

/// Tables and rooms number independently, so a resource is keyed by both.
pub(crate) type ResourceKey = (ResourceKind, ResourceId);

/// All bookings plus the date index. Guarded by a single RwLock so an
/// availability check and the commit that acts on it observe one snapshot.
pub(crate) struct Ledger {
    bookings: BTreeMap<BookingId, Booking>,
    /// booking_date → booking ids, maintained on insert and date edits.
    by_date: BTreeMap<NaiveDate, Vec<BookingId>>,
    next_id: BookingId,
}

impl Ledger {
    fn new() -> Self {
        Self {
            bookings: BTreeMap::new(),
            by_date: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub(crate) fn next_id(&self) -> BookingId {
        self.next_id
    }

    pub(crate) fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: BookingId) -> Option<&mut Booking> {
        self.bookings.get_mut(&id)
    }

    /// Iterate bookings in ascending id order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.values()
    }

    /// Ids booked on an exact date, in insertion order.
    pub(crate) fn ids_on(&self, date: NaiveDate) -> &[BookingId] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn insert(&mut self, booking: Booking) {
        self.next_id = self.next_id.max(booking.id + 1);
        self.by_date
            .entry(booking.booking_date)
            .or_default()
            .push(booking.id);
        self.bookings.insert(booking.id, booking);
    }

    /// Apply a patch to an existing booking, keeping the date index in step.
    /// Returns false if the id is unknown.
    pub(crate) fn apply_patch(
        &mut self,
        id: BookingId,
        patch: &BookingPatch,
        updated_at: chrono::NaiveDateTime,
    ) -> bool {
        let Some(booking) = self.bookings.get_mut(&id) else {
            return false;
        };
        let old_date = booking.booking_date;
        patch.apply(booking);
        booking.updated_at = updated_at;
        let new_date = booking.booking_date;
        if new_date != old_date {
            if let Some(ids) = self.by_date.get_mut(&old_date) {
                ids.retain(|b| *b != id);
            }
            self.by_date.entry(new_date).or_default().push(id);
        }
        true
    }
}

pub struct Engine {
    pub(crate) catalog: DashMap<ResourceKey, SharedResource>,
    pub(crate) ledger: RwLock<Ledger>,
    wal: Mutex<Wal>,
}

/// Apply a replayed event. Startup only — the engine is the sole owner of the
/// Arcs here, so try_write always succeeds instantly (no contention).
fn apply_replayed(catalog: &DashMap<ResourceKey, SharedResource>, ledger: &mut Ledger, event: Event) {
    match event {
        Event::ResourceSeeded {
            id,
            kind,
            name,
            capacity,
            price,
        } => {
            let resource = Resource {
                id,
                kind,
                name,
                capacity,
                price,
                status: ResourceStatus::Available,
            };
            catalog.insert((kind, id), Arc::new(RwLock::new(resource)));
        }
        Event::ResourceStatusSet { kind, ids, status } => {
            for id in ids {
                if let Some(entry) = catalog.get(&(kind, id)) {
                    entry
                        .try_write()
                        .expect("replay: uncontended write")
                        .status = status;
                }
            }
        }
        Event::BookingCreated { booking } => {
            for &kind in &[ResourceKind::Table, ResourceKind::Room] {
                for &rid in booking.resource_ids(kind) {
                    if let Some(entry) = catalog.get(&(kind, rid)) {
                        entry
                            .try_write()
                            .expect("replay: uncontended write")
                            .status = ResourceStatus::Occupied;
                    }
                }
            }
            ledger.insert(booking);
        }
        Event::BookingEdited {
            id,
            patch,
            updated_at,
        } => {
            ledger.apply_patch(id, &patch, updated_at);
        }
        Event::PaymentAdded {
            id,
            amount,
            updated_at,
        } => {
            if let Some(b) = ledger.get_mut(id) {
                b.amount_paid += amount;
                b.updated_at = updated_at;
            }
        }
        Event::BookingCheckedOut { id, updated_at } => {
            if let Some(b) = ledger.get_mut(id)
                && b.status == BookingStatus::CheckedIn {
                    b.status = BookingStatus::CheckedOut;
                    b.updated_at = updated_at;
                }
        }
        Event::BookingCancelled { id, updated_at } => {
            if let Some(b) = ledger.get_mut(id)
                && b.status == BookingStatus::CheckedIn {
                    b.status = BookingStatus::Cancelled;
                    b.updated_at = updated_at;
                }
        }
    }
}

impl Engine {
    /// Open the engine: replay the WAL into memory, then seed the default
    /// inventory if the catalog came up empty (first run).
    pub fn new(wal_path: &Path) -> io::Result<Self> {
        let events = Wal::replay(wal_path)?;
        let mut wal = Wal::open(wal_path)?;

        let catalog = DashMap::new();
        let mut ledger = Ledger::new();
        for event in events {
            apply_replayed(&catalog, &mut ledger, event);
        }

        if catalog.is_empty() {
            catalog::seed_defaults(&catalog, &mut wal)?;
        }

        Ok(Self {
            catalog,
            ledger: RwLock::new(ledger),
            wal: Mutex::new(wal),
        })
    }

    /// Durably append one event. State must only be mutated after this
    /// returns Ok — a failed append leaves memory untouched (full rollback).
    pub(crate) async fn wal_append(&self, event: &Event) -> Result<(), EngineError> {
        let start = std::time::Instant::now();
        let result = self.wal.lock().await.append(event);
        metrics::histogram!(crate::observability::WAL_APPEND_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        result.map_err(|e| EngineError::Store(e.to_string()))
    }

    pub async fn wal_appends_since_compact(&self) -> u64 {
        self.wal.lock().await.appends_since_compact()
    }

    /// Rewrite the WAL with only the events needed to recreate current state.
    pub async fn compact_wal(&self) -> Result<(), EngineError> {
        // Hold the ledger write lock so no commit interleaves with the snapshot.
        let ledger = self.ledger.write().await;

        let mut events = Vec::new();
        let mut keys: Vec<ResourceKey> = self.catalog.iter().map(|e| *e.key()).collect();
        keys.sort();

        let mut statuses: BTreeMap<ResourceKey, ResourceStatus> = BTreeMap::new();
        for key in &keys {
            let Some(rs) = self.catalog.get(key).map(|e| e.value().clone()) else {
                continue;
            };
            let resource = rs.read().await.clone();
            statuses.insert(*key, resource.status);
            events.push(Event::ResourceSeeded {
                id: resource.id,
                kind: resource.kind,
                name: resource.name,
                capacity: resource.capacity,
                price: resource.price,
            });
        }

        // Replaying BookingCreated flips every referenced resource to occupied,
        // so compute what replay would produce and correct the differences.
        let mut implied: BTreeMap<ResourceKey, ResourceStatus> = BTreeMap::new();
        for booking in ledger.iter() {
            events.push(Event::BookingCreated {
                booking: booking.clone(),
            });
            for &kind in &[ResourceKind::Table, ResourceKind::Room] {
                for &rid in booking.resource_ids(kind) {
                    implied.insert((kind, rid), ResourceStatus::Occupied);
                }
            }
        }

        let mut fixes: BTreeMap<(ResourceKind, ResourceStatus), Vec<ResourceId>> = BTreeMap::new();
        for (key, status) in &statuses {
            let replayed = implied
                .get(key)
                .copied()
                .unwrap_or(ResourceStatus::Available);
            if replayed != *status {
                fixes.entry((key.0, *status)).or_default().push(key.1);
            }
        }
        for ((kind, status), ids) in fixes {
            events.push(Event::ResourceStatusSet { kind, ids, status });
        }

        self.wal
            .lock()
            .await
            .compact(&events)
            .map_err(|e| EngineError::Store(e.to_string()))
    }
}
