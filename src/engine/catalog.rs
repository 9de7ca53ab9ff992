use std::io;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::info;

use crate::model::*;
use crate::wal::Wal;

use super::{Engine, EngineError, ResourceKey, SharedResource};

/// Reference inventory written on first initialization.
fn default_inventory() -> Vec<(ResourceKind, &'static str, u32, f64)> {
    let mut rows = vec![
        (ResourceKind::Table, "Table 1", 5, 300.0),
        (ResourceKind::Table, "Table 2", 5, 300.0),
        (ResourceKind::Table, "Table 3", 5, 300.0),
        (ResourceKind::Table, "Table 4", 5, 300.0),
        (ResourceKind::Table, "Table 5", 5, 300.0),
        (ResourceKind::Table, "Table 6", 5, 300.0),
        (ResourceKind::Table, "Table 7", 5, 300.0),
        (ResourceKind::Table, "Table 8", 5, 300.0),
        (ResourceKind::Table, "Family Table 1", 10, 800.0),
        (ResourceKind::Table, "Family Table 2", 10, 800.0),
        (ResourceKind::Table, "Family Table 3", 10, 800.0),
    ];
    rows.extend([
        (ResourceKind::Room, "Standard Room A", 2, 800.0),
        (ResourceKind::Room, "Standard Room B", 2, 800.0),
        (ResourceKind::Room, "Family Room A", 6, 1800.0),
        (ResourceKind::Room, "Family Room B", 8, 2200.0),
        (ResourceKind::Room, "Barkada Room", 12, 3500.0),
        (ResourceKind::Room, "Dorm Room", 20, 6000.0),
    ]);
    rows
}

/// Seed the default tables and rooms, persisting one event per resource.
/// Ids count up from 1 independently per kind.
pub(super) fn seed_defaults(
    catalog: &DashMap<ResourceKey, SharedResource>,
    wal: &mut Wal,
) -> io::Result<()> {
    let mut next_table: ResourceId = 1;
    let mut next_room: ResourceId = 1;
    for (kind, name, capacity, price) in default_inventory() {
        let id = match kind {
            ResourceKind::Table => {
                let id = next_table;
                next_table += 1;
                id
            }
            ResourceKind::Room => {
                let id = next_room;
                next_room += 1;
                id
            }
        };
        wal.append(&Event::ResourceSeeded {
            id,
            kind,
            name: name.to_string(),
            capacity,
            price,
        })?;
        let resource = Resource {
            id,
            kind,
            name: name.to_string(),
            capacity,
            price,
            status: ResourceStatus::Available,
        };
        catalog.insert((kind, id), Arc::new(RwLock::new(resource)));
    }
    info!(
        tables = next_table - 1,
        rooms = next_room - 1,
        "seeded default inventory"
    );
    Ok(())
}

impl Engine {
    pub(crate) fn resource(&self, kind: ResourceKind, id: ResourceId) -> Option<SharedResource> {
        self.catalog.get(&(kind, id)).map(|e| e.value().clone())
    }

    /// Snapshot of all resources of a kind, ordered by (capacity, id).
    pub async fn list_resources(&self, kind: ResourceKind) -> Vec<Resource> {
        let shared: Vec<SharedResource> = self
            .catalog
            .iter()
            .filter(|e| e.key().0 == kind)
            .map(|e| e.value().clone())
            .collect();
        let mut rows = Vec::with_capacity(shared.len());
        for rs in shared {
            rows.push(rs.read().await.clone());
        }
        rows.sort_by_key(|r| (r.capacity, r.id));
        rows
    }

    /// Bulk status update. No-op on empty input; fails before any mutation
    /// if an id does not exist.
    pub async fn set_status(
        &self,
        kind: ResourceKind,
        ids: &[ResourceId],
        status: ResourceStatus,
    ) -> Result<(), EngineError> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut shared = Vec::with_capacity(ids.len());
        for &id in ids {
            let rs = self
                .resource(kind, id)
                .ok_or(EngineError::ResourceNotFound { kind, id })?;
            shared.push(rs);
        }

        self.wal_append(&Event::ResourceStatusSet {
            kind,
            ids: ids.to_vec(),
            status,
        })
        .await?;

        for rs in shared {
            rs.write().await.status = status;
        }
        Ok(())
    }
}
