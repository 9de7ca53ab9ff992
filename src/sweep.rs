use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::engine::Engine;
use crate::policy::{COMPACT_CHECK_INTERVAL_SECS, SWEEP_INTERVAL_SECS};

/// Background task that periodically flags checked-in bookings past their
/// checkout deadline. Classification only — the flagged ids are logged and
/// counted, and checkout stays a manual decision.
pub async fn run_sweep(engine: Arc<Engine>) {
    let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
    loop {
        interval.tick().await;
        let now = chrono::Local::now().naive_local();
        let overdue = engine.find_overdue(now).await;
        if overdue.is_empty() {
            continue;
        }
        metrics::counter!(crate::observability::OVERDUE_FLAGGED_TOTAL)
            .increment(overdue.len() as u64);
        for id in overdue {
            warn!("booking {id} is past its checkout deadline");
        }
    }
}

/// Background task that compacts the WAL once enough appends have accumulated.
pub async fn run_compactor(engine: Arc<Engine>, threshold: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(COMPACT_CHECK_INTERVAL_SECS));
    loop {
        interval.tick().await;
        let appends = engine.wal_appends_since_compact().await;
        if appends < threshold {
            continue;
        }
        match engine.compact_wal().await {
            Ok(()) => info!("compacted WAL after {appends} appends"),
            Err(e) => warn!("WAL compaction failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::Engine;
    use crate::model::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn test_wal_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("palapa_test_sweep");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = std::fs::remove_file(&path);
        path
    }

    fn overnight_request(date: NaiveDate) -> BookingRequest {
        BookingRequest {
            guest_name: "Santos".into(),
            booking_date: date,
            adults: 2,
            children: 0,
            package: OVERNIGHT.into(),
            table_ids: vec![],
            room_ids: vec![1],
            table_fee: 0.0,
            room_fee: 800.0,
            total_amount: 1100.0,
            amount_paid: 1100.0,
        }
    }

    #[tokio::test]
    async fn sweep_flags_overnight_after_cutoff() {
        let path = test_wal_path("flags_after_cutoff.wal");
        let engine = Engine::new(&path).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let id = engine.create_booking(overnight_request(date)).await.unwrap();

        let now = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(engine.find_overdue(now).await, vec![id]);

        // Manual checkout clears the flag on the next pass.
        engine.checkout(id).await.unwrap();
        assert!(engine.find_overdue(now).await.is_empty());
    }

    #[tokio::test]
    async fn compactor_threshold_visible_through_engine() {
        let path = test_wal_path("compact_threshold.wal");
        let engine = Engine::new(&path).unwrap();

        // Seeding already appended; a booking adds one more.
        let before = engine.wal_appends_since_compact().await;
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        engine.create_booking(overnight_request(date)).await.unwrap();
        assert_eq!(engine.wal_appends_since_compact().await, before + 1);

        engine.compact_wal().await.unwrap();
        assert_eq!(engine.wal_appends_since_compact().await, 0);
    }
}
