//! Pure fee rules. No state, no I/O.

use crate::model::{DAY_TOUR, OVERNIGHT};
use crate::policy::{ADULT_RATE, CHILD_RATE};

/// Entrance fee for a party. Absent counts are treated as zero.
pub fn entrance_fee(adults: Option<u32>, children: Option<u32>) -> f64 {
    adults.unwrap_or(0) as f64 * ADULT_RATE + children.unwrap_or(0) as f64 * CHILD_RATE
}

/// Total amount for a package. Day Tour ignores the room fee; every other
/// package — Overnight, Complete Stay, or anything unrecognized — includes
/// all three components. The entrance fee is echoed back for audit.
pub fn total(package: &str, entrance_fee: f64, table_fee: f64, room_fee: f64) -> (f64, f64) {
    let total = match package {
        DAY_TOUR => entrance_fee + table_fee,
        OVERNIGHT => entrance_fee + table_fee + room_fee,
        _ => entrance_fee + table_fee + room_fee,
    };
    (total, entrance_fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::COMPLETE_STAY;

    #[test]
    fn entrance_fee_rates() {
        assert_eq!(entrance_fee(Some(2), Some(1)), 2.0 * 150.0 + 1.0 * 130.0);
        assert_eq!(entrance_fee(None, None), 0.0);
        assert_eq!(entrance_fee(Some(1), None), 150.0);
        assert_eq!(entrance_fee(None, Some(3)), 390.0);
    }

    #[test]
    fn day_tour_ignores_room_fee() {
        assert_eq!(total(DAY_TOUR, 430.0, 300.0, 1000.0), (730.0, 430.0));
    }

    #[test]
    fn overnight_includes_room_fee() {
        assert_eq!(total(OVERNIGHT, 430.0, 300.0, 1000.0), (1730.0, 430.0));
    }

    #[test]
    fn complete_stay_falls_into_default_branch() {
        assert_eq!(total(COMPLETE_STAY, 430.0, 300.0, 1000.0), (1730.0, 430.0));
    }

    #[test]
    fn unrecognized_package_includes_all_fees() {
        assert_eq!(total("Weekend Special", 100.0, 50.0, 25.0), (175.0, 100.0));
    }
}
