//! Fixed venue policy constants.

/// Entrance fee per adult guest.
pub const ADULT_RATE: f64 = 150.0;

/// Entrance fee per child guest.
pub const CHILD_RATE: f64 = 130.0;

/// Combinatorial fallback bound for table allocation: subsets of at most
/// this many tables are tried before giving up.
pub const MAX_TABLE_COMBINATION: usize = 5;

/// Combinatorial fallback bound for room allocation.
pub const MAX_ROOM_COMBINATION: usize = 6;

/// Daily checkout cutoff hour (local wall clock). Overnight-style bookings
/// are overdue once this hour has passed on the day after their booking date.
pub const CHECKOUT_CUTOFF_HOUR: u32 = 8;

/// How often the overdue sweep runs.
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// How often the compactor checks whether the WAL has grown enough to rewrite.
pub const COMPACT_CHECK_INTERVAL_SECS: u64 = 60;

pub const MAX_GUEST_NAME_LEN: usize = 120;
pub const MAX_PACKAGE_LEN: usize = 64;
