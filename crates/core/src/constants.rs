/// Number of calendar months on each side of the reference month covered by
/// the precomputed per-day totals backing the calendar grid.
pub const ROLLING_WINDOW_MONTHS: u32 = 12;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
