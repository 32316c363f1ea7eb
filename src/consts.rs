/// Standard working hours in a single day, used to derive the hourly rate
pub const WORKING_HOURS_PER_DAY: i64 = 8;

/// Overtime is paid at twice the hourly rate
pub const OVERTIME_MULTIPLIER: i64 = 2;

/// Cap on the hours a single overtime submission may claim
pub const MAX_OVERTIME_HOURS: i16 = 3;
