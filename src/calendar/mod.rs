mod business;
mod error;
mod holidays;
mod iso;
mod ops;

pub use business::{is_weekend, BusinessCalendar, SnapDirection, DEFAULT_WALK_LIMIT_DAYS};
pub use error::CalendarError;
pub use holidays::HolidaySet;
pub use iso::{format_iso_date, parse_iso_date};
pub use ops::{
    add_business_days, diff_business_days, get_date_range, get_next_business_day,
    is_business_day, is_today, is_today_at, snap_to_business_day,
};
