/// Error type for all fallible calendar operations.
///
/// Both variants indicate bad input data: a date string the UI should have
/// refused, or an offset so large that the day-by-day walk was cut off.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a string is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid ISO date: {input:?} (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The rejected input, verbatim.
        input: String,
    },

    /// Returned when a day-by-day walk would exceed the calendar's ceiling.
    #[error("date range too large: walk exceeded {limit} calendar days")]
    RangeTooLarge {
        /// The configured ceiling, in calendar days.
        limit: u32,
    },
}
