use chrono::NaiveDate;

use super::error::CalendarError;

/// Parse a strict `YYYY-MM-DD` date.
///
/// Shorthand such as `2025-1-8`, surrounding whitespace, and impossible
/// days (`2025-02-30`) are all rejected.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDate`] when the input is not a real
/// calendar date in the expected shape.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, CalendarError> {
    let invalid = || CalendarError::InvalidDate {
        input: input.to_string(),
    };

    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return Err(invalid());
    }

    let year: i32 = input[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = input[5..7].parse().map_err(|_| invalid())?;
    let day: u32 = input[8..10].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_form() {
        let date = parse_iso_date("2025-01-06").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn accepts_leap_day() {
        assert!(parse_iso_date("2024-02-29").is_ok());
    }

    #[test]
    fn rejects_impossible_day() {
        assert_eq!(
            parse_iso_date("2025-02-29").unwrap_err(),
            CalendarError::InvalidDate {
                input: "2025-02-29".to_string()
            }
        );
        assert!(parse_iso_date("2025-04-31").is_err());
        assert!(parse_iso_date("2025-13-01").is_err());
        assert!(parse_iso_date("2025-00-10").is_err());
    }

    #[test]
    fn rejects_wrong_shape() {
        for input in [
            "",
            "2025-1-8",
            "2025/01/08",
            " 2025-01-08",
            "2025-01-08T00:00:00Z",
            "20250108",
            "abcd-ef-gh",
            "+202-01-08",
        ] {
            assert!(parse_iso_date(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn format_pads_fields() {
        let date = NaiveDate::from_ymd_opt(987, 3, 4).unwrap();
        assert_eq!(format_iso_date(date), "0987-03-04");
    }

    #[test]
    fn format_then_parse_is_identity() {
        let date = NaiveDate::from_ymd_opt(2031, 12, 31).unwrap();
        assert_eq!(parse_iso_date(&format_iso_date(date)).unwrap(), date);
    }
}
