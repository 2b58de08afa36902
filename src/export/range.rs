use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

/// Parse a period filter into an inclusive date window.
///
/// Supported:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(AppError::InvalidDate(
                "range start and end must use the same format".into(),
            ));
        }

        let (d1, _) = parse_bound(start)?;
        let (_, d2) = parse_bound(end)?;
        Ok((d1, d2))
    } else {
        parse_bound(r.trim())
    }
}

/// One bound expands to the (first, last) day of the period it names.
fn parse_bound(s: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match s.len() {
        // YYYY
        4 => {
            let y: i32 = s
                .parse()
                .map_err(|_| AppError::InvalidDate(s.to_string()))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1)
                .ok_or_else(|| AppError::InvalidDate(s.to_string()))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31)
                .ok_or_else(|| AppError::InvalidDate(s.to_string()))?;
            Ok((d1, d2))
        }
        // YYYY-MM
        7 => {
            let y: i32 = s[0..4]
                .parse()
                .map_err(|_| AppError::InvalidDate(s.to_string()))?;
            let m: u32 = s[5..7]
                .parse()
                .map_err(|_| AppError::InvalidDate(s.to_string()))?;
            let last = month_last_day(y, m).ok_or_else(|| AppError::InvalidDate(s.to_string()))?;

            let d1 = NaiveDate::from_ymd_opt(y, m, 1)
                .ok_or_else(|| AppError::InvalidDate(s.to_string()))?;
            let d2 = NaiveDate::from_ymd_opt(y, m, last)
                .ok_or_else(|| AppError::InvalidDate(s.to_string()))?;
            Ok((d1, d2))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| AppError::InvalidDate(s.to_string()))?;
            Ok((d, d))
        }
        _ => Err(AppError::InvalidDate(format!(
            "unsupported period format: '{}'",
            s
        ))),
    }
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_expands_to_full_year() {
        let (d1, d2) = parse_range("2026").unwrap();
        assert_eq!(d1, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(d2, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn month_range_expands_to_month_bounds() {
        let (d1, d2) = parse_range("2026-01:2026-02").unwrap();
        assert_eq!(d1, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(d2, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn leap_february_has_29_days() {
        let (_, d2) = parse_range("2028-02").unwrap();
        assert_eq!(d2, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
    }

    #[test]
    fn mixed_bound_formats_rejected() {
        assert!(parse_range("2026:2026-02").is_err());
    }
}
