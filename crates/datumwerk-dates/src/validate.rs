// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Date validator — decides whether a candidate substring denotes a real
// calendar date, under fixed interpretation policies:
//
//   * Separated triplets with a 1-2 digit lead are day-first (day/month/year).
//     A candidate invalid day-first is rejected even if a month-first reading
//     would have worked — strict, not best-effort.
//   * Triplets with a 4-digit lead are year/month/day.
//   * Unseparated 8-digit runs split 2+2+4 as month, day, year. No alternate
//     split is attempted.
//   * Two-digit years expand with a pivot of 50: 00-49 → 2000s, 50-99 → 1900s.
//   * Years outside 1000-9999 after expansion are rejected.
//
// None of these policies is configurable per call and none depends on a
// clock or locale, so validation is a pure function of its input.

use chrono::NaiveDate;

/// Pivot for two-digit year expansion: values below it land in the 2000s.
const YEAR_PIVOT: u32 = 50;

/// Supported year range after expansion. Anything outside is noise from the
/// document domain's point of view (OCR artifacts, serial fragments).
const YEAR_MIN: i32 = 1000;
const YEAR_MAX: i32 = 9999;

/// Separators accepted between the groups of a separated candidate.
const SEPARATORS: &[char] = &['/', '-', '.', ' '];

/// Parse a candidate into a calendar date under the fixed policies above.
///
/// Returns `None` for anything that is not a real calendar date — impossible
/// months or days, non-existent leap days, out-of-range years, or strings
/// that do not split into the expected groups. Never panics; a numeric
/// overflow in a malformed group is caught locally and maps to `None`.
pub fn parse_date(candidate: &str) -> Option<NaiveDate> {
    let candidate = candidate.trim();

    // Unseparated 8-digit run: month, day, year as 2+2+4.
    if candidate.len() == 8 && candidate.bytes().all(|b| b.is_ascii_digit()) {
        let month: u32 = candidate[0..2].parse().ok()?;
        let day: u32 = candidate[2..4].parse().ok()?;
        let year: i32 = candidate[4..8].parse().ok()?;
        return build_date(year, month, day);
    }

    let groups: Vec<&str> = candidate.split(SEPARATORS).collect();
    if groups.len() != 3 {
        return None;
    }

    if groups[0].len() == 4 {
        // Year-leading triplet: year/month/day.
        let year = expand_year(groups[0])?;
        let month: u32 = groups[1].parse().ok()?;
        let day: u32 = groups[2].parse().ok()?;
        build_date(year, month, day)
    } else {
        // Ambiguous field order: day-first.
        let day: u32 = groups[0].parse().ok()?;
        let month: u32 = groups[1].parse().ok()?;
        let year = expand_year(groups[2])?;
        build_date(year, month, day)
    }
}

/// `true` when the candidate denotes a real calendar date.
pub fn is_valid_date(candidate: &str) -> bool {
    parse_date(candidate).is_some()
}

/// Expand a year group to a four-digit year.
///
/// Two-digit groups expand via the pivot rule (`00-49 → 2000s`,
/// `50-99 → 1900s`); four-digit groups pass through. Any other width, or a
/// result outside the supported range, is rejected.
fn expand_year(group: &str) -> Option<i32> {
    let year = match group.len() {
        2 => {
            let two: u32 = group.parse().ok()?;
            if two < YEAR_PIVOT {
                2000 + two as i32
            } else {
                1900 + two as i32
            }
        }
        4 => group.parse().ok()?,
        _ => return None,
    };
    (YEAR_MIN..=YEAR_MAX).contains(&year).then_some(year)
}

/// Calendar check: month/day ranges and Gregorian leap-year arithmetic are
/// delegated to chrono; the year is range-checked first.
fn build_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn leap_day_accepted_in_leap_year() {
        let date = parse_date("29/02/2024").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 29));
    }

    #[test]
    fn leap_day_rejected_in_common_year() {
        assert!(!is_valid_date("29/02/2023"));
    }

    #[test]
    fn century_leap_rule() {
        // 1900 is not a leap year; 2000 is.
        assert!(!is_valid_date("29/02/1900"));
        assert!(is_valid_date("29/02/2000"));
    }

    #[test]
    fn thirty_first_of_april_rejected() {
        assert!(!is_valid_date("31/04/2023"));
    }

    #[test]
    fn month_out_of_range_rejected() {
        assert!(!is_valid_date("13/13/2023"));
        assert!(!is_valid_date("01/00/2023"));
    }

    #[test]
    fn day_first_interpretation() {
        // 04/05 is the 4th of May, not April 5th.
        let date = parse_date("04/05/2023").unwrap();
        assert_eq!((date.month(), date.day()), (5, 4));
    }

    #[test]
    fn day_first_is_strict_without_month_first_fallback() {
        // Valid only month-first (Dec 25); day-first reads month 25 → reject.
        assert!(!is_valid_date("12/25/2023"));
    }

    #[test]
    fn year_leading_triplet() {
        let date = parse_date("2024-03-15").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 15));
        assert!(!is_valid_date("2023-02-29"));
    }

    #[test]
    fn digit_run_splits_month_day_year() {
        // 03152024 → March 15, 2024.
        let date = parse_date("03152024").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 15));

        // 12345678 → month 12, day 34 → impossible.
        assert!(!is_valid_date("12345678"));

        // No day-first reinterpretation for runs: 15032024 reads month 15.
        assert!(!is_valid_date("15032024"));
    }

    #[test]
    fn two_digit_year_pivot() {
        assert_eq!(parse_date("01/01/30").unwrap().year(), 2030);
        assert_eq!(parse_date("01/01/99").unwrap().year(), 1999);
        assert_eq!(parse_date("01/01/49").unwrap().year(), 2049);
        assert_eq!(parse_date("01/01/50").unwrap().year(), 1950);
        assert_eq!(parse_date("01/01/00").unwrap().year(), 2000);
    }

    #[test]
    fn degenerate_years_rejected() {
        assert!(!is_valid_date("15/03/0000"));
        assert!(!is_valid_date("15/03/0999"));
        assert!(!is_valid_date("0000-01-01"));
    }

    #[test]
    fn dotted_and_spaced_separators() {
        assert!(is_valid_date("07.04.2023"));
        assert!(is_valid_date("7 4 2023"));
        // Separator styles may even be mixed within one candidate.
        let date = parse_date("12/03-2024").unwrap();
        assert_eq!((date.month(), date.day()), (3, 12));
    }

    #[test]
    fn malformed_input_is_rejected_not_an_error() {
        for junk in ["", "  ", "not a date", "1/2", "15//2024", "15/03/",
                     "a/b/c", "99999999999999999999", "15/03/203"] {
            assert!(!is_valid_date(junk), "accepted junk input: {junk:?}");
        }
    }

    #[test]
    fn validation_is_idempotent() {
        for candidate in ["29/02/2024", "12345678", "2024-03-15", "garbage"] {
            let first = parse_date(candidate);
            for _ in 0..3 {
                assert_eq!(parse_date(candidate), first);
            }
        }
    }
}
