//! Album date resolution.
//!
//! Album listings show dates in several shapes. The first recognizable one
//! wins, in this order:
//!
//! 1. `YYYY-MM-DD` / `YYYY/MM/DD`
//! 2. `MM/DD/YYYY` / `MM-DD-YYYY`
//! 3. `YYYY年MM月DD日`
//! 4. ROC school semester, `113上` (autumn) or `113下` (spring)
//!
//! A shape that matches but names an impossible day falls through to the next.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::utils::compile_regex;

/// Offset between ROC (Minguo) years and Gregorian years.
const ROC_YEAR_OFFSET: i32 = 1911;

#[derive(Debug, Clone, Copy)]
enum Shape {
    YearFirst,
    YearLast,
    Chinese,
    Semester,
}

static DATE_SHAPES: LazyLock<Vec<(Regex, Shape)>> = LazyLock::new(|| {
    [
        (r"(\d{4})[/-](\d{1,2})[/-](\d{1,2})", Shape::YearFirst),
        (r"(\d{1,2})[/-](\d{1,2})[/-](\d{4})", Shape::YearLast),
        (r"(\d{4})年(\d{1,2})月(\d{1,2})日", Shape::Chinese),
        (r"(\d{1,3})([上下])", Shape::Semester),
    ]
    .into_iter()
    .filter_map(|(pattern, shape)| compile_regex(pattern).map(|re| (re, shape)))
    .collect()
});

/// Resolves the date shown for an album, or `None` if nothing matches.
///
/// Semesters map to a representative day: `上` (first semester, autumn) is
/// October 1 of the ROC year, `下` (second semester, spring) is June 1 of the
/// following year.
pub fn parse_album_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_SHAPES
        .iter()
        .find_map(|(re, shape)| re.captures(text).and_then(|caps| resolve(&caps, *shape)))
}

fn resolve(caps: &regex::Captures<'_>, shape: Shape) -> Option<NaiveDate> {
    let num = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };
    match shape {
        Shape::YearFirst | Shape::Chinese => {
            NaiveDate::from_ymd_opt(i32::try_from(num(1)?).ok()?, num(2)?, num(3)?)
        }
        Shape::YearLast => NaiveDate::from_ymd_opt(i32::try_from(num(3)?).ok()?, num(1)?, num(2)?),
        Shape::Semester => {
            let year = i32::try_from(num(1)?).ok()? + ROC_YEAR_OFFSET;
            match caps.get(2)?.as_str() {
                "下" => NaiveDate::from_ymd_opt(year + 1, 6, 1),
                _ => NaiveDate::from_ymd_opt(year, 10, 1),
            }
        }
    }
}

/// Parses a date given on the command line.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY` and `DD/MM/YYYY`, tried
/// in that order.
pub fn parse_date_arg(arg: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];
    let arg = arg.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(arg, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_year_first() {
        assert_eq!(parse_album_date("2024-05-01"), date(2024, 5, 1));
        assert_eq!(parse_album_date("活動日期：2024/5/3 (五)"), date(2024, 5, 3));
    }

    #[test]
    fn test_year_last() {
        assert_eq!(parse_album_date("05/01/2024"), date(2024, 5, 1));
    }

    #[test]
    fn test_chinese() {
        assert_eq!(parse_album_date("2024年5月20日 校外教學"), date(2024, 5, 20));
    }

    #[test]
    fn test_semester() {
        assert_eq!(parse_album_date("113上"), date(2024, 10, 1));
        assert_eq!(parse_album_date("113下 畢業典禮"), date(2025, 6, 1));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_album_date(""), None);
        assert_eq!(parse_album_date("   "), None);
        assert_eq!(parse_album_date("no date here"), None);
    }

    #[test]
    fn test_impossible_day_falls_through() {
        assert_eq!(parse_album_date("2024-13-45"), None);
        assert_eq!(parse_album_date("2024-02-30 113上"), date(2024, 10, 1));
    }

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(parse_date_arg("2024-05-01"), date(2024, 5, 1));
        assert_eq!(parse_date_arg("2024/05/01"), date(2024, 5, 1));
        assert_eq!(parse_date_arg("05/01/2024"), date(2024, 5, 1));
        assert_eq!(parse_date_arg("25/12/2024"), date(2024, 12, 25));
        assert_eq!(parse_date_arg("yesterday"), None);
    }
}
