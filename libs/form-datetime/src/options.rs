//! Suggestions for partially typed dates.
//!
//! Users type things like `3/24`, `Mar 2024` or `12-05-98`. The input is
//! tokenised into numbers and month abbreviations, each token is expanded into
//! the day, month and year values it could stand for, and every plausible
//! combination is offered as a concrete display date.

use std::borrow::Cow;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::date::{DateGranularity, DISPLAY_SEPARATOR};
use crate::segments::{count_separators, numeric};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

static INPUT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}|\d{3}|\d{2}|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec))")
        .expect("input token pattern is valid")
});

static MONTH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)")
        .expect("month name pattern is valid")
});

/// Separators tried in order of preference.
const OPTION_SEPARATORS: [char; 3] = ['/', '-', ' '];

/// Concrete dates a partial input could mean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateOptions {
    /// Candidates in `DD{sep}MM{sep}YYYY`, `MM{sep}YYYY` or `YYYY` form.
    pub options: Vec<String>,
    /// Separator used by the input, `None` for a bare year.
    pub separator: Option<char>,
}

/// Month number of an English abbreviation (`Jan` → 1).
pub(crate) fn month_from_name(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|index| index as u32 + 1)
}

/// A numeric, non-zero token of three or more digits can only be a year.
fn is_year_token(token: &str) -> bool {
    token.len() > 2 && numeric(token).is_some_and(|v| v != 0)
}

/// Four-digit years a token could abbreviate.
///
/// Two-digit years up to the current year's last two digits land in the 2000s
/// first, later ones in the 1900s first.
fn year_options(token: &str, current_year: i32) -> Vec<String> {
    let Some(year) = numeric(token).map(|v| v as i32) else {
        return Vec::new();
    };
    let century_cutoff = current_year.rem_euclid(100);

    let years = match year {
        0..=99 if year <= century_cutoff => vec![2000 + year, 1900 + year],
        0..=99 => vec![1900 + year, 2000 + year],
        900..=999 => vec![1000 + year],
        190..=209 => vec![year * 10],
        1900..=2099 => vec![year],
        _ => Vec::new(),
    };
    years.into_iter().map(|y| y.to_string()).collect()
}

fn month_option(token: &str) -> Option<String> {
    let month = numeric(token).or_else(|| month_from_name(token))?;
    (1..=12).contains(&month).then(|| format!("{month:02}"))
}

fn day_option(token: &str) -> Option<String> {
    let day = numeric(token)?;
    (1..=31).contains(&day).then(|| format!("{day:02}"))
}

fn month_year_candidates(tokens: &[&str], separator: char, current_year: i32) -> Vec<String> {
    if let Some(year_token) = tokens.iter().find(|t| is_year_token(t)) {
        let month = tokens
            .iter()
            .find(|t| *t != year_token)
            .and_then(|t| month_option(t));
        return match month {
            Some(month) => year_options(year_token, current_year)
                .into_iter()
                .map(|year| format!("{month}{separator}{year}"))
                .collect(),
            None => Vec::new(),
        };
    }

    // Either token could be the month.
    let years: Vec<Vec<String>> = tokens.iter().map(|t| year_options(t, current_year)).collect();
    let months: Vec<Option<String>> = tokens.iter().map(|t| month_option(t)).collect();

    let mut candidates = Vec::new();
    for (i, candidate_years) in years.iter().enumerate() {
        for (j, month) in months.iter().enumerate() {
            let Some(month) = month else { continue };
            if i == j {
                continue;
            }
            for year in candidate_years.iter().take(2) {
                candidates.push(format!("{month}{separator}{year}"));
            }
        }
    }
    candidates
}

fn full_date_candidates(tokens: &[&str], separator: char, current_year: i32) -> Vec<String> {
    // A definite year is only accepted in the last slot.
    if let Some(year_token) = tokens.iter().find(|t| is_year_token(t)) {
        if Some(year_token) != tokens.last() {
            return Vec::new();
        }
    }

    let years: Vec<Vec<String>> = tokens.iter().map(|t| year_options(t, current_year)).collect();
    let months: Vec<Option<String>> = tokens.iter().map(|t| month_option(t)).collect();
    let days: Vec<Option<String>> = tokens.iter().map(|t| day_option(t)).collect();

    let mut candidates = Vec::new();
    for (i, candidate_years) in years.iter().enumerate() {
        for (j, month) in months.iter().enumerate() {
            for (k, day) in days.iter().enumerate() {
                if i == j || i == k || j == k {
                    continue;
                }
                let (Some(month), Some(day)) = (month, day) else {
                    continue;
                };
                for year in candidate_years.iter().take(2) {
                    candidates.push(format!("{day}{separator}{month}{separator}{year}"));
                }
            }
        }
    }
    candidates
}

fn is_calendar_date(candidate: &str, separator: char) -> bool {
    let segments: Vec<&str> = candidate.split(separator).collect();
    let [day, month, year] = segments.as_slice() else {
        return false;
    };
    match (numeric(year), numeric(month), numeric(day)) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y as i32, m, d).is_some(),
        _ => false,
    }
}

fn dedup_in_order(candidates: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Candidate dates for a partial input.
///
/// `current_year` decides which century a two-digit year is tried in first.
pub fn parse_input_to_date_options(input: &str, current_year: i32) -> DateOptions {
    let tokens: Vec<&str> = INPUT_TOKEN.find_iter(input).map(|m| m.as_str()).collect();
    if tokens.is_empty() {
        return DateOptions::default();
    }

    let separator = OPTION_SEPARATORS.into_iter().find(|c| input.contains(*c));

    if tokens.len() == 1 {
        // A single token cannot be split by a separator.
        if separator.is_some() {
            return DateOptions::default();
        }
        return DateOptions {
            options: year_options(tokens[0], current_year),
            separator: None,
        };
    }

    let Some(separator) = separator else {
        return DateOptions::default();
    };
    if input.contains('/') && input.contains('-') {
        return DateOptions::default();
    }
    if input.split(separator).count() != tokens.len() {
        return DateOptions::default();
    }

    let options = match tokens.len() {
        2 => dedup_in_order(month_year_candidates(&tokens, separator, current_year)),
        3 => dedup_in_order(full_date_candidates(&tokens, separator, current_year))
            .into_iter()
            .filter(|candidate| is_calendar_date(candidate, separator))
            .collect(),
        _ => return DateOptions::default(),
    };

    tracing::trace!(input, count = options.len(), "date options");
    DateOptions {
        options,
        separator: Some(separator),
    }
}

fn label_month(segment: &str) -> Option<u32> {
    let month = if segment.len() <= 2 {
        numeric(segment)?
    } else {
        month_from_name(segment)?
    };
    (1..=12).contains(&month).then_some(month)
}

/// Human-readable label of a date option: `15 Mar 2024`, `Mar 2024` or `2024`.
///
/// Empty when the option is not a date.
pub fn date_option_label(option: &str, separator: Option<char>) -> String {
    let segments: Vec<&str> = match separator {
        Some(separator) => option.split(separator).collect(),
        None => vec![option],
    };

    let year = |segment: &str| {
        (segment.len() == 4)
            .then(|| numeric(segment))
            .flatten()
            .map(|y| y as i32)
    };

    match segments.as_slice() {
        &[day, month, y] => {
            let date = year(y).zip(label_month(month)).and_then(|(y, m)| {
                let d = if day.len() <= 2 { numeric(day)? } else { return None };
                NaiveDate::from_ymd_opt(y, m, d)
            });
            date.map(|d| d.format("%d %b %Y").to_string()).unwrap_or_default()
        }
        &[month, y] => year(y)
            .zip(label_month(month))
            .and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1))
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_default(),
        &[y] if year(y).is_some() => option.to_string(),
        _ => String::new(),
    }
}

/// Display pattern of a display date, `N/A` when there is none.
pub fn selected_date_format(display_date: &str) -> &'static str {
    if display_date.is_empty() {
        return "N/A";
    }
    DateGranularity::from_separator_count(count_separators(display_date, DISPLAY_SEPARATOR))
        .unwrap_or(DateGranularity::Year)
        .display_format()
}

/// Replace the first month abbreviation with its two-digit number.
pub fn replace_month_name_with_number(input: &str) -> Cow<'_, str> {
    MONTH_NAME.replace(input, |caps: &Captures| {
        month_from_name(&caps[0]).map_or_else(|| caps[0].to_string(), |m| format!("{m:02}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2025;

    #[test]
    fn two_digit_years_prefer_recent_century() {
        assert_eq!(year_options("24", YEAR), vec!["2024", "1924"]);
        assert_eq!(year_options("98", YEAR), vec!["1998", "2098"]);
        assert_eq!(year_options("25", YEAR), vec!["2025", "1925"]);
        assert_eq!(year_options("26", YEAR), vec!["1926", "2026"]);
    }

    #[test]
    fn three_and_four_digit_years() {
        assert_eq!(year_options("998", YEAR), vec!["1998"]);
        assert_eq!(year_options("202", YEAR), vec!["2020"]);
        assert_eq!(year_options("2024", YEAR), vec!["2024"]);
        assert!(year_options("1234", YEAR).is_empty());
        assert!(year_options("Mar", YEAR).is_empty());
    }

    #[test]
    fn bare_year() {
        let options = parse_input_to_date_options("2024", YEAR);
        assert_eq!(options.options, vec!["2024"]);
        assert_eq!(options.separator, None);

        assert!(parse_input_to_date_options("2024/", YEAR).options.is_empty());
    }

    #[test]
    fn month_and_year() {
        let options = parse_input_to_date_options("3/2024", YEAR);
        // "3" is a single digit and is not a token.
        assert!(options.options.is_empty());

        let options = parse_input_to_date_options("03/2024", YEAR);
        assert_eq!(options.options, vec!["03/2024"]);
        assert_eq!(options.separator, Some('/'));

        let options = parse_input_to_date_options("Mar 2024", YEAR);
        assert_eq!(options.options, vec!["03 2024"]);
        assert_eq!(options.separator, Some(' '));
    }

    #[test]
    fn ambiguous_month_and_year() {
        let options = parse_input_to_date_options("03/24", YEAR);
        assert_eq!(options.options, vec!["03/2024", "03/1924"]);

        let options = parse_input_to_date_options("11/12", YEAR);
        assert_eq!(
            options.options,
            vec!["12/2011", "12/1911", "11/2012", "11/1912"]
        );
    }

    #[test]
    fn full_dates() {
        let options = parse_input_to_date_options("15/03/2024", YEAR);
        assert_eq!(options.options, vec!["15/03/2024"]);

        let options = parse_input_to_date_options("15-03-24", YEAR);
        assert!(options.options.contains(&"15-03-2024".to_string()));
        assert!(options.options.contains(&"15-03-1924".to_string()));
        assert_eq!(options.separator, Some('-'));
    }

    #[test]
    fn full_dates_require_year_last() {
        assert!(parse_input_to_date_options("2024/03/15", YEAR).options.is_empty());
    }

    #[test]
    fn full_dates_drop_impossible_days() {
        let options = parse_input_to_date_options("31/02/24", YEAR);
        assert!(options.options.iter().all(|o| !o.starts_with("31/02")));
    }

    #[test]
    fn rejects_mixed_or_missing_separators() {
        assert!(parse_input_to_date_options("15/03-2024", YEAR).options.is_empty());
        assert!(parse_input_to_date_options("1503", YEAR).options.is_empty());
        assert!(parse_input_to_date_options("15//2024", YEAR).options.is_empty());
        assert!(parse_input_to_date_options("", YEAR).options.is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(date_option_label("15/03/2024", Some('/')), "15 Mar 2024");
        assert_eq!(date_option_label("15-Mar-2024", Some('-')), "15 Mar 2024");
        assert_eq!(date_option_label("03/2024", Some('/')), "Mar 2024");
        assert_eq!(date_option_label("2024", None), "2024");
        assert_eq!(date_option_label("31/02/2024", Some('/')), "");
        assert_eq!(date_option_label("nope", None), "");
    }

    #[test]
    fn selected_formats() {
        assert_eq!(selected_date_format(""), "N/A");
        assert_eq!(selected_date_format("15/03/2024"), "DD/MM/YYYY");
        assert_eq!(selected_date_format("03/2024"), "MM/YYYY");
        assert_eq!(selected_date_format("2024"), "YYYY");
    }

    #[test]
    fn month_names_become_numbers() {
        assert_eq!(replace_month_name_with_number("15 Mar 2024"), "15 03 2024");
        assert_eq!(replace_month_name_with_number("Dec/Jan"), "12/Jan");
        assert_eq!(replace_month_name_with_number("15/03/2024"), "15/03/2024");
    }
}
