// Temporal expressions and recency.
//
// Six pattern families (absolute dates, relative references, future
// references, durations, frequencies, vague markers) are matched in that
// order. Absolute and relative hits are normalized to calendar dates against
// a reference date and turned into a days-ago recency score. Overlapping hits
// are deduplicated keeping the higher confidence, then the earlier family.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate, Utc, Weekday};
use once_cell::sync::Lazy;
use regex_lite::Captures;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::patterns::matcher::PatternTable;
use crate::patterns::span::{resolve_overlaps, Located};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalKind {
    Absolute,
    Relative,
    Future,
    Duration,
    Frequency,
    Vague,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOrientation {
    Past,
    Present,
    Future,
}

/// Which way a text leans in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalFocus {
    Past,
    Present,
    Future,
    Mixed,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolve {
    IsoDate,
    UsDate,
    MonthDayYear,
    DayMonthYear,
    MonthYear,
    Quarter,
    Year,
    Today,
    Yesterday,
    DayBeforeYesterday,
    CountAgo,
    LastUnit,
    ThisUnit,
    LastWeekday,
    Tomorrow,
    NextUnit,
    InCount,
    NextWeekday,
    Undated(TimeOrientation),
    Timeless,
}

impl Resolve {
    fn is_calendar_date(self) -> bool {
        matches!(
            self,
            Resolve::IsoDate
                | Resolve::UsDate
                | Resolve::MonthDayYear
                | Resolve::DayMonthYear
                | Resolve::MonthYear
                | Resolve::Quarter
                | Resolve::Year
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    kind: TemporalKind,
    confidence: f64,
    resolve: Resolve,
}

const fn rule(kind: TemporalKind, confidence: f64, resolve: Resolve) -> Rule {
    Rule { kind, confidence, resolve }
}

macro_rules! month {
    () => {
        r"(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?"
    };
}

macro_rules! count {
    () => {
        r"(\d+|a couple of|couple of|a few|few|several|an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)"
    };
}

macro_rules! unit {
    () => {
        r"(days?|weeks?|months?|years?)"
    };
}

macro_rules! weekday {
    () => {
        r"(monday|tuesday|wednesday|thursday|friday|saturday|sunday)"
    };
}

use Resolve::*;
use TemporalKind::{Absolute, Duration, Frequency, Relative, Vague};

const RULES: &[(&str, Rule)] = &[
    // absolute
    (r"\b(\d{4})-(\d{2})-(\d{2})\b", rule(Absolute, 0.95, IsoDate)),
    (r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b", rule(Absolute, 0.9, UsDate)),
    (
        concat!(r"\b", month!(), r" (\d{1,2})(?:st|nd|rd|th)?,? (\d{4})\b"),
        rule(Absolute, 0.95, MonthDayYear),
    ),
    (
        concat!(r"\b(\d{1,2})(?:st|nd|rd|th)? (?:of )?", month!(), r",? (\d{4})\b"),
        rule(Absolute, 0.95, DayMonthYear),
    ),
    (concat!(r"\b", month!(), r",? (\d{4})\b"), rule(Absolute, 0.9, MonthYear)),
    (r"\bq([1-4]) (\d{4})\b", rule(Absolute, 0.9, Quarter)),
    (r"\b(?:in|since|during|by|from) ((?:19|20)\d{2})\b", rule(Absolute, 0.85, Year)),
    // relative
    (r"\btoday\b", rule(Relative, 0.9, Today)),
    (r"\bthe day before yesterday\b", rule(Relative, 0.95, DayBeforeYesterday)),
    (r"\byesterday\b", rule(Relative, 0.9, Yesterday)),
    (concat!(r"\b", count!(), r" ", unit!(), r" ago\b"), rule(Relative, 0.9, CountAgo)),
    (r"\blast (week|month|year)\b", rule(Relative, 0.85, LastUnit)),
    (r"\bthis (week|month|year)\b", rule(Relative, 0.8, ThisUnit)),
    (concat!(r"\blast ", weekday!(), r"\b"), rule(Relative, 0.85, LastWeekday)),
    (
        r"\b(?:earlier this (?:week|month|year)|the other day)\b",
        rule(Relative, 0.7, Undated(TimeOrientation::Past)),
    ),
    // future
    (r"\btomorrow\b", rule(TemporalKind::Future, 0.9, Tomorrow)),
    (r"\bnext (week|month|year)\b", rule(TemporalKind::Future, 0.85, NextUnit)),
    (concat!(r"\bnext ", weekday!(), r"\b"), rule(TemporalKind::Future, 0.85, NextWeekday)),
    (concat!(r"\bin ", count!(), r" ", unit!(), r"\b"), rule(TemporalKind::Future, 0.8, InCount)),
    (
        r"\b(?:upcoming|forthcoming|soon|shortly|later this (?:week|month|year)|in the (?:near )?future|going forward)\b",
        rule(TemporalKind::Future, 0.7, Undated(TimeOrientation::Future)),
    ),
    // durations
    (
        concat!(r"\b(?:for|over|during|within) (?:the )?(?:past |last |next )?", count!(), r" ", unit!(), r"\b"),
        rule(Duration, 0.8, Timeless),
    ),
    (
        concat!(r"\b(?:the )?(?:past|last) ", count!(), r" ", unit!(), r"\b"),
        rule(Duration, 0.8, Timeless),
    ),
    (r"\b\d+[- ](?:day|week|month|year)[- ]long\b", rule(Duration, 0.8, Timeless)),
    // frequencies
    (
        r"\b(?:daily|weekly|monthly|quarterly|annually|yearly|hourly|biweekly)\b",
        rule(Frequency, 0.75, Timeless),
    ),
    (r"\bevery (?:single )?(?:day|week|month|year|morning|night|time)\b", rule(Frequency, 0.75, Timeless)),
    (r"\b(?:once|twice|\d+ times) (?:a|per) (?:day|week|month|year)\b", rule(Frequency, 0.75, Timeless)),
    // vague
    (
        r"\b(?:recently|lately|historically|formerly|previously|in the past|back then|years ago)\b",
        rule(Vague, 0.6, Undated(TimeOrientation::Past)),
    ),
    (
        r"\b(?:currently|nowadays|these days|at the moment|right now|at present|presently|now)\b",
        rule(Vague, 0.6, Undated(TimeOrientation::Present)),
    ),
    (r"\b(?:eventually|someday|one day)\b", rule(Vague, 0.5, Undated(TimeOrientation::Future))),
];

static TABLE: Lazy<PatternTable<Rule>> = Lazy::new(|| PatternTable::new(RULES.iter().copied()));

/// Map days elapsed to a 0..=100 recency score. Today and future dates
/// score 100.
pub fn recency_score(days_ago: i64) -> u8 {
    match days_ago {
        d if d <= 0 => 100,
        d if d <= 7 => 95,
        d if d <= 30 => 80,
        d if d <= 90 => 65,
        d if d <= 180 => 50,
        d if d <= 365 => 35,
        d if d <= 730 => 20,
        _ => 5,
    }
}

/// One temporal expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalExpression {
    pub text: String,
    pub kind: TemporalKind,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
    /// Calendar date the expression refers to, when it names one
    pub date: Option<NaiveDate>,
    /// Negative for future dates
    pub days_ago: Option<i64>,
    pub recency_score: Option<u8>,
    pub orientation: Option<TimeOrientation>,
}

impl Located for TemporalExpression {
    fn start(&self) -> usize {
        self.start
    }
    fn end(&self) -> usize {
        self.end
    }
    fn confidence(&self) -> f64 {
        self.confidence
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalAnalysis {
    pub reference_date: NaiveDate,
    pub expressions: Vec<TemporalExpression>,
    /// Mean recency of the dated expressions
    pub overall_recency: Option<f64>,
    pub most_recent_date: Option<NaiveDate>,
    pub oldest_date: Option<NaiveDate>,
    pub focus: TemporalFocus,
    pub kind_counts: BTreeMap<TemporalKind, usize>,
}

/// Temporal expressions relative to today's UTC date.
pub fn extract_temporal_expressions(text: &str) -> TemporalAnalysis {
    extract_temporal_expressions_at(text, Utc::now().date_naive())
}

/// Temporal expressions relative to `reference`.
pub fn extract_temporal_expressions_at(text: &str, reference: NaiveDate) -> TemporalAnalysis {
    let mut candidates = Vec::new();
    for (_, rule, caps) in TABLE.captures_all(text) {
        let Some(whole) = caps.get(0) else { continue };
        let date = resolve(rule.resolve, &caps, reference);
        if rule.resolve.is_calendar_date() && date.is_none() {
            // "13/45/2020" looks like a date but is not one
            continue;
        }
        let days_ago = date.map(|d| (reference - d).num_days());
        let orientation = match (days_ago, rule.resolve) {
            (Some(d), _) if d > 0 => Some(TimeOrientation::Past),
            (Some(0), _) => Some(TimeOrientation::Present),
            (Some(_), _) => Some(TimeOrientation::Future),
            (None, Undated(o)) => Some(o),
            (None, _) => None,
        };
        candidates.push(TemporalExpression {
            text: whole.as_str().to_string(),
            kind: rule.kind,
            start: whole.start(),
            end: whole.end(),
            confidence: rule.confidence,
            date,
            days_ago,
            recency_score: days_ago.map(recency_score),
            orientation,
        });
    }
    let expressions = resolve_overlaps(candidates);

    let scores: Vec<f64> = expressions
        .iter()
        .filter_map(|e| e.recency_score)
        .map(f64::from)
        .collect();
    let overall_recency = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    let past_dates = expressions
        .iter()
        .filter(|e| e.days_ago.is_some_and(|d| d >= 0))
        .filter_map(|e| e.date);
    let most_recent_date = past_dates.clone().max();
    let oldest_date = past_dates.min();

    let mut kind_counts = BTreeMap::new();
    for e in &expressions {
        *kind_counts.entry(e.kind).or_insert(0) += 1;
    }

    let focus = temporal_focus(&expressions);
    debug!(
        expressions = expressions.len(),
        recency = ?overall_recency,
        "Extracted temporal expressions"
    );

    TemporalAnalysis {
        reference_date: reference,
        expressions,
        overall_recency,
        most_recent_date,
        oldest_date,
        focus,
        kind_counts,
    }
}

/// The orientation held by more than half of the oriented expressions, or
/// `Mixed` when none has a majority.
fn temporal_focus(expressions: &[TemporalExpression]) -> TemporalFocus {
    let oriented: Vec<TimeOrientation> = expressions.iter().filter_map(|e| e.orientation).collect();
    if oriented.is_empty() {
        return TemporalFocus::None;
    }
    let count = |o| oriented.iter().filter(|&&x| x == o).count();
    let half = oriented.len() / 2;
    if count(TimeOrientation::Past) > half {
        TemporalFocus::Past
    } else if count(TimeOrientation::Present) > half {
        TemporalFocus::Present
    } else if count(TimeOrientation::Future) > half {
        TemporalFocus::Future
    } else {
        TemporalFocus::Mixed
    }
}

fn month_number(name: &str) -> Option<u32> {
    let key: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    let n = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}

fn parse_count(word: &str) -> Option<u32> {
    if let Ok(n) = word.parse() {
        return Some(n);
    }
    let n = match word.to_ascii_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" | "a couple of" | "couple of" => 2,
        "three" | "a few" | "few" => 3,
        "four" | "several" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(n)
}

fn parse_unit(word: &str) -> Option<Unit> {
    let w = word.to_ascii_lowercase();
    match w.trim_end_matches('s') {
        "day" => Some(Unit::Day),
        "week" => Some(Unit::Week),
        "month" => Some(Unit::Month),
        "year" => Some(Unit::Year),
        _ => None,
    }
}

fn parse_weekday(word: &str) -> Option<Weekday> {
    word.parse().ok()
}

fn shift(date: NaiveDate, unit: Unit, n: u32, forward: bool) -> Option<NaiveDate> {
    match (unit, forward) {
        (Unit::Day, true) => date.checked_add_days(Days::new(n.into())),
        (Unit::Day, false) => date.checked_sub_days(Days::new(n.into())),
        (Unit::Week, true) => date.checked_add_days(Days::new(u64::from(n) * 7)),
        (Unit::Week, false) => date.checked_sub_days(Days::new(u64::from(n) * 7)),
        (Unit::Month, true) => date.checked_add_months(Months::new(n)),
        (Unit::Month, false) => date.checked_sub_months(Months::new(n)),
        (Unit::Year, true) => date.checked_add_months(Months::new(n.checked_mul(12)?)),
        (Unit::Year, false) => date.checked_sub_months(Months::new(n.checked_mul(12)?)),
    }
}

fn group<'h>(caps: &Captures<'h>, i: usize) -> Option<&'h str> {
    caps.get(i).map(|m| m.as_str())
}

fn num<T: std::str::FromStr>(caps: &Captures<'_>, i: usize) -> Option<T> {
    group(caps, i)?.parse().ok()
}

fn resolve(how: Resolve, caps: &Captures<'_>, reference: NaiveDate) -> Option<NaiveDate> {
    match how {
        IsoDate => NaiveDate::from_ymd_opt(num(caps, 1)?, num(caps, 2)?, num(caps, 3)?),
        UsDate => NaiveDate::from_ymd_opt(num(caps, 3)?, num(caps, 1)?, num(caps, 2)?),
        MonthDayYear => {
            NaiveDate::from_ymd_opt(num(caps, 3)?, month_number(group(caps, 1)?)?, num(caps, 2)?)
        }
        DayMonthYear => {
            NaiveDate::from_ymd_opt(num(caps, 3)?, month_number(group(caps, 2)?)?, num(caps, 1)?)
        }
        MonthYear => NaiveDate::from_ymd_opt(num(caps, 2)?, month_number(group(caps, 1)?)?, 1),
        Quarter => {
            let q: u32 = num(caps, 1)?;
            NaiveDate::from_ymd_opt(num(caps, 2)?, (q - 1) * 3 + 1, 1)
        }
        Year => NaiveDate::from_ymd_opt(num(caps, 1)?, 1, 1),
        Today => Some(reference),
        Yesterday => reference.pred_opt(),
        DayBeforeYesterday => reference.pred_opt()?.pred_opt(),
        CountAgo => shift(
            reference,
            parse_unit(group(caps, 2)?)?,
            parse_count(group(caps, 1)?)?,
            false,
        ),
        LastUnit => shift(reference, parse_unit(group(caps, 1)?)?, 1, false),
        ThisUnit => Some(reference),
        LastWeekday => {
            let target = parse_weekday(group(caps, 1)?)?;
            let back = (reference.weekday().num_days_from_monday() + 7
                - target.num_days_from_monday())
                % 7;
            let back = if back == 0 { 7 } else { back };
            reference.checked_sub_days(Days::new(back.into()))
        }
        Tomorrow => reference.succ_opt(),
        NextUnit => shift(reference, parse_unit(group(caps, 1)?)?, 1, true),
        InCount => shift(
            reference,
            parse_unit(group(caps, 2)?)?,
            parse_count(group(caps, 1)?)?,
            true,
        ),
        NextWeekday => {
            let target = parse_weekday(group(caps, 1)?)?;
            let ahead = (target.num_days_from_monday() + 7
                - reference.weekday().num_days_from_monday())
                % 7;
            let ahead = if ahead == 0 { 7 } else { ahead };
            reference.checked_add_days(Days::new(ahead.into()))
        }
        Undated(_) | Timeless => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn recency_steps_are_monotonic() {
        let days = [-5, 0, 1, 7, 8, 30, 31, 90, 180, 365, 730, 731, 5000];
        let scores: Vec<u8> = days.iter().map(|&d| recency_score(d)).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
        assert_eq!(recency_score(0), 100);
        assert_eq!(recency_score(7), 95);
        assert_eq!(recency_score(731), 5);
    }

    #[test]
    fn relative_expressions_resolve_against_reference() {
        let a = extract_temporal_expressions_at("We shipped it yesterday, 3 weeks ago we planned it.", reference());
        assert_eq!(a.expressions.len(), 2);
        assert_eq!(a.expressions[0].date, NaiveDate::from_ymd_opt(2024, 6, 14));
        assert_eq!(a.expressions[0].recency_score, Some(95));
        assert_eq!(a.expressions[1].days_ago, Some(21));
        assert_eq!(a.expressions[1].recency_score, Some(80));
        assert_eq!(a.focus, TemporalFocus::Past);
    }

    #[test]
    fn absolute_dates_normalize() {
        let a = extract_temporal_expressions_at("Released on March 3, 2024 and updated 2024-06-01.", reference());
        let dates: Vec<_> = a.expressions.iter().filter_map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
            ]
        );
        assert_eq!(a.most_recent_date, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn year_only_maps_to_january_first() {
        let a = extract_temporal_expressions_at("It launched in 2020.", reference());
        assert_eq!(a.expressions.len(), 1);
        assert_eq!(a.expressions[0].date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(a.expressions[0].recency_score, Some(5));
    }

    #[test]
    fn future_references_score_full_recency() {
        let a = extract_temporal_expressions_at("The update lands next week.", reference());
        assert_eq!(a.expressions[0].kind, TemporalKind::Future);
        assert_eq!(a.expressions[0].recency_score, Some(100));
        assert_eq!(a.focus, TemporalFocus::Future);
    }

    #[test]
    fn invalid_numeric_dates_are_dropped() {
        let a = extract_temporal_expressions_at("Code 13/45/2020 is not a date.", reference());
        assert!(a.expressions.iter().all(|e| e.kind != TemporalKind::Absolute));
    }

    #[test]
    fn no_expressions_means_no_focus() {
        let a = extract_temporal_expressions_at("", reference());
        assert!(a.expressions.is_empty());
        assert_eq!(a.focus, TemporalFocus::None);
        assert_eq!(a.overall_recency, None);
    }
}
