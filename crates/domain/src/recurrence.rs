// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurrence engine.
//!
//! Turns the declarative recurrence columns of a row into a validated
//! [`NormalizedRecurrence`], which can then be described in prose, expanded
//! into concrete dates, or encoded into the scheduling API's wire fields
//! (see [`crate::RecurrenceWire`]).
//!
//! ## Rules
//!
//! - `none` is a single occurrence on the start date and needs no end date
//! - every other type needs an end date strictly after the start date
//! - `weekdays` always means Monday to Friday; `days` is ignored
//! - `weekly` defaults its days to the start date's weekday
//! - `biweekly` is `weekly` with an interval of 2; any other explicit
//!   interval except 1 is a conflict
//! - `monthly` repeats on the start date's day of month, clamped to the last
//!   day of shorter months, or on the Nth weekday when asked to

use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::RecurrenceError;
use crate::types::RecurrenceSpec;
use crate::validation::parse_date;

/// Weekday table: chrono weekday, ISO number, report token, full name.
const WEEKDAYS: [(Weekday, u8, &str, &str); 7] = [
    (Weekday::Mon, 1, "Mon", "monday"),
    (Weekday::Tue, 2, "Tue", "tuesday"),
    (Weekday::Wed, 3, "Wed", "wednesday"),
    (Weekday::Thu, 4, "Thu", "thursday"),
    (Weekday::Fri, 5, "Fri", "friday"),
    (Weekday::Sat, 6, "Sat", "saturday"),
    (Weekday::Sun, 7, "Sun", "sunday"),
];

/// Repetition pattern classifier as written in the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    None,
    Daily,
    Weekdays,
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurrenceType {
    /// Converts this type to its spreadsheet token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekdays => "weekdays",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for RecurrenceType {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekdays" => Ok(Self::Weekdays),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(RecurrenceError::InvalidType(s.trim().to_string())),
        }
    }
}

impl std::fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A set of weekdays, iterated Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Monday to Friday.
    pub const MONDAY_TO_FRIDAY: Self = Self(0b0001_1111);
    /// All seven days.
    pub const EVERY_DAY: Self = Self(0b0111_1111);

    /// Creates an empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Creates a set holding one day.
    #[must_use]
    pub fn single(day: Weekday) -> Self {
        let mut set: Self = Self::empty();
        set.insert(day);
        set
    }

    /// Adds a day to the set.
    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    /// Returns whether the set holds `day`.
    #[must_use]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the days in the set, Monday first.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEKDAYS
            .into_iter()
            .map(|(day, _, _, _)| day)
            .filter(move |day| self.contains(*day))
    }

    /// Returns the ISO numbers of the days (Monday = 1 .. Sunday = 7).
    #[must_use]
    pub fn iso_numbers(self) -> Vec<u8> {
        WEEKDAYS
            .into_iter()
            .filter(|(day, _, _, _)| self.contains(*day))
            .map(|(_, number, _, _)| number)
            .collect()
    }

    /// Returns the three-letter tokens of the days (`Mon` .. `Sun`).
    #[must_use]
    pub fn tokens(self) -> Vec<&'static str> {
        WEEKDAYS
            .into_iter()
            .filter(|(day, _, _, _)| self.contains(*day))
            .map(|(_, _, token, _)| token)
            .collect()
    }

    /// Parses a comma-separated list of weekday tokens.
    ///
    /// Tokens are case-insensitive and may be the abbreviation (`Thu`) or
    /// the full name (`Thursday`). Blank tokens are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RecurrenceError::InvalidDayTokens` naming every unknown token.
    pub fn parse(text: &str) -> Result<Self, RecurrenceError> {
        let mut set: Self = Self::empty();
        let mut invalid: Vec<String> = Vec::new();

        for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let lowered: String = token.to_lowercase();
            let matched: Option<Weekday> = WEEKDAYS
                .iter()
                .find(|(_, _, abbrev, full)| abbrev.to_lowercase() == lowered || *full == lowered)
                .map(|(day, _, _, _)| *day);
            match matched {
                Some(day) => set.insert(day),
                None => invalid.push(token.to_string()),
            }
        }

        if invalid.is_empty() {
            Ok(set)
        } else {
            Err(RecurrenceError::InvalidDayTokens(invalid))
        }
    }
}

/// How a monthly rule picks its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyMode {
    /// Same calendar day as the start date, clamped to the month's last day.
    #[default]
    DayOfMonth,
    /// Same ordinal weekday as the start date (e.g. the 2nd Tuesday).
    WeekdayOfMonth,
}

impl FromStr for MonthlyMode {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "date" | "day" | "day_of_month" => Ok(Self::DayOfMonth),
            "weekday" | "day_of_week" | "weekday_of_month" => Ok(Self::WeekdayOfMonth),
            _ => Err(RecurrenceError::InvalidMonthlyMode(s.trim().to_string())),
        }
    }
}

/// The repeating shape of a normalized rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatPattern {
    /// Every `interval` days.
    Daily,
    /// Every Monday to Friday.
    Weekdays,
    /// On the given days, every `interval` weeks.
    Weekly {
        days: WeekdaySet,
    },
    /// On `day` of every `interval`-th month, clamped to the month's length.
    MonthlyOnDay {
        day: u32,
    },
    /// On the `ordinal`-th `weekday` of every `interval`-th month.
    MonthlyOnWeekday {
        weekday: Weekday,
        ordinal: u32,
    },
}

/// When a series stops producing occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopCondition {
    Never,
    AfterOccurrences(u32),
    /// Inclusive.
    OnDate(NaiveDate),
}

/// A validated repeating rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepeatRule {
    pattern: RepeatPattern,
    interval: NonZeroU32,
    anchor: NaiveDate,
    stop: StopCondition,
}

impl RepeatRule {
    /// Creates a rule whose first occurrence is `anchor`.
    #[must_use]
    pub const fn new(
        pattern: RepeatPattern,
        interval: NonZeroU32,
        anchor: NaiveDate,
        stop: StopCondition,
    ) -> Self {
        Self {
            pattern,
            interval,
            anchor,
            stop,
        }
    }

    /// Returns the repeating shape.
    #[must_use]
    pub const fn pattern(&self) -> RepeatPattern {
        self.pattern
    }

    /// Returns the every-N-units interval.
    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval.get()
    }

    /// Returns the first occurrence (the sequence anchor).
    #[must_use]
    pub const fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Returns the stop condition.
    #[must_use]
    pub const fn stop(&self) -> StopCondition {
        self.stop
    }

    /// Returns the weekdays of a weekly rule, or `None` for other patterns.
    #[must_use]
    pub const fn days(&self) -> Option<WeekdaySet> {
        match self.pattern {
            RepeatPattern::Weekly { days } => Some(days),
            _ => None,
        }
    }

    /// Expands the rule into concrete dates.
    ///
    /// A rule that never stops yields an unbounded iterator; callers should
    /// `take` from it.
    #[must_use]
    pub const fn occurrences(&self) -> Occurrences<'_> {
        Occurrences {
            rule: self,
            cursor: Some(self.anchor),
            emitted: 0,
        }
    }

    /// Returns whether the pattern (ignoring the stop condition) fires on `date`.
    fn falls_on(&self, date: NaiveDate) -> bool {
        if date < self.anchor {
            return false;
        }
        let interval: i64 = i64::from(self.interval.get());

        match self.pattern {
            RepeatPattern::Daily => (date - self.anchor).num_days() % interval == 0,
            RepeatPattern::Weekdays => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            RepeatPattern::Weekly { days } => {
                let weeks: i64 = (week_start(date) - week_start(self.anchor)).num_days() / 7;
                days.contains(date.weekday()) && weeks % interval == 0
            }
            RepeatPattern::MonthlyOnDay { day } => {
                months_between(self.anchor, date) % interval == 0
                    && date.day() == day.min(days_in_month(date.year(), date.month()))
            }
            RepeatPattern::MonthlyOnWeekday { weekday, ordinal } => {
                months_between(self.anchor, date) % interval == 0
                    && Some(date) == nth_weekday(date.year(), date.month(), weekday, ordinal)
            }
        }
    }

    /// Describes the rule in prose, e.g. `Repeats every 2 weeks on Thu, ending on 2026-12-31`.
    #[must_use]
    pub fn describe(&self) -> String {
        let interval: u32 = self.interval.get();
        let frequency: String = match self.pattern {
            RepeatPattern::Daily if interval == 1 => String::from("every day"),
            RepeatPattern::Daily => format!("every {interval} days"),
            RepeatPattern::Weekdays => String::from("every weekday (Mon-Fri)"),
            RepeatPattern::Weekly { days } if interval == 1 => {
                format!("weekly on {}", days.tokens().join(", "))
            }
            RepeatPattern::Weekly { days } => {
                format!("every {interval} weeks on {}", days.tokens().join(", "))
            }
            RepeatPattern::MonthlyOnDay { day } => {
                let every: String = every_months(interval);
                if day > 28 {
                    format!("{every} on day {day} (or the last day of shorter months)")
                } else {
                    format!("{every} on day {day}")
                }
            }
            RepeatPattern::MonthlyOnWeekday { weekday, ordinal } => {
                let token: &str = WeekdaySet::single(weekday).tokens().first().copied().unwrap_or("");
                format!(
                    "{} on the {} {token}",
                    every_months(interval),
                    ordinal_suffix(ordinal)
                )
            }
        };

        let ending: String = match self.stop {
            StopCondition::Never => String::new(),
            StopCondition::AfterOccurrences(count) => format!(", ending after {count} times"),
            StopCondition::OnDate(date) => format!(", ending on {date}"),
        };

        format!("Repeats {frequency}{ending}")
    }
}

/// Iterator over the concrete dates of a [`RepeatRule`].
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RepeatRule,
    cursor: Option<NaiveDate>,
    emitted: u32,
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let StopCondition::AfterOccurrences(count) = self.rule.stop
                && self.emitted >= count
            {
                return None;
            }

            let date: NaiveDate = self.cursor?;
            if let StopCondition::OnDate(end) = self.rule.stop
                && date > end
            {
                self.cursor = None;
                return None;
            }

            self.cursor = date.succ_opt();
            if self.rule.falls_on(date) {
                self.emitted += 1;
                return Some(date);
            }
        }
    }
}

/// The outcome of normalizing a row's recurrence columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizedRecurrence {
    /// A single occurrence on `date`.
    OneOff {
        date: NaiveDate,
    },
    Repeating(RepeatRule),
}

impl NormalizedRecurrence {
    /// Returns whether this is a repeating series.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        matches!(self, Self::Repeating(_))
    }

    /// Returns the repeating rule, if any.
    #[must_use]
    pub const fn rule(&self) -> Option<&RepeatRule> {
        match self {
            Self::OneOff { .. } => None,
            Self::Repeating(rule) => Some(rule),
        }
    }

    /// Returns the last date of a series that stops on a date.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Repeating(RepeatRule {
                stop: StopCondition::OnDate(end),
                ..
            }) => Some(*end),
            _ => None,
        }
    }

    /// Describes the recurrence in prose for the review preview.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::OneOff { .. } => String::from("One-time job"),
            Self::Repeating(rule) => rule.describe(),
        }
    }
}

/// Normalizes the recurrence columns of a row.
///
/// All problems are collected so that a row reports every recurrence error
/// in one pass.
///
/// # Arguments
///
/// * `spec` - The raw recurrence columns
/// * `date_start` - The row's first occurrence
///
/// # Errors
///
/// Returns every row-local failure found:
/// - an unknown recurrence type
/// - a missing, unparsable or too early end date
/// - unknown day tokens
/// - a non-positive or conflicting interval
/// - an unknown monthly mode
pub fn normalize(
    spec: &RecurrenceSpec,
    date_start: NaiveDate,
) -> Result<NormalizedRecurrence, Vec<RecurrenceError>> {
    let mut errors: Vec<RecurrenceError> = Vec::new();

    let kind: Option<RecurrenceType> = parse_kind(spec.kind.as_deref(), &mut errors);
    if kind == Some(RecurrenceType::None) {
        return Ok(NormalizedRecurrence::OneOff { date: date_start });
    }

    // An unknown type is still treated as recurring for the remaining checks.
    let end_date: Option<NaiveDate> = check_end_date(spec.end_date.as_deref(), date_start, &mut errors);
    let explicit_interval: Option<NonZeroU32> = parse_explicit_interval(spec.interval.as_deref(), &mut errors);
    let interval_or_one: NonZeroU32 = explicit_interval.unwrap_or(NonZeroU32::MIN);

    let shaped: Option<(RepeatPattern, NonZeroU32)> = match kind {
        None | Some(RecurrenceType::None) => None,
        Some(RecurrenceType::Daily) => Some((RepeatPattern::Daily, interval_or_one)),
        Some(RecurrenceType::Weekdays) => {
            check_weekdays_interval(explicit_interval, &mut errors);
            Some((RepeatPattern::Weekdays, NonZeroU32::MIN))
        }
        Some(RecurrenceType::Weekly) => {
            weekly_days(spec.days.as_deref(), date_start, &mut errors)
                .map(|days| (RepeatPattern::Weekly { days }, interval_or_one))
        }
        Some(RecurrenceType::Biweekly) => {
            check_biweekly_interval(explicit_interval, &mut errors);
            let two: NonZeroU32 = NonZeroU32::MIN.saturating_add(1);
            weekly_days(spec.days.as_deref(), date_start, &mut errors)
                .map(|days| (RepeatPattern::Weekly { days }, two))
        }
        Some(RecurrenceType::Monthly) => {
            match spec.monthly_mode.as_deref().map_or(Ok(MonthlyMode::default()), str::parse::<MonthlyMode>) {
                Ok(MonthlyMode::DayOfMonth) => Some((
                    RepeatPattern::MonthlyOnDay {
                        day: date_start.day(),
                    },
                    interval_or_one,
                )),
                Ok(MonthlyMode::WeekdayOfMonth) => Some((
                    RepeatPattern::MonthlyOnWeekday {
                        weekday: date_start.weekday(),
                        ordinal: date_start.day0() / 7 + 1,
                    },
                    interval_or_one,
                )),
                Err(e) => {
                    errors.push(e);
                    None
                }
            }
        }
    };

    match (shaped, end_date) {
        (Some((pattern, interval)), Some(end)) if errors.is_empty() => {
            Ok(NormalizedRecurrence::Repeating(RepeatRule::new(
                pattern,
                interval,
                date_start,
                StopCondition::OnDate(end),
            )))
        }
        _ => Err(errors),
    }
}

/// Checks the recurrence columns that do not depend on the start date.
///
/// Used when the row's start date is missing or unparsable. The type, the
/// presence and format of the end date, the interval, the day tokens of a
/// weekly rule and the monthly mode are still checked; end-date ordering
/// needs a start date and is skipped.
#[must_use]
pub fn check_recurrence(spec: &RecurrenceSpec) -> Vec<RecurrenceError> {
    let mut errors: Vec<RecurrenceError> = Vec::new();

    let kind: Option<RecurrenceType> = parse_kind(spec.kind.as_deref(), &mut errors);
    if kind == Some(RecurrenceType::None) {
        return errors;
    }

    match spec.end_date.as_deref() {
        None => errors.push(RecurrenceError::MissingEndDate),
        Some(raw) => {
            if parse_date(raw).is_err() {
                errors.push(RecurrenceError::InvalidEndDate(raw.to_string()));
            }
        }
    }
    let explicit_interval: Option<NonZeroU32> = parse_explicit_interval(spec.interval.as_deref(), &mut errors);

    match kind {
        Some(RecurrenceType::Weekdays) => check_weekdays_interval(explicit_interval, &mut errors),
        Some(kind @ (RecurrenceType::Weekly | RecurrenceType::Biweekly)) => {
            if kind == RecurrenceType::Biweekly {
                check_biweekly_interval(explicit_interval, &mut errors);
            }
            if let Some(Err(e)) = spec.days.as_deref().map(WeekdaySet::parse) {
                errors.push(e);
            }
        }
        Some(RecurrenceType::Monthly) => {
            if let Some(Err(e)) = spec.monthly_mode.as_deref().map(str::parse::<MonthlyMode>) {
                errors.push(e);
            }
        }
        None | Some(RecurrenceType::None | RecurrenceType::Daily) => {}
    }

    errors
}

/// Parses the recurrence type; an empty column means a one-off job.
fn parse_kind(raw: Option<&str>, errors: &mut Vec<RecurrenceError>) -> Option<RecurrenceType> {
    match raw.map(str::parse::<RecurrenceType>) {
        None => Some(RecurrenceType::None),
        Some(Ok(kind)) => Some(kind),
        Some(Err(e)) => {
            errors.push(e);
            None
        }
    }
}

fn parse_explicit_interval(
    raw: Option<&str>,
    errors: &mut Vec<RecurrenceError>,
) -> Option<NonZeroU32> {
    match raw.map(parse_interval) {
        Some(Ok(interval)) => Some(interval),
        Some(Err(e)) => {
            errors.push(e);
            None
        }
        None => None,
    }
}

fn check_weekdays_interval(explicit: Option<NonZeroU32>, errors: &mut Vec<RecurrenceError>) {
    if let Some(interval) = explicit
        && interval.get() != 1
    {
        errors.push(RecurrenceError::WeekdaysIntervalConflict(interval.get()));
    }
}

fn check_biweekly_interval(explicit: Option<NonZeroU32>, errors: &mut Vec<RecurrenceError>) {
    if let Some(interval) = explicit
        && interval.get() > 2
    {
        errors.push(RecurrenceError::BiweeklyIntervalConflict(interval.get()));
    }
}

/// Checks presence, format and ordering of the end date.
fn check_end_date(
    raw: Option<&str>,
    date_start: NaiveDate,
    errors: &mut Vec<RecurrenceError>,
) -> Option<NaiveDate> {
    let Some(raw) = raw else {
        errors.push(RecurrenceError::MissingEndDate);
        return None;
    };
    let Ok(end) = parse_date(raw) else {
        errors.push(RecurrenceError::InvalidEndDate(raw.to_string()));
        return None;
    };
    if end <= date_start {
        errors.push(RecurrenceError::EndDateBeforeStart {
            end,
            start: date_start,
        });
        return None;
    }
    Some(end)
}

/// Parses an explicit interval, accepting spreadsheet floats like `2.0`.
fn parse_interval(raw: &str) -> Result<NonZeroU32, RecurrenceError> {
    let trimmed: &str = raw.trim();
    let integral: &str = match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        _ => trimmed,
    };
    integral
        .parse::<NonZeroU32>()
        .map_err(|_| RecurrenceError::InvalidInterval(trimmed.to_string()))
}

/// Parses the days of a weekly rule, defaulting to the start date's weekday.
fn weekly_days(
    raw: Option<&str>,
    date_start: NaiveDate,
    errors: &mut Vec<RecurrenceError>,
) -> Option<WeekdaySet> {
    match raw.map(WeekdaySet::parse) {
        Some(Ok(days)) if !days.is_empty() => Some(days),
        Some(Err(e)) => {
            errors.push(e);
            None
        }
        _ => Some(WeekdaySet::single(date_start.weekday())),
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

/// The `ordinal`-th `weekday` of a month; a fifth weekday that does not
/// exist falls back to the last one.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, ordinal: u32) -> Option<NaiveDate> {
    let first: NaiveDate = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset: u32 =
        (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let mut day: u32 = 1 + offset + 7 * ordinal.saturating_sub(1);
    while day > days_in_month(year, month) {
        day -= 7;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn every_months(interval: u32) -> String {
    if interval == 1 {
        String::from("monthly")
    } else {
        format!("every {interval} months")
    }
}

fn ordinal_suffix(n: u32) -> String {
    let suffix: &str = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
