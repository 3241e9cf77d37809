// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurrence fields in the scheduling API's wire encoding.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::recurrence::{NormalizedRecurrence, RepeatPattern, RepeatRule, StopCondition, WeekdaySet};

/// Unit of `repeat_interval_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalPeriod {
    Daily,
    Weekly,
    Monthly,
}

/// Encoded as the integer `frequency_stop_repeat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopMode {
    Never,
    AfterOccurrences,
    OnDate,
}

impl StopMode {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Never => 0,
            Self::AfterOccurrences => 1,
            Self::OnDate => 2,
        }
    }
}

impl Serialize for StopMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// `frequency_stop_repeat_number_value`: left out, sent as `null`, or a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopCount {
    Omitted,
    Null,
    Count(u32),
}

// serde's `skip_serializing_if` hands over a reference.
#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_omitted(count: &StopCount) -> bool {
    matches!(count, StopCount::Omitted)
}

impl Serialize for StopCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Omitted | Self::Null => serializer.serialize_none(),
            Self::Count(count) => serializer.serialize_u32(*count),
        }
    }
}

/// The recurrence block of a job payload.
///
/// Selector lists use ISO weekday numbers (Monday = 1). The weekly and
/// monthly selector lists are always sent empty. A one-off job sends
/// `frequency_stop_repeat_number_value` as `null`; a repeating job sends it
/// only when it stops after a number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurrenceWire {
    repeat_interval_length: u32,
    repeat_interval_period: Option<IntervalPeriod>,
    use_day_of_week: bool,
    frequency_daily_repeat: Vec<u8>,
    frequency_weekly_repeat: Vec<u8>,
    frequency_monthly_repeat: Vec<u8>,
    frequency_stop_repeat: Option<StopMode>,
    #[serde(skip_serializing_if = "is_omitted")]
    frequency_stop_repeat_number_value: StopCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_after_date: Option<NaiveDate>,
    sequence_date: Option<NaiveDate>,
    task_complete_emails: bool,
    task_canceled_emails: bool,
}

impl RecurrenceWire {
    /// Encodes a normalized recurrence.
    #[must_use]
    pub fn encode(recurrence: &NormalizedRecurrence) -> Self {
        match recurrence {
            NormalizedRecurrence::OneOff { .. } => Self::one_off(),
            NormalizedRecurrence::Repeating(rule) => Self::repeating(rule),
        }
    }

    fn one_off() -> Self {
        Self {
            repeat_interval_length: 1,
            repeat_interval_period: None,
            use_day_of_week: false,
            frequency_daily_repeat: Vec::new(),
            frequency_weekly_repeat: Vec::new(),
            frequency_monthly_repeat: Vec::new(),
            frequency_stop_repeat: None,
            frequency_stop_repeat_number_value: StopCount::Null,
            end_after_date: None,
            sequence_date: None,
            task_complete_emails: true,
            task_canceled_emails: true,
        }
    }

    fn repeating(rule: &RepeatRule) -> Self {
        let (period, use_day_of_week, selector): (IntervalPeriod, bool, WeekdaySet) =
            match rule.pattern() {
                RepeatPattern::Daily => (IntervalPeriod::Daily, false, WeekdaySet::EVERY_DAY),
                RepeatPattern::Weekdays => {
                    (IntervalPeriod::Daily, false, WeekdaySet::MONDAY_TO_FRIDAY)
                }
                RepeatPattern::Weekly { days } => (IntervalPeriod::Weekly, false, days),
                RepeatPattern::MonthlyOnDay { .. } => {
                    (IntervalPeriod::Monthly, false, WeekdaySet::empty())
                }
                RepeatPattern::MonthlyOnWeekday { weekday, .. } => {
                    (IntervalPeriod::Monthly, true, WeekdaySet::single(weekday))
                }
            };

        let (stop, number_value, end_after_date) = match rule.stop() {
            StopCondition::Never => (StopMode::Never, StopCount::Omitted, None),
            StopCondition::AfterOccurrences(count) => {
                (StopMode::AfterOccurrences, StopCount::Count(count), None)
            }
            StopCondition::OnDate(date) => (StopMode::OnDate, StopCount::Omitted, Some(date)),
        };

        Self {
            repeat_interval_length: rule.interval(),
            repeat_interval_period: Some(period),
            use_day_of_week,
            frequency_daily_repeat: selector.iso_numbers(),
            frequency_weekly_repeat: Vec::new(),
            frequency_monthly_repeat: Vec::new(),
            frequency_stop_repeat: Some(stop),
            frequency_stop_repeat_number_value: number_value,
            end_after_date,
            sequence_date: Some(rule.anchor()),
            task_complete_emails: false,
            task_canceled_emails: false,
        }
    }

    /// Overrides both notification flags.
    #[must_use]
    pub const fn with_notifications(mut self, enabled: bool) -> Self {
        self.task_complete_emails = enabled;
        self.task_canceled_emails = enabled;
        self
    }

    #[must_use]
    pub const fn repeat_interval_length(&self) -> u32 {
        self.repeat_interval_length
    }

    #[must_use]
    pub const fn repeat_interval_period(&self) -> Option<IntervalPeriod> {
        self.repeat_interval_period
    }

    #[must_use]
    pub const fn use_day_of_week(&self) -> bool {
        self.use_day_of_week
    }

    #[must_use]
    pub fn frequency_daily_repeat(&self) -> &[u8] {
        &self.frequency_daily_repeat
    }

    #[must_use]
    pub const fn frequency_stop_repeat(&self) -> Option<StopMode> {
        self.frequency_stop_repeat
    }

    #[must_use]
    pub const fn frequency_stop_repeat_number_value(&self) -> StopCount {
        self.frequency_stop_repeat_number_value
    }

    #[must_use]
    pub const fn end_after_date(&self) -> Option<NaiveDate> {
        self.end_after_date
    }

    #[must_use]
    pub const fn sequence_date(&self) -> Option<NaiveDate> {
        self.sequence_date
    }

    #[must_use]
    pub const fn task_complete_emails(&self) -> bool {
        self.task_complete_emails
    }

    #[must_use]
    pub const fn task_canceled_emails(&self) -> bool {
        self.task_canceled_emails
    }
}

impl NormalizedRecurrence {
    /// Encodes this recurrence into the API's wire fields.
    #[must_use]
    pub fn to_wire_fields(&self) -> RecurrenceWire {
        RecurrenceWire::encode(self)
    }
}
