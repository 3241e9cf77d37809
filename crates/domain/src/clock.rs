// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::DomainError;

/// Derives the civil "today" used by date checks from one configured zone.
///
/// The execution host's local time is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceClock {
    tz: Tz,
}

impl ReferenceClock {
    /// Creates a clock for the named IANA time zone.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the zone is unknown.
    pub fn new(timezone: &str) -> Result<Self, DomainError> {
        let tz: Tz = timezone
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { tz })
    }

    /// Returns the configured zone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Returns the civil date of `instant` in the configured zone.
    #[must_use]
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Returns the current civil date in the configured zone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

impl Default for ReferenceClock {
    fn default() -> Self {
        Self {
            tz: chrono_tz::Europe::London,
        }
    }
}
