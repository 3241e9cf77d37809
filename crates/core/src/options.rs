// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Settings for a validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Accept a floor or space name from another site or floor when it is
    /// globally unambiguous and the scoped lookup failed. Off by default:
    /// a match outside the row's site is usually the wrong floor.
    pub unscoped_fallback: bool,
}

impl ValidationOptions {
    /// Returns options with the unscoped fallback switched on or off.
    #[must_use]
    pub const fn with_unscoped_fallback(mut self, enabled: bool) -> Self {
        self.unscoped_fallback = enabled;
        self
    }
}
