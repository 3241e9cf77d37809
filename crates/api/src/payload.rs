// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job creation payloads in the scheduling API's wire format.
//!
//! A [`PayloadRecord`] can only be built from a [`ReadyJob`], so every
//! payload comes from a row that passed validation. Building is pure:
//! the same job and options always produce the same payload.

use chrono::NaiveDate;
use roster_import::ReadyJob;
use roster_import_domain::{RecurrenceWire, ResolvedLocation};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use tracing::debug;

/// Settings shared by every payload of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadOptions {
    /// First part of the traceability label.
    pub trace_prefix: String,
    /// Identifies the run; chosen once and reused for every row.
    pub batch_tag: String,
    /// Region code of the title and description translations.
    pub locale: String,
}

impl PayloadOptions {
    /// Creates options with a freshly generated batch tag.
    #[must_use]
    pub fn new(trace_prefix: impl Into<String>) -> Self {
        Self {
            trace_prefix: trace_prefix.into(),
            batch_tag: format!("{:08x}", rand::random::<u32>()),
            locale: String::from("en_EN"),
        }
    }

    /// Replaces the batch tag.
    #[must_use]
    pub fn with_batch_tag(mut self, batch_tag: impl Into<String>) -> Self {
        self.batch_tag = batch_tag.into();
        self
    }

    /// Returns the traceability label for a row.
    #[must_use]
    pub fn trace_label(&self, row_number: usize) -> String {
        format!("{}:{}:row-{row_number}", self.trace_prefix, self.batch_tag)
    }
}

impl Default for PayloadOptions {
    fn default() -> Self {
        Self::new("roster-import")
    }
}

/// A localized text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    id: String,
    #[serde(rename = "regionCode")]
    region_code: String,
    text: String,
}

impl Translation {
    fn new(locale: &str, text: &str) -> Self {
        Self {
            id: String::from("new-0"),
            region_code: locale.to_string(),
            text: text.to_string(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Owner reference, sent as `{"id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerRef {
    pub id: String,
}

/// The floor/space assignment field.
///
/// A site-only job sends `[]`; a floor sends `{"<floor>": []}`; a space
/// sends `{"<floor>": ["<space>"]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloorsSpaces {
    WholeSite,
    Floor { floor_id: String },
    Space { floor_id: String, space_id: String },
}

impl From<&ResolvedLocation> for FloorsSpaces {
    fn from(location: &ResolvedLocation) -> Self {
        match location {
            ResolvedLocation::Site { .. } => Self::WholeSite,
            ResolvedLocation::Floor { floor_id, .. } => Self::Floor {
                floor_id: floor_id.clone(),
            },
            ResolvedLocation::Space {
                floor_id, space_id, ..
            } => Self::Space {
                floor_id: floor_id.clone(),
                space_id: space_id.clone(),
            },
        }
    }
}

impl Serialize for FloorsSpaces {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::WholeSite => serializer.serialize_seq(Some(0))?.end(),
            Self::Floor { floor_id } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(floor_id, &[] as &[&str])?;
                map.end()
            }
            Self::Space { floor_id, space_id } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(floor_id, &[space_id])?;
                map.end()
            }
        }
    }
}

/// Serializes as `[]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct EmptyList;

impl Serialize for EmptyList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_seq(Some(0))?.end()
    }
}

/// Fields the API requires on every create request but this importer
/// never varies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Scaffolding {
    contracts: EmptyList,
    rate: Option<u32>,
    invoicable: bool,
    clock_hourtype_id: Option<u32>,
    duration_seconds: Option<u32>,
    owner_roles: EmptyList,
    approvers: EmptyList,
    approver_roles: EmptyList,
    watchers: EmptyList,
    watcher_roles: EmptyList,
    subtasks: EmptyList,
    #[serde(rename = "contractSubtask")]
    contract_subtask: Option<u32>,
    #[serde(rename = "syncForms")]
    sync_forms: bool,
    #[serde(rename = "instruction-documents")]
    instruction_documents: EmptyList,
    #[serde(rename = "remove-instruction-documents")]
    remove_instruction_documents: EmptyList,
    task_sampling_select: Option<u32>,
    subtask_sampling_select: Option<u32>,
    #[serde(rename = "exception-mode")]
    exception_mode: u8,
    #[serde(rename = "excludeExceptions")]
    exclude_exceptions: &'static str,
    save_as_concept: bool,
    task_form_submission_id: Option<u32>,
    task_form_submission_visible: bool,
}

impl Default for Scaffolding {
    fn default() -> Self {
        Self {
            contracts: EmptyList,
            rate: None,
            invoicable: false,
            clock_hourtype_id: None,
            duration_seconds: None,
            owner_roles: EmptyList,
            approvers: EmptyList,
            approver_roles: EmptyList,
            watchers: EmptyList,
            watcher_roles: EmptyList,
            subtasks: EmptyList,
            contract_subtask: None,
            sync_forms: false,
            instruction_documents: EmptyList,
            remove_instruction_documents: EmptyList,
            task_sampling_select: None,
            subtask_sampling_select: None,
            exception_mode: 0,
            exclude_exceptions: "1",
            save_as_concept: false,
            task_form_submission_id: None,
            task_form_submission_visible: false,
        }
    }
}

/// The body of one job creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadRecord {
    #[serde(skip)]
    row_number: usize,
    id: Option<u64>,
    #[serde(rename = "editMode")]
    edit_mode: &'static str,
    mode: &'static str,
    translations: Vec<Translation>,
    description_translations: Vec<Translation>,
    date_start: NaiveDate,
    date_end: NaiveDate,
    hour_start: String,
    minute_start: String,
    hour_end: String,
    minute_end: String,
    locations: String,
    floors_spaces: FloorsSpaces,
    owners: Vec<OwnerRef>,
    labels: Vec<String>,
    #[serde(flatten)]
    recurrence: RecurrenceWire,
    #[serde(flatten)]
    scaffolding: Scaffolding,
}

impl PayloadRecord {
    /// Returns the spreadsheet row this payload was built from.
    #[must_use]
    pub const fn row_number(&self) -> usize {
        self.row_number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.translations.first().map_or("", Translation::text)
    }

    #[must_use]
    pub const fn date_end(&self) -> NaiveDate {
        self.date_end
    }

    #[must_use]
    pub fn site_id(&self) -> &str {
        &self.locations
    }

    #[must_use]
    pub const fn floors_spaces(&self) -> &FloorsSpaces {
        &self.floors_spaces
    }

    #[must_use]
    pub fn owners(&self) -> &[OwnerRef] {
        &self.owners
    }

    /// Returns the labels, ending with the traceability label.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub const fn recurrence(&self) -> &RecurrenceWire {
        &self.recurrence
    }
}

/// Builds the create request for a validated job.
///
/// # Arguments
///
/// * `job` - A row that passed validation
/// * `options` - Run-wide settings (trace label, locale)
#[must_use]
pub fn build_payload(job: &ReadyJob, options: &PayloadOptions) -> PayloadRecord {
    let mut recurrence: RecurrenceWire = job.recurrence.to_wire_fields();
    if let Some(enabled) = job.notifications {
        recurrence = recurrence.with_notifications(enabled);
    }

    let mut labels: Vec<String> = job.labels.clone();
    labels.push(options.trace_label(job.row_number));

    let payload: PayloadRecord = PayloadRecord {
        row_number: job.row_number,
        id: None,
        edit_mode: "all",
        mode: "roster",
        translations: vec![Translation::new(&options.locale, &job.title)],
        description_translations: job
            .description
            .as_deref()
            .map(|text| Translation::new(&options.locale, text))
            .into_iter()
            .collect(),
        date_start: job.date_start,
        date_end: job.date_end,
        hour_start: job.window.start.hour().to_string(),
        minute_start: job.window.start.minute().to_string(),
        hour_end: job.window.end.hour().to_string(),
        minute_end: job.window.end.minute().to_string(),
        locations: job.location.site_id().to_string(),
        floors_spaces: FloorsSpaces::from(&job.location),
        owners: vec![OwnerRef {
            id: job.owner_id.clone(),
        }],
        labels,
        recurrence,
        scaffolding: Scaffolding::default(),
    };

    debug!(
        row = job.row_number,
        site_id = %payload.locations,
        recurring = job.recurrence.is_recurring(),
        "Built payload"
    );

    payload
}

/// One-line human-readable summary of a validated job.
#[must_use]
pub fn preview_line(job: &ReadyJob) -> String {
    let place: String = match &job.location {
        ResolvedLocation::Site { site_id } => format!("site {site_id}"),
        ResolvedLocation::Floor { site_id, floor_id } => {
            format!("site {site_id} / floor {floor_id}")
        }
        ResolvedLocation::Space {
            site_id,
            floor_id,
            space_id,
        } => format!("site {site_id} / floor {floor_id} / space {space_id}"),
    };

    format!(
        "Row {}: {} | {place} | {} {}-{} | {}",
        job.row_number,
        job.title,
        job.date_start,
        job.window.start,
        job.window.end,
        job.recurrence.describe()
    )
}
