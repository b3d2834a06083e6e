#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Citizen feedback record types and lifecycle rules.
//!
//! A [`FeedbackRecord`] is created once from a form submission
//! ([`NewFeedback`]) and afterwards only its status, assignment, and
//! resolution fields change. The government department taxonomy used to
//! classify submissions lives in [`departments`].

pub mod departments;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// What kind of submission a record is.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FeedbackType {
    /// General feedback about a service.
    #[default]
    Feedback,
    /// A complaint about a service failure.
    Complaint,
    /// A suggestion for improvement.
    Suggestion,
    /// A defect in a digital service.
    Bug,
    /// A request for new functionality.
    Feature,
}

impl FeedbackType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Feedback,
            Self::Complaint,
            Self::Suggestion,
            Self::Bug,
            Self::Feature,
        ]
    }
}

/// How urgent the submitter considers the issue.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FeedbackPriority {
    /// Can wait.
    Low,
    /// Normal handling.
    #[default]
    Medium,
    /// Needs prompt attention.
    High,
}

/// Case-management status of a record.
///
/// Records start as [`FeedbackStatus::New`] and move forward through
/// [`FeedbackStatus::InProgress`] to one of the two terminal states.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FeedbackStatus {
    /// Submitted, not yet picked up.
    #[default]
    New,
    /// Assigned and being worked on.
    InProgress,
    /// Closed with a resolution.
    Resolved,
    /// Closed without action.
    Rejected,
}

impl FeedbackStatus {
    /// Whether no further transitions are allowed out of this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }

    /// Whether a record in this status may move to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::InProgress)
                | (Self::New | Self::InProgress, Self::Resolved | Self::Rejected)
        )
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::New, Self::InProgress, Self::Resolved, Self::Rejected]
    }
}

/// The department → sub-department → service a submission is filed under.
///
/// Display names are optional; ids are what the form actually submits.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepartmentSelection {
    /// Department id (e.g. `"interior"`).
    pub department_id: String,
    /// Department display name.
    pub department_name: Option<String>,
    /// Sub-department id.
    pub sub_department_id: String,
    /// Sub-department display name.
    pub sub_department_name: Option<String>,
    /// Service id.
    pub service_id: String,
    /// Service display name.
    pub service_name: Option<String>,
    /// One of the service's common issues, if the submitter picked one.
    pub selected_issue: Option<String>,
    /// Free-text issue when none of the common issues fit.
    pub custom_issue: Option<String>,
}

/// Where a submission was made from.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Reported accuracy radius in meters.
    pub accuracy: Option<f64>,
    /// County resolved from the coordinates.
    pub county: Option<String>,
    /// When the position was captured.
    pub timestamp: Option<DateTime<Utc>>,
}

impl GeoLocation {
    /// Creates a location from raw coordinates with no county attached.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            county: None,
            timestamp: None,
        }
    }

    /// Returns the resolved county name, ignoring blank values.
    #[must_use]
    pub fn county(&self) -> Option<&str> {
        self.county.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// One citizen submission.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackRecord {
    /// Opaque unique id.
    pub id: String,
    /// Human-facing reference number (e.g. `"FB-20250115-3F9A2C"`).
    pub reference_number: String,
    /// Submission kind.
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    /// Department classification.
    pub department: DepartmentSelection,
    /// Submitter-assigned priority.
    pub priority: FeedbackPriority,
    /// Free-text description.
    #[serde(alias = "message")]
    pub description: String,
    /// References to stored attachments.
    pub attachments: Vec<String>,
    /// Contact phone number.
    pub phone_number: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Where the submission was made from.
    pub location: Option<GeoLocation>,
    /// Case-management status.
    pub status: FeedbackStatus,
    /// Creation time. Never changes after submission.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Case officer, set when the record is closed.
    pub assigned_to: Option<String>,
    /// Closing notes.
    pub resolution_notes: Option<String>,
    /// When the record was closed.
    pub resolution_date: Option<DateTime<Utc>>,
}

/// Optional fields applied alongside a status transition.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Case officer handling the record.
    pub assigned_to: Option<String>,
    /// Notes explaining the outcome.
    pub resolution_notes: Option<String>,
}

impl FeedbackRecord {
    /// The county this record was attributed to, if any.
    #[must_use]
    pub fn county(&self) -> Option<&str> {
        self.location.as_ref().and_then(GeoLocation::county)
    }

    /// Moves the record to `next`.
    ///
    /// Entering a terminal status stamps `resolution_date` and applies the
    /// assignment and notes from `update`. `updated_at` is bumped on every
    /// successful transition.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransitionError`] if the current status does not
    /// allow moving to `next`.
    pub fn transition(
        &mut self,
        next: FeedbackStatus,
        update: StatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidTransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransitionError {
                from: self.status,
                to: next,
            });
        }

        if next.is_terminal() {
            self.resolution_date = Some(now);
            if update.assigned_to.is_some() {
                self.assigned_to = update.assigned_to;
            }
            if update.resolution_notes.is_some() {
                self.resolution_notes = update.resolution_notes;
            }
        }

        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

/// Error returned when a status transition is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransitionError {
    /// Status the record was in.
    pub from: FeedbackStatus,
    /// Status that was requested.
    pub to: FeedbackStatus,
}

impl std::fmt::Display for InvalidTransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot move feedback from {} to {}", self.from, self.to)
    }
}

impl std::error::Error for InvalidTransitionError {}

/// Values captured by the submission form.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewFeedback {
    /// Contact phone number (required).
    pub phone_number: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Submission kind. Defaults to [`FeedbackType::Feedback`].
    #[serde(rename = "type")]
    pub feedback_type: Option<FeedbackType>,
    /// Department classification.
    pub department: DepartmentSelection,
    /// Free-text description (required).
    #[serde(alias = "message")]
    pub description: String,
    /// References to uploaded attachments.
    pub attachments: Vec<String>,
    /// Submitter-assigned priority.
    pub priority: FeedbackPriority,
    /// Browser-captured location.
    pub location: Option<GeoLocation>,
}

impl NewFeedback {
    /// Checks the fields a submission cannot do without.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first missing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phone_number.trim().is_empty() {
            return Err(ValidationError {
                field: "phoneNumber",
                message: "phone number is required",
            });
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError {
                field: "description",
                message: "description is required",
            });
        }
        Ok(())
    }
}

/// Error returned when a submission is missing required values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    /// Form field name (camelCase, as submitted).
    pub field: &'static str,
    /// What is wrong with it.
    pub message: &'static str,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
