//! Status-to-visual mappings: colour token, icon, and label.
//!
//! Every [`StatusKind`] has an entry. Unknown codes and missing statuses
//! fall back to neutral values instead of failing.

use std::fmt;

use serde::Serialize;

use crate::model::{StatusCode, StatusKind};

/// Colour token for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Primary,
    Secondary,
    Info,
    Success,
    Warning,
    Error,
    /// Used when the status is unknown or absent.
    Default,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Icon identifier for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Luggage,
    FlightTakeoff,
    FlightLand,
    SearchOff,
    TaskAlt,
    Hourglass,
    ReportProblem,
    AssignmentReturn,
    PauseCircle,
    Policy,
    Store,
    /// Used when the status is unknown or absent.
    Unknown,
}

impl Icon {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Luggage => "luggage",
            Self::FlightTakeoff => "flight-takeoff",
            Self::FlightLand => "flight-land",
            Self::SearchOff => "search-off",
            Self::TaskAlt => "task-alt",
            Self::Hourglass => "hourglass",
            Self::ReportProblem => "report-problem",
            Self::AssignmentReturn => "assignment-return",
            Self::PauseCircle => "pause-circle",
            Self::Policy => "policy",
            Self::Store => "store",
            Self::Unknown => "help-outline",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

pub fn kind_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::CheckedIn | StatusKind::CustomsCheck => Color::Info,
        StatusKind::InTransit => Color::Primary,
        StatusKind::Arrived | StatusKind::Delivered => Color::Success,
        StatusKind::Lost | StatusKind::Damaged => Color::Error,
        StatusKind::Pending | StatusKind::OnHold => Color::Warning,
        StatusKind::Retrieved | StatusKind::InOffice => Color::Secondary,
    }
}

pub fn kind_icon(kind: StatusKind) -> Icon {
    match kind {
        StatusKind::CheckedIn => Icon::Luggage,
        StatusKind::InTransit => Icon::FlightTakeoff,
        StatusKind::Arrived => Icon::FlightLand,
        StatusKind::Lost => Icon::SearchOff,
        StatusKind::Delivered => Icon::TaskAlt,
        StatusKind::Pending => Icon::Hourglass,
        StatusKind::Damaged => Icon::ReportProblem,
        StatusKind::Retrieved => Icon::AssignmentReturn,
        StatusKind::OnHold => Icon::PauseCircle,
        StatusKind::CustomsCheck => Icon::Policy,
        StatusKind::InOffice => Icon::Store,
    }
}

pub fn kind_label(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::CheckedIn => "Checked in",
        StatusKind::InTransit => "In transit",
        StatusKind::Arrived => "Arrived",
        StatusKind::Lost => "Lost",
        StatusKind::Delivered => "Delivered",
        StatusKind::Pending => "Pending",
        StatusKind::Damaged => "Damaged",
        StatusKind::Retrieved => "Retrieved",
        StatusKind::OnHold => "On hold",
        StatusKind::CustomsCheck => "Customs check",
        StatusKind::InOffice => "In office",
    }
}

/// Badge colour for a status, or [`Color::Default`].
pub fn status_color(status: Option<&StatusCode>) -> Color {
    status
        .and_then(StatusCode::kind)
        .map_or(Color::Default, kind_color)
}

/// Badge icon for a status, or [`Icon::Unknown`].
pub fn status_icon(status: Option<&StatusCode>) -> Icon {
    status
        .and_then(StatusCode::kind)
        .map_or(Icon::Unknown, kind_icon)
}

/// Human label for a status.
///
/// Unknown codes get a best-effort label: lower-cased, underscores as spaces.
pub fn status_label(status: Option<&StatusCode>) -> String {
    match status {
        Some(StatusCode::Known(kind)) => kind_label(*kind).to_string(),
        Some(StatusCode::Unknown(raw)) => raw.to_lowercase().replace('_', " "),
        None => "unknown".to_string(),
    }
}
