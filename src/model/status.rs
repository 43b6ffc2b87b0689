//! Status tags recorded against a tracking waypoint.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The fixed set of shipment states an operator can tag a waypoint with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    CheckedIn,
    InTransit,
    Arrived,
    Lost,
    Delivered,
    Pending,
    Damaged,
    Retrieved,
    OnHold,
    CustomsCheck,
    InOffice,
}

impl StatusKind {
    /// Every kind, in the order the tracking form offers them.
    pub const ALL: [Self; 11] = [
        Self::CheckedIn,
        Self::InTransit,
        Self::Arrived,
        Self::Lost,
        Self::Delivered,
        Self::Pending,
        Self::Damaged,
        Self::Retrieved,
        Self::OnHold,
        Self::CustomsCheck,
        Self::InOffice,
    ];

    /// The wire name, e.g. `CUSTOMS_CHECK`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckedIn => "CHECKED_IN",
            Self::InTransit => "IN_TRANSIT",
            Self::Arrived => "ARRIVED",
            Self::Lost => "LOST",
            Self::Delivered => "DELIVERED",
            Self::Pending => "PENDING",
            Self::Damaged => "DAMAGED",
            Self::Retrieved => "RETRIEVED",
            Self::OnHold => "ON_HOLD",
            Self::CustomsCheck => "CUSTOMS_CHECK",
            Self::InOffice => "IN_OFFICE",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned when a string names no known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for StatusKind {
    type Err = UnknownStatus;

    /// Case-insensitive; `-` is accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A status value as received: either a known kind or a raw string
/// this build doesn't recognise.
///
/// Unknown values are kept verbatim so they can still be labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusCode {
    Known(StatusKind),
    Unknown(String),
}

impl StatusCode {
    pub fn kind(&self) -> Option<StatusKind> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(kind) => kind.as_str(),
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<StatusKind> for StatusCode {
    fn from(kind: StatusKind) -> Self {
        Self::Known(kind)
    }
}

impl From<String> for StatusCode {
    fn from(raw: String) -> Self {
        match raw.parse::<StatusKind>() {
            Ok(kind) => Self::Known(kind),
            Err(_) => Self::Unknown(raw),
        }
    }
}

impl From<StatusCode> for String {
    fn from(code: StatusCode) -> Self {
        match code {
            StatusCode::Known(kind) => kind.as_str().to_string(),
            StatusCode::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One status tag on a waypoint, stamped when it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuggageStatus {
    pub status: StatusCode,

    /// Missing timestamps order before every real one.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl LuggageStatus {
    pub fn new(status: impl Into<StatusCode>, created_at: Timestamp) -> Self {
        Self {
            status: status.into(),
            created_at: Some(created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names_and_loose_spellings() {
        let parse = |s: &str| s.parse::<StatusKind>();

        assert_eq!(parse("CUSTOMS_CHECK"), Ok(StatusKind::CustomsCheck));
        assert_eq!(parse("in-transit"), Ok(StatusKind::InTransit));
        assert_eq!(parse(" on_hold "), Ok(StatusKind::OnHold));
        assert_eq!(parse("SHIPPED"), Err(UnknownStatus("SHIPPED".into())));
    }

    #[test]
    fn every_kind_round_trips_through_its_wire_name() {
        for kind in StatusKind::ALL {
            assert_eq!(kind.as_str().parse::<StatusKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_codes_keep_their_raw_value() {
        let json = r#"{"status":"RETURNED_TO_SENDER","createdAt":null}"#;
        let status: LuggageStatus = serde_json::from_str(json).unwrap();

        assert_eq!(
            status.status,
            StatusCode::Unknown("RETURNED_TO_SENDER".into())
        );
        assert_eq!(status.created_at, None);

        let back = serde_json::to_string(&status).unwrap();
        assert!(back.contains("RETURNED_TO_SENDER"));
    }

    #[test]
    fn known_codes_deserialize_to_kinds() {
        let json = r#"{"status":"ARRIVED","createdAt":"2024-01-03T00:00:00Z"}"#;
        let status: LuggageStatus = serde_json::from_str(json).unwrap();

        assert_eq!(status.status.kind(), Some(StatusKind::Arrived));
        assert!(status.created_at.is_some());
    }

    #[test]
    fn missing_created_at_defaults_to_none() {
        let status: LuggageStatus = serde_json::from_str(r#"{"status":"LOST"}"#).unwrap();
        assert_eq!(status.created_at, None);
    }
}
