//! Tracking form: collects a waypoint's location, note, and status tags.
//!
//! The form enforces the submission rules: at least one status must be
//! selected, and no more than [`MAX_STATUSES`]. Once the maximum is
//! reached the remaining options become unselectable.

use uuid::Uuid;

use crate::model::{CargoTracking, StatusKind, TrackingSubmission};
use crate::stepper::kind_label;

/// Most status tags a single waypoint may carry.
pub const MAX_STATUSES: usize = 3;

/// Why the form refused an input or a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("select at least one status")]
    NoStatusSelected,

    #[error("at most 3 statuses can be selected")]
    TooManyStatuses,
}

/// One checkbox in the status picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOption {
    pub kind: StatusKind,
    pub label: &'static str,
    pub selected: bool,
    pub selectable: bool,
}

/// Create or update form for a tracking waypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingForm {
    cargo_id: Uuid,
    editing: Option<Uuid>,
    pub location: String,
    pub description: String,
    selected: Vec<StatusKind>,
}

impl TrackingForm {
    /// An empty form for recording a new waypoint.
    pub fn new(cargo_id: Uuid) -> Self {
        Self {
            cargo_id,
            editing: None,
            location: String::new(),
            description: String::new(),
            selected: Vec::new(),
        }
    }

    /// A form pre-filled from an existing waypoint.
    ///
    /// Selects the distinct known statuses in history order, up to the maximum.
    pub fn edit(waypoint: &CargoTracking) -> Self {
        let mut selected = Vec::new();
        for kind in waypoint.history.iter().filter_map(|s| s.status.kind()) {
            if selected.len() == MAX_STATUSES {
                break;
            }
            if !selected.contains(&kind) {
                selected.push(kind);
            }
        }
        Self {
            cargo_id: waypoint.cargo_id,
            editing: Some(waypoint.id),
            location: waypoint.location.clone().unwrap_or_default(),
            description: waypoint.description.clone().unwrap_or_default(),
            selected,
        }
    }

    pub fn cargo_id(&self) -> Uuid {
        self.cargo_id
    }

    /// The waypoint being updated, or `None` for a new one.
    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn selected(&self) -> &[StatusKind] {
        &self.selected
    }

    pub fn is_selected(&self, kind: StatusKind) -> bool {
        self.selected.contains(&kind)
    }

    /// Whether the checkbox for `kind` is enabled.
    pub fn is_selectable(&self, kind: StatusKind) -> bool {
        self.is_selected(kind) || self.selected.len() < MAX_STATUSES
    }

    /// Flips a status checkbox.
    ///
    /// Selecting past the maximum is refused and leaves the selection as is.
    pub fn toggle_status(&mut self, kind: StatusKind) -> Result<(), FormError> {
        if let Some(pos) = self.selected.iter().position(|k| *k == kind) {
            self.selected.remove(pos);
            return Ok(());
        }
        if !self.is_selectable(kind) {
            return Err(FormError::TooManyStatuses);
        }
        self.selected.push(kind);
        Ok(())
    }

    /// Replaces the whole selection, deduplicating and enforcing the maximum.
    pub fn set_statuses(&mut self, kinds: &[StatusKind]) -> Result<(), FormError> {
        let mut next = Self {
            selected: Vec::new(),
            ..self.clone()
        };
        for kind in kinds {
            if !next.is_selected(*kind) {
                next.toggle_status(*kind)?;
            }
        }
        self.selected = next.selected;
        Ok(())
    }

    /// Every status option with its current checkbox state.
    pub fn options(&self) -> Vec<StatusOption> {
        StatusKind::ALL
            .into_iter()
            .map(|kind| StatusOption {
                kind,
                label: kind_label(kind),
                selected: self.is_selected(kind),
                selectable: self.is_selectable(kind),
            })
            .collect()
    }

    /// Validates the form and builds the record to send.
    pub fn submit(&self) -> Result<TrackingSubmission, FormError> {
        if self.selected.is_empty() {
            return Err(FormError::NoStatusSelected);
        }
        if self.selected.len() > MAX_STATUSES {
            return Err(FormError::TooManyStatuses);
        }
        Ok(TrackingSubmission {
            id: self.editing,
            cargo_id: self.cargo_id,
            location: non_blank(&self.location),
            description: non_blank(&self.description),
            statuses: self.selected.clone(),
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
