//! Tracking stepper: derives the vertical timeline view of a cargo's waypoints.
//!
//! Everything here is a pure function of the waypoints plus one piece of
//! view state, the currently expanded step. Nothing performs I/O, and
//! malformed input (empty history, missing timestamps, unknown codes)
//! degrades to fallback rendering.

mod presentation;

use std::cmp::Reverse;

use serde::Serialize;

use crate::model::{CargoTracking, LuggageStatus};

pub use presentation::{
    Color, Icon, kind_color, kind_icon, kind_label, status_color, status_icon, status_label,
};

/// The most recent status on a waypoint, or `None` when it has none.
///
/// Entries without a timestamp count as older than any stamped entry.
/// On equal timestamps the earliest entry in history order wins.
pub fn latest_status(waypoint: &CargoTracking) -> Option<&LuggageStatus> {
    waypoint.history.iter().fold(None, |latest, entry| match latest {
        Some(current) if entry.created_at <= current.created_at => Some(current),
        _ => Some(entry),
    })
}

/// History sorted newest first.
///
/// Stable: entries with equal timestamps keep their original order,
/// so sorting an already sorted history changes nothing.
pub fn sort_history_descending(history: &[LuggageStatus]) -> Vec<&LuggageStatus> {
    let mut sorted: Vec<&LuggageStatus> = history.iter().collect();
    sorted.sort_by_key(|s| Reverse(s.created_at));
    sorted
}

/// Whether a waypoint has enough history to be expanded.
pub fn can_expand(waypoint: &CargoTracking) -> bool {
    waypoint.history.len() > 1
}

/// Which step, if any, has its history panel open.
///
/// Only one step is expanded at a time: expanding another collapses
/// the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepperState {
    expanded: Option<usize>,
}

impl StepperState {
    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded == Some(index)
    }

    /// Toggles the step at `index`.
    ///
    /// Collapses it if it is the open one. Otherwise opens it, closing any
    /// other, provided it has more than one status. Returns whether the
    /// state changed.
    pub fn toggle(&mut self, index: usize, waypoints: &[CargoTracking]) -> bool {
        if self.is_expanded(index) {
            self.expanded = None;
            return true;
        }
        match waypoints.get(index) {
            Some(waypoint) if can_expand(waypoint) => {
                self.expanded = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }
}

/// One rendered step of the timeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step<'a> {
    /// Position in the timeline, starting at 0.
    pub index: usize,
    pub waypoint: &'a CargoTracking,
    pub latest: Option<&'a LuggageStatus>,
    pub color: Color,
    pub icon: Icon,
    pub label: String,
    pub expandable: bool,
    pub expanded: bool,

    /// Newest-first history; empty unless the step is expanded.
    pub history: Vec<&'a LuggageStatus>,
}

/// A timeline view over a cargo's waypoints.
#[derive(Debug, Clone, Copy)]
pub struct Stepper<'a> {
    waypoints: &'a [CargoTracking],
    state: StepperState,
}

impl<'a> Stepper<'a> {
    pub fn new(waypoints: &'a [CargoTracking], state: StepperState) -> Self {
        Self { waypoints, state }
    }

    /// Steps in the order the waypoints were given.
    pub fn steps(&self) -> Vec<Step<'a>> {
        self.waypoints
            .iter()
            .enumerate()
            .map(|(index, waypoint)| {
                let latest = latest_status(waypoint);
                let code = latest.map(|s| &s.status);
                let expanded = self.state.is_expanded(index) && can_expand(waypoint);
                Step {
                    index,
                    waypoint,
                    latest,
                    color: status_color(code),
                    icon: status_icon(code),
                    label: status_label(code),
                    expandable: can_expand(waypoint),
                    expanded,
                    history: if expanded {
                        sort_history_descending(&waypoint.history)
                    } else {
                        Vec::new()
                    },
                }
            })
            .collect()
    }

    /// Hands the step's position to `on_edit`, which opens the update form.
    ///
    /// Returns `false` without calling back when `index` is out of range.
    pub fn request_edit(&self, index: usize, on_edit: impl FnOnce(usize)) -> bool {
        if index < self.waypoints.len() {
            on_edit(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use super::*;
    use crate::model::{StatusCode, StatusKind};

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn status(kind: StatusKind, at: &str) -> LuggageStatus {
        LuggageStatus::new(kind, ts(at))
    }

    fn waypoint(history: Vec<LuggageStatus>) -> CargoTracking {
        let now = ts("2024-01-01T00:00:00Z");
        CargoTracking {
            id: Uuid::new_v4(),
            cargo_id: Uuid::nil(),
            location: Some("FRA".into()),
            description: None,
            created_by: "ops".into(),
            created_at: now,
            updated_at: now,
            history,
        }
    }

    fn scenario() -> Vec<CargoTracking> {
        vec![
            waypoint(vec![status(StatusKind::CheckedIn, "2024-01-01T00:00:00Z")]),
            waypoint(vec![
                status(StatusKind::InTransit, "2024-01-02T00:00:00Z"),
                status(StatusKind::Arrived, "2024-01-03T00:00:00Z"),
            ]),
        ]
    }

    fn sorted(history: &[LuggageStatus]) -> Vec<LuggageStatus> {
        sort_history_descending(history)
            .into_iter()
            .cloned()
            .collect()
    }

    fn kinds(history: &[&LuggageStatus]) -> Vec<Option<StatusKind>> {
        history.iter().map(|s| s.status.kind()).collect()
    }

    #[test]
    fn latest_status_is_the_newest_entry() {
        let wp = waypoint(vec![
            status(StatusKind::Arrived, "2024-01-03T00:00:00Z"),
            status(StatusKind::CheckedIn, "2024-01-01T00:00:00Z"),
            status(StatusKind::InTransit, "2024-01-02T00:00:00Z"),
        ]);

        let latest = latest_status(&wp).unwrap();
        assert_eq!(latest.status.kind(), Some(StatusKind::Arrived));
        for entry in &wp.history {
            assert!(latest.created_at >= entry.created_at);
        }
    }

    #[test]
    fn latest_status_of_empty_history_is_none() {
        assert!(latest_status(&waypoint(vec![])).is_none());
    }

    #[test]
    fn missing_timestamps_lose_to_stamped_entries() {
        let wp = waypoint(vec![
            status(StatusKind::Pending, "2024-01-01T00:00:00Z"),
            LuggageStatus {
                status: StatusCode::Known(StatusKind::Lost),
                created_at: None,
            },
        ]);

        assert_eq!(
            latest_status(&wp).unwrap().status.kind(),
            Some(StatusKind::Pending)
        );
    }

    #[test]
    fn latest_status_tie_goes_to_first_entry() {
        let wp = waypoint(vec![
            status(StatusKind::OnHold, "2024-01-01T00:00:00Z"),
            status(StatusKind::CustomsCheck, "2024-01-01T00:00:00Z"),
        ]);

        assert_eq!(
            latest_status(&wp).unwrap().status.kind(),
            Some(StatusKind::OnHold)
        );
    }

    #[test]
    fn sort_descending_is_idempotent_and_stable() {
        let history = vec![
            status(StatusKind::CheckedIn, "2024-01-01T00:00:00Z"),
            status(StatusKind::OnHold, "2024-01-02T00:00:00Z"),
            status(StatusKind::CustomsCheck, "2024-01-02T00:00:00Z"),
            status(StatusKind::Delivered, "2024-01-05T00:00:00Z"),
        ];

        let once = sorted(&history);
        let twice = sorted(&once);

        assert_eq!(once, twice);
        assert_eq!(
            once.iter().map(|s| s.status.kind()).collect::<Vec<_>>(),
            vec![
                Some(StatusKind::Delivered),
                Some(StatusKind::OnHold),
                Some(StatusKind::CustomsCheck),
                Some(StatusKind::CheckedIn),
            ]
        );
    }

    #[test]
    fn unstamped_entries_sort_last_in_original_order() {
        let unstamped = |kind: StatusKind| LuggageStatus {
            status: StatusCode::Known(kind),
            created_at: None,
        };
        let history = vec![
            unstamped(StatusKind::Lost),
            status(StatusKind::Pending, "2024-01-01T00:00:00Z"),
            unstamped(StatusKind::Retrieved),
            status(StatusKind::Arrived, "2024-01-02T00:00:00Z"),
        ];

        let sorted = sort_history_descending(&history);

        assert_eq!(
            kinds(&sorted),
            vec![
                Some(StatusKind::Arrived),
                Some(StatusKind::Pending),
                Some(StatusKind::Lost),
                Some(StatusKind::Retrieved),
            ]
        );
        assert_eq!(sorted[2].created_at, None);
    }

    #[test]
    fn expanding_one_step_collapses_the_other() {
        let mut waypoints = scenario();
        waypoints.push(waypoint(vec![
            status(StatusKind::Damaged, "2024-01-04T00:00:00Z"),
            status(StatusKind::Retrieved, "2024-01-05T00:00:00Z"),
        ]));
        let mut state = StepperState::default();

        assert!(state.toggle(1, &waypoints));
        assert!(state.toggle(2, &waypoints));

        assert!(!state.is_expanded(1));
        assert!(state.is_expanded(2));
        assert_eq!(state.expanded(), Some(2));
    }

    #[test]
    fn toggling_the_open_step_collapses_it() {
        let waypoints = scenario();
        let mut state = StepperState::default();

        state.toggle(1, &waypoints);
        assert!(state.toggle(1, &waypoints));
        assert_eq!(state.expanded(), None);
    }

    #[test]
    fn single_status_step_cannot_expand() {
        let waypoints = scenario();
        let mut state = StepperState::default();

        assert!(!state.toggle(0, &waypoints));
        assert_eq!(state.expanded(), None);

        let steps = Stepper::new(&waypoints, state).steps();
        assert!(!steps[0].expandable);
        assert!(steps[1].expandable);
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let waypoints = scenario();
        let mut state = StepperState::default();
        state.toggle(1, &waypoints);

        assert!(!state.toggle(9, &waypoints));
        assert_eq!(state.expanded(), Some(1));
    }

    #[test]
    fn scenario_expanded_step_shows_newest_first() {
        let waypoints = scenario();
        let mut state = StepperState::default();

        assert_eq!(
            latest_status(&waypoints[1]).unwrap().status.kind(),
            Some(StatusKind::Arrived)
        );

        state.toggle(1, &waypoints);
        let steps = Stepper::new(&waypoints, state).steps();

        assert!(steps[1].expanded);
        assert_eq!(
            kinds(&steps[1].history),
            vec![Some(StatusKind::Arrived), Some(StatusKind::InTransit)]
        );
        assert_eq!(
            steps[1].history[0].created_at,
            Some(ts("2024-01-03T00:00:00Z"))
        );
        assert!(steps[0].history.is_empty());
        assert_eq!(steps[1].color, Color::Success);
        assert_eq!(steps[1].icon, Icon::FlightLand);
        assert_eq!(steps[1].label, "Arrived");
    }

    #[test]
    fn step_without_history_renders_fallback() {
        let waypoints = vec![waypoint(vec![])];
        let steps = Stepper::new(&waypoints, StepperState::default()).steps();

        assert!(steps[0].latest.is_none());
        assert_eq!(steps[0].color, Color::Default);
        assert_eq!(steps[0].icon, Icon::Unknown);
        assert_eq!(steps[0].label, "unknown");
    }

    #[test]
    fn request_edit_passes_the_ordinal() {
        let waypoints = scenario();
        let stepper = Stepper::new(&waypoints, StepperState::default());
        let mut edited = None;

        assert!(stepper.request_edit(1, |index| edited = Some(index)));
        assert_eq!(edited, Some(1));

        assert!(!stepper.request_edit(5, |_| panic!("out of range edit")));
    }
}
