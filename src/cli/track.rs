//! Tracking commands: add, update, show.
//!
//! Steps are numbered from 1 on the command line, in the order `show`
//! prints them.

use clap::Subcommand;

use crate::{
    config::Config,
    identity::resolve_operator,
    model::{Cargo, StatusKind},
    session::{Session, SessionError},
    stepper::{Stepper, StepperState},
    storage::Storage,
    store::TrackingStore,
};

use super::{cargo::resolve_cargo, format::format_timeline};

#[derive(Debug, Subcommand)]
pub enum TrackCommand {
    /// Record a new waypoint for a cargo.
    Add {
        /// Cargo: UUID, waybill reference, or id prefix.
        #[arg(long)]
        cargo: String,

        /// Where the cargo is.
        #[arg(long)]
        location: Option<String>,

        /// Free-text note.
        #[arg(long)]
        description: Option<String>,

        /// Status tag (e.g. `in-transit`). Give 1 to 3.
        #[arg(long = "status")]
        statuses: Vec<StatusKind>,
    },

    /// Update an existing waypoint. Unspecified fields keep their values.
    Update {
        /// Cargo: UUID, waybill reference, or id prefix.
        #[arg(long)]
        cargo: String,

        /// Step number as shown by `track show`.
        step: usize,

        /// New location. Pass an empty string to clear it.
        #[arg(long)]
        location: Option<String>,

        /// New note. Pass an empty string to clear it.
        #[arg(long)]
        description: Option<String>,

        /// Replacement status tags (1 to 3). Keeps the current ones when omitted.
        #[arg(long = "status")]
        statuses: Vec<StatusKind>,
    },

    /// Show a cargo's tracking timeline.
    Show {
        /// Cargo: UUID, waybill reference, or id prefix.
        #[arg(long)]
        cargo: String,

        /// Open the status history of this step (needs more than one status).
        #[arg(long)]
        expand: Option<usize>,

        /// Print the timeline as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

pub(super) fn run(
    config: &Config,
    storage: &Storage,
    operator: Option<&str>,
    command: TrackCommand,
) -> Result<(), String> {
    match command {
        TrackCommand::Add {
            cargo,
            location,
            description,
            statuses,
        } => {
            let cargo = resolve_cargo(storage, &cargo)?;
            let operator = resolve_operator(operator, config)?;
            cmd_add(storage, &cargo, &operator, location, description, &statuses)
        }
        TrackCommand::Update {
            cargo,
            step,
            location,
            description,
            statuses,
        } => {
            let cargo = resolve_cargo(storage, &cargo)?;
            let edit = Edit {
                location,
                description,
                statuses,
            };
            cmd_update(storage, &cargo, step, edit)
        }
        TrackCommand::Show { cargo, expand, json } => {
            let cargo = resolve_cargo(storage, &cargo)?;
            cmd_show(storage, &cargo, expand, json)
        }
    }
}

/// Field changes requested by `track update`.
struct Edit {
    location: Option<String>,
    description: Option<String>,
    statuses: Vec<StatusKind>,
}

fn cmd_add(
    storage: &Storage,
    cargo: &Cargo,
    operator: &str,
    location: Option<String>,
    description: Option<String>,
    statuses: &[StatusKind],
) -> Result<(), String> {
    let mut session = Session::new(storage).with_operator(operator);
    session
        .open_cargo(cargo.id)
        .map_err(|e| format!("failed to load tracking: {e}"))?;

    let form = session
        .begin_create()
        .map_err(|e| format!("cannot open tracking form: {e}"))?;
    form.location = location.unwrap_or_default();
    form.description = description.unwrap_or_default();
    form.set_statuses(statuses).map_err(|e| e.to_string())?;

    let saved = session
        .submit_form()
        .map_err(|e| format!("failed to record waypoint: {e}"))?;

    eprintln!(
        "Recorded step {} on {}",
        session.store().len(),
        cargo.reference
    );
    println!("{}", saved.id);
    Ok(())
}

fn cmd_update(storage: &Storage, cargo: &Cargo, step: usize, edit: Edit) -> Result<(), String> {
    let index = step_index(step)?;
    let mut session = Session::new(storage);
    session
        .open_cargo(cargo.id)
        .map_err(|e| format!("failed to load tracking: {e}"))?;

    let form = session.begin_edit(index).map_err(|e| match e {
        SessionError::NoSuchStep(_) => format!("no step {step} on {}", cargo.reference),
        e => e.to_string(),
    })?;
    if let Some(location) = edit.location {
        form.location = location;
    }
    if let Some(description) = edit.description {
        form.description = description;
    }
    if !edit.statuses.is_empty() {
        form.set_statuses(&edit.statuses)
            .map_err(|e| e.to_string())?;
    }

    session
        .submit_form()
        .map_err(|e| format!("failed to update waypoint: {e}"))?;

    eprintln!("Updated step {step} on {}", cargo.reference);
    Ok(())
}

fn cmd_show(
    storage: &Storage,
    cargo: &Cargo,
    expand: Option<usize>,
    json: bool,
) -> Result<(), String> {
    let waypoints = storage
        .list_tracking(cargo.id)
        .map_err(|e| format!("failed to load tracking: {e}"))?;
    let mut store = TrackingStore::new();
    store.replace(cargo.id, waypoints);

    let mut state = StepperState::default();
    if let Some(step) = expand {
        let index = step_index(step)?;
        if store.get(index).is_none() {
            return Err(format!(
                "no step {step}: {} has {} step(s)",
                cargo.reference,
                store.len()
            ));
        }
        if !state.toggle(index, store.waypoints()) {
            eprintln!("Step {step} has a single status; nothing to expand");
        }
    }

    let steps = Stepper::new(store.waypoints(), state).steps();

    if json {
        let json = serde_json::to_string_pretty(&steps)
            .map_err(|e| format!("failed to serialize timeline: {e}"))?;
        println!("{json}");
    } else {
        print!("{}", format_timeline(cargo, &steps));
    }
    Ok(())
}

/// Converts a 1-based step number to an index.
fn step_index(step: usize) -> Result<usize, String> {
    step.checked_sub(1)
        .ok_or_else(|| "steps are numbered from 1".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn setup() -> (TempDir, Storage, Cargo) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("waybill")).unwrap();
        let cargo = Cargo {
            id: Uuid::new_v4(),
            reference: "176-12345675".into(),
            customer: "Acme".into(),
            origin: "NBO".into(),
            destination: "LHR".into(),
            created_at: Timestamp::now(),
        };
        storage.create_cargo(&cargo).unwrap();
        (dir, storage, cargo)
    }

    #[test]
    fn add_then_update_through_the_session() {
        let (_dir, storage, cargo) = setup();

        cmd_add(
            &storage,
            &cargo,
            "ops",
            Some("Nairobi".into()),
            None,
            &[StatusKind::CheckedIn],
        )
        .unwrap();
        cmd_update(
            &storage,
            &cargo,
            1,
            Edit {
                location: None,
                description: Some("Weighed".into()),
                statuses: vec![StatusKind::CheckedIn, StatusKind::OnHold],
            },
        )
        .unwrap();

        let waypoints = storage.list_tracking(cargo.id).unwrap();
        assert_eq!(waypoints.len(), 1);
        assert_eq!(waypoints[0].location.as_deref(), Some("Nairobi"));
        assert_eq!(waypoints[0].description.as_deref(), Some("Weighed"));
        assert_eq!(waypoints[0].history.len(), 2);
        assert_eq!(waypoints[0].created_by, "ops");
    }

    #[test]
    fn add_without_status_is_refused() {
        let (_dir, storage, cargo) = setup();

        let result = cmd_add(&storage, &cargo, "ops", None, None, &[]);
        let err = result.unwrap_err();

        assert!(err.contains("at least one status"), "{err}");
        assert!(storage.list_tracking(cargo.id).unwrap().is_empty());
    }

    #[test]
    fn add_with_four_statuses_is_refused() {
        let (_dir, storage, cargo) = setup();
        let statuses = [
            StatusKind::Lost,
            StatusKind::Damaged,
            StatusKind::Retrieved,
            StatusKind::InOffice,
        ];

        let result = cmd_add(&storage, &cargo, "ops", None, None, &statuses);
        let err = result.unwrap_err();

        assert!(err.contains("at most 3"), "{err}");
    }

    #[test]
    fn update_unknown_step_fails() {
        let (_dir, storage, cargo) = setup();
        let edit = || Edit {
            location: None,
            description: None,
            statuses: vec![],
        };

        assert!(cmd_update(&storage, &cargo, 0, edit()).is_err());
        let err = cmd_update(&storage, &cargo, 4, edit()).unwrap_err();
        assert_eq!(err, "no step 4 on 176-12345675");
    }

    #[test]
    fn update_runs_without_an_operator() {
        let (_dir, storage, cargo) = setup();
        cmd_add(&storage, &cargo, "ops", None, None, &[StatusKind::Pending]).unwrap();

        let command = TrackCommand::Update {
            cargo: cargo.reference.clone(),
            step: 1,
            location: Some("Doha".into()),
            description: None,
            statuses: vec![],
        };
        run(&Config::default(), &storage, None, command).unwrap();

        let waypoints = storage.list_tracking(cargo.id).unwrap();
        assert_eq!(waypoints[0].location.as_deref(), Some("Doha"));
        assert_eq!(waypoints[0].created_by, "ops");
    }

    #[test]
    fn show_rejects_missing_step() {
        let (_dir, storage, cargo) = setup();

        let err = cmd_show(&storage, &cargo, Some(2), false).unwrap_err();
        assert!(err.contains("no step 2"), "{err}");
    }
}
