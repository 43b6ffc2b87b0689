//! Tracking session: the state behind one open cargo page.
//!
//! Holds the waypoint store, the stepper's expanded step, and the open
//! tracking form, and talks to the backend through [`TrackingBackend`].
//! Nothing here is global; callers own a `Session` and pass it around.

use log::info;
use uuid::Uuid;

use crate::form::{FormError, TrackingForm};
use crate::model::{CargoTracking, TrackingSubmission};
use crate::stepper::{Stepper, StepperState};
use crate::store::TrackingStore;

/// Whatever persists tracking waypoints and assigns their ids and timestamps.
pub trait TrackingBackend {
    type Error: std::error::Error + 'static;

    /// All waypoints for a cargo, in the order they should be shown.
    fn fetch_tracking(&self, cargo_id: Uuid) -> Result<Vec<CargoTracking>, Self::Error>;

    /// Records a new waypoint and returns it as stored.
    fn create_tracking(
        &self,
        submission: &TrackingSubmission,
        created_by: &str,
    ) -> Result<CargoTracking, Self::Error>;

    /// Updates the waypoint named by `submission.id` and returns it as stored.
    fn update_tracking(
        &self,
        submission: &TrackingSubmission,
    ) -> Result<CargoTracking, Self::Error>;
}

impl<T: TrackingBackend + ?Sized> TrackingBackend for &T {
    type Error = T::Error;

    fn fetch_tracking(&self, cargo_id: Uuid) -> Result<Vec<CargoTracking>, Self::Error> {
        (**self).fetch_tracking(cargo_id)
    }

    fn create_tracking(
        &self,
        submission: &TrackingSubmission,
        created_by: &str,
    ) -> Result<CargoTracking, Self::Error> {
        (**self).create_tracking(submission, created_by)
    }

    fn update_tracking(
        &self,
        submission: &TrackingSubmission,
    ) -> Result<CargoTracking, Self::Error> {
        (**self).update_tracking(submission)
    }
}

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError<E: std::error::Error + 'static> {
    #[error("no cargo is open")]
    NoCargoOpen,

    #[error("no tracking form is open")]
    NoFormOpen,

    #[error("no tracking step at position {0}")]
    NoSuchStep(usize),

    #[error("an operator is required to record a waypoint")]
    NoOperator,

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Backend(E),
}

/// State behind one cargo's tracking page.
///
/// Recording a new waypoint needs an operator; viewing and updating don't.
pub struct Session<B: TrackingBackend> {
    backend: B,
    operator: Option<String>,
    store: TrackingStore,
    stepper: StepperState,
    form: Option<TrackingForm>,
}

impl<B: TrackingBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            operator: None,
            store: TrackingStore::new(),
            stepper: StepperState::default(),
            form: None,
        }
    }

    /// Sets who new waypoints are recorded as.
    #[must_use]
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn store(&self) -> &TrackingStore {
        &self.store
    }

    /// Loads a cargo's waypoints, resetting the view and closing any form.
    pub fn open_cargo(&mut self, cargo_id: Uuid) -> Result<(), SessionError<B::Error>> {
        let waypoints = self
            .backend
            .fetch_tracking(cargo_id)
            .map_err(SessionError::Backend)?;
        self.store.replace(cargo_id, waypoints);
        self.stepper.collapse();
        self.form = None;
        Ok(())
    }

    /// The timeline over the current waypoints.
    pub fn stepper(&self) -> Stepper<'_> {
        Stepper::new(self.store.waypoints(), self.stepper)
    }

    pub fn expanded_step(&self) -> Option<usize> {
        self.stepper.expanded()
    }

    /// Expands or collapses a step. Returns whether anything changed.
    pub fn toggle_step(&mut self, index: usize) -> bool {
        self.stepper.toggle(index, self.store.waypoints())
    }

    /// Opens an empty form for a new waypoint on the open cargo.
    pub fn begin_create(&mut self) -> Result<&mut TrackingForm, SessionError<B::Error>> {
        let cargo_id = self.store.cargo_id().ok_or(SessionError::NoCargoOpen)?;
        Ok(self.form.insert(TrackingForm::new(cargo_id)))
    }

    /// Opens the update form for the step at `index`, pre-filled.
    pub fn begin_edit(
        &mut self,
        index: usize,
    ) -> Result<&mut TrackingForm, SessionError<B::Error>> {
        if self.store.cargo_id().is_none() {
            return Err(SessionError::NoCargoOpen);
        }
        let mut requested = None;
        self.stepper().request_edit(index, |i| requested = Some(i));
        let waypoint = requested
            .and_then(|i| self.store.get(i))
            .ok_or(SessionError::NoSuchStep(index))?;
        let form = TrackingForm::edit(waypoint);
        Ok(self.form.insert(form))
    }

    pub fn form(&self) -> Option<&TrackingForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut TrackingForm> {
        self.form.as_mut()
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Validates and sends the open form, then folds the result into the store.
    ///
    /// A form that fails validation stays open and nothing is sent.
    pub fn submit_form(&mut self) -> Result<CargoTracking, SessionError<B::Error>> {
        let form = self.form.as_ref().ok_or(SessionError::NoFormOpen)?;
        let submission = form.submit()?;

        let saved = if submission.is_update() {
            let saved = self
                .backend
                .update_tracking(&submission)
                .map_err(SessionError::Backend)?;
            self.store.apply_updated(saved.clone());
            info!("updated waypoint {} on cargo {}", saved.id, saved.cargo_id);
            saved
        } else {
            let operator = self.operator.as_deref().ok_or(SessionError::NoOperator)?;
            let saved = self
                .backend
                .create_tracking(&submission, operator)
                .map_err(SessionError::Backend)?;
            self.store.apply_created(saved.clone());
            info!("recorded waypoint {} on cargo {}", saved.id, saved.cargo_id);
            saved
        };

        self.form = None;
        Ok(saved)
    }
}
