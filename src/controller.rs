//! Root phase controller
//!
//! Owns the active phase and the accumulated selection. Screens never touch
//! either directly; they hand their output to one of the transitions below.
//! Transitions can't fail. Calling one from the wrong phase does nothing.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::image_ref::ImageRef;
use crate::selection::{DateSelection, SelectionPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Intro,
    Passport,
    Selection,
    Comments,
    Ticket,
    Sent,
}

impl Phase {
    pub fn display(&self) -> &str {
        match self {
            Phase::Intro => "Invitation",
            Phase::Passport => "Passport Control",
            Phase::Selection => "Departures",
            Phase::Comments => "Special Requests",
            Phase::Ticket => "Boarding Pass",
            Phase::Sent => "Confirmed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    phase: Phase,
    selection: DateSelection,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            phase: Phase::Intro,
            selection: DateSelection::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selection(&self) -> &DateSelection {
        &self.selection
    }

    fn transition(&mut self, from: Phase, to: Phase) -> bool {
        if self.phase != from {
            debug!(current = ?self.phase, expected = ?from, target = ?to, "ignoring transition");
            return false;
        }
        info!(from = ?from, to = ?to, "phase transition");
        self.phase = to;
        true
    }

    pub fn advance_from_intro(&mut self) {
        self.transition(Phase::Intro, Phase::Passport);
    }

    /// Passport approved: keep the verification photo and open departures.
    pub fn advance_from_passport(&mut self, photo: ImageRef) {
        if self.transition(Phase::Passport, Phase::Selection) {
            self.selection.passport_image = Some(photo);
        }
    }

    /// Merges the chosen destination. A patch always carries both category and location.
    pub fn finalize_selection(&mut self, patch: SelectionPatch) {
        if self.transition(Phase::Selection, Phase::Comments) {
            self.selection.merge(patch);
        }
    }

    pub fn set_comments(&mut self, comments: String) {
        if self.phase == Phase::Comments {
            self.selection.comments = comments;
        }
    }

    pub fn submit_comments(&mut self) {
        self.transition(Phase::Comments, Phase::Ticket);
    }

    pub fn return_to_selection(&mut self) {
        self.transition(Phase::Comments, Phase::Selection);
    }

    pub fn send(&mut self) {
        if self.transition(Phase::Ticket, Phase::Sent) {
            match serde_json::to_string(&self.selection.log_view()) {
                Ok(json) => info!(selection = %json, "date selection sent"),
                Err(err) => warn!(error = %err, "date selection sent but could not be serialized for the log"),
            }
        }
    }
}
