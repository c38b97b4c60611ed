//! Interaction mode state machine.
//!
//! `Creating --begin_edit--> Editing --finish_edit--> Creating`. Only one
//! workout may be in edit at a time.

use serde::Serialize;

use crate::error::SessionError;
use crate::types::workout::WorkoutId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Creating,
    Editing { id: WorkoutId },
}

impl Mode {
    pub fn is_editing(&self) -> bool {
        matches!(self, Mode::Editing { .. })
    }

    pub fn editing_id(&self) -> Option<&WorkoutId> {
        match self {
            Mode::Editing { id } => Some(id),
            Mode::Creating => None,
        }
    }

    pub fn begin_edit(&mut self, id: WorkoutId) -> Result<(), SessionError> {
        match self {
            Mode::Creating => {
                *self = Mode::Editing { id };
                Ok(())
            }
            Mode::Editing { .. } => Err(SessionError::EditInProgress),
        }
    }

    /// Leaves edit mode, returning the id that was being edited.
    pub fn finish_edit(&mut self) -> Result<WorkoutId, SessionError> {
        match std::mem::take(self) {
            Mode::Editing { id } => Ok(id),
            Mode::Creating => Err(SessionError::NotEditing),
        }
    }
}
