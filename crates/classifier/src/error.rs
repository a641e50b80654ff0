use thiserror::Error;

use crate::state::ProbeState;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("user {user} cannot move from {from} to {to}")]
    IllegalTransition {
        user: String,
        from: ProbeState,
        to: ProbeState,
    },
    #[error("user {0} is not tracked")]
    Untracked(String),
}
