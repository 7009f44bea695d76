use std::fmt;

use serde::{Deserialize, Serialize};

/// Step of the repeat-query loop. Exactly one is active per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Input,
    Result,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Input => "input",
            Phase::Result => "result",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// A user interaction that drives the session forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Submit an MPAN to look up.
    Submit(String),
    /// "Yes", query another MPAN.
    Continue,
    /// "No", finish the session.
    Stop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Submit(_) => f.write_str("submit"),
            Action::Continue => f.write_str("continue"),
            Action::Stop => f.write_str("stop"),
        }
    }
}
