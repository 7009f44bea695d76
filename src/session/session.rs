use log::info;

use crate::core::MergeError;
use crate::pipeline::{Export, filter_by_mpan, filtered_export};
use crate::session::{Action, Phase};
use crate::table::Table;

/// Session-scoped context for the MPAN query loop.
///
/// Holds the combined table for the whole session; the filtered table is
/// recomputed from it whenever a result is rendered.
#[derive(Debug, Clone)]
pub struct Session {
    combined: Table,
    phase: Phase,
    query_key: Option<String>,
}

impl Session {
    pub fn new(combined: Table) -> Self {
        Self {
            combined,
            phase: Phase::Input,
            query_key: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn query_key(&self) -> Option<&str> {
        self.query_key.as_deref()
    }

    pub fn combined(&self) -> &Table {
        &self.combined
    }

    /// Applies one interaction. On error the session is left untouched.
    pub fn apply(&mut self, action: Action) -> Result<Phase, MergeError> {
        let next = match (self.phase, action) {
            (Phase::Done, _) => return Err(MergeError::SessionFinished),
            (Phase::Input, Action::Submit(key)) => {
                if key.is_empty() {
                    return Err(MergeError::EmptyQuery);
                }
                self.query_key = Some(key);
                Phase::Result
            }
            (Phase::Result, Action::Continue) => {
                self.query_key = None;
                Phase::Input
            }
            (Phase::Result, Action::Stop) => Phase::Done,
            (phase, action) => {
                return Err(MergeError::InvalidAction {
                    phase: phase.to_string(),
                    action: action.to_string(),
                });
            }
        };
        info!("session transition {} -> {}", self.phase, next);
        self.phase = next;
        Ok(next)
    }

    /// Rows matching the stored key, or `None` outside the result phase.
    pub fn filtered(&self) -> Option<Result<Table, MergeError>> {
        match (self.phase, &self.query_key) {
            (Phase::Result, Some(key)) => Some(filter_by_mpan(&self.combined, key)),
            _ => None,
        }
    }

    /// The current result as `<MPAN>_filtered.xlsx`.
    pub fn export(&self) -> Result<Export, MergeError> {
        let key = match (self.phase, &self.query_key) {
            (Phase::Result, Some(key)) => key,
            (Phase::Done, _) => return Err(MergeError::SessionFinished),
            (phase, _) => {
                return Err(MergeError::InvalidAction {
                    phase: phase.to_string(),
                    action: "download".to_string(),
                });
            }
        };
        let filtered = filter_by_mpan(&self.combined, key)?;
        if filtered.is_empty() {
            return Err(MergeError::NoMatch(key.clone()));
        }
        filtered_export(&filtered, key)
    }
}
