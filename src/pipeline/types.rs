use serde::Serialize;
use uuid::Uuid;

use crate::ranking::Candidate;
use crate::selection::Selection;

use super::stage::Stage;

#[derive(Debug, Clone, Serialize)]
/// A successful matching run.
pub struct MatchOutcome {
    pub run_id: Uuid,
    pub query: String,
    pub selection: Selection,
    /// Every ranked candidate shown to the model, nearest first.
    pub candidates: Vec<Candidate>,
    pub prompt: String,
    /// Reply of the attempt that parsed.
    pub raw_reply: String,
    /// Completion calls made, including the successful one.
    pub attempts: u32,
    pub stages: Vec<Stage>,
}

impl MatchOutcome {
    /// Full record of the selected candidate.
    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|c| c.id == self.selection.selected_id)
    }
}
