use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// Stages of one matching run, in execution order.
///
/// A failure at any stage ends the run; the stage it failed in is reported
/// by [`MatchError::stage`](super::MatchError::stage).
pub enum Stage {
    Idle,
    Embedding,
    Ranking,
    PromptBuilt,
    Completing,
    Parsed,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Embedding => "embedding",
            Stage::Ranking => "ranking",
            Stage::PromptBuilt => "prompt_built",
            Stage::Completing => "completing",
            Stage::Parsed => "parsed",
            Stage::Done => "done",
        }
    }

    /// Whether `next` may directly follow `self`.
    ///
    /// `Completing` may repeat after a failed parse when retries are enabled.
    pub fn can_advance_to(&self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Idle, Stage::Embedding)
                | (Stage::Embedding, Stage::Ranking)
                | (Stage::Ranking, Stage::PromptBuilt)
                | (Stage::PromptBuilt, Stage::Completing)
                | (Stage::Completing, Stage::Completing)
                | (Stage::Completing, Stage::Parsed)
                | (Stage::Parsed, Stage::Done)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
