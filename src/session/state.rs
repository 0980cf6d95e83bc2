// Session data: phase, per-round records and the end-of-game summary.

use std::fmt;

use crate::catalog::{Category, RoundQueue};
use crate::session::TimerToken;

/// Where the session is in its hint → draw → judge cycle. The index is the
/// zero-based round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Showing(usize),
    Drawing(usize),
    Judging(usize),
    Finished,
}

impl Phase {
    /// A session is running (rounds remain or a judgement is pending).
    pub fn is_active(&self) -> bool {
        !matches!(self, Phase::Idle | Phase::Finished)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Showing(i) => write!(f, "showing round {}", i + 1),
            Phase::Drawing(i) => write!(f, "drawing round {}", i + 1),
            Phase::Judging(i) => write!(f, "judging round {}", i + 1),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Classifier was unavailable or failed; counted as incorrect.
    ClassifierFailed,
    TimedOut,
}

/// Outcome of one resolved round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundRecord {
    pub round: usize,
    pub target: Category,
    pub predicted: Option<Category>,
    pub confidence: Option<f32>,
    pub verdict: Verdict,
}

impl RoundRecord {
    pub fn is_correct(&self) -> bool {
        self.verdict == Verdict::Correct
    }

    /// Player-facing sentence for the prediction line.
    pub fn message(&self) -> String {
        match (self.verdict, self.predicted) {
            (Verdict::Correct, _) => format!("Correct! You drew a {}", self.target.name),
            (Verdict::Incorrect, Some(p)) => format!(
                "Not quite: that looks like a {}. It was a {}",
                p.name, self.target.name
            ),
            (Verdict::TimedOut, _) => format!("Time's up! It was a {}", self.target.name),
            _ => format!(
                "Couldn't recognise the drawing. It was a {}",
                self.target.name
            ),
        }
    }
}

/// Results shown once the last round resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub score: usize,
    pub rounds: Vec<RoundRecord>,
}

impl SessionSummary {
    pub fn total(&self) -> usize {
        self.rounds.len()
    }

    pub fn headline(&self) -> String {
        format!("You scored {} out of {}", self.score, self.total())
    }

    /// One line per round, e.g. `Round 2: moon (guessed star)`.
    pub fn lines(&self) -> Vec<String> {
        self.rounds
            .iter()
            .map(|r| {
                let mark = if r.is_correct() { "✓" } else { "✗" };
                match (r.verdict, r.predicted) {
                    (Verdict::TimedOut, _) => {
                        format!("{mark} Round {}: {} (time ran out)", r.round + 1, r.target.name)
                    }
                    (_, Some(p)) if p != r.target => format!(
                        "{mark} Round {}: {} (guessed {})",
                        r.round + 1,
                        r.target.name,
                        p.name
                    ),
                    (_, Some(_)) => format!("{mark} Round {}: {}", r.round + 1, r.target.name),
                    (_, None) => format!("{mark} Round {}: {} (no guess)", r.round + 1, r.target.name),
                }
            })
            .collect()
    }
}

/// Everything the controller mutates. A fresh session equals `default()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub(crate) queue: RoundQueue,
    pub(crate) current_index: usize,
    pub(crate) score: usize,
    pub(crate) time_remaining_secs: u32,
    pub(crate) phase: Phase,
    pub(crate) last_prediction: Option<Category>,
    pub(crate) active_timer: Option<TimerToken>,
    pub(crate) history: Vec<RoundRecord>,
}

impl SessionState {
    pub fn queue(&self) -> &RoundQueue {
        &self.queue
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_prediction(&self) -> Option<Category> {
        self.last_prediction
    }

    pub fn active_timer(&self) -> Option<TimerToken> {
        self.active_timer
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            rounds: self.history.clone(),
        }
    }
}
