//! Game session state machine.
//!
//! `SessionController` owns one `SessionState` and walks it through
//! `Idle → Showing(i) → Drawing(i) → Judging(i) → Showing(i+1) | Finished`.
//! It never touches the browser directly: rendering goes through a
//! `Presenter`, the one-second countdown through a `Countdown`, and
//! predictions through a `ClassifierPort`.
//!
//! Classification is split into `submit` (enter `Judging`, hand out a ticket)
//! and `resolve` (apply the outcome) so the browser glue can await the model
//! without holding the controller borrowed. Tickets carry the session
//! generation; `start`, `reset` and `abandon` bump it, which turns any late
//! result into `Resolution::Discarded`.

mod state;

pub use state::{Phase, RoundRecord, SessionState, SessionSummary, Verdict};

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::catalog::{Catalog, Category, QueueShortfall, RoundQueue};
use crate::classifier::{ClassifierPort, PredictionResult, Snapshot};
use crate::config::GameConfig;
use crate::error::{ClassifierError, SessionError};

// --- Ports -------------------------------------------------------------------

/// Plain-data notifications for whatever renders the game.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SessionStarted { rounds: usize },
    HintShown { round: usize, total: usize, hint: &'static str },
    TimeRemaining { secs: u32 },
    Judging { round: usize },
    RoundResolved { record: RoundRecord, score: usize },
    SessionFinished(SessionSummary),
    SessionCleared,
}

pub trait Presenter {
    fn present(&mut self, event: &SessionEvent);
}

/// Identifies one armed countdown. Ticks carrying any other token are stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub id: u64,
    pub round: usize,
}

/// One-second ticker. `arm` must deliver `SessionController::tick(token)`
/// once per second until `disarm(token)`.
pub trait Countdown {
    fn arm(&mut self, token: TimerToken);
    fn disarm(&mut self, token: TimerToken);
}

// --- Command results ---------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartReport {
    pub rounds: usize,
    /// Set when the catalog could not fill the configured round count.
    pub shortfall: Option<QueueShortfall>,
}

/// Which session and round a pending classification belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JudgeTicket {
    generation: u64,
    round: usize,
}

impl JudgeTicket {
    pub fn round(&self) -> usize {
        self.round
    }
}

/// Handed out by `submit`; feed the snapshot to the classifier and the
/// ticket back into `resolve`.
#[derive(Debug)]
pub struct PendingJudgement {
    pub ticket: JudgeTicket,
    pub snapshot: Snapshot,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Applied(RoundRecord),
    /// The ticket belonged to an abandoned session or an already-resolved round.
    Discarded,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    Counting { remaining: u32 },
    TimedOut(RoundRecord),
    Stale,
}

// --- Controller --------------------------------------------------------------

pub struct SessionController<P, C> {
    config: GameConfig,
    catalog: Catalog,
    rng: StdRng,
    presenter: P,
    countdown: C,
    state: SessionState,
    generation: u64,
    next_timer_id: u64,
}

impl<P: Presenter, C: Countdown> SessionController<P, C> {
    pub fn new(config: GameConfig, catalog: Catalog, presenter: P, countdown: C) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            catalog,
            rng,
            presenter,
            countdown,
            state: SessionState::default(),
            generation: 0,
            next_timer_id: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> usize {
        self.state.score
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn countdown(&self) -> &C {
        &self.countdown
    }

    /// Target of the round being shown, drawn or judged.
    pub fn current_target(&self) -> Option<Category> {
        match self.state.phase {
            Phase::Showing(i) | Phase::Drawing(i) | Phase::Judging(i) => self.state.queue.get(i),
            Phase::Idle | Phase::Finished => None,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        self.state.summary()
    }

    /// Shuffle a new queue and move to `Showing(0)`. Allowed from `Idle` and
    /// `Finished`; a finished session is cleared first.
    pub fn start(&mut self) -> Result<StartReport, SessionError> {
        if self.state.phase.is_active() {
            return Err(self.invalid("start"));
        }
        self.clear();

        let (queue, shortfall) =
            RoundQueue::shuffled(&self.catalog, self.config.round_count, &mut self.rng);
        if let Some(s) = shortfall {
            warn!(
                "catalog holds {} categories, session truncated from {} rounds",
                s.available, s.requested
            );
        }
        let rounds = queue.len();
        self.state.queue = queue;
        info!("session started with {rounds} rounds");
        self.presenter.present(&SessionEvent::SessionStarted { rounds });

        if rounds == 0 {
            self.finish();
        } else {
            self.state.phase = Phase::Showing(0);
        }
        Ok(StartReport { rounds, shortfall })
    }

    /// Show hint `round`, restart the countdown and let the player draw.
    pub fn begin_round(&mut self, round: usize) -> Result<(), SessionError> {
        if self.state.phase != Phase::Showing(round) {
            return Err(self.invalid("begin_round"));
        }
        let Some(target) = self.state.queue.get(round) else {
            return Err(self.invalid("begin_round"));
        };

        self.disarm_timer();
        self.next_timer_id += 1;
        let token = TimerToken {
            id: self.next_timer_id,
            round,
        };
        self.countdown.arm(token);
        self.state.active_timer = Some(token);
        self.state.time_remaining_secs = self.config.countdown_secs;
        self.state.phase = Phase::Drawing(round);

        debug!("round {} target armed with timer {}", round + 1, token.id);
        self.presenter.present(&SessionEvent::HintShown {
            round,
            total: self.state.queue.len(),
            hint: target.hint,
        });
        self.presenter.present(&SessionEvent::TimeRemaining {
            secs: self.state.time_remaining_secs,
        });
        Ok(())
    }

    /// Stop the clock and move to `Judging`. Rejected outside `Drawing`,
    /// which also keeps a second submission out while one is pending.
    pub fn submit(&mut self, snapshot: Snapshot) -> Result<PendingJudgement, SessionError> {
        let Phase::Drawing(round) = self.state.phase else {
            return Err(self.invalid("submit"));
        };
        self.disarm_timer();
        self.state.phase = Phase::Judging(round);
        self.presenter.present(&SessionEvent::Judging { round });
        Ok(PendingJudgement {
            ticket: JudgeTicket {
                generation: self.generation,
                round,
            },
            snapshot,
        })
    }

    /// Apply a classifier outcome. Failures count as an incorrect round.
    pub fn resolve(
        &mut self,
        ticket: JudgeTicket,
        outcome: Result<PredictionResult, ClassifierError>,
    ) -> Resolution {
        if ticket.generation != self.generation || self.state.phase != Phase::Judging(ticket.round)
        {
            debug!("discarding stale judgement for round {}", ticket.round + 1);
            return Resolution::Discarded;
        }
        let Some(target) = self.state.queue.get(ticket.round) else {
            return Resolution::Discarded;
        };

        let record = match outcome {
            Ok(prediction) => RoundRecord {
                round: ticket.round,
                target,
                predicted: Some(prediction.category),
                confidence: prediction.confidence,
                verdict: if prediction.category.name == target.name {
                    Verdict::Correct
                } else {
                    Verdict::Incorrect
                },
            },
            Err(e) => {
                warn!("round {} scored as incorrect: {e}", ticket.round + 1);
                RoundRecord {
                    round: ticket.round,
                    target,
                    predicted: None,
                    confidence: None,
                    verdict: Verdict::ClassifierFailed,
                }
            }
        };
        self.state.last_prediction = record.predicted;
        self.complete_round(record.clone());
        Resolution::Applied(record)
    }

    /// `submit`, await the classifier, `resolve`.
    pub async fn judge(
        &mut self,
        snapshot: Snapshot,
        classifier: &dyn ClassifierPort,
    ) -> Result<Resolution, SessionError> {
        let pending = self.submit(snapshot)?;
        let outcome = classifier.classify(&pending.snapshot).await;
        Ok(self.resolve(pending.ticket, outcome))
    }

    /// Close `round` as timed out without asking the classifier.
    pub fn on_timeout(&mut self, round: usize) -> Result<RoundRecord, SessionError> {
        if self.state.phase != Phase::Drawing(round) {
            return Err(self.invalid("on_timeout"));
        }
        let Some(target) = self.state.queue.get(round) else {
            return Err(self.invalid("on_timeout"));
        };
        self.disarm_timer();
        let record = RoundRecord {
            round,
            target,
            predicted: None,
            confidence: None,
            verdict: Verdict::TimedOut,
        };
        self.state.last_prediction = None;
        self.complete_round(record.clone());
        Ok(record)
    }

    /// One countdown second elapsed for `token`.
    pub fn tick(&mut self, token: TimerToken) -> TickOutcome {
        if self.state.active_timer != Some(token) {
            debug!("ignoring tick from stale timer {}", token.id);
            return TickOutcome::Stale;
        }
        let Phase::Drawing(round) = self.state.phase else {
            return TickOutcome::Stale;
        };

        self.state.time_remaining_secs = self.state.time_remaining_secs.saturating_sub(1);
        let remaining = self.state.time_remaining_secs;
        self.presenter
            .present(&SessionEvent::TimeRemaining { secs: remaining });
        if remaining > 0 {
            return TickOutcome::Counting { remaining };
        }
        match self.on_timeout(round) {
            Ok(record) => TickOutcome::TimedOut(record),
            Err(_) => TickOutcome::Stale,
        }
    }

    /// Back to a fresh `Idle` session. Only from `Idle` or `Finished`.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.state.phase.is_active() {
            return Err(self.invalid("reset"));
        }
        self.clear();
        self.presenter.present(&SessionEvent::SessionCleared);
        Ok(())
    }

    /// Drop the session from any phase: stop the clock and orphan any
    /// pending judgement.
    pub fn abandon(&mut self) {
        if self.state.phase.is_active() {
            info!("abandoning session during {}", self.state.phase);
        }
        self.clear();
        self.presenter.present(&SessionEvent::SessionCleared);
    }

    fn complete_round(&mut self, record: RoundRecord) {
        if record.is_correct() {
            self.state.score += 1;
        }
        self.state.history.push(record.clone());
        self.state.current_index += 1;
        self.presenter.present(&SessionEvent::RoundResolved {
            record,
            score: self.state.score,
        });

        if self.state.current_index >= self.state.queue.len() {
            self.finish();
        } else {
            self.state.phase = Phase::Showing(self.state.current_index);
        }
    }

    fn finish(&mut self) {
        self.disarm_timer();
        self.state.phase = Phase::Finished;
        let summary = self.state.summary();
        info!("session finished: {}", summary.headline());
        self.presenter
            .present(&SessionEvent::SessionFinished(summary));
    }

    fn clear(&mut self) {
        self.disarm_timer();
        self.generation += 1;
        self.state = SessionState::default();
    }

    fn disarm_timer(&mut self) {
        if let Some(token) = self.state.active_timer.take() {
            self.countdown.disarm(token);
        }
    }

    fn invalid(&self, command: &'static str) -> SessionError {
        debug!("rejected `{command}` while {}", self.state.phase);
        SessionError::InvalidState {
            command,
            phase: self.state.phase,
        }
    }
}
