// DOM text overlays plus optional speech narration.

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, SpeechSynthesis, SpeechSynthesisUtterance, Window};

use crate::session::{Presenter, SessionEvent, SessionSummary};

pub const HINT_ID: &str = "dg-hint";
pub const TIMER_ID: &str = "dg-timer";
pub const PREDICTION_ID: &str = "dg-prediction";
pub const SCORE_ID: &str = "dg-score";
pub const RESULTS_ID: &str = "dg-results";

/// Speaks hints and results. Hints are spoken once per round.
pub struct Narrator {
    synth: SpeechSynthesis,
}

impl Narrator {
    pub fn new(win: &Window) -> Option<Self> {
        match win.speech_synthesis() {
            Ok(synth) => Some(Self { synth }),
            Err(e) => {
                warn!("speech synthesis unavailable: {e:?}");
                None
            }
        }
    }

    pub fn say(&self, text: &str) {
        match SpeechSynthesisUtterance::new_with_text(text) {
            Ok(utterance) => self.synth.speak(&utterance),
            Err(e) => warn!("could not build utterance: {e:?}"),
        }
    }

    pub fn hush(&self) {
        self.synth.cancel();
    }
}

pub struct DomPresenter {
    doc: Document,
    narrator: Option<Narrator>,
    total: usize,
}

impl DomPresenter {
    /// Make sure every overlay element exists.
    pub fn new(doc: Document, narrator: Option<Narrator>) -> Result<Self, JsValue> {
        for (id, tag) in [
            (HINT_ID, "div"),
            (TIMER_ID, "div"),
            (PREDICTION_ID, "div"),
            (SCORE_ID, "div"),
            (RESULTS_ID, "ul"),
        ] {
            ensure_element(&doc, id, tag)?;
        }
        Ok(Self {
            doc,
            narrator,
            total: 0,
        })
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn say(&self, text: &str) {
        if let Some(n) = &self.narrator {
            n.say(text);
        }
    }

    fn render_results(&self, summary: &SessionSummary) {
        let Some(list) = self.doc.get_element_by_id(RESULTS_ID) else {
            return;
        };
        list.set_text_content(None);
        for line in summary.lines() {
            match self.doc.create_element("li") {
                Ok(li) => {
                    li.set_text_content(Some(&line));
                    if let Err(e) = list.append_child(&li) {
                        warn!("could not append result row: {e:?}");
                    }
                }
                Err(e) => warn!("could not create result row: {e:?}"),
            }
        }
    }
}

impl Presenter for DomPresenter {
    fn present(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::SessionStarted { rounds } => {
                self.total = *rounds;
                self.set_text(SCORE_ID, &format!("Score: 0 / {rounds}"));
                self.set_text(PREDICTION_ID, "");
                self.set_text(RESULTS_ID, "");
            }
            SessionEvent::HintShown { round, total, hint } => {
                self.set_text(
                    HINT_ID,
                    &format!("Hint {}/{}: {}", round + 1, total, hint),
                );
                self.say(hint);
            }
            SessionEvent::TimeRemaining { secs } => {
                self.set_text(TIMER_ID, &format!("Time left: {secs}s"));
            }
            SessionEvent::Judging { .. } => {
                self.set_text(PREDICTION_ID, "Looking at your drawing…");
            }
            SessionEvent::RoundResolved { record, score } => {
                let message = record.message();
                self.set_text(PREDICTION_ID, &message);
                self.set_text(SCORE_ID, &format!("Score: {score} / {}", self.total));
                self.say(&message);
            }
            SessionEvent::SessionFinished(summary) => {
                let headline = summary.headline();
                self.set_text(HINT_ID, "Game over");
                self.set_text(TIMER_ID, "");
                self.set_text(SCORE_ID, &headline);
                self.render_results(summary);
                self.say(&headline);
            }
            SessionEvent::SessionCleared => {
                if let Some(n) = &self.narrator {
                    n.hush();
                }
                self.total = 0;
                for id in [HINT_ID, TIMER_ID, PREDICTION_ID, SCORE_ID, RESULTS_ID] {
                    self.set_text(id, "");
                }
            }
        }
    }
}

fn ensure_element(doc: &Document, id: &str, tag: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&el)?;
    Ok(el)
}
