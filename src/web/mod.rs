//! Browser front end: wires the session controller to the canvas, the DOM,
//! `setInterval` and the JavaScript model runtime.
//!
//! All game state lives in one `thread_local!` cell. Callbacks (interval
//! ticks, classifier promises) re-enter through `with_game`, and never await
//! while the cell is borrowed.

mod canvas;
mod classifier;
mod countdown;
mod presenter;

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::window;

use crate::catalog::Catalog;
use crate::classifier::{ClassifierPort, Snapshot};
use crate::config::GameConfig;
use crate::session::{
    PendingJudgement, Phase, Resolution, SessionController, TickOutcome, TimerToken,
};

use canvas::DrawingSurface;
use classifier::JsClassifier;
use countdown::IntervalCountdown;
use presenter::{DomPresenter, Narrator};

type WebController = SessionController<DomPresenter, IntervalCountdown>;

struct WebGame {
    controller: WebController,
    surface: DrawingSurface,
    classifier: Rc<JsClassifier>,
    // Bumped by reset/new game so a model load that finishes late does not
    // start a session nobody asked for.
    epoch: u64,
    loading: bool,
}

impl WebGame {
    fn build(config: GameConfig) -> Result<Self, JsValue> {
        let doc = document()?;
        let surface = DrawingSurface::attach(&doc)?;
        let catalog = Catalog::builtin();
        Ok(Self {
            controller: build_controller(config, catalog)?,
            surface,
            classifier: Rc::new(JsClassifier::new(catalog)),
            epoch: 0,
            loading: false,
        })
    }

    /// Move straight into the next round after a resolution.
    fn advance(&mut self) {
        if let Phase::Showing(round) = self.controller.phase() {
            self.surface.clear();
            if let Err(e) = self.controller.begin_round(round) {
                warn!("{e}");
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.loading || self.controller.phase().is_active()
    }
}

fn document() -> Result<web_sys::Document, JsValue> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn build_controller(config: GameConfig, catalog: Catalog) -> Result<WebController, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let narrator = if config.narrate {
        Narrator::new(&win)
    } else {
        None
    };
    let presenter = DomPresenter::new(document()?, narrator)?;
    Ok(SessionController::new(
        config,
        catalog,
        presenter,
        IntervalCountdown::default(),
    ))
}

enum Submitted {
    Pending(PendingJudgement, Rc<JsClassifier>),
    Resolved,
    Rejected,
}

thread_local! {
    static GAME: RefCell<Option<WebGame>> = const { RefCell::new(None) };
}

fn with_game<R>(f: impl FnOnce(&mut WebGame) -> R) -> Option<R> {
    GAME.with(|cell| match cell.try_borrow_mut() {
        Ok(mut game) => game.as_mut().map(f),
        Err(_) => {
            warn!("game state busy; event dropped");
            None
        }
    })
}

pub(crate) fn on_tick(token: TimerToken) {
    with_game(|game| {
        if let TickOutcome::TimedOut(_) = game.controller.tick(token) {
            game.advance();
        }
    });
}

/// Start a session with the default constants (4 rounds, 30 s each).
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    launch(GameConfig::default())
}

/// Start a session with constants read from a JSON object, e.g.
/// `{"round_count": 6, "countdown_secs": 20, "narrate": false}`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    launch(config)
}

fn launch(config: GameConfig) -> Result<(), JsValue> {
    let exists = GAME.with(|cell| cell.borrow().is_some());
    if !exists {
        let game = WebGame::build(config.clone())?;
        GAME.with(|cell| cell.replace(Some(game)));
    }

    let launched = with_game(|g| -> Result<Option<(Rc<JsClassifier>, u64)>, JsValue> {
        if g.is_busy() {
            warn!("start ignored: a session is already running");
            return Ok(None);
        }
        if g.controller.config() != &config {
            g.controller = build_controller(config, *g.controller.catalog())?;
        }
        g.loading = true;
        Ok(Some((g.classifier.clone(), g.epoch)))
    })
    .transpose()?
    .flatten();
    let Some((classifier, epoch)) = launched else {
        return Ok(());
    };

    spawn_local(async move {
        if let Err(e) = classifier.ready().await {
            warn!("starting without a model ({e}); drawings will score as incorrect");
        }
        with_game(|g| {
            if g.epoch != epoch {
                info!("model finished loading after the game was reset");
                return;
            }
            g.loading = false;
            match g.controller.start() {
                Ok(_) => g.advance(),
                Err(e) => warn!("{e}"),
            }
        });
    });
    Ok(())
}

/// Judge the current drawing. Returns false when no round is being drawn.
#[wasm_bindgen]
pub fn submit_drawing() -> bool {
    let submitted = with_game(|g| {
        let (snapshot, capture_error) = match g.surface.snapshot() {
            Ok(s) => (s, None),
            Err(e) => (Snapshot::blank(g.surface.width(), g.surface.height()), Some(e)),
        };
        let pending = match g.controller.submit(snapshot) {
            Ok(p) => p,
            Err(e) => {
                warn!("{e}");
                return Submitted::Rejected;
            }
        };
        if let Some(e) = capture_error {
            g.controller.resolve(pending.ticket, Err(e));
            g.advance();
            return Submitted::Resolved;
        }
        Submitted::Pending(pending, g.classifier.clone())
    })
    .unwrap_or(Submitted::Rejected);

    match submitted {
        Submitted::Pending(pending, classifier) => {
            spawn_local(async move {
                let outcome = classifier.classify(&pending.snapshot).await;
                with_game(|g| {
                    if let Resolution::Applied(_) = g.controller.resolve(pending.ticket, outcome) {
                        g.advance();
                    }
                });
            });
            true
        }
        Submitted::Resolved => true,
        Submitted::Rejected => false,
    }
}

#[wasm_bindgen]
pub fn clear_drawing() {
    with_game(|g| g.surface.clear());
}

/// Clear a finished game. Returns false (and changes nothing) mid-session.
#[wasm_bindgen]
pub fn reset_game() -> bool {
    with_game(|g| match g.controller.reset() {
        Ok(()) => {
            g.epoch += 1;
            g.loading = false;
            g.surface.clear();
            true
        }
        Err(e) => {
            warn!("{e}");
            false
        }
    })
    .unwrap_or(false)
}

/// Abandon whatever is running and start over with the same settings.
#[wasm_bindgen]
pub fn new_game() -> Result<(), JsValue> {
    let config = with_game(|g| {
        g.controller.abandon();
        g.epoch += 1;
        g.loading = false;
        g.surface.clear();
        g.controller.config().clone()
    })
    .unwrap_or_default();
    launch(config)
}
