//! Doodle Guess core crate.
//!
//! The player gets a hint for a hidden object, sketches it on a canvas before
//! the countdown runs out, and a sketch classifier (running in JavaScript)
//! guesses what was drawn. Game rules live in plain Rust (`catalog`,
//! `session`, `classifier`, `config`) and run natively under `cargo test`;
//! the `web` module binds them to the browser.

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
mod logging;
pub mod session;
mod web;

pub use catalog::{CATEGORIES, Catalog, Category, QueueShortfall, RoundQueue};
pub use classifier::{ClassifierPort, PredictionResult, RawPrediction, Snapshot};
pub use config::GameConfig;
pub use error::{ClassifierError, ConfigError, SessionError};
pub use session::{
    Countdown, JudgeTicket, PendingJudgement, Phase, Presenter, Resolution, RoundRecord,
    SessionController, SessionEvent, SessionState, SessionSummary, StartReport, TickOutcome,
    TimerToken, Verdict,
};
pub use web::{clear_drawing, new_game, reset_game, start_game, submit_drawing};
#[cfg(feature = "serde_json")]
pub use web::start_game_with_config;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}
