// `setInterval`-backed countdown. At most one interval is live at a time.

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::session::{Countdown, TimerToken};

const TICK_MS: i32 = 1_000;

struct LiveInterval {
    token: TimerToken,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

#[derive(Default)]
pub struct IntervalCountdown {
    live: Option<LiveInterval>,
    // A disarmed callback can still be on the JS stack (a tick that just timed
    // the round out); keep it alive until the next disarm.
    retired: Option<LiveInterval>,
}

impl Countdown for IntervalCountdown {
    fn arm(&mut self, token: TimerToken) {
        if let Some(stale) = self.live.as_ref().map(|l| l.token) {
            self.disarm(stale);
        }
        let Some(win) = window() else {
            warn!("no window; countdown for round {} not started", token.round + 1);
            return;
        };
        let callback = Closure::wrap(Box::new(move || {
            super::on_tick(token);
        }) as Box<dyn FnMut()>);
        match win.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            TICK_MS,
        ) {
            Ok(handle) => {
                self.live = Some(LiveInterval {
                    token,
                    handle,
                    _callback: callback,
                })
            }
            Err(e) => warn!("setInterval failed: {e:?}"),
        }
    }

    fn disarm(&mut self, token: TimerToken) {
        if self.live.as_ref().is_some_and(|l| l.token == token) {
            if let Some(live) = self.live.take() {
                if let Some(win) = window() {
                    win.clear_interval_with_handle(live.handle);
                }
                self.retired = Some(live);
            }
        }
    }
}
