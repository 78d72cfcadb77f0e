// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use log::debug;

/// Progress and cancellation channel between the plan builder and its caller.
/// Cancellation is only checked between waypoints.
pub trait Feedback {
    fn is_canceled(&self) -> bool {
        false
    }

    fn set_progress(&mut self, _percent: u32) {}
}

/// Never cancels, reports nothing.
pub struct NoFeedback;

impl Feedback for NoFeedback {}

/// Logs progress at debug level whenever the percentage changes.
#[derive(Default)]
pub struct LogFeedback {
    last: Option<u32>,
}

impl LogFeedback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Feedback for LogFeedback {
    fn set_progress(&mut self, percent: u32) {
        if self.last != Some(percent) {
            debug!("Building flight plan — progress={}%", percent);
            self.last = Some(percent);
        }
    }
}
