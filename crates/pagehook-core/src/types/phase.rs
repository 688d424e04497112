//! Request lifecycle phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One phase of the request lifecycle.
///
/// Exactly one phase is active at a time within a request. Transitions
/// are strictly sequential in declaration order; the only escape is the
/// terminal redirect issued by the lifecycle controller when the view
/// phase produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// Before the controller logic runs.
    PreController,
    /// Main controller logic: data loading, form handling.
    Controller,
    /// After the controller logic.
    PostController,
    /// Before the view renders, typically page chrome.
    PreView,
    /// The view itself, expected to emit the page body.
    View,
    /// After the view, typically footer/debug chrome.
    PostView,
    /// Terminal state; no further hooks fire.
    Done,
}

impl LifecyclePhase {
    /// The first phase of every request.
    pub const FIRST: Self = Self::PreController;

    /// The next phase in the fixed sequence.
    pub fn next(self) -> Self {
        match self {
            Self::PreController => Self::Controller,
            Self::Controller => Self::PostController,
            Self::PostController => Self::PreView,
            Self::PreView => Self::View,
            Self::View => Self::PostView,
            Self::PostView | Self::Done => Self::Done,
        }
    }

    /// The hook name fired for this phase, `None` for the terminal state.
    pub fn hook_name(self) -> Option<&'static str> {
        match self {
            Self::PreController => Some("before_controller"),
            Self::Controller => Some("controller"),
            Self::PostController => Some("after_controller"),
            Self::PreView => Some("before_view"),
            Self::View => Some("view"),
            Self::PostView => Some("after_view"),
            Self::Done => None,
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hook_name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "done"),
        }
    }
}
