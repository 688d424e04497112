//! Hook registry and the well-known lifecycle hook names.

pub mod registry;

/// Hook names fired by the request lifecycle controller, in firing order.
/// Plugins are free to register additional private hook names of their
/// own; these six are the ones the framework itself fires.
pub mod points {
    /// Before the controller logic runs.
    pub const BEFORE_CONTROLLER: &str = "before_controller";
    /// Main controller logic.
    pub const CONTROLLER: &str = "controller";
    /// After the controller logic.
    pub const AFTER_CONTROLLER: &str = "after_controller";
    /// Before the view renders.
    pub const BEFORE_VIEW: &str = "before_view";
    /// The view itself.
    pub const VIEW: &str = "view";
    /// After the view.
    pub const AFTER_VIEW: &str = "after_view";

    /// Filter over the fully rendered body, applied once after
    /// `after_view` and before the response is sent.
    pub const RENDER_OUTPUT: &str = "render_output";
}
