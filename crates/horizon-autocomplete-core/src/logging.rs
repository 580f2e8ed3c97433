//! Logging facilities for Horizon Autocomplete.
//!
//! Horizon Autocomplete uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_autocomplete=debug")
//!         .init();
//! }
//! ```
//!
//! Failed async filter requests and hooks are reported at `error` level on
//! [`targets::FILTER`] and [`targets::HOOK`]; that is the only place such
//! failures surface.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "horizon_autocomplete_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_autocomplete_core::signal";
    /// Async runtime target.
    pub const RUNTIME: &str = "horizon_autocomplete_core::async_runtime";
    /// Engine target.
    pub const ENGINE: &str = "horizon_autocomplete::engine";
    /// Controlled/uncontrolled state resolution target.
    pub const STATE: &str = "horizon_autocomplete::state";
    /// Item pipeline target.
    pub const PIPELINE: &str = "horizon_autocomplete::pipeline";
    /// Keyboard navigation target.
    pub const NAVIGATION: &str = "horizon_autocomplete::navigation";
    /// Selection target.
    pub const SELECTION: &str = "horizon_autocomplete::selection";
    /// Async filter controller target.
    pub const FILTER: &str = "horizon_autocomplete::filter";
    /// Async blur/input-change hook target.
    pub const HOOK: &str = "horizon_autocomplete::hook";
}

#[cfg(test)]
mod tests {
    use super::targets;

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::ENGINE,
            targets::STATE,
            targets::PIPELINE,
            targets::NAVIGATION,
            targets::SELECTION,
            targets::FILTER,
            targets::HOOK,
        ] {
            assert!(target.starts_with("horizon_autocomplete::"));
        }
        assert!(targets::SIGNAL.starts_with(targets::CORE));
        assert!(targets::RUNTIME.starts_with(targets::CORE));
    }
}
