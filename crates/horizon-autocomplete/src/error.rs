//! Error types for the autocomplete engine.
//!
//! Interaction operations (typing, navigation, selection) never fail. Errors
//! are only reported for configuration that cannot be honoured.

/// Errors raised while configuring an autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutocompleteError {
    /// The default tab key does not name a configured tab.
    #[error("unknown tab key: {0}")]
    UnknownTabKey(String),

    /// A tab index is outside the configured tabs.
    #[error("tab index {index} out of range (tab count: {count})")]
    TabIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of configured tabs.
        count: usize,
    },

    /// Custom values were allowed but no way to build one was supplied.
    #[error("custom values are allowed but no custom item factory is configured")]
    MissingCustomItemFactory,
}

/// A specialized Result type for autocomplete configuration.
pub type Result<T> = std::result::Result<T, AutocompleteError>;
