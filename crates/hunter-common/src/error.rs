//! Error types for Monster Hunter.

use thiserror::Error;

/// Top-level error type for Monster Hunter operations.
#[derive(Debug, Error)]
pub enum HunterError {
    /// Content/data errors
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in static game content.
///
/// These are data bugs. They surface while the world is being set up and are
/// never substituted with placeholder data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// No static data for a referenced character
    #[error("No character data for id '{0}'")]
    UnknownCharacter(String),

    /// No frame set registered for a graphic
    #[error("No frames for graphic '{0}'")]
    UnknownGraphic(String),

    /// A frame set is missing an animation state
    #[error("Graphic '{graphic}' has no frames for state '{state}'")]
    MissingAnimationState {
        /// Graphic key
        graphic: String,
        /// Missing state key
        state: String,
    },

    /// A frame list is empty
    #[error("Graphic '{graphic}' has an empty frame list for '{state}'")]
    EmptyFrames {
        /// Graphic key
        graphic: String,
        /// State key
        state: String,
    },

    /// An animation state key could not be parsed
    #[error("Unknown animation state key '{0}'")]
    UnknownAnimationState(String),

    /// A direction key could not be parsed
    #[error("Unknown direction '{0}'")]
    UnknownDirection(String),

    /// A character has no dialog lines for its current variant
    #[error("Character '{0}' has no dialog lines")]
    EmptyDialog(String),

    /// No monster stats for a referenced name
    #[error("No monster data for '{0}'")]
    UnknownMonster(String),

    /// No parsed map with the requested name
    #[error("No map named '{0}'")]
    UnknownMap(String),

    /// The map has no player start with the requested key
    #[error("No player start named '{0}'")]
    MissingPlayerStart(String),
}

/// Result type alias for content lookups.
pub type ContentResult<T> = Result<T, ContentError>;

/// Result type alias for Monster Hunter operations.
pub type HunterResult<T> = Result<T, HunterError>;
