use std::fmt;

/// Errors surfaced by input validation and the serialization boundary.
///
/// The play-resolution engine itself recovers from every internal anomaly
/// (dummy substitution, degeneracy short-circuits, forced resolution) and
/// always returns a well-formed outcome; these variants exist for callers
/// that want to reject bad inputs up front.
#[derive(Debug)]
pub enum EngineError {
    MissingPosition(String),
    InvalidAttribute { player: String, detail: String },
    InvalidSituation(String),
    SerializationError(String),
    DeserializationError(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::MissingPosition(pos) => {
                write!(f, "No fielder supplied for position: {}", pos)
            }
            EngineError::InvalidAttribute { player, detail } => {
                write!(f, "Invalid attribute for {}: {}", player, detail)
            }
            EngineError::InvalidSituation(msg) => {
                write!(f, "Invalid game situation: {}", msg)
            }
            EngineError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            EngineError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            EngineError::DeserializationError(err.to_string())
        } else {
            EngineError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
