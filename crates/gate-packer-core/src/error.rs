use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatePackError {
    /// No candidate point admits the gate without overlap. Terminal for the run.
    #[error("No candidate position for gate '{gate}' ({placed}/{total} gates placed)")]
    PlacementExhausted {
        gate: String,
        placed: usize,
        total: usize,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

pub type Result<T> = std::result::Result<T, GatePackError>;
