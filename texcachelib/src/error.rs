use std::path::Path;

/// Errors produced while configuring or constructing a simulation
///
/// Every variant is fatal for the run; nothing in the library retries
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The requested cache, texture format, or texture dimensions can't be simulated
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A reference image or duplicate map is missing, unreadable, or malformed
    #[error("Couldn't read {path}: {message}")]
    Resource { path: String, message: String },

    /// A 12x12 cell of the reference image matches none of the block signatures
    #[error("Couldn't classify the cell at ({cell_x}, {cell_y}): {message}")]
    Classification {
        cell_x: u32,
        cell_y: u32,
        message: String,
    },
}

impl SimError {
    pub(crate) fn resource(path: &Path, message: impl Into<String>) -> Self {
        SimError::Resource {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}
