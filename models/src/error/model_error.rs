use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// A model that cannot be sent to the platform as built.
#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Template Error: '{template}': {message} {location}")]
    InvalidTemplate {
        template: String,
        message: String,
        location: ErrorLocation,
    },
}
