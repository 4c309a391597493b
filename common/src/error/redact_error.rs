use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Raised when a secret is handed to a serializer instead of being exposed
/// explicitly.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Redaction Error: {type_name} refuses implicit serialization, call expose() {location}")]
    SerializationRefused {
        type_name: &'static str,
        location: ErrorLocation,
    },
}
