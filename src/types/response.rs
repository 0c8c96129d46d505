use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ItineraryError, Result};

/// A JSON shape the generation service is asked to produce.
pub trait ResponseShape: DeserializeOwned + Send + 'static {
    /// Human-readable name used in prompts and error messages
    const NAME: &'static str;
}

/// Decode a normalized JSON object into `T`, reporting the failing path.
pub fn decode_shape<T>(payload: &Value) -> Result<T>
where
    T: ResponseShape,
{
    if !payload.is_object() {
        return Err(ItineraryError::Validation(format!(
            "`{}` response must be a JSON object",
            T::NAME
        )));
    }

    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        ItineraryError::Validation(format!(
            "failed to decode `{}` at {}: {}",
            T::NAME,
            location,
            err.into_inner()
        ))
    })
}
