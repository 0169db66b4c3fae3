use thiserror::Error;

pub const NO_ROUTE_MESSAGE: &str = "No route found between these locations.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a starting point from the suggestions.")]
    MissingOrigin,
    #[error("Please select a destination from the suggestions.")]
    MissingDestination,
    #[error("Please select both a starting point and a destination from the suggestions.")]
    MissingBoth,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Map provider token is not configured.")]
    MissingToken,
    #[error("Could not find \"{0}\". Please select a location from the suggestions.")]
    PlaceNotFound(String),
    #[error("Geocoding failed: {0}")]
    Provider(String),
    #[error("Geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Map provider token is not configured.")]
    MissingToken,
    #[error("Directions request failed: {0}")]
    Provider(String),
    #[error("Directions request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum NarrativeError {
    /// Message returned by the prose backend, surfaced verbatim.
    #[error("{0}")]
    Backend(String),
    #[error("Could not reach the prose service: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Could not copy to the clipboard. Please select the text and copy it manually.")]
pub struct ClipboardError;

/// Everything that can end a "Generate" attempt. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("{}", NO_ROUTE_MESSAGE)]
    NoRoute,
    #[error(transparent)]
    Narrative(#[from] NarrativeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_route_message() {
        assert_eq!(
            GenerateError::NoRoute.to_string(),
            "No route found between these locations."
        );
    }

    #[test]
    fn test_backend_message_is_verbatim() {
        let err = GenerateError::from(NarrativeError::Backend("OpenAI quota exceeded".into()));
        assert_eq!(err.to_string(), "OpenAI quota exceeded");
    }
}
