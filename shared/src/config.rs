//! Provider endpoints and credentials, injected into the clients at construction.

pub const DEFAULT_MAPBOX_BASE_URL: &str = "https://api.mapbox.com";
pub const DEFAULT_NARRATIVE_ENDPOINT: &str = "http://localhost:8080/api/generate-prose";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_ORIGIN_ADDRESS: &str = "55 W. Church St., Orlando, FL 32801";

#[derive(Debug, Clone, PartialEq)]
pub struct MapboxConfig {
    pub base_url: String,
    /// Public map-provider token. `None` disables geocoding and routing.
    pub token: Option<String>,
    /// ISO country filter applied to geocoding lookups.
    pub country: Option<String>,
}

impl MapboxConfig {
    pub fn new(token: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_MAPBOX_BASE_URL.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            country: Some(DEFAULT_COUNTRY.to_string()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country.filter(|c| !c.trim().is_empty());
        self
    }

    /// Reads `MAPBOX_TOKEN`, `MAPBOX_BASE_URL` and `GEOCODE_COUNTRY`.
    pub fn from_env() -> Self {
        let config = Self::new(std::env::var("MAPBOX_TOKEN").ok());
        let config = match std::env::var("MAPBOX_BASE_URL") {
            Ok(url) => config.with_base_url(url),
            Err(_) => config,
        };
        match std::env::var("GEOCODE_COUNTRY") {
            Ok(country) => config.with_country(Some(country)),
            Err(_) => config,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarratorConfig {
    pub mapbox: MapboxConfig,
    pub narrative_endpoint: String,
    pub default_origin: String,
}

impl NarratorConfig {
    pub fn new(mapbox: MapboxConfig) -> Self {
        Self {
            mapbox,
            narrative_endpoint: DEFAULT_NARRATIVE_ENDPOINT.to_string(),
            default_origin: DEFAULT_ORIGIN_ADDRESS.to_string(),
        }
    }

    pub fn with_narrative_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.narrative_endpoint = endpoint.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_treated_as_missing() {
        assert_eq!(MapboxConfig::new(Some("  ".into())).token, None);
        assert_eq!(
            MapboxConfig::new(Some("pk.abc".into())).token.as_deref(),
            Some("pk.abc")
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = MapboxConfig::new(None).with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }
}
