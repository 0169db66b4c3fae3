//! Turns free text into a [`Place`], by coordinate parsing first and forward geocoding otherwise.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    Coordinate, Place,
    coords::parse_coordinates,
    error::GeocodeError,
    format_coord,
    mapbox::{MapboxClient, provider_failure},
};

pub const SUGGESTION_LIMIT: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    pub limit: u8,
    pub autocomplete: bool,
}

impl LookupOptions {
    /// Single best match for a finished address.
    pub const BEST_MATCH: Self = Self {
        limit: 1,
        autocomplete: false,
    };

    /// Ranked candidates for typeahead while the user is still typing.
    pub const SUGGESTIONS: Self = Self {
        limit: SUGGESTION_LIMIT,
        autocomplete: true,
    };
}

/// One ranked result of a forward lookup, before a label has been chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeCandidate {
    pub full_address: Option<String>,
    pub name: Option<String>,
    pub place_formatted: Option<String>,
    pub coordinates: Option<Coordinate>,
}

impl GeocodeCandidate {
    /// Full address, else `name, place`, else whichever of the two exists.
    pub fn label(&self) -> Option<String> {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        if let Some(full) = non_empty(&self.full_address) {
            return Some(full);
        }
        match (non_empty(&self.name), non_empty(&self.place_formatted)) {
            (Some(name), Some(place)) => Some(format!("{name}, {place}")),
            (Some(single), None) | (None, Some(single)) => Some(single),
            (None, None) => None,
        }
    }
}

#[async_trait(?Send)]
pub trait Geocoder {
    async fn forward(
        &self,
        query: &str,
        options: LookupOptions,
    ) -> Result<Vec<GeocodeCandidate>, GeocodeError>;
}

/// Resolves pasted coordinates locally, or geocodes the text to its best match.
pub async fn resolve_place<G>(geocoder: &G, text: &str) -> Result<Place, GeocodeError>
where
    G: Geocoder + ?Sized,
{
    let input = text.trim();
    if input.is_empty() {
        return Err(GeocodeError::PlaceNotFound(String::new()));
    }

    if let Some(coord) = parse_coordinates(input) {
        tracing::debug!("parsed coordinates from input: {coord:?}");
        let label = format!("{}, {}", format_coord(coord.lat), format_coord(coord.lon));
        return Ok(Place::resolved(label, coord));
    }

    let candidates = geocoder.forward(input, LookupOptions::BEST_MATCH).await?;
    let Some(best) = candidates.into_iter().next() else {
        return Err(GeocodeError::PlaceNotFound(input.to_string()));
    };
    let Some(coordinates) = best.coordinates else {
        return Err(GeocodeError::PlaceNotFound(input.to_string()));
    };

    let label = best.label().unwrap_or_else(|| input.to_string());
    Ok(Place::resolved(label, coordinates))
}

/// Typeahead candidates. Blank queries return nothing without a lookup.
pub async fn suggest_places<G>(geocoder: &G, query: &str) -> Result<Vec<Place>, GeocodeError>
where
    G: Geocoder + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let candidates = geocoder.forward(query, LookupOptions::SUGGESTIONS).await?;
    Ok(candidates
        .into_iter()
        .filter_map(|candidate| {
            let coordinates = candidate.coordinates?;
            Some(Place::resolved(candidate.label()?, coordinates))
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Option<[f64; 2]>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    full_address: Option<String>,
    name: Option<String>,
    place_formatted: Option<String>,
}

impl From<Feature> for GeocodeCandidate {
    fn from(feature: Feature) -> Self {
        Self {
            full_address: feature.properties.full_address,
            name: feature.properties.name,
            place_formatted: feature.properties.place_formatted,
            coordinates: feature
                .geometry
                .and_then(|g| g.coordinates)
                .map(Coordinate::from_lon_lat),
        }
    }
}

#[async_trait(?Send)]
impl Geocoder for MapboxClient {
    async fn forward(
        &self,
        query: &str,
        options: LookupOptions,
    ) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let token = self.token().ok_or(GeocodeError::MissingToken)?;
        tracing::debug!(
            "geocoding {query:?} (limit={}, autocomplete={})",
            options.limit,
            options.autocomplete
        );

        let limit = options.limit.to_string();
        let mut request = self
            .http()
            .get(self.url("/search/geocode/v6/forward"))
            .query(&[
                ("q", query),
                ("access_token", token),
                ("limit", limit.as_str()),
                ("autocomplete", if options.autocomplete { "true" } else { "false" }),
            ]);
        if let Some(country) = self.config().country.as_deref() {
            request = request.query(&[("country", country)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(GeocodeError::Provider(provider_failure(response).await));
        }

        let collection: FeatureCollection = response.json().await?;
        tracing::debug!("geocoder returned {} feature(s)", collection.features.len());
        Ok(collection.features.into_iter().map(Into::into).collect())
    }
}
