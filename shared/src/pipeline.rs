//! The "Generate" action: pick the effective destination, fetch the route, narrate it.

use crate::{
    Coordinate, Place,
    config::NarratorConfig,
    directions::DirectionsProvider,
    error::{GenerateError, GeocodeError, ValidationError},
    geocoding::{Geocoder, resolve_place, suggest_places},
    mapbox::MapboxClient,
    narrative::{HttpNarrativeBackend, NarrativeBackend},
};

/// Inputs of a generation attempt. Only constructible with both endpoints resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    origin: Place,
    destination: Place,
    self_parking: Option<String>,
}

impl GenerateRequest {
    pub fn new(
        origin: &Place,
        destination: &Place,
        self_parking: &str,
    ) -> Result<Self, ValidationError> {
        match (origin.is_resolved(), destination.is_resolved()) {
            (true, true) => {}
            (false, false) => return Err(ValidationError::MissingBoth),
            (false, true) => return Err(ValidationError::MissingOrigin),
            (true, false) => return Err(ValidationError::MissingDestination),
        }
        let self_parking = Some(self_parking.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        Ok(Self {
            origin: origin.clone(),
            destination: destination.clone(),
            self_parking,
        })
    }

    pub fn origin(&self) -> &Place {
        &self.origin
    }

    pub fn destination(&self) -> &Place {
        &self.destination
    }

    pub fn self_parking(&self) -> Option<&str> {
        self.self_parking.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutcome {
    pub prose: String,
    pub maneuvers: Vec<String>,
    /// Where the route actually ends: the self-parking place when it resolved.
    pub effective_destination: Place,
}

pub async fn generate<G, D, N>(
    geocoder: &G,
    directions: &D,
    narrator: &N,
    request: &GenerateRequest,
) -> Result<GenerateOutcome, GenerateError>
where
    G: Geocoder + ?Sized,
    D: DirectionsProvider + ?Sized,
    N: NarrativeBackend + ?Sized,
{
    let effective_destination = effective_destination(geocoder, request).await;
    let from = endpoint(&request.origin, ValidationError::MissingOrigin)?;
    let to = endpoint(&effective_destination, ValidationError::MissingDestination)?;

    tracing::info!(
        "generating narrative from {:?} to {:?}",
        request.origin.label,
        effective_destination.label
    );
    let maneuvers = directions.maneuvers(from, to).await?;
    if maneuvers.is_empty() {
        tracing::warn!("directions returned no maneuvers");
        return Err(GenerateError::NoRoute);
    }

    let prose = narrator.narrate(&maneuvers).await?;
    Ok(GenerateOutcome {
        prose,
        maneuvers,
        effective_destination,
    })
}

/// The self-parking place when it resolves, otherwise the chosen destination.
async fn effective_destination<G>(geocoder: &G, request: &GenerateRequest) -> Place
where
    G: Geocoder + ?Sized,
{
    let Some(text) = request.self_parking() else {
        return request.destination.clone();
    };
    match resolve_place(geocoder, text).await {
        Ok(place) => place,
        Err(err) => {
            tracing::warn!("self-parking {text:?} not resolved, using destination: {err}");
            request.destination.clone()
        }
    }
}

fn endpoint(place: &Place, missing: ValidationError) -> Result<Coordinate, ValidationError> {
    place.coordinates.ok_or(missing)
}

/// The production collaborators, wired from configuration.
#[derive(Debug, Clone)]
pub struct RouteNarrator {
    pub mapbox: MapboxClient,
    pub narrative: HttpNarrativeBackend,
}

impl RouteNarrator {
    pub fn new(config: &NarratorConfig) -> Self {
        Self {
            mapbox: MapboxClient::new(config.mapbox.clone()),
            narrative: HttpNarrativeBackend::new(config.narrative_endpoint.clone()),
        }
    }

    pub async fn resolve(&self, text: &str) -> Result<Place, GeocodeError> {
        resolve_place(&self.mapbox, text).await
    }

    pub async fn suggest(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        suggest_places(&self.mapbox, query).await
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateOutcome, GenerateError> {
        generate(&self.mapbox, &self.mapbox, &self.narrative, request).await
    }
}
