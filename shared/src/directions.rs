//! Driving directions reduced to the ordered list of maneuver instructions.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    Coordinate,
    error::RouteError,
    mapbox::{MapboxClient, provider_failure},
};

#[async_trait(?Send)]
pub trait DirectionsProvider {
    /// Maneuver instructions in traversal order. An empty list means no route was found.
    async fn maneuvers(&self, from: Coordinate, to: Coordinate) -> Result<Vec<String>, RouteError>;
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub maneuver: Option<Maneuver>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Maneuver {
    #[serde(default)]
    pub instruction: Option<String>,
}

impl DirectionsResponse {
    /// Walks the first route's legs and steps in order. Steps without an
    /// instruction are skipped.
    pub fn into_maneuvers(self) -> Vec<String> {
        self.routes
            .into_iter()
            .next()
            .map(|route| {
                route
                    .legs
                    .into_iter()
                    .flat_map(|leg| leg.steps)
                    .filter_map(|step| step.maneuver?.instruction)
                    .filter(|instruction| !instruction.trim().is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn waypoints(from: Coordinate, to: Coordinate) -> String {
    [from, to]
        .iter()
        .map(|c| format!("{},{}", c.lon, c.lat))
        .collect::<Vec<_>>()
        .join(";")
}

#[async_trait(?Send)]
impl DirectionsProvider for MapboxClient {
    async fn maneuvers(&self, from: Coordinate, to: Coordinate) -> Result<Vec<String>, RouteError> {
        let token = self.token().ok_or(RouteError::MissingToken)?;
        let path = format!("/directions/v5/mapbox/driving/{}", waypoints(from, to));
        tracing::debug!("requesting directions {from:?} -> {to:?}");

        let response = self
            .http()
            .get(self.url(&path))
            .query(&[("steps", "true"), ("access_token", token)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RouteError::Provider(provider_failure(response).await));
        }

        let body: DirectionsResponse = response.json().await?;
        match body.code.as_deref() {
            None | Some("Ok") => {}
            Some("NoRoute") => return Ok(Vec::new()),
            Some(code) => {
                return Err(RouteError::Provider(
                    body.message.unwrap_or_else(|| code.to_string()),
                ));
            }
        }

        let maneuvers = body.into_maneuvers();
        tracing::debug!("directions returned {} maneuver(s)", maneuvers.len());
        Ok(maneuvers)
    }
}
