use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{travel_matrices::TravelMatrices, travel_matrix_provider::OsrmProfile};

pub const OSRM_PUBLIC_URL: &str = "http://router.project-osrm.org";
pub const OSRM_TABLE_API_PATH: &str = "/table/v1/";

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by the routing service")]
    RateLimited,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Custom matrices do not match {0} locations")]
    InvalidCustomMatrices(usize),
}

#[derive(Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,

    /// Distances in meters, `null` when no route was found
    distances: Option<Vec<Vec<Option<f64>>>>,

    /// Durations in seconds, `null` when no route was found
    durations: Option<Vec<Vec<Option<f64>>>>,
}

pub struct OsrmMatrixClientParams {
    pub osrm_url: String,
    pub timeout: Duration,
}

impl Default for OsrmMatrixClientParams {
    fn default() -> Self {
        Self {
            osrm_url: OSRM_PUBLIC_URL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct OsrmMatrixClient {
    params: OsrmMatrixClientParams,
    client: reqwest::Client,
}

impl OsrmMatrixClient {
    pub fn new(params: OsrmMatrixClientParams) -> Self {
        let client = reqwest::Client::builder()
            .timeout(params.timeout)
            .build()
            .unwrap_or_default();

        Self { params, client }
    }

    pub fn default_url(&self) -> &str {
        &self.params.osrm_url
    }

    pub async fn fetch_matrix<P>(
        &self,
        points: &[P],
        url: Option<&str>,
        profile: OsrmProfile,
    ) -> Result<TravelMatrices, MatrixError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let request_url = build_table_url(url.unwrap_or(&self.params.osrm_url), points, profile);

        debug!(
            "OsrmApi: requesting table for {} locations from {}",
            points.len(),
            request_url
        );

        let request = self
            .client
            .get(request_url)
            .query(&[("annotations", "distance,duration")])
            .send();

        let response = tokio::time::timeout(self.params.timeout, request)
            .await
            .map_err(|_| MatrixError::Timeout(self.params.timeout))??;

        self.handle_response(response, points.len()).await
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
        num_locations: usize,
    ) -> Result<TravelMatrices, MatrixError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MatrixError::RateLimited);
        }

        // OSRM answers 400 with a JSON body carrying the error code
        let body = response.text().await?;
        let table: OsrmTableResponse = match serde_json::from_str(&body) {
            Ok(table) => table,
            Err(_) if !status.is_success() => {
                return Err(MatrixError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }
            Err(err) => return Err(MatrixError::Malformed(err.to_string())),
        };

        parse_table(table, num_locations)
    }
}

fn build_table_url<P>(base_url: &str, points: &[P], profile: OsrmProfile) -> String
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let mut url = base_url.trim_end_matches('/').to_owned();
    url.push_str(OSRM_TABLE_API_PATH);
    url.push_str(&profile.to_string());
    url.push('/');

    for (i, point) in points.iter().enumerate() {
        let point: geo_types::Point = point.into();
        url.push_str(&format!("{},{}", point.x(), point.y()));

        if i < points.len() - 1 {
            url.push(';');
        }
    }

    url
}

fn flatten_table(
    table: Vec<Vec<Option<f64>>>,
    num_locations: usize,
    name: &str,
) -> Result<Vec<f64>, MatrixError> {
    if table.len() != num_locations || table.iter().any(|row| row.len() != num_locations) {
        return Err(MatrixError::Malformed(format!(
            "{name} table is not {num_locations}x{num_locations}"
        )));
    }

    table
        .into_iter()
        .flatten()
        .map(|value| {
            value
                .filter(|value| value.is_finite() && *value >= 0.0)
                .ok_or_else(|| MatrixError::Malformed(format!("{name} table has missing routes")))
        })
        .collect()
}

fn parse_table(
    table: OsrmTableResponse,
    num_locations: usize,
) -> Result<TravelMatrices, MatrixError> {
    if table.code != "Ok" {
        return Err(MatrixError::Api {
            status: 200,
            message: format!(
                "{}: {}",
                table.code,
                table.message.unwrap_or_else(|| "Unknown error".to_owned())
            ),
        });
    }

    let distances = table
        .distances
        .ok_or_else(|| MatrixError::Malformed("missing distances".to_owned()))?;
    let durations = table
        .durations
        .ok_or_else(|| MatrixError::Malformed("missing durations".to_owned()))?;

    let mut distances = flatten_table(distances, num_locations, "distances")?;
    let mut times = flatten_table(durations, num_locations, "durations")?;

    // Snapped duplicates can report tiny non-zero self distances
    for i in 0..num_locations {
        distances[i * num_locations + i] = 0.0;
        times[i * num_locations + i] = 0.0;
    }

    Ok(TravelMatrices { distances, times })
}
