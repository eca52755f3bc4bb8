use jiff::{
    SignedDuration,
    civil::{Date, DateTime, Time},
};
use roundtrip_matrix::{
    cache::MatricesCache, travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{Level, instrument};

use crate::{
    problem::{
        location::Location,
        meters::Meters,
        routing_problem::{RoutingProblem, RoutingProblemBuilder},
        shift::{RouteLimits, Shift},
        stop::{Priority, Stop, StopBuilder},
        time_window::TimeWindow,
        travel_cost_matrix::TravelCostMatrix,
    },
    solver::solver_params::SolverParams,
};

const DEFAULT_DEPOT_ID: &str = "depot";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "RoutingProblem")]
pub struct JsonRoutingProblem {
    pub depot: JsonDepot,
    pub stops: Vec<JsonStop>,
    pub shift: JsonShift,

    /// Road distances from OSRM unless told otherwise
    #[serde(default)]
    pub matrix_provider: TravelMatrixProvider,
    pub solver: Option<JsonSolverSettings>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Depot")]
pub struct JsonDepot {
    pub id: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Stop")]
pub struct JsonStop {
    pub id: String,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,

    /// Defaults to the whole shift
    pub time_window: Option<JsonTimeWindow>,

    /// Minutes
    pub service_duration: Option<i64>,
    pub priority: Option<Priority>,
}

/// Clock times on the shift date, for example `"09:30"`.
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, Copy)]
#[serde(deny_unknown_fields, rename = "TimeWindow")]
pub struct JsonTimeWindow {
    pub start: Time,
    pub end: Time,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Shift")]
pub struct JsonShift {
    pub date: Date,
    pub start: Time,
    pub end: Time,
    pub max_distance_km: f64,
    pub max_time_minutes: i64,
    pub max_waiting_minutes: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Default)]
#[serde(deny_unknown_fields, rename = "SolverSettings")]
pub struct JsonSolverSettings {
    pub time_limit_seconds: Option<f64>,
    pub lambda_coefficient: Option<f64>,
}

impl JsonShift {
    fn datetime(&self, time: Time) -> DateTime {
        self.date.to_datetime(time)
    }

    pub fn to_shift(&self) -> Result<Shift, anyhow::Error> {
        Ok(Shift::new(
            self.datetime(self.start),
            self.datetime(self.end),
        )?)
    }

    pub fn to_limits(&self) -> RouteLimits {
        RouteLimits {
            max_distance: Meters::from_km(self.max_distance_km),
            max_time: SignedDuration::from_mins(self.max_time_minutes),
            max_waiting_duration: self.max_waiting_minutes.map(SignedDuration::from_mins),
        }
    }

    /// Clock times are turned into offsets from the shift start. A window opening before the
    /// shift opens with it.
    fn to_time_window(&self, shift: &Shift, window: JsonTimeWindow) -> TimeWindow {
        let offset = |time| {
            shift
                .start()
                .duration_until(self.datetime(time))
                .max(SignedDuration::ZERO)
        };

        TimeWindow::new(offset(window.start), offset(window.end))
    }
}

impl JsonRoutingProblem {
    pub fn solver_params(&self) -> Result<SolverParams, anyhow::Error> {
        let mut params = SolverParams::default();
        let settings = self.solver.as_ref();

        if let Some(seconds) = settings.and_then(|settings| settings.time_limit_seconds) {
            params.deadline = SignedDuration::try_from_secs_f64(seconds)?;
        }

        if let Some(lambda_coefficient) = settings.and_then(|settings| settings.lambda_coefficient)
        {
            anyhow::ensure!(
                lambda_coefficient.is_finite() && lambda_coefficient >= 0.0,
                "lambda_coefficient must be a non-negative number"
            );
            params.lambda_coefficient = lambda_coefficient;
        }

        Ok(params)
    }

    /// Depot first, then every stop in input order.
    pub fn locations(&self) -> Vec<Location> {
        std::iter::once(Location::from_lat_lon(self.depot.lat, self.depot.lon))
            .chain(
                self.stops
                    .iter()
                    .map(|stop| Location::from_lat_lon(stop.lat, stop.lon)),
            )
            .collect()
    }

    fn build_stops(&self, shift: &Shift) -> Result<Vec<Stop>, anyhow::Error> {
        self.stops
            .iter()
            .map(|stop| {
                let mut builder = StopBuilder::default();

                builder
                    .set_external_id(stop.id.clone())
                    .set_location(Location::from_lat_lon(stop.lat, stop.lon))
                    .set_time_window(match stop.time_window {
                        Some(window) => self.shift.to_time_window(shift, window),
                        None => TimeWindow::new(SignedDuration::ZERO, shift.length()),
                    });

                if let Some(name) = &stop.name {
                    builder.set_name(name.clone());
                }

                if let Some(minutes) = stop.service_duration {
                    builder.set_service_duration(SignedDuration::from_mins(minutes));
                }

                if let Some(priority) = stop.priority {
                    builder.set_priority(priority);
                }

                Ok(builder.build()?)
            })
            .collect()
    }

    /// Validates the input, then fetches the travel matrix for the depot and the stops.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub async fn build_problem(
        &self,
        client: &TravelMatrixClient<impl MatricesCache>,
    ) -> Result<RoutingProblem, anyhow::Error> {
        let shift = self.shift.to_shift()?;
        let stops = self.build_stops(&shift)?;
        let locations = self.locations();

        let mut builder = RoutingProblemBuilder::default();
        builder
            .set_depot(
                self.depot.id.as_deref().unwrap_or(DEFAULT_DEPOT_ID),
                locations[0],
            )
            .set_stops(stops)
            .set_shift(shift)
            .set_limits(self.shift.to_limits());

        // Fail on bad input before any network call
        builder.validate()?;

        let fetched = client
            .fetch_matrix(&locations, &self.matrix_provider)
            .await?;

        builder
            .set_matrix(TravelCostMatrix::from_travel_matrices(&fetched.matrices))
            .set_matrix_degraded(fetched.degraded);

        Ok(builder.build()?)
    }
}
