use tracing::{debug, info, warn};

use crate::{
    as_the_crow_flies::as_the_crow_flies_matrices,
    cache::{CachedMatrices, FileCache, MatricesCache},
    osrm_api::{MatrixError, OsrmMatrixClient, OsrmMatrixClientParams},
    travel_matrices::TravelMatrices,
    travel_matrix_provider::TravelMatrixProvider,
};

pub const DEFAULT_FALLBACK_SPEED_KMH: f64 = 40.0;

/// Matrices returned by the client, `degraded` is set when the routing service failed and
/// great-circle estimates were used instead.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMatrices {
    pub matrices: TravelMatrices,
    pub degraded: bool,
}

pub struct TravelMatrixClientParams {
    pub osrm: OsrmMatrixClientParams,
    pub fallback_speed_kmh: f64,
}

impl Default for TravelMatrixClientParams {
    fn default() -> Self {
        let mut osrm = OsrmMatrixClientParams::default();
        if let Ok(url) = std::env::var("OSRM_URL") {
            osrm.osrm_url = url;
        }

        Self {
            osrm,
            fallback_speed_kmh: DEFAULT_FALLBACK_SPEED_KMH,
        }
    }
}

pub struct TravelMatrixClient<C: MatricesCache> {
    osrm_client: OsrmMatrixClient,
    fallback_speed_kmh: f64,
    cache: C,
}

impl Default for TravelMatrixClient<FileCache> {
    fn default() -> Self {
        Self::new(FileCache::from_env())
    }
}

impl<C: MatricesCache> TravelMatrixClient<C> {
    pub fn new(cache: C) -> Self {
        Self::with_params(cache, TravelMatrixClientParams::default())
    }

    pub fn with_params(cache: C, params: TravelMatrixClientParams) -> Self {
        Self {
            osrm_client: OsrmMatrixClient::new(params.osrm),
            fallback_speed_kmh: params.fallback_speed_kmh,
            cache,
        }
    }

    pub fn fallback_speed_kmh(&self) -> f64 {
        self.fallback_speed_kmh
    }

    pub async fn fetch_matrix<P>(
        &self,
        points: &[P],
        provider: &TravelMatrixProvider,
    ) -> Result<FetchedMatrices, MatrixError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if let TravelMatrixProvider::Custom { matrices } = provider {
            if !matrices.is_well_formed(points.len()) {
                return Err(MatrixError::InvalidCustomMatrices(points.len()));
            }

            return Ok(FetchedMatrices {
                matrices: matrices.clone(),
                degraded: false,
            });
        }

        let provider = &self.resolve_provider(provider);

        match self.cache.get_cached(provider, points) {
            Ok(Some(entry)) if entry.degraded => {
                debug!("TravelMatrixClient: ignoring cached estimates, retrying the routing service");
            }
            Ok(Some(entry)) => {
                debug!("TravelMatrixClient: cache hit for {} locations", points.len());
                return Ok(FetchedMatrices {
                    matrices: entry.matrices,
                    degraded: entry.degraded,
                });
            }
            Ok(None) => {}
            Err(err) => debug!("TravelMatrixClient: cache unavailable: {err}"),
        }

        let fetched = match provider {
            TravelMatrixProvider::Osrm { url, profile } => {
                match self
                    .osrm_client
                    .fetch_matrix(points, url.as_deref(), *profile)
                    .await
                {
                    Ok(matrices) => FetchedMatrices {
                        matrices,
                        degraded: false,
                    },
                    Err(err) => {
                        warn!(
                            "Routing service unavailable ({err}), falling back to great-circle distances at {} km/h",
                            self.fallback_speed_kmh
                        );
                        FetchedMatrices {
                            matrices: as_the_crow_flies_matrices(points, self.fallback_speed_kmh),
                            degraded: true,
                        }
                    }
                }
            }
            TravelMatrixProvider::AsTheCrowFlies { speed_kmh } => FetchedMatrices {
                matrices: as_the_crow_flies_matrices(points, *speed_kmh),
                degraded: false,
            },
            TravelMatrixProvider::Custom { matrices } => FetchedMatrices {
                matrices: matrices.clone(),
                degraded: false,
            },
        };

        // Estimates are not cached, the next run asks the routing service again
        if fetched.degraded {
            return Ok(fetched);
        }

        let entry = CachedMatrices {
            matrices: fetched.matrices,
            degraded: false,
        };

        match self.cache.cache(provider, points, &entry) {
            Ok(()) => info!("TravelMatrixClient: cached matrices for {} locations", points.len()),
            Err(err) => warn!("TravelMatrixClient: failed to cache matrices: {err}"),
        }

        Ok(FetchedMatrices {
            matrices: entry.matrices,
            degraded: false,
        })
    }

    /// Fills in the server a request without an explicit url goes to, so matrices from
    /// different servers never share a cache entry.
    fn resolve_provider(&self, provider: &TravelMatrixProvider) -> TravelMatrixProvider {
        match provider {
            TravelMatrixProvider::Osrm { url: None, profile } => TravelMatrixProvider::Osrm {
                url: Some(self.osrm_client.default_url().to_owned()),
                profile: *profile,
            },
            provider => provider.clone(),
        }
    }
}
