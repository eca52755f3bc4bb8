use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::travel_matrices::TravelMatrices;

#[derive(Deserialize, Serialize, JsonSchema, Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OsrmProfile {
    #[default]
    Driving,
    Cycling,
    Walking,
}

impl Display for OsrmProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OsrmProfile::Driving => "driving",
                OsrmProfile::Cycling => "cycling",
                OsrmProfile::Walking => "walking",
            }
        )
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Clone, Debug)]
pub enum TravelMatrixProvider {
    /// http://project-osrm.org/docs/v5.24.0/api/#table-service
    Osrm {
        /// Overrides the client's default server
        url: Option<String>,
        #[serde(default)]
        profile: OsrmProfile,
    },

    AsTheCrowFlies {
        speed_kmh: f64,
    },

    Custom {
        matrices: TravelMatrices,
    },
}

impl Default for TravelMatrixProvider {
    fn default() -> Self {
        TravelMatrixProvider::Osrm {
            url: None,
            profile: OsrmProfile::default(),
        }
    }
}

impl std::hash::Hash for TravelMatrixProvider {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            TravelMatrixProvider::Osrm { url, profile } => {
                state.write_u8(0);
                url.hash(state);
                profile.hash(state);
            }
            TravelMatrixProvider::AsTheCrowFlies { speed_kmh } => {
                state.write_u8(1);
                state.write_u64(speed_kmh.to_bits());
            }
            TravelMatrixProvider::Custom { matrices } => {
                state.write_u8(2);
                matrices.hash(state);
            }
        }
    }
}
