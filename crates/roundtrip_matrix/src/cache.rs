use std::{
    hash::{Hash, Hasher},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use fxhash::FxHasher64;
use serde::{Deserialize, Serialize};

use crate::{travel_matrices::TravelMatrices, travel_matrix_provider::TravelMatrixProvider};

const CACHE_FOLDER_ENV_VAR: &str = "ROUNDTRIP_CACHE_FOLDER";

/// A cache entry, the degraded flag is kept so a warm run reports the same mode as the cold one
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CachedMatrices {
    pub matrices: TravelMatrices,
    pub degraded: bool,
}

pub trait MatricesCache {
    fn cache<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
        entry: &CachedMatrices,
    ) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>;

    fn get_cached<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
    ) -> Result<Option<CachedMatrices>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>;
}

fn hash_points<H, P>(points: &[P], hasher: &mut H)
where
    H: Hasher,
    for<'a> &'a P: Into<geo_types::Point>,
{
    points.len().hash(hasher);
    for point in points {
        let point = point.into();
        hasher.write_u64(point.x().to_bits());
        hasher.write_u64(point.y().to_bits());
    }
}

pub fn cache_key<P>(points: &[P], provider: &TravelMatrixProvider) -> String
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let mut hasher = FxHasher64::default();

    hash_points(points, &mut hasher);
    provider.hash(&mut hasher);

    let hash = hasher.finish();
    format!("{:016x}.json", hash)
}

/// Stores one JSON file per coordinate list in a folder
pub struct FileCache {
    folder: Option<PathBuf>,
}

impl FileCache {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: Some(folder.into()),
        }
    }

    /// Reads the folder from `ROUNDTRIP_CACHE_FOLDER`
    pub fn from_env() -> Self {
        Self {
            folder: std::env::var(CACHE_FOLDER_ENV_VAR).ok().map(PathBuf::from),
        }
    }

    fn cache_folder(&self) -> Result<&Path, anyhow::Error> {
        let cache_folder = self
            .folder
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("{} is not set", CACHE_FOLDER_ENV_VAR))?;

        if !cache_folder.is_dir() {
            return Err(anyhow::anyhow!(
                "Path {} is not a directory",
                cache_folder.display()
            ));
        }

        Ok(cache_folder)
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::from_env()
    }
}

impl MatricesCache for FileCache {
    fn cache<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
        entry: &CachedMatrices,
    ) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let cache_folder = self.cache_folder()?;
        let filename = cache_key(points, provider);

        let file = std::fs::File::create(cache_folder.join(filename))?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, entry)?;
        writer.flush()?;

        Ok(())
    }

    fn get_cached<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
    ) -> Result<Option<CachedMatrices>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let cache_folder = self.cache_folder()?;
        let file_path = cache_folder.join(cache_key(points, provider));

        if !file_path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(file_path)?;
        let entry: CachedMatrices = serde_json::from_reader(BufReader::new(file))?;

        Ok(Some(entry))
    }
}

/// Never stores anything, every fetch goes to the provider
#[derive(Default)]
pub struct NoCache;

impl MatricesCache for NoCache {
    fn cache<P>(
        &self,
        _provider: &TravelMatrixProvider,
        _points: &[P],
        _entry: &CachedMatrices,
    ) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        Ok(())
    }

    fn get_cached<P>(
        &self,
        _provider: &TravelMatrixProvider,
        _points: &[P],
    ) -> Result<Option<CachedMatrices>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        Ok(None)
    }
}
