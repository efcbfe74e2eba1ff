//! Cross-process cache of the last known location.
//!
//! A small JSON file shared by every airq process. The tracker writes it on
//! each fix; the widget reads it so it can fetch without a location session
//! of its own. Writes replace the file atomically, so a concurrent reader
//! sees either the old key set or the new one, never a torn pair.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::{CachedLocation, Coordinates};

/// On-disk key set. The field names are the stable cross-process contract;
/// every airq process reads and writes exactly these keys.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(rename = "lastLatitude", skip_serializing_if = "Option::is_none")]
    last_latitude: Option<f64>,
    #[serde(rename = "lastLongitude", skip_serializing_if = "Option::is_none")]
    last_longitude: Option<f64>,
    #[serde(rename = "lastCityName", skip_serializing_if = "Option::is_none")]
    last_city_name: Option<String>,
}

/// Shared last-known-location store.
#[derive(Debug, Clone)]
pub struct LocationCache {
    path: PathBuf,
}

impl LocationCache {
    /// Cache backed by the given file path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Cache at the shared per-user default path.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .context("Could not determine user data directory")?
            .join("airq");
        Ok(Self::new(dir.join("location.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last cached location, or `None` when the cache is unset.
    ///
    /// Unset means the file is missing or holds no complete coordinate
    /// pair; a stored city name alone is not a location. An unreadable or
    /// corrupt file is an error, not `None`.
    pub fn read(&self) -> Result<Option<CachedLocation>> {
        let Some(file) = self.read_file()? else {
            return Ok(None);
        };

        let (Some(latitude), Some(longitude)) = (file.last_latitude, file.last_longitude) else {
            return Ok(None);
        };

        Ok(Some(CachedLocation {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            city_name: file.last_city_name,
        }))
    }

    /// Record the last known coordinates, and the city name when given.
    ///
    /// Passing no city keeps a previously stored name. The city resolves
    /// asynchronously after a fix and is written on its own, so a reader
    /// may briefly see fresh coordinates with the prior city.
    pub fn write(&self, coords: Coordinates, city_name: Option<&str>) -> Result<()> {
        let mut file = match self.read_file() {
            Ok(Some(f)) => f,
            Ok(None) => CacheFile::default(),
            Err(e) => {
                tracing::warn!("Replacing unreadable location cache: {e:#}");
                CacheFile::default()
            }
        };

        file.last_latitude = Some(coords.latitude);
        file.last_longitude = Some(coords.longitude);
        if let Some(city) = city_name {
            file.last_city_name = Some(city.to_string());
        }

        self.persist(&file)
    }

    fn read_file(&self) -> Result<Option<CacheFile>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read location cache at {}", self.path.display())
                })
            }
        };

        let file = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse location cache at {}", self.path.display())
        })?;

        Ok(Some(file))
    }

    fn persist(&self, file: &CacheFile) -> Result<()> {
        let dir = self
            .path
            .parent()
            .context("Location cache path has no parent directory")?;
        fs::create_dir_all(dir).context("Failed to create cache directory")?;

        let contents =
            serde_json::to_string_pretty(file).context("Failed to serialize location cache")?;

        // Write the new key set beside the cache, then rename over it.
        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).context("Failed to create cache temp file")?;
        tmp.write_all(contents.as_bytes())
            .context("Failed to write cache temp file")?;
        tmp.persist(&self.path)
            .context("Failed to replace location cache")?;

        Ok(())
    }
}
