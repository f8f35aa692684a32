// Local JSON file persistence: location costs, history snapshots and settings

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::HistoryStore;
use crate::error::StorageError;
use crate::models::{AppSettings, CostComponents, CostRecord, HistorySnapshot};
use crate::utils::validation::validate_record;

pub const LOCATIONS_FILE: &str = "locations_data.json";
pub const HISTORY_FILE: &str = "history_snapshots.json";
pub const SETTINGS_FILE: &str = "app_settings.json";

/// Locations every new installation starts with, all costs zero
pub const DEFAULT_LOCATIONS: [(&str, &str); 13] = [
    ("DIRECT MILLSITE", "NORTH"),
    ("CROSSING VITO", "NORTH"),
    ("BATO", "NORTH"),
    ("ESCALANTE", "NORTH"),
    ("SAN JOSE", "NORTH"),
    ("BAGAWINES", "NORTH"),
    ("CANIBUNGAN", "SOUTH"),
    ("MANAPLA", "SOUTH"),
    ("SAN ISIDRO", "SOUTH"),
    ("SARAVIA", "SOUTH"),
    ("MURCIA", "SOUTH"),
    ("MA-AO", "SOUTH"),
    ("LA CASTELLANA", "SOUTH"),
];

/// One entry of the locations file, keyed by location name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationCosts {
    pub region: String,
    #[serde(flatten)]
    pub costs: CostComponents,
    pub lkgtc: f64,
}

impl LocationCosts {
    pub fn to_record(&self, location: &str) -> CostRecord {
        CostRecord::new(location, self.region.clone(), self.costs, self.lkgtc)
    }
}

impl From<&CostRecord> for LocationCosts {
    fn from(record: &CostRecord) -> Self {
        Self {
            region: record.region.clone(),
            costs: record.costs,
            lkgtc: record.lkg,
        }
    }
}

pub fn default_locations() -> BTreeMap<String, LocationCosts> {
    DEFAULT_LOCATIONS
        .iter()
        .map(|(name, region)| {
            (
                name.to_string(),
                LocationCosts {
                    region: region.to_string(),
                    ..LocationCosts::default()
                },
            )
        })
        .collect()
}

/// JSON files under a single data directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    /// Opens (and creates if needed) the data directory
    pub fn open<P: Into<PathBuf>>(data_dir: P) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Location costs; defaults when the file is missing or unreadable
    pub fn load_locations(&self) -> BTreeMap<String, LocationCosts> {
        match read_json::<BTreeMap<String, LocationCosts>>(&self.path(LOCATIONS_FILE)) {
            Ok(Some(locations)) => locations,
            Ok(None) => default_locations(),
            Err(e) => {
                warn!(error = %e, "locations file unreadable, using defaults");
                default_locations()
            }
        }
    }

    pub fn save_locations(&self, locations: &BTreeMap<String, LocationCosts>) -> Result<(), StorageError> {
        write_json_atomic(&self.path(LOCATIONS_FILE), locations)
    }

    /// Current cost records, one per location in name order
    pub fn fetch_current_costs(&self) -> Vec<CostRecord> {
        self.load_locations()
            .iter()
            .map(|(name, costs)| costs.to_record(name))
            .collect()
    }

    /// Validates one location's costs, then replaces them and saves the file
    pub fn update_location(&self, record: &CostRecord) -> Result<(), StorageError> {
        validate_record(record)?;
        let mut locations = self.load_locations();
        locations.insert(record.location.clone(), LocationCosts::from(record));
        self.save_locations(&locations)?;
        info!(location = %record.location, "cost data saved");
        Ok(())
    }

    /// Saved snapshots in file order, empty when none were saved
    pub fn load_history(&self) -> Result<Vec<HistorySnapshot>, StorageError> {
        Ok(read_json(&self.path(HISTORY_FILE))?.unwrap_or_default())
    }

    pub fn save_history(&self, snapshots: &[HistorySnapshot]) -> Result<(), StorageError> {
        write_json_atomic(&self.path(HISTORY_FILE), &snapshots)
    }

    /// Saved settings, None when never saved or unreadable
    pub fn load_settings(&self) -> Option<AppSettings> {
        match read_json(&self.path(SETTINGS_FILE)) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "settings file unreadable, ignoring");
                None
            }
        }
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        write_json_atomic(&self.path(SETTINGS_FILE), settings)
    }
}

impl HistoryStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    fn insert(&self, snapshot: &HistorySnapshot) -> Result<(), StorageError> {
        let mut snapshots = self.load_history()?;
        snapshots.push(snapshot.clone());
        self.save_history(&snapshots)
    }

    /// Newest first
    fn all(&self) -> Result<Vec<HistorySnapshot>, StorageError> {
        let mut snapshots = self.load_history()?;
        snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(snapshots)
    }

    fn delete_all(&self) -> Result<(), StorageError> {
        self.save_history(&[])
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Write-then-rename so a crash never leaves a half-written file
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
