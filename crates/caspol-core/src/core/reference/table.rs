use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Values a run is expected to reproduce at one (frequency, distance) point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedValues {
    pub polarizability: f64,
    pub potential: f64,
}

/// A pre-verified point of a geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub frequency: f64,
    pub distance: f64,
    pub expected: ExpectedValues,
}

impl ReferencePoint {
    pub const fn new(frequency: f64, distance: f64, polarizability: f64, potential: f64) -> Self {
        Self {
            frequency,
            distance,
            expected: ExpectedValues {
                polarizability,
                potential,
            },
        }
    }
}

/// Exact-match key. Two keys are equal iff both coordinates parse to the same `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceKey {
    frequency_bits: u64,
    distance_bits: u64,
}

impl ReferenceKey {
    pub fn new(frequency: f64, distance: f64) -> Self {
        // `-0.0 + 0.0 == +0.0`, so both zeros share one key.
        Self {
            frequency_bits: (frequency + 0.0).to_bits(),
            distance_bits: (distance + 0.0).to_bits(),
        }
    }

    pub fn frequency(&self) -> f64 {
        f64::from_bits(self.frequency_bits)
    }

    pub fn distance(&self) -> f64 {
        f64::from_bits(self.distance_bits)
    }
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error(
        "No reference value registered for geometry '{geometry}' at frequency {frequency:e}, distance {distance:e}"
    )]
    Unregistered {
        geometry: String,
        frequency: f64,
        distance: f64,
    },
    #[error(
        "Conflicting reference values for geometry '{geometry}' at frequency {frequency:e}, distance {distance:e}"
    )]
    Conflict {
        geometry: String,
        frequency: f64,
        distance: f64,
    },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Deserialize)]
struct ReferenceRecord {
    geometry: String,
    frequency: f64,
    distance: f64,
    polarizability: f64,
    potential: f64,
}

/// Mapping from (geometry, frequency, distance) to pre-verified values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    geometries: BTreeMap<String, HashMap<ReferenceKey, ExpectedValues>>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a point. Re-registering identical values is a no-op; different values for an
    /// existing key are rejected.
    pub fn insert(&mut self, geometry: &str, point: ReferencePoint) -> Result<(), ReferenceError> {
        let key = ReferenceKey::new(point.frequency, point.distance);
        let entries = self.geometries.entry(geometry.to_string()).or_default();
        match entries.get(&key) {
            Some(existing) if *existing != point.expected => Err(ReferenceError::Conflict {
                geometry: geometry.to_string(),
                frequency: point.frequency,
                distance: point.distance,
            }),
            Some(_) => Ok(()),
            None => {
                entries.insert(key, point.expected);
                Ok(())
            }
        }
    }

    pub fn merge(&mut self, other: &ReferenceTable) -> Result<(), ReferenceError> {
        for (geometry, entries) in &other.geometries {
            for (key, expected) in entries {
                self.insert(
                    geometry,
                    ReferencePoint {
                        frequency: key.frequency(),
                        distance: key.distance(),
                        expected: *expected,
                    },
                )?;
            }
        }
        Ok(())
    }

    pub fn lookup(
        &self,
        geometry: &str,
        frequency: f64,
        distance: f64,
    ) -> Result<ExpectedValues, ReferenceError> {
        self.geometries
            .get(geometry)
            .and_then(|entries| entries.get(&ReferenceKey::new(frequency, distance)))
            .copied()
            .ok_or_else(|| ReferenceError::Unregistered {
                geometry: geometry.to_string(),
                frequency,
                distance,
            })
    }

    pub fn contains_geometry(&self, geometry: &str) -> bool {
        self.geometries.contains_key(geometry)
    }

    pub fn geometries(&self) -> impl Iterator<Item = &str> {
        self.geometries.keys().map(String::as_str)
    }

    /// Registered keys of a geometry, sorted by frequency then distance.
    pub fn keys_for(&self, geometry: &str) -> Vec<ReferenceKey> {
        let mut keys: Vec<_> = self
            .geometries
            .get(geometry)
            .map(|entries| entries.keys().copied().collect())
            .unwrap_or_default();
        keys.sort_by(|a, b| {
            a.frequency()
                .total_cmp(&b.frequency())
                .then(a.distance().total_cmp(&b.distance()))
        });
        keys
    }

    pub fn len(&self) -> usize {
        self.geometries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads points from a CSV file with the header
    /// `geometry,frequency,distance,polarizability,potential`.
    pub fn load_csv(path: &Path) -> Result<Self, ReferenceError> {
        let path_str = path.to_string_lossy().to_string();
        let file = std::fs::File::open(path).map_err(|e| ReferenceError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        Self::from_csv_reader(file, &path_str)
    }

    pub fn from_csv_reader(
        reader: impl std::io::Read,
        source_name: &str,
    ) -> Result<Self, ReferenceError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut table = Self::new();
        for result in reader.deserialize::<ReferenceRecord>() {
            let record = result.map_err(|e| ReferenceError::Csv {
                path: source_name.to_string(),
                source: e,
            })?;
            table.insert(
                &record.geometry,
                ReferencePoint::new(
                    record.frequency,
                    record.distance,
                    record.polarizability,
                    record.potential,
                ),
            )?;
        }
        Ok(table)
    }
}
