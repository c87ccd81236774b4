//! City context records

use serde::{Deserialize, Serialize};

/// Context for one city, as rendered into the generation prompt.
///
/// Lists are always present; an entity without tags or connections carries
/// empty vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub description: String,
    pub region: String,
    pub best_time: String,
    pub tags: Vec<String>,
    pub connected_cities: Vec<String>,
}

/// A graph row before normalization; every column may be null
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCityRow {
    pub name: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub best_time: Option<String>,
    pub tags: Option<Vec<Option<String>>>,
    pub connected_cities: Option<Vec<Option<String>>>,
}

impl RawCityRow {
    /// Normalize nulls into empty values. Rows without a name are dropped.
    pub fn normalize(self) -> Option<CityRecord> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;

        Some(CityRecord {
            name,
            description: self.description.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
            best_time: self.best_time.unwrap_or_default(),
            tags: flatten_names(self.tags),
            connected_cities: flatten_names(self.connected_cities),
        })
    }
}

fn flatten_names(values: Option<Vec<Option<String>>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter(|v| !v.is_empty())
        .collect()
}
