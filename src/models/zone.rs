use serde::{Deserialize, Serialize};

use super::ids_match;

/// Position on the park map (SVG user units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Coarse "distance from the entrance" used to order custom routes
    pub fn manhattan_rank(&self) -> f64 {
        self.x + self.y
    }
}

/// One themed area of the park, as stored in `zones.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub name_zh: String,
    pub name_en: String,
    pub description: String,
    pub position: Coordinate,
    pub svg_path_id: String,
    pub color: String,
}

impl Zone {
    pub fn has_id(&self, id: &str) -> bool {
        ids_match(&self.id, id.trim())
    }
}

/// A zone together with the number of animals living in it
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneAnimalCount {
    pub zone: Zone,
    pub animal_count: usize,
}
