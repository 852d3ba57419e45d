use std::sync::Arc;

use crate::data::{DataError, JsonDataStore, ANIMALS_FILE, ZONES_FILE};
use crate::models::{Animal, Zone, ZoneAnimalCount};

/// Zone lookups over `zones.json`, joined against the animal catalog
#[derive(Clone)]
pub struct ZoneDirectory {
    store: Arc<JsonDataStore>,
}

impl ZoneDirectory {
    pub fn new(store: Arc<JsonDataStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Arc<Vec<Zone>>, DataError> {
        tracing::debug!("Loading all zones");
        self.store.load::<Zone>(ZONES_FILE, "zones").await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Zone>, DataError> {
        if id.trim().is_empty() {
            tracing::warn!("Zone id must not be blank");
            return Ok(None);
        }

        let zones = self.get_all().await?;
        let zone = zones.iter().find(|z| z.has_id(id)).cloned();
        if zone.is_none() {
            tracing::warn!("Zone {} not found", id);
        }
        Ok(zone)
    }

    pub async fn animals_in_zone(&self, zone_id: &str) -> Result<Vec<Animal>, DataError> {
        if zone_id.trim().is_empty() {
            tracing::warn!("Zone id must not be blank");
            return Ok(Vec::new());
        }

        let animals = self.store.load::<Animal>(ANIMALS_FILE, "animals").await?;
        let residents: Vec<Animal> = animals
            .iter()
            .filter(|a| a.in_zone(zone_id))
            .cloned()
            .collect();

        tracing::debug!("Zone {} has {} animals", zone_id, residents.len());
        Ok(residents)
    }

    /// Every zone in file order with the number of animals living there
    pub async fn zone_animal_counts(&self) -> Result<Vec<ZoneAnimalCount>, DataError> {
        let zones = self.get_all().await?;
        let animals = self.store.load::<Animal>(ANIMALS_FILE, "animals").await?;

        let counts: Vec<ZoneAnimalCount> = zones
            .iter()
            .map(|zone| ZoneAnimalCount {
                zone: zone.clone(),
                animal_count: animals.iter().filter(|a| a.in_zone(&zone.id)).count(),
            })
            .collect();

        tracing::info!("Counted animals across {} zones", counts.len());
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CacheSettings;
    use std::path::PathBuf;

    fn fixture_directory() -> (Arc<JsonDataStore>, ZoneDirectory) {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        let store = Arc::new(JsonDataStore::new(dir, CacheSettings::default()));
        (store.clone(), ZoneDirectory::new(store))
    }

    #[tokio::test]
    async fn test_get_by_id_ignores_case() {
        let (_, zones) = fixture_directory();
        let zone = zones.get_by_id("Africa-Zone").await.unwrap().unwrap();
        assert_eq!(zone.id, "africa-zone");
        assert!(zones.get_by_id("moon-zone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_zone_ids_skip_the_loader() {
        let (store, zones) = fixture_directory();
        assert!(zones.get_by_id(" ").await.unwrap().is_none());
        assert!(zones.animals_in_zone("").await.unwrap().is_empty());
        assert_eq!(store.stats().requests, 0);
    }

    #[tokio::test]
    async fn test_animals_in_zone() {
        let (_, zones) = fixture_directory();

        let africa = zones.animals_in_zone("AFRICA-ZONE").await.unwrap();
        let ids: Vec<&str> = africa.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["lion-001", "elephant-001"]);

        assert!(zones.animals_in_zone("asia-zone").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zone_animal_counts_keep_file_order() {
        let (_, zones) = fixture_directory();
        let counts = zones.zone_animal_counts().await.unwrap();

        let summary: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.zone.id.as_str(), c.animal_count))
            .collect();
        assert_eq!(
            summary,
            vec![("africa-zone", 2), ("polar-zone", 1), ("asia-zone", 0)]
        );
    }
}
