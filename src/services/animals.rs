//! Animal catalog lookups over `animals.json`

use std::sync::Arc;

use crate::data::{DataError, JsonDataStore, ANIMALS_FILE};
use crate::models::Animal;

/// Previous/next entries around an animal in catalog order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbours {
    pub previous: Option<Animal>,
    pub next: Option<Animal>,
}

#[derive(Clone)]
pub struct AnimalCatalog {
    store: Arc<JsonDataStore>,
}

impl AnimalCatalog {
    pub fn new(store: Arc<JsonDataStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Arc<Vec<Animal>>, DataError> {
        tracing::debug!("Loading all animals");
        let animals = self.store.load::<Animal>(ANIMALS_FILE, "animals").await?;
        tracing::debug!("Catalog holds {} animals", animals.len());
        Ok(animals)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Animal>, DataError> {
        if id.trim().is_empty() {
            tracing::warn!("Animal id must not be blank");
            return Ok(None);
        }

        let animals = self.get_all().await?;
        let animal = animals.iter().find(|a| a.has_id(id)).cloned();

        match &animal {
            Some(a) => tracing::debug!("Found animal {} ({})", a.chinese_name, a.id),
            None => tracing::warn!("Animal {} not found", id),
        }
        Ok(animal)
    }

    /// Animals listed in the subject's `relatedAnimalIds`, in catalog order
    pub async fn get_related(&self, id: &str) -> Result<Vec<Animal>, DataError> {
        if id.trim().is_empty() {
            tracing::warn!("Animal id must not be blank");
            return Ok(Vec::new());
        }

        let Some(animal) = self.get_by_id(id).await? else {
            tracing::warn!("Cannot list related animals: {} not found", id);
            return Ok(Vec::new());
        };

        if animal.related_animal_ids.is_empty() {
            tracing::debug!("Animal {} has no related animals", id);
            return Ok(Vec::new());
        }

        let animals = self.get_all().await?;
        let related: Vec<Animal> = animals
            .iter()
            .filter(|a| animal.is_related_to(&a.id))
            .cloned()
            .collect();

        tracing::info!("Animal {} has {} related animals", id, related.len());
        Ok(related)
    }

    /// Most threatened animals first, then by Chinese name
    pub async fn get_featured(&self, count: usize) -> Result<Vec<Animal>, DataError> {
        if count == 0 {
            tracing::warn!("Featured animal count must be positive");
            return Ok(Vec::new());
        }

        let animals = self.get_all().await?;
        let mut featured: Vec<Animal> = animals.iter().cloned().collect();
        featured.sort_by(|a, b| {
            b.conservation_status
                .priority()
                .cmp(&a.conservation_status.priority())
                .then_with(|| a.chinese_name.cmp(&b.chinese_name))
        });
        featured.truncate(count);

        tracing::info!("Selected {} featured animals", featured.len());
        Ok(featured)
    }

    /// Entries before and after `id` in catalog order
    pub async fn neighbours(&self, id: &str) -> Result<Neighbours, DataError> {
        if id.trim().is_empty() {
            return Ok(Neighbours::default());
        }

        let animals = self.get_all().await?;
        let Some(index) = animals.iter().position(|a| a.has_id(id)) else {
            return Ok(Neighbours::default());
        };

        Ok(Neighbours {
            previous: index.checked_sub(1).and_then(|i| animals.get(i)).cloned(),
            next: animals.get(index + 1).cloned(),
        })
    }
}
