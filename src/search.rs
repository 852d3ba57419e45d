//! Keyword scoring and categorical filtering over the animal catalog
//!
//! Scoring is a fixed-weight substring match: each field contributes once,
//! contributions are summed and capped at [`MAX_SCORE`]. Categorical filters
//! are hard excludes applied before any scoring.

use serde::Serialize;

use crate::data::DataError;
use crate::models::{ActivityPattern, Animal, BiologicalClass, Diet, Habitat};
use crate::services::AnimalCatalog;

pub const MAX_SCORE: u32 = 100;
/// Score given to every animal when no keyword is supplied
pub const BASELINE_SCORE: u32 = 50;

const CHINESE_NAME_EXACT: u32 = 100;
const CHINESE_NAME_PARTIAL: u32 = 80;
const ENGLISH_NAME_EXACT: u32 = 90;
const ENGLISH_NAME_PARTIAL: u32 = 70;
const SCIENTIFIC_NAME_PARTIAL: u32 = 60;
const DESCRIPTION_PARTIAL: u32 = 30;
const FUN_FACTS_PARTIAL: u32 = 20;
const APPEARANCE_PARTIAL: u32 = 25;
const BEHAVIOR_PARTIAL: u32 = 25;

// ============================================================================
// Request / result types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub keyword: Option<String>,
    pub biological_class: Option<BiologicalClass>,
    pub habitat: Option<Habitat>,
    pub diet: Option<Diet>,
    pub activity_pattern: Option<ActivityPattern>,
    pub zone_id: Option<String>,
}

impl SearchFilter {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    /// Trimmed, lower-cased keyword; `None` when blank
    fn normalized_keyword(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase)
    }

    /// True when the animal survives every categorical filter
    pub fn admits(&self, animal: &Animal) -> bool {
        let c = &animal.classification;
        self.biological_class.map_or(true, |v| c.biological_class == v)
            && self.habitat.map_or(true, |v| c.habitat == v)
            && self.diet.map_or(true, |v| c.diet == v)
            && self.activity_pattern.map_or(true, |v| c.activity_pattern == v)
            && self
                .zone_id
                .as_deref()
                .map(str::trim)
                .filter(|z| !z.is_empty())
                .map_or(true, |z| animal.in_zone(z))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub animal: Animal,
    pub score: u32,
    pub matched_fields: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuggestion {
    pub id: String,
    /// Chinese name
    #[serde(rename = "name")]
    pub chinese_name: String,
    pub english_name: String,
    pub thumbnail_url: String,
}

impl From<&Animal> for SearchSuggestion {
    fn from(animal: &Animal) -> Self {
        Self {
            id: animal.id.clone(),
            chinese_name: animal.chinese_name.clone(),
            english_name: animal.english_name.clone(),
            thumbnail_url: animal.media.thumbnail_path.clone(),
        }
    }
}

// ============================================================================
// Scoring
// ============================================================================

/// Score one animal against a lower-cased keyword
pub fn score_animal(animal: &Animal, keyword: &str) -> (u32, Vec<&'static str>) {
    let mut score = 0;
    let mut matched = Vec::new();

    let mut name_match = |field: &'static str, value: &str, exact: u32, partial: u32| {
        let value = value.to_lowercase();
        if value == keyword {
            score += exact;
            matched.push(field);
        } else if value.contains(keyword) {
            score += partial;
            matched.push(field);
        }
    };
    name_match("ChineseName", &animal.chinese_name, CHINESE_NAME_EXACT, CHINESE_NAME_PARTIAL);
    name_match("EnglishName", &animal.english_name, ENGLISH_NAME_EXACT, ENGLISH_NAME_PARTIAL);

    let contains = |value: &str| value.to_lowercase().contains(keyword);
    let desc = &animal.description;
    let partial_fields = [
        ("ScientificName", contains(&animal.scientific_name), SCIENTIFIC_NAME_PARTIAL),
        (
            "Description",
            contains(&desc.full_description_zh) || contains(&desc.full_description_en),
            DESCRIPTION_PARTIAL,
        ),
        ("FunFacts", animal.fun_facts.iter().any(|f| contains(f)), FUN_FACTS_PARTIAL),
        ("Appearance", contains(&desc.appearance), APPEARANCE_PARTIAL),
        ("Behavior", contains(&desc.behavior), BEHAVIOR_PARTIAL),
    ];
    for (field, hit, weight) in partial_fields {
        if hit {
            score += weight;
            matched.push(field);
        }
    }

    (score.min(MAX_SCORE), matched)
}

/// Rank animals for a filter: hard filters first, then keyword scoring.
/// Ties are broken by Chinese name.
pub fn rank(animals: &[Animal], filter: &SearchFilter) -> Vec<SearchResult> {
    let keyword = filter.normalized_keyword();

    let mut results: Vec<SearchResult> = animals
        .iter()
        .filter(|a| filter.admits(a))
        .filter_map(|animal| match &keyword {
            None => Some(SearchResult {
                animal: animal.clone(),
                score: BASELINE_SCORE,
                matched_fields: Vec::new(),
            }),
            Some(keyword) => {
                let (score, matched_fields) = score_animal(animal, keyword);
                (score > 0).then(|| SearchResult {
                    animal: animal.clone(),
                    score,
                    matched_fields,
                })
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.animal.chinese_name.cmp(&b.animal.chinese_name))
    });
    results
}

// ============================================================================
// Service
// ============================================================================

#[derive(Clone)]
pub struct SearchService {
    catalog: AnimalCatalog,
}

impl SearchService {
    pub fn new(catalog: AnimalCatalog) -> Self {
        Self { catalog }
    }

    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<SearchResult>, DataError> {
        let animals = self.catalog.get_all().await?;
        let results = rank(&animals, filter);
        tracing::info!(
            "Search {:?} matched {} animals",
            filter.keyword.as_deref().unwrap_or(""),
            results.len()
        );
        Ok(results)
    }

    /// Autocomplete entries for a keyword, best match first
    pub async fn suggest(&self, keyword: &str, limit: usize) -> Result<Vec<SearchSuggestion>, DataError> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let animals = self.catalog.get_all().await?;
        let mut scored: Vec<(u32, &Animal)> = animals
            .iter()
            .map(|a| (score_animal(a, &keyword).0, a))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, a)| SearchSuggestion::from(a))
            .collect())
    }

    /// Categorical filters only; the keyword is ignored
    pub async fn filter(&self, filter: &SearchFilter) -> Result<Vec<Animal>, DataError> {
        let animals = self.catalog.get_all().await?;
        let matching: Vec<Animal> = animals.iter().filter(|a| filter.admits(a)).cloned().collect();
        tracing::debug!("Filter kept {} of {} animals", matching.len(), animals.len());
        Ok(matching)
    }
}
