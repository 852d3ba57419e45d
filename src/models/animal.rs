use serde::{Deserialize, Serialize};

use super::enums::{ActivityPattern, BiologicalClass, ConservationStatus, Diet, Habitat};
use super::ids_match;

/// One animal in the catalog, as stored in `animals.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: String,
    pub chinese_name: String,
    pub english_name: String,
    pub scientific_name: String,
    pub zone_id: String,
    pub classification: Classification,
    pub description: Description,
    pub fun_facts: Vec<String>,
    pub conservation_status: ConservationStatus,
    pub media: MediaResources,
    #[serde(default)]
    pub related_animal_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub biological_class: BiologicalClass,
    pub habitat: Habitat,
    pub diet: Diet,
    pub activity_pattern: ActivityPattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub size: String,
    pub appearance: String,
    pub behavior: String,
    pub full_description_zh: String,
    pub full_description_en: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResources {
    pub images: Vec<String>,
    #[serde(default)]
    pub sound_path: Option<String>,
    pub thumbnail_path: String,
}

impl Animal {
    /// Case-insensitive id comparison
    pub fn has_id(&self, id: &str) -> bool {
        ids_match(&self.id, id.trim())
    }

    pub fn in_zone(&self, zone_id: &str) -> bool {
        ids_match(&self.zone_id, zone_id.trim())
    }

    pub fn is_related_to(&self, other_id: &str) -> bool {
        self.related_animal_ids
            .iter()
            .any(|id| ids_match(id, other_id))
    }
}

#[cfg(test)]
impl Animal {
    /// Minimal animal for unit tests
    pub(crate) fn sample(id: &str, chinese_name: &str, english_name: &str, zone_id: &str) -> Self {
        Animal {
            id: id.to_string(),
            chinese_name: chinese_name.to_string(),
            english_name: english_name.to_string(),
            scientific_name: String::new(),
            zone_id: zone_id.to_string(),
            classification: Classification {
                biological_class: BiologicalClass::Mammal,
                habitat: Habitat::Grassland,
                diet: Diet::Herbivore,
                activity_pattern: ActivityPattern::Diurnal,
            },
            description: Description {
                size: String::new(),
                appearance: String::new(),
                behavior: String::new(),
                full_description_zh: String::new(),
                full_description_en: String::new(),
            },
            fun_facts: Vec::new(),
            conservation_status: ConservationStatus::LC,
            media: MediaResources {
                images: Vec::new(),
                sound_path: None,
                thumbnail_path: format!("/images/animals/{id}-thumb.webp"),
            },
            related_animal_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_comparisons_fold_non_ascii_case() {
        let mut animal = Animal::sample("Élan-01", "大羚羊", "Eland", "Ökozone");
        animal.related_animal_ids = vec!["ÖRNEK-02".to_string()];

        assert!(animal.has_id(" élan-01 "));
        assert!(animal.in_zone("ÖKOZONE"));
        assert!(animal.is_related_to("örnek-02"));
        assert!(!animal.has_id("elan-01"));
    }

    #[test]
    fn test_deserialize_camel_case_record() {
        let json = r#"{
            "id": "lion-001",
            "chineseName": "非洲獅",
            "englishName": "African Lion",
            "scientificName": "Panthera leo",
            "zoneId": "africa-zone",
            "classification": {
                "biologicalClass": "mammal",
                "habitat": "grassland",
                "diet": "carnivore",
                "activityPattern": "crepuscular"
            },
            "description": {
                "size": "體長 1.4-2.5 公尺",
                "appearance": "雄獅擁有標誌性的鬃毛",
                "behavior": "群居動物",
                "fullDescriptionZh": "非洲獅是現存最大的貓科動物之一",
                "fullDescriptionEn": "The African lion is one of the largest cats"
            },
            "funFacts": ["獅子每天可睡眠長達 20 小時"],
            "conservationStatus": "vu",
            "media": {
                "images": ["/images/animals/lion-001-1.webp"],
                "thumbnailPath": "/images/animals/lion-001-thumb.webp"
            }
        }"#;

        let animal: Animal = serde_json::from_str(json).unwrap();
        assert_eq!(animal.id, "lion-001");
        assert_eq!(animal.classification.biological_class, BiologicalClass::Mammal);
        assert_eq!(animal.conservation_status, ConservationStatus::VU);
        assert!(animal.related_animal_ids.is_empty());
        assert!(animal.media.sound_path.is_none());
    }

    #[test]
    fn test_id_helpers_ignore_case() {
        let mut lion = Animal::sample("lion-001", "非洲獅", "African Lion", "africa-zone");
        lion.related_animal_ids = vec!["Elephant-001".to_string()];

        assert!(lion.has_id("LION-001"));
        assert!(lion.in_zone("Africa-Zone"));
        assert!(lion.is_related_to("elephant-001"));
        assert!(!lion.is_related_to("giraffe-001"));
    }
}
