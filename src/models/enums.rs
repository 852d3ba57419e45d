//! Taxonomy and catalog enumerations
//!
//! Input is matched case-insensitively (`"mammal"`, `"Mammal"` and `"MAMMAL"`
//! all parse), output always uses the PascalCase variant name.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a string does not name any variant of an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            /// Lenient parse used for query-string filters: blank or unknown
            /// values mean "no filter".
            pub fn parse_filter(value: Option<&str>) -> Option<Self> {
                value
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .and_then(|v| v.parse().ok())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum!(
    /// Vertebrate class (plus a catch-all for invertebrates)
    BiologicalClass { Mammal, Bird, Reptile, Amphibian, Fish, Invertebrate }
);

string_enum!(
    Habitat { TropicalRainforest, Desert, Grassland, Polar, Ocean, Freshwater, Mountain }
);

string_enum!(
    Diet { Carnivore, Herbivore, Omnivore }
);

string_enum!(
    ActivityPattern { Diurnal, Nocturnal, Crepuscular }
);

string_enum!(
    /// IUCN Red List category
    ConservationStatus { LC, NT, VU, EN, CR, EW, EX }
);

string_enum!(
    RouteType { Complete, Highlights, FamilyFriendly, Photography, Themed }
);

string_enum!(
    QuizType { MultipleChoice, TrueFalse }
);

// ============================================================================
// Display labels
// ============================================================================

impl BiologicalClass {
    pub fn label_zh(&self) -> &'static str {
        match self {
            BiologicalClass::Mammal => "哺乳類",
            BiologicalClass::Bird => "鳥類",
            BiologicalClass::Reptile => "爬蟲類",
            BiologicalClass::Amphibian => "兩棲類",
            BiologicalClass::Fish => "魚類",
            BiologicalClass::Invertebrate => "無脊椎動物",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            BiologicalClass::Mammal => "Mammal",
            BiologicalClass::Bird => "Bird",
            BiologicalClass::Reptile => "Reptile",
            BiologicalClass::Amphibian => "Amphibian",
            BiologicalClass::Fish => "Fish",
            BiologicalClass::Invertebrate => "Invertebrate",
        }
    }
}

impl Habitat {
    pub fn label_zh(&self) -> &'static str {
        match self {
            Habitat::TropicalRainforest => "熱帶雨林",
            Habitat::Desert => "沙漠",
            Habitat::Grassland => "草原",
            Habitat::Polar => "極地",
            Habitat::Ocean => "海洋",
            Habitat::Freshwater => "淡水",
            Habitat::Mountain => "高山",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            Habitat::TropicalRainforest => "Tropical rainforest",
            Habitat::Desert => "Desert",
            Habitat::Grassland => "Grassland",
            Habitat::Polar => "Polar",
            Habitat::Ocean => "Ocean",
            Habitat::Freshwater => "Freshwater",
            Habitat::Mountain => "Mountain",
        }
    }
}

impl Diet {
    pub fn label_zh(&self) -> &'static str {
        match self {
            Diet::Carnivore => "肉食性",
            Diet::Herbivore => "草食性",
            Diet::Omnivore => "雜食性",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            Diet::Carnivore => "Carnivore",
            Diet::Herbivore => "Herbivore",
            Diet::Omnivore => "Omnivore",
        }
    }
}

impl ActivityPattern {
    pub fn label_zh(&self) -> &'static str {
        match self {
            ActivityPattern::Diurnal => "日行性",
            ActivityPattern::Nocturnal => "夜行性",
            ActivityPattern::Crepuscular => "晨昏性",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            ActivityPattern::Diurnal => "Diurnal",
            ActivityPattern::Nocturnal => "Nocturnal",
            ActivityPattern::Crepuscular => "Crepuscular",
        }
    }
}

impl ConservationStatus {
    /// Ranking used to pick featured animals (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            ConservationStatus::CR => 6,
            ConservationStatus::EN => 5,
            ConservationStatus::VU => 4,
            ConservationStatus::NT => 3,
            ConservationStatus::LC => 2,
            ConservationStatus::EW => 1,
            ConservationStatus::EX => 0,
        }
    }

    pub fn label_zh(&self) -> &'static str {
        match self {
            ConservationStatus::LC => "無危",
            ConservationStatus::NT => "近危",
            ConservationStatus::VU => "易危",
            ConservationStatus::EN => "瀕危",
            ConservationStatus::CR => "極危",
            ConservationStatus::EW => "野外滅絕",
            ConservationStatus::EX => "滅絕",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            ConservationStatus::LC => "Least Concern",
            ConservationStatus::NT => "Near Threatened",
            ConservationStatus::VU => "Vulnerable",
            ConservationStatus::EN => "Endangered",
            ConservationStatus::CR => "Critically Endangered",
            ConservationStatus::EW => "Extinct in the Wild",
            ConservationStatus::EX => "Extinct",
        }
    }

    /// CSS modifier for the status badge
    pub fn css_class(&self) -> &'static str {
        match self {
            ConservationStatus::LC | ConservationStatus::NT => "status-safe",
            ConservationStatus::VU => "status-vulnerable",
            ConservationStatus::EN | ConservationStatus::CR => "status-endangered",
            ConservationStatus::EW | ConservationStatus::EX => "status-extinct",
        }
    }
}

impl RouteType {
    pub fn label_zh(&self) -> &'static str {
        match self {
            RouteType::Complete => "完整導覽",
            RouteType::Highlights => "精華路線",
            RouteType::FamilyFriendly => "親子路線",
            RouteType::Photography => "攝影路線",
            RouteType::Themed => "主題路線",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            RouteType::Complete => "Complete tour",
            RouteType::Highlights => "Highlights",
            RouteType::FamilyFriendly => "Family friendly",
            RouteType::Photography => "Photography",
            RouteType::Themed => "Themed",
        }
    }
}
