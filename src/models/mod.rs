//! Domain records loaded from the JSON data files
//!
//! - `animal`: catalog entries with taxonomy, description and media
//! - `zone`: park areas and their map positions
//! - `route`: predefined tours and custom-route results
//! - `quiz`: quiz questions with typed answers
//! - `enums`: taxonomy, conservation and route/quiz enumerations

pub mod animal;
pub mod enums;
pub mod quiz;
pub mod route;
pub mod zone;

pub use animal::{Animal, Classification, Description, MediaResources};
pub use enums::{
    ActivityPattern, BiologicalClass, ConservationStatus, Diet, Habitat, QuizType, RouteType,
    UnknownVariant,
};
pub use quiz::{Quiz, QuizAnswer, QuizAnswerResult, QuizOption};
pub use route::{CustomRouteResult, Route};
pub use zone::{Coordinate, Zone, ZoneAnimalCount};

/// Identifier equality ignoring case, with full Unicode case folding
pub fn ids_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
