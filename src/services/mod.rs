//! Entity services over the cached JSON resources
//!
//! Each service is a cheap clonable handle around the shared
//! [`JsonDataStore`](crate::data::JsonDataStore). Lookups compare ids
//! case-insensitively and return early on blank ids without touching the
//! loader.

pub mod animals;
pub mod quizzes;
pub mod routes;
pub mod zones;

pub use animals::{AnimalCatalog, Neighbours};
pub use quizzes::QuizService;
pub use routes::{RouteService, EMPTY_SELECTION_MESSAGE, NO_VALID_ANIMALS_MESSAGE};
pub use zones::ZoneDirectory;
