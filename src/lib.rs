//! Zoo guide website
//!
//! Static JSON park data served as a JSON API and server-rendered pages.
//!
//! - `data`: JSON loader with a TTL read-through cache
//! - `models`: animals, zones, routes, quizzes and their enumerations
//! - `services`: per-resource lookups over the loader
//! - `search`: weighted keyword scoring and categorical filters
//! - `route_planner`: custom route ordering, time estimate and share codes
//! - `api_server` / `web`: HTTP layer (feature `api`)

pub mod config;
pub mod data;
pub mod models;
pub mod route_planner;
pub mod search;
pub mod services;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use config::{AppSettings, Args};
pub use data::{CacheSettings, DataError, JsonDataStore, LoaderStatsSnapshot};
pub use models::*;
pub use search::{SearchFilter, SearchResult, SearchService, SearchSuggestion};
pub use services::{AnimalCatalog, Neighbours, QuizService, RouteService, ZoneDirectory};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppError, AppState};
