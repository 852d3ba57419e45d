use std::sync::Arc;

use crate::data::{DataError, JsonDataStore, ANIMALS_FILE, ROUTES_FILE, ZONES_FILE};
use crate::models::{Animal, CustomRouteResult, Route, RouteType, Zone};
use crate::route_planner::{
    distinct_zone_ids, encode_share_code, estimate_minutes, order_by_position,
};

pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one animal";
pub const NO_VALID_ANIMALS_MESSAGE: &str = "None of the selected animal ids are valid";

/// Predefined tours from `routes.json` plus custom route planning
#[derive(Clone)]
pub struct RouteService {
    store: Arc<JsonDataStore>,
}

impl RouteService {
    pub fn new(store: Arc<JsonDataStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Arc<Vec<Route>>, DataError> {
        tracing::debug!("Loading all routes");
        self.store.load::<Route>(ROUTES_FILE, "routes").await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Route>, DataError> {
        if id.trim().is_empty() {
            tracing::warn!("Route id must not be blank");
            return Ok(None);
        }

        let routes = self.get_all().await?;
        let route = routes.iter().find(|r| r.has_id(id)).cloned();
        if route.is_none() {
            tracing::warn!("Route {} not found", id);
        }
        Ok(route)
    }

    pub async fn get_by_type(&self, route_type: RouteType) -> Result<Vec<Route>, DataError> {
        let routes = self.get_all().await?;
        Ok(routes
            .iter()
            .filter(|r| r.route_type == route_type)
            .cloned()
            .collect())
    }

    /// The route's animals in route order; ids missing from the catalog are dropped
    pub async fn route_animals(&self, route_id: &str) -> Result<Vec<Animal>, DataError> {
        let Some(route) = self.get_by_id(route_id).await? else {
            return Ok(Vec::new());
        };

        let animals = self.store.load::<Animal>(ANIMALS_FILE, "animals").await?;
        Ok(resolve_in_order(&route.animal_ids, &animals, Animal::has_id))
    }

    /// The route's zones in route order; unknown zone ids are dropped
    pub async fn route_zones(&self, route_id: &str) -> Result<Vec<Zone>, DataError> {
        let Some(route) = self.get_by_id(route_id).await? else {
            return Ok(Vec::new());
        };

        let zones = self.store.load::<Zone>(ZONES_FILE, "zones").await?;
        Ok(resolve_in_order(&route.zone_ids, &zones, Zone::has_id))
    }

    /// Order the selected animals for a visit and estimate its duration.
    ///
    /// Unknown ids are dropped with a warning; duplicates are kept. The
    /// share code encodes the ordered ids as returned.
    pub async fn plan_custom_route(
        &self,
        animal_ids: &[String],
    ) -> Result<CustomRouteResult, DataError> {
        if animal_ids.is_empty() {
            tracing::warn!("Custom route requested without animals");
            return Ok(CustomRouteResult::failure(EMPTY_SELECTION_MESSAGE));
        }

        let animals = self.store.load::<Animal>(ANIMALS_FILE, "animals").await?;
        let mut selected = Vec::with_capacity(animal_ids.len());
        for id in animal_ids {
            match animals.iter().find(|a| a.has_id(id)) {
                Some(animal) => selected.push(animal.clone()),
                None => tracing::warn!("Skipping unknown animal {} in custom route", id),
            }
        }

        if selected.is_empty() {
            return Ok(CustomRouteResult::failure(NO_VALID_ANIMALS_MESSAGE));
        }

        let zones = self.store.load::<Zone>(ZONES_FILE, "zones").await?;
        let ordered = order_by_position(selected, &zones);
        let zone_ids = distinct_zone_ids(&ordered);
        let ordered_ids: Vec<String> = ordered.into_iter().map(|a| a.id).collect();
        let estimated_minutes = estimate_minutes(zone_ids.len(), ordered_ids.len());

        tracing::info!(
            "Planned custom route: {} animals across {} zones, ~{} minutes",
            ordered_ids.len(),
            zone_ids.len(),
            estimated_minutes
        );

        Ok(CustomRouteResult {
            success: true,
            error_message: None,
            share_code: Some(encode_share_code(&ordered_ids)),
            animal_ids: ordered_ids,
            zone_ids,
            estimated_minutes,
        })
    }
}

fn resolve_in_order<T: Clone>(ids: &[String], items: &[T], matches: fn(&T, &str) -> bool) -> Vec<T> {
    ids.iter()
        .filter_map(|id| items.iter().find(|item| matches(item, id)).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CacheSettings;
    use crate::route_planner::decode_share_code;
    use std::path::PathBuf;

    fn fixture_routes() -> (Arc<JsonDataStore>, RouteService) {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        let store = Arc::new(JsonDataStore::new(dir, CacheSettings::default()));
        (store.clone(), RouteService::new(store))
    }

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_get_by_id_and_type() {
        let (_, routes) = fixture_routes();

        let route = routes.get_by_id("ROUTE-FAMILY").await.unwrap().unwrap();
        assert_eq!(route.route_type, RouteType::FamilyFriendly);

        let highlights = routes.get_by_type(RouteType::Highlights).await.unwrap();
        assert_eq!(highlights.len(), 1);
        assert!(routes.get_by_type(RouteType::Photography).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_route_id_skips_the_loader() {
        let (store, routes) = fixture_routes();
        assert!(routes.get_by_id("").await.unwrap().is_none());
        assert!(routes.route_animals("  ").await.unwrap().is_empty());
        assert!(routes.route_zones("").await.unwrap().is_empty());
        assert_eq!(store.stats().requests, 0);
    }

    #[tokio::test]
    async fn test_route_expansions_drop_unknown_ids() {
        let (_, routes) = fixture_routes();

        let animals = routes.route_animals("route-highlights").await.unwrap();
        let animal_ids: Vec<&str> = animals.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(animal_ids, vec!["penguin-001", "lion-001"]);

        let zones = routes.route_zones("route-highlights").await.unwrap();
        let zone_ids: Vec<&str> = zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(zone_ids, vec!["polar-zone", "africa-zone"]);
    }

    #[tokio::test]
    async fn test_plan_empty_selection_fails() {
        let (store, routes) = fixture_routes();
        let result = routes.plan_custom_route(&[]).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.error_message.as_deref(), Some(EMPTY_SELECTION_MESSAGE));
        assert!(result.animal_ids.is_empty());
        assert!(result.zone_ids.is_empty());
        assert_eq!(result.estimated_minutes, 0);
        assert!(result.share_code.is_none());
        assert_eq!(store.stats().requests, 0);
    }

    #[tokio::test]
    async fn test_plan_all_invalid_fails() {
        let (_, routes) = fixture_routes();
        let result = routes
            .plan_custom_route(&owned(&["tiger-999", "bear-404"]))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.error_message.as_deref(), Some(NO_VALID_ANIMALS_MESSAGE));
    }

    #[tokio::test]
    async fn test_plan_orders_by_zone_position() {
        let (_, routes) = fixture_routes();
        let result = routes
            .plan_custom_route(&owned(&["LION-001", "penguin-001", "tiger-999", "elephant-001"]))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.error_message.is_none());
        assert_eq!(result.animal_ids, owned(&["penguin-001", "lion-001", "elephant-001"]));
        assert_eq!(result.zone_ids, owned(&["polar-zone", "africa-zone"]));
        assert_eq!(result.estimated_minutes, 15 + 3 * 5);

        let code = result.share_code.unwrap();
        assert_eq!(decode_share_code(&code), result.animal_ids);
    }

    #[tokio::test]
    async fn test_plan_keeps_duplicates() {
        let (_, routes) = fixture_routes();
        let result = routes
            .plan_custom_route(&owned(&["lion-001", "lion-001"]))
            .await
            .unwrap();

        assert_eq!(result.animal_ids, owned(&["lion-001", "lion-001"]));
        assert_eq!(result.zone_ids, owned(&["africa-zone"]));
        assert_eq!(result.estimated_minutes, 10);
    }
}
