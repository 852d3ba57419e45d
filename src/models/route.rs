use serde::{Deserialize, Serialize};

use super::enums::RouteType;
use super::ids_match;

/// A predefined guided tour, as stored in `routes.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub name_zh: String,
    pub name_en: String,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    pub description: String,
    pub estimated_minutes: u32,
    pub zone_ids: Vec<String>,
    pub animal_ids: Vec<String>,
}

impl Route {
    pub fn has_id(&self, id: &str) -> bool {
        ids_match(&self.id, id.trim())
    }
}

/// Outcome of planning a visitor-defined route
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRouteResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub animal_ids: Vec<String>,
    pub zone_ids: Vec<String>,
    pub estimated_minutes: u32,
    pub share_code: Option<String>,
}

impl CustomRouteResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            animal_ids: Vec::new(),
            zone_ids: Vec::new(),
            estimated_minutes: 0,
            share_code: None,
        }
    }
}
