// Axum server: JSON API, server-rendered pages and static assets
//
// Errors on /api routes are RFC 7807 problem details whose `instance` is the
// request path.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::AppSettings;
use crate::data::{DataError, JsonDataStore};
use crate::models::{
    ActivityPattern, Animal, BiologicalClass, CustomRouteResult, Diet, Habitat, Quiz, RouteType,
    Zone,
};
use crate::route_planner::decode_share_code;
use crate::search::{SearchFilter, SearchService};
use crate::services::{
    AnimalCatalog, QuizService, RouteService, ZoneDirectory, EMPTY_SELECTION_MESSAGE,
};
use crate::web::handlers::pages;

pub const PROBLEM_TYPE: &str = "https://tools.ietf.org/html/rfc7807";

const DEFAULT_SUGGEST_LIMIT: usize = 5;
const MAX_SUGGEST_LIMIT: usize = 10;
const DEFAULT_RANDOM_QUIZZES: usize = 5;
const MAX_RANDOM_QUIZZES: usize = 20;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonDataStore>,
    pub animals: AnimalCatalog,
    pub zones: ZoneDirectory,
    pub routes: RouteService,
    pub quizzes: QuizService,
    pub search: SearchService,
    pub static_dir: PathBuf,
}

impl AppState {
    pub async fn new(settings: &AppSettings) -> anyhow::Result<Self> {
        tracing::info!("Initializing JSON data store at {}...", settings.data_dir.display());
        let store = Arc::new(JsonDataStore::new(&settings.data_dir, settings.cache));

        let animals = AnimalCatalog::new(store.clone());
        let state = Self {
            zones: ZoneDirectory::new(store.clone()),
            routes: RouteService::new(store.clone()),
            quizzes: QuizService::new(store.clone()),
            search: SearchService::new(animals.clone()),
            animals,
            store,
            static_dir: settings.static_dir.clone(),
        };

        if settings.warm_cache {
            state.warm_cache().await?;
        }

        Ok(state)
    }

    /// Load every resource once so malformed data fails start-up
    async fn warm_cache(&self) -> anyhow::Result<()> {
        tracing::info!("Warming data cache...");
        let animals = self.animals.get_all().await.context("loading animals")?;
        let zones = self.zones.get_all().await.context("loading zones")?;
        let routes = self.routes.get_all().await.context("loading routes")?;
        let quizzes = self.quizzes.get_all().await.context("loading quizzes")?;
        tracing::info!(
            "Loaded {} animals, {} zones, {} routes, {} quizzes",
            animals.len(),
            zones.len(),
            routes.len(),
            quizzes.len()
        );
        Ok(())
    }
}

// ============================================================================
// Router Configuration
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Animal endpoints
        .route("/api/animals", get(list_animals))
        .route("/api/animals/:id", get(get_animal))

        // Search endpoints
        .route("/api/search", get(search_animals))
        .route("/api/search/suggest", get(suggest_animals))

        // Zone endpoints
        .route("/api/zones", get(list_zones))
        .route("/api/zones/:id/animals", get(get_zone_animals))

        // Route endpoints (static `plan` segment wins over `:id`)
        .route("/api/routes", get(list_routes))
        .route("/api/routes/plan", post(plan_route).get(plan_from_share_code))
        .route("/api/routes/:id", get(get_route))

        // Quiz endpoints
        .route("/api/quizzes/animal", get(get_animal_quizzes))
        .route("/api/quizzes/random", get(get_random_quizzes))
        .route("/api/quizzes/answer", post(answer_quiz))

        // Pages (HTML)
        .route("/", get(pages::home_page))
        .route("/animals", get(pages::animals_page))
        .route("/animals/", get(pages::animal_detail_blank))
        .route("/animals/:id", get(pages::animal_detail_page))
        .route("/search", get(pages::search_page))
        .route("/map", get(pages::map_page))
        .route("/routes", get(pages::routes_page))
        .route("/quiz", get(pages::quiz_page))
        .route("/favorites", get(pages::favorites_page))
        .route("/about", get(pages::about_page))
        .route("/set-language", post(pages::set_language))
        .nest_service("/static", static_files)
        .fallback(pages::not_found_page)

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub q: Option<String>,
    pub class: Option<String>,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub activity: Option<String>,
    pub zone: Option<String>,
}

impl FilterParams {
    /// Unknown enum values are treated as "no filter"
    pub fn to_filter(&self) -> SearchFilter {
        SearchFilter {
            keyword: self.q.clone(),
            biological_class: BiologicalClass::parse_filter(self.class.as_deref()),
            habitat: Habitat::parse_filter(self.habitat.as_deref()),
            diet: Diet::parse_filter(self.diet.as_deref()),
            activity_pattern: ActivityPattern::parse_filter(self.activity.as_deref()),
            zone_id: self.zone.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    q: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RouteListParams {
    #[serde(rename = "type")]
    route_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteDetailParams {
    include_animals: Option<String>,
    include_zones: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareCodeParams {
    share_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnimalIdParams {
    animal_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountParams {
    count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizIdParams {
    quiz_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanRequest {
    #[serde(default)]
    animal_ids: Option<Vec<String>>,
    #[serde(default)]
    include_animals: bool,
}

/// Parse a numeric query value, falling back to `default`, then clamp
fn clamped(raw: Option<&str>, default: usize, max: usize) -> usize {
    raw.map(str::trim)
        .and_then(|v| v.parse::<i64>().ok())
        .map(|v| v.clamp(1, max as i64) as usize)
        .unwrap_or(default)
}

fn is_flag_set(raw: Option<&str>) -> bool {
    raw.map(str::trim)
        .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

// ============================================================================
// JSON shapes
// ============================================================================

fn animal_summary(animal: &Animal) -> Value {
    json!({
        "id": animal.id,
        "chineseName": animal.chinese_name,
        "englishName": animal.english_name,
        "thumbnailUrl": animal.media.thumbnail_path,
        "conservationStatus": animal.conservation_status,
        "zoneId": animal.zone_id,
        "classification": {
            "biologicalClass": animal.classification.biological_class,
            "habitat": animal.classification.habitat,
        },
    })
}

fn zone_summary(zone: &Zone) -> Value {
    json!({
        "id": zone.id,
        "nameZh": zone.name_zh,
        "nameEn": zone.name_en,
        "color": zone.color,
        "position": zone.position,
    })
}

/// A quiz as sent to visitors: the answer stays on the server
fn public_quiz(quiz: &Quiz) -> Value {
    json!({
        "id": quiz.id,
        "animalId": quiz.animal_id,
        "type": quiz.quiz_type(),
        "questionZh": quiz.question_zh,
        "questionEn": quiz.question_en,
        "options": quiz.options,
    })
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "loader": state.store.stats(),
    }))
}

async fn list_animals(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<FilterParams>,
) -> Result<Json<Value>, Problem> {
    let animals = state.search.filter(&params.to_filter()).await.at(&uri)?;
    let summaries: Vec<Value> = animals.iter().map(animal_summary).collect();

    Ok(Json(json!({
        "animals": summaries,
        "total": animals.len(),
    })))
}

async fn get_animal(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Result<Json<Value>, Problem> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("Animal id must not be blank".into()).at(&uri));
    }

    let animal = state
        .animals
        .get_by_id(&id)
        .await
        .at(&uri)?
        .ok_or_else(|| AppError::NotFound(format!("Animal '{}' was not found", id)).at(&uri))?;
    let related = state.animals.get_related(&id).await.at(&uri)?;

    let mut body = serde_json::to_value(&animal).map_err(|e| AppError::Internal(e.to_string()).at(&uri))?;
    body["relatedAnimals"] = related.iter().map(animal_summary).collect();
    Ok(Json(body))
}

async fn search_animals(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<FilterParams>,
) -> Result<Json<Value>, Problem> {
    let results = state.search.search(&params.to_filter()).await.at(&uri)?;
    let total = results.len();

    Ok(Json(json!({
        "results": results,
        "total": total,
    })))
}

async fn suggest_animals(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Value>, Problem> {
    let Some(keyword) = params.q.as_deref().filter(|q| !q.trim().is_empty()) else {
        return Err(AppError::BadRequest("Search keyword must not be blank".into()).at(&uri));
    };

    let limit = clamped(params.limit.as_deref(), DEFAULT_SUGGEST_LIMIT, MAX_SUGGEST_LIMIT);
    let suggestions = state.search.suggest(keyword, limit).await.at(&uri)?;
    tracing::info!("Suggest {:?} returned {} entries", keyword, suggestions.len());

    Ok(Json(json!({ "suggestions": suggestions })))
}

async fn list_zones(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Value>, Problem> {
    let counts = state.zones.zone_animal_counts().await.at(&uri)?;
    let zones: Vec<Value> = counts
        .iter()
        .map(|c| {
            let mut zone = json!(c.zone);
            zone["animalCount"] = json!(c.animal_count);
            zone
        })
        .collect();

    Ok(Json(json!({ "zones": zones })))
}

async fn get_zone_animals(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Result<Json<Value>, Problem> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("Zone id must not be blank".into()).at(&uri));
    }

    let zone = state
        .zones
        .get_by_id(&id)
        .await
        .at(&uri)?
        .ok_or_else(|| AppError::NotFound(format!("Zone '{}' was not found", id)).at(&uri))?;
    let animals = state.zones.animals_in_zone(&zone.id).await.at(&uri)?;

    Ok(Json(json!({
        "zone": zone_summary(&zone),
        "animals": animals.iter().map(animal_summary).collect::<Vec<_>>(),
    })))
}

async fn list_routes(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<RouteListParams>,
) -> Result<Json<Value>, Problem> {
    let routes = match RouteType::parse_filter(params.route_type.as_deref()) {
        Some(route_type) => state.routes.get_by_type(route_type).await.at(&uri)?,
        None => state.routes.get_all().await.at(&uri)?.to_vec(),
    };

    let summaries: Vec<Value> = routes
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "nameZh": r.name_zh,
                "nameEn": r.name_en,
                "type": r.route_type,
                "description": r.description,
                "estimatedMinutes": r.estimated_minutes,
                "zoneCount": r.zone_ids.len(),
                "animalCount": r.animal_ids.len(),
            })
        })
        .collect();

    Ok(Json(json!({
        "routes": summaries,
        "total": routes.len(),
    })))
}

async fn get_route(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Query(params): Query<RouteDetailParams>,
) -> Result<Json<Value>, Problem> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("Route id must not be blank".into()).at(&uri));
    }

    let route = state
        .routes
        .get_by_id(&id)
        .await
        .at(&uri)?
        .ok_or_else(|| AppError::NotFound(format!("Route '{}' was not found", id)).at(&uri))?;

    let mut body = json!(route);
    if is_flag_set(params.include_animals.as_deref()) {
        let animals = state.routes.route_animals(&route.id).await.at(&uri)?;
        body["animals"] = animals.iter().map(animal_summary).collect();
    }
    if is_flag_set(params.include_zones.as_deref()) {
        let zones = state.routes.route_zones(&route.id).await.at(&uri)?;
        body["zones"] = zones.iter().map(zone_summary).collect();
    }

    Ok(Json(body))
}

/// Success payload shared by both planning endpoints
async fn planned_route_body(
    state: &AppState,
    result: CustomRouteResult,
    include_animals: bool,
) -> Result<Value, DataError> {
    let mut body = json!(result);
    if include_animals {
        let catalog = state.animals.get_all().await?;
        let animals: Vec<Value> = result
            .animal_ids
            .iter()
            .filter_map(|id| catalog.iter().find(|a| a.has_id(id)))
            .map(animal_summary)
            .collect();
        body["animals"] = json!(animals);
    }
    Ok(body)
}

async fn plan_route(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<Json<Value>, Problem> {
    let request: PlanRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Malformed route plan request: {}", e);
        AppError::BadRequest("Request body must be valid JSON".into()).at(&uri)
    })?;

    let animal_ids = request.animal_ids.unwrap_or_default();
    if animal_ids.is_empty() {
        return Err(AppError::BadRequest(EMPTY_SELECTION_MESSAGE.into()).at(&uri));
    }

    let result = state.routes.plan_custom_route(&animal_ids).await.at(&uri)?;
    if !result.success {
        let message = result.error_message.unwrap_or_default();
        return Err(AppError::BadRequest(message).at(&uri));
    }

    let body = planned_route_body(&state, result, request.include_animals)
        .await
        .at(&uri)?;
    Ok(Json(body))
}

async fn plan_from_share_code(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ShareCodeParams>,
) -> Result<Json<Value>, Problem> {
    let Some(code) = params.share_code.as_deref().filter(|c| !c.trim().is_empty()) else {
        return Err(AppError::BadRequest("A share code is required".into()).at(&uri));
    };

    let animal_ids = decode_share_code(code);
    if animal_ids.is_empty() {
        return Err(AppError::BadRequest("The share code is invalid".into()).at(&uri));
    }

    let result = state.routes.plan_custom_route(&animal_ids).await.at(&uri)?;
    if !result.success {
        let message = result.error_message.unwrap_or_default();
        return Err(AppError::BadRequest(message).at(&uri));
    }

    tracing::info!("Restored route of {} animals from share code", result.animal_ids.len());
    let body = planned_route_body(&state, result, true).await.at(&uri)?;
    Ok(Json(body))
}

async fn get_animal_quizzes(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<AnimalIdParams>,
) -> Result<Json<Value>, Problem> {
    if blank(params.animal_id.as_deref()) {
        return Err(AppError::BadRequest("Animal id must not be blank".into()).at(&uri));
    }
    let animal_id = params.animal_id.unwrap_or_default();

    let quizzes = state.quizzes.get_by_animal_id(&animal_id).await.at(&uri)?;
    Ok(Json(json!({
        "quizzes": quizzes.iter().map(public_quiz).collect::<Vec<_>>(),
    })))
}

async fn get_random_quizzes(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<CountParams>,
) -> Result<Json<Value>, Problem> {
    let count = clamped(params.count.as_deref(), DEFAULT_RANDOM_QUIZZES, MAX_RANDOM_QUIZZES);
    let quizzes = state.quizzes.get_random(count).await.at(&uri)?;

    Ok(Json(json!({
        "quizzes": quizzes.iter().map(public_quiz).collect::<Vec<_>>(),
    })))
}

async fn answer_quiz(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<QuizIdParams>,
    body: Bytes,
) -> Result<Json<Value>, Problem> {
    if blank(params.quiz_id.as_deref()) {
        return Err(AppError::BadRequest("Quiz id must not be blank".into()).at(&uri));
    }
    let quiz_id = params.quiz_id.unwrap_or_default();

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest("Request body must not be empty".into()).at(&uri));
    }

    let request: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Malformed quiz answer body: {}", e);
        AppError::BadRequest("Request body must be valid JSON".into()).at(&uri)
    })?;

    // property name matched case-insensitively
    let answer = request
        .as_object()
        .and_then(|fields| {
            fields
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("answer"))
                .map(|(_, value)| value)
        })
        .filter(|value| !value.is_null())
        .ok_or_else(|| AppError::BadRequest("The answer field is required".into()).at(&uri))?;

    let result = state
        .quizzes
        .validate_answer(&quiz_id, answer)
        .await
        .at(&uri)?
        .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' was not found", quiz_id)).at(&uri))?;

    Ok(Json(json!({
        "correct": result.is_correct,
        "correctAnswer": result.correct_answer,
        "feedbackZh": result.feedback_zh,
        "feedbackEn": result.feedback_en,
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    Data(#[from] DataError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Attach the request path the error is reported against
    pub fn at(self, uri: &Uri) -> Problem {
        Problem {
            error: self,
            instance: uri.path().to_string(),
        }
    }
}

/// An [`AppError`] rendered as problem details
#[derive(Debug)]
pub struct Problem {
    pub error: AppError,
    pub instance: String,
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let detail = match &self.error {
            AppError::Data(e) => {
                tracing::error!("Data error on {}: {}", self.instance, e);
                "Zoo data is temporarily unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error on {}: {}", self.instance, msg);
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "type": PROBLEM_TYPE,
            "title": status.canonical_reason().unwrap_or("Error"),
            "status": status.as_u16(),
            "detail": detail,
            "instance": self.instance,
        }));

        (status, body).into_response()
    }
}

trait ProblemExt<T> {
    fn at(self, uri: &Uri) -> Result<T, Problem>;
}

impl<T, E: Into<AppError>> ProblemExt<T> for Result<T, E> {
    fn at(self, uri: &Uri) -> Result<T, Problem> {
        self.map_err(|e| e.into().at(uri))
    }
}
