// Page handlers for HTML rendering with Askama

use std::convert::Infallible;

use askama::Template;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_htmx::HxRequest;
use serde::Deserialize;

use crate::api_server::{AppState, FilterParams};
use crate::data::DataError;
use crate::models::{ActivityPattern, Animal, BiologicalClass, Diet, Habitat, Route, ZoneAnimalCount};
use crate::search::SearchResult;
use crate::web::i18n::{Lang, Texts, CULTURE_COOKIE, CULTURE_COOKIE_MAX_AGE};

const FEATURED_COUNT: usize = 3;

// ============================================================================
// Request context
// ============================================================================

/// Language and path of the page being rendered
#[derive(Debug, Clone)]
pub struct PageContext {
    pub lang: Lang,
    pub return_url: String,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PageContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let return_url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Ok(Self {
            lang: Lang::from_headers(&parts.headers),
            return_url,
        })
    }
}

impl PageContext {
    fn layout(&self, title: &str) -> Layout {
        Layout {
            t: self.lang.texts(),
            culture: self.lang.culture(),
            title: title.to_string(),
            return_url: self.return_url.clone(),
        }
    }

    fn error(&self, kind: impl Into<PageErrorKind>) -> PageError {
        PageError {
            ctx: self.clone(),
            kind: kind.into(),
        }
    }

    fn render(&self, template: &impl Template) -> Result<Html<String>, PageError> {
        template
            .render()
            .map(Html)
            .map_err(|e| self.error(PageErrorKind::Render(e.to_string())))
    }
}

/// Fields shared by every page through `base.html`
pub struct Layout {
    pub t: &'static Texts,
    pub culture: &'static str,
    pub title: String,
    pub return_url: String,
}

// ============================================================================
// View models
// ============================================================================

pub struct AnimalCard {
    pub id: String,
    pub name: String,
    pub alt_name: String,
    pub thumbnail: String,
    pub zone_id: String,
    pub class_label: &'static str,
    pub status_code: &'static str,
    pub status_label: &'static str,
    pub status_class: &'static str,
    /// Set on search results only
    pub score: Option<u32>,
    pub matched_fields: String,
}

impl AnimalCard {
    fn new(animal: &Animal, lang: Lang) -> Self {
        let (name, alt_name) = match lang {
            Lang::ZhTw => (&animal.chinese_name, &animal.english_name),
            Lang::En => (&animal.english_name, &animal.chinese_name),
        };
        let status = animal.conservation_status;
        let class = animal.classification.biological_class;

        Self {
            id: animal.id.clone(),
            name: name.clone(),
            alt_name: alt_name.clone(),
            thumbnail: animal.media.thumbnail_path.clone(),
            zone_id: animal.zone_id.clone(),
            class_label: lang.pick(class.label_zh(), class.label_en()),
            status_code: status.as_str(),
            status_label: lang.pick(status.label_zh(), status.label_en()),
            status_class: status.css_class(),
            score: None,
            matched_fields: String::new(),
        }
    }

    fn list(animals: &[Animal], lang: Lang) -> Vec<Self> {
        animals.iter().map(|a| Self::new(a, lang)).collect()
    }

    fn scored(result: &SearchResult, lang: Lang) -> Self {
        Self {
            score: Some(result.score),
            matched_fields: result.matched_fields.join(" "),
            ..Self::new(&result.animal, lang)
        }
    }
}

pub struct AnimalDetail {
    pub id: String,
    pub name: String,
    pub alt_name: String,
    pub scientific_name: String,
    pub zone_id: String,
    pub zone_name: String,
    pub class_label: &'static str,
    pub habitat_label: &'static str,
    pub diet_label: &'static str,
    pub activity_label: &'static str,
    pub status_code: &'static str,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub size: String,
    pub appearance: String,
    pub behavior: String,
    pub full_description: String,
    pub fun_facts: Vec<String>,
    pub images: Vec<String>,
    pub thumbnail: String,
    pub sound_path: Option<String>,
}

impl AnimalDetail {
    fn new(animal: &Animal, zone_name: String, lang: Lang) -> Self {
        let c = animal.classification;
        let status = animal.conservation_status;
        let (name, alt_name) = match lang {
            Lang::ZhTw => (&animal.chinese_name, &animal.english_name),
            Lang::En => (&animal.english_name, &animal.chinese_name),
        };

        Self {
            id: animal.id.clone(),
            name: name.clone(),
            alt_name: alt_name.clone(),
            scientific_name: animal.scientific_name.clone(),
            zone_id: animal.zone_id.clone(),
            zone_name,
            class_label: lang.pick(c.biological_class.label_zh(), c.biological_class.label_en()),
            habitat_label: lang.pick(c.habitat.label_zh(), c.habitat.label_en()),
            diet_label: lang.pick(c.diet.label_zh(), c.diet.label_en()),
            activity_label: lang.pick(c.activity_pattern.label_zh(), c.activity_pattern.label_en()),
            status_code: status.as_str(),
            status_label: lang.pick(status.label_zh(), status.label_en()),
            status_class: status.css_class(),
            size: animal.description.size.clone(),
            appearance: animal.description.appearance.clone(),
            behavior: animal.description.behavior.clone(),
            full_description: lang
                .pick(
                    &animal.description.full_description_zh,
                    &animal.description.full_description_en,
                )
                .to_string(),
            fun_facts: animal.fun_facts.clone(),
            images: animal.media.images.clone(),
            thumbnail: animal.media.thumbnail_path.clone(),
            sound_path: animal.media.sound_path.clone(),
        }
    }
}

pub struct NavLink {
    pub id: String,
    pub name: String,
}

impl NavLink {
    fn new(animal: &Animal, lang: Lang) -> Self {
        Self {
            id: animal.id.clone(),
            name: lang.pick(&animal.chinese_name, &animal.english_name).to_string(),
        }
    }
}

pub struct ZoneView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub svg_path_id: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub animal_count: usize,
}

impl ZoneView {
    fn new(entry: &ZoneAnimalCount, lang: Lang) -> Self {
        let zone = &entry.zone;
        Self {
            id: zone.id.clone(),
            name: lang.pick(&zone.name_zh, &zone.name_en).to_string(),
            description: zone.description.clone(),
            svg_path_id: zone.svg_path_id.clone(),
            color: zone.color.clone(),
            x: zone.position.x,
            y: zone.position.y,
            animal_count: entry.animal_count,
        }
    }
}

pub struct RouteView {
    pub id: String,
    pub name: String,
    pub type_code: &'static str,
    pub type_label: &'static str,
    pub description: String,
    pub estimated_minutes: u32,
    pub zone_count: usize,
    pub animal_count: usize,
    pub animal_ids: String,
}

impl RouteView {
    fn new(route: &Route, lang: Lang) -> Self {
        Self {
            id: route.id.clone(),
            name: lang.pick(&route.name_zh, &route.name_en).to_string(),
            type_code: route.route_type.as_str(),
            type_label: lang.pick(route.route_type.label_zh(), route.route_type.label_en()),
            description: route.description.clone(),
            estimated_minutes: route.estimated_minutes,
            zone_count: route.zone_ids.len(),
            animal_count: route.animal_ids.len(),
            animal_ids: route.animal_ids.join(","),
        }
    }
}

/// One `<option>` of a filter dropdown
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

trait Labelled: Copy + PartialEq + 'static {
    const VARIANTS: &'static [Self];
    fn value(&self) -> &'static str;
    fn label(&self, lang: Lang) -> &'static str;
}

macro_rules! labelled {
    ($($ty:ty),+) => {
        $(impl Labelled for $ty {
            const VARIANTS: &'static [Self] = <$ty>::ALL;
            fn value(&self) -> &'static str {
                self.as_str()
            }
            fn label(&self, lang: Lang) -> &'static str {
                lang.pick(self.label_zh(), self.label_en())
            }
        })+
    };
}

labelled!(BiologicalClass, Habitat, Diet, ActivityPattern);

fn filter_options<T: Labelled>(selected: Option<T>, lang: Lang) -> Vec<FilterOption> {
    T::VARIANTS
        .iter()
        .map(|v| FilterOption {
            value: v.value(),
            label: v.label(lang),
            selected: selected == Some(*v),
        })
        .collect()
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub featured: Vec<AnimalCard>,
    pub animal_count: usize,
    pub zone_count: usize,
}

#[derive(Template)]
#[template(path = "pages/animals.html")]
pub struct AnimalsTemplate {
    pub layout: Layout,
    pub animals: Vec<AnimalCard>,
}

#[derive(Template)]
#[template(path = "pages/animal_detail.html")]
pub struct AnimalDetailTemplate {
    pub layout: Layout,
    pub animal: AnimalDetail,
    pub related: Vec<AnimalCard>,
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchTemplate {
    pub layout: Layout,
    pub keyword: String,
    pub class_options: Vec<FilterOption>,
    pub habitat_options: Vec<FilterOption>,
    pub diet_options: Vec<FilterOption>,
    pub activity_options: Vec<FilterOption>,
    pub results: Vec<AnimalCard>,
}

/// Results list alone, swapped in by htmx
#[derive(Template)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub layout: Layout,
    pub results: Vec<AnimalCard>,
}

#[derive(Template)]
#[template(path = "pages/map.html")]
pub struct MapTemplate {
    pub layout: Layout,
    pub zones: Vec<ZoneView>,
}

#[derive(Template)]
#[template(path = "pages/routes.html")]
pub struct RoutesTemplate {
    pub layout: Layout,
    pub routes: Vec<RouteView>,
    pub animals: Vec<AnimalCard>,
}

#[derive(Template)]
#[template(path = "pages/quiz.html")]
pub struct QuizTemplate {
    pub layout: Layout,
    pub total_quizzes: usize,
    pub animals: Vec<AnimalCard>,
}

#[derive(Template)]
#[template(path = "pages/favorites.html")]
pub struct FavoritesTemplate {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub layout: Layout,
    pub heading: &'static str,
    pub message: &'static str,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum PageErrorKind {
    NotFound,
    Data(DataError),
    Render(String),
}

impl From<DataError> for PageErrorKind {
    fn from(e: DataError) -> Self {
        PageErrorKind::Data(e)
    }
}

/// A page that could not be rendered; shown as the 404 or generic error page
#[derive(Debug)]
pub struct PageError {
    ctx: PageContext,
    kind: PageErrorKind,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let t = self.ctx.lang.texts();
        let (status, heading, message) = match &self.kind {
            PageErrorKind::NotFound => (StatusCode::NOT_FOUND, t.not_found_heading, t.not_found_body),
            PageErrorKind::Data(e) => {
                tracing::error!("Page {} failed to load data: {}", self.ctx.return_url, e);
                (StatusCode::INTERNAL_SERVER_ERROR, t.error_heading, t.error_body)
            }
            PageErrorKind::Render(e) => {
                tracing::error!("Template error on {}: {}", self.ctx.return_url, e);
                (StatusCode::INTERNAL_SERVER_ERROR, t.error_heading, t.error_body)
            }
        };

        let template = ErrorTemplate {
            layout: self.ctx.layout(heading),
            heading,
            message,
        };
        let body = template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e));
        (status, Html(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn home_page(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<Html<String>, PageError> {
    let featured = state
        .animals
        .get_featured(FEATURED_COUNT)
        .await
        .map_err(|e| ctx.error(e))?;
    let animal_count = state.animals.get_all().await.map_err(|e| ctx.error(e))?.len();
    let zone_count = state.zones.get_all().await.map_err(|e| ctx.error(e))?.len();

    ctx.render(&HomeTemplate {
        layout: ctx.layout(ctx.lang.texts().nav_home),
        featured: AnimalCard::list(&featured, ctx.lang),
        animal_count,
        zone_count,
    })
}

pub async fn animals_page(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<Html<String>, PageError> {
    let animals = state.animals.get_all().await.map_err(|e| ctx.error(e))?;
    tracing::info!("Rendering catalog of {} animals", animals.len());

    ctx.render(&AnimalsTemplate {
        layout: ctx.layout(ctx.lang.texts().animals_heading),
        animals: AnimalCard::list(&animals, ctx.lang),
    })
}

pub async fn animal_detail_blank() -> Redirect {
    Redirect::to("/animals")
}

pub async fn animal_detail_page(
    State(state): State<AppState>,
    ctx: PageContext,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    if id.trim().is_empty() {
        tracing::warn!("Blank animal id, redirecting to catalog");
        return Ok(Redirect::to("/animals").into_response());
    }

    let Some(animal) = state.animals.get_by_id(&id).await.map_err(|e| ctx.error(e))? else {
        return Err(ctx.error(PageErrorKind::NotFound));
    };
    let related = state.animals.get_related(&id).await.map_err(|e| ctx.error(e))?;
    let neighbours = state.animals.neighbours(&animal.id).await.map_err(|e| ctx.error(e))?;
    let zone_name = state
        .zones
        .get_by_id(&animal.zone_id)
        .await
        .map_err(|e| ctx.error(e))?
        .map(|z| ctx.lang.pick(&z.name_zh, &z.name_en).to_string())
        .unwrap_or_else(|| animal.zone_id.clone());

    tracing::info!("Rendering {} with {} related animals", animal.id, related.len());

    let lang = ctx.lang;
    let page = ctx.render(&AnimalDetailTemplate {
        layout: ctx.layout(lang.pick(&animal.chinese_name, &animal.english_name)),
        animal: AnimalDetail::new(&animal, zone_name, lang),
        related: AnimalCard::list(&related, lang),
        previous: neighbours.previous.as_ref().map(|a| NavLink::new(a, lang)),
        next: neighbours.next.as_ref().map(|a| NavLink::new(a, lang)),
    })?;
    Ok(page.into_response())
}

pub async fn search_page(
    State(state): State<AppState>,
    ctx: PageContext,
    HxRequest(is_fragment): HxRequest,
    Query(params): Query<FilterParams>,
) -> Result<Html<String>, PageError> {
    let filter = params.to_filter();
    let found = state.search.search(&filter).await.map_err(|e| ctx.error(e))?;
    let results: Vec<AnimalCard> = found.iter().map(|r| AnimalCard::scored(r, ctx.lang)).collect();
    let layout = ctx.layout(ctx.lang.texts().nav_search);

    if is_fragment {
        return ctx.render(&SearchResultsTemplate { layout, results });
    }

    ctx.render(&SearchTemplate {
        layout,
        keyword: params.q.clone().unwrap_or_default(),
        class_options: filter_options(filter.biological_class, ctx.lang),
        habitat_options: filter_options(filter.habitat, ctx.lang),
        diet_options: filter_options(filter.diet, ctx.lang),
        activity_options: filter_options(filter.activity_pattern, ctx.lang),
        results,
    })
}

pub async fn map_page(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<Html<String>, PageError> {
    let counts = state.zones.zone_animal_counts().await.map_err(|e| ctx.error(e))?;

    ctx.render(&MapTemplate {
        layout: ctx.layout(ctx.lang.texts().map_heading),
        zones: counts.iter().map(|c| ZoneView::new(c, ctx.lang)).collect(),
    })
}

pub async fn routes_page(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<Html<String>, PageError> {
    let routes = state.routes.get_all().await.map_err(|e| ctx.error(e))?;
    let animals = state.animals.get_all().await.map_err(|e| ctx.error(e))?;

    ctx.render(&RoutesTemplate {
        layout: ctx.layout(ctx.lang.texts().routes_heading),
        routes: routes.iter().map(|r| RouteView::new(r, ctx.lang)).collect(),
        animals: AnimalCard::list(&animals, ctx.lang),
    })
}

pub async fn quiz_page(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<Html<String>, PageError> {
    let quizzes = state.quizzes.get_all().await.map_err(|e| ctx.error(e))?;
    let animals = state.animals.get_all().await.map_err(|e| ctx.error(e))?;

    let with_quizzes: Vec<Animal> = animals
        .iter()
        .filter(|a| quizzes.iter().any(|q| q.is_about(&a.id)))
        .cloned()
        .collect();
    tracing::info!(
        "Quiz page: {} quizzes across {} animals",
        quizzes.len(),
        with_quizzes.len()
    );

    ctx.render(&QuizTemplate {
        layout: ctx.layout(ctx.lang.texts().quiz_heading),
        total_quizzes: quizzes.len(),
        animals: AnimalCard::list(&with_quizzes, ctx.lang),
    })
}

pub async fn favorites_page(ctx: PageContext) -> Result<Html<String>, PageError> {
    ctx.render(&FavoritesTemplate {
        layout: ctx.layout(ctx.lang.texts().favorites_heading),
    })
}

pub async fn about_page(ctx: PageContext) -> Result<Html<String>, PageError> {
    ctx.render(&AboutTemplate {
        layout: ctx.layout(ctx.lang.texts().about_heading),
    })
}

pub async fn not_found_page(ctx: PageContext) -> PageError {
    ctx.error(PageErrorKind::NotFound)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageForm {
    #[serde(default)]
    pub culture: String,
    #[serde(default)]
    pub return_url: String,
}

/// Only same-site paths are followed after switching language
fn is_local_url(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\")
}

pub async fn set_language(Form(form): Form<LanguageForm>) -> impl IntoResponse {
    let lang = Lang::parse(&form.culture);
    tracing::info!("Switching language to {}", lang.culture());

    let cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        CULTURE_COOKIE,
        lang.culture(),
        CULTURE_COOKIE_MAX_AGE
    );
    let target = if is_local_url(&form.return_url) {
        form.return_url.as_str()
    } else {
        "/"
    };

    ([(header::SET_COOKIE, cookie)], Redirect::to(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConservationStatus;

    #[test]
    fn test_local_url_check() {
        assert!(is_local_url("/animals/lion-001"));
        assert!(is_local_url("/search?q=%E7%8D%85"));
        assert!(!is_local_url("https://evil.example"));
        assert!(!is_local_url("//evil.example"));
        assert!(!is_local_url("/\\evil.example"));
        assert!(!is_local_url(""));
    }

    #[test]
    fn test_filter_options_mark_selection() {
        let options = filter_options(Some(Diet::Herbivore), Lang::En);
        assert_eq!(options.len(), Diet::ALL.len());

        let selected: Vec<&str> = options.iter().filter(|o| o.selected).map(|o| o.value).collect();
        assert_eq!(selected, vec!["Herbivore"]);
    }

    #[test]
    fn test_card_uses_language_for_primary_name() {
        let animal = Animal::sample("lion-001", "非洲獅", "African Lion", "africa-zone");

        let zh = AnimalCard::new(&animal, Lang::ZhTw);
        assert_eq!((zh.name.as_str(), zh.alt_name.as_str()), ("非洲獅", "African Lion"));

        let en = AnimalCard::new(&animal, Lang::En);
        assert_eq!(en.name, "African Lion");
        assert_eq!(en.status_code, ConservationStatus::LC.as_str());
    }
}
