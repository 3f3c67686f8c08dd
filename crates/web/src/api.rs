//! JSON catalog API.
//!
//! The same page models the HTML handlers render, flattened into wire DTOs with OpenAPI schemas.

use crate::AppState;
use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::Json,
};
use clinic_core::content::ContentBlock;
use clinic_core::pages::{ListingPage, ProcedurePage};
use clinic_core::{
    Breadcrumb, CatalogNavigator, History, NavigationError, QueryParams, Selection, UrlUpdate,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

#[derive(OpenApi)]
#[openapi(
    paths(health, catalog_state, transition, procedure_content),
    components(schemas(
        HealthRes,
        SelectionDto,
        HistoryDto,
        UrlUpdateRes,
        CrumbRes,
        CardRes,
        CatalogStateRes,
        TransitionAction,
        TransitionReq,
        TransitionRes,
        SectionRes,
        GroupRes,
        ProcedureContentRes,
    ))
)]
pub struct ApiDoc;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectionDto {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory_slug: Option<String>,
}

impl From<&Selection> for SelectionDto {
    fn from(selection: &Selection) -> Self {
        Self {
            category: selection.category.clone(),
            subcategory_slug: selection.subcategory_slug.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDto {
    Push,
    Replace,
}

impl From<History> for HistoryDto {
    fn from(history: History) -> Self {
        match history {
            History::Push => HistoryDto::Push,
            History::Replace => HistoryDto::Replace,
        }
    }
}

/// A URL write for the client to apply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UrlUpdateRes {
    /// Full listing href, e.g. `/catalog?cat=...&step=2`.
    pub href: String,
    /// Query string without the leading `?`.
    pub query: String,
    pub history: HistoryDto,
}

impl From<&UrlUpdate> for UrlUpdateRes {
    fn from(update: &UrlUpdate) -> Self {
        Self {
            href: update.href(),
            query: update.params.to_query_string(),
            history: update.history.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CrumbRes {
    pub label: String,
    pub href: Option<String>,
    pub highlighted: bool,
}

fn crumbs(breadcrumb: Option<&Breadcrumb>) -> Vec<CrumbRes> {
    breadcrumb
        .map(|trail| {
            trail
                .crumbs
                .iter()
                .map(|crumb| CrumbRes {
                    label: crumb.label.clone(),
                    href: crumb.href.clone(),
                    highlighted: crumb.highlighted,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// One card of the current step: a category, a subcategory or a procedure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CardRes {
    /// Category label, subcategory slug or procedure slug.
    pub key: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogStateRes {
    pub step: u8,
    pub selection: SelectionDto,
    pub text: Option<String>,
    pub title: String,
    pub description: String,
    pub breadcrumb: Vec<CrumbRes>,
    pub back_href: Option<String>,
    pub cards: Vec<CardRes>,
    /// Step 3 with no matching procedures.
    pub empty_state: bool,
    /// Canonical URL when auto-resolution changed the requested selection.
    pub redirect: Option<UrlUpdateRes>,
}

impl From<&ListingPage> for CatalogStateRes {
    fn from(page: &ListingPage) -> Self {
        let categories = page.categories.iter().map(|card| CardRes {
            key: card.label.clone(),
            title: card.label.clone(),
            description: card.description.clone(),
            image: card.image.clone(),
            href: card.href.clone(),
        });
        let subcategories = page.subcategories.iter().map(|card| CardRes {
            key: card.slug.clone(),
            title: card.label.clone(),
            description: card.description.clone(),
            image: card.image.clone(),
            href: card.href.clone(),
        });
        let procedures = page.procedures.iter().map(|card| CardRes {
            key: card.slug.clone(),
            title: card.title.clone(),
            description: card.short_desc.clone(),
            image: card.image.clone(),
            href: card.href.clone(),
        });

        Self {
            step: page.step.number(),
            selection: SelectionDto::from(&page.selection),
            text: page.text.clone(),
            title: page.header.title.clone(),
            description: page.header.description.clone(),
            breadcrumb: crumbs(page.breadcrumb.as_ref()),
            back_href: page.back_href.clone(),
            // Only the current step's list is ever non-empty.
            cards: categories.chain(subcategories).chain(procedures).collect(),
            empty_state: page.is_empty_state(),
            redirect: page.redirect.as_ref().map(UrlUpdateRes::from),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionAction {
    SelectCategory { category: String },
    SelectSubcategory { slug: String },
    Back,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransitionReq {
    /// Selection currently in the URL.
    #[serde(default)]
    pub selection: SelectionDto,
    #[serde(default)]
    pub q: Option<String>,
    pub action: TransitionAction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransitionRes {
    pub step: u8,
    pub selection: SelectionDto,
    /// URL write to apply; absent when the transition changed nothing.
    pub url: Option<UrlUpdateRes>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct SectionRes {
    pub id: String,
    pub title: Option<String>,
    /// Title to show under the group heading; absent when it repeats the group title.
    pub display_title: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub blocks: Vec<ContentBlock>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct GroupRes {
    pub id: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub sections: Vec<SectionRes>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProcedureContentRes {
    pub slug: String,
    pub title: String,
    /// Which payload the content came from: `groups`, `doctor_sections`, `root_sections` or `none`.
    pub source: String,
    pub overview_bullets: Vec<String>,
    pub groups: Vec<GroupRes>,
}

impl From<&ProcedurePage> for ProcedureContentRes {
    fn from(page: &ProcedurePage) -> Self {
        let source = serde_json::to_value(page.content.source)
            .ok()
            .and_then(|value| value.as_str().map(str::to_owned))
            .unwrap_or_default();

        let groups = page
            .content
            .groups
            .iter()
            .map(|group| GroupRes {
                id: group.id.clone(),
                title: group.title.clone(),
                subtitle: group.subtitle.clone(),
                sections: group
                    .sections
                    .iter()
                    .map(|section| SectionRes {
                        id: section.id.clone(),
                        title: section.title.clone(),
                        display_title: group.display_title(section).map(str::to_owned),
                        blocks: section.blocks.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            slug: page.slug.clone(),
            title: page.title.clone(),
            source,
            overview_bullets: page.overview_bullets.clone(),
            groups,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: format!("{} is alive", state.config.site_name()),
    })
}

#[utoipa::path(
    get,
    path = "/api/catalog",
    params(
        ("cat" = Option<String>, Query, description = "Selected category label"),
        ("sub" = Option<String>, Query, description = "Selected subcategory slug"),
        ("q" = Option<String>, Query, description = "Free-text filter"),
    ),
    responses(
        (status = 200, description = "Listing state for the query", body = CatalogStateRes)
    )
)]
/// Listing state for a catalog URL.
///
/// The auto-resolution guard runs first; when it changes the selection `redirect` carries the
/// canonical URL and the rest of the response already describes the resolved state.
#[axum::debug_handler]
pub async fn catalog_state(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<CatalogStateRes> {
    let params = QueryParams::parse(query.as_deref().unwrap_or_default());
    let page = ListingPage::build(&state.catalog, &params);
    Json(CatalogStateRes::from(&page))
}

#[utoipa::path(
    post,
    path = "/api/catalog/transition",
    request_body = TransitionReq,
    responses(
        (status = 200, description = "New navigation state", body = TransitionRes),
        (status = 409, description = "Transition not allowed from the posted selection")
    )
)]
/// Apply one user transition to a posted selection.
///
/// The posted selection is synced through the auto-resolution guard before the action runs.
/// When the action itself writes nothing, a URL write from the guard is returned instead.
///
/// # Errors
/// Returns `409 Conflict` if:
/// - a subcategory is selected while no category is selected.
#[axum::debug_handler]
pub async fn transition(
    State(state): State<AppState>,
    Json(req): Json<TransitionReq>,
) -> Result<Json<TransitionRes>, (StatusCode, &'static str)> {
    let params = QueryParams {
        cat: req.selection.category,
        sub: req.selection.subcategory_slug,
        q: req.q,
        step: None,
    };

    let mut nav = CatalogNavigator::new(&state.catalog);
    let resolved = nav.sync_from_params(&params);

    let update = match req.action {
        TransitionAction::SelectCategory { category } => Some(nav.select_category(category)),
        TransitionAction::SelectSubcategory { slug } => {
            Some(nav.select_subcategory(slug).map_err(|err| match err {
                NavigationError::NoCategorySelected => {
                    tracing::debug!("{err}");
                    (
                        StatusCode::CONFLICT,
                        "a category must be selected before a subcategory",
                    )
                }
            })?)
        }
        TransitionAction::Back => nav.go_back(),
    };

    Ok(Json(TransitionRes {
        step: nav.step().number(),
        selection: SelectionDto::from(nav.selection()),
        url: update.or(resolved).as_ref().map(UrlUpdateRes::from),
    }))
}

#[utoipa::path(
    get,
    path = "/api/procedures/{slug}/content",
    params(
        ("slug" = String, Path, description = "Procedure slug")
    ),
    responses(
        (status = 200, description = "Normalised procedure content", body = ProcedureContentRes),
        (status = 404, description = "Unknown procedure")
    )
)]
/// Normalised content of one procedure.
///
/// # Errors
/// Returns `404 Not Found` if:
/// - no procedure has `slug`.
#[axum::debug_handler]
pub async fn procedure_content(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProcedureContentRes>, (StatusCode, &'static str)> {
    let page = ProcedurePage::build(&state.catalog, &slug, &QueryParams::default())
        .ok_or((StatusCode::NOT_FOUND, "procedure not found"))?;
    Ok(Json(ProcedureContentRes::from(&page)))
}
