//! Server-rendered HTML pages.

use crate::views::{
    AboutTemplate, HomeTemplate, Layout, ListingTemplate, NotFoundTemplate, ProcedureTemplate,
    ResultsTemplate,
};
use crate::{AppState, WebError};
use askama::Template;
use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use clinic_core::{ListingPage, ProcedurePage, QueryParams};

const NOT_FOUND_TITLE: &str = "Δεν βρέθηκε";
const NOT_FOUND_MESSAGE: &str = "Η σελίδα που αναζητάτε δεν βρέθηκε.";
const PROCEDURE_NOT_FOUND_MESSAGE: &str = "Η επέμβαση που αναζητάτε δεν βρέθηκε.";

fn render(template: &impl Template) -> Result<Html<String>, WebError> {
    Ok(Html(template.render()?))
}

fn layout(state: &AppState, page_title: impl Into<String>, active: &'static str) -> Layout {
    Layout::new(state.config.site_name(), page_title, active)
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    render(&HomeTemplate {
        layout: layout(&state, state.site.home.headline.clone(), "home"),
        home: &state.site.home,
    })
}

pub async fn about(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    render(&AboutTemplate {
        layout: layout(&state, state.site.about.title.clone(), "about"),
        about: &state.site.about,
    })
}

pub async fn results(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    render(&ResultsTemplate {
        layout: layout(&state, state.site.results.pre_title.clone(), "results"),
        results: &state.site.results,
    })
}

/// Catalog listing.
///
/// When the auto-resolution guard changes the selection the URL asked for, answer with a
/// 303 to the canonical URL instead of rendering, so the browser replaces the entry.
pub async fn catalog(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let params = QueryParams::parse(query.as_deref().unwrap_or_default());
    let page = ListingPage::build(&state.catalog, &params);

    if let Some(update) = &page.redirect {
        let href = update.href();
        tracing::debug!(to = %href, "redirecting to canonical catalog url");
        return Ok(Redirect::to(&href).into_response());
    }

    let template = ListingTemplate::new(layout(&state, page.header.title.clone(), "catalog"), &page);
    Ok(render(&template)?.into_response())
}

pub async fn procedure(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let params = QueryParams::parse(query.as_deref().unwrap_or_default());

    let Some(page) = ProcedurePage::build(&state.catalog, &slug, &params) else {
        tracing::debug!(slug = %slug, "unknown procedure");
        return not_found_page(&state, PROCEDURE_NOT_FOUND_MESSAGE);
    };

    let template = ProcedureTemplate::new(layout(&state, page.title.clone(), "catalog"), &page);
    Ok(render(&template)?.into_response())
}

pub async fn not_found(State(state): State<AppState>) -> Result<Response, WebError> {
    not_found_page(&state, NOT_FOUND_MESSAGE)
}

fn not_found_page(state: &AppState, message: &str) -> Result<Response, WebError> {
    let template = NotFoundTemplate {
        layout: layout(state, NOT_FOUND_TITLE, ""),
        message: message.to_owned(),
    };
    Ok((StatusCode::NOT_FOUND, render(&template)?).into_response())
}
