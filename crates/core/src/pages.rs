//! Page models for the catalog listing and procedure detail pages.
//!
//! These are plain data: everything a renderer needs, already resolved against the catalog.
//! Both the HTML templates and the JSON API are built from them.

use crate::breadcrumbs::{listing_breadcrumb, procedure_breadcrumb, Breadcrumb};
use crate::catalog::{Catalog, Procedure};
use crate::constants::{
    CATALOG_DEFAULT_DESCRIPTION, CATALOG_ROOT_LABEL, CATEGORY_FALLBACK_DESCRIPTION, CONTACT_HREF,
    CONTACT_LABEL, CONTACT_TEXT, CONTACT_TITLE,
};
use crate::navigation::{CatalogNavigator, Selection, Step, UrlUpdate};
use crate::query::{back_href, procedure_href, QueryParams};
use clinic_content::NormalizedContent;
use serde::Serialize;

// ============================================================================
// Listing page
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageHeader {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCard {
    pub label: String,
    pub description: String,
    pub image: Option<String>,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubcategoryCard {
    pub slug: String,
    pub label: String,
    pub description: String,
    pub image: Option<String>,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcedureCard {
    pub slug: String,
    pub title: String,
    pub short_desc: String,
    pub image: Option<String>,
    pub href: String,
}

impl ProcedureCard {
    fn new(procedure: &Procedure, params: &QueryParams) -> Self {
        Self {
            slug: procedure.slug.to_string(),
            title: procedure.title.to_string(),
            short_desc: procedure.short_desc.clone(),
            image: procedure.image.clone(),
            href: procedure_href(procedure.slug.as_str(), params),
        }
    }
}

/// The catalog listing at whatever step the URL resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListingPage {
    pub step: Step,
    pub selection: Selection,
    pub text: Option<String>,
    pub header: PageHeader,
    pub breadcrumb: Option<Breadcrumb>,
    /// Target of the back control; present once a category is selected.
    pub back_href: Option<String>,
    pub categories: Vec<CategoryCard>,
    pub subcategories: Vec<SubcategoryCard>,
    pub procedures: Vec<ProcedureCard>,
    /// Set when auto-resolution changed the selection the URL asked for. The caller should
    /// replace the current URL with this one.
    pub redirect: Option<UrlUpdate>,
}

impl ListingPage {
    pub fn build(catalog: &Catalog, params: &QueryParams) -> Self {
        let mut nav = CatalogNavigator::new(catalog);
        let redirect = nav.sync_from_params(params);
        let step = nav.step();

        let categories = match step {
            Step::Category => catalog
                .categories()
                .into_iter()
                .map(|category| {
                    let mut next = nav.clone();
                    CategoryCard {
                        label: category.label.clone(),
                        description: category
                            .description
                            .clone()
                            .unwrap_or_else(|| CATEGORY_FALLBACK_DESCRIPTION.to_owned()),
                        image: category.image.clone(),
                        href: next.select_category(category.label.clone()).href(),
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        let subcategories = match step {
            Step::Subcategory => nav
                .subcategory_options()
                .into_iter()
                .filter_map(|option| {
                    let mut next = nav.clone();
                    let href = next.select_subcategory(option.slug.clone()).ok()?.href();
                    Some(SubcategoryCard {
                        slug: option.slug,
                        label: option.label,
                        description: option.description,
                        image: option.image,
                        href,
                    })
                })
                .collect(),
            _ => Vec::new(),
        };

        let card_params = QueryParams {
            step: None,
            ..nav.current_params()
        };
        let procedures = nav
            .procedures()
            .into_iter()
            .map(|procedure| ProcedureCard::new(procedure, &card_params))
            .collect();

        let back_href = {
            let mut back = nav.clone();
            back.go_back().map(|update| update.href())
        };

        Self {
            step,
            selection: nav.selection().clone(),
            text: nav.text().map(str::to_owned),
            header: listing_header(&nav),
            breadcrumb: listing_breadcrumb(&nav),
            back_href,
            categories,
            subcategories,
            procedures,
            redirect,
        }
    }

    /// Step 3 with nothing to show.
    pub fn is_empty_state(&self) -> bool {
        self.step == Step::Procedures && self.procedures.is_empty()
    }
}

fn listing_header(nav: &CatalogNavigator<'_>) -> PageHeader {
    let catalog = nav.catalog();

    if let Some(info) = nav
        .subcategory_slug()
        .and_then(|slug| catalog.subcategory_table().by_slug(slug))
    {
        return PageHeader {
            title: info.title.clone(),
            description: info.description.clone(),
        };
    }

    match nav.category() {
        Some(label) => PageHeader {
            title: label.to_owned(),
            description: catalog
                .category(label)
                .and_then(|c| c.description.clone())
                .unwrap_or_else(|| CATALOG_DEFAULT_DESCRIPTION.to_owned()),
        },
        None => PageHeader {
            title: CATALOG_ROOT_LABEL.to_owned(),
            description: CATALOG_DEFAULT_DESCRIPTION.to_owned(),
        },
    }
}

// ============================================================================
// Procedure page
// ============================================================================

/// Fixed block closing every procedure page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactPrompt {
    pub title: &'static str,
    pub text: &'static str,
    pub label: &'static str,
    pub href: &'static str,
}

impl Default for ContactPrompt {
    fn default() -> Self {
        Self {
            title: CONTACT_TITLE,
            text: CONTACT_TEXT,
            label: CONTACT_LABEL,
            href: CONTACT_HREF,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcedurePage {
    pub slug: String,
    pub title: String,
    pub short_desc: String,
    pub image: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub overview_bullets: Vec<String>,
    pub content: NormalizedContent,
    pub breadcrumb: Option<Breadcrumb>,
    pub back_href: String,
    pub contact: ContactPrompt,
}

impl ProcedurePage {
    /// `None` when no procedure has `slug`.
    pub fn build(catalog: &Catalog, slug: &str, params: &QueryParams) -> Option<Self> {
        let procedure = catalog.by_slug(slug)?;

        Some(Self {
            slug: procedure.slug.to_string(),
            title: procedure.title.to_string(),
            short_desc: procedure.short_desc.clone(),
            image: procedure.image.clone(),
            category: procedure.category.clone(),
            subcategory: procedure.subcategory.clone(),
            overview_bullets: procedure.overview_bullets.clone(),
            content: procedure.normalized_content(),
            breadcrumb: procedure_breadcrumb(catalog, procedure, params),
            back_href: back_href(params),
            contact: ContactPrompt::default(),
        })
    }
}
