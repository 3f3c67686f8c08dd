//! # Clinic Core
//!
//! Catalog and navigation logic for the clinic website.
//!
//! This crate contains pure, synchronous data operations over a read-only catalog:
//! - Catalog loading and validation (YAML, strict schema)
//! - The subcategory slug ↔ label table
//! - The three-step navigation state machine and its URL query codec
//! - Breadcrumbs and page models for the listing and detail pages
//! - Static site content and runtime configuration
//!
//! **No HTTP concerns**: routing, templates and the JSON API belong in `clinic-web`.

pub mod breadcrumbs;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod navigation;
pub mod pages;
pub mod query;
pub mod site;
pub mod subcategories;
mod validation;

pub use breadcrumbs::{Breadcrumb, Crumb};
pub use catalog::{Catalog, CategoryInfo, ContentReport, Procedure};
pub use config::SiteConfig;
pub use error::{CatalogError, CatalogResult, NavigationError};
pub use navigation::{CatalogNavigator, History, Selection, Step, SubcategoryOption, UrlUpdate};
pub use pages::{ListingPage, ProcedurePage};
pub use query::QueryParams;
pub use site::SiteContent;
pub use subcategories::{SubcategoryInfo, SubcategoryTable};

// Re-exported so downstream crates can name content types without a direct dependency.
pub use clinic_content as content;
