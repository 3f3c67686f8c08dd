//! Fixed slug ↔ label table for subcategories.
//!
//! Subcategories travel through URLs as slugs but procedures carry the display label. Lookups
//! degrade instead of failing: an unknown slug is treated as if it already were a label, and an
//! unknown label is used as its own slug.

use clinic_types::Slug;
use serde::Serialize;

/// One row of the subcategory table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubcategoryInfo {
    pub slug: Slug,
    pub label: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubcategoryTable {
    entries: Vec<SubcategoryInfo>,
}

impl SubcategoryTable {
    /// Build a table. Uniqueness of slugs and labels is checked by catalog validation.
    pub fn new(entries: Vec<SubcategoryInfo>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SubcategoryInfo] {
        &self.entries
    }

    pub fn by_slug(&self, slug: &str) -> Option<&SubcategoryInfo> {
        self.entries.iter().find(|e| e.slug.as_str() == slug)
    }

    pub fn by_label(&self, label: &str) -> Option<&SubcategoryInfo> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn label_for_slug(&self, slug: &str) -> Option<&str> {
        self.by_slug(slug).map(|e| e.label.as_str())
    }

    pub fn slug_for_label(&self, label: &str) -> Option<&str> {
        self.by_label(label).map(|e| e.slug.as_str())
    }

    /// Label for `slug`, or `slug` itself when the table has no entry.
    pub fn resolve_label(&self, slug: &str) -> String {
        match self.label_for_slug(slug) {
            Some(label) => label.to_owned(),
            None => {
                // Slugs arrive straight from request URLs.
                tracing::debug!(slug = %slug, "unresolved subcategory slug, using it as the label");
                slug.to_owned()
            }
        }
    }

    /// Slug for `label`, or `label` itself when the table has no entry.
    pub fn resolve_slug(&self, label: &str) -> String {
        self.slug_for_label(label)
            .map(str::to_owned)
            .unwrap_or_else(|| label.to_owned())
    }
}
