//! Catalog invariant checks.
//!
//! These run once after a catalog document has been decoded. Field-level shape problems are
//! reported earlier by the schema layer; this module only deals with relationships between
//! entries.

use crate::catalog::{CategoryInfo, Procedure};
use crate::subcategories::SubcategoryTable;
use crate::{CatalogError, CatalogResult};
use std::collections::HashSet;

/// Validates cross-entry invariants of a decoded catalog.
///
/// # Errors
///
/// Returns the first violation found:
/// - [`CatalogError::DuplicateCategory`] if a category label is declared twice
/// - [`CatalogError::DuplicateSubcategorySlug`] / [`CatalogError::DuplicateSubcategoryLabel`]
///   if the subcategory table is ambiguous
/// - [`CatalogError::DuplicateId`] / [`CatalogError::DuplicateSlug`] for repeated procedures
/// - [`CatalogError::UndeclaredCategory`] if a procedure names a category that is not declared
pub fn validate_catalog(
    categories: &[CategoryInfo],
    subcategories: &SubcategoryTable,
    procedures: &[Procedure],
) -> CatalogResult<()> {
    let mut labels = HashSet::new();
    for category in categories {
        if !labels.insert(category.label.as_str()) {
            return Err(CatalogError::DuplicateCategory(category.label.clone()));
        }
    }

    let mut sub_slugs = HashSet::new();
    let mut sub_labels = HashSet::new();
    for entry in subcategories.entries() {
        if !sub_slugs.insert(entry.slug.as_str()) {
            return Err(CatalogError::DuplicateSubcategorySlug(entry.slug.to_string()));
        }
        if !sub_labels.insert(entry.label.as_str()) {
            return Err(CatalogError::DuplicateSubcategoryLabel(entry.label.clone()));
        }
    }

    let mut ids = HashSet::new();
    let mut slugs = HashSet::new();
    for procedure in procedures {
        if !ids.insert(procedure.id.as_str()) {
            return Err(CatalogError::DuplicateId(procedure.id.to_string()));
        }
        if !slugs.insert(procedure.slug.as_str()) {
            return Err(CatalogError::DuplicateSlug(procedure.slug.to_string()));
        }
        if !labels.contains(procedure.category.as_str()) {
            return Err(CatalogError::UndeclaredCategory {
                procedure: procedure.slug.to_string(),
                category: procedure.category.clone(),
            });
        }
        if let Some(label) = procedure.subcategory.as_deref() {
            if subcategories.by_label(label).is_none() {
                tracing::warn!(
                    procedure = %procedure.slug,
                    subcategory = %label,
                    "subcategory label has no slug entry; it will travel through URLs as-is"
                );
            }
        }
    }

    Ok(())
}
