//! Static procedure catalog.
//!
//! The catalog is loaded once at startup from a YAML document and is read-only afterwards. It
//! owns three things:
//! - the fixed, ordered set of categories
//! - the subcategory slug ↔ label table
//! - the ordered list of procedures, each with its decoded (not yet normalised) content
//!
//! Subcategories of a category are never declared per category; they are computed by scanning
//! the procedures of that category.

use crate::error::{CatalogError, CatalogResult};
use crate::subcategories::{SubcategoryInfo, SubcategoryTable};
use crate::validation::validate_catalog;
use clinic_content::{
    decode_procedure_content, normalize, ContentError, NormalizeContext, NormalizedContent,
    ProcedureContent,
};
use clinic_types::{NonEmptyText, Slug};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.yaml");

// ============================================================================
// Public domain-level types
// ============================================================================

/// A top-level grouping of procedures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub label: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// An immutable catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Procedure {
    pub id: NonEmptyText,
    pub title: NonEmptyText,
    pub slug: Slug,
    pub category: String,
    /// Subcategory label, meaningful only relative to `category`.
    pub subcategory: Option<String>,
    pub short_desc: String,
    pub overview_bullets: Vec<String>,
    pub image: Option<String>,
    pub keywords: Vec<String>,
    pub kind: Option<String>,
    pub content: ProcedureContent,
}

impl Procedure {
    /// Normalised detail-page content for this procedure.
    pub fn normalized_content(&self) -> NormalizedContent {
        normalize(
            &self.content,
            NormalizeContext {
                base_key: self.id.as_str(),
                fallback_title: self.title.as_str(),
            },
        )
    }
}

/// Content diagnostics for one procedure, collected at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentReport {
    pub slug: String,
    pub issues: Vec<ContentError>,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    categories: Vec<CategoryInfo>,
    subcategories: SubcategoryTable,
    procedures: Vec<Procedure>,
    by_slug: HashMap<String, usize>,
    content_reports: Vec<ContentReport>,
}

impl Catalog {
    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Schema`] when the YAML does not match the catalog schema (the
    /// failing field path is included), or one of the validation errors when catalog invariants
    /// do not hold (duplicate ids or slugs, undeclared categories, ...).
    ///
    /// Content payloads are decoded leniently; anything dropped is available through
    /// [`Catalog::content_reports`].
    pub fn from_yaml_str(yaml_text: &str) -> CatalogResult<Self> {
        let wire: CatalogWire = parse_yaml_document("catalog", yaml_text)?;
        wire_to_domain(wire)
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let text = read_document(path)?;
        let catalog = Self::from_yaml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            procedures = catalog.procedures.len(),
            categories = catalog.categories.len(),
            "loaded procedure catalog"
        );
        Ok(catalog)
    }

    /// The catalog shipped with this crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Load `path` when given, otherwise the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> CatalogResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::info!("no catalog file found, using built-in catalog");
                Self::builtin()
            }
        }
    }

    /// All procedures in catalog order.
    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Procedure> {
        self.by_slug.get(slug).map(|&i| &self.procedures[i])
    }

    /// Every declared category, including those without procedures.
    pub fn declared_categories(&self) -> &[CategoryInfo] {
        &self.categories
    }

    /// Categories offered at the first step: declared order, only those with procedures.
    pub fn categories(&self) -> Vec<&CategoryInfo> {
        self.categories
            .iter()
            .filter(|c| self.procedures.iter().any(|p| p.category == c.label))
            .collect()
    }

    pub fn category(&self, label: &str) -> Option<&CategoryInfo> {
        self.categories.iter().find(|c| c.label == label)
    }

    /// Distinct subcategory labels among the procedures of `category`, first-seen order.
    pub fn subcategories_of(&self, category: &str) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for procedure in self.procedures.iter().filter(|p| p.category == category) {
            if let Some(label) = procedure.subcategory.as_deref() {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    /// Procedures of `category`, narrowed to `subcategory_label` when one is given.
    pub fn filter(&self, category: &str, subcategory_label: Option<&str>) -> Vec<&Procedure> {
        self.procedures
            .iter()
            .filter(|p| p.category == category)
            .filter(|p| match subcategory_label {
                Some(label) => p.subcategory.as_deref() == Some(label),
                None => true,
            })
            .collect()
    }

    pub fn subcategory_table(&self) -> &SubcategoryTable {
        &self.subcategories
    }

    /// Content decoding diagnostics, one report per procedure that had any.
    pub fn content_reports(&self) -> &[ContentReport] {
        &self.content_reports
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogWire {
    categories: Vec<CategoryWire>,
    #[serde(default)]
    subcategories: Vec<SubcategoryWire>,
    procedures: Vec<ProcedureWire>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryWire {
    label: NonEmptyText,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SubcategoryWire {
    slug: Slug,
    label: NonEmptyText,
    #[serde(default)]
    title: Option<String>,
    description: String,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProcedureWire {
    id: NonEmptyText,
    title: NonEmptyText,
    slug: Slug,
    category: NonEmptyText,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(alias = "shortDesc")]
    short_desc: String,
    #[serde(default, alias = "overviewBullets")]
    overview_bullets: Vec<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default, alias = "doctorContent")]
    doctor_content: Option<serde_yaml::Value>,
    #[serde(default)]
    sections: Option<serde_yaml::Value>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Deserialize a YAML document, reporting schema mismatches with the failing field path.
pub(crate) fn parse_yaml_document<T: DeserializeOwned>(
    document: &'static str,
    yaml_text: &str,
) -> CatalogResult<T> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

    match serde_path_to_error::deserialize::<_, T>(deserializer) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            Err(CatalogError::Schema {
                document,
                path: if path.is_empty() || path == "." {
                    "<root>".into()
                } else {
                    path
                },
                reason: source.to_string(),
            })
        }
    }
}

pub(crate) fn read_document(path: &Path) -> CatalogResult<String> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn wire_to_domain(wire: CatalogWire) -> CatalogResult<Catalog> {
    let categories: Vec<CategoryInfo> = wire
        .categories
        .into_iter()
        .map(|c| CategoryInfo {
            label: c.label.into_string(),
            description: c.description.filter(|d| !d.trim().is_empty()),
            image: c.image,
        })
        .collect();

    let subcategories = SubcategoryTable::new(
        wire.subcategories
            .into_iter()
            .map(|s| {
                let label = s.label.into_string();
                SubcategoryInfo {
                    title: s.title.unwrap_or_else(|| label.clone()),
                    slug: s.slug,
                    label,
                    description: s.description,
                    image: s.image,
                }
            })
            .collect(),
    );

    let mut content_reports = Vec::new();
    let procedures: Vec<Procedure> = wire
        .procedures
        .into_iter()
        .map(|p| {
            let decoded = decode_procedure_content(
                p.doctor_content.as_ref(),
                p.sections.as_ref(),
                p.slug.as_str(),
            );
            if !decoded.issues.is_empty() {
                for issue in &decoded.issues {
                    tracing::debug!(procedure = %p.slug, "{issue}");
                }
                content_reports.push(ContentReport {
                    slug: p.slug.to_string(),
                    issues: decoded.issues,
                });
            }

            Procedure {
                id: p.id,
                title: p.title,
                slug: p.slug,
                category: p.category.into_string(),
                subcategory: p.subcategory.filter(|s| !s.trim().is_empty()),
                short_desc: p.short_desc,
                overview_bullets: p.overview_bullets,
                image: p.image,
                keywords: p.keywords,
                kind: p.kind,
                content: decoded.value,
            }
        })
        .collect();

    validate_catalog(&categories, &subcategories, &procedures)?;

    let by_slug = procedures
        .iter()
        .enumerate()
        .map(|(i, p)| (p.slug.to_string(), i))
        .collect();

    Ok(Catalog {
        categories,
        subcategories,
        procedures,
        by_slug,
        content_reports,
    })
}
