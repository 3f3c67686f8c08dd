//! Static site content: home, about and results pages.
//!
//! Loaded with the same strict YAML idiom as the catalog. The copy is opaque to the rest of the
//! crate; it is only handed to the renderer.

use crate::catalog::{parse_yaml_document, read_document};
use crate::CatalogResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_SITE: &str = include_str!("../data/site.yaml");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteContent {
    pub home: HomePage,
    pub about: AboutPage,
    pub results: ResultsPage,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomePage {
    pub headline: String,
    pub tagline: String,
    #[serde(default)]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub benefits: Vec<Benefit>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Benefit {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub bullets: Vec<BenefitBullet>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenefitBullet {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AboutPage {
    pub pre_title: String,
    pub title: String,
    pub intro: String,
    /// Doctor, mission and vision blocks, in page order.
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub pillars: Vec<Pillar>,
    #[serde(default)]
    pub timeline: Vec<Milestone>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub eyebrow: String,
    pub heading: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub label: String,
    pub value: String,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pillar {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Milestone {
    pub year: String,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultsPage {
    pub pre_title: String,
    pub title: String,
    pub intro: String,
    #[serde(default)]
    pub items: Vec<GalleryItem>,
}

/// One gallery photo. `height` is the nominal pixel height used for layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryItem {
    pub id: String,
    pub image: String,
    pub height: u32,
}

impl SiteContent {
    pub fn from_yaml_str(yaml_text: &str) -> CatalogResult<Self> {
        parse_yaml_document("site", yaml_text)
    }

    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = Self::from_yaml_str(&read_document(path)?)?;
        tracing::info!(path = %path.display(), "loaded site content");
        Ok(content)
    }

    pub fn builtin() -> CatalogResult<Self> {
        Self::from_yaml_str(BUILTIN_SITE)
    }

    pub fn load_or_builtin(path: Option<&Path>) -> CatalogResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }
}
