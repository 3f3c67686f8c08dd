//! askama templates and the small view models they render.

use askama::Template;
use clinic_core::content::{ContentBlock, NormalizedContent};
use clinic_core::site::{AboutPage, HomePage, ResultsPage};
use clinic_core::{CatalogNavigator, ListingPage, ProcedurePage};

/// Shared page chrome.
pub struct Layout {
    pub site_name: String,
    pub page_title: String,
    /// Navbar entry to highlight.
    pub active: &'static str,
    /// Entry link into the catalog funnel (a normal, pushed navigation).
    pub catalog_href: String,
}

impl Layout {
    pub fn new(site_name: &str, page_title: impl Into<String>, active: &'static str) -> Self {
        Self {
            site_name: site_name.to_owned(),
            page_title: page_title.into(),
            active,
            catalog_href: CatalogNavigator::entry_update().href(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub layout: Layout,
    pub home: &'a HomePage,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate<'a> {
    pub layout: Layout,
    pub about: &'a AboutPage,
}

#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate<'a> {
    pub layout: Layout,
    pub results: &'a ResultsPage,
}

#[derive(Template)]
#[template(path = "catalog.html")]
pub struct ListingTemplate<'a> {
    pub layout: Layout,
    pub page: &'a ListingPage,
    pub step: u8,
    pub empty_state: bool,
}

impl<'a> ListingTemplate<'a> {
    pub fn new(layout: Layout, page: &'a ListingPage) -> Self {
        Self {
            layout,
            step: page.step.number(),
            empty_state: page.is_empty_state(),
            page,
        }
    }
}

#[derive(Template)]
#[template(path = "procedure.html")]
pub struct ProcedureTemplate<'a> {
    pub layout: Layout,
    pub page: &'a ProcedurePage,
    pub groups: Vec<GroupView>,
}

impl<'a> ProcedureTemplate<'a> {
    pub fn new(layout: Layout, page: &'a ProcedurePage) -> Self {
        Self {
            layout,
            groups: group_views(&page.content),
            page,
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
    pub message: String,
}

// ============================================================================
// Content view models
// ============================================================================

pub struct GroupView {
    pub id: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub sections: Vec<SectionView>,
}

pub struct SectionView {
    pub id: String,
    /// Already suppressed when it repeats the group title.
    pub title: Option<String>,
    pub blocks: Vec<BlockView>,
}

/// Flattened block: `kind` is the wire tag, the other fields are filled per kind.
pub struct BlockView {
    pub kind: &'static str,
    pub text: String,
    pub items: Vec<String>,
    pub size: &'static str,
}

impl From<&ContentBlock> for BlockView {
    fn from(block: &ContentBlock) -> Self {
        let mut view = BlockView {
            kind: block.tag(),
            text: String::new(),
            items: Vec::new(),
            size: "",
        };
        match block {
            ContentBlock::Paragraph { text } | ContentBlock::Quote { text } => {
                view.text = text.clone();
            }
            ContentBlock::UnorderedList { items } | ContentBlock::OrderedList { items } => {
                view.items = items.clone();
            }
            ContentBlock::Spacer { size } => view.size = size.as_str(),
        }
        view
    }
}

pub fn group_views(content: &NormalizedContent) -> Vec<GroupView> {
    content
        .groups
        .iter()
        .map(|group| GroupView {
            id: group.id.clone(),
            title: group.title.clone(),
            subtitle: group.subtitle.clone(),
            sections: group
                .sections
                .iter()
                .map(|section| SectionView {
                    id: section.id.clone(),
                    title: group.display_title(section).map(str::to_owned),
                    blocks: section.blocks.iter().map(BlockView::from).collect(),
                })
                .collect(),
        })
        .collect()
}
