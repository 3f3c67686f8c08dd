//! Domain-level content types.
//!
//! `Section` and `ContentBlock` are the canonical shape consumed by renderers. `LegacyChunk`
//! is the closed set of older shapes still present in procedure data; each variant converts
//! into canonical sections through [`LegacyChunk::to_sections`].

use serde::{Deserialize, Serialize};

// ============================================================================
// Canonical shape
// ============================================================================

/// Vertical spacing hint for [`ContentBlock::Spacer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacerSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl SpacerSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpacerSize::Sm => "sm",
            SpacerSize::Md => "md",
            SpacerSize::Lg => "lg",
        }
    }
}

/// A single renderable content block.
///
/// Wire tags follow the HTML element they render to (`p`, `ul`, `ol`), plus `quote` and
/// `spacer`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "p")]
    Paragraph { text: String },
    #[serde(rename = "ul")]
    UnorderedList { items: Vec<String> },
    #[serde(rename = "ol")]
    OrderedList { items: Vec<String> },
    #[serde(rename = "quote")]
    Quote { text: String },
    #[serde(rename = "spacer")]
    Spacer {
        #[serde(default)]
        size: SpacerSize,
    },
}

impl ContentBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ContentBlock::Paragraph { .. } => "p",
            ContentBlock::UnorderedList { .. } => "ul",
            ContentBlock::OrderedList { .. } => "ol",
            ContentBlock::Quote { .. } => "quote",
            ContentBlock::Spacer { .. } => "spacer",
        }
    }
}

/// Canonical content section: an optional heading over an ordered list of blocks.
///
/// `id` is unique within a rendered page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

// ============================================================================
// Legacy shape
// ============================================================================

/// One card inside a legacy `cardGroup` chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Vec<String>,
}

/// Pre-refactor content chunk.
///
/// `Unsupported` stands for anything carrying a `type` tag that could not be decoded into one of
/// the four known variants. It converts to no sections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LegacyChunk {
    Text {
        title: Option<String>,
        content: Vec<String>,
    },
    List {
        title: Option<String>,
        items: Vec<String>,
    },
    CardGroup {
        group_title: Option<String>,
        cards: Vec<Card>,
    },
    InfoBox {
        title: Option<String>,
        items: Vec<String>,
    },
    Unsupported {
        tag: String,
    },
}

impl LegacyChunk {
    /// Wire tag of this chunk.
    pub fn tag(&self) -> &str {
        match self {
            LegacyChunk::Text { .. } => "text",
            LegacyChunk::List { .. } => "list",
            LegacyChunk::CardGroup { .. } => "cardGroup",
            LegacyChunk::InfoBox { .. } => "infoBox",
            LegacyChunk::Unsupported { tag } => tag,
        }
    }

    /// Convert this chunk into canonical sections.
    ///
    /// `key` is the per-chunk identifier (`<base>-chunk-<index>`); section ids append `-text`,
    /// `-list`, `-card-<n>` or `-info`. `fallback_title` is used when the chunk carries no
    /// title of its own.
    ///
    /// Empty `text`, `list` and `infoBox` chunks produce nothing. A `cardGroup` always produces
    /// exactly one section per card.
    pub fn to_sections(&self, fallback_title: Option<&str>, key: &str) -> Vec<Section> {
        let or_fallback =
            |own: &Option<String>| own.clone().or_else(|| fallback_title.map(str::to_owned));

        match self {
            LegacyChunk::Text { title, content } => {
                if content.is_empty() {
                    return Vec::new();
                }
                vec![Section {
                    id: format!("{key}-text"),
                    title: or_fallback(title),
                    blocks: content.iter().map(ContentBlock::paragraph).collect(),
                }]
            }
            LegacyChunk::List { title, items } => {
                if items.is_empty() {
                    return Vec::new();
                }
                vec![Section {
                    id: format!("{key}-list"),
                    title: or_fallback(title),
                    blocks: vec![ContentBlock::UnorderedList {
                        items: items.clone(),
                    }],
                }]
            }
            LegacyChunk::CardGroup { group_title, cards } => {
                let group_fallback = or_fallback(group_title);
                cards
                    .iter()
                    .enumerate()
                    .map(|(n, card)| Section {
                        id: format!("{key}-card-{n}"),
                        title: card.title.clone().or_else(|| group_fallback.clone()),
                        blocks: card.content.iter().map(ContentBlock::paragraph).collect(),
                    })
                    .collect()
            }
            LegacyChunk::InfoBox { title, items } => {
                if items.is_empty() {
                    return Vec::new();
                }
                vec![Section {
                    id: format!("{key}-info"),
                    title: or_fallback(title),
                    blocks: vec![ContentBlock::UnorderedList {
                        items: items.clone(),
                    }],
                }]
            }
            LegacyChunk::Unsupported { tag } => {
                tracing::debug!(chunk = %key, tag = %tag, "dropping unsupported legacy chunk");
                Vec::new()
            }
        }
    }
}

/// Convert an ordered list of chunks, keying each one as `<base>-chunk-<index>`.
pub fn chunks_to_sections(
    chunks: &[LegacyChunk],
    fallback_title: Option<&str>,
    base: &str,
) -> Vec<Section> {
    chunks
        .iter()
        .enumerate()
        .flat_map(|(index, chunk)| {
            chunk.to_sections(fallback_title, &format!("{base}-chunk-{index}"))
        })
        .collect()
}

// ============================================================================
// Procedure payloads
// ============================================================================

/// A titled group of sections on a procedure page.
///
/// A group carries either canonical `sections` or legacy `blocks`; when both are present the
/// canonical sections win.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentGroup {
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub heading: Option<String>,
    pub sections: Vec<Section>,
    pub blocks: Vec<LegacyChunk>,
}

impl ContentGroup {
    /// Heading shown above the group: `title`, else `heading`.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.heading.as_deref())
    }
}

/// `doctor_content.sections`, after the structural shape check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DoctorSections {
    Canonical(Vec<Section>),
    Legacy(Vec<LegacyChunk>),
}

impl DoctorSections {
    pub fn is_empty(&self) -> bool {
        match self {
            DoctorSections::Canonical(sections) => sections.is_empty(),
            DoctorSections::Legacy(chunks) => chunks.is_empty(),
        }
    }
}

/// The `doctor_content` payload of a procedure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoctorContent {
    pub groups: Vec<ContentGroup>,
    pub sections: Option<DoctorSections>,
}

/// Every content source a procedure may carry, decoded but not yet normalised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcedureContent {
    pub doctor: Option<DoctorContent>,
    /// Top-level `sections`, kept only when legacy-shaped.
    pub root_sections: Vec<LegacyChunk>,
}
