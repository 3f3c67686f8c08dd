//! Content normalisation: exactly one source wins, output is always canonical.
//!
//! Resolution order, first non-empty source wins and sources are never merged:
//! 1. `doctor_content.groups`
//! 2. `doctor_content.sections` (canonical, or legacy converted with the `doctor` base key)
//! 3. top-level legacy `sections` (converted with the `root` base key)
//! 4. nothing

use crate::model::{chunks_to_sections, ContentGroup, DoctorSections, ProcedureContent, Section};
use serde::Serialize;

/// Which payload produced the normalised content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Groups,
    DoctorSections,
    RootSections,
    None,
}

/// Procedure identity used for fallback titles and section ids.
#[derive(Clone, Copy, Debug)]
pub struct NormalizeContext<'a> {
    /// Procedure id (or slug), the prefix of generated section ids.
    pub base_key: &'a str,
    /// Title used when a legacy chunk has none (normally the procedure title).
    pub fallback_title: &'a str,
}

/// A titled run of sections as it will be rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderGroup {
    pub id: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub sections: Vec<Section>,
}

impl RenderGroup {
    /// Heading to show for `section` inside this group.
    ///
    /// Suppressed when it repeats the group heading directly above it.
    pub fn display_title<'s>(&self, section: &'s Section) -> Option<&'s str> {
        let title = section.title.as_deref()?;
        if self.title.as_deref() == Some(title) {
            return None;
        }
        Some(title)
    }
}

/// Normalised procedure content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedContent {
    pub source: ContentSource,
    pub groups: Vec<RenderGroup>,
}

impl NormalizedContent {
    fn empty() -> Self {
        Self {
            source: ContentSource::None,
            groups: Vec::new(),
        }
    }

    fn single(source: ContentSource, sections: Vec<Section>) -> Self {
        Self {
            source,
            groups: vec![RenderGroup {
                id: "content".into(),
                title: None,
                subtitle: None,
                sections,
            }],
        }
    }

    /// Flat, ordered list of every section on the page.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.groups.iter().flat_map(|group| group.sections.iter())
    }

    pub fn section_count(&self) -> usize {
        self.groups.iter().map(|group| group.sections.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.section_count() == 0
    }
}

/// Normalise every content source of a procedure into canonical sections.
pub fn normalize(content: &ProcedureContent, ctx: NormalizeContext<'_>) -> NormalizedContent {
    let doctor = content.doctor.as_ref();

    if let Some(groups) = doctor.map(|d| &d.groups).filter(|g| !g.is_empty()) {
        return NormalizedContent {
            source: ContentSource::Groups,
            groups: groups
                .iter()
                .enumerate()
                .map(|(index, group)| render_group(group, index))
                .filter(|group| !group.sections.is_empty())
                .collect(),
        };
    }

    let doctor_sections = match doctor.and_then(|d| d.sections.as_ref()) {
        Some(DoctorSections::Canonical(sections)) => sections.clone(),
        Some(DoctorSections::Legacy(chunks)) => chunks_to_sections(
            chunks,
            Some(ctx.fallback_title),
            &format!("{}-doctor", ctx.base_key),
        ),
        None => Vec::new(),
    };
    if !doctor_sections.is_empty() {
        return NormalizedContent::single(ContentSource::DoctorSections, doctor_sections);
    }

    let root_sections = chunks_to_sections(
        &content.root_sections,
        Some(ctx.fallback_title),
        &format!("{}-root", ctx.base_key),
    );
    if !root_sections.is_empty() {
        return NormalizedContent::single(ContentSource::RootSections, root_sections);
    }

    NormalizedContent::empty()
}

fn render_group(group: &ContentGroup, index: usize) -> RenderGroup {
    let title = group.display_title().map(str::to_owned);

    let sections = if !group.sections.is_empty() {
        group.sections.clone()
    } else {
        let base = group
            .id
            .clone()
            .unwrap_or_else(|| format!("group-{index}"));
        chunks_to_sections(&group.blocks, title.as_deref(), &base)
    };

    let id = group.id.clone().unwrap_or_else(|| {
        format!("{}-{index}", title.as_deref().unwrap_or("group"))
    });

    RenderGroup {
        id,
        title,
        subtitle: group.subtitle.clone(),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, ContentBlock, DoctorContent, LegacyChunk};

    const CTX: NormalizeContext<'static> = NormalizeContext {
        base_key: "face-lift",
        fallback_title: "Face Lift",
    };

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn canonical_section(id: &str, title: Option<&str>, blocks: usize) -> Section {
        Section {
            id: id.into(),
            title: title.map(str::to_owned),
            blocks: (0..blocks)
                .map(|i| ContentBlock::paragraph(format!("p{i}")))
                .collect(),
        }
    }

    fn text_chunk(items: &[&str]) -> LegacyChunk {
        LegacyChunk::Text {
            title: None,
            content: strings(items),
        }
    }

    #[test]
    fn canonical_groups_pass_through_unchanged() {
        let groups = vec![
            ContentGroup {
                id: Some("g1".into()),
                title: Some("Τι είναι".into()),
                sections: vec![
                    canonical_section("s1", Some("Τι είναι"), 2),
                    canonical_section("s2", None, 1),
                ],
                ..Default::default()
            },
            ContentGroup {
                id: Some("g2".into()),
                sections: vec![canonical_section("s3", Some("x"), 3)],
                ..Default::default()
            },
        ];
        let content = ProcedureContent {
            doctor: Some(DoctorContent {
                groups: groups.clone(),
                sections: None,
            }),
            root_sections: vec![],
        };

        let normalized = normalize(&content, CTX);
        assert_eq!(normalized.source, ContentSource::Groups);
        assert_eq!(normalized.groups.len(), 2);
        for (group, rendered) in groups.iter().zip(&normalized.groups) {
            assert_eq!(group.sections, rendered.sections);
        }

        // Normalising the output again keeps the same structure.
        let again = ProcedureContent {
            doctor: Some(DoctorContent {
                groups: normalized
                    .groups
                    .iter()
                    .map(|g| ContentGroup {
                        id: Some(g.id.clone()),
                        title: g.title.clone(),
                        subtitle: g.subtitle.clone(),
                        sections: g.sections.clone(),
                        ..Default::default()
                    })
                    .collect(),
                sections: None,
            }),
            root_sections: vec![],
        };
        let renormalized = normalize(&again, CTX);
        assert_eq!(renormalized.section_count(), normalized.section_count());
        let block_counts = |n: &NormalizedContent| {
            n.sections().map(|s| s.blocks.len()).collect::<Vec<_>>()
        };
        assert_eq!(block_counts(&renormalized), block_counts(&normalized));
    }

    #[test]
    fn groups_win_over_every_other_source() {
        let content = ProcedureContent {
            doctor: Some(DoctorContent {
                groups: vec![ContentGroup {
                    title: Some("G".into()),
                    blocks: vec![text_chunk(&["a"])],
                    ..Default::default()
                }],
                sections: Some(DoctorSections::Legacy(vec![text_chunk(&["b"])])),
            }),
            root_sections: vec![text_chunk(&["c"])],
        };
        let normalized = normalize(&content, CTX);
        assert_eq!(normalized.source, ContentSource::Groups);
        assert_eq!(normalized.section_count(), 1);
        let section = normalized.sections().next().unwrap();
        assert_eq!(section.id, "group-0-chunk-0-text");
        assert_eq!(section.title.as_deref(), Some("G"));
    }

    #[test]
    fn legacy_group_blocks_use_group_id_as_base() {
        let content = ProcedureContent {
            doctor: Some(DoctorContent {
                groups: vec![ContentGroup {
                    id: Some("recovery".into()),
                    heading: Some("Ανάρρωση".into()),
                    blocks: vec![LegacyChunk::CardGroup {
                        group_title: None,
                        cards: vec![
                            Card {
                                title: Some("Εβδομάδα 1".into()),
                                content: strings(&["a"]),
                            },
                            Card {
                                title: None,
                                content: strings(&["b"]),
                            },
                        ],
                    }],
                    ..Default::default()
                }],
                sections: None,
            }),
            root_sections: vec![],
        };
        let normalized = normalize(&content, CTX);
        let group = &normalized.groups[0];
        assert_eq!(group.id, "recovery");
        let ids: Vec<_> = group.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["recovery-chunk-0-card-0", "recovery-chunk-0-card-1"]);
        assert_eq!(group.display_title(&group.sections[0]), Some("Εβδομάδα 1"));
        // Card without its own title falls back to the group heading, which is then suppressed.
        assert_eq!(group.sections[1].title.as_deref(), Some("Ανάρρωση"));
        assert_eq!(group.display_title(&group.sections[1]), None);
    }

    #[test]
    fn empty_groups_are_dropped_without_falling_back() {
        let content = ProcedureContent {
            doctor: Some(DoctorContent {
                groups: vec![ContentGroup {
                    title: Some("Empty".into()),
                    ..Default::default()
                }],
                sections: Some(DoctorSections::Legacy(vec![text_chunk(&["b"])])),
            }),
            root_sections: vec![],
        };
        let normalized = normalize(&content, CTX);
        assert_eq!(normalized.source, ContentSource::Groups);
        assert!(normalized.is_empty());
        assert!(normalized.groups.is_empty());
    }

    #[test]
    fn unreadable_groups_still_win_over_doctor_sections() {
        let doctor: serde_yaml::Value = serde_yaml::from_str(
            r#"
groups: [42]
sections:
  - { type: text, content: [doctor-text] }
"#,
        )
        .expect("test yaml");
        let decoded = crate::wire::decode_procedure_content(Some(&doctor), None, "p");
        assert_eq!(decoded.issues.len(), 1);

        let normalized = normalize(&decoded.value, CTX);
        assert_eq!(normalized.source, ContentSource::Groups);
        assert!(normalized.is_empty());
    }

    #[test]
    fn doctor_legacy_sections_use_doctor_base_key() {
        let content = ProcedureContent {
            doctor: Some(DoctorContent {
                groups: vec![],
                sections: Some(DoctorSections::Legacy(vec![
                    text_chunk(&["a"]),
                    LegacyChunk::InfoBox {
                        title: Some("Σημαντικό".into()),
                        items: strings(&["x"]),
                    },
                ])),
            }),
            root_sections: vec![text_chunk(&["ignored"])],
        };
        let normalized = normalize(&content, CTX);
        assert_eq!(normalized.source, ContentSource::DoctorSections);
        let ids: Vec<_> = normalized.sections().map(|s| s.id.clone()).collect();
        assert_eq!(
            ids,
            ["face-lift-doctor-chunk-0-text", "face-lift-doctor-chunk-1-info"]
        );
        assert_eq!(
            normalized.sections().next().unwrap().title.as_deref(),
            Some("Face Lift")
        );
        assert_eq!(normalized.groups[0].title, None);
    }

    #[test]
    fn doctor_canonical_sections_are_used_as_is() {
        let sections = vec![canonical_section("a", Some("A"), 1)];
        let content = ProcedureContent {
            doctor: Some(DoctorContent {
                groups: vec![],
                sections: Some(DoctorSections::Canonical(sections.clone())),
            }),
            root_sections: vec![],
        };
        let normalized = normalize(&content, CTX);
        assert_eq!(normalized.source, ContentSource::DoctorSections);
        assert_eq!(normalized.groups[0].sections, sections);
    }

    #[test]
    fn empty_doctor_sections_fall_through_to_root() {
        let content = ProcedureContent {
            doctor: Some(DoctorContent {
                groups: vec![],
                sections: Some(DoctorSections::Legacy(vec![LegacyChunk::Unsupported {
                    tag: "video".into(),
                }])),
            }),
            root_sections: vec![text_chunk(&["root"])],
        };
        let normalized = normalize(&content, CTX);
        assert_eq!(normalized.source, ContentSource::RootSections);
        assert_eq!(
            normalized.sections().next().unwrap().id,
            "face-lift-root-chunk-0-text"
        );
    }

    #[test]
    fn no_content_yields_no_sections() {
        let normalized = normalize(&ProcedureContent::default(), CTX);
        assert_eq!(normalized.source, ContentSource::None);
        assert!(normalized.is_empty());
    }

    #[test]
    fn section_ids_are_unique_within_a_page() {
        let content = ProcedureContent {
            doctor: None,
            root_sections: vec![
                text_chunk(&["a"]),
                LegacyChunk::CardGroup {
                    group_title: Some("G".into()),
                    cards: vec![Card::default(), Card::default()],
                },
                text_chunk(&["b"]),
            ],
        };
        let normalized = normalize(&content, CTX);
        let mut ids: Vec<_> = normalized.sections().map(|s| s.id.clone()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 4);
    }
}
