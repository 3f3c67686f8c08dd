//! Lenient decoding of raw content payloads.
//!
//! Procedure data files carry content as untyped YAML. Decoding walks that YAML element by
//! element so that a single malformed chunk, block, section or group is dropped on its own
//! rather than failing the whole procedure. Every drop is recorded as a [`ContentError`].
//!
//! Shape detection between canonical sections and legacy chunks is a single structural check
//! ([`is_legacy_chunk_list`]): a non-empty list whose every element is a mapping with a string
//! `type` key is legacy. Nothing else is inferred from field names.

use crate::model::{
    Card, ContentBlock, ContentGroup, DoctorContent, DoctorSections, LegacyChunk, ProcedureContent,
    Section,
};
use crate::ContentError;
use serde::Deserialize;
use serde_yaml::Value;

/// A decoded value together with the diagnostics collected while decoding it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub issues: Vec<ContentError>,
}

/// Decode the `doctor_content` and top-level `sections` payloads of one procedure.
///
/// `path` is a human-readable prefix for diagnostics (for example the procedure slug).
pub fn decode_procedure_content(
    doctor_content: Option<&Value>,
    root_sections: Option<&Value>,
    path: &str,
) -> Decoded<ProcedureContent> {
    let mut issues = Vec::new();

    let doctor = doctor_content
        .filter(|v| !v.is_null())
        .and_then(|v| decode_doctor_content(v, &format!("{path}.doctor_content"), &mut issues));

    let root_path = format!("{path}.sections");
    let root_sections = match root_sections.filter(|v| !v.is_null()) {
        None => Vec::new(),
        Some(Value::Sequence(items)) if is_legacy_chunk_list(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_chunk(item, &format!("{root_path}[{i}]"), &mut issues))
            .collect(),
        Some(Value::Sequence(items)) if items.is_empty() => Vec::new(),
        Some(_) => {
            tracing::debug!(path = %root_path, "ignoring top-level sections that are not legacy chunks");
            issues.push(ContentError::UnrecognisedShape { path: root_path });
            Vec::new()
        }
    };

    Decoded {
        value: ProcedureContent {
            doctor,
            root_sections,
        },
        issues,
    }
}

/// Structural tag check deciding whether a list holds legacy chunks.
///
/// True when the list is non-empty and every element is a mapping whose `type` key is a
/// string. Canonical sections never carry a `type` key at section level.
pub fn is_legacy_chunk_list(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|item| type_tag(item).is_some())
}

fn type_tag(value: &Value) -> Option<&str> {
    value.as_mapping()?.get("type")?.as_str()
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Deserialize)]
struct DoctorContentWire {
    #[serde(default)]
    groups: Option<Vec<Value>>,
    #[serde(default)]
    sections: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct GroupWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    heading: Option<String>,
    #[serde(default)]
    sections: Option<Vec<Value>>,
    #[serde(default)]
    blocks: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct SectionWire {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    blocks: Vec<Value>,
}

#[derive(Deserialize)]
struct TextChunkWire {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Vec<String>,
}

#[derive(Deserialize)]
struct ItemsChunkWire {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    items: Vec<String>,
}

#[derive(Deserialize)]
struct CardGroupChunkWire {
    #[serde(default, rename = "groupTitle", alias = "group_title")]
    group_title: Option<String>,
    #[serde(default)]
    cards: Vec<Card>,
}

// ============================================================================
// Decoding helpers (internal)
// ============================================================================

fn decode_doctor_content(
    value: &Value,
    path: &str,
    issues: &mut Vec<ContentError>,
) -> Option<DoctorContent> {
    let wire: DoctorContentWire = match serde_yaml::from_value(value.clone()) {
        Ok(wire) => wire,
        Err(_) => {
            issues.push(ContentError::UnrecognisedShape {
                path: path.to_owned(),
            });
            return None;
        }
    };

    // An undecodable group still occupies its slot, so a non-empty `groups` list keeps
    // precedence over the other content sources even when nothing in it is readable.
    let groups = wire
        .groups
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, group)| {
            decode_group(group, &format!("{path}.groups[{i}]"), issues).unwrap_or_default()
        })
        .collect();

    let sections_path = format!("{path}.sections");
    let sections = wire.sections.map(|items| {
        if is_legacy_chunk_list(&items) {
            DoctorSections::Legacy(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| decode_chunk(item, &format!("{sections_path}[{i}]"), issues))
                    .collect(),
            )
        } else {
            DoctorSections::Canonical(decode_sections(&items, &sections_path, issues))
        }
    });

    Some(DoctorContent { groups, sections })
}

fn decode_group(
    value: &Value,
    path: &str,
    issues: &mut Vec<ContentError>,
) -> Option<ContentGroup> {
    let wire: GroupWire = match serde_yaml::from_value(value.clone()) {
        Ok(wire) => wire,
        Err(err) => {
            issues.push(ContentError::MalformedGroup {
                path: path.to_owned(),
                reason: err.to_string(),
            });
            return None;
        }
    };

    let sections = wire
        .sections
        .map(|items| decode_sections(&items, &format!("{path}.sections"), issues))
        .unwrap_or_default();
    let blocks = wire
        .blocks
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_chunk(item, &format!("{path}.blocks[{i}]"), issues))
                .collect()
        })
        .unwrap_or_default();

    Some(ContentGroup {
        id: wire.id,
        title: wire.title,
        subtitle: wire.subtitle,
        heading: wire.heading,
        sections,
        blocks,
    })
}

fn decode_sections(items: &[Value], path: &str, issues: &mut Vec<ContentError>) -> Vec<Section> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| decode_section(item, &format!("{path}[{i}]"), issues))
        .collect()
}

fn decode_section(value: &Value, path: &str, issues: &mut Vec<ContentError>) -> Option<Section> {
    let wire: SectionWire = match serde_yaml::from_value(value.clone()) {
        Ok(wire) => wire,
        Err(err) => {
            issues.push(ContentError::MalformedSection {
                path: path.to_owned(),
                reason: err.to_string(),
            });
            return None;
        }
    };

    let blocks = wire
        .blocks
        .iter()
        .enumerate()
        .filter_map(|(i, block)| decode_block(block, &format!("{path}.blocks[{i}]"), issues))
        .collect();

    Some(Section {
        id: wire.id,
        title: wire.title,
        blocks,
    })
}

fn decode_block(
    value: &Value,
    path: &str,
    issues: &mut Vec<ContentError>,
) -> Option<ContentBlock> {
    let Some(tag) = type_tag(value) else {
        issues.push(ContentError::MalformedBlock {
            path: path.to_owned(),
            reason: "missing string `type`".into(),
        });
        return None;
    };

    if !matches!(tag, "p" | "ul" | "ol" | "quote" | "spacer") {
        tracing::debug!(path = %path, tag = %tag, "dropping unknown content block");
        issues.push(ContentError::UnknownBlock {
            path: path.to_owned(),
            tag: tag.to_owned(),
        });
        return None;
    }

    match serde_yaml::from_value::<ContentBlock>(value.clone()) {
        Ok(block) => Some(block),
        Err(err) => {
            issues.push(ContentError::MalformedBlock {
                path: path.to_owned(),
                reason: err.to_string(),
            });
            None
        }
    }
}

fn decode_chunk(value: &Value, path: &str, issues: &mut Vec<ContentError>) -> LegacyChunk {
    let tag = type_tag(value).unwrap_or_default().to_owned();

    let decoded = match tag.as_str() {
        "text" => serde_yaml::from_value::<TextChunkWire>(value.clone()).map(|w| {
            LegacyChunk::Text {
                title: w.title,
                content: w.content,
            }
        }),
        "list" => {
            serde_yaml::from_value::<ItemsChunkWire>(value.clone()).map(|w| LegacyChunk::List {
                title: w.title,
                items: w.items,
            })
        }
        "cardGroup" => serde_yaml::from_value::<CardGroupChunkWire>(value.clone()).map(|w| {
            LegacyChunk::CardGroup {
                group_title: w.group_title,
                cards: w.cards,
            }
        }),
        "infoBox" => {
            serde_yaml::from_value::<ItemsChunkWire>(value.clone()).map(|w| LegacyChunk::InfoBox {
                title: w.title,
                items: w.items,
            })
        }
        _ => {
            issues.push(ContentError::UnsupportedChunk {
                path: path.to_owned(),
                tag: tag.clone(),
            });
            return LegacyChunk::Unsupported { tag };
        }
    };

    match decoded {
        Ok(chunk) => chunk,
        Err(err) => {
            issues.push(ContentError::MalformedChunk {
                path: path.to_owned(),
                tag: tag.clone(),
                reason: err.to_string(),
            });
            LegacyChunk::Unsupported { tag }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).expect("test yaml")
    }

    #[test]
    fn legacy_check_requires_type_on_every_element() {
        let legacy = yaml("[{type: text, content: [a]}, {type: list, items: [b]}]");
        let mixed = yaml("[{type: text, content: [a]}, {id: s1, blocks: []}]");
        let canonical = yaml("[{id: s1, title: T, blocks: [{type: p, text: x}]}]");
        let numeric_tag = yaml("[{type: 3}]");

        assert!(is_legacy_chunk_list(legacy.as_sequence().unwrap()));
        assert!(!is_legacy_chunk_list(mixed.as_sequence().unwrap()));
        assert!(!is_legacy_chunk_list(canonical.as_sequence().unwrap()));
        assert!(!is_legacy_chunk_list(numeric_tag.as_sequence().unwrap()));
        assert!(!is_legacy_chunk_list(&[]));
    }

    #[test]
    fn doctor_sections_detects_legacy_shape() {
        let doctor = yaml(
            r#"
sections:
  - type: cardGroup
    groupTitle: Στάδια
    cards:
      - title: Πριν
        content: [x]
  - type: infoBox
    items: [a, b]
"#,
        );
        let decoded = decode_procedure_content(Some(&doctor), None, "p");
        assert!(decoded.issues.is_empty());
        let doctor = decoded.value.doctor.expect("doctor content");
        match doctor.sections {
            Some(DoctorSections::Legacy(chunks)) => {
                assert_eq!(chunks.len(), 2);
                assert_eq!(chunks[0].tag(), "cardGroup");
                assert_eq!(chunks[1].tag(), "infoBox");
            }
            other => panic!("expected legacy sections, got {other:?}"),
        }
    }

    #[test]
    fn doctor_sections_detects_canonical_shape() {
        let doctor = yaml(
            r#"
sections:
  - id: intro
    title: Εισαγωγή
    blocks:
      - type: p
        text: hello
      - type: spacer
        size: lg
"#,
        );
        let decoded = decode_procedure_content(Some(&doctor), None, "p");
        match decoded.value.doctor.and_then(|d| d.sections) {
            Some(DoctorSections::Canonical(sections)) => {
                assert_eq!(sections.len(), 1);
                assert_eq!(sections[0].blocks.len(), 2);
            }
            other => panic!("expected canonical sections, got {other:?}"),
        }
    }

    #[test]
    fn unknown_chunk_type_decodes_as_unsupported() {
        let root = yaml("[{type: gallery, images: [a]}, {type: text, content: [b]}]");
        let decoded = decode_procedure_content(None, Some(&root), "p");
        assert_eq!(decoded.value.root_sections.len(), 2);
        assert_eq!(
            decoded.value.root_sections[0],
            LegacyChunk::Unsupported {
                tag: "gallery".into()
            }
        );
        assert_eq!(
            decoded.issues,
            vec![ContentError::UnsupportedChunk {
                path: "p.sections[0]".into(),
                tag: "gallery".into()
            }]
        );
    }

    #[test]
    fn malformed_known_chunk_is_reported_and_unsupported() {
        let root = yaml("[{type: list, items: not-a-list}]");
        let decoded = decode_procedure_content(None, Some(&root), "p");
        assert!(matches!(
            decoded.value.root_sections[0],
            LegacyChunk::Unsupported { .. }
        ));
        assert!(matches!(
            decoded.issues[0],
            ContentError::MalformedChunk { .. }
        ));
    }

    #[test]
    fn canonical_root_sections_are_ignored() {
        let root = yaml("[{id: s1, blocks: []}]");
        let decoded = decode_procedure_content(None, Some(&root), "p");
        assert!(decoded.value.root_sections.is_empty());
        assert_eq!(
            decoded.issues,
            vec![ContentError::UnrecognisedShape {
                path: "p.sections".into()
            }]
        );
    }

    #[test]
    fn unknown_blocks_are_dropped_individually() {
        let doctor = yaml(
            r#"
groups:
  - id: g1
    title: Group
    sections:
      - id: s1
        blocks:
          - type: p
            text: kept
          - type: image
            meta: {src: x}
          - type: ul
            items: [a]
"#,
        );
        let decoded = decode_procedure_content(Some(&doctor), None, "p");
        let groups = decoded.value.doctor.unwrap().groups;
        assert_eq!(groups[0].sections[0].blocks.len(), 2);
        assert_eq!(
            decoded.issues,
            vec![ContentError::UnknownBlock {
                path: "p.doctor_content.groups[0].sections[0].blocks[1]".into(),
                tag: "image".into()
            }]
        );
    }

    #[test]
    fn group_with_legacy_blocks_is_decoded() {
        let doctor = yaml(
            r#"
groups:
  - heading: Ανάρρωση
    blocks:
      - type: text
        content: [a, b]
"#,
        );
        let decoded = decode_procedure_content(Some(&doctor), None, "p");
        let group = &decoded.value.doctor.unwrap().groups[0];
        assert_eq!(group.display_title(), Some("Ανάρρωση"));
        assert!(group.sections.is_empty());
        assert_eq!(group.blocks.len(), 1);
    }

    #[test]
    fn card_group_accepts_snake_case_alias() {
        let root = yaml("[{type: cardGroup, group_title: G, cards: [{content: [a]}]}]");
        let decoded = decode_procedure_content(None, Some(&root), "p");
        match &decoded.value.root_sections[0] {
            LegacyChunk::CardGroup { group_title, cards } => {
                assert_eq!(group_title.as_deref(), Some("G"));
                assert_eq!(cards.len(), 1);
            }
            other => panic!("expected card group, got {other:?}"),
        }
    }
}
