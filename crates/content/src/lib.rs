//! Procedure detail content: wire decoding and normalisation.
//!
//! Procedure pages have accumulated several content representations over time. This crate
//! provides:
//! - the canonical renderer-facing model (`Section` made of `ContentBlock`s)
//! - the closed set of legacy chunk shapes (`LegacyChunk`) and their conversion rules
//! - lenient decoding of raw YAML payloads into those types, with a single structural tag check
//!   deciding between canonical and legacy shapes
//! - the normaliser, which picks exactly one content source per procedure and always yields
//!   canonical sections
//!
//! Decoding never fails a page: anything that cannot be understood is dropped and reported as a
//! [`ContentError`] diagnostic alongside the decoded value.

pub mod model;
pub mod normalize;
pub mod wire;

pub use model::{
    Card, ContentBlock, ContentGroup, DoctorContent, DoctorSections, LegacyChunk, ProcedureContent,
    Section, SpacerSize,
};
pub use normalize::{normalize, ContentSource, NormalizeContext, NormalizedContent, RenderGroup};
pub use wire::{decode_procedure_content, is_legacy_chunk_list, Decoded};

/// Diagnostics produced while decoding content payloads.
///
/// These never abort decoding; they describe what was dropped so that catalog tooling can
/// report it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("unsupported legacy chunk type {tag:?} at {path}")]
    UnsupportedChunk { path: String, tag: String },

    #[error("malformed {tag:?} chunk at {path}: {reason}")]
    MalformedChunk {
        path: String,
        tag: String,
        reason: String,
    },

    #[error("unknown block type {tag:?} at {path}")]
    UnknownBlock { path: String, tag: String },

    #[error("malformed block at {path}: {reason}")]
    MalformedBlock { path: String, reason: String },

    #[error("malformed section at {path}: {reason}")]
    MalformedSection { path: String, reason: String },

    #[error("malformed content group at {path}: {reason}")]
    MalformedGroup { path: String, reason: String },

    #[error("unrecognised content shape at {path}")]
    UnrecognisedShape { path: String },
}
