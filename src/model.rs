//! Catalog data model
//!
//! Mirrors the wire format of the static catalog assets:
//! - index documents (root and per-library) with tagged entries,
//! - preset documents, inspected only for their node type and config,
//! - audio references in their four variants.
//!
//! All index data is immutable once parsed; loaded libraries are shared via
//! `Arc` so one library registered under two names (requested and canonical
//! spelling) is one object, not a copy.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One JSON index document (root or library-level).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogIndex {
    /// Display name of the catalog or library
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Entries in source-document order (meaningful for display)
    #[serde(default)]
    pub entries: Vec<IndexEntry>,
}

impl CatalogIndex {
    /// Sub-index entries, in document order.
    pub fn sub_indexes(&self) -> impl Iterator<Item = &SubIndexEntry> {
        self.entries.iter().filter_map(|e| match e {
            IndexEntry::Index(sub) => Some(sub),
            IndexEntry::Preset(_) => None,
        })
    }

    /// Preset entries, in document order.
    pub fn presets(&self) -> impl Iterator<Item = &PresetEntry> {
        self.entries.iter().filter_map(|e| match e {
            IndexEntry::Preset(p) => Some(p),
            IndexEntry::Index(_) => None,
        })
    }

    /// Whether this index has any sub-index children.
    pub fn has_sub_indexes(&self) -> bool {
        self.sub_indexes().next().is_some()
    }
}

/// One entry of an index document, discriminated by its `type` field.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum IndexEntry {
    /// Pointer to a nested index document
    #[serde(rename = "index")]
    Index(SubIndexEntry),
    /// Leaf referencing a fetchable preset document
    #[serde(rename = "preset")]
    Preset(PresetEntry),
}

/// Pointer to a nested index document (a library or grouping).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubIndexEntry {
    pub name: String,
    /// Path of the nested index document, relative to the owning index
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub preset_count: Option<u32>,
    #[serde(default)]
    pub instrument_count: Option<u32>,
}

/// Leaf catalog record pointing at a preset document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetEntry {
    pub name: String,
    /// Path of the preset document, relative to the owning library
    pub path: String,
    pub category: PresetCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    /// General MIDI program number, where applicable
    #[serde(default)]
    pub gm_program: Option<u32>,
    #[serde(default)]
    pub zone_count: Option<u32>,
}

/// Preset kind as declared in the catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Synth,
    Sampler,
    Effect,
    Composite,
}

/// A library's materialized index plus the URL prefix its relative paths
/// resolve against.
#[derive(Debug, Clone)]
pub struct LoadedLibrary {
    /// Canonical library name from the root listing (the enabled set and
    /// search results use this spelling, whatever alias loaded it)
    pub name: String,
    pub index: Arc<CatalogIndex>,
    pub base_url: String,
}

/// Listing entry for one available library, with its load/enable state.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryInfo {
    pub name: String,
    /// Relative path of the library index; empty for a flat (virtual) root
    pub path: String,
    pub description: Option<String>,
    pub preset_count: Option<u32>,
    pub loaded: bool,
    pub enabled: bool,
}

/// Fully fetched preset document.
///
/// The engine only inspects `node.type` (to detect samplers) and passes
/// `node.config` opaquely to the sampler zone decoder; everything else in
/// the document belongs to the synthesis engine.
#[derive(Debug, Clone, Deserialize)]
pub struct PresetDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    pub node: PresetNode,
}

/// Root node of a preset document.
#[derive(Debug, Clone, Deserialize)]
pub struct PresetNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

impl PresetDescriptor {
    /// Whether this preset declares a sampler configuration.
    pub fn is_sampler(&self) -> bool {
        self.node.kind == "sampler"
    }
}

/// Sampler configuration extracted from a preset's opaque config payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerConfig {
    #[serde(default)]
    pub zones: Vec<SamplerZone>,
}

/// One region of a sampled instrument's key/velocity range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerZone {
    /// Audio reference for this zone's sample data
    pub sample: AudioReference,
    #[serde(default)]
    pub root_key: Option<u8>,
    /// Inclusive [low, high] MIDI key range
    #[serde(default)]
    pub key_range: Option<(u8, u8)>,
    /// Inclusive [low, high] velocity range
    #[serde(default)]
    pub velocity_range: Option<(u8, u8)>,
}

/// Reference to sample audio, in one of four variants.
///
/// The wire format distinguishes variants by field shape, so deserialization
/// is untagged; variant order matters (`InlinePcm` before `InlineFile`, both
/// before the field-optional `External`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AudioReference {
    /// Base64 payload of raw little-endian f32 samples; bypasses the codec
    /// decoder entirely
    InlinePcm {
        data: String,
        #[serde(rename = "sampleRate")]
        sample_rate: u32,
    },
    /// Base64 payload of an encoded audio file, decoded locally
    InlineFile { data: String },
    /// Content-addressed sample under the catalog's `samples/` directory
    ContentAddressed { sha256: String, codec: String },
    /// File reference relative to the preset document (or catalog root)
    External {
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        sha256: Option<String>,
    },
}
