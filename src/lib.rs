//! # soundbank
//!
//! Progressive discovery, caching, and resolution of hierarchically
//! organized instrument preset catalogs served as static JSON/binary
//! assets:
//! - root and per-library index resolution with alias fallback
//! - bounded LRU caching of preset descriptors and decoded audio
//! - exact-filter and fuzzy ranked search over enabled libraries
//! - multi-variant audio reference resolution feeding a decode cache
//! - best-effort preloading of statically referenced presets
//!
//! The engine is a library consumed programmatically; it has no CLI, no
//! persisted state, and no wire protocol of its own. Construct one
//! [`Catalog`] per catalog endpoint:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use soundbank::{Catalog, HttpFetcher, SymphoniaDecoder};
//!
//! let catalog = Catalog::new(
//!     "https://presets.example.com/catalog",
//!     Arc::new(HttpFetcher::new()?),
//!     Arc::new(SymphoniaDecoder::new()),
//! );
//! catalog.load_root_index().await?;
//! catalog.enable_library("FluidR3_GM").await?;
//! let hits = catalog.fuzzy_search("grand piano", 20);
//! ```

pub mod audio;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod preload;
pub mod search;
pub mod urls;

pub use audio::{AudioBuffer, PcmDecoder, SampleResolver, SymphoniaDecoder};
pub use cache::BoundedCache;
pub use catalog::{Catalog, LoadedPreset};
pub use config::CatalogConfig;
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use model::{
    AudioReference, CatalogIndex, IndexEntry, LibraryInfo, LoadedLibrary, PresetCategory,
    PresetDescriptor, PresetEntry, SamplerConfig, SamplerZone, SubIndexEntry,
};
pub use preload::{PreloadFailure, PreloadReport};
pub use search::{FuzzyHit, SearchHit, SearchOptions};
