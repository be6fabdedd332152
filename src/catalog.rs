//! Catalog engine: index resolution, library aliasing, descriptor loading
//!
//! One [`Catalog`] instance owns the state for one catalog endpoint: the
//! memoized root index, the loaded-library registry, the enabled-library
//! order, the descriptor cache, and the audio resolver. There are no ambient
//! globals; construct one instance per endpoint.
//!
//! Locking discipline: catalog state sits behind `std::sync` locks that are
//! never held across an await. Load paths follow check / fetch / re-check /
//! insert, so concurrent duplicate loads resolve to a single registration.

use crate::audio::{PcmDecoder, SampleResolver};
use crate::cache::BoundedCache;
use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use crate::fetch::{fetch_json, Fetcher};
use crate::model::{
    CatalogIndex, LibraryInfo, LoadedLibrary, PresetDescriptor, PresetEntry, SubIndexEntry,
};
use crate::urls;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// A fetched preset descriptor together with the URL it was fetched from.
///
/// The URL is what external audio references inside the descriptor resolve
/// against, so the two travel together.
#[derive(Debug, Clone)]
pub struct LoadedPreset {
    pub descriptor: Arc<PresetDescriptor>,
    pub url: String,
}

#[derive(Default)]
struct CatalogState {
    /// Root index, loaded at most once
    root: Option<Arc<CatalogIndex>>,
    /// Libraries by lookup name; one library may sit under several aliases.
    /// Entries are never removed once created.
    loaded: HashMap<String, Arc<LoadedLibrary>>,
    /// Canonical names in enable order; governs search candidate ordering
    enabled: Vec<String>,
}

impl CatalogState {
    fn is_enabled(&self, name: &str) -> bool {
        self.enabled.iter().any(|n| n == name)
    }
}

/// Catalog engine for one endpoint serving static index/preset assets.
pub struct Catalog {
    base_url: String,
    fetcher: Arc<dyn Fetcher>,
    state: RwLock<CatalogState>,
    /// Coalesces concurrent first-time root loads into one fetch
    root_gate: tokio::sync::Mutex<()>,
    descriptors: Mutex<BoundedCache<String, Arc<PresetDescriptor>>>,
    samples: SampleResolver,
}

impl Catalog {
    /// Create an engine with default cache capacities.
    pub fn new(
        base_url: impl Into<String>,
        fetcher: Arc<dyn Fetcher>,
        decoder: Arc<dyn PcmDecoder>,
    ) -> Self {
        Self::with_config(base_url, CatalogConfig::default(), fetcher, decoder)
    }

    pub fn with_config(
        base_url: impl Into<String>,
        config: CatalogConfig,
        fetcher: Arc<dyn Fetcher>,
        decoder: Arc<dyn PcmDecoder>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            samples: SampleResolver::new(
                base_url.clone(),
                Arc::clone(&fetcher),
                decoder,
                config.audio_cache_size,
            ),
            descriptors: Mutex::new(BoundedCache::new(config.descriptor_cache_size)),
            state: RwLock::new(CatalogState::default()),
            root_gate: tokio::sync::Mutex::new(()),
            base_url,
            fetcher,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Audio reference resolver sharing this catalog's fetcher and root URL.
    pub fn samples(&self) -> &SampleResolver {
        &self.samples
    }

    /// Fetch `{base_url}/index.json` exactly once; later calls return the
    /// memoized index without a network call. No retry on failure.
    pub async fn load_root_index(&self) -> Result<Arc<CatalogIndex>> {
        if let Some(root) = self.state.read().unwrap().root.clone() {
            return Ok(root);
        }

        let _guard = self.root_gate.lock().await;
        // A concurrent first call may have finished while we waited
        if let Some(root) = self.state.read().unwrap().root.clone() {
            return Ok(root);
        }

        let url = urls::join(&self.base_url, "index.json");
        tracing::info!(url = %url, "loading root catalog index");
        let index: CatalogIndex = fetch_json(self.fetcher.as_ref(), &url).await?;
        tracing::debug!(
            name = %index.name,
            entries = index.entries.len(),
            "root catalog index loaded"
        );

        let index = Arc::new(index);
        self.state.write().unwrap().root = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Libraries the root index makes available, with load/enable state.
    ///
    /// Returns empty until the root index is loaded. A flat root (presets
    /// but no sub-indexes) is presented as a single virtual library named
    /// after the root index itself.
    pub fn available_libraries(&self) -> Vec<LibraryInfo> {
        let state = self.state.read().unwrap();
        let Some(root) = state.root.as_ref() else {
            return Vec::new();
        };

        if root.has_sub_indexes() {
            root.sub_indexes()
                .map(|sub| LibraryInfo {
                    name: sub.name.clone(),
                    path: sub.path.clone(),
                    description: sub.description.clone(),
                    preset_count: sub.preset_count,
                    loaded: state.loaded.contains_key(&sub.name),
                    enabled: state.is_enabled(&sub.name),
                })
                .collect()
        } else if root.presets().next().is_some() {
            vec![LibraryInfo {
                name: root.name.clone(),
                path: String::new(),
                description: root.description.clone(),
                preset_count: Some(root.presets().count() as u32),
                loaded: state.loaded.contains_key(&root.name),
                enabled: state.is_enabled(&root.name),
            }]
        } else {
            Vec::new()
        }
    }

    /// Load a library's index document, memoized per name.
    ///
    /// Name resolution falls back through three tiers: exact entry name,
    /// case-insensitive with underscores treated as spaces ("FluidR3_GM" vs
    /// "FluidR3 GM"), then a directory-prefix match on the entry path. The
    /// result registers under both the requested and canonical names so a
    /// later lookup by either spelling hits.
    pub async fn load_library(&self, name: &str) -> Result<Arc<LoadedLibrary>> {
        if let Some(lib) = self.state.read().unwrap().loaded.get(name).cloned() {
            return Ok(lib);
        }

        let root = self.load_root_index().await?;

        // Flat root whose own name matches: the root is the library, no
        // second fetch.
        if !root.has_sub_indexes() && root.name == name {
            let lib = Arc::new(LoadedLibrary {
                name: root.name.clone(),
                index: Arc::clone(&root),
                base_url: self.base_url.clone(),
            });
            let mut state = self.state.write().unwrap();
            let lib = state
                .loaded
                .entry(name.to_string())
                .or_insert_with(|| Arc::clone(&lib))
                .clone();
            return Ok(lib);
        }

        let entry = match_sub_index(&root, name)
            .ok_or_else(|| Error::NotFound(format!("library {name}")))?
            .clone();

        let doc_url = urls::join(&self.base_url, &entry.path);
        tracing::info!(library = %name, canonical = %entry.name, url = %doc_url, "loading library index");
        let index: CatalogIndex = fetch_json(self.fetcher.as_ref(), &doc_url).await?;

        let lib = Arc::new(LoadedLibrary {
            name: entry.name.clone(),
            index: Arc::new(index),
            // Relative preset/audio paths resolve against the document's
            // directory, however deeply it is nested.
            base_url: urls::parent(&doc_url),
        });

        let mut state = self.state.write().unwrap();
        if let Some(existing) = state.loaded.get(name) {
            // A concurrent load finished first; keep its registration
            return Ok(Arc::clone(existing));
        }
        state.loaded.insert(name.to_string(), Arc::clone(&lib));
        if entry.name != name {
            state.loaded.insert(entry.name.clone(), Arc::clone(&lib));
        }
        Ok(lib)
    }

    /// Load (if needed) and add a library to the enabled set.
    ///
    /// The enabled set holds the canonical spelling, so enabling via an
    /// alias and via the listed name are the same operation.
    pub async fn enable_library(&self, name: &str) -> Result<()> {
        let library = self.load_library(name).await?;
        let mut state = self.state.write().unwrap();
        if !state.is_enabled(&library.name) {
            state.enabled.push(library.name.clone());
        }
        Ok(())
    }

    /// Remove a library from the enabled set, under any registered alias.
    /// Its index and any cached descriptors or audio stay resident; only
    /// search visibility changes.
    pub fn disable_library(&self, name: &str) {
        let mut state = self.state.write().unwrap();
        let canonical = state.loaded.get(name).map(|lib| lib.name.clone());
        state
            .enabled
            .retain(|n| n != name && Some(n) != canonical.as_ref());
    }

    /// Canonical names of enabled libraries, in enable order.
    pub fn enabled_libraries(&self) -> Vec<String> {
        self.state.read().unwrap().enabled.clone()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.state.read().unwrap().loaded.contains_key(name)
    }

    /// Load a preset descriptor by name.
    ///
    /// A `"Library/Preset"`-qualified name loads the library if needed; a
    /// bare name scans enabled libraries in enable order. Descriptors are
    /// cached by document URL.
    pub async fn load_preset(&self, name: &str) -> Result<LoadedPreset> {
        let (library, entry) = self.find_preset_entry(name).await?;
        let url = urls::join(&library.base_url, &entry.path);
        let descriptor = self.fetch_descriptor(&url).await?;
        Ok(LoadedPreset { descriptor, url })
    }

    async fn find_preset_entry(&self, name: &str) -> Result<(Arc<LoadedLibrary>, PresetEntry)> {
        if let Some((library_name, preset_name)) = name.split_once('/') {
            let library = self.load_library(library_name).await?;
            let entry = find_preset_in(&library.index, preset_name)
                .ok_or_else(|| Error::NotFound(format!("preset {name}")))?;
            return Ok((library, entry));
        }

        let state = self.state.read().unwrap();
        for library_name in &state.enabled {
            if let Some(library) = state.loaded.get(library_name) {
                if let Some(entry) = find_preset_in(&library.index, name) {
                    return Ok((Arc::clone(library), entry));
                }
            }
        }
        Err(Error::NotFound(format!("preset {name}")))
    }

    async fn fetch_descriptor(&self, url: &str) -> Result<Arc<PresetDescriptor>> {
        let key = url.to_string();
        if let Some(descriptor) = self.descriptors.lock().unwrap().get(&key).cloned() {
            tracing::debug!(url = %url, "descriptor cache hit");
            return Ok(descriptor);
        }

        let descriptor: PresetDescriptor = fetch_json(self.fetcher.as_ref(), url).await?;
        let descriptor = Arc::new(descriptor);
        self.descriptors
            .lock()
            .unwrap()
            .insert(key, Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Cached descriptor count, for diagnostics.
    pub fn cached_descriptors(&self) -> usize {
        self.descriptors.lock().unwrap().len()
    }

    /// Snapshot of enabled libraries with their indexes, in enable order.
    pub(crate) fn enabled_snapshot(&self) -> Vec<(String, Arc<LoadedLibrary>)> {
        let state = self.state.read().unwrap();
        state
            .enabled
            .iter()
            .filter_map(|name| {
                state
                    .loaded
                    .get(name)
                    .map(|lib| (name.clone(), Arc::clone(lib)))
            })
            .collect()
    }
}

/// Three-tier library name resolution against the root's sub-index entries.
fn match_sub_index<'a>(root: &'a CatalogIndex, name: &str) -> Option<&'a SubIndexEntry> {
    if let Some(entry) = root.sub_indexes().find(|e| e.name == name) {
        return Some(entry);
    }

    let wanted = normalize_library_name(name);
    if let Some(entry) = root
        .sub_indexes()
        .find(|e| normalize_library_name(&e.name) == wanted)
    {
        return Some(entry);
    }

    let prefix = format!("{name}/");
    root.sub_indexes().find(|e| e.path.starts_with(&prefix))
}

/// Underscores and spaces are interchangeable across naming conventions for
/// the same library ("FluidR3_GM" vs "FluidR3 GM").
fn normalize_library_name(name: &str) -> String {
    name.replace('_', " ").to_lowercase()
}

fn find_preset_in(index: &CatalogIndex, name: &str) -> Option<PresetEntry> {
    if let Some(entry) = index.presets().find(|p| p.name == name) {
        return Some(entry.clone());
    }
    let wanted = name.to_lowercase();
    index
        .presets()
        .find(|p| p.name.to_lowercase() == wanted)
        .cloned()
}
