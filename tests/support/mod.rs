//! Shared test fixtures: in-memory fetcher, counting decoder, JSON builders
#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use soundbank::{AudioBuffer, Catalog, CatalogConfig, Error, Fetcher, PcmDecoder, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://cat.test";

/// Install a test subscriber once per process so `RUST_LOG=soundbank=debug`
/// surfaces engine traces in test output.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory fetcher with per-URL hit counting. Unrouted URLs return a 404
/// fetch error, matching the engine's non-success contract.
pub struct MockFetcher {
    routes: Mutex<HashMap<String, Vec<u8>>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn route(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.routes.lock().unwrap().insert(url.to_string(), body.into());
    }

    pub fn route_json(&self, url: &str, value: &Value) {
        self.route(url, value.to_string().into_bytes());
    }

    /// Number of fetches issued for one URL.
    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Total fetches issued across all URLs.
    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        match self.routes.lock().unwrap().get(url) {
            Some(body) => Ok(body.clone()),
            None => Err(Error::Fetch {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Decoder that counts invocations and returns a fixed short buffer.
pub struct StubDecoder {
    calls: AtomicUsize,
}

impl StubDecoder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PcmDecoder for StubDecoder {
    async fn decode(&self, _bytes: &[u8]) -> Result<AudioBuffer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AudioBuffer::new(vec![0.0; 8], 44100, 1))
    }
}

/// Engine wired to a mock fetcher and counting decoder.
pub fn test_catalog() -> (Catalog, Arc<MockFetcher>, Arc<StubDecoder>) {
    test_catalog_with_config(CatalogConfig::default())
}

pub fn test_catalog_with_config(
    config: CatalogConfig,
) -> (Catalog, Arc<MockFetcher>, Arc<StubDecoder>) {
    init_tracing();
    let fetcher = Arc::new(MockFetcher::new());
    let decoder = Arc::new(StubDecoder::new());
    let catalog = Catalog::with_config(
        BASE_URL,
        config,
        Arc::clone(&fetcher) as Arc<dyn Fetcher>,
        Arc::clone(&decoder) as Arc<dyn PcmDecoder>,
    );
    (catalog, fetcher, decoder)
}

pub fn index_json(name: &str, entries: Vec<Value>) -> Value {
    json!({ "name": name, "entries": entries })
}

pub fn sub_entry(name: &str, path: &str) -> Value {
    json!({ "type": "index", "name": name, "path": path })
}

pub fn preset_entry(name: &str, path: &str, category: &str, tags: &[&str]) -> Value {
    json!({ "type": "preset", "name": name, "path": path, "category": category, "tags": tags })
}

pub fn synth_preset_doc() -> Value {
    json!({ "node": { "type": "synth", "config": { "waveform": "saw" } } })
}

pub fn sampler_preset_doc(zones: Vec<Value>) -> Value {
    json!({ "node": { "type": "sampler", "config": { "zones": zones } } })
}

/// Base64 payload of raw little-endian f32 samples.
pub fn pcm_base64(samples: &[f32]) -> String {
    let mut bytes = Vec::with_capacity(samples.len() * 4);
    for s in samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    BASE64.encode(bytes)
}
