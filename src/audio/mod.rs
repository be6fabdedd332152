//! Audio reference resolution and decode caching
//!
//! [`SampleResolver`] turns any of the four audio reference variants into a
//! decoded buffer through the audio cache. Content identity (sha256) is
//! preferred over location identity for cache keys, so the same sample
//! referenced from two presets decodes once.

mod buffer;
mod decoder;

pub use buffer::AudioBuffer;
pub use decoder::{PcmDecoder, SymphoniaDecoder};

use crate::cache::BoundedCache;
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::model::{AudioReference, SamplerConfig};
use crate::urls;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Length of the base64-payload prefix used as the cache key for inline
/// references. Collisions within one process lifetime are accepted as
/// negligible at this length.
const INLINE_KEY_PREFIX: usize = 64;

/// Resolves audio references to decoded buffers through a bounded cache.
pub struct SampleResolver {
    root_base_url: String,
    fetcher: Arc<dyn Fetcher>,
    decoder: Arc<dyn PcmDecoder>,
    cache: Mutex<BoundedCache<String, Arc<AudioBuffer>>>,
}

impl SampleResolver {
    pub fn new(
        root_base_url: String,
        fetcher: Arc<dyn Fetcher>,
        decoder: Arc<dyn PcmDecoder>,
        cache_size: usize,
    ) -> Self {
        Self {
            root_base_url,
            fetcher,
            decoder,
            cache: Mutex::new(BoundedCache::new(cache_size)),
        }
    }

    /// Resolve one audio reference to a decoded buffer.
    ///
    /// `preset_url` is the URL of the preset document that carried the
    /// reference; external paths resolve relative to its directory, falling
    /// back to the catalog root when absent.
    pub async fn resolve(
        &self,
        reference: &AudioReference,
        preset_url: Option<&str>,
    ) -> Result<Arc<AudioBuffer>> {
        match reference {
            AudioReference::External { path, url, sha256 } => {
                let relative = path
                    .as_deref()
                    .or(url.as_deref())
                    .ok_or_else(|| {
                        Error::InvalidReference(
                            "external reference has neither path nor url".to_string(),
                        )
                    })?;
                let base = match preset_url {
                    Some(doc_url) => urls::parent(doc_url),
                    None => self.root_base_url.clone(),
                };
                let resolved = urls::join(&base, relative);
                // Content identity preferred over location identity
                let key = sha256.clone().unwrap_or_else(|| resolved.clone());
                self.fetch_and_decode(key, &resolved).await
            }
            AudioReference::ContentAddressed { sha256, codec } => {
                let resolved = urls::join(
                    &self.root_base_url,
                    &format!("samples/{sha256}.{codec}"),
                );
                self.fetch_and_decode(sha256.clone(), &resolved).await
            }
            AudioReference::InlineFile { data } => {
                let key = inline_key("inline", data);
                if let Some(buffer) = self.cached(&key) {
                    return Ok(buffer);
                }
                let bytes = decode_base64(data)?;
                let buffer = Arc::new(self.decoder.decode(&bytes).await?);
                self.store(key, Arc::clone(&buffer));
                Ok(buffer)
            }
            AudioReference::InlinePcm { data, sample_rate } => {
                let key = inline_key("pcm", data);
                if let Some(buffer) = self.cached(&key) {
                    return Ok(buffer);
                }
                let buffer = Arc::new(decode_inline_pcm(data, *sample_rate)?);
                self.store(key, Arc::clone(&buffer));
                Ok(buffer)
            }
        }
    }

    /// Resolve every zone of a sampler configuration concurrently.
    ///
    /// Returns a map from zone position to decoded buffer. Any single zone
    /// failure fails the whole call; no partial map is returned. (Preloading
    /// tolerates per-preset failures, but within one preset the zone set is
    /// all-or-nothing.)
    pub async fn decode_sampler_zones(
        &self,
        config: &serde_json::Value,
        preset_url: Option<&str>,
    ) -> Result<HashMap<usize, Arc<AudioBuffer>>> {
        let config: SamplerConfig = serde_json::from_value(config.clone())?;

        tracing::debug!(zones = config.zones.len(), "decoding sampler zones");

        let resolutions = config.zones.iter().enumerate().map(|(position, zone)| {
            let sample = &zone.sample;
            async move {
                let buffer = self.resolve(sample, preset_url).await?;
                Ok::<_, Error>((position, buffer))
            }
        });

        let resolved = try_join_all(resolutions).await?;
        Ok(resolved.into_iter().collect())
    }

    /// Number of decoded buffers currently resident.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    /// Drop all cached buffers. Does not touch the descriptor cache.
    pub fn clear_cache(&self) {
        self.cache.lock().unwrap().clear();
    }

    async fn fetch_and_decode(&self, key: String, url: &str) -> Result<Arc<AudioBuffer>> {
        if let Some(buffer) = self.cached(&key) {
            tracing::debug!(key = %key, "audio cache hit");
            return Ok(buffer);
        }

        tracing::debug!(key = %key, url = %url, "audio cache miss, fetching");
        let bytes = self.fetcher.fetch(url).await?;
        let buffer = Arc::new(self.decoder.decode(&bytes).await?);
        self.store(key, Arc::clone(&buffer));
        Ok(buffer)
    }

    fn cached(&self, key: &String) -> Option<Arc<AudioBuffer>> {
        self.cache.lock().unwrap().get(key).cloned()
    }

    fn store(&self, key: String, buffer: Arc<AudioBuffer>) {
        self.cache.lock().unwrap().insert(key, buffer);
    }
}

fn inline_key(variant: &str, data: &str) -> String {
    let end = data
        .char_indices()
        .nth(INLINE_KEY_PREFIX)
        .map(|(i, _)| i)
        .unwrap_or(data.len());
    format!("{variant}:{}", &data[..end])
}

fn decode_base64(data: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(data)
        .map_err(|e| Error::InvalidReference(format!("invalid base64 payload: {e}")))
}

/// Decode a base64 payload of raw little-endian f32 samples into a
/// single-channel buffer at the declared rate. The codec decoder is never
/// involved.
fn decode_inline_pcm(data: &str, sample_rate: u32) -> Result<AudioBuffer> {
    let bytes = decode_base64(data)?;
    if bytes.len() % 4 != 0 {
        return Err(Error::InvalidReference(format!(
            "inline PCM payload length {} is not a multiple of 4",
            bytes.len()
        )));
    }

    let samples = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(AudioBuffer::new(samples, sample_rate, 1))
}
