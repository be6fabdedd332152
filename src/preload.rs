//! Best-effort preloading of statically referenced presets
//!
//! The compiler collaborator extracts preset references from a song source;
//! `preload_all` warms everything those references need: library indexes,
//! preset descriptors, and decoded sampler audio. Preloading is advisory —
//! per-item failures are logged and reported, never propagated, so playback
//! setup can proceed with whatever did load.

use crate::catalog::Catalog;
use crate::error::Result;
use futures::future::join_all;

/// Outcome summary of one preload pass.
#[derive(Debug, Default)]
pub struct PreloadReport {
    /// Preset names fully loaded (descriptor plus any sampler audio)
    pub loaded: Vec<String>,
    /// Per-item failures, in input order
    pub failed: Vec<PreloadFailure>,
}

/// One preset that could not be preloaded.
#[derive(Debug)]
pub struct PreloadFailure {
    pub name: String,
    pub reason: String,
}

impl PreloadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Catalog {
    /// Preload every named preset, tolerating individual failures.
    ///
    /// `"Library/Preset"`-qualified names determine the minimal library set,
    /// which is enabled concurrently up front. Each preset's descriptor is
    /// then loaded and, for samplers, its zones are eagerly decoded. A
    /// failing item (missing preset, fetch error, decode error) is recorded
    /// and skipped; only a root-index failure aborts the pass, since nothing
    /// can resolve without it.
    pub async fn preload_all<S: AsRef<str>>(&self, preset_names: &[S]) -> Result<PreloadReport> {
        self.load_root_index().await?;

        let mut libraries: Vec<&str> = Vec::new();
        for name in preset_names {
            if let Some((library, _)) = name.as_ref().split_once('/') {
                if !libraries.contains(&library) {
                    libraries.push(library);
                }
            }
        }

        tracing::debug!(
            presets = preset_names.len(),
            libraries = libraries.len(),
            "preloading presets"
        );

        let enables = libraries
            .iter()
            .map(|library| async move { (*library, self.enable_library(library).await) });
        for (library, result) in join_all(enables).await {
            if let Err(e) = result {
                tracing::warn!(library = %library, error = %e, "failed to enable library for preload");
            }
        }

        let mut report = PreloadReport::default();
        for name in preset_names {
            let name = name.as_ref();
            match self.preload_one(name).await {
                Ok(()) => report.loaded.push(name.to_string()),
                Err(e) => {
                    tracing::warn!(preset = %name, error = %e, "preload failed, continuing");
                    report.failed.push(PreloadFailure {
                        name: name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "preload pass finished"
        );
        Ok(report)
    }

    async fn preload_one(&self, name: &str) -> Result<()> {
        let preset = self.load_preset(name).await?;
        if preset.descriptor.is_sampler() {
            self.samples()
                .decode_sampler_zones(&preset.descriptor.node.config, Some(&preset.url))
                .await?;
        }
        Ok(())
    }
}
