//! Decoded PCM buffer type
//!
//! Values live in the audio cache as `Arc<AudioBuffer>`; their lifetime is
//! governed purely by the cache's LRU policy, never by explicit frees.

/// Decoded audio held in memory.
///
/// Samples are f32, interleaved when multi-channel:
/// `[L, R, L, R, ...]` for stereo, a flat run for mono.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved PCM samples
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of interleaved channels
    pub channel_count: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channel_count: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channel_count,
        }
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channel_count.max(1) as usize
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }
}
