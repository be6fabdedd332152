//! Audio decode capability
//!
//! External, content-addressed, and inline-file references all funnel their
//! raw bytes through [`PcmDecoder`]; inline PCM references bypass it. The
//! symphonia-backed implementation handles the codec set enabled in
//! Cargo.toml (WAV/FLAC/Vorbis by default, plus MP3/AAC/MP4).

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode capability: encoded bytes in, PCM buffer out.
#[async_trait]
pub trait PcmDecoder: Send + Sync {
    async fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer>;
}

/// Symphonia-backed decoder for in-memory sample payloads.
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_bytes(bytes: Vec<u8>) -> Result<AudioBuffer> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        // No file extension is available for fetched bytes; let the probe
        // sniff the container format.
        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| Error::Decode(format!("unrecognized audio format: {e}")))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| Error::Decode("no audio track found".to_string()))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("unsupported codec: {e}")))?;

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        let mut sample_rate = 0u32;
        let mut channel_count = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break; // end of stream
                }
                Err(e) => return Err(Error::Decode(format!("packet read failed: {e}"))),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = decoder
                .decode(&packet)
                .map_err(|e| Error::Decode(format!("packet decode failed: {e}")))?;

            let spec = *decoded.spec();
            sample_rate = spec.rate;
            channel_count = spec.channels.count();

            let needed = decoded.capacity() * channel_count;
            if sample_buf.as_ref().map_or(true, |b| b.capacity() < needed) {
                sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }
            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
        }

        if samples.is_empty() {
            return Err(Error::Decode("stream contained no audio data".to_string()));
        }

        Ok(AudioBuffer::new(samples, sample_rate, channel_count as u16))
    }
}

impl Default for SymphoniaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PcmDecoder for SymphoniaDecoder {
    async fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer> {
        Self::decode_bytes(bytes.to_vec())
    }
}
