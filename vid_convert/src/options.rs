//! Conversion options
//!
//! Everything the user picks on the command line, parsed once into
//! immutable values that are cloned into every job.

use std::path::PathBuf;
use tracing::warn;

/// Video codec used by every compression preset.
pub const PRESET_VIDEO_CODEC: &str = "libx264";
/// Audio codec used by every compression preset.
pub const PRESET_AUDIO_CODEC: &str = "aac";
/// x264 speed preset used by every compression preset.
pub const PRESET_ENCODER_SPEED: &str = "medium";

/// `--quality` preset. Only sets the CRF; codecs stay at engine defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Any name other than `low`/`high` (including empty) means `Medium`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "low" => QualityPreset::Low,
            "high" => QualityPreset::High,
            _ => QualityPreset::Medium,
        }
    }

    /// Lower CRF = higher visual quality.
    pub fn crf(self) -> u8 {
        match self {
            QualityPreset::Low => 28,
            QualityPreset::Medium => 23,
            QualityPreset::High => 18,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        }
    }
}

/// `--compress` preset: a fixed codec / CRF / audio bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionPreset {
    Light,
    Medium,
    Heavy,
}

impl CompressionPreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(CompressionPreset::Light),
            "medium" => Some(CompressionPreset::Medium),
            "heavy" => Some(CompressionPreset::Heavy),
            _ => None,
        }
    }

    pub fn crf(self) -> u8 {
        match self {
            CompressionPreset::Light => 23,
            CompressionPreset::Medium => 28,
            CompressionPreset::Heavy => 32,
        }
    }

    pub fn audio_bitrate(self) -> &'static str {
        match self {
            CompressionPreset::Light => "128k",
            CompressionPreset::Medium => "96k",
            CompressionPreset::Heavy => "64k",
        }
    }
}

/// State of the `--compress` option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Compression {
    /// Not given: the quality preset applies.
    #[default]
    Unset,
    Preset(CompressionPreset),
    /// Given but not a known level: neither preset applies.
    Unrecognized(String),
}

impl Compression {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Compression::Unset,
            Some(name) => match CompressionPreset::from_name(name) {
                Some(preset) => Compression::Preset(preset),
                None => Compression::Unrecognized(name.to_string()),
            },
        }
    }
}

/// Encoder options shared by all jobs of one run.
///
/// String values are passed to the engine verbatim; `None` means unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    pub quality: QualityPreset,
    pub compression: Compression,
    /// `WIDTHxHEIGHT`, not validated
    pub resolution: Option<String>,
    /// Megabytes with an `M` suffix, e.g. `100M`
    pub target_size: Option<String>,
    pub video_bitrate: Option<String>,
    pub audio_bitrate: Option<String>,
}

/// Raw option strings as they arrive from the command line.
#[derive(Debug, Clone, Default)]
pub struct RawEncodeOptions {
    pub quality: String,
    pub compress: Option<String>,
    pub resolution: Option<String>,
    pub target_size: Option<String>,
    pub video_bitrate: Option<String>,
    pub audio_bitrate: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl EncodeOptions {
    /// Normalise raw strings (empty = unset) and warn about values that will
    /// be ignored or degrade to defaults.
    pub fn from_raw(raw: RawEncodeOptions) -> Self {
        let quality = QualityPreset::from_name(&raw.quality);
        if !raw.quality.is_empty() && quality.as_str() != raw.quality {
            warn!(
                quality = %raw.quality,
                "⚠️  Unknown quality preset, using medium (CRF {})",
                QualityPreset::Medium.crf()
            );
        }

        let compression = Compression::parse(raw.compress.as_deref());
        if let Compression::Unrecognized(name) = &compression {
            warn!(
                compress = %name,
                "⚠️  Unknown compression level, no preset will be applied"
            );
        }

        let target_size = non_empty(raw.target_size);
        if let Some(size) = &target_size {
            if crate::ffmpeg_args::parse_target_megabytes(size).is_none() {
                warn!(
                    target_size = %size,
                    "⚠️  Target size is not a whole number of megabytes, maxrate/bufsize will be 0k"
                );
            }
        }

        Self {
            quality,
            compression,
            resolution: non_empty(raw.resolution),
            target_size,
            video_bitrate: non_empty(raw.video_bitrate),
            audio_bitrate: non_empty(raw.audio_bitrate),
        }
    }
}

/// How the job list is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One job after another, in input order.
    #[default]
    Sequential,
    /// Bounded worker pool; `workers: None` picks one per job up to the core count.
    Concurrent { workers: Option<usize> },
}

/// Complete, immutable configuration of one run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub inputs: Vec<PathBuf>,
    /// Output container / extension, e.g. `mp4`
    pub format: String,
    /// Destination directory; `None` writes next to each input
    pub output_dir: Option<PathBuf>,
    pub mode: ExecutionMode,
    /// External transcoding engine
    pub engine: PathBuf,
    pub encode: EncodeOptions,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            format: "mp4".to_string(),
            output_dir: None,
            mode: ExecutionMode::Sequential,
            engine: PathBuf::from("ffmpeg"),
            encode: EncodeOptions::default(),
        }
    }
}
