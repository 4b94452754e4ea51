//! FFmpeg argument translation
//!
//! Maps one job to the engine's argument vector. Pure: no I/O, no logging.
//!
//! Order of the emitted arguments:
//! 1. `-i <input>`
//! 2. compression preset (codec, CRF, speed preset, audio codec/bitrate), or
//!    the quality CRF when no compression level is set at all
//! 3. `-b:v` / `-b:a` explicit bitrates
//! 4. `-maxrate` / `-bufsize` from the target size
//! 5. `-vf scale=<resolution>`
//! 6. `-y <output>`
//!
//! Later flags win inside FFmpeg, so an explicit bitrate overrides the preset
//! rate without the preset flags being removed here.
//!
//! Arguments are `OsString`s: paths are handed over as raw bytes, never
//! lossily re-encoded.

use std::ffi::OsString;

use crate::job::ConversionJob;
use crate::options::{
    Compression, PRESET_AUDIO_CODEC, PRESET_ENCODER_SPEED, PRESET_VIDEO_CODEC,
};

/// Assumed media duration for target-size bitrates.
///
/// Real durations are not probed, so every file is treated as a 10-minute
/// video. Known approximation.
pub const ASSUMED_DURATION_SECS: i64 = 600;

/// Rate cap derived from a target file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetRate {
    pub bitrate_bps: i64,
    pub maxrate_kbps: i64,
    pub bufsize_kbps: i64,
}

/// Whole megabytes in a `"<n>M"` string. The `M` suffix is optional.
pub fn parse_target_megabytes(target_size: &str) -> Option<i64> {
    target_size
        .strip_suffix('M')
        .unwrap_or(target_size)
        .parse::<i64>()
        .ok()
}

impl TargetRate {
    /// `size_MB * 8 * 1024 * 1024 / 600` bits per second.
    ///
    /// Unparseable sizes (and overflow) give an all-zero rate.
    pub fn from_target_size(target_size: &str) -> Self {
        let bitrate_bps = parse_target_megabytes(target_size)
            .and_then(|mb| mb.checked_mul(8 * 1024 * 1024))
            .map(|bits| bits / ASSUMED_DURATION_SECS)
            .unwrap_or(0);

        Self {
            bitrate_bps,
            maxrate_kbps: bitrate_bps / 1000,
            bufsize_kbps: bitrate_bps / 2000,
        }
    }
}

fn push_pair(args: &mut Vec<OsString>, flag: &str, value: impl Into<OsString>) {
    args.push(flag.into());
    args.push(value.into());
}

/// Build the complete argument vector for `job`. The output path is always
/// the last element.
pub fn build_ffmpeg_args(job: &ConversionJob) -> Vec<OsString> {
    let options = job.options();
    let mut args = Vec::with_capacity(24);

    push_pair(&mut args, "-i", job.input_file());

    match &options.compression {
        Compression::Preset(preset) => {
            push_pair(&mut args, "-c:v", PRESET_VIDEO_CODEC);
            push_pair(&mut args, "-crf", preset.crf().to_string());
            push_pair(&mut args, "-preset", PRESET_ENCODER_SPEED);
            push_pair(&mut args, "-c:a", PRESET_AUDIO_CODEC);
            push_pair(&mut args, "-b:a", preset.audio_bitrate());
        }
        Compression::Unset => {
            push_pair(&mut args, "-crf", options.quality.crf().to_string());
        }
        // unknown level: neither preset
        Compression::Unrecognized(_) => {}
    }

    if let Some(video_bitrate) = &options.video_bitrate {
        push_pair(&mut args, "-b:v", video_bitrate.as_str());
    }
    if let Some(audio_bitrate) = &options.audio_bitrate {
        push_pair(&mut args, "-b:a", audio_bitrate.as_str());
    }

    if let Some(target_size) = &options.target_size {
        let rate = TargetRate::from_target_size(target_size);
        push_pair(&mut args, "-maxrate", format!("{}k", rate.maxrate_kbps));
        push_pair(&mut args, "-bufsize", format!("{}k", rate.bufsize_kbps));
    }

    if let Some(resolution) = &options.resolution {
        push_pair(&mut args, "-vf", format!("scale={}", resolution));
    }

    args.push("-y".into());
    args.push(job.output_file().into());
    args
}
