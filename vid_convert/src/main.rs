use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use vid_convert::{ConvertConfig, EncodeOptions, ExecutionMode, RawEncodeOptions};

#[derive(Parser)]
#[command(name = "vid-convert")]
#[command(version, about = "Convert video files between formats", long_about = None)]
struct Cli {
    /// Input video files (repeat the flag or separate with commas)
    #[arg(short, long = "input", required = true, value_delimiter = ',')]
    input: Vec<PathBuf>,

    /// Output format (mp4, mkv, avi, etc)
    #[arg(short, long, default_value = "mp4")]
    format: String,

    /// Quality preset (low, medium, high)
    #[arg(short, long, default_value = "medium")]
    quality: String,

    /// Output resolution (e.g., 1920x1080)
    #[arg(short, long)]
    resolution: Option<String>,

    /// Process files concurrently
    #[arg(short, long)]
    concurrent: bool,

    /// Worker limit for --concurrent (default: one per file, up to the CPU count)
    #[arg(short, long, requires = "concurrent")]
    jobs: Option<usize>,

    /// Output directory, created if missing (default: each input's own
    /// directory, not the current working directory)
    #[arg(short, long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Compression preset (light, medium, heavy)
    #[arg(short = 'C', long)]
    compress: Option<String>,

    /// Target file size in MB (e.g., '100M')
    #[arg(long)]
    target_size: Option<String>,

    /// Video bitrate (e.g., '1M', '2M')
    #[arg(long)]
    vbitrate: Option<String>,

    /// Audio bitrate (e.g., '128k', '192k')
    #[arg(long)]
    abitrate: Option<String>,

    /// Transcoding engine executable
    #[arg(long, env = "VID_CONVERT_FFMPEG", default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Debug logging, including every engine command line
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> ConvertConfig {
        let mode = if self.concurrent {
            ExecutionMode::Concurrent {
                workers: self.jobs,
            }
        } else {
            ExecutionMode::Sequential
        };

        ConvertConfig {
            inputs: self.input,
            format: self.format,
            output_dir: self.output_dir,
            mode,
            engine: self.ffmpeg,
            encode: EncodeOptions::from_raw(RawEncodeOptions {
                quality: self.quality,
                compress: self.compress,
                resolution: self.resolution,
                target_size: self.target_size,
                video_bitrate: self.vbitrate,
                audio_bitrate: self.abitrate,
            }),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    if let Err(e) = shared_utils::logging::init_logging(
        "vid_convert",
        shared_utils::logging::LogConfig::default().with_level(level),
    ) {
        eprintln!("⚠️  Could not initialize logging: {:#}", e);
    }

    let config = cli.into_config();

    // only run-level errors reach here; failed jobs still exit 0
    vid_convert::run(&config)?;
    Ok(())
}
