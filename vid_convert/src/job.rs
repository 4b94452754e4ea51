//! Job builder: one `ConversionJob` per existing input file.

use std::collections::HashSet;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::options::{ConvertConfig, EncodeOptions};

/// One file conversion with fully resolved paths. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    input_file: PathBuf,
    output_file: PathBuf,
    options: EncodeOptions,
}

impl ConversionJob {
    pub fn new(input_file: PathBuf, output_file: PathBuf, options: EncodeOptions) -> Self {
        Self {
            input_file,
            output_file,
            options,
        }
    }

    pub fn input_file(&self) -> &Path {
        &self.input_file
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }
}

/// Jobs to run plus the inputs that were dropped before dispatch (missing,
/// or colliding with an earlier job's output).
#[derive(Debug, Default)]
pub struct JobPlan {
    pub jobs: Vec<ConversionJob>,
    pub skipped: Vec<PathBuf>,
}

/// `<dir>/<input stem>.<format>`, where `<dir>` is `output_dir` or the
/// input's own directory. The stem keeps its raw bytes.
pub fn output_path_for(input: &Path, output_dir: Option<&Path>, format: &str) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".");
    name.push(format);

    let dir = match output_dir {
        Some(dir) => dir,
        None => input.parent().unwrap_or(Path::new("")),
    };

    dir.join(name)
}

fn is_missing(path: &Path) -> bool {
    matches!(std::fs::metadata(path), Err(e) if e.kind() == ErrorKind::NotFound)
}

/// Expand the configured inputs into jobs, skipping (with a warning) any
/// input that does not exist.
///
/// No two jobs share an output path: an input whose output was already
/// claimed by an earlier input (`clip.mov` and `clip.avi`, or the same file
/// listed twice) is skipped, since both engines would write the same temp
/// file.
pub fn build_jobs(config: &ConvertConfig) -> JobPlan {
    let mut plan = JobPlan::default();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for input in &config.inputs {
        if is_missing(input) {
            warn!(
                "⚠️  Input file '{}' does not exist, skipping",
                input.display()
            );
            plan.skipped.push(input.clone());
            continue;
        }

        let output = output_path_for(input, config.output_dir.as_deref(), &config.format);
        if !claimed.insert(output.clone()) {
            warn!(
                "⚠️  {} would also write {}, skipping",
                input.display(),
                output.display()
            );
            plan.skipped.push(input.clone());
            continue;
        }
        if output == *input {
            warn!(
                "⚠️  {} will be replaced by its own conversion",
                input.display()
            );
        }

        debug!(input = %input.display(), output = %output.display(), "Job prepared");
        plan.jobs.push(ConversionJob::new(
            input.clone(),
            output,
            config.encode.clone(),
        ));
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_with_output_dir() {
        let out = output_path_for(Path::new("/videos/holiday.mov"), Some(Path::new("/out")), "mp4");
        assert_eq!(out, PathBuf::from("/out/holiday.mp4"));
    }

    #[test]
    fn test_output_path_defaults_to_input_dir() {
        let out = output_path_for(Path::new("/videos/holiday.mov"), None, "mkv");
        assert_eq!(out, PathBuf::from("/videos/holiday.mkv"));

        let out = output_path_for(Path::new("clip.avi"), None, "mp4");
        assert_eq!(out, PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_output_path_strips_only_last_extension() {
        let out = output_path_for(Path::new("a/show.s01e01.mkv"), None, "mp4");
        assert_eq!(out, PathBuf::from("a/show.s01e01.mp4"));
    }

    #[test]
    fn test_build_jobs_skips_missing_inputs() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("present.mov");
        fs::write(&present, b"video").unwrap();
        let missing = dir.path().join("missing.mov");

        let config = ConvertConfig {
            inputs: vec![missing.clone(), present.clone()],
            format: "mkv".to_string(),
            ..Default::default()
        };
        let plan = build_jobs(&config);

        assert_eq!(plan.skipped, vec![missing]);
        assert_eq!(plan.jobs.len(), 1);
        assert_eq!(plan.jobs[0].input_file(), present.as_path());
        assert_eq!(plan.jobs[0].output_file(), dir.path().join("present.mkv").as_path());
    }

    #[test]
    fn test_build_jobs_keeps_input_order_and_options() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("out");
        let names = ["c.mov", "a.mov", "b.mov"];
        for name in names {
            fs::write(dir.path().join(name), b"video").unwrap();
        }

        let mut config = ConvertConfig {
            inputs: names.iter().map(|n| dir.path().join(n)).collect(),
            output_dir: Some(out_dir.clone()),
            ..Default::default()
        };
        config.encode.video_bitrate = Some("2M".to_string());

        let plan = build_jobs(&config);
        let outputs: Vec<_> = plan.jobs.iter().map(|j| j.output_file().to_path_buf()).collect();
        assert_eq!(
            outputs,
            vec![out_dir.join("c.mp4"), out_dir.join("a.mp4"), out_dir.join("b.mp4")]
        );
        assert!(plan
            .jobs
            .iter()
            .all(|j| j.options().video_bitrate.as_deref() == Some("2M")));
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_build_jobs_skips_colliding_outputs() {
        let dir = TempDir::new().unwrap();
        let mov = dir.path().join("clip.mov");
        let avi = dir.path().join("clip.avi");
        let other = dir.path().join("other.mov");
        for path in [&mov, &avi, &other] {
            fs::write(path, b"video").unwrap();
        }

        let config = ConvertConfig {
            inputs: vec![mov.clone(), avi.clone(), other.clone(), mov.clone()],
            ..Default::default()
        };
        let plan = build_jobs(&config);

        let inputs: Vec<_> = plan.jobs.iter().map(|j| j.input_file().to_path_buf()).collect();
        assert_eq!(inputs, vec![mov.clone(), other]);
        assert_eq!(plan.skipped, vec![avi, mov]);
        assert_eq!(plan.jobs[0].output_file(), dir.path().join("clip.mp4").as_path());
    }

    #[test]
    fn test_same_stem_in_different_dirs_collides_only_with_shared_output_dir() {
        let dir = TempDir::new().unwrap();
        let (a, b) = (dir.path().join("a"), dir.path().join("b"));
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        let inputs = vec![a.join("clip.mov"), b.join("clip.mov")];
        for input in &inputs {
            fs::write(input, b"video").unwrap();
        }

        let next_to_inputs = ConvertConfig {
            inputs: inputs.clone(),
            ..Default::default()
        };
        assert_eq!(build_jobs(&next_to_inputs).jobs.len(), 2);

        let shared = ConvertConfig {
            inputs,
            output_dir: Some(dir.path().join("out")),
            ..Default::default()
        };
        let plan = build_jobs(&shared);
        assert_eq!(plan.jobs.len(), 1);
        assert_eq!(plan.skipped, vec![b.join("clip.mov")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_output_path_keeps_non_utf8_stem() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new(OsStr::from_bytes(b"/videos/clip\xff.mov"));
        let out = output_path_for(input, None, "mp4");
        assert_eq!(out.as_os_str().as_bytes(), b"/videos/clip\xff.mp4");
    }

    #[test]
    fn test_build_jobs_all_missing() {
        let config = ConvertConfig {
            inputs: vec![PathBuf::from("/nonexistent/one.mov"), PathBuf::from("/nonexistent/two.mov")],
            ..Default::default()
        };
        let plan = build_jobs(&config);
        assert!(plan.jobs.is_empty());
        assert_eq!(plan.skipped.len(), 2);
    }
}
