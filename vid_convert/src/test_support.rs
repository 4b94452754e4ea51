//! Shell scripts standing in for ffmpeg in tests.
//!
//! All scripts are written once per test binary and never touched again, so
//! no test ever executes a file another thread still holds open for writing.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

#[derive(Debug, Clone, Copy)]
pub enum FakeEngine {
    /// writes "converted" to the last argument, exits 0
    Succeed,
    /// writes a partial file to the last argument, exits 1
    FailAfterPartialWrite,
    /// exits 0 without writing anything
    SucceedWithoutOutput,
    /// writes its own arguments, one per line, to the last argument
    RecordArgs,
    /// like `Succeed`, but leaves `<script>.invoked` behind
    Tattletale,
    /// like `Succeed`, but exits 1 unless the `-i` argument is an existing file
    RequireInput,
    /// appends `<input>-start`, sleeps, appends `<input>-end`
    SlowAppend,
}

const LAST_ARG: &str = "for last in \"$@\"; do :; done\n";

impl FakeEngine {
    const ALL: [FakeEngine; 7] = [
        FakeEngine::Succeed,
        FakeEngine::FailAfterPartialWrite,
        FakeEngine::SucceedWithoutOutput,
        FakeEngine::RecordArgs,
        FakeEngine::Tattletale,
        FakeEngine::RequireInput,
        FakeEngine::SlowAppend,
    ];

    fn file_name(self) -> &'static str {
        match self {
            FakeEngine::Succeed => "succeed.sh",
            FakeEngine::FailAfterPartialWrite => "fail.sh",
            FakeEngine::SucceedWithoutOutput => "no_output.sh",
            FakeEngine::RecordArgs => "record_args.sh",
            FakeEngine::Tattletale => "tattletale.sh",
            FakeEngine::RequireInput => "require_input.sh",
            FakeEngine::SlowAppend => "slow_append.sh",
        }
    }

    fn body(self) -> String {
        let body = match self {
            FakeEngine::Succeed => format!("{}printf 'converted\\n' > \"$last\"\n", LAST_ARG),
            FakeEngine::FailAfterPartialWrite => format!(
                "{}printf 'partial' > \"$last\"\necho 'Error while encoding stream #0:0' >&2\nexit 1\n",
                LAST_ARG
            ),
            FakeEngine::SucceedWithoutOutput => "exit 0\n".to_string(),
            FakeEngine::RecordArgs => format!("{}printf '%s\\n' \"$@\" > \"$last\"\n", LAST_ARG),
            FakeEngine::Tattletale => format!(
                "touch \"$0.invoked\"\n{}printf 'converted\\n' > \"$last\"\n",
                LAST_ARG
            ),
            FakeEngine::RequireInput => format!(
                "[ -f \"$2\" ] || exit 1\n{}printf 'converted\\n' > \"$last\"\n",
                LAST_ARG
            ),
            FakeEngine::SlowAppend => format!(
                "{}echo \"$2-start\" >> \"$last\"\nsleep 1\necho \"$2-end\" >> \"$last\"\n",
                LAST_ARG
            ),
        };
        format!("#!/bin/sh\n{}", body)
    }
}

struct Scripts {
    _dir: TempDir,
    paths: Vec<PathBuf>,
}

fn scripts() -> &'static Scripts {
    static SCRIPTS: OnceLock<Scripts> = OnceLock::new();
    SCRIPTS.get_or_init(|| {
        let dir = TempDir::new().expect("create script dir");
        let paths = FakeEngine::ALL
            .iter()
            .map(|engine| {
                let path = dir.path().join(engine.file_name());
                fs::write(&path, engine.body()).expect("write fake engine");
                fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                    .expect("chmod fake engine");
                path
            })
            .collect();
        Scripts { _dir: dir, paths }
    })
}

pub fn fake_engine(engine: FakeEngine) -> &'static Path {
    let index = FakeEngine::ALL
        .iter()
        .position(|e| e.file_name() == engine.file_name())
        .expect("known fake engine");
    &scripts().paths[index]
}

/// Marker left by `FakeEngine::Tattletale` when it runs.
pub fn invocation_marker(engine: FakeEngine) -> PathBuf {
    let script = fake_engine(engine);
    PathBuf::from(format!("{}.invoked", script.display()))
}
