use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use indicatif::ProgressBar;
use skipsign_core::pipeline::Collaborators;
use skipsign_core::{SkipSignError, SkipSignResult, Stage};
use tracing::warn;

/// `Collaborators` backed by the local filesystem.
///
/// When a spinner is attached, it shows the stage the run is in and warnings
/// are printed with the spinner suspended.
#[derive(Default)]
pub struct FsIo {
    progress: Option<ProgressBar>,
}

impl FsIo {
    pub fn with_progress(pb: ProgressBar) -> Self {
        Self { progress: Some(pb) }
    }

    fn status(&self, msg: String) {
        if let Some(pb) = &self.progress {
            pb.set_message(msg);
        }
    }
}

fn stage_message(stage: Stage) -> &'static str {
    match stage {
        Stage::Read => "reading ids",
        Stage::Decode => "decoding ids",
        Stage::Build => "building list",
        Stage::Key => "loading key",
        Stage::Sign => "signing",
        Stage::Emit => "serializing",
        Stage::Write => "writing",
        Stage::Config | Stage::Verify => stage.as_str(),
    }
}

impl Collaborators for FsIo {
    fn read_bytes(&self, path: &Path) -> SkipSignResult<Vec<u8>> {
        fs::read(path).map_err(|e| SkipSignError::io(Stage::Read, path.display().to_string(), e))
    }

    fn write_bytes(&self, path: &Path, data: &[u8]) -> SkipSignResult<()> {
        write_atomic(path, data)
            .map_err(|e| SkipSignError::io(Stage::Write, path.display().to_string(), e))
    }

    fn warn(&self, message: &str) {
        match &self.progress {
            Some(pb) => pb.suspend(|| warn!("{message}")),
            None => warn!("{message}"),
        }
    }

    fn stage(&self, stage: Stage) {
        self.status(format!("{}: {}", stage.as_str(), stage_message(stage)));
    }
}

/// Write `data` to `path` via a sibling temp file and a rename, creating
/// parent directories. The final file has mode 0644 on unix.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name")
    })?;
    let tmp = dir.join(format!(
        ".{}.{}.tmp",
        name.to_string_lossy(),
        std::process::id()
    ));

    let res = write_then_rename(&tmp, path, data);
    if res.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    res
}

fn write_then_rename(tmp: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let mut f = File::create(tmp)?;
    f.write_all(data)?;
    f.sync_all()?;
    drop(f);
    set_mode(tmp)?;
    fs::rename(tmp, path)
}

#[cfg(unix)]
fn set_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}
