//! All-or-nothing output of rendered artifacts.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::RenderError;

/// A fully rendered output file, held in memory until written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RenderError + '_ {
    move |source| RenderError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn temp_path(out_dir: &Path, file_name: &str) -> PathBuf {
    out_dir.join(format!(".{file_name}.tmp"))
}

fn write_temp(path: &Path, contents: &str) -> Result<(), RenderError> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(io_error(path))?;
    file.write_all(contents.as_bytes()).map_err(io_error(path))?;
    file.flush().map_err(io_error(path))?;
    Ok(())
}

fn backup_path(out_dir: &Path, file_name: &str) -> PathBuf {
    out_dir.join(format!(".{file_name}.bak"))
}

fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove file");
            }
        }
    }
}

/// Moves every backed-up output back to its original name.
fn restore(backups: &[(PathBuf, PathBuf)]) {
    for (target, backup) in backups {
        if let Err(e) = fs::rename(backup, target) {
            tracing::error!(
                path = %target.display(),
                backup = %backup.display(),
                error = %e,
                "failed to restore previous output"
            );
        }
    }
}

/// Write every artifact into `out_dir`, or none of them.
///
/// The commit runs in three phases. Each artifact is first written to a
/// hidden sibling temp file. Existing outputs (the artifacts' own names plus
/// every name in `retired`) are then moved aside to hidden backups, and
/// finally the temp files are renamed into place. A failure in any phase
/// removes the new files and restores the backups, so `out_dir` always holds
/// either the previous set or the complete new one. Names in `retired` that
/// are not part of the new set end up removed, so no output of an earlier run
/// outlives the run that superseded it.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the directory cannot be created or any
/// file cannot be written or renamed.
pub fn write_artifacts(
    out_dir: &Path,
    artifacts: &[Artifact],
    retired: &[&str],
) -> Result<Vec<PathBuf>, RenderError> {
    fs::create_dir_all(out_dir).map_err(io_error(out_dir))?;

    let mut temps = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let tmp = temp_path(out_dir, &artifact.file_name);
        temps.push(tmp.clone());
        if let Err(e) = write_temp(&tmp, &artifact.contents) {
            remove_files(&temps);
            return Err(e);
        }
    }

    let names = artifacts
        .iter()
        .map(|a| a.file_name.as_str())
        .chain(retired.iter().copied());
    let mut backups: Vec<(PathBuf, PathBuf)> = Vec::new();
    for name in names {
        let target = out_dir.join(name);
        if fs::symlink_metadata(&target).is_err() {
            continue;
        }
        let backup = backup_path(out_dir, name);
        if let Err(e) = fs::rename(&target, &backup) {
            restore(&backups);
            remove_files(&temps);
            return Err(io_error(&target)(e));
        }
        backups.push((target, backup));
    }

    let mut written = Vec::with_capacity(artifacts.len());
    for (artifact, tmp) in artifacts.iter().zip(&temps) {
        let target = out_dir.join(&artifact.file_name);
        if let Err(e) = fs::rename(tmp, &target) {
            remove_files(&written);
            restore(&backups);
            remove_files(&temps);
            return Err(io_error(&target)(e));
        }
        tracing::debug!(
            path = %target.display(),
            bytes = artifact.contents.len(),
            "artifact written"
        );
        written.push(target);
    }

    for (target, backup) in &backups {
        if !written.contains(target) {
            tracing::info!(path = %target.display(), "removed output not produced by this run");
        }
        remove_files(std::slice::from_ref(backup));
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str, contents: &str) -> Artifact {
        Artifact {
            file_name: name.to_string(),
            contents: contents.to_string(),
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let written =
            write_artifacts(&out, &[artifact("a.md", "alpha"), artifact("b.html", "beta")], &[])
                .unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(fs::read_to_string(out.join("a.md")).unwrap(), "alpha");
        assert_eq!(fs::read_to_string(out.join("b.html")).unwrap(), "beta");
        assert_eq!(entries(&out), vec!["a.md", "b.html"]);
    }

    #[test]
    fn replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "old").unwrap();
        write_artifacts(dir.path(), &[artifact("a.md", "new")], &[]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "new");
    }

    #[test]
    fn failed_temp_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "old").unwrap();
        // A directory squatting on the second temp path makes its write fail.
        fs::create_dir(dir.path().join(".b.html.tmp")).unwrap();

        let result = write_artifacts(
            dir.path(),
            &[artifact("a.md", "new"), artifact("b.html", "x")],
            &[],
        );
        assert!(matches!(result, Err(RenderError::Io { .. })), "got {result:?}");

        assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "old");
        assert!(!dir.path().join(".a.md.tmp").exists());
        assert!(!dir.path().join("b.html").exists());
    }

    #[test]
    fn output_dir_that_is_a_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");
        fs::write(&file, "").unwrap();
        let result = write_artifacts(&file, &[artifact("a.md", "x")], &[]);
        assert!(matches!(result, Err(RenderError::Io { .. })));
    }

    #[test]
    fn retired_outputs_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "old").unwrap();
        fs::write(dir.path().join("map.html"), "stale").unwrap();

        let written =
            write_artifacts(dir.path(), &[artifact("a.md", "new")], &["map.html", "other.html"])
                .unwrap();

        assert_eq!(written, vec![dir.path().join("a.md")]);
        assert_eq!(entries(dir.path()), vec!["a.md"]);
        assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "new");
    }

    #[test]
    fn failed_commit_restores_previous_set() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "old-a").unwrap();
        fs::write(dir.path().join("b.html"), "old-b").unwrap();
        fs::write(dir.path().join("map.html"), "old-map").unwrap();
        // A non-empty directory on b's backup path blocks moving b aside
        // after a has already been moved.
        let blocker = dir.path().join(".b.html.bak");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "").unwrap();

        let result = write_artifacts(
            dir.path(),
            &[artifact("a.md", "new-a"), artifact("b.html", "new-b")],
            &["map.html"],
        );
        assert!(matches!(result, Err(RenderError::Io { .. })), "got {result:?}");

        assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "old-a");
        assert_eq!(fs::read_to_string(dir.path().join("b.html")).unwrap(), "old-b");
        assert_eq!(fs::read_to_string(dir.path().join("map.html")).unwrap(), "old-map");
        assert_eq!(
            entries(dir.path()),
            vec![".b.html.bak", "a.md", "b.html", "map.html"]
        );
    }
}
