use crate::emit::GeneratedArtifact;
use crate::error::{PipelineError, PipelineResult};
use std::fs;
use std::path::Path;

/// Replace `artifact.path` with the artifact text.
///
/// The text goes to a hidden sibling first and is renamed into place, so the
/// destination holds either the previous content or the full new content.
pub fn write_artifact(artifact: &GeneratedArtifact) -> PipelineResult<()> {
    write_bytes(&artifact.path, artifact.text.as_bytes())?;
    tracing::info!(
        path = %artifact.path.display(),
        bytes = artifact.text.len(),
        "artifact written"
    );
    Ok(())
}

pub fn write_bytes(dest: &Path, bytes: &[u8]) -> PipelineResult<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| PipelineError::io(parent, err))?;

    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("artifact");
    let tmp_path = parent.join(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, bytes).map_err(|err| PipelineError::io(&tmp_path, err))?;
    if let Err(err) = fs::rename(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(PipelineError::io(dest, err));
    }
    Ok(())
}

/// Read an input file, reporting a missing path distinctly from other IO errors.
pub fn read_input(path: &Path) -> PipelineResult<String> {
    if !path.exists() {
        return Err(PipelineError::MissingInputFile {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|err| PipelineError::io(path, err))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_existing_content() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("out.lua");
        fs::write(&path, "old content that is longer than the new one").expect("seed");

        let artifact = GeneratedArtifact {
            path: path.clone(),
            text: "new".to_string(),
        };
        write_artifact(&artifact).expect("write");

        assert_eq!(fs::read_to_string(&path).expect("read"), "new");
        assert!(!dir.path().join(".out.lua.tmp").exists());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("nested/deeper/out.lua");
        write_bytes(&path, b"x").expect("write");
        assert_eq!(fs::read(&path).expect("read"), b"x");
    }

    #[test]
    fn missing_input_is_reported_by_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("absent.txt");
        let err = read_input(&path).expect_err("missing");
        assert!(matches!(err, PipelineError::MissingInputFile { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn input_with_invalid_utf8_is_read_lossily() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("doc.txt");
        fs::write(&path, b"h2. Global Variables\xff\n").expect("seed");
        let text = read_input(&path).expect("read");
        assert!(text.starts_with("h2. Global Variables"));
    }
}
