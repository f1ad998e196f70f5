//! Child process plumbing shared by the ffmpeg and ffprobe wrappers.

use super::TranscodeError;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

const STDERR_TAIL_CHARS: usize = 2048;

/// Validate a configured tool path (`ffmpeg`, `/usr/local/bin/ffprobe`, ...)
pub(crate) fn validate_tool_path(tool_path: &str) -> Result<(), TranscodeError> {
    if tool_path.is_empty() || tool_path.contains("..") {
        return Err(TranscodeError::InvalidToolPath(tool_path.to_string()));
    }

    if !tool_path.chars().all(|c| {
        c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
    }) {
        return Err(TranscodeError::InvalidToolPath(tool_path.to_string()));
    }

    Ok(())
}

/// Canonicalize an input file path. Arguments go to the tool as argv, never
/// through a shell; absolute paths can never be mistaken for a tool option.
pub(crate) fn canonical_input(path: &Path) -> Result<PathBuf, TranscodeError> {
    path.canonicalize()
        .map_err(|e| TranscodeError::InvalidPath(format!("{}: {}", path.display(), e)))
}

/// Run `command` to completion within `timeout`.
///
/// The child is spawned with `kill_on_drop`, so a timeout or a dropped request
/// future terminates it. Non-zero exit becomes `TranscodeError::Failed` with
/// the tail of stderr.
pub(crate) async fn run_tool(
    tool: &'static str,
    mut command: Command,
    timeout: Duration,
) -> Result<Output, TranscodeError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command
        .spawn()
        .map_err(|source| TranscodeError::Spawn { tool, source })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|source| TranscodeError::Spawn { tool, source })?,
        Err(_) => {
            tracing::warn!(tool, timeout_secs = timeout.as_secs_f64(), "Media tool timed out");
            return Err(TranscodeError::Timeout { tool, timeout });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let tail_start = stderr
            .char_indices()
            .rev()
            .nth(STDERR_TAIL_CHARS)
            .map(|(i, _)| i)
            .unwrap_or(0);
        return Err(TranscodeError::Failed {
            tool,
            status: output.status.code(),
            stderr: stderr[tail_start..].to_string(),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tool_path() {
        assert!(validate_tool_path("ffmpeg").is_ok());
        assert!(validate_tool_path("/usr/local/bin/ffprobe").is_ok());
        assert!(validate_tool_path("ffmpeg; rm -rf /").is_err());
        assert!(validate_tool_path("$(ffmpeg)").is_err());
        assert!(validate_tool_path("../bin/ffmpeg").is_err());
        assert!(validate_tool_path("ffmpeg --flag").is_err());
        assert!(validate_tool_path("").is_err());
    }

    #[test]
    fn test_canonical_input_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(canonical_input(&dir.path().join("missing.mp4")).is_err());

        let file = dir.path().join("present.mp4");
        std::fs::write(&file, b"x").unwrap();
        assert!(canonical_input(&file).unwrap().is_absolute());
    }

    #[test]
    fn test_canonical_input_accepts_unusual_scratch_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("media (tmp)").join("a..b");
        std::fs::create_dir_all(&scratch).unwrap();
        let file = scratch.join("staged.mp4");
        std::fs::write(&file, b"x").unwrap();

        let canonical = canonical_input(&file).unwrap();
        assert!(canonical.is_absolute());
        assert!(canonical.to_string_lossy().contains("media (tmp)"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tool_reports_stderr() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo 'moov atom not found' >&2; exit 3"]);

        let err = run_tool("ffmpeg", command, Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            TranscodeError::Failed { tool, status, stderr } => {
                assert_eq!(tool, "ffmpeg");
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "moov atom not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tool_times_out() {
        let mut command = Command::new("sleep");
        command.arg("5");

        let start = std::time::Instant::now();
        let err = run_tool("ffprobe", command, Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(matches!(err, TranscodeError::Timeout { tool: "ffprobe", .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_run_tool_missing_binary() {
        let command = Command::new("tubely-no-such-tool");
        let err = run_tool("ffmpeg", command, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Spawn { .. }));
    }
}
