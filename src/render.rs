//! Hands a DOT description to Graphviz and opens the result.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Errors that can occur while rendering a graph image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Failed to spawn `dot` or the file opener.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// `dot` ran but exited unsuccessfully.
    #[error("dot failed ({status}): {stderr}")]
    DotFailed { status: String, stderr: String },
}

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Default location for a rendered image: a per-process file in the
/// system temp directory.
pub fn default_image_path(format: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mtree-{}.{}", std::process::id(), format))
}

/// Builds the `dot` invocation for a description file.
fn dot_command(description: &Path, image: &Path, format: &str) -> Command {
    let mut cmd = Command::new("dot");
    cmd.arg(format!("-T{}", format))
        .arg(description)
        .arg("-o")
        .arg(image);
    cmd
}

/// Runs `dot -T<format> <description> -o <image>`.
pub fn render(description: &Path, image: &Path, format: &str) -> RenderResult<()> {
    debug!(
        description = %description.display(),
        image = %image.display(),
        format,
        "running dot"
    );
    let output = dot_command(description, image, format).output()?;
    if !output.status.success() {
        return Err(RenderError::DotFailed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    info!(image = %image.display(), "graph rendered");
    Ok(())
}

const WINDOWS_START: &[&str] = &["/c", "start", ""];
const NO_ARGS: &[&str] = &[];

/// The platform command that opens a file with its default viewer.
fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "windows") {
        ("cmd", WINDOWS_START)
    } else if cfg!(target_os = "macos") {
        ("open", NO_ARGS)
    } else {
        ("xdg-open", NO_ARGS)
    }
}

/// Opens `path` in the default viewer without waiting for it to exit.
pub fn open_file(path: &Path) -> RenderResult<()> {
    let (program, args) = opener();
    debug!(program, path = %path.display(), "opening rendered graph");
    Command::new(program).args(args).arg(path).spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_image_path_uses_format() {
        let path = default_image_path("svg");
        assert_eq!(path.extension().unwrap(), "svg");
        assert!(path.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn test_dot_command_arguments() {
        let cmd = dot_command(Path::new("graph.txt"), Path::new("graph.png"), "png");

        assert_eq!(cmd.get_program(), "dot");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec!["-Tpng", "graph.txt", "-o", "graph.png"]);
    }

    #[test]
    fn test_dot_failure_message() {
        let err = RenderError::DotFailed {
            status: "exit status: 1".to_string(),
            stderr: "syntax error in line 3".to_string(),
        };
        assert_eq!(err.to_string(), "dot failed (exit status: 1): syntax error in line 3");
    }
}
