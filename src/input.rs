//! Sources of `mvn dependency:tree` output: a saved file, piped stdin, or a
//! fresh Maven run.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Errors that can occur while collecting Maven output.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Failed to read a file or stdin, or to spawn Maven.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Maven ran but exited unsuccessfully.
    #[error("mvn dependency:tree failed ({status}):\n{output}")]
    MavenFailed { status: String, output: String },

    /// No input source produced any content.
    #[error("nothing to process: pass --file, --pom or pipe mvn output to stdin")]
    Empty,
}

/// Result type alias for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Reads a saved `mvn dependency:tree` output file.
pub fn read_file(path: &Path) -> InputResult<String> {
    debug!(path = %path.display(), "reading dependency tree file");
    Ok(fs::read_to_string(path)?)
}

/// Reads all of stdin when it is piped.
///
/// Returns `None` when stdin is an interactive terminal, so the caller can
/// fall back to another source instead of blocking.
pub fn read_stdin() -> InputResult<Option<String>> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    info!("reading from stdin");
    let mut content = String::new();
    stdin.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Runs `mvn dependency:tree -f <pom>` and returns its combined output.
pub fn run_maven(pom: &Path) -> InputResult<String> {
    info!(pom = %pom.display(), "running mvn dependency:tree");
    let output = Command::new("mvn")
        .arg("dependency:tree")
        .arg("-f")
        .arg(pom)
        .output()?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(InputError::MavenFailed {
            status: output.status.to_string(),
            output: combined,
        });
    }
    Ok(combined)
}

/// Picks the first non-empty source: `file`, then piped stdin, then `pom`.
pub fn collect(file: Option<&Path>, pom: Option<&Path>) -> InputResult<String> {
    if let Some(path) = file {
        let content = read_file(path)?;
        if !content.trim().is_empty() {
            return Ok(content);
        }
    }

    if let Some(content) = read_stdin()? {
        if !content.trim().is_empty() {
            return Ok(content);
        }
    }

    if let Some(pom) = pom {
        return run_maven(pom);
    }

    Err(InputError::Empty)
}
