use std::path::{Path, PathBuf};
use std::process::Command;
/////////////////////////////////////////
use log::{debug, info};
/////////////////////////////////////////

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("cannot read input binary {}: {}", .path.display(), .source)]
    UnreadableInput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to run `{tool}`: {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },
    #[error("`{}` failed on {} ({}): {}", .tool, .path.display(), .status, .stderr)]
    ToolFailed {
        tool: String,
        path: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Produces the textual table dump of one binary. The comparison only ever
/// sees the returned text.
pub trait TableDumper {
    fn dump(&self, binary: &Path) -> Result<String, DumpError>;
}

/// Runs `<prefix>readelf -a -W <binary>`.
#[derive(Debug, Clone, Default)]
pub struct Readelf {
    /// Cross toolchain prefix, e.g. `arm-none-eabi-`. Empty for the host tool.
    prefix: String,
}

impl Readelf {
    pub fn new(prefix: impl Into<String>) -> Self {
        Readelf {
            prefix: prefix.into(),
        }
    }

    pub fn tool_name(&self) -> String {
        format!("{}readelf", self.prefix)
    }
}

impl TableDumper for Readelf {
    fn dump(&self, binary: &Path) -> Result<String, DumpError> {
        std::fs::metadata(binary).map_err(|source| DumpError::UnreadableInput {
            path: binary.to_path_buf(),
            source,
        })?;

        let tool = self.tool_name();
        info!("running {} on {}", tool, binary.display());
        // -W keeps each 64-bit section header on a single line.
        let output = Command::new(&tool)
            .arg("-a")
            .arg("-W")
            .arg(binary)
            .output()
            .map_err(|source| DumpError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DumpError::ToolFailed {
                tool,
                path: binary.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!(
            "{} produced {} bytes for {}",
            tool,
            output.stdout.len(),
            binary.display()
        );
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
