//! Site build invocation.
//!
//! The build runs synchronously with no timeout. Concurrent submissions
//! may run the build executable concurrently.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Build errors. Only `Failed` carries captured output.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to launch {}: {source}", .exec.display())]
    Launch {
        exec: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to collect output of {}: {source}", .exec.display())]
    Output {
        exec: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {status}", .exec.display())]
    Failed {
        exec: PathBuf,
        status: ExitStatus,
        output: String,
    },

    #[error("build task aborted: {0}")]
    Aborted(String),
}

impl BuildError {
    /// Captured stdout/stderr, empty if the process never ran.
    pub fn output(&self) -> &str {
        match self {
            Self::Failed { output, .. } => output,
            Self::Launch { .. } | Self::Output { .. } | Self::Aborted(_) => "",
        }
    }
}

/// Regenerates the site after content changes.
pub trait SiteBuilder: Send + Sync {
    /// Run one build to completion, returning its combined output.
    fn build(&self) -> Result<String, BuildError>;
}

/// Runs an external executable (normally `hugo`) in the project directory.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    exec: PathBuf,
    project_dir: PathBuf,
}

impl CommandBuilder {
    pub fn new(exec: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            exec: exec.into(),
            project_dir: project_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.build_exec, &config.project_dir)
    }

    pub fn exec(&self) -> &Path {
        &self.exec
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }
}

impl SiteBuilder for CommandBuilder {
    fn build(&self) -> Result<String, BuildError> {
        info!(
            exec = %self.exec.display(),
            project_dir = %self.project_dir.display(),
            "Starting site build"
        );

        let launch = |source| BuildError::Launch {
            exec: self.exec.clone(),
            source,
        };
        let collect = |source| BuildError::Output {
            exec: self.exec.clone(),
            source,
        };

        // One pipe for both streams keeps the tool's own write order.
        let (mut reader, writer) = std::io::pipe().map_err(launch)?;
        let mut child = Command::new(&self.exec)
            .current_dir(&self.project_dir)
            .stdin(Stdio::null())
            .stdout(writer.try_clone().map_err(launch)?)
            .stderr(writer)
            .spawn()
            .map_err(launch)?;

        // The command and its pipe ends are dropped by now, so EOF arrives
        // once the child exits.
        let mut raw = Vec::new();
        let read = reader.read_to_end(&mut raw);
        let status = child.wait().map_err(collect)?;
        read.map_err(collect)?;

        let output = String::from_utf8_lossy(&raw).into_owned();

        if !status.success() {
            warn!(%status, "Site build failed");
            return Err(BuildError::Failed {
                exec: self.exec.clone(),
                status,
                output,
            });
        }

        info!("Site build finished");
        debug!(output = %output, "Build output");

        Ok(output)
    }
}

/// Run a build on the blocking pool and wait for it.
pub async fn run(builder: Arc<dyn SiteBuilder>) -> Result<String, BuildError> {
    tokio::task::spawn_blocking(move || builder.build())
        .await
        .map_err(|e| BuildError::Aborted(e.to_string()))?
}
