use crate::merge::StoreError;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Runs the external UFO compiler.
///
/// The merge itself is synchronous, so each compilation gets its own
/// current-thread runtime and is driven to completion before returning.
#[derive(Debug, Clone)]
pub struct FontCompiler {
    program: String,
}

impl FontCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Compile the UFO at `ufo_path` into a binary font at `output_path`.
    ///
    /// `build_dir` receives the compiler's intermediate files.
    pub fn compile(&self, ufo_path: &Path, output_path: &Path, build_dir: &Path) -> Result<(), StoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.compile_with_fontc(ufo_path, output_path, build_dir))
    }

    async fn compile_with_fontc(
        &self,
        ufo_path: &Path,
        output_path: &Path,
        build_dir: &Path,
    ) -> Result<(), StoreError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--build-dir")
            .arg(build_dir)
            .arg("--output-file")
            .arg(output_path)
            .arg(ufo_path);
        debug!("Running {:?}", cmd);

        let output = cmd
            .output()
            .await
            .map_err(|e| StoreError::Compile(format!("cannot run '{}': {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StoreError::Compile(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        if !tokio::fs::try_exists(output_path).await? {
            return Err(StoreError::Compile(format!(
                "'{}' reported success but wrote nothing to {}",
                self.program,
                output_path.display()
            )));
        }

        Ok(())
    }
}
