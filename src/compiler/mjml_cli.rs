//! Transform backed by the `mjml` command-line compiler.
//!
//! Each template is compiled by one child process:
//!
//! ```text
//! mjml [extra args] --stdin --stdout \
//!     --config.minify=true --config.beautify=false \
//!     --config.validationLevel=soft \
//!     --config.filePath=<source path> \
//!     --config.fonts=<json>
//! ```
//!
//! The source is fed through stdin and the HTML read back from stdout.
//! Validation messages arrive on stderr, one per line. Under soft validation
//! the compiler still prints HTML when it reports problems, so a non-zero
//! exit status only counts as a failure when stdout is empty.

use super::transform::{Transform, TransformError, TransformMessage, TransformOptions, TransformOutput};
use crate::config::CompilerConfig;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MjmlCli {
    program: String,
    args: Vec<String>,
}

impl MjmlCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(config.command.clone()).with_args(config.args.iter().cloned())
    }

    /// Arguments placed before the generated ones (e.g. `npx` + `mjml`).
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn option_args(
        &self,
        source_path: &Path,
        options: &TransformOptions,
    ) -> Result<Vec<OsString>, TransformError> {
        let mut args: Vec<OsString> = vec![
            "--stdin".into(),
            "--stdout".into(),
            format!("--config.minify={}", options.minify).into(),
            format!("--config.beautify={}", options.beautify).into(),
            format!(
                "--config.validationLevel={}",
                options.validation_level.as_str()
            )
            .into(),
        ];

        let mut file_path = OsString::from("--config.filePath=");
        file_path.push(source_path.as_os_str());
        args.push(file_path);

        if !options.fonts.is_empty() {
            let fonts = serde_json::to_string(&options.fonts)?;
            args.push(format!("--config.fonts={fonts}").into());
        }

        Ok(args)
    }
}

impl Transform for MjmlCli {
    fn transform(
        &self,
        source: &str,
        source_path: &Path,
        options: &TransformOptions,
    ) -> Result<TransformOutput, TransformError> {
        let option_args = self.option_args(source_path, options)?;
        debug!(program = %self.program, source = %source_path.display(), "running transform");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(&option_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TransformError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| TransformError::Failed {
            message: format!("{} stdin was not captured", self.program),
        })?;

        // Feed stdin on its own thread so a large stdout can't deadlock the pipe.
        let (output, fed) = thread::scope(|scope| {
            let feeder = scope.spawn(move || stdin.write_all(source.as_bytes()));
            (child.wait_with_output(), feeder.join())
        });
        let output = output?;
        if let Ok(Err(e)) = fed {
            debug!(error = %e, "transform closed stdin before reading all input");
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let html = String::from_utf8(output.stdout)?;

        if !output.status.success() && html.trim().is_empty() {
            let message = if stderr.trim().is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(TransformError::Failed { message });
        }

        let errors = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| TransformMessage {
                formatted_message: line.to_string(),
            })
            .collect();

        Ok(TransformOutput { html, errors })
    }
}
