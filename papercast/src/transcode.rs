use crate::types::{PipelineError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// External audio transcoder/concatenator. Any failure is fatal.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Re-encode one clip into a uniform format.
    async fn reencode(&self, input: &Path, output: &Path) -> Result<()>;

    /// Concatenate already uniform clips, in order, into `output`.
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}

pub struct FfmpegTranscoder {
    binary: String,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<()> {
        debug!("Running {} {}", self.binary, args.join(" "));
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| PipelineError::Transcode(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .lines()
                .rev()
                .take(5)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(PipelineError::Transcode(format!(
                "{} exited with {}: {}",
                self.binary, output.status, tail
            )));
        }
        Ok(())
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

/// ffmpeg concat demuxer list, one `file '<name>'` line per input.
pub fn concat_list(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.to_string_lossy().into_owned());
            format!("file '{}'", name.replace('\'', r"'\''"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn reencode(&self, input: &Path, output: &Path) -> Result<()> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.run(&[
            "-y", "-i", &*input, "-ar", "44100", "-ac", "2", "-b:a", "160k", &*output,
        ])
        .await
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        let dir = output.parent().unwrap_or_else(|| Path::new("."));
        let list_path = dir.join("concat.txt");
        tokio::fs::write(&list_path, concat_list(inputs)).await?;

        let list = list_path.to_string_lossy();
        let out = output.to_string_lossy();
        self.run(&["-y", "-f", "concat", "-safe", "0", "-i", &*list, "-c", "copy", &*out])
            .await?;
        info!("Concatenated {} clips into {}", inputs.len(), output.display());
        Ok(())
    }
}
