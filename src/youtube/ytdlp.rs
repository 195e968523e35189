use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::{error::AcquireError, pipeline::MediaExtractor, types::YtDlpSearchResult};

/// Wrapper around the `yt-dlp` binary.
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: String) -> Self {
        Self { program }
    }

    async fn exec(&self, args: &[&str]) -> Result<String, AcquireError> {
        let output = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AcquireError::Tool(format!("cannot run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AcquireError::Tool(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl MediaExtractor for YtDlp {
    async fn search(&self, query: &str) -> Result<Vec<String>, AcquireError> {
        let target = format!("ytsearch1:{}", query);
        let stdout = self
            .exec(&[
                "--dump-single-json",
                "--flat-playlist",
                "--no-warnings",
                "--quiet",
                &target,
            ])
            .await?;

        let result: YtDlpSearchResult = serde_json::from_str(&stdout)?;

        Ok(result
            .entries
            .into_iter()
            .filter_map(|entry| entry.url.or(entry.webpage_url))
            .collect())
    }

    async fn download(&self, url: &str, dir: &Path, stem: &str) -> Result<PathBuf, AcquireError> {
        // stems may contain `%`, which yt-dlp would read as a template field
        let template = dir.join(format!("{}.%(ext)s", stem.replace('%', "%%")));
        let template = template.to_string_lossy();

        let stdout = self
            .exec(&[
                "--format",
                "bestaudio/best",
                "--no-playlist",
                "--no-warnings",
                "--quiet",
                "--output",
                &template,
                "--no-simulate",
                "--print",
                "after_move:filepath",
                "--",
                url,
            ])
            .await?;

        let path = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .next_back()
            .map(PathBuf::from)
            .ok_or_else(|| AcquireError::Tool(format!("{} reported no output file", self.program)))?;

        if !path.is_file() {
            return Err(AcquireError::Tool(format!(
                "{} reported {} but the file does not exist",
                self.program,
                path.display()
            )));
        }

        Ok(path)
    }
}
