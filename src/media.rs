//! Audio transcoding through the `ffmpeg` binary.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{error::AcquireError, pipeline::Transcoder};

pub struct Ffmpeg {
    program: String,
}

impl Ffmpeg {
    pub fn new(program: String) -> Self {
        Self { program }
    }
}

#[async_trait]
impl Transcoder for Ffmpeg {
    async fn to_mp3(&self, input: &Path, output: &Path) -> Result<(), AcquireError> {
        let result = Command::new(&self.program)
            .args(["-y", "-nostdin", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-vn", "-codec:a", "libmp3lame", "-q:a", "2"])
            .arg(output)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AcquireError::Tool(format!("cannot run {}: {}", self.program, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(AcquireError::Tool(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
