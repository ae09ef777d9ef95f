//! Per-invocation transcript of the dispatched process
//!
//! One append-only text file per dispatch call: a start marker with the
//! assembled command line, the mirrored combined child output in arrival
//! order, an exit-code line and an end marker. The file name carries a UTC
//! timestamp so concurrent dispatches never share a transcript.

use chrono::Utc;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct Transcript {
    path: PathBuf,
    // Single serialized writer; whole lines only, so interleaved child
    // streams never split each other mid-line.
    file: Mutex<File>,
}

impl Transcript {
    /// Create the transcript file under `dir`, named `{label}_{utc stamp}.log`
    ///
    /// Invocations landing on the same millisecond get a numeric suffix
    /// instead of sharing a file.
    pub async fn create(dir: &Path, label: &str) -> io::Result<Self> {
        fs::create_dir_all(dir).await?;
        let stamp = Utc::now().format("%Y%m%d_%H%M%S%3f").to_string();

        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{}_{}.log", label, stamp)
            } else {
                format!("{}_{}_{}.log", label, stamp, attempt)
            };
            let path = dir.join(name);
            match OpenOptions::new()
                .create_new(true)
                .append(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    return Ok(Self {
                        path,
                        file: Mutex::new(file),
                    })
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < 1000 => {
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line and flush, keeping the file current for tailing
    /// while a watch-mode child runs
    pub async fn line(&self, text: &str) -> io::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(text.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }

    pub async fn start_marker(&self, command_line: &str) -> io::Result<()> {
        self.line(&format!("==== started {} ====", Utc::now().to_rfc3339()))
            .await?;
        self.line(&format!("command: {}", command_line)).await
    }

    pub async fn exit_code(&self, code: i32) -> io::Result<()> {
        self.line(&format!("exit code: {}", code)).await
    }

    pub async fn failure(&self, reason: &str) -> io::Result<()> {
        self.line(&format!("FAILED: {}", reason)).await
    }

    pub async fn end_marker(&self) -> io::Result<()> {
        self.line(&format!("==== ended {} ====", Utc::now().to_rfc3339()))
            .await
    }
}
