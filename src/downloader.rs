use std::path::{Path, PathBuf};

use tokio::{
    fs::OpenOptions,
    io::{AsyncWrite, AsyncWriteExt},
};

use crate::error::Result;

/// Where a downloaded payload ends up.
#[async_trait::async_trait]
pub trait FileSaver: Send + Sync {
    /// Saves `bytes` under (a variant of) `filename`, returning the final path.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes into a download folder the way a browser does: never overwrite, add " (n)".
#[derive(Debug, Clone)]
pub struct DiskSaver {
    dir: PathBuf,
}

impl DiskSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl FileSaver for DiskSaver {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = sanitize_filename(filename);

        let mut n = 0u32;
        loop {
            let path = self.dir.join(numbered(&name, n));
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(f) => {
                    write_or_remove(f, bytes, &path).await?;
                    tracing::info!(path = %path.display(), size = bytes.len(), "saved download");
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Writes the whole payload; on failure the partial file at `path` is deleted.
async fn write_or_remove<W>(mut out: W, bytes: &[u8], path: &Path) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        out.write_all(bytes).await?;
        out.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(out);
        if let Err(rm) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %rm, "could not remove partial download");
        }
        return Err(e);
    }
    Ok(())
}

/// Last path component only, with characters that are invalid on common filesystems replaced.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').to_string();
    if cleaned.is_empty() {
        "video".to_string()
    } else {
        cleaned
    }
}

fn numbered(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{name} ({n})"),
    }
}
