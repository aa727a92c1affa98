//! Hosts-file serialization of a finished target.

use crate::error::{Result, SieveError};
use crate::merge::BlocklistOutput;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub const SINK_ADDR: &str = "0.0.0.0";

/// Renders one `0.0.0.0 <token>` line per token, in sorted order.
pub fn render(domains: &BlocklistOutput) -> String {
    let mut out = String::with_capacity(domains.len() * 32);
    for domain in domains {
        out.push_str(SINK_ADDR);
        out.push(' ');
        out.push_str(domain);
        out.push('\n');
    }
    out
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SieveError {
    let path = path.to_path_buf();
    move |source| SieveError::Io { path, source }
}

/// Replaces `path` with `contents` via a sibling temp file and rename.
pub async fn write_replacing(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(io_err(parent))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).await.map_err(io_err(&tmp))?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(io_err(path)(e));
    }
    Ok(())
}

/// Writes targets as `<output_dir>/<target>.txt`.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn target_path(&self, target: &str) -> PathBuf {
        self.output_dir.join(format!("{}.txt", target))
    }

    pub async fn write(&self, target: &str, domains: &BlocklistOutput) -> Result<PathBuf> {
        let path = self.target_path(target);
        write_replacing(&path, &render(domains)).await?;
        info!("Wrote {} domains to {}", domains.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    fn set(items: &[&str]) -> BlocklistOutput {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_sorted() {
        let out = render(&set(&["zz.com", "*.wild.org", "aa.net"]));
        assert_eq!(out, "0.0.0.0 *.wild.org\n0.0.0.0 aa.net\n0.0.0.0 zz.com\n");
        assert_eq!(render(&BlocklistOutput::new()), "");
    }

    #[test]
    fn test_written_lines_parse_back() {
        let domains = set(&["track.example.com", "a-b.c_d.io", "*.subtree.net"]);
        for line in render(&domains).lines() {
            let parsed = parse_line(line).unwrap();
            let token = if parsed.wildcard {
                format!("*.{}", parsed.domain)
            } else {
                parsed.domain
            };
            assert!(domains.contains(&token), "{} did not round trip", line);
        }
    }

    #[tokio::test]
    async fn test_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path().join("hosts"));

        let path = writer.write("feed", &set(&["old.com", "stale.com"])).await.unwrap();
        writer.write("feed", &set(&["new.com"])).await.unwrap();

        assert_eq!(path, dir.path().join("hosts").join("feed.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0.0.0.0 new.com\n");
        assert!(!dir.path().join("hosts").join("feed.txt.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_rename_cleans_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory in the way makes the rename fail
        let path = dir.path().join("blocked.txt");
        std::fs::create_dir_all(path.join("inner")).unwrap();

        let err = write_replacing(&path, "0.0.0.0 a.com\n").await.unwrap_err();

        assert!(matches!(err, SieveError::Io { .. }));
        assert!(!dir.path().join("blocked.txt.tmp").exists());
    }
}
