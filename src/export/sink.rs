use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use super::Artifact;

/// Writes finished artifacts into the export directory.
#[derive(Debug, Clone)]
pub struct ArtifactSink {
    directory: PathBuf,
}

impl ArtifactSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        ArtifactSink {
            directory: directory.into(),
        }
    }

    /// Configured directory, else the user's download directory, else the
    /// working directory.
    pub fn resolve(configured: Option<&Path>) -> Self {
        let directory = configured
            .map(Path::to_path_buf)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        ArtifactSink::new(directory)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub async fn save(&self, artifact: &Artifact) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(&artifact.name);
        tokio::fs::write(&path, &artifact.bytes).await?;
        info!(path = %path.display(), bytes = artifact.bytes.len(), "artifact saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saves_into_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ArtifactSink::new(dir.path().join("exports"));
        let artifact = Artifact {
            name: "report.pdf".to_string(),
            media_type: "application/pdf",
            bytes: b"%PDF-1.5".to_vec(),
        };
        let path = sink.save(&artifact).await.unwrap();
        assert_eq!(path, dir.path().join("exports").join("report.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.5");
    }

    #[test]
    fn configured_directory_wins() {
        let sink = ArtifactSink::resolve(Some(Path::new("/tmp/wsdiag-out")));
        assert_eq!(sink.directory(), Path::new("/tmp/wsdiag-out"));
    }
}
