use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Opening fence models like to wrap JSON answers in.
const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// One file the model asked us to write.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileSpec {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    /// Not JSON, not an array, or an entry without string `filename`/`content`.
    #[error("response is not a JSON array of {{filename, content}} objects: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("entry {index} has an empty filename")]
    EmptyFilename { index: usize },

    /// Files listed in `written` were already on disk when this failed.
    #[error("failed to write {}: {}", .path.display(), .source)]
    Fs {
        path: PathBuf,
        written: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

impl MaterializeError {
    /// True when nothing was written because the response itself was rejected.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::EmptyFilename { .. })
    }
}

/// Trim the response and drop a surrounding ```json fence if present.
pub fn strip_fences(raw: &str) -> &str {
    let text = raw.trim();
    let text = text.strip_prefix(FENCE_OPEN).unwrap_or(text);
    text.strip_suffix(FENCE_CLOSE).unwrap_or(text)
}

/// Parse the whole batch up front so a bad entry means nothing gets written.
pub fn parse_file_specs(raw: &str) -> Result<Vec<FileSpec>, MaterializeError> {
    let specs: Vec<FileSpec> = serde_json::from_str(strip_fences(raw))?;
    if let Some(index) = specs.iter().position(|s| s.filename.is_empty()) {
        return Err(MaterializeError::EmptyFilename { index });
    }
    Ok(specs)
}

/// Writes model output below a root directory.
#[derive(Debug, Clone)]
pub struct Materializer {
    root: PathBuf,
}

impl Materializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parse `raw` and write every entry in order.
    ///
    /// `on_written` fires after each file lands on disk. Returns the written
    /// paths (joined onto the root), one per entry, duplicates included.
    pub fn materialize<F>(&self, raw: &str, on_written: F) -> Result<Vec<PathBuf>, MaterializeError>
    where
        F: FnMut(&FileSpec, &Path),
    {
        let specs = parse_file_specs(raw)?;
        tracing::debug!(count = specs.len(), root = %self.root.display(), "parsed file specs");
        self.write_all(&specs, on_written)
    }

    pub fn write_all<F>(&self, specs: &[FileSpec], mut on_written: F) -> Result<Vec<PathBuf>, MaterializeError>
    where
        F: FnMut(&FileSpec, &Path),
    {
        let mut written = Vec::with_capacity(specs.len());

        for spec in specs {
            let path = self.root.join(&spec.filename);

            let res = self.ensure_parent(&spec.filename).and_then(|()| std::fs::write(&path, &spec.content));
            if let Err(source) = res {
                return Err(MaterializeError::Fs { path, written, source });
            }

            tracing::info!(file = %spec.filename, bytes = spec.content.len(), "wrote file");
            on_written(spec, &path);
            written.push(path);
        }

        Ok(written)
    }

    fn ensure_parent(&self, filename: &str) -> std::io::Result<()> {
        match Path::new(filename).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(self.root.join(parent)),
            _ => Ok(()),
        }
    }
}
