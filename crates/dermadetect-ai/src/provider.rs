//! Classifier seam and model file configuration.

use std::path::{Path, PathBuf};

use crate::{DetectError, ImageTensor};

/// Anything that turns an input tensor into one probability per class.
///
/// Implementations must be shareable across request handlers; the server
/// holds one behind an `Arc<dyn ClassifierProvider>`.
pub trait ClassifierProvider: Send + Sync {
    fn classify(&self, input: &ImageTensor) -> Result<Vec<f32>, DetectError>;
}

/// When the model is loaded from disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Reload the model files for every classification. Nothing is shared
    /// between requests.
    #[default]
    PerRequest,
    /// Load once on first use and reuse the session afterwards.
    Cached,
}

impl LoadPolicy {
    pub fn from_cache_flag(cache: bool) -> Self {
        if cache { Self::Cached } else { Self::PerRequest }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerRequest => "per-request",
            Self::Cached => "cached",
        }
    }
}

/// Model definition file plus an optional external weights file.
///
/// The definition is an ONNX graph. Weights are usually embedded in it; large
/// models exported with external data keep them in a sidecar file that must
/// sit next to the graph under the name the graph references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub definition: PathBuf,
    pub weights: Option<PathBuf>,
}

impl ModelFiles {
    pub fn new(definition: impl Into<PathBuf>, weights: Option<PathBuf>) -> Self {
        Self {
            definition: definition.into(),
            weights,
        }
    }

    /// Fail early with a readable message if any configured file is absent,
    /// or if the weights sit somewhere ONNX Runtime will not look for them.
    pub fn check_exists(&self) -> anyhow::Result<()> {
        ensure_file(&self.definition, "model definition")?;
        if let Some(weights) = &self.weights {
            ensure_file(weights, "model weights")?;
            anyhow::ensure!(
                parent_dir(weights) == parent_dir(&self.definition),
                "model weights {} must be in the same directory as the definition {}",
                weights.display(),
                self.definition.display()
            );
        }
        Ok(())
    }
}

impl Default for ModelFiles {
    fn default() -> Self {
        Self::new("model.onnx", None)
    }
}

fn ensure_file(path: &Path, what: &str) -> anyhow::Result<()> {
    anyhow::ensure!(path.is_file(), "{what} not found at {}", path.display());
    Ok(())
}

/// Directory holding `path`; a bare file name resolves to the current one.
fn parent_dir(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().unwrap_or_else(|_| parent.to_path_buf())
}
