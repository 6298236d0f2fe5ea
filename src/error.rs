//! Error types.
//!
//! Loading is the only fallible operation of the viewer. Everything else
//! (empty models, missing cameras, models without a container group) is a
//! guarded edge case and never surfaces as an error.

use thiserror::Error;

/// Why an asset load failed.
///
/// A failure is reported once through the log and handed back to the caller.
/// There is no retry and no partial result.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("failed to fetch {path}: {reason}")]
    Transport { path: String, reason: String },

    #[error("failed to parse glTF: {0}")]
    Parse(#[from] gltf::Error),

    #[error("buffer {index} cannot be loaded: {reason}")]
    UnsupportedBuffer { index: usize, reason: String },

    #[error("asset {0} contains no scene")]
    MissingScene(String),
}

impl LoadFailure {
    pub(crate) fn transport(path: &str, err: anyhow::Error) -> Self {
        Self::Transport {
            path: path.to_string(),
            reason: format!("{err:#}"),
        }
    }
}

/// A format key that is neither `gltf` nor `glb`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown model format {0:?}, expected \"gltf\" or \"glb\"")]
pub struct UnknownFormat(pub String);

/// A color string that is not `#rrggbb`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}, expected #rrggbb")]
pub struct ParseColorError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failure_keeps_the_context_chain() {
        let err = anyhow::anyhow!("file not found").context("opening model.glb");
        let failure = LoadFailure::transport("models/model.glb", err);
        let text = failure.to_string();
        assert!(text.starts_with("failed to fetch models/model.glb"));
        assert!(text.contains("opening model.glb"));
        assert!(text.contains("file not found"));
    }

    #[test]
    fn unknown_format_names_the_input() {
        assert_eq!(
            UnknownFormat("obj".into()).to_string(),
            "unknown model format \"obj\", expected \"gltf\" or \"glb\""
        );
    }
}
