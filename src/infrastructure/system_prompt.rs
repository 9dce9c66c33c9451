//! Request-time system prompt resolution

use std::path::PathBuf;

use tokio::sync::OnceCell;
use tracing::debug;

/// Resolves the effective system prompt for a request: a caller-supplied
/// override wins verbatim; otherwise a static fallback file is read at most
/// once per process and cached. A missing file means "no default prompt",
/// never an error - some models run fine without one.
#[derive(Debug)]
pub struct SystemPromptResolver {
    path: PathBuf,
    fallback: OnceCell<Option<String>>,
}

impl SystemPromptResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: OnceCell::new(),
        }
    }

    pub async fn resolve(&self, supplied: Option<String>) -> Option<String> {
        if supplied.is_some() {
            return supplied;
        }

        self.fallback
            .get_or_init(|| async {
                match tokio::fs::read_to_string(&self.path).await {
                    Ok(text) => Some(text),
                    Err(e) => {
                        debug!(path = %self.path.display(), error = %e, "No default system prompt");
                        None
                    }
                }
            })
            .await
            .clone()
    }
}
