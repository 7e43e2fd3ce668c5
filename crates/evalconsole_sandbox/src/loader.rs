//! Loading script files into a sandbox.

use std::path::PathBuf;

use evalconsole_foundation::{Error, Result};
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use tracing::{debug, warn};

use crate::sandbox::ScriptSandbox;
use crate::traits::ScriptLoader;

/// Loads scripts from the file system and runs them in a sandbox.
///
/// Sources are plain paths or `file://` URLs. A source that cannot be read
/// is logged and its load future never settles, the same as a script tag
/// whose URL never answers. A script that reads but throws is logged and
/// counts as loaded.
#[derive(Clone)]
pub struct FileScriptLoader {
    sandbox: ScriptSandbox,
}

impl FileScriptLoader {
    /// Creates a loader running scripts in `sandbox`.
    #[must_use]
    pub fn new(sandbox: ScriptSandbox) -> Self {
        Self { sandbox }
    }

    /// Reads and runs `src` immediately.
    ///
    /// # Errors
    ///
    /// Returns a load error if the file cannot be read, or the error the
    /// script raised.
    pub fn load_now(&self, src: &str) -> Result<()> {
        let path = resolve(src);
        let source = std::fs::read_to_string(&path)
            .map_err(|e| Error::load(src, e.to_string()))?;
        self.sandbox.run(&source)?;
        Ok(())
    }
}

impl ScriptLoader for FileScriptLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, ()> {
        match self.load_now(src) {
            Ok(()) => {
                debug!(src, "script loaded");
                future::ready(()).boxed_local()
            }
            Err(e) if e.is_eval() => {
                warn!(src, error = %e, "script raised while loading");
                future::ready(()).boxed_local()
            }
            Err(e) => {
                warn!(src, error = %e, "script is unreachable");
                future::pending().boxed_local()
            }
        }
    }
}

/// Turns a source into a path, stripping a `file://` scheme.
fn resolve(src: &str) -> PathBuf {
    PathBuf::from(src.strip_prefix("file://").unwrap_or(src))
}
