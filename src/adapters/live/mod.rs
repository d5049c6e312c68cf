//! Live adapters for real external interactions.

pub mod analysis;
pub mod clock;
pub mod document;
pub mod id_gen;
pub mod kv;
pub mod sleeper;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

pub use analysis::{HealthStatus, HttpAnalysisService};
pub use clock::LiveClock;
pub use document::{MarkdownBuffer, MarkdownDocument, COMMENTS_MARKER};
pub use id_gen::LiveIdGenerator;
pub use kv::JsonFileStore;
pub use sleeper::TokioSleeper;

/// Replaces `path` with `contents` through a temporary sibling and a rename,
/// so readers never see a half-written file.
fn replace_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = temp_sibling(path);
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}

/// `<file name>.tmp` next to `path`.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}
