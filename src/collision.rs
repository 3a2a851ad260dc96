//! Name collision handling at a destination directory.
//!
//! A taken `photo.jpg` is retried as `photo_(1).jpg`, `photo_(2).jpg`, ...
//! until a free name turns up. Numbering restarts at 1 for every file and
//! only depends on what currently exists, so gaps are reused.

use crate::confirm::Confirm;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Final path to move to. `suffix` is the number appended, if any.
    Available { path: PathBuf, suffix: Option<u32> },
    /// A proposed rename was rejected.
    Declined,
}

/// Split a file name into root and extension (without the dot) at the last
/// dot. Leading dots belong to the root, so `.bashrc` has no extension.
/// Works on the raw name, so non-UTF-8 bytes survive untouched.
pub fn split_name(filename: &OsStr) -> (&OsStr, Option<&OsStr>) {
    let path = Path::new(filename);
    match path.file_stem() {
        Some(stem) => (stem, path.extension()),
        None => (filename, None),
    }
}

pub fn candidate_name(root: &OsStr, ext: Option<&OsStr>, n: u32) -> OsString {
    let mut name = root.to_os_string();
    name.push(format!("_({})", n));
    if let Some(ext) = ext {
        name.push(".");
        name.push(ext);
    }
    name
}

// Broken symlinks count as taken: a rename would replace them.
fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Find a free name for `filename` inside `dir`.
///
/// With `confirm` set, every renumbered candidate is proposed before it is
/// taken and the first refusal yields [`Resolution::Declined`]. Without it
/// the first free name is used silently.
pub fn resolve(dir: &Path, filename: &OsStr, confirm: Option<&dyn Confirm>) -> Resolution {
    let mut path = dir.join(filename);
    if !occupied(&path) {
        return Resolution::Available { path, suffix: None };
    }

    let (root, ext) = split_name(filename);
    let mut n: u32 = 0;
    while occupied(&path) {
        n += 1;
        let candidate = dir.join(candidate_name(root, ext, n));

        if let Some(confirm) = confirm {
            let taken = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            let prompt = format!(
                "\"{}\" already exists in {}. Rename file to \"{}\"? \
                 Declining moves it to the unsorted directory, which has NO overwrite protection.",
                taken,
                dir.display(),
                candidate.display(),
            );
            if !confirm.confirm(&prompt) {
                warn!(
                    "Rename of {} to {} declined",
                    filename.to_string_lossy(),
                    candidate.display()
                );
                return Resolution::Declined;
            }
        }

        path = candidate;
    }

    warn!(
        "{} collides in {}, using suffix ({})",
        filename.to_string_lossy(),
        dir.display(),
        n
    );
    Resolution::Available {
        path,
        suffix: Some(n),
    }
}
