//! Filesystem completion — directory listings and filename extension.
//!
//! Works on the path token under the cursor. A token that is empty or
//! names an existing directory gets a listing of that directory; any
//! other token is split into parent directory + leaf prefix, the parent
//! is listed filtered by the prefix, and the longest common continuation
//! of the matches is what the editor inserts into the buffer.
//!
//! Listings render as a multi-column grid with directory entries in
//! blue. Unreadable directories silently produce no entries. Entries are
//! sorted by name so grids and continuations are deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use pl_term::ansi;

/// Padding added to the longest entry name to get the grid column width.
const GRID_GUTTER: usize = 5;

// ---------------------------------------------------------------------------
// Home directory and token expansion
// ---------------------------------------------------------------------------

/// The user's home directory: `$HOME`, then the password database, then
/// the current directory.
#[must_use]
pub fn home_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        if !home.is_empty() {
            return PathBuf::from(home);
        }
    }
    if let Some(dir) = passwd_home() {
        return dir;
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(unix)]
fn passwd_home() -> Option<PathBuf> {
    use std::ffi::CStr;
    use std::os::unix::ffi::OsStrExt;

    // getpwuid returns a pointer into static storage; we copy the
    // directory out before returning.
    let pw = unsafe { libc::getpwuid(libc::getuid()) };
    if pw.is_null() {
        return None;
    }
    let dir = unsafe { (*pw).pw_dir };
    if dir.is_null() {
        return None;
    }
    let bytes = unsafe { CStr::from_ptr(dir) }.to_bytes();
    if bytes.is_empty() {
        return None;
    }
    Some(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn passwd_home() -> Option<PathBuf> {
    None
}

/// Expand a path token: a leading `~` is replaced with the home
/// directory, everything else passes through.
#[must_use]
pub fn expand_token(token: &str) -> PathBuf {
    match token.strip_prefix('~') {
        Some(rest) => {
            let mut home = home_dir().into_os_string();
            home.push(rest);
            PathBuf::from(home)
        }
        None => PathBuf::from(token),
    }
}

// ---------------------------------------------------------------------------
// Directory listings
// ---------------------------------------------------------------------------

/// File names in `dir`, sorted. An empty `dir` means the current
/// directory; unreadable directories yield nothing.
#[must_use]
pub fn files_in_dir(dir: &Path) -> Vec<String> {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    let Ok(iter) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = iter
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// File names in the parent of `path` that start with its final
/// component, sorted. A bare filename is matched against the current
/// directory.
#[must_use]
pub fn files_match_prefix(path: &Path) -> Vec<String> {
    let prefix = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut names = files_in_dir(&parent_dir(path));
    names.retain(|n| n.as_bytes().starts_with(prefix.as_bytes()));
    names
}

/// The directory containing `path`'s final component; the current
/// directory for a bare filename.
#[must_use]
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

// ---------------------------------------------------------------------------
// Longest common continuation
// ---------------------------------------------------------------------------

/// The longest string every word continues with past byte offset
/// `from`. All words are assumed to agree on their first `from` bytes.
#[must_use]
pub fn common_continuation(words: &[String], from: usize) -> String {
    let Some(first) = words.first() else {
        return String::new();
    };
    let mut end = from;
    loop {
        if first.len() <= end {
            break;
        }
        let b = first.as_bytes()[end];
        let all_agree = words[1..]
            .iter()
            .all(|w| w.len() > end && w.as_bytes()[end] == b);
        if !all_agree {
            break;
        }
        end += 1;
    }
    String::from_utf8_lossy(&first.as_bytes()[from..end]).into_owned()
}

// ---------------------------------------------------------------------------
// Grid rendering
// ---------------------------------------------------------------------------

/// Render entries as a multi-column grid, directories in blue.
///
/// Starts with CRLF to drop below the prompt line; each full grid row
/// ends with erase-to-eol + CRLF. `dir` is where the entries live (for
/// the is-directory check); `columns` is the terminal width.
#[must_use]
pub fn format_grid(entries: &[String], dir: &Path, columns: usize) -> Vec<u8> {
    if entries.is_empty() {
        return Vec::new();
    }

    let longest = entries.iter().map(String::len).max().unwrap_or(0);
    let col_width = longest + GRID_GUTTER;
    let col_count = (columns / col_width).max(1);

    let mut out = Vec::new();
    out.extend_from_slice(b"\n\r");
    for (i, name) in entries.iter().enumerate() {
        let is_dir = fs::metadata(dir.join(name))
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if is_dir {
            let _ = ansi::dir_highlight(&mut out);
            out.extend_from_slice(name.as_bytes());
            let _ = ansi::sgr_reset(&mut out);
        } else {
            out.extend_from_slice(name.as_bytes());
        }
        if i % col_count == col_count - 1 {
            let _ = ansi::erase_to_eol(&mut out);
            out.extend_from_slice(b"\n\r");
        } else {
            out.resize(out.len() + (col_width - name.len()), b' ');
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
