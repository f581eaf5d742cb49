//! Pure functions for path calculations and name sanitizing.
//!
//! This module handles all path-related operations without
//! performing any I/O operations.

use crate::constants::MAX_NAME_LENGTH;
use std::path::{Component, Path, PathBuf};

/// Characters that may never appear in a path segment.
const RESERVED_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Sanitizes an arbitrary display string into a single safe path segment.
///
/// Reserved characters become `_`; control, format and private-use
/// characters, noncharacters and any whitespace other than a plain space
/// are dropped; surrounding spaces are trimmed and
/// the result is capped at [`MAX_NAME_LENGTH`] characters. A name made only
/// of dots turns into underscores so it can never mean `.` or `..`.
///
/// Total and idempotent: `sanitize_name(&sanitize_name(x)) == sanitize_name(x)`.
/// May return an empty string; callers pick their own fallback.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter_map(|c| {
            if RESERVED_CHARS.contains(&c) {
                Some('_')
            } else if is_printable(c) {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    let truncated: String = cleaned.trim().chars().take(MAX_NAME_LENGTH).collect();
    let safe = truncated.trim_end();

    if !safe.is_empty() && safe.chars().all(|c| c == '.') {
        return "_".repeat(safe.chars().count());
    }

    safe.to_string()
}

/// Format (Cf) and private-use (Co) ranges plus noncharacters. Bidi
/// overrides and zero-width characters live here.
const INVISIBLE_RANGES: &[(char, char)] = &[
    ('\u{00AD}', '\u{00AD}'),
    ('\u{0600}', '\u{0605}'),
    ('\u{061C}', '\u{061C}'),
    ('\u{06DD}', '\u{06DD}'),
    ('\u{070F}', '\u{070F}'),
    ('\u{0890}', '\u{0891}'),
    ('\u{08E2}', '\u{08E2}'),
    ('\u{180E}', '\u{180E}'),
    ('\u{200B}', '\u{200F}'),
    ('\u{202A}', '\u{202E}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206F}'),
    ('\u{E000}', '\u{F8FF}'),
    ('\u{FDD0}', '\u{FDEF}'),
    ('\u{FEFF}', '\u{FEFF}'),
    ('\u{FFF9}', '\u{FFFB}'),
    ('\u{110BD}', '\u{110BD}'),
    ('\u{110CD}', '\u{110CD}'),
    ('\u{13430}', '\u{1343F}'),
    ('\u{1BCA0}', '\u{1BCA3}'),
    ('\u{1D173}', '\u{1D17A}'),
    ('\u{E0001}', '\u{E0001}'),
    ('\u{E0020}', '\u{E007F}'),
    ('\u{F0000}', '\u{FFFFD}'),
    ('\u{100000}', '\u{10FFFD}'),
];

fn is_printable(c: char) -> bool {
    !c.is_control() && (c == ' ' || !c.is_whitespace()) && !is_invisible(c)
}

fn is_invisible(c: char) -> bool {
    // U+xxFFFE and U+xxFFFF are noncharacters in every plane.
    (c as u32 & 0xFFFE) == 0xFFFE
        || INVISIBLE_RANGES
            .iter()
            .any(|&(start, end)| (start..=end).contains(&c))
}

/// Renders a relative path as a link target: forward slashes only.
pub fn to_link(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Calculates the link from the file at `from` to the file at `to`.
///
/// Both paths are relative to the same output root. The result is relative
/// to the directory containing `from`, e.g. `x/A.md` to `x/y/B.md` is
/// `y/B.md` and `x/y/A.md` to `x/B.md` is `../B.md`.
pub fn relative_link(from: &Path, to: &Path) -> String {
    let from_dir = from.parent().unwrap_or_else(|| Path::new(""));

    match pathdiff::diff_paths(to, from_dir) {
        Some(relative) => to_link(&relative),
        None => to_link(to),
    }
}

/// Checks that `path` stays strictly inside `base_dir` once `.` and `..`
/// components are resolved lexically. `base_dir` itself does not count.
pub fn is_contained_in(path: &Path, base_dir: &Path) -> bool {
    let normalized = normalize_path(path);
    let normalized_base = normalize_path(base_dir);

    normalized != normalized_base && normalized.starts_with(&normalized_base)
}

/// Normalizes a path by resolving `..` and `.` components without touching
/// the filesystem. Leading `..` components that would climb above the start
/// of a relative path are kept so escapes stay visible.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            Component::CurDir => {}
            c => components.push(c),
        }
    }

    components.into_iter().collect()
}
