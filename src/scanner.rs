//! Theme Scanning
//!
//! Walks a theme tree and classifies each file as a template (post-bindable,
//! root-level only), a partial (shared/listing context), or neither. The two
//! classifications are independent: a root file can match a template pattern
//! while its content carries the partial marker.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;
use crate::patterns::{basename, display_name, PatternTable, MARKER};

/// Marker detection reads at most this many bytes of a file.
const MARKER_SCAN_BYTES: u64 = 8192;
/// ...and inspects at most this many lines within that window.
const MARKER_SCAN_LINES: usize = 30;

/// A candidate file: its path relative to the theme root, and where it
/// actually lives on disk.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub relative: String,
    pub absolute: PathBuf,
}

/// One classified theme file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeFile {
    /// Path relative to the theme root
    pub file: String,
    /// Absolute path on disk
    pub path: PathBuf,
    /// Human-readable display name
    pub name: String,
}

impl ThemeFile {
    fn new(relative: &str, absolute: &Path) -> Self {
        Self {
            file: relative.to_string(),
            path: absolute.to_path_buf(),
            name: display_name(relative),
        }
    }
}

/// A custom page template registered by the host platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredTemplate {
    pub file: String,
    /// Host-registered display name; derived from the filename when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Scan result: templates and partials in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeIndex {
    pub templates: Vec<ThemeFile>,
    pub partials: Vec<ThemeFile>,
}

impl ThemeIndex {
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.partials.is_empty()
    }
}

/// Classifies theme files against the shared pattern table.
pub struct ThemeScanner {
    table: &'static PatternTable,
}

impl ThemeScanner {
    pub fn new() -> Self {
        Self {
            table: PatternTable::shared(),
        }
    }

    /// Classify an explicit candidate list, preserving its order.
    ///
    /// `registered` are host-registered custom page templates; the ones at
    /// tree root are merged into `templates` afterwards, deduplicated by
    /// filename.
    pub fn scan(&self, files: &[FileDescriptor], registered: &[RegisteredTemplate]) -> ThemeIndex {
        let mut index = ThemeIndex::default();

        for file in files {
            let base = basename(&file.relative);
            let at_root = !file.relative.contains('/');

            if at_root && self.table.is_template_name(base) {
                index.templates.push(ThemeFile::new(&file.relative, &file.absolute));
            }

            if self.table.is_partial_name(base) || has_marker(&file.absolute) {
                index.partials.push(ThemeFile::new(&file.relative, &file.absolute));
            }
        }

        self.merge_registered(&mut index, files, registered);

        debug!(
            templates = index.templates.len(),
            partials = index.partials.len(),
            "theme scan complete"
        );

        index
    }

    /// Walk a theme root and classify every `.php` file under it.
    pub fn scan_dir(&self, root: &Path, registered: &[RegisteredTemplate]) -> Result<ThemeIndex> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().map(|e| e != "php").unwrap_or(true) {
                continue;
            }

            let relative = match path.strip_prefix(root) {
                Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
                Err(_) => continue,
            };

            files.push(FileDescriptor {
                relative,
                absolute: path.to_path_buf(),
            });
        }

        Ok(self.scan(&files, registered))
    }

    fn merge_registered(
        &self,
        index: &mut ThemeIndex,
        files: &[FileDescriptor],
        registered: &[RegisteredTemplate],
    ) {
        for reg in registered {
            // Only root-level files qualify as page templates
            if reg.file.contains('/') {
                continue;
            }
            if index.templates.iter().any(|t| t.file == reg.file) {
                continue;
            }

            let absolute = files
                .iter()
                .find(|f| f.relative == reg.file)
                .map(|f| f.absolute.clone())
                .unwrap_or_else(|| PathBuf::from(&reg.file));

            index.templates.push(ThemeFile {
                file: reg.file.clone(),
                path: absolute,
                name: reg
                    .name
                    .clone()
                    .unwrap_or_else(|| display_name(&reg.file)),
            });
        }
    }
}

impl Default for ThemeScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Does the head of this file carry the partial marker?
///
/// Reads at most 8 KiB and inspects at most the first 30 lines of that
/// window, case-insensitively. An unreadable file is a negative signal,
/// not an error.
pub fn has_marker(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        debug!(path = %path.display(), "marker scan skipped unreadable file");
        return false;
    };

    let mut head = Vec::with_capacity(MARKER_SCAN_BYTES as usize);
    if file.take(MARKER_SCAN_BYTES).read_to_end(&mut head).is_err() {
        return false;
    }

    let text = String::from_utf8_lossy(&head);
    text.lines()
        .take(MARKER_SCAN_LINES)
        .any(|line| line.to_ascii_lowercase().contains(MARKER))
}
