//! Template Filename Patterns
//!
//! The single shared table of template and partial filename patterns.
//! Both the scanner and the validator consult this table, so the two call
//! sites cannot drift apart.
//!
//! Matching rules: a pattern without `*` must equal the basename exactly
//! (case-sensitive); a pattern containing `*` follows shell-glob semantics,
//! so `page-*.php` matches any non-empty infix before `.php`.

use glob::Pattern;
use std::path::Path;
use std::sync::OnceLock;

/// The in-file token that flags a file as a partial, matched case-insensitively.
pub const MARKER: &str = "@ycf";

/// Root-level template patterns - files bindable to a single post.
const TEMPLATE_PATTERNS: &[&str] = &[
    "page.php",
    "single.php",
    "attachment.php",
    "page-*.php",
    "single-*.php",
];

/// Partial/archive stems. Each stem matches `<stem>.php` and `<stem>-*.php`.
const PARTIAL_STEMS: &[&str] = &[
    "header",
    "footer",
    "sidebar",
    "content",
    "comments",
    "searchform",
    "index",
    "front-page",
    "home",
    "archive",
    "category",
    "tag",
    "taxonomy",
    "author",
    "date",
    "search",
    "404",
];

/// Compiled pattern table for template/partial classification.
pub struct PatternTable {
    templates: Vec<Pattern>,
    partials: Vec<Pattern>,
}

impl PatternTable {
    pub fn new() -> Self {
        let templates = TEMPLATE_PATTERNS.iter().map(|p| compile(p)).collect();

        let mut partials = Vec::with_capacity(PARTIAL_STEMS.len() * 2);
        for stem in PARTIAL_STEMS {
            partials.push(compile(&format!("{stem}.php")));
            partials.push(compile(&format!("{stem}-*.php")));
        }

        Self {
            templates,
            partials,
        }
    }

    /// The process-wide shared table.
    pub fn shared() -> &'static PatternTable {
        static TABLE: OnceLock<PatternTable> = OnceLock::new();
        TABLE.get_or_init(PatternTable::new)
    }

    /// Does this basename name a post-bindable template?
    pub fn is_template_name(&self, basename: &str) -> bool {
        self.templates.iter().any(|p| p.matches(basename))
    }

    /// Does this basename name a partial or archive context?
    pub fn is_partial_name(&self, basename: &str) -> bool {
        self.partials.iter().any(|p| p.matches(basename))
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::new()
    }
}

// A bare `*` also matches the empty string; the `-*.php` forms require a
// non-empty infix before the extension.
fn compile(pattern: &str) -> Pattern {
    let source = pattern.replace("-*.php", "-?*.php");
    Pattern::new(&source).unwrap()
}

/// Basename of a path-like string (the final component).
pub fn basename(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(file)
}

/// Human-readable display name for a theme file.
///
/// Strips the extension, replaces `-`/`_` with spaces, title-cases each word:
/// `page-about.php` -> `Page About`.
pub fn display_name(file: &str) -> String {
    let stem = Path::new(basename(file))
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file);
    title_case(stem)
}

/// Title-case a `-`/`_`/space separated name: `hero_title` -> `Hero Title`.
pub fn title_case(s: &str) -> String {
    s.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
