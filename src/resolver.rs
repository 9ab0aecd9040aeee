//! Template Resolution
//!
//! Maps a post to the theme template file that governs it. Pure policy over
//! read-only filesystem lookups.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Sentinel value the host uses for "no custom template assigned".
const DEFAULT_TEMPLATE: &str = "default";

/// The slice of a post this crate needs to see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub post_type: String,
    /// Custom page-template assignment, when the host exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_template: Option<String>,
}

impl Post {
    pub fn new(id: u64, post_type: impl Into<String>) -> Self {
        Self {
            id,
            post_type: post_type.into(),
            page_template: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.page_template = Some(template.into());
        self
    }
}

/// Resolves the template filename for a post against a theme root.
pub struct TemplateResolver {
    theme_root: PathBuf,
}

impl TemplateResolver {
    pub fn new(theme_root: impl AsRef<Path>) -> Self {
        Self {
            theme_root: theme_root.as_ref().to_path_buf(),
        }
    }

    /// Resolve the template filename governing `post`.
    ///
    /// Pages honor a custom template assignment unless it is the `default`
    /// sentinel. Other post types get `single-<type>.php` when that file
    /// exists at the theme root; plain posts fall back to `single.php`, and
    /// any other type returns the computed name even when the file is absent
    /// so the admin surface can offer to create it.
    pub fn resolve(&self, post: &Post) -> String {
        if post.post_type == "page" {
            return match post.page_template.as_deref() {
                Some(custom) if custom != DEFAULT_TEMPLATE => custom.to_string(),
                _ => "page.php".to_string(),
            };
        }

        let candidate = format!("single-{}.php", post.post_type);
        if self.theme_root.join(&candidate).is_file() {
            return candidate;
        }

        if post.post_type == "post" {
            return "single.php".to_string();
        }

        candidate
    }
}
