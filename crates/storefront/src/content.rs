//! Markdown pages for the informational sections of the site.
//!
//! Every `content/pages/<slug>.md` becomes the page served at `/<slug>`
//! when a route exists for it. Files carry YAML frontmatter:
//!
//! ```markdown
//! ---
//! title: Volunteer With Us
//! description: Give a few hours a week
//! quote: "Education is the most powerful weapon."
//! ---
//! Body text.
//! ```

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, engine::YAML};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Pull quote rendered beneath the heading.
    #[serde(default)]
    pub quote: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub meta: PageMeta,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("{slug}.md: {reason}")]
    Frontmatter { slug: String, reason: String },
}

/// Rendered pages keyed by slug, shared between handlers.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Render every markdown file under `<content_dir>/pages`.
    ///
    /// A deployment without a pages directory simply has no pages. A file
    /// with broken frontmatter is skipped with an error log so one bad edit
    /// cannot keep the site down.
    ///
    /// # Errors
    ///
    /// Fails when the directory or one of its files cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let dir = content_dir.join("pages");
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "no pages directory, serving without pages");
            return Ok(Self::default());
        }

        let read_err = |path: &Path, source| ContentError::Read {
            path: path.display().to_string(),
            source,
        };

        let mut pages = HashMap::new();
        for entry in std::fs::read_dir(&dir).map_err(|e| read_err(&dir, e))? {
            let path = entry.map_err(|e| read_err(&dir, e))?.path();
            let Some(slug) = path
                .file_stem()
                .and_then(OsStr::to_str)
                .filter(|_| path.extension() == Some(OsStr::new("md")))
            else {
                continue;
            };

            let source = std::fs::read_to_string(&path).map_err(|e| read_err(&path, e))?;
            match render_page(slug, &source) {
                Ok(page) => {
                    tracing::debug!(slug, title = %page.meta.title, "page rendered");
                    pages.insert(slug.to_owned(), page);
                }
                Err(err) => tracing::error!(error = %err, "skipping page"),
            }
        }

        tracing::info!(count = pages.len(), "content pages loaded");
        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    #[must_use]
    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn render_page(slug: &str, source: &str) -> Result<Page, ContentError> {
    let invalid = |reason: String| ContentError::Frontmatter {
        slug: slug.to_owned(),
        reason,
    };

    let parsed = Matter::<YAML>::new()
        .parse::<PageMeta>(source)
        .map_err(|e| invalid(e.to_string()))?;
    let meta = parsed.data.ok_or_else(|| invalid("frontmatter missing".to_owned()))?;

    // Raw HTML stays escaped; comrak's default is unsafe = false.
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.strikethrough = true;

    Ok(Page {
        meta,
        html: markdown_to_html(&parsed.content, &options),
    })
}
