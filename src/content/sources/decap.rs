//! Static markdown content (Decap CMS layout)
//!
//! Collections are folders of `*.md` files with YAML frontmatter under the
//! content directory; a single-record collection may instead be one
//! `<collection>.md` file. Filters and ordering are applied here since
//! there is no query engine behind the files.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::content::fallback::sort_by_display_order;
use crate::content::frontmatter::markdown_record;
use crate::content::query::QueryDescriptor;
use crate::content::record::ContentRecord;
use crate::content::source::{BackendKind, ContentSource};
use crate::error::{SiteError, SiteResult};

pub struct DecapSource {
    content_dir: PathBuf,
}

impl DecapSource {
    pub fn new(content_dir: PathBuf) -> Self {
        Self { content_dir }
    }

    fn collection_files(&self, collection: &str) -> SiteResult<Vec<PathBuf>> {
        let dir = self.content_dir.join(collection);
        let pattern = dir.join("*.md");
        let pattern = pattern.to_str().ok_or_else(|| {
            SiteError::backend("decap", format!("non UTF-8 content path: {:?}", dir))
        })?;

        let mut files = glob::glob(pattern)
            .map_err(|e| SiteError::backend("decap", format!("bad glob pattern: {}", e)))?
            .collect::<Result<Vec<PathBuf>, _>>()
            .map_err(|e| SiteError::backend("decap", format!("failed to list {:?}: {}", dir, e)))?;
        files.sort();
        Ok(files)
    }

    async fn read_record(path: &Path) -> SiteResult<ContentRecord> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SiteError::backend("decap", format!("failed to read {:?}: {}", path, e)))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        Ok(markdown_record(slug, &content))
    }
}

#[async_trait]
impl ContentSource for DecapSource {
    fn backend(&self) -> BackendKind {
        BackendKind::Decap
    }

    async fn fetch_many(&self, descriptor: &QueryDescriptor) -> SiteResult<Vec<ContentRecord>> {
        let files = self.collection_files(&descriptor.collection)?;
        debug!(
            "Loading {} markdown files for {}",
            files.len(),
            descriptor.collection
        );

        let mut records = Vec::with_capacity(files.len());
        for path in &files {
            let record = Self::read_record(path).await?;
            if descriptor.matches(&record) {
                records.push(record);
            }
        }

        if descriptor.order_by.is_some() {
            sort_by_display_order(&mut records);
        }

        Ok(records)
    }

    async fn fetch_one(&self, descriptor: &QueryDescriptor) -> SiteResult<Option<ContentRecord>> {
        let file = self
            .content_dir
            .join(format!("{}.md", descriptor.collection));

        let exists = tokio::fs::try_exists(&file).await.map_err(|e| {
            SiteError::backend("decap", format!("failed to check {:?}: {}", file, e))
        })?;

        if exists {
            let record = Self::read_record(&file).await?;
            return Ok(Some(record).filter(|r| descriptor.matches(r)));
        }

        Ok(self.fetch_many(descriptor).await?.into_iter().next())
    }
}
