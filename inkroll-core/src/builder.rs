//! Site building logic - orchestrates discovery, parsing, and rendering.

use crate::{
    config::Config,
    frontmatter::parse_frontmatter,
    markdown::MarkdownProcessor,
    models::{Post, SiteIndex},
    slug::slugify,
};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] crate::frontmatter::FrontmatterError),

    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),
}

/// Main site builder
pub struct SiteBuilder {
    config: Config,
    processor: MarkdownProcessor,
}

impl SiteBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            processor: MarkdownProcessor::new(),
        }
    }

    /// Build the site index from the content root
    pub fn build(&self) -> Result<SiteIndex, BuildError> {
        let source_files = self.discover_source_files()?;

        tracing::info!("Found {} source files", source_files.len());

        // First pass - parse metadata and assign slugs
        let mut posts = Vec::new();
        let mut sources = Vec::new();
        let mut slugs: HashSet<String> = HashSet::new();

        for file_path in &source_files {
            match self.parse_post(file_path) {
                Ok(post) => {
                    if !slugs.insert(post.slug.clone()) {
                        tracing::warn!("Duplicate slug: {}", post.slug);
                        return Err(BuildError::DuplicateSlug(post.slug.clone()));
                    }
                    posts.push(post);
                    sources.push(file_path.clone());
                }
                Err(e) => {
                    tracing::error!("Failed to parse {:?}: {}", file_path, e);
                    // Continue with other files
                }
            }
        }

        // Second pass - render markdown bodies
        for (post, source) in posts.iter_mut().zip(&sources) {
            let content = fs::read_to_string(source)?;
            let (_, body) = parse_frontmatter(&content)?;

            let is_mdx = source
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("mdx"));

            let (html, toc_html) = if is_mdx {
                self.processor.convert_mdx(&body)
            } else {
                self.processor.convert(&body)
            };

            post.content_html = html;
            post.toc_html = toc_html;
            post.raw_body = Some(body);
        }

        tracing::info!("Built site index with {} posts", posts.len());

        Ok(SiteIndex { posts })
    }

    /// Discover all markdown/MDX files in the content root
    fn discover_source_files(&self) -> Result<Vec<PathBuf>, BuildError> {
        let content_dir = self.config.content_dir();
        let mut files = Vec::new();
        let ignore_patterns = compile_ignore_patterns(&self.config.ignore_patterns);

        for entry in WalkDir::new(&content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let is_source = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("mdx"));
            if !is_source {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(&content_dir)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .to_string();
            if should_ignore(&rel, &ignore_patterns) {
                tracing::debug!("Ignoring {} due to ignore_patterns", rel);
                continue;
            }

            files.push(entry.path().to_path_buf());
        }

        Ok(files)
    }

    /// Parse a single source file into a Post (without rendering markdown yet)
    fn parse_post(&self, path: &Path) -> Result<Post, BuildError> {
        let content = fs::read_to_string(path)?;
        let (frontmatter, _body) = parse_frontmatter(&content)?;

        // Fall back to the file stem when the title is missing (pure markdown)
        let mut title = frontmatter.title.clone();
        if title.trim().is_empty() {
            title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string();
        }

        // Determine slug (from front-matter or filename)
        let slug = frontmatter.slug.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(slugify)
                .unwrap_or_else(|| slugify(&frontmatter.title))
        });

        let date = frontmatter
            .date
            .as_ref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        let updated = frontmatter
            .updated
            .as_ref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        // Capture source path relative to the content root
        let content_dir = self.config.content_dir();
        let source_path = path
            .strip_prefix(&content_dir)
            .ok()
            .and_then(|p| p.to_str())
            .map(|s| s.to_string());

        Ok(Post {
            slug,
            title,
            content_html: String::new(), // Filled in second pass
            tags: frontmatter.tags.clone(),
            date,
            updated,
            hero_image: frontmatter.hero_image.clone(),
            permalink: frontmatter.permalink.clone(),
            toc_html: None, // Filled in second pass
            raw_body: None,
            source_path,
            frontmatter,
        })
    }
}

fn compile_ignore_patterns(patterns: &[String]) -> Vec<Regex> {
    let mut compiled = Vec::new();
    for pat in patterns {
        match Regex::new(pat) {
            Ok(re) => compiled.push(re),
            Err(err) => tracing::warn!("Invalid ignore pattern '{}': {}", pat, err),
        }
    }
    compiled
}

fn should_ignore(path: &str, ignores: &[Regex]) -> bool {
    ignores.iter().any(|re| re.is_match(path))
}
