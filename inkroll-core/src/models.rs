//! Content model structs for posts and the site index.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Front-matter metadata from markdown/MDX files
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Frontmatter {
    /// Required in practice; defaulted here so absence is reported as a
    /// missing-field error rather than a YAML parse error
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub updated: Option<String>,

    /// Hero/cover image path; `heroImage` is the spelling used by
    /// front-end blog tooling, so accept both.
    #[serde(default, alias = "heroImage")]
    pub hero_image: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub permalink: Option<String>,
}

/// A single post in the site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// URL slug (e.g., "react-router-guide")
    pub slug: String,

    /// Display title
    pub title: String,

    /// Rendered HTML content
    pub content_html: String,

    /// Original front-matter
    pub frontmatter: Frontmatter,

    /// Tags for categorization
    pub tags: Vec<String>,

    /// Publication date
    pub date: Option<NaiveDate>,

    /// Last updated date
    pub updated: Option<NaiveDate>,

    /// Hero image path, rebased onto the site base URL at render time
    pub hero_image: Option<String>,

    /// Custom permalink (overrides default)
    pub permalink: Option<String>,

    /// Table of contents HTML
    pub toc_html: Option<String>,

    /// Raw markdown body (without front-matter)
    pub raw_body: Option<String>,

    /// Source file path relative to the content root
    pub source_path: Option<String>,
}

impl Post {
    /// Get the URL path for this post
    pub fn url(&self) -> String {
        format!("/{}", self.output_rel_path())
    }

    /// Get the URL for this post including a base path
    pub fn url_with_base(&self, base_url: &str) -> String {
        format!(
            "{}{}",
            crate::config::normalize_base_url(base_url),
            self.output_rel_path()
        )
    }

    /// Check if this post is a draft
    pub fn is_draft(&self) -> bool {
        self.frontmatter.draft
    }

    /// Relative output path for this post (no leading slash)
    pub fn output_rel_path(&self) -> String {
        if let Some(permalink) = &self.permalink {
            normalize_permalink(permalink)
        } else {
            format!("{}.html", self.slug)
        }
    }

    /// Date used for sitemap `<lastmod>` and feed ordering
    pub fn last_modified(&self) -> Option<NaiveDate> {
        self.updated.or(self.date)
    }
}

/// Complete site index containing all posts
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteIndex {
    pub posts: Vec<Post>,
}

impl SiteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a post by slug
    pub fn find_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Non-draft posts, newest first (undated posts sort last)
    pub fn published(&self) -> Vec<&Post> {
        self.listed(false)
    }

    /// Posts for listings, newest first; drafts included on request
    pub fn listed(&self, include_drafts: bool) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| include_drafts || !p.is_draft())
            .collect();
        posts.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.updated.cmp(&a.updated))
                .then_with(|| a.slug.cmp(&b.slug))
        });
        posts
    }
}

fn normalize_permalink(permalink: &str) -> String {
    let mut p = permalink.trim().trim_start_matches('/').to_string();

    if p.ends_with('/') {
        p = format!("{}/index.html", p.trim_end_matches('/'));
    } else if !p.ends_with(".html") {
        p = format!("{}.html", p);
    }

    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(slug: &str) -> Post {
        Post {
            slug: slug.into(),
            title: "Test".into(),
            content_html: String::new(),
            frontmatter: Frontmatter::default(),
            tags: vec![],
            date: None,
            updated: None,
            hero_image: None,
            permalink: None,
            toc_html: None,
            raw_body: None,
            source_path: None,
        }
    }

    #[test]
    fn test_post_url() {
        let post_default = sample_post("test-post");
        assert_eq!(post_default.url(), "/test-post.html");

        let post_permalink = Post {
            permalink: Some("/custom/path".into()),
            ..post_default
        };

        assert_eq!(post_permalink.url(), "/custom/path.html");
        assert_eq!(post_permalink.output_rel_path(), "custom/path.html");
        assert_eq!(
            post_permalink.url_with_base("/blog"),
            "/blog/custom/path.html"
        );
    }

    #[test]
    fn test_permalink_trailing_slash() {
        let post = Post {
            permalink: Some("/guides/".into()),
            ..sample_post("guides")
        };
        assert_eq!(post.output_rel_path(), "guides/index.html");
    }

    #[test]
    fn test_published_sorts_newest_first() {
        let mut index = SiteIndex::new();

        let mut old = sample_post("old");
        old.date = NaiveDate::from_ymd_opt(2023, 1, 10);
        let mut new = sample_post("new");
        new.date = NaiveDate::from_ymd_opt(2024, 6, 1);
        let mut draft = sample_post("draft");
        draft.frontmatter.draft = true;

        index.posts = vec![old, draft, new];

        let published = index.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].slug, "new");
        assert_eq!(published[1].slug, "old");
    }

    #[test]
    fn test_listed_can_include_drafts() {
        let mut index = SiteIndex::new();
        let mut draft = sample_post("draft");
        draft.frontmatter.draft = true;
        index.posts = vec![sample_post("live"), draft];

        assert_eq!(index.listed(false).len(), 1);
        assert_eq!(index.listed(true).len(), 2);
    }

    #[test]
    fn test_last_modified_prefers_updated() {
        let mut post = sample_post("p");
        post.date = NaiveDate::from_ymd_opt(2024, 1, 1);
        post.updated = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(post.last_modified(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }
}
