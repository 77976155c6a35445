//! Askama template definitions.

use askama::Template;

/// A post entry for display in the index list
#[derive(Debug, Clone)]
pub struct PostEntry {
    pub url: String,
    pub title: String,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// Post page template
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    // Page metadata
    pub title: String,
    pub description: String,
    pub date: Option<String>,
    pub updated: Option<String>,
    pub tags: Vec<String>,
    pub hero_image: Option<String>,

    // Content
    pub content: String,
    pub toc_html: Option<String>,

    // Site metadata
    pub site_title: String,
    pub site_author: String,
    pub year: i32,

    // Navigation
    pub nav_home: String,

    // Site base URL (asset prefix)
    pub base_url: String,
}

/// Index page template
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    // Site metadata
    pub site_title: String,
    pub site_description: String,
    pub site_author: String,
    pub site_intro: Option<String>,
    pub year: i32,

    // Navigation
    pub nav_home: String,

    // Content list, newest first
    pub items: Vec<PostEntry>,

    // Site base URL (asset prefix)
    pub base_url: String,
}

/// 404 error page template
#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub site_title: String,
    pub site_author: String,
    pub year: i32,
    pub nav_home: String,
    pub base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> PostTemplate {
        PostTemplate {
            title: "Hello".into(),
            description: "A post".into(),
            date: Some("2024-06-01".into()),
            updated: None,
            tags: vec!["react".into()],
            hero_image: Some("/images/hero.png".into()),
            content: "<p>Body</p>".into(),
            toc_html: Some("<nav class=\"toc-nav\"></nav>".into()),
            site_title: "Blog".into(),
            site_author: "Jane".into(),
            year: 2024,
            nav_home: "/index.html".into(),
            base_url: "/".into(),
        }
    }

    #[test]
    fn test_post_template_renders_metadata() {
        let html = sample_post().render().unwrap();
        assert!(html.contains("<title>Hello"));
        assert!(html.contains("2024-06-01"));
        assert!(html.contains("/images/hero.png"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("toc-nav"));
        assert!(html.contains("react"));
    }

    #[test]
    fn test_post_template_without_optional_fields() {
        let mut post = sample_post();
        post.date = None;
        post.hero_image = None;
        post.toc_html = None;
        post.tags.clear();

        let html = post.render().unwrap();
        assert!(html.contains("<p>Body</p>"));
        assert!(!html.contains("post-hero"));
        assert!(!html.contains("toc-nav"));
    }

    #[test]
    fn test_index_template_lists_posts() {
        let index = IndexTemplate {
            site_title: "Blog".into(),
            site_description: "Posts".into(),
            site_author: "Jane".into(),
            site_intro: Some("Welcome".into()),
            year: 2024,
            nav_home: "/index.html".into(),
            items: vec![PostEntry {
                url: "/hello.html".into(),
                title: "Hello".into(),
                date: Some("2024-06-01".into()),
                description: Some("A post".into()),
            }],
            base_url: "/".into(),
        };

        let html = index.render().unwrap();
        assert!(html.contains("Welcome"));
        assert!(html.contains("href=\"/hello.html\""));
        assert!(html.contains("2024-06-01"));
    }

    #[test]
    fn test_not_found_template() {
        let page = NotFoundTemplate {
            site_title: "Blog".into(),
            site_author: "Jane".into(),
            year: 2024,
            nav_home: "/index.html".into(),
            base_url: "/".into(),
        };

        let html = page.render().unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("/index.html"));
    }
}
