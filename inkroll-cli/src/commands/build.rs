//! Build command implementation.

use anyhow::{Context, Result};
use askama::Template;
use chrono::{Datelike, NaiveDate};
use include_dir::{include_dir, Dir};
use inkroll_core::{Config, Post, SiteBuilder, SiteIndex};
use inkroll_render::{IndexTemplate, NotFoundTemplate, PostEntry, PostTemplate};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

// Embed default static assets (stylesheet) at compile time so they are
// available after cargo install
static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

/// Build the static site (writes output) and discard the in-memory index
pub fn build_site(config_path: &Path) -> Result<()> {
    build_site_with_index(config_path).map(|_| ())
}

/// Build the static site and return the in-memory index alongside the config
pub fn build_site_with_index(config_path: &Path) -> Result<(Config, SiteIndex)> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    build_site_with_config(config)
}

/// Build the site from an already loaded config, writing output and returning the index.
pub fn build_site_with_config(config: Config) -> Result<(Config, SiteIndex)> {
    let base_url = config.normalized_base_url();

    tracing::info!("Building site: {}", config.site.title);

    let builder = SiteBuilder::new(config.clone());
    let site_index = builder.build().context("Failed to build site")?;

    tracing::info!("Parsed {} posts", site_index.posts.len());

    let output_dir = config.output_dir();
    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    // Render individual post pages
    for post in &site_index.posts {
        if post.is_draft() && !config.drafts {
            tracing::debug!("Skipping draft: {}", post.title);
            continue;
        }

        render_post_page(&config, post, &base_url)?;
    }

    // Render index and 404 pages
    render_index_page(&config, &site_index, &base_url)?;
    render_404_page(&config, &base_url)?;

    // Syndication artifacts
    if config.enable_rss {
        generate_rss(&config, &site_index, &base_url)?;
    } else {
        tracing::info!("RSS disabled; skipping rss.xml");
    }

    if config.enable_sitemap {
        generate_sitemap(&config, &site_index, &base_url)?;
    } else {
        tracing::info!("Sitemap disabled; skipping sitemap.xml");
    }

    copy_assets(&config)?;

    let published_count = site_index.listed(config.drafts).len();

    tracing::info!("Built {} pages", published_count);
    tracing::info!("Output written to {:?}", output_dir);

    Ok((config, site_index))
}

/// Render a single post page
fn render_post_page(config: &Config, post: &Post, base_url: &str) -> Result<()> {
    let date = post.date.as_ref().map(|d| d.format("%Y-%m-%d").to_string());
    let updated = post
        .updated
        .as_ref()
        .map(|d| d.format("%Y-%m-%d").to_string());

    let template = PostTemplate {
        title: post.title.clone(),
        description: post
            .frontmatter
            .description
            .clone()
            .unwrap_or_else(|| post.title.clone()),
        date,
        updated,
        tags: post.tags.clone(),
        hero_image: post.hero_image.as_deref().map(|h| rebase_asset(h, base_url)),
        content: post.content_html.clone(),
        toc_html: post.toc_html.clone(),
        site_title: config.site.title.clone(),
        site_author: config.site.author.clone(),
        year: chrono::Utc::now().year(),
        nav_home: format!("{}index.html", base_url),
        base_url: base_url.to_string(),
    };

    let html = template.render().context("Failed to render post template")?;

    let output_path = config.output_dir().join(post.output_rel_path());
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, html).with_context(|| format!("Failed to write {:?}", output_path))?;

    tracing::debug!("Rendered: {}", post.slug);

    Ok(())
}

/// Render the front page with the reverse-chronological post list
fn render_index_page(config: &Config, site_index: &SiteIndex, base_url: &str) -> Result<()> {
    let items: Vec<PostEntry> = site_index
        .listed(config.drafts)
        .iter()
        .map(|post| PostEntry {
            url: post.url_with_base(base_url),
            title: post.title.clone(),
            date: post.date.as_ref().map(|d| d.format("%Y-%m-%d").to_string()),
            description: post.frontmatter.description.clone(),
        })
        .collect();

    let template = IndexTemplate {
        site_title: config.site.title.clone(),
        site_description: config.site.description.clone(),
        site_author: config.site.author.clone(),
        site_intro: config.site.intro.clone(),
        year: chrono::Utc::now().year(),
        nav_home: format!("{}index.html", base_url),
        items,
        base_url: base_url.to_string(),
    };

    let html = template
        .render()
        .context("Failed to render index template")?;

    let output_path = config.output_dir().join("index.html");
    fs::write(&output_path, html).context("Failed to write index.html")?;

    tracing::info!("Rendered index page");

    Ok(())
}

/// Render the 404 error page
fn render_404_page(config: &Config, base_url: &str) -> Result<()> {
    let template = NotFoundTemplate {
        site_title: config.site.title.clone(),
        site_author: config.site.author.clone(),
        year: chrono::Utc::now().year(),
        nav_home: format!("{}index.html", base_url),
        base_url: base_url.to_string(),
    };

    let html = template.render().context("Failed to render 404 template")?;

    let output_path = config.output_dir().join("404.html");
    fs::write(&output_path, html).context("Failed to write 404.html")?;

    tracing::info!("Rendered 404 page");

    Ok(())
}

/// Copy static assets to the output
fn copy_assets(config: &Config) -> Result<()> {
    let output_dir = config.output_dir();

    if let Some(assets_dir) = config.assets_dir() {
        if assets_dir.exists() {
            copy_dir(&assets_dir, &output_dir)?;
            tracing::info!("Copied assets from {:?}", assets_dir);
            return Ok(());
        }
        tracing::warn!("Configured assets path {:?} does not exist", assets_dir);
    }

    // Use the embedded stylesheet (available after cargo install)
    for file in STATIC_ASSETS.files() {
        let target = output_dir.join(file.path());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, file.contents())
            .with_context(|| format!("Failed to write embedded asset to {:?}", target))?;
    }
    tracing::info!("Copied embedded default assets");

    Ok(())
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("Failed to copy {:?} to {:?}", entry.path(), target))?;
    }
    Ok(())
}

/// Generate RSS feed (rss.xml)
fn generate_rss(config: &Config, site_index: &SiteIndex, base_url: &str) -> Result<()> {
    let mut items = String::new();

    for post in site_index.listed(config.drafts) {
        let link = absolute_url(&config.site.url, base_url, &post.output_rel_path());
        let title = escape_xml(&post.title);
        let description = escape_xml(
            post.frontmatter
                .description
                .as_ref()
                .unwrap_or(&post.title),
        );

        let pub_date = post.last_modified().and_then(|d| naive_to_rfc2822(&d));

        items.push_str(&format!(
            "<item><title>{}</title><link>{}</link><guid>{}</guid><description>{}</description>",
            title, link, link, description
        ));
        if let Some(pd) = pub_date {
            items.push_str(&format!("<pubDate>{}</pubDate>", pd));
        }
        items.push_str("</item>");
    }

    let channel_link = absolute_url(&config.site.url, base_url, "");
    let rss = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>{}</title>
    <link>{}</link>
    <description>{}</description>
    {}
  </channel>
</rss>
"#,
        escape_xml(&config.site.title),
        channel_link,
        escape_xml(&config.site.description),
        items
    );

    fs::write(config.output_dir().join("rss.xml"), rss)?;
    tracing::info!("Generated rss.xml");
    Ok(())
}

/// Generate sitemap.xml enumerating all output URLs
fn generate_sitemap(config: &Config, site_index: &SiteIndex, base_url: &str) -> Result<()> {
    let mut urls = String::new();

    // Index
    urls.push_str(&format!(
        "<url><loc>{}</loc></url>",
        absolute_url(&config.site.url, base_url, "index.html")
    ));

    for post in site_index.listed(config.drafts) {
        let loc = absolute_url(&config.site.url, base_url, &post.output_rel_path());
        urls.push_str("<url>");
        urls.push_str(&format!("<loc>{}</loc>", loc));
        if let Some(date) = post.last_modified() {
            urls.push_str(&format!("<lastmod>{}</lastmod>", date.format("%Y-%m-%d")));
        }
        urls.push_str("</url>");
    }

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>
"#,
        urls
    );

    fs::write(config.output_dir().join("sitemap.xml"), xml)?;
    tracing::info!("Generated sitemap.xml");
    Ok(())
}

/// Prefix root-relative asset references with the site base URL
fn rebase_asset(path: &str, base_url: &str) -> String {
    if path.starts_with('/') && base_url != "/" {
        format!("{}{}", base_url.trim_end_matches('/'), path)
    } else {
        path.to_string()
    }
}

fn absolute_url(site_url: &str, base_url: &str, rel: &str) -> String {
    let root = site_url.trim_end_matches('/').to_string();
    let mut base = base_url.trim_matches('/').to_string();
    if !base.is_empty() {
        base = format!("/{}", base);
    }
    let rel_clean = rel.trim_start_matches('/');
    let joined = if rel_clean.is_empty() {
        format!("{}{}", root, base)
    } else {
        format!("{}{}/{}", root, base, rel_clean)
    };
    joined.replace("//", "/").replace(":/", "://")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn naive_to_rfc2822(date: &NaiveDate) -> Option<String> {
    let datetime = date.and_hms_opt(0, 0, 0)?;
    Some(datetime.and_utc().to_rfc2822())
}
