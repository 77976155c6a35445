use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path) {
    fs::write(
        dir.join("inkroll.yml"),
        r#"
site:
  title: "Test Blog"
  author: "Tester"
  description: "Desc"
  url: "https://example.com"
paths:
  content: "content"
  output: "dist"
base_url: "/"
"#,
    )
    .unwrap();
}

#[test]
fn build_renders_pages_sitemap_and_feed() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let content = dir.path().join("content");
    fs::create_dir_all(&content)?;
    write_config(dir.path());

    fs::write(
        content.join("react-router.md"),
        r#"---
title: React Router Guide
description: Client-side routing
date: 2024-05-10
heroImage: /images/router.png
---

{{toc}}

# Routing

## Nested Routes

Text here.
"#,
    )?;

    fs::write(
        content.join("hooks.mdx"),
        r#"---
title: Hooks Notes
date: 2024-06-20
---
import Demo from './Demo.astro';

# Hooks

Content body.
"#,
    )?;

    fs::write(
        content.join("secret.md"),
        "---\ntitle: Secret\ndraft: true\n---\nHidden.\n",
    )?;

    Command::cargo_bin("inkroll")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success();

    let dist = dir.path().join("dist");

    // Post pages
    let router_page = fs::read_to_string(dist.join("react-router.html"))?;
    assert!(router_page.contains("React Router Guide"));
    assert!(router_page.contains("/images/router.png"));
    assert!(router_page.contains("toc-nav"));
    assert!(router_page.contains("id=\"nested-routes\""));

    let hooks_page = fs::read_to_string(dist.join("hooks.html"))?;
    assert!(hooks_page.contains("Content body."));
    assert!(!hooks_page.contains("import Demo"));

    // Drafts are excluded
    assert!(!dist.join("secret.html").exists());

    // Index lists posts newest first
    let index = fs::read_to_string(dist.join("index.html"))?;
    let hooks_pos = index.find("Hooks Notes").expect("hooks listed");
    let router_pos = index.find("React Router Guide").expect("router listed");
    assert!(hooks_pos < router_pos);

    // Sitemap enumerates index + published posts only
    let sitemap = fs::read_to_string(dist.join("sitemap.xml"))?;
    assert!(sitemap.contains("<loc>https://example.com/index.html</loc>"));
    assert!(sitemap.contains("<loc>https://example.com/react-router.html</loc>"));
    assert!(sitemap.contains("<lastmod>2024-05-10</lastmod>"));
    assert!(!sitemap.contains("secret.html"));

    // RSS feed
    let rss = fs::read_to_string(dist.join("rss.xml"))?;
    assert!(rss.contains("<title>Test Blog</title>"));
    assert!(rss.contains("https://example.com/hooks.html"));

    // Default stylesheet and 404 page
    assert!(dist.join("style.css").exists());
    assert!(dist.join("404.html").exists());

    Ok(())
}

#[test]
fn build_fails_without_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    Command::cargo_bin("inkroll")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));

    Ok(())
}

#[test]
fn init_then_build_works() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    Command::cargo_bin("inkroll")?
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("inkroll initialized"));

    Command::cargo_bin("inkroll")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success();

    assert!(dir.path().join("dist/welcome.html").exists());
    assert!(dir.path().join("dist/sitemap.xml").exists());

    Ok(())
}

#[test]
fn sitemap_can_be_disabled() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let content = dir.path().join("content");
    fs::create_dir_all(&content)?;
    fs::write(
        dir.path().join("inkroll.yml"),
        r#"
site:
  title: "Test Blog"
  author: "Tester"
  description: "Desc"
  url: "https://example.com"
paths:
  content: "content"
  output: "dist"
enable_sitemap: false
enable_rss: false
"#,
    )?;
    fs::write(content.join("post.md"), "---\ntitle: Post\n---\nBody.\n")?;

    Command::cargo_bin("inkroll")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success();

    assert!(!dir.path().join("dist/sitemap.xml").exists());
    assert!(!dir.path().join("dist/rss.xml").exists());
    assert!(dir.path().join("dist/post.html").exists());

    Ok(())
}
