//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../inkroll.yml.example");

/// Initialize a new inkroll project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_content(root)?;

    println!("inkroll initialized in {:?}", root);
    println!("  - Edit inkroll.yml to customize site metadata");
    println!("  - Write posts in content/ as .md or .mdx files");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("inkroll.yml");
    if config_path.exists() {
        println!("inkroll.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_content(root: &Path) -> Result<()> {
    let content_root = root.join("content");
    fs::create_dir_all(&content_root)
        .with_context(|| format!("Failed to create {:?}", content_root))?;

    // Starter post
    let sample = content_root.join("welcome.md");
    if !sample.exists() {
        fs::write(&sample, sample_post())?;
        println!("Created {:?}", sample);
    }

    Ok(())
}

fn sample_post() -> String {
    r#"---
title: Welcome to inkroll
description: Quick start guide
date: 2025-01-01
tags: [inkroll, intro]
---

{{toc}}

# Welcome

This is your new inkroll site. Edit `inkroll.yml` to update site metadata, then run:

```bash
inkroll build
inkroll serve
```

## Writing posts

Create posts in `content/` with a YAML front-matter block. Both `.md` and
`.mdx` files are picked up.
"#
    .to_string()
}
