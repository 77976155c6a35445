//! # inkroll-core
//!
//! Core library for the inkroll static blog generator.
//!
//! This crate provides the building blocks of the publishing pipeline:
//! content discovery, front-matter parsing, markdown rendering with TOC
//! injection, and the site content model.

pub mod builder;
pub mod config;
pub mod frontmatter;
pub mod markdown;
pub mod models;
pub mod slug;

pub use builder::SiteBuilder;
pub use config::Config;
pub use models::{Frontmatter, Post, SiteIndex};
pub use slug::slugify;
