//! # inkroll-render
//!
//! Askama template definitions for the inkroll static blog generator.

mod templates;

pub use templates::{IndexTemplate, NotFoundTemplate, PostEntry, PostTemplate};
