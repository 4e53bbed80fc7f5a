//! # vsh-core
//!
//! Core types and pure logic for vsh — vault size history:
//! - [`Category`] — named file-classification rule
//! - [`pattern`] — the category pattern grammar
//! - [`resolver`] — single-apply / always-apply resolution
//! - [`Settings`] — the configuration surface consumed by the core
//! - [`frontmatter`] — scalar frontmatter field lookup
//! - Error hierarchy ([`VshError`], [`Result`])

pub mod category;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod pattern;
pub mod resolver;

pub use category::Category;
pub use config::{LegendOrder, Settings};
pub use error::{Result, VshError};
