//! Declarative assembly of themed study-guide PDFs.
//!
//! A guide is a [`model::Story`]: an ordered list of content blocks produced by the builders in
//! [`blocks`] and styled through a [`theme::Theme`].  [`builder::GuideBuilder`] validates the story
//! and lays it out with `genpdf`, decorating every page with a background, a footer rule and a
//! page-numbered footer.

pub mod backend;
pub mod blocks;
pub mod builder;
pub mod decorator;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod richtext;
pub mod samples;
pub mod theme;
pub mod visualization;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use builder::{build_document, GuideBuilder};
pub use error::{BlockError, BuildError, ShapeError, ThemeError};
pub use model::{ContentBlock, Story};
pub use theme::Theme;
