//! Error types shared by the theme registry, the block builders and the assembler.
//!
//! Errors are split by how far they travel.  [`ThemeError`] and [`ShapeError`] describe a single
//! malformed block and are returned by the builders wrapped in [`BlockError`], so callers can skip
//! or replace the offending block.  [`BuildError`] is what the assembler returns once a document
//! can no longer be produced.

use std::io;

use thiserror::Error;

/// Configuration errors raised while defining or looking up theme entries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// A style with the same name was already registered.
    #[error("style `{0}` is already defined")]
    DuplicateStyle(String),

    /// A block referenced a style that was never registered.
    #[error("style `{0}` is not defined in the theme")]
    UnknownStyle(String),

    /// A palette entry was requested but never configured.
    #[error("palette color `{0}` is not defined in the theme")]
    UnknownColor(String),

    /// A color literal in a theme configuration could not be parsed.
    #[error("invalid color `{value}`: {reason}")]
    InvalidColor {
        /// The literal as written in the configuration.
        value: String,
        /// Why the literal was rejected.
        reason: &'static str,
    },
}

/// Structural errors raised when block input violates a shape invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// A table row does not have one cell per header.
    #[error("table row {row} has {found} cells but the header defines {expected} columns")]
    RaggedTable {
        /// Zero-based index of the offending row (header excluded).
        row: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of cells found in the row.
        found: usize,
    },

    /// Column weights were given for a different number of columns.
    #[error("table defines {expected} columns but {found} column weights were supplied")]
    ColumnWeights {
        /// Number of header columns.
        expected: usize,
        /// Number of weights supplied.
        found: usize,
    },

    /// A visualization was requested for an empty array.
    #[error("cannot visualize an empty array")]
    EmptyArray,

    /// A pointer index lies outside the visualized array.
    #[error("pointer `{name}` points at index {index}, outside of [0, {len})")]
    PointerOutOfRange {
        /// Name of the offending pointer.
        name: String,
        /// The requested index.
        index: i64,
        /// Length of the visualized array.
        len: usize,
    },

    /// The highlighted window does not fit the visualized array.
    #[error("window [{start}, {end}] does not fit an array of length {len}")]
    WindowOutOfRange {
        /// First index of the window.
        start: usize,
        /// Last index of the window (inclusive).
        end: usize,
        /// Length of the visualized array.
        len: usize,
    },
}

/// Error returned by block builders: either the theme or the input shape was invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// The block references a style or color the theme does not provide.
    #[error(transparent)]
    Theme(#[from] ThemeError),

    /// The block input violates a structural invariant.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Fatal errors that abort a document build.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A block in the story could not be validated or rendered.
    #[error("block #{position} is invalid: {source}")]
    Block {
        /// Zero-based position of the block in the story.
        position: usize,
        /// The violated invariant.
        #[source]
        source: BlockError,
    },

    /// The theme itself is inconsistent, independent of any block.
    #[error("invalid theme: {0}")]
    Theme(#[from] ThemeError),

    /// The fonts required by the backend could not be loaded.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),

    /// A block could not be placed even on an empty page.
    #[error("block #{position} does not fit on a page: {source}")]
    Layout {
        /// Zero-based position of the block in the story.
        position: usize,
        #[source]
        source: genpdf::error::Error,
    },

    /// The backend failed while laying out or encoding the document.
    #[error("failed to render document: {0}")]
    Render(#[source] genpdf::error::Error),

    /// Reading configuration or writing the artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The rendered artifact could not be moved to its final path.
    #[error("failed to persist document: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// A theme or visualization configuration file was malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Bookmarks could not be embedded into the rendered PDF.
    #[cfg(feature = "bookmarks")]
    #[error("failed to embed bookmarks: {0}")]
    Bookmarks(#[from] crate::bookmarks::BookmarkError),
}

impl BuildError {
    /// Wraps a block error together with the block's position in the story.
    pub fn at(position: usize, source: impl Into<BlockError>) -> Self {
        Self::Block {
            position,
            source: source.into(),
        }
    }

    /// Returns the position of the offending block, if the error concerns a single block.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Block { position, .. } | Self::Layout { position, .. } => Some(*position),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_error_names_position_and_invariant() {
        let err = BuildError::at(
            4,
            ShapeError::RaggedTable {
                row: 1,
                expected: 3,
                found: 2,
            },
        );
        assert_eq!(err.position(), Some(4));
        assert_eq!(
            err.to_string(),
            "block #4 is invalid: table row 1 has 2 cells but the header defines 3 columns"
        );
    }

    #[test]
    fn theme_errors_pass_through_block_error() {
        let err: BlockError = ThemeError::UnknownStyle("sBody".into()).into();
        assert_eq!(err.to_string(), "style `sBody` is not defined in the theme");
    }

    #[test]
    fn layout_errors_carry_the_position() {
        let err = BuildError::Layout {
            position: 7,
            source: genpdf::error::Error::new(
                "Could not fit an element on a new page",
                genpdf::error::ErrorKind::PageSizeExceeded,
            ),
        };
        assert_eq!(err.position(), Some(7));
        assert!(err.to_string().starts_with("block #7 does not fit on a page"));
    }

    #[test]
    fn io_errors_convert() {
        let err: BuildError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, BuildError::Io(_)));
        assert_eq!(err.position(), None);
    }
}
