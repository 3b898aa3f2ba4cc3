//! Document assembly: validation, ordered hand-off to a backend and atomic output.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use crate::backend::{GenpdfBackend, RenderBackend, RenderedDocument};
use crate::decorator::PageChrome;
use crate::error::BuildError;
use crate::model::{ContentBlock, Story};
use crate::theme::Theme;

/// Checks that every style referenced by `blocks` is registered in `theme`.
///
/// The first offending block aborts the check; its position is part of the error.
pub fn validate(theme: &Theme, blocks: &[ContentBlock]) -> Result<(), BuildError> {
    for (position, block) in blocks.iter().enumerate() {
        for name in block.style_names() {
            theme
                .resolve(name)
                .map_err(|err| BuildError::at(position, err))?;
        }
    }
    Ok(())
}

/// Validates `blocks`, then feeds them to `backend` in order and returns its artifact.
///
/// Nothing reaches the backend when validation fails.
pub fn assemble<B>(
    theme: &Theme,
    blocks: &[ContentBlock],
    decorator: PageChrome,
    mut backend: B,
) -> Result<B::Artifact, BuildError>
where
    B: RenderBackend,
{
    validate(theme, blocks)?;
    backend.set_page_decorator(decorator, theme);
    for (position, block) in blocks.iter().enumerate() {
        backend
            .push_block(position, block, theme)
            .map_err(|err| BuildError::at(position, err))?;
    }
    backend.finish()
}

/// Renders `blocks` and writes the PDF to `output_path`.
///
/// The file is written next to the target under a temporary name and renamed into place, so a
/// failed build never leaves a truncated document behind.
pub fn build_document(
    theme: &Theme,
    blocks: &[ContentBlock],
    output_path: impl AsRef<Path>,
) -> Result<RenderedDocument, BuildError> {
    GuideBuilder::new(theme)
        .extend(blocks.iter().cloned())
        .write_to(output_path)
}

/// Writes `bytes` to `path` through a temporary file in the same directory.
pub fn write_atomically(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), BuildError> {
    let path = path.as_ref();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory)?;

    let mut file = tempfile::NamedTempFile::new_in(directory)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Builder collecting a guide's story and rendering it with the `genpdf` backend.
pub struct GuideBuilder<'t> {
    theme: &'t Theme,
    title: String,
    footer_title: Option<String>,
    story: Story,
    #[cfg(feature = "hyphenation")]
    hyphenator: Option<hyphenation::Standard>,
}

impl<'t> GuideBuilder<'t> {
    /// Creates an empty guide using `theme` for every block.
    pub fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            title: String::new(),
            footer_title: None,
            story: Story::new(),
            #[cfg(feature = "hyphenation")]
            hyphenator: None,
        }
    }

    /// Sets the document title; the footer repeats it unless a footer title is set.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the text printed before the page number in the footer.
    pub fn with_footer_title(mut self, title: impl Into<String>) -> Self {
        self.footer_title = Some(title.into());
        self
    }

    /// Enables hyphenation of text paragraphs.
    #[cfg(feature = "hyphenation")]
    pub fn with_hyphenator(mut self, hyphenator: hyphenation::Standard) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }

    /// Appends a block.
    pub fn push(mut self, block: ContentBlock) -> Self {
        self.story.push(block);
        self
    }

    /// Appends every block yielded by `blocks`.
    pub fn extend<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = ContentBlock>,
    {
        self.story.extend(blocks);
        self
    }

    /// Replaces the collected blocks with `story`.
    pub fn with_story(mut self, story: Story) -> Self {
        self.story = story;
        self
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    fn chrome(&self) -> PageChrome {
        PageChrome::new(self.footer_title.as_deref().unwrap_or(&self.title))
    }

    /// Renders the guide into memory.
    pub fn render(self) -> Result<RenderedDocument, BuildError> {
        let chrome = self.chrome();
        #[allow(unused_mut)]
        let mut backend = GenpdfBackend::new(self.theme, &self.title)?;
        #[cfg(feature = "hyphenation")]
        if let Some(hyphenator) = self.hyphenator {
            backend.set_hyphenator(hyphenator);
        }
        assemble(self.theme, self.story.blocks(), chrome, backend)
    }

    /// Renders the guide and writes it atomically to `path`.
    pub fn write_to(self, path: impl AsRef<Path>) -> Result<RenderedDocument, BuildError> {
        let document = self.render()?;
        write_atomically(path, &document.bytes)?;
        Ok(document)
    }

    /// Renders the guide and adds one PDF outline entry per numbered section.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks(self) -> Result<RenderedDocument, BuildError> {
        let mut document = self.render()?;
        document.bytes = crate::bookmarks::apply_section_bookmarks(&document.bytes, &document.sections)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextBlock;
    use crate::theme::styles;

    #[test]
    fn validation_reports_first_unknown_style() {
        let theme = Theme::dark();
        let blocks = vec![
            ContentBlock::Text(TextBlock::new(styles::BODY, "ok")),
            ContentBlock::spacer(2.0),
            ContentBlock::Text(TextBlock::new("sBody", "typo")),
            ContentBlock::Text(TextBlock::new("sOther", "later typo")),
        ];
        let err = validate(&theme, &blocks).unwrap_err();
        assert_eq!(err.position(), Some(2));
        assert!(err.to_string().contains("sBody"));
    }

    #[test]
    fn footer_title_defaults_to_document_title() {
        let theme = Theme::dark();
        let builder = GuideBuilder::new(&theme).with_title("Sliding Window");
        assert_eq!(builder.chrome().footer_text(2), "Sliding Window  ·  Page 2");
        let builder = builder.with_footer_title("Patterns");
        assert_eq!(builder.chrome().footer_text(2), "Patterns  ·  Page 2");
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested/guide.pdf");
        write_atomically(&path, b"first").expect("first write");
        write_atomically(&path, b"second").expect("second write");
        assert_eq!(fs::read(&path).expect("read back"), b"second");
        let leftovers = fs::read_dir(path.parent().expect("parent"))
            .expect("list")
            .count();
        assert_eq!(leftovers, 1);
    }
}
