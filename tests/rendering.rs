use pdf_guidebook::backend::RenderedDocument;
use pdf_guidebook::blocks::{comparison_table, divider, spacer, text_block};
use pdf_guidebook::fonts;
use pdf_guidebook::model::TableRow;
use pdf_guidebook::samples::{sample_guide, SAMPLE_TITLE};
use pdf_guidebook::theme::{styles, PageGeometry};
use pdf_guidebook::{build_document, BuildError, GuideBuilder, Story, Theme};
use sha2::{Digest, Sha256};

const SKIP_HINT: &str =
    "bundled fonts missing. Set GUIDEBOOK_FONTS_DIR or copy assets/fonts next to the binary.";

fn render_sample_guide() -> Option<RenderedDocument> {
    if !fonts::default_fonts_available() {
        return None;
    }

    let theme = Theme::dark();
    let document = GuideBuilder::new(&theme)
        .with_title(SAMPLE_TITLE)
        .with_story(sample_guide(&theme))
        .render()
        .expect("render sample guide");

    Some(document)
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:InstanceID>",
        b"</xmpMM:InstanceID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_output() {
    let Some(document) = render_sample_guide() else {
        eprintln!("Skipping renders_non_empty_output: {SKIP_HINT}");
        return;
    };
    assert!(
        document.bytes.starts_with(b"%PDF"),
        "rendered output should start with a PDF header"
    );
    assert!(document.page_count >= 4, "title, contents and three sections");
}

#[test]
fn numbered_sections_are_recorded_in_order() {
    let Some(document) = render_sample_guide() else {
        eprintln!("Skipping numbered_sections_are_recorded_in_order: {SKIP_HINT}");
        return;
    };
    let numbers: Vec<u32> = document.sections.iter().map(|mark| mark.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(document
        .sections
        .windows(2)
        .all(|pair| pair[0].page < pair[1].page));
    assert!(document
        .sections
        .iter()
        .all(|mark| mark.page >= 1 && mark.page <= document.page_count));
}

#[test]
fn build_document_writes_the_rendered_bytes() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping build_document_writes_the_rendered_bytes: {SKIP_HINT}");
        return;
    }
    let theme = Theme::dark();
    let story = sample_guide(&theme);
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("guide.pdf");

    let document = build_document(&theme, story.blocks(), &path).expect("build document");
    let written = std::fs::read(&path).expect("read output");
    assert_eq!(written, document.bytes);
}

#[test]
fn rendering_is_deterministic() {
    let Some(document_a) = render_sample_guide() else {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_HINT}");
        return;
    };
    let Some(document_b) = render_sample_guide() else {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_HINT}");
        return;
    };

    assert_eq!(
        document_a.bytes.len(),
        document_b.bytes.len(),
        "PDF sizes should match"
    );

    let hash_a = normalized_hash(&document_a.bytes);
    let hash_b = normalized_hash(&document_b.bytes);

    assert_eq!(
        hash_a, hash_b,
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn table_rows_taller_than_a_page_are_split() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping table_rows_taller_than_a_page_are_split: {SKIP_HINT}");
        return;
    }
    let theme = Theme::dark();
    let mut rows: Vec<TableRow> = (0..60)
        .map(|index| TableRow::new([format!("Pattern {index}"), "Sorted input".to_owned()]))
        .collect();
    rows.insert(3, TableRow::new(["Long".to_owned(), "word ".repeat(4000)]));
    let story = Story::from(vec![
        text_block(&theme, styles::BODY, "Before the table.").expect("text"),
        comparison_table(&theme, ["Pattern", "When"], rows).expect("table"),
        text_block(&theme, styles::BODY, "After the table.").expect("text"),
    ]);

    let document = GuideBuilder::new(&theme)
        .with_story(story)
        .render()
        .expect("an oversized row should flow onto the following pages");
    assert!(document.page_count >= 3, "got {} page(s)", document.page_count);
}

#[test]
fn block_too_tall_for_any_page_is_named() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping block_too_tall_for_any_page_is_named: {SKIP_HINT}");
        return;
    }
    let tiny = PageGeometry {
        height: 50.0,
        ..PageGeometry::letter()
    };
    let theme = Theme::dark().with_page(tiny);
    let story = Story::from(vec![
        spacer(1.0),
        divider(&theme, 1, "Too tall for this paper").expect("divider"),
    ]);

    let err = GuideBuilder::new(&theme).with_story(story).render().unwrap_err();
    assert_eq!(err.position(), Some(1));
    assert!(matches!(err, BuildError::Layout { position: 1, .. }));
}

#[cfg(feature = "bookmarks")]
#[test]
fn bookmarks_add_an_outline() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping bookmarks_add_an_outline: {SKIP_HINT}");
        return;
    }
    let theme = Theme::dark();
    let document = GuideBuilder::new(&theme)
        .with_title(SAMPLE_TITLE)
        .with_story(sample_guide(&theme))
        .render_with_bookmarks()
        .expect("render with bookmarks");
    let needle = b"/Outlines";
    assert!(document
        .bytes
        .windows(needle.len())
        .any(|window| window == needle));
}
