//! PDF document assembly.
//!
//! Rendering runs in two passes. The layout pass flows blocks down a page
//! cursor, producing absolutely positioned text, rule, and image items per
//! page; headings stay with the block that follows them, and tables and
//! figures keep their captions attached. The write pass then emits the PDF
//! object graph, embedding each figure PNG as a zlib-compressed RGB XObject.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};

use crate::common::constants::{
    CONTENT_WIDTH_PT, PAGE_HEIGHT_PT, PAGE_MARGIN_PT, PAGE_WIDTH_PT, POINTS_PER_INCH,
};
use crate::domain::errors::{ReportError, ReportResult};
use crate::modules::table::Table;
use crate::render::{Block, DocumentRenderer};

const BODY_SIZE: f64 = 10.0;
const MONO_SIZE: f64 = 10.0;
const TABLE_SIZE: f64 = 9.0;
const CAPTION_SIZE: f64 = 9.0;
const LINE_SPREAD: f64 = 1.3;
const HEADER_COLUMN_WIDTH: f64 = 140.0;
const CELL_PADDING: f64 = 3.0;
const TOP_Y: f64 = PAGE_HEIGHT_PT - PAGE_MARGIN_PT;

/// Renders block lists to PDF bytes.
pub struct PdfDocumentRenderer;

impl PdfDocumentRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfDocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for PdfDocumentRenderer {
    fn render(&self, blocks: &[Block]) -> ReportResult<Vec<u8>> {
        let pages = flow(merge_sticky(build_chunks(blocks)));
        write_pdf(&pages)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontKind {
    Body,
    Bold,
    Mono,
}

impl FontKind {
    fn resource(self) -> Name<'static> {
        match self {
            FontKind::Body => Name(b"F1"),
            FontKind::Bold => Name(b"F2"),
            FontKind::Mono => Name(b"F3"),
        }
    }

    fn base_font(self) -> Name<'static> {
        match self {
            FontKind::Body => Name(b"Helvetica"),
            FontKind::Bold => Name(b"Helvetica-Bold"),
            FontKind::Mono => Name(b"Courier"),
        }
    }

    /// Approximate advance width per character, as a fraction of font size.
    fn char_factor(self) -> f64 {
        match self {
            FontKind::Mono => 0.6,
            _ => 0.5,
        }
    }
}

fn text_width(text: &str, size: f64, font: FontKind) -> f64 {
    text.chars().count() as f64 * size * font.char_factor()
}

fn wrap_words(text: &str, size: f64, font: FontKind, max_width: f64) -> Vec<String> {
    let fit = ((max_width / (size * font.char_factor())).floor() as usize).max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut current = String::new();
        let mut saw_word = false;

        for word in raw.split_whitespace() {
            saw_word = true;
            let mut word = word.to_string();
            loop {
                let candidate = if current.is_empty() {
                    word.clone()
                } else {
                    format!("{current} {word}")
                };
                if text_width(&candidate, size, font) <= max_width {
                    current = candidate;
                    break;
                }
                if current.is_empty() {
                    let head: String = word.chars().take(fit).collect();
                    let rest: String = word.chars().skip(fit).collect();
                    lines.push(head);
                    word = rest;
                    if word.is_empty() {
                        break;
                    }
                } else {
                    lines.push(std::mem::take(&mut current));
                }
            }
        }

        if !current.is_empty() || !saw_word {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Splits preformatted text on newlines only, hard-breaking overlong lines.
fn wrap_preformatted(text: &str, size: f64, font: FontKind, max_width: f64) -> Vec<String> {
    let fit = ((max_width / (size * font.char_factor())).floor() as usize).max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        if raw.is_empty() {
            lines.push(String::new());
            continue;
        }
        let chars: Vec<char> = raw.chars().collect();
        for chunk in chars.chunks(fit) {
            lines.push(chunk.iter().collect());
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// One flowable unit. Item offsets are measured down from the chunk top.
#[derive(Debug, Clone, Default)]
struct Chunk {
    space_before: f64,
    height: f64,
    keep_with_next: bool,
    items: Vec<ChunkItem>,
}

#[derive(Debug, Clone)]
enum ChunkItem {
    Text {
        x: f64,
        top: f64,
        size: f64,
        font: FontKind,
        text: String,
    },
    Image {
        x: f64,
        top: f64,
        width: f64,
        height: f64,
        path: PathBuf,
    },
    HRule {
        x0: f64,
        x1: f64,
        top: f64,
    },
    VRule {
        x: f64,
        top: f64,
        length: f64,
    },
}

impl ChunkItem {
    fn shifted(self, offset: f64) -> Self {
        match self {
            ChunkItem::Text {
                x,
                top,
                size,
                font,
                text,
            } => ChunkItem::Text {
                x,
                top: top + offset,
                size,
                font,
                text,
            },
            ChunkItem::Image {
                x,
                top,
                width,
                height,
                path,
            } => ChunkItem::Image {
                x,
                top: top + offset,
                width,
                height,
                path,
            },
            ChunkItem::HRule { x0, x1, top } => ChunkItem::HRule {
                x0,
                x1,
                top: top + offset,
            },
            ChunkItem::VRule { x, top, length } => ChunkItem::VRule {
                x,
                top: top + offset,
                length,
            },
        }
    }
}

fn build_chunks(blocks: &[Block]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => chunks.push(heading_chunk(*level, text)),
            Block::Paragraph { text } => {
                chunks.extend(text_chunks(text, BODY_SIZE, FontKind::Body, false));
            }
            Block::Preformatted { text } => {
                chunks.extend(text_chunks(text, MONO_SIZE, FontKind::Mono, true));
            }
            Block::Table { table, caption } => {
                chunks.push(table_chunk(table, caption.as_deref()));
            }
            Block::Figure {
                path,
                width_in,
                height_in,
                caption,
            } => chunks.push(figure_chunk(path, *width_in, *height_in, caption)),
        }
    }
    chunks
}

fn heading_chunk(level: u8, text: &str) -> Chunk {
    let (size, space_before) = match level {
        1 => (18.0, 0.0),
        2 => (14.0, 12.0),
        _ => (12.0, 10.0),
    };
    let line_height = size * LINE_SPREAD;
    let lines = wrap_words(text, size, FontKind::Bold, CONTENT_WIDTH_PT);

    let mut chunk = Chunk {
        space_before,
        keep_with_next: true,
        ..Chunk::default()
    };
    for (index, line) in lines.iter().enumerate() {
        chunk.items.push(ChunkItem::Text {
            x: PAGE_MARGIN_PT,
            top: index as f64 * line_height,
            size,
            font: FontKind::Bold,
            text: line.clone(),
        });
    }
    chunk.height = lines.len() as f64 * line_height + 6.0;
    chunk
}

/// One chunk per wrapped line, so paragraphs may break across pages.
fn text_chunks(text: &str, size: f64, font: FontKind, preformatted: bool) -> Vec<Chunk> {
    let line_height = size * LINE_SPREAD;
    let lines = if preformatted {
        wrap_preformatted(text, size, font, CONTENT_WIDTH_PT)
    } else {
        wrap_words(text, size, font, CONTENT_WIDTH_PT)
    };

    let count = lines.len();
    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| Chunk {
            space_before: 0.0,
            height: line_height + if index + 1 == count { 6.0 } else { 0.0 },
            keep_with_next: false,
            items: vec![ChunkItem::Text {
                x: PAGE_MARGIN_PT,
                top: 0.0,
                size,
                font,
                text: line,
            }],
        })
        .collect()
}

fn table_chunk(table: &Table, caption: Option<&str>) -> Chunk {
    let line_height = TABLE_SIZE * LINE_SPREAD;
    let records = table.record_count().max(1);
    let value_width = ((CONTENT_WIDTH_PT - HEADER_COLUMN_WIDTH) / records as f64).max(30.0);

    let mut chunk = Chunk {
        space_before: 6.0,
        ..Chunk::default()
    };
    let mut y = 0.0;
    let mut label_row_bottom = 0.0;

    for (row_index, row) in table.rows.iter().enumerate() {
        let value_font = if row_index == 0 {
            FontKind::Bold
        } else {
            FontKind::Body
        };

        let mut cells = Vec::with_capacity(1 + row.values.len());
        cells.push((
            PAGE_MARGIN_PT,
            HEADER_COLUMN_WIDTH,
            FontKind::Bold,
            row.header.as_str(),
        ));
        for (value_index, value) in row.values.iter().enumerate() {
            let x = PAGE_MARGIN_PT + HEADER_COLUMN_WIDTH + value_index as f64 * value_width;
            cells.push((x, value_width, value_font, value.as_str()));
        }

        let mut row_lines = 1;
        for (x, width, font, text) in cells {
            let wrapped = wrap_words(text, TABLE_SIZE, font, width - 2.0 * CELL_PADDING);
            row_lines = row_lines.max(wrapped.len());
            for (line_index, line) in wrapped.into_iter().enumerate() {
                chunk.items.push(ChunkItem::Text {
                    x: x + CELL_PADDING,
                    top: y + 2.0 + line_index as f64 * line_height,
                    size: TABLE_SIZE,
                    font,
                    text: line,
                });
            }
        }

        y += row_lines as f64 * line_height + 5.0;
        if row_index == 0 {
            label_row_bottom = y;
        }
    }

    chunk.items.push(ChunkItem::HRule {
        x0: PAGE_MARGIN_PT,
        x1: PAGE_MARGIN_PT + CONTENT_WIDTH_PT,
        top: label_row_bottom - 1.0,
    });
    chunk.items.push(ChunkItem::HRule {
        x0: PAGE_MARGIN_PT,
        x1: PAGE_MARGIN_PT + CONTENT_WIDTH_PT,
        top: y - 1.0,
    });
    chunk.items.push(ChunkItem::VRule {
        x: PAGE_MARGIN_PT + HEADER_COLUMN_WIDTH - 2.0,
        top: 0.0,
        length: y - 1.0,
    });

    if let Some(caption) = caption
        && !caption.is_empty()
    {
        y += 6.0;
        let caption_height = CAPTION_SIZE * LINE_SPREAD;
        for line in wrap_words(caption, CAPTION_SIZE, FontKind::Body, CONTENT_WIDTH_PT) {
            chunk.items.push(ChunkItem::Text {
                x: PAGE_MARGIN_PT,
                top: y,
                size: CAPTION_SIZE,
                font: FontKind::Body,
                text: line,
            });
            y += caption_height;
        }
    }

    chunk.height = y + 8.0;
    chunk
}

fn figure_chunk(path: &Path, width_in: f64, height_in: f64, caption: &str) -> Chunk {
    let width_pt = width_in * POINTS_PER_INCH;
    let height_pt = height_in * POINTS_PER_INCH;
    let x = PAGE_MARGIN_PT + (CONTENT_WIDTH_PT - width_pt).max(0.0) / 2.0;

    let mut chunk = Chunk {
        space_before: 8.0,
        ..Chunk::default()
    };
    chunk.items.push(ChunkItem::Image {
        x,
        top: 0.0,
        width: width_pt,
        height: height_pt,
        path: path.to_path_buf(),
    });

    let mut y = height_pt;
    if !caption.is_empty() {
        y += 6.0;
        let caption_height = CAPTION_SIZE * LINE_SPREAD;
        for line in wrap_words(caption, CAPTION_SIZE, FontKind::Body, CONTENT_WIDTH_PT) {
            chunk.items.push(ChunkItem::Text {
                x: PAGE_MARGIN_PT,
                top: y,
                size: CAPTION_SIZE,
                font: FontKind::Body,
                text: line,
            });
            y += caption_height;
        }
    }

    chunk.height = y + 8.0;
    chunk
}

/// Folds keep-with-next chunks into their successor so a heading can never
/// end a page on its own.
fn merge_sticky(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut merged: Vec<Chunk> = Vec::new();
    let mut pending: Option<Chunk> = None;

    for chunk in chunks {
        match pending.take() {
            None => {
                if chunk.keep_with_next {
                    pending = Some(chunk);
                } else {
                    merged.push(chunk);
                }
            }
            Some(mut head) => {
                let offset = head.height + chunk.space_before;
                head.items
                    .extend(chunk.items.into_iter().map(|item| item.shifted(offset)));
                head.height = offset + chunk.height;
                head.keep_with_next = chunk.keep_with_next;
                if head.keep_with_next {
                    pending = Some(head);
                } else {
                    merged.push(head);
                }
            }
        }
    }

    if let Some(head) = pending {
        merged.push(head);
    }
    merged
}

#[derive(Debug, Clone, Default)]
struct PageLayout {
    items: Vec<PageItem>,
}

#[derive(Debug, Clone)]
enum PageItem {
    Text {
        x: f64,
        baseline: f64,
        size: f64,
        font: FontKind,
        text: String,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        path: PathBuf,
    },
    HLine {
        x0: f64,
        x1: f64,
        y: f64,
    },
    VLine {
        x: f64,
        y0: f64,
        y1: f64,
    },
}

fn flow(chunks: Vec<Chunk>) -> Vec<PageLayout> {
    let mut pages = Vec::new();
    let mut page = PageLayout::default();
    let mut cursor = TOP_Y;
    let mut at_top = true;

    for chunk in chunks {
        let mut start = if at_top {
            cursor
        } else {
            cursor - chunk.space_before
        };
        if !at_top && start - chunk.height < PAGE_MARGIN_PT {
            pages.push(std::mem::take(&mut page));
            cursor = TOP_Y;
            at_top = true;
            start = cursor;
        }

        place_chunk(&chunk, start, &mut page);
        cursor = start - chunk.height;
        at_top = false;
    }

    pages.push(page);
    pages
}

fn place_chunk(chunk: &Chunk, top: f64, page: &mut PageLayout) {
    for item in &chunk.items {
        match item {
            ChunkItem::Text {
                x,
                top: offset,
                size,
                font,
                text,
            } => page.items.push(PageItem::Text {
                x: *x,
                baseline: top - offset - size,
                size: *size,
                font: *font,
                text: text.clone(),
            }),
            ChunkItem::Image {
                x,
                top: offset,
                width,
                height,
                path,
            } => page.items.push(PageItem::Image {
                x: *x,
                y: top - offset - height,
                width: *width,
                height: *height,
                path: path.clone(),
            }),
            ChunkItem::HRule { x0, x1, top: offset } => page.items.push(PageItem::HLine {
                x0: *x0,
                x1: *x1,
                y: top - offset,
            }),
            ChunkItem::VRule {
                x,
                top: offset,
                length,
            } => page.items.push(PageItem::VLine {
                x: *x,
                y0: top - offset - length,
                y1: top - offset,
            }),
        }
    }
}

const FONTS: [FontKind; 3] = [FontKind::Body, FontKind::Bold, FontKind::Mono];

fn write_pdf(pages: &[PageLayout]) -> ReportResult<Vec<u8>> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let font_ids: Vec<Ref> = FONTS.iter().map(|_| alloc.bump()).collect();

    // One XObject per distinct figure file.
    let mut images: Vec<(PathBuf, Ref, String)> = Vec::new();
    for page in pages {
        for item in &page.items {
            if let PageItem::Image { path, .. } = item
                && !images.iter().any(|(known, _, _)| known == path)
            {
                let name = format!("Im{}", images.len() + 1);
                images.push((path.clone(), alloc.bump(), name));
            }
        }
    }

    let page_refs: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc.bump(), alloc.bump())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_refs.iter().map(|(page_id, _)| *page_id))
        .count(pages.len() as i32);

    for (kind, id) in FONTS.iter().zip(&font_ids) {
        pdf.type1_font(*id).base_font(kind.base_font());
    }

    for ((page_id, content_id), page) in page_refs.iter().zip(pages) {
        let content = page_content(page, &images);
        pdf.stream(*content_id, &content.finish());

        let used: Vec<&(PathBuf, Ref, String)> = images
            .iter()
            .filter(|(path, _, _)| {
                page.items.iter().any(
                    |item| matches!(item, PageItem::Image { path: used, .. } if used == path),
                )
            })
            .collect();

        let mut writer = pdf.page(*page_id);
        writer.media_box(Rect::new(
            0.0,
            0.0,
            PAGE_WIDTH_PT as f32,
            PAGE_HEIGHT_PT as f32,
        ));
        writer.parent(tree_id);
        writer.contents(*content_id);

        let mut resources = writer.resources();
        let mut fonts = resources.fonts();
        for (kind, id) in FONTS.iter().zip(&font_ids) {
            fonts.pair(kind.resource(), *id);
        }
        fonts.finish();
        if !used.is_empty() {
            let mut xobjects = resources.x_objects();
            for (_, id, name) in &used {
                xobjects.pair(Name(name.as_bytes()), *id);
            }
            xobjects.finish();
        }
        resources.finish();
        writer.finish();
    }

    for (path, id, _) in &images {
        embed_image(&mut pdf, *id, path)?;
    }

    Ok(pdf.finish())
}

fn page_content(page: &PageLayout, images: &[(PathBuf, Ref, String)]) -> Content {
    let mut content = Content::new();

    for item in &page.items {
        match item {
            PageItem::Text {
                x,
                baseline,
                size,
                font,
                text,
            } => {
                content.begin_text();
                content.set_font(font.resource(), *size as f32);
                content.next_line(*x as f32, *baseline as f32);
                content.show(Str(text.as_bytes()));
                content.end_text();
            }
            PageItem::Image {
                x,
                y,
                width,
                height,
                path,
            } => {
                if let Some((_, _, name)) = images.iter().find(|(known, _, _)| known == path) {
                    content.save_state();
                    content.transform([
                        *width as f32,
                        0.0,
                        0.0,
                        *height as f32,
                        *x as f32,
                        *y as f32,
                    ]);
                    content.x_object(Name(name.as_bytes()));
                    content.restore_state();
                }
            }
            PageItem::HLine { x0, x1, y } => {
                content.set_line_width(0.75);
                content.move_to(*x0 as f32, *y as f32);
                content.line_to(*x1 as f32, *y as f32);
                content.stroke();
            }
            PageItem::VLine { x, y0, y1 } => {
                content.set_line_width(0.75);
                content.move_to(*x as f32, *y0 as f32);
                content.line_to(*x as f32, *y1 as f32);
                content.stroke();
            }
        }
    }

    content
}

fn embed_image(pdf: &mut Pdf, id: Ref, path: &Path) -> ReportResult<()> {
    let rgb = image::open(path)
        .map_err(|err| {
            ReportError::render(
                "RENDER.IMAGE",
                format!("failed to load figure {}: {err}", path.display()),
            )
        })?
        .to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(rgb.as_raw()).map_err(|err| {
        ReportError::render(
            "RENDER.IMAGE",
            format!("failed to compress figure {}: {err}", path.display()),
        )
    })?;
    let data = encoder.finish().map_err(|err| {
        ReportError::render(
            "RENDER.IMAGE",
            format!("failed to compress figure {}: {err}", path.display()),
        )
    })?;

    let mut image = pdf.image_xobject(id, &data);
    image.filter(Filter::FlateDecode);
    image.width(width as i32);
    image.height(height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{
        Block, Chunk, ChunkItem, DocumentRenderer, FontKind, PageItem, PdfDocumentRenderer,
        build_chunks, figure_chunk, flow, merge_sticky, table_chunk, wrap_words,
    };
    use crate::modules::table::{Table, TableColumn, compose};

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    fn sample_table() -> Table {
        compose(vec![
            TableColumn::new("", true, vec!["profile_1.dat".into()]),
            TableColumn::new("Rg [A]", true, vec!["25.3 +/- 0.2".into()]),
        ])
        .expect("a table with values should compose")
    }

    fn page_of(pages: &[super::PageLayout], needle: &str) -> Option<usize> {
        pages.iter().position(|page| {
            page.items.iter().any(
                |item| matches!(item, PageItem::Text { text, .. } if text.contains(needle)),
            )
        })
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap_words("alpha beta gamma delta", 10.0, FontKind::Body, 60.0);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn overlong_tokens_are_hard_split() {
        let lines = wrap_words("abcdefghij", 10.0, FontKind::Body, 25.0);
        assert_eq!(lines, vec!["abcde", "fghij"]);
    }

    #[test]
    fn blank_lines_survive_wrapping() {
        let lines = wrap_words("first\n\nsecond", 10.0, FontKind::Body, 200.0);
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn heading_lands_on_the_same_page_as_its_table() {
        let filler = vec!["x"; 60].join("\n");
        let blocks = vec![
            Block::Preformatted { text: filler },
            Block::Heading {
                level: 2,
                text: "Guinier:".into(),
            },
            Block::Table {
                table: sample_table(),
                caption: None,
            },
        ];

        let pages = flow(merge_sticky(build_chunks(&blocks)));

        let heading_page = page_of(&pages, "Guinier:").expect("heading should be placed");
        let cell_page = page_of(&pages, "25.3").expect("table cell should be placed");
        assert!(pages.len() > 1);
        assert!(heading_page > 0);
        assert_eq!(heading_page, cell_page);
    }

    #[test]
    fn table_rules_frame_the_label_row() {
        let chunk = table_chunk(&sample_table(), Some("Summary table."));

        let hrules = chunk
            .items
            .iter()
            .filter(|item| matches!(item, ChunkItem::HRule { .. }))
            .count();
        let vrules = chunk
            .items
            .iter()
            .filter(|item| matches!(item, ChunkItem::VRule { .. }))
            .count();
        let caption = chunk.items.iter().any(
            |item| matches!(item, ChunkItem::Text { text, .. } if text.contains("Summary table.")),
        );
        assert_eq!(hrules, 2);
        assert_eq!(vrules, 1);
        assert!(caption);
        assert!(chunk.height > 0.0);
    }

    #[test]
    fn figures_are_centered_with_their_caption() {
        let chunk = figure_chunk(Path::new("summary.png"), 6.0, 4.0, "Figure 1. Overview.");

        let image = chunk
            .items
            .iter()
            .find_map(|item| match item {
                ChunkItem::Image {
                    x, width, height, ..
                } => Some((*x, *width, *height)),
                _ => None,
            })
            .expect("figure chunk should hold an image");
        assert_eq!(image, (90.0, 432.0, 288.0));

        let caption_below_image = chunk.items.iter().any(|item| {
            matches!(item, ChunkItem::Text { top, text, .. } if *top >= 288.0 && text.starts_with("Figure 1."))
        });
        assert!(caption_below_image);
    }

    #[test]
    fn sticky_chunks_never_trail_a_flush() {
        let chunks = vec![
            Chunk {
                keep_with_next: true,
                height: 20.0,
                ..Chunk::default()
            },
            Chunk {
                keep_with_next: true,
                height: 16.0,
                ..Chunk::default()
            },
            Chunk {
                height: 30.0,
                ..Chunk::default()
            },
        ];

        let merged = merge_sticky(chunks);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].height >= 66.0);
        assert!(!merged[0].keep_with_next);
    }

    #[test]
    fn empty_documents_still_render() {
        let bytes = PdfDocumentRenderer::new()
            .render(&[])
            .expect("an empty block list should render");

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(contains(&bytes, b"%%EOF"));
    }

    #[test]
    fn text_and_tables_render_to_pdf_bytes() {
        let blocks = vec![
            Block::Heading {
                level: 1,
                text: "sec_saxs SAXS data overview".into(),
            },
            Block::Paragraph {
                text: "Summary of the collected data.".into(),
            },
            Block::Table {
                table: sample_table(),
                caption: Some("Summary table.".into()),
            },
        ];

        let bytes = PdfDocumentRenderer::new()
            .render(&blocks)
            .expect("text blocks should render");

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(contains(&bytes, b"Helvetica"));
        assert!(contains(&bytes, b"Courier"));
    }

    #[test]
    fn figures_embed_as_compressed_images() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("figure.png");
        image::RgbImage::new(8, 8)
            .save(&path)
            .expect("png fixture should save");

        let blocks = vec![Block::Figure {
            path: PathBuf::from(&path),
            width_in: 6.0,
            height_in: 2.0,
            caption: "Figure 1. Test figure.".into(),
        }];

        let bytes = PdfDocumentRenderer::new()
            .render(&blocks)
            .expect("figure block should render");

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(contains(&bytes, b"FlateDecode"));
        assert!(contains(&bytes, b"XObject"));
    }

    #[test]
    fn missing_figure_files_surface_a_render_error() {
        let blocks = vec![Block::Figure {
            path: PathBuf::from("/nonexistent/figure.png"),
            width_in: 6.0,
            height_in: 2.0,
            caption: String::new(),
        }];

        let err = PdfDocumentRenderer::new()
            .render(&blocks)
            .expect_err("a missing figure file should fail");
        assert_eq!(err.code(), "RENDER.IMAGE");
    }
}
