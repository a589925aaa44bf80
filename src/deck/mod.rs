//! Deck assembly: a batch snapshot to a `.pptx` presentation.
//!
//! Slide order:
//!
//! 1. an optional title slide when a presentation title is configured,
//! 2. one slide per image record, in batch order,
//! 3. one "Attached Files" slide listing every other record, if any.
//!
//! An empty batch yields a single "No files" placeholder slide instead.
mod layout;

use crate::batch::FileRecord;
use crate::classify::{Classification, RasterInfo, classify_with_warning};
use crate::common::error::EncodingContext;
use crate::common::{Result, human_size};
use crate::config::ExportOptions;
use crate::export::{Assembled, ExportKind};
use crate::ooxml::pptx::{Alignment, CoreProperties, ImageFormat, MutablePresentation, MutableSlide};
use bytes::Bytes;
use layout::Frame;
use std::io::Cursor;
use tracing::instrument;

pub(crate) const SUMMARY_HEADING: &str = "Attached Files";
pub(crate) const EMPTY_HEADING: &str = "No files";
pub(crate) const EMPTY_BODY: &str = "This batch contains no files.";

const CREATOR: &str = "U2P - Upload to Present";
const FOOTER_GREY: &str = "808080";
const LIST_GREY: &str = "646464";
/// Files named on the title slide before "... and N more"
const TITLE_LIST_LIMIT: usize = 6;
/// Batches larger than this only show a file count on the title slide
const TITLE_LIST_MAX_FILES: usize = 8;

/// Build the deck for `records` with `options`.
#[instrument(skip_all, fields(records = records.len()))]
pub(crate) fn assemble(records: &[FileRecord], options: &ExportOptions) -> Result<Assembled> {
    const KIND: ExportKind = ExportKind::Deck;

    let mut pres = MutablePresentation::new();
    let (width, height) = options.slide_size.dimensions_emu();
    pres.set_slide_size(width, height).encoding(KIND)?;
    pres.set_properties(core_properties(options));
    let size = (width, height);

    if let Some(title) = options.presentation_title.as_deref() {
        add_title_slide(pres.add_slide(), size, title, records, options);
    }

    let mut warnings = Vec::new();
    let mut others: Vec<&FileRecord> = Vec::new();

    for record in records {
        let (class, warning) = classify_with_warning(record);
        warnings.extend(warning);
        match class {
            Classification::Image(info) => {
                let (data, format) = embeddable(record, &info).encoding(KIND)?;
                let slide = pres.add_slide();
                add_image_slide(slide, size, record, info, data, format, options)
                    .encoding(KIND)?;
            },
            Classification::Other => others.push(record),
        }
    }

    if !others.is_empty() {
        let slide = pres.add_slide();
        let lines = others
            .iter()
            .map(|r| format!("\u{2022} {} ({})", r.display_name(), human_size(r.size_bytes())));
        add_text_slide(slide, size, SUMMARY_HEADING, lines, options);
    } else if records.is_empty() {
        let slide = pres.add_slide();
        add_text_slide(slide, size, EMPTY_HEADING, [EMPTY_BODY.to_string()], options);
    }

    let slide_count = pres.slide_count();
    let bytes = pres.to_bytes().encoding(KIND)?;

    tracing::info!(
        kind = %KIND,
        bytes = bytes.len(),
        slides = slide_count,
        warnings = warnings.len(),
        "deck assembled"
    );

    Ok(Assembled {
        bytes,
        item_count: slide_count,
        warnings,
    })
}

fn core_properties(options: &ExportOptions) -> CoreProperties {
    let created = options.generated_at();
    let title = options.presentation_title.clone();
    CoreProperties {
        subject: title.as_ref().map(|t| format!("Document Collection - {}", t)),
        keywords: title
            .as_ref()
            .map(|_| "U2P, Document Collection, Presentation".to_string()),
        category: title.as_ref().map(|_| "Document Collection".to_string()),
        description: Some(format!(
            "Generated by U2P on {}",
            created.format("%Y-%m-%d %H:%M:%S")
        )),
        creator: Some(CREATOR.to_string()),
        title,
        created,
    }
}

/// Bytes and format to embed for a decoded image.
///
/// Formats a presentation renders natively are embedded verbatim; anything
/// else is re-encoded as PNG.
fn embeddable(record: &FileRecord, info: &RasterInfo) -> image::ImageResult<(Bytes, ImageFormat)> {
    if let Some(format) = ImageFormat::from_decoded(info.format) {
        return Ok((record.content().clone(), format));
    }

    let decoded = image::load_from_memory_with_format(record.content(), info.format)?;
    let mut out = Cursor::new(Vec::new());
    decoded.write_to(&mut out, image::ImageFormat::Png)?;
    tracing::debug!(
        name = record.display_name(),
        from = ?info.format,
        "re-encoded image as PNG"
    );
    Ok((Bytes::from(out.into_inner()), ImageFormat::Png))
}

fn add_image_slide(
    slide: &mut MutableSlide,
    size: (i64, i64),
    record: &FileRecord,
    info: RasterInfo,
    data: Bytes,
    format: ImageFormat,
    options: &ExportOptions,
) -> crate::ooxml::Result<()> {
    if options.show_titles {
        let Frame { x, y, width, height } = layout::caption(size);
        slide
            .add_text_box([record.caption()], x, y, width, height)
            .font_size(18.0)
            .align(Alignment::Center);
    }

    let Frame { x, y, width, height } =
        layout::fit_picture(size, (info.width, info.height), options.show_titles);
    slide.add_picture(data, format, x, y, width, height, record.display_name())?;

    add_footer(slide, size, options);
    Ok(())
}

fn add_text_slide<S: Into<String>>(
    slide: &mut MutableSlide,
    size: (i64, i64),
    heading: &str,
    lines: impl IntoIterator<Item = S>,
    options: &ExportOptions,
) {
    let Frame { x, y, width, height } = layout::heading(size);
    slide
        .add_text_box([heading], x, y, width, height)
        .font_size(32.0)
        .bold(true);

    let Frame { x, y, width, height } = layout::body(size);
    slide
        .add_text_box(lines, x, y, width, height)
        .font_size(16.0)
        .align(Alignment::Left)
        .space_after(6.0);

    add_footer(slide, size, options);
}

fn add_title_slide(
    slide: &mut MutableSlide,
    size: (i64, i64),
    title: &str,
    records: &[FileRecord],
    options: &ExportOptions,
) {
    let Frame { x, y, width, height } = layout::title(size);
    slide
        .add_text_box([title], x, y, width, height)
        .font_size(36.0)
        .bold(true)
        .align(Alignment::Center);

    let Frame { x, y, width, height } = layout::title_block(size, 3.8);
    slide
        .add_text_box(["Generated by U2P - Upload to Present"], x, y, width, height)
        .font_size(16.0)
        .color(FOOTER_GREY)
        .align(Alignment::Center);

    // The generation time lives in core.xml only; slide content depends on the batch alone
    let mut batch_lines = Vec::with_capacity(2);
    if let Some(label) = options.batch_label.as_deref() {
        batch_lines.push(format!("Batch ID: {}", label));
    }
    batch_lines.push(format!("Total Files: {}", records.len()));
    let Frame { x, y, width, height } = layout::title_block(size, 4.4);
    slide
        .add_text_box(batch_lines, x, y, width, height)
        .font_size(14.0)
        .color(FOOTER_GREY)
        .align(Alignment::Center);

    let Frame { x, y, width, height } = layout::title_block(size, 5.4);
    slide
        .add_text_box(title_file_list(records), x, y, width, height)
        .font_size(12.0)
        .color(LIST_GREY)
        .align(Alignment::Center);

    add_footer(slide, size, options);
}

/// File list lines for the title slide.
fn title_file_list(records: &[FileRecord]) -> Vec<String> {
    if records.len() > TITLE_LIST_MAX_FILES {
        return vec![format!("Files Included: {} documents", records.len())];
    }

    let mut lines = vec!["Files Included:".to_string()];
    for record in records.iter().take(TITLE_LIST_LIMIT) {
        let camera = if record.metadata().is_camera() {
            " (Camera)"
        } else {
            ""
        };
        match record.title() {
            Some(title) if title != record.display_name() => lines.push(format!(
                "\u{2022} {} - {}{}",
                title,
                record.display_name(),
                camera
            )),
            _ => lines.push(format!("\u{2022} {}{}", record.display_name(), camera)),
        }
    }
    if records.len() > TITLE_LIST_LIMIT {
        lines.push(format!(
            "... and {} more files",
            records.len() - TITLE_LIST_LIMIT
        ));
    }
    lines
}

fn add_footer(slide: &mut MutableSlide, size: (i64, i64), options: &ExportOptions) {
    if let Some(label) = options.batch_label.as_deref() {
        let Frame { x, y, width, height } = layout::footer(size);
        slide
            .add_text_box([format!("Batch: {}", label)], x, y, width, height)
            .font_size(10.0)
            .color(FOOTER_GREY)
            .align(Alignment::Center);
    }
}
