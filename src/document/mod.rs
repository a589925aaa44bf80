//! Document assembly: a batch snapshot to a paginated PDF.
//!
//! Every record becomes exactly one US Letter page, in batch order. Images
//! are drawn fitted inside the page margins; anything else, including a
//! declared image that does not decode, gets a text page with its name, type
//! and size. An empty batch produces a single "No files" page.
mod text;

use crate::batch::FileRecord;
use crate::classify::{Classification, RasterInfo, classify_with_warning};
use crate::common::error::EncodingContext;
use crate::common::unit::inches_to_pt;
use crate::common::{Result, human_size};
use crate::config::ExportOptions;
use crate::deck::{EMPTY_BODY, EMPTY_HEADING};
use crate::export::{Assembled, ExportKind};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{ExtendedColorType, ImageDecoder, ImageReader};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::io::{Cursor, Write};
use tracing::instrument;

const KIND: ExportKind = ExportKind::Document;

/// US Letter in points
const PAGE_WIDTH: f32 = inches_to_pt(8.5);
const PAGE_HEIGHT: f32 = inches_to_pt(11.0);
const MARGIN: f32 = inches_to_pt(0.5);
/// Wrapped lines kept per text entry so a page never overflows
const MAX_LINES_PER_ENTRY: usize = 12;

const FONT_NAME: &str = "F1";
const IMAGE_NAME: &str = "Im1";

/// Build the document for `records`.
#[instrument(skip_all, fields(records = records.len()))]
pub(crate) fn assemble(records: &[FileRecord], options: &ExportOptions) -> Result<Assembled> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut warnings = Vec::new();
    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(records.len().max(1));

    for record in records {
        let (class, warning) = classify_with_warning(record);
        warnings.extend(warning);
        let page = match class {
            Classification::Image(info) => image_page(record, &info)?,
            Classification::Other => text_page(&[
                (18.0, record.display_name().to_string()),
                (12.0, format!("Type: {}", record.media_type())),
                (12.0, format!("Size: {}", human_size(record.size_bytes()))),
            ]),
        };
        page_ids.push(add_page(&mut doc, pages_id, font_id, page)?);
    }

    if records.is_empty() {
        let page = text_page(&[
            (18.0, EMPTY_HEADING.to_string()),
            (12.0, EMPTY_BODY.to_string()),
        ]);
        page_ids.push(add_page(&mut doc, pages_id, font_id, page)?);
    }

    let page_count = page_ids.len();
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.into_iter().map(Object::from).collect::<Vec<_>>(),
        "Count" => page_count as i64,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(info_dictionary(options));
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).encoding(KIND)?;

    tracing::info!(
        kind = %KIND,
        bytes = bytes.len(),
        pages = page_count,
        warnings = warnings.len(),
        "document assembled"
    );

    Ok(Assembled {
        bytes,
        item_count: page_count,
        warnings,
    })
}

/// Content of one page before it is added to the document.
struct PageContent {
    operations: Vec<Operation>,
    image: Option<Stream>,
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page: PageContent,
) -> Result<ObjectId> {
    let mut resources = Dictionary::new();
    resources.set("Font", dictionary! { FONT_NAME => font_id });
    if let Some(image) = page.image {
        let image_id = doc.add_object(image);
        resources.set("XObject", dictionary! { IMAGE_NAME => image_id });
    }

    let content = Content {
        operations: page.operations,
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().encoding(KIND)?));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Resources" => resources,
        "Contents" => content_id,
    }))
}

/// A page showing `lines` top-down from the upper margin, each line given as
/// (font size, text). Long lines wrap.
fn text_page(lines: &[(f32, String)]) -> PageContent {
    let mut operations = vec![Operation::new("BT", vec![])];
    let mut y = PAGE_HEIGHT - MARGIN - 18.0;
    let mut first = true;

    for (size, line) in lines {
        let limit = text::chars_per_line(*size, PAGE_WIDTH - 2.0 * MARGIN);
        for chunk in text::wrap_capped(line, limit, MAX_LINES_PER_ENTRY) {
            if !first {
                y -= size * 1.5;
            }
            first = false;
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(FONT_NAME.as_bytes().to_vec()), (*size).into()],
            ));
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    MARGIN.into(),
                    y.into(),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(text::to_win_ansi(&chunk))],
            ));
        }
    }

    operations.push(Operation::new("ET", vec![]));
    PageContent {
        operations,
        image: None,
    }
}

/// A page with the image fitted inside the margins and centred.
fn image_page(record: &FileRecord, info: &RasterInfo) -> Result<PageContent> {
    let stream = image_xobject(record.content(), info)?;

    let max_w = PAGE_WIDTH - 2.0 * MARGIN;
    let max_h = PAGE_HEIGHT - 2.0 * MARGIN;
    let (iw, ih) = (info.width.max(1) as f32, info.height.max(1) as f32);
    let scale = (max_w / iw).min(max_h / ih);
    let (w, h) = (iw * scale, ih * scale);
    let x = (PAGE_WIDTH - w) / 2.0;
    let y = (PAGE_HEIGHT - h) / 2.0;

    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()],
        ),
        Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ];

    Ok(PageContent {
        operations,
        image: Some(stream),
    })
}

/// Image XObject for a decodable image.
///
/// Baseline JPEGs in RGB or greyscale are embedded as they are; everything
/// else is decoded, flattened onto white and stored as Flate-compressed RGB.
fn image_xobject(content: &[u8], info: &RasterInfo) -> Result<Stream> {
    if info.format == image::ImageFormat::Jpeg {
        if let Some(color_space) = jpeg_color_space(content) {
            let dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => info.width as i64,
                "Height" => info.height as i64,
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            };
            return Ok(Stream::new(dict, content.to_vec()).with_compression(false));
        }
    }

    let decoded = image::load_from_memory_with_format(content, info.format).encoding(KIND)?;
    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity(rgba.width() as usize * rgba.height() as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[over_white(r, a), over_white(g, a), over_white(b, a)]);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&rgb).encoding(KIND)?;
    let compressed = encoder.finish().encoding(KIND)?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => rgba.width() as i64,
        "Height" => rgba.height() as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    Ok(Stream::new(dict, compressed).with_compression(false))
}

#[inline]
fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (channel as u32, alpha as u32);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// PDF color space for a JPEG that can be passed through untouched.
fn jpeg_color_space(content: &[u8]) -> Option<&'static str> {
    let decoder = ImageReader::with_format(Cursor::new(content), image::ImageFormat::Jpeg)
        .into_decoder()
        .ok()?;
    match decoder.original_color_type() {
        ExtendedColorType::Rgb8 => Some("DeviceRGB"),
        ExtendedColorType::L8 => Some("DeviceGray"),
        _ => None,
    }
}

fn info_dictionary(options: &ExportOptions) -> Dictionary {
    let title = match (
        options.presentation_title.as_deref(),
        options.batch_label.as_deref(),
    ) {
        (Some(title), _) => title.to_string(),
        (None, Some(label)) => format!("U2P batch {}", label),
        (None, None) => "U2P batch".to_string(),
    };
    let created = options.generated_at().format("D:%Y%m%d%H%M%SZ").to_string();

    dictionary! {
        "Title" => Object::string_literal(text::to_win_ansi(&title)),
        "Producer" => Object::string_literal("u2p"),
        "CreationDate" => Object::string_literal(created),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::test_support::{corrupt_png_bytes, jpeg_bytes, png_bytes, webp_bytes};
    use chrono::{TimeZone, Utc};

    fn pinned() -> ExportOptions {
        ExportOptions::new().with_timestamp(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_mixed_batch_scenario() {
        let mut batch = Batch::new();
        batch.add(png_bytes(40, 20), "a.png", "image/png").unwrap();
        batch
            .add(b"%PDF-1.4 fake".to_vec(), "doc.pdf", "application/pdf")
            .unwrap();
        batch.add(corrupt_png_bytes(), "bad.png", "image/png").unwrap();

        let out = assemble(&batch.list(), &pinned()).unwrap();
        assert_eq!(out.item_count, 3);
        assert_eq!(page_count(&out.bytes), 3);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_empty_batch_has_one_page() {
        let out = assemble(&[], &pinned()).unwrap();
        assert_eq!(out.item_count, 1);
        assert_eq!(page_count(&out.bytes), 1);
    }

    #[test]
    fn test_page_per_record() {
        let mut batch = Batch::new();
        batch.add(jpeg_bytes(30, 20), "p.jpg", "image/jpeg").unwrap();
        batch.add(webp_bytes(10, 10), "w.webp", "image/webp").unwrap();
        for i in 0..3 {
            batch.add(b"x".to_vec(), format!("{}.txt", i), "text/plain").unwrap();
        }
        let out = assemble(&batch.list(), &pinned()).unwrap();
        assert_eq!(page_count(&out.bytes), 5);
    }

    #[test]
    fn test_text_page_content() {
        let mut batch = Batch::new();
        batch
            .add(vec![0u8; 2048], "notes (draft).txt", "text/plain")
            .unwrap();
        let out = assemble(&batch.list(), &pinned()).unwrap();

        let doc = Document::load_mem(&out.bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let shown: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first()?.as_str().ok().map(<[u8]>::to_vec))
            .collect();
        assert_eq!(
            shown,
            vec![
                b"notes (draft).txt".to_vec(),
                b"Type: text/plain".to_vec(),
                b"Size: 2.0 KB".to_vec(),
            ]
        );
    }

    #[test]
    fn test_long_name_stays_on_page() {
        let name = format!("{}.txt", "very long file name ".repeat(200));
        let page = text_page(&[
            (18.0, name),
            (12.0, "Type: text/plain".to_string()),
            (12.0, "Size: 1 B".to_string()),
        ]);

        let baselines: Vec<f32> = page
            .operations
            .iter()
            .filter(|op| op.operator == "Tm")
            .map(|op| op.operands[5].as_float().unwrap())
            .collect();
        assert_eq!(baselines.len(), MAX_LINES_PER_ENTRY + 2);
        assert!(baselines.iter().all(|y| *y >= MARGIN));

        let last_name_line = page
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .nth(MAX_LINES_PER_ENTRY - 1)
            .and_then(|op| op.operands[0].as_str().ok())
            .unwrap()
            .to_vec();
        assert_eq!(last_name_line.last(), Some(&0x85));
    }

    #[test]
    fn test_jpeg_is_passed_through() {
        let jpeg = jpeg_bytes(16, 16);
        let mut batch = Batch::new();
        batch.add(jpeg.clone(), "p.jpg", "image/jpeg").unwrap();
        let out = assemble(&batch.list(), &pinned()).unwrap();

        let doc = Document::load_mem(&out.bytes).unwrap();
        let embedded = doc.objects.values().any(|object| match object {
            Object::Stream(stream) => stream.content == jpeg,
            _ => false,
        });
        assert!(embedded);
    }

    #[test]
    fn test_output_is_deterministic_with_pinned_timestamp() {
        let mut batch = Batch::new();
        batch.add(png_bytes(8, 8), "a.png", "image/png").unwrap();
        batch.add(b"x".to_vec(), "b.txt", "text/plain").unwrap();
        let records = batch.list();
        let first = assemble(&records, &pinned()).unwrap();
        let second = assemble(&records, &pinned()).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_info_dictionary() {
        let info = info_dictionary(&pinned().with_batch_label("B1"));
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"U2P batch B1");
        assert_eq!(
            info.get(b"CreationDate").unwrap().as_str().unwrap(),
            b"D:20250301120000Z"
        );
    }

    #[test]
    fn test_alpha_is_flattened_onto_white() {
        assert_eq!(over_white(0, 0), 255);
        assert_eq!(over_white(0, 255), 0);
        assert_eq!(over_white(200, 255), 200);
    }
}
