//! Archive of the original uploads.
//!
//! One entry per record, in batch order, holding the uploaded bytes
//! unchanged. Entry names are the display names made unique: the second
//! `photo.jpg` becomes `photo-2.jpg`, the third `photo-3.jpg`, and so on.
use crate::batch::FileRecord;
use crate::common::error::EncodingContext;
use crate::common::Result;
use crate::config::ExportOptions;
use crate::export::{Assembled, ExportKind};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use tracing::instrument;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Build the archive for `records`.
#[instrument(skip_all, fields(records = records.len()))]
pub(crate) fn assemble(records: &[FileRecord], options: &ExportOptions) -> Result<Assembled> {
    const KIND: ExportKind = ExportKind::Archive;

    let entry_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let folder = options
        .archive_folder
        .then(|| options.batch_label.as_deref().unwrap_or("u2p"));

    let names = unique_names(records.iter().map(FileRecord::display_name));
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (record, name) in records.iter().zip(&names) {
        let entry = match folder {
            Some(folder) => format!("{}/{}", folder, name),
            None => name.clone(),
        };
        writer.start_file(entry, entry_options).encoding(KIND)?;
        writer.write_all(record.content()).encoding(KIND)?;
    }

    let bytes = writer.finish().encoding(KIND)?.into_inner();

    tracing::info!(
        kind = %KIND,
        bytes = bytes.len(),
        entries = records.len(),
        "archive assembled"
    );

    Ok(Assembled {
        bytes,
        item_count: records.len(),
        warnings: Vec::new(),
    })
}

/// Make every name unique, in order.
///
/// The first occurrence keeps its name. Later ones get `-2`, `-3`, ...
/// before the extension, skipping any candidate already taken, so a
/// generated name never shadows a literal one that came earlier and a
/// literal one that comes later is bumped in turn. Comparison is exact.
pub(crate) fn unique_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for name in names {
        let mut candidate = name.to_string();
        let mut n = 2usize;
        while taken.contains(&candidate) {
            candidate = with_suffix(name, n);
            n += 1;
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }

    out
}

/// `photo.jpg` + 2 -> `photo-2.jpg`; `README` + 2 -> `README-2`.
///
/// A leading dot does not start an extension (`.env` -> `.env-2`).
fn with_suffix(name: &str, n: usize) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}-{}{}", &name[..dot], n, &name[dot..]),
        _ => format!("{}-{}", name, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::test_support::{corrupt_png_bytes, png_bytes};
    use proptest::prelude::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn entries(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut content = Vec::new();
                file.read_to_end(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_mixed_batch_scenario() {
        let png = png_bytes(16, 16);
        let corrupt = corrupt_png_bytes();
        let mut batch = Batch::new();
        batch.add(png.clone(), "a.png", "image/png").unwrap();
        batch
            .add(b"%PDF-1.4 fake".to_vec(), "doc.pdf", "application/pdf")
            .unwrap();
        batch.add(corrupt.clone(), "bad.png", "image/png").unwrap();

        let out = assemble(&batch.list(), &ExportOptions::default()).unwrap();
        assert_eq!(out.item_count, 3);

        let entries = entries(out.bytes);
        assert_eq!(
            entries.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            ["a.png", "doc.pdf", "bad.png"]
        );
        assert_eq!(entries[0].1, png);
        assert_eq!(entries[1].1, b"%PDF-1.4 fake");
        assert_eq!(entries[2].1, corrupt);
    }

    #[test]
    fn test_empty_batch_is_empty_archive() {
        let out = assemble(&[], &ExportOptions::default()).unwrap();
        assert_eq!(out.item_count, 0);
        let archive = ZipArchive::new(Cursor::new(out.bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_duplicate_names_get_suffixes() {
        let mut batch = Batch::new();
        batch.add(b"1".to_vec(), "photo.jpg", "image/jpeg").unwrap();
        batch.add(b"2".to_vec(), "photo.jpg", "image/jpeg").unwrap();
        batch.add(b"3".to_vec(), "photo.jpg", "image/jpeg").unwrap();

        let out = assemble(&batch.list(), &ExportOptions::default()).unwrap();
        let entries = entries(out.bytes);
        assert_eq!(entries[0], ("photo.jpg".to_string(), b"1".to_vec()));
        assert_eq!(entries[1], ("photo-2.jpg".to_string(), b"2".to_vec()));
        assert_eq!(entries[2], ("photo-3.jpg".to_string(), b"3".to_vec()));
    }

    #[test]
    fn test_folder_option_nests_entries() {
        let mut batch = Batch::new();
        batch.add(b"x".to_vec(), "a.txt", "text/plain").unwrap();
        let options = ExportOptions::new()
            .with_batch_label("20250301T120000Z")
            .with_archive_folder(true);

        let out = assemble(&batch.list(), &options).unwrap();
        assert_eq!(entries(out.bytes)[0].0, "20250301T120000Z/a.txt");
    }

    #[test]
    fn test_archive_is_reproducible() {
        let mut batch = Batch::new();
        batch.add(b"x".to_vec(), "a.txt", "text/plain").unwrap();
        let records = batch.list();
        let first = assemble(&records, &ExportOptions::default()).unwrap();
        let second = assemble(&records, &ExportOptions::default()).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_unique_names_edge_cases() {
        assert_eq!(
            unique_names(["README", "README", ".env", ".env"]),
            ["README", "README-2", ".env", ".env-2"]
        );
        // Generated name collides with a later literal
        assert_eq!(
            unique_names(["a.jpg", "a.jpg", "a-2.jpg"]),
            ["a.jpg", "a-2.jpg", "a-2-2.jpg"]
        );
        // Literal taken first, generated name skips past it
        assert_eq!(
            unique_names(["a-2.jpg", "a.jpg", "a.jpg"]),
            ["a-2.jpg", "a.jpg", "a-3.jpg"]
        );
        // Case is significant
        assert_eq!(unique_names(["A.jpg", "a.jpg"]), ["A.jpg", "a.jpg"]);
    }

    proptest! {
        #[test]
        fn prop_unique_names_are_unique(names in prop::collection::vec("[ab]{0,2}(\\.[xy])?", 0..24)) {
            let out = unique_names(names.iter().map(String::as_str));
            prop_assert_eq!(out.len(), names.len());
            let distinct: HashSet<&String> = out.iter().collect();
            prop_assert_eq!(distinct.len(), out.len());
        }

        #[test]
        fn prop_first_occurrence_keeps_its_name(names in prop::collection::vec("[ab]{1,2}\\.[xy]", 1..12)) {
            let out = unique_names(names.iter().map(String::as_str));
            prop_assert_eq!(&out[0], &names[0]);
        }
    }
}
