/// Physical package writer: the ZIP container beneath an OPC package.
use crate::ooxml::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Physical package writer for creating OPC packages.
///
/// Every member is stamped with the DOS epoch so that identical parts always
/// produce identical bytes.
pub struct PhysPkgWriter {
    /// The underlying ZIP archive writer
    archive: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn options(method: CompressionMethod) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default())
    }

    /// Write a part to the package with Deflate compression.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive
            .start_file(pack_uri.membername(), Self::options(CompressionMethod::Deflated))?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Write a part to the package without compression (stored).
    ///
    /// Used for media that is already compressed.
    pub fn write_stored(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive
            .start_file(pack_uri.membername(), Self::options(CompressionMethod::Stored))?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_round_trip() {
        let mut writer = PhysPkgWriter::new();
        let pack_uri = PackURI::new("/test.txt").unwrap();
        writer.write(&pack_uri, b"Hello, World!").unwrap();
        let zip_data = writer.finish().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(zip_data)).unwrap();
        let mut content = String::new();
        archive
            .by_name("test.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "Hello, World!");
    }

    #[test]
    fn test_output_is_reproducible() {
        let build = || {
            let mut writer = PhysPkgWriter::new();
            writer.write(&PackURI::new("/a.xml").unwrap(), b"<a/>").unwrap();
            writer
                .write_stored(&PackURI::new("/media/b.png").unwrap(), b"png")
                .unwrap();
            writer.finish().unwrap()
        };
        assert_eq!(build(), build());
    }
}
