//! Page-ordered text extraction using lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::detect::{sniff_bytes, sniff_file};
use crate::error::{Error, Result};

use super::options::{ErrorMode, ExtractOptions};

/// Pulls the text layer out of a PDF, one page at a time.
pub struct TextExtractor {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl TextExtractor {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_file(path)?;
        log::debug!("opening {} ({})", path.display(), header);

        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc, options })
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        let header = sniff_bytes(data)?;
        log::debug!("loading {} bytes ({})", data.len(), header);

        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc, options })
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ExtractOptions::default())
    }

    /// Load a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ExtractOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Concatenate the text of every page, in page order, with no separator.
    ///
    /// Pages without a text layer contribute nothing. In [`ErrorMode::Strict`]
    /// a page that fails to decode aborts the extraction instead.
    pub fn extract_text(&self) -> Result<String> {
        let mut text = String::new();

        for page_num in self.doc.get_pages().into_keys() {
            match self.page_text(page_num) {
                Ok(page) => text.push_str(&page),
                Err(e) if self.options.error_mode == ErrorMode::Strict => return Err(e),
                Err(e) => log::warn!("skipping text of page {}: {}", page_num, e),
            }
        }

        log::debug!(
            "extracted {} chars from {} pages",
            text.len(),
            self.page_count()
        );
        Ok(text)
    }

    /// Extract the text of a single page (1-based).
    pub fn page_text(&self, page_num: u32) -> Result<String> {
        let total = self.page_count();
        if page_num == 0 || page_num > total {
            return Err(Error::PageOutOfRange(page_num, total));
        }

        self.doc
            .extract_text(&[page_num])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get the PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_pages_concatenated_in_order() {
        let data = build_pdf(&["Policy Schedule", "Life Cover $500,000"]);
        let extractor = TextExtractor::from_bytes(&data).unwrap();

        assert_eq!(extractor.page_count(), 2);
        let text = extractor.extract_text().unwrap();
        let first = text.find("Policy Schedule").unwrap();
        let second = text.find("Life Cover $500,000").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_page_text_out_of_range() {
        let data = build_pdf(&["only page"]);
        let extractor = TextExtractor::from_bytes(&data).unwrap();

        assert!(matches!(
            extractor.page_text(0),
            Err(Error::PageOutOfRange(0, 1))
        ));
        assert!(matches!(
            extractor.page_text(2),
            Err(Error::PageOutOfRange(2, 1))
        ));
    }

    #[test]
    fn test_from_reader() {
        let data = build_pdf(&["reader text"]);
        let extractor = TextExtractor::from_reader(std::io::Cursor::new(data)).unwrap();
        assert!(extractor.extract_text().unwrap().contains("reader text"));
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let result = TextExtractor::from_bytes(b"not a pdf at all");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_rejects_truncated_pdf() {
        let result = TextExtractor::from_bytes(b"%PDF-1.4\n1 0 obj\n<<");
        assert!(result.is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let result = TextExtractor::open("/no/such/policy.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
