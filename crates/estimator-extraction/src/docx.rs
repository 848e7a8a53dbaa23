use std::io::Read;

use camino::Utf8Path;
use estimator_utils::error::ExtractionError;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::failed;

const DOCUMENT_PART: &str = "word/document.xml";

/// Body paragraphs (one per line), then table rows (cells space-joined,
/// one row per line). Paragraphs with no visible text are skipped.
pub(crate) fn extract(path: &Utf8Path) -> Result<String, ExtractionError> {
    let file = std::fs::File::open(path).map_err(|e| failed(path, e))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| failed(path, format!("not a Word (OOXML) container: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| failed(path, format!("missing {DOCUMENT_PART}")))?
        .read_to_string(&mut xml)
        .map_err(|e| failed(path, format!("failed to read {DOCUMENT_PART}: {e}")))?;

    document_text(&xml).map_err(|reason| failed(path, reason))
}

#[derive(Default)]
struct Collector {
    paragraphs: Vec<String>,
    rows: Vec<String>,
    table_depth: usize,
    in_text: bool,
    paragraph: String,
    cell: Vec<String>,
    row: Vec<String>,
}

impl Collector {
    fn start(&mut self, name: &[u8]) {
        match name {
            b"tbl" => self.table_depth += 1,
            b"tr" if self.table_depth > 0 => self.row.clear(),
            b"tc" if self.table_depth > 0 => self.cell.clear(),
            b"p" => self.paragraph.clear(),
            b"t" => self.in_text = true,
            _ => {}
        }
    }

    fn empty(&mut self, name: &[u8]) {
        match name {
            b"tab" | b"br" => self.paragraph.push(' '),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"p" => {
                let text = self.paragraph.trim().to_string();
                self.paragraph.clear();
                if text.is_empty() {
                    return;
                }
                if self.table_depth > 0 {
                    self.cell.push(text);
                } else {
                    self.paragraphs.push(text);
                }
            }
            b"tc" if self.table_depth > 0 => {
                let text = self.cell.join(" ");
                if !text.is_empty() {
                    self.row.push(text);
                }
                self.cell.clear();
            }
            b"tr" if self.table_depth > 0 => {
                if !self.row.is_empty() {
                    self.rows.push(self.row.join(" "));
                }
                self.row.clear();
            }
            b"tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            self.paragraph.push_str(text);
        }
    }

    fn finish(self) -> String {
        self.paragraphs
            .into_iter()
            .chain(self.rows)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Visible text of a `word/document.xml` part.
fn document_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut collector = Collector::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => collector.start(e.local_name().as_ref()),
            Ok(Event::Empty(e)) => collector.empty(e.local_name().as_ref()),
            Ok(Event::End(e)) => collector.end(e.local_name().as_ref()),
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| format!("invalid text in {DOCUMENT_PART}: {err}"))?;
                collector.text(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error in {DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                ));
            }
            _ => {}
        }
    }

    Ok(collector.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn write_docx(dir: &TempDir, name: &str, document_xml: Option<&str>) -> camino::Utf8PathBuf {
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        if let Some(xml) = document_xml {
            zip.start_file(DOCUMENT_PART, options).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    #[test]
    fn test_paragraphs_one_per_line() {
        let xml = wrap(
            "<w:p><w:r><w:t>Inventory </w:t></w:r><w:r><w:t>Portal</w:t></w:r></w:p>\
             <w:p></w:p>\
             <w:p><w:r><w:t>Client: Acme &amp; Sons</w:t></w:r></w:p>",
        );
        assert_eq!(
            document_text(&xml).unwrap(),
            "Inventory Portal\nClient: Acme & Sons"
        );
    }

    #[test]
    fn test_tables_follow_paragraphs() {
        let xml = wrap(
            "<w:tbl>\
               <w:tr><w:tc><w:p><w:r><w:t>Feature</w:t></w:r></w:p></w:tc>\
                     <w:tc><w:p><w:r><w:t>Priority</w:t></w:r></w:p></w:tc></w:tr>\
               <w:tr><w:tc><w:p><w:r><w:t>Login</w:t></w:r></w:p></w:tc>\
                     <w:tc><w:p/></w:tc></w:tr>\
             </w:tbl>\
             <w:p><w:r><w:t>Closing note</w:t></w:r></w:p>",
        );
        assert_eq!(
            document_text(&xml).unwrap(),
            "Closing note\nFeature Priority\nLogin"
        );
    }

    #[test]
    fn test_tabs_and_breaks_become_spaces() {
        let xml = wrap("<w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C</w:t></w:r></w:p>");
        assert_eq!(document_text(&xml).unwrap(), "A B C");
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(document_text("<w:document><w:body></w:document>").is_err());
    }

    #[test]
    fn test_extract_from_container() {
        let dir = TempDir::new().unwrap();
        let xml = wrap("<w:p><w:r><w:t>Build a booking app</w:t></w:r></w:p>");
        let path = write_docx(&dir, "spec.docx", Some(&xml));

        let doc = crate::extract_text(&path).unwrap();
        assert_eq!(doc.format, crate::DocumentFormat::Word);
        assert_eq!(doc.text, "Build a booking app");
    }

    #[test]
    fn test_container_without_document_part() {
        let dir = TempDir::new().unwrap();
        let path = write_docx(&dir, "empty.docx", None);

        let err = crate::extract_text(&path).unwrap_err();
        assert!(
            matches!(err, ExtractionError::ExtractionFailed { ref reason, .. } if reason.contains(DOCUMENT_PART))
        );
    }

    #[test]
    fn test_legacy_binary_doc_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("old.doc")).unwrap();
        std::fs::write(&path, b"\xd0\xcf\x11\xe0 legacy").unwrap();

        let err = crate::extract_text(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionFailed { .. }));
    }
}
