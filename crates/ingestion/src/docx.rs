//! DOCX text extraction
//!
//! Reads `word/document.xml` out of the ZIP container and collects the text
//! of every paragraph that is a direct child of `w:body`, one paragraph per
//! line. Paragraphs inside tables, content controls and text boxes are not
//! body paragraphs and are left out. Only `w:t` run text counts, so equation
//! text is skipped. Tabs and line breaks inside a run are kept.

use crate::errors::IngestionError;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Extract paragraph text from a DOCX file
pub fn extract_text_from_docx(path: &Path) -> Result<String, IngestionError> {
    let docx_error = |message: String| IngestionError::DocxParseError {
        path: path.display().to_string(),
        message,
    };

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| docx_error(format!("Failed to read DOCX as ZIP: {}", e)))?;

    let mut document_xml = String::new();
    {
        let mut entry = archive
            .by_name("word/document.xml")
            .map_err(|_| docx_error("missing word/document.xml".to_string()))?;
        entry.read_to_string(&mut document_xml)?;
    }

    let paragraphs = body_paragraphs(&document_xml)
        .map_err(|e| docx_error(format!("XML parse error: {}", e)))?;

    debug!(paragraphs = paragraphs.len(), "DOCX paragraphs extracted");

    Ok(paragraphs.join("\n"))
}

/// WordprocessingML main namespace
const WORDML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Elements the paragraph walker distinguishes; anything else (including
/// elements from other namespaces such as math) is `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Body,
    Paragraph,
    Hyperlink,
    Run,
    Text,
    Tab,
    Break,
    Other,
}

impl Tag {
    fn classify(ns: &ResolveResult, local_name: &[u8]) -> Self {
        if !matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == WORDML_NS) {
            return Tag::Other;
        }
        match local_name {
            b"body" => Tag::Body,
            b"p" => Tag::Paragraph,
            b"hyperlink" => Tag::Hyperlink,
            b"r" => Tag::Run,
            b"t" => Tag::Text,
            b"tab" => Tag::Tab,
            b"br" | b"cr" => Tag::Break,
            _ => Tag::Other,
        }
    }
}

/// Whether the open elements end in a run of a direct `w:body` paragraph
fn in_body_run(open: &[Tag]) -> bool {
    matches!(
        open,
        [.., Tag::Body, Tag::Paragraph, Tag::Run]
            | [.., Tag::Body, Tag::Paragraph, Tag::Hyperlink, Tag::Run]
    )
}

/// Text of each `w:p` that is a direct child of `w:body`, in document order
fn body_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = NsReader::from_str(xml);
    let mut paragraphs = Vec::new();

    let mut open: Vec<Tag> = Vec::new();
    let mut current: Option<String> = None;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) => {
                let tag = Tag::classify(&ns, e.local_name().as_ref());
                if tag == Tag::Paragraph && open.last() == Some(&Tag::Body) {
                    current = Some(String::new());
                }
                open.push(tag);
            }
            Event::Empty(e) => match Tag::classify(&ns, e.local_name().as_ref()) {
                Tag::Paragraph if open.last() == Some(&Tag::Body) => {
                    paragraphs.push(String::new());
                }
                Tag::Tab if in_body_run(&open) => {
                    if let Some(text) = current.as_mut() {
                        text.push('\t');
                    }
                }
                Tag::Break if in_body_run(&open) => {
                    if let Some(text) = current.as_mut() {
                        text.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                if let [rest @ .., Tag::Text] = open.as_slice() {
                    if in_body_run(rest) {
                        if let Some(text) = current.as_mut() {
                            text.push_str(&e.unescape()?);
                        }
                    }
                }
            }
            Event::End(_) => {
                if open.pop() == Some(Tag::Paragraph) && open.last() == Some(&Tag::Body) {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_docx;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn document(body: &str) -> String {
        format!(r#"<?xml version="1.0"?><w:document {}><w:body>{}</w:body></w:document>"#, NS, body)
    }

    #[test]
    fn test_paragraphs_one_per_line() {
        let xml = document(
            r#"<w:p><w:r><w:t>Quarterly</w:t></w:r><w:r><w:t xml:space="preserve"> report</w:t></w:r></w:p>
               <w:p/>
               <w:p><w:r><w:t>Revenue &amp; costs</w:t></w:r></w:p>"#,
        );
        let file = write_docx(&xml);
        let text = extract_text_from_docx(file.path()).unwrap();
        assert_eq!(text, "Quarterly report\n\nRevenue & costs");
    }

    #[test]
    fn test_table_paragraphs_and_tab_stops_are_skipped() {
        let xml = document(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
                 <w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C</w:t></w:r></w:p>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        let paragraphs = body_paragraphs(&xml).unwrap();
        assert_eq!(paragraphs, vec!["A\tB\nC".to_string()]);
    }

    #[test]
    fn test_content_controls_and_math_are_skipped() {
        let xml = format!(
            r#"<?xml version="1.0"?><w:document {} xmlns:m="http://schemas.openxmlformats.org/officeDocument/2006/math"><w:body>
               <w:sdt><w:sdtContent><w:p><w:r><w:t>controlled</w:t></w:r></w:p></w:sdtContent></w:sdt>
               <w:p><w:r><w:t>x = </w:t></w:r><m:oMath><m:r><m:t>y+1</m:t></m:r></m:oMath></w:p>
               <w:p><w:hyperlink><w:r><w:t>link</w:t></w:r></w:hyperlink></w:p>
               </w:body></w:document>"#,
            NS
        );
        let paragraphs = body_paragraphs(&xml).unwrap();
        assert_eq!(paragraphs, vec!["x = ".to_string(), "link".to_string()]);
    }

    #[test]
    fn test_other_namespace_with_w_prefix_is_ignored() {
        let xml = r#"<w:document xmlns:w="urn:not-wordml"><w:body><w:p><w:r><w:t>no</w:t></w:r></w:p></w:body></w:document>"#;
        assert!(body_paragraphs(xml).unwrap().is_empty());
    }

    #[test]
    fn test_missing_document_xml() {
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
        zip.start_file("other.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"<x/>").unwrap();
        zip.finish().unwrap();

        let err = extract_text_from_docx(file.path()).unwrap_err();
        assert!(err.to_string().contains("missing word/document.xml"));
    }

    #[test]
    fn test_not_a_zip() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(b"plain text pretending").unwrap();
        assert!(matches!(
            extract_text_from_docx(file.path()).unwrap_err(),
            IngestionError::DocxParseError { .. }
        ));
    }
}
