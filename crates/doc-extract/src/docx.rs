//! DOCX text extraction
//!
//! A DOCX file is a zip archive; the body lives in `word/document.xml`.
//! Text runs (`w:t`) are concatenated, `w:tab` becomes a tab, `w:br`/`w:cr`
//! and the end of each paragraph (`w:p`) become newlines. Tab stops declared
//! in paragraph properties (`w:tabs/w:tab`) are not content and are skipped.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| match e {
        ZipError::UnsupportedArchive(msg) if msg.to_lowercase().contains("password") => {
            ExtractError::PasswordProtected
        }
        other => ExtractError::Extraction(format!("not a DOCX archive: {}", other)),
    })?;

    let mut xml = Vec::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Extraction(format!("{}: {}", DOCUMENT_PART, e)))?
        .read_to_end(&mut xml)
        .map_err(|e| ExtractError::Extraction(format!("{}: {}", DOCUMENT_PART, e)))?;

    document_text(&xml)
}

fn document_text(xml: &[u8]) -> Result<String, ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text_run = false;
    let mut in_tab_stops = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"tabs" => in_tab_stops = true,
                b"tab" if !in_tab_stops => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if !in_tab_stops => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"tabs" => in_tab_stops = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Extraction(format!("bad XML text: {}", e)))?;
                out.push_str(&text);
            }
            Ok(Event::CData(t)) if in_text_run => {
                out.push_str(&String::from_utf8_lossy(&t));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Extraction(format!(
                    "malformed {} at byte {}: {}",
                    DOCUMENT_PART,
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}
