//! Signature detection for PDF documents
//!
//! Walks a document's object table and reports whether any object is a
//! signature dictionary (`/Type /Sig`), together with the signer's declared
//! `/Name`. Only the presence of the dictionary is checked; the signature
//! itself is never validated.

use crate::error::ScanError;
use lopdf::{Dictionary, Document, Object};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Signer label for documents without a signature object
pub const NOT_SIGNED: &str = "N/A";

/// Signer label for signature objects without a usable `/Name`
pub const UNKNOWN_SIGNER: &str = "unknown signer";

/// Outcome of scanning one document.
///
/// Persisted as a two-element `[is_signed, signer]` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(bool, String)", into = "(bool, String)")]
pub struct DetectionResult {
    pub is_signed: bool,
    pub signer: String,
}

impl DetectionResult {
    pub fn unsigned() -> Self {
        Self {
            is_signed: false,
            signer: NOT_SIGNED.to_string(),
        }
    }

    /// A signed result. Missing or blank names become [`UNKNOWN_SIGNER`].
    pub fn signed(signer: Option<&str>) -> Self {
        let signer = signer
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_SIGNER);
        Self {
            is_signed: true,
            signer: signer.to_string(),
        }
    }

    /// "Yes"/"No", the label used for display and for sorting by signed state
    pub fn signed_label(&self) -> &'static str {
        if self.is_signed {
            "Yes"
        } else {
            "No"
        }
    }
}

impl From<(bool, String)> for DetectionResult {
    fn from((is_signed, signer): (bool, String)) -> Self {
        Self { is_signed, signer }
    }
}

impl From<DetectionResult> for (bool, String) {
    fn from(result: DetectionResult) -> Self {
        (result.is_signed, result.signer)
    }
}

/// How an object is recognised as a signature dictionary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Inspect the parsed dictionary: `/Type` must be the name `/Sig` and
    /// `/Name` must be a string object.
    #[default]
    Structured,
    /// Plain substring search over each object's serialized text.
    ///
    /// A `/Type /Sig` sequence inside any string value (annotation contents,
    /// metadata) is reported as a signature.
    Marker,
}

const SIG_MARKER: &str = "/Type /Sig";
const NAME_MARKER: &str = " /Name";
const NAME_OPEN: &str = "/Name (";

/// Document object scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner {
    mode: DetectionMode,
}

impl Scanner {
    pub fn new(mode: DetectionMode) -> Self {
        Self { mode }
    }

    /// Detect a signature in the document at `path`.
    ///
    /// Never fails: documents that cannot be opened or parsed are reported as
    /// unsigned.
    pub fn scan(&self, path: &Path) -> DetectionResult {
        match self.inspect(path) {
            Ok(result) => result,
            Err(e) => {
                warn!(path = %e.path().display(), error = %e, "treating unreadable document as unsigned");
                DetectionResult::unsigned()
            }
        }
    }

    /// Fallible core of [`Scanner::scan`].
    pub fn inspect(&self, path: &Path) -> Result<DetectionResult, ScanError> {
        let document = load_document(path)?;

        // BTreeMap keys keep the object table in ascending object-number order
        for (id, object) in &document.objects {
            let found = match self.mode {
                DetectionMode::Structured => match_structured(object),
                DetectionMode::Marker => match_marker(&object_text(object)),
            };

            if let Some(result) = found {
                debug!(path = %path.display(), object = id.0, signer = %result.signer, "signature object found");
                return Ok(result);
            }
        }

        debug!(path = %path.display(), objects = document.objects.len(), "no signature object");
        Ok(DetectionResult::unsigned())
    }
}

/// Scan with the default (structured) strategy
pub fn scan(path: &Path) -> DetectionResult {
    Scanner::default().scan(path)
}

/// Read the whole document and release the file before returning
fn load_document(path: &Path) -> Result<Document, ScanError> {
    let file = File::open(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Document::load_from(file).map_err(|source| ScanError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn dictionary_of(object: &Object) -> Option<&Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

fn match_structured(object: &Object) -> Option<DetectionResult> {
    let dict = dictionary_of(object)?;

    let is_sig = matches!(dict.get(b"Type").and_then(Object::as_name), Ok(name) if name == b"Sig");
    if !is_sig {
        return None;
    }

    let signer = match dict.get(b"Name") {
        Ok(Object::String(bytes, _)) => Some(decode_text(bytes)),
        _ => None,
    };
    Some(DetectionResult::signed(signer.as_deref()))
}

fn match_marker(text: &str) -> Option<DetectionResult> {
    if !text.contains(SIG_MARKER) {
        return None;
    }

    let signer = if text.contains(NAME_MARKER) {
        text.split_once(NAME_OPEN)
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(name, _)| name)
    } else {
        None
    };
    Some(DetectionResult::signed(signer))
}

/// Decode a PDF text string.
///
/// UTF-16BE when it carries the `FE FF` byte order mark, otherwise UTF-8 with
/// a Windows-1252 fallback (close enough to PDFDocEncoding for names).
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let (text, _) = encoding_rs::UTF_16BE.decode_without_bom_handling(utf16);
        return text.into_owned();
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

/// Serialize an object to PDF-like text, e.g. `<< /Type /Sig /Name (Alice) >>`.
pub fn object_text(object: &Object) -> String {
    let mut out = String::new();
    write_object(object, &mut out);
    out
}

fn write_object(object: &Object, out: &mut String) {
    match object {
        Object::Null => out.push_str("null"),
        Object::Boolean(value) => out.push_str(if *value { "true" } else { "false" }),
        Object::Integer(value) => out.push_str(&value.to_string()),
        Object::Real(value) => out.push_str(&value.to_string()),
        Object::Name(name) => {
            out.push('/');
            out.push_str(&String::from_utf8_lossy(name));
        }
        Object::String(bytes, _) => {
            out.push('(');
            out.push_str(&decode_text(bytes));
            out.push(')');
        }
        Object::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_object(item, out);
            }
            out.push(']');
        }
        Object::Dictionary(dict) => write_dictionary(dict, out),
        Object::Stream(stream) => {
            write_dictionary(&stream.dict, out);
            out.push_str(" stream");
        }
        Object::Reference((number, generation)) => {
            out.push_str(&format!("{} {} R", number, generation));
        }
    }
}

fn write_dictionary(dict: &Dictionary, out: &mut String) {
    out.push_str("<<");
    for (key, value) in dict.iter() {
        out.push_str(" /");
        out.push_str(&String::from_utf8_lossy(key));
        out.push(' ');
        write_object(value, out);
    }
    out.push_str(" >>");
}
