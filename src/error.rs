//! Structured error types for xlbridge.
//!
//! Document decode/encode failures surface through [`XlBridgeError`]; the
//! pure codecs (units, colors, style strings) return `Option` instead so
//! callers can compose them without error handling at every step.

/// All errors that can occur while decoding or encoding a document.
#[derive(Debug, thiserror::Error)]
pub enum XlBridgeError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Invalid cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// The buffer is not a document we can load.
    #[error("Document load failed: {0}")]
    Decode(String),

    /// Document serialization failure during save.
    #[error("Document save failed: {0}")]
    Encode(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlBridgeError>;

#[cfg(target_arch = "wasm32")]
impl From<XlBridgeError> for wasm_bindgen::JsValue {
    fn from(e: XlBridgeError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
