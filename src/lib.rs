//! xlbridge - bidirectional XLSX <-> editable grid interchange
//!
//! Turns the first sheet of an xlsx document into a rectangular grid of
//! display strings plus a sparse per-cell style map, and turns an edited
//! grid back into a complete xlsx package:
//! - Cell classification (formulas, rich text, hyperlinks, dates, numbers)
//! - Style round-trip (font name/size/color, bold, italic, solid fills)
//! - Deduplicated stylesheet generation on write
//! - Session model with open supersession for async hosts
//! - DOM style application for rendered grids (WASM)
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { read_document, write_document } from 'xlbridge';
//! await init();
//! const { grid, styles } = read_document(bytes);
//! const saved = write_document(grid, styles);
//! ```

pub mod cell_ref;
pub mod color;
pub mod datetime;
pub mod error;
pub mod fonts;
pub mod reader;
pub mod session;
pub mod style_codec;
pub mod style_string;
pub mod types;
pub mod units;
pub mod writer;

#[cfg(target_arch = "wasm32")]
pub mod dom;

use wasm_bindgen::prelude::*;

pub use error::{Result, XlBridgeError};
pub use reader::{read_document as read_document_data, DocumentData};
pub use session::{DocumentSession, OpenTicket};
pub use types::*;
pub use writer::write_document as write_document_bytes;

/// Parse an xlsx document and return `{ grid, styles }` as a `JsValue`.
///
/// # Errors
/// Returns an error if the document is not a valid xlsx package.
#[wasm_bindgen]
pub fn read_document(data: &[u8]) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let document = reader::read_document(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&document)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Parse an xlsx document and return `{ grid, styles }` as a JSON string.
///
/// # Errors
/// Returns an error if the document is not a valid xlsx package.
#[wasm_bindgen]
pub fn read_document_json(data: &[u8]) -> std::result::Result<String, JsValue> {
    console_error_panic_hook::set_once();
    let document = reader::read_document(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&document)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Serialize a grid and style map back to xlsx bytes.
///
/// `grid` is an array of equal-length string arrays; `styles` maps cell
/// addresses ("A1") to style strings.
///
/// # Errors
/// Returns an error if the inputs do not deserialize or the package
/// cannot be assembled.
#[wasm_bindgen]
pub fn write_document(grid: JsValue, styles: JsValue) -> std::result::Result<Vec<u8>, JsValue> {
    console_error_panic_hook::set_once();
    let grid: Grid = serde_wasm_bindgen::from_value(grid)
        .map_err(|e| JsValue::from_str(&format!("Invalid grid: {e}")))?;
    let styles: StyleMap = serde_wasm_bindgen::from_value(styles)
        .map_err(|e| JsValue::from_str(&format!("Invalid styles: {e}")))?;

    writer::write_document(&grid, &styles).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
