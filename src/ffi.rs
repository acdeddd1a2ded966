//! FFI interface for C interop
//!
//! Provides C-compatible functions for extracting product records from HTML.
//! Configuration goes in and results come out as JSON strings.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use scraper::Html;
use serde::Serialize;

use crate::config::{SelectorConfig, SitePreset};
use crate::extractors::{ProductExtractor, Record};

/// Result struct returned to the caller
/// Both pointers are owned by Rust and must be freed via free_extraction_result
#[repr(C)]
pub struct ExtractionResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if extraction failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

#[derive(Serialize)]
struct ProductsPayload<'a> {
    records: &'a [Record],
}

/// Extract product records from HTML.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `selectors_json` - JSON object with `container`, `name`, `price`, `rating` (null-terminated)
///
/// # Returns
/// `{"records": [{"name": ..., "price": ..., "rating": ...}, ...]}` in json_ptr,
/// or error_ptr set when the input or the container selector is invalid
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `selectors_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_extraction_result`
#[no_mangle]
pub unsafe extern "C" fn extract_products_ffi(
    html_ptr: *const c_char,
    html_len: usize,
    selectors_json: *const c_char,
) -> ExtractionResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(msg) => return make_error_result(msg),
    };

    if selectors_json.is_null() {
        return make_error_result("Selector JSON is null");
    }
    let selectors_str = match CStr::from_ptr(selectors_json).to_str() {
        Ok(s) => s,
        Err(_) => return make_error_result("Invalid UTF-8 in selector JSON"),
    };

    let config = match SelectorConfig::from_json_str(selectors_str) {
        Ok(c) => c,
        Err(e) => return make_error_result(&format!("Failed to parse selector JSON: {}", e)),
    };

    let extractor = match ProductExtractor::new(&config) {
        Ok(x) => x,
        Err(e) => return make_error_result(&e.to_string()),
    };

    let document = Html::parse_document(html);
    let records = extractor.extract(&document);

    make_json_result(&ProductsPayload { records: &records })
}

/// Built-in site presets as a JSON array
#[no_mangle]
pub extern "C" fn site_presets_ffi() -> ExtractionResultFFI {
    make_json_result(&SitePreset::builtin())
}

/// Free an ExtractionResultFFI returned by this library
///
/// # Safety
/// - `result` must have been returned by one of this library's functions
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_extraction_result(result: ExtractionResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> Result<&'a str, &'static str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| "Invalid UTF-8 in HTML content")
}

fn make_json_result<T: Serialize + ?Sized>(value: &T) -> ExtractionResultFFI {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => ExtractionResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> ExtractionResultFFI {
    let error_cstr = CString::new(msg.replace('\0', "")).unwrap_or_default();
    ExtractionResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    unsafe fn take(result: ExtractionResultFFI) -> (Option<String>, Option<String>) {
        let json = (!result.json_ptr.is_null())
            .then(|| CStr::from_ptr(result.json_ptr).to_string_lossy().into_owned());
        let error = (!result.error_ptr.is_null())
            .then(|| CStr::from_ptr(result.error_ptr).to_string_lossy().into_owned());
        free_extraction_result(result);
        (json, error)
    }

    fn run(html: &str, selectors: &str) -> (Option<String>, Option<String>) {
        let selectors = CString::new(selectors).unwrap();
        unsafe {
            take(extract_products_ffi(
                html.as_ptr() as *const c_char,
                html.len(),
                selectors.as_ptr(),
            ))
        }
    }

    #[test]
    fn test_extract_products_ffi() {
        let html = r#"
        <div class="p"><b>Lamp</b><i>£12.00</i><u>Two</u></div>
        <div class="p"><b>Rug</b></div>
        "#;
        let (json, error) = run(
            html,
            r#"{"container": "div.p", "name": "b", "price": "i", "rating": "u"}"#,
        );

        assert!(error.is_none());
        let value: Value = serde_json::from_str(&json.unwrap()).unwrap();
        let records = value["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Lamp");
        assert_eq!(records[0]["price"], "12.00");
        assert_eq!(records[0]["rating"], "Two");
        assert_eq!(records[1]["price"], "N/A");
    }

    #[test]
    fn test_missing_selector_key_is_error() {
        let (json, error) = run("<div></div>", r#"{"container": "div"}"#);
        assert!(json.is_none());
        assert!(error.unwrap().contains("Failed to parse selector JSON"));
    }

    #[test]
    fn test_invalid_container_is_error() {
        let (json, error) = run(
            "<div></div>",
            r#"{"container": "div[", "name": "b", "price": "i", "rating": "u"}"#,
        );
        assert!(json.is_none());
        assert!(error.unwrap().contains("div["));
    }

    #[test]
    fn test_null_html_is_empty_document() {
        let selectors = CString::new(r#"{"container": "div", "name": "b", "price": "i", "rating": "u"}"#).unwrap();
        let (json, error) = unsafe { take(extract_products_ffi(ptr::null(), 0, selectors.as_ptr())) };
        assert!(error.is_none());
        assert_eq!(json.unwrap(), r#"{"records":[]}"#);
    }

    #[test]
    fn test_site_presets_ffi() {
        let (json, error) = unsafe { take(site_presets_ffi()) };
        assert!(error.is_none());
        let value: Value = serde_json::from_str(&json.unwrap()).unwrap();
        assert_eq!(value[0]["key"], "books_toscrape");
        assert_eq!(value[0]["difficulty"], "EASY");
    }
}
