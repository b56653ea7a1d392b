//! C FFI bindings for postmerge-core
//!
//! A UI written in another language hands over the selected files as JSON
//! and receives the merged rows back as JSON.
//!
//! File list format: `[{"name": "2024-01-01.txt", "content": "..."}]`
//! Row list format: `[{"identifier": "...", "url": "...", "caption": "..."}]`

use postmerge_core::{
    default_file_name, export_xlsx, merge, read_file_sets, ExportFormat, ExportOptions, Row,
    SourceFile, Table,
};
use serde::Deserialize;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

/// Export succeeded
pub const PM_OK: i32 = 0;
/// Null pointer, invalid UTF-8 or malformed JSON argument
pub const PM_ERR_INPUT: i32 = -1;
/// Nothing to export
pub const PM_ERR_EMPTY: i32 = -2;
/// Workbook could not be written
pub const PM_ERR_EXPORT: i32 = -3;

#[derive(Debug, Deserialize)]
struct FfiFile {
    name: String,
    content: String,
}

unsafe fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

fn parse_files(json: &str) -> Option<Vec<SourceFile>> {
    let files: Vec<FfiFile> = serde_json::from_str(json).ok()?;
    Some(
        files
            .into_iter()
            .map(|f| SourceFile::from_bytes(f.name, f.content))
            .collect(),
    )
}

fn merge_files(urls: &[SourceFile], captions: &[SourceFile]) -> postmerge_core::Result<Table> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let (url_map, caption_map) = runtime.block_on(read_file_sets(urls, captions))?;
    Ok(merge(&url_map, &caption_map))
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Merge URL and caption files into a JSON row list
///
/// # Safety
/// - `urls_json` and `captions_json` must be valid C strings holding JSON file lists
/// - Returns null on error
/// - Caller must free the returned string with `pm_free_string`
#[no_mangle]
pub unsafe extern "C" fn pm_merge_json(
    urls_json: *const c_char,
    captions_json: *const c_char,
) -> *mut c_char {
    let (Some(urls), Some(captions)) = (str_arg(urls_json), str_arg(captions_json)) else {
        return ptr::null_mut();
    };

    let (Some(urls), Some(captions)) = (parse_files(urls), parse_files(captions)) else {
        return ptr::null_mut();
    };

    let table = match merge_files(&urls, &captions) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(error = %e, "merge failed");
            return ptr::null_mut();
        }
    };

    match serde_json::to_string(&table) {
        Ok(json) => into_c_string(json),
        Err(_) => ptr::null_mut(),
    }
}

/// Export a JSON row list to an xlsx workbook with the default options
///
/// # Safety
/// - `rows_json` must be a valid C string holding a JSON row list
/// - `path` must be a valid C string
/// - Returns `PM_OK` or one of the `PM_ERR_*` codes
#[no_mangle]
pub unsafe extern "C" fn pm_export_xlsx(rows_json: *const c_char, path: *const c_char) -> i32 {
    let (Some(rows_json), Some(path)) = (str_arg(rows_json), str_arg(path)) else {
        return PM_ERR_INPUT;
    };

    let rows: Vec<Row> = match serde_json::from_str(rows_json) {
        Ok(rows) => rows,
        Err(_) => return PM_ERR_INPUT,
    };

    let table = Table::from_rows(rows);
    if table.is_empty() {
        return PM_ERR_EMPTY;
    }

    match export_xlsx(&table, path, &ExportOptions::default()) {
        Ok(()) => PM_OK,
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            PM_ERR_EXPORT
        }
    }
}

/// Get today's default export file name (e.g. "postingan_2024-01-31.xlsx")
///
/// Caller must free the returned string with `pm_free_string`
#[no_mangle]
pub extern "C" fn pm_export_file_name() -> *mut c_char {
    into_c_string(default_file_name(
        &ExportOptions::default(),
        ExportFormat::Xlsx,
    ))
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a pm_* function or null
#[no_mangle]
pub unsafe extern "C" fn pm_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take_string(s: *mut c_char) -> String {
        assert!(!s.is_null());
        let out = CStr::from_ptr(s).to_str().unwrap().to_string();
        pm_free_string(s);
        out
    }

    #[test]
    fn test_merge_json() {
        let urls =
            CString::new(r#"[{"name":"b.txt","content":"u2"},{"name":"a.txt","content":" u1 "}]"#)
                .unwrap();
        let captions = CString::new(r#"[{"name":"a.txt","content":"hello"}]"#).unwrap();

        let json = unsafe { take_string(pm_merge_json(urls.as_ptr(), captions.as_ptr())) };
        let rows: Vec<Row> = serde_json::from_str(&json).unwrap();

        assert_eq!(
            rows,
            vec![Row::new("a", "u1", "hello"), Row::new("b", "u2", "-")]
        );
    }

    #[test]
    fn test_merge_json_rejects_bad_input() {
        let bad = CString::new("not json").unwrap();
        let empty = CString::new("[]").unwrap();

        unsafe {
            assert!(pm_merge_json(bad.as_ptr(), empty.as_ptr()).is_null());
            assert!(pm_merge_json(ptr::null(), empty.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_export_empty_rows() {
        let rows = CString::new("[]").unwrap();
        let path = CString::new("unused.xlsx").unwrap();

        let code = unsafe { pm_export_xlsx(rows.as_ptr(), path.as_ptr()) };
        assert_eq!(code, PM_ERR_EMPTY);
    }

    #[test]
    fn test_export_file_name() {
        let name = unsafe { take_string(pm_export_file_name()) };
        assert!(name.starts_with("postingan_"));
        assert!(name.ends_with(".xlsx"));
    }
}
