#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

/// Write `contents` to `name` inside a fresh temp dir, returning the dir
/// handle and the file path. The caller must hold onto `TempDir`.
pub fn write_temp(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

/// Build an xccov report with a single target from `(path, lineCoverage)`
/// files, each with optional `(lineNumber, lineCoverage)` functions.
pub fn xccov_json(files: &[(&str, f64, Option<&[(u32, f64)]>)]) -> String {
    let files: Vec<serde_json::Value> = files
        .iter()
        .map(|(path, cov, functions)| {
            let mut file = serde_json::json!({ "path": path, "lineCoverage": cov });
            if let Some(functions) = functions {
                file["functions"] = functions
                    .iter()
                    .map(|(line, fcov)| {
                        serde_json::json!({
                            "name": format!("f{line}()"),
                            "lineCoverage": fcov,
                            "lineNumber": line,
                            "executionCount": 1
                        })
                    })
                    .collect();
            }
            file
        })
        .collect();
    serde_json::json!({ "targets": [{ "files": files }] }).to_string()
}

/// Build an llvm-cov export from `(filename, segments)` pairs.
pub fn llvm_cov_json(files: &[(&str, &[(u32, u32, u64, bool, bool)])]) -> String {
    let files: Vec<serde_json::Value> = files
        .iter()
        .map(|(filename, segments)| {
            let segments: Vec<serde_json::Value> = segments
                .iter()
                .map(|(l, c, n, h, r)| serde_json::json!([l, c, n, h, r, false]))
                .collect();
            serde_json::json!({ "filename": filename, "segments": segments })
        })
        .collect();
    serde_json::json!({
        "type": "llvm.coverage.json.export",
        "version": "2.0.1",
        "data": [{ "files": files }]
    })
    .to_string()
}
