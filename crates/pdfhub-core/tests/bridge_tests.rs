//! End-to-end tests through the JSON bridge
//!
//! Each test builds real files in a temp dir, sends the same JSON the UI
//! would send, and checks the files that come out.

mod common;

use lopdf::Document;
use pdfhub_core::Bridge;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::path::Path;

fn call(bridge: &Bridge, request: Value) -> Value {
    serde_json::from_str(&bridge.handle_json(&request.to_string())).unwrap()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// ============================================
// Merge
// ============================================

#[test]
fn merge_three_and_two_pages_gives_five_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = common::write_pdf(dir.path(), "a.pdf", "A", 3);
    let b = common::write_pdf(dir.path(), "b.pdf", "B", 2);
    let out = dir.path().join("out.pdf");

    let response = call(
        &Bridge::default(),
        json!({"operation": "merge", "files": [a, b], "output": out}),
    );

    assert_eq!(response["success"], true);
    assert_eq!(response["output"], path_str(&out));
    assert_eq!(
        common::page_texts(&out),
        vec!["A-1", "A-2", "A-3", "B-1", "B-2"]
    );
}

#[test]
fn merged_pages_keep_inherited_media_box() {
    let dir = tempfile::tempdir().unwrap();
    let a = common::write_pdf(dir.path(), "a.pdf", "A", 1);
    let b = common::write_pdf(dir.path(), "b.pdf", "B", 1);
    let out = dir.path().join("out.pdf");

    call(
        &Bridge::default(),
        json!({"operation": "merge", "files": [a, b], "output": out}),
    );

    let doc = Document::load(&out).unwrap();
    for page_id in doc.get_pages().values() {
        let page = doc.get_object(*page_id).unwrap().as_dict().unwrap();
        assert!(page.has(b"MediaBox"));
    }
}

#[test]
fn merge_empty_list_fails_with_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.pdf");

    let response = call(
        &Bridge::default(),
        json!({"operation": "merge", "files": [], "output": out}),
    );

    assert_eq!(response["success"], false);
    assert_eq!(response["error_kind"], "invalid_input");
    assert!(!out.exists());
}

#[test]
fn merge_with_unreadable_input_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = common::write_pdf(dir.path(), "a.pdf", "A", 1);
    let out = dir.path().join("out.pdf");

    let response = call(
        &Bridge::default(),
        json!({"operation": "merge", "files": [a, dir.path().join("gone.pdf")], "output": out}),
    );

    assert_eq!(response["error_kind"], "file_not_found");
    assert!(!out.exists());
}

#[test]
fn merge_rerun_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = common::write_pdf(dir.path(), "a.pdf", "A", 2);
    let b = common::write_pdf(dir.path(), "b.pdf", "B", 2);
    let out = dir.path().join("out.pdf");
    let bridge = Bridge::default();
    let request = json!({"operation": "merge", "files": [a, b], "output": out});

    call(&bridge, request.clone());
    let first = std::fs::read(&out).unwrap();
    call(&bridge, request);
    let second = std::fs::read(&out).unwrap();

    assert_eq!(common::page_count(&out), 4);
    assert_eq!(first.len(), second.len());
}

// ============================================
// Split
// ============================================

#[test]
fn split_ten_pages_into_two_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let doc = common::write_pdf(dir.path(), "doc.pdf", "P", 10);
    let out_dir = dir.path().join("split");

    let response = call(
        &Bridge::default(),
        json!({"operation": "split", "file": doc, "ranges": ["1-3", "8-10"], "output_dir": out_dir}),
    );

    assert_eq!(response["success"], true);
    assert_eq!(response["message"], "Created 2 PDF files");
    let files: Vec<String> = serde_json::from_value(response["files"].clone()).unwrap();
    assert_eq!(
        files,
        vec![
            path_str(&out_dir.join("doc_part1.pdf")),
            path_str(&out_dir.join("doc_part2.pdf")),
        ]
    );
    assert_eq!(common::page_texts(Path::new(&files[0])), vec!["P-1", "P-2", "P-3"]);
    assert_eq!(common::page_texts(Path::new(&files[1])), vec!["P-8", "P-9", "P-10"]);
}

#[test]
fn split_page_past_end_is_invalid_range() {
    let dir = tempfile::tempdir().unwrap();
    let doc = common::write_pdf(dir.path(), "doc.pdf", "P", 4);

    let response = call(
        &Bridge::default(),
        json!({"operation": "split", "file": doc, "ranges": ["2-9"], "output_dir": dir.path()}),
    );

    assert_eq!(response["error_kind"], "invalid_range");
    assert!(response["error"].as_str().unwrap().contains("PDF has 4 pages"));
}

// ============================================
// Compress
// ============================================

#[test]
fn compress_keeps_page_count_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let doc = common::write_pdf(dir.path(), "doc.pdf", "C", 5);
    let out = dir.path().join("doc_compressed");

    let response = call(
        &Bridge::default(),
        json!({"operation": "compress", "file": doc, "output": out, "quality": "low"}),
    );

    assert_eq!(response["success"], true);
    let written = dir.path().join("doc_compressed.pdf");
    assert_eq!(response["output"], path_str(&written));
    assert!(response["original_size"].as_u64().unwrap() > 0);
    assert!(response["reduction_percent"].is_number());
    assert_eq!(
        common::page_texts(&written),
        vec!["C-1", "C-2", "C-3", "C-4", "C-5"]
    );
}

#[test]
fn compress_reencodes_images_from_png_pages() {
    let dir = tempfile::tempdir().unwrap();
    let png = common::write_png(dir.path(), "photo.png", 400, 400);
    let scanned = dir.path().join("scanned.pdf");
    let small = dir.path().join("small.pdf");
    let bridge = Bridge::default();

    call(
        &bridge,
        json!({"operation": "images_to_pdf", "images": [png], "output": scanned}),
    );
    let response = call(
        &bridge,
        json!({"operation": "compress", "file": scanned, "output": small, "quality": "low"}),
    );

    assert_eq!(response["success"], true);
    assert!(response["compressed_size"].as_u64().unwrap() < response["original_size"].as_u64().unwrap());

    let doc = Document::load(&small).unwrap();
    let filters: Vec<_> = doc
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|s| s.dict.get(b"Subtype").and_then(|o| o.as_name()).is_ok_and(|n| n == b"Image"))
        .map(|s| s.dict.get(b"Filter").and_then(|o| o.as_name()).unwrap().to_vec())
        .collect();
    assert_eq!(filters, vec![b"DCTDecode".to_vec()]);
}

#[test]
fn compress_rejects_non_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let fake = dir.path().join("fake.pdf");
    std::fs::write(&fake, b"plain text pretending").unwrap();

    let response = call(
        &Bridge::default(),
        json!({"operation": "compress", "file": fake, "output": dir.path().join("o.pdf")}),
    );

    assert_eq!(response["error_kind"], "unsupported_format");
}

// ============================================
// Images to PDF
// ============================================

#[test]
fn images_to_pdf_makes_one_page_per_image() {
    let dir = tempfile::tempdir().unwrap();
    let images: Vec<_> = (0..4)
        .map(|i| common::write_png(dir.path(), &format!("img{}.png", i), 10 + i, 20))
        .collect();
    let out = dir.path().join("images.pdf");

    let response = call(
        &Bridge::default(),
        json!({"operation": "images_to_pdf", "images": images, "output": out}),
    );

    assert_eq!(response["success"], true);
    assert_eq!(response["message"], "Converted 4 images to PDF");
    assert_eq!(common::page_count(&out), 4);
}

#[test]
fn images_to_pdf_empty_list_fails() {
    let dir = tempfile::tempdir().unwrap();
    let response = call(
        &Bridge::default(),
        json!({"operation": "images_to_pdf", "images": [], "output": dir.path().join("x.pdf")}),
    );
    assert_eq!(response["error_kind"], "invalid_input");
}

// ============================================
// Text
// ============================================

#[test]
fn extract_text_marks_each_page() {
    let dir = tempfile::tempdir().unwrap();
    let doc = common::write_pdf(dir.path(), "doc.pdf", "T", 2);

    let response = call(
        &Bridge::default(),
        json!({"operation": "extract_text", "file": doc}),
    );

    let text = response["text"].as_str().unwrap();
    assert!(text.starts_with("=== Page 1 ===\nT-1"));
    assert!(text.contains("=== Page 2 ===\nT-2"));
}

#[test]
fn extract_text_from_image_only_pdf_succeeds_empty() {
    let dir = tempfile::tempdir().unwrap();
    let image = common::write_png(dir.path(), "scan.png", 40, 60);
    let scan = dir.path().join("scan.pdf");
    let bridge = Bridge::default();
    call(
        &bridge,
        json!({"operation": "images_to_pdf", "images": [image], "output": scan}),
    );

    let response = call(&bridge, json!({"operation": "extract_text", "file": scan}));

    assert_eq!(response["success"], true);
    assert!(response["text"].as_str().unwrap().trim().is_empty());
}

// ============================================
// Info and saving
// ============================================

#[test]
fn pdf_info_reports_page_count() {
    let dir = tempfile::tempdir().unwrap();
    let doc = common::write_pdf(dir.path(), "doc.pdf", "I", 6);

    let response = call(&Bridge::default(), json!({"operation": "pdf_info", "file": doc}));

    assert_eq!(response["page_count"], 6);
    assert_eq!(
        response["file_size"].as_u64().unwrap(),
        std::fs::metadata(&doc).unwrap().len()
    );
}

#[test]
fn save_text_writes_txt_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("extracted");

    let response = call(
        &Bridge::default(),
        json!({"operation": "save_text", "text": "line one\nline two", "output": target}),
    );

    let written = dir.path().join("extracted.txt");
    assert_eq!(response["output"], path_str(&written));
    assert_eq!(std::fs::read_to_string(written).unwrap(), "line one\nline two");
}

// ============================================
// Property Tests - Merge page accounting
// ============================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Merged page count is always the sum of the inputs
    #[test]
    fn prop_merge_page_count_is_sum(counts in proptest::collection::vec(1usize..5, 2..5)) {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<_> = counts
            .iter()
            .enumerate()
            .map(|(i, &n)| common::write_pdf(dir.path(), &format!("{}.pdf", i), &format!("D{}", i), n))
            .collect();
        let out = dir.path().join("merged.pdf");

        let response = call(
            &Bridge::default(),
            json!({"operation": "merge", "files": files, "output": out}),
        );

        prop_assert_eq!(&response["success"], &Value::Bool(true));
        prop_assert_eq!(common::page_count(&out), counts.iter().sum::<usize>());
    }
}
