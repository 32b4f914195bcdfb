// crates/quality-gate-providers/tests/search.rs
// ============================================================================
// Module: Regex Definition Search Tests
// Description: Declaration lookup over temporary source trees.
// Purpose: Ensure lookups match declarations only and honor skip rules.
// Dependencies: quality-gate-providers, quality-gate-core, tempfile
// ============================================================================

//! ## Overview
//! Builds small source trees on disk and checks which names resolve.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::path::Path;

use quality_gate_core::DefinitionSearch;
use quality_gate_core::SearchError;
use quality_gate_providers::RegexDefinitionSearch;
use quality_gate_providers::SourceSearchConfig;
use tempfile::tempdir;

use crate::common::write_file;

fn search_over(root: &Path) -> RegexDefinitionSearch {
    RegexDefinitionSearch::new(SourceSearchConfig {
        roots: vec![root.to_path_buf()],
        ..SourceSearchConfig::default()
    })
}

#[test]
fn finds_nested_test_functions() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "app/ui.rs",
        "#[cfg(test)]\nmod tests {\n    #[test]\n    fn renders_header() {}\n}\n",
    );
    let search = search_over(dir.path());

    assert!(search.find_definition("renders_header").unwrap());
    assert!(!search.find_definition("renders").unwrap());
    assert!(!search.find_definition("renders_header_extra").unwrap());
}

#[test]
fn mentions_outside_declarations_do_not_resolve() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "lib.rs",
        "// fn only_in_comment() {}\nconst NAME: &str = \"fn only_in_string()\";\nfn \
         caller() { only_called(); }\n",
    );
    let search = search_over(dir.path());

    assert!(search.find_definition("caller").unwrap());
    assert!(!search.find_definition("only_in_comment").unwrap());
    assert!(!search.find_definition("only_in_string").unwrap());
    assert!(!search.find_definition("only_called").unwrap());
}

#[test]
fn declarations_inside_block_comments_and_multi_line_strings_do_not_resolve() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "lib.rs",
        "/*\nfn only_in_block_comment() {}\n*/\n\
         const DOC: &str = \"\n    fn only_in_string() {}\n\";\n\
         const RAW: &str = r#\"\nfn only_in_raw_string() {}\n\"#;\n\
         #[test]\nfn real_test() {}\n",
    );
    let search = search_over(dir.path());

    assert!(search.find_definition("real_test").unwrap());
    assert!(!search.find_definition("only_in_block_comment").unwrap());
    assert!(!search.find_definition("only_in_string").unwrap());
    assert!(!search.find_definition("only_in_raw_string").unwrap());
}

#[test]
fn target_and_hidden_directories_are_skipped() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "target/debug/build.rs", "fn in_target() {}\n");
    write_file(dir.path(), ".git/hook.rs", "fn in_hidden() {}\n");
    write_file(dir.path(), "visible/mod.rs", "fn visible() {}\n");
    let search = search_over(dir.path());

    assert!(search.find_definition("visible").unwrap());
    assert!(!search.find_definition("in_target").unwrap());
    assert!(!search.find_definition("in_hidden").unwrap());
}

#[test]
fn only_configured_extensions_are_read() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "notes.md", "fn documented() {}\n");
    write_file(dir.path(), "code.rs", "fn coded() {}\n");
    let search = search_over(dir.path());

    assert!(search.find_definition("coded").unwrap());
    assert!(!search.find_definition("documented").unwrap());
}

#[test]
fn oversized_files_are_ignored() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "big.rs", "fn too_big() {}\n");
    let search = RegexDefinitionSearch::new(SourceSearchConfig {
        roots: vec![dir.path().to_path_buf()],
        max_file_bytes: 4,
        ..SourceSearchConfig::default()
    });

    assert!(!search.find_definition("too_big").unwrap());
}

#[test]
fn multiple_roots_are_combined() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    write_file(first.path(), "a.rs", "fn from_first() {}\n");
    write_file(second.path(), "b.rs", "pub async fn from_second() {}\n");
    let search = RegexDefinitionSearch::new(SourceSearchConfig {
        roots: vec![first.path().to_path_buf(), second.path().to_path_buf()],
        ..SourceSearchConfig::default()
    });

    let names: Vec<&str> = search.definitions().unwrap().iter().map(String::as_str).collect();
    assert_eq!(names, vec!["from_first", "from_second"]);
}

#[test]
fn missing_root_is_reported() {
    let dir = tempdir().unwrap();
    let search = search_over(&dir.path().join("absent"));

    let err = search.find_definition("anything").unwrap_err();
    assert!(matches!(err, SearchError::SourceDirMissing(_)));
}
