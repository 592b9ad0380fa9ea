//! Checks the committed `generated.rs` against a fresh generation run, and
//! the generator's failure modes.

use std::fs;

use pretty_assertions::assert_eq;
use quote::ToTokens;
use wrapper_gen::{GenError, Paths};

fn tokens_of(path: &std::path::Path) -> String {
    let source = fs::read_to_string(path).unwrap();
    syn::parse_file(&source).unwrap().to_token_stream().to_string()
}

#[test]
fn test_wrapped_methods_of_db_session() {
    let names: Vec<String> = wrapper_gen::wrapped_methods(&Paths::workspace())
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();

    assert_eq!(
        names,
        vec![
            "table",
            "select",
            "where_clause",
            "and",
            "or",
            "not_in",
            "id",
            "asc",
            "desc",
            "order_by",
            "group_by",
            "having",
            "limit",
        ]
    );
}

#[test]
fn test_committed_file_matches_fresh_output() {
    let committed = Paths::workspace();
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths {
        output: dir.path().join("generated.rs"),
        ..committed.clone()
    };

    let count = wrapper_gen::generate(&paths).unwrap();
    assert_eq!(count, 13);

    let fresh = fs::read_to_string(&paths.output).unwrap();
    assert!(fresh.starts_with(wrapper_gen::emit::BANNER));
    assert_eq!(tokens_of(&paths.output), tokens_of(&committed.output));
}

#[test]
fn test_committed_file_fits_line_width() {
    let committed = fs::read_to_string(Paths::workspace().output).unwrap();
    for (i, line) in committed.lines().enumerate() {
        assert!(line.len() <= 100, "line {} is {} columns", i + 1, line.len());
    }
}

#[test]
fn test_generate_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths {
        output: dir.path().join("generated.rs"),
        ..Paths::workspace()
    };
    fs::write(&paths.output, "stale content that is much longer than nothing").unwrap();

    wrapper_gen::generate(&paths).unwrap();
    let output = fs::read_to_string(&paths.output).unwrap();
    assert!(!output.contains("stale content"));
}

#[test]
fn test_errors_name_the_failing_file() {
    let dir = tempfile::tempdir().unwrap();

    let missing = Paths {
        session_source: dir.path().join("missing.rs"),
        ..Paths::workspace()
    };
    let err = wrapper_gen::generate(&missing).unwrap_err();
    assert!(matches!(err, GenError::Read { .. }));
    assert!(err.to_string().contains("missing.rs"));

    let broken_path = dir.path().join("broken.rs");
    fs::write(&broken_path, "impl DbSession { pub fn }").unwrap();
    let broken = Paths {
        session_source: broken_path,
        ..Paths::workspace()
    };
    let err = wrapper_gen::generate(&broken).unwrap_err();
    assert!(matches!(err, GenError::Parse { .. }));

    let unwritable = Paths {
        output: dir.path().join("no_such_dir").join("generated.rs"),
        ..Paths::workspace()
    };
    let err = wrapper_gen::generate(&unwritable).unwrap_err();
    assert!(matches!(err, GenError::Write { .. }));
}
