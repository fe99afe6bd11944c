//! Transcoder properties over whole sources.

use lumos::parser::indent::{DEDENT_MARKER, INDENT_MARKER};
use lumos::parser::{IndentationError, Transcoder};
use rstest::rstest;

use crate::helpers::source_fixtures::*;

fn transcode(source: &str) -> String {
    Transcoder::default().transcode(source).unwrap().text
}

// =============================================================================
// IDEMPOTENCE
// =============================================================================

#[rstest]
#[case("import a/b\nconst int32 X = 1\n")]
#[case("using Meters = float64   \n\n  \nusing namespace geo\n")]
#[case("")]
fn test_flat_text_only_loses_leading_whitespace(#[case] source: &str) {
    let out = transcode(source);
    let expected: Vec<&str> = source.split('\n').map(str::trim_start).collect();
    assert_eq!(out, expected.join("\n"));
    assert!(!out.contains(INDENT_MARKER));
}

#[test]
fn test_transcoding_flat_output_again_is_a_no_op() {
    let once = transcode("import a/b   \nconst int32 X = 1\n");
    assert_eq!(transcode(&once), once);
}

// =============================================================================
// BALANCE
// =============================================================================

#[rstest]
#[case(POINT)]
#[case(SENSOR)]
#[case("struct A\n    int32 x\n        unit: \"m\"\n            deep: 1\n")]
#[case("enum E\n    A\n\n\nstruct S\n    bool b")]
fn test_markers_are_balanced(#[case] source: &str) {
    let out = Transcoder::default().transcode(source).unwrap();
    assert_eq!(out.indent_count(), out.dedent_count());
    assert!(out.indent_count() > 0);

    // Every prefix has at least as many INDENTs as DEDENTs.
    let mut depth = 0i32;
    for line in out.text.lines() {
        if line == INDENT_MARKER {
            depth += 1;
        } else if line == DEDENT_MARKER {
            depth -= 1;
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);
}

#[test]
fn test_dedent_to_unknown_level_fails() {
    let err = Transcoder::default()
        .transcode("struct A\n        int32 x\n    int32 y\n")
        .unwrap_err();
    assert_eq!(err, IndentationError { line: 3, width: 4 });
}

// =============================================================================
// TRIPLE-QUOTE OPACITY
// =============================================================================

#[test]
fn test_open_triple_quote_lines_are_copied_byte_for_byte() {
    let out = transcode(SENSOR);
    assert!(out.contains("description: \"\"\"Raw samples,\n   oldest first\"\"\""));
}

#[test]
fn test_indentation_inside_string_does_not_open_blocks() {
    let source = "struct Doc\n    string s\n        text: \"\"\"a\n                b\n  c\n\"\"\"\n    string t\n";
    let out = Transcoder::default().transcode(source).unwrap();
    assert_eq!(out.indent_count(), 2);
    assert!(out.text.contains("\n                b\n  c\n\"\"\"\n<DEDENT>\nstring t"));
}
