//! Trace Parsing Tests.

use std::io::Write;

use cscsim_core::baseline::InstClass;
use cscsim_core::common::TraceError;
use cscsim_core::sim::TraceRecord;
use cscsim_core::sim::trace::{load_trace, parse_trace};
use pretty_assertions::assert_eq;
use rstest::rstest;

const SAMPLE: &str = r#"
# loop with a call
{"seq_no": 1, "piece": 0, "pc": 4096, "class": "cond_branch", "taken": true, "next_pc": 4032}
{"seq_no": 2, "pc": 4100, "class": "call_direct", "taken": true, "next_pc": 8192}

{"seq_no": 3, "piece": 2, "pc": 8200, "class": "return", "taken": true, "next_pc": 4104}
"#;

#[test]
fn parses_records_and_skips_comments() {
    let records = parse_trace(SAMPLE.as_bytes()).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0],
        TraceRecord {
            seq_no: 1,
            piece: 0,
            pc: 4096,
            class: InstClass::CondBranch,
            taken: true,
            next_pc: 4032,
        }
    );
    assert_eq!(records[1].piece, 0, "piece defaults to zero");
    assert_eq!(records[2].class, InstClass::Return);
}

#[test]
fn reports_line_of_malformed_record() {
    let text = "{\"seq_no\": 1, \"pc\": 1, \"class\": \"cond_branch\", \"taken\": true, \"next_pc\": 5}\nnot json\n";
    let err = parse_trace(text.as_bytes()).unwrap_err();
    assert!(matches!(err, TraceError::Parse { line: 2, .. }), "{err}");
}

#[test]
fn rejects_oversize_piece() {
    let text = r#"{"seq_no": 1, "piece": 16, "pc": 1, "class": "cond_branch", "taken": true, "next_pc": 5}"#;
    let err = parse_trace(text.as_bytes()).unwrap_err();
    assert!(matches!(err, TraceError::Piece { line: 1, piece: 16 }));
    assert_eq!(err.to_string(), "piece index 16 at line 1 out of range (must be < 16)");
}

#[rstest]
#[case::backwards(7, 0, 6, 3, "branch 6.3 at line 2 does not follow branch 7.0")]
#[case::repeated(7, 2, 7, 2, "branch 7.2 at line 2 does not follow branch 7.2")]
#[case::piece_backwards(7, 2, 7, 1, "branch 7.1 at line 2 does not follow branch 7.2")]
fn rejects_out_of_order_keys(
    #[case] first_seq: u64,
    #[case] first_piece: u8,
    #[case] second_seq: u64,
    #[case] second_piece: u8,
    #[case] message: &str,
) {
    let line = |seq: u64, piece: u8| {
        format!(r#"{{"seq_no": {seq}, "piece": {piece}, "pc": 64, "class": "cond_branch", "taken": true, "next_pc": 68}}"#)
    };
    let text = format!("{}\n{}\n", line(first_seq, first_piece), line(second_seq, second_piece));
    let err = parse_trace(text.as_bytes()).unwrap_err();
    assert!(matches!(err, TraceError::OutOfOrder { line: 2, .. }));
    assert_eq!(err.to_string(), message);
}

#[test]
fn later_pieces_of_one_instruction_are_accepted() {
    let text = concat!(
        r#"{"seq_no": 7, "piece": 0, "pc": 64, "class": "cond_branch", "taken": true, "next_pc": 68}"#,
        "\n",
        r#"{"seq_no": 7, "piece": 1, "pc": 64, "class": "uncond_direct", "taken": true, "next_pc": 128}"#,
        "\n",
    );
    assert_eq!(parse_trace(text.as_bytes()).unwrap().len(), 2);
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    let records = load_trace(file.path()).unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_trace(&dir.path().join("absent.jsonl")).unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
}
