use matx_text::format::lexer::{CommentStripper, tokenize};
use matx_text::{FieldSchema, FieldValue, MatxError, ReaderOptions, TypeCode, Value, parse, read_file_with};
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn quoted_strings_stay_one_token() {
    let document = parse("[ Names ]\n { Index:d Name:s }\n   5 \"a value with spaces\"\n").expect("parse");
    let names = document.get("Names").expect("section");
    assert_eq!(
        names.rows,
        vec![vec![
            FieldValue::Single(Value::Integer(5)),
            FieldValue::Single(Value::String("a value with spaces".to_string())),
        ]]
    );
}

#[test]
fn tokenizer_keeps_quotes_inside_tokens() {
    assert_eq!(tokenize("  1   2.5\t\"x y\"  "), vec!["1", "2.5", "\"x y\""]);
    assert_eq!(tokenize("a\"b c\"d e"), vec!["a\"b c\"d", "e"]);
    assert!(tokenize("   ").is_empty());
}

#[test]
fn comment_stripper_respects_quotes_and_spans_lines() {
    let mut stripper = CommentStripper::new();
    assert_eq!(stripper.strip("1 \"a // b\" // tail"), "1 \"a // b\"");
    assert_eq!(stripper.strip("2 /* start"), "2");
    assert!(stripper.in_block_comment());
    assert_eq!(stripper.strip("still inside \"quoted\""), "");
    assert_eq!(stripper.strip("end */ 3"), "3");
    assert!(!stripper.in_block_comment());
    assert_eq!(stripper.strip("4/*x*/5"), "4 5");
    assert_eq!(stripper.strip("\"/* not a comment */\""), "\"/* not a comment */\"");
}

#[test]
fn multi_component_fields_become_tuples() {
    let text = "[ Vertices : 2 ]\n { Index:d Pos:fff }\n 0 1.0 2.0 3.0\n 1 -1 0.5 1e2\n";
    let document = parse(text).expect("parse");
    let vertices = document.get("Vertices").expect("section");
    assert_eq!(
        vertices.rows[1],
        vec![
            FieldValue::Single(Value::Integer(1)),
            FieldValue::Tuple(vec![Value::Float(-1.0), Value::Float(0.5), Value::Float(100.0)]),
        ]
    );
}

#[test]
fn type_characters_are_case_insensitive() {
    let fields = FieldSchema::parse_list("Id:G, Pos:Ff f:d").expect("declarations");
    assert_eq!(
        fields,
        vec![
            FieldSchema::new("Id", vec![TypeCode::Guid]),
            FieldSchema::new("Pos", vec![TypeCode::Float, TypeCode::Float]),
            FieldSchema::new("f", vec![TypeCode::Integer]),
        ]
    );
    assert_eq!(fields[1].spec(), "Pos:ff");
}

#[test]
fn uncounted_sections_skip_the_row_check() {
    let document = parse("[ Free ]\n { A:d }\n 1\n 2\n 3\n").expect("parse");
    let free = document.get("Free").expect("section");
    assert_eq!(free.declared_count, None);
    assert_eq!(free.rows.len(), 3);
}

#[test]
fn later_sections_replace_earlier_ones_with_the_same_name() {
    let text = "[ Dup ]\n { A:d }\n 1\n[ Other ]\n { B:s }\n \"x\"\n[ Dup ]\n { C:f }\n 2.5\n";
    let document = parse(text).expect("parse");
    assert_eq!(document.len(), 2);
    let dup = document.get("Dup").expect("section");
    assert_eq!(dup.fields[0].name, "C");
    assert_eq!(dup.rows, vec![vec![FieldValue::Single(Value::Float(2.5))]]);
    assert_eq!(document.names().collect::<Vec<_>>(), vec!["Dup", "Other"]);
}

#[test]
fn bracket_inside_open_quotes_does_not_open_a_section() {
    let text = "[ Notes ]\n { Text:s }\n \"one\"\n/* \"unbalanced\n[ not a header ]\n\" */\n";
    let document = parse(text).expect("parse");
    assert_eq!(document.len(), 1);
    assert!(!document.contains("not a header"));
    assert_eq!(document.get("Notes").map(|s| s.rows.len()), Some(1));
}

#[test]
fn lines_before_the_first_section_are_ignored() {
    let document = parse("// preamble\nstray words\n[ A ]\n { X:d }\n 7\n").expect("parse");
    assert_eq!(document.names().collect::<Vec<_>>(), vec!["A"]);
}

#[test]
fn row_count_mismatch_reports_both_numbers() {
    let err = parse("[ Foo : 3 ]\n { A:d }\n 1\n 2\n").unwrap_err();
    match err {
        MatxError::RowCountMismatch {
            section,
            expected,
            found,
        } => {
            assert_eq!(section, "Foo");
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn short_lines_report_field_and_counts() {
    let err = parse("[ V : 1 ]\n { Index:d Pos:fff }\n 0 1.0 2.0\n").unwrap_err();
    match err {
        MatxError::TokenCountMismatch {
            section,
            field,
            expected,
            found,
            line_number,
            line,
        } => {
            assert_eq!(section, "V");
            assert_eq!(field, "Pos");
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
            assert_eq!(line_number, 3);
            assert_eq!(line, "0 1.0 2.0");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn surplus_tokens_are_rejected() {
    let err = parse("[ V ]\n { A:d }\n 1 2\n").unwrap_err();
    assert!(matches!(err, MatxError::TrailingTokens { count: 1, .. }), "{}", err);
}

#[test]
fn unknown_type_character_names_the_field() {
    let err = parse("[ V ]\n { Index:dx }\n").unwrap_err();
    match err {
        MatxError::InvalidTypeCharacter {
            section,
            field,
            character,
        } => {
            assert_eq!(section, "V");
            assert_eq!(field, "Index");
            assert_eq!(character, 'x');
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn declaration_errors() {
    assert!(matches!(
        parse("[ V ]\n { Index Name:s }\n").unwrap_err(),
        MatxError::MissingFieldSeparator { field, .. } if field == "Index"
    ));
    assert!(matches!(
        parse("[ V ]\n { Index: }\n").unwrap_err(),
        MatxError::EmptyFieldType { field, .. } if field == "Index"
    ));
    assert!(matches!(parse("[ V ]\n { :d }\n").unwrap_err(), MatxError::EmptyFieldName { .. }));
    assert!(matches!(
        parse("[ V ]\n { A:d\n 1\n").unwrap_err(),
        MatxError::UnterminatedSchema { line_number: 2, .. }
    ));
}

#[test]
fn malformed_headers() {
    for (text, line) in [
        ("[ Foo : three ]\n", 1),
        ("// c\n[ Foo\n", 2),
        ("[ : 3 ]\n", 1),
        ("[ A : 1 : 2 ]\n", 1),
    ] {
        match parse(text).unwrap_err() {
            MatxError::MalformedHeader { line: got, .. } => assert_eq!(got, line, "{:?}", text),
            other => panic!("unexpected error for {:?}: {}", text, other),
        }
    }
}

#[test]
fn unconvertible_values_are_not_guessed() {
    let err = parse("[ V ]\n { A:d }\n 1.5\n").unwrap_err();
    match err {
        MatxError::InvalidScalar { field, token, kind, .. } => {
            assert_eq!(field, "A");
            assert_eq!(token, "1.5");
            assert_eq!(kind, TypeCode::Integer);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn failing_section_aborts_the_whole_document() {
    let text = "[ Good : 1 ]\n { A:d }\n 1\n[ Bad : 2 ]\n { A:d }\n 1\n[ Later ]\n { B:d }\n 3\n";
    assert!(matches!(parse(text), Err(MatxError::RowCountMismatch { .. })));
}

#[test]
fn file_reader_honours_encoding_and_bom() {
    let mut latin1 = tempfile::NamedTempFile::new().expect("temp file");
    latin1
        .write_all(b"[ Names ]\n { Name:s }\n \"caf\xe9\"\n")
        .expect("write");
    let options = ReaderOptions::default().with_encoding_label("windows-1252");
    let document = read_file_with(latin1.path(), options).expect("read latin-1");
    assert_eq!(
        document.get("Names").and_then(|s| s.value(0, "Name")),
        Some(&FieldValue::Single(Value::String("café".to_string())))
    );

    let mut bom = tempfile::NamedTempFile::new().expect("temp file");
    bom.write_all(b"\xef\xbb\xbf[ A ]\n { X:d }\n 1\n").expect("write");
    let document = read_file_with(bom.path(), ReaderOptions::default()).expect("read bom");
    assert!(document.contains("A"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = read_file_with(dir.path().join("absent.txt"), ReaderOptions::default()).unwrap_err();
    assert!(matches!(err, MatxError::Io(_)));
}
