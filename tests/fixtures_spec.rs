use matx_text::{FieldValue, Guid, TextWriter, TypeCode, Value, parse, read_file};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(parts: &[&str]) -> PathBuf {
    let mut path = Path::new(env!("CARGO_MANIFEST_DIR")).to_path_buf();
    for part in parts {
        path.push(part);
    }
    path
}

fn sample() -> matx_text::Document {
    read_file(fixture_path(&["tests", "fixtures", "sample.txt"])).expect("open sample fixture")
}

fn single(value: &FieldValue) -> &Value {
    value.as_single().expect("single-component field")
}

#[test]
fn sample_sections_keep_document_order() {
    let document = sample();
    let names: Vec<&str> = document.names().collect();
    assert_eq!(
        names,
        vec!["MatxVersion", "UserInfo", "Hierarchy", "Materials", "Offsets", "FacetIndex"]
    );
    assert_eq!(document.format_version(), Some(2));
}

#[test]
fn sample_hierarchy_decodes_strings_with_comment_markers() {
    let document = sample();
    let hierarchy = document.get("Hierarchy").expect("Hierarchy section");

    assert_eq!(hierarchy.declared_count, Some(3));
    let specs: Vec<String> = hierarchy.fields.iter().map(|f| f.spec()).collect();
    assert_eq!(specs, vec!["Index:d", "Name:s", "nChildren:d", "iParent:d", "Pos:fff"]);

    let names: Vec<&str> = hierarchy
        .column("Name")
        .map(|v| single(v).as_str().expect("string"))
        .collect();
    assert_eq!(names, vec!["Root Bone", "Arm // left", "[Leg]"]);

    assert_eq!(hierarchy.value(0, "iParent"), Some(&FieldValue::Single(Value::Integer(-1))));
    assert_eq!(
        hierarchy.value(1, "Pos"),
        Some(&FieldValue::Tuple(vec![
            Value::Float(0.333333),
            Value::Float(-2.0),
            Value::Float(10.5)
        ]))
    );
}

#[test]
fn sample_materials_multiline_schema_and_block_comments() {
    let document = sample();
    let materials = document.get("Materials").expect("Materials section");

    let names: Vec<&str> = materials.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Index", "Name", "TwoSided"]);
    assert_eq!(materials.rows.len(), 2);
    assert_eq!(
        materials.value(0, "Name"),
        Some(&FieldValue::Single(Value::String("Metal /* shiny */".to_string())))
    );
    assert_eq!(materials.value(1, "TwoSided"), Some(&FieldValue::Single(Value::Integer(0))));
}

#[test]
fn sample_offsets_keep_negative_first_column_and_raw_guids() {
    let document = sample();
    let offsets = document.get("Offsets").expect("Offsets section");

    let deltas: Vec<i64> = offsets
        .column("Delta")
        .map(|v| single(v).as_i64().expect("integer"))
        .collect();
    assert_eq!(deltas, vec![-3, 5]);

    assert_eq!(offsets.field("Id").map(|f| f.components.clone()), Some(vec![TypeCode::Guid]));
    let guid = single(offsets.value(0, "Id").expect("Id value"))
        .as_guid()
        .expect("guid");
    assert_eq!(guid, &Guid::Text("\"01234567:89ABCDEF\"".to_string()));
    assert_eq!(guid.split_packed(), Some(0x0123_4567_89AB_CDEF));
}

#[test]
fn sample_empty_section_has_no_fields_or_rows() {
    let document = sample();
    let facets = document.get("FacetIndex").expect("FacetIndex section");
    assert_eq!(facets.declared_count, Some(0));
    assert!(facets.fields.is_empty());
    assert!(facets.rows.is_empty());
}

#[test]
fn sample_normalizes_to_a_stable_document() {
    let source = fs::read_to_string(fixture_path(&["tests", "fixtures", "sample.txt"])).expect("read fixture");
    let original = parse(&source).expect("parse fixture");

    let mut writer = TextWriter::new(Vec::new());
    for section in &original {
        writer.write_section(section).expect("re-encode section");
    }
    let first = String::from_utf8(writer.finish().expect("finish")).expect("utf-8");

    let reparsed = parse(&first).expect("parse normalized copy");
    for section in &original {
        let again = reparsed.get(&section.name).expect("section survives");
        if section.rows.is_empty() {
            assert!(again.rows.is_empty());
        } else {
            assert_eq!(section, again);
        }
    }

    let mut writer = TextWriter::new(Vec::new());
    for section in &reparsed {
        writer.write_section(section).expect("re-encode again");
    }
    let second = String::from_utf8(writer.finish().expect("finish")).expect("utf-8");
    assert_eq!(first, second);
}
