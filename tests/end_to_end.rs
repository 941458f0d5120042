//! Rows in, ReqIF file out.

#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use quick_xml::{Reader, events::Event};
use reqif::{
    Document, SchemaCatalog, encode,
    domain::Prefixes,
    import::{Row, Sheets, Warning, map_rows},
    write_document,
};
use tempfile::TempDir;

fn document() -> Document {
    Document::with_timestamp(
        "Braking System",
        Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
    )
}

fn sheets() -> Sheets {
    Sheets {
        requirements: vec![
            Row::new()
                .with("IE PUID", "REQ-1")
                .with("Type", "Functional")
                .with("Name", "Stop")
                .with("Text", "The vehicle shall stop.\n\n- on dry roads\n- on wet roads")
                .with("Status", "reviewed")
                .with("Priority", "high"),
            Row::new()
                .with("IE PUID", "REQ-2")
                .with("Type", "interface")
                .with("Name", "Pedal")
                .with("Description", "Pedal & sensor"),
        ],
        relations: vec![
            Row::new()
                .with("Relation Type", "satisfy")
                .with("Source IE PUID", "REQ-2")
                .with("Target IE PUID", "REQ-1"),
            Row::new()
                .with("Relation Type", "satisfy")
                .with("Source IE PUID", "REQ-2")
                .with("Target IE PUID", "REQ-9"),
        ],
    }
}

/// Parses `xml`, failing on anything that is not well formed, and returns the
/// slash-separated path and unescaped text of every element.
fn elements(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut elements: Vec<(String, String)> = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(start) => {
                for attribute in start.attributes() {
                    attribute.unwrap().decode_and_unescape_value(&reader).unwrap();
                }
                path.push(String::from_utf8(start.name().as_ref().to_vec()).unwrap());
                open.push(elements.len());
                elements.push((path.join("/"), String::new()));
            }
            Event::Empty(empty) => {
                let name = String::from_utf8(empty.name().as_ref().to_vec()).unwrap();
                elements.push((format!("{}/{name}", path.join("/")), String::new()));
            }
            Event::Text(text) => {
                let text = text.unescape().unwrap();
                if let Some(&index) = open.last() {
                    elements[index].1.push_str(&text);
                }
            }
            Event::End(_) => {
                path.pop();
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }
    assert!(path.is_empty(), "unclosed elements: {path:?}");
    elements
}

fn texts<'a>(elements: &'a [(String, String)], suffix: &str) -> Vec<&'a str> {
    elements
        .iter()
        .filter(|(path, _)| path.ends_with(suffix))
        .map(|(_, text)| text.as_str())
        .collect()
}

#[test]
fn workbook_rows_become_a_reqif_file() {
    let mut document = document();
    let report = map_rows(&mut document, &sheets(), &Prefixes::default());

    assert_eq!(report.requirements_added, 2);
    assert_eq!(report.relations_added, 1);
    assert_eq!(
        report.warnings,
        [Warning::UnresolvedReference {
            row: 2,
            source_key: "REQ-2".into(),
            target_key: "REQ-9".into(),
        }]
    );

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("braking.reqif");
    write_document(&path, &encode(&document, &SchemaCatalog::standard())).unwrap();
    let xml = std::fs::read_to_string(&path).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<REQ-IF "));
    assert!(xml.contains("<CREATION-TIME>2024-05-06T07:08:09Z</CREATION-TIME>"));
    assert!(xml.contains("<TITLE>Braking System</TITLE>"));
    assert!(xml.contains("<SPEC-OBJECT IDENTIFIER=\"SO-F-001\""));
    assert!(xml.contains("<SPEC-OBJECT IDENTIFIER=\"SO-I-002\""));
    assert_eq!(xml.matches("<SPEC-RELATION IDENTIFIER=").count(), 1);
    assert!(xml.contains("<SPEC-RELATION IDENTIFIER=\"SR-001\""));
    assert!(xml.contains("<xhtml:p>The vehicle shall stop.</xhtml:p>"));
    assert!(xml.contains("<xhtml:li>on wet roads</xhtml:li>"));
    assert!(xml.contains("<xhtml:p>Pedal &amp; sensor</xhtml:p>"));
    assert!(xml.contains("This module contains system-level requirements for Braking System."));
    assert!(xml.contains("<SPEC-HIERARCHY IDENTIFIER=\"SH-002\""));
    assert!(xml.trim_end().ends_with("</REQ-IF>"));

    let elements = elements(&xml);
    assert_eq!(
        texts(&elements, "SPEC-OBJECTS/SPEC-OBJECT").len(),
        2
    );
    assert_eq!(
        texts(&elements, "SPEC-RELATIONS/SPEC-RELATION").len(),
        1
    );
    assert_eq!(
        texts(&elements, "SPEC-RELATION/SOURCE/SPEC-OBJECT-REF"),
        ["SO-I-002"]
    );
    assert_eq!(
        texts(&elements, "SPEC-RELATION/TARGET/SPEC-OBJECT-REF"),
        ["SO-F-001"]
    );
    assert_eq!(
        texts(&elements, "SPEC-HIERARCHY/OBJECT/SPEC-OBJECT-REF"),
        ["SO-F-001", "SO-I-002"]
    );
}

#[test]
fn conversion_is_deterministic() {
    let build = || {
        let mut document = document();
        map_rows(&mut document, &sheets(), &Prefixes::default());
        encode(&document, &SchemaCatalog::standard())
    };

    assert_eq!(build(), build());
}

#[test]
fn every_object_carries_nine_values() {
    let mut document = document();
    map_rows(&mut document, &sheets(), &Prefixes::default());
    let xml = String::from_utf8(encode(&document, &SchemaCatalog::standard())).unwrap();

    let objects = xml
        .split("<SPEC-OBJECT ")
        .skip(1)
        .map(|object| object.split("</SPEC-OBJECT>").next().unwrap());

    for object in objects {
        let values = object.matches("<ATTRIBUTE-VALUE-").count();
        assert_eq!(values, 9);
    }
}
