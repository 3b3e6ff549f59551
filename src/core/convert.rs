//! JSON ⇄ XML conversion for metadata records.
//!
//! Serialization emits a declaration, indents with four spaces and writes
//! root attributes double-quoted. Parsing maps text-only elements to
//! strings, elements with children to objects and repeated siblings to
//! arrays. Only the root element's attributes are kept.
//!
//! Text is kept verbatim. Whitespace between child elements is layout and
//! is discarded. An empty object and an empty string both become an empty
//! element, which reads back as `""`; an empty list writes nothing.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::metadata::{scalar_to_string, MetadataRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: String,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: "UTF-8".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// `None` omits the `<?xml ...?>` line.
    pub declaration: Option<XmlDeclaration>,
    /// Spaces per nesting level; `None` writes everything on one line.
    pub indent: Option<usize>,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            declaration: Some(XmlDeclaration::default()),
            indent: Some(4),
        }
    }
}

// ============================================================================
// Serialization
// ============================================================================

pub fn to_xml(record: &MetadataRecord, root: &str, options: &XmlOptions) -> Result<String> {
    let buffer = Cursor::new(Vec::new());
    let mut writer = match options.indent {
        Some(width) => Writer::new_with_indent(buffer, b' ', width),
        None => Writer::new(buffer),
    };

    if let Some(decl) = &options.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                Some(&decl.encoding),
                None,
            )))
            .map_err(|e| Error::xml_write(e.to_string(), Some("write declaration".to_string())))?;
    }

    let mut start = BytesStart::new(root);
    for (key, value) in &record.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    write(&mut writer, Event::Start(start), root)?;
    write_fields(&mut writer, &record.fields)?;
    write(&mut writer, Event::End(BytesEnd::new(root)), root)?;

    let bytes = writer.into_inner().into_inner();
    let mut xml = String::from_utf8(bytes)
        .map_err(|e| Error::xml_write(e.to_string(), Some("encode document".to_string())))?;
    xml.push('\n');
    Ok(xml)
}

/// Serialize the JSON form of a record, treating a top-level `$` key as the
/// root element's attributes.
pub fn json_to_xml(value: &Value, root: &str, options: &XmlOptions) -> Result<String> {
    let record = MetadataRecord::from_json(value.clone())?;
    to_xml(&record, root, options)
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>, element: &str) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::xml_write(e.to_string(), Some(format!("element <{}>", element))))
}

fn write_fields(writer: &mut Writer<Cursor<Vec<u8>>>, fields: &Map<String, Value>) -> Result<()> {
    for (name, value) in fields {
        write_element(writer, name, value)?;
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Value::Object(children) if children.is_empty() => {
            write(writer, Event::Empty(BytesStart::new(name)), name)
        }
        Value::Object(children) => {
            write(writer, Event::Start(BytesStart::new(name)), name)?;
            write_fields(writer, children)?;
            write(writer, Event::End(BytesEnd::new(name)), name)
        }
        scalar => {
            let text = scalar_to_string(scalar).unwrap_or_default();
            if text.is_empty() {
                return write(writer, Event::Empty(BytesStart::new(name)), name);
            }
            write(writer, Event::Start(BytesStart::new(name)), name)?;
            write(writer, Event::Text(BytesText::new(&text)), name)?;
            write(writer, Event::End(BytesEnd::new(name)), name)
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.children)
        }
    }
}

fn insert_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

fn element_name(raw: &[u8], position: u64) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| Error::xml_parse(e.to_string(), Some(format!("element name at byte {}", position))))
}

pub fn from_xml(xml: &str, root: &str) -> Result<MetadataRecord> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Frame> = Vec::new();
    let mut attributes = std::collections::BTreeMap::new();
    let mut finished: Option<Frame> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| Error::xml_parse(e.to_string(), Some(format!("byte {}", position))))?;

        match event {
            Event::Start(start) | Event::Empty(start) if finished.is_some() => {
                let name = element_name(start.name().as_ref(), position)?;
                return Err(Error::xml_parse(
                    format!("unexpected element <{}> after the root element", name),
                    Some(format!("byte {}", position)),
                ));
            }
            Event::Start(start) => {
                let name = element_name(start.name().as_ref(), position)?;
                if stack.is_empty() {
                    check_root(&name, root)?;
                    read_attributes(&start, &mut attributes, position)?;
                }
                stack.push(Frame::new(name));
            }
            Event::Empty(start) => {
                let name = element_name(start.name().as_ref(), position)?;
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.children, name, Value::String(String::new())),
                    None => {
                        check_root(&name, root)?;
                        read_attributes(&start, &mut attributes, position)?;
                        finished = Some(Frame::new(name));
                    }
                }
            }
            Event::Text(text) => {
                let unescaped = text
                    .unescape()
                    .map_err(|e| Error::xml_parse(e.to_string(), Some(format!("byte {}", position))))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| {
                    Error::xml_parse("unbalanced closing tag", Some(format!("byte {}", position)))
                })?;
                match stack.last_mut() {
                    Some(parent) => {
                        let name = frame.name.clone();
                        insert_child(&mut parent.children, name, frame.into_value());
                    }
                    None => finished = Some(frame),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::xml_parse(
            format!("unclosed element <{}>", stack[stack.len() - 1].name),
            None,
        ));
    }

    let root_frame = finished.ok_or_else(|| {
        Error::xml_parse(format!("document has no <{}> element", root), None)
    })?;

    Ok(MetadataRecord {
        attributes,
        fields: root_frame.children,
    })
}

/// Parse and deserialize into a typed record.
pub fn from_xml_as<T: DeserializeOwned>(xml: &str, root: &str) -> Result<T> {
    from_xml(xml, root)?.into_typed()
}

fn check_root(found: &str, expected: &str) -> Result<()> {
    if found != expected {
        return Err(Error::xml_parse(
            format!("expected root element <{}>, found <{}>", expected, found),
            None,
        ));
    }
    Ok(())
}

fn read_attributes(
    start: &BytesStart<'_>,
    into: &mut std::collections::BTreeMap<String, String>,
    position: u64,
) -> Result<()> {
    for attr in start.attributes() {
        let attr =
            attr.map_err(|e| Error::xml_parse(e.to_string(), Some(format!("byte {}", position))))?;
        let key = element_name(attr.key.as_ref(), position)?;
        let value = attr
            .unescape_value()
            .map_err(|e| Error::xml_parse(e.to_string(), Some(format!("byte {}", position))))?;
        into.insert(key, value.into_owned());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{UnifiedApplication, METADATA_NAMESPACE};
    use serde_json::json;

    fn record(value: Value) -> MetadataRecord {
        MetadataRecord::from_json(value).unwrap()
    }

    #[test]
    fn writes_declaration_and_indented_children() {
        let xml = to_xml(
            &record(json!({"label": "My App"})),
            "UnifiedApplication",
            &XmlOptions::default(),
        )
        .unwrap();

        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <UnifiedApplication>\n    <label>My App</label>\n</UnifiedApplication>\n"
        );
    }

    #[test]
    fn omits_declaration_when_disabled() {
        let options = XmlOptions {
            declaration: None,
            indent: None,
        };
        let xml = to_xml(&record(json!({"a": "b"})), "Root", &options).unwrap();
        assert_eq!(xml, "<Root><a>b</a></Root>\n");
    }

    #[test]
    fn reserved_key_becomes_root_attributes() {
        let xml = json_to_xml(
            &json!({"$": {"xmlns": METADATA_NAMESPACE}, "label": "Foo"}),
            "CustomObject",
            &XmlOptions::default(),
        )
        .unwrap();

        assert!(xml.contains(&format!("<CustomObject xmlns=\"{}\">", METADATA_NAMESPACE)));
        assert!(!xml.contains("<$>"));
        assert!(!xml.contains("<xmlns>"));
    }

    #[test]
    fn null_values_are_skipped_and_arrays_repeat() {
        let xml = to_xml(
            &record(json!({
                "label": "App",
                "description": null,
                "member": [{"name": "a"}, {"name": "b"}],
            })),
            "UnifiedApplication",
            &XmlOptions::default(),
        )
        .unwrap();

        assert!(!xml.contains("description"));
        assert_eq!(xml.matches("<member>").count(), 2);
        assert!(xml.find("<name>a</name>").unwrap() < xml.find("<name>b</name>").unwrap());
    }

    #[test]
    fn text_is_escaped() {
        let xml = to_xml(
            &record(json!({"label": "R&D <team>"})),
            "Root",
            &XmlOptions::default(),
        )
        .unwrap();
        assert!(xml.contains("<label>R&amp;D &lt;team&gt;</label>"));

        let parsed = from_xml(&xml, "Root").unwrap();
        assert_eq!(parsed.get_str("label"), Some("R&D <team>"));
    }

    #[test]
    fn round_trip_coerces_scalars_to_strings() {
        let original = record(json!({
            "fullName": "Foo__c",
            "enableHistory": true,
            "version": 3,
            "nameField": {"label": "Foo Name", "type": "Text"},
            "fields": [{"fullName": "A__c"}, {"fullName": "B__c"}],
        }));

        let xml = to_xml(&original, "CustomObject", &XmlOptions::default()).unwrap();
        let parsed = from_xml(&xml, "CustomObject").unwrap();

        assert_eq!(
            parsed.to_json(),
            json!({
                "fullName": "Foo__c",
                "enableHistory": "true",
                "version": "3",
                "nameField": {"label": "Foo Name", "type": "Text"},
                "fields": [{"fullName": "A__c"}, {"fullName": "B__c"}],
            })
        );
    }

    #[test]
    fn round_trip_keeps_surrounding_whitespace_in_text() {
        let original = record(json!({
            "label": "App",
            "description": "  padded  ",
            "nameField": {"label": " Name", "type": "Text"},
        }));

        let xml = to_xml(&original, "CustomObject", &XmlOptions::default()).unwrap();
        let parsed = from_xml(&xml, "CustomObject").unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn whitespace_only_text_survives_but_layout_does_not() {
        let xml = "<Root>\n    <gap>   </gap>\n    <nested>\n        <a>b</a>\n    </nested>\n</Root>\n";

        let parsed = from_xml(xml, "Root").unwrap();

        assert_eq!(parsed.to_json(), json!({"gap": "   ", "nested": {"a": "b"}}));
    }

    #[test]
    fn empty_object_becomes_empty_element() {
        let xml = to_xml(
            &record(json!({"label": "A", "nameField": {}})),
            "CustomObject",
            &XmlOptions::default(),
        )
        .unwrap();

        assert!(xml.contains("    <nameField/>\n"));
        let parsed = from_xml(&xml, "CustomObject").unwrap();
        assert_eq!(parsed.get_str("nameField"), Some(""));
    }

    #[test]
    fn empty_list_writes_nothing() {
        let xml = to_xml(
            &record(json!({"label": "A", "fields": []})),
            "CustomObject",
            &XmlOptions::default(),
        )
        .unwrap();

        assert!(!xml.contains("fields"));
        let parsed = from_xml(&xml, "CustomObject").unwrap();
        assert_eq!(parsed.to_json(), json!({"label": "A"}));
    }

    #[test]
    fn parses_root_attributes_and_empty_elements() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomObject xmlns="http://soap.sforce.com/2006/04/metadata">
    <label>Foo</label>
    <description/>
</CustomObject>"#;

        let parsed = from_xml(xml, "CustomObject").unwrap();
        assert_eq!(parsed.attributes.get("xmlns").unwrap(), METADATA_NAMESPACE);
        assert_eq!(parsed.get_str("description"), Some(""));
    }

    #[test]
    fn typed_parse() {
        let xml = "<UnifiedApplication><label>App</label></UnifiedApplication>";
        let app: UnifiedApplication = from_xml_as(xml, "UnifiedApplication").unwrap();
        assert_eq!(app.label, "App");
        assert_eq!(app.description, None);
    }

    #[test]
    fn wrong_root_is_an_error() {
        let err = from_xml("<Other><a>b</a></Other>", "CustomObject").unwrap_err();
        assert_eq!(err.code.as_str(), "xml.parse_error");
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let err = from_xml("<CustomObject><label>Foo</nope></CustomObject>", "CustomObject")
            .unwrap_err();
        assert_eq!(err.code.as_str(), "xml.parse_error");

        let err = from_xml("<CustomObject><label>Foo</label>", "CustomObject").unwrap_err();
        assert_eq!(err.code.as_str(), "xml.parse_error");
    }

    #[test]
    fn empty_document_is_an_error() {
        assert!(from_xml("", "CustomObject").is_err());
    }
}
