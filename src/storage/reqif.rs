//! Rendering a [`Document`] as a ReqIF 1.0 XML document.
//!
//! The output is fully determined by the document and the catalog: the only
//! clock value it contains is the document's own creation timestamp.

use tracing::instrument;

use crate::{
    domain::{
        Body, Document, RelationEdge, RequirementObject, RichText,
        rich_text::{Block, Inline, Span},
        schema::{AttributeDefinition, DatatypeKind, Enumeration, Field, ObjectType, SchemaCatalog},
    },
    storage::xml::XmlWriter,
};

/// Namespace of the ReqIF schema.
pub const REQIF_NAMESPACE: &str = "http://www.omg.org/spec/ReqIF/20110401/reqif.xsd";

/// Namespace of embedded rich text.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

const TOOL_ID: &str = "ReqIF_Generator";
const REQIF_VERSION: &str = "1.0";
const HEADER_ID: &str = "HDR-001";
const SPECIFICATION_ID: &str = "SP-001";
const MODULE_ID: &str = "SRS-001";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Encodes a document as UTF-8 ReqIF XML.
///
/// Relation endpoints are written exactly as stored; they are not checked
/// against the registered objects.
#[must_use]
#[instrument(level = "debug", skip_all, fields(objects = document.len(), relations = document.relations().len()))]
pub fn encode(document: &Document, catalog: &SchemaCatalog) -> Vec<u8> {
    Encoder {
        document,
        catalog,
        timestamp: document.created().format(TIMESTAMP_FORMAT).to_string(),
        xml: XmlWriter::new(),
    }
    .run()
    .into_bytes()
}

struct Encoder<'a> {
    document: &'a Document,
    catalog: &'a SchemaCatalog,
    timestamp: String,
    xml: XmlWriter,
}

impl Encoder<'_> {
    fn run(mut self) -> String {
        self.xml.open(
            "REQ-IF",
            &[("xmlns", REQIF_NAMESPACE), ("xmlns:xhtml", XHTML_NAMESPACE)],
        );
        self.header();

        self.xml.open("CORE-CONTENT", &[]);
        self.xml.open("REQ-IF-CONTENT", &[]);

        self.xml.open("DATATYPES", &[]);
        self.datatypes();
        self.xml.close();

        self.xml.open("SPEC-TYPES", &[]);
        self.spec_types();
        self.xml.close();

        self.xml.open("SPEC-OBJECTS", &[]);
        for object in self.document.objects() {
            self.spec_object(object);
        }
        self.xml.close();

        self.xml.open("SPEC-RELATIONS", &[]);
        for relation in self.document.relations() {
            self.spec_relation(relation);
        }
        self.xml.close();

        self.xml.open("SPECIFICATIONS", &[]);
        self.specification();
        self.xml.close();

        self.xml.close();
        self.xml.close();

        self.xml.empty("TOOL-EXTENSIONS", &[]);
        self.xml.close();

        self.xml.finish()
    }

    fn header(&mut self) {
        self.xml.open("THE-HEADER", &[]);
        self.xml.open("REQ-IF-HEADER", &[("IDENTIFIER", HEADER_ID)]);
        self.xml.text("CREATION-TIME", &[], &self.timestamp);
        self.xml.text("REQ-IF-TOOL-ID", &[], TOOL_ID);
        self.xml.text("REQ-IF-VERSION", &[], REQIF_VERSION);
        self.xml.text("SOURCE-TOOL-ID", &[], TOOL_ID);
        self.xml.text("TITLE", &[], self.document.title());
        self.xml.close();
        self.xml.close();
    }

    fn datatypes(&mut self) {
        let catalog = self.catalog;
        for datatype in catalog.scalars() {
            self.xml.empty(
                datatype_definition_element(datatype.kind),
                &[
                    ("IDENTIFIER", datatype.identifier),
                    ("LONG-NAME", datatype.long_name),
                ],
            );
        }
        self.enumeration(catalog.status());
        self.enumeration(catalog.priority());
    }

    fn enumeration<const N: usize>(&mut self, enumeration: &Enumeration<N>) {
        self.xml.open(
            "DATATYPE-DEFINITION-ENUMERATION",
            &[
                ("IDENTIFIER", enumeration.identifier),
                ("LONG-NAME", enumeration.long_name),
            ],
        );
        self.xml.open("SPECIFIED-VALUES", &[]);
        for value in &enumeration.values {
            self.xml.open(
                "ENUM-VALUE",
                &[
                    ("IDENTIFIER", value.identifier),
                    ("LONG-NAME", value.long_name),
                ],
            );
            let key = value.key.to_string();
            self.xml.open("PROPERTIES", &[]);
            self.xml.empty(
                "EMBEDDED-VALUE",
                &[
                    ("KEY", key.as_str()),
                    ("OTHER-CONTENT", value.long_name),
                ],
            );
            self.xml.close();
            self.xml.close();
        }
        self.xml.close();
        self.xml.close();
    }

    fn spec_types(&mut self) {
        let catalog = self.catalog;

        let module = catalog.specification_type();
        self.xml.open(
            "SPECIFICATION-TYPE",
            &[
                ("IDENTIFIER", module.identifier),
                ("LONG-NAME", module.long_name),
            ],
        );
        self.xml.open("SPEC-ATTRIBUTES", &[]);
        self.attribute_definition(&module.id_attribute);
        self.attribute_definition(&module.description_attribute);
        self.xml.close();
        self.xml.close();

        for object_type in catalog.object_types() {
            self.object_type(object_type);
        }

        for relation_type in catalog.relation_types() {
            self.xml.empty(
                "SPEC-RELATION-TYPE",
                &[
                    ("IDENTIFIER", relation_type.identifier),
                    ("LONG-NAME", relation_type.long_name),
                ],
            );
        }
    }

    fn object_type(&mut self, object_type: &ObjectType) {
        self.xml.open(
            "SPEC-OBJECT-TYPE",
            &[
                ("IDENTIFIER", object_type.identifier),
                ("LONG-NAME", object_type.long_name),
            ],
        );
        self.xml.open("SPEC-ATTRIBUTES", &[]);
        for (_, definition) in object_type.attributes() {
            self.attribute_definition(definition);
        }
        self.xml.close();
        self.xml.close();
    }

    fn attribute_definition(&mut self, definition: &AttributeDefinition) {
        let multi_valued = definition.multi_valued().map(|m| m.to_string());

        let mut attributes = vec![
            ("IDENTIFIER", definition.identifier.as_str()),
            ("LONG-NAME", definition.long_name),
        ];
        if let Some(multi_valued) = &multi_valued {
            attributes.push(("MULTI-VALUED", multi_valued.as_str()));
        }

        self.xml
            .open(attribute_definition_element(definition.kind), &attributes);
        self.xml.open("TYPE", &[]);
        self.xml.text(
            datatype_reference_element(definition.kind),
            &[],
            definition.datatype,
        );
        self.xml.close();
        self.xml.close();
    }

    fn spec_object(&mut self, object: &RequirementObject) {
        let catalog = self.catalog;
        let object_type = catalog.object_type(object.kind());
        let timestamp = self.timestamp.clone();

        self.xml.open(
            "SPEC-OBJECT",
            &[
                ("IDENTIFIER", object.identifier()),
                ("LAST-CHANGE", timestamp.as_str()),
            ],
        );
        self.xml.open("TYPE", &[]);
        self.xml
            .text("SPEC-OBJECT-TYPE-REF", &[], object_type.identifier);
        self.xml.close();

        self.xml.open("VALUES", &[]);
        for (field, definition) in object_type.attributes() {
            match field {
                Field::ForeignId => {
                    self.scalar_value(definition, &object.foreign_id().to_string());
                }
                Field::Name => self.scalar_value(definition, object.name()),
                Field::ExternalKey => self.scalar_value(definition, object.external_key()),
                Field::Chapter => self.scalar_value(definition, object.chapter()),
                Field::Prefix => self.scalar_value(definition, object.prefix()),
                Field::Description => {
                    let description = RichText::paragraph(object.description());
                    self.xhtml_value(definition, &Body::RichText(description));
                }
                Field::Text => self.xhtml_value(definition, object.body()),
                Field::Status => {
                    let value = catalog.status_value(object.status());
                    self.enumeration_value(definition, value.identifier);
                }
                Field::Priority => {
                    let value = catalog.priority_value(object.priority());
                    self.enumeration_value(definition, value.identifier);
                }
            }
        }
        self.xml.close();

        self.xml.close();
    }

    fn scalar_value(&mut self, definition: &AttributeDefinition, value: &str) {
        self.xml.open(
            attribute_value_element(definition.kind),
            &[("THE-VALUE", value)],
        );
        self.definition_reference(definition);
        self.xml.close();
    }

    fn enumeration_value(&mut self, definition: &AttributeDefinition, value: &str) {
        self.xml.open("ATTRIBUTE-VALUE-ENUMERATION", &[]);
        self.definition_reference(definition);
        self.xml.open("VALUES", &[]);
        self.xml.text("ENUM-VALUE-REF", &[], value);
        self.xml.close();
        self.xml.close();
    }

    fn xhtml_value(&mut self, definition: &AttributeDefinition, body: &Body) {
        self.xml.open("ATTRIBUTE-VALUE-XHTML", &[]);
        self.definition_reference(definition);
        self.xml.open("THE-VALUE", &[]);
        match body {
            Body::RichText(text) => self.rich_text(text),
            Body::PreEncoded(markup) => self.xml.raw(markup),
        }
        self.xml.close();
        self.xml.close();
    }

    fn definition_reference(&mut self, definition: &AttributeDefinition) {
        self.xml.open("DEFINITION", &[]);
        self.xml.text(
            attribute_reference_element(definition.kind),
            &[],
            &definition.identifier,
        );
        self.xml.close();
    }

    fn rich_text(&mut self, text: &RichText) {
        if text.blocks().is_empty() {
            self.xml.empty("xhtml:div", &[]);
            return;
        }
        self.xml.open("xhtml:div", &[]);
        for block in text.blocks() {
            match block {
                Block::Paragraph(inline) => self.inline("xhtml:p", inline),
                Block::List(items) => {
                    self.xml.open("xhtml:ul", &[]);
                    for item in items {
                        self.inline("xhtml:li", item);
                    }
                    self.xml.close();
                }
            }
        }
        self.xml.close();
    }

    fn inline(&mut self, name: &'static str, inline: &Inline) {
        match inline.spans() {
            [] => self.xml.empty(name, &[]),
            [Span::Text(text)] => self.xml.text(name, &[], text),
            spans => {
                self.xml.begin_inline(name);
                for span in spans {
                    match span {
                        Span::Text(text) => self.xml.inline_text(text),
                        Span::Bold(text) => self.xml.inline_element("xhtml:b", text),
                    }
                }
                self.xml.end_inline(name);
            }
        }
    }

    fn spec_relation(&mut self, relation: &RelationEdge) {
        let catalog = self.catalog;
        let relation_type = catalog.relation_type(relation.kind());
        let timestamp = self.timestamp.clone();

        self.xml.open(
            "SPEC-RELATION",
            &[
                ("IDENTIFIER", relation.identifier()),
                ("LAST-CHANGE", timestamp.as_str()),
            ],
        );
        self.xml.open("TYPE", &[]);
        self.xml
            .text("SPEC-RELATION-TYPE-REF", &[], relation_type.identifier);
        self.xml.close();
        self.xml.open("SOURCE", &[]);
        self.xml.text("SPEC-OBJECT-REF", &[], relation.source());
        self.xml.close();
        self.xml.open("TARGET", &[]);
        self.xml.text("SPEC-OBJECT-REF", &[], relation.target());
        self.xml.close();
        self.xml.close();
    }

    fn specification(&mut self) {
        let document = self.document;
        let catalog = self.catalog;
        let module = catalog.specification_type();
        let timestamp = self.timestamp.clone();

        self.xml.open(
            "SPECIFICATION",
            &[
                ("IDENTIFIER", SPECIFICATION_ID),
                ("LONG-NAME", document.title()),
                ("LAST-CHANGE", timestamp.as_str()),
            ],
        );
        self.xml.open("TYPE", &[]);
        self.xml
            .text("SPECIFICATION-TYPE-REF", &[], module.identifier);
        self.xml.close();

        self.xml.open("VALUES", &[]);
        self.scalar_value(&module.id_attribute, MODULE_ID);
        let description = RichText::paragraph(format!(
            "This module contains system-level requirements for {}.",
            document.title()
        ));
        self.xhtml_value(&module.description_attribute, &Body::RichText(description));
        self.xml.close();

        self.xml.open("CHILDREN", &[]);
        for (index, object) in document.objects().iter().enumerate() {
            let identifier = format!("SH-{:03}", index + 1);
            self.xml.open(
                "SPEC-HIERARCHY",
                &[("IDENTIFIER", identifier.as_str()), ("LAST-CHANGE", timestamp.as_str())],
            );
            self.xml.open("OBJECT", &[]);
            self.xml.text("SPEC-OBJECT-REF", &[], object.identifier());
            self.xml.close();
            self.xml.close();
        }
        self.xml.close();

        self.xml.close();
    }
}

const fn datatype_definition_element(kind: DatatypeKind) -> &'static str {
    match kind {
        DatatypeKind::String => "DATATYPE-DEFINITION-STRING",
        DatatypeKind::Xhtml => "DATATYPE-DEFINITION-XHTML",
        DatatypeKind::Integer => "DATATYPE-DEFINITION-INTEGER",
        DatatypeKind::Enumeration => "DATATYPE-DEFINITION-ENUMERATION",
    }
}

const fn datatype_reference_element(kind: DatatypeKind) -> &'static str {
    match kind {
        DatatypeKind::String => "DATATYPE-DEFINITION-STRING-REF",
        DatatypeKind::Xhtml => "DATATYPE-DEFINITION-XHTML-REF",
        DatatypeKind::Integer => "DATATYPE-DEFINITION-INTEGER-REF",
        DatatypeKind::Enumeration => "DATATYPE-DEFINITION-ENUMERATION-REF",
    }
}

const fn attribute_definition_element(kind: DatatypeKind) -> &'static str {
    match kind {
        DatatypeKind::String => "ATTRIBUTE-DEFINITION-STRING",
        DatatypeKind::Xhtml => "ATTRIBUTE-DEFINITION-XHTML",
        DatatypeKind::Integer => "ATTRIBUTE-DEFINITION-INTEGER",
        DatatypeKind::Enumeration => "ATTRIBUTE-DEFINITION-ENUMERATION",
    }
}

const fn attribute_reference_element(kind: DatatypeKind) -> &'static str {
    match kind {
        DatatypeKind::String => "ATTRIBUTE-DEFINITION-STRING-REF",
        DatatypeKind::Xhtml => "ATTRIBUTE-DEFINITION-XHTML-REF",
        DatatypeKind::Integer => "ATTRIBUTE-DEFINITION-INTEGER-REF",
        DatatypeKind::Enumeration => "ATTRIBUTE-DEFINITION-ENUMERATION-REF",
    }
}

const fn attribute_value_element(kind: DatatypeKind) -> &'static str {
    match kind {
        DatatypeKind::String => "ATTRIBUTE-VALUE-STRING",
        DatatypeKind::Xhtml => "ATTRIBUTE-VALUE-XHTML",
        DatatypeKind::Integer => "ATTRIBUTE-VALUE-INTEGER",
        DatatypeKind::Enumeration => "ATTRIBUTE-VALUE-ENUMERATION",
    }
}
