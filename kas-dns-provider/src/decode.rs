//! SOAP response decoding
//!
//! KAS encodes every return value with one recursive element shape (`return`,
//! `item`, `key`, `value`) and `type`/`nil` attribute hints. This module only
//! builds that tree; interpreting it is the job of [`crate::value`].

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::error::KasError;

/// A SOAP fault returned in place of a successful body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    /// `faultcode`
    pub code: String,
    /// `faultstring`
    pub message: String,
    /// `faultactor`
    pub actor: String,
}

impl From<Fault> for KasError {
    fn from(fault: Fault) -> Self {
        Self::RemoteFault {
            code: fault.code,
            message: fault.message,
            actor: fault.actor,
        }
    }
}

/// One generic value element of a KAS response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueNode {
    /// Trimmed character data directly inside the element.
    pub text: String,
    /// Local part of the `type` attribute (`string`, `int`, `Array`, ...).
    pub type_tag: String,
    /// The `nil` attribute. KAS uses it to carry boolean literals.
    pub raw: String,
    /// Present when this node is a map entry.
    pub key: Option<Box<ValueNode>>,
    /// Present when this node wraps another value.
    pub value: Option<Box<ValueNode>>,
    /// `item` children in document order.
    pub items: Vec<ValueNode>,
}

impl ValueNode {
    /// A leaf node with text and a type tag.
    pub fn scalar(type_tag: &str, text: &str) -> Self {
        Self {
            text: text.to_string(),
            type_tag: type_tag.to_string(),
            ..Self::default()
        }
    }

    /// Text of the key sub-node, or `""` when the node has none.
    pub fn key_text(&self) -> &str {
        self.key.as_deref().map_or("", |k| k.text.as_str())
    }
}

/// A decoded SOAP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnvelope {
    Fault(Fault),
    Return(ValueNode),
}

impl ResponseEnvelope {
    /// The return value, or the fault as a [`KasError::RemoteFault`].
    pub fn into_result(self) -> Result<ValueNode, KasError> {
        match self {
            Self::Return(node) => Ok(node),
            Self::Fault(fault) => Err(fault.into()),
        }
    }
}

/// Parses a SOAP response document.
///
/// A fault body decodes successfully; detecting it is up to the caller.
///
/// # Errors
/// Returns [`KasError::Decode`] (without request context) if the document is
/// malformed or lacks `Envelope`, `Body` or a `return` element.
pub fn decode_response(body: &str) -> Result<ResponseEnvelope, KasError> {
    let doc = Document::parse(body).map_err(decode_error)?;

    let envelope = doc.root_element();
    if envelope.tag_name().name() != "Envelope" {
        return Err(decode_error(format!(
            "expected element <Envelope>, found <{}>",
            envelope.tag_name().name()
        )));
    }
    let body = child(envelope, "Body").ok_or_else(|| decode_error("missing <Body>"))?;

    if let Some(fault) = child(body, "Fault") {
        return Ok(ResponseEnvelope::Fault(Fault {
            code: child_text(fault, "faultcode"),
            message: child_text(fault, "faultstring"),
            actor: child_text(fault, "faultactor"),
        }));
    }

    let response = body
        .children()
        .find(Node::is_element)
        .ok_or_else(|| decode_error("empty <Body>"))?;
    let ret = child(response, "return").ok_or_else(|| {
        decode_error(format!(
            "missing <return> in <{}>",
            response.tag_name().name()
        ))
    })?;

    Ok(ResponseEnvelope::Return(value_node(ret)))
}

fn decode_error(detail: impl ToString) -> KasError {
    KasError::Decode {
        request: None,
        detail: detail.to_string(),
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn child_text(node: Node<'_, '_>, name: &str) -> String {
    child(node, name).map(element_text).unwrap_or_default()
}

/// Direct character data of an element, trimmed. Whitespace-only text nodes
/// (pretty-printing between elements) contribute nothing.
fn element_text(node: Node<'_, '_>) -> String {
    let mut text = String::new();
    for t in node.children().filter(Node::is_text) {
        let chunk = t.text().unwrap_or_default().trim();
        if !chunk.is_empty() {
            text.push_str(chunk);
        }
    }
    text
}

/// Attribute by local name, regardless of namespace prefix.
fn attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

/// `xsd:string` -> `string`, `SOAP-ENC:Array` -> `Array`.
fn local_type(qualified: &str) -> &str {
    qualified.rsplit_once(':').map_or(qualified, |(_, local)| local)
}

fn value_node(node: Node<'_, '_>) -> ValueNode {
    let mut out = ValueNode {
        text: element_text(node),
        type_tag: attribute(node, "type").map(local_type).unwrap_or_default().to_string(),
        raw: attribute(node, "nil").unwrap_or_default().trim().to_string(),
        ..ValueNode::default()
    };

    for c in node.children().filter(Node::is_element) {
        match c.tag_name().name() {
            "key" => out.key = Some(Box::new(value_node(c))),
            "value" => out.value = Some(Box::new(value_node(c))),
            "item" => out.items.push(value_node(c)),
            _ => {}
        }
    }
    out
}
