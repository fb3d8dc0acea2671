//! Detached node values.
//!
//! An [`Element`] is a node lifted out of a tree: its kind, type-specific
//! content, formatting attributes, and (optionally) its ordered children.
//! Trees hand these out from their copy operations and accept them on
//! append, so two trees never share node storage.
//!
//! ## Content vs attributes
//!
//! `content` is what the node *carries* (the string of a text run, the bytes
//! of an image). `attributes` is how it *looks* (bold, heading, alignment).
//! A shallow copy keeps both but drops `children`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::kind::NodeKind;

/// Formatting attribute keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Attribute {
    BackgroundColor,
    Bold,
    BorderColor,
    BorderWidth,
    FontFamily,
    FontSize,
    ForegroundColor,
    GlyphType,
    Heading,
    Height,
    HorizontalAlignment,
    IndentEnd,
    IndentFirstLine,
    IndentStart,
    Italic,
    LineSpacing,
    LinkUrl,
    ListId,
    MinimumHeight,
    NestingLevel,
    PaddingBottom,
    PaddingLeft,
    PaddingRight,
    PaddingTop,
    SpacingAfter,
    SpacingBefore,
    Strikethrough,
    Underline,
    VerticalAlignment,
    Width,
}

/// Attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

/// Binary payload of an inline image or drawing.
///
/// Serialized as base64 so documents stay valid JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub content_type: String,
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

/// Type-specific content carried by a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeContent {
    /// Structural nodes (paragraphs, tables, rules) carry nothing.
    #[default]
    None,
    /// Text runs, chip labels, equation symbols.
    Text(String),
    /// Images and drawings.
    Blob(Blob),
}

impl NodeContent {
    pub fn is_none(&self) -> bool {
        matches!(self, NodeContent::None)
    }

    /// The text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeContent::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A detached document node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "NodeContent::is_none")]
    pub content: NodeContent,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<Attribute, AttrValue>,
    /// Ordered children. Order is significant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    /// Empty node of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            content: NodeContent::None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Empty document body.
    pub fn body() -> Self {
        Self::new(NodeKind::BodySection)
    }

    /// Text run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_content(NodeContent::Text(text.into()))
    }

    /// Paragraph holding a single text run (empty text → no run).
    pub fn paragraph(text: impl Into<String>) -> Self {
        let text = text.into();
        let para = Self::new(NodeKind::Paragraph);
        if text.is_empty() {
            para
        } else {
            para.with_child(Self::text(text))
        }
    }

    /// Inline image.
    pub fn image(content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(NodeKind::InlineImage).with_content(NodeContent::Blob(Blob {
            content_type: content_type.into(),
            bytes: bytes.into(),
        }))
    }

    pub fn with_content(mut self, content: NodeContent) -> Self {
        self.content = content;
        self
    }

    pub fn with_attr(mut self, attr: Attribute, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(attr, value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Copy of this node without its descendants.
    pub fn shell(&self) -> Self {
        Self {
            kind: self.kind,
            content: self.content.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, attr: Attribute) -> Option<&AttrValue> {
        self.attributes.get(&attr)
    }

    /// Concatenated text of this node and all descendants, depth-first.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = self.content.as_text() {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Element::node_count).sum::<usize>()
    }

    /// Kinds of the direct children, in order.
    pub fn child_kinds(&self) -> Vec<NodeKind> {
        self.children.iter().map(|c| c.kind).collect()
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}
