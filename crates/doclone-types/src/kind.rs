//! Node type tags.
//!
//! `NodeKind` is the closed set of element types a rich-text document tree
//! can hold. String forms follow the host's SCREAMING_SNAKE_CASE spelling
//! (`"TABLE_ROW"`) and parse case-insensitively.
//!
//! Nesting rules live here too: [`NodeKind::accepts`] says which kinds a
//! container may hold. Trees use it to reject malformed appends.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// What a document node *is*.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum NodeKind {
    /// Document body, the root of the main content tree.
    BodySection,
    HeaderSection,
    FooterSection,
    FootnoteSection,
    /// Footnote anchor inside a paragraph; its text lives in a footnote section.
    Footnote,
    Paragraph,
    /// Formatted text run.
    Text,
    Table,
    TableRow,
    TableCell,
    ListItem,
    InlineImage,
    InlineDrawing,
    HorizontalRule,
    PageBreak,
    Equation,
    EquationFunction,
    EquationFunctionArgumentSeparator,
    EquationSymbol,
    /// Smart chip: date.
    Date,
    /// Smart chip: person.
    Person,
    /// Smart chip: link preview.
    RichLink,
    TableOfContents,
}

impl NodeKind {
    /// Parse from string (case-insensitive, `"table_row"` or `"TABLE_ROW"`).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::BodySection => "BODY_SECTION",
            NodeKind::HeaderSection => "HEADER_SECTION",
            NodeKind::FooterSection => "FOOTER_SECTION",
            NodeKind::FootnoteSection => "FOOTNOTE_SECTION",
            NodeKind::Footnote => "FOOTNOTE",
            NodeKind::Paragraph => "PARAGRAPH",
            NodeKind::Text => "TEXT",
            NodeKind::Table => "TABLE",
            NodeKind::TableRow => "TABLE_ROW",
            NodeKind::TableCell => "TABLE_CELL",
            NodeKind::ListItem => "LIST_ITEM",
            NodeKind::InlineImage => "INLINE_IMAGE",
            NodeKind::InlineDrawing => "INLINE_DRAWING",
            NodeKind::HorizontalRule => "HORIZONTAL_RULE",
            NodeKind::PageBreak => "PAGE_BREAK",
            NodeKind::Equation => "EQUATION",
            NodeKind::EquationFunction => "EQUATION_FUNCTION",
            NodeKind::EquationFunctionArgumentSeparator => "EQUATION_FUNCTION_ARGUMENT_SEPARATOR",
            NodeKind::EquationSymbol => "EQUATION_SYMBOL",
            NodeKind::Date => "DATE",
            NodeKind::Person => "PERSON",
            NodeKind::RichLink => "RICH_LINK",
            NodeKind::TableOfContents => "TABLE_OF_CONTENTS",
        }
    }

    /// Check if `child` may be appended under a node of this kind.
    pub fn accepts(&self, child: NodeKind) -> bool {
        self.allowed_children().contains(&child)
    }

    fn allowed_children(&self) -> &'static [NodeKind] {
        use NodeKind::*;

        const BLOCKS: &[NodeKind] = &[
            Paragraph,
            ListItem,
            Table,
            TableOfContents,
            HorizontalRule,
            PageBreak,
            InlineImage,
        ];
        const INLINES: &[NodeKind] = &[
            Text,
            InlineImage,
            InlineDrawing,
            HorizontalRule,
            PageBreak,
            Footnote,
            Date,
            Person,
            RichLink,
            Equation,
        ];
        const EQUATION_PARTS: &[NodeKind] = &[
            EquationFunction,
            EquationSymbol,
            EquationFunctionArgumentSeparator,
            Text,
        ];

        match self {
            BodySection | HeaderSection | FooterSection | FootnoteSection | TableCell => BLOCKS,
            Paragraph | ListItem => INLINES,
            Table => &[TableRow],
            TableRow => &[TableCell],
            Equation | EquationFunction => EQUATION_PARTS,
            TableOfContents => &[Paragraph],
            Footnote => &[FootnoteSection],
            Text | InlineImage | InlineDrawing | HorizontalRule | PageBreak
            | EquationFunctionArgumentSeparator | EquationSymbol | Date | Person | RichLink => &[],
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
