//! Behavioral tests for the mirror engine.
//!
//! # Tiers
//!
//! - **Tier 0:** tree-level `synchronize` over `DocTree` (replace, order,
//!   idempotence, exclusion, recursion, table cells)
//! - **Tier 1:** failure mid-walk, using a destination tree that rejects
//!   one node kind
//! - **Tier 2:** store-level `synchronize_documents`, including a partial
//!   failure that still persists the slave

use doclone_kernel::{
    CopyPolicy, DocTree, Document, DocumentStore, DocumentTree, DocloneError, DocloneResult,
    MemoryDocumentStore, NodeId, SyncReport, synchronize, synchronize_documents,
};
use doclone_types::{Attribute, DocumentId, Element, NodeContent, NodeKind};

// ============================================================================
// Shared test setup
// ============================================================================

fn tree(body: Element) -> DocTree {
    DocTree::from_element(body).unwrap()
}

fn mirror_of(master: &DocTree) -> DocTree {
    let mut slave = DocTree::body();
    synchronize(master, &mut slave).unwrap();
    slave
}

/// A body holding only kinds the mirror copies.
fn copyable_body() -> Element {
    Element::body().with_children([
        Element::paragraph("Title").with_attr(Attribute::Heading, "TITLE"),
        Element::new(NodeKind::ListItem)
            .with_attr(Attribute::GlyphType, "BULLET")
            .with_child(Element::text("first")),
        Element::new(NodeKind::HorizontalRule),
        Element::new(NodeKind::Paragraph).with_children([
            Element::text("logo: "),
            Element::image("image/png", vec![0x89, 0x50, 0x4e, 0x47]),
        ]),
        Element::new(NodeKind::PageBreak),
        Element::new(NodeKind::Table).with_child(Element::new(NodeKind::TableRow)),
    ])
}

/// `DocTree` that refuses to append one node kind.
struct Picky {
    inner: DocTree,
    reject: NodeKind,
}

impl DocumentTree for Picky {
    type NodeRef = NodeId;

    fn root(&self) -> NodeId {
        self.inner.root()
    }

    fn kind(&self, node: NodeId) -> DocloneResult<NodeKind> {
        self.inner.kind(node)
    }

    fn children(&self, node: NodeId) -> DocloneResult<Vec<NodeId>> {
        self.inner.children(node)
    }

    fn copy_shell(&self, node: NodeId) -> DocloneResult<Element> {
        self.inner.copy_shell(node)
    }

    fn copy_deep(&self, node: NodeId) -> DocloneResult<Element> {
        self.inner.copy_deep(node)
    }

    fn clear(&mut self, node: NodeId) -> DocloneResult<()> {
        self.inner.clear(node)
    }

    fn append(&mut self, parent: NodeId, element: Element) -> DocloneResult<NodeId> {
        if element.kind == self.reject {
            return Err(DocloneError::append(self.inner.kind(parent)?, element.kind));
        }
        self.inner.append(parent, element)
    }
}

/// Memory store whose trees reject one node kind on append.
struct PickyStore {
    inner: MemoryDocumentStore,
    reject: NodeKind,
}

impl DocumentStore for PickyStore {
    type Tree = Picky;

    fn open(&self, id: &DocumentId) -> DocloneResult<Document<Picky>> {
        let doc = self.inner.open(id)?;
        Ok(Document {
            id: doc.id,
            name: doc.name,
            url: doc.url,
            tree: Picky {
                inner: doc.tree,
                reject: self.reject,
            },
        })
    }

    fn create(&self, name: &str) -> DocloneResult<Document<Picky>> {
        let doc = self.inner.create(name)?;
        Ok(Document {
            id: doc.id,
            name: doc.name,
            url: doc.url,
            tree: Picky {
                inner: doc.tree,
                reject: self.reject,
            },
        })
    }

    fn save_and_close(&self, doc: Document<Picky>) -> DocloneResult<()> {
        self.inner.save_and_close(Document {
            id: doc.id,
            name: doc.name,
            url: doc.url,
            tree: doc.tree.inner,
        })
    }
}

/// Master: three paragraphs, the middle one holding an image.
fn three_paragraphs_with_image() -> Element {
    Element::body().with_children([
        Element::paragraph("a"),
        Element::new(NodeKind::Paragraph).with_children([
            Element::text("b "),
            Element::image("image/png", vec![1, 2, 3]),
        ]),
        Element::paragraph("c"),
    ])
}

// ============================================================================
// Tier 0: tree-level synchronize
// ============================================================================

#[test]
fn copyable_master_is_reproduced_exactly() {
    let master = tree(copyable_body());
    let slave = mirror_of(&master);
    assert_eq!(slave.to_element(), master.to_element());
}

#[test]
fn slave_content_is_fully_replaced() {
    let master = tree(Element::body().with_child(Element::paragraph("new")));
    let mut slave = tree(Element::body().with_children([
        Element::paragraph("old one"),
        Element::paragraph("old two"),
        Element::new(NodeKind::PageBreak),
    ]));

    synchronize(&master, &mut slave).unwrap();

    assert_eq!(slave.to_element(), master.to_element());
    assert!(!slave.to_element().plain_text().contains("old"));
}

#[test]
fn sync_is_idempotent() {
    let master = tree(copyable_body().with_child(Element::new(NodeKind::TableOfContents)));
    let mut slave = DocTree::body();

    let first = synchronize(&master, &mut slave).unwrap();
    let once = slave.to_element();
    let second = synchronize(&master, &mut slave).unwrap();

    assert_eq!(slave.to_element(), once);
    assert_eq!(first, second);
}

#[test]
fn empty_master_empties_slave() {
    let master = DocTree::body();
    let mut slave = tree(copyable_body());

    let report = synchronize(&master, &mut slave).unwrap();

    assert!(slave.is_empty());
    assert_eq!(report, SyncReport::default());
}

#[test]
fn top_level_order_is_preserved() {
    let master = tree(Element::body().with_children([
        Element::paragraph("A"),
        Element::paragraph("B"),
        Element::paragraph("C"),
    ]));

    let slave = mirror_of(&master);

    let texts: Vec<String> = slave.to_element().children.iter().map(Element::plain_text).collect();
    assert_eq!(texts, ["A", "B", "C"]);
}

#[test]
fn unsupported_kinds_never_reach_the_slave() {
    let equation = Element::new(NodeKind::Equation).with_children([
        Element::new(NodeKind::EquationSymbol).with_content(NodeContent::Text("x".into())),
        Element::new(NodeKind::EquationFunction)
            .with_child(Element::new(NodeKind::EquationFunctionArgumentSeparator)),
    ]);
    let master = tree(Element::body().with_children([
        Element::new(NodeKind::TableOfContents).with_child(Element::paragraph("Contents")),
        Element::new(NodeKind::Paragraph).with_children([
            Element::text("see "),
            Element::new(NodeKind::Person).with_attr(Attribute::LinkUrl, "mailto:amy@example.com"),
            Element::new(NodeKind::RichLink).with_attr(Attribute::LinkUrl, "https://example.com"),
            Element::new(NodeKind::InlineDrawing),
            Element::new(NodeKind::Footnote).with_child(
                Element::new(NodeKind::FootnoteSection).with_child(Element::paragraph("note")),
            ),
            equation,
            Element::new(NodeKind::Date),
            Element::text("."),
        ]),
    ]));

    let mut slave = DocTree::body();
    let report = synchronize(&master, &mut slave).unwrap();

    let kinds = node_kinds(&slave.to_element());
    assert!(
        kinds.iter().all(|k| CopyPolicy::for_kind(*k) != CopyPolicy::Unsupported || *k == NodeKind::BodySection),
        "unsupported kind copied: {kinds:?}"
    );
    assert_eq!(slave.to_element().plain_text(), "see .");
    // TOC, person, link, drawing, footnote, equation, date.
    assert_eq!(report.skipped, 7);
    // Skipped subtrees are not walked: TOC, paragraph, its eight children.
    assert_eq!(report.visited, 10);
}

#[test]
fn containers_recurse_to_any_depth() {
    let master = tree(Element::body().with_child(
        Element::new(NodeKind::Table).with_children([
            Element::new(NodeKind::TableRow),
            Element::new(NodeKind::TableRow),
        ]),
    ));

    let slave = mirror_of(&master);

    let table = &slave.to_element().children[0];
    assert_eq!(table.kind, NodeKind::Table);
    assert_eq!(table.child_kinds(), [NodeKind::TableRow, NodeKind::TableRow]);
}

#[test]
fn table_cells_are_never_built() {
    let cell = |text: &str| Element::new(NodeKind::TableCell).with_child(Element::paragraph(text));
    let master = tree(Element::body().with_child(
        Element::new(NodeKind::Table)
            .with_child(Element::new(NodeKind::TableRow).with_children([cell("r0c0"), cell("r0c1")])),
    ));

    let mut slave = DocTree::body();
    let report = synchronize(&master, &mut slave).unwrap();

    let body = slave.to_element();
    let row = &body.children[0].children[0];
    assert_eq!(row.kind, NodeKind::TableRow);
    assert!(row.children.is_empty());
    assert_eq!(body.plain_text(), "");
    // table, row, 2 x (cell, paragraph, text)
    assert_eq!(report.visited, 8);
    assert_eq!(report.copied, 2);
    assert_eq!(report.orphaned, 4);
}

// ============================================================================
// Tier 1: failure mid-walk
// ============================================================================

#[test]
fn rejected_append_aborts_without_rollback() {
    let master = tree(three_paragraphs_with_image());
    let mut slave = Picky {
        inner: tree(Element::body().with_child(Element::paragraph("previous"))),
        reject: NodeKind::InlineImage,
    };

    let err = synchronize(&master, &mut slave).unwrap_err();

    assert!(matches!(
        err,
        DocloneError::Append { parent: NodeKind::Paragraph, child: NodeKind::InlineImage }
    ));
    let body = slave.inner.to_element();
    // Cleared, then rebuilt up to the failure: "a", then the second paragraph's text.
    assert_eq!(body.child_kinds(), [NodeKind::Paragraph, NodeKind::Paragraph]);
    assert_eq!(body.plain_text(), "ab ");
}

// ============================================================================
// Tier 2: store-level synchronize_documents
// ============================================================================

#[test]
fn documents_sync_saves_slave_only() {
    let store = MemoryDocumentStore::new();
    let master = store.insert("M", copyable_body()).unwrap();
    let slave = store.insert("S", Element::body().with_child(Element::paragraph("stale"))).unwrap();

    synchronize_documents(&store, &master, &slave).unwrap();

    assert_eq!(store.body(&slave), store.body(&master));
    assert_eq!(store.save_count(), 1);
}

#[test]
fn documents_sync_missing_side_is_access_error() {
    let store = MemoryDocumentStore::new();
    let master = store.insert("M", Element::body()).unwrap();
    let gone = DocumentId::parse("gone").unwrap();

    assert!(matches!(
        synchronize_documents(&store, &master, &gone),
        Err(DocloneError::Access(_))
    ));
    assert!(matches!(
        synchronize_documents(&store, &gone, &master),
        Err(DocloneError::Access(_))
    ));
}

#[test]
fn partial_failure_is_persisted() {
    let store = PickyStore {
        inner: MemoryDocumentStore::new(),
        reject: NodeKind::InlineImage,
    };
    let master = store.inner.insert("M", three_paragraphs_with_image()).unwrap();
    let slave = store
        .inner
        .insert("S", Element::body().with_child(Element::paragraph("previous")))
        .unwrap();

    let result = synchronize_documents(&store, &master, &slave);

    assert!(matches!(result, Err(DocloneError::Append { .. })));
    assert_eq!(store.inner.body(&slave).unwrap().plain_text(), "ab ");
    assert_eq!(store.inner.body(&master), Some(tree(three_paragraphs_with_image()).to_element()));
}

fn node_kinds(element: &Element) -> Vec<NodeKind> {
    let mut out = vec![element.kind];
    for child in &element.children {
        out.extend(node_kinds(child));
    }
    out
}
