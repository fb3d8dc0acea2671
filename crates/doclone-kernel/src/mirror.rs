//! Tree mirror engine.
//!
//! Full-replace synchronization of a master tree into a slave tree: the
//! slave root is cleared, then every master node is walked depth-first in
//! source order and handled according to [`CopyPolicy::for_kind`].
//!
//! # Policies
//!
//! - **Unsupported**: the node and its whole subtree are skipped.
//! - **LeafCopy**: the node is deep-copied by value and appended.
//! - **ContainerCopy**: a shallow copy (attributes, no children) is
//!   appended, then each source child is copied into it.
//! - **UnbuiltContainer**: table cells. The destination cell is never
//!   constructed, yet the cell's children are still walked against that
//!   missing parent, so none of them reach the slave. This is a known open
//!   defect, kept as-is until the intended cell handling is decided.
//!
//! # Failure
//!
//! Errors are not caught or translated. A rejected append aborts the walk
//! and leaves the slave cleared and partially rebuilt; there is no rollback.
//! Re-running the sync from scratch is always safe.

use doclone_types::{DocumentId, NodeKind};

use crate::error::DocloneResult;
use crate::store::DocumentStore;
use crate::tree::DocumentTree;

/// How the mirror engine treats one node kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Not representable in the destination; skip node and subtree.
    Unsupported,
    /// Copied by value, no recursion.
    LeafCopy,
    /// Shallow shell copied, then children recursed into it.
    ContainerCopy,
    /// Children recursed, but the node itself is never constructed.
    UnbuiltContainer,
}

impl CopyPolicy {
    /// The node-type policy table.
    pub fn for_kind(kind: NodeKind) -> Self {
        use NodeKind::*;

        match kind {
            BodySection | HeaderSection | FooterSection | FootnoteSection | Footnote | Date
            | Equation | EquationFunction | EquationFunctionArgumentSeparator | EquationSymbol
            | InlineDrawing | Person | RichLink | TableOfContents => CopyPolicy::Unsupported,

            HorizontalRule | InlineImage | PageBreak | Text => CopyPolicy::LeafCopy,

            ListItem | Paragraph | Table | TableRow => CopyPolicy::ContainerCopy,

            TableCell => CopyPolicy::UnbuiltContainer,
        }
    }
}

/// Node counts for one synchronization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// `copy_node` invocations (every node reached by the walk).
    pub visited: usize,
    /// Nodes appended to the destination.
    pub copied: usize,
    /// Unsupported nodes skipped together with their subtrees.
    pub skipped: usize,
    /// Copyable nodes dropped because their destination parent was never built.
    pub orphaned: usize,
}

impl SyncReport {
    fn merge(&mut self, other: SyncReport) {
        self.visited += other.visited;
        self.copied += other.copied;
        self.skipped += other.skipped;
        self.orphaned += other.orphaned;
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "visited {}, copied {}, skipped {}, orphaned {}",
            self.visited, self.copied, self.skipped, self.orphaned
        )
    }
}

/// Replace the slave tree's content with a mirror of the master's.
pub fn synchronize<S, D>(master: &S, slave: &mut D) -> DocloneResult<SyncReport>
where
    S: DocumentTree,
    D: DocumentTree,
{
    let slave_root = slave.root();
    slave.clear(slave_root)?;

    let mut walker = Walker::new(master, slave);
    for child in master.children(master.root())? {
        walker.copy_node(child, Some(slave_root))?;
    }

    let report = walker.report;
    if report.orphaned > 0 {
        tracing::warn!(
            orphaned = report.orphaned,
            "table cell content was not mirrored (cells are never constructed)"
        );
    }
    tracing::debug!(%report, "synchronized tree");
    Ok(report)
}

/// Copy one master node (and, per policy, its subtree) under `parent`.
pub fn copy_node<S, D>(
    master: &S,
    source: S::NodeRef,
    slave: &mut D,
    parent: D::NodeRef,
) -> DocloneResult<SyncReport>
where
    S: DocumentTree,
    D: DocumentTree,
{
    let mut walker = Walker::new(master, slave);
    walker.copy_node(source, Some(parent))?;
    Ok(walker.report)
}

/// Open both documents, mirror master into slave, then save and close.
///
/// The master is only read and is closed without saving. The slave is
/// saved even when the walk fails part-way, so the stored document reflects
/// exactly what was written before the failure; the walk error is returned.
pub fn synchronize_documents<St: DocumentStore>(
    store: &St,
    master_id: &DocumentId,
    slave_id: &DocumentId,
) -> DocloneResult<SyncReport> {
    let master = store.open(master_id)?;
    let mut slave = store.open(slave_id)?;

    let span = tracing::debug_span!("sync", master = %master_id, slave = %slave_id);
    let _enter = span.enter();

    let outcome = synchronize(&master.tree, &mut slave.tree);
    store.close(master)?;

    match outcome {
        Ok(report) => {
            store.save_and_close(slave)?;
            tracing::info!(%report, "synchronized document");
            Ok(report)
        }
        Err(e) => {
            if let Err(save_err) = store.save_and_close(slave) {
                tracing::error!("failed to save partially synchronized slave: {save_err}");
            }
            Err(e)
        }
    }
}

struct Walker<'a, S: DocumentTree, D: DocumentTree> {
    master: &'a S,
    slave: &'a mut D,
    report: SyncReport,
}

impl<'a, S: DocumentTree, D: DocumentTree> Walker<'a, S, D> {
    fn new(master: &'a S, slave: &'a mut D) -> Self {
        Self {
            master,
            slave,
            report: SyncReport::default(),
        }
    }

    fn copy_node(&mut self, source: S::NodeRef, parent: Option<D::NodeRef>) -> DocloneResult<()> {
        self.report.visited += 1;
        let kind = self.master.kind(source)?;
        let policy = CopyPolicy::for_kind(kind);
        tracing::trace!(%kind, ?policy, n = self.report.visited, "visit");

        match policy {
            CopyPolicy::Unsupported => {
                self.report.skipped += 1;
            }
            CopyPolicy::LeafCopy => match parent {
                Some(parent) => {
                    let element = self.master.copy_deep(source)?;
                    self.slave.append(parent, element)?;
                    self.report.copied += 1;
                }
                None => self.report.orphaned += 1,
            },
            CopyPolicy::ContainerCopy => {
                let built = match parent {
                    Some(parent) => {
                        let shell = self.master.copy_shell(source)?;
                        let node = self.slave.append(parent, shell)?;
                        self.report.copied += 1;
                        Some(node)
                    }
                    None => {
                        self.report.orphaned += 1;
                        None
                    }
                };
                self.copy_children(source, built)?;
            }
            CopyPolicy::UnbuiltContainer => {
                tracing::debug!(%kind, "destination container not constructed; children have no parent");
                self.copy_children(source, None)?;
            }
        }
        Ok(())
    }

    fn copy_children(&mut self, source: S::NodeRef, parent: Option<D::NodeRef>) -> DocloneResult<()> {
        for child in self.master.children(source)? {
            self.copy_node(child, parent)?;
        }
        Ok(())
    }
}

/// Aggregate reports from several synchronizations.
pub fn total(reports: impl IntoIterator<Item = SyncReport>) -> SyncReport {
    let mut sum = SyncReport::default();
    for report in reports {
        sum.merge(report);
    }
    sum
}
