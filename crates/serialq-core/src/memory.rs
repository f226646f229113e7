//! Memory estimation and introspection
//!
//! Buffered tasks are accounted so the host process can enforce memory
//! budgets. Two surfaces:
//!
//! - [`EstimateMemory`] - flat per-object byte estimate
//! - [`MemoryNode`] - named tree collector for structured reports,
//!   filled in recursively by components that expose nested accounting

use core::fmt;

/// Estimated memory footprint of an object, in bytes.
///
/// Estimates, not exact allocator numbers: a queued closure reports the
/// size of its captured state, a queue reports its preallocated ring
/// plus whatever is buffered.
pub trait EstimateMemory {
    fn memory_usage(&self) -> usize;
}

/// One node of a structured memory report.
///
/// Components describe themselves into a child node
/// (`component.describe_memory(report.add_child("name"))`) and the
/// caller reads back [`MemoryNode::total`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryNode {
    name: String,
    bytes: usize,
    children: Vec<MemoryNode>,
}

impl MemoryNode {
    /// Create a root node for a new report
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: 0,
            children: Vec::new(),
        }
    }

    /// Append a named child node and return it for filling in
    pub fn add_child(&mut self, name: impl Into<String>) -> &mut MemoryNode {
        self.children.push(MemoryNode::root(name));
        self.children
            .last_mut()
            .expect("child was just pushed")
    }

    /// Set the bytes attributed directly to this node (not its children)
    pub fn set_bytes(&mut self, bytes: usize) {
        self.bytes = bytes;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes attributed directly to this node
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn children(&self) -> &[MemoryNode] {
        &self.children
    }

    /// Total usage of this node and all descendants
    pub fn total(&self) -> usize {
        self.bytes + self.children.iter().map(MemoryNode::total).sum::<usize>()
    }
}

impl fmt::Display for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render(node: &MemoryNode, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "{:indent$}{}: {} bytes", "", node.name, node.bytes, indent = depth * 2)?;
            for child in &node.children {
                render(child, depth + 1, f)?;
            }
            Ok(())
        }
        render(self, 0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = MemoryNode::root("process");
        assert_eq!(report.total(), 0);
        assert_eq!(report.name(), "process");
        assert!(report.children().is_empty());
    }

    #[test]
    fn test_nested_totals() {
        let mut report = MemoryNode::root("process");
        report.set_bytes(16);

        let queue = report.add_child("queue");
        queue.set_bytes(100);
        queue.add_child("buffered").set_bytes(24);

        report.add_child("sink").set_bytes(8);

        assert_eq!(report.total(), 16 + 100 + 24 + 8);
        assert_eq!(report.children()[0].total(), 124);
    }

    #[test]
    fn test_display_renders_all_nodes() {
        let mut report = MemoryNode::root("process");
        report.add_child("queue").set_bytes(42);

        let rendered = format!("{}", report);
        assert!(rendered.contains("process: 0 bytes"));
        assert!(rendered.contains("  queue: 42 bytes"));
    }
}
