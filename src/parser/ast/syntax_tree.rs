use crate::parser::ast::{Node, NodeId, NodeKind, Placeholder, Span};

/// Arena holding every node of a parsed template. Nodes refer to each other
/// by index, children are kept in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn push(&mut self, kind: NodeKind, span: Span, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { kind, span, parent, children: vec![] });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    /// Insert a new node between `child` and its parent, taking the child's
    /// slot in the parent's children. Used when the parser only learns what
    /// a construct is after reading its first operand.
    pub fn wrap(&mut self, child: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        let parent = self.nodes[child].parent;
        let span = self.nodes[child].span;

        self.nodes.push(Node { kind, span, parent, children: vec![child] });
        self.nodes[child].parent = Some(id);

        if let Some(parent) = parent {
            if let Some(slot) = self.nodes[parent].children.iter_mut().find(|c| **c == child) {
                *slot = id;
            }
        }
        if self.root == child {
            self.root = id;
        }
        id
    }

    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id].span = span;
    }

    pub fn set_stop(&mut self, id: NodeId, stop: usize) {
        self.nodes[id].span.stop = stop;
    }

    /// Grow the span of `id` so that it covers token `index`.
    pub fn extend(&mut self, id: NodeId, index: usize) {
        let span = &mut self.nodes[id].span;
        span.start = span.start.min(index);
        span.stop = span.stop.max(index);
    }

    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id].kind = kind;
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn placeholder(&self, id: NodeId) -> Option<&Placeholder> {
        match &self.nodes[id].kind {
            NodeKind::Placeholder(placeholder) => Some(placeholder),
            _ => None,
        }
    }

    pub fn is_statement(&self, id: NodeId) -> bool {
        matches!(self.nodes[id].kind, NodeKind::Statement(_))
    }

    /// Placeholder nodes under `id` (itself included) in source order. Unless
    /// `cross_statements` is set, nested statements are not entered.
    pub fn placeholders_within(&self, id: NodeId, cross_statements: bool) -> Vec<NodeId> {
        let mut found = vec![];
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if current != id && !cross_statements && self.is_statement(current) {
                continue;
            }
            if self.placeholder(current).is_some() {
                found.push(current);
            }
            stack.extend(self.nodes[current].children.iter().rev());
        }

        found
    }

    /// The closest statements nested below `id`.
    pub fn nested_statements(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = vec![];
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            if self.is_statement(current) {
                found.push(current);
                continue;
            }
            stack.extend(self.nodes[current].children.iter().rev());
        }

        found
    }
}
