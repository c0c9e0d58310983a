use std::collections::HashSet;

use serde_json::Value;

use crate::{
    error::TemplateError,
    parser::{ast::{LimitSyntax, NodeId, NodeKind, Span, SyntaxTree}, Token},
    property::PropertyEvaluator,
    rewriter::{DeletionPropagator, Edit, ParamResolver, ResolveOptions, SpanRewriter, MARKER},
    template::ExecutionResult,
};

/// A bound value and the token index of the marker it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub anchor: usize,
    pub value: Value,
}

/// State of one `apply` call: the edits, the removed nodes and the values
/// bound so far. The tree and tokens are shared with the template and never
/// change.
pub struct RewriteSession<'a> {
    pub tree: &'a SyntaxTree,
    pub tokens: &'a [Token],
    pub param: &'a Value,
    pub evaluator: &'a dyn PropertyEvaluator,
    pub rewriter: SpanRewriter<'a>,
    pub deleted: HashSet<NodeId>,
    pub bindings: Vec<Binding>,
}

impl<'a> RewriteSession<'a> {
    pub fn new(tree: &'a SyntaxTree, tokens: &'a [Token], param: &'a Value, evaluator: &'a dyn PropertyEvaluator) -> Self {
        Self {
            tree,
            tokens,
            param,
            evaluator,
            rewriter: SpanRewriter::new(tokens),
            deleted: HashSet::new(),
            bindings: vec![],
        }
    }

    pub fn run(mut self) -> Result<ExecutionResult, TemplateError> {
        self.walk(self.tree.root())?;
        Ok(self.finish())
    }

    pub fn bind(&mut self, anchor: usize, value: Value) {
        self.bindings.push(Binding { anchor, value });
    }

    /// Values are ordered by the position of their marker in the output;
    /// the sort is stable so values sharing an anchor keep their order.
    pub fn finish(mut self) -> ExecutionResult {
        self.bindings.sort_by_key(|b| b.anchor);
        let values = self.bindings.into_iter().map(|b| b.value).collect();
        ExecutionResult::new(self.rewriter.render(), values)
    }

    pub fn walk(&mut self, id: NodeId) -> Result<(), TemplateError> {
        let tree = self.tree;

        match tree.kind(id) {
            NodeKind::Predicate(_) => self.simple_predicate(id),
            NodeKind::Between => self.between(id),
            NodeKind::In => self.in_predicate(id),
            NodeKind::Logical { .. } => {
                self.walk_children(id)?;
                if tree.children(id).iter().all(|c| self.deleted.contains(c)) && !self.deleted.contains(&id) {
                    DeletionPropagator::delete_expression(self, id)?;
                }
                Ok(())
            },
            NodeKind::Condition { keyword } => {
                self.walk_children(id)?;
                if tree.children(id).iter().any(|c| self.deleted.contains(c)) {
                    self.rewriter.apply(Edit::Delete(Span::single(*keyword)))?;
                    self.deleted.insert(id);
                    tracing::debug!("deleted empty condition at token {}", keyword);
                }
                Ok(())
            },
            NodeKind::JoinCondition { keyword } => {
                self.walk_children(id)?;
                if tree.children(id).iter().any(|c| self.deleted.contains(c)) {
                    return Err(TemplateError::EmptyJoinCondition { keyword: *keyword });
                }
                Ok(())
            },
            NodeKind::Limit(syntax) => self.limit(id, *syntax),
            NodeKind::SetClause => self.set_clause(id),
            NodeKind::Row => self.row(id),
            NodeKind::Placeholder(_) => {
                let resolver = ParamResolver::resolve(self, id, ResolveOptions::PREDICATE)?;
                resolver.substitute(self)
            },
            _ => self.walk_children(id),
        }
    }

    fn walk_children(&mut self, id: NodeId) -> Result<(), TemplateError> {
        let tree = self.tree;
        for child in tree.children(id) {
            self.walk(*child)?;
        }
        Ok(())
    }

    /// Sub-statements inside an expression are rewritten on their own.
    fn walk_nested(&mut self, id: NodeId) -> Result<(), TemplateError> {
        for statement in self.tree.nested_statements(id) {
            self.walk(statement)?;
        }
        Ok(())
    }

    fn child(&self, id: NodeId, position: usize) -> Result<NodeId, TemplateError> {
        self.tree
            .children(id)
            .get(position)
            .copied()
            .ok_or_else(|| TemplateError::invariant(format!("node {id} has no child {position}")))
    }

    fn simple_predicate(&mut self, id: NodeId) -> Result<(), TemplateError> {
        let resolver = ParamResolver::resolve(self, id, ResolveOptions::PREDICATE)?;

        if resolver.has_null_value() {
            return DeletionPropagator::delete_expression(self, id);
        }

        resolver.substitute(self)?;
        self.walk_nested(id)
    }

    /// Both bounds are resolved before anything is substituted, so a null
    /// upper bound does not leave a bound value for a removed lower one.
    fn between(&mut self, id: NodeId) -> Result<(), TemplateError> {
        let subject = self.child(id, 0)?;
        let lower = self.child(id, 1)?;
        let upper = self.child(id, 2)?;

        let lower_resolver = ParamResolver::resolve(self, lower, ResolveOptions::PREDICATE)?;
        if lower_resolver.has_null_value() {
            return DeletionPropagator::delete_expression(self, id);
        }

        let upper_resolver = ParamResolver::resolve(self, upper, ResolveOptions::PREDICATE)?;
        if upper_resolver.has_null_value() {
            return DeletionPropagator::delete_expression(self, id);
        }

        lower_resolver.substitute(self)?;
        upper_resolver.substitute(self)?;

        self.walk(subject)?;
        self.walk_nested(lower)?;
        self.walk_nested(upper)
    }

    fn in_predicate(&mut self, id: NodeId) -> Result<(), TemplateError> {
        let tree = self.tree;
        let subject = self.child(id, 0)?;
        let target = self.child(id, 1)?;

        if tree.is_statement(target) {
            self.walk(subject)?;
            return self.walk(target);
        }

        let items = tree.children(target);
        let mut survivors = 0;

        for (index, item) in items.iter().enumerate() {
            let resolver = ParamResolver::resolve(self, *item, ResolveOptions::PREDICATE)?;

            let removed = match (resolver.marker, resolver.value) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(_), Some(Value::Array(values))) if values.is_empty() => {
                    if resolver.is_required() {
                        return Err(TemplateError::EmptyCollection { name: resolver.name().to_string() });
                    }
                    true
                },
                (Some(marker), Some(Value::Array(values))) => {
                    let span = tree.span(marker);
                    self.rewriter.apply(Edit::Replace(span, vec![MARKER; values.len()].join(", ")))?;
                    for value in values {
                        self.bind(span.start, value.clone());
                    }
                    false
                },
                (Some(_), Some(_)) => {
                    resolver.substitute(self)?;
                    false
                },
            };

            if removed {
                DeletionPropagator::delete_separated(self, items, index, survivors > 0)?;
            } else {
                survivors += 1;
                self.walk_nested(*item)?;
            }
        }

        if survivors == 0 {
            return DeletionPropagator::delete_expression(self, id);
        }
        self.walk(subject)
    }

    fn limit(&mut self, id: NodeId, syntax: LimitSyntax) -> Result<(), TemplateError> {
        let (limit, offset) = match syntax {
            LimitSyntax::LimitOnly => (self.child(id, 0)?, None),
            LimitSyntax::OffsetComma => (self.child(id, 1)?, Some(self.child(id, 0)?)),
            LimitSyntax::OffsetKeyword => (self.child(id, 0)?, Some(self.child(id, 1)?)),
        };

        let limit_resolver = ParamResolver::resolve(self, limit, ResolveOptions::PREDICATE)?;
        if limit_resolver.has_null_value() {
            return DeletionPropagator::delete_node(self, id);
        }
        limit_resolver.substitute(self)?;

        let Some(offset) = offset else {
            return Ok(());
        };

        let offset_resolver = ParamResolver::resolve(self, offset, ResolveOptions::PREDICATE)?;
        if !offset_resolver.has_null_value() {
            return offset_resolver.substitute(self);
        }

        let limit_span = self.tree.span(limit);
        let offset_span = self.tree.span(offset);
        let span = match syntax {
            LimitSyntax::OffsetComma => Span::new(offset_span.start, limit_span.start - 1),
            _ => Span::new(limit_span.stop + 1, offset_span.stop),
        };

        self.rewriter.apply(Edit::Delete(span))?;
        self.deleted.insert(offset);
        tracing::debug!("deleted offset {:?}", span);
        Ok(())
    }

    /// A required SET value that is null is still bound, as `NULL`; only
    /// optional ones remove their assignment.
    fn set_clause(&mut self, id: NodeId) -> Result<(), TemplateError> {
        let tree = self.tree;
        let items = tree.children(id);
        let mut survivors = 0;

        for (index, item) in items.iter().enumerate() {
            let resolver = ParamResolver::resolve(self, *item, ResolveOptions::ASSIGNMENT)?;

            if resolver.has_null_value() && !resolver.is_required() {
                DeletionPropagator::delete_separated(self, items, index, survivors > 0)?;
                continue;
            }

            survivors += 1;
            resolver.substitute(self)?;
            self.walk_nested(*item)?;
        }

        if survivors == 0 {
            return Err(TemplateError::EmptySetClause);
        }
        Ok(())
    }

    /// One VALUES row. Array values turn the row into a batch: it is repeated
    /// once per element, element `i` going to copy `i` while scalar values
    /// repeat in every copy.
    fn row(&mut self, id: NodeId) -> Result<(), TemplateError> {
        let tree = self.tree;
        let items = tree.children(id);

        let resolvers = items
            .iter()
            .map(|item| ParamResolver::resolve(self, *item, ResolveOptions::INSERT_VALUE))
            .collect::<Result<Vec<_>, _>>()?;

        if resolvers.iter().all(|r| !r.is_defined()) {
            return Ok(());
        }

        if let Some(optional) = resolvers.iter().find(|r| r.is_defined() && !r.is_required()) {
            return Err(TemplateError::OptionalInsertValue { name: optional.name().to_string() });
        }

        let mut batch: Option<usize> = None;
        for resolver in &resolvers {
            let Some(Value::Array(values)) = resolver.value else {
                continue;
            };
            if values.is_empty() {
                return Err(TemplateError::EmptyCollection { name: resolver.name().to_string() });
            }
            match batch {
                Some(expected) if expected != values.len() => {
                    return Err(TemplateError::InconsistentBatchSize { expected, found: values.len() });
                },
                _ => batch = Some(values.len()),
            }
        }
        let copies = batch.unwrap_or(1);

        let expressions = items
            .iter()
            .zip(&resolvers)
            .map(|(item, resolver)| self.expression_text(*item, resolver.marker))
            .collect::<Vec<_>>();
        let row_text = format!("({})", expressions.join(", "));

        let span = tree.span(id);
        self.rewriter.apply(Edit::Replace(span, vec![row_text; copies].join(", ")))?;

        for copy in 0..copies {
            for resolver in resolvers.iter().filter(|r| r.is_defined()) {
                let value = match resolver.value {
                    Some(Value::Array(values)) => values.get(copy).cloned().unwrap_or(Value::Null),
                    Some(value) => value.clone(),
                    None => Value::Null,
                };
                self.bind(span.start, value);
            }
        }

        tracing::debug!("expanded row {:?} into {} copies", span, copies);
        Ok(())
    }

    /// Source text of an expression with its marker turned into `?`.
    fn expression_text(&self, id: NodeId, marker: Option<NodeId>) -> String {
        let span = self.tree.span(id);
        let marker = marker.map(|m| self.tree.span(m));

        span.indices()
            .filter(|i| marker.is_none_or(|m| !m.contains(*i) || *i == m.start))
            .map(|i| match marker {
                Some(m) if i == m.start => MARKER,
                _ => self.tokens[i].text.as_str(),
            })
            .collect()
    }
}
