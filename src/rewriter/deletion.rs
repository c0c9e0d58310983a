use crate::{
    error::TemplateError,
    parser::ast::{NodeId, NodeKind, Span},
    rewriter::{Edit, RewriteSession},
};

pub struct DeletionPropagator;

impl DeletionPropagator {
    /// Remove a boolean sub-expression. Walks up through parentheses and
    /// `NOT` until it reaches either a logical operator, whose operator token
    /// goes away together with the operand, or a WHERE/HAVING/ON clause.
    pub fn delete_expression(session: &mut RewriteSession, node: NodeId) -> Result<(), TemplateError> {
        let tree = session.tree;
        let mut current = node;

        loop {
            let Some(parent) = tree.parent(current) else {
                return Err(TemplateError::invariant(format!("deletion of node {node} reached the root")));
            };

            match tree.kind(parent) {
                NodeKind::Logical { operator, .. } => {
                    session.rewriter.apply(Edit::Delete(Span::single(*operator)))?;
                    return Self::delete_node(session, current);
                },
                NodeKind::Condition { .. } | NodeKind::JoinCondition { .. } => {
                    return Self::delete_node(session, current);
                },
                NodeKind::Statement(_) => {
                    return Err(TemplateError::invariant(format!(
                        "deletion of node {node} left its statement without a condition"
                    )));
                },
                _ => current = parent,
            }
        }
    }

    pub fn delete_node(session: &mut RewriteSession, node: NodeId) -> Result<(), TemplateError> {
        let span = session.tree.span(node);
        session.rewriter.apply(Edit::Delete(span))?;
        session.deleted.insert(node);

        tracing::debug!("deleted {:?} {:?}", session.tree.kind(node), span);
        Ok(())
    }

    /// Remove `items[index]` from a comma separated list, together with the
    /// comma before it when an earlier item survives, the comma after it
    /// otherwise.
    pub fn delete_separated(
        session: &mut RewriteSession,
        items: &[NodeId],
        index: usize,
        survivor_before: bool,
    ) -> Result<(), TemplateError> {
        let tree = session.tree;
        let item = tree.span(items[index]);
        let previous = index.checked_sub(1).map(|i| tree.span(items[i]));
        let next = items.get(index + 1).map(|i| tree.span(*i));

        let span = match (previous, next) {
            (Some(previous), _) if survivor_before => Span::new(previous.stop + 1, item.stop),
            (_, Some(next)) => Span::new(item.start, next.start - 1),
            (Some(previous), None) => Span::new(previous.stop + 1, item.stop),
            (None, None) => item,
        };

        session.rewriter.apply(Edit::Delete(span))?;
        session.deleted.insert(items[index]);

        tracing::debug!("deleted list item {} of {} {:?}", index + 1, items.len(), span);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        parser::{ast::{NodeKind, PredicateKind}, QueryParser},
        property::JsonEvaluator,
        rewriter::{DeletionPropagator, RewriteSession},
    };

    #[test]
    pub fn test_delete_through_parens_and_not() {
        let text = "SELECT * FROM t WHERE x = 1 AND NOT (a = ?{a})";
        let (tokens, tree) = QueryParser::parse_template(text).expect("Failed to parse template");
        let param = json!({});
        let evaluator = JsonEvaluator::default();
        let mut session = RewriteSession::new(&tree, &tokens, &param, &evaluator);

        let predicate = (0..tree.len())
            .filter(|id| tree.kind(*id) == &NodeKind::Predicate(PredicateKind::Comparison))
            .last()
            .expect("Expected a predicate");
        DeletionPropagator::delete_expression(&mut session, predicate).expect("Failed to delete");

        assert_eq!(session.rewriter.render(), "SELECT * FROM t WHERE x = 1");
        assert_eq!(session.deleted.len(), 1);
    }

    #[test]
    pub fn test_delete_at_root_is_an_error() {
        let (tokens, tree) = QueryParser::parse_template("SELECT ?{a}").expect("Failed to parse template");
        let param = json!({});
        let evaluator = JsonEvaluator::default();
        let mut session = RewriteSession::new(&tree, &tokens, &param, &evaluator);

        let placeholder = tree.placeholders_within(tree.root(), true)[0];

        assert!(DeletionPropagator::delete_expression(&mut session, placeholder).is_err());
    }
}
