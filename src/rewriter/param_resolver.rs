use serde_json::Value;

use crate::{
    error::TemplateError,
    parser::ast::{NodeId, Placeholder},
    property::Resolved,
    rewriter::{Edit, RewriteSession},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// fail when a required marker resolves to null
    pub check_required: bool,
    /// also look for the marker inside nested statements
    pub cross_statements: bool,
}

impl ResolveOptions {
    pub const PREDICATE: ResolveOptions = ResolveOptions { check_required: true, cross_statements: false };
    pub const ASSIGNMENT: ResolveOptions = ResolveOptions { check_required: false, cross_statements: false };
    pub const INSERT_VALUE: ResolveOptions = ResolveOptions { check_required: false, cross_statements: true };
}

/// The marker of one node and the value it resolves to.
#[derive(Debug, Clone, Copy)]
pub struct ParamResolver<'a> {
    pub marker: Option<NodeId>,
    pub placeholder: Option<&'a Placeholder>,
    pub value: Option<&'a Value>,
}

impl<'a> ParamResolver<'a> {
    pub fn resolve(session: &RewriteSession<'a>, node: NodeId, options: ResolveOptions) -> Result<Self, TemplateError> {
        let tree = session.tree;
        let markers = tree.placeholders_within(node, options.cross_statements);

        let marker = match markers.as_slice() {
            [] => return Ok(Self { marker: None, placeholder: None, value: None }),
            [marker] => *marker,
            _ => return Err(TemplateError::MultiplePlaceholders { count: markers.len() }),
        };

        let Some(placeholder) = tree.placeholder(marker) else {
            return Err(TemplateError::invariant(format!("node {marker} is not a placeholder")));
        };

        let resolved = session
            .evaluator
            .evaluate(session.param, &placeholder.path)
            .map_err(|source| TemplateError::Path { name: placeholder.name().to_string(), source })?;

        let value = match resolved {
            Resolved::Value(value) => Some(value),
            Resolved::Null | Resolved::Missing => None,
        };

        if options.check_required && placeholder.required && value.is_none() {
            return Err(TemplateError::RequiredParameter { name: placeholder.name().to_string() });
        }

        Ok(Self { marker: Some(marker), placeholder: Some(placeholder), value })
    }

    pub fn is_defined(&self) -> bool {
        self.marker.is_some()
    }

    pub fn has_null_value(&self) -> bool {
        self.marker.is_some() && self.value.is_none()
    }

    pub fn is_required(&self) -> bool {
        self.placeholder.is_some_and(|p| p.required)
    }

    pub fn name(&self) -> &'a str {
        self.placeholder.map(|p| p.name()).unwrap_or_default()
    }

    /// Replace the marker with `?` and bind its value, `null` when absent.
    pub fn substitute(&self, session: &mut RewriteSession<'a>) -> Result<(), TemplateError> {
        let Some(marker) = self.marker else {
            return Ok(());
        };

        let span = session.tree.span(marker);
        session.rewriter.apply(Edit::Marker(span))?;
        session.bind(span.start, self.value.cloned().unwrap_or(Value::Null));

        tracing::trace!("substituted '{}' at token {}", self.name(), span.start);
        Ok(())
    }
}
