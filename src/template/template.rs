use std::{fmt, str::FromStr};

use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::{
    error::TemplateError,
    parser::{ast::SyntaxTree, QueryParser, SqlLexer, Token, TokenKind},
    property::{JsonEvaluator, PropertyEvaluator},
    rewriter::RewriteSession,
    template::{ExecutionResult, ParamInfo, TemplateConfig},
};

/// A parsed SQL template. Immutable once built and safe to share between
/// threads; every `apply` works on its own session.
pub struct Template {
    sql: String,
    tokens: Vec<Token>,
    tree: SyntaxTree,
    config: TemplateConfig,
    placeholders: OnceCell<IndexSet<ParamInfo>>,
    #[cfg(test)]
    extractions: std::sync::atomic::AtomicUsize,
}

impl Template {
    pub fn parse(sql: &str) -> Result<Self, TemplateError> {
        Self::parse_with_config(sql, TemplateConfig::default())
    }

    pub fn parse_with_config(sql: &str, config: TemplateConfig) -> Result<Self, TemplateError> {
        let (tokens, tree) = QueryParser::parse_template(sql)?;

        Ok(Self {
            sql: sql.to_string(),
            tokens,
            tree,
            config,
            placeholders: OnceCell::new(),
            #[cfg(test)]
            extractions: std::sync::atomic::AtomicUsize::new(0),
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Placeholders of the template in order of first appearance. Computed on
    /// first use, then cached.
    pub fn placeholders(&self) -> &IndexSet<ParamInfo> {
        self.placeholders.get_or_init(|| {
            #[cfg(test)]
            self.extractions.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

            ParamInfo::collect(&self.tree)
        })
    }

    pub fn apply(&self, param: &Value) -> Result<ExecutionResult, TemplateError> {
        let evaluator = JsonEvaluator::new(self.config.strict_paths);
        self.apply_with(param, &evaluator)
    }

    pub fn apply_with(&self, param: &Value, evaluator: &dyn PropertyEvaluator) -> Result<ExecutionResult, TemplateError> {
        let session = RewriteSession::new(&self.tree, &self.tokens, param, evaluator);
        let result = session.run()?;

        if self.config.verify_output {
            Self::verify(&result)?;
        }

        tracing::debug!("applied template: {} with {} values", result.sql, result.values.len());
        Ok(result)
    }

    /// Re-lex the output: no placeholder may survive and the number of `?`
    /// markers must match the bound values.
    fn verify(result: &ExecutionResult) -> Result<(), TemplateError> {
        let tokens = SqlLexer::tokenize(&result.sql)
            .map_err(|err| TemplateError::invariant(format!("output does not lex: {err}")))?;

        if let Some(token) = tokens.iter().find(|t| t.kind == TokenKind::Placeholder) {
            return Err(TemplateError::invariant(format!("unresolved placeholder {} in output", token.text)));
        }

        let markers = tokens.iter().filter(|t| t.kind == TokenKind::Question).count();
        if markers != result.values.len() {
            return Err(TemplateError::invariant(format!(
                "output has {} markers for {} values",
                markers,
                result.values.len()
            )));
        }
        Ok(())
    }
}

impl TryFrom<&str> for Template {
    type Error = TemplateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Template::parse(value)
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::parse(s)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("sql", &self.sql)
            .field("config", &self.config)
            .field("nodes", &self.tree.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::Ordering, Arc};

    use indexmap::IndexSet;
    use serde_json::json;

    use crate::{
        error::TemplateError,
        template::{ParamInfo, Template, TemplateConfig},
    };

    #[test]
    pub fn test_placeholders_in_order() {
        let template = Template::parse(
            "SELECT * FROM t WHERE a = ?{a} AND b IN (SELECT id FROM u WHERE c = #{c}) AND d = ?{a}",
        )
        .expect("Failed to parse template");

        let expected: IndexSet<ParamInfo> = [ParamInfo::new("a", false), ParamInfo::new("c", true)].into_iter().collect();
        assert_eq!(template.placeholders(), &expected);
        assert_eq!(template.placeholders().get_index(1), Some(&ParamInfo::new("c", true)));
    }

    #[test]
    pub fn test_placeholders_cached_across_threads() {
        let template = Arc::new(Template::parse("SELECT * FROM t WHERE a = ?{a}").expect("Failed to parse template"));

        let handles = (0..8)
            .map(|_| {
                let template = Arc::clone(&template);
                std::thread::spawn(move || template.placeholders().len())
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().expect("Thread panicked"), 1);
        }
        assert_eq!(template.extractions.load(Ordering::SeqCst), 1);
    }

    #[test]
    pub fn test_apply() {
        let template: Template = "SELECT * FROM t WHERE a = ?{a} AND b = #{b}".parse().expect("Failed to parse template");

        let result = template.apply(&json!({ "a": null, "b": 2 })).expect("Failed to apply");

        assert_eq!(result.sql, "SELECT * FROM t WHERE b = ?");
        assert_eq!(result.values, vec![json!(2)]);
    }

    #[test]
    pub fn test_strict_paths() {
        let template = Template::parse_with_config("SELECT * FROM t WHERE a = ?{a}", TemplateConfig::strict())
            .expect("Failed to parse template");

        let result = template.apply(&json!({}));

        assert!(matches!(result, Err(TemplateError::Path { .. })));
    }

    #[test]
    pub fn test_parse_error() {
        let result = Template::try_from("SELECT * FROM t WHERE a = #{1a}");

        match result {
            Ok(_) => panic!(),
            Err(TemplateError::Parse(err)) => assert_eq!(err.text, "#{1a}"),
            Err(_) => panic!(),
        }
    }

    #[test]
    pub fn test_question_mark_in_literal_is_not_a_marker() {
        let template = Template::parse("SELECT '?' FROM t WHERE a = #{a}").expect("Failed to parse template");

        let result = template.apply(&json!({ "a": 1 })).expect("Failed to apply");

        assert_eq!(result.sql, "SELECT '?' FROM t WHERE a = ?");
        assert_eq!(result.values.len(), 1);
    }
}
