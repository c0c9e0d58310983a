// SELECT p.id, (SELECT count(*) FROM Orders o WHERE o.person_id = p.id AND o.status = ?{status}) total
// FROM People p
// WHERE p.city = ?{city} AND p.id IN (#{ids})
// ORDER BY p.full_name
// LIMIT ?{offset}, #{limit}
//
// Only the clauses that can lose parts when a value is null get a structure
// of their own. Everything else is kept as `Segment` nodes that only record
// which placeholders and sub-statements they contain.

use crate::parser::{
    ast::{ConditionParser, LimitAndOffsetParser, NodeId, NodeKind, ParamParser, SetParser, Span, StatementKind, ValuesParser},
    ParseError, QueryParser, TokenKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Condition,
    Limit,
    Set,
    Values,
}

pub struct StatementParser;

impl StatementParser {
    pub fn kind(parser: &QueryParser) -> StatementKind {
        let comparers = &parser.comparers;
        if comparers.select.compare(parser) || comparers.with.compare(parser) {
            StatementKind::Select
        } else if comparers.insert.compare(parser) || comparers.replace.compare(parser) {
            StatementKind::Insert
        } else if comparers.update.compare(parser) {
            StatementKind::Update
        } else if comparers.delete.compare(parser) {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }

    fn clause(parser: &QueryParser, kind: StatementKind) -> Option<Clause> {
        if ConditionParser::is_condition_start(parser)
            || (kind != StatementKind::Other && ConditionParser::is_join_condition_start(parser))
        {
            Some(Clause::Condition)
        } else if parser.comparers.limit.compare(parser) {
            Some(Clause::Limit)
        } else if matches!(kind, StatementKind::Update | StatementKind::Insert) && parser.comparers.set.compare(parser) {
            Some(Clause::Set)
        } else if kind == StatementKind::Insert && ValuesParser::is_values_start(parser) {
            Some(Clause::Values)
        } else {
            None
        }
    }

    /// Parse one statement. A `nested` statement ends before the `)` that
    /// closes it, which is left for the caller to consume.
    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>, nested: bool) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;
        let kind = StatementParser::kind(parser);
        let statement = parser.tree.push(NodeKind::Statement(kind), Span::single(pivot), parent);

        let mut segment: Option<NodeId> = None;
        let mut depth = 0usize;

        while let Some(token) = parser.current() {
            if depth == 0 {
                if token.kind == TokenKind::RightParen {
                    if nested {
                        break;
                    }
                    return ParseError::new("Unbalanced parenthesis", pivot, parser).err();
                }

                if let Some(clause) = StatementParser::clause(parser, kind) {
                    segment = None;
                    match clause {
                        Clause::Condition => ConditionParser::parse(parser, Some(statement))?,
                        Clause::Limit => LimitAndOffsetParser::parse(parser, Some(statement))?,
                        Clause::Set => SetParser::parse(parser, Some(statement))?,
                        Clause::Values => ValuesParser::parse(parser, Some(statement))?,
                    };
                    continue;
                }
            }

            let index = parser.peek_index(0).unwrap_or(parser.position);
            let current = *segment.get_or_insert_with(|| {
                parser.tree.push(NodeKind::Segment, Span::single(index), Some(statement))
            });

            match token.kind {
                TokenKind::LeftParen if parser.is_subquery_start() => {
                    parser.next();
                    StatementParser::parse(parser, Some(current), true)?;
                    parser.expect(TokenKind::RightParen, "Unbalanced parenthesis")?;
                },
                TokenKind::Placeholder => {
                    ParamParser::parse(parser, Some(current))?;
                },
                TokenKind::LeftParen => {
                    depth += 1;
                    parser.next();
                },
                TokenKind::RightParen => {
                    depth -= 1;
                    parser.next();
                },
                _ => {
                    parser.next();
                },
            }
            parser.tree.extend(current, parser.previous);
        }

        if depth > 0 {
            return ParseError::new("Unbalanced parenthesis", pivot, parser).err();
        }

        parser.tree.set_stop(statement, parser.previous);
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::{LimitSyntax, NodeKind, StatementKind, StatementParser}, QueryParser, SqlLexer};

    fn kinds(text: &str) -> Vec<NodeKind> {
        let tokens = SqlLexer::tokenize(text).expect("Failed to tokenize");
        let mut parser = QueryParser::new(&tokens);
        let id = StatementParser::parse(&mut parser, None, false).expect("Failed to parse statement");
        assert!(parser.eof());
        parser.tree.children(id).iter().map(|c| parser.tree.kind(*c).clone()).collect()
    }

    #[test]
    pub fn test_select_clauses() {
        let text = r#"
SELECT p.id, p.full_name
FROM People p
WHERE p.city = ?{city}
ORDER BY p.full_name
LIMIT ?{limit} OFFSET ?{offset}
        "#;

        let result = kinds(text);

        assert_eq!(result.len(), 4);
        assert_eq!(result[0], NodeKind::Segment);
        assert!(matches!(result[1], NodeKind::Condition { .. }));
        assert_eq!(result[2], NodeKind::Segment);
        assert_eq!(result[3], NodeKind::Limit(LimitSyntax::OffsetKeyword));
    }

    #[test]
    pub fn test_update_clauses() {
        let result = kinds("UPDATE People SET name = ?{name} WHERE id = #{id}");

        assert_eq!(result.len(), 3);
        assert_eq!(result[1], NodeKind::SetClause);
    }

    #[test]
    pub fn test_insert_clauses() {
        let result = kinds("INSERT INTO People (name, city) VALUES (#{name}, #{city})");

        assert_eq!(result, vec![NodeKind::Segment, NodeKind::Values]);
    }

    #[test]
    pub fn test_join_conditions() {
        let result = kinds("SELECT * FROM t JOIN s ON s.id = t.id LEFT JOIN u ON u.k = ?{k} WHERE t.a = 1");

        assert_eq!(result.len(), 5);
        assert_eq!(result[0], NodeKind::Segment);
        assert!(matches!(result[1], NodeKind::JoinCondition { .. }));
        assert_eq!(result[2], NodeKind::Segment);
        assert!(matches!(result[3], NodeKind::JoinCondition { .. }));
        assert!(matches!(result[4], NodeKind::Condition { .. }));
    }

    #[test]
    pub fn test_on_duplicate_key_is_plain_text() {
        let result = kinds("INSERT INTO t (a) VALUES (#{a}) ON DUPLICATE KEY UPDATE a = #{a}");

        assert_eq!(result, vec![NodeKind::Segment, NodeKind::Values, NodeKind::Segment]);
    }

    #[test]
    pub fn test_set_outside_update_is_plain_text() {
        let result = kinds("SELECT * FROM t ORDER BY 1");

        assert_eq!(result, vec![NodeKind::Segment]);
    }

    #[test]
    pub fn test_nested_statement_in_projection() {
        let text = "SELECT (SELECT max(v) FROM t WHERE t.a = ?{a}) m, #{b} FROM x";
        let tokens = SqlLexer::tokenize(text).expect("Failed to tokenize");
        let mut parser = QueryParser::new(&tokens);

        let id = StatementParser::parse(&mut parser, None, false).expect("Failed to parse statement");

        assert_eq!(parser.tree.kind(id), &NodeKind::Statement(StatementKind::Select));
        let nested = parser.tree.nested_statements(id);
        assert_eq!(nested.len(), 1);
        assert_eq!(parser.tree.placeholders_within(nested[0], false).len(), 1);
        assert_eq!(parser.tree.placeholders_within(id, false).len(), 1);
    }

    #[test]
    pub fn test_stray_close_paren() {
        let tokens = SqlLexer::tokenize("SELECT a) FROM t").expect("Failed to tokenize");
        let mut parser = QueryParser::new(&tokens);

        let result = StatementParser::parse(&mut parser, None, false);

        match result {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "Unbalanced parenthesis"),
        }
    }
}
