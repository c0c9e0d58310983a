use crate::parser::{QueryParser, Token, TokenKind, WordComparer};

#[derive(Debug)]
pub struct QueryComparers {
    pub select: WordComparer,
    pub with: WordComparer,
    pub insert: WordComparer,
    pub replace: WordComparer,
    pub update: WordComparer,
    pub delete: WordComparer,
    pub r#where: WordComparer,
    pub having: WordComparer,
    pub on: WordComparer,
    pub on_duplicate: WordComparer,
    pub limit: WordComparer,
    pub offset: WordComparer,
    pub set: WordComparer,
    pub values: WordComparer,
    pub value: WordComparer,
    pub and: WordComparer,
    pub or: WordComparer,
    pub xor: WordComparer,
    pub not: WordComparer,
    pub is: WordComparer,
    pub between: WordComparer,
    pub r#in: WordComparer,
    pub like: WordComparer,
    pub regexp: WordComparer,
    pub rlike: WordComparer,
    pub sounds_like: WordComparer,
    pub escape: WordComparer,
    pub case: WordComparer,
    pub end: WordComparer,
    /// keywords that end an expression and open the next clause
    pub clause_boundaries: Vec<WordComparer>,
    /// keywords that start the next table of a FROM list
    pub join_boundaries: Vec<WordComparer>,
    /// keywords that may follow a complete operand inside a predicate
    pub operand_continuations: Vec<WordComparer>,
}

impl Default for QueryComparers {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryComparers {
    pub fn new() -> Self {
        Self {
            select: WordComparer::new("SELECT"),
            with: WordComparer::new("WITH"),
            insert: WordComparer::new("INSERT"),
            replace: WordComparer::new("REPLACE"),
            update: WordComparer::new("UPDATE"),
            delete: WordComparer::new("DELETE"),
            r#where: WordComparer::new("WHERE"),
            having: WordComparer::new("HAVING"),
            on: WordComparer::new("ON"),
            on_duplicate: WordComparer::new("ON DUPLICATE"),
            limit: WordComparer::new("LIMIT"),
            offset: WordComparer::new("OFFSET"),
            set: WordComparer::new("SET"),
            values: WordComparer::new("VALUES"),
            value: WordComparer::new("VALUE"),
            and: WordComparer::new("AND"),
            or: WordComparer::new("OR"),
            xor: WordComparer::new("XOR"),
            not: WordComparer::new("NOT"),
            is: WordComparer::new("IS"),
            between: WordComparer::new("BETWEEN"),
            r#in: WordComparer::new("IN"),
            like: WordComparer::new("LIKE"),
            regexp: WordComparer::new("REGEXP"),
            rlike: WordComparer::new("RLIKE"),
            sounds_like: WordComparer::new("SOUNDS LIKE"),
            escape: WordComparer::new("ESCAPE"),
            case: WordComparer::new("CASE"),
            end: WordComparer::new("END"),
            clause_boundaries: [
                "WHERE", "FROM", "GROUP", "ORDER", "HAVING", "LIMIT", "UNION", "EXCEPT",
                "INTERSECT", "WINDOW", "FOR", "LOCK", "RETURNING", "ON",
            ]
            .into_iter()
            .map(WordComparer::new)
            .collect(),
            join_boundaries: [
                "JOIN", "INNER JOIN", "LEFT JOIN", "LEFT OUTER", "RIGHT JOIN", "RIGHT OUTER", "CROSS JOIN",
                "FULL JOIN", "FULL OUTER", "NATURAL", "STRAIGHT_JOIN", "USING",
            ]
            .into_iter()
            .map(WordComparer::new)
            .collect(),
            operand_continuations: [
                "IS", "IN", "NOT", "BETWEEN", "LIKE", "REGEXP", "RLIKE", "SOUNDS", "COLLATE", "DIV", "MOD",
            ]
            .into_iter()
            .map(WordComparer::new)
            .collect(),
        }
    }

    pub fn is_clause_boundary(&self, parser: &QueryParser) -> bool {
        self.clause_boundaries.iter().any(|c| c.compare(parser)) || self.join_boundaries.iter().any(|c| c.compare(parser))
    }

    pub fn is_logical_operator(&self, parser: &QueryParser) -> bool {
        self.and.compare(parser)
            || self.or.compare(parser)
            || self.xor.compare(parser)
            || parser.current().is_some_and(|t| t.is_operator("&&") || t.is_operator("||"))
    }

    pub fn is_predicate_keyword(&self, parser: &QueryParser) -> bool {
        self.is_logical_operator(parser)
            || self.not.compare(parser)
            || self.is.compare(parser)
            || self.between.compare(parser)
            || self.r#in.compare(parser)
            || self.like.compare(parser)
            || self.regexp.compare(parser)
            || self.rlike.compare(parser)
            || self.sounds_like.compare(parser)
            || self.escape.compare(parser)
    }

    /// Whether `token`, found right after a parenthesized group, means the
    /// group was the first operand of a predicate rather than a nested
    /// boolean expression.
    pub fn continues_operand(&self, token: &Token) -> bool {
        if token.is_operator("&&") || token.is_operator("||") {
            return false;
        }
        token.kind == TokenKind::Operator
            || self.operand_continuations.iter().any(|c| c.compare_token(token))
    }

    pub fn is_negated_predicate(&self, parser: &QueryParser) -> bool {
        self.not.compare(parser)
            && (self.r#in.compare_from(parser, 1)
                || self.like.compare_from(parser, 1)
                || self.between.compare_from(parser, 1)
                || self.regexp.compare_from(parser, 1)
                || self.rlike.compare_from(parser, 1))
    }
}
