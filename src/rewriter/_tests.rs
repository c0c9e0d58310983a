#[cfg(test)]
pub mod fixtures {
    use std::{sync::Arc, thread};

    use serde_json::{json, Value};

    use crate::{error::TemplateError, parser::{SqlLexer, TokenKind}, template::{ExecutionResult, Template}};

    pub fn run(sql: &str, param: Value) -> ExecutionResult {
        Template::parse(sql)
            .expect("template should parse")
            .apply(&param)
            .unwrap_or_else(|err| panic!("apply failed for {sql}: {err}"))
    }

    pub fn run_err(sql: &str, param: Value) -> TemplateError {
        match Template::parse(sql).expect("template should parse").apply(&param) {
            Ok(result) => panic!("expected an error, got {result:?}"),
            Err(err) => err,
        }
    }

    pub fn find_people_sql() -> &'static str {
        r#"SELECT p.id, p.full_name
FROM People p
WHERE p.city = ?{city} AND p.age >= ?{min_age} AND p.vip = ?{vip}
ORDER BY p.full_name"#
    }

    // --- WHERE / HAVING ---------------------------------------------------

    #[test]
    fn sole_condition_null_removes_where() {
        let result = run("SELECT * FROM People WHERE city = ?{city} ORDER BY full_name", json!({}));

        assert_eq!(result.sql, "SELECT * FROM People ORDER BY full_name");
        assert!(result.values.is_empty());
    }

    #[test]
    fn optional_null_removes_predicate_and_operator() {
        let result = run("SELECT * FROM People WHERE city = ?{city} AND age > #{age}", json!({ "age": 30 }));

        assert_eq!(result.sql, "SELECT * FROM People WHERE age > ?");
        assert_eq!(result.values, vec![json!(30)]);
    }

    #[test]
    fn middle_conjunct_null() {
        let result = run(
            "SELECT * FROM t WHERE a = ?{a} AND b = ?{b} AND c = ?{c}",
            json!({ "a": 1, "c": 3 }),
        );

        assert_eq!(result.sql, "SELECT * FROM t WHERE a = ? AND c = ?");
        assert_eq!(result.values, vec![json!(1), json!(3)]);
    }

    #[test]
    fn every_conjunct_null_cascades_to_the_keyword() {
        let result = run(find_people_sql(), json!({ "city": null, "vip": null }));

        assert_eq!(result.sql, "SELECT p.id, p.full_name\nFROM People p\nORDER BY p.full_name");
        assert!(result.values.is_empty());
    }

    #[test]
    fn each_combination_of_nulls_is_well_formed() {
        for mask in 0..8u8 {
            let param = json!({
                "city": if mask & 1 != 0 { json!("Porto") } else { Value::Null },
                "min_age": if mask & 2 != 0 { json!(30) } else { Value::Null },
                "vip": if mask & 4 != 0 { json!(true) } else { Value::Null },
            });

            let result = run(find_people_sql(), param);

            let tokens = SqlLexer::tokenize(&result.sql).expect("output should lex");
            let markers = tokens.iter().filter(|t| t.kind == TokenKind::Question).count();
            assert_eq!(markers, result.values.len(), "mask {mask}: {}", result.sql);
            assert_eq!(markers, mask.count_ones() as usize);
            assert!(!result.sql.contains("{"), "mask {mask}: {}", result.sql);
            assert!(!result.sql.contains("AND AND"), "mask {mask}: {}", result.sql);
            assert!(!result.sql.contains("WHERE AND"), "mask {mask}: {}", result.sql);
            assert!(!result.sql.contains("AND\nORDER"), "mask {mask}: {}", result.sql);
            assert_eq!(result.sql.contains("WHERE"), mask != 0, "mask {mask}: {}", result.sql);
        }
    }

    #[test]
    fn nested_or_group_removed_with_its_operator() {
        let result = run(
            "SELECT * FROM t WHERE (a = ?{a} OR b = ?{b}) AND c = #{c}",
            json!({ "c": 1 }),
        );

        assert_eq!(result.sql, "SELECT * FROM t WHERE c = ?");
        assert_eq!(result.values, vec![json!(1)]);
    }

    #[test]
    fn partially_null_or_group_keeps_parentheses() {
        let result = run(
            "SELECT * FROM t WHERE (a = ?{a} OR b = ?{b}) AND c = 1",
            json!({ "b": "x" }),
        );

        assert_eq!(result.sql, "SELECT * FROM t WHERE (b = ?) AND c = 1");
        assert_eq!(result.values, vec![json!("x")]);
    }

    #[test]
    fn negated_predicate_removed() {
        let result = run("SELECT * FROM t WHERE NOT a = ?{a} AND b = 1", json!({}));

        assert_eq!(result.sql, "SELECT * FROM t WHERE b = 1");
    }

    #[test]
    fn like_and_is_null() {
        let result = run(
            "SELECT * FROM t WHERE deleted_at IS NULL AND name LIKE ?{name}",
            json!({}),
        );
        assert_eq!(result.sql, "SELECT * FROM t WHERE deleted_at IS NULL");

        let result = run(
            "SELECT * FROM t WHERE deleted_at IS NULL AND name LIKE ?{name}",
            json!({ "name": "A%" }),
        );
        assert_eq!(result.sql, "SELECT * FROM t WHERE deleted_at IS NULL AND name LIKE ?");
        assert_eq!(result.values, vec![json!("A%")]);
    }

    #[test]
    fn having_removed() {
        let result = run(
            "SELECT city, count(*) FROM People GROUP BY city HAVING count(*) > ?{min} ORDER BY city",
            json!({}),
        );

        assert_eq!(result.sql, "SELECT city, count(*) FROM People GROUP BY city ORDER BY city");
    }

    #[test]
    fn trailing_semicolon_after_removed_where() {
        let result = run("SELECT a FROM t WHERE a = ?{a};", json!({}));

        assert_eq!(result.sql, "SELECT a FROM t;");
    }

    // --- JOIN ... ON ------------------------------------------------------

    #[test]
    fn join_on_null_conjunct_removed() {
        let sql = "SELECT * FROM t t1 JOIN s ON s.id = t1.id AND s.k = ?{k} WHERE t1.a = 1";

        let result = run(sql, json!({}));
        assert_eq!(result.sql, "SELECT * FROM t t1 JOIN s ON s.id = t1.id WHERE t1.a = 1");
        assert!(result.values.is_empty());

        let result = run(sql, json!({ "k": 5 }));
        assert_eq!(result.sql, "SELECT * FROM t t1 JOIN s ON s.id = t1.id AND s.k = ? WHERE t1.a = 1");
        assert_eq!(result.values, vec![json!(5)]);
    }

    #[test]
    fn join_on_before_next_join() {
        let result = run(
            "SELECT * FROM t JOIN s ON s.id = t.id AND s.k = ?{k} LEFT JOIN u ON u.id = s.id AND u.v = ?{v}",
            json!({ "v": "x" }),
        );

        assert_eq!(result.sql, "SELECT * FROM t JOIN s ON s.id = t.id LEFT JOIN u ON u.id = s.id AND u.v = ?");
        assert_eq!(result.values, vec![json!("x")]);
    }

    #[test]
    fn join_on_cannot_become_empty() {
        let err = run_err("SELECT * FROM t JOIN s ON s.k = ?{k}", json!({}));

        assert!(matches!(err, TemplateError::EmptyJoinCondition { .. }));
    }

    #[test]
    fn required_null_is_an_error() {
        let err = run_err("SELECT * FROM t WHERE a = #{a}", json!({ "a": null }));

        assert_eq!(err, TemplateError::RequiredParameter { name: "a".into() });
    }

    #[test]
    fn nested_path_values() {
        let result = run(
            "SELECT * FROM t WHERE city = #{filter.address.city} AND tag = #{filter.tags[1]}",
            json!({ "filter": { "address": { "city": "Braga" }, "tags": ["a", "b"] } }),
        );

        assert_eq!(result.values, vec![json!("Braga"), json!("b")]);
    }

    // --- IN -------------------------------------------------------------

    #[test]
    fn in_list_null_item_removed_with_comma() {
        let result = run(
            "SELECT * FROM t WHERE id IN (#{a}, ?{b}, #{c})",
            json!({ "a": 1, "b": null, "c": 3 }),
        );

        assert_eq!(result.sql, "SELECT * FROM t WHERE id IN (?, ?)");
        assert_eq!(result.values, vec![json!(1), json!(3)]);
    }

    #[test]
    fn in_list_leading_null_items() {
        let result = run(
            "SELECT * FROM t WHERE id IN (?{a}, ?{b}, 7)",
            json!({}),
        );

        assert_eq!(result.sql, "SELECT * FROM t WHERE id IN (7)");
    }

    #[test]
    fn in_list_all_null_removes_clause() {
        let result = run("SELECT * FROM t WHERE id IN (?{a}, ?{b})", json!({}));

        assert_eq!(result.sql, "SELECT * FROM t");
        assert!(result.values.is_empty());
    }

    #[test]
    fn in_collection_expands() {
        let result = run(
            "SELECT * FROM t WHERE id IN (#{ids}) AND status = ?{status}",
            json!({ "ids": [1, 2, 3], "status": "new" }),
        );

        assert_eq!(result.sql, "SELECT * FROM t WHERE id IN (?, ?, ?) AND status = ?");
        assert_eq!(result.values, vec![json!(1), json!(2), json!(3), json!("new")]);
    }

    #[test]
    fn in_empty_collection() {
        let result = run("SELECT * FROM t WHERE id IN (?{ids}) AND a = 1", json!({ "ids": [] }));
        assert_eq!(result.sql, "SELECT * FROM t WHERE a = 1");

        let err = run_err("SELECT * FROM t WHERE id IN (#{ids})", json!({ "ids": [] }));
        assert_eq!(err, TemplateError::EmptyCollection { name: "ids".into() });
    }

    #[test]
    fn in_subquery_is_rewritten_on_its_own() {
        let result = run(
            "SELECT p.id FROM People p WHERE p.id IN (SELECT o.person_id FROM Orders o WHERE o.status = ?{status}) AND p.city = ?{city}",
            json!({ "city": "Porto" }),
        );

        assert_eq!(
            result.sql,
            "SELECT p.id FROM People p WHERE p.id IN (SELECT o.person_id FROM Orders o) AND p.city = ?"
        );
        assert_eq!(result.values, vec![json!("Porto")]);
    }

    // --- BETWEEN ----------------------------------------------------------

    #[test]
    fn between_both_bounds() {
        let result = run(
            "SELECT * FROM t WHERE age BETWEEN ?{min} AND ?{max}",
            json!({ "min": 18, "max": 65 }),
        );

        assert_eq!(result.sql, "SELECT * FROM t WHERE age BETWEEN ? AND ?");
        assert_eq!(result.values, vec![json!(18), json!(65)]);
    }

    #[test]
    fn between_either_bound_null() {
        for param in [json!({ "min": 18 }), json!({ "max": 65 })] {
            let result = run("SELECT * FROM t WHERE age BETWEEN ?{min} AND ?{max} AND a = 1", param);

            assert_eq!(result.sql, "SELECT * FROM t WHERE a = 1");
            assert!(result.values.is_empty());
        }
    }

    // --- LIMIT / OFFSET ---------------------------------------------------

    #[test]
    fn limit_offset_keyword_offset_null() {
        let result = run("SELECT * FROM t LIMIT ?{lim} OFFSET ?{off}", json!({ "lim": 10 }));

        assert_eq!(result.sql, "SELECT * FROM t LIMIT ?");
        assert_eq!(result.values, vec![json!(10)]);
    }

    #[test]
    fn limit_offset_keyword_both() {
        let result = run("SELECT * FROM t LIMIT ?{lim} OFFSET ?{off}", json!({ "lim": 10, "off": 20 }));

        assert_eq!(result.sql, "SELECT * FROM t LIMIT ? OFFSET ?");
        assert_eq!(result.values, vec![json!(10), json!(20)]);
    }

    #[test]
    fn limit_comma_both() {
        let result = run("SELECT * FROM t LIMIT ?{off}, ?{lim}", json!({ "lim": 10, "off": 20 }));

        assert_eq!(result.sql, "SELECT * FROM t LIMIT ?, ?");
        assert_eq!(result.values, vec![json!(20), json!(10)]);
    }

    #[test]
    fn limit_comma_offset_null() {
        let result = run("SELECT * FROM t LIMIT ?{off}, ?{lim}", json!({ "lim": 10 }));

        assert_eq!(result.sql, "SELECT * FROM t LIMIT ?");
        assert_eq!(result.values, vec![json!(10)]);
    }

    #[test]
    fn limit_null_removes_clause() {
        let result = run("SELECT * FROM t WHERE a = #{a} LIMIT ?{lim} OFFSET ?{off}", json!({ "a": 1, "off": 5 }));

        assert_eq!(result.sql, "SELECT * FROM t WHERE a = ?");
        assert_eq!(result.values, vec![json!(1)]);
    }

    // --- INSERT -----------------------------------------------------------

    #[test]
    fn batch_insert() {
        let result = run(
            "INSERT INTO t (name, tag) VALUES (#{name}, #{tags})",
            json!({ "name": "x", "tags": ["a", "b"] }),
        );

        assert_eq!(result.sql, "INSERT INTO t (name, tag) VALUES (?, ?), (?, ?)");
        assert_eq!(result.values, vec![json!("x"), json!("a"), json!("x"), json!("b")]);
    }

    #[test]
    fn insert_single_row_with_literals_and_null() {
        let result = run(
            "INSERT INTO t (name, age, created) VALUES (#{name}, #{age}, now())",
            json!({ "name": "x" }),
        );

        assert_eq!(result.sql, "INSERT INTO t (name, age, created) VALUES (?, ?, now())");
        assert_eq!(result.values, vec![json!("x"), Value::Null]);
    }

    #[test]
    fn insert_batch_sizes_must_agree() {
        let err = run_err(
            "INSERT INTO t (tag, id) VALUES (#{tags}, #{ids})",
            json!({ "tags": ["a", "b"], "ids": [1, 2, 3] }),
        );

        assert_eq!(err, TemplateError::InconsistentBatchSize { expected: 2, found: 3 });
    }

    #[test]
    fn insert_optional_marker_is_an_error() {
        let err = run_err("INSERT INTO t (name) VALUES (?{name})", json!({ "name": "x" }));

        assert_eq!(err, TemplateError::OptionalInsertValue { name: "name".into() });
    }

    #[test]
    fn insert_empty_batch() {
        let err = run_err("INSERT INTO t (tag) VALUES (#{tags})", json!({ "tags": [] }));

        assert_eq!(err, TemplateError::EmptyCollection { name: "tags".into() });
    }

    // --- UPDATE -----------------------------------------------------------

    #[test]
    fn update_optional_null_removes_assignment() {
        let result = run(
            "UPDATE People SET name = ?{name}, email = #{email}, age = ?{age} WHERE id = #{id}",
            json!({ "age": 30, "id": 7 }),
        );

        assert_eq!(result.sql, "UPDATE People SET email = ?, age = ? WHERE id = ?");
        assert_eq!(result.values, vec![Value::Null, json!(30), json!(7)]);
    }

    #[test]
    fn update_trailing_assignment_removed() {
        let result = run(
            "UPDATE People SET name = #{name}, age = ?{age} WHERE id = #{id}",
            json!({ "name": "x", "id": 7 }),
        );

        assert_eq!(result.sql, "UPDATE People SET name = ? WHERE id = ?");
        assert_eq!(result.values, vec![json!("x"), json!(7)]);
    }

    // A required SET value that is null is bound as NULL rather than rejected.
    #[test]
    fn update_required_null_binds_null() {
        let result = run("UPDATE People SET email = #{email} WHERE id = #{id}", json!({ "id": 7 }));

        assert_eq!(result.sql, "UPDATE People SET email = ? WHERE id = ?");
        assert_eq!(result.values, vec![Value::Null, json!(7)]);
    }

    #[test]
    fn update_without_assignments() {
        let err = run_err("UPDATE People SET name = ?{name} WHERE id = #{id}", json!({ "id": 7 }));

        assert_eq!(err, TemplateError::EmptySetClause);
    }

    // --- free placeholders and nesting ----------------------------------

    // Outside WHERE, HAVING and ON there is no fragment to drop, so a null
    // optional value is bound as NULL.
    #[test]
    fn free_placeholders() {
        let result = run("SELECT * FROM t ORDER BY ?{sort}", json!({}));
        assert_eq!(result.sql, "SELECT * FROM t ORDER BY ?");
        assert_eq!(result.values, vec![Value::Null]);

        let err = run_err("SELECT #{col} FROM t", json!({}));
        assert_eq!(err, TemplateError::RequiredParameter { name: "col".into() });
    }

    #[test]
    fn values_follow_output_order() {
        let result = run(
            r#"SELECT (SELECT count(*) FROM Orders o WHERE o.person_id = p.id AND o.status = #{status}) total
FROM People p
WHERE p.city = #{city}
LIMIT #{offset}, #{limit}"#,
            json!({ "status": "new", "city": "Porto", "offset": 20, "limit": 10 }),
        );

        assert_eq!(result.values, vec![json!("new"), json!("Porto"), json!(20), json!(10)]);
    }

    #[test]
    fn delete_statement() {
        let result = run("DELETE FROM t WHERE id = #{id} AND tenant = ?{tenant}", json!({ "id": 1 }));

        assert_eq!(result.sql, "DELETE FROM t WHERE id = ?");
    }

    #[test]
    fn concurrent_apply_on_shared_template() {
        let template = Arc::new(Template::parse(find_people_sql()).expect("template should parse"));

        let handles = (0..8)
            .map(|i| {
                let template = Arc::clone(&template);
                thread::spawn(move || {
                    let param = if i % 2 == 0 { json!({ "city": "Porto" }) } else { json!({ "min_age": i }) };
                    template.apply(&param).expect("apply should succeed")
                })
            })
            .collect::<Vec<_>>();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().expect("thread panicked");
            if i % 2 == 0 {
                assert_eq!(result.values, vec![json!("Porto")]);
            } else {
                assert_eq!(result.values, vec![json!(i)]);
            }
        }
    }
}
