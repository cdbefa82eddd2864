// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for scope extraction

use sql_scope_semantic::{extract_scopes, Scope, SUBQUERY_PLACEHOLDER};
use sql_scope_test_utils::SqlFixtures;

fn table_names(scope: &Scope) -> Vec<String> {
    scope.tables.iter().map(|t| t.full_name()).collect()
}

fn aliases(scope: &Scope) -> Vec<Option<&str>> {
    scope.tables.iter().map(|t| t.alias.as_deref()).collect()
}

/// Structural properties every extraction must satisfy
fn assert_well_formed(sql: &str, scopes: &[Scope]) {
    assert!(!scopes.is_empty());
    assert_eq!(scopes[0].level, 0);
    assert_eq!(scopes[0].parent_index, None);
    assert_eq!(scopes[0].span.start, 0);
    assert_eq!(scopes[0].span.end, sql.len());

    for (position, scope) in scopes.iter().enumerate() {
        assert_eq!(scope.index, position, "index matches position");
        if position == 0 {
            continue;
        }
        let parent = &scopes[scope.parent_index.expect("subquery has a parent")];
        assert_eq!(scope.level, parent.level + 1);
        assert!(parent.span.start <= scope.span.start && scope.span.end <= parent.span.end);
        assert_eq!(&sql[scope.span.start..scope.span.start + 1], "(");
        assert_eq!(&sql[scope.span.end - 1..scope.span.end], ")");
        assert_eq!(scope.content, sql[scope.span.start + 1..scope.span.end - 1].trim());
    }

    for scope in scopes {
        for table in scope.tables.iter().filter(|t| t.is_derived_table) {
            if let Some(index) = table.derived_table_scope_index {
                assert_eq!(scopes[index].parent_index, Some(scope.index));
            }
        }
    }
}

#[test]
fn test_empty_input_yields_main_scope() {
    for sql in ["", "   \n"] {
        let scopes = extract_scopes(sql);
        assert_eq!(scopes.len(), 1);
        assert_well_formed(sql, &scopes);
        assert!(scopes[0].tables.is_empty());
        assert!(scopes[0].exposed_columns.is_empty());
    }
}

#[test]
fn test_simple_select() {
    let sql = SqlFixtures::simple_select();
    let scopes = extract_scopes(sql);
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes[0].select_list, "*");
    assert_eq!(scopes[0].from_clause, "DBM.ORDERS");
    assert_eq!(table_names(&scopes[0]), vec!["DBM.ORDERS"]);
    assert_eq!(aliases(&scopes[0]), vec![None]);
}

#[test]
fn test_join_aliases_and_columns() {
    let scopes = extract_scopes(SqlFixtures::join_with_aliases());
    assert_eq!(table_names(&scopes[0]), vec!["DBM.ORDERS", "DBM.CUSTOMERS"]);
    assert_eq!(aliases(&scopes[0]), vec![Some("o"), Some("c")]);
    assert_eq!(scopes[0].exposed_columns, vec!["id", "name"]);
}

#[test]
fn test_comma_join_with_as() {
    let scopes = extract_scopes(SqlFixtures::comma_join());
    assert_eq!(aliases(&scopes[0]), vec![Some("o"), Some("c")]);
    assert_eq!(scopes[0].where_clause, "o.cust_id = c.id");
}

#[test]
fn test_derived_table_is_linked() {
    let sql = SqlFixtures::derived_table();
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(scopes.len(), 2);

    let sub = &scopes[1];
    assert_eq!(sub.alias.as_deref(), Some("derived"));
    assert_eq!(sub.level, 1);
    assert_eq!(sub.content, "SELECT id FROM DBM.T");
    assert_eq!(sub.exposed_columns, vec!["id"]);

    let main = &scopes[0];
    assert_eq!(main.from_clause, format!("{SUBQUERY_PLACEHOLDER} AS derived"));
    assert!(main.tables[0].is_derived_table);
    assert_eq!(main.tables[0].alias.as_deref(), Some("derived"));
    assert_eq!(main.tables[0].derived_table_scope_index, Some(1));
}

#[test]
fn test_scalar_subquery_in_select_list() {
    let sql = SqlFixtures::scalar_subquery();
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(scopes.len(), 2);

    assert_eq!(scopes[0].select_list, format!("id, {SUBQUERY_PLACEHOLDER} cnt"));
    assert_eq!(scopes[0].exposed_columns, vec!["id", "cnt"]);
    assert_eq!(aliases(&scopes[0]), vec![Some("o")]);

    // `cnt` is followed by FROM, so it is a column alias, not a scope alias
    assert_eq!(scopes[1].alias, None);
    assert_eq!(table_names(&scopes[1]), vec!["DBM.ITEMS"]);
    assert_eq!(scopes[1].where_clause, "order_id = o.id");
}

#[test]
fn test_subquery_in_where() {
    let scopes = extract_scopes(SqlFixtures::in_subquery());
    assert_eq!(scopes.len(), 2);
    assert_eq!(scopes[0].where_clause, format!("cust_id IN {SUBQUERY_PLACEHOLDER}"));
    assert_eq!(table_names(&scopes[1]), vec!["DBM.VIP_CUSTOMERS"]);
    assert_eq!(scopes[1].parent_index, Some(0));
}

#[test]
fn test_sibling_derived_tables() {
    let sql = SqlFixtures::sibling_derived_tables();
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(scopes.len(), 3);
    assert_eq!(scopes[1].alias.as_deref(), Some("sub_a"));
    assert_eq!(scopes[2].alias.as_deref(), Some("sub_b"));

    let links: Vec<Option<usize>> = scopes[0]
        .tables
        .iter()
        .map(|t| t.derived_table_scope_index)
        .collect();
    assert_eq!(links, vec![Some(1), Some(2)]);
}

#[test]
fn test_levels_follow_nesting() {
    let sql = SqlFixtures::three_levels();
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);

    let mut levels: Vec<usize> = scopes.iter().map(|s| s.level).collect();
    levels.sort();
    assert_eq!(levels, vec![0, 1, 2]);

    // inner closes first
    assert_eq!(scopes[1].alias.as_deref(), Some("a"));
    assert_eq!(scopes[1].parent_index, Some(2));
    assert_eq!(scopes[2].alias.as_deref(), Some("b"));
    assert_eq!(scopes[2].tables[0].derived_table_scope_index, Some(1));
}

#[test]
fn test_four_levels() {
    let sql = "SELECT * FROM (SELECT * FROM (SELECT * FROM (SELECT id FROM DBM.T) a) b) c";
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(scopes.len(), 4);
    assert_eq!(scopes.iter().map(|s| s.level).max(), Some(3));
}

#[test]
fn test_nested_join_exposes_columns() {
    let sql = SqlFixtures::nested_join();
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(scopes.len(), 3);

    let completed = &scopes[1];
    assert_eq!(completed.alias.as_deref(), Some("completed_orders"));
    assert_eq!(completed.level, 2);
    assert_eq!(completed.exposed_columns, vec!["order_id", "customer_id", "amount"]);
    assert_eq!(completed.where_clause, "status = 'C'");

    let b = &scopes[2];
    assert_eq!(b.alias.as_deref(), Some("b"));
    assert_eq!(b.exposed_columns, vec!["customer_id", "total"]);
    assert_eq!(b.tables[0].derived_table_scope_index, Some(1));

    assert_eq!(aliases(&scopes[0]), vec![Some("a"), Some("b")]);
    assert_eq!(scopes[0].tables[1].derived_table_scope_index, Some(2));
}

#[test]
fn test_case_expression_alias_is_exposed() {
    let scopes = extract_scopes(SqlFixtures::case_expression());
    assert_eq!(scopes[1].exposed_columns, vec!["id", "status_text"]);
}

#[test]
fn test_literals_and_comments_are_ignored() {
    let sql = SqlFixtures::literal_noise();
    let scopes = extract_scopes(sql);
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes[0].select_list, "'a (SELECT' AS label");
    assert_eq!(scopes[0].exposed_columns, vec!["label"]);
    assert_eq!(aliases(&scopes[0]), vec![Some("o")]);
}

#[test]
fn test_unclosed_subquery_is_tolerated() {
    let sql = SqlFixtures::unclosed_subquery();
    let scopes = extract_scopes(sql);
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes[0].where_clause, "o.id IN (SELECT");
    assert_eq!(aliases(&scopes[0]), vec![Some("o")]);
}

#[test]
fn test_isolation_clause_ends_from() {
    let scopes = extract_scopes(SqlFixtures::isolation_clause());
    assert_eq!(scopes[0].from_clause, "DBM.ORDERS");
    assert_eq!(aliases(&scopes[0]), vec![None]);
}

#[test]
fn test_reserved_word_is_not_an_alias() {
    let scopes = extract_scopes("SELECT * FROM DBM.ORDERS WHERE");
    assert_eq!(table_names(&scopes[0]), vec!["DBM.ORDERS"]);
    assert_eq!(aliases(&scopes[0]), vec![None]);

    let scopes = extract_scopes("SELECT * FROM (SELECT id FROM DBM.T) WHERE id > 0");
    assert_eq!(scopes[1].alias, None);
    assert_eq!(scopes[0].tables[0].derived_table_scope_index, Some(1));
}

#[test]
fn test_unaliased_derived_tables_link_by_position() {
    let sql = "SELECT (SELECT 1 FROM d) one, s.* FROM (SELECT c FROM t), (SELECT e FROM u)";
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(scopes.len(), 4);

    let links: Vec<Option<usize>> = scopes[0]
        .tables
        .iter()
        .map(|t| t.derived_table_scope_index)
        .collect();
    assert_eq!(links, vec![Some(2), Some(3)]);
    assert_eq!(scopes[2].exposed_columns, vec!["c"]);
    assert_eq!(scopes[3].exposed_columns, vec!["e"]);
}

#[test]
fn test_quoted_identifiers() {
    let scopes = extract_scopes(r#"SELECT ol."Line No" FROM "DBM"."Order Lines" ol"#);
    let table = &scopes[0].tables[0];
    assert_eq!(table.schema.as_deref(), Some("DBM"));
    assert_eq!(table.table_name.as_deref(), Some("Order Lines"));
    assert_eq!(table.alias.as_deref(), Some("ol"));
    assert_eq!(scopes[0].exposed_columns, vec!["Line No"]);
}

#[test]
fn test_quoted_names_with_structural_characters() {
    let sql = r#"SELECT "a(b" FROM DBM.T x"#;
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(scopes[0].select_list, r#""a(b""#);
    assert_eq!(scopes[0].from_clause, "DBM.T x");
    assert_eq!(table_names(&scopes[0]), vec!["DBM.T"]);
    assert_eq!(aliases(&scopes[0]), vec![Some("x")]);
    assert_eq!(scopes[0].exposed_columns, vec!["a(b"]);

    let scopes = extract_scopes(r#"SELECT id, name AS "x,y" FROM DBM.T"#);
    assert_eq!(scopes[0].exposed_columns, vec!["id", "x,y"]);
    assert_eq!(table_names(&scopes[0]), vec!["DBM.T"]);
}

#[test]
fn test_single_scope_decomposition() {
    let sql = "SELECT a, b AS x FROM T t WHERE t.a > 1";
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(scopes.len(), 1);

    let main = &scopes[0];
    assert_eq!(main.select_list, "a, b AS x");
    assert_eq!(main.from_clause, "T t");
    assert_eq!(main.where_clause, "t.a > 1");
    assert_eq!(table_names(main), vec!["T"]);
    assert_eq!(aliases(main), vec![Some("t")]);
    assert!(!main.tables[0].is_derived_table);
    assert_eq!(main.exposed_columns, vec!["a", "x"]);
}

#[test]
fn test_extraction_is_deterministic() {
    for sql in [
        SqlFixtures::correlated_exists(),
        SqlFixtures::sibling_derived_tables(),
        SqlFixtures::three_levels(),
        SqlFixtures::literal_noise(),
        SqlFixtures::unclosed_subquery(),
    ] {
        assert_eq!(extract_scopes(sql), extract_scopes(sql));
    }
}

#[test]
fn test_statement_without_select() {
    let sql = "DELETE FROM DBM.ORDERS o WHERE o.id IN (SELECT order_id FROM DBM.ITEMS)";
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(aliases(&scopes[0]), vec![Some("o")]);
    assert_eq!(scopes[0].where_clause, format!("o.id IN {SUBQUERY_PLACEHOLDER}"));
    assert_eq!(scopes[1].exposed_columns, vec!["order_id"]);
}

#[test]
fn test_multibyte_text_keeps_offsets() {
    let sql = "SELECT 'größe' AS label, x.b FROM (SELECT b FROM t /* ü */) x";
    let scopes = extract_scopes(sql);
    assert_well_formed(sql, &scopes);
    assert_eq!(scopes[0].select_list, "'größe' AS label, x.b");
    assert_eq!(scopes[1].content, "SELECT b FROM t /* ü */");
    assert_eq!(scopes[1].from_clause, "t");
}

#[test]
fn test_well_formed_on_all_fixtures() {
    for sql in [
        SqlFixtures::simple_select(),
        SqlFixtures::join_with_aliases(),
        SqlFixtures::derived_table(),
        SqlFixtures::scalar_subquery(),
        SqlFixtures::in_subquery(),
        SqlFixtures::correlated_exists(),
        SqlFixtures::sibling_derived_tables(),
        SqlFixtures::three_levels(),
        SqlFixtures::nested_join(),
        SqlFixtures::case_expression(),
        SqlFixtures::literal_noise(),
        SqlFixtures::unclosed_subquery(),
        "SELECT ((SELECT 1)) FROM t WHERE (a IN (SELECT b FROM (SELECT b FROM u) v))",
        ") SELECT ( FROM (",
    ] {
        assert_well_formed(sql, &extract_scopes(sql));
    }
}
