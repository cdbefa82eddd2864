// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample SQL queries

/// Marks the caret position inside fixture SQL
pub const CARET_MARKER: char = '|';

/// Find the caret marker and return the SQL without it plus the byte offset
///
/// Returns `None` when the input has no marker.
pub fn split_caret(input: &str) -> Option<(String, usize)> {
    let offset = input.find(CARET_MARKER)?;
    Some((input.replacen(CARET_MARKER, "", 1), offset))
}

/// Sample SQL queries for testing
pub struct SqlFixtures;

impl SqlFixtures {
    // ===== Flat queries =====

    pub const fn simple_select() -> &'static str {
        "SELECT * FROM DBM.ORDERS"
    }

    pub const fn join_with_aliases() -> &'static str {
        "SELECT o.id, c.name FROM DBM.ORDERS o JOIN DBM.CUSTOMERS c ON o.cust_id = c.id"
    }

    pub const fn comma_join() -> &'static str {
        "SELECT * FROM DBM.ORDERS o, DBM.CUSTOMERS AS c WHERE o.cust_id = c.id"
    }

    // ===== Subqueries =====

    /// Derived table with `AS` alias
    pub const fn derived_table() -> &'static str {
        "SELECT * FROM (SELECT id FROM DBM.T) AS derived"
    }

    /// Scalar subquery in the SELECT list
    pub const fn scalar_subquery() -> &'static str {
        "SELECT id, (SELECT COUNT(*) FROM DBM.ITEMS WHERE order_id = o.id) cnt FROM DBM.ORDERS o"
    }

    /// `IN (SELECT ...)` in WHERE
    pub const fn in_subquery() -> &'static str {
        "SELECT * FROM DBM.ORDERS WHERE cust_id IN (SELECT id FROM DBM.VIP_CUSTOMERS)"
    }

    /// Correlated EXISTS
    pub const fn correlated_exists() -> &'static str {
        "SELECT * FROM DBM.ORDERS o WHERE EXISTS (SELECT 1 FROM DBM.ITEMS i WHERE i.order_id = o.id)"
    }

    /// Two derived tables joined to each other
    pub const fn sibling_derived_tables() -> &'static str {
        "SELECT * FROM
            (SELECT id FROM DBM.A) sub_a
            JOIN
            (SELECT id FROM DBM.B) sub_b
            ON sub_a.id = sub_b.id"
    }

    /// Three levels: main, `b`, `a`
    pub const fn three_levels() -> &'static str {
        "SELECT * FROM (SELECT * FROM (SELECT id FROM DBM.T) a) b"
    }

    /// Derived table inside a joined derived table
    pub const fn nested_join() -> &'static str {
        "SELECT a.id, b.total
            FROM DBM.ACCOUNTS a
            JOIN (
                SELECT customer_id, SUM(amount) as total
                FROM (SELECT order_id, customer_id, amount FROM DBM.ORDERS WHERE status = 'C') completed_orders
                GROUP BY customer_id
            ) b ON a.customer_id = b.customer_id"
    }

    /// Derived table exposing a CASE expression
    pub const fn case_expression() -> &'static str {
        "SELECT x.status_text FROM (
                SELECT id,
                       CASE WHEN status = 'A' THEN 'Active' ELSE 'Other' END AS status_text
                FROM DBM.ORDERS
            ) x"
    }

    // ===== Edge cases =====

    /// Parenthesis and keywords inside a literal and a comment
    pub const fn literal_noise() -> &'static str {
        "SELECT 'a (SELECT' AS label -- ) (SELECT\nFROM DBM.ORDERS o"
    }

    /// Subquery never closed (typing in progress)
    pub const fn unclosed_subquery() -> &'static str {
        "SELECT * FROM DBM.ORDERS o WHERE o.id IN (SELECT "
    }

    /// DB2 isolation clause after FROM
    pub const fn isolation_clause() -> &'static str {
        "SELECT * FROM DBM.ORDERS WITH UR"
    }

    // ===== Catalog documents =====

    /// Catalog JSON for the standard schema, as read by `StaticCatalog::from_json`
    pub fn standard_catalog_json() -> String {
        serde_json::json!({
            "default_schema": "DBM",
            "tables": [
                {
                    "name": "ORDERS",
                    "schema": "DBM",
                    "columns": [
                        { "name": "ID", "data_type": "BIGINT", "nullable": false, "is_primary_key": true },
                        { "name": "CUST_ID", "data_type": "BIGINT", "nullable": false },
                        { "name": "ORDER_DATE", "data_type": "DATE" },
                        { "name": "AMOUNT", "data_type": "DECIMAL(12,2)" },
                        { "name": "STATUS", "data_type": "CHAR(1)", "nullable": false }
                    ]
                },
                {
                    "name": "CUSTOMERS",
                    "schema": "DBM",
                    "columns": [
                        { "name": "ID", "data_type": "BIGINT", "nullable": false, "is_primary_key": true },
                        { "name": "NAME", "data_type": "VARCHAR(100)", "nullable": false }
                    ]
                }
            ]
        })
        .to_string()
    }
}
