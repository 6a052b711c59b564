//! A scripted in-memory backend for driving the entity surface in tests.
//!
//! The mock understands exactly the SQL this library emits: the three
//! catalog queries, schema/table DDL, multi-row INSERTs, and plain column
//! SELECTs. Everything else is an error, which keeps tests honest about the
//! statements actually produced.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use pgframe::{Backend, Database, FrameError, Result, Row, SqlValue};

#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub expect_rows: bool,
}

#[derive(Debug, Default)]
pub struct TableState {
    pub schema: String,
    pub name: String,
    /// (column name, sql type) in ordinal order.
    pub columns: Vec<(String, String)>,
    /// Row-major cells, in column order.
    pub rows: Vec<Vec<SqlValue>>,
}

#[derive(Default)]
pub struct MockState {
    pub schemas: Vec<String>,
    pub tables: Vec<TableState>,
    pub log: Vec<Statement>,
    /// When set, any statement containing this marker fails.
    pub fail_contains: Option<String>,
    /// Fallback responses for queries the mock does not interpret.
    pub canned: VecDeque<Vec<Row>>,
    pub closed: bool,
}

impl MockState {
    pub fn add_schema(&mut self, name: &str) {
        self.schemas.push(name.to_string());
    }

    pub fn add_table(
        &mut self,
        schema: &str,
        name: &str,
        columns: &[(&str, &str)],
        rows: Vec<Vec<SqlValue>>,
    ) {
        if !self.schemas.iter().any(|s| s == schema) {
            self.schemas.push(schema.to_string());
        }
        self.tables.push(TableState {
            schema: schema.to_string(),
            name: name.to_string(),
            columns: columns
                .iter()
                .map(|(c, t)| (c.to_string(), t.to_string()))
                .collect(),
            rows,
        });
    }

    pub fn table(&self, schema: &str, name: &str) -> Option<&TableState> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == name)
    }

    fn table_mut(&mut self, schema: &str, name: &str) -> Option<&mut TableState> {
        self.tables
            .iter_mut()
            .find(|t| t.schema == schema && t.name == name)
    }

    /// Statements executed with `expect_rows = false` (DDL and DML).
    pub fn ddl_log(&self) -> Vec<String> {
        self.log
            .iter()
            .filter(|s| !s.expect_rows)
            .map(|s| s.sql.clone())
            .collect()
    }

    pub fn executed(&self, needle: &str) -> bool {
        self.log.iter().any(|s| s.sql.contains(needle))
    }

    fn run_query(&mut self, sql: &str) -> Result<Vec<Row>> {
        if sql.contains("information_schema.schemata") {
            let mut schemas = self.schemas.clone();
            schemas.sort();
            let mut rows = Vec::new();
            for schema in &schemas {
                let mut names: Vec<&str> = self
                    .tables
                    .iter()
                    .filter(|t| &t.schema == schema)
                    .map(|t| t.name.as_str())
                    .collect();
                names.sort_unstable();
                if names.is_empty() {
                    rows.push(vec![SqlValue::Text(schema.clone()), SqlValue::Null]);
                }
                for name in names {
                    rows.push(vec![
                        SqlValue::Text(schema.clone()),
                        SqlValue::Text(name.to_string()),
                    ]);
                }
            }
            return Ok(rows);
        }

        if sql.contains("information_schema.columns") {
            let schema = literal_after(sql, "table_schema = ")?;
            if sql.contains("table_name = ") {
                let table = literal_after(sql, "table_name = ")?;
                let Some(t) = self.table(&schema, &table) else {
                    return Ok(Vec::new());
                };
                return Ok(t
                    .columns
                    .iter()
                    .map(|(c, ty)| vec![SqlValue::Text(c.clone()), SqlValue::Text(ty.clone())])
                    .collect());
            }
            let mut tables: Vec<&TableState> =
                self.tables.iter().filter(|t| t.schema == schema).collect();
            tables.sort_by(|a, b| a.name.cmp(&b.name));
            let mut rows = Vec::new();
            for t in tables {
                for (c, _) in &t.columns {
                    rows.push(vec![
                        SqlValue::Text(t.name.clone()),
                        SqlValue::Text(c.clone()),
                    ]);
                }
            }
            return Ok(rows);
        }

        if let Some(rest) = sql.strip_prefix("SELECT ") {
            let from = rest
                .find(" FROM ")
                .ok_or_else(|| backend_err(format!("mock cannot parse query: {sql}")))?;
            let column_part = rest[..from].trim();
            let (schema, table, _) = parse_qualified(&rest[from + 6..])?;
            let t = self.table(&schema, &table).ok_or_else(|| {
                backend_err(format!("relation \"{schema}\".\"{table}\" does not exist"))
            })?;

            let indices: Vec<usize> = if column_part == "*" {
                (0..t.columns.len()).collect()
            } else {
                parse_ident_list(column_part)?
                    .iter()
                    .map(|name| {
                        t.columns
                            .iter()
                            .position(|(c, _)| c == name)
                            .ok_or_else(|| backend_err(format!("column \"{name}\" does not exist")))
                    })
                    .collect::<Result<_>>()?
            };

            return Ok(t
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect());
        }

        if let Some(rows) = self.canned.pop_front() {
            return Ok(rows);
        }
        Err(backend_err(format!("mock cannot answer query: {sql}")))
    }

    fn run_statements(&mut self, sql: &str) -> Result<()> {
        if sql.starts_with("INSERT INTO ") {
            return self.apply_insert(sql);
        }
        for stmt in sql.split(';') {
            let stmt = stmt.trim();
            if !stmt.is_empty() {
                self.apply_ddl(stmt)?;
            }
        }
        Ok(())
    }

    fn apply_ddl(&mut self, stmt: &str) -> Result<()> {
        if let Some(rest) = stmt.strip_prefix("CREATE SCHEMA ") {
            let (name, _) = parse_ident(rest)?;
            if self.schemas.contains(&name) {
                return Err(backend_err(format!("schema \"{name}\" already exists")));
            }
            self.schemas.push(name);
            Ok(())
        } else if let Some(rest) = stmt.strip_prefix("DROP SCHEMA ") {
            let (name, tail) = parse_ident(rest)?;
            let cascade = tail.trim().starts_with("CASCADE");
            if !self.schemas.contains(&name) {
                return Err(backend_err(format!("schema \"{name}\" does not exist")));
            }
            if !cascade && self.tables.iter().any(|t| t.schema == name) {
                return Err(backend_err(format!("schema \"{name}\" is not empty")));
            }
            self.schemas.retain(|s| s != &name);
            self.tables.retain(|t| t.schema != name);
            Ok(())
        } else if let Some(rest) = stmt.strip_prefix("ALTER SCHEMA ") {
            let (old, tail) = parse_ident(rest)?;
            let tail = tail
                .strip_prefix(" RENAME TO ")
                .ok_or_else(|| backend_err(format!("mock cannot parse: {stmt}")))?;
            let (new, _) = parse_ident(tail)?;
            if !self.schemas.contains(&old) {
                return Err(backend_err(format!("schema \"{old}\" does not exist")));
            }
            for schema in &mut self.schemas {
                if *schema == old {
                    *schema = new.clone();
                }
            }
            for table in &mut self.tables {
                if table.schema == old {
                    table.schema = new.clone();
                }
            }
            Ok(())
        } else if let Some(rest) = stmt.strip_prefix("ALTER TABLE ") {
            let (schema, table, rest) = parse_qualified(rest)?;
            if let Some(tail) = rest.strip_prefix(" RENAME COLUMN ") {
                let (old, tail) = parse_ident(tail)?;
                let tail = tail
                    .strip_prefix(" TO ")
                    .ok_or_else(|| backend_err(format!("mock cannot parse: {stmt}")))?;
                let (new, _) = parse_ident(tail)?;
                let t = self
                    .table_mut(&schema, &table)
                    .ok_or_else(|| backend_err(format!("relation \"{table}\" does not exist")))?;
                let column = t
                    .columns
                    .iter_mut()
                    .find(|(c, _)| *c == old)
                    .ok_or_else(|| backend_err(format!("column \"{old}\" does not exist")))?;
                column.0 = new;
                Ok(())
            } else if let Some(tail) = rest.strip_prefix(" RENAME TO ") {
                let (new, _) = parse_ident(tail)?;
                let t = self
                    .table_mut(&schema, &table)
                    .ok_or_else(|| backend_err(format!("relation \"{table}\" does not exist")))?;
                t.name = new;
                Ok(())
            } else {
                Err(backend_err(format!("mock cannot parse: {stmt}")))
            }
        } else if let Some(rest) = stmt.strip_prefix("CREATE TABLE ") {
            let (schema, name, rest) = parse_qualified(rest)?;
            if !self.schemas.contains(&schema) {
                return Err(backend_err(format!("schema \"{schema}\" does not exist")));
            }
            if self.table(&schema, &name).is_some() {
                return Err(backend_err(format!("relation \"{name}\" already exists")));
            }
            let inner = rest
                .trim()
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .ok_or_else(|| backend_err(format!("mock cannot parse: {stmt}")))?;
            let mut columns = Vec::new();
            if !inner.trim().is_empty() {
                for def in inner.split(", ") {
                    let (column, ty) = parse_ident(def)?;
                    columns.push((column, ty.trim().to_string()));
                }
            }
            self.tables.push(TableState {
                schema,
                name,
                columns,
                rows: Vec::new(),
            });
            Ok(())
        } else if let Some(rest) = stmt.strip_prefix("DROP TABLE ") {
            let (schema, name, _) = parse_qualified(rest)?;
            if self.table(&schema, &name).is_none() {
                return Err(backend_err(format!(
                    "relation \"{schema}\".\"{name}\" does not exist"
                )));
            }
            self.tables
                .retain(|t| !(t.schema == schema && t.name == name));
            Ok(())
        } else {
            Err(backend_err(format!("mock cannot parse: {stmt}")))
        }
    }

    fn apply_insert(&mut self, sql: &str) -> Result<()> {
        let rest = sql
            .strip_prefix("INSERT INTO ")
            .ok_or_else(|| backend_err(format!("mock cannot parse: {sql}")))?;
        let (schema, table, rest) = parse_qualified(rest)?;

        let rest = rest
            .trim_start()
            .strip_prefix('(')
            .ok_or_else(|| backend_err(format!("mock cannot parse: {sql}")))?;
        let close = rest
            .find(')')
            .ok_or_else(|| backend_err(format!("mock cannot parse: {sql}")))?;
        let insert_columns = parse_ident_list(&rest[..close])?;

        let rest = rest[close + 1..]
            .trim_start()
            .strip_prefix("VALUES ")
            .ok_or_else(|| backend_err(format!("mock cannot parse: {sql}")))?;

        let table_columns: Vec<(String, String)> = self
            .table(&schema, &table)
            .ok_or_else(|| backend_err(format!("relation \"{schema}\".\"{table}\" does not exist")))?
            .columns
            .clone();

        let mut parsed_rows = Vec::new();
        for tuple in split_tuples(rest.trim_end().trim_end_matches(';')) {
            let scalars = split_scalars(&tuple);
            if scalars.len() != insert_columns.len() {
                return Err(backend_err(format!(
                    "INSERT has {} values but {} columns",
                    scalars.len(),
                    insert_columns.len()
                )));
            }
            // Rebuild the row in the table's ordinal column order.
            let mut row = Vec::with_capacity(table_columns.len());
            for (column, ty) in &table_columns {
                let value = match insert_columns.iter().position(|c| c == column) {
                    Some(pos) => parse_scalar(&scalars[pos], ty)?,
                    None => SqlValue::Null,
                };
                row.push(value);
            }
            parsed_rows.push(row);
        }

        self.table_mut(&schema, &table)
            .expect("checked above")
            .rows
            .extend(parsed_rows);
        Ok(())
    }
}

pub struct MockBackend {
    state: Rc<RefCell<MockState>>,
}

impl MockBackend {
    pub fn new(state: Rc<RefCell<MockState>>) -> Self {
        Self { state }
    }
}

impl Backend for MockBackend {
    fn execute(&mut self, sql: &str, expect_rows: bool) -> Result<Option<Vec<Row>>> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Err(FrameError::Closed);
        }
        state.log.push(Statement {
            sql: sql.to_string(),
            expect_rows,
        });
        if let Some(marker) = state.fail_contains.clone() {
            if sql.contains(&marker) {
                return Err(backend_err(format!("injected failure on: {sql}")));
            }
        }
        if expect_rows {
            Ok(Some(state.run_query(sql)?))
        } else {
            state.run_statements(sql)?;
            Ok(None)
        }
    }

    fn close(&mut self) -> Result<()> {
        self.state.borrow_mut().closed = true;
        Ok(())
    }
}

/// A fresh mock-backed database plus a handle onto the mock's state.
pub fn mock_database() -> (Rc<RefCell<MockState>>, Database) {
    let state = Rc::new(RefCell::new(MockState::default()));
    let db = Database::from_backend(Box::new(MockBackend::new(state.clone())));
    (state, db)
}

fn backend_err(message: String) -> FrameError {
    FrameError::Backend(message)
}

// ---------------------------------------------------------------------------
// SQL fragment parsing
// ---------------------------------------------------------------------------

/// Parse a leading `"quoted"` identifier, returning it and the remainder.
fn parse_ident(s: &str) -> Result<(String, &str)> {
    let rest = s
        .strip_prefix('"')
        .ok_or_else(|| backend_err(format!("expected quoted identifier at: {s}")))?;
    let end = rest
        .find('"')
        .ok_or_else(|| backend_err(format!("unterminated identifier at: {s}")))?;
    Ok((rest[..end].to_string(), &rest[end + 1..]))
}

/// Parse `"schema"."name"`, returning both and the remainder.
fn parse_qualified(s: &str) -> Result<(String, String, &str)> {
    let (schema, rest) = parse_ident(s)?;
    let rest = rest
        .strip_prefix('.')
        .ok_or_else(|| backend_err(format!("expected qualified name at: {s}")))?;
    let (name, rest) = parse_ident(rest)?;
    Ok((schema, name, rest))
}

/// Parse `"a", "b", "c"` into identifier names.
fn parse_ident_list(s: &str) -> Result<Vec<String>> {
    s.split(", ")
        .map(|part| parse_ident(part.trim()).map(|(name, _)| name))
        .collect()
}

/// Parse `'quoted'` literal content after a marker like `table_schema = `.
fn literal_after(sql: &str, marker: &str) -> Result<String> {
    let pos = sql
        .find(marker)
        .ok_or_else(|| backend_err(format!("missing '{marker}' in: {sql}")))?;
    let rest = &sql[pos + marker.len()..];
    let rest = rest
        .strip_prefix('\'')
        .ok_or_else(|| backend_err(format!("expected literal after '{marker}'")))?;
    let end = rest
        .find('\'')
        .ok_or_else(|| backend_err(format!("unterminated literal after '{marker}'")))?;
    Ok(rest[..end].to_string())
}

/// Split `(a, b), (c, d)` into the content of each parenthesized tuple,
/// respecting quoted text.
fn split_tuples(s: &str) -> Vec<String> {
    let mut tuples = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut depth = 0usize;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quote {
            if depth > 0 {
                current.push(c);
            }
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    let escaped = chars.next().unwrap();
                    if depth > 0 {
                        current.push(escaped);
                    }
                } else {
                    in_quote = false;
                }
            }
        } else {
            match c {
                '\'' => {
                    in_quote = true;
                    if depth > 0 {
                        current.push(c);
                    }
                }
                '(' => {
                    depth += 1;
                    if depth > 1 {
                        current.push(c);
                    }
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        tuples.push(std::mem::take(&mut current));
                    } else {
                        current.push(c);
                    }
                }
                _ => {
                    if depth > 0 {
                        current.push(c);
                    }
                }
            }
        }
    }
    tuples
}

/// Split a tuple body on top-level commas, respecting quoted text.
fn split_scalars(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quote {
            current.push(c);
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    current.push(chars.next().unwrap());
                } else {
                    in_quote = false;
                }
            }
        } else if c == '\'' {
            in_quote = true;
            current.push(c);
        } else if c == ',' {
            out.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    let last = current.trim();
    if !last.is_empty() {
        out.push(last.to_string());
    }
    out
}

/// Parse one rendered SQL literal back into a value, guided by the column's
/// SQL type.
fn parse_scalar(raw: &str, ty: &str) -> Result<SqlValue> {
    if raw == "NULL" {
        return Ok(SqlValue::Null);
    }
    let unquote = || -> Result<String> {
        raw.strip_prefix('\'')
            .and_then(|r| r.strip_suffix('\''))
            .map(|inner| inner.replace("''", "'"))
            .ok_or_else(|| backend_err(format!("expected quoted literal, got: {raw}")))
    };

    match ty {
        "int" => raw
            .parse::<i32>()
            .map(SqlValue::I32)
            .map_err(|e| backend_err(format!("bad int literal {raw}: {e}"))),
        "bigint" => raw
            .parse::<i64>()
            .map(SqlValue::I64)
            .map_err(|e| backend_err(format!("bad bigint literal {raw}: {e}"))),
        "real" => raw
            .parse::<f64>()
            .map(SqlValue::F64)
            .map_err(|e| backend_err(format!("bad real literal {raw}: {e}"))),
        "text" => Ok(SqlValue::Text(unquote()?)),
        "bool" => Ok(SqlValue::Bool(raw == "TRUE")),
        "timestamp" => NaiveDateTime::parse_from_str(&unquote()?, "%Y-%m-%d %H:%M:%S")
            .map(SqlValue::Timestamp)
            .map_err(|e| backend_err(format!("bad timestamp literal {raw}: {e}"))),
        "date" => NaiveDate::parse_from_str(&unquote()?, "%Y-%m-%d")
            .map(SqlValue::Date)
            .map_err(|e| backend_err(format!("bad date literal {raw}: {e}"))),
        "time" => NaiveTime::parse_from_str(&unquote()?, "%H:%M:%S")
            .map(SqlValue::Time)
            .map_err(|e| backend_err(format!("bad time literal {raw}: {e}"))),
        other => Err(backend_err(format!("mock cannot parse type {other}"))),
    }
}
