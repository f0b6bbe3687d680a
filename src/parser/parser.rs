//! Hand-written tokenizer and recursive-descent parser for the supported
//! SQL subset:
//!
//! ```text
//! SELECT proj ("," proj)* FROM table [alias] ("," table [alias])*
//!   ["WHERE" cond ("AND" cond)*] ["LIMIT" n] ["OFFSET" n]
//! proj := ref ["AS"] [alias]
//! cond := ref op (literal | ref)
//! op   := "=" | "<>" | "!=" | ">" | ">=" | "<" | "<="
//! ```
//!
//! Column references must be qualified (`alias.column`); aliases are
//! resolved to table names in the produced AST. Two references joined by
//! `=` form a join restriction; any other operator between two references
//! is rejected.

use std::collections::HashMap;

use super::ast::{Ast, CompareOp, Literal, Projection, Restriction};
use super::errors::{ParseError, ParseResult};

const KEYWORDS: &[&str] = &["SELECT", "FROM", "WHERE", "AND", "AS", "LIMIT", "OFFSET"];

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Keyword(&'static str),
    Ident(String),
    Number(f64),
    Str(String),
    Op(CompareOp),
    Comma,
    Dot,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let start = self.pos;
        let c = match self.peek_char() {
            Some(c) => c,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    start,
                    end: start,
                })
            }
        };

        if c.is_ascii_alphabetic() || c == '_' {
            while let Some(c) = self.peek_char() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            let word = &self.input[start..self.pos];
            let upper = word.to_ascii_uppercase();
            let kind = match KEYWORDS.iter().find(|k| **k == upper) {
                Some(keyword) => TokenKind::Keyword(keyword),
                None => TokenKind::Ident(word.to_string()),
            };
            return Ok(Token {
                kind,
                start,
                end: self.pos,
            });
        }

        if c.is_ascii_digit() || (c == '-' && self.next_is_digit()) {
            self.pos += 1;
            let mut saw_dot = false;
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() {
                    self.pos += 1;
                } else if c == '.' && !saw_dot && self.next_is_digit() {
                    saw_dot = true;
                    self.pos += 1;
                } else {
                    break;
                }
            }
            let text = &self.input[start..self.pos];
            let value: f64 = text.parse().map_err(|_| {
                ParseError::new(format!("invalid number literal '{text}'"), self.input, start, self.pos)
            })?;
            return Ok(Token {
                kind: TokenKind::Number(value),
                start,
                end: self.pos,
            });
        }

        if c == '\'' {
            return self.lex_string(start);
        }

        let rest = &self.input[self.pos..];
        for (text, op) in [
            (">=", CompareOp::Ge),
            ("<=", CompareOp::Le),
            ("<>", CompareOp::Ne),
            ("!=", CompareOp::Ne),
        ] {
            if rest.starts_with(text) {
                self.pos += 2;
                return Ok(Token {
                    kind: TokenKind::Op(op),
                    start,
                    end: self.pos,
                });
            }
        }

        self.pos += c.len_utf8();
        let kind = match c {
            '=' => TokenKind::Op(CompareOp::Eq),
            '>' => TokenKind::Op(CompareOp::Gt),
            '<' => TokenKind::Op(CompareOp::Lt),
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            other => {
                return Err(ParseError::new(
                    format!("unexpected character '{other}'"),
                    self.input,
                    start,
                    self.pos,
                ))
            }
        };
        Ok(Token {
            kind,
            start,
            end: self.pos,
        })
    }

    fn lex_string(&mut self, start: usize) -> ParseResult<Token> {
        self.pos += 1; // opening quote
        let mut value = String::new();
        while let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
            if c == '\'' {
                // doubled quote is an escaped quote
                if self.peek_char() == Some('\'') {
                    self.pos += 1;
                    value.push('\'');
                    continue;
                }
                return Ok(Token {
                    kind: TokenKind::Str(value),
                    start,
                    end: self.pos,
                });
            }
            value.push(c);
        }
        Err(ParseError::new(
            "unterminated string literal",
            self.input,
            start,
            self.pos,
        ))
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_is_digit(&self) -> bool {
        self.input[self.pos..]
            .chars()
            .nth(1)
            .is_some_and(|c| c.is_ascii_digit())
    }
}

struct Parser<'a> {
    sql: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// alias or table name -> table name
    tables: HashMap<String, String>,
}

/// Parses a SQL statement into the query AST.
pub fn parse_sql(sql: &str) -> ParseResult<Ast> {
    let tokens = Lexer::new(sql).tokenize()?;
    Parser {
        sql,
        tokens,
        pos: 0,
        tables: HashMap::new(),
    }
    .parse()
}

impl<'a> Parser<'a> {
    fn parse(mut self) -> ParseResult<Ast> {
        self.expect_keyword("SELECT")?;

        // Projections reference aliases that are declared later in the FROM
        // clause, so resolution is deferred.
        let mut raw_projections = vec![self.parse_projection()?];
        while self.eat(&TokenKind::Comma) {
            raw_projections.push(self.parse_projection()?);
        }

        self.expect_keyword("FROM")?;
        let mut ast = Ast::default();
        self.parse_table(&mut ast)?;
        while self.eat(&TokenKind::Comma) {
            self.parse_table(&mut ast)?;
        }

        for (reference, alias, span) in raw_projections {
            let column = self.resolve(&reference, span)?;
            ast.projections.push(Projection::new(column, alias));
        }

        if self.eat_keyword("WHERE") {
            self.parse_condition(&mut ast)?;
            while self.eat_keyword("AND") {
                self.parse_condition(&mut ast)?;
            }
        }

        loop {
            if self.peek_is_keyword("LIMIT") && ast.limit.is_none() {
                self.advance();
                ast.limit = Some(self.parse_count("LIMIT")?);
            } else if self.peek_is_keyword("OFFSET") && ast.offset.is_none() {
                self.advance();
                ast.offset = Some(self.parse_count("OFFSET")?);
            } else {
                break;
            }
        }

        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            return Err(self.error_at("unexpected input after statement", &token));
        }
        Ok(ast)
    }

    /// `ref ["AS"] [alias]` — returns (unresolved ref, alias, ref span)
    fn parse_projection(&mut self) -> ParseResult<(String, String, (usize, usize))> {
        let (reference, column, span) = self.parse_reference()?;
        let alias = if self.eat_keyword("AS") {
            self.expect_ident("output alias")?
        } else if let TokenKind::Ident(_) = self.peek().kind {
            self.expect_ident("output alias")?
        } else {
            column
        };
        Ok((reference, alias, span))
    }

    fn parse_table(&mut self, ast: &mut Ast) -> ParseResult<()> {
        let token = self.peek().clone();
        let table = self.expect_ident("table name")?;
        // tuples are keyed by table name, so a table may appear only once
        if ast.tables.contains(&table) {
            return Err(self.error_at(format!("table '{table}' appears twice in FROM"), &token));
        }
        ast.tables.push(table.clone());
        self.register_table(table.clone(), table.clone(), &token)?;
        if let TokenKind::Ident(_) = self.peek().kind {
            let alias_token = self.peek().clone();
            let alias = self.expect_ident("table alias")?;
            self.register_table(alias, table, &alias_token)?;
        }
        Ok(())
    }

    fn register_table(&mut self, key: String, table: String, token: &Token) -> ParseResult<()> {
        let replaced = self.tables.insert(key.clone(), table.clone());
        if matches!(replaced, Some(existing) if existing != table) {
            return Err(self.error_at(format!("duplicate table alias '{key}'"), token));
        }
        Ok(())
    }

    fn parse_condition(&mut self, ast: &mut Ast) -> ParseResult<()> {
        let (lhs_ref, _, lhs_span) = self.parse_reference()?;
        let lhs = self.resolve(&lhs_ref, lhs_span)?;

        let op_token = self.peek().clone();
        let op = match op_token.kind {
            TokenKind::Op(op) => {
                self.advance();
                op
            }
            _ => return Err(self.error_at("expected comparison operator", &op_token)),
        };

        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Number(n) => {
                self.advance();
                ast.restrictions
                    .push(Restriction::value(lhs, op, Literal::Number(*n)));
            }
            TokenKind::Str(s) => {
                self.advance();
                ast.restrictions
                    .push(Restriction::value(lhs, op, Literal::Text(s.clone())));
            }
            TokenKind::Ident(_) => {
                let (rhs_ref, _, rhs_span) = self.parse_reference()?;
                let rhs = self.resolve(&rhs_ref, rhs_span)?;
                if op != CompareOp::Eq {
                    return Err(self.error_at(
                        format!("only equality joins are supported, found '{}'", op.as_str()),
                        &op_token,
                    ));
                }
                ast.restrictions.push(Restriction::join(lhs, rhs));
            }
            _ => return Err(self.error_at("expected literal or column reference", &token)),
        }
        Ok(())
    }

    /// `ident "." ident` — returns (alias-qualified ref, column part, span)
    fn parse_reference(&mut self) -> ParseResult<(String, String, (usize, usize))> {
        let token = self.peek().clone();
        let qualifier = self.expect_ident("qualified column reference")?;
        if !self.eat(&TokenKind::Dot) {
            return Err(self.error_at(
                format!("expected qualified reference '<table>.{qualifier}'"),
                &token,
            ));
        }
        let column = self.expect_ident("column name")?;
        let end = self.tokens[self.pos - 1].end;
        Ok((format!("{qualifier}.{column}"), column.clone(), (token.start, end)))
    }

    /// Rewrites the alias part of a reference to its table name.
    fn resolve(&self, reference: &str, span: (usize, usize)) -> ParseResult<String> {
        let (alias, column) = super::ast::split_qualified(reference);
        match self.tables.get(alias) {
            Some(table) => Ok(format!("{table}.{column}")),
            None => Err(ParseError::new(
                format!("unknown table alias '{alias}'"),
                self.sql,
                span.0,
                span.1,
            )),
        }
    }

    fn parse_count(&mut self, clause: &str) -> ParseResult<u32> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number(n) if n >= 0.0 && n.fract() == 0.0 => {
                self.advance();
                Ok(n as u32)
            }
            _ => Err(self.error_at(format!("{clause} expects a non-negative integer"), &token)),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek_is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Keyword(k) if *k == keyword)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_is_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<()> {
        let token = self.peek().clone();
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error_at(format!("expected {keyword}"), &token))
        }
    }

    fn expect_ident(&mut self, what: &str) -> ParseResult<String> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error_at(format!("expected {what}"), &token)),
        }
    }

    fn error_at(&self, message: impl Into<String>, token: &Token) -> ParseError {
        ParseError::new(message, self.sql, token.start, token.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_select_with_alias() {
        let ast = parse_sql("SELECT a.NAME as NAME FROM animals a").unwrap();
        assert_eq!(ast.tables, vec!["animals"]);
        assert_eq!(ast.projections, vec![Projection::new("animals.NAME", "NAME")]);
        assert!(ast.restrictions.is_empty());
        assert_eq!(ast.limit, None);
        assert_eq!(ast.row_index_alias, None);
    }

    #[test]
    fn projection_alias_defaults_to_column_name() {
        let ast = parse_sql("SELECT a.NAME FROM animals a").unwrap();
        assert_eq!(ast.projections, vec![Projection::new("animals.NAME", "NAME")]);
    }

    #[test]
    fn table_name_is_usable_without_alias() {
        let ast = parse_sql("SELECT animals.NAME FROM animals").unwrap();
        assert_eq!(ast.projections[0].column, "animals.NAME");
    }

    #[test]
    fn parses_joins_and_value_restrictions() {
        let ast = parse_sql(
            "SELECT o.OrderNo as OrderNo, p.desc as desc \
             FROM orders o, items i, parts p \
             WHERE o.OrderNo = i.OrderNo AND i.PartNo = p.PartNo AND p.PartNo = 1313",
        )
        .unwrap();
        assert_eq!(ast.tables, vec!["orders", "items", "parts"]);
        assert_eq!(
            ast.restrictions,
            vec![
                Restriction::join("orders.OrderNo", "items.OrderNo"),
                Restriction::join("items.PartNo", "parts.PartNo"),
                Restriction::value("parts.PartNo", CompareOp::Eq, Literal::Number(1313.0)),
            ]
        );
    }

    #[test]
    fn parses_every_comparison_operator() {
        for (text, op) in [
            ("=", CompareOp::Eq),
            ("<>", CompareOp::Ne),
            ("!=", CompareOp::Ne),
            (">", CompareOp::Gt),
            (">=", CompareOp::Ge),
            ("<", CompareOp::Lt),
            ("<=", CompareOp::Le),
        ] {
            let sql = format!("SELECT c.Id FROM customer c WHERE c.Age {text} 21");
            let ast = parse_sql(&sql).unwrap();
            assert_eq!(
                ast.restrictions,
                vec![Restriction::value("customer.Age", op, Literal::Number(21.0))],
                "operator {text}"
            );
        }
    }

    #[test]
    fn parses_string_literals_with_escaped_quotes() {
        let ast =
            parse_sql("SELECT c.Name FROM customer c WHERE c.Name = 'O''Brien'").unwrap();
        assert_eq!(
            ast.restrictions,
            vec![Restriction::value(
                "customer.Name",
                CompareOp::Eq,
                Literal::Text("O'Brien".into()),
            )]
        );
    }

    #[test]
    fn parses_negative_and_fractional_numbers() {
        let ast = parse_sql("SELECT c.Id FROM customer c WHERE c.Balance < -12.5").unwrap();
        assert_eq!(
            ast.restrictions,
            vec![Restriction::value(
                "customer.Balance",
                CompareOp::Lt,
                Literal::Number(-12.5),
            )]
        );
    }

    #[test]
    fn parses_limit_and_offset_in_either_order() {
        let ast = parse_sql("SELECT c.Id FROM customer c LIMIT 20 OFFSET 40").unwrap();
        assert_eq!((ast.limit, ast.offset), (Some(20), Some(40)));

        let ast = parse_sql("SELECT c.Id FROM customer c OFFSET 11").unwrap();
        assert_eq!((ast.limit, ast.offset), (None, Some(11)));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let ast = parse_sql("select a.NAME from animals a where a.NAME = 'Boa' limit 1").unwrap();
        assert_eq!(ast.limit, Some(1));
        assert_eq!(ast.restrictions.len(), 1);
    }

    #[test]
    fn rejects_unqualified_references() {
        let err = parse_sql("SELECT NAME FROM animals a").unwrap_err();
        assert!(err.message().contains("qualified"));
    }

    #[test]
    fn rejects_unknown_alias() {
        let err = parse_sql("SELECT x.NAME FROM animals a").unwrap_err();
        assert!(err.message().contains("unknown table alias 'x'"));
    }

    #[test]
    fn rejects_non_equality_joins() {
        let err =
            parse_sql("SELECT a.Id FROM t1 a, t2 b WHERE a.Id > b.Id").unwrap_err();
        assert!(err.message().contains("equality joins"));
    }

    #[test]
    fn rejects_duplicate_aliases() {
        let err = parse_sql("SELECT a.Id FROM t1 a, t2 a").unwrap_err();
        assert!(err.message().contains("duplicate table alias"));
    }

    #[test]
    fn rejects_a_table_listed_twice() {
        let err = parse_sql("SELECT a.Id FROM t a, t b").unwrap_err();
        assert!(err.message().contains("appears twice"));
    }

    #[test]
    fn unsupported_statements_fail_with_caret() {
        let err = parse_sql("DELETE FROM t").unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("expected SELECT"));
        assert!(rendered.contains('^'));

        // statements with characters outside the subset die in the lexer
        let err = parse_sql("INSERT INTO t VALUES (1)").unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("unexpected character '('"));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = parse_sql("SELECT a.Id FROM t a GROUP BY a.Id").unwrap_err();
        assert!(err.message().contains("unexpected input"));
    }
}
