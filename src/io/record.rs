//! Attribute-tag text records: `<Name Attr="value" .../>`.
//!
//! This is the small subset of XML the map files use. There is no escaping,
//! no text content and no comments; attribute values never contain quotes.

use crate::error::{MapError, MapResult};
use std::fmt::{Display, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<Name ...>`
    Open,
    /// `<Name .../>`
    Empty,
    /// `</Name>`
    Close,
}

/// One parsed or to-be-written element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub attrs: Vec<(String, String)>,
    /// 1-based source line, 0 for elements built in memory.
    pub line: usize,
}

impl Element {
    pub fn new(name: &str, kind: ElementKind) -> Self {
        Self { name: name.to_string(), kind, attrs: Vec::new(), line: 0 }
    }

    pub fn with(mut self, name: &str, value: impl Display) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn attr(&self, name: &str) -> MapResult<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| MapError::parse(self.line, format!("<{}> is missing attribute {}", self.name, name)))
    }

    fn parsed<T: FromStr>(&self, name: &str) -> MapResult<T> {
        let raw = self.attr(name)?;
        raw.trim()
            .parse()
            .map_err(|_| MapError::parse(self.line, format!("attribute {}=\"{}\" is malformed", name, raw)))
    }

    pub fn integer(&self, name: &str) -> MapResult<u32> { self.parsed(name) }
    pub fn double(&self, name: &str) -> MapResult<f64> { self.parsed(name) }

    /// A `0`/`1` attribute.
    pub fn flag(&self, name: &str) -> MapResult<bool> {
        match self.attr(name)?.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(MapError::parse(self.line, format!("attribute {}=\"{}\" is not 0 or 1", name, other))),
        }
    }

    pub fn expect(&self, name: &str, kind: ElementKind) -> MapResult<()> {
        if self.name == name && self.kind == kind {
            Ok(())
        } else {
            Err(MapError::parse(self.line, format!("expected {:?} <{}>, found {:?} <{}>", kind, name, self.kind, self.name)))
        }
    }
}

/// Accumulates elements into an indented document.
#[derive(Debug, Default)]
pub struct RecordWriter {
    out: String,
    depth: usize,
}

impl RecordWriter {
    pub fn new() -> Self { Self::default() }

    pub fn write(&mut self, element: &Element) {
        if element.kind == ElementKind::Close {
            self.depth = self.depth.saturating_sub(1);
        }
        for _ in 0..self.depth {
            self.out.push(' ');
        }
        match element.kind {
            ElementKind::Close => {
                let _ = write!(self.out, "</{}>", element.name);
            }
            ElementKind::Open | ElementKind::Empty => {
                let _ = write!(self.out, "<{}", element.name);
                for (k, v) in &element.attrs {
                    let _ = write!(self.out, " {}=\"{}\"", k, v);
                }
                self.out.push_str(if element.kind == ElementKind::Empty { "/>" } else { ">" });
            }
        }
        self.out.push('\n');
        if element.kind == ElementKind::Open {
            self.depth += 1;
        }
    }

    pub fn finish(self) -> String { self.out }
}

/// Iterates the elements of a document.
pub struct RecordReader<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0, line: 1 }
    }

    /// The line the reader has advanced to.
    pub fn line(&self) -> usize { self.line }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect_char(&mut self, want: char) -> MapResult<()> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(MapError::parse(self.line, format!("expected '{}', found '{}'", want, c))),
            None => Err(MapError::parse(self.line, format!("expected '{}', found end of input", want))),
        }
    }

    fn name(&mut self) -> MapResult<String> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        if start == self.pos {
            return Err(MapError::parse(self.line, "expected a name"));
        }
        Ok(self.text[start..self.pos].to_string())
    }

    fn element(&mut self) -> MapResult<Element> {
        let line = self.line;
        self.expect_char('<')?;

        if self.peek() == Some('/') {
            self.bump();
            let name = self.name()?;
            self.skip_whitespace();
            self.expect_char('>')?;
            return Ok(Element { name, kind: ElementKind::Close, attrs: Vec::new(), line });
        }

        let name = self.name()?;
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.bump();
                    self.expect_char('>')?;
                    return Ok(Element { name, kind: ElementKind::Empty, attrs, line });
                }
                Some('>') => {
                    self.bump();
                    return Ok(Element { name, kind: ElementKind::Open, attrs, line });
                }
                Some(_) => {
                    let key = self.name()?;
                    self.skip_whitespace();
                    self.expect_char('=')?;
                    self.skip_whitespace();
                    self.expect_char('"')?;
                    let start = self.pos;
                    while self.peek().is_some_and(|c| c != '"') {
                        self.bump();
                    }
                    let value = self.text[start..self.pos].to_string();
                    self.expect_char('"')?;
                    attrs.push((key, value));
                }
                None => return Err(MapError::parse(self.line, format!("unterminated <{}>", name))),
            }
        }
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = MapResult<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        self.peek()?;
        let result = self.element();
        if result.is_err() {
            // Stop after the first error.
            self.pos = self.text.len();
        }
        Some(result)
    }
}
