//! CSS selector parsing and matching.
//!
//! Supports the subset page routines use: selector lists, descendant and
//! child combinators, type/universal/id/class selectors and attribute
//! selectors with `=`, `~=`, `^=`, `$=` and `*=`.

use crate::tree::DomTree;

/// Attribute selector operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=value]`
    Equals(String),
    /// `[attr~=value]`
    Includes(String),
    /// `[attr^=value]`
    Prefix(String),
    /// `[attr$=value]`
    Suffix(String),
    /// `[attr*=value]`
    Substring(String),
}

/// A single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Type(String),
    Universal,
    Id(String),
    Class(String),
    Attribute { name: String, op: AttrOp },
}

/// Combinator between two compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// Compound selectors joined by combinators, stored left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    compounds: Vec<Vec<SimpleSelector>>,
    combinators: Vec<Combinator>,
}

/// A comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

/// Selector syntax error with the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError(pub String);

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            chars: input.chars().collect(),
            pos: 0,
            input,
        };
        let mut selectors = vec![parser.complex()?];
        loop {
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some(',') => {
                    parser.pos += 1;
                    selectors.push(parser.complex()?);
                }
                Some(_) => return Err(parser.error()),
            }
        }
        Ok(Self { selectors })
    }

    pub fn matches(&self, tree: &DomTree, node: usize) -> bool {
        self.selectors.iter().any(|s| s.matches(tree, node))
    }
}

impl ComplexSelector {
    fn matches(&self, tree: &DomTree, node: usize) -> bool {
        self.matches_from(tree, node, self.compounds.len() - 1)
    }

    /// Match compound `idx` against `node`, then walk left through the
    /// combinators, backtracking over descendant ancestors.
    fn matches_from(&self, tree: &DomTree, node: usize, idx: usize) -> bool {
        if !compound_matches(&self.compounds[idx], tree, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|p| self.matches_from(tree, p, idx - 1)),
            Combinator::Descendant => {
                let mut cur = tree.parent(node);
                while let Some(p) = cur {
                    if self.matches_from(tree, p, idx - 1) {
                        return true;
                    }
                    cur = tree.parent(p);
                }
                false
            }
        }
    }
}

fn compound_matches(compound: &[SimpleSelector], tree: &DomTree, node: usize) -> bool {
    let Some(el) = tree.element(node) else {
        return false;
    };
    compound.iter().all(|simple| match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(tag) => el.tag.eq_ignore_ascii_case(tag),
        SimpleSelector::Id(id) => el.attr("id") == Some(id.as_str()),
        SimpleSelector::Class(class) => el.classes().any(|c| c == class),
        SimpleSelector::Attribute { name, op } => {
            let Some(value) = el.attr(name) else {
                return false;
            };
            match op {
                AttrOp::Exists => true,
                AttrOp::Equals(v) => value == v,
                AttrOp::Includes(v) => value.split_ascii_whitespace().any(|w| w == v),
                AttrOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
                AttrOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
                AttrOp::Substring(v) => !v.is_empty() && value.contains(v.as_str()),
            }
        }
    })
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    input: &'a str,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn error(&self) -> SelectorError {
        SelectorError(self.input.to_string())
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    combinators.push(Combinator::Child);
                }
                Some(_) if had_ws => combinators.push(Combinator::Descendant),
                Some(_) => return Err(self.error()),
            }
            compounds.push(self.compound()?);
        }
        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Vec<SimpleSelector>, SelectorError> {
        let mut out = Vec::new();
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                out.push(SimpleSelector::Universal);
            }
            Some(c) if is_ident_char(c) => out.push(SimpleSelector::Type(self.ident()?)),
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    out.push(SimpleSelector::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    out.push(SimpleSelector::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    out.push(self.attribute()?);
                }
                _ => break,
            }
        }
        if out.is_empty() {
            return Err(self.error());
        }
        Ok(out)
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        let op_char = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(SimpleSelector::Attribute {
                    name,
                    op: AttrOp::Exists,
                });
            }
            Some('=') => {
                self.pos += 1;
                '='
            }
            Some(c @ ('~' | '^' | '$' | '*')) if self.chars.get(self.pos + 1) == Some(&'=') => {
                self.pos += 2;
                c
            }
            _ => return Err(self.error()),
        };
        self.skip_ws();
        let value = self.value()?;
        self.skip_ws();
        if self.peek() != Some(']') {
            return Err(self.error());
        }
        self.pos += 1;
        let op = match op_char {
            '=' => AttrOp::Equals(value),
            '~' => AttrOp::Includes(value),
            '^' => AttrOp::Prefix(value),
            '$' => AttrOp::Suffix(value),
            _ => AttrOp::Substring(value),
        };
        Ok(SimpleSelector::Attribute { name, op })
    }

    fn value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != q) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.error());
                }
                let value = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            _ => self.ident(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
