//! Form data model.
//!
//! A [`Form`] is the read representation of source code. Forms are immutable
//! once read; the compiler only ever inspects them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// An immutable name, optionally namespace-qualified. Equality is by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol {
    pub ns: Option<String>,
    pub name: String,
}

impl Symbol {
    /// An unqualified symbol.
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            ns: None,
            name: name.into(),
        }
    }

    pub fn qualified(ns: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ns: Some(ns.into()),
            name: name.into(),
        }
    }

    /// Split `ns/name` text into a symbol. A slash at either end, or a lone
    /// `/`, does not qualify the symbol.
    pub fn parse(text: &str) -> Self {
        match text.find('/') {
            Some(idx) if idx > 0 && idx + 1 < text.len() => {
                Self::qualified(&text[..idx], &text[idx + 1..])
            }
            _ => Self::simple(text),
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.ns.is_some()
    }

    /// True for an unqualified symbol with exactly this name.
    pub fn is(&self, name: &str) -> bool {
        self.ns.is_none() && self.name == name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ns {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Payload type for forms that never carry embedded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoEmbed {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormKind<E = NoEmbed> {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    Keyword(Symbol),
    Symbol(Symbol),
    List(Vec<Form<E>>),
    Vector(Vec<Form<E>>),
    /// A value spliced into a form after reading (never produced by the reader).
    Embedded(E),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form<E = NoEmbed> {
    pub kind: FormKind<E>,
    pub span: Span,
}

impl<E> Form<E> {
    pub fn new(kind: FormKind<E>, span: Span) -> Self {
        Self { kind, span }
    }

    /// Build a form with no source location.
    pub fn synthetic(kind: FormKind<E>) -> Self {
        Self::new(kind, Span::synthetic())
    }

    pub fn symbol(sym: Symbol, span: Span) -> Self {
        Self::new(FormKind::Symbol(sym), span)
    }

    pub fn list(items: Vec<Form<E>>, span: Span) -> Self {
        Self::new(FormKind::List(items), span)
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match &self.kind {
            FormKind::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Form<E>]> {
        match &self.kind {
            FormKind::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            FormKind::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_embedded(&self) -> Option<&E> {
        match &self.kind {
            FormKind::Embedded(value) => Some(value),
            _ => None,
        }
    }

    /// The head symbol of a list form, if any.
    pub fn head_symbol(&self) -> Option<&Symbol> {
        self.as_list()?.first()?.as_symbol()
    }

    /// True when this is a list whose head is the unqualified symbol `name`.
    pub fn is_list_headed_by(&self, name: &str) -> bool {
        self.head_symbol().is_some_and(|sym| sym.is(name))
    }
}

impl<E: fmt::Debug> fmt::Display for Form<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_seq<E: fmt::Debug>(
            f: &mut fmt::Formatter<'_>,
            open: &str,
            items: &[Form<E>],
            close: &str,
        ) -> fmt::Result {
            write!(f, "{}", open)?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, "{}", close)
        }

        match &self.kind {
            FormKind::Nil => write!(f, "nil"),
            FormKind::Bool(b) => write!(f, "{}", b),
            FormKind::Int(n) => write!(f, "{}", n),
            FormKind::Float(x) => write!(f, "{:?}", x),
            FormKind::Char(c) => write!(f, "\\{}", c),
            FormKind::Str(s) => write!(f, "{:?}", s),
            FormKind::Keyword(k) => write!(f, ":{}", k),
            FormKind::Symbol(s) => write!(f, "{}", s),
            FormKind::List(items) => write_seq(f, "(", items, ")"),
            FormKind::Vector(items) => write_seq(f, "[", items, "]"),
            FormKind::Embedded(value) => write!(f, "#<{:?}>", value),
        }
    }
}
