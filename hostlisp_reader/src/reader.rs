//! Recursive descent reader: tokens to forms.

use crate::error::{ReadError, ReadResult};
use crate::form::{Form, FormKind, Symbol};
use crate::lexer::{Lexer, SpannedToken};
use crate::span::Span;
use crate::token::Token;

#[derive(Debug)]
pub struct Reader<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Read every top-level form until end of input.
    pub fn read_all<E>(&mut self) -> ReadResult<Vec<Form<E>>> {
        let mut forms = Vec::new();
        while let Some(form) = self.read_next()? {
            forms.push(form);
        }
        Ok(forms)
    }

    /// Read the next top-level form, or `None` at end of input.
    pub fn read_next<E>(&mut self) -> ReadResult<Option<Form<E>>> {
        match self.lexer.next_token() {
            None => Ok(None),
            Some(token) => self.read_from(token?).map(Some),
        }
    }

    fn read_from<E>(&mut self, tok: SpannedToken<'a>) -> ReadResult<Form<E>> {
        match tok.token {
            Token::LParen => {
                let (items, close) = self.read_seq(Token::RParen, ")")?;
                Ok(Form::new(FormKind::List(items), tok.span.to(&close)))
            }
            Token::LBracket => {
                let (items, close) = self.read_seq(Token::RBracket, "]")?;
                Ok(Form::new(FormKind::Vector(items), tok.span.to(&close)))
            }
            Token::RParen | Token::RBracket => {
                Err(ReadError::unexpected_token(tok.text, tok.span))
            }
            Token::DoubleQuote => {
                let body = &tok.text[1..tok.text.len() - 1];
                let text = unescape_string(body, tok.span)?;
                Ok(Form::new(FormKind::Str(text), tok.span))
            }
            Token::PipeSymbol => {
                let name = &tok.text[1..tok.text.len() - 1];
                Ok(Form::symbol(Symbol::simple(name), tok.span))
            }
            Token::Char => Ok(Form::new(
                FormKind::Char(parse_char(tok.text, tok.span)?),
                tok.span,
            )),
            Token::Atom => Ok(Form::new(classify_atom(tok.text, tok.span)?, tok.span)),
        }
    }

    /// Read forms up to the matching closing delimiter.
    /// Returns the items and the span of the closing delimiter.
    fn read_seq<E>(&mut self, close: Token, expected: &str) -> ReadResult<(Vec<Form<E>>, Span)> {
        let mut items = Vec::new();
        loop {
            let Some(next) = self.lexer.next_token() else {
                return Err(ReadError::unexpected_eof(
                    format!("'{}'", expected),
                    self.lexer.eof_span(),
                ));
            };
            let tok = next?;
            if tok.token == close {
                return Ok((items, tok.span));
            }
            if tok.token.is_closing() {
                return Err(ReadError::unexpected_token(tok.text, tok.span));
            }
            items.push(self.read_from(tok)?);
        }
    }
}

/// Classify bare atom text as a literal, keyword or symbol.
fn classify_atom<E>(text: &str, span: Span) -> ReadResult<FormKind<E>> {
    match text {
        "nil" => return Ok(FormKind::Nil),
        "true" => return Ok(FormKind::Bool(true)),
        "false" => return Ok(FormKind::Bool(false)),
        _ => {}
    }

    if let Some(rest) = text.strip_prefix(':') {
        if rest.is_empty() {
            return Err(ReadError::unexpected_token(text, span));
        }
        return Ok(FormKind::Keyword(Symbol::parse(rest)));
    }

    if looks_numeric(text) {
        return parse_number(text, span);
    }

    Ok(FormKind::Symbol(Symbol::parse(text)))
}

fn looks_numeric(text: &str) -> bool {
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    digits.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

fn parse_number<E>(text: &str, span: Span) -> ReadResult<FormKind<E>> {
    let invalid = || ReadError::InvalidNumber {
        literal: text.to_string(),
        span,
    };

    let (negative, unsigned) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        let value = i64::from_str_radix(hex, 16).map_err(|_| invalid())?;
        return Ok(FormKind::Int(if negative { -value } else { value }));
    }

    if unsigned.contains(['.', 'e', 'E']) {
        return text.parse::<f64>().map(FormKind::Float).map_err(|_| invalid());
    }

    text.parse::<i64>().map(FormKind::Int).map_err(|_| invalid())
}

fn parse_char(text: &str, span: Span) -> ReadResult<char> {
    let body = &text[1..];
    match body {
        "newline" => Ok('\n'),
        "space" => Ok(' '),
        "tab" => Ok('\t'),
        _ => {
            let mut chars = body.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(ReadError::InvalidCharacter {
                    literal: text.to_string(),
                    span,
                }),
            }
        }
    }
}

fn unescape_string(body: &str, span: Span) -> ReadResult<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                return Err(ReadError::InvalidEscape {
                    sequence: format!("\\{}", other),
                    span,
                })
            }
            None => {
                return Err(ReadError::InvalidEscape {
                    sequence: "\\".to_string(),
                    span,
                })
            }
        }
    }
    Ok(out)
}
