//! Reader tests
//!
//! End-to-end reading of member-access shaped forms.

use hostlisp_reader::{read_all, read_one, Form, FormKind, ReadError, Symbol};
use pretty_assertions::assert_eq;

fn read(source: &str) -> Form {
    read_one(source).unwrap_or_else(|e| panic!("read error: {}", e))
}

fn sym(name: &str) -> FormKind {
    FormKind::Symbol(Symbol::parse(name))
}

fn kinds(form: &Form) -> Vec<FormKind> {
    form.as_list()
        .expect("list form")
        .iter()
        .map(|f| f.kind.clone())
        .collect()
}

// ==================== Member access shapes ====================

#[test]
fn test_zero_arity_static_access() {
    let form = read("(. System.Math PI)");
    assert_eq!(kinds(&form), vec![sym("."), sym("System.Math"), sym("PI")]);
}

#[test]
fn test_call_with_string_argument() {
    let form = read(r#"(. String (Format "{0}" x))"#);
    let items = form.as_list().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(
        kinds(&items[2]),
        vec![
            sym("Format"),
            FormKind::Str("{0}".to_string()),
            sym("x"),
        ]
    );
}

#[test]
fn test_type_args_and_by_ref() {
    let form = read("(. Dict TryGetValue (type-args int) k (by-ref v))");
    let items = form.as_list().unwrap();
    assert_eq!(items.len(), 6);
    assert!(!items[4].is_list_headed_by("type-args"));
    assert!(items[3].is_list_headed_by("type-args"));
    assert!(items[5].is_list_headed_by("by-ref"));
}

#[test]
fn test_pipe_symbol_array_type() {
    let form = read("(. |System.Int32[]| Length)");
    assert_eq!(
        kinds(&form)[1],
        FormKind::Symbol(Symbol::simple("System.Int32[]"))
    );
}

#[test]
fn test_qualified_symbols_and_keywords() {
    let form = read("(clojure.core/str :tag [1 2.5 \\a nil])");
    let items = form.as_list().unwrap();
    assert_eq!(
        items[0].kind,
        FormKind::Symbol(Symbol::qualified("clojure.core", "str"))
    );
    assert_eq!(items[1].kind, FormKind::Keyword(Symbol::simple("tag")));
    assert_eq!(
        items[2].kind,
        FormKind::Vector(vec![
            Form::new(FormKind::Int(1), items[2].as_vector_span(0)),
            Form::new(FormKind::Float(2.5), items[2].as_vector_span(1)),
            Form::new(FormKind::Char('a'), items[2].as_vector_span(2)),
            Form::new(FormKind::Nil, items[2].as_vector_span(3)),
        ])
    );
}

// ==================== Spans ====================

#[test]
fn test_list_span_covers_delimiters() {
    let form = read("  (. obj\n  -size)");
    assert_eq!(form.span.start, 2);
    assert_eq!(form.span.end, 17);
    assert_eq!(form.span.start_line, 1);
    assert_eq!(form.span.end_line, 2);

    let member = &form.as_list().unwrap()[2];
    assert_eq!(member.span.start_line, 2);
    assert_eq!(member.span.start_column, 3);
}

#[test]
fn test_multiple_top_level_forms() {
    let forms: Vec<Form> = read_all("(. a b) ; comment\n(. c d)").unwrap();
    assert_eq!(forms.len(), 2);
}

// ==================== Errors ====================

#[test]
fn test_unclosed_list() {
    let err = read_all::<hostlisp_reader::NoEmbed>("(. a b").unwrap_err();
    assert!(matches!(err, ReadError::UnexpectedEof { .. }));
    assert!(err.to_string().contains("')'"));
}

#[test]
fn test_mismatched_delimiter() {
    let err = read_all::<hostlisp_reader::NoEmbed>("(. a b]").unwrap_err();
    assert!(matches!(err, ReadError::UnexpectedToken { .. }));
}

#[test]
fn test_stray_closing_paren() {
    let err = read_all::<hostlisp_reader::NoEmbed>(")").unwrap_err();
    assert!(matches!(err, ReadError::UnexpectedToken { .. }));
}

#[test]
fn test_invalid_character_literal() {
    let err = read_all::<hostlisp_reader::NoEmbed>(r"\abc").unwrap_err();
    assert!(matches!(err, ReadError::InvalidCharacter { .. }));
}

#[test]
fn test_form_serializes_to_json() {
    let form = read("(. Math PI)");
    let json = serde_json::to_string(&form).unwrap();
    assert!(json.contains("\"PI\""));
}

trait VectorSpan {
    fn as_vector_span(&self, index: usize) -> hostlisp_reader::Span;
}

impl VectorSpan for Form {
    fn as_vector_span(&self, index: usize) -> hostlisp_reader::Span {
        match &self.kind {
            FormKind::Vector(items) => items[index].span,
            _ => panic!("not a vector"),
        }
    }
}
