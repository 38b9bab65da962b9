//! End-to-end tests over JASS-style expression snippets.

use jass_syntax::{
    Error, LexErrorKind, LineIndex, Position, SyntaxErrorKind, TokenKind, format, format_tree,
    parse_str, tokenize,
};

const SNIPPET: &str = "\
// conditions from a trigger
GetUnitLifePercent(u) < 25.0 and not IsUnitType(u, UNIT_TYPE_HERO)
GetUnitTypeId(u) == 'hfoo' or GetUnitTypeId(u) == 'hkni'
/* damage */ (base + bonus[level]) * 0x2 - armor / 3
";

#[test]
fn e2e_snippet_trees() {
    let results = parse_str(SNIPPET).expect("parse");
    let trees: Vec<_> = results.iter().map(|r| format_tree(&r.ast)).collect();
    assert_eq!(
        trees,
        vec![
            "(and (< (call GetUnitLifePercent u) 25.0) (not (call IsUnitType u UNIT_TYPE_HERO)))",
            "(or (== (call GetUnitTypeId u) 'hfoo') (== (call GetUnitTypeId u) 'hkni'))",
            "(- (* (+ base (index bonus level)) 0x2) (/ armor 3))",
        ]
    );
}

#[test]
fn e2e_snippet_source_text() {
    let results = parse_str(SNIPPET).expect("parse");
    let lines: Vec<_> = SNIPPET.lines().collect();
    assert_eq!(results[0].source_text(SNIPPET), Some(lines[1]));
    assert_eq!(results[1].source_text(SNIPPET), Some(lines[2]));
    assert_eq!(
        results[2].source_text(SNIPPET),
        Some("(base + bonus[level]) * 0x2 - armor / 3")
    );
}

#[test]
fn e2e_snippet_format() {
    let results = parse_str(SNIPPET).expect("parse");
    assert_eq!(
        format(&results[2].ast),
        "(base + bonus[level]) * 0x2 - armor / 3"
    );
}

#[test]
fn e2e_crlf_input() {
    let src = "a +\r\n b // x\r\nc";
    let results = parse_str(src).expect("parse");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].source_text(src), Some("a +\r\n b"));
    let tokens = tokenize(src).expect("tokenize");
    assert_eq!(tokens[3].kind, TokenKind::Comment);
    assert_eq!(tokens[3].value.as_deref(), Some("// x"));
}

#[test]
fn e2e_lex_error_location() {
    let src = "1 + 2\nf(\"unterminated)\n";
    let Err(Error::Lex(err)) = parse_str(src) else {
        panic!("expected lex error");
    };
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.position, Position { line: 2, column: 3 });
}

#[test]
fn e2e_syntax_error_location() {
    let src = "x\ny and (z or\n";
    let err = parse_str(src).unwrap_err();
    let Error::Syntax(ref syntax) = err else {
        panic!("expected syntax error");
    };
    assert_eq!(syntax.kind, SyntaxErrorKind::ExpectedExpression);
    assert!(syntax.at_end());
    let pos = LineIndex::new(src).position(err.offset());
    assert_eq!(pos, Position { line: 2, column: 12 });
}
