use pddl_lexer::tokenize;

#[test]
fn snapshot_minimal_domain_tokens() {
    let tokens = tokenize("(define (domain d) (:requirements :strips))");
    insta::assert_debug_snapshot!(tokens, @r#"
    [
        Token {
            kind: Open,
            text: "(",
            line: 1,
        },
        Token {
            kind: Name,
            text: "define",
            line: 1,
        },
        Token {
            kind: Open,
            text: "(",
            line: 1,
        },
        Token {
            kind: Name,
            text: "domain",
            line: 1,
        },
        Token {
            kind: Name,
            text: "d",
            line: 1,
        },
        Token {
            kind: Close,
            text: ")",
            line: 1,
        },
        Token {
            kind: Open,
            text: "(",
            line: 1,
        },
        Token {
            kind: CategoryName,
            text: ":requirements",
            line: 1,
        },
        Token {
            kind: CategoryName,
            text: ":strips",
            line: 1,
        },
        Token {
            kind: Close,
            text: ")",
            line: 1,
        },
        Token {
            kind: Close,
            text: ")",
            line: 1,
        },
        Token {
            kind: Eof,
            text: "",
            line: 1,
        },
    ]
    "#);
}

#[test]
fn snapshot_typed_list_with_negative_number() {
    let tokens = tokenize("(:functions (cost ?a - block) - number) (= (total-cost) -1)");
    insta::assert_debug_snapshot!(tokens, @r#"
    [
        Token {
            kind: Open,
            text: "(",
            line: 1,
        },
        Token {
            kind: CategoryName,
            text: ":functions",
            line: 1,
        },
        Token {
            kind: Open,
            text: "(",
            line: 1,
        },
        Token {
            kind: Name,
            text: "cost",
            line: 1,
        },
        Token {
            kind: VariableName,
            text: "?a",
            line: 1,
        },
        Token {
            kind: Minus,
            text: "-",
            line: 1,
        },
        Token {
            kind: Name,
            text: "block",
            line: 1,
        },
        Token {
            kind: Close,
            text: ")",
            line: 1,
        },
        Token {
            kind: Minus,
            text: "-",
            line: 1,
        },
        Token {
            kind: Name,
            text: "number",
            line: 1,
        },
        Token {
            kind: Close,
            text: ")",
            line: 1,
        },
        Token {
            kind: Open,
            text: "(",
            line: 1,
        },
        Token {
            kind: Equal,
            text: "=",
            line: 1,
        },
        Token {
            kind: Open,
            text: "(",
            line: 1,
        },
        Token {
            kind: Name,
            text: "total-cost",
            line: 1,
        },
        Token {
            kind: Close,
            text: ")",
            line: 1,
        },
        Token {
            kind: Number,
            text: "-1",
            line: 1,
        },
        Token {
            kind: Close,
            text: ")",
            line: 1,
        },
        Token {
            kind: Eof,
            text: "",
            line: 1,
        },
    ]
    "#);
}
