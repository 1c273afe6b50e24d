//! End-to-end tests for filter compilation through the public API.

// Integration tests live outside cfg(test)
#![allow(clippy::tests_outside_test_module)]

use fql_query::{
    CompareOp, Expr, FieldConfig, FieldSpec, MAX_COMPARISONS, MAX_NESTING_DEPTH, ParseError,
    Query, QueryErrorKind, TokenKind, compile, generate, parse, tokenize,
};

/// Field configuration used across these tests.
fn config() -> FieldConfig {
    serde_json::from_str(
        r#"{
            "type": {"type": "string"},
            "tag": {"type": "string"},
            "extension": {"type": "string"},
            "size": {"type": "number", "field": "file_size"},
            "positives": {"type": "number"},
            "first_seen": {"type": "date"},
            "engines": {"type": "string", "field_group": ["a", "b"]}
        }"#,
    )
    .unwrap()
}

fn matched(field: &str, value: &str) -> Query {
    Query::Match {
        field: field.into(),
        value: value.into(),
    }
}

fn eq(field: &str, value: &str) -> Expr {
    Expr::comparison(field, CompareOp::Eq, value)
}

#[test]
fn configured_field_uses_backend_name() {
    let config = config();
    for (input, backend) in [
        ("size=10", "file_size"),
        ("size!=10", "file_size"),
        ("positives>1", "positives"),
        ("first_seen<=2023-01-01", "first_seen"),
        ("type>=m", "type"),
    ] {
        let json = serde_json::to_string(&generate(input, &config).unwrap()).unwrap();
        assert!(
            json.contains(&format!("\"field\":\"{backend}\"")),
            "{input} -> {json}"
        );
    }
}

#[test]
fn size_units_lex_and_expand() {
    let kinds: Vec<TokenKind> = tokenize("size>=1000kb").iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Ge,
            TokenKind::Int,
            TokenKind::Unit,
            TokenKind::EndOfInput
        ]
    );
    assert_eq!(
        parse("size>=1000kb").unwrap(),
        Expr::comparison("size", CompareOp::Ge, "1000000")
    );
    assert_eq!(
        parse("size=5mb").unwrap(),
        Expr::comparison("size", CompareOp::Eq, "5000000")
    );
    assert_eq!(
        parse("size=2tb").unwrap(),
        Expr::comparison("size", CompareOp::Eq, "2000000000000")
    );
}

#[test]
fn precedence_and_implicit_and() {
    assert_eq!(
        parse("type=pe AND tag=upx OR size>1000").unwrap(),
        Expr::or(
            Expr::and(eq("type", "pe"), eq("tag", "upx")),
            Expr::comparison("size", CompareOp::Gt, "1000")
        )
    );
    assert_eq!(
        parse("type=pe OR tag=upx size>1000").unwrap(),
        Expr::or(
            eq("type", "pe"),
            Expr::and(eq("tag", "upx"), Expr::comparison("size", CompareOp::Gt, "1000"))
        )
    );
}

#[test]
fn grouped_query_generation() {
    assert_eq!(
        generate("extension=dll or (type=macho and positives>10)", &config()).unwrap(),
        Query::Disjunction {
            children: vec![
                matched("extension", "dll"),
                Query::Conjunction {
                    children: vec![
                        matched("type", "macho"),
                        Query::NumericRange {
                            field: "positives".into(),
                            min: Some(10.0),
                            max: None,
                            min_inclusive: false,
                            max_inclusive: false,
                        },
                    ]
                },
            ]
        }
    );
}

#[test]
fn field_group_expands_to_disjunction() {
    assert_eq!(
        generate("engines=malware", &config()).unwrap(),
        Query::Disjunction {
            children: vec![matched("a", "malware"), matched("b", "malware")]
        }
    );
}

#[test]
fn renamed_number_field_range() {
    assert_eq!(
        generate("size>1000", &config()).unwrap(),
        Query::NumericRange {
            field: "file_size".into(),
            min: Some(1000.0),
            max: None,
            min_inclusive: false,
            max_inclusive: false,
        }
    );
}

#[test]
fn malformed_typed_values_are_rejected() {
    for input in ["size>not-a-number", "first_seen>=invalid-date"] {
        let err = generate(input, &config()).unwrap_err();
        assert!(matches!(err.kind, QueryErrorKind::Generate(_)), "{input}");
        assert!(
            err.to_string().contains("unsupported type for field"),
            "{input}: {err}"
        );
    }
}

#[test]
fn trailing_tokens_are_rejected() {
    let err = generate("type=pe)", &config()).unwrap_err();
    assert_eq!(err.message(), "unexpected token ')'");
    assert_eq!(err.position(), Some(7));

    let err = parse("size>not-a-number").unwrap_err();
    assert_eq!(err.message(), "illegal token '-'");

    for (input, position) in [("(type=pe ]", 9), ("type=pe &", 8)] {
        let err = generate(input, &config()).unwrap_err();
        assert_eq!(err.message(), format!("illegal token '{}'", &input[position..]));
        assert_eq!(err.position(), Some(position), "{input}");
    }
}

#[test]
fn deeply_nested_groups_fail_cleanly() {
    let nested = |n: usize| format!("{}type=pe{}", "(".repeat(n), ")".repeat(n));
    let empty = FieldConfig::new();

    assert_eq!(
        generate(&nested(MAX_NESTING_DEPTH), &empty).unwrap(),
        matched("type", "pe")
    );
    for n in [MAX_NESTING_DEPTH + 1, 1000, 2000, 100_000] {
        let err = generate(&nested(n), &empty).unwrap_err();
        assert!(
            matches!(
                err.kind,
                QueryErrorKind::Parse(ParseError::NestingTooDeep { .. })
            ),
            "{n}: {err}"
        );
        assert!(err.suggestion().is_some());
    }
}

#[test]
fn long_connective_chains_fail_cleanly() {
    let empty = FieldConfig::new();

    let chain = vec!["type=pe"; MAX_COMPARISONS].join(" AND ");
    let Query::Conjunction { children } = generate(&chain, &empty).unwrap() else {
        panic!("expected a conjunction");
    };
    assert_eq!(children.len(), 2);

    for joiner in [" ", " AND ", " OR "] {
        let chain = vec!["type=pe"; 20_000].join(joiner);
        let err = generate(&chain, &empty).unwrap_err();
        assert!(
            matches!(
                err.kind,
                QueryErrorKind::Parse(ParseError::TooManyComparisons { .. })
            ),
            "{joiner:?}: {err}"
        );
    }
}

#[test]
fn tokenizing_is_deterministic_and_terminated() {
    for input in [
        "",
        "type=pe",
        "a ! b & c",
        "\"unterminated",
        "size>=10kb OR (first_seen<2023-01-01T00:00Z)",
        "ünïcödé=✓",
    ] {
        let first = tokenize(input);
        assert_eq!(first, tokenize(input), "{input}");
        let ends = first
            .iter()
            .filter(|t| t.kind == TokenKind::EndOfInput)
            .count();
        assert_eq!(ends, 1, "{input}");
        assert_eq!(first.last().map(|t| t.kind), Some(TokenKind::EndOfInput));
    }
}

#[test]
fn explicit_grouping_gives_equivalent_query() {
    let config = config();
    let implicit = parse("type=pe AND tag=upx OR size>1000").unwrap();
    let explicit = parse("(type=pe AND tag=upx) OR size>1000").unwrap();
    assert_eq!(implicit, explicit);

    let flat = parse("type=pe AND tag=upx AND size>1000").unwrap();
    let nested = parse("type=pe AND (tag=upx AND size>1000)").unwrap();
    assert_ne!(flat, nested);

    // Both flatten to the same set of required clauses
    let leaves = |query: Query| -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![query];
        while let Some(node) = stack.pop() {
            match node {
                Query::Conjunction { children } => stack.extend(children),
                other => out.push(serde_json::to_string(&other).unwrap()),
            }
        }
        out.sort();
        out
    };
    assert_eq!(
        leaves(compile(&flat, &config).unwrap()),
        leaves(compile(&nested, &config).unwrap())
    );
}

#[test]
fn error_display_points_at_failure() {
    let err = generate("type=pe AND (tag=upx", &config()).unwrap_err();
    let display = err.to_string();
    assert!(display.starts_with("query syntax error: expected closing parenthesis"));
    assert!(display.contains("  type=pe AND (tag=upx\n"));
    assert!(display.contains(&format!("  {}^", " ".repeat(20))));
}

#[test]
fn strict_config_rejects_unknown_fields() {
    let config = config().with_strict(true);
    let err = generate("type=pe AND colour=red", &config).unwrap_err();
    assert_eq!(err.message(), "unknown field: colour");
    assert!(generate("type=pe", &config).is_ok());
}

#[test]
fn config_round_trips_through_wire_shape() {
    let config = FieldConfig::new()
        .with_field("size", FieldSpec::number().with_field("file_size"))
        .with_field("engines", FieldSpec::string().with_group(["a", "b"]));
    let json = serde_json::to_string(&config).unwrap();
    let back: FieldConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
