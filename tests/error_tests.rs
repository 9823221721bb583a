//! Error handling tests for twsql
//!
//! Every failure aborts the call and surfaces as an `Error` of the right
//! kind; lenient constructs render instead of failing.

use twsql::{check_template, parse_template, Error, ErrorKind, Options, Params, Value};

fn params() -> Params {
    let mut p = Params::new();
    p.insert("n".to_string(), Value::Int(3));
    p.insert("xs".to_string(), Value::from(vec![1, 2]));
    p
}

fn render(input: &str) -> twsql::Result<(String, Params)> {
    parse_template(input, &params(), &Options::default())
}

mod parse_errors {
    use super::*;

    #[test]
    fn unterminated_block_comment() {
        let err = render("select 1 /* never closed").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn unterminated_comment_inside_body() {
        let err = render("select /*%if n > 1*/ a /* oops").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn span_is_absolute_in_nested_regions() {
        let input = "select\n/*%for x in xs*/\n  , x /* open\n";
        let err = render(input).unwrap_err();
        match err {
            Error::Parse { span: Some((offset, _)), .. } => {
                assert_eq!(&input[offset..offset + 2], "/*");
                assert_eq!(offset, input.rfind("/* open").unwrap());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

mod execution_errors {
    use super::*;

    #[test]
    fn undefined_name_in_condition() {
        let err = render("/*%if missing*/x/*end*/").unwrap_err();
        assert!(matches!(err, Error::UndefinedName { ref name, .. } if name == "missing"));
        assert_eq!(err.kind(), ErrorKind::Execution);
    }

    #[test]
    fn non_boolean_condition() {
        let err = render("/*%if n * 2*/x/*end*/").unwrap_err();
        assert!(matches!(err, Error::NonBooleanCondition { .. }));
    }

    #[test]
    fn failing_loop_source() {
        let err = render("/*%for x in n*/x/*end*/").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);

        let err = render("/*%for x in nope*/x/*end*/").unwrap_err();
        assert!(matches!(err, Error::UndefinedName { .. }));
    }

    #[test]
    fn division_by_zero() {
        let err = render("/*%if n / 0 == 1*/x/*end*/").unwrap_err();
        assert!(matches!(err, Error::Evaluation { .. }));
    }

    #[test]
    fn malformed_expression() {
        let err = render("/*%if n ==*/x/*end*/").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);
    }

    #[test]
    fn undefined_direct_literal() {
        let err = render("select * from /*$table*/t").unwrap_err();
        assert!(matches!(err, Error::UndefinedName { ref name, .. } if name == "table"));
    }
}

mod validation_errors {
    use super::*;

    #[test]
    fn empty_newline() {
        let options = Options::default().with_newline("");
        let err = parse_template("select 1", &Params::new(), &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn unsupported_param_style() {
        let err = "format".parse::<twsql::ParamStyle>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

mod lenient {
    use super::*;

    #[test]
    fn unterminated_quote_runs_to_end() {
        let (sql, _) = render("select 'abc from t").unwrap();
        assert_eq!(sql, "select 'abc from t");
    }

    #[test]
    fn unterminated_if_runs_to_end() {
        let (sql, _) = render("select 1 /*%if n > 1*/, 2").unwrap();
        assert_eq!(sql, "select 1 , 2");
    }

    #[test]
    fn unterminated_false_if_drops_the_rest() {
        let (sql, _) = render("select 1 /*%if n > 5*/, 2 from t").unwrap();
        assert_eq!(sql, "select 1 ");
    }
}

mod check {
    use super::*;

    #[test]
    fn well_formed_templates_pass_without_params() {
        let input = "select /*:a*/1 /*%if b and c > 1*/, x/*end*/ /*%for k, v in m.items()*/, /*:k*/0/*end*/";
        assert!(check_template(input, &Options::default()).is_ok());
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = check_template("/*%if a ==*/x/*end*/", &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);

        let err = check_template("/*%for 1 in xs*/x/*end*/", &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);
    }

    #[test]
    fn unterminated_comments_are_reported() {
        let err = check_template("select /* x", &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
