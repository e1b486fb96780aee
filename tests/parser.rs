#[cfg(test)]
mod parser_tests {
    use rox::ast::{Expr, LiteralValue, Stmt};
    use rox::ast_printer::AstPrinter;
    use rox::error::LoxError;
    use rox::parser::{Parser, MAX_NESTING};
    use rox::session::run_on_large_stack;
    use rox::scanner::scan_tokens;

    fn parse(source: &str) -> Result<Vec<Stmt>, LoxError> {
        let tokens = scan_tokens(source).unwrap();
        Parser::new(&tokens).parse()
    }

    fn print(source: &str) -> String {
        AstPrinter::print_program(&parse(source).unwrap())
    }

    fn parse_expr(source: &str) -> Result<Expr, LoxError> {
        let tokens = scan_tokens(source).unwrap();
        Parser::new(&tokens).parse_expression()
    }

    #[test]
    fn test_parser_01_precedence() {
        assert_eq!(
            print("1 + 2 * 3 - 4;"),
            "Expression(expression=Binary(\
             left=Binary(left=Literal(value=1.0), operator=PLUS + null, \
             right=Binary(left=Literal(value=2.0), operator=STAR * null, right=Literal(value=3.0))), \
             operator=MINUS - null, right=Literal(value=4.0)))"
        );
    }

    #[test]
    fn test_parser_02_literals_and_grouping() {
        assert_eq!(
            print("print (nil);"),
            "Print(expression=Grouping(expression=Literal(value=null)))"
        );
        assert_eq!(
            print("!true == \"s\";"),
            "Expression(expression=Binary(\
             left=Unary(operator=BANG ! null, right=Literal(value=true)), \
             operator=EQUAL_EQUAL == null, right=Literal(value=s)))"
        );
    }

    #[test]
    fn test_parser_03_bare_for_is_a_while() {
        assert_eq!(
            print("for (;;) print 1;"),
            "While(condition=Literal(value=true), \
             body=Print(expression=Literal(value=1.0)))"
        );
    }

    #[test]
    fn test_parser_04_full_for_desugars_into_block() {
        assert_eq!(
            print("for (var i = 0; i < 2; i = i + 1) print i;"),
            "Block(statements=[\
             Var(name=IDENTIFIER i null, initializer=Literal(value=0.0)), \
             While(condition=Binary(left=Variable(name=IDENTIFIER i null), operator=LESS < null, right=Literal(value=2.0)), \
             body=Block(statements=[\
             Print(expression=Variable(name=IDENTIFIER i null)), \
             Expression(expression=Assign(name=IDENTIFIER i null, value=Binary(\
             left=Variable(name=IDENTIFIER i null), operator=PLUS + null, right=Literal(value=1.0))))]))])"
        );
    }

    #[test]
    fn test_parser_05_class_forms() {
        assert_eq!(
            print("class B < A { greet() { return; } }"),
            "Class(name=IDENTIFIER B null, \
             superClass=Variable(name=IDENTIFIER A null), \
             methods=[Function(name=IDENTIFIER greet null, parameters=[], \
             body=[Return(keyword=RETURN return null, value=null)])])"
        );
    }

    #[test]
    fn test_parser_06_optional_fun_before_method() {
        let with_fun = print("class A { fun m(a) {} }");
        let without = print("class A { m(a) {} }");

        assert_eq!(with_fun, without);
    }

    #[test]
    fn test_parser_07_if_without_else() {
        assert_eq!(
            print("if (x) print x;"),
            "If(condition=Variable(name=IDENTIFIER x null), \
             thenBranch=Print(expression=Variable(name=IDENTIFIER x null)), elseBranch=null)"
        );
    }

    #[test]
    fn test_parser_08_calls_gets_and_sets() {
        assert_eq!(
            print("a.b(1).c = 2;"),
            "Expression(expression=Set(\
             object=Call(callee=Get(object=Variable(name=IDENTIFIER a null), name=IDENTIFIER b null), \
             paren=RIGHT_PAREN ) null, arguments=[Literal(value=1.0)]), \
             name=IDENTIFIER c null, value=Literal(value=2.0)))"
        );
    }

    #[test]
    fn test_parser_09_logical_binds_looser_than_equality() {
        let stmts = parse("a or b and c == d;").unwrap();

        let Stmt::Expression(Expr::Logical { right, .. }) = &stmts[0] else {
            panic!("expected a logical expression, got {:?}", stmts[0]);
        };
        assert!(matches!(**right, Expr::Logical { .. }));
    }

    #[test]
    fn test_parser_10_invalid_assignment_target() {
        let err = parse("1 + 2 = 3;").unwrap_err();

        assert_eq!(
            err.to_string(),
            "[line 1] Error at '=': Invalid assignment target."
        );
    }

    #[test]
    fn test_parser_11_collects_multiple_errors() {
        let err = parse("var = 1;\nprint 2;\nprint ;").unwrap_err();

        let LoxError::Many(errors) = &err else {
            panic!("expected several errors, got {:?}", err);
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line(), Some(1));
        assert_eq!(errors[1].line(), Some(3));
        assert!(err.is_static());
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_parser_12_error_at_end() {
        let err = parse("print 1").unwrap_err();

        assert_eq!(
            err.to_string(),
            "[line 1] Error at end: Expect ';' after value."
        );
    }

    #[test]
    fn test_parser_13_too_many_arguments() {
        let err = parse("f(1, 2, 3, 4, 5, 6, 7, 8, 9);").unwrap_err();

        assert!(err.to_string().contains("Cannot have more than 8 arguments."));
    }

    #[test]
    fn test_parser_14_single_expression() {
        let expr = parse_expr("(1)").unwrap();
        assert_eq!(
            expr,
            Expr::Grouping(Box::new(Expr::Literal(LiteralValue::Number(1.0))))
        );

        assert!(parse_expr("1 2").is_err());
    }

    #[test]
    fn test_parser_15_ids_are_unique_and_continue() {
        let tokens = scan_tokens("a = b; this; c;").unwrap();
        let mut parser = Parser::with_first_id(&tokens, 10);
        let stmts = parser.parse();

        // `this` at top level is a resolver error, not a parse error.
        let stmts = stmts.unwrap();
        let mut ids = Vec::new();
        for stmt in &stmts {
            if let Stmt::Expression(expr) = stmt {
                ids.push(expr.id());
            }
        }

        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.map_or(false, |id| id.0 >= 10)));
        // The variable replaced by the assignment keeps its id unused.
        assert_eq!(parser.next_expr_id(), 15);
    }

    #[test]
    fn test_parser_16_empty_token_slice() {
        assert_eq!(Parser::new(&[]).parse().unwrap(), Vec::new());

        let err = Parser::new(&[]).parse_expression().unwrap_err();
        assert_eq!(err.to_string(), "[line 0] Error at end: Expect expression.");
    }

    #[test]
    fn test_parser_17_expression_keeps_earlier_errors() {
        let err = parse_expr("a + 1 = 2 3").unwrap_err();

        let LoxError::Many(errors) = &err else {
            panic!("expected several errors, got {:?}", err);
        };
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "[line 1] Error at '=': Invalid assignment target.",
                "[line 1] Error at '3': Expect end of expression.",
            ]
        );

        let err = parse_expr("(1 = 2").unwrap_err();
        assert!(matches!(err, LoxError::Many(ref errors) if errors.len() == 2));
    }

    fn nested_parens(levels: usize) -> String {
        format!("print {}1{};", "(".repeat(levels), ")".repeat(levels))
    }

    #[test]
    fn test_parser_18_nesting_limit() {
        let (shallow, deep) = run_on_large_stack(|| {
            let shallow = parse(&nested_parens(MAX_NESTING - 10)).is_ok();
            let deep = parse(&nested_parens(MAX_NESTING + 10)).unwrap_err().to_string();
            (shallow, deep)
        })
        .unwrap();

        assert!(shallow);
        assert!(deep.contains("Too much nesting."), "{}", deep);
    }
}
