#[cfg(test)]
mod interpreter_tests {
    use rox::error::LoxError;
    use rox::interpreter::Interpreter;
    use rox::parser::Parser;
    use rox::scanner::scan_tokens;
    use rox::session::{run_on_large_stack, Lox};
    use rox::value::Value;

    /// Run `source` in a fresh session and return what it printed.
    fn run(source: &str) -> String {
        let mut lox = Lox::with_output(Vec::new());
        lox.run(source).unwrap();
        String::from_utf8(lox.into_output()).unwrap()
    }

    /// Run `source`, expecting a failure; returns (printed output, error).
    fn run_err(source: &str) -> (String, LoxError) {
        let mut lox = Lox::with_output(Vec::new());
        let err = lox.run(source).unwrap_err();
        (String::from_utf8(lox.into_output()).unwrap(), err)
    }

    fn eval(source: &str) -> Value {
        let tokens = scan_tokens(source).unwrap();
        let expr = Parser::new(&tokens).parse_expression().unwrap();
        Interpreter::with_output(Vec::new()).evaluate(&expr).unwrap()
    }

    #[test]
    fn test_interpreter_01_arithmetic_and_printing() {
        assert_eq!(
            run("print 1 + 2 * 3; print 10 / 4; print -3; print \"a\" + \"b\";"),
            "7\n2.5\n-3\nab\n"
        );
    }

    #[test]
    fn test_interpreter_02_number_edge_output() {
        assert_eq!(run("print 1 / 0; print -1 / 0; print 0 / 0;"), "Infinity\n-Infinity\nNaN\n");
    }

    #[test]
    fn test_interpreter_03_truthiness_and_equality() {
        assert_eq!(
            run("print !nil; print !0; print !\"\"; print nil == nil; print 1 == \"1\"; print \"a\" == \"a\"; print nil == false; print 0 == false;"),
            "true\nfalse\nfalse\ntrue\nfalse\ntrue\nfalse\nfalse\n"
        );
    }

    #[test]
    fn test_interpreter_04_logical_returns_operand() {
        assert_eq!(
            run("print nil or \"yes\"; print 1 and 2; print false and undefined;"),
            "yes\n2\nfalse\n"
        );
    }

    #[test]
    fn test_interpreter_05_evaluate_expression() {
        assert_eq!(eval("(1 + 2) * 3"), Value::Number(9.0));
        assert_eq!(eval("\"x\" == \"x\""), Value::Bool(true));
        assert_eq!(eval("nil"), Value::Nil);
    }

    #[test]
    fn test_interpreter_06_control_flow() {
        let source = "\
            var total = 0;\n\
            for (var i = 0; i < 5; i = i + 1) {\n\
              if (i == 2) total = total + 100; else total = total + i;\n\
            }\n\
            print total;\n\
            var n = 3;\n\
            while (n > 0) n = n - 1;\n\
            print n;";

        assert_eq!(run(source), "108\n0\n");
    }

    #[test]
    fn test_interpreter_07_closure_counter() {
        let source = "\
            fun makeCounter() {\n\
              var i = 0;\n\
              fun count() { i = i + 1; print i; }\n\
              return count;\n\
            }\n\
            var counter = makeCounter();\n\
            counter();\n\
            counter();";

        assert_eq!(run(source), "1\n2\n");
    }

    #[test]
    fn test_interpreter_08_static_scope_survives_shadowing() {
        let source = "\
            var a = \"global\";\n\
            {\n\
              fun show() { print a; }\n\
              show();\n\
              var a = \"block\";\n\
              show();\n\
            }";

        assert_eq!(run(source), "global\nglobal\n");
    }

    #[test]
    fn test_interpreter_09_recursion_and_return() {
        let source = "\
            fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }\n\
            print fib(10);\n\
            fun nothing() {}\n\
            print nothing();";

        assert_eq!(run(source), "55\nnil\n");
    }

    #[test]
    fn test_interpreter_10_return_unwinds_loops() {
        let source = "\
            fun first() {\n\
              for (var i = 0; ; i = i + 1) { if (i == 3) return i; }\n\
            }\n\
            print first();";

        assert_eq!(run(source), "3\n");
    }

    #[test]
    fn test_interpreter_11_value_rendering() {
        assert_eq!(
            run("fun f() {} class C {} print f; print C; print C(); print true; print nil;"),
            "<fn f>\nC\nC instance\ntrue\nnil\n"
        );
    }

    #[test]
    fn test_interpreter_12_classes_and_initializers() {
        let source = "\
            class Point {\n\
              init(x, y) { this.x = x; this.y = y; }\n\
              sum() { return this.x + this.y; }\n\
            }\n\
            var p = Point(1, 2);\n\
            print p.sum();\n\
            p.x = 10;\n\
            print p.sum();\n\
            print p.init(0, 0) == p;";

        assert_eq!(run(source), "3\n12\ntrue\n");
    }

    #[test]
    fn test_interpreter_13_early_return_in_initializer_yields_instance() {
        let source = "\
            class A { init() { this.v = 1; return; this.v = 2; } }\n\
            print A().v;";

        assert_eq!(run(source), "1\n");
    }

    #[test]
    fn test_interpreter_14_fields_shadow_methods() {
        let source = "\
            class A { m() { return \"method\"; } }\n\
            var a = A();\n\
            print a.m();\n\
            fun f() { return \"field\"; }\n\
            a.m = f;\n\
            print a.m();";

        assert_eq!(run(source), "method\nfield\n");
    }

    #[test]
    fn test_interpreter_15_bound_methods_remember_this() {
        let source = "\
            class Box { init(v) { this.v = v; } get() { return this.v; } }\n\
            var g = Box(\"kept\").get;\n\
            print g();";

        assert_eq!(run(source), "kept\n");
    }

    #[test]
    fn test_interpreter_16_super_calls() {
        let source = "\
            class A { greet() { print \"A\"; } }\n\
            class B < A { greet() { super.greet(); print \"B\"; } }\n\
            B().greet();";

        assert_eq!(run(source), "A\nB\n");
    }

    #[test]
    fn test_interpreter_17_inherited_methods_and_initializer() {
        let source = "\
            class Base { init(n) { this.n = n; } twice() { return this.n * 2; } }\n\
            class Derived < Base {}\n\
            print Derived(21).twice();";

        assert_eq!(run(source), "42\n");
    }

    #[test]
    fn test_interpreter_18_object_identity() {
        let source = "\
            class A {}\n\
            var a = A();\n\
            var b = A();\n\
            print a == a; print a == b;\n\
            fun f() {} print f == f;";

        assert_eq!(run(source), "true\nfalse\ntrue\n");
    }

    #[test]
    fn test_interpreter_19_runtime_errors() {
        let cases = [
            ("print -\"x\";", "Operand must be a number.\n[line 1]"),
            ("print 1 < \"x\";", "Operands must be numbers.\n[line 1]"),
            ("print 1 + nil;", "Operands must be two numbers or two strings.\n[line 1]"),
            ("print missing;", "Undefined variable 'missing'.\n[line 1]"),
            ("missing = 1;", "Undefined variable 'missing'.\n[line 1]"),
            ("\"str\"();", "Can only call functions and classes.\n[line 1]"),
            ("fun f(a) {} f();", "Expected 1 arguments but got 0.\n[line 1]"),
            ("class A {} A(1);", "Expected 0 arguments but got 1.\n[line 1]"),
            ("print 1.x;", "Only instances have properties.\n[line 1]"),
            ("var s = \"s\"; s.x = 1;", "Only instances have fields.\n[line 1]"),
            ("class A {} print A().nope;", "Undefined property 'nope'.\n[line 1]"),
            ("var N = 1; class A < N {}", "Superclass must be a class.\n[line 1]"),
        ];

        for (source, expected) in cases {
            let (_, err) = run_err(source);
            assert_eq!(err.to_string(), expected, "source: {}", source);
            assert_eq!(err.exit_code(), 70);
        }
    }

    #[test]
    fn test_interpreter_20_runtime_error_stops_later_statements() {
        let (out, err) = run_err("print 1;\nprint nil + 1;\nprint 2;");

        assert_eq!(out, "1\n");
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_interpreter_21_static_error_runs_nothing() {
        let (out, err) = run_err("print 1;\nreturn 2;");

        assert_eq!(out, "");
        assert!(err.is_static());
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_interpreter_22_environment_restored_after_error() {
        let mut lox = Lox::with_output(Vec::new());

        lox.run("var a = \"outer\";").unwrap();
        assert!(lox.run("{ var a = \"inner\"; print nil + 1; }").is_err());
        lox.run("print a;").unwrap();

        assert_eq!(String::from_utf8(lox.into_output()).unwrap(), "outer\n");
    }

    #[test]
    fn test_interpreter_23_identical_references_resolve_separately() {
        let source = "\
            {\n\
              var a = \"outer\";\n\
              {\n\
                print a;\n\
                var a = \"inner\";\n\
                print a;\n\
              }\n\
              print a;\n\
            }";

        assert_eq!(run(source), "outer\ninner\nouter\n");
    }

    const COUNT_DOWN: &str =
        "fun depth(n) { if (n == 0) return 0; return depth(n - 1) + 1; }";

    #[test]
    fn test_interpreter_24_deep_recursion() {
        let printed = run_on_large_stack(|| {
            let mut lox = Lox::with_output(Vec::new());
            lox.run(COUNT_DOWN).unwrap();
            lox.run("print depth(3000);").unwrap();
            String::from_utf8(lox.into_output()).unwrap()
        })
        .unwrap();

        assert_eq!(printed, "3000\n");
    }

    #[test]
    fn test_interpreter_25_runaway_recursion_is_a_runtime_error() {
        let (err, printed) = run_on_large_stack(|| {
            let mut lox = Lox::with_output(Vec::new());
            lox.run(COUNT_DOWN).unwrap();
            let err = lox.run("print depth(100000);").unwrap_err();

            // The session is still usable afterwards.
            lox.run("print depth(10);").unwrap();
            (err, String::from_utf8(lox.into_output()).unwrap())
        })
        .unwrap();

        assert_eq!(err.to_string(), "Stack overflow.\n[line 1]");
        assert_eq!(err.exit_code(), 70);
        assert_eq!(printed, "10\n");
    }

    #[test]
    fn test_interpreter_26_large_integers_print_in_full() {
        assert_eq!(
            run("print 10000000000000000; print 123456789 * 1000000000;"),
            "10000000000000000\n123456789000000000\n"
        );
    }
}
