#[cfg(test)]
mod session_tests {
    use rox::session::Lox;
    use rox::value::Value;

    fn output(lox: Lox<Vec<u8>>) -> String {
        String::from_utf8(lox.into_output()).unwrap()
    }

    #[test]
    fn test_session_01_globals_persist_between_runs() {
        let mut lox = Lox::with_output(Vec::new());

        lox.run("var greeting = \"hi\";").unwrap();
        lox.run("print greeting;").unwrap();

        assert_eq!(output(lox), "hi\n");
    }

    #[test]
    fn test_session_02_closures_outlive_their_run() {
        let mut lox = Lox::with_output(Vec::new());

        lox.run(
            "fun make() { var n = 0; fun inc() { n = n + 1; return n; } return inc; }\n\
             var inc = make();",
        )
        .unwrap();
        lox.run("print inc();").unwrap();
        lox.run("{ var local = inc(); print local; }").unwrap();

        assert_eq!(output(lox), "1\n2\n");
    }

    #[test]
    fn test_session_03_sessions_are_isolated() {
        let mut first = Lox::with_output(Vec::new());
        let mut second = Lox::with_output(Vec::new());

        first.run("var only_here = 1;").unwrap();
        let err = second.run("print only_here;").unwrap_err();

        assert_eq!(err.to_string(), "Undefined variable 'only_here'.\n[line 1]");
    }

    #[test]
    fn test_session_04_same_program_same_output() {
        let program = "class A { init(n) { this.n = n; } } for (var i = 0; i < 3; i = i + 1) print A(i).n;";

        let mut first = Lox::with_output(Vec::new());
        let mut second = Lox::with_output(Vec::new());
        first.run(program).unwrap();
        second.run(program).unwrap();

        assert_eq!(output(first), output(second));
    }

    #[test]
    fn test_session_05_failed_run_keeps_earlier_definitions() {
        let mut lox = Lox::with_output(Vec::new());

        assert!(lox.run("var kept = 1; print kept + nil;").is_err());
        assert!(lox.run("print ;").is_err());
        lox.run("print kept;").unwrap();

        assert_eq!(output(lox), "1\n");
    }

    #[test]
    fn test_session_06_evaluate_sees_globals() {
        let mut lox = Lox::with_output(Vec::new());

        lox.run("var x = 20;").unwrap();

        assert_eq!(lox.evaluate("x + 1").unwrap(), Value::Number(21.0));
    }

    #[test]
    fn test_session_07_locals_accumulate() {
        let mut lox = Lox::with_output(Vec::new());

        lox.run("{ var a = 1; print a; }").unwrap();
        let after_first = lox.interpreter().locals().len();
        lox.run("{ var b = 2; print b; }").unwrap();

        assert_eq!(after_first, 1);
        assert_eq!(lox.interpreter().locals().len(), 2);
    }
}
