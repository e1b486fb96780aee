#[cfg(test)]
mod scanner_tests {
    use rox::error::LoxError;
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let tokens = scan_tokens(source).unwrap();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn text_forms(source: &str) -> Vec<String> {
        scan_tokens(source)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators_are_greedy() {
        assert_token_sequence(
            "!= == <= >= ! = < > /",
            &[
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::BANG, "!"),
                (TokenType::EQUAL, "="),
                (TokenType::LESS, "<"),
                (TokenType::GREATER, ">"),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "class fun var orchid _x1 this",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::FUN, "fun"),
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::IDENTIFIER, "_x1"),
                (TokenType::THIS, "this"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_literal_text_forms() {
        assert_eq!(
            text_forms("1 3.14 \"hi\""),
            vec![
                "NUMBER 1 1.0",
                "NUMBER 3.14 3.14",
                "STRING \"hi\" hi",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_05_var_declaration_text_form() {
        assert_eq!(
            text_forms("var x = 10;"),
            vec![
                "VAR var null",
                "IDENTIFIER x null",
                "EQUAL = null",
                "NUMBER 10 10.0",
                "SEMICOLON ; null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_06_trailing_dot_is_not_part_of_number() {
        assert_eq!(
            text_forms("123."),
            vec!["NUMBER 123 123.0", "DOT . null", "EOF  null"]
        );
    }

    #[test]
    fn test_scanner_07_comments_and_lines() {
        let tokens = scan_tokens("// nothing here\nprint 1; // trailing\n\n\"a\nb\"").unwrap();

        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![2, 2, 2, 5, 5]);

        assert_eq!(
            tokens[3].literal(),
            Some(rox::ast::LiteralValue::Str("a\nb".to_string()))
        );
    }

    #[test]
    fn test_scanner_08_empty_source_is_single_eof() {
        let tokens = scan_tokens("").unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::EOF);
        assert_eq!(tokens[0].line, 1);
    }

    #[test]
    fn test_scanner_09_unterminated_string() {
        let err = scan_tokens("print \"oops").unwrap_err();

        assert!(matches!(err, LoxError::Lex { line: 1, .. }));
        assert_eq!(err.to_string(), "[line 1] Error: Unterminated string.");
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let results: Vec<_> = Scanner::new(",.$(#").collect();

        // Stream stops at the first error, and no EOF follows it.
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().token_type, TokenType::COMMA);
        assert_eq!(results[1].as_ref().unwrap().token_type, TokenType::DOT);
        assert_eq!(
            results[2].as_ref().unwrap_err().to_string(),
            "[line 1] Error: Unexpected character: $"
        );
    }

    #[test]
    fn test_scanner_10_deterministic() {
        let source = "fun f(a, b) { return a + b * 2.5; }";

        assert_eq!(scan_tokens(source).unwrap(), scan_tokens(source).unwrap());
    }

    #[test]
    fn test_scanner_11_exactly_one_eof() {
        let tokens = scan_tokens("a b c").unwrap();
        let eofs = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::EOF)
            .count();

        assert_eq!(eofs, 1);
        assert_eq!(tokens.last().map(|t| t.token_type.clone()), Some(TokenType::EOF));
    }

    #[test]
    fn test_literal_number_formatting() {
        assert_eq!(format_literal_number(5.0), "5.0");
        assert_eq!(format_literal_number(0.5), "0.5");
        assert_eq!(format_literal_number(-0.0), "-0.0");
    }

    #[test]
    fn test_tokens_serialize() {
        let tokens = scan_tokens("x").unwrap();
        let json = serde_json::to_string(&tokens[0]).unwrap();

        assert!(json.contains("\"lexeme\":\"x\""));
        assert!(json.contains("\"line\":1"));
    }
}
