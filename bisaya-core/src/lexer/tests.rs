use super::prelude::{lex, Lexer, LexicalError, LexicalErrorType, Token};

fn lex_tokens(input: &str) -> Result<Vec<Token>, LexicalError> {
    Ok(lex(input)?.into_iter().map(|(_, token, _)| token).collect())
}

#[test]
fn test_numbers() -> Result<(), LexicalError> {
    let input = "10 0 3.14 12. 2147483647";

    let tokens = vec![
        Token::Int(10),
        Token::Int(0),
        Token::Float(3.14),
        Token::Float(12.0),
        Token::Int(2147483647),
        Token::Eof,
    ];

    assert_eq!(lex_tokens(input)?, tokens);

    Ok(())
}

#[test]
fn test_second_dot_terminates_number() {
    let mut lexer = Lexer::new("1.2.5");

    let (_, token, _) = lexer.next_token().expect("first number lexes");
    assert_eq!(token, Token::Float(1.2));

    // the second dot is left behind and is no token at all
    let err = lexer.next_token().expect_err("dot alone is not a token");
    assert_eq!(
        err.error,
        LexicalErrorType::UnrecognizedCharacter { ch: '.' }
    );
}

#[test]
fn test_int_literal_out_of_range() {
    let err = lex("2147483648").expect_err("does not fit i32");

    assert_eq!(
        err.error,
        LexicalErrorType::IntOutOfRange { literal: "2147483648".into() }
    );
}

#[test]
fn test_keywords() -> Result<(), LexicalError> {
    let input = "SUGOD KATAPUSAN MUGNA NUMERO TIPIK LETRA TINUOD PULONG \
                 KUNG WALA PUNDOK ALANG SA SAMTANG IPAKITA DAWAT UG O DILI";

    let tokens = vec![
        Token::Begin,
        Token::End,
        Token::Declare,
        Token::IntType,
        Token::FloatType,
        Token::CharType,
        Token::BoolType,
        Token::StringType,
        Token::If,
        Token::Else,
        Token::Block,
        Token::For,
        Token::Sa,
        Token::While,
        Token::Display,
        Token::Input,
        Token::And,
        Token::Or,
        Token::Not,
        Token::Eof,
    ];

    assert_eq!(lex_tokens(input)?, tokens);

    Ok(())
}

#[test]
fn test_keywords_are_case_sensitive() -> Result<(), LexicalError> {
    // lowercase spellings are ordinary identifiers
    let tokens = lex_tokens("sugod Mugna kung")?;

    assert_eq!(
        tokens,
        vec![
            Token::Ident("sugod".into()),
            Token::Ident("Mugna".into()),
            Token::Ident("kung".into()),
            Token::Eof,
        ]
    );

    Ok(())
}

#[test]
fn test_operators() -> Result<(), LexicalError> {
    let input = "= == + ++ += - -= * *= / /= % %= > >= < <= <> & : , ( ) { }";

    let tokens = vec![
        Token::Assign,
        Token::EqualEqual,
        Token::Plus,
        Token::Increment,
        Token::PlusAssign,
        Token::Minus,
        Token::MinusAssign,
        Token::Star,
        Token::StarAssign,
        Token::Slash,
        Token::SlashAssign,
        Token::Percent,
        Token::PercentAssign,
        Token::Greater,
        Token::GreaterEqual,
        Token::Less,
        Token::LessEqual,
        Token::NotEqual,
        Token::Ampersand,
        Token::Colon,
        Token::Comma,
        Token::LParen,
        Token::RParen,
        Token::LBrace,
        Token::RBrace,
        Token::Eof,
    ];

    assert_eq!(lex_tokens(input)?, tokens);

    Ok(())
}

#[test]
fn test_comment_swallows_to_end_of_line() -> Result<(), LexicalError> {
    let input = "x -- everything here is ignored, even KUNG\ny";

    let tokens = vec![
        Token::Ident("x".into()),
        Token::Newline,
        Token::Ident("y".into()),
        Token::Eof,
    ];

    assert_eq!(lex_tokens(input)?, tokens);

    Ok(())
}

#[test]
fn test_comment_at_end_of_input() -> Result<(), LexicalError> {
    let tokens = lex_tokens("x -- no trailing line feed")?;

    assert_eq!(
        tokens,
        vec![Token::Ident("x".into()), Token::Newline, Token::Eof]
    );

    Ok(())
}

#[test]
fn test_newline_and_dollar_stay_distinct() -> Result<(), LexicalError> {
    let tokens = lex_tokens("$\n$")?;

    assert_eq!(
        tokens,
        vec![Token::Dollar, Token::Newline, Token::Dollar, Token::Eof]
    );

    Ok(())
}

#[test]
fn test_ampersand_next_to_dollar_is_swallowed() -> Result<(), LexicalError> {
    let tokens = lex_tokens(r#""a" & $ & "b""#)?;

    assert_eq!(
        tokens,
        vec![
            Token::Str("a".into()),
            Token::Dollar,
            Token::Str("b".into()),
            Token::Eof,
        ]
    );

    Ok(())
}

#[test]
fn test_ampersand_between_values_is_kept() -> Result<(), LexicalError> {
    let tokens = lex_tokens("x & y")?;

    assert_eq!(
        tokens,
        vec![
            Token::Ident("x".into()),
            Token::Ampersand,
            Token::Ident("y".into()),
            Token::Eof,
        ]
    );

    Ok(())
}

#[test]
fn test_bracket_escapes() -> Result<(), LexicalError> {
    assert_eq!(
        lex_tokens("[[]")?,
        vec![Token::Str("[".into()), Token::Eof]
    );
    assert_eq!(
        lex_tokens("[]]")?,
        vec![Token::Str("]".into()), Token::Eof]
    );
    assert_eq!(
        lex_tokens("[&]")?,
        vec![Token::Str("&".into()), Token::Eof]
    );
    assert_eq!(
        lex_tokens("[$]")?,
        vec![Token::Str("$".into()), Token::Eof]
    );

    Ok(())
}

#[test]
fn test_bracket_escapes_between_expressions() -> Result<(), LexicalError> {
    // the opening and closing escapes of scenario output like `[-60]`
    let tokens = lex_tokens("[[]&xyz&[]]")?;

    assert_eq!(
        tokens,
        vec![
            Token::Str("[".into()),
            Token::Ampersand,
            Token::Ident("xyz".into()),
            Token::Ampersand,
            Token::Str("]".into()),
            Token::Eof,
        ]
    );

    Ok(())
}

#[test]
fn test_unterminated_escape() {
    let err = lex("[abc").expect_err("escape never closes");

    assert_eq!(err.error, LexicalErrorType::UnterminatedEscape);
}

#[test]
fn test_strings_and_boolean_literals() -> Result<(), LexicalError> {
    let tokens = lex_tokens(r#""hello" "OO" "DILI" "TOOL""#)?;

    assert_eq!(
        tokens,
        vec![
            Token::Str("hello".into()),
            Token::True("OO".into()),
            Token::False("DILI".into()),
            // contains `OO`, so it lexes as a boolean with its raw text kept
            Token::True("TOOL".into()),
            Token::Eof,
        ]
    );

    Ok(())
}

#[test]
fn test_escaped_quote_inside_string() -> Result<(), LexicalError> {
    let tokens = lex_tokens(r#""say \"hi\"""#)?;

    assert_eq!(
        tokens,
        vec![Token::Str("say \"hi\"".into()), Token::Eof]
    );

    Ok(())
}

#[test]
fn test_unterminated_string() {
    let err = lex(r#""never closed"#).expect_err("string never closes");

    assert_eq!(err.error, LexicalErrorType::UnterminatedString);
}

#[test]
fn test_char_literals() -> Result<(), LexicalError> {
    let tokens = lex_tokens("'a' '9' ' '")?;

    assert_eq!(
        tokens,
        vec![
            Token::Char('a'),
            Token::Char('9'),
            Token::Char(' '),
            Token::Eof,
        ]
    );

    Ok(())
}

#[test]
fn test_empty_char_literal() {
    let err = lex("''").expect_err("char literal may not be empty");

    assert_eq!(err.error, LexicalErrorType::EmptyCharacter);
}

#[test]
fn test_overlong_char_literal() {
    let err = lex("'ab'").expect_err("char literal holds one character");

    assert_eq!(err.error, LexicalErrorType::UnterminatedCharacter);
}

#[test]
fn test_program_tokens() -> Result<(), LexicalError> {
    let input = "SUGOD MUGNA NUMERO xyz, abc=100 xyz=((abc*5)/10+10)*-1 KATAPUSAN";

    let tokens = vec![
        Token::Begin,
        Token::Declare,
        Token::IntType,
        Token::Ident("xyz".into()),
        Token::Comma,
        Token::Ident("abc".into()),
        Token::Assign,
        Token::Int(100),
        Token::Ident("xyz".into()),
        Token::Assign,
        Token::LParen,
        Token::LParen,
        Token::Ident("abc".into()),
        Token::Star,
        Token::Int(5),
        Token::RParen,
        Token::Slash,
        Token::Int(10),
        Token::Plus,
        Token::Int(10),
        Token::RParen,
        Token::Star,
        Token::Minus,
        Token::Int(1),
        Token::Eof,
    ];

    let mut lexer = Lexer::new(input);

    for (idx, token) in tokens.iter().enumerate() {
        let (_, next_token, _) = match lexer.next_token() {
            Ok(next_token) => next_token,
            Err(err) => {
                println!("stopped at {token:?} ({idx})");
                panic!("{err:?}")
            }
        };

        assert_eq!(
            *token, next_token,
            "Next token does not match expected token ({:?}, {:?}) at {}",
            next_token, token, idx
        );
    }

    Ok(())
}

#[test]
fn test_identifiers() -> Result<(), LexicalError> {
    let tokens = lex_tokens("abc _private counter2 snake_case")?;

    assert_eq!(
        tokens,
        vec![
            Token::Ident("abc".into()),
            Token::Ident("_private".into()),
            Token::Ident("counter2".into()),
            Token::Ident("snake_case".into()),
            Token::Eof,
        ]
    );

    Ok(())
}

#[test]
fn test_token_spans() -> Result<(), LexicalError> {
    let spanned = lex("ab = 12")?;

    assert_eq!(
        spanned,
        vec![
            (0, Token::Ident("ab".into()), 2),
            (3, Token::Assign, 4),
            (5, Token::Int(12), 7),
            (7, Token::Eof, 7),
        ]
    );

    Ok(())
}

#[test]
fn test_escape_spans_resume_after_closing_bracket() -> Result<(), LexicalError> {
    let spanned = lex("[#]x")?;

    assert_eq!(
        spanned,
        vec![
            (0, Token::Str("#".into()), 3),
            (3, Token::Ident("x".into()), 4),
            (4, Token::Eof, 4),
        ]
    );

    Ok(())
}

#[test]
fn test_unknown_character() {
    let err = lex("?").expect_err("`?` is no Bisaya++ token");

    assert_eq!(
        err.error,
        LexicalErrorType::UnrecognizedCharacter { ch: '?' }
    );
}

#[test]
fn test_lexeme_round_trip() -> Result<(), LexicalError> {
    // re-serializing the lexemes in order reproduces the token stream
    let input =
        "SUGOD MUGNA NUMERO ctr ALANG SA ( ctr = 1 , ctr <= 10 , ctr ++ ) \
         PUNDOK { IPAKITA : ctr & ' ' } KATAPUSAN";

    let tokens = lex_tokens(input)?;

    let serialized = tokens.iter()
        .filter(|token| **token != Token::Eof)
        .map(|token| token.as_literal())
        .collect::<Vec<String>>()
        .join(" ");

    assert_eq!(lex_tokens(&serialized)?, tokens);

    Ok(())
}
