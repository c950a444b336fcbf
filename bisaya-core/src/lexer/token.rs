#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // <letter | _> { <letter> | <digit> | _ }
    Ident(String),
    Int(i32),
    Float(f32),
    Char(char),
    Str(String),
    // Booleans are written as the quoted words "OO" and "DILI"; the raw
    // quoted text is kept so declarations can insist on the exact spelling.
    True(String),
    False(String),

    // Program markers
    Begin, // SUGOD
    End,   // KATAPUSAN

    // Declarations and type keywords
    Declare,    // MUGNA
    IntType,    // NUMERO
    FloatType,  // TIPIK
    CharType,   // LETRA
    BoolType,   // TINUOD
    StringType, // PULONG

    // Control keywords
    If,      // KUNG
    Else,    // WALA
    Block,   // PUNDOK
    For,     // ALANG
    Sa,      // SA
    While,   // SAMTANG
    Display, // IPAKITA
    Input,   // DAWAT

    // Operators
    Assign,        // =
    Plus,          // +
    Minus,         // -
    Star,          // *
    Slash,         // /
    Percent,       // %
    PlusAssign,    // +=
    MinusAssign,   // -=
    StarAssign,    // *=
    SlashAssign,   // /=
    PercentAssign, // %=
    Greater,       // >
    Less,          // <
    GreaterEqual,  // >=
    LessEqual,     // <=
    EqualEqual,    // ==
    NotEqual,      // <>
    Increment,     // ++
    Ampersand,     // & (concatenation, IPAKITA only)
    And,           // UG
    Or,            // O
    Not,           // DILI used as unary operator

    // Delimiters
    Colon,     // :
    Comma,     // ,
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Newline,   // literal line feed
    Dollar,    // $ newline sentinel

    Eof,
}

impl Token {
    pub fn is_reserved_word(&self) -> bool {
        match self {
            Token::Begin
            | Token::End
            | Token::Declare
            | Token::IntType
            | Token::FloatType
            | Token::CharType
            | Token::BoolType
            | Token::StringType
            | Token::If
            | Token::Else
            | Token::Block
            | Token::For
            | Token::Sa
            | Token::While
            | Token::Display
            | Token::Input
            | Token::And
            | Token::Or
            | Token::Not => true,
            _ => false,
        }
    }

    pub fn is_type_keyword(&self) -> bool {
        match self {
            Token::IntType
            | Token::FloatType
            | Token::CharType
            | Token::BoolType
            | Token::StringType => true,
            _ => false,
        }
    }

    pub fn is_operator(&self) -> bool {
        match self {
            Token::Assign
            | Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Percent
            | Token::Greater
            | Token::Less
            | Token::GreaterEqual
            | Token::LessEqual
            | Token::EqualEqual
            | Token::NotEqual
            | Token::Increment
            | Token::Ampersand
            | Token::And
            | Token::Or
            | Token::Not => true,
            _ => false,
        }
    }

    /// True for every token that may open an expression.
    pub fn starts_expression(&self) -> bool {
        match self {
            Token::Ident(_)
            | Token::Int(_)
            | Token::Float(_)
            | Token::Char(_)
            | Token::Str(_)
            | Token::True(_)
            | Token::False(_)
            | Token::LParen
            | Token::Minus
            | Token::Plus
            | Token::Increment
            | Token::Not => true,
            _ => false,
        }
    }

    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.clone(),
            Token::Int(value) => format!("{}", value),
            Token::Float(value) => format!("{:?}", value),
            Token::Char(value) => format!("'{}'", value),
            Token::Str(value) => format!("\"{}\"", value),
            Token::True(lexeme) => format!("\"{}\"", lexeme),
            Token::False(lexeme) => format!("\"{}\"", lexeme),

            Token::Begin => "SUGOD".into(),
            Token::End => "KATAPUSAN".into(),
            Token::Declare => "MUGNA".into(),
            Token::IntType => "NUMERO".into(),
            Token::FloatType => "TIPIK".into(),
            Token::CharType => "LETRA".into(),
            Token::BoolType => "TINUOD".into(),
            Token::StringType => "PULONG".into(),
            Token::If => "KUNG".into(),
            Token::Else => "WALA".into(),
            Token::Block => "PUNDOK".into(),
            Token::For => "ALANG".into(),
            Token::Sa => "SA".into(),
            Token::While => "SAMTANG".into(),
            Token::Display => "IPAKITA".into(),
            Token::Input => "DAWAT".into(),

            Token::Assign => "=".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::Percent => "%".into(),
            Token::PlusAssign => "+=".into(),
            Token::MinusAssign => "-=".into(),
            Token::StarAssign => "*=".into(),
            Token::SlashAssign => "/=".into(),
            Token::PercentAssign => "%=".into(),
            Token::Greater => ">".into(),
            Token::Less => "<".into(),
            Token::GreaterEqual => ">=".into(),
            Token::LessEqual => "<=".into(),
            Token::EqualEqual => "==".into(),
            Token::NotEqual => "<>".into(),
            Token::Increment => "++".into(),
            Token::Ampersand => "&".into(),
            Token::And => "UG".into(),
            Token::Or => "O".into(),
            Token::Not => "DILI".into(),

            Token::Colon => ":".into(),
            Token::Comma => ",".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::LBrace => "{".into(),
            Token::RBrace => "}".into(),
            Token::Newline => "\n".into(),
            Token::Dollar => "$".into(),

            Token::Eof => "\0".into(),
        }
    }
}

pub fn str_to_keyword(word: &str) -> Option<Token> {
    Some(match word {
        "SUGOD" => Token::Begin,
        "KATAPUSAN" => Token::End,

        "MUGNA" => Token::Declare,
        "NUMERO" => Token::IntType,
        "TIPIK" => Token::FloatType,
        "LETRA" => Token::CharType,
        "TINUOD" => Token::BoolType,
        "PULONG" => Token::StringType,

        "KUNG" => Token::If,
        "WALA" => Token::Else,
        "PUNDOK" => Token::Block,
        "ALANG" => Token::For,
        "SA" => Token::Sa,
        "SAMTANG" => Token::While,
        "IPAKITA" => Token::Display,
        "DAWAT" => Token::Input,

        "UG" => Token::And,
        "O" => Token::Or,
        "DILI" => Token::Not,
        "OO" => Token::True("OO".into()),

        _ => return None,
    })
}
