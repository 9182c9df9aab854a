/// Lexical token produced by the [`Lexer`](crate::lexer::Lexer).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Number with a fractional part
    ///
    /// # Examples
    /// ```text
    /// 0.003
    /// -1.5
    /// ```
    Float(f64),

    /// Number without a fractional part
    ///
    /// # Examples
    /// ```text
    /// 200
    /// -10
    /// ```
    Integer(i64),

    /// String literal enclosed in double quotes, escapes already resolved
    ///
    /// # Examples
    /// ```text
    /// "hello world"
    /// "tab\there"
    /// ```
    String(String),

    /// `true` or `false`
    Boolean(bool),

    /// Dotted field path or bare word
    ///
    /// Every segment starts with a letter or underscore, followed by
    /// letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// status
    /// req.fields.ext
    /// _internal
    /// ```
    Identifier(String),

    // Keywords
    /// `and` / `AND`
    And,
    /// `or` / `OR`
    Or,
    /// `not` / `NOT`
    Not,

    // Field operators
    /// `:` (equal)
    Colon,
    /// `=` (equal)
    Eq,
    /// `!=` (not equal)
    NotEq,
    /// `!:` (not equal)
    NotColon,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `~` (substring match)
    Tilde,
    /// `?` (existence check)
    ///
    /// # Examples
    /// ```text
    /// email?
    /// ```
    Question,

    // Delimiters
    /// Left parenthesis for grouping
    LParen,
    /// Right parenthesis
    RParen,
    /// Left bracket opening a one-of list
    LBracket,
    /// Right bracket
    RBracket,
    /// Comma separating one-of members
    Comma,

    /// End of input
    Eof,
}

impl Token {
    /// Short human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Float(n) => format!("number {}", n),
            Token::Integer(n) => format!("number {}", n),
            Token::String(s) => format!("string {:?}", s),
            Token::Boolean(b) => format!("boolean {}", b),
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::And => "'and'".to_string(),
            Token::Or => "'or'".to_string(),
            Token::Not => "'not'".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Eq => "'='".to_string(),
            Token::NotEq => "'!='".to_string(),
            Token::NotColon => "'!:'".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::GtEq => "'>='".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::LtEq => "'<='".to_string(),
            Token::Tilde => "'~'".to_string(),
            Token::Question => "'?'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
