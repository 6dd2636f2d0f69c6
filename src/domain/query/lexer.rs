use super::Pos;
use crate::domain::error::NlqError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    Punct(char),
    Spread,
    Name(String),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Token {
    pub(super) fn describe(&self) -> String {
        match self {
            Token::Punct(c) => format!("\"{}\"", c),
            Token::Spread => "\"...\"".to_string(),
            Token::Name(n) => format!("Name \"{}\"", n),
            Token::Int(n) => format!("Int \"{}\"", n),
            Token::Float(n) => format!("Float \"{}\"", n),
            Token::Str(s) => format!("String \"{}\"", s),
        }
    }
}

pub(super) struct Lexer {
    chars: Vec<char>,
    idx: usize,
    line: usize,
    column: usize,
}

pub(super) fn tokenize(text: &str) -> Result<Vec<(Token, Pos)>, NlqError> {
    let mut lexer = Lexer {
        chars: text.chars().collect(),
        idx: 0,
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next_token()? {
        tokens.push(tok);
    }
    Ok(tokens)
}

pub(super) fn syntax_error(message: impl Into<String>, pos: Pos) -> NlqError {
    NlqError::Parse {
        message: message.into(),
        line: pos.line,
        column: pos.column,
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

impl Lexer {
    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    // Whitespace, commas and `#` comments are insignificant.
    fn skip_ignored(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\n' | '\r' | ',' | '\u{feff}' => {
                    self.bump();
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<(Token, Pos)>, NlqError> {
        self.skip_ignored();
        let pos = self.pos();
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let token = match c {
            '{' | '}' | '(' | ')' | '[' | ']' | ':' | '!' | '=' | '@' | '$' | '|' | '&' => {
                self.bump();
                Token::Punct(c)
            }
            '.' => {
                if self.peek_at(1) == Some('.') && self.peek_at(2) == Some('.') {
                    self.bump();
                    self.bump();
                    self.bump();
                    Token::Spread
                } else {
                    return Err(syntax_error("Unexpected character \".\"", pos));
                }
            }
            '"' => self.read_string(pos)?,
            '-' | '0'..='9' => self.read_number(pos)?,
            c if is_name_start(c) => {
                let mut name = String::new();
                while let Some(c) = self.peek() {
                    if !is_name_continue(c) {
                        break;
                    }
                    name.push(c);
                    self.bump();
                }
                Token::Name(name)
            }
            other => {
                return Err(syntax_error(
                    format!("Unexpected character \"{}\"", other),
                    pos,
                ))
            }
        };

        Ok(Some((token, pos)))
    }

    fn read_number(&mut self, pos: Pos) -> Result<Token, NlqError> {
        let mut text = String::new();
        let mut is_float = false;

        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }
        self.read_digits(&mut text, pos)?;

        if self.peek() == Some('.') {
            is_float = true;
            text.push('.');
            self.bump();
            self.read_digits(&mut text, pos)?;
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            text.push('e');
            self.bump();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                text.push(sign);
                self.bump();
            }
            self.read_digits(&mut text, pos)?;
        }
        if let Some(c) = self.peek() {
            if is_name_start(c) || c == '.' {
                return Err(syntax_error(
                    format!("Invalid number, unexpected \"{}\"", c),
                    self.pos(),
                ));
            }
        }

        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| syntax_error(format!("Invalid number \"{}\"", text), pos))
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| syntax_error(format!("Invalid number \"{}\"", text), pos))
        }
    }

    fn read_digits(&mut self, out: &mut String, pos: Pos) -> Result<(), NlqError> {
        let start = out.len();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            out.push(c);
            self.bump();
        }
        if out.len() == start {
            return Err(syntax_error("Invalid number, expected digit", pos));
        }
        Ok(())
    }

    fn read_string(&mut self, pos: Pos) -> Result<Token, NlqError> {
        if self.peek_at(1) == Some('"') && self.peek_at(2) == Some('"') {
            return self.read_block_string(pos);
        }
        self.bump();

        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(syntax_error("Unterminated string", pos)),
                Some('"') => break,
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{0008}',
                        Some('f') => '\u{000c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => self.read_unicode_escape(pos)?,
                        _ => return Err(syntax_error("Invalid escape sequence in string", pos)),
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }
        Ok(Token::Str(value))
    }

    fn read_unicode_escape(&mut self, pos: Pos) -> Result<char, NlqError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| syntax_error("Invalid unicode escape in string", pos))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| syntax_error("Invalid unicode escape in string", pos))
    }

    fn read_block_string(&mut self, pos: Pos) -> Result<Token, NlqError> {
        for _ in 0..3 {
            self.bump();
        }
        let mut value = String::new();
        loop {
            if self.peek() == Some('"') && self.peek_at(1) == Some('"') && self.peek_at(2) == Some('"')
            {
                for _ in 0..3 {
                    self.bump();
                }
                break;
            }
            match self.bump() {
                None => return Err(syntax_error("Unterminated string", pos)),
                Some(c) => value.push(c),
            }
        }
        Ok(Token::Str(value.trim().to_string()))
    }
}
