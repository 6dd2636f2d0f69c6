use super::lexer::{syntax_error, tokenize, Token};
use super::{Field, Literal, Operation, OperationKind, Pos};
use crate::domain::error::NlqError;

/// Deepest combined nesting of selection sets, lists and objects.
pub const MAX_DEPTH: usize = 64;

/// Parse a single operation document.
///
/// Accepts the shorthand `{ ... }` form or `query|mutation|subscription [Name] { ... }`.
/// Anything after the operation's closing brace is a syntax error.
pub fn parse_operation(text: &str) -> Result<Operation, NlqError> {
    let tokens = tokenize(text)?;
    let end = tokens.last().map(|(_, pos)| *pos).unwrap_or(Pos { line: 1, column: 1 });
    let mut parser = Parser {
        tokens,
        idx: 0,
        depth: 0,
        end,
    };

    let operation = parser.parse_operation()?;
    if let Some((token, pos)) = parser.peek() {
        let message = match token {
            Token::Name(n) if n == "fragment" => "Fragments are not supported".to_string(),
            other => format!("Unexpected {} after the operation", other.describe()),
        };
        return Err(syntax_error(message, *pos));
    }
    Ok(operation)
}

struct Parser {
    tokens: Vec<(Token, Pos)>,
    idx: usize,
    depth: usize,
    end: Pos,
}

impl Parser {
    fn peek(&self) -> Option<&(Token, Pos)> {
        self.tokens.get(self.idx)
    }

    fn peek_punct(&self, c: char) -> bool {
        matches!(self.peek(), Some((Token::Punct(p), _)) if *p == c)
    }

    fn next(&mut self) -> Result<(Token, Pos), NlqError> {
        match self.tokens.get(self.idx) {
            Some(tok) => {
                self.idx += 1;
                Ok(tok.clone())
            }
            None => Err(syntax_error("Unexpected end of document", self.end)),
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<Pos, NlqError> {
        let (token, pos) = self.next()?;
        match token {
            Token::Punct(p) if p == c => Ok(pos),
            other => Err(syntax_error(
                format!("Expected \"{}\", found {}", c, other.describe()),
                pos,
            )),
        }
    }

    fn expect_name(&mut self) -> Result<(String, Pos), NlqError> {
        let (token, pos) = self.next()?;
        match token {
            Token::Name(n) => Ok((n, pos)),
            other => Err(syntax_error(
                format!("Expected Name, found {}", other.describe()),
                pos,
            )),
        }
    }

    // Validation and resolution recurse over the same tree.
    fn descend(&mut self, pos: Pos) -> Result<(), NlqError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(syntax_error("Query nested too deeply", pos));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn reject_unsupported(&self) -> Result<(), NlqError> {
        match self.peek() {
            Some((Token::Punct('$'), pos)) | Some((Token::Punct('('), pos)) => Err(syntax_error(
                "Variables are not allowed; use literal values",
                *pos,
            )),
            Some((Token::Punct('@'), pos)) => {
                Err(syntax_error("Directives are not supported", *pos))
            }
            _ => Ok(()),
        }
    }

    fn parse_operation(&mut self) -> Result<Operation, NlqError> {
        if self.peek_punct('{') {
            return Ok(Operation {
                kind: OperationKind::Query,
                name: None,
                selection_set: self.parse_selection_set()?,
            });
        }

        let (keyword, pos) = self.expect_name()?;
        let Some(kind) = OperationKind::from_keyword(&keyword) else {
            let message = if keyword == "fragment" {
                "Fragments are not supported".to_string()
            } else {
                format!("Unexpected Name \"{}\", expected an operation", keyword)
            };
            return Err(syntax_error(message, pos));
        };

        let name = match self.peek() {
            Some((Token::Name(_), _)) => Some(self.expect_name()?.0),
            _ => None,
        };
        self.reject_unsupported()?;

        Ok(Operation {
            kind,
            name,
            selection_set: self.parse_selection_set()?,
        })
    }

    fn parse_selection_set(&mut self) -> Result<Vec<Field>, NlqError> {
        let open = self.expect_punct('{')?;
        self.descend(open)?;
        let mut fields = Vec::new();
        loop {
            match self.peek() {
                Some((Token::Punct('}'), _)) => {
                    self.idx += 1;
                    break;
                }
                Some((Token::Spread, pos)) => {
                    return Err(syntax_error("Fragments are not supported", *pos));
                }
                Some(_) => fields.push(self.parse_field()?),
                None => return Err(syntax_error("Unexpected end of document", self.end)),
            }
        }
        if fields.is_empty() {
            return Err(syntax_error("Expected at least one field in selection", open));
        }
        self.ascend();
        Ok(fields)
    }

    fn parse_field(&mut self) -> Result<Field, NlqError> {
        let (first, pos) = self.expect_name()?;
        let (alias, name) = if self.peek_punct(':') {
            self.idx += 1;
            let (name, _) = self.expect_name()?;
            (Some(first), name)
        } else {
            (None, first)
        };

        let arguments = if self.peek_punct('(') {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        if let Some((Token::Punct('@'), pos)) = self.peek() {
            return Err(syntax_error("Directives are not supported", *pos));
        }

        let selection_set = if self.peek_punct('{') {
            self.parse_selection_set()?
        } else {
            Vec::new()
        };

        Ok(Field {
            alias,
            name,
            arguments,
            selection_set,
            pos,
        })
    }

    fn parse_arguments(&mut self) -> Result<Vec<(String, Literal)>, NlqError> {
        let open = self.expect_punct('(')?;
        let mut args = Vec::new();
        while !self.peek_punct(')') {
            let (name, pos) = self.expect_name()?;
            self.expect_punct(':')?;
            if args.iter().any(|(existing, _)| *existing == name) {
                return Err(syntax_error(
                    format!("There can be only one argument named \"{}\"", name),
                    pos,
                ));
            }
            let value = self.parse_value()?;
            args.push((name, value));
        }
        self.idx += 1;
        if args.is_empty() {
            return Err(syntax_error("Expected at least one argument", open));
        }
        Ok(args)
    }

    fn parse_value(&mut self) -> Result<Literal, NlqError> {
        let (token, pos) = self.next()?;
        match token {
            Token::Int(n) => Ok(Literal::Int(n)),
            Token::Float(n) => Ok(Literal::Float(n)),
            Token::Str(s) => Ok(Literal::String(s)),
            Token::Name(n) => Ok(match n.as_str() {
                "true" => Literal::Boolean(true),
                "false" => Literal::Boolean(false),
                "null" => Literal::Null,
                _ => Literal::Enum(n),
            }),
            Token::Punct('$') => Err(syntax_error(
                "Variables are not allowed; use literal values",
                pos,
            )),
            Token::Punct('[') => {
                self.descend(pos)?;
                let mut items = Vec::new();
                while !self.peek_punct(']') {
                    items.push(self.parse_value()?);
                }
                self.idx += 1;
                self.ascend();
                Ok(Literal::List(items))
            }
            Token::Punct('{') => {
                self.descend(pos)?;
                let mut fields: Vec<(String, Literal)> = Vec::new();
                while !self.peek_punct('}') {
                    let (name, _) = self.expect_name()?;
                    self.expect_punct(':')?;
                    let value = self.parse_value()?;
                    fields.push((name, value));
                }
                self.idx += 1;
                self.ascend();
                Ok(Literal::Object(fields))
            }
            other => Err(syntax_error(
                format!("Unexpected {}", other.describe()),
                pos,
            )),
        }
    }
}
