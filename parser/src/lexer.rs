//! Token stream for TypeScript schema sources
//!
//! Built from small nom combinators. Comments are not tokens: they are
//! attached to the token that follows them so doc comments can be
//! recovered for declarations and object properties.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_until, take_while},
    character::complete::{char, satisfy},
    combinator::recognize,
    error::{Error, ErrorKind},
    sequence::pair,
};

use crate::error::SyntaxError;

// =============================================================================
// Tokens
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword
    Ident(String),
    /// String literal with escapes resolved
    Str(String),
    /// Raw template literal body (between the backticks)
    Template(String),
    Number(String),
    Regex(String),
    Punct(&'static str),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
    /// `/** ... */`
    Doc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Raw comment text including delimiters
    pub text: String,
}

impl Comment {
    fn new(text: &str) -> Self {
        let kind = if text.starts_with("//") {
            CommentKind::Line
        } else if text.starts_with("/**") && text != "/**/" {
            CommentKind::Doc
        } else {
            CommentKind::Block
        };
        Self {
            kind,
            text: text.to_string(),
        }
    }

    /// Text of a doc comment with the delimiters and leading `*` gutter
    /// stripped. Blank lines are dropped; `None` when nothing is left.
    pub fn doc_text(&self) -> Option<String> {
        if self.kind != CommentKind::Doc {
            return None;
        }
        let body = self
            .text
            .strip_prefix("/**")
            .and_then(|t| t.strip_suffix("*/"))
            .unwrap_or_default();

        let lines: Vec<&str> = body
            .lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix('*').map_or(line, str::trim_start).trim_end()
            })
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Comments between the previous token and this one
    pub comments: Vec<Comment>,
    /// A line break separates this token from the previous one
    pub newline_before: bool,
}

impl Token {
    /// Cleaned text of the doc comment directly preceding this token
    pub fn doc(&self) -> Option<String> {
        self.comments.last().and_then(Comment::doc_text)
    }

    pub fn punct(&self) -> Option<&'static str> {
        match self.kind {
            TokenKind::Punct(p) => Some(p),
            _ => None,
        }
    }

    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_punct(&self, p: &str) -> bool {
        self.punct() == Some(p)
    }

    pub fn is_ident(&self, word: &str) -> bool {
        self.ident() == Some(word)
    }
}

// =============================================================================
// Combinators
// =============================================================================

/// Longest first so that prefixes never shadow longer operators
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@",
];

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_' || c == '$' || c == '#'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_digit()).or(char('.').and(satisfy(|c| c.is_ascii_digit())).map(|_| '.')),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    ))
    .parse(input)
}

fn punctuator(input: &str) -> IResult<&str, &'static str> {
    for p in PUNCTUATORS {
        if let Some(rest) = input.strip_prefix(p) {
            return Ok((rest, p));
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Tag)))
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_while(|c| c != '\n'))).parse(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize((tag("/*"), take_until("*/"), tag("*/"))).parse(input)
}

fn hex_escape(input: &str, len: usize) -> Option<(char, usize)> {
    let digits = input.get(..len)?;
    let code = u32::from_str_radix(digits, 16).ok()?;
    char::from_u32(code).map(|c| (c, len))
}

/// Single or double quoted string; escapes are resolved
fn string_literal(input: &str) -> IResult<&str, String> {
    let (rest, quote) = char('"').or(char('\'')).parse(input)?;
    let mut out = String::new();
    let mut pos = 0;

    while let Some(c) = rest[pos..].chars().next() {
        pos += c.len_utf8();
        if c == quote {
            return Ok((&rest[pos..], out));
        }
        match c {
            '\n' => break,
            '\\' => {
                let Some(escaped) = rest[pos..].chars().next() else {
                    break;
                };
                pos += escaped.len_utf8();
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'v' => out.push('\u{b}'),
                    '0' => out.push('\0'),
                    // line continuation
                    '\n' | '\u{2028}' | '\u{2029}' => {}
                    '\r' => {
                        if rest[pos..].starts_with('\n') {
                            pos += 1;
                        }
                    }
                    'x' => match hex_escape(&rest[pos..], 2) {
                        Some((ch, len)) => {
                            out.push(ch);
                            pos += len;
                        }
                        None => out.push('x'),
                    },
                    'u' => {
                        let tail = &rest[pos..];
                        let braced = tail.strip_prefix('{').and_then(|t| {
                            let close = t.find('}')?;
                            let ch = char::from_u32(u32::from_str_radix(&t[..close], 16).ok()?)?;
                            Some((ch, close + 2))
                        });
                        match braced.or_else(|| hex_escape(tail, 4)) {
                            Some((ch, len)) => {
                                out.push(ch);
                                pos += len;
                            }
                            None => out.push('u'),
                        }
                    }
                    other => out.push(other),
                }
            }
            c => out.push(c),
        }
    }

    Err(nom::Err::Failure(Error::new(input, ErrorKind::Char)))
}

/// Backtick template; `${...}` substitutions may nest strings and templates
fn template_literal(input: &str) -> IResult<&str, &str> {
    let (rest, _) = char('`').parse(input)?;
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' if depth == 0 => return Ok((&rest[i + 1..], &rest[..i])),
            b'$' if depth == 0 && bytes.get(i + 1) == Some(&b'{') => {
                depth = 1;
                i += 2;
            }
            b'{' if depth > 0 => {
                depth += 1;
                i += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                i += 1;
            }
            b'`' => {
                let (after, _) = template_literal(&rest[i..])?;
                i = rest.len() - after.len();
            }
            b'\'' | b'"' if depth > 0 => {
                let (after, _) = string_literal(&rest[i..])?;
                i = rest.len() - after.len();
            }
            _ => i += 1,
        }
    }

    Err(nom::Err::Failure(Error::new(input, ErrorKind::Char)))
}

/// `/pattern/flags`; `None` when the slash cannot start a regex here
fn regex_literal(input: &str) -> Option<(&str, &str)> {
    let bytes = input.as_bytes();
    let mut in_class = false;
    let mut i = 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'\n' => return None,
            b'[' => in_class = true,
            b']' => in_class = false,
            b'/' if !in_class => {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                return Some((&input[i..], &input[..i]));
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Whether a `/` after `prev` starts a regex rather than a division
fn regex_allowed(prev: Option<&Token>) -> bool {
    match prev.map(|t| &t.kind) {
        None => true,
        Some(TokenKind::Punct(p)) => !matches!(*p, ")" | "]" | "}"),
        Some(TokenKind::Ident(word)) => matches!(
            word.as_str(),
            "return"
                | "typeof"
                | "case"
                | "do"
                | "else"
                | "in"
                | "of"
                | "new"
                | "delete"
                | "void"
                | "throw"
                | "yield"
                | "await"
                | "instanceof"
        ),
        Some(_) => false,
    }
}

fn next_token(input: &str, regex_ok: bool) -> Result<(&str, TokenKind), &'static str> {
    let first = input.chars().next().unwrap_or_default();

    match first {
        '"' | '\'' => {
            return string_literal(input)
                .map(|(rest, s)| (rest, TokenKind::Str(s)))
                .map_err(|_| "unterminated string literal");
        }
        '`' => {
            return template_literal(input)
                .map(|(rest, s)| (rest, TokenKind::Template(s.to_string())))
                .map_err(|_| "unterminated template literal");
        }
        '/' if regex_ok => {
            if let Some((rest, re)) = regex_literal(input) {
                return Ok((rest, TokenKind::Regex(re.to_string())));
            }
        }
        _ => {}
    }

    if let Ok((rest, name)) = identifier(input) {
        return Ok((rest, TokenKind::Ident(name.to_string())));
    }
    if let Ok((rest, n)) = number(input) {
        return Ok((rest, TokenKind::Number(n.to_string())));
    }
    if let Ok((rest, p)) = punctuator(input) {
        return Ok((rest, TokenKind::Punct(p)));
    }
    Err("unexpected character")
}

// =============================================================================
// Tokenizer
// =============================================================================

/// Split `source` into tokens. The result always ends with [`TokenKind::Eof`],
/// which carries any trailing comments.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut comments = Vec::new();
    let mut newline_before = false;
    let mut rest = source.strip_prefix('\u{feff}').unwrap_or(source);

    if rest.starts_with("#!") {
        rest = rest.find('\n').map_or("", |nl| &rest[nl..]);
    }

    loop {
        let trimmed = rest.trim_start();
        if rest[..rest.len() - trimmed.len()].contains('\n') {
            newline_before = true;
        }
        rest = trimmed;

        if rest.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                comments,
                newline_before: true,
            });
            return Ok(tokens);
        }

        let offset = source.len() - rest.len();

        if rest.starts_with("//") {
            if let Ok((after, text)) = line_comment(rest) {
                comments.push(Comment::new(text));
                rest = after;
                continue;
            }
        }
        if rest.starts_with("/*") {
            let (after, text) = block_comment(rest)
                .map_err(|_| SyntaxError::at("unterminated comment", source, offset))?;
            if text.contains('\n') {
                newline_before = true;
            }
            comments.push(Comment::new(text));
            rest = after;
            continue;
        }

        let (after, kind) = next_token(rest, regex_allowed(tokens.last()))
            .map_err(|message| SyntaxError::at(message, source, offset))?;
        tokens.push(Token {
            kind,
            comments: std::mem::take(&mut comments),
            newline_before: std::mem::take(&mut newline_before),
        });
        rest = after;
    }
}
