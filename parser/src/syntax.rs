//! Recursive descent over the token stream
//!
//! The parser is total: it never rejects input. Constructs it does not
//! understand are skipped with bracket balancing, and every loop checks
//! that it made progress so malformed sources terminate. Nesting deeper
//! than `MAX_DEPTH` is skipped the same way and becomes an opaque node.

use crate::ast::{ArrowBody, ArrowFunction, Declarator, Expr, Module, Property, Stmt, VarDecl};
use crate::error::SyntaxError;
use crate::lexer::{Token, TokenKind, tokenize};

const ASSIGN_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=",
    "||=", "??=",
];

const BINARY_OPS: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "==", "!=", "===", "!==", "<", ">", "<=", ">=", "&&", "||",
    "??", "&", "|", "^", "<<", ">>", ">>>",
];

const UNARY_OPS: &[&str] = &["!", "~", "+", "-", "++", "--", "..."];

/// Deepest nesting of expressions, blocks and member/call links that is
/// parsed into a tree
const MAX_DEPTH: usize = 128;

/// Tokenize and parse a whole module
pub fn parse_module(source: &str) -> Result<Module, SyntaxError> {
    let tokens = tokenize(source)?;
    Ok(Parser::new(tokens).module())
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            tokens.push(Token {
                kind: TokenKind::Eof,
                comments: Vec::new(),
                newline_before: true,
            });
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    fn token_at(&self, index: usize) -> &Token {
        &self.tokens[index.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        self.token_at(self.pos)
    }

    fn peek_at(&self, n: usize) -> &Token {
        self.token_at(self.pos + n)
    }

    fn bump(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn is_punct(&self, p: &str) -> bool {
        self.peek().is_punct(p)
    }

    fn is_keyword(&self, word: &str) -> bool {
        self.peek().is_ident(word)
    }

    fn eat_punct(&mut self, p: &str) -> bool {
        if self.is_punct(p) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Index of the bracket closing the one at `open`
    fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            match token.kind {
                TokenKind::Punct("(" | "[" | "{") => depth += 1,
                TokenKind::Punct(")" | "]" | "}") => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    /// Go one level deeper, or report that the nesting limit is reached
    fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // =========================================================================
    // Skipping
    // =========================================================================

    /// Skip an expression up to the next separator or closing bracket
    fn skip_expression(&mut self) {
        while !self.at_eof() && !matches!(self.peek().punct(), Some("," | ";" | ")" | "]" | "}")) {
            if matches!(self.peek().punct(), Some("(" | "[" | "{")) {
                self.skip_balanced();
            } else {
                self.bump();
            }
        }
    }

    /// Skip a statement up to and including its `;` or braced body
    fn skip_statement(&mut self) {
        loop {
            if self.at_eof() || self.is_punct("}") || self.eat_punct(";") {
                return;
            }
            if self.is_punct("{") {
                self.skip_balanced();
                return;
            }
            self.skip_balanced();
        }
    }

    /// Skip a bracketed group starting at the current token
    fn skip_balanced(&mut self) {
        match self.peek().punct() {
            Some("<") => self.skip_angle(),
            Some("(" | "[" | "{") => {
                let close = self.matching_close(self.pos);
                match close {
                    Some(close) => self.pos = close,
                    None => self.pos = self.tokens.len() - 1,
                }
                self.bump();
            }
            _ => self.bump(),
        }
    }

    /// Skip `<...>` type arguments or parameters
    fn skip_angle(&mut self) {
        let mut depth = 0isize;
        loop {
            if self.at_eof() {
                return;
            }
            if let Some(p) = self.peek().punct() {
                if p.chars().all(|c| c == '<') {
                    depth += p.len() as isize;
                } else if p.chars().all(|c| c == '>') {
                    depth -= p.len() as isize;
                } else if p == ";" {
                    return;
                }
            }
            self.bump();
            if depth <= 0 {
                return;
            }
        }
    }

    /// Skip a type annotation. Stops at depth zero on a closing bracket,
    /// `;`, `,`, `=`, any of `terminators`, or a line break that does not
    /// continue the type.
    fn skip_type(&mut self, terminators: &[&str]) {
        let mut depth = 0isize;
        let mut consumed = false;
        loop {
            let token = self.peek();
            if matches!(token.kind, TokenKind::Eof) {
                return;
            }
            let p = token.punct();
            if depth <= 0 {
                let at_terminator = p.is_some_and(|p| {
                    terminators.contains(&p) || matches!(p, ";" | ")" | "]" | "}" | "," | "=")
                });
                let line_ends =
                    consumed && token.newline_before && !matches!(p, Some("|" | "&" | "."));
                if at_terminator || line_ends {
                    return;
                }
            }
            match p {
                Some("(" | "[" | "{") => depth += 1,
                Some(")" | "]" | "}") => depth -= 1,
                Some(p) if p.chars().all(|c| c == '<') => depth += p.len() as isize,
                Some(p) if p.chars().all(|c| c == '>') => depth -= p.len() as isize,
                _ => {}
            }
            self.bump();
            consumed = true;
        }
    }

    /// Skip `class`, `interface` and `enum` declarations up to and including
    /// their body
    fn skip_declaration_block(&mut self) {
        while !self.at_eof() && !self.is_punct("{") && !self.is_punct(";") {
            if self.is_punct("(") || self.is_punct("<") {
                self.skip_balanced();
            } else {
                self.bump();
            }
        }
        if self.is_punct("{") {
            self.skip_balanced();
        } else {
            self.eat_punct(";");
        }
    }

    fn skip_type_alias(&mut self) {
        self.bump(); // type
        self.bump(); // name
        if self.is_punct("<") {
            self.skip_angle();
        }
        if self.eat_punct("=") {
            self.skip_type(&[]);
        }
        self.eat_punct(";");
    }

    /// `import ...` or `export { .. } from '..'`
    fn skip_module_clause(&mut self) {
        self.bump();
        loop {
            if self.at_eof() || self.is_punct(";") {
                break;
            }
            if matches!(self.peek().kind, TokenKind::Str(_)) {
                self.bump();
                break;
            }
            if self.is_punct("{") {
                self.skip_balanced();
                if !self.is_keyword("from") {
                    break;
                }
                continue;
            }
            self.bump();
        }
        if (self.is_keyword("with") || self.is_keyword("assert")) && self.peek_at(1).is_punct("{")
        {
            self.bump();
            self.skip_balanced();
        }
        self.eat_punct(";");
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn module(mut self) -> Module {
        Module {
            body: self.statements_until(None),
        }
    }

    fn statements_until(&mut self, close: Option<&str>) -> Vec<Stmt> {
        let mut body = Vec::new();
        loop {
            if self.at_eof() || close.is_some_and(|c| self.is_punct(c)) {
                break;
            }
            let start = self.pos;
            if let Some(stmt) = self.statement() {
                body.push(stmt);
            }
            if self.pos == start {
                self.bump();
            }
        }
        body
    }

    fn block(&mut self) -> Vec<Stmt> {
        if !self.is_punct("{") {
            return Vec::new();
        }
        if !self.enter() {
            self.skip_balanced();
            return Vec::new();
        }
        self.bump();
        let body = self.statements_until(Some("}"));
        self.eat_punct("}");
        self.leave();
        body
    }

    fn nested_statement(&mut self) -> Vec<Stmt> {
        if !self.enter() {
            self.skip_statement();
            return Vec::new();
        }
        let body = self.statement().into_iter().collect();
        self.leave();
        body
    }

    fn statement(&mut self) -> Option<Stmt> {
        if self.eat_punct(";") {
            return None;
        }
        if self.is_punct("{") {
            return Some(Stmt::Block(self.block()));
        }

        let doc = self.peek().doc();
        let word = self.peek().ident().map(str::to_owned);
        let next = self.peek_at(1);
        let next_on_same_line = !next.newline_before;

        match word.as_deref() {
            Some("import") if !(next.is_punct("(") || next.is_punct(".")) => {
                self.skip_module_clause();
                None
            }
            Some("export") => self.export_statement(doc),
            Some("const" | "let" | "var") => {
                if next.is_ident("enum") {
                    self.skip_declaration_block();
                    return None;
                }
                Some(Stmt::Var(self.var_decl(false, doc)))
            }
            Some("function") => Some(Stmt::Expr(self.function_expr())),
            Some("async") if next.is_ident("function") => {
                self.bump();
                Some(Stmt::Expr(self.function_expr()))
            }
            Some("class" | "interface" | "enum") => {
                self.skip_declaration_block();
                None
            }
            Some("abstract") if next.is_ident("class") => {
                self.skip_declaration_block();
                None
            }
            Some("type") if next.ident().is_some() && next_on_same_line => {
                self.skip_type_alias();
                None
            }
            Some("declare") if next.ident().is_some() && next_on_same_line => {
                self.bump();
                self.statement()
            }
            Some("namespace" | "module")
                if next_on_same_line
                    && matches!(next.kind, TokenKind::Ident(_) | TokenKind::Str(_)) =>
            {
                self.bump();
                self.bump();
                while self.eat_punct(".") {
                    self.bump();
                }
                Some(Stmt::Block(self.block()))
            }
            Some("return") => {
                self.bump();
                if self.is_punct(";") || self.is_punct("}") || self.peek().newline_before {
                    self.eat_punct(";");
                    return Some(Stmt::Return(None));
                }
                let value = self.expression();
                self.eat_punct(";");
                Some(Stmt::Return(Some(value)))
            }
            Some("if" | "while" | "for" | "switch" | "with" | "catch") => {
                self.bump();
                if self.is_keyword("await") {
                    self.bump();
                }
                let exprs = if self.is_punct("(") {
                    self.parenthesized()
                } else {
                    Vec::new()
                };
                let body = self.nested_statement();
                Some(Stmt::Other { exprs, body })
            }
            Some("else" | "do" | "try" | "finally") => {
                self.bump();
                let body = self.nested_statement();
                Some(Stmt::Other {
                    exprs: Vec::new(),
                    body,
                })
            }
            Some("break" | "continue") => {
                self.bump();
                if !self.peek().newline_before && self.peek().ident().is_some() {
                    self.bump();
                }
                self.eat_punct(";");
                None
            }
            Some("throw" | "case") => {
                self.bump();
                let value = self.expression();
                self.eat_punct(":");
                self.eat_punct(";");
                Some(Stmt::Expr(value))
            }
            Some("default") if next.is_punct(":") => {
                self.bump();
                self.bump();
                None
            }
            _ => {
                let value = self.expression();
                self.eat_punct(";");
                Some(Stmt::Expr(value))
            }
        }
    }

    fn export_statement(&mut self, doc: Option<String>) -> Option<Stmt> {
        let next = self.peek_at(1);
        if next.is_punct("{")
            || next.is_punct("*")
            || (next.is_ident("type") && self.peek_at(2).is_punct("{"))
        {
            self.skip_module_clause();
            return None;
        }

        self.bump(); // export
        if self.is_keyword("default") {
            self.bump();
            let value = self.assignment();
            self.eat_punct(";");
            return Some(Stmt::Expr(value));
        }
        if self.is_keyword("declare") {
            self.bump();
        }
        if matches!(self.peek().ident(), Some("const" | "let" | "var")) {
            if self.peek_at(1).is_ident("enum") {
                self.skip_declaration_block();
                return None;
            }
            return Some(Stmt::Var(self.var_decl(true, doc)));
        }
        self.statement()
    }

    fn var_decl(&mut self, exported: bool, doc: Option<String>) -> VarDecl {
        self.bump(); // const / let / var
        let mut declarators = Vec::new();
        let mut doc = doc;

        loop {
            let decl_doc = doc.take().or_else(|| self.peek().doc());
            let name = match self.peek().ident() {
                Some(name) => {
                    let name = name.to_owned();
                    self.bump();
                    Some(name)
                }
                None if self.is_punct("{") || self.is_punct("[") => {
                    self.skip_balanced();
                    None
                }
                None => break,
            };
            self.eat_punct("!");
            if self.eat_punct(":") {
                self.skip_type(&[]);
            }
            let init = if self.eat_punct("=") {
                Some(self.assignment())
            } else {
                None
            };
            declarators.push(Declarator {
                name,
                doc: decl_doc,
                init,
            });
            if !self.eat_punct(",") {
                break;
            }
        }

        self.eat_punct(";");
        VarDecl {
            exported,
            declarators,
        }
    }

    /// `( ... )` head of a control-flow statement
    fn parenthesized(&mut self) -> Vec<Expr> {
        self.bump();
        let mut exprs = Vec::new();
        while !self.at_eof() && !self.is_punct(")") {
            let start = self.pos;
            if matches!(self.peek().ident(), Some("const" | "let" | "var")) {
                self.bump();
            }
            let expr = self.expression();
            self.eat_punct(";");
            if self.pos == start {
                self.bump();
            } else {
                exprs.push(expr);
            }
        }
        self.eat_punct(")");
        exprs
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expression(&mut self) -> Expr {
        let first = self.assignment();
        if !self.is_punct(",") {
            return first;
        }
        let mut items = vec![first];
        while self.eat_punct(",") {
            let start = self.pos;
            let item = self.assignment();
            if self.pos == start {
                break;
            }
            items.push(item);
        }
        Expr::Other(items)
    }

    fn assignment(&mut self) -> Expr {
        if !self.enter() {
            self.skip_expression();
            return Expr::Other(Vec::new());
        }
        let expr = if self.at_arrow() {
            self.arrow()
        } else {
            self.assignment_expression()
        };
        self.leave();
        expr
    }

    fn assignment_expression(&mut self) -> Expr {
        let target = self.conditional();
        match self.peek().punct() {
            Some(op) if ASSIGN_OPS.contains(&op) => {
                self.bump();
                let value = self.assignment();
                Expr::Other(vec![target, value])
            }
            _ => target,
        }
    }

    fn conditional(&mut self) -> Expr {
        let test = self.binary();
        if !self.eat_punct("?") {
            return test;
        }
        let consequent = self.assignment();
        self.eat_punct(":");
        let alternate = self.assignment();
        Expr::Other(vec![test, consequent, alternate])
    }

    fn binary(&mut self) -> Expr {
        let first = self.unary();
        let mut operands = Vec::new();
        loop {
            let is_operator = match self.peek().punct() {
                Some(p) => BINARY_OPS.contains(&p),
                None => self.is_keyword("instanceof") || self.is_keyword("in"),
            };
            if !is_operator {
                break;
            }
            self.bump();
            let start = self.pos;
            let rhs = self.unary();
            if self.pos == start {
                break;
            }
            operands.push(rhs);
        }
        if operands.is_empty() {
            first
        } else {
            operands.insert(0, first);
            Expr::Other(operands)
        }
    }

    fn at_prefix_operator(&self) -> bool {
        let is_prefix = match self.peek().punct() {
            Some(p) => UNARY_OPS.contains(&p),
            None => matches!(
                self.peek().ident(),
                Some("typeof" | "void" | "delete" | "await" | "new" | "yield")
            ),
        };
        is_prefix && !self.peek_at(1).is_punct("=>")
    }

    /// Any run of prefix operators wraps its operand once
    fn unary(&mut self) -> Expr {
        if !self.at_prefix_operator() {
            return self.postfix();
        }
        while self.at_prefix_operator() {
            self.bump();
        }
        Expr::Other(vec![self.postfix()])
    }

    /// Member, call and index links. Each link counts as one level of
    /// nesting; past the limit the chain so far collapses to an opaque node.
    fn postfix(&mut self) -> Expr {
        let outer = self.depth;
        let mut expr = self.primary();
        loop {
            if self.depth >= MAX_DEPTH && self.depth > outer {
                expr = Expr::Other(Vec::new());
                self.depth = outer;
            }
            let token = self.peek();
            let same_line = !token.newline_before;

            if token.is_punct(".") || token.is_punct("?.") {
                let optional = token.is_punct("?.");
                let next = self.peek_at(1);
                if optional && next.is_punct("(") {
                    self.bump();
                    let args = self.arguments();
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                } else if optional && next.is_punct("[") {
                    self.bump();
                    let index = self.index();
                    expr = Expr::Other(vec![expr, index]);
                } else if let Some(property) = next.ident().map(str::to_owned) {
                    self.bump();
                    self.bump();
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                    };
                } else {
                    break;
                }
            } else if token.is_punct("(") {
                let args = self.arguments();
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else if token.is_punct("[") {
                let index = self.index();
                expr = Expr::Other(vec![expr, index]);
            } else if let TokenKind::Template(text) = &token.kind {
                // tagged template
                let text = text.clone();
                self.bump();
                expr = Expr::Other(vec![expr, Expr::Template(text)]);
            } else if token.is_punct("<")
                && same_line
                && matches!(expr, Expr::Ident(_) | Expr::Member { .. })
                && self.type_arguments_before_call(self.pos)
            {
                // explicit type arguments: `$type<Meta>()`, `new Map<K, V>()`
                self.skip_angle();
                continue;
            } else if token.is_punct("!") && same_line {
                // non-null assertion
                self.bump();
                continue;
            } else if (token.is_ident("as") || token.is_ident("satisfies")) && same_line {
                self.bump();
                self.skip_type(&["?", ":"]);
                continue;
            } else if (token.is_punct("++") || token.is_punct("--")) && same_line {
                self.bump();
                continue;
            } else {
                break;
            }
            self.depth += 1;
        }
        self.depth = outer;
        expr
    }

    /// Whether the `<` at `start` opens type arguments whose closing `>`
    /// is directly followed by `(`
    fn type_arguments_before_call(&self, start: usize) -> bool {
        let mut depth = 0isize;
        for (i, token) in self.tokens.iter().enumerate().skip(start) {
            match token.kind {
                TokenKind::Punct(p) if p.chars().all(|c| c == '<') => depth += p.len() as isize,
                TokenKind::Punct(p) if p.chars().all(|c| c == '>') => {
                    depth -= p.len() as isize;
                    if depth <= 0 {
                        return depth == 0 && self.token_at(i + 1).is_punct("(");
                    }
                }
                TokenKind::Punct(
                    ";" | "=" | "==" | "===" | "!=" | "!==" | "&&" | "||" | "??" | ">=" | "<=",
                ) => return false,
                TokenKind::Eof => return false,
                _ => {}
            }
        }
        false
    }

    fn primary(&mut self) -> Expr {
        if let Some(p) = self.peek().punct() {
            return match p {
                "(" => {
                    self.bump();
                    let inner = self.expression();
                    self.eat_punct(")");
                    inner
                }
                "[" => self.array(),
                "{" => self.object(),
                "<" => {
                    // `<T>value` assertion or generic arrow
                    self.skip_angle();
                    self.assignment()
                }
                _ => Expr::Other(Vec::new()),
            };
        }

        let kind = self.peek().kind.clone();
        match kind {
            TokenKind::Ident(word) => match word.as_str() {
                "function" => self.function_expr(),
                "async" if self.peek_at(1).is_ident("function") => {
                    self.bump();
                    self.function_expr()
                }
                "class" => {
                    self.skip_declaration_block();
                    Expr::Other(Vec::new())
                }
                _ => {
                    self.bump();
                    Expr::Ident(word)
                }
            },
            TokenKind::Str(value) => {
                self.bump();
                Expr::Str(value)
            }
            TokenKind::Number(value) => {
                self.bump();
                Expr::Number(value)
            }
            TokenKind::Template(text) => {
                self.bump();
                Expr::Template(text)
            }
            TokenKind::Regex(_) => {
                self.bump();
                Expr::Other(Vec::new())
            }
            TokenKind::Punct(_) | TokenKind::Eof => Expr::Other(Vec::new()),
        }
    }

    fn arguments(&mut self) -> Vec<Expr> {
        self.bump(); // (
        let mut args = Vec::new();
        while !self.at_eof() && !self.is_punct(")") {
            if self.eat_punct(",") {
                continue;
            }
            let start = self.pos;
            let arg = self.assignment();
            if self.pos == start {
                self.bump();
            } else {
                args.push(arg);
            }
        }
        self.eat_punct(")");
        args
    }

    fn index(&mut self) -> Expr {
        self.bump(); // [
        let inner = self.expression();
        while !self.at_eof() && !self.is_punct("]") {
            self.bump();
        }
        self.eat_punct("]");
        inner
    }

    fn array(&mut self) -> Expr {
        self.bump(); // [
        let mut items = Vec::new();
        while !self.at_eof() && !self.is_punct("]") {
            if self.eat_punct(",") {
                continue;
            }
            let start = self.pos;
            let item = self.assignment();
            if self.pos == start {
                self.bump();
            } else {
                items.push(item);
            }
        }
        self.eat_punct("]");
        Expr::Array(items)
    }

    fn object(&mut self) -> Expr {
        self.bump(); // {
        let mut props = Vec::new();
        while !self.at_eof() && !self.is_punct("}") {
            let start = self.pos;
            if let Some(prop) = self.property() {
                props.push(prop);
            }
            if !self.eat_punct(",") && self.pos == start {
                self.bump();
            }
        }
        self.eat_punct("}");
        Expr::Object(props)
    }

    fn starts_property_name(&self, n: usize) -> bool {
        let token = self.peek_at(n);
        matches!(
            token.kind,
            TokenKind::Ident(_) | TokenKind::Str(_) | TokenKind::Number(_)
        ) || token.is_punct("[")
            || token.is_punct("*")
    }

    fn property(&mut self) -> Option<Property> {
        let doc = self.peek().doc();

        if self.eat_punct("...") {
            let value = self.assignment();
            return Some(Property {
                key: None,
                value,
                doc,
            });
        }

        if matches!(self.peek().ident(), Some("get" | "set" | "async")) && self.starts_property_name(1)
        {
            self.bump();
        }
        self.eat_punct("*");

        let key = match self.peek().kind.clone() {
            TokenKind::Ident(key) | TokenKind::Str(key) | TokenKind::Number(key) => {
                self.bump();
                Some(key)
            }
            TokenKind::Punct("[") => {
                self.skip_balanced();
                None
            }
            _ => return None,
        };
        self.eat_punct("?");

        let value = if self.eat_punct(":") {
            self.assignment()
        } else if self.is_punct("(") || self.is_punct("<") {
            // method shorthand
            if self.is_punct("<") {
                self.skip_angle();
            }
            self.skip_balanced();
            if self.eat_punct(":") {
                self.skip_type(&["{"]);
            }
            Expr::Function(self.block())
        } else if self.eat_punct("=") {
            self.assignment()
        } else {
            key.clone()
                .map_or_else(|| Expr::Other(Vec::new()), Expr::Ident)
        };

        Some(Property { key, value, doc })
    }

    fn function_expr(&mut self) -> Expr {
        self.bump(); // function
        self.eat_punct("*");
        if self.peek().ident().is_some() {
            self.bump();
        }
        if self.is_punct("<") {
            self.skip_angle();
        }
        if self.is_punct("(") {
            self.skip_balanced();
        }
        if self.eat_punct(":") {
            self.skip_type(&["{"]);
        }
        Expr::Function(self.block())
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    fn at_arrow(&self) -> bool {
        let mut offset = 0;
        let next = self.peek_at(1);
        if self.is_keyword("async")
            && !next.newline_before
            && (next.ident().is_some() || next.is_punct("("))
        {
            offset = 1;
        }

        let token = self.peek_at(offset);
        if token.ident().is_some() {
            return self.peek_at(offset + 1).is_punct("=>");
        }
        if !token.is_punct("(") {
            return false;
        }

        match self.matching_close(self.pos + offset) {
            Some(close) => {
                let after = self.token_at(close + 1);
                after.is_punct("=>")
                    || (after.is_punct(":") && self.return_type_then_arrow(close + 2))
            }
            None => false,
        }
    }

    /// Whether the tokens from `start` form a return type followed by `=>`
    fn return_type_then_arrow(&self, start: usize) -> bool {
        let mut depth = 0isize;
        for token in self.tokens.iter().skip(start) {
            match token.kind {
                TokenKind::Punct("=>") if depth <= 0 => return true,
                TokenKind::Punct("(" | "[" | "{") => depth += 1,
                TokenKind::Punct(")" | "]" | "}") => {
                    if depth <= 0 {
                        return false;
                    }
                    depth -= 1;
                }
                TokenKind::Punct("," | ";" | "=") if depth <= 0 => return false,
                TokenKind::Punct(p) if p.chars().all(|c| c == '<') => depth += p.len() as isize,
                TokenKind::Punct(p) if p.chars().all(|c| c == '>') => depth -= p.len() as isize,
                TokenKind::Eof => return false,
                _ => {}
            }
        }
        false
    }

    fn arrow(&mut self) -> Expr {
        if self.is_keyword("async") && !self.peek_at(1).is_punct("=>") {
            self.bump();
        }
        if self.peek().ident().is_some() {
            self.bump();
        } else {
            self.skip_balanced();
        }
        if self.eat_punct(":") {
            self.skip_type(&["=>"]);
        }
        self.eat_punct("=>");

        let body = if self.is_punct("{") {
            ArrowBody::Block(self.block())
        } else {
            ArrowBody::Expr(self.assignment())
        };
        Expr::Arrow(Box::new(ArrowFunction { body }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::property;

    fn single_init(source: &str) -> Expr {
        let module = parse_module(source).unwrap();
        match module.body.into_iter().next() {
            Some(Stmt::Var(mut decl)) => decl.declarators.remove(0).init.unwrap(),
            other => panic!("expected a declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_exported_declaration_with_doc() {
        let module = parse_module("/** Users */\nexport const users = pgTable('users', {});").unwrap();
        let decls = module.declarations();
        assert_eq!(decls.len(), 1);
        assert!(decls[0].exported);
        let decl = &decls[0].declarators[0];
        assert_eq!(decl.name.as_deref(), Some("users"));
        assert_eq!(decl.doc.as_deref(), Some("Users"));
    }

    #[test]
    fn test_call_with_object_argument() {
        let init = single_init("const t = pgTable('users', { id: serial('id').primaryKey() });");
        let (callee, args) = init.as_call().unwrap();
        assert_eq!(callee.as_ident(), Some("pgTable"));
        assert_eq!(args[0].as_str(), Some("users"));
        let props = args[1].as_object().unwrap();
        assert_eq!(props[0].key.as_deref(), Some("id"));
        let (callee, _) = props[0].value.as_call().unwrap();
        assert_eq!(callee.callee_name(), Some("primaryKey"));
    }

    #[test]
    fn test_property_doc_comments() {
        let init = single_init("const o = {\n  /** The id */\n  id: 1,\n  // plain\n  name: 2,\n};");
        let props = init.as_object().unwrap();
        assert_eq!(props[0].doc.as_deref(), Some("The id"));
        assert_eq!(props[1].doc, None);
    }

    #[test]
    fn test_arrow_returning_object() {
        let init = single_init("const r = relations(users, ({ one, many }) => ({ posts: many(posts) }));");
        let (_, args) = init.as_call().unwrap();
        let props = args[1].object_or_returned().unwrap();
        assert!(property(props, "posts").is_some());
    }

    #[test]
    fn test_arrow_block_body_return() {
        let init = single_init("const f = (t) => { const x = 1; return { a: x }; };");
        assert_eq!(init.object_or_returned().map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_typed_arrow_params_and_return_type() {
        let init = single_init("const f = (t: Table<'x'>): { a: number } => ({ a: 1 });");
        assert!(init.object_or_returned().is_some());
    }

    #[test]
    fn test_type_annotation_and_satisfies() {
        let init = single_init("const x: Record<string, number> = { a: 1 } satisfies Foo;");
        assert!(init.as_object().is_some());
    }

    #[test]
    fn test_skips_types_interfaces_and_imports() {
        let source = r#"
            import { pgTable, serial } from 'drizzle-orm/pg-core';
            import type { X } from './x';
            type Row = { id: number; name: string };
            interface Foo<T> { bar(): T }
            enum Color { Red, Green }
            export const a = 1;
        "#;
        let module = parse_module(source).unwrap();
        let decls = module.declarations();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].declarators[0].name.as_deref(), Some("a"));
    }

    #[test]
    fn test_member_chain() {
        let init = single_init("const c = t.varchar('email', { length: 255 }).notNull().unique();");
        let (callee, _) = init.as_call().unwrap();
        assert_eq!(callee.callee_name(), Some("unique"));
    }

    #[test]
    fn test_multiple_declarators() {
        let module = parse_module("const a = 1, b = 2;").unwrap();
        let decls = module.declarations();
        let names: Vec<_> = decls[0]
            .declarators
            .iter()
            .map(|d| d.name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn test_walk_reaches_nested_calls() {
        let module = parse_module("function setup() { if (x) { register(relations(a, () => ({}))); } }").unwrap();
        let mut callees = Vec::new();
        module.walk(&mut |expr: &Expr| {
            if let Some((callee, _)) = expr.as_call() {
                callees.extend(callee.callee_name().map(str::to_owned));
            }
        });
        assert_eq!(callees, vec!["register", "relations"]);
    }

    #[test]
    fn test_malformed_input_terminates() {
        let sources = [
            "const = = = ;",
            ")))]]]}}}",
            "export const x = pgTable('t', { a: ",
            "const f = (a, b => ",
            "class { } } { ( [",
            "a ? b : : c ? ?",
        ];
        for source in sources {
            assert!(parse_module(source).is_ok(), "{source}");
        }
    }

    #[test]
    fn test_lex_error_is_reported() {
        assert!(parse_module("const x = 'unterminated").is_err());
    }

    #[test]
    fn test_explicit_type_arguments_on_calls() {
        let init = single_init("const c = jsonb('meta').$type<Record<string, Array<number>>>().notNull();");
        let (callee, args) = init.as_call().unwrap();
        assert_eq!(callee.callee_name(), Some("notNull"));
        assert!(args.is_empty());

        let init = single_init("const m = new Map<string, number>();");
        assert!(matches!(init, Expr::Other(_)));

        let init = single_init("const b = a < b && c > (d);");
        assert!(matches!(init, Expr::Other(ref items) if items.len() == 4));
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        const DEPTH: usize = 10_000;
        let sources = [
            format!("const x = {}1{};", "(".repeat(DEPTH), ")".repeat(DEPTH)),
            format!("const x = {}{};", "[".repeat(DEPTH), "]".repeat(DEPTH)),
            format!("const x = {}1{};", "{ a: ".repeat(DEPTH), " }".repeat(DEPTH)),
            format!("const x = a{};", ".b".repeat(DEPTH)),
            format!("const x = f{};", "()".repeat(DEPTH)),
            format!("const x = {}y;", "!".repeat(DEPTH)),
            format!("const x = {}1;", "a => ".repeat(DEPTH)),
            format!("{}{}", "{".repeat(DEPTH), "}".repeat(DEPTH)),
            format!("{}x;", "if (a) ".repeat(DEPTH)),
        ];
        for source in &sources {
            let source = format!("{source}\nconst after = pgTable('after', {{}});");
            let module = parse_module(&source).unwrap();
            let mut calls = 0;
            module.walk(&mut |expr: &Expr| calls += usize::from(expr.as_call().is_some()));
            let names: Vec<_> = module
                .declarations()
                .into_iter()
                .flat_map(|d| &d.declarators)
                .filter_map(|d| d.name.as_deref())
                .collect();
            assert_eq!(names.last(), Some(&"after"), "{}", &source[..40]);
            assert!(calls >= 1);
        }
    }
}
