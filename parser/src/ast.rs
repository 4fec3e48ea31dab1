//! Syntax tree for the subset of TypeScript that schema files use
//!
//! Only shapes the extractors look at are modelled precisely: variable
//! declarations, calls, member access, object and array literals, arrow
//! functions and string literals. Every other construct collapses into
//! [`Expr::Other`] / [`Stmt::Other`] which still hold their children so a
//! full walk reaches nested calls.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Var(VarDecl),
    Expr(Expr),
    Return(Option<Expr>),
    Block(Vec<Stmt>),
    /// Control flow and other untracked statements
    Other { exprs: Vec<Expr>, body: Vec<Stmt> },
}

/// `const` / `let` / `var` statement
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub exported: bool,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    /// `None` for destructuring patterns
    pub name: Option<String>,
    /// Doc comment attached to the declaration
    pub doc: Option<String>,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Number(String),
    Template(String),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Object(Vec<Property>),
    Array(Vec<Expr>),
    Arrow(Box<ArrowFunction>),
    Function(Vec<Stmt>),
    Other(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// `None` for spreads and computed keys
    pub key: Option<String>,
    pub value: Expr,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub body: ArrowBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Expr),
    Block(Vec<Stmt>),
}

// =============================================================================
// Accessors
// =============================================================================

impl Expr {
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<(&Expr, &[Expr])> {
        match self {
            Self::Call { callee, args } => Some((callee, args)),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[Property]> {
        match self {
            Self::Object(props) => Some(props),
            _ => None,
        }
    }

    /// Name a callee is known by: `foo` for `foo(..)`, `bar` for `x.bar(..)`
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            Self::Ident(name) => Some(name),
            Self::Member { property, .. } => Some(property),
            _ => None,
        }
    }

    /// `users.id` → `id`, `id` → `id`
    pub fn member_name(&self) -> Option<&str> {
        self.callee_name()
    }

    /// Object literal an expression evaluates to directly, or through an
    /// arrow function that returns one
    pub fn object_or_returned(&self) -> Option<&[Property]> {
        match self {
            Self::Object(props) => Some(props),
            Self::Arrow(arrow) => arrow.returned_object(),
            _ => None,
        }
    }
}

impl ArrowFunction {
    /// Object literal returned by the arrow, either as its expression body
    /// or from a top-level `return` in its block body
    pub fn returned_object(&self) -> Option<&[Property]> {
        match &self.body {
            ArrowBody::Expr(expr) => expr.as_object(),
            ArrowBody::Block(stmts) => stmts.iter().find_map(|stmt| match stmt {
                Stmt::Return(Some(Expr::Object(props))) => Some(props.as_slice()),
                _ => None,
            }),
        }
    }
}

/// Value of the property named `key`
pub fn property<'a>(props: &'a [Property], key: &str) -> Option<&'a Expr> {
    props
        .iter()
        .find(|p| p.key.as_deref() == Some(key))
        .map(|p| &p.value)
}

// =============================================================================
// Traversal
// =============================================================================

/// Nodes nested deeper than this are not visited
const MAX_WALK_DEPTH: usize = 1024;

impl Expr {
    /// Pre-order walk over this expression and everything nested in it,
    /// down to a fixed depth
    pub fn walk<'a, F: FnMut(&'a Expr)>(&'a self, f: &mut F) {
        self.walk_at(0, f);
    }

    fn walk_at<'a, F: FnMut(&'a Expr)>(&'a self, depth: usize, f: &mut F) {
        if depth > MAX_WALK_DEPTH {
            return;
        }
        f(self);
        let depth = depth + 1;
        match self {
            Self::Member { object, .. } => object.walk_at(depth, f),
            Self::Call { callee, args } => {
                callee.walk_at(depth, f);
                for arg in args {
                    arg.walk_at(depth, f);
                }
            }
            Self::Object(props) => {
                for prop in props {
                    prop.value.walk_at(depth, f);
                }
            }
            Self::Array(items) | Self::Other(items) => {
                for item in items {
                    item.walk_at(depth, f);
                }
            }
            Self::Arrow(arrow) => match &arrow.body {
                ArrowBody::Expr(expr) => expr.walk_at(depth, f),
                ArrowBody::Block(stmts) => walk_statements_at(stmts, depth, f),
            },
            Self::Function(body) => walk_statements_at(body, depth, f),
            Self::Ident(_) | Self::Str(_) | Self::Number(_) | Self::Template(_) => {}
        }
    }
}

/// Walk every expression reachable from `stmts`
pub fn walk_statements<'a, F: FnMut(&'a Expr)>(stmts: &'a [Stmt], f: &mut F) {
    walk_statements_at(stmts, 0, f);
}

fn walk_statements_at<'a, F: FnMut(&'a Expr)>(stmts: &'a [Stmt], depth: usize, f: &mut F) {
    if depth > MAX_WALK_DEPTH {
        return;
    }
    for stmt in stmts {
        match stmt {
            Stmt::Var(decl) => {
                for init in decl.declarators.iter().filter_map(|d| d.init.as_ref()) {
                    init.walk_at(depth, f);
                }
            }
            Stmt::Expr(expr) | Stmt::Return(Some(expr)) => expr.walk_at(depth, f),
            Stmt::Return(None) => {}
            Stmt::Block(body) => walk_statements_at(body, depth + 1, f),
            Stmt::Other { exprs, body } => {
                for expr in exprs {
                    expr.walk_at(depth, f);
                }
                walk_statements_at(body, depth + 1, f);
            }
        }
    }
}

impl Module {
    /// Every expression in the module, pre-order
    pub fn walk<'a, F: FnMut(&'a Expr)>(&'a self, f: &mut F) {
        walk_statements(&self.body, f);
    }

    /// Variable declarations at statement level, including those nested in
    /// blocks and control flow (but not inside function bodies)
    pub fn declarations(&self) -> Vec<&VarDecl> {
        fn collect<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a VarDecl>) {
            for stmt in stmts {
                match stmt {
                    Stmt::Var(decl) => out.push(decl),
                    Stmt::Block(body) | Stmt::Other { body, .. } => collect(body, out),
                    Stmt::Expr(_) | Stmt::Return(_) => {}
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.body, &mut out);
        out
    }
}
