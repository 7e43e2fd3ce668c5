//! Abstract syntax tree for the sandbox script language.

use std::rc::Rc;

/// A top-level statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `let name = expr` (also `var` and `const`). Completes with `undefined`.
    Declare(String, Expr),
    /// An expression statement. Completes with the expression's value.
    Expr(Expr),
}

/// An expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Number literal.
    Number(f64),
    /// String literal.
    Str(String),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
    /// Variable reference.
    Ident(String),
    /// Array literal.
    Array(Vec<Expr>),
    /// Object literal; keys in source order.
    Object(Vec<(String, Expr)>),
    /// Property access `target.name`.
    Member(Box<Expr>, String),
    /// Computed access `target[index]`.
    Index(Box<Expr>, Box<Expr>),
    /// Call `callee(args...)`.
    Call(Box<Expr>, Vec<Expr>),
    /// Prefix operator.
    Unary(UnaryOp, Box<Expr>),
    /// Infix arithmetic or comparison.
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Short-circuiting `&&` / `||`.
    Logical(LogicalOp, Box<Expr>, Box<Expr>),
    /// Assignment to a variable, member or index.
    Assign(Box<Expr>, Box<Expr>),
    /// Arrow function.
    Arrow(Rc<ArrowDef>),
}

/// Definition of an arrow function.
#[derive(Debug, PartialEq)]
pub struct ArrowDef {
    /// Parameter names.
    pub params: Vec<String>,
    /// Body expression.
    pub body: Expr,
    /// Literal source text of the whole function.
    pub source: String,
}

/// Prefix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

/// Infix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// Short-circuiting operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    /// `&&`
    And,
    /// `||`
    Or,
}

impl Expr {
    /// Returns a short name for the expression, used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(name) => name.clone(),
            Self::Member(target, name) => format!("{}.{name}", target.describe()),
            Self::Index(target, _) => format!("{}[...]", target.describe()),
            Self::Call(callee, _) => format!("{}(...)", callee.describe()),
            _ => "expression".to_string(),
        }
    }
}
