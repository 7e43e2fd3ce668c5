//! Tree-walking interpreter for the sandbox script language.
//!
//! One [`Interpreter`] owns one global scope. Arrow functions capture the
//! scope they were created in; calling one evaluates its body in a child
//! scope holding the parameters.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use evalconsole_foundation::{Array, Callable, Error, Function, Object, Result, Value};
use tracing::trace;

use crate::ast::{ArrowDef, BinaryOp, Expr, LogicalOp, Stmt, UnaryOp};
use crate::convert::{
    array_index, loose_equals, to_display_string, to_index, to_number, to_property_key,
};
use crate::parser::parse;

/// Maximum nesting of function calls before a `RangeError` is raised.
pub const MAX_CALL_DEPTH: usize = 128;

/// A lexical scope.
#[derive(Default)]
struct Scope {
    vars: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    fn child(parent: &Rc<Scope>, bindings: HashMap<String, Value>) -> Rc<Self> {
        Rc::new(Self {
            vars: RefCell::new(bindings),
            parent: Some(Rc::clone(parent)),
        })
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.vars.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Updates an existing binding. Returns false if `name` is unbound.
    fn assign(&self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.vars.borrow_mut().get_mut(name) {
            *slot = value;
            return true;
        }
        self.parent
            .as_ref()
            .is_some_and(|p| p.assign(name, value))
    }

    fn declare(&self, name: &str, value: Value) {
        self.vars.borrow_mut().insert(name.to_string(), value);
    }
}

/// A script function: an arrow definition plus its captured scope.
pub struct Closure {
    def: Rc<ArrowDef>,
    scope: Rc<Scope>,
}

impl Callable for Closure {
    fn source(&self) -> &str {
        &self.def.source
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Signature of a built-in function.
pub type NativeFn = fn(&[Value]) -> Result<Value>;

/// A built-in function implemented in Rust.
pub struct Native {
    func: NativeFn,
    source: String,
}

impl Native {
    /// Creates a built-in with the given script-visible name.
    #[must_use]
    pub fn new(name: &str, func: NativeFn) -> Self {
        Self {
            func,
            source: format!("function {name}() {{ [native code] }}"),
        }
    }
}

impl Callable for Native {
    fn source(&self) -> &str {
        &self.source
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Evaluates parsed scripts against a single global scope.
#[derive(Default)]
pub struct Interpreter {
    globals: Rc<Scope>,
    depth: Cell<usize>,
}

impl Interpreter {
    /// Creates an interpreter with an empty global scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines or replaces a global.
    pub fn define(&self, name: &str, value: Value) {
        self.globals.declare(name, value);
    }

    /// Looks up a global.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.lookup(name)
    }

    /// Parses and runs `source`, returning the value of the last statement.
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` for unparsable source, or the error the
    /// script raised.
    pub fn run(&self, source: &str) -> Result<Value> {
        let stmts = parse(source)?;
        trace!(statements = stmts.len(), "running script");

        let mut completion = Value::Undefined;
        for stmt in &stmts {
            completion = match stmt {
                Stmt::Declare(name, init) => {
                    let value = self.eval(init, &self.globals)?;
                    self.globals.declare(name, value);
                    Value::Undefined
                }
                Stmt::Expr(expr) => self.eval(expr, &self.globals)?,
            };
        }
        Ok(completion)
    }

    /// Calls a function value with arguments.
    ///
    /// # Errors
    ///
    /// Returns a `TypeError` if `callee` is not callable, a `RangeError`
    /// when calls nest too deeply, or the error the function raised.
    pub fn call(&self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        let Value::Function(function) = callee else {
            return Err(Error::type_error(format!(
                "{} is not a function",
                to_display_string(callee)
            )));
        };

        if let Some(native) = function.downcast_ref::<Native>() {
            return (native.func)(&args);
        }
        let Some(closure) = function.downcast_ref::<Closure>() else {
            return Err(Error::type_error("function belongs to another sandbox"));
        };

        if self.depth.get() >= MAX_CALL_DEPTH {
            return Err(Error::eval_named(
                "RangeError",
                "Maximum call stack size exceeded",
            ));
        }

        let mut args = args.into_iter();
        let bindings = closure
            .def
            .params
            .iter()
            .map(|param| (param.clone(), args.next().unwrap_or_default()))
            .collect();
        let scope = Scope::child(&closure.scope, bindings);

        self.depth.set(self.depth.get() + 1);
        let result = self.eval(&closure.def.body, &scope);
        self.depth.set(self.depth.get() - 1);
        result
    }

    fn eval(&self, expr: &Expr, scope: &Rc<Scope>) -> Result<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::string(s)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Undefined => Ok(Value::Undefined),
            Expr::Ident(name) => scope.lookup(name).ok_or_else(|| Error::reference(name)),
            Expr::Array(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(item, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(Array::from_vec(values)))
            }
            Expr::Object(props) => {
                let object = Object::new();
                for (key, value) in props {
                    object.set(key, self.eval(value, scope)?);
                }
                Ok(Value::Object(object))
            }
            Expr::Member(target, name) => {
                let target = self.eval(target, scope)?;
                get_property(&target, name)
            }
            Expr::Index(target, index) => {
                let target = self.eval(target, scope)?;
                let key = to_property_key(&self.eval(index, scope)?);
                get_property(&target, &key)
            }
            Expr::Call(callee, args) => {
                let function = self.eval(callee, scope)?;
                if !matches!(function, Value::Function(_)) {
                    return Err(Error::type_error(format!(
                        "{} is not a function",
                        callee.describe()
                    )));
                }
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, scope))
                    .collect::<Result<Vec<_>>>()?;
                self.call(&function, args)
            }
            Expr::Unary(op, operand) => {
                let value = self.eval(operand, scope)?;
                Ok(match op {
                    UnaryOp::Neg => Value::Number(-to_number(&value)),
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                })
            }
            Expr::Binary(op, left, right) => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                Ok(binary(*op, &left, &right))
            }
            Expr::Logical(op, left, right) => {
                let left = self.eval(left, scope)?;
                match (op, left.is_truthy()) {
                    (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(left),
                    _ => self.eval(right, scope),
                }
            }
            Expr::Assign(target, value) => self.assign(target, value, scope),
            Expr::Arrow(def) => Ok(Value::Function(Function::new(Closure {
                def: Rc::clone(def),
                scope: Rc::clone(scope),
            }))),
        }
    }

    fn assign(&self, target: &Expr, value: &Expr, scope: &Rc<Scope>) -> Result<Value> {
        match target {
            Expr::Ident(name) => {
                let value = self.eval(value, scope)?;
                if !scope.assign(name, value.clone()) {
                    self.globals.declare(name, value.clone());
                }
                Ok(value)
            }
            Expr::Member(object, name) => {
                let object = self.eval(object, scope)?;
                let value = self.eval(value, scope)?;
                set_property(&object, name, value.clone())?;
                Ok(value)
            }
            Expr::Index(object, index) => {
                let object = self.eval(object, scope)?;
                let key = self.eval(index, scope)?;
                let value = self.eval(value, scope)?;
                set_indexed(&object, &key, value.clone())?;
                Ok(value)
            }
            _ => Err(Error::syntax("invalid left-hand side in assignment")),
        }
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(to_number(left) - to_number(right)),
        BinaryOp::Mul => Value::Number(to_number(left) * to_number(right)),
        BinaryOp::Div => Value::Number(to_number(left) / to_number(right)),
        BinaryOp::Rem => Value::Number(to_number(left) % to_number(right)),
        BinaryOp::Eq => Value::Bool(loose_equals(left, right)),
        BinaryOp::NotEq => Value::Bool(!loose_equals(left, right)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            Value::Bool(compare(op, left, right))
        }
    }
}

fn add(left: &Value, right: &Value) -> Value {
    let numeric = |v: &Value| {
        matches!(
            v,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_)
        )
    };
    if numeric(left) && numeric(right) {
        Value::Number(to_number(left) + to_number(right))
    } else {
        Value::from(to_display_string(left) + &to_display_string(right))
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> bool {
    let ordering = if let (Value::String(a), Value::String(b)) = (left, right) {
        Some(a.cmp(b))
    } else {
        to_number(left).partial_cmp(&to_number(right))
    };
    ordering.is_some_and(|ord| match op {
        BinaryOp::Lt => ord.is_lt(),
        BinaryOp::Le => ord.is_le(),
        BinaryOp::Gt => ord.is_gt(),
        _ => ord.is_ge(),
    })
}

/// Reads a property the way member access does.
///
/// # Errors
///
/// Returns a `TypeError` when reading from `undefined`/`null` or when a host
/// object refuses the read.
pub fn get_property(target: &Value, name: &str) -> Result<Value> {
    match target {
        Value::Undefined | Value::Null => Err(Error::type_error(format!(
            "Cannot read properties of {} (reading '{name}')",
            to_display_string(target)
        ))),
        Value::Object(object) => Ok(object.get(name).unwrap_or_default()),
        Value::Array(array) if name == "length" => Ok(Value::from(len_value(array.len()))),
        Value::Array(array) => Ok(array_index(name)
            .and_then(|i| array.get(i))
            .unwrap_or_default()),
        Value::String(s) if name == "length" => Ok(Value::from(len_value(s.chars().count()))),
        Value::String(s) => Ok(array_index(name)
            .and_then(|i| s.chars().nth(i))
            .map(|c| Value::from(c.to_string()))
            .unwrap_or_default()),
        Value::Host(host) => host
            .get(name)
            .map_err(|e| Error::type_error(e.to_string())),
        _ => Ok(Value::Undefined),
    }
}

fn set_property(target: &Value, name: &str, value: Value) -> Result<()> {
    match target {
        Value::Undefined | Value::Null => Err(Error::type_error(format!(
            "Cannot set properties of {} (setting '{name}')",
            to_display_string(target)
        ))),
        Value::Object(object) => {
            object.set(name, value);
            Ok(())
        }
        Value::Array(array) => match array_index(name) {
            Some(index) => array.set(index, value),
            None => Err(Error::type_error(format!(
                "Cannot set property '{name}' of an array"
            ))),
        },
        Value::Host(host) => Err(Error::type_error(format!(
            "Cannot assign to '{name}' of [object {}]",
            host.class_name()
        ))),
        _ => Ok(()),
    }
}

fn set_indexed(target: &Value, key: &Value, value: Value) -> Result<()> {
    match (target, to_index(key)) {
        (Value::Array(array), Some(index)) => array.set(index, value),
        _ => set_property(target, &to_property_key(key), value),
    }
}

#[allow(clippy::cast_precision_loss)]
fn len_value(len: usize) -> f64 {
    len as f64
}
