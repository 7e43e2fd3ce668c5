//! Built-in global functions of the script sandbox.
//!
//! | name        | behaviour                                             |
//! |-------------|-------------------------------------------------------|
//! | `later(v)`  | promise fulfilled with `v` after one scheduler turn   |
//! | `reject(m)` | promise rejected with `m` after one scheduler turn    |
//! | `fail(m)`   | throws `Error: m`                                     |
//! | `keys(o)`   | property names of an object, array or host object     |
//! | `len(x)`    | length of a string, array or object                   |
//! | `str(x)`    | display string of any value                           |
//! | `type(x)`   | `typeof`-style type name                              |

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use evalconsole_foundation::{Error, Function, Promise, Result, Value};

use crate::convert::to_display_string;
use crate::interpreter::{Interpreter, Native, NativeFn};

/// Names and implementations of all built-ins.
const BUILTINS: &[(&str, NativeFn)] = &[
    ("later", later),
    ("reject", reject),
    ("fail", fail),
    ("keys", keys),
    ("len", len),
    ("str", display),
    ("type", type_of),
];

/// Defines every built-in as a global of `interp`.
pub fn install(interp: &Interpreter) {
    for (name, func) in BUILTINS {
        interp.define(name, Value::Function(Function::new(Native::new(name, *func))));
    }
}

/// Returns the names of all built-ins.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn later(args: &[Value]) -> Result<Value> {
    let value = arg(args, 0);
    Ok(Value::Promise(Promise::new(async move {
        YieldNow::default().await;
        Ok(value)
    })))
}

fn reject(args: &[Value]) -> Result<Value> {
    let reason: Rc<str> = Rc::from(to_display_string(&arg(args, 0)));
    Ok(Value::Promise(Promise::new(async move {
        YieldNow::default().await;
        Err(reason)
    })))
}

fn fail(args: &[Value]) -> Result<Value> {
    Err(Error::eval(to_display_string(&arg(args, 0))))
}

fn keys(args: &[Value]) -> Result<Value> {
    let names: Vec<Value> = match arg(args, 0) {
        Value::Object(object) => object.keys().into_iter().map(Value::String).collect(),
        Value::Array(array) => (0..array.len()).map(|i| Value::from(i.to_string())).collect(),
        Value::Host(host) => host
            .property_names()
            .map_err(|e| Error::type_error(e.to_string()))?
            .into_iter()
            .map(Value::from)
            .collect(),
        other => {
            return Err(Error::type_error(format!(
                "keys() expects an object, got {}",
                other.type_name()
            )));
        }
    };
    Ok(Value::from(names))
}

fn len(args: &[Value]) -> Result<Value> {
    let n = match arg(args, 0) {
        Value::String(s) => s.chars().count(),
        Value::Array(array) => array.len(),
        Value::Object(object) => object.len(),
        other => {
            return Err(Error::type_error(format!(
                "len() expects a string, array or object, got {}",
                other.type_name()
            )));
        }
    };
    #[allow(clippy::cast_precision_loss)]
    let n = n as f64;
    Ok(Value::Number(n))
}

fn display(args: &[Value]) -> Result<Value> {
    Ok(Value::from(to_display_string(&arg(args, 0))))
}

fn type_of(args: &[Value]) -> Result<Value> {
    Ok(Value::from(arg(args, 0).type_name()))
}

/// A future that is pending exactly once before completing.
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
