//! The value model shared between sandboxes and the console.
//!
//! A sandbox hands results back as a [`Value`], a closed tagged union, so the
//! console classifies results with a single `match` instead of probing types.
//! Composite values are reference-counted handles with interior mutability:
//! scripts may build self-referential graphs, and identity (not structure) is
//! what the stringifier's cycle guard compares.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture, Shared};

use crate::error::{Error, Result};

/// How many elements past its end one assignment may grow an [`Array`].
pub const MAX_ARRAY_GROWTH: usize = 1 << 20;

/// A value produced by sandbox evaluation.
///
/// Scalars are stored inline; composites are cheap clonable handles that
/// share one underlying allocation.
#[derive(Clone, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    Undefined,
    /// The null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Double precision number.
    Number(f64),
    /// String value.
    String(Rc<str>),
    /// Mutable array.
    Array(Array),
    /// Mutable plain object.
    Object(Object),
    /// Callable value carrying its source text.
    Function(Function),
    /// Object owned by the host, read through fallible property access.
    Host(HostRef),
    /// Deferred value that settles later.
    Promise(Promise),
}

/// Identity of a composite value, used for cycle detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
    fn of<T: ?Sized>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc).cast::<()>() as usize)
    }
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Rc::from(s.as_ref()))
    }

    /// Returns the script-level type name (`typeof`-style) of this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Function(_) => "function",
            Self::Null | Self::Array(_) | Self::Object(_) | Self::Host(_) | Self::Promise(_) => {
                "object"
            }
        }
    }

    /// Returns the identity of a composite value, or `None` for scalars.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Self::Array(a) => Some(a.identity()),
            Self::Object(o) => Some(o.identity()),
            Self::Function(f) => Some(f.identity()),
            Self::Host(h) => Some(h.identity()),
            _ => None,
        }
    }

    /// Returns true if this value is `undefined`.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns true if this value is truthy.
    ///
    /// `undefined`, `null`, `false`, `0`, `NaN` and `""` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Attempts to extract a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "Undefined"),
            Self::Null => write!(f, "Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Array(a) => write!(f, "Array(len={})", a.len()),
            Self::Object(o) => write!(f, "Object(keys={:?})", o.keys()),
            Self::Function(func) => write!(f, "Function({:?})", func.source()),
            Self::Host(h) => write!(f, "Host({})", h.class_name()),
            Self::Promise(p) => {
                if p.peek().is_some() {
                    write!(f, "Promise(settled)")
                } else {
                    write!(f, "Promise(pending)")
                }
            }
        }
    }
}

impl PartialEq for Value {
    /// Scalars compare by value, composites by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Promise(a), Self::Promise(b)) => a.ptr_eq(b),
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Rc::from(s))
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Self::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(Array::from_vec(v.into_iter().map(Into::into).collect()))
    }
}

// =============================================================================
// Array
// =============================================================================

/// A shared, mutable array.
#[derive(Clone, Default)]
pub struct Array(Rc<RefCell<Vec<Value>>>);

impl Array {
    /// Creates an empty array.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an array from elements.
    #[must_use]
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    /// Returns the identity of this array.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns true if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns the element at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Sets the element at `index`, padding with `undefined` as needed.
    ///
    /// # Errors
    ///
    /// Returns a `RangeError` if `index` lies more than
    /// [`MAX_ARRAY_GROWTH`] elements past the end; the array is unchanged.
    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        let mut items = self.0.borrow_mut();
        if index >= items.len() {
            let new_len = index
                .checked_add(1)
                .filter(|&n| n - items.len() <= MAX_ARRAY_GROWTH)
                .ok_or_else(|| Error::range("Invalid array length"))?;
            items.resize(new_len, Value::Undefined);
        }
        items[index] = value;
        Ok(())
    }

    /// Appends an element.
    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    /// Returns a snapshot of the elements.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }
}

// =============================================================================
// Object
// =============================================================================

/// A shared, mutable plain object. Keys keep insertion order.
#[derive(Clone, Default)]
pub struct Object(Rc<RefCell<Vec<(Rc<str>, Value)>>>);

impl Object {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object from key/value pairs. Later duplicates win.
    #[must_use]
    pub fn from_pairs<K: AsRef<str>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        let object = Self::new();
        for (key, value) in pairs {
            object.set(key.as_ref(), value);
        }
        object
    }

    /// Returns the identity of this object.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns true if the object has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns the value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v.clone())
    }

    /// Sets `key`, replacing an existing property in place.
    pub fn set(&self, key: &str, value: Value) {
        let mut props = self.0.borrow_mut();
        if let Some(slot) = props.iter_mut().find(|(k, _)| &**k == key) {
            slot.1 = value;
        } else {
            props.push((Rc::from(key), value));
        }
    }

    /// Returns the property names in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<Rc<str>> {
        self.0.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Returns a snapshot of the properties in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Rc<str>, Value)> {
        self.0.borrow().clone()
    }
}

// =============================================================================
// Function
// =============================================================================

/// Implemented by sandboxes for their callable values.
pub trait Callable {
    /// The literal source text of the function.
    fn source(&self) -> &str;

    /// Downcasting hook so a sandbox can recover its own function type.
    fn as_any(&self) -> &dyn Any;
}

/// A shared callable value.
#[derive(Clone)]
pub struct Function(Rc<dyn Callable>);

impl Function {
    /// Wraps a sandbox callable.
    pub fn new(callable: impl Callable + 'static) -> Self {
        Self(Rc::new(callable))
    }

    /// Returns the function's source text.
    #[must_use]
    pub fn source(&self) -> &str {
        self.0.source()
    }

    /// Returns the identity of this function.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Downcasts to a concrete callable type.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

// =============================================================================
// Host objects
// =============================================================================

/// An object owned by the host whose properties may fail to read.
pub trait HostObject {
    /// Class name used in the object's textual form, e.g. `Environment`.
    fn class_name(&self) -> &str;

    /// Enumerates the readable property names.
    ///
    /// # Errors
    ///
    /// Returns an error if the object refuses enumeration.
    fn property_names(&self) -> Result<Vec<String>>;

    /// Reads a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the property is protected or cannot be produced.
    fn get(&self, name: &str) -> Result<Value>;
}

/// A shared host object handle.
#[derive(Clone)]
pub struct HostRef(Rc<dyn HostObject>);

impl HostRef {
    /// Wraps a host object.
    pub fn new(object: impl HostObject + 'static) -> Self {
        Self(Rc::new(object))
    }

    /// Returns the identity of this host object.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Returns the class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.0.class_name()
    }

    /// Enumerates property names.
    ///
    /// # Errors
    ///
    /// Propagates the host object's enumeration failure.
    pub fn property_names(&self) -> Result<Vec<String>> {
        self.0.property_names()
    }

    /// Reads a property.
    ///
    /// # Errors
    ///
    /// Propagates the host object's access failure.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.0.get(name)
    }
}

impl From<HostRef> for Value {
    fn from(h: HostRef) -> Self {
        Self::Host(h)
    }
}

// =============================================================================
// Promise
// =============================================================================

/// How a promise settles: a value, or the textual reason it was rejected.
pub type PromiseOutcome = std::result::Result<Value, Rc<str>>;

/// A deferred value.
///
/// Clones share one underlying future, so a promise may be awaited from
/// several places and settles exactly once.
#[derive(Clone)]
pub struct Promise(Shared<LocalBoxFuture<'static, PromiseOutcome>>);

impl Promise {
    /// Wraps a future.
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = PromiseOutcome> + 'static,
    {
        Self(fut.boxed_local().shared())
    }

    /// Creates an already-fulfilled promise.
    #[must_use]
    pub fn resolved(value: Value) -> Self {
        Self::new(future::ready(Ok(value)))
    }

    /// Creates an already-rejected promise.
    #[must_use]
    pub fn rejected(reason: impl AsRef<str>) -> Self {
        Self::new(future::ready(Err(Rc::from(reason.as_ref()))))
    }

    /// Returns the outcome if the promise has already settled.
    #[must_use]
    pub fn peek(&self) -> Option<&PromiseOutcome> {
        self.0.peek()
    }

    /// Returns a future that settles with this promise.
    pub fn settled(&self) -> impl Future<Output = PromiseOutcome> + 'static {
        self.0.clone()
    }

    /// Returns true if both handles refer to the same promise.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Shared::ptr_eq(&self.0, &other.0)
    }
}

impl From<Promise> for Value {
    fn from(p: Promise) -> Self {
        Self::Promise(p)
    }
}
