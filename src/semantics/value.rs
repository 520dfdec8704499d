use std::fmt;
use std::rc::Rc;

use crate::error::ExecutionError;
use crate::semantics::template::Template;
use crate::syntree::Variable;

/// A constant inside a semantic value
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
  Int(i64),
  Float(f64),
  Str(String),
  Var(Variable),
}

impl Atom {
  fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Int(i) => Some(*i as f64),
      Self::Float(f) => Some(*f),
      _ => None,
    }
  }

  fn numeric(&self, op: &'static str) -> Result<(), ExecutionError> {
    match self {
      Self::Int(_) | Self::Float(_) => Ok(()),
      other => Err(ExecutionError::TypeMismatch {
        op,
        value: other.to_string(),
      }),
    }
  }

  /// Integer arithmetic when both sides are integers, float otherwise
  fn arith(
    &self,
    other: &Atom,
    op: &'static str,
    int: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
  ) -> Result<Atom, ExecutionError> {
    self.numeric(op)?;
    other.numeric(op)?;
    match (self, other) {
      (Self::Int(a), Self::Int(b)) => int(*a, *b)
        .map(Atom::Int)
        .ok_or(ExecutionError::Overflow(op)),
      _ => match (self.as_f64(), other.as_f64()) {
        (Some(a), Some(b)) => Ok(Atom::Float(float(a, b))),
        _ => Err(ExecutionError::TypeMismatch {
          op,
          value: format!("{} and {}", self, other),
        }),
      },
    }
  }

  pub fn add(&self, other: &Atom) -> Result<Atom, ExecutionError> {
    self.arith(other, "addition", i64::checked_add, |a, b| a + b)
  }

  pub fn sub(&self, other: &Atom) -> Result<Atom, ExecutionError> {
    self.arith(other, "subtraction", i64::checked_sub, |a, b| a - b)
  }

  pub fn mul(&self, other: &Atom) -> Result<Atom, ExecutionError> {
    self.arith(other, "multiplication", i64::checked_mul, |a, b| a * b)
  }

  /// Exact integer quotients stay integers; anything else becomes a float
  pub fn div(&self, other: &Atom) -> Result<Atom, ExecutionError> {
    self.numeric("division")?;
    other.numeric("division")?;
    if other.as_f64() == Some(0.0) {
      return Err(ExecutionError::DivisionByZero);
    }
    match (self, other) {
      (Self::Int(a), Self::Int(b)) if a.checked_rem(*b) == Some(0) => a
        .checked_div(*b)
        .map(Atom::Int)
        .ok_or(ExecutionError::Overflow("division")),
      _ => match (self.as_f64(), other.as_f64()) {
        (Some(a), Some(b)) => Ok(Atom::Float(a / b)),
        _ => Err(ExecutionError::TypeMismatch {
          op: "division",
          value: format!("{} and {}", self, other),
        }),
      },
    }
  }
}

impl fmt::Display for Atom {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Int(i) => write!(f, "{}", i),
      Self::Float(x) => write!(f, "{}", x),
      Self::Str(s) => write!(f, "{}", s),
      Self::Var(v) => write!(f, "{}", v),
    }
  }
}

/// An aggregate of semantic values. Lists are flat conjunctions: a list nested
/// in a list is spliced into it.
#[derive(Debug, Clone)]
pub enum Composite {
  Tuple(Vec<SemanticValue>),
  List(Vec<SemanticValue>),
}

type ThunkFn = dyn Fn() -> Result<SemanticValue, ExecutionError>;

/// A deferred, side-effect-free computation, only run when executed
#[derive(Clone)]
pub struct Thunk(Rc<ThunkFn>);

impl Thunk {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn() -> Result<SemanticValue, ExecutionError> + 'static,
  {
    Self(Rc::new(f))
  }

  /// Runs the computation once. The result may itself hold further thunks.
  pub fn call(&self) -> Result<SemanticValue, ExecutionError> {
    (self.0)()
  }
}

impl fmt::Debug for Thunk {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Thunk")
  }
}

/// What a rule's action produces, and what actions consume
#[derive(Debug, Clone)]
pub enum SemanticValue {
  Atom(Atom),
  Composite(Composite),
  Thunk(Thunk),
  Template(Template),
  /// A named hole in a template body
  Slot(String),
}

impl SemanticValue {
  pub fn int(i: i64) -> Self {
    Self::Atom(Atom::Int(i))
  }

  pub fn float(x: f64) -> Self {
    Self::Atom(Atom::Float(x))
  }

  pub fn str(s: impl Into<String>) -> Self {
    Self::Atom(Atom::Str(s.into()))
  }

  pub fn var(v: Variable) -> Self {
    Self::Atom(Atom::Var(v))
  }

  pub fn slot(name: impl Into<String>) -> Self {
    Self::Slot(name.into())
  }

  pub fn tuple(items: impl IntoIterator<Item = SemanticValue>) -> Self {
    Self::Composite(Composite::Tuple(items.into_iter().collect()))
  }

  /// Builds a list, splicing in the items of any nested lists
  pub fn list(items: impl IntoIterator<Item = SemanticValue>) -> Self {
    let mut flat = Vec::new();
    for item in items {
      match item {
        Self::Composite(Composite::List(inner)) => flat.extend(inner),
        other => flat.push(other),
      }
    }
    Self::Composite(Composite::List(flat))
  }

  /// A predicate tuple, `name(args...)`
  pub fn predicate(name: &str, args: impl IntoIterator<Item = SemanticValue>) -> Self {
    Self::tuple(std::iter::once(Self::str(name)).chain(args))
  }

  pub fn thunk<F>(f: F) -> Self
  where
    F: Fn() -> Result<SemanticValue, ExecutionError> + 'static,
  {
    Self::Thunk(Thunk::new(f))
  }

  pub fn is_template(&self) -> bool {
    matches!(self, Self::Template(_))
  }

  /// Short description for error messages
  pub fn describe(&self) -> String {
    match self {
      Self::Atom(a) => format!("atom {}", a),
      Self::Composite(Composite::Tuple(_)) => "a tuple".to_string(),
      Self::Composite(Composite::List(_)) => "a list".to_string(),
      Self::Thunk(_) => "a thunk".to_string(),
      Self::Template(t) => format!("template {}", t),
      Self::Slot(s) => format!("placeholder ?{}", s),
    }
  }
}

impl From<Atom> for SemanticValue {
  fn from(a: Atom) -> Self {
    Self::Atom(a)
  }
}

impl From<Template> for SemanticValue {
  fn from(t: Template) -> Self {
    Self::Template(t)
  }
}

/// Tuples headed by a string print as predicates: `flows(x1, x2)`
fn fmt_tuple<T: fmt::Display>(
  f: &mut fmt::Formatter<'_>,
  head: Option<&str>,
  items: &[T],
) -> fmt::Result {
  let args = if head.is_some() { &items[1..] } else { items };
  write!(f, "{}(", head.unwrap_or(""))?;
  for (idx, item) in args.iter().enumerate() {
    if idx > 0 {
      write!(f, ", ")?;
    }
    write!(f, "{}", item)?;
  }
  write!(f, ")")
}

fn fmt_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
  write!(f, "[")?;
  for (idx, item) in items.iter().enumerate() {
    if idx > 0 {
      write!(f, ", ")?;
    }
    write!(f, "{}", item)?;
  }
  write!(f, "]")
}

impl fmt::Display for SemanticValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Atom(a) => write!(f, "{}", a),
      Self::Composite(Composite::Tuple(items)) => {
        let head = match items.first() {
          Some(Self::Atom(Atom::Str(s))) => Some(s.as_str()),
          _ => None,
        };
        fmt_tuple(f, head, items)
      }
      Self::Composite(Composite::List(items)) => fmt_list(f, items),
      Self::Thunk(_) => write!(f, "<thunk>"),
      Self::Template(t) => write!(f, "{}", t),
      Self::Slot(s) => write!(f, "?{}", s),
    }
  }
}

/// A fully executed value: no thunks, templates or placeholders left
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Atom(Atom),
  Tuple(Vec<Value>),
  List(Vec<Value>),
}

impl Value {
  pub fn as_atom(&self) -> Option<&Atom> {
    match self {
      Self::Atom(a) => Some(a),
      _ => None,
    }
  }

  pub fn into_atom(self) -> Result<Atom, ExecutionError> {
    match self {
      Self::Atom(a) => Ok(a),
      other => Err(ExecutionError::TypeMismatch {
        op: "atom access",
        value: other.to_string(),
      }),
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      Self::Atom(Atom::Int(i)) => Some(*i),
      _ => None,
    }
  }

  pub fn as_f64(&self) -> Option<f64> {
    self.as_atom().and_then(Atom::as_f64)
  }

  pub fn items(&self) -> &[Value] {
    match self {
      Self::Tuple(items) | Self::List(items) => items,
      Self::Atom(_) => &[],
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Atom(a) => write!(f, "{}", a),
      Self::Tuple(items) => {
        let head = match items.first() {
          Some(Self::Atom(Atom::Str(s))) => Some(s.as_str()),
          _ => None,
        };
        fmt_tuple(f, head, items)
      }
      Self::List(items) => fmt_list(f, items),
    }
  }
}
