use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::error::CompositionError;
use crate::semantics::value::{Composite, SemanticValue};

type NativeFn = dyn Fn(Vec<SemanticValue>) -> Result<SemanticValue, CompositionError>;

#[derive(Clone)]
pub enum TemplateBody {
  /// A value with `Slot`s standing in for the parameters
  Form(Box<SemanticValue>),
  /// Called with exactly one value per parameter, in order
  Native(Rc<NativeFn>),
}

/// A semantic form waiting for more arguments. Applying a value fills the leading
/// open parameter; once every parameter is filled the template reduces to its body.
#[derive(Clone)]
pub struct Template {
  params: Vec<String>,
  args: Vec<SemanticValue>,
  body: TemplateBody,
}

impl Template {
  /// A template whose body is an expression over its parameters. Every free slot in
  /// `body` must name a parameter.
  pub fn form(params: &[&str], body: SemanticValue) -> Result<Self, CompositionError> {
    let params = Self::check_params(params)?;

    let mut free = Vec::new();
    free_slots(&body, &HashSet::new(), &mut free);
    if let Some(unknown) = free.into_iter().find(|s| !params.contains(s)) {
      return Err(CompositionError::UnknownPlaceholder(unknown));
    }

    Ok(Self {
      params,
      args: Vec::new(),
      body: TemplateBody::Form(Box::new(body)),
    })
  }

  /// A template computed by a native function once it is saturated
  pub fn native<F>(params: &[&str], f: F) -> Result<Self, CompositionError>
  where
    F: Fn(Vec<SemanticValue>) -> Result<SemanticValue, CompositionError> + 'static,
  {
    Ok(Self {
      params: Self::check_params(params)?,
      args: Vec::new(),
      body: TemplateBody::Native(Rc::new(f)),
    })
  }

  fn check_params(params: &[&str]) -> Result<Vec<String>, CompositionError> {
    let mut seen = HashSet::new();
    for p in params {
      if !seen.insert(*p) {
        return Err(CompositionError::DuplicatePlaceholder(p.to_string()));
      }
    }
    Ok(params.iter().map(|p| p.to_string()).collect())
  }

  pub fn params(&self) -> &[String] {
    &self.params
  }

  /// Parameters not yet filled, leading one first
  pub fn remaining(&self) -> &[String] {
    &self.params[self.args.len()..]
  }

  fn is_saturated(&self) -> bool {
    self.args.len() == self.params.len()
  }

  /// Substitutes the collected arguments into the body
  fn reduce(self) -> Result<SemanticValue, CompositionError> {
    match self.body {
      TemplateBody::Form(body) => {
        let env = self
          .params
          .iter()
          .cloned()
          .zip(self.args)
          .collect::<HashMap<_, _>>();
        Ok(substitute(&body, &env))
      }
      TemplateBody::Native(f) => {
        if self.args.len() != self.params.len() {
          return Err(CompositionError::TemplateArity {
            expected: self.params.len(),
            found: self.args.len(),
          });
        }
        f(self.args)
      }
    }
  }
}

impl fmt::Debug for Template {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Template")
      .field("params", &self.params)
      .field("args", &self.args)
      .finish_non_exhaustive()
  }
}

impl fmt::Display for Template {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "\\{}.", self.remaining().join(" "))?;
    match &self.body {
      TemplateBody::Form(body) => write!(f, " {}", body),
      TemplateBody::Native(_) => write!(f, " <native>"),
    }
  }
}

/// Applies `args` to `f` one at a time. Each argument fills the leading open parameter
/// of a template; a template left with no open parameters reduces to its body, which
/// may itself be a template that takes the remaining arguments.
///
/// Because arguments are consumed one by one, `apply(apply(t, [a]), [b])` and
/// `apply(t, [a, b])` always agree.
pub fn apply<I>(f: &SemanticValue, args: I) -> Result<SemanticValue, CompositionError>
where
  I: IntoIterator<Item = SemanticValue>,
{
  let mut current = saturate(f.clone())?;
  for arg in args {
    current = match current {
      SemanticValue::Template(mut t) => {
        t.args.push(arg);
        saturate(SemanticValue::Template(t))?
      }
      other => return Err(CompositionError::NotATemplate(other.describe())),
    };
  }
  Ok(current)
}

/// Reduces a template with no open parameters, repeatedly
fn saturate(value: SemanticValue) -> Result<SemanticValue, CompositionError> {
  let mut value = value;
  loop {
    match value {
      SemanticValue::Template(t) if t.is_saturated() => value = t.reduce()?,
      other => return Ok(other),
    }
  }
}

fn free_slots(value: &SemanticValue, bound: &HashSet<String>, out: &mut Vec<String>) {
  match value {
    SemanticValue::Slot(name) => {
      if !bound.contains(name) {
        out.push(name.clone());
      }
    }
    SemanticValue::Composite(Composite::Tuple(items))
    | SemanticValue::Composite(Composite::List(items)) => {
      for item in items {
        free_slots(item, bound, out);
      }
    }
    SemanticValue::Template(t) => {
      for arg in t.args.iter() {
        free_slots(arg, bound, out);
      }
      if let TemplateBody::Form(body) = &t.body {
        let mut inner = bound.clone();
        inner.extend(t.params.iter().cloned());
        free_slots(body, &inner, out);
      }
    }
    SemanticValue::Atom(_) | SemanticValue::Thunk(_) => {}
  }
}

/// Replaces slots named in `env`. A nested template's own parameters shadow `env`.
fn substitute(value: &SemanticValue, env: &HashMap<String, SemanticValue>) -> SemanticValue {
  match value {
    SemanticValue::Slot(name) => env.get(name).cloned().unwrap_or_else(|| value.clone()),
    SemanticValue::Composite(Composite::Tuple(items)) => {
      SemanticValue::tuple(items.iter().map(|i| substitute(i, env)))
    }
    SemanticValue::Composite(Composite::List(items)) => {
      SemanticValue::list(items.iter().map(|i| substitute(i, env)))
    }
    SemanticValue::Template(t) => {
      let body = match &t.body {
        TemplateBody::Form(body) => {
          let mut inner = env.clone();
          for p in t.params.iter() {
            inner.remove(p);
          }
          TemplateBody::Form(Box::new(substitute(body, &inner)))
        }
        native => native.clone(),
      };
      SemanticValue::Template(Template {
        params: t.params.clone(),
        args: t.args.iter().map(|a| substitute(a, env)).collect(),
        body,
      })
    }
    SemanticValue::Atom(_) | SemanticValue::Thunk(_) => value.clone(),
  }
}
