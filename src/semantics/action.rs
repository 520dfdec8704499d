use std::fmt;
use std::rc::Rc;

use crate::error::CompositionError;
use crate::rules::Rule;
use crate::semantics::value::SemanticValue;
use crate::syntree::{Bindings, Variable};

type ActionFn = dyn Fn(&Scope<'_>, Vec<SemanticValue>) -> Result<SemanticValue, CompositionError>;

/// What an action can see of the rule application it runs for
pub struct Scope<'a> {
  rule: &'a Rule,
  bindings: &'a Bindings,
  words: Vec<&'a str>,
}

impl<'a> Scope<'a> {
  pub fn new(rule: &'a Rule, bindings: &'a Bindings, words: Vec<&'a str>) -> Self {
    Self {
      rule,
      bindings,
      words,
    }
  }

  pub fn rule(&self) -> &Rule {
    self.rule
  }

  /// The entity a rule variable is bound to
  pub fn variable(&self, name: &str) -> Result<Variable, CompositionError> {
    self
      .bindings
      .get(name)
      .copied()
      .ok_or_else(|| CompositionError::UnboundVariable(name.to_string()))
  }

  /// Same as `variable`, as a semantic value
  pub fn var(&self, name: &str) -> Result<SemanticValue, CompositionError> {
    self.variable(name).map(SemanticValue::var)
  }

  /// Tokens matched by this rule's own literals, left to right
  pub fn words(&self) -> &[&'a str] {
    &self.words
  }
}

/// A rule's semantic action: a function from the semantic values of the rule's
/// non-literal children, in order, to the value of the rule itself
#[derive(Clone)]
pub struct SemanticAction {
  arity: usize,
  f: Rc<ActionFn>,
}

impl SemanticAction {
  pub fn new<F>(arity: usize, f: F) -> Self
  where
    F: Fn(&Scope<'_>, Vec<SemanticValue>) -> Result<SemanticValue, CompositionError> + 'static,
  {
    Self { arity, f: Rc::new(f) }
  }

  pub fn arity(&self) -> usize {
    self.arity
  }

  pub fn call(
    &self,
    scope: &Scope<'_>,
    args: Vec<SemanticValue>,
  ) -> Result<SemanticValue, CompositionError> {
    if args.len() != self.arity {
      return Err(CompositionError::ActionArity {
        rule: scope.rule().to_string(),
        expected: self.arity,
        found: args.len(),
      });
    }
    (self.f)(scope, args)
  }
}

impl fmt::Debug for SemanticAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SemanticAction/{}", self.arity)
  }
}

fn destructure<const N: usize>(
  args: Vec<SemanticValue>,
) -> Result<[SemanticValue; N], CompositionError> {
  args
    .try_into()
    .map_err(|args: Vec<SemanticValue>| CompositionError::Action(format!(
      "expected {} arguments, got {}",
      N,
      args.len()
    )))
}

pub fn action0<F>(f: F) -> SemanticAction
where
  F: Fn(&Scope<'_>) -> Result<SemanticValue, CompositionError> + 'static,
{
  SemanticAction::new(0, move |scope, _| f(scope))
}

pub fn action1<F>(f: F) -> SemanticAction
where
  F: Fn(&Scope<'_>, SemanticValue) -> Result<SemanticValue, CompositionError> + 'static,
{
  SemanticAction::new(1, move |scope, args| {
    let [a] = destructure(args)?;
    f(scope, a)
  })
}

pub fn action2<F>(f: F) -> SemanticAction
where
  F: Fn(&Scope<'_>, SemanticValue, SemanticValue) -> Result<SemanticValue, CompositionError>
    + 'static,
{
  SemanticAction::new(2, move |scope, args| {
    let [a, b] = destructure(args)?;
    f(scope, a, b)
  })
}

pub fn action3<F>(f: F) -> SemanticAction
where
  F: Fn(
      &Scope<'_>,
      SemanticValue,
      SemanticValue,
      SemanticValue,
    ) -> Result<SemanticValue, CompositionError>
    + 'static,
{
  SemanticAction::new(3, move |scope, args| {
    let [a, b, c] = destructure(args)?;
    f(scope, a, b, c)
  })
}
