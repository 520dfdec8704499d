use thiserror::Error;

/// Boxed static error type
pub type Err = Box<dyn std::error::Error + 'static>;

/// Raised while compiling rule specifications into a `Grammar`. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
  #[error("malformed rule `{rule}`: {message}")]
  Syntax { rule: String, message: String },

  #[error("empty ruleset")]
  Empty,

  #[error("rule `{rule}` has no right-hand side")]
  EmptyRule { rule: String },

  #[error("nonterminal `{name}` used with {found} arguments, but elsewhere with {expected}")]
  InconsistentArity {
    name: String,
    expected: usize,
    found: usize,
  },

  #[error("variable `{variable}` is bound more than once in `{symbol}` of rule `{rule}`")]
  MultiplyBound {
    rule: String,
    symbol: String,
    variable: String,
  },

  #[error("action of rule `{rule}` takes {found} arguments, but the rule has {expected} non-literal symbols")]
  ActionArity {
    rule: String,
    expected: usize,
    found: usize,
  },
}

/// Raised while composing one derivation. Scoped to that derivation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionError {
  #[error("action of rule `{rule}` expects {expected} arguments, got {found}")]
  ActionArity {
    rule: String,
    expected: usize,
    found: usize,
  },

  #[error("rule `{rule}` has no action and {children} non-literal children; can only pass through exactly one")]
  PassThrough { rule: String, children: usize },

  #[error("cannot apply arguments to {0}, which is not a template")]
  NotATemplate(String),

  #[error("template body refers to unknown placeholder `{0}`")]
  UnknownPlaceholder(String),

  #[error("template placeholder `{0}` is declared twice")]
  DuplicatePlaceholder(String),

  #[error("native template body expects {expected} arguments, got {found}")]
  TemplateArity { expected: usize, found: usize },

  #[error("variable `{0}` is not bound in this rule application")]
  UnboundVariable(String),

  #[error("{0}")]
  Action(String),
}

/// Raised while forcing a composed value. Scoped to one derivation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
  #[error("division by zero")]
  DivisionByZero,

  #[error("arithmetic overflow in {0}")]
  Overflow(&'static str),

  #[error("{op} is not defined for {value}")]
  TypeMismatch { op: &'static str, value: String },

  #[error("unresolved template {0} reached execution")]
  UnresolvedTemplate(String),

  #[error("unresolved placeholder `{0}` reached execution")]
  UnresolvedPlaceholder(String),

  #[error("{0}")]
  Thunk(String),
}

/// A failure attributed to one alternative of a processor's output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
  #[error("derivation {derivation}: {source}")]
  Composition {
    derivation: usize,
    #[source]
    source: CompositionError,
  },

  #[error("derivation {derivation}: {source}")]
  Execution {
    derivation: usize,
    #[source]
    source: ExecutionError,
  },
}

impl ProcessError {
  pub fn derivation(&self) -> usize {
    match self {
      Self::Composition { derivation, .. } | Self::Execution { derivation, .. } => *derivation,
    }
  }
}
