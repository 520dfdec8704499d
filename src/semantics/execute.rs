use crate::error::ExecutionError;
use crate::semantics::value::{Composite, SemanticValue, Value};

impl SemanticValue {
  /// Forces every thunk in this value, innermost first, down to a concrete `Value`.
  /// A template or placeholder that was never filled can't be executed.
  pub fn force(&self) -> Result<Value, ExecutionError> {
    execute(self)
  }
}

pub fn execute(value: &SemanticValue) -> Result<Value, ExecutionError> {
  match value {
    SemanticValue::Atom(a) => Ok(Value::Atom(a.clone())),
    SemanticValue::Composite(Composite::Tuple(items)) => Ok(Value::Tuple(
      items.iter().map(execute).collect::<Result<Vec<_>, _>>()?,
    )),
    SemanticValue::Composite(Composite::List(items)) => Ok(Value::List(
      items.iter().map(execute).collect::<Result<Vec<_>, _>>()?,
    )),
    SemanticValue::Thunk(t) => execute(&t.call()?),
    SemanticValue::Template(t) => Err(ExecutionError::UnresolvedTemplate(t.to_string())),
    SemanticValue::Slot(name) => Err(ExecutionError::UnresolvedPlaceholder(name.clone())),
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;
  use std::rc::Rc;

  use super::*;
  use crate::semantics::Template;

  #[test]
  fn test_thunks_are_lazy() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let thunk = SemanticValue::thunk(move || {
      counter.set(counter.get() + 1);
      Ok(SemanticValue::int(2))
    });
    let value = SemanticValue::tuple(vec![SemanticValue::str("two"), thunk]);

    assert_eq!(calls.get(), 0);
    assert_eq!(value.force().unwrap().to_string(), "two(2)");
    assert_eq!(calls.get(), 1);
  }

  #[test]
  fn test_nested_thunks() {
    let inner = SemanticValue::thunk(|| Ok(SemanticValue::int(4)));
    let outer = SemanticValue::thunk(move || Ok(inner.clone()));
    assert_eq!(outer.force(), Ok(Value::Atom(crate::semantics::Atom::Int(4))));
  }

  #[test]
  fn test_division_by_zero_only_when_forced() {
    let quotient = SemanticValue::thunk(|| {
      let a = SemanticValue::int(1).force()?.into_atom()?;
      let b = SemanticValue::int(0).force()?.into_atom()?;
      Ok(a.div(&b)?.into())
    });

    // building the value is fine
    let value = SemanticValue::list(vec![quotient]);
    assert_eq!(value.force(), Err(ExecutionError::DivisionByZero));
  }

  #[test]
  fn test_unresolved() {
    let t: SemanticValue = Template::form(&["x"], SemanticValue::slot("x")).unwrap().into();
    assert!(matches!(t.force(), Err(ExecutionError::UnresolvedTemplate(_))));
    assert_eq!(
      SemanticValue::slot("x").force(),
      Err(ExecutionError::UnresolvedPlaceholder("x".into()))
    );
  }
}
