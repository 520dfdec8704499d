//! Small grammars showing the three ways this crate gets used: bare syntax, semantics
//! that compute something, and semantics that build a logical form.

use crate::error::{CompositionError, ExecutionError, GrammarError};
use crate::grammar::{Grammar, RuleSpec};
use crate::semantics::{
  action0, action1, action2, action3, apply, Atom, Scope, SemanticValue, Template,
};

pub const SYNTAX_SRC: &str = r#"
// sentences about john and mary
s -> np vp
vp -> verb np
np -> noun
noun -> proper_noun
proper_noun -> 'john'
proper_noun -> 'mary'
verb -> 'loves'
"#;

/// Syntax only: every derivation is a bare tree
pub fn syntax() -> Result<Grammar, GrammarError> {
  SYNTAX_SRC.parse()
}

fn number(word: &str, n: i64) -> RuleSpec {
  RuleSpec::syn(format!("term -> '{}'", word)).sem(action0(move |_| {
    Ok(SemanticValue::thunk(move || Ok(SemanticValue::int(n))))
  }))
}

type BinaryOp = fn(&Atom, &Atom) -> Result<Atom, ExecutionError>;

/// An operator is a two-place template. Filling both places yields a thunk, so
/// nothing is computed until the executor forces it.
fn operator(words: &str, op: BinaryOp) -> RuleSpec {
  RuleSpec::syn(format!("operator -> {}", words)).sem(action0(move |_| {
    let template = Template::native(&["a", "b"], move |mut args| {
      let (Some(b), Some(a)) = (args.pop(), args.pop()) else {
        return Err(CompositionError::TemplateArity {
          expected: 2,
          found: args.len(),
        });
      };
      Ok(SemanticValue::thunk(move || {
        let a = a.force()?.into_atom()?;
        let b = b.force()?.into_atom()?;
        Ok(op(&a, &b)?.into())
      }))
    })?;
    Ok(template.into())
  }))
}

/// Spoken arithmetic over one to four: "what is three plus four",
/// "calculate three plus four times two". Operators have no precedence, so a
/// chain of them is ambiguous and every grouping is a separate derivation.
pub fn calculator() -> Result<Grammar, GrammarError> {
  Grammar::new(vec![
    RuleSpec::syn("s -> 'what' 'is' term"),
    RuleSpec::syn("s -> 'calculate' term").sem(action1(|_, term| {
      Ok(SemanticValue::thunk(move || Ok(term.clone())))
    })),
    RuleSpec::syn("term -> term operator term").sem(action3(|_, a, op, b| apply(&op, vec![a, b]))),
    operator("'plus'", Atom::add),
    operator("'minus'", Atom::sub),
    operator("'times'", Atom::mul),
    operator("'divided' 'by'", Atom::div),
    number("one", 1),
    number("two", 2),
    number("three", 3),
    number("four", 4),
  ])
}

/// `name(vars...)` over the rule's own variables, as a single-item conjunction
fn predicate(
  scope: &Scope<'_>,
  name: &str,
  vars: &[&str],
) -> Result<SemanticValue, CompositionError> {
  let args = vars
    .iter()
    .map(|v| scope.var(v))
    .collect::<Result<Vec<_>, _>>()?;
  Ok(SemanticValue::list(vec![SemanticValue::predicate(name, args)]))
}

/// Definite noun phrases as existential quantifiers: a determiner waits for a
/// restriction (the noun) and then a scope (what is said about it), and the
/// sentence's logical form is the conjunction of both.
pub fn rivers() -> Result<Grammar, GrammarError> {
  Grammar::new(vec![
    RuleSpec::syn("s(E1) -> np(E1) vp(E1)").sem(action2(|_, np, vp| apply(&np, vec![vp]))),
    RuleSpec::syn("np(E1) -> det(D1) nbar(E1)")
      .sem(action2(|_, det, nbar| apply(&det, vec![nbar]))),
    RuleSpec::syn("nbar(E1) -> noun(E1)"),
    RuleSpec::syn("vp(E1) -> verb(E1, E2) np(E2)")
      .sem(action2(|_, verb, np| apply(&np, vec![verb]))),
    RuleSpec::syn("det(E1) -> 'the'").sem(action0(|_| {
      let exists = Template::form(
        &["restriction", "scope"],
        SemanticValue::list(vec![
          SemanticValue::slot("restriction"),
          SemanticValue::slot("scope"),
        ]),
      )?;
      Ok(exists.into())
    })),
    RuleSpec::syn("noun(E1) -> 'river'").sem(action0(|scope| predicate(scope, "river", &["E1"]))),
    RuleSpec::syn("noun(E1) -> 'sea'").sem(action0(|scope| predicate(scope, "sea", &["E1"]))),
    RuleSpec::syn("verb(E1, E2) -> 'flows' 'to'")
      .sem(action0(|scope| predicate(scope, "flows", &["E1", "E2"]))),
  ])
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::semantics::compose;

  #[test]
  fn test_sample_grammars_compile() {
    assert_eq!(syntax().unwrap().start, "s");
    assert_eq!(calculator().unwrap().rules_for("operator").len(), 4);
    assert_eq!(rivers().unwrap().arity("verb"), Some(2));
  }

  #[test]
  fn test_division_by_zero_is_per_derivation() {
    let g = calculator().unwrap();
    let results = g
      .parse_words(&["what", "is", "four", "divided", "by", "two", "minus", "two"])
      .iter()
      .map(|tree| compose(&tree).unwrap().force().map(|v| v.as_int()))
      .collect::<Vec<_>>();

    assert_eq!(results.len(), 2);
    assert!(results.contains(&Ok(Some(0))));
    assert!(results.contains(&Err(ExecutionError::DivisionByZero)));
  }

  #[test]
  fn test_rivers_logical_form() {
    let g = rivers().unwrap();
    let trees = g
      .parse_words(&["the", "river", "flows", "to", "the", "sea"])
      .iter()
      .collect::<Vec<_>>();
    assert_eq!(trees.len(), 1);
    assert_eq!(
      compose(&trees[0]).unwrap().to_string(),
      "[river(x1), sea(x3), flows(x1, x3)]"
    );
  }
}
