use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::chart::{parse_chart, Chart};
use crate::error::{Err, GrammarError};
use crate::forest::Derivations;
use crate::parse_grammar::{parse_rule_syntax, parse_rules, RawRule};
use crate::rules::{Nonterminal, Rule};
use crate::semantics::SemanticAction;
use crate::token::Token;

/// One rule as the caller writes it: rule syntax, plus an optional semantic action
/// taking one argument per non-literal right-hand symbol
#[derive(Debug, Clone)]
pub struct RuleSpec {
  pub syntax: String,
  pub action: Option<SemanticAction>,
}

impl RuleSpec {
  pub fn syn(syntax: impl Into<String>) -> Self {
    Self {
      syntax: syntax.into(),
      action: None,
    }
  }

  pub fn sem(mut self, action: SemanticAction) -> Self {
    self.action = Some(action);
    self
  }
}

/// An immutable, validated set of rules. The first rule's head is the start symbol.
#[derive(Debug)]
pub struct Grammar {
  pub start: String,
  rules: Vec<Rc<Rule>>,
  by_name: HashMap<String, Vec<Rc<Rule>>>,
  arities: HashMap<String, usize>,
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "//** start: {}", self.start)?;
    for rule in self.rules.iter() {
      writeln!(f, "{}", rule)?;
    }
    Ok(())
  }
}

impl Grammar {
  /// Compiles rule specifications, failing on malformed syntax, a variable bound twice
  /// in one argument list, inconsistent nonterminal arity, or an action whose
  /// arity doesn't match its rule.
  pub fn new<I>(specs: I) -> Result<Self, GrammarError>
  where
    I: IntoIterator<Item = RuleSpec>,
  {
    let rules = specs
      .into_iter()
      .map(|spec| {
        let (lhs, rhs) = parse_rule_syntax(&spec.syntax).map_err(|message| GrammarError::Syntax {
          rule: spec.syntax.clone(),
          message,
        })?;
        Ok(Rule {
          lhs,
          rhs,
          action: spec.action,
        })
      })
      .collect::<Result<Vec<_>, GrammarError>>()?;

    Self::from_rules(rules)
  }

  fn from_raw(raw: Vec<RawRule>) -> Result<Self, GrammarError> {
    Self::from_rules(
      raw
        .into_iter()
        .map(|(lhs, rhs)| Rule {
          lhs,
          rhs,
          action: None,
        })
        .collect(),
    )
  }

  fn from_rules(rules: Vec<Rule>) -> Result<Self, GrammarError> {
    if rules.is_empty() {
      return Err(GrammarError::Empty);
    }

    let mut arities: HashMap<String, usize> = HashMap::new();
    for rule in rules.iter() {
      Self::check_rule(rule)?;
      let occurrences = std::iter::once(&rule.lhs).chain(rule.nonterminals());
      for nt in occurrences {
        let expected = *arities.entry(nt.name.clone()).or_insert(nt.arity());
        if expected != nt.arity() {
          return Err(GrammarError::InconsistentArity {
            name: nt.name.clone(),
            expected,
            found: nt.arity(),
          });
        }
      }
    }

    let start = rules[0].lhs.name.clone();
    let rules = rules.into_iter().map(Rc::new).collect::<Vec<_>>();

    let by_name: HashMap<String, Vec<Rc<Rule>>> =
      rules.iter().fold(HashMap::new(), |mut map, rule| {
        map
          .entry(rule.lhs.name.clone())
          .or_insert_with(Vec::new)
          .push(rule.clone());
        map
      });

    let undefined = rules
      .iter()
      .flat_map(|r| r.nonterminals())
      .filter(|nt| !by_name.contains_key(&nt.name))
      .map(|nt| nt.name.as_str())
      .collect::<HashSet<_>>();
    for name in undefined {
      warn!(name, "nonterminal is used but has no rules");
    }

    debug!(
      start = %start,
      rules = rules.len(),
      nonterminals = by_name.len(),
      "compiled grammar"
    );

    Ok(Self {
      start,
      rules,
      by_name,
      arities,
    })
  }

  fn check_rule(rule: &Rule) -> Result<(), GrammarError> {
    if rule.is_empty() {
      return Err(GrammarError::EmptyRule {
        rule: rule.to_string(),
      });
    }

    for nt in std::iter::once(&rule.lhs).chain(rule.nonterminals()) {
      Self::check_args(rule, nt)?;
    }

    if let Some(action) = &rule.action {
      let expected = rule.nonterminal_count();
      if action.arity() != expected {
        return Err(GrammarError::ActionArity {
          rule: rule.to_string(),
          expected,
          found: action.arity(),
        });
      }
    }

    Ok(())
  }

  /// Each argument position of a symbol is a binding site; one variable can't fill two of them
  fn check_args(rule: &Rule, nt: &Nonterminal) -> Result<(), GrammarError> {
    let mut seen = HashSet::new();
    for arg in nt.args.iter() {
      if !seen.insert(arg.as_str()) {
        return Err(GrammarError::MultiplyBound {
          rule: rule.to_string(),
          symbol: nt.to_string(),
          variable: arg.clone(),
        });
      }
    }
    Ok(())
  }

  pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, Err> {
    Ok(fs::read_to_string(path)?.parse::<Self>()?)
  }

  /// All rules, in declaration order
  pub fn rules(&self) -> &[Rc<Rule>] {
    &self.rules
  }

  /// Rules headed by `name`, in declaration order
  pub fn rules_for(&self, name: &str) -> &[Rc<Rule>] {
    self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn arity(&self, name: &str) -> Option<usize> {
    self.arities.get(name).copied()
  }

  pub fn parse_chart(&self, tokens: &[Token]) -> Chart {
    parse_chart(self, tokens)
  }

  /// The lazy, restartable sequence of complete derivations for `tokens`
  pub fn parse(&self, tokens: &[Token]) -> Derivations {
    Derivations::new(self.parse_chart(tokens))
  }

  /// Parses pre-split words, with no tokenizer involved
  pub fn parse_words(&self, words: &[&str]) -> Derivations {
    self.parse(&Token::from_words(words))
  }
}

/// Parses a syntax-only grammar: one rule per line (or separated by `;`), `//` comments.
impl FromStr for Grammar {
  type Err = GrammarError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let raw = parse_rules(s).map_err(|message| GrammarError::Syntax {
      rule: s.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim().to_string(),
      message,
    })?;
    Self::from_raw(raw)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::semantics::{action0, action1, action2, SemanticValue};

  #[test]
  fn test_compile_and_index() {
    let g = Grammar::new(vec![
      RuleSpec::syn("s -> np vp"),
      RuleSpec::syn("vp -> verb np"),
      RuleSpec::syn("np -> 'john'"),
      RuleSpec::syn("np -> 'mary'"),
      RuleSpec::syn("verb -> 'loves'"),
    ])
    .unwrap();

    assert_eq!(g.start, "s");
    assert_eq!(g.rules().len(), 5);
    assert_eq!(g.rules_for("np").len(), 2);
    assert!(g.rules_for("adj").is_empty());
    assert_eq!(g.arity("s"), Some(0));
  }

  #[test]
  fn test_inconsistent_arity() {
    let err = Grammar::new(vec![
      RuleSpec::syn("s(E1) -> np(E1) vp(E1)"),
      RuleSpec::syn("vp(E1) -> verb(E1, E2) np(E2, E1)"),
    ])
    .unwrap_err();

    assert_eq!(
      err,
      GrammarError::InconsistentArity {
        name: "np".into(),
        expected: 1,
        found: 2,
      }
    );
  }

  #[test]
  fn test_multiply_bound() {
    let err = Grammar::new(vec![RuleSpec::syn("s(E1) -> verb(E1, E1)")]).unwrap_err();
    assert!(matches!(err, GrammarError::MultiplyBound { ref variable, .. } if variable == "E1"));

    let err = Grammar::new(vec![RuleSpec::syn("s(E1, E1) -> 'x'")]).unwrap_err();
    assert!(matches!(err, GrammarError::MultiplyBound { .. }));

    // sharing across symbols is how entities are threaded, and is fine
    assert!(Grammar::new(vec![RuleSpec::syn("s(E1) -> np(E1) vp(E1)")]).is_ok());
  }

  #[test]
  fn test_action_arity() {
    let err = Grammar::new(vec![
      RuleSpec::syn("s -> 'what' 'is' term").sem(action2(|_, a, _| Ok(a))),
    ])
    .unwrap_err();
    assert_eq!(
      err,
      GrammarError::ActionArity {
        rule: "s -> 'what' 'is' term".into(),
        expected: 1,
        found: 2,
      }
    );

    assert!(Grammar::new(vec![
      RuleSpec::syn("s -> 'what' 'is' term").sem(action1(|_, a| Ok(a))),
      RuleSpec::syn("term -> 'one'").sem(action0(|_| Ok(SemanticValue::int(1)))),
    ])
    .is_ok());
  }

  #[test]
  fn test_malformed() {
    assert!(matches!(
      Grammar::new(vec![RuleSpec::syn("s => np")]),
      Err(GrammarError::Syntax { .. })
    ));
    assert!(matches!(
      Grammar::new(vec![RuleSpec::syn("s ->")]),
      Err(GrammarError::EmptyRule { .. })
    ));
    assert_eq!(Grammar::new(vec![]).unwrap_err(), GrammarError::Empty);
    assert_eq!("// nothing".parse::<Grammar>().unwrap_err(), GrammarError::Empty);
  }
}
