use std::fmt;

use crate::semantics::SemanticAction;

/// A nonterminal occurrence: a name plus the rule-local variables it is invoked with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonterminal {
  pub name: String,
  pub args: Vec<String>,
}

impl Nonterminal {
  pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
    Self {
      name: name.into(),
      args,
    }
  }

  pub fn arity(&self) -> usize {
    self.args.len()
  }
}

impl fmt::Display for Nonterminal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)?;
    if !self.args.is_empty() {
      write!(f, "({})", self.args.join(", "))?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
  Terminal(String),
  Nonterminal(Nonterminal),
}

impl Symbol {
  pub fn symbol_str(&self) -> &str {
    match self {
      Self::Terminal(s) => s,
      Self::Nonterminal(n) => &n.name,
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Terminal(_))
  }

  pub fn is_nonterminal(&self) -> bool {
    matches!(self, Self::Nonterminal(_))
  }

  pub fn nonterminal(&self) -> Option<&Nonterminal> {
    match self {
      Self::Nonterminal(n) => Some(n),
      _ => None,
    }
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Terminal(s) => write!(f, "'{}'", s),
      Self::Nonterminal(n) => write!(f, "{}", n),
    }
  }
}

#[derive(Debug)]
pub struct Rule {
  pub lhs: Nonterminal,
  pub rhs: Vec<Symbol>,
  pub action: Option<SemanticAction>,
}

impl Rule {
  pub fn len(&self) -> usize {
    self.rhs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn name(&self) -> &str {
    &self.lhs.name
  }

  /// The non-literal right-hand symbols, left to right. These are the ones
  /// that feed the action.
  pub fn nonterminals(&self) -> impl Iterator<Item = &Nonterminal> {
    self.rhs.iter().filter_map(Symbol::nonterminal)
  }

  pub fn nonterminal_count(&self) -> usize {
    self.nonterminals().count()
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.lhs)?;
    for s in self.rhs.iter() {
      write!(f, " {}", s)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rule_display() {
    let rule = Rule {
      lhs: Nonterminal::new("vp", vec!["E1".into()]),
      rhs: vec![
        Symbol::Nonterminal(Nonterminal::new("verb", vec!["E1".into(), "E2".into()])),
        Symbol::Terminal("to".into()),
        Symbol::Nonterminal(Nonterminal::new("np", vec!["E2".into()])),
      ],
      action: None,
    };

    assert_eq!(rule.to_string(), "vp(E1) -> verb(E1, E2) 'to' np(E2)");
    assert_eq!(rule.nonterminal_count(), 2);
    assert_eq!(rule.len(), 3);
  }
}
