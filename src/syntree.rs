use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::rules::Rule;

#[derive(Debug, PartialEq, Clone)]
pub struct Constituent<T> {
  pub value: T,
  pub span: (usize, usize),
}

impl<T> fmt::Display for Constituent<T>
where
  T: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Word<U> {
  pub value: U,
  pub span: (usize, usize),
}

impl<U> fmt::Display for Word<U>
where
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

#[derive(Debug, PartialEq, Clone)]
pub enum SynTree<T, U> {
  Branch(Constituent<T>, Vec<SynTree<T, U>>),
  Leaf(Word<U>),
}

impl<T, U> SynTree<T, U> {
  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(_))
  }

  pub fn is_branch(&self) -> bool {
    matches!(self, Self::Branch(_, _))
  }

  pub fn get_leaf(&self) -> Option<&Word<U>> {
    match self {
      Self::Leaf(w) => Some(w),
      _ => None,
    }
  }

  pub fn get_branch(&self) -> Option<(&Constituent<T>, &Vec<SynTree<T, U>>)> {
    match self {
      Self::Branch(c, cs) => Some((c, cs)),
      _ => None,
    }
  }

  pub fn span(&self) -> (usize, usize) {
    match self {
      Self::Branch(c, _) => c.span,
      Self::Leaf(w) => w.span,
    }
  }
}

/// Prints the bracketed form, e.g. `s(np(noun(john)), vp(verb(sleeps)))`
impl<T, U> fmt::Display for SynTree<T, U>
where
  T: fmt::Display,
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(w) => write!(f, "{}", w.value),
      Self::Branch(c, children) => {
        write!(f, "{}(", c.value)?;
        for (idx, child) in children.iter().enumerate() {
          if idx > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{}", child)?;
        }
        write!(f, ")")
      }
    }
  }
}

/// An entity introduced by a derivation. Rule variables are bound to these.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(pub u32);

impl fmt::Display for Variable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "x{}", self.0)
  }
}

/// Rule-local variable name -> entity, for one rule application
pub type Bindings = BTreeMap<String, Variable>;

/// The payload of a derivation's branch: the rule applied and its variable bindings
#[derive(Debug, Clone)]
pub struct Node {
  pub rule: Rc<Rule>,
  pub bindings: Bindings,
}

impl Node {
  pub fn name(&self) -> &str {
    self.rule.name()
  }
}

impl PartialEq for Node {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.rule, &other.rule) && self.bindings == other.bindings
  }
}

impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.rule.name())
  }
}

/// One complete or partial derivation. Leaves hold the matched token text.
pub type ParseNode = SynTree<Node, String>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_brackets() {
    let tree: SynTree<String, String> = SynTree::Branch(
      Constituent {
        value: "np".to_string(),
        span: (0, 2),
      },
      vec![
        SynTree::Leaf(Word {
          value: "the".to_string(),
          span: (0, 1),
        }),
        SynTree::Branch(
          Constituent {
            value: "noun".to_string(),
            span: (1, 2),
          },
          vec![SynTree::Leaf(Word {
            value: "sea".to_string(),
            span: (1, 2),
          })],
        ),
      ],
    );

    assert_eq!(tree.to_string(), "np(the, noun(sea))");
    assert_eq!(tree.span(), (0, 2));
    assert!(tree.is_branch());
    assert!(tree.get_branch().unwrap().1[0].is_leaf());
  }
}
