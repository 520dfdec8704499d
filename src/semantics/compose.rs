use crate::error::CompositionError;
use crate::semantics::action::Scope;
use crate::semantics::value::SemanticValue;
use crate::syntree::{ParseNode, SynTree};

/// Evaluates a derivation's actions bottom-up. Non-literal children are composed
/// first, left to right; literals only contribute their text, through `Scope::words`.
/// A rule with no action passes through the value of its one non-literal child.
pub fn compose(tree: &ParseNode) -> Result<SemanticValue, CompositionError> {
  match tree {
    SynTree::Leaf(w) => Ok(SemanticValue::str(w.value.clone())),
    SynTree::Branch(cons, children) => {
      let node = &cons.value;

      let mut values = Vec::with_capacity(children.len());
      let mut words = Vec::new();
      for child in children.iter() {
        match child {
          SynTree::Leaf(w) => words.push(w.value.as_str()),
          branch => values.push(compose(branch)?),
        }
      }

      match &node.rule.action {
        Some(action) => {
          let scope = Scope::new(&node.rule, &node.bindings, words);
          action.call(&scope, values)
        }
        None if values.len() == 1 => Ok(values.remove(0)),
        None => Err(CompositionError::PassThrough {
          rule: node.rule.to_string(),
          children: values.len(),
        }),
      }
    }
  }
}
