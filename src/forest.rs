use std::iter;
use std::rc::Rc;

use tracing::trace;

use crate::chart::{Chart, Edge};
use crate::rules::{Rule, Symbol};
use crate::syntree::{Bindings, Constituent, Node, ParseNode, SynTree, Variable, Word};

/// A derivation before variables are threaded through it
type BareTree = SynTree<Rc<Rule>, String>;
type BareTrees = Box<dyn Iterator<Item = BareTree>>;
type Sequences = Box<dyn Iterator<Item = Vec<BareTree>>>;

/// (nonterminal, span) pairs on the path from the root to the current node
type Path = Rc<Vec<(String, (usize, usize))>>;

/// The complete derivations of one input, read lazily out of a chart.
///
/// Every call to `iter` starts a fresh traversal, so the sequence can be consumed
/// any number of times, and stopping early leaves the remaining trees unbuilt.
/// Order: root edges in chart order, then leftmost-first child choice.
#[derive(Debug, Clone)]
pub struct Derivations {
  chart: Rc<Chart>,
}

impl Derivations {
  pub fn new(chart: Chart) -> Self {
    Self {
      chart: Rc::new(chart),
    }
  }

  pub fn chart(&self) -> &Chart {
    &self.chart
  }

  pub fn iter(&self) -> impl Iterator<Item = ParseNode> + use<> {
    let chart = self.chart.clone();
    let start = chart.start().to_string();
    let span = (0, chart.len());
    trees(&chart, &start, span, &Rc::new(Vec::new()))
      .map(|tree| Binder::default().bind_root(tree))
  }

  pub fn first(&self) -> Option<ParseNode> {
    self.iter().next()
  }

  /// An ungrammatical input has no derivations; this is not an error
  pub fn is_empty(&self) -> bool {
    self.first().is_none()
  }
}

impl IntoIterator for &Derivations {
  type Item = ParseNode;
  type IntoIter = Box<dyn Iterator<Item = ParseNode>>;

  fn into_iter(self) -> Self::IntoIter {
    Box::new(self.iter())
  }
}

impl IntoIterator for Derivations {
  type Item = ParseNode;
  type IntoIter = Box<dyn Iterator<Item = ParseNode>>;

  fn into_iter(self) -> Self::IntoIter {
    Box::new(self.iter())
  }
}

/// All trees for the constituent `name` over `span`. A node that reappears below itself
/// with the same span can only come from a cycle of unit rules, so it is skipped.
fn trees(chart: &Rc<Chart>, name: &str, span: (usize, usize), path: &Path) -> BareTrees {
  if path.iter().any(|(n, s)| n == name && *s == span) {
    trace!(name, ?span, "skipping unit cycle");
    return Box::new(iter::empty());
  }

  let mut path = path.as_ref().clone();
  path.push((name.to_string(), span));
  let path = Rc::new(path);

  let edges = chart
    .edges(span)
    .iter()
    .filter(|e| e.rule.name() == name)
    .cloned()
    .map(Rc::new)
    .collect::<Vec<_>>();

  let chart = chart.clone();
  Box::new(edges.into_iter().flat_map(move |edge| {
    let cons = Constituent {
      value: edge.rule.clone(),
      span,
    };
    sequences(&chart, edge, 0, &path).map(move |children| SynTree::Branch(cons.clone(), children))
  }))
}

/// Every sequence of subtrees for `edge.rule.rhs[idx..]`. Earlier children vary slowest.
fn sequences(chart: &Rc<Chart>, edge: Rc<Edge>, idx: usize, path: &Path) -> Sequences {
  if idx == edge.spans.len() {
    return Box::new(iter::once(Vec::new()));
  }

  let span = edge.spans[idx];
  let wanted = match &edge.rule.rhs[idx] {
    Symbol::Terminal(_) => None,
    Symbol::Nonterminal(nt) => Some(nt.name.clone()),
  };

  match wanted {
    None => {
      let leaf = SynTree::Leaf(Word {
        value: chart.tokens()[span.0].text.clone(),
        span,
      });
      Box::new(sequences(chart, edge, idx + 1, path).map(move |mut rest| {
        rest.insert(0, leaf.clone());
        rest
      }))
    }
    Some(name) => {
      let chart = chart.clone();
      let path = path.clone();
      let heads = trees(&chart, &name, span, &path);
      Box::new(heads.flat_map(move |head| {
        sequences(&chart, edge.clone(), idx + 1, &path).map(move |mut rest| {
          rest.insert(0, head.clone());
          rest
        })
      }))
    }
  }
}

/// Threads variables through a derivation: a rule's head arguments take the
/// entities its parent invoked it with, and variables that only appear on the
/// right-hand side get fresh entities.
#[derive(Default)]
struct Binder {
  next: u32,
}

impl Binder {
  fn fresh(&mut self) -> Variable {
    self.next += 1;
    Variable(self.next)
  }

  fn bind_root(&mut self, tree: BareTree) -> ParseNode {
    let args: Vec<Variable> = match tree.get_branch() {
      Some((cons, _)) => (0..cons.value.lhs.arity()).map(|_| self.fresh()).collect(),
      None => Vec::new(),
    };
    self.bind(tree, &args)
  }

  fn bind(&mut self, tree: BareTree, args: &[Variable]) -> ParseNode {
    match tree {
      SynTree::Leaf(w) => SynTree::Leaf(w),
      SynTree::Branch(cons, children) => {
        let rule = cons.value;

        let mut bindings = Bindings::new();
        for (name, var) in rule.lhs.args.iter().zip(args.iter()) {
          bindings.insert(name.clone(), *var);
        }
        for nt in rule.nonterminals() {
          for name in nt.args.iter() {
            if !bindings.contains_key(name) {
              let var = self.fresh();
              bindings.insert(name.clone(), var);
            }
          }
        }

        let children = rule
          .rhs
          .iter()
          .zip(children)
          .map(|(symbol, child)| match symbol {
            Symbol::Nonterminal(nt) => {
              let child_args = nt
                .args
                .iter()
                .filter_map(|a| bindings.get(a).copied())
                .collect::<Vec<_>>();
              self.bind(child, &child_args)
            }
            Symbol::Terminal(_) => self.bind(child, &[]),
          })
          .collect::<Vec<_>>();

        SynTree::Branch(
          Constituent {
            value: Node { rule, bindings },
            span: cons.span,
          },
          children,
        )
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::grammar::Grammar;
  use crate::token::Token;

  #[test]
  fn test_tree_generation() {
    // correct algorithm finds 2 trees:
    //  (S (S x) (S (S x) (S x)))           -> [x][xx]
    //  (S (S (S x) (S x)) (S x))           -> [xx][x]
    let g: Grammar = r#"
      S -> 'x'
      S -> S S
    "#
    .parse()
    .unwrap();

    let derivations = g.parse(&Token::from_words(&["x", "x", "x"]));
    let trees = derivations.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    assert_eq!(
      trees,
      vec![
        "S(S(x), S(S(x), S(x)))".to_string(),
        "S(S(S(x), S(x)), S(x))".to_string(),
      ]
    );
  }

  #[test]
  fn test_restartable() {
    let g: Grammar = r#"
      S -> 'x'
      S -> S S
    "#
    .parse()
    .unwrap();

    let derivations = g.parse(&Token::from_words(&["x", "x", "x", "x"]));
    let first = derivations.iter().map(|t| t.to_string()).collect::<Vec<_>>();
    let second = derivations.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    // catalan(3)
    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
    assert_eq!(derivations.first().unwrap().to_string(), first[0]);
  }

  #[test]
  fn test_variable_threading() {
    let g: Grammar = r#"
      s(E1) -> np(E1) vp(E1)
      vp(E1) -> verb(E1, E2) np(E2)
      verb(E1, E2) -> 'sees'
      np(E1) -> 'fish'
    "#
    .parse()
    .unwrap();

    let tree = g
      .parse(&Token::from_words(&["fish", "sees", "fish"]))
      .first()
      .unwrap();

    let (root, children) = tree.get_branch().unwrap();
    let subject = root.value.bindings["E1"];

    let (np, _) = children[0].get_branch().unwrap();
    assert_eq!(np.value.bindings["E1"], subject);

    let (vp, vp_children) = children[1].get_branch().unwrap();
    assert_eq!(vp.value.bindings["E1"], subject);
    let object = vp.value.bindings["E2"];
    assert_ne!(object, subject);

    let (verb, _) = vp_children[0].get_branch().unwrap();
    assert_eq!(verb.value.bindings["E1"], subject);
    assert_eq!(verb.value.bindings["E2"], object);

    let (object_np, _) = vp_children[1].get_branch().unwrap();
    assert_eq!(object_np.value.bindings["E1"], object);
  }

  #[test]
  fn test_unit_cycle_is_finite() {
    let g: Grammar = r#"
      a -> b
      b -> a
      b -> 'x'
    "#
    .parse()
    .unwrap();

    let trees = g
      .parse(&Token::from_words(&["x"]))
      .iter()
      .map(|t| t.to_string())
      .collect::<Vec<_>>();
    assert_eq!(trees, vec!["a(b(x))".to_string()]);
  }
}
