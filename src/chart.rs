use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::grammar::Grammar;
use crate::rules::{Rule, Symbol};
use crate::token::Token;

/// One way of building a rule's symbol over a span: the rule, plus the sub-span
/// each of its right-hand symbols covers
#[derive(Debug, Clone)]
pub struct Edge {
  pub rule: Rc<Rule>,
  pub spans: Vec<(usize, usize)>,
}

impl Edge {
  pub fn span(&self) -> (usize, usize) {
    match (self.spans.first(), self.spans.last()) {
      (Some(first), Some(last)) => (first.0, last.1),
      _ => (0, 0),
    }
  }
}

impl PartialEq for Edge {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.rule, &other.rule) && self.spans == other.spans
  }
}

impl fmt::Display for Edge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.rule.lhs)?;
    for (symbol, span) in self.rule.rhs.iter().zip(self.spans.iter()) {
      write!(f, " {}[{}..{}]", symbol, span.0, span.1)?;
    }
    Ok(())
  }
}

/// Packed table of constituents, indexed by span. Every edge of a span is stored once,
/// no matter how many derivations pass through it.
#[derive(Debug)]
pub struct Chart {
  start: String,
  tokens: Vec<Token>,
  /// cells[start][len - 1]
  cells: Vec<Vec<Vec<Edge>>>,
}

impl Chart {
  fn new(start: String, tokens: Vec<Token>) -> Self {
    let n = tokens.len();
    let cells = (0..n).map(|i| vec![Vec::new(); n - i]).collect();
    Self {
      start,
      tokens,
      cells,
    }
  }

  /// Number of tokens covered
  pub fn len(&self) -> usize {
    self.tokens.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn start(&self) -> &str {
    &self.start
  }

  pub fn tokens(&self) -> &[Token] {
    &self.tokens
  }

  /// All edges over exactly `span`, in the order they were found
  pub fn edges(&self, span: (usize, usize)) -> &[Edge] {
    let (start, end) = span;
    if start >= end || end > self.len() {
      return &[];
    }
    &self.cells[start][end - start - 1]
  }

  /// Is there a constituent named `name` over exactly `span`?
  pub fn has(&self, span: (usize, usize), name: &str) -> bool {
    self.edges(span).iter().any(|e| e.rule.name() == name)
  }

  /// Edges of the start symbol that cover the whole input
  pub fn roots(&self) -> impl Iterator<Item = &Edge> {
    let start = self.start.as_str();
    self
      .edges((0, self.len()))
      .iter()
      .filter(move |e| e.rule.name() == start)
  }

  fn add(&mut self, edge: Edge) -> bool {
    let (start, end) = edge.span();
    let cell = &mut self.cells[start][end - start - 1];
    if cell.contains(&edge) {
      false
    } else {
      trace!(%edge, "chart add");
      cell.push(edge);
      true
    }
  }

  /// Enumerates every way to lay `rule.rhs[idx..]` over `[start, end)`, leftmost symbol
  /// taking the shortest sub-span first. Each symbol covers at least one token.
  fn splits(
    &self,
    rule: &Rule,
    idx: usize,
    start: usize,
    end: usize,
    acc: &mut Vec<(usize, usize)>,
    out: &mut Vec<Vec<(usize, usize)>>,
  ) {
    if idx == rule.len() {
      if start == end {
        out.push(acc.clone());
      }
      return;
    }

    // symbols after this one need a token each
    let remaining = rule.len() - idx - 1;
    if start + 1 + remaining > end {
      return;
    }

    match &rule.rhs[idx] {
      Symbol::Terminal(literal) => {
        if self.tokens[start].text == *literal {
          acc.push((start, start + 1));
          self.splits(rule, idx + 1, start + 1, end, acc, out);
          acc.pop();
        }
      }
      Symbol::Nonterminal(nt) => {
        for mid in (start + 1)..=(end - remaining) {
          if self.has((start, mid), &nt.name) {
            acc.push((start, mid));
            self.splits(rule, idx + 1, mid, end, acc, out);
            acc.pop();
          }
        }
      }
    }
  }
}

impl fmt::Display for Chart {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for len in 1..=self.len() {
      for start in 0..=(self.len() - len) {
        let edges = self.edges((start, start + len));
        if edges.is_empty() {
          continue;
        }
        writeln!(f, "Span {}..{}:", start, start + len)?;
        for edge in edges {
          writeln!(f, "  {}", edge)?;
        }
      }
    }
    Ok(())
  }
}

/// Bottom-up chart construction: spans by increasing length, then rules in declaration
/// order, then sub-span splits leftmost-first. Unit rules over the same span are
/// repeated until the cell stops growing.
pub fn parse_chart(g: &Grammar, tokens: &[Token]) -> Chart {
  let mut chart = Chart::new(g.start.clone(), tokens.to_vec());
  let n = chart.len();

  for len in 1..=n {
    for start in 0..=(n - len) {
      let end = start + len;
      loop {
        let mut grew = false;
        for rule in g.rules() {
          if rule.len() > len {
            continue;
          }
          let mut splits = Vec::new();
          chart.splits(rule, 0, start, end, &mut Vec::new(), &mut splits);
          for spans in splits {
            grew |= chart.add(Edge {
              rule: rule.clone(),
              spans,
            });
          }
        }
        if !grew {
          break;
        }
      }
    }
  }

  trace!(tokens = n, roots = chart.roots().count(), "chart complete");
  chart
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_chart() {
    let g: Grammar = r#"
      S -> 'x'
      S -> S S
    "#
    .parse()
    .unwrap();

    let chart = g.parse_chart(&Token::from_words(&["x", "x", "x"]));

    let names = |span| {
      chart
        .edges(span)
        .iter()
        .map(|e| e.spans.len())
        .collect::<Vec<_>>()
    };

    assert_eq!(names((0, 1)), vec![1]);
    assert_eq!(names((0, 2)), vec![2]);
    // [x][xx] and [xx][x]
    assert_eq!(chart.edges((0, 3)).len(), 2);
    assert_eq!(chart.edges((0, 3))[0].spans, vec![(0, 1), (1, 3)]);
    assert_eq!(chart.edges((0, 3))[1].spans, vec![(0, 2), (2, 3)]);
    assert_eq!(chart.roots().count(), 2);

    println!("{}", chart);
  }

  #[test]
  fn test_unit_rules_same_span() {
    let g: Grammar = r#"
      s -> np
      np -> noun
      noun -> 'mary'
    "#
    .parse()
    .unwrap();

    let chart = g.parse_chart(&Token::from_words(&["mary"]));
    assert!(chart.has((0, 1), "noun"));
    assert!(chart.has((0, 1), "np"));
    assert_eq!(chart.roots().count(), 1);
  }

  #[test]
  fn test_cyclic_unit_rules_terminate() {
    let g: Grammar = r#"
      a -> b
      b -> a
      b -> 'x'
    "#
    .parse()
    .unwrap();

    let chart = g.parse_chart(&Token::from_words(&["x"]));
    assert_eq!(chart.edges((0, 1)).len(), 3);
  }

  #[test]
  fn test_empty_input() {
    let g: Grammar = "s -> 'x'".parse().unwrap();
    let chart = g.parse_chart(&[]);
    assert!(chart.is_empty());
    assert_eq!(chart.roots().count(), 0);
  }
}
