//! The stages of a pipeline. Each processor reads its source's products off the
//! request and offers its own alternatives as a lazy sequence.

mod composer;
mod executor;
mod parser;
mod tokenizer;

pub use composer::SemanticComposer;
pub use executor::SemanticExecutor;
pub use parser::BasicParser;
pub use tokenizer::BasicTokenizer;

use tracing::debug;

use crate::error::ProcessError;
use crate::request::{Product, Request};

/// Alternative outputs, each tagged with the index of the derivation it belongs to
pub type Alternatives<'r> = Box<dyn Iterator<Item = Result<(usize, Product), ProcessError>> + 'r>;

pub trait Processor {
  /// Name the processor's products are stored under on a request
  fn key(&self) -> &str;

  /// Every alternative output for the request, in order, computed on demand.
  /// Failing alternatives are yielded as errors without ending the sequence.
  fn alternatives<'r>(&'r self, request: &'r Request) -> Alternatives<'r>;

  /// Stores every alternative on the request
  fn process(&self, request: &mut Request) {
    let (products, errors) = collect_all(self.alternatives(request));
    debug!(
      processor = self.key(),
      products = products.len(),
      errors = errors.len(),
      "processed all alternatives"
    );
    request.set_alternatives(self.key(), products, errors);
  }
}

fn collect_all(alternatives: Alternatives<'_>) -> (Vec<(usize, Product)>, Vec<ProcessError>) {
  let mut products = Vec::new();
  let mut errors = Vec::new();
  for alt in alternatives {
    match alt {
      Ok(p) => products.push(p),
      Err(e) => errors.push(e),
    }
  }
  (products, errors)
}

impl<P: Processor + ?Sized> Processor for &P {
  fn key(&self) -> &str {
    (**self).key()
  }

  fn alternatives<'r>(&'r self, request: &'r Request) -> Alternatives<'r> {
    (**self).alternatives(request)
  }

  fn process(&self, request: &mut Request) {
    (**self).process(request)
  }
}

impl<P: Processor + ?Sized> Processor for Box<P> {
  fn key(&self) -> &str {
    (**self).key()
  }

  fn alternatives<'r>(&'r self, request: &'r Request) -> Alternatives<'r> {
    (**self).alternatives(request)
  }

  fn process(&self, request: &mut Request) {
    (**self).process(request)
  }
}

/// Wraps a processor so it stores only its first successful alternative. The wrapped
/// processor's sequence is abandoned as soon as that alternative is found, so later
/// alternatives are never computed.
pub struct FindOne<P> {
  inner: P,
}

impl<P: Processor> FindOne<P> {
  pub fn new(inner: P) -> Self {
    Self { inner }
  }

  pub fn inner(&self) -> &P {
    &self.inner
  }
}

impl<P: Processor> Processor for FindOne<P> {
  fn key(&self) -> &str {
    self.inner.key()
  }

  fn alternatives<'r>(&'r self, request: &'r Request) -> Alternatives<'r> {
    let mut failed = Vec::new();
    let mut alternatives = self.inner.alternatives(request);
    let first = alternatives.by_ref().find_map(|alt| match alt {
      Ok(p) => Some(p),
      Err(e) => {
        failed.push(e);
        None
      }
    });
    Box::new(failed.into_iter().map(Err).chain(first.map(Ok)))
  }

  fn process(&self, request: &mut Request) {
    let (mut products, errors) = collect_all(self.alternatives(request));
    debug!(
      processor = self.key(),
      found = !products.is_empty(),
      skipped = errors.len(),
      "processed first alternative"
    );
    request.set_result(self.key(), products.pop(), errors);
  }
}
