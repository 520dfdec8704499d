use criterion::{black_box, criterion_group, criterion_main, Criterion};

use semtree::{
  sample_grammars, BasicParser, BasicTokenizer, Grammar, Pipeline, Request, SemanticComposer,
  SemanticExecutor, Token,
};

fn count_trees(g: &Grammar, input: &[Token]) -> usize {
  g.parse(input).iter().count()
}

fn criterion_benchmark(c: &mut Criterion) {
  let grammar = sample_grammars::calculator().unwrap();
  let simple_input = Token::from_words(&["what", "is", "three", "plus", "four"]);
  let ambiguous_input = Token::from_words(&[
    "calculate", "one", "plus", "two", "times", "three", "minus", "four", "divided", "by", "two",
  ]);

  c.bench_function("parse simple", |b| {
    b.iter(|| count_trees(black_box(&grammar), black_box(&simple_input)))
  });

  c.bench_function("parse ambiguous", |b| {
    b.iter(|| count_trees(black_box(&grammar), black_box(&ambiguous_input)))
  });

  let tokenizer = BasicTokenizer::new();
  let parser = BasicParser::new(sample_grammars::calculator().unwrap(), &tokenizer);
  let composer = SemanticComposer::new(&parser);
  let executor = SemanticExecutor::new(&composer);
  let pipeline = Pipeline::new()
    .then(&tokenizer)
    .then(&parser)
    .then(&composer)
    .then(&executor);

  c.bench_function("execute all groupings", |b| {
    b.iter(|| {
      let mut request = Request::find_all("calculate one plus two times three minus four");
      pipeline.enter(black_box(&mut request)).len()
    })
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
