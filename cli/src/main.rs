use std::io;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use semtree::{
  sample_grammars, BasicParser, BasicTokenizer, Err, FindOne, Grammar, Pipeline, Request,
  RequestOptions, SemanticComposer, SemanticExecutor,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Demo {
  /// john loves mary
  Syntax,
  /// what is three plus four
  Calculator,
  /// the river flows to the sea
  Rivers,
}

/// Parses sentences from stdin, one per line, and prints their derivations.
/// The built-in calculator and rivers grammars also print their semantics.
#[derive(Parser, Debug)]
#[command(name = "semtree")]
struct Args {
  /// Grammar file of syntax-only rules, one per line
  #[arg(required_unless_present = "demo", conflicts_with = "demo")]
  file: Option<PathBuf>,

  /// Use a built-in grammar instead of a file
  #[arg(long, value_enum)]
  demo: Option<Demo>,

  /// Print every derivation instead of stopping at the first
  #[arg(short, long)]
  all: bool,

  /// Print the parse chart
  #[arg(short, long)]
  chart: bool,
}

/// The grammar, and whether its rules carry actions worth running
fn load(args: &Args) -> Result<(Grammar, bool), Err> {
  match (args.demo, &args.file) {
    (Some(Demo::Syntax), _) => Ok((sample_grammars::syntax()?, false)),
    (Some(Demo::Calculator), _) => Ok((sample_grammars::calculator()?, true)),
    (Some(Demo::Rivers), _) => Ok((sample_grammars::rivers()?, true)),
    (None, Some(path)) => Ok((Grammar::read_from_file(path)?, false)),
    (None, None) => Err("no grammar given".into()),
  }
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();
  let (grammar, semantics) = load(&args)?;
  debug!(rules = grammar.rules().len(), start = %grammar.start, "loaded grammar");

  let tokenizer = BasicTokenizer::new();
  let parser = BasicParser::new(grammar, &tokenizer);
  let composer = SemanticComposer::new(&parser);
  let executor = SemanticExecutor::new(&composer);

  let mut pipeline = if args.all {
    Pipeline::new().then(&tokenizer).then(&parser)
  } else {
    Pipeline::new().then(&tokenizer).then(FindOne::new(&parser))
  };
  if semantics {
    pipeline = pipeline.then(&composer).then(&executor);
  }

  let options = RequestOptions { find_all: args.all };
  let mut input = String::new();
  loop {
    print!("> ");
    io::stdout().flush()?;

    input.clear();
    if io::stdin().read_line(&mut input)? == 0 {
      // ctrl+d
      return Ok(());
    }
    let sentence = input.trim();
    if sentence.is_empty() {
      continue;
    }

    let mut request = Request::with_options(sentence, options);
    pipeline.enter(&mut request);

    if args.chart {
      if let Some(tokens) = tokenizer.get_tokens(&request) {
        println!("chart:\n{}\n", parser.grammar().parse_chart(tokens));
      }
    }

    let trees = request.get_alternatives(&parser);
    println!(
      "Parsed {} tree{}",
      trees.len(),
      if trees.len() == 1 { "" } else { "s" }
    );
    for tree in trees.iter().filter_map(|p| p.as_tree()) {
      println!("{}", tree);
    }

    if semantics {
      for value in executor.get_results(&request) {
        println!("= {}", value);
      }
      for e in request.errors(&composer).iter().chain(request.errors(&executor)) {
        println!("error: {}", e);
      }
    }
    println!();
  }
}
