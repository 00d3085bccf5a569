use compact_js::minify;
use compact_js::MinifyError;
use compact_js::Options;
use compact_js::TopLevelMode;
use std::fs;
use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process::exit;
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt)]
#[structopt(name = "compact-js", about = "JavaScript minifier")]
struct Cli {
  /// File to minify; `-` for stdin.
  #[structopt(parse(from_os_str))]
  input: PathBuf,

  /// Where to write the minified code. Defaults to stdout.
  #[structopt(short, long, parse(from_os_str))]
  output: Option<PathBuf>,

  /// Whether file is a module or global script. Overrides the config file.
  #[structopt(short, long)]
  mode: Option<TopLevelMode>,

  /// JSON file with options. Defaults to the recommended options.
  #[structopt(long, parse(from_os_str))]
  config: Option<PathBuf>,

  /// Skip the rewrite rules.
  #[structopt(long)]
  no_compress: bool,

  /// Keep all names.
  #[structopt(long)]
  no_mangle: bool,

  /// Indent and space the output.
  #[structopt(long)]
  beautify: bool,

  /// How many times to apply the rewrite rules.
  #[structopt(long)]
  passes: Option<u32>,
}

fn fail(msg: impl std::fmt::Display) -> ! {
  eprintln!("compact-js: {}", msg);
  exit(1);
}

fn load_options(args: &Cli) -> Options {
  let mut options = match &args.config {
    Some(path) => {
      let raw = fs::read_to_string(path)
        .unwrap_or_else(|err| fail(format!("{}: {}", path.display(), err)));
      serde_json::from_str::<Options>(&raw)
        .unwrap_or_else(|err| fail(format!("{}: {}", path.display(), err)))
    }
    None => Options::recommended(),
  };
  if let Some(mode) = args.mode {
    options.top_level_mode = mode;
  };
  if args.no_compress {
    options.compress = None;
  };
  if args.no_mangle {
    options.mangle = None;
  };
  if args.beautify {
    options.emit.beautify = true;
  };
  if let (Some(passes), Some(compress)) = (args.passes, &mut options.compress) {
    compress.passes = passes;
  };
  options
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let args = Cli::from_args();
  let options = load_options(&args);
  debug!(?options, "loaded options");

  let from_stdin = args.input.as_os_str() == "-";
  let mut input = String::new();
  let mut input_file: Box<dyn Read> = if from_stdin {
    Box::new(stdin())
  } else {
    Box::new(File::open(&args.input).unwrap_or_else(|err| fail(format!("{}: {}", args.input.display(), err))))
  };
  input_file
    .read_to_string(&mut input)
    .unwrap_or_else(|err| fail(format!("{}: {}", args.input.display(), err)));

  let minified = match minify(&input, &options) {
    Ok(minified) => minified,
    Err(MinifyError::Syntax(err)) => {
      let name = if from_stdin {
        "<stdin>".to_string()
      } else {
        args.input.display().to_string()
      };
      fail(format!("{}:{}:{}: {}", name, err.line(), err.col(), err.message()));
    }
    Err(err) => fail(err),
  };

  let out_file: Box<dyn Write> = match &args.output {
    Some(p) => Box::new(File::create(p).unwrap_or_else(|err| fail(format!("{}: {}", p.display(), err)))),
    None => Box::new(stdout()),
  };
  let mut output = BufWriter::new(out_file);
  output
    .write_all(minified.code.as_bytes())
    .unwrap_or_else(|err| fail(err));
  output.flush().unwrap_or_else(|err| fail(err));
}
