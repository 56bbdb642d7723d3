use serde::Serialize;
use std::io::Read;
use svgmark::render::{RenderOptions, render_document};
use svgmark::{LineSubtree, PlainTextOptions, SvgmarkConfig, convert, parse_segments, plain_text};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(svgmark::Error),
    Render(svgmark::render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<svgmark::Error> for CliError {
    fn from(value: svgmark::Error) -> Self {
        Self::Config(value)
    }
}

impl From<svgmark::render::Error> for CliError {
    fn from(value: svgmark::render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    Parse,
    Layout,
    #[default]
    Render,
    Text,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Vec<String>,
    line_class: Option<String>,
    max_len: Option<usize>,
    out: Option<String>,
}

#[derive(Serialize)]
struct LineOut<'a> {
    index: usize,
    total: usize,
    dy: String,
    runs: &'a [svgmark::Run],
}

impl<'a> From<&'a LineSubtree> for LineOut<'a> {
    fn from(line: &'a LineSubtree) -> Self {
        Self {
            index: line.index,
            total: line.total,
            dy: line.dy(),
            runs: &line.runs,
        }
    }
}

fn usage() -> &'static str {
    "svgmark-cli\n\
\n\
USAGE:\n\
  svgmark-cli parse [--pretty] [<path>|-]\n\
  svgmark-cli layout [--pretty] [<path>|-]\n\
  svgmark-cli [render] [--config <json-path>]... [--line-class <name>] [--out <path>] [<path>|-]\n\
  svgmark-cli text [--max-len <n>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - parse prints the sanitized segment tree as JSON.\n\
  - layout prints the per-line run trees as JSON.\n\
  - --config may be repeated; later files are deep-merged over earlier ones.\n\
  - render prints a standalone SVG document to stdout by default; use --out to write a file.\n\
  - text prints the visible text with markup removed, one line per <br>.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "text" => args.command = Command::Text,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config.push(path.clone());
            }
            "--line-class" => {
                let Some(class) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.line_class = Some(class.clone());
            }
            "--max-len" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.max_len = Some(n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            println!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn load_config(args: &Args) -> Result<SvgmarkConfig, CliError> {
    let mut cfg = SvgmarkConfig::empty_object();
    for path in &args.config {
        cfg.merge(SvgmarkConfig::from_json_str(&std::fs::read_to_string(path)?)?);
    }
    if let Some(class) = args.line_class.as_deref() {
        cfg.set_value("text.lineClass", serde_json::json!(class));
    }
    Ok(cfg)
}

// Label text is a single logical line; a trailing newline from files or `echo` is not content.
fn trim_trailing_newline(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}

fn run(args: Args) -> Result<(), CliError> {
    let raw = read_input(args.input.as_deref())?;
    let text = trim_trailing_newline(&raw);

    match args.command {
        Command::Parse => write_json(&parse_segments(text), args.pretty),
        Command::Layout => {
            let lines = convert(text);
            let out = lines.iter().map(LineOut::from).collect::<Vec<_>>();
            write_json(&out, args.pretty)
        }
        Command::Render => {
            let cfg = load_config(&args)?;
            let options = RenderOptions::from_config(&cfg)?;
            write_text(&render_document(text, &options), args.out.as_deref())
        }
        Command::Text => {
            let options = PlainTextOptions {
                max_len: args.max_len,
            };
            write_text(&plain_text(text, &options), args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
