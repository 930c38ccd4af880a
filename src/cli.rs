use crate::config::{LayoutOptions, load_options};
use crate::layout::compute_layout_with_options;
use crate::layout_dump::layout_to_json;
use crate::parser::parse_flow;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flowlanes", version, about = "Lay out a journey flow as positioned nodes and routed edges")]
pub struct Args {
    /// Input flow document (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Options file (spacing, node sizes, position overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Log pipeline stages to stderr (same as RUST_LOG=flow_lanes=debug)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = load_options(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let json = layout_document(&input, &options, !args.compact)?;
    write_output(&json, args.output.as_deref())
}

fn layout_document(input: &str, options: &LayoutOptions, pretty: bool) -> Result<String> {
    let graph = parse_flow(input)?;
    // Fallbacks are already logged at `warn` while the layout runs.
    let layout = compute_layout_with_options(&graph, options);
    Ok(layout_to_json(&layout, pretty)?)
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "flow_lanes=debug" } else { "flow_lanes=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?;
        return Ok(());
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context as LayerContext, Layer, SubscriberExt};

    #[derive(Clone, Default)]
    struct CountEvents(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for CountEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
            if *event.metadata().level() <= tracing::Level::INFO {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn each_issue_is_logged_once() {
        let counter = CountEvents::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let input = r#"{
            "nodes": [ { "id": "t", "type": "trigger" } ],
            "edges": [ { "id": "e1", "from": "t", "to": "ghost" } ]
        }"#;

        let json = tracing::subscriber::with_default(subscriber, || {
            layout_document(input, &LayoutOptions::default(), false)
        })
        .expect("layout");

        assert!(json.contains("ghost"));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn parses_short_flags() {
        let args = Args::try_parse_from(["flowlanes", "-i", "flow.json", "-c", "opts.json", "--compact"])
            .expect("args should parse");
        assert_eq!(args.input.as_deref(), Some(Path::new("flow.json")));
        assert_eq!(args.config.as_deref(), Some(Path::new("opts.json")));
        assert!(args.compact);
        assert!(!args.verbose);
    }

    #[test]
    fn writes_layout_to_file() {
        let dir = std::env::temp_dir().join(format!("flowlanes-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("layout.json");
        write_output("{}", Some(&path)).expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "{}\n");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
