use botflo_editor::prelude::*;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Inspect, validate and scaffold chatbot conversation flows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional editor config JSON (history limit, connection policy, ...)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of a saved flow document
    Inspect {
        /// Path to the flow document JSON file
        path: PathBuf,
    },
    /// Check a saved flow's structure and every node's fields
    Validate {
        /// Path to the flow document JSON file
        path: PathBuf,
    },
    /// Write a built-in template out as a flow document
    Template {
        /// Template id, see `templates`
        name: String,
        /// Where to write the document (defaults to `<name>.json`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the built-in templates
    Templates,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("botflo_editor=info,warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EditorConfig::default(),
    };

    match cli.command {
        Command::Inspect { path } => run_inspect(&path, config),
        Command::Validate { path } => run_validate(&path, config),
        Command::Template { name, output } => run_template(&name, output, config),
        Command::Templates => run_list_templates(),
    }
}

/// Loads a document into a fresh session. Structural problems abort here.
fn open_session(path: &PathBuf, config: EditorConfig) -> EditorSession {
    let document = FlowDocument::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load flow: {}", e)));
    let mut session = EditorSession::new(NodeCatalog::default(), config);
    session
        .import_state(document)
        .unwrap_or_else(|e| exit_with_error(&format!("Flow is not importable: {}", e)));
    session
}

fn run_inspect(path: &PathBuf, config: EditorConfig) {
    let session = open_session(path, config);

    println!("\n--- {} ---", session.name());
    println!("Welcome:   {}", session.settings().welcome_message);
    println!("Fallback:  {}", session.settings().fallback_message);

    println!("\n--- Nodes ({}) ---", session.nodes().len());
    let counts = session.nodes().list().map(|n| n.kind()).counts();
    for (kind, count) in counts.iter().sorted() {
        println!("  {:<12} {}", kind, count);
    }
    for node in session.nodes().list() {
        println!(
            "  [{}] {:<12} {:<24} at {}",
            node.id(),
            node.kind(),
            node.title(),
            node.position
        );
    }

    println!("\n--- Connections ({}) ---", session.connections().len());
    for c in session.connections().list() {
        println!("  {} ({}) -> {} ({})", c.from, c.from_port, c.to, c.to_port);
    }

    let bounds = session.bounds();
    println!(
        "\nCanvas extent: {}x{} from ({}, {})",
        bounds.width(),
        bounds.height(),
        bounds.min_x,
        bounds.min_y
    );
}

fn run_validate(path: &PathBuf, config: EditorConfig) {
    let start = Instant::now();
    let session = open_session(path, config);
    let reports = session.validate_all();

    let mut error_count = 0;
    for (id, report) in &reports {
        error_count += report.errors.len();
        let title = session.node(id).map(Node::title).unwrap_or_default();
        println!("\n[{}] {}", id, title);
        for error in &report.errors {
            println!("  error:   {}", error);
        }
        for warning in &report.warnings {
            println!("  warning: {}", warning);
        }
    }

    println!(
        "\nChecked {} nodes in {:?}: {} error(s), {} node(s) with findings",
        session.nodes().len(),
        start.elapsed(),
        error_count,
        reports.len()
    );
    if error_count > 0 {
        std::process::exit(1);
    }
}

fn run_template(name: &str, output: Option<PathBuf>, config: EditorConfig) {
    let library = TemplateLibrary::builtin();
    let template = library.get(name).unwrap_or_else(|| {
        exit_with_error(&format!(
            "Unknown template '{}'. Available: {}",
            name,
            library.iter().map(|t| t.id.as_str()).join(", ")
        ))
    });

    let mut session = EditorSession::new(NodeCatalog::default(), config);
    session
        .load_template(template)
        .unwrap_or_else(|e| exit_with_error(&format!("Template failed to load: {}", e)));

    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.json", name)));
    session
        .export_state()
        .save(&output)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to save flow: {}", e)));
    println!(
        "Wrote '{}' ({} nodes, {} connections) to {}",
        template.name,
        session.nodes().len(),
        session.connections().len(),
        output.display()
    );
}

fn run_list_templates() {
    println!("\n--- Templates ---");
    for template in TemplateLibrary::builtin().iter() {
        println!(
            "  {:<18} {:<24} {}",
            template.id, template.name, template.description
        );
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
