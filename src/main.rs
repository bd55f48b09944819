//! doc-stencil CLI
//!
//! Usage:
//!   doc-stencil [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -v, --values <FILE>     Field values (TOML)
//!   -s, --set <KEY=VALUE>   Set a single field (repeatable; lists split on the separator)
//!   -c, --config <FILE>     Render configuration (TOML)
//!   -o, --output <FILE>     Write the document to a file
//!       --check             Validate values without rendering
//!       --fields            List the template's fields
//!       --verbose           Log debug output to stderr
//!   -h, --help              Print help

use std::fmt::Display;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use doc_stencil::{
    render_with_config, validate, FieldValues, RenderConfig, RenderResult, TemplateFile, Violation,
};

/// Rejected values
const EXIT_REJECTED: i32 = 1;
/// Broken template, config, values file or I/O
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "doc-stencil")]
#[command(about = "Fill documentation templates from validated field values")]
struct Cli {
    /// Template file (reads from stdin if not provided)
    template: Option<PathBuf>,

    /// Field values file (TOML)
    #[arg(short, long)]
    values: Option<PathBuf>,

    /// Set a field as KEY=VALUE; overrides the values file. List fields
    /// take items joined by the list separator, e.g. tags="api, cache"
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Render configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Validate the values and report violations without rendering
    #[arg(long)]
    check: bool,

    /// List the template's fields and exit
    #[arg(long)]
    fields: bool,

    /// Log debug output to stderr (RUST_LOG is honoured otherwise)
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // If no template and stdin is a terminal (interactive), show intro help
    if cli.template.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let (source, filename) = match &cli.template {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => fail(
                EXIT_ERROR,
                format!("Error reading file '{}': {}", path.display(), e),
            ),
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => fail(EXIT_ERROR, format!("Error reading from stdin: {}", e)),
            }
        }
    };

    let template = match TemplateFile::from_str(&source) {
        Ok(t) => t,
        Err(e) => fail(EXIT_ERROR, e.format(&source, &filename)),
    };

    if cli.fields {
        print_fields(&template);
        return;
    }

    let config = match &cli.config {
        Some(path) => match RenderConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => fail(
                EXIT_ERROR,
                format!("Error loading config '{}': {}", path.display(), e),
            ),
        },
        None => RenderConfig::default(),
    };

    let file_values = match &cli.values {
        Some(path) => match FieldValues::from_file(path) {
            Ok(v) => v,
            Err(e) => fail(
                EXIT_ERROR,
                format!("Error loading values '{}': {}", path.display(), e),
            ),
        },
        None => FieldValues::new(),
    };
    let values = match FieldValues::from_pairs(&cli.set) {
        Ok(pairs) => {
            file_values.merged(pairs.split_lists(template.schema(), &config.list_separator))
        }
        Err(e) => fail(EXIT_ERROR, format!("Error: {}", e)),
    };

    if cli.check {
        let violations = validate(template.schema(), &values);
        if violations.is_empty() {
            println!("ok");
            return;
        }
        report_violations(&filename, &violations);
        process::exit(EXIT_REJECTED);
    }

    match render_with_config(template.schema(), &values, &config) {
        RenderResult::Rendered { document } => match &cli.output {
            Some(path) => {
                if let Err(e) = fs::write(path, document) {
                    fail(
                        EXIT_ERROR,
                        format!("Error writing '{}': {}", path.display(), e),
                    );
                }
            }
            None => print!("{}", document),
        },
        RenderResult::Rejected { violations } => {
            report_violations(&filename, &violations);
            process::exit(EXIT_REJECTED);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("doc_stencil=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn fail(code: i32, message: impl Display) -> ! {
    eprintln!("{}", message);
    process::exit(code);
}

fn report_violations(filename: &str, violations: &[Violation]) {
    eprintln!(
        "{}: {} problem{} with the supplied values",
        filename,
        violations.len(),
        if violations.len() == 1 { "" } else { "s" }
    );
    for violation in violations {
        eprintln!("  - {}", violation);
    }
}

fn print_fields(template: &TemplateFile) {
    if let Some(title) = &template.title {
        println!("{}", title);
        if let Some(description) = &template.description {
            println!("{}", description);
        }
        println!();
    }

    let schema = template.schema();
    if schema.fields().is_empty() {
        println!("(no fields)");
        return;
    }

    let unused: Vec<&str> = schema
        .unused_fields()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    let width = schema
        .fields()
        .iter()
        .map(|f| f.name.len())
        .max()
        .unwrap_or(0);

    for field in schema.fields() {
        let mut line = format!(
            "{:width$}  {:8}  {}",
            field.name,
            field.kind.to_string(),
            if field.required { "required" } else { "optional" },
            width = width
        );
        if let Some(allowed) = field.kind.allowed_values() {
            line.push_str(&format!("  one of: {}", allowed.join(" | ")));
        }
        if let Some(default) = &field.default {
            line.push_str(&format!("  default: {}", default));
        }
        if unused.contains(&field.name.as_str()) {
            line.push_str("  (not used in body)");
        }
        println!("{}", line);
        if let Some(description) = &field.description {
            println!("{:width$}  {}", "", description, width = width);
        }
    }
}

fn print_intro() {
    println!(
        r#"doc-stencil - Fill documentation templates from validated field values

USAGE:
    doc-stencil [OPTIONS] [TEMPLATE]
    cat adr.md | doc-stencil --set status=draft

OPTIONS:
    -v, --values <FILE>     Field values (TOML)
    -s, --set <KEY=VALUE>   Set a single field (repeatable)
    -c, --config <FILE>     Render configuration (TOML)
    -o, --output <FILE>     Write the document to a file
        --check             Validate values without rendering
        --fields            List the template's fields
        --verbose           Log debug output to stderr
    -h, --help              Print help

TEMPLATE FORMAT:
    +++
    title = "Architecture Decision Record"

    [[field]]
    name = "status"
    kind = "enum"
    required = true
    allowed = ["draft", "review", "published"]
    +++
    Status: {{{{status}}}}

Kinds: string, enum, number, boolean, list, date (YYYY-MM-DD).
Optional fields with no value render as [name]."#
    );
}
