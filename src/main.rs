//! umlboard CLI
//!
//! Usage:
//!   umlboard [--config <FILE>] render [FILE] [-o OUT]
//!   umlboard [--config <FILE>] export [FILE] [-o OUT]
//!   umlboard [--config <FILE>] generate [FILE] [-e URL] [-o OUT]
//!   umlboard demo

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use umlboard::{Editor, EditorConfig, GenerateClient};

#[derive(Parser)]
#[command(name = "umlboard")]
#[command(about = "Headless UML class-diagram engine")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import an XMI document, auto-layout it and emit the SVG rendering
    Render {
        /// Input XMI file (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import an XMI document and re-emit it in canonical form
    Export {
        /// Input XMI file (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Post an XMI document to the generation backend and save the archive
    Generate {
        /// Input XMI file (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Backend endpoint (overrides the configured one)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Output file (server-suggested filename if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the seeded demo session
    Demo,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EditorConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EditorConfig::default(),
    };

    match cli.command {
        Command::Render { input, output } => {
            let mut editor = import_editor(config, input.as_deref());
            let svg = editor.pump().unwrap_or_else(|| editor.render());
            write_output(output.as_deref(), svg.as_bytes());
        }
        Command::Export { input, output } => {
            let editor = import_editor(config, input.as_deref());
            write_output(output.as_deref(), editor.export_xmi().as_bytes());
        }
        Command::Generate {
            input,
            endpoint,
            output,
        } => {
            let editor = import_editor(config, input.as_deref());
            let endpoint = endpoint.unwrap_or_else(|| editor.config.generate_endpoint.clone());
            let client = GenerateClient::new(endpoint);
            match client.generate(&editor.export_xmi()) {
                Ok(archive) => {
                    let path = output.unwrap_or_else(|| PathBuf::from(&archive.filename));
                    if let Err(e) = fs::write(&path, &archive.bytes) {
                        eprintln!("Error writing '{}': {}", path.display(), e);
                        std::process::exit(1);
                    }
                    eprintln!("Wrote {} bytes to {}", archive.bytes.len(), path.display());
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Demo => {
            let mut editor = Editor::seeded();
            editor.config = config;
            let svg = editor.pump().unwrap_or_else(|| editor.render());
            write_output(None, svg.as_bytes());
        }
    }
}

/// Build an editor session from an XMI document on disk or stdin.
fn import_editor(config: EditorConfig, input: Option<&Path>) -> Editor {
    let xml = read_input(input);
    let mut editor = Editor::with_config(config);
    if let Err(e) = editor.import_xmi(&xml) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    editor
}

fn read_input(input: Option<&Path>) -> String {
    match input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn write_output(output: Option<&Path>, bytes: &[u8]) {
    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, bytes) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => {
            let mut stdout = io::stdout();
            use std::io::Write;
            if stdout.write_all(bytes).is_err() {
                std::process::exit(1);
            }
        }
    }
}
