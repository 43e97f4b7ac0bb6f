use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use road_netgen::config::Settings;
use road_netgen::generation::{NetworkModel, Pipeline, RawDraft};
use road_netgen::parser::{describe_draft, edit_draft, AutoParser, JsonDraftParser};
use road_netgen::render::{write_artifacts, NetworkRenderer, RenderMethod};

#[derive(Parser)]
#[command(name = "road_netgen")]
#[command(about = "Generate road networks from plain-language descriptions")]
struct Cli {
    /// Description of the network, e.g. "4-way junction, 2 lanes per direction, 200 m"
    #[arg(long, short)]
    description: Option<String>,

    /// JSON draft file to generate from instead of a description
    #[arg(long, conflicts_with = "description")]
    draft: Option<PathBuf>,

    /// Read one description per line from stdin
    #[arg(long, short, conflicts_with_all = ["description", "draft"])]
    interactive: bool,

    /// In interactive mode, show each parsed draft and allow param=value edits before generating
    #[arg(long, requires = "interactive")]
    review: bool,

    /// TOML settings file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// File name stem for exported files
    #[arg(long, short, default_value = "network")]
    output: String,

    /// Directory for exported files, overriding the settings
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output format, overriding the settings
    #[arg(long, short, value_enum)]
    render: Option<RenderMethod>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,road_netgen=info"))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::resolve(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }
    if let Some(method) = cli.render {
        settings.render = method;
    }
    let pipeline = settings.pipeline();

    if cli.interactive {
        return run_interactive(&pipeline, &settings, &cli.output, cli.review);
    }

    let model = if let Some(path) = &cli.draft {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read draft {}", path.display()))?;
        pipeline.generate_from_description(&JsonDraftParser::new(), &text)?
    } else if let Some(description) = &cli.description {
        pipeline.generate_from_description(&AutoParser::new()?, description)?
    } else {
        bail!("Nothing to generate: pass --description, --draft or --interactive");
    };

    emit(&model, &settings, &cli.output)
}

/// Generates one network per input line until EOF or `quit`.
/// A failing description is reported and the session carries on.
fn run_interactive(
    pipeline: &Pipeline,
    settings: &Settings,
    stem: &str,
    review: bool,
) -> Result<()> {
    let parser = AutoParser::new()?;
    let mut input = std::io::stdin().lock();
    let mut generated = 0;

    println!("Describe a road network, one per line. Type 'quit' to exit.");
    while let Some(line) = prompt(&mut input, "> ")? {
        if line.is_empty() {
            continue;
        }
        if matches!(line.as_str(), "quit" | "exit") {
            break;
        }

        let draft = match pipeline.parse_description(&parser, &line) {
            Ok(draft) => draft,
            Err(err) => {
                eprintln!("Error: {err:#}");
                continue;
            }
        };
        let draft = if review {
            match review_draft(&mut input, draft)? {
                Some(draft) => draft,
                None => {
                    println!("Discarded.");
                    continue;
                }
            }
        } else {
            draft
        };

        match pipeline.generate(&draft) {
            Ok(model) => {
                generated += 1;
                emit(&model, settings, &format!("{stem}_{generated}"))?;
            }
            Err(err) => eprintln!("Error: {err:#}"),
        }
    }

    info!("Generated {generated} networks");
    Ok(())
}

/// Next trimmed input line, `None` at EOF
fn prompt(input: &mut impl BufRead, marker: &str) -> Result<Option<String>> {
    print!("{marker}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Lets the user edit a parsed draft. `None` when it is cancelled.
fn review_draft(input: &mut impl BufRead, mut draft: RawDraft) -> Result<Option<RawDraft>> {
    print_draft(&draft)?;
    println!("Edit with param=value, 'done' to generate, 'cancel' to discard.");

    while let Some(line) = prompt(input, "review> ")? {
        match line.as_str() {
            "" => {}
            "done" | "d" => return Ok(Some(draft)),
            "cancel" | "c" => return Ok(None),
            assignment => match edit_draft(&mut draft, assignment) {
                Ok(()) => print_draft(&draft)?,
                Err(err) => eprintln!("Error: {err:#}"),
            },
        }
    }
    Ok(None)
}

fn print_draft(draft: &RawDraft) -> Result<()> {
    println!("Parameters:");
    for line in describe_draft(draft)? {
        println!("  {line}");
    }
    Ok(())
}

fn emit(model: &NetworkModel, settings: &Settings, stem: &str) -> Result<()> {
    let artifacts = settings.render.renderer().render(model)?;

    if settings.render.is_terminal() {
        for artifact in &artifacts {
            println!("{}", artifact.contents);
        }
        return Ok(());
    }

    for path in write_artifacts(&settings.output_dir, stem, &artifacts)? {
        println!("{}", path.display());
    }
    Ok(())
}
