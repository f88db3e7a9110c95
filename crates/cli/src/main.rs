use mandrake_core::{
    catalog::{self, CATALOG},
    config::Config,
    gemini_studio,
    prompt,
    selection::{Selection, SelectionEffect},
    studio::{EditStatus, Studio},
    SourceImage,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Edit photos with preset instructions using Gemini", long_about = None)]
struct Args {
    /// Photo to edit (PNG, JPEG or WEBP)
    image: Option<PathBuf>,

    /// Custom request appended after the selected tools
    #[arg(trailing_var_arg = true)]
    prompt: Vec<String>,

    /// Toggle a tool by id (repeatable), applied on top of the default selection
    #[arg(short, long = "tool", value_name = "ID")]
    tools: Vec<String>,

    /// Start from an empty selection instead of the defaults
    #[arg(long, default_value_t = false)]
    no_defaults: bool,

    /// Override the model defined in .env
    #[arg(short, long)]
    model: Option<String>,

    /// Directory where the edited image is saved
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List available tools and exit
    #[arg(long)]
    list_tools: bool,

    /// Print tool listing as JSON
    #[arg(long, requires = "list_tools")]
    json: bool,

    /// Print the composed prompt without calling the API
    #[arg(long)]
    dry_run: bool,

    /// Pick tools and generate from an interactive session
    #[arg(short, long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    if args.list_tools {
        return list_tools(args.json);
    }

    let selection = selection_from_args(&args)?;

    if args.dry_run {
        println!("{}", prompt::compose(&selection.active_tools(), selection.custom_text()));
        return Ok(());
    }

    // Load config and apply CLI overrides
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(m) = args.model {
        config.model_name = m;
    }
    if let Some(dir) = args.output {
        config.output_dir = dir;
    }
    tracing::debug!(model = %config.model_name, output = %config.output_dir.display(), "configuration loaded");

    let mut studio = gemini_studio(&config).context("Failed to initialize Gemini client")?;
    studio.set_selection(selection);

    if args.interactive {
        if let Some(path) = &args.image {
            load_photo(&mut studio, path)?;
        }
        return run_interactive(studio, &config).await;
    }

    let Some(path) = args.image else {
        bail!("No image given. Pass a photo path or use --interactive");
    };
    load_photo(&mut studio, &path)?;

    run_generation(&mut studio, &config).await?;
    if matches!(studio.status(), EditStatus::Failed(_)) {
        std::process::exit(1);
    }
    Ok(())
}

/// Applies `--no-defaults`, `--tool` and the trailing request to the default selection.
fn selection_from_args(args: &Args) -> Result<Selection> {
    let mut selection = if args.no_defaults {
        Selection::empty()
    } else {
        Selection::default()
    };

    for id in &args.tools {
        let (next, _) = selection
            .toggle(id)
            .with_context(|| format!("Unknown tool '{}'. Use --list-tools to see available ids", id))?;
        selection = next;
    }

    Ok(selection.with_custom_text(args.prompt.join(" ")))
}

fn list_tools(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(CATALOG)?);
        return Ok(());
    }

    let defaults = Selection::default();
    println!("Available tools:");
    for tool in CATALOG {
        let marker = if defaults.is_active(tool.id) { "*" } else { " " };
        println!(
            "{} {} {:<15} [{}] {}",
            marker, tool.icon, tool.id, tool.category, tool.description
        );
    }
    println!("(* = selected by default)");
    Ok(())
}

fn load_photo(studio: &mut Studio, path: &Path) -> Result<()> {
    let image = SourceImage::from_path(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?;
    studio.select_image(image);
    Ok(())
}

/// Runs one generation with a spinner and reports the outcome.
async fn run_generation(studio: &mut Studio, config: &Config) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.green} {msg}")?,
    );
    spinner.set_message(format!("Editing with {}...", config.model_name));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let status = studio.generate().await.clone();
    spinner.finish_and_clear();

    match status {
        EditStatus::Succeeded(_) => {
            let path = studio
                .save_result(&config.output_dir)
                .context("Failed to save edited image")?;
            println!("Saved {}", path.display());
        }
        EditStatus::Failed(message) => eprintln!("Falha na missão: {}", message),
        EditStatus::Idle | EditStatus::Loading => {}
    }
    Ok(())
}

fn print_menu(studio: &Studio) {
    let selection = studio.selection();
    println!();
    for (i, tool) in CATALOG.iter().enumerate() {
        let marker = if selection.is_active(tool.id) { "x" } else { " " };
        println!("  {}. [{}] {} {} - {}", i + 1, marker, tool.icon, tool.name, tool.description);
    }
    if !selection.custom_text().is_empty() {
        println!("  Pedido: {}", selection.custom_text());
    }
    match studio.original_image() {
        Some(image) => {
            let (w, h) = image.dimensions();
            println!("  Foto: {}x{} ({})", w, h, image.mime().as_str());
        }
        None => println!("  Foto: nenhuma"),
    }
    println!("Commands: <n|id> toggle, t <text> request, p prompt, g generate, o <path> photo, r reset, q quit");
}

fn read_line(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

async fn run_interactive(mut studio: Studio, config: &Config) -> Result<()> {
    print_menu(&studio);

    while let Some(line) = read_line("> ")? {
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.as_str(), ""),
        };

        match command {
            "" => continue,
            "q" | "quit" => break,
            "p" => println!("{}", studio.prompt()),
            "t" => studio.set_custom_text(rest),
            "g" => {
                if !studio.can_generate() {
                    // Mirrors the disabled trigger; begin_generate records why
                    if let Some(message) = studio.begin_generate().err() {
                        eprintln!("{}", message);
                    }
                    continue;
                }
                run_generation(&mut studio, config).await?;
            }
            "o" => {
                if let Err(e) = load_photo(&mut studio, Path::new(rest)) {
                    eprintln!("{:#}", e);
                }
            }
            "r" => studio.reset(),
            other => toggle(&mut studio, other)?,
        }
        print_menu(&studio);
    }

    Ok(())
}

fn toggle(studio: &mut Studio, token: &str) -> Result<()> {
    let id = match token.parse::<usize>() {
        Ok(n) if (1..=CATALOG.len()).contains(&n) => CATALOG[n - 1].id,
        _ => match catalog::find(token) {
            Some(tool) => tool.id,
            None => {
                eprintln!("Unknown command or tool: {}", token);
                return Ok(());
            }
        },
    };

    if let Some(SelectionEffect::FocusCustomText) = studio.toggle_tool(id)? {
        if let Some(text) = read_line("Pedido customizado: ")? {
            if !text.is_empty() {
                studio.set_custom_text(text);
            }
        }
    }
    Ok(())
}
