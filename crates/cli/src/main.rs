//! CLI tool for generating PowerPoint decks from a topic.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use slidegen_core::config::DEFAULT_SLIDES;
use slidegen_core::{
    DeckOptions, Generation, GenerationRequest, GeneratorConfig, ImageSource, ModelVariant,
    OutlineGenerator, PPTX_CONTENT_TYPE,
};
use slidegen_pptx::{DeckAssembler, DeckReader, InspectedSlide};
use slidegen_providers::{GeminiClient, PexelsClient};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Generate slide decks with a language model.
#[derive(Parser, Debug)]
#[command(name = "slidegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a .pptx deck for a topic
    Generate(GenerateArgs),

    /// Print the normalized outline for a topic as JSON
    Outline(OutlineArgs),

    /// Print the titles and bullets of an existing deck
    Inspect {
        /// Deck to read (.pptx)
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct OutlineArgs {
    /// Presentation topic
    #[arg(short, long)]
    topic: String,

    /// Number of slides (3-15)
    #[arg(short, long, default_value_t = DEFAULT_SLIDES)]
    slides: usize,

    /// Model variant (gemini-2.5-pro, gemini-2.5-flash, gemini-1.5-pro)
    #[arg(short, long, default_value_t = ModelVariant::default())]
    model: ModelVariant,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Echo the raw model response to stderr
    #[arg(short, long)]
    debug: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    outline: OutlineArgs,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the deck to stdout instead of a file
    #[arg(long)]
    stdout: bool,

    /// Skip the image search
    #[arg(long)]
    no_images: bool,

    /// Pexels API key
    #[arg(long, env = "PEXELS_API_KEY", hide_env_values = true)]
    pexels_key: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &cli.command {
        Command::Generate(args) => generate_deck(args, cli.verbose),
        Command::Outline(args) => print_outline(args),
        Command::Inspect { input } => inspect_deck(input),
    }
}

/// Validate the request and run the outline generator.
fn run_generator(args: &OutlineArgs) -> Result<(GenerationRequest, Generation)> {
    let request = GenerationRequest::new(&args.topic, args.slides)?;

    let config = GeneratorConfig::new(args.api_key.clone().unwrap_or_default())
        .with_model(args.model)
        .with_debug(args.debug);
    config
        .validate()
        .context("Set GEMINI_API_KEY or pass --api-key")?;
    let model = GeminiClient::new(&config).context("Failed to set up the language model client")?;

    eprintln!("Generating {} slides with {}...", request.num_slides, config.model);
    let generation = OutlineGenerator::new(model)
        .with_debug(config.debug)
        .generate(&request.topic, request.num_slides);

    report_generation(&generation);
    Ok((request, generation))
}

/// Tell the user how the outline was produced.
fn report_generation(generation: &Generation) {
    if let Some(raw) = &generation.raw_response {
        eprintln!("--- raw model response ---");
        eprintln!("{}", raw);
        eprintln!("--------------------------");
    }

    match generation.outline.failure() {
        None => eprintln!(
            "Generated outline with {} slides",
            generation.outline.slides.len()
        ),
        Some(failure) => eprintln!("Warning: {}; using a template outline", failure),
    }
}

fn generate_deck(args: &GenerateArgs, verbose: bool) -> Result<()> {
    let (request, generation) = run_generator(&args.outline)?;

    let options = DeckOptions {
        include_images: !args.no_images,
    };
    let pexels = image_source(args)?;

    let mut assembler = DeckAssembler::new(options);
    if let Some(source) = &pexels {
        assembler = assembler.with_image_source(source as &dyn ImageSource);
    }

    let deck = assembler
        .assemble(&generation.outline.slides)
        .context("Failed to build the deck")?
        .into_inner();

    if args.stdout {
        std::io::stdout()
            .write_all(&deck)
            .context("Failed to write the deck to stdout")?;
        return Ok(());
    }

    let output_path = get_output_path(&request, args.output.as_deref())?;
    write_output(&output_path, &deck)?;
    eprintln!("Presentation ready: {}", output_path.display());
    if verbose {
        eprintln!("  {} bytes, {}", deck.len(), PPTX_CONTENT_TYPE);
    }

    Ok(())
}

/// Pexels client when images are wanted and a key is configured.
fn image_source(args: &GenerateArgs) -> Result<Option<PexelsClient>> {
    if args.no_images {
        return Ok(None);
    }

    match args.pexels_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(Some(PexelsClient::new(key)?)),
        _ => {
            log::info!("No Pexels key configured, slides will have no images");
            Ok(None)
        }
    }
}

fn print_outline(args: &OutlineArgs) -> Result<()> {
    let (_, generation) = run_generator(args)?;
    let json = serde_json::to_string_pretty(&generation.outline.slides)
        .context("Failed to serialize the outline")?;
    println!("{}", json);
    Ok(())
}

fn inspect_deck(input: &Path) -> Result<()> {
    let file =
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;

    let slides = DeckReader::new()
        .read(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", input.display()))?;

    print!("{}", render_slides(&slides));
    Ok(())
}

/// Plain-text listing of inspected slides.
fn render_slides(slides: &[InspectedSlide]) -> String {
    let mut out = String::new();

    for slide in slides {
        let title = slide.title.as_deref().unwrap_or("(no title)");
        out.push_str(&format!("Slide {}: {}\n", slide.number, title));
        for bullet in &slide.bullets {
            out.push_str(&format!("  - {}\n", bullet));
        }
        if slide.pictures > 0 {
            out.push_str(&format!("  [{} picture(s)]\n", slide.pictures));
        }
    }

    out
}

/// Determine where the deck is written.
fn get_output_path(request: &GenerationRequest, output_dir: Option<&Path>) -> Result<PathBuf> {
    let output_filename = request.deck_filename();

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => PathBuf::from(output_filename),
    };

    Ok(output_path)
}

/// Write the deck to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidegen_core::SlideRecord;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["slidegen", "generate", "--topic", "Solar Power"]).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.outline.topic, "Solar Power");
        assert_eq!(args.outline.slides, 5);
        assert_eq!(args.outline.model, ModelVariant::Gemini25Pro);
        assert!(!args.no_images);
        assert!(!args.stdout);
    }

    #[test]
    fn test_model_flag() {
        let cli = Cli::try_parse_from([
            "slidegen", "outline", "-t", "Rust", "--model", "gemini-2.5-flash", "-s", "7",
        ])
        .unwrap();
        let Command::Outline(args) = cli.command else {
            panic!("expected outline");
        };
        assert_eq!(args.model, ModelVariant::Gemini25Flash);
        assert_eq!(args.slides, 7);

        let bad = Cli::try_parse_from(["slidegen", "outline", "-t", "Rust", "--model", "gpt-4"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_out_of_range_slides_rejected_before_generation() {
        let args = OutlineArgs {
            topic: "Rust".to_string(),
            slides: 20,
            model: ModelVariant::default(),
            api_key: Some("key".to_string()),
            debug: false,
        };
        let err = run_generator(&args).unwrap_err();
        assert!(err.to_string().contains("between 3 and 15"));
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let args = OutlineArgs {
            topic: "Rust".to_string(),
            slides: 5,
            model: ModelVariant::default(),
            api_key: None,
            debug: false,
        };
        let err = run_generator(&args).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(format!("{err:#}").contains("API key"));
    }

    #[test]
    fn test_get_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("decks");
        let request = GenerationRequest::new("Solar Power Basics", 5).unwrap();

        let path = get_output_path(&request, Some(&nested)).unwrap();
        assert_eq!(path, nested.join("Solar_Power_Basics.pptx"));
        assert!(nested.is_dir());

        let path = get_output_path(&request, None).unwrap();
        assert_eq!(path, PathBuf::from("Solar_Power_Basics.pptx"));
    }

    #[test]
    fn test_output_path_stays_in_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("decks");

        for topic in ["../../escape here", "AI/ML", "..", r"..\up"] {
            let request = GenerationRequest::new(topic, 5).unwrap();
            let path = get_output_path(&request, Some(&nested)).unwrap();
            assert_eq!(path.parent(), Some(nested.as_path()), "{}", path.display());

            write_output(&path, b"deck").unwrap();
            assert!(path.is_file());
        }
        assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 4);
        assert!(nested.join("AI_ML.pptx").is_file());
    }

    #[test]
    fn test_written_deck_can_be_inspected() {
        let dir = tempfile::tempdir().unwrap();
        let slides = vec![
            SlideRecord::new("Intro", vec!["one".to_string(), "two".to_string()]),
            SlideRecord::new("Summary", vec![]),
        ];
        let deck = DeckAssembler::new(DeckOptions::default())
            .assemble(&slides)
            .unwrap()
            .into_inner();

        let path = dir.path().join("deck.pptx");
        write_output(&path, &deck).unwrap();

        let file = File::open(&path).unwrap();
        let inspected = DeckReader::new().read(BufReader::new(file)).unwrap();
        assert_eq!(
            render_slides(&inspected),
            "Slide 1: Intro\n  - one\n  - two\nSlide 2: Summary\n"
        );
    }

    #[test]
    fn test_render_slides_pictures_and_untitled() {
        let slides = vec![InspectedSlide {
            number: 3,
            title: None,
            bullets: vec![],
            pictures: 1,
        }];
        assert_eq!(render_slides(&slides), "Slide 3: (no title)\n  [1 picture(s)]\n");
    }
}
