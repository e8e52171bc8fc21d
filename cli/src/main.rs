//! policy-extract CLI - insurance policy table extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use policy_extract::render::{self, JsonFormat, XLSX_FILE_NAME};
use policy_extract::{
    normalize, ExtractOptions, ExtractionConfig, NumberLocale, PolicyExtractor, TextExtractor,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Environment variable naming a default config file.
const CONFIG_ENV: &str = "POLICY_EXTRACT_CONFIG";

#[derive(Parser)]
#[command(name = "policy-extract")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract assured name, benefits and insurer from policy PDFs", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output spreadsheet
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the policy table and save it as a spreadsheet
    Extract(ExtractArgs),

    /// Print the text extracted from a PDF
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the normalized text used for field extraction
        #[arg(short, long)]
        normalized: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Args, Default)]
struct ExtractArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output spreadsheet
    #[arg(short, long, value_name = "FILE", default_value = XLSX_FILE_NAME)]
    output: PathBuf,

    /// JSON file with insurers, benefit layout, sentinel and locale
    #[arg(short, long, value_name = "FILE", env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Number locale for amounts (e.g. "en_NZ", "de_DE"); defaults to the process locale
    #[arg(long, value_name = "TAG")]
    locale: Option<String>,

    /// Print the extracted PDF text before the table
    #[arg(long)]
    show_text: bool,

    /// Print the extraction as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Compact JSON output
    #[arg(long, requires = "json")]
    compact: bool,

    /// Fail if any page cannot be read
    #[arg(long)]
    strict: bool,

    /// Directory with an ONNX token-classification model for name recognition
    #[arg(long, value_name = "DIR")]
    ner_model: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    // Resolved once; the library only sees this injected value.
    let startup_locale = NumberLocale::from_env();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract(args)) => cmd_extract(&args, startup_locale),
        Some(Commands::Text {
            input,
            normalized,
            output,
        }) => cmd_text(&input, normalized, output.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                let config = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
                let args = shorthand_args(input, cli.output, config);
                cmd_extract(&args, startup_locale)
            } else {
                println!("{}", "Usage: policy-extract <FILE> [OUTPUT]".yellow());
                println!("       policy-extract --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Arguments for `policy-extract <FILE> [OUTPUT]`.
fn shorthand_args(
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> ExtractArgs {
    ExtractArgs {
        input,
        output: output.unwrap_or_else(|| PathBuf::from(XLSX_FILE_NAME)),
        config,
        ..Default::default()
    }
}

/// Config file, then `--locale`; the startup locale fills in when neither sets one.
fn load_config(
    args: &ExtractArgs,
    startup_locale: NumberLocale,
) -> policy_extract::Result<ExtractionConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractionConfig::from_json_file_with_locale(path, startup_locale)?,
        None => ExtractionConfig::default().with_locale(startup_locale),
    };

    if let Some(tag) = &args.locale {
        config.locale = NumberLocale::from_tag(tag)?;
    }

    Ok(config)
}

#[cfg(feature = "onnx")]
fn install_model(dir: &Path) -> CliResult {
    let recognizer = policy_extract::ner::OnnxRecognizer::from_dir(dir)?;
    policy_extract::ner::install(Box::new(recognizer))?;
    Ok(())
}

#[cfg(not(feature = "onnx"))]
fn install_model(_dir: &Path) -> CliResult {
    Err("--ner-model needs a build with the `onnx` feature".into())
}

fn cmd_extract(args: &ExtractArgs, startup_locale: NumberLocale) -> CliResult {
    let config = load_config(args, startup_locale)?;

    if let Some(dir) = &args.ner_model {
        install_model(dir)?;
    }

    let options = if args.strict {
        ExtractOptions::new().strict()
    } else {
        ExtractOptions::new().lenient()
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );

    pb.set_message("Reading PDF...");
    let raw_text = TextExtractor::open_with_options(&args.input, options)?.extract_text()?;

    pb.set_message("Extracting fields...");
    let extraction = PolicyExtractor::new()
        .with_config(config.clone())
        .extract_from_text(raw_text);

    pb.set_message("Writing spreadsheet...");
    render::write_xlsx(&extraction.table, &args.output)?;
    pb.finish_and_clear();

    println!("{} {}", "Uploaded PDF File:".bold(), args.input.display());

    if args.show_text {
        println!(
            "\n{} ({} words)",
            "Extracted Text:".cyan().bold(),
            extraction.word_count()
        );
        println!("{}", extraction.raw_text);
    }

    if args.json {
        let format = if args.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", render::to_json(&extraction, format)?);
    } else {
        println!("\n{}", "Table:".cyan().bold());
        print!("{}", render::to_text_table(&extraction.table));
    }

    if !extraction.has_assured_name(&config.sentinel) {
        println!("{}", "No assured name found".yellow());
    }
    if !extraction.has_insurer(&config.sentinel) {
        println!("{}", "No known insurer found".yellow());
    }

    println!("{} {}", "Saved to".green(), args.output.display());

    Ok(())
}

fn cmd_text(input: &Path, normalized: bool, output: Option<&Path>) -> CliResult {
    let options = ExtractOptions::new().lenient();
    let mut text = TextExtractor::open_with_options(input, options)?.extract_text()?;

    if normalized {
        text = normalize(&text);
    }

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "policy-extract".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Insurance policy table extraction tool");
    println!();
    println!("License: MIT");
}
