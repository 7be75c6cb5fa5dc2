//! br-docs CLI - Command-line interface for Brazilian document numbers
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to toolkit operations
//! - Handles external concerns like file I/O, process exit codes, and terminal output
//! - Provides clean separation between user interface and checksum logic

use anyhow::{Context, Result};
use br_docs::{
    BatchOptions, BrazilianState, Country, DocumentToolkit, DocumentType, GeneratedDocument,
    LicenseCategory, OutputFormat, ReportFormatter, ReportOptions, ToolkitConfig,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// br-docs - Brazilian document number toolkit
#[derive(Parser)]
#[command(name = "br-docs")]
#[command(version)]
#[command(about = "Generate, validate and format Brazilian document numbers")]
#[command(long_about = "br-docs generates CPF and CNH numbers with correct check digits, validates candidates in bulk, applies display formatting and builds WhatsApp click-to-chat links. Generated numbers are for testing only.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate numbers with valid check digits
    Generate {
        /// Document type
        #[arg(value_enum)]
        document: DocumentArg,

        /// How many numbers to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Append an issuing state code (CNH only), e.g. SP or 25
        #[arg(long)]
        state: Option<String>,

        /// License category shown alongside a CNH (CNH only)
        #[arg(long)]
        category: Option<String>,

        /// Print digits without separators
        #[arg(long)]
        raw: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Validate candidate numbers
    Validate {
        /// Document type
        #[arg(value_enum)]
        document: DocumentArg,

        /// Candidates to check; reads one per line from --file or stdin when empty
        candidates: Vec<String>,

        /// File with one candidate per line ("-" for stdin)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Accept display separators such as "123.456.789-09"
        #[arg(long)]
        strip: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Only list invalid and malformed candidates
        #[arg(long)]
        failures_only: bool,

        /// Stop at the first malformed candidate
        #[arg(long)]
        fail_fast: bool,

        /// Disable parallel processing
        #[arg(long)]
        no_parallel: bool,
    },

    /// Apply display formatting to a raw number
    Format {
        /// Document type
        #[arg(value_enum)]
        document: DocumentArg,

        /// Raw digits
        digits: String,
    },

    /// Build a WhatsApp click-to-chat link
    Whatsapp {
        /// Phone number, punctuation allowed
        phone: String,

        /// Country code, e.g. br, pt, us
        #[arg(long)]
        country: Option<String>,

        /// Message to prefill
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List supported document types
    Types,

    /// List issuing states and their codes
    States,

    /// List driver's license categories
    Categories,

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum DocumentArg {
    Cpf,
    Cnh,
}

impl From<DocumentArg> for DocumentType {
    fn from(arg: DocumentArg) -> Self {
        match arg {
            DocumentArg::Cpf => DocumentType::Cpf,
            DocumentArg::Cnh => DocumentType::Cnh,
        }
    }
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        }
    }
}

fn run_command(cli: Cli) -> Result<i32> {
    let use_colors = !cli.no_color;
    match cli.command {
        Commands::Generate { document, count, seed, state, category, raw, format } => {
            let config = load_config(cli.config)?;
            let args = GenerateArgs { document, count, seed, state, category, raw, format };
            run_generate(config, args)
        }
        Commands::Validate {
            document,
            candidates,
            file,
            strip,
            format,
            failures_only,
            fail_fast,
            no_parallel,
        } => {
            let config = load_config(cli.config)?;
            let candidates = collect_candidates(candidates, file)?;
            let options = BatchOptions {
                parallel: !no_parallel,
                fail_fast,
                strip_separators: strip,
            };
            let report_options =
                ReportOptions { use_colors, only_failures: failures_only, max_entries: None };
            run_validate(config, document.into(), &candidates, &options, report_options, format)
        }
        Commands::Format { document, digits } => {
            let config = load_config(cli.config)?;
            run_format(config, document.into(), &digits)
        }
        Commands::Whatsapp { phone, country, message } => {
            let config = load_config(cli.config)?;
            run_whatsapp(config, country.as_deref(), &phone, message.as_deref())
        }
        Commands::Types => run_list_types(load_config(cli.config)?),
        Commands::States => Ok(run_list_states()),
        Commands::Categories => Ok(run_list_categories()),
        Commands::ValidateConfig { config_file } => {
            Ok(run_validate_config(config_file.or(cli.config)))
        }
    }
}

/// Load the explicit config file, or look for a default one in the working directory
fn load_config(path: Option<PathBuf>) -> Result<ToolkitConfig> {
    match path {
        Some(path) => ToolkitConfig::load_from_file(&path)
            .with_context(|| format!("loading {}", path.display())),
        None => ToolkitConfig::discover(".").context("loading default configuration"),
    }
}

struct GenerateArgs {
    document: DocumentArg,
    count: usize,
    seed: Option<u64>,
    state: Option<String>,
    category: Option<String>,
    raw: bool,
    format: OutputFormatArg,
}

fn run_generate(config: ToolkitConfig, args: GenerateArgs) -> Result<i32> {
    let document: DocumentType = args.document.into();
    let mut toolkit = DocumentToolkit::new_with_config(config)?;
    if let Some(seed) = args.seed {
        toolkit = toolkit.with_seed(seed);
    }

    if document != DocumentType::Cnh && (args.state.is_some() || args.category.is_some()) {
        eprintln!("--state and --category only apply to cnh");
        return Ok(2);
    }

    let category = args
        .category
        .as_deref()
        .map(str::parse::<LicenseCategory>)
        .transpose()?;

    let state = args.state.as_deref().map(str::parse::<BrazilianState>).transpose()?;

    let generated = if document == DocumentType::Cnh
        && (state.is_some() || toolkit.config().default_state()?.is_some())
    {
        (0..args.count)
            .map(|_| toolkit.generate_cnh_for_state(state))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        toolkit.generate_many(document, args.count)?
    };

    print!("{}", render_generated(&generated, category, args.format, args.raw)?);
    if let (Some(category), OutputFormatArg::Human) = (category, args.format) {
        eprintln!("Category: {category} ({})", category.description());
    }

    Ok(0)
}

/// Stdout text for a generated batch; JSON output carries the category alongside the numbers
fn render_generated(
    generated: &[GeneratedDocument],
    category: Option<LicenseCategory>,
    format: OutputFormatArg,
    raw: bool,
) -> Result<String> {
    let formatter = ReportFormatter::default();
    match (format, category) {
        (OutputFormatArg::Json, Some(category)) => {
            let output = serde_json::json!({
                "category": {
                    "code": category.as_str(),
                    "label": category.label(),
                    "description": category.description(),
                },
                "documents": generated,
            });
            Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
        }
        _ => Ok(formatter.format_generated(generated, format.into(), raw)?),
    }
}

/// Candidates from arguments, else from --file, else from stdin
fn collect_candidates(candidates: Vec<String>, file: Option<PathBuf>) -> Result<Vec<String>> {
    if !candidates.is_empty() {
        return Ok(candidates);
    }

    let content = match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
            .with_context(|| format!("reading candidates from {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("reading candidates from stdin")?;
            buffer
        }
    };

    Ok(parse_candidate_lines(&content))
}

/// One candidate per non-blank line, surrounding whitespace removed
fn parse_candidate_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn run_validate(
    config: ToolkitConfig,
    document: DocumentType,
    candidates: &[String],
    options: &BatchOptions,
    report_options: ReportOptions,
    format: OutputFormatArg,
) -> Result<i32> {
    if candidates.is_empty() {
        eprintln!("No {document} candidates to validate");
        return Ok(2);
    }

    let toolkit = DocumentToolkit::new_with_config(config)?;
    let report = toolkit.validate_batch(document, candidates, options)?;

    let formatter = ReportFormatter::new(report_options);
    print!("{}", formatter.format_report(&report, format.into())?);

    if report.has_failures() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn run_format(config: ToolkitConfig, document: DocumentType, digits: &str) -> Result<i32> {
    let toolkit = DocumentToolkit::new_with_config(config)?;
    match toolkit.format(document, digits) {
        Ok(formatted) => {
            println!("{formatted}");
            Ok(0)
        }
        Err(e) if e.is_invalid_format() => {
            eprintln!("❌ {e}");
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

fn run_whatsapp(
    config: ToolkitConfig,
    country: Option<&str>,
    phone: &str,
    message: Option<&str>,
) -> Result<i32> {
    let toolkit = DocumentToolkit::new_with_config(config)?;
    let link = toolkit.whatsapp_link(country, phone, message)?;
    println!("{link}");
    Ok(0)
}

fn run_list_types(config: ToolkitConfig) -> Result<i32> {
    println!("📋 Document Types\n");
    for doc in DocumentType::all() {
        let spec = doc.spec();
        println!("  {} - {}", doc, doc.display_name());
        println!(
            "    {} digits ({} free, {} check), pattern {}",
            spec.total_len(),
            spec.free_digit_count,
            spec.check_digit_count,
            config.pattern_for(*doc)
        );
    }
    println!("\n  cnh with state: pattern {}", config.cnh_state_pattern);
    Ok(0)
}

fn run_list_states() -> i32 {
    for state in BrazilianState::all() {
        println!("  {} {}  {}", state.code_str(), state.abbreviation(), state.name());
    }
    0
}

fn run_list_categories() -> i32 {
    for category in LicenseCategory::all() {
        println!("  {:<3} {:<20} {}", category.as_str(), category.label(), category.description());
    }
    0
}

fn run_validate_config(config_path: Option<PathBuf>) -> i32 {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("br_docs.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match ToolkitConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");
            println!("📊 Configuration summary:");
            for doc in DocumentType::all() {
                println!("  {}: {}", doc, config.pattern_for(*doc));
            }
            println!("  cnh with state: {}", config.cnh_state_pattern);
            if let Some(state) = &config.default_state {
                println!("  Default state: {state}");
            }
            if let Ok(country) = Country::lookup(&config.default_country) {
                println!("  Default country: {} (+{})", country.name, country.dial_code);
            }
            0
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {e}");
            1
        }
    }
}

/// `--verbose` wins, then `RUST_LOG`, then warnings only
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_logging(verbose: bool, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_target(false)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn generate_args(document: DocumentArg) -> GenerateArgs {
        GenerateArgs {
            document,
            count: 3,
            seed: Some(7),
            state: None,
            category: None,
            raw: false,
            format: OutputFormatArg::Json,
        }
    }

    #[test]
    fn test_generate_command() {
        let result = run_generate(ToolkitConfig::default(), generate_args(DocumentArg::Cpf));
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_generate_with_state() {
        let args = GenerateArgs {
            state: Some("SP".to_string()),
            category: Some("AB".to_string()),
            ..generate_args(DocumentArg::Cnh)
        };
        assert_eq!(run_generate(ToolkitConfig::default(), args).unwrap(), 0);
    }

    #[test]
    fn test_generate_rejects_state_for_cpf() {
        let args = GenerateArgs { state: Some("SP".to_string()), ..generate_args(DocumentArg::Cpf) };
        assert_eq!(run_generate(ToolkitConfig::default(), args).unwrap(), 2);
    }

    #[test]
    fn test_generate_unknown_category() {
        let args =
            GenerateArgs { category: Some("Z".to_string()), ..generate_args(DocumentArg::Cnh) };
        assert!(run_generate(ToolkitConfig::default(), args).is_err());
    }

    #[test]
    fn test_validate_command() {
        let options = BatchOptions::default();
        let report_options = ReportOptions { use_colors: false, ..Default::default() };

        let valid = vec!["12345678909".to_string(), "52998224725".to_string()];
        let result = run_validate(
            ToolkitConfig::default(),
            DocumentType::Cpf,
            &valid,
            &options,
            report_options.clone(),
            OutputFormatArg::Human,
        );
        assert_eq!(result.unwrap(), 0);

        let mixed = vec!["12345678909".to_string(), "123".to_string()];
        let result = run_validate(
            ToolkitConfig::default(),
            DocumentType::Cpf,
            &mixed,
            &options,
            report_options,
            OutputFormatArg::Json,
        );
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_validate_without_candidates() {
        // blank stdin or an empty file yields no candidates
        let candidates = parse_candidate_lines("\n   \n\t\n");
        assert!(candidates.is_empty());

        let result = run_validate(
            ToolkitConfig::default(),
            DocumentType::Cpf,
            &candidates,
            &BatchOptions::default(),
            ReportOptions { use_colors: false, ..Default::default() },
            OutputFormatArg::Human,
        );
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_render_generated_json_carries_category() {
        let mut toolkit = DocumentToolkit::new().unwrap().with_seed(3);
        let generated = toolkit.generate_many(DocumentType::Cnh, 2).unwrap();

        let output =
            render_generated(&generated, Some(LicenseCategory::AB), OutputFormatArg::Json, false)
                .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["category"]["code"], "AB");
        assert_eq!(parsed["documents"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["documents"][0]["document_type"], "cnh");

        let plain = render_generated(&generated, None, OutputFormatArg::Json, false).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&plain).unwrap();
        assert!(parsed.is_array());

        let human =
            render_generated(&generated, Some(LicenseCategory::AB), OutputFormatArg::Human, true)
                .unwrap();
        assert_eq!(human.lines().count(), 2);
        assert!(!human.contains("AB"));
    }

    #[test]
    fn test_verbose_overrides_log_env() {
        assert_eq!(log_filter(true).to_string(), "debug");
    }

    #[test]
    fn test_collect_candidates_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("candidates.txt");
        fs::write(&path, "12345678909\n\n  52998224725  \n").unwrap();

        let candidates = collect_candidates(vec![], Some(path)).unwrap();
        assert_eq!(candidates, vec!["12345678909", "52998224725"]);

        let explicit = collect_candidates(vec!["1".to_string()], None).unwrap();
        assert_eq!(explicit, vec!["1"]);
    }

    #[test]
    fn test_format_command() {
        assert_eq!(run_format(ToolkitConfig::default(), DocumentType::Cpf, "12345678909").unwrap(), 0);
        assert_eq!(run_format(ToolkitConfig::default(), DocumentType::Cpf, "123").unwrap(), 1);
    }

    #[test]
    fn test_whatsapp_command() {
        let result = run_whatsapp(ToolkitConfig::default(), Some("br"), "11 98765-4321", None);
        assert_eq!(result.unwrap(), 0);
        assert!(run_whatsapp(ToolkitConfig::default(), Some("br"), "", None).is_err());
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("br_docs.yaml");

        fs::write(&config_file, ToolkitConfig::default().to_yaml().unwrap()).unwrap();
        assert_eq!(run_validate_config(Some(config_file.clone())), 0);

        fs::write(&config_file, "version: \"9\"\n").unwrap();
        assert_eq!(run_validate_config(Some(config_file)), 1);
    }

    #[test]
    fn test_load_config_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("custom.yaml");
        fs::write(&config_file, "version: \"1.0\"\ndefault_country: pt\n").unwrap();

        let config = load_config(Some(config_file)).unwrap();
        assert_eq!(config.default_country, "pt");
        assert!(load_config(Some(temp_dir.path().join("missing.yaml"))).is_err());
    }

    #[test]
    fn test_listings() {
        assert_eq!(run_list_types(ToolkitConfig::default()).unwrap(), 0);
        assert_eq!(run_list_states(), 0);
        assert_eq!(run_list_categories(), 0);
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from(["br-docs", "validate", "cpf", "--strip", "123.456.789-09"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Validate { strip: true, .. }));
    }
}
