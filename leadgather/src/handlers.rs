use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use leadgather_core::config::{DEFAULT_TARGET_URL, parse_header_arg, parse_target_url};
use leadgather_core::curl::{CurlRequest, discovery_steps, parse_curl_command};
use leadgather_core::summary::print_summary;
use leadgather_core::{
    ExportFormat, ScrapeConfig, ScrapeOutcome, SourceKind, build_page_source, execute_scrape,
};
use leadgather_scanner::FetchConfig;
use std::fs;
use std::path::Path;
use tracing::Level;

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

/// `-v` count to the most verbose level the subscriber lets through.
pub fn verbosity_level(occurrences: u8) -> Level {
    match occurrences {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Log to stderr so stdout stays readable. Safe to call more than once.
pub fn init_tracing(occurrences: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(verbosity_level(occurrences))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read and parse a file holding a "Copy as cURL" command.
pub fn load_curl_file(path: &Path) -> Result<CurlRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cURL file {}", path.display()))?;
    let request = parse_curl_command(&content)
        .with_context(|| format!("Failed to parse cURL file {}", path.display()))?;
    Ok(request)
}

/// Request settings from the scrape arguments. Precedence, lowest first:
/// defaults, `--user-agent`/`--timeout`, the cURL file, then each `-H`.
pub fn fetch_config_from_matches(
    args: &ArgMatches,
    curl: Option<&CurlRequest>,
) -> Result<FetchConfig> {
    let mut fetch = FetchConfig::default();

    if let Some(timeout) = args.get_one::<u64>("timeout") {
        fetch = fetch.with_timeout(*timeout);
    }
    if let Some(user_agent) = args.get_one::<String>("user-agent") {
        fetch = fetch.with_user_agent(user_agent);
    }
    if let Some(curl) = curl {
        fetch = curl.apply_to(fetch);
    }
    if let Some(headers) = args.get_many::<String>("header") {
        for raw in headers {
            let (name, value) = parse_header_arg(raw)?;
            fetch = fetch.with_header(name, value);
        }
    }

    Ok(fetch)
}

pub fn scrape_config_from_matches(args: &ArgMatches) -> Result<ScrapeConfig> {
    let curl = args
        .get_one::<std::path::PathBuf>("from-curl")
        .map(|path| load_curl_file(path))
        .transpose()?;

    let target = args
        .get_one::<String>("url")
        .map(String::as_str)
        .or(curl.as_ref().map(|request| request.url.as_str()))
        .unwrap_or(DEFAULT_TARGET_URL);
    let target_url = parse_target_url(target)?;

    let format_arg = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("both");
    let format: ExportFormat = format_arg.parse()?;

    let output_dir = args
        .get_one::<String>("output-dir")
        .map(String::as_str)
        .unwrap_or(".");
    let output_dir = shellexpand::tilde(output_dir).into_owned();

    let source = if args.get_flag("browser") {
        SourceKind::Browser {
            visible: args.get_flag("visible"),
        }
    } else {
        SourceKind::Http
    };

    let mut config = ScrapeConfig::new(target_url)
        .with_fetch(fetch_config_from_matches(args, curl.as_ref())?)
        .with_source(source)
        .with_format(format)
        .with_output_dir(output_dir);

    if let Some(origin) = args.get_one::<String>("base-origin") {
        config = config.with_base_origin(origin)?;
    }

    Ok(config)
}

pub async fn handle_scrape(args: &ArgMatches, quiet: bool) -> Result<()> {
    let config = scrape_config_from_matches(args)?;

    if !quiet {
        print_divider();
        println!("{}", "  SCRAPE".bright_white().bold());
        print_divider();
        println!(
            "{} Target: {}",
            "→".blue(),
            config.target_url.as_str().bright_white()
        );
        println!("{} Link origin: {}", "→".blue(), config.base_origin);
        let source = match config.source {
            SourceKind::Http => "http",
            SourceKind::Browser { visible: false } => "browser (headless)",
            SourceKind::Browser { visible: true } => "browser (visible)",
        };
        println!("{} Source: {}", "→".blue(), source);
        println!(
            "{} Output: {}\n",
            "→".blue(),
            config.output_dir().display().to_string().bright_white()
        );
    }

    let source = build_page_source(&config)?;
    let outcome = execute_scrape(&config, source.as_ref(), !quiet)
        .await
        .with_context(|| format!("Scrape of {} failed", config.target_url))?;

    report_outcome(&outcome, args.get_flag("no-summary") || quiet);
    Ok(())
}

fn report_outcome(outcome: &ScrapeOutcome, skip_summary: bool) {
    let extraction = &outcome.extraction;

    if let Some(strategy) = &extraction.strategy {
        println!(
            "{} Found {} listing block(s) using {}",
            "✓".green().bold(),
            extraction.blocks_found(),
            strategy.bright_white()
        );
    }

    if !extraction.skipped.is_empty() {
        println!(
            "{} Skipped {} listing(s):",
            "⚠".yellow().bold(),
            extraction.skipped.len()
        );
        for skipped in &extraction.skipped {
            println!("  {} [{}] {}", "•".yellow(), skipped.index, skipped.reason);
        }
    }

    if let Some(path) = &outcome.fallback_path {
        println!("{} No listings could be extracted", "✗".red().bold());
        if let Some(title) = extraction
            .fallback
            .as_ref()
            .and_then(|fallback| fallback.title.as_deref())
        {
            println!("{} Page title: {}", "ℹ".blue(), title.bright_white());
        }
        println!(
            "{} Raw page saved to {}",
            "→".blue(),
            path.display().to_string().bright_white()
        );
        if outcome.suggests_browser() {
            println!(
                "{} The listings may be rendered client-side. Try again with {}",
                "ℹ".blue(),
                "--browser".bright_cyan()
            );
        }
        return;
    }

    if !skip_summary {
        println!();
        print_summary(&extraction.records);
    }

    println!(
        "{} Extracted {} listing(s)",
        "✓".green().bold(),
        extraction.records.len()
    );
    for path in &outcome.written {
        println!(
            "{} Saved {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }
}

pub fn handle_discover(args: &ArgMatches) -> Result<()> {
    let site = args
        .get_one::<String>("url")
        .map(String::as_str)
        .unwrap_or(DEFAULT_TARGET_URL);
    let site = parse_target_url(site)?;

    println!("{}", discovery_steps(site.as_str()));

    if let Some(path) = args.get_one::<std::path::PathBuf>("curl") {
        let request = load_curl_file(path)?;
        print_divider();
        println!("{}", "  PARSED REQUEST".bright_white().bold());
        print_divider();
        println!("{}", serde_json::to_string_pretty(&request)?);
    }

    Ok(())
}
