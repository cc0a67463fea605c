use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use clash_overwrite::analyzer::MatchLogAnalyzer;
use clash_overwrite::translator::{build_request, TranslatorSettings};
use clash_overwrite::utils::yaml::parse_profile;
use clash_overwrite::utils::{file_get, file_write};
use clash_overwrite::{overwrite_config, OverwriteSettings, Preset};

/// Rewrite Clash profiles with generated groups, DNS and routing rules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite a profile and write the result
    Overwrite {
        /// Input profile
        #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
        input: PathBuf,

        /// Output profile
        #[arg(short, long, value_name = "FILE", default_value = "output.yaml")]
        output: PathBuf,

        /// Profile name used in log messages
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,

        /// YAML or TOML file overriding preset settings
        #[arg(short, long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Built-in settings to start from (script or overwrite)
        #[arg(long, value_name = "PRESET", default_value = "overwrite")]
        preset: Preset,
    },

    /// Collect destinations that hit the final MATCH rule
    AnalyzeLog {
        /// Directory scanned recursively for log files
        #[arg(value_name = "LOG_DIR", default_value = ".")]
        log_dir: PathBuf,

        /// Report file
        #[arg(value_name = "OUTPUT", default_value = "matched_urls.txt")]
        output: PathBuf,
    },

    /// Print the translation request for a piece of text
    TranslateRequest {
        #[arg(long)]
        text: String,

        /// Target language
        #[arg(long)]
        to: String,

        /// Source language
        #[arg(long, default_value = "auto")]
        from: String,

        /// Chat-completion endpoint
        #[arg(long)]
        url: String,

        /// API key sent as the Authorization header
        #[arg(long)]
        key: String,
    },
}

fn run_overwrite(
    input: PathBuf,
    output: PathBuf,
    profile: Option<String>,
    settings: Option<PathBuf>,
    preset: Preset,
) -> Result<()> {
    let settings = match settings {
        Some(path) => OverwriteSettings::load(&path, preset)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => preset.settings(),
    };

    let content = file_get(&input)
        .with_context(|| format!("Failed to read profile {}", input.display()))?;
    let config = parse_profile(&content)
        .with_context(|| format!("Failed to parse profile {}", input.display()))?;

    let profile_name = profile.unwrap_or_else(|| input.display().to_string());
    let result = overwrite_config(config, &profile_name, &settings);

    let rendered = serde_yaml::to_string(&result).context("Failed to serialize profile")?;
    file_write(&output, &rendered)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Profile written to {}", output.display());
    Ok(())
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    match args.command {
        Command::Overwrite {
            input,
            output,
            profile,
            settings,
            preset,
        } => run_overwrite(input, output, profile, settings, preset),
        Command::AnalyzeLog { log_dir, output } => {
            let mut analyzer = MatchLogAnalyzer::new(log_dir, output);
            let report = analyzer.run()?;
            info!("Scanned {} files, {} unique URLs", report.files, report.urls);
            Ok(())
        }
        Command::TranslateRequest {
            text,
            to,
            from,
            url,
            key,
        } => {
            let request = build_request(&text, &from, &to, &url, &key, &TranslatorSettings::default())?;
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(())
        }
    }
}
