use std::io::IsTerminal;
use std::io::Read;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};

use augur_analysis::engine::AnalysisEngine;
use augur_analysis::llm::CompletionClient;
use augur_core::{OutputFormat, RiskLevel};

#[derive(Parser)]
#[command(
    name = "augur",
    version,
    about = "AI risk triage for large diffs",
    long_about = "Augur sends a diff to an LLM and always returns one structured risk \
                   assessment, even when the diff is far larger than the model accepts \
                   in one request: oversized diffs are split at file boundaries, failed \
                   pieces are re-split at shrinking budgets, and partial results are \
                   merged conservatively.\n\n\
                   Examples:\n  \
                     git diff main | augur analyze   Assess a diff from stdin\n  \
                     augur analyze --file big.patch  Assess a patch file\n  \
                     augur analyze --base main       Assess changes since a git ref\n  \
                     augur analyze --fail-on high    Gate CI on the assessed risk"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .augur.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summary (default)\n  \
                         json      Machine-readable JSON\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Assess the risk of a diff with chunked LLM analysis
    #[command(long_about = "Assess the risk of a diff with chunked LLM analysis.\n\n\
        Reads a unified diff from stdin, a file, or git, and returns one structured\n\
        assessment: risk level, summary, risk factors, reviewer focus areas, missing\n\
        tests, and migration risk. Diffs over the chunk budget are split at file\n\
        boundaries and analyzed piecewise.\n\n\
        Examples:\n  git diff | augur analyze\n  augur analyze --file changes.patch\n  \
        augur analyze --base origin/main --fail-on high")]
    Analyze {
        /// Read diff from file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Diff against a git ref (runs `git diff <ref>`)
        #[arg(long, conflicts_with = "file")]
        base: Option<String>,

        /// Exit non-zero when the assessed risk meets this level
        #[arg(long, value_name = "LEVEL")]
        fail_on: Option<RiskLevel>,
    },
    /// Create a default .augur.toml configuration file
    #[command(long_about = "Create a default .augur.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .augur.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1m\x1b[33m⚡\x1b[0m \x1b[1maugur\x1b[0m v{version} — AI risk triage for large diffs\n");

        println!("Quick start:");
        println!("  \x1b[36maugur init\x1b[0m                    Create a .augur.toml config file");
        println!("  \x1b[36mgit diff | augur analyze\x1b[0m      Assess your latest changes\n");

        println!("All commands:");
        println!("  \x1b[32manalyze\x1b[0m   Chunked LLM risk assessment (stdin, file, or git ref)");
        println!("  \x1b[32minit\x1b[0m      Create default configuration\n");
    } else {
        println!("augur v{version} — AI risk triage for large diffs\n");

        println!("Quick start:");
        println!("  augur init                    Create a .augur.toml config file");
        println!("  git diff | augur analyze      Assess your latest changes\n");

        println!("All commands:");
        println!("  analyze   Chunked LLM risk assessment (stdin, file, or git ref)");
        println!("  init      Create default configuration\n");
    }

    println!("Run 'augur <command> --help' for details.");
}

fn read_diff_input(file: &Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

fn read_git_diff(base: &str) -> Result<String> {
    let output = std::process::Command::new("git")
        .args(["diff", base])
        .output()
        .into_diagnostic()
        .wrap_err(format!("Failed to run git diff {base}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        miette::bail!("git diff failed: {}", stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

const DEFAULT_CONFIG: &str = r#"# Augur configuration
# All values shown are the built-in defaults.

[llm]
# provider = "openai"
# model = "gpt-4o"
# api_key = "sk-..."
# base_url = "https://api.openai.com"

[analysis]
# Hard maximum diff size in bytes; larger diffs are rejected
# outright when chunking is disabled.
# max_diff_bytes = 240000

# Per-request chunk budget in bytes. Must be strictly smaller than
# max_diff_bytes to leave headroom for prompt scaffolding.
# chunk_budget_bytes = 48000

# Floor for budget shrinking when a chunk keeps hitting provider
# limits; chunks that still fail at this size are skipped.
# min_chunk_bytes = 4000

# Split oversized diffs into per-chunk LLM calls.
# chunking = true
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => augur_core::AugurConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".augur.toml");
            if default_path.exists() {
                augur_core::AugurConfig::from_file(default_path).into_diagnostic()?
            } else {
                augur_core::AugurConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => {
            print_welcome(use_color);
            Ok(())
        }
        Some(Command::Analyze {
            ref file,
            ref base,
            fail_on,
        }) => {
            let diff_input = if let Some(base_ref) = base {
                read_git_diff(base_ref)?
            } else {
                read_diff_input(file)?
            };

            if diff_input.trim().is_empty() {
                miette::bail!(miette::miette!(
                    help = "Pipe a diff to augur, e.g.: git diff | augur analyze\n       Or use --file <path> or --base <git-ref>",
                    "Empty diff input"
                ));
            }

            let client = CompletionClient::new(&config.llm).into_diagnostic()?;
            let engine = AnalysisEngine::new(client, config.analysis.clone());

            let is_tty = std::io::stderr().is_terminal();
            let spinner = if is_tty {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .unwrap(),
                );
                pb.set_message("Assessing risk...");
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let result = engine.analyze(&diff_input).await.inspect_err(|_e| {
                if let Some(pb) = &spinner {
                    pb.finish_with_message("Failed");
                }
            }).into_diagnostic()?;

            if let Some(pb) = spinner {
                pb.finish_with_message("Done");
            }

            if cli.verbose {
                eprintln!("--- Analysis Stats ---");
                eprintln!(
                    "Model: {} | LLM calls: {}",
                    result.stats.model_used, result.stats.llm_calls
                );
                eprintln!(
                    "Chunks analyzed: {} | skipped: {}",
                    result.stats.chunks_analyzed, result.stats.chunks_skipped
                );
                let token_estimate = diff_input.len() / 4;
                eprintln!("Token estimate: ~{token_estimate}");
                if result.stats.fallback_used {
                    eprintln!("  (no chunk could be analyzed; returned the fallback assessment)");
                } else if result.stats.llm_calls > 1 {
                    eprintln!("  (diff was split into per-chunk calls)");
                }
                eprintln!("----------------------");
            }

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&result).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    print!("{}", result.to_markdown());
                }
                OutputFormat::Text => {
                    print!("{result}");
                }
            }

            if let Some(threshold) = fail_on {
                if result.assessment.risk_level.meets_threshold(threshold) {
                    eprintln!(
                        "fail-on: assessed risk {} meets threshold {threshold}",
                        result.assessment.risk_level
                    );
                    std::process::exit(1);
                }
            }

            Ok(())
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".augur.toml");
            if path.exists() {
                miette::bail!(".augur.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .augur.toml with default configuration");
            Ok(())
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "augur", &mut std::io::stdout());
            Ok(())
        }
    }
}
