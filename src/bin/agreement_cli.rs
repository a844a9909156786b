//! Agreement Command Line Interface
//!
//! Drives a file-backed questionnaire session against the employment
//! agreement template.
//!
//! # Usage
//!
//! ```bash
//! # Inspect how a selected fragment is classified
//! agreement_cli classify "Bonus"
//!
//! # Order a selection into questions (persists the permutation)
//! agreement_cli order "Employee Name" "Probation Period Length" "USA"
//!
//! # Record answers
//! agreement_cli answer "What's the name of the employee?" "Ada Lovelace"
//! agreement_cli answer "What's the annual salary?" money:45000:GBP
//! agreement_cli answer "Is the Pension clause applicable?" true
//!
//! # Render the agreement
//! agreement_cli render --output agreement.html
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use agreement_engine::{
    align_selection,
    answers::{FileStore, SessionStore, SideChannel},
    render::ArithmeticOperation,
    AgreementError, CanonicalAnswer, Classifier, EngineConfig, QuestionOrderer, RenderRules,
    SelectionInput, TemplateRenderer,
};

#[derive(Parser)]
#[command(name = "agreement_cli")]
#[command(version)]
#[command(about = "Classify fragments, order questions, record answers and render the agreement")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json, text, or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Engine config YAML
    #[arg(long, short, global = true, env = "AGREEMENT_CONFIG")]
    config: Option<PathBuf>,

    /// Session file (overrides the configured one)
    #[arg(long, global = true)]
    session: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one selected fragment
    Classify { fragment: String },

    /// Order selected fragments into questions
    Order {
        #[arg(required = true)]
        fragments: Vec<String>,
    },

    /// Record an answer: true, false, null, money:AMOUNT:CURRENCY, or text
    Answer { question: String, value: String },

    /// Configure the arithmetic applied to the unused-holiday answer
    Operation {
        /// add, subtract, multiply or divide
        operation: String,
        operand: String,
    },

    /// Render the agreement with the session's answers
    Render {
        /// Template file (defaults to the configured or bundled template)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Write HTML here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Forget the session's selection and answers
    Reset,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(session) = cli.session {
        config.session_file = session;
    }

    match cli.command {
        Commands::Classify { fragment } => cmd_classify(&config, &fragment, cli.format),
        Commands::Order { fragments } => cmd_order(&config, &fragments, cli.format),
        Commands::Answer { question, value } => cmd_answer(&config, question, &value, cli.format),
        Commands::Operation { operation, operand } => {
            cmd_operation(&config, &operation, &operand, cli.format)
        }
        Commands::Render { template, output } => cmd_render(config, template, output, cli.format),
        Commands::Reset => cmd_reset(&config, cli.format),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn open_session(config: &EngineConfig) -> Result<SessionStore<FileStore>> {
    let store = FileStore::open(&config.session_file).with_context(|| {
        format!("opening session file {}", config.session_file.display())
    })?;
    Ok(SessionStore::new(store))
}

fn open_side_channel(config: &EngineConfig) -> Result<SideChannel<FileStore>> {
    let store = FileStore::open(&config.side_channel_file).with_context(|| {
        format!("opening side-channel file {}", config.side_channel_file.display())
    })?;
    Ok(SideChannel::new(store))
}

fn cmd_classify(config: &EngineConfig, fragment: &str, format: OutputFormat) -> Result<()> {
    let registry = config.registry()?;
    let classification = Classifier::new(&registry).classify(fragment);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&classification)?),
        OutputFormat::Text => println!(
            "{}\t{}",
            classification.primary_kind,
            classification.display_question(fragment)
        ),
        OutputFormat::Pretty => {
            let kind = classification.primary_kind.to_string();
            let kind = if classification.is_known() {
                kind.green().bold()
            } else {
                kind.yellow().bold()
            };
            println!("{} {}", kind, classification.display_question(fragment));
            if let (Some(kind), Some(question)) =
                (classification.alternate_kind, &classification.alternate_question)
            {
                println!("  {} {} {}", "alternate".dimmed(), kind, question);
            }
        }
    }
    Ok(())
}

fn cmd_order(config: &EngineConfig, fragments: &[String], format: OutputFormat) -> Result<()> {
    let registry = config.registry()?;
    let mut session = open_session(config)?;
    let mut persisted = session.load();

    let persisted_order =
        (!persisted.question_order.is_empty()).then_some(persisted.question_order.as_slice());
    let mut outcome = QuestionOrderer::new(&registry).order(fragments, persisted_order);
    align_selection(&mut outcome.entries, &SelectionInput::from_session(&persisted));

    persisted.question_order = outcome.permutation.clone();
    persisted.selected_question_types = outcome.entries.iter().map(|e| e.kind.to_string()).collect();
    persisted.type_changed_states = outcome.entries.iter().map(|e| e.kind_changed).collect();
    session.save(&persisted)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => {
            for entry in &outcome.entries {
                println!("{}\t{}\t{}", entry.order, entry.kind, entry.label);
            }
        }
        OutputFormat::Pretty => {
            for (position, entry) in outcome.entries.iter().enumerate() {
                println!(
                    "{:>3}. {} {}",
                    position + 1,
                    format!("[{}]", entry.kind).cyan(),
                    entry.label
                );
            }
            for duplicate in &outcome.duplicates {
                println!(
                    "{} '{}' asks the same question as '{}'",
                    "duplicate:".yellow(),
                    duplicate.fragment,
                    duplicate.kept_fragment
                );
            }
            for fragment in &outcome.suppressed {
                println!("{} '{}' (parent not selected)", "skipped:".dimmed(), fragment);
            }
            if outcome.permutation_reset {
                println!("{}", "saved order no longer fits, reset".yellow());
            }
        }
    }
    Ok(())
}

fn cmd_answer(
    config: &EngineConfig,
    question: String,
    value: &str,
    format: OutputFormat,
) -> Result<()> {
    let answer = parse_answer(value)?;
    let mut session = open_session(config)?;
    let mut answers = session.load_answers();
    answers.set(question.clone(), answer.clone());
    session.save_answers(&answers)?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "question": question, "answer": answer })
        ),
        OutputFormat::Text => println!("{}", question),
        OutputFormat::Pretty => println!(
            "{} {} ({} answered)",
            "saved".green().bold(),
            question,
            answers.answered_count()
        ),
    }
    Ok(())
}

fn cmd_operation(
    config: &EngineConfig,
    operation: &str,
    operand: &str,
    format: OutputFormat,
) -> Result<()> {
    let operation = ArithmeticOperation::from_str(operation).map_err(anyhow::Error::msg)?;
    let operand = Decimal::from_str(operand.trim())
        .with_context(|| format!("operand '{}' is not a number", operand))?;
    open_side_channel(config)?.set_operation(operation, operand)?;

    if format != OutputFormat::Json {
        println!("{} {} {}", "operation".green().bold(), operation, operand);
    }
    Ok(())
}

fn cmd_render(
    mut config: EngineConfig,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    if template.is_some() {
        config.template_path = template;
    }
    let registry = config.registry()?;
    let template = config.template()?;
    let mut session = open_session(&config)?;
    let answers = session.load_answers();
    let mut side_channel = open_side_channel(&config)?;

    let options = config.render_options(side_channel.derived_config());
    let rendered =
        TemplateRenderer::with_rules(&template, &registry, RenderRules::employment_agreement(), options)
            .render(&answers, &config.theme());
    side_channel.store_calculated(rendered.calculated_value.as_deref())?;

    if let Some(path) = &output {
        std::fs::write(path, &rendered.html)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rendered)?),
        OutputFormat::Text | OutputFormat::Pretty if output.is_none() => println!("{}", rendered.html),
        OutputFormat::Text | OutputFormat::Pretty => println!(
            "{} {} ({} answers)",
            "rendered".green().bold(),
            output.as_deref().map(|p| p.display().to_string()).unwrap_or_default(),
            answers.len()
        ),
    }
    Ok(())
}

fn cmd_reset(config: &EngineConfig, format: OutputFormat) -> Result<()> {
    open_session(config)?.clear()?;
    if format != OutputFormat::Json {
        println!("{} {}", "cleared".green().bold(), config.session_file.display());
    }
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

/// `true` / `false` / `null`, `money:AMOUNT:CURRENCY`, anything else is text
fn parse_answer(literal: &str) -> std::result::Result<CanonicalAnswer, AgreementError> {
    let invalid = |reason: &str| AgreementError::InvalidAnswer {
        literal: literal.to_string(),
        reason: reason.to_string(),
    };

    match literal.trim() {
        "true" => Ok(CanonicalAnswer::Bool(true)),
        "false" => Ok(CanonicalAnswer::Bool(false)),
        "null" => Ok(CanonicalAnswer::Unanswered),
        other => match other.strip_prefix("money:") {
            Some(rest) => {
                let (amount, currency) = rest
                    .split_once(':')
                    .ok_or_else(|| invalid("expected money:AMOUNT:CURRENCY"))?;
                let (amount, currency) = (amount.trim(), currency.trim());
                if Decimal::from_str(amount).is_err() {
                    return Err(invalid("amount is not a number"));
                }
                if currency.is_empty() {
                    return Err(invalid("missing currency"));
                }
                Ok(CanonicalAnswer::money(amount, currency.to_uppercase()))
            }
            None => Ok(CanonicalAnswer::text(literal)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer_literals() {
        assert_eq!(parse_answer("true").unwrap(), CanonicalAnswer::Bool(true));
        assert_eq!(parse_answer(" false ").unwrap(), CanonicalAnswer::Bool(false));
        assert_eq!(parse_answer("null").unwrap(), CanonicalAnswer::Unanswered);
        assert_eq!(
            parse_answer("money:45000:gbp").unwrap(),
            CanonicalAnswer::money("45000", "GBP")
        );
        assert_eq!(parse_answer("Paris").unwrap(), CanonicalAnswer::text("Paris"));
    }

    #[test]
    fn test_parse_answer_rejects_bad_money() {
        assert!(parse_answer("money:12").is_err());
        assert!(parse_answer("money:twelve:EUR").is_err());
        assert!(parse_answer("money:12:").is_err());
    }
}
