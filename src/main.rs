use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sumqc::batch::{self, BatchError};
use sumqc::config::QualityConfig;
use sumqc::content::{check_content_quality, check_english_mixing, create_enhanced_prompt, fix_summary};
use sumqc::quality::{check_summary_quality, expand_summary_if_needed, generate_quality_report};
use sumqc::tags::{
    TagNormalizer, categorize_multiple_tags, tag_statistics, validate_and_normalize_tags,
};
use sumqc::validator::{
    ArticleType, ParseArticleTypeError, auto_fix_summary, validate_by_article_type,
    validate_detailed_summary, validate_summary,
};
use sumqc::ValidationResult;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// sumqc - quality gate for AI-generated Japanese article summaries
#[derive(Parser)]
#[command(name = "sumqc")]
#[command(about = "Checks, scores and repairs AI-generated Japanese article summaries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Score a summary and its bulleted detailed summary
    Check(CheckCommand),
    /// Run the structural validator
    Validate(ValidateCommand),
    /// Run the content heuristics on a summary
    Content(ContentCommand),
    /// Report English grammar mixed into Japanese text
    English(EnglishCommand),
    /// Repair a summary, padding it from the title when far too short
    Fix(FixCommand),
    /// Normalize and categorize a comma-separated tag list
    Tags(TagsCommand),
    /// Score a JSON or JSON Lines file of summary records
    Batch(BatchCommand),
    /// Print a regeneration prompt for a failing summary
    Prompt(PromptCommand),
}

#[derive(Parser)]
struct CheckCommand {
    #[arg(short, long)]
    summary: String,

    /// Bulleted detailed summary, one `・` line per point
    #[arg(short, long)]
    detailed: String,

    /// Print the verdict as JSON instead of a report
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ValidateCommand {
    #[arg(short, long)]
    summary: Option<String>,

    #[arg(short, long)]
    detailed: Option<String>,

    /// release, problem-solving, tutorial, tech-intro, implementation or general
    #[arg(short = 't', long, value_name = "TYPE")]
    article_type: Option<String>,
}

#[derive(Parser)]
struct ContentCommand {
    #[arg(short, long)]
    summary: String,

    #[arg(short, long)]
    detailed: Option<String>,

    #[arg(short, long)]
    title: Option<String>,

    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct EnglishCommand {
    #[arg(value_name = "TEXT")]
    text: String,
}

#[derive(Parser)]
struct FixCommand {
    #[arg(value_name = "SUMMARY")]
    summary: String,

    #[arg(short, long)]
    title: Option<String>,
}

#[derive(Parser)]
struct TagsCommand {
    /// Comma-separated tags
    #[arg(value_name = "TAGS")]
    tags: String,
}

#[derive(Parser)]
struct BatchCommand {
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Repair summaries before scoring
    #[arg(long)]
    fix: bool,

    /// Print every scored record as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct PromptCommand {
    #[arg(short, long)]
    title: String,

    /// Article body
    #[arg(short, long)]
    content: String,

    /// The summary that failed
    #[arg(short, long)]
    summary: String,
}

/// Length `fix` pads very short summaries up to.
const EXPAND_MIN_LENGTH: usize = 30;

/// Errors caused by the invocation rather than by the tool.
#[derive(Debug, Error)]
enum UsageError {
    #[error("either --summary or --detailed is required")]
    MissingInput,

    #[error("validation failed with {0} error(s)")]
    Invalid(usize),
}

fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sumqc=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Check(cmd) => execute_check(cmd),
        Commands::Validate(cmd) => execute_validate(cmd),
        Commands::Content(cmd) => execute_content(cmd),
        Commands::English(cmd) => execute_english(cmd),
        Commands::Fix(cmd) => Ok(execute_fix(cmd)),
        Commands::Tags(cmd) => execute_tags(cmd),
        Commands::Batch(cmd) => execute_batch(cmd, &QualityConfig::from_env()),
        Commands::Prompt(cmd) => Ok(execute_prompt(cmd)),
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            let exit_code = if is_user_error(&e) { 1 } else { 2 };
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code);
        }
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad invocations, invalid input and empty batch files.
/// Everything else, such as unreadable files, is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<UsageError>().is_some()
        || error.downcast_ref::<ParseArticleTypeError>().is_some()
        || matches!(
            error.downcast_ref::<BatchError>(),
            Some(BatchError::Empty(_) | BatchError::Json { .. })
        )
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    out.push('\n');
    Ok(out)
}

fn execute_check(cmd: &CheckCommand) -> Result<String> {
    let result = check_summary_quality(&cmd.summary, &cmd.detailed);
    if cmd.json {
        to_json(&result)
    } else {
        Ok(generate_quality_report(&result))
    }
}

fn render_validation(label: &str, result: &ValidationResult, out: &mut String) {
    let verdict = if result.is_valid { "OK" } else { "NG" };
    let _ = writeln!(out, "{label}: {verdict}");
    for error in &result.errors {
        let _ = writeln!(out, "  error: {error}");
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "  warning: {warning}");
    }
}

fn execute_validate(cmd: &ValidateCommand) -> Result<String> {
    if cmd.summary.is_none() && cmd.detailed.is_none() {
        return Err(UsageError::MissingInput.into());
    }

    let article_type = cmd
        .article_type
        .as_deref()
        .map(str::parse::<ArticleType>)
        .transpose()?;

    let mut out = String::new();
    let mut errors = 0;

    if let Some(summary) = &cmd.summary {
        let result = match article_type {
            Some(article_type) => validate_by_article_type(summary, article_type),
            None => validate_summary(summary),
        };
        errors += result.errors.len();
        render_validation("summary", &result, &mut out);
    }

    if let Some(detailed) = &cmd.detailed {
        let result = validate_detailed_summary(detailed);
        errors += result.errors.len();
        render_validation("detailed", &result, &mut out);
    }

    if errors > 0 {
        eprint!("{out}");
        return Err(UsageError::Invalid(errors).into());
    }
    Ok(out)
}

fn execute_content(cmd: &ContentCommand) -> Result<String> {
    let result = check_content_quality(&cmd.summary, cmd.detailed.as_deref(), cmd.title.as_deref());
    if cmd.json {
        return to_json(&result);
    }

    let mut out = String::new();
    let _ = writeln!(out, "score: {}/100", result.score);
    let _ = writeln!(out, "valid: {}", result.is_valid);
    let _ = writeln!(out, "requires regeneration: {}", result.requires_regeneration);
    if let Some(reason) = &result.regeneration_reason {
        let _ = writeln!(out, "reason: {reason}");
    }
    for issue in &result.issues {
        let _ = writeln!(
            out,
            "- {} [{}/{}] {}",
            issue.severity.glyph(),
            issue.issue_type,
            issue.severity,
            issue.message
        );
    }
    Ok(out)
}

fn execute_english(cmd: &EnglishCommand) -> Result<String> {
    to_json(&check_english_mixing(&cmd.text))
}

fn execute_fix(cmd: &FixCommand) -> String {
    let cleaned = auto_fix_summary(&cmd.summary);
    let verdict = check_content_quality(&cleaned, None, cmd.title.as_deref());
    let fixed = fix_summary(&cleaned, &verdict.issues);
    let mut fixed = expand_summary_if_needed(
        &fixed,
        cmd.title.as_deref().unwrap_or_default(),
        EXPAND_MIN_LENGTH,
        "",
    );
    fixed.push('\n');
    fixed
}

fn execute_tags(cmd: &TagsCommand) -> Result<String> {
    let tags = validate_and_normalize_tags(TagNormalizer::normalize_str(&cmd.tags));
    let categories = categorize_multiple_tags(&tags);
    let statistics = tag_statistics(&tags);
    to_json(&serde_json::json!({
        "tags": tags,
        "categories": categories,
        "statistics": statistics,
    }))
}

fn execute_batch(cmd: &BatchCommand, config: &QualityConfig) -> Result<String> {
    if !config.enabled {
        return Ok("quality check is disabled (QUALITY_CHECK_ENABLED=false)\n".to_string());
    }

    let mut records = batch::load_records(&cmd.path)
        .with_context(|| format!("Failed to load records from {}", cmd.path.display()))?;
    if cmd.fix {
        records = batch::fix_records(&records);
    }

    let scored = batch::score_records(&records, config);
    let stats = batch::summarize_batch(&scored);

    if cmd.json {
        return to_json(&serde_json::json!({
            "records": scored,
            "stats": stats,
        }));
    }

    let acceptable = scored.iter().filter(|s| s.acceptable).count();
    let mut out = String::new();
    let _ = writeln!(out, "records: {}", scored.len());
    let _ = writeln!(
        out,
        "acceptable (score >= {}): {acceptable}",
        config.min_score
    );
    let _ = writeln!(out, "average score: {:.1}", stats.average_score);
    let _ = writeln!(out, "valid: {} / invalid: {}", stats.valid_count, stats.invalid_count);
    let _ = writeln!(out, "regeneration rate: {}%", stats.regeneration_rate);
    let _ = writeln!(
        out,
        "issues: critical {} / major {} / minor {}",
        stats.critical_issues_count, stats.major_issues_count, stats.minor_issues_count
    );
    Ok(out)
}

fn execute_prompt(cmd: &PromptCommand) -> String {
    let verdict = check_content_quality(&cmd.summary, None, Some(&cmd.title));
    let mut prompt = create_enhanced_prompt(&cmd.title, &cmd.content, &verdict.issues);
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn bullets(count: usize) -> String {
        (0..count)
            .map(|_| format!("・{}", "い".repeat(100)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["sumqc", "batch", "records.jsonl", "--fix"]).unwrap();
        match cli.command {
            Commands::Batch(cmd) => {
                assert_eq!(cmd.path, PathBuf::from("records.jsonl"));
                assert!(cmd.fix);
                assert!(!cmd.json);
            }
            _ => panic!("expected batch command"),
        }

        let cli =
            Cli::try_parse_from(["sumqc", "validate", "-s", "要約。", "-t", "tutorial"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Validate(ValidateCommand { article_type: Some(ref t), .. }) if t == "tutorial"
        ));

        assert!(Cli::try_parse_from(["sumqc", "check", "--summary", "要約。"]).is_err());
    }

    #[test]
    fn check_renders_report() {
        let cmd = CheckCommand {
            summary: format!("{}。", "あ".repeat(169)),
            detailed: bullets(5),
            json: false,
        };
        let out = execute_check(&cmd).unwrap();
        assert!(out.contains("スコア: 100/100"));
    }

    #[test]
    fn check_json_uses_camel_case() {
        let cmd = CheckCommand {
            summary: "短い。".to_string(),
            detailed: bullets(3),
            json: true,
        };
        let out = execute_check(&cmd).unwrap();
        assert!(out.contains("\"requiresRegeneration\": true"));
    }

    #[test]
    fn validate_requires_input() {
        let cmd = ValidateCommand {
            summary: None,
            detailed: None,
            article_type: None,
        };
        let err = execute_validate(&cmd).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn invalid_summary_is_a_user_error() {
        let cmd = ValidateCommand {
            summary: Some("短すぎる要約".to_string()),
            detailed: None,
            article_type: None,
        };
        let err = execute_validate(&cmd).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn unknown_article_type_is_a_user_error() {
        let cmd = ValidateCommand {
            summary: Some("要約。".to_string()),
            detailed: None,
            article_type: Some("news".to_string()),
        };
        let err = execute_validate(&cmd).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn valid_detailed_summary_passes() {
        let cmd = ValidateCommand {
            summary: None,
            detailed: Some(bullets(6)),
            article_type: None,
        };
        let out = execute_validate(&cmd).unwrap();
        assert!(out.starts_with("detailed: OK"));
    }

    #[test]
    fn fix_applies_both_passes() {
        let cmd = FixCommand {
            summary: "概要: 本記事ではRustの所有権を解説する、".to_string(),
            title: None,
        };
        assert_eq!(execute_fix(&cmd), "Rustの所有権を解説する。\n");
    }

    #[test]
    fn fix_pads_from_title() {
        let cmd = FixCommand {
            summary: "短い要約".to_string(),
            title: Some("Rust入門".to_string()),
        };
        assert_eq!(execute_fix(&cmd), "短い要約。Rust入門に関する記事。\n");
    }

    #[test]
    fn tags_are_capped_and_categorized() {
        let cmd = TagsCommand {
            tags: "js, k8s, react, docker, postgres, aws".to_string(),
        };
        let out = execute_tags(&cmd).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["tags"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["categories"]["languages"][0], "JavaScript");
        assert_eq!(value["statistics"]["platforms"], 1);
        assert_eq!(value["statistics"]["uncategorized"], 0);
    }

    #[test]
    fn disabled_batch_is_a_no_op() {
        let cmd = BatchCommand {
            path: PathBuf::from("/does/not/exist.json"),
            fix: false,
            json: false,
        };
        let config = QualityConfig {
            enabled: false,
            ..QualityConfig::default()
        };
        let out = execute_batch(&cmd, &config).unwrap();
        assert!(out.contains("disabled"));
    }

    #[test]
    fn batch_prints_stats() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let record = serde_json::json!({
            "id": "1",
            "summary": format!("{}。", "あ".repeat(169)),
            "detailedSummary": bullets(5),
        });
        writeln!(file, "{record}").unwrap();

        let cmd = BatchCommand {
            path: file.path().to_path_buf(),
            fix: false,
            json: false,
        };
        let out = execute_batch(&cmd, &QualityConfig::default()).unwrap();
        assert!(out.contains("records: 1"));
        assert!(out.contains("average score: 100.0"));
    }

    #[test]
    fn missing_batch_file_is_internal_error() {
        let cmd = BatchCommand {
            path: PathBuf::from("/does/not/exist.json"),
            fix: false,
            json: false,
        };
        let err = execute_batch(&cmd, &QualityConfig::default()).unwrap_err();
        assert!(!is_user_error(&err));
    }

    #[test]
    fn prompt_includes_issue_instructions() {
        let cmd = PromptCommand {
            title: "Tokio入門".to_string(),
            content: "Tokioは非同期ランタイムである。".to_string(),
            summary: "短い".to_string(),
        };
        let out = execute_prompt(&cmd);
        assert!(out.contains("タイトル: Tokio入門"));
        assert!(out.contains("80〜120文字に収めて"));
    }
}
