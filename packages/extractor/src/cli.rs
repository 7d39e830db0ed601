//! Command-line interface for the extractor.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::adapter::load_paragraphs;
use crate::classify::Classifier;
use crate::config::Settings;
use crate::error::{ExtractorError, Result};
use crate::extractor::{extract_folder, process_batches};
use crate::output::{save_collection, OutputFormat};
use crate::types::TrainingCollection;

/// Tehui Extractor - Extract training lesson collections from documents.
#[derive(Parser)]
#[command(name = "tehui-extractor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract one collection folder.
    Extract {
        /// Folder holding the outline, transcript and schedule documents
        folder: PathBuf,

        /// Output directory (default: from settings, else output/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Settings file (default: tehui.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Extract every collection folder under a resource directory.
    Batch {
        /// Directory whose subfolders are collection folders
        resource_dir: PathBuf,

        /// Output directory (default: from settings, else output/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Settings file (default: tehui.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the role of every paragraph in a document.
    Classify {
        /// Document to classify
        document: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            folder,
            output,
            format,
            config,
        } => {
            let settings = Settings::resolve(config.as_deref())?;
            let output_dir = output_dir(output, &settings)?;
            extract_command(&folder, &output_dir, format, &settings)
        }
        Commands::Batch {
            resource_dir,
            output,
            format,
            config,
        } => {
            let settings = Settings::resolve(config.as_deref())?;
            let output_dir = output_dir(output, &settings)?;
            batch_command(&resource_dir, &output_dir, format, &settings)
        }
        Commands::Classify { document } => classify_command(&document),
    }
}

/// Pick the output directory; an explicitly given one must already exist.
fn output_dir(output: Option<PathBuf>, settings: &Settings) -> Result<PathBuf> {
    let Some(output_dir) = output else {
        return Ok(settings.output_dir.clone());
    };
    if !output_dir.exists() {
        return Err(ExtractorError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Output directory does not exist: {}", output_dir.display()),
        )));
    }
    if !output_dir.is_dir() {
        return Err(ExtractorError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", output_dir.display()),
        )));
    }
    Ok(output_dir)
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn batch_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "collection".to_string())
}

fn print_summary(collection: &TrainingCollection) {
    println!("  Title: {}", style(&collection.title).green());
    if !collection.subtitle.is_empty() {
        println!("  Subtitle: {}", collection.subtitle);
    }
    println!("  Training: {} {}", collection.year, collection.season);
    println!("  Chapters: {}", collection.chapters.len());
    let days: usize = collection.chapters.iter().map(|c| c.schedule.len()).sum();
    println!("  Scheduled days: {days}");
    if !collection.warnings.is_empty() {
        println!("  Warnings: {}", style(collection.warnings.len()).yellow().bold());
    }
}

/// Execute the extract command.
fn extract_command(folder: &Path, output_dir: &Path, format: OutputFormat, settings: &Settings) -> Result<()> {
    let name = batch_name(folder);
    println!("{} {}", style("Extracting").bold(), style(&name).cyan());
    println!();

    let pb = spinner();
    pb.set_message("Reading documents...");

    let collection = match extract_folder(folder, settings) {
        Ok(collection) => collection,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Saving collection...");
    let output_path = match save_collection(&collection, output_dir, &name, format) {
        Ok(path) => path,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    print_summary(&collection);
    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output_path.display()
    );

    Ok(())
}

/// Execute the batch command.
fn batch_command(resource_dir: &Path, output_dir: &Path, format: OutputFormat, settings: &Settings) -> Result<()> {
    println!(
        "{} {}",
        style("Processing batches in").bold(),
        style(resource_dir.display()).cyan()
    );
    println!();

    let pb = spinner();
    pb.set_message("Extracting collections...");
    let outcomes = match process_batches(resource_dir, settings) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    let total = outcomes.len();
    let mut failed = 0;
    for outcome in outcomes {
        let saved = outcome
            .result
            .and_then(|collection| save_collection(&collection, output_dir, &outcome.name, format));
        match saved {
            Ok(path) => println!(
                "  {} {} -> {}",
                style("✓").green(),
                outcome.name,
                path.display()
            ),
            Err(e) => {
                failed += 1;
                println!("  {} {}: {}", style("✗").red(), outcome.name, style(e).red());
            }
        }
    }

    println!();
    println!(
        "{} {} of {} batches",
        style("Done:").bold(),
        total - failed,
        total
    );

    if failed > 0 {
        return Err(ExtractorError::BatchFailed { failed, total });
    }
    Ok(())
}

/// Execute the classify command.
fn classify_command(document: &Path) -> Result<()> {
    let classifier = Classifier::default();
    let paragraphs = load_paragraphs(document)?;

    for (index, paragraph) in paragraphs.iter().enumerate() {
        if paragraph.text.trim().is_empty() {
            continue;
        }
        let result = classifier.classify(paragraph);
        let source = if result.from_style { "style" } else { "text" };
        println!(
            "{:>5} {:<24} {:<5} {}",
            index + 1,
            style(result.role.label()).cyan(),
            source,
            paragraph.text.trim()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_extract() {
        let cli = Cli::parse_from(["tehui-extractor", "extract", "resource/2025-06-夏季"]);

        let Commands::Extract {
            folder,
            output,
            format,
            config,
        } = cli.command
        else {
            panic!("expected extract command");
        };
        assert_eq!(folder, PathBuf::from("resource/2025-06-夏季"));
        assert!(output.is_none());
        assert_eq!(format, OutputFormat::Yaml);
        assert!(config.is_none());
    }

    #[test]
    fn test_cli_parse_batch_with_format() {
        let cli = Cli::parse_from([
            "tehui-extractor",
            "batch",
            "resource",
            "--format",
            "json",
            "--output",
            "out",
        ]);

        let Commands::Batch {
            resource_dir,
            output,
            format,
            ..
        } = cli.command
        else {
            panic!("expected batch command");
        };
        assert_eq!(resource_dir, PathBuf::from("resource"));
        assert_eq!(output, Some(PathBuf::from("out")));
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_output_dir_must_exist() {
        let err = output_dir(Some(PathBuf::from("/nonexistent/tehui")), &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_output_dir_defaults_to_settings() {
        let settings = Settings::default();
        assert_eq!(output_dir(None, &settings).unwrap(), PathBuf::from("output"));
    }
}
