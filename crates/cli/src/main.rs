//! CLI tool for building presentation files from JSON deck configurations.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{Formatter, Presentation, PresentationConfig, SendOptions, WriterFormat, WriterRegistry};
use deck_odp::OdpWriter;
use deck_pptx::PptxWriter;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Build presentation files from JSON deck configurations.
#[derive(Parser, Debug)]
#[command(name = "deck-build")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input deck configuration file(s) (.json)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: PowerPoint2007, ODPresentation, Serialized, or an
    /// extension such as pptx (default: PowerPoint2007)
    #[arg(short, long)]
    format: Option<WriterFormat>,

    /// Print the document to stdout instead of writing a file
    /// (default format: Serialized)
    #[arg(short, long)]
    print: bool,

    /// Locale used to format numeric and boolean text (e.g. de-DE)
    #[arg(short, long, default_value = "en-US")]
    locale: String,

    /// Text placed on configured slides that have no content
    #[arg(long)]
    empty_slide: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut failed = 0;
    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        if let Err(e) = process_file(input_path, &args) {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, args.input.len());
    }
    Ok(())
}

/// Writers for every supported format.
fn writer_registry() -> WriterRegistry {
    WriterRegistry::new()
        .with(PptxWriter::new())
        .with(OdpWriter::new())
}

/// A presentation with every writer registered and the CLI's formatting
/// options applied.
fn build_presentation(config: PresentationConfig, args: &Args, format: WriterFormat) -> Presentation {
    let presentation = Presentation::new(config)
        .with_formatter(Formatter::for_locale(&args.locale))
        .with_writers(writer_registry())
        .with_writer_format(format);
    match &args.empty_slide {
        Some(text) => presentation.with_empty_slide(text.as_str()),
        None => presentation,
    }
}

/// Build one configuration and write or print the result.
fn process_file(input_path: &Path, args: &Args) -> Result<()> {
    let config = PresentationConfig::from_path(input_path)
        .with_context(|| format!("Failed to load {}", input_path.display()))?;

    let format = resolve_format(args.format, args.print);
    log::debug!("Building {} as {}", input_path.display(), format);
    let mut presentation = build_presentation(config, args, format);

    if args.print {
        let attachment = presentation
            .send(&format!("deck.{}", format.extension()), SendOptions::default())
            .context("Failed to render document")?;
        let bytes = attachment.into_bytes()?;
        io::stdout()
            .write_all(&bytes)
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    let output_path = get_output_path(input_path, args.output.as_deref(), format);
    presentation
        .save(&output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if args.verbose {
        eprintln!(
            "  Wrote {} slide(s) to {}",
            presentation.document().slide_count(),
            output_path.display()
        );
    }
    Ok(())
}

/// Printing defaults to the textual format.
fn resolve_format(requested: Option<WriterFormat>, print: bool) -> WriterFormat {
    match requested {
        Some(format) => format,
        None if print => WriterFormat::Serialized,
        None => WriterFormat::default(),
    }
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&Path>, format: WriterFormat) -> PathBuf {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.{}", stem, format.extension());

    match output_dir {
        Some(dir) => dir.join(output_filename),
        None => match input_path.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "deck-build",
            "a.json",
            "b.json",
            "--format",
            "odp",
            "--locale",
            "de-DE",
            "-o",
            "out",
        ])
        .unwrap();

        assert_eq!(args.input.len(), 2);
        assert_eq!(args.format, Some(WriterFormat::ODPresentation));
        assert_eq!(args.locale, "de-DE");
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(!args.print);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Args::try_parse_from(["deck-build", "a.json", "--format", "doc"]).is_err());
    }

    #[test]
    fn test_resolve_format() {
        assert_eq!(resolve_format(None, false), WriterFormat::PowerPoint2007);
        assert_eq!(resolve_format(None, true), WriterFormat::Serialized);
        assert_eq!(
            resolve_format(Some(WriterFormat::ODPresentation), true),
            WriterFormat::ODPresentation
        );
    }

    #[test]
    fn test_output_path() {
        let input = Path::new("decks/q3.json");
        assert_eq!(
            get_output_path(input, None, WriterFormat::PowerPoint2007),
            PathBuf::from("decks/q3.pptx")
        );
        assert_eq!(
            get_output_path(input, Some(Path::new("build")), WriterFormat::ODPresentation),
            PathBuf::from("build/q3.odp")
        );
    }

    #[test]
    fn test_registry_covers_all_formats() {
        assert_eq!(writer_registry().formats(), WriterFormat::ALL.to_vec());
    }

    #[test]
    fn test_built_presentation_saves_default_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let args = Args::try_parse_from(["deck-build", "deck.json", "--empty-slide", "TBD"]).unwrap();
        let config = PresentationConfig::from_json(r#"{"slides": [{"name": "blank"}]}"#).unwrap();

        let mut presentation = build_presentation(config, &args, WriterFormat::default());
        presentation.save(&path).unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"PK\x03\x04"));
        let slide = &presentation.document().slides()[0];
        assert_eq!(slide.shapes[0].text().unwrap().content, "TBD");
    }

    #[test]
    fn test_process_file_writes_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("deck.json");
        std::fs::write(
            &input,
            r#"{"slides": [{"name": "One", "content": [{"text": "Hello"}]}]}"#,
        )
        .unwrap();
        let out_dir = dir.path().join("nested/out");

        for format in WriterFormat::ALL {
            let args = Args::try_parse_from([
                "deck-build",
                input.to_str().unwrap(),
                "--format",
                format.name(),
                "--output",
                out_dir.to_str().unwrap(),
            ])
            .unwrap();
            process_file(&input, &args).unwrap();

            let written = out_dir.join(format!("deck.{}", format.extension()));
            assert!(std::fs::metadata(&written).unwrap().len() > 0, "{} is empty", format);
        }
    }
}
