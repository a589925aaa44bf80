/// Example: Pack files from disk into a deck, a document and an archive.
///
/// This example demonstrates how to use the u2p library to:
/// - Ingest files as uploads (the media type is guessed from the extension)
/// - Configure the export (titles, slide size, presentation title)
/// - Export all three artifacts concurrently and write them out
///
/// Usage:
///   cargo run --example pack -- photo.jpg notes.pdf --titles -o out/
///
/// Set `RUST_LOG=u2p=debug` to see ingestion and fallback events.
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use u2p::{ExportOptions, Session, SlideSize, Upload};

#[derive(Parser, Debug)]
#[command(name = "pack", about = "Upload to Present: turn files into a deck, a PDF and a ZIP")]
struct Args {
    /// Files to include, in slide order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Caption image slides with the file name
    #[arg(long)]
    titles: bool,

    /// Presentation title; adds a title slide
    #[arg(long)]
    title: Option<String>,

    /// Slide canvas
    #[arg(long, value_enum, default_value_t = Canvas::Letter)]
    size: Canvas,

    /// Nest archive entries under the batch id
    #[arg(long)]
    folder: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Canvas {
    Letter,
    Standard,
    Wide,
}

impl From<Canvas> for SlideSize {
    fn from(canvas: Canvas) -> Self {
        match canvas {
            Canvas::Letter => SlideSize::LetterPortrait,
            Canvas::Standard => SlideSize::Standard4x3,
            Canvas::Wide => SlideSize::Widescreen16x9,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("u2p=info")),
        )
        .init();

    let args = Args::parse();

    let mut options = ExportOptions::new()
        .with_slide_size(args.size.into())
        .with_titles(args.titles)
        .with_archive_folder(args.folder);
    if let Some(title) = args.title {
        options = options.with_presentation_title(title);
    }

    let mut session = Session::with_options(options);
    println!("Batch ID: {}", session.batch_id());

    let mut uploads = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Empty media type: guessed from the extension
        uploads.push(Upload::new(content, name, ""));
    }

    if let Err(problems) = session.batch_mut().add_many(uploads) {
        for problem in &problems {
            eprintln!("  rejected: {}", problem);
        }
        std::process::exit(2);
    }

    let batch = session.batch();
    println!(
        "Files: {} ({} images), {:.1} MB in memory",
        batch.len(),
        batch.image_count(),
        batch.total_size_bytes() as f64 / (1024.0 * 1024.0)
    );

    std::fs::create_dir_all(&args.output)?;
    let bundle = session.export_all();
    let mut failed = false;
    for result in bundle.iter() {
        match result {
            Ok(export) => {
                let path = args.output.join(&export.filename);
                std::fs::write(&path, &export.bytes)?;
                println!(
                    "  {:<8} {:>4} item(s)  {}",
                    export.kind,
                    export.item_count,
                    path.display()
                );
                for warning in &export.warnings {
                    println!("           warning: {}", warning);
                }
            },
            Err(e) => {
                eprintln!("  {}", e);
                failed = true;
            },
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
