use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pdf_guidebook::samples::{sample_guide, SAMPLE_TITLE};
use pdf_guidebook::{GuideBuilder, Theme};

/// Renders themed study guides from the command line.
///
/// Fonts must be present under `assets/fonts` next to the binary or the library crate, or be
/// provided via the `GUIDEBOOK_FONTS_DIR` environment variable.
#[derive(Parser)]
#[command(author, version, about = "Render themed study-guide PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the sample guide to `OUTPUT`.
    Build {
        /// Destination of the PDF; replaced atomically if it exists.
        output: PathBuf,

        /// JSON theme to use instead of the built-in dark preset.
        #[arg(long, value_name = "FILE")]
        theme: Option<PathBuf>,

        /// Text printed before the page number in the footer.
        #[arg(long)]
        footer: Option<String>,

        /// Add one PDF outline entry per numbered section.
        #[cfg(feature = "bookmarks")]
        #[arg(long)]
        bookmarks: bool,
    },

    /// Print the built-in dark theme as JSON.
    Theme,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            output,
            theme,
            footer,
            #[cfg(feature = "bookmarks")]
            bookmarks,
        } => {
            #[cfg(not(feature = "bookmarks"))]
            let bookmarks = false;
            build(output, theme, footer, bookmarks)
        }
        Commands::Theme => print_theme(),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn build(
    output: PathBuf,
    theme: Option<PathBuf>,
    footer: Option<String>,
    bookmarks: bool,
) -> Result<(), Box<dyn Error>> {
    let theme = match theme {
        Some(path) => {
            log::debug!("Loading theme from {}", path.display());
            Theme::load(path)?
        }
        None => Theme::dark(),
    };

    let mut builder = GuideBuilder::new(&theme)
        .with_title(SAMPLE_TITLE)
        .with_story(sample_guide(&theme));
    if let Some(footer) = footer {
        builder = builder.with_footer_title(footer);
    }

    let document = if bookmarks {
        render_with_bookmarks(builder)?
    } else {
        builder.render()?
    };
    pdf_guidebook::builder::write_atomically(&output, &document.bytes)?;
    println!(
        "Wrote {} ({} pages) to {}",
        SAMPLE_TITLE,
        document.page_count,
        output.display()
    );
    Ok(())
}

#[cfg(feature = "bookmarks")]
fn render_with_bookmarks(
    builder: GuideBuilder<'_>,
) -> Result<pdf_guidebook::backend::RenderedDocument, Box<dyn Error>> {
    Ok(builder.render_with_bookmarks()?)
}

#[cfg(not(feature = "bookmarks"))]
fn render_with_bookmarks(
    builder: GuideBuilder<'_>,
) -> Result<pdf_guidebook::backend::RenderedDocument, Box<dyn Error>> {
    Ok(builder.render()?)
}

fn print_theme() -> Result<(), Box<dyn Error>> {
    println!("{}", Theme::dark().to_config().to_json_string()?);
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
