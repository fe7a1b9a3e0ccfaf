use clap::{Parser, Subcommand};
use photo_variants::{config, output, process};
use std::path::Path;

#[derive(Parser)]
#[command(name = "photo-variants")]
#[command(about = "Generate responsive AVIF/WebP/JPEG variants of a fixed photo set")]
#[command(long_about = "\
Generate responsive AVIF/WebP/JPEG variants of a fixed photo set

Every source image is rotated upright from its EXIF orientation and encoded
at each configured width in each configured format:

  src/sports/img_9050.jpg  →  assets/sports/img_9050-w480.avif
                              assets/sports/img_9050-w480.webp
                              assets/sports/img_9050-w480.jpg
                              ...
                              assets/sports/manifest.json

Images are never enlarged. A source that cannot be read is skipped; a variant
that fails to encode is skipped. The run fails only if the output directory
or the manifest cannot be written.

Settings come from photo-variants.toml in the current directory when present,
otherwise the built-in defaults are used. Run 'photo-variants gen-config' to
print a documented config file.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock photo-variants.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config(Path::new("."))?;
    init_thread_pool(&config.processing);

    let catalog = config.catalog();
    let matrix = config.matrix();

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let result = process::process(&catalog, &matrix, &config.output_dir, Some(tx));
    // Sender is dropped by now, so the printer drains and exits
    if printer.join().is_err() {
        tracing::warn!("progress printer panicked");
    }
    let result = result?;

    output::print_summary(&result, &config.output_dir);
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
