//! Renders a toolbar icon from sprite sheets on disk and saves it as PNG.
//!
//! ```text
//! render-icon --sprites assets/ --size 32 --scheme lightfg 46 icon.png
//! ```

use std::path::PathBuf;

use addr_badge::{ColorScheme, IconCompositor, IconSize, Pattern, SpriteSource};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "render-icon", about = "Render a toolbar icon glyph pattern")]
struct Args {
    /// Glyph pattern: up to three of `4`, `6` and `?`.
    pattern: Pattern,

    /// Output PNG path.
    output: PathBuf,

    /// Directory holding sprites16.png and sprites32.png.
    #[arg(long, default_value = ".")]
    sprites: PathBuf,

    /// Icon size in pixels (16 or 32).
    #[arg(long, default_value = "16", value_parser = parse_size)]
    size: IconSize,

    /// Color scheme: darkfg or lightfg.
    #[arg(long, default_value = "darkfg")]
    scheme: ColorScheme,

    /// Enable debug logging (RUST_LOG overrides the level).
    #[arg(long)]
    debug: bool,
}

fn parse_size(value: &str) -> Result<IconSize, String> {
    let pixels: u32 = value.parse().map_err(|e| format!("{e}"))?;
    IconSize::try_from(pixels).map_err(|e| e.to_string())
}

/// Reads sprite sheets from a directory.
struct DirSource {
    root: PathBuf,
}

impl SpriteSource for DirSource {
    type Error = std::io::Error;

    fn resolve_url(&self, resource: &str) -> String {
        self.root.join(resource).display().to_string()
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, Self::Error> {
        std::fs::read(url)
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.debug);

    let mut compositor = IconCompositor::new();
    pollster::block_on(compositor.load(&DirSource {
        root: args.sprites.clone(),
    }))?;

    let icon = compositor.render(&args.pattern, args.size, args.scheme)?;
    icon.save(&args.output)?;
    info!(pattern = %args.pattern, size = %args.size, output = %args.output.display(), "wrote icon");
    Ok(())
}
