use clap::Parser;
use image_enhancer::{
    BatchConfig, EnhancementOptions, OutputFormat, batch, enhance_to_formats, output,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-enhancer")]
#[command(about = "Denoise, correct, upscale and sharpen photos")]
#[command(long_about = "\
Denoise, correct, upscale and sharpen photos

Each input runs through a fixed pipeline:

  denoise → white balance → local contrast (CLAHE) → contrast stretch
          → resize (Lanczos3) → unsharp mask → saturation

and is written as PNG, JPEG, WebP and single-frame APNG:

  outputs/
  ├── photo_enhanced.png
  ├── photo_enhanced.jpg
  ├── photo_enhanced.webp
  └── photo_enhanced.apng

Set RUST_LOG=debug to see per-stage timings on stderr.")]
#[command(version = env!("IMAGE_ENHANCER_VERSION"))]
struct Cli {
    /// Input images (JPEG, PNG, TIFF, WebP, BMP, GIF)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "outputs")]
    out: PathBuf,

    /// Upscale factor, ignored when --width or --height is given
    #[arg(long, default_value_t = 2.0, conflicts_with_all = ["width", "height"])]
    scale: f32,

    /// Target width in pixels; height follows the aspect ratio unless --height is set
    #[arg(long)]
    width: Option<u32>,

    /// Target height in pixels; width follows the aspect ratio unless --width is set
    #[arg(long)]
    height: Option<u32>,

    /// Luma denoise strength, 0 to 20 (0 disables)
    #[arg(long, default_value_t = 5)]
    denoise_luma: u8,

    /// Chroma denoise strength, 0 to 20 (0 disables)
    #[arg(long, default_value_t = 5)]
    denoise_color: u8,

    /// CLAHE clip limit, 0.5 to 5.0
    #[arg(long, default_value_t = 2.0)]
    clahe_clip: f32,

    /// Unsharp mask amount, 0 to 2.0 (0 disables)
    #[arg(long, default_value_t = 0.6)]
    sharpen_amount: f32,

    /// Unsharp mask Gaussian sigma, 0.1 to 3.0
    #[arg(long, default_value_t = 1.2)]
    sharpen_sigma: f32,

    /// Saturation multiplier, 0 to 2.0 (1.0 disables)
    #[arg(long, default_value_t = 1.05)]
    saturation: f32,

    /// Only write these formats (repeatable); default is all four
    #[arg(long = "format", value_name = "png|jpg|webp|apng")]
    formats: Vec<OutputFormat>,

    /// Print a JSON object of data URLs to stdout instead of writing files
    #[arg(long)]
    json: bool,

    /// Maximum number of images processed in parallel (default: all cores)
    #[arg(long)]
    threads: Option<usize>,
}

impl Cli {
    fn options(&self) -> EnhancementOptions {
        EnhancementOptions {
            scale: self.scale,
            width: self.width,
            height: self.height,
            denoise_luma: self.denoise_luma,
            denoise_color: self.denoise_color,
            clahe_clip: self.clahe_clip,
            sharpen_amount: self.sharpen_amount,
            sharpen_sigma: self.sharpen_sigma,
            saturation: self.saturation,
        }
    }

    fn formats(&self) -> Vec<OutputFormat> {
        if self.formats.is_empty() {
            OutputFormat::ALL.to_vec()
        } else {
            let mut formats = self.formats.clone();
            formats.sort();
            formats.dedup();
            formats
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    let options = cli.options();
    let formats = cli.formats();

    if cli.json {
        let [input] = cli.inputs.as_slice() else {
            return Err("--json takes exactly one input".into());
        };
        let bytes = std::fs::read(input)?;
        let encoded = enhance_to_formats(&bytes, &options, &formats)?;
        println!("{}", serde_json::to_string_pretty(&encoded.to_json())?);
        return Ok(());
    }

    let config = BatchConfig {
        max_threads: cli.threads,
    };
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_batch_event(&event);
        }
    });
    let results = batch::process_batch(&cli.inputs, &cli.out, &options, &formats, &config, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let results = results?;

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    println!();
    println!("{}", output::format_summary(results.len(), failed));
    if failed > 0 {
        return Err(format!("{failed} of {} inputs failed", results.len()).into());
    }
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scale_conflicts_with_explicit_size() {
        let result = Cli::try_parse_from(["image-enhancer", "--scale", "3", "--width", "40", "a.png"]);
        assert!(result.is_err());
    }

    #[test]
    fn repeated_formats_are_deduplicated() {
        let cli = Cli::try_parse_from([
            "image-enhancer",
            "--format",
            "webp",
            "--format",
            "png",
            "--format",
            "webp",
            "a.png",
        ])
        .unwrap();
        assert_eq!(cli.formats(), vec![OutputFormat::Png, OutputFormat::Webp]);
    }
}
