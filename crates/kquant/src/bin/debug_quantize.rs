use clap::Parser;
use kquant::InputImage;
use rgb::ComponentBytes;
use std::path::PathBuf;
use std::time::Instant;

/// Quantize an image to a reduced palette and write the result as a PNG.
#[derive(Parser)]
struct Args {
    /// Path to the input image
    input: PathBuf,

    /// Number of palette colors to target
    #[arg(short = 'k', long, default_value_t = 8)]
    colors: usize,

    /// Output path (defaults to `<input>.quantized.png`)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    pretty_env_logger::init();
    let args = Args::parse();

    let img = image::open(&args.input).unwrap().to_rgba8();
    let input = InputImage::try_from(&img).unwrap();

    let t = Instant::now();
    let result = kquant::quantize(input, args.colors).unwrap();
    let elapsed = t.elapsed();

    let out_path = args
        .output
        .unwrap_or_else(|| args.input.with_extension("quantized.png"));
    let out = image::RgbaImage::from_raw(
        result.width,
        result.height,
        result.pixels.as_bytes().to_vec(),
    )
    .unwrap();
    out.save(&out_path).unwrap();

    println!(
        "{}: {} colors, {:?}, wrote {}",
        args.input.display(),
        result.palette.len(),
        elapsed,
        out_path.display(),
    );
}
