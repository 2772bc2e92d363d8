use anyhow::Result;
use clap::Parser;
use floatpress::compress_f32;
use floatpress_cli::{read_f32_file, write_blob, TierArg};
use std::path::PathBuf;

/// Compresses a raw little-endian f32 file into a floatpress blob.
#[derive(Parser, Debug)]
#[command(about = "Compress a raw f32 file with floatpress")]
struct Args {
  /// Accuracy tier: L (~1%), M (~0.5%), H (~0.2%).
  #[arg(short = 'L', long = "low", group = "tier")]
  low: bool,
  #[arg(short = 'M', long = "medium", group = "tier")]
  medium: bool,
  #[arg(short = 'H', long = "high", group = "tier")]
  high: bool,
  input: PathBuf,
  output: PathBuf,
}

impl Args {
  fn tier(&self) -> TierArg {
    if self.high {
      TierArg::H
    } else if self.medium {
      TierArg::M
    } else {
      TierArg::L
    }
  }
}

fn main() -> Result<()> {
  env_logger::init();
  let args = Args::parse();
  let xs = read_f32_file(&args.input)?;
  let blob = compress_f32(&xs, args.tier().into())?;
  write_blob(&args.output, &blob)?;
  Ok(())
}
