use anyhow::Result;
use clap::Parser;
use floatpress::compress_f64;
use floatpress_cli::{read_f64_file, write_blob, TierArg};
use std::path::PathBuf;

/// Compresses a raw little-endian f64 file into a floatpress blob.
#[derive(Parser, Debug)]
#[command(about = "Compress a raw f64 file with floatpress")]
struct Args {
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
  let xs = read_f64_file(&args.input)?;
  let blob = compress_f64(&xs, args.tier().into())?;
  write_blob(&args.output, &blob)?;
  Ok(())
}
