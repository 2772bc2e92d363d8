use anyhow::Result;
use clap::Parser;
use floatpress::decompress;
use floatpress_cli::{decoded_f64s, read_blob, write_f64_file};
use std::path::PathBuf;

/// Decompresses a floatpress blob back into a raw little-endian f64 file.
#[derive(Parser, Debug)]
#[command(about = "Decompress a floatpress blob into a raw f64 file")]
struct Args {
  input: PathBuf,
  output: PathBuf,
}

fn main() -> Result<()> {
  env_logger::init();
  let args = Args::parse();
  let blob = read_blob(&args.input)?;
  let framed = decompress(&blob)?;
  let xs = decoded_f64s(&framed)?;
  write_f64_file(&args.output, &xs)?;
  Ok(())
}
