use anyhow::Result;
use clap::Parser;
use floatpress_cli::{percent_error_stats, read_f32_file};
use std::path::PathBuf;

/// Reports mean and max absolute percent error between two raw f32 files.
#[derive(Parser, Debug)]
#[command(about = "Compare two raw f32 files and report percent error")]
struct Args {
  /// Print the per-element percent error alongside the summary.
  #[arg(short = 'v', long = "verbose")]
  verbose: bool,
  a: PathBuf,
  b: PathBuf,
}

fn main() -> Result<()> {
  env_logger::init();
  let args = Args::parse();
  let a: Vec<f64> = read_f32_file(&args.a)?.into_iter().map(|x| x as f64).collect();
  let b: Vec<f64> = read_f32_file(&args.b)?.into_iter().map(|x| x as f64).collect();

  if args.verbose {
    for (i, (&x, &y)) in a.iter().zip(b.iter()).enumerate() {
      let pct_err = if x == 0.0 { (y - x).abs() } else { ((y - x) / x).abs() * 100.0 };
      println!("{}: {} vs {} ({:.4}%)", i, x, y, pct_err);
    }
  }

  let (mean_pct_err, max_pct_err) = percent_error_stats(&a, &b)?;
  println!("mean %err: {:.6}", mean_pct_err);
  println!("max %err: {:.6}", max_pct_err);
  Ok(())
}
