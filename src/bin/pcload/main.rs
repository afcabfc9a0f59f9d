//! pcload CLI - inspect and benchmark point cloud files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pcload::prelude::*;
use pcload::util::BBox3f;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("PCLOAD_BUILD_DATE"), ")");

#[derive(Parser, Debug)]
#[command(name = "pcload", version, long_version = LONG_VERSION, about = "Point cloud file toolkit (PLY, SPLAT, XYZ)")]
struct Args {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only errors, no progress bars
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Settings file (defaults to the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Keep original coordinates instead of centering
    #[arg(long, global = true)]
    no_center: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show format, point count, bounds and color summary
    #[command(alias = "i")]
    Info {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print decoded points
    #[command(alias = "d")]
    Dump {
        file: PathBuf,
        /// Maximum number of points to print
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
        /// Emit JSON instead of text
        #[arg(short, long)]
        json: bool,
    },
    /// Time decode vs cache hits and check decodes are repeatable
    #[command(alias = "b")]
    Bench {
        file: PathBuf,
        /// Number of cached loads after the first decode
        #[arg(short, long, default_value_t = 10)]
        repeat: usize,
    },
}

fn main() {
    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(args: &Args) {
    let default_level = match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => LoaderSettings::load_from(path),
        None => LoaderSettings::load(),
    };
    if args.no_center {
        settings.center_on_load = false;
    }
    tracing::debug!(?settings, "settings");

    let mut loader = CloudLoader::new(FsSource, settings);
    let quiet = args.quiet;

    match args.command {
        Command::Info { files } => {
            for file in &files {
                cmd_info(&mut loader, file, quiet)?;
            }
        }
        Command::Dump { file, limit, json } => cmd_dump(&mut loader, &file, limit, json, quiet)?,
        Command::Bench { file, repeat } => cmd_bench(&mut loader, &file, repeat, quiet)?,
    }
    Ok(())
}

/// Progress bar fed by decoder progress events.
fn progress_bar(path: &Path, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} points ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message(path.display().to_string());
    pb
}

fn load_with_bar(
    loader: &mut CloudLoader,
    path: &Path,
    quiet: bool,
) -> Result<std::sync::Arc<PointCloud>> {
    let pb = progress_bar(path, quiet);
    let result = loader.load(path, &mut |e: ProgressEvent| {
        pb.set_length(e.total.max(e.loaded) as u64);
        pb.set_position(e.loaded as u64);
    });
    pb.finish_and_clear();
    result.with_context(|| format!("loading {}", path.display()))
}

fn cmd_info(loader: &mut CloudLoader, path: &Path, quiet: bool) -> Result<()> {
    let format = Format::from_path(path)?;
    let start = Instant::now();
    let cloud = load_with_bar(loader, path, quiet)?;
    let elapsed = start.elapsed();

    println!("{}", path.display());
    println!("  format:  {}", format);
    println!("  points:  {}", cloud.len());
    println!("  decoded: {:.1} ms", elapsed.as_secs_f64() * 1000.0);
    print_bounds(&cloud.bounds(), loader.settings().center_on_load);

    if !cloud.is_empty() {
        let sum: Vec4 = cloud.colors().iter().copied().sum();
        let mean = sum / cloud.len() as f32;
        let white = cloud.colors().iter().filter(|c| **c == Vec4::ONE).count();
        println!(
            "  color:   mean rgba ({:.3}, {:.3}, {:.3}, {:.3}), {} opaque white",
            mean.x, mean.y, mean.z, mean.w, white
        );
    }
    Ok(())
}

fn print_bounds(bb: &BBox3f, centered: bool) {
    if bb.is_empty() {
        println!("  bounds:  empty");
        return;
    }
    let size = bb.size();
    println!(
        "  bounds:  ({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3}){}",
        bb.min.x, bb.min.y, bb.min.z, bb.max.x, bb.max.y, bb.max.z,
        if centered { " centered" } else { "" }
    );
    println!("  size:    {:.3} x {:.3} x {:.3}", size.x, size.y, size.z);
}

fn cmd_dump(loader: &mut CloudLoader, path: &Path, limit: usize, json: bool, quiet: bool) -> Result<()> {
    let cloud = load_with_bar(loader, path, quiet || json)?;
    let points = cloud.positions().iter().zip(cloud.colors()).take(limit);

    if json {
        let points: Vec<_> = points
            .map(|(p, c)| {
                serde_json::json!({
                    "position": p.to_array(),
                    "color": c.to_array(),
                })
            })
            .collect();
        let doc = serde_json::json!({
            "file": path.display().to_string(),
            "total": cloud.len(),
            "points": points,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for (i, (p, c)) in points.enumerate() {
            println!(
                "{:>8}  {:>10.4} {:>10.4} {:>10.4}   {:.3} {:.3} {:.3} {:.3}",
                i, p.x, p.y, p.z, c.x, c.y, c.z, c.w
            );
        }
        if cloud.len() > limit {
            println!("... {} more", cloud.len() - limit);
        }
    }
    Ok(())
}

fn cmd_bench(loader: &mut CloudLoader, path: &Path, repeat: usize, quiet: bool) -> Result<()> {
    let start = Instant::now();
    let first = load_with_bar(loader, path, quiet)?;
    let decode_ms = start.elapsed().as_secs_f64() * 1000.0;

    let start = Instant::now();
    for _ in 0..repeat {
        loader.load(path, &mut NoProgress)?;
    }
    let hit_ms = start.elapsed().as_secs_f64() * 1000.0 / repeat.max(1) as f64;

    let a = loader.decode_uncached(path, &mut NoProgress)?;
    let b = loader.decode_uncached(path, &mut NoProgress)?;
    let identical = bit_identical(&a, &b);

    println!("{}: {} points", path.display(), first.len());
    println!("  first load: {:.2} ms", decode_ms);
    println!("  cache hit:  {:.4} ms avg over {}", hit_ms, repeat);
    println!("  repeatable: {}", if identical { "yes" } else { "NO" });

    if !identical {
        anyhow::bail!("two uncached decodes of {} differ", path.display());
    }
    Ok(())
}

/// Compare buffers by bit pattern so NaNs compare equal to themselves.
fn bit_identical(a: &PointCloud, b: &PointCloud) -> bool {
    let bits3 = |v: &Vec3| v.to_array().map(f32::to_bits);
    let bits4 = |v: &Vec4| v.to_array().map(f32::to_bits);
    a.len() == b.len()
        && a.positions().iter().map(bits3).eq(b.positions().iter().map(bits3))
        && a.colors().iter().map(bits4).eq(b.colors().iter().map(bits4))
}
