mod cli;

use anyhow::Result;
use clap::Parser;
use gffmerge_rs::annotation::{load_annotations, save_annotations};
use gffmerge_rs::reconcile;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            if args.quiet {
                EnvFilter::new("warn")
            } else {
                EnvFilter::new("info")
            }
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut annotations = load_annotations(&args.old_annotations)?;
    let edits = load_annotations(&args.new_annotations)?;
    let stats = reconcile(&mut annotations, edits)?;
    save_annotations(&annotations, &args.out)?;

    tracing::info!(
        added = stats.added,
        replaced = stats.replaced,
        deleted = stats.deleted,
        skipped = stats.skipped,
        out = %args.out.display(),
        "gffmerge-rs: merge complete"
    );
    Ok(())
}
