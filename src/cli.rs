use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gffmerge-rs",
    about = "Merge curated gene models from an annotation editor export into a GFF3 annotation",
    version
)]
pub struct Args {
    /// Original annotations (MAKER or a similar gene predictor)
    #[arg(value_name = "OLD_GFF")]
    pub old_annotations: PathBuf,

    /// Curated annotations exported from Apollo
    #[arg(value_name = "NEW_GFF")]
    pub new_annotations: PathBuf,

    /// Output GFF3 path
    #[arg(short = 'o', long = "out", value_name = "GFF3", default_value = "output.gff3")]
    pub out: PathBuf,

    /// Set logging level to WARN
    #[arg(short = 'q', long)]
    pub quiet: bool,
}
