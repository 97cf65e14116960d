/////////////////////////////////
use clap::Parser;
use std::path::PathBuf;
/////////////////////////////////

/// Show which symbols and sections changed size between two ELF files.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Options {
    /// Old ELF file
    #[arg(long)]
    pub old: PathBuf,

    /// New ELF file
    #[arg(long)]
    pub new: PathBuf,

    /// Prefix to the `readelf` binary, e.g. `arm-none-eabi-` for a cross toolchain.
    #[arg(long, env = "ELFDIFF_PREFIX", default_value = "")]
    pub prefix: String,

    /// File to save HTML output to, in addition to the text report on stdout.
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Also list the N largest symbols of the new file.
    #[arg(long, value_name = "N")]
    pub largest: Option<usize>,
}
