use std::path::PathBuf;

use clap::{Parser, ValueHint};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[clap(author, version, about = "plot the IMC benchmark figures", long_about = None)]
pub struct Args {
    /// Generate completion for the given shell
    #[clap(long = "generate", short = 'g', arg_enum)]
    pub generator: Option<Shell>,
    /// the benchmark csv, overrides `csv_file`
    #[clap(long = "input", short = 'i', parse(from_os_str), value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,
    /// the output folder, overrides `output_dir`
    #[clap(long = "output", short = 'o', parse(from_os_str), value_hint = ValueHint::DirPath)]
    pub output: Option<PathBuf>,
    /// only render these figures (1-7), all of them by default
    #[clap(long = "figure", short = 'f')]
    pub figures: Vec<usize>,
    /// config files applied over the defaults, later ones win
    #[clap(parse(from_os_str), value_hint = ValueHint::FilePath)]
    pub config_file: Vec<PathBuf>,
}
