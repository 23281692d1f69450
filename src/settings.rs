use std::path::{Path, PathBuf};

use config::{Config, FileFormat};
use eyre::eyre;
use eyre::Context;
use eyre::Result;
use serde::Deserialize;

use crate::figure::FIGURE_COUNT;

const DEFAULT_CONFIG: &str = include_str!("../configs/default.toml");

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub csv_file: PathBuf,
    pub output_dir: PathBuf,
    pub save_pdf: bool,
    pub save_svg: bool,
    /// one toggle per figure, figure `n` reads entry `n - 1`
    pub mark_imc_processor: Vec<bool>,
    pub tech_list: Vec<i32>,
    pub arch_list: Vec<String>,
    pub arch_label_list: Vec<String>,
    pub figure_width: u32,
    pub figure_height: u32,
    pub report_file: Option<PathBuf>,
}

impl Settings {
    /// build the settings from the built-in defaults, then every file in order
    pub fn new<P: AsRef<Path>>(config_files: &[P]) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        for path in config_files {
            let name = path
                .as_ref()
                .to_str()
                .ok_or(eyre!("Invalid path: {:?}", path.as_ref()))?;
            builder = builder.add_source(config::File::with_name(name));
        }
        let settings = builder.build().wrap_err("cannot build Setting object")?;
        let ret: Settings = settings
            .try_deserialize()
            .wrap_err("failed to deserialize")?;
        Ok(ret)
    }

    pub fn from_defaults() -> Result<Self> {
        Self::new::<PathBuf>(&[])
    }

    pub fn validate(&self) -> Result<()> {
        if self.mark_imc_processor.len() != FIGURE_COUNT {
            return Err(eyre!(
                "mark_imc_processor needs {} entries, got {}",
                FIGURE_COUNT,
                self.mark_imc_processor.len()
            ));
        }
        if self.arch_list.len() != self.arch_label_list.len() {
            return Err(eyre!(
                "arch_list has {} entries but arch_label_list has {}",
                self.arch_list.len(),
                self.arch_label_list.len()
            ));
        }
        if !self.save_pdf && !self.save_svg {
            return Err(eyre!("both save_pdf and save_svg are disabled"));
        }
        if self.figure_width == 0 || self.figure_height == 0 {
            return Err(eyre!(
                "invalid figure size {}x{}",
                self.figure_width,
                self.figure_height
            ));
        }
        Ok(())
    }

    /// whether figure `index` (1-based) rings the IMC processors
    pub fn highlight(&self, index: usize) -> bool {
        index
            .checked_sub(1)
            .and_then(|i| self.mark_imc_processor.get(i))
            .copied()
            .unwrap_or(false)
    }

    pub fn figure_size(&self) -> (u32, u32) {
        (self.figure_width, self.figure_height)
    }

    /// (architecture name, legend label) pairs
    pub fn arch_groups(&self) -> impl Iterator<Item = (&str, &str)> {
        self.arch_list
            .iter()
            .map(String::as_str)
            .zip(self.arch_label_list.iter().map(String::as_str))
    }
}
