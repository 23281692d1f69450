use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Default)]
pub struct RenderReport {
    pub input: PathBuf,
    pub rows: usize,
    pub figures: Vec<FigureReport>,
}

#[derive(Serialize, Debug, Clone)]
pub struct FigureReport {
    pub index: usize,
    pub name: String,
    pub title: String,
    /// points drawn over all groups
    pub points: usize,
    /// points ringed as IMC processors
    pub highlighted: usize,
    pub files: Vec<PathBuf>,
}

impl RenderReport {
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.figures.iter().flat_map(|figure| figure.files.iter())
    }

    pub fn save_to_file(&self, filename: &Path) -> Result<()> {
        // create dir first
        if let Some(parent) = filename.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = std::fs::File::create(filename.with_extension("json"))
            .wrap_err("fail to create json file")?;
        serde_json::to_writer_pretty(&mut file, self).wrap_err("fail to write json file")?;
        Ok(())
    }
}
