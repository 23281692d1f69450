use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Context, Result};
use svg2pdf::usvg;
use tracing::{debug, info};

use crate::settings::Settings;

/// `<output_dir>/svg` and `<output_dir>/pdf`, each present only when enabled
#[derive(Debug, Clone)]
pub struct OutputLayout {
    svg_dir: Option<PathBuf>,
    pdf_dir: Option<PathBuf>,
}

impl OutputLayout {
    pub fn new(output_dir: &Path, save_svg: bool, save_pdf: bool) -> Self {
        OutputLayout {
            svg_dir: save_svg.then(|| output_dir.join("svg")),
            pdf_dir: save_pdf.then(|| output_dir.join("pdf")),
        }
    }

    /// create the base folder and every enabled format folder
    pub fn prepare(settings: &Settings) -> Result<Self> {
        let layout = Self::new(&settings.output_dir, settings.save_svg, settings.save_pdf);
        fs::create_dir_all(&settings.output_dir)
            .wrap_err(format!("cannot create {:?}", settings.output_dir))?;
        for dir in layout.svg_dir.iter().chain(layout.pdf_dir.iter()) {
            fs::create_dir_all(dir).wrap_err(format!("cannot create {:?}", dir))?;
        }
        debug!(?layout, "output folders ready");
        Ok(layout)
    }

    pub fn svg_path(&self, name: &str) -> Option<PathBuf> {
        self.svg_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.svg", name)))
    }

    pub fn pdf_path(&self, name: &str) -> Option<PathBuf> {
        self.pdf_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.pdf", name)))
    }

    /// write one figure in every enabled format, returns the written files
    pub fn write(&self, name: &str, svg: &str) -> Result<Vec<PathBuf>> {
        let mut written = vec![];
        if let Some(path) = self.svg_path(name) {
            fs::write(&path, svg).wrap_err(format!("fail to write {:?}", path))?;
            info!("saved {:?}", path);
            written.push(path);
        }
        if let Some(path) = self.pdf_path(name) {
            let pdf = svg_to_pdf(svg).wrap_err(format!("fail to convert {} to pdf", name))?;
            fs::write(&path, pdf).wrap_err(format!("fail to write {:?}", path))?;
            info!("saved {:?}", path);
            written.push(path);
        }
        Ok(written)
    }
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options).wrap_err("fail to parse svg")?;
    Ok(svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    ))
}
