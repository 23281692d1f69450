//! The benchmark table: one row per published chip, one vector per column.
//!
//! Every field is trimmed of trailing spaces. Empty fields are kept as
//! missing values (NaN for numeric columns) so that all columns keep the
//! same length as the row count.

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord};
use eyre::{eyre, Context, Result};
use itertools::Itertools;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkTable {
    pub tops_mm2: Vec<f64>,
    pub tops_w: Vec<f64>,
    pub b_pre_adc: Vec<f64>,
    pub tech: Vec<Option<i32>>,
    pub year: Vec<f64>,
    pub core_size: Vec<f64>,
    pub n_row: Vec<f64>,
    pub n_col: Vec<f64>,
    pub vdd: Vec<Option<String>>,
    pub b_x: Vec<f64>,
    pub b_w: Vec<f64>,
    pub b_adc: Vec<f64>,
    pub r_c: Vec<f64>,
    pub r: Vec<f64>,
    pub c_c: Vec<f64>,
    pub c: Vec<f64>,
    pub n_adc: Vec<f64>,
    pub n: Vec<f64>,
    pub n_1b: Vec<f64>,
    pub b_core: Vec<f64>,
    pub alpha: Vec<f64>,
    /// `b_x * r_c * c_c`
    pub b_col: Vec<f64>,
    pub t_core_ns: Vec<f64>,
    pub e_op1_fj: Vec<f64>,
    pub n_core: Vec<f64>,
    pub e_col_fj: Vec<f64>,
    pub e_core_pj: Vec<f64>,
    pub e_mvm_pj: Vec<f64>,
    pub cell_type: Vec<String>,
    pub compute_model: Vec<String>,
    pub arch: Vec<String>,
    pub tops_a: Vec<f64>,
    pub tops: Vec<f64>,
    pub imc_processor: Vec<bool>,
}

/// Row predicate; every field that is set must match exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selector<'a> {
    pub arch: Option<&'a str>,
    pub tech: Option<i32>,
    pub imc_only: bool,
}

impl<'a> Selector<'a> {
    pub fn arch(arch: &'a str) -> Self {
        Selector {
            arch: Some(arch),
            ..Default::default()
        }
    }

    pub fn with_tech(self, tech: i32) -> Self {
        Selector {
            tech: Some(tech),
            ..self
        }
    }

    pub fn imc_only(self) -> Self {
        Selector {
            imc_only: true,
            ..self
        }
    }
}

impl BenchmarkTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).wrap_err(format!("cannot open {:?}", path))?;
        let table = Self::from_reader(file).wrap_err(format!("{:?} is error!", path))?;
        debug!(rows = table.len(), ?path, "table loaded");
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw = RawTable::read(reader)?;

        let b_x = raw.numeric("B_x")?;
        let r_c = raw.numeric("R_C")?;
        let c_c = raw.numeric("C_C")?;
        let b_col = b_x
            .iter()
            .zip(&r_c)
            .zip(&c_c)
            .map(|((x, r), c)| x * r * c)
            .collect_vec();

        let table = BenchmarkTable {
            tops_mm2: raw.numeric("TOPS/mm2")?,
            tops_w: raw.numeric("TOPS/W")?,
            b_pre_adc: raw.numeric("B_pre-ADC")?,
            tech: raw.integer("Tech (nm)")?,
            year: raw.numeric("Year")?,
            core_size: raw.numeric("Core Size(Kb)")?,
            n_row: raw.numeric("N_row")?,
            n_col: raw.numeric("N_col")?,
            vdd: raw.optional_text("Supply V(V)")?,
            b_x,
            b_w: raw.numeric("B_w")?,
            b_adc: raw.numeric("B_ADC")?,
            r_c,
            r: raw.numeric("R")?,
            c_c,
            c: raw.numeric("C")?,
            n_adc: raw.numeric("N_ADC")?,
            n: raw.numeric("N")?,
            n_1b: raw.numeric("N_1b")?,
            b_core: raw.numeric("B_core")?,
            alpha: raw.numeric("alpha")?,
            b_col,
            t_core_ns: raw.numeric("T_core(ns)")?,
            e_op1_fj: raw.numeric("E_OP1 (fJ)")?,
            n_core: raw.numeric("N_core")?,
            e_col_fj: raw.numeric("E_col (fJ)")?,
            e_core_pj: raw.numeric("E_core (pJ)")?,
            e_mvm_pj: raw.numeric("E_mvm (pJ)")?,
            cell_type: raw.text("Cell Type")?,
            compute_model: raw.text("Compute Model")?,
            arch: raw.text("Architecture")?,
            tops_a: raw.numeric("TOPS_a")?,
            tops: raw.numeric("TOPS")?,
            imc_processor: raw.flag("IMC_Processor", "Y")?,
        };
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.arch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arch.is_empty()
    }

    pub fn matches(&self, row: usize, selector: &Selector) -> bool {
        selector.arch.map_or(true, |arch| self.arch[row] == arch)
            && selector.tech.map_or(true, |tech| self.tech[row] == Some(tech))
            && (!selector.imc_only || self.imc_processor[row])
    }

    /// indices of the rows matching `selector`, in table order
    pub fn select(&self, selector: &Selector) -> Vec<usize> {
        (0..self.len())
            .filter(|&row| self.matches(row, selector))
            .collect()
    }

    pub fn gather(values: &[f64], rows: &[usize]) -> Vec<f64> {
        rows.iter().map(|&row| values[row]).collect()
    }
}

/// The csv as trimmed strings, addressed by header name.
struct RawTable {
    columns: HashMap<String, usize>,
    rows: Vec<StringRecord>,
}

impl RawTable {
    fn read<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let columns = reader
            .headers()
            .wrap_err("fail to read csv header")?
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim_end_matches(' ').to_string(), i))
            .collect();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("fail to read csv records")?;
        Ok(RawTable { columns, rows })
    }

    /// the trimmed cells of one column, `None` when the cell is empty
    fn cells<'a>(&'a self, name: &str) -> Result<impl Iterator<Item = Option<&'a str>> + 'a> {
        let index = *self
            .columns
            .get(name)
            .ok_or(eyre!("missing column {:?}", name))?;
        Ok(self.rows.iter().map(move |row| {
            let cell = row.get(index).unwrap_or("").trim_end_matches(' ');
            (!cell.is_empty()).then(|| cell)
        }))
    }

    fn numeric(&self, name: &str) -> Result<Vec<f64>> {
        self.cells(name)?
            .enumerate()
            .map(|(row, cell)| match cell {
                None => Ok(f64::NAN),
                Some(cell) => cell.trim().parse::<f64>().wrap_err(format!(
                    "row {}, column {:?}: {:?} is not a number",
                    row + 1,
                    name,
                    cell
                )),
            })
            .collect()
    }

    fn integer(&self, name: &str) -> Result<Vec<Option<i32>>> {
        self.cells(name)?
            .enumerate()
            .map(|(row, cell)| match cell {
                None => Ok(None),
                Some(cell) => parse_integer(cell.trim()).map(Some).ok_or(eyre!(
                    "row {}, column {:?}: {:?} is not an integer",
                    row + 1,
                    name,
                    cell
                )),
            })
            .collect()
    }

    fn text(&self, name: &str) -> Result<Vec<String>> {
        Ok(self
            .cells(name)?
            .map(|cell| cell.unwrap_or_default().to_string())
            .collect())
    }

    fn optional_text(&self, name: &str) -> Result<Vec<Option<String>>> {
        Ok(self
            .cells(name)?
            .map(|cell| cell.map(str::to_string))
            .collect())
    }

    fn flag(&self, name: &str, yes: &str) -> Result<Vec<bool>> {
        Ok(self.cells(name)?.map(|cell| cell == Some(yes)).collect())
    }
}

/// accepts "65" and "65.0", rejects fractional values
fn parse_integer(cell: &str) -> Option<i32> {
    if let Ok(value) = cell.parse::<i32>() {
        return Some(value);
    }
    let value = cell.parse::<f64>().ok()?;
    (value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64)
        .then(|| value as i32)
}

#[cfg(test)]
pub(crate) mod test {
    use eyre::Result;
    use itertools::Itertools;

    use super::{BenchmarkTable, Selector};

    pub const HEADER: [&str; 33] = [
        "TOPS/mm2",
        "TOPS/W",
        "B_pre-ADC",
        "Tech (nm)",
        "Year",
        "Core Size(Kb)",
        "N_row",
        "N_col",
        "Supply V(V)",
        "B_x",
        "B_w",
        "B_ADC",
        "R_C",
        "R",
        "C_C",
        "C",
        "N_ADC",
        "N",
        "N_1b",
        "B_core",
        "alpha",
        "T_core(ns)",
        "E_OP1 (fJ)",
        "N_core",
        "E_col (fJ)",
        "E_core (pJ)",
        "E_mvm (pJ)",
        "Cell Type",
        "Compute Model",
        "Architecture",
        "TOPS_a ",
        "TOPS",
        "IMC_Processor",
    ];

    /// a csv with the full header where only the given columns are filled
    pub fn csv_with(rows: &[&[(&str, &str)]]) -> String {
        let mut out = HEADER.iter().map(|h| format!("\"{}\"", h)).join(",");
        out.push('\n');
        for row in rows {
            let line = HEADER
                .iter()
                .map(|h| {
                    row.iter()
                        .find(|(name, _)| name == h || *name == h.trim_end())
                        .map(|(_, value)| *value)
                        .unwrap_or("")
                })
                .join(",");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    #[test]
    fn blank_field_is_nan() -> Result<()> {
        let csv = csv_with(&[
            &[("TOPS/W", "12.5"), ("Architecture", "SRAM")],
            &[("TOPS/W", "   "), ("Architecture", "SRAM")],
        ]);
        let table = BenchmarkTable::from_reader(csv.as_bytes())?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.tops_w[0], 12.5);
        assert!(table.tops_w[1].is_nan());
        assert!(table.tops_mm2.iter().all(|v| v.is_nan()));
        assert_eq!(table.tech, vec![None, None]);
        assert_eq!(table.vdd, vec![None, None]);
        Ok(())
    }

    #[test]
    fn trailing_spaces_trimmed() -> Result<()> {
        let csv = csv_with(&[&[
            ("Architecture", "SRAM  "),
            ("Tech (nm)", "65 "),
            ("IMC_Processor", "Y "),
            ("Supply V(V)", "0.6-1.0 "),
            ("TOPS_a", "3 "),
        ]]);
        let table = BenchmarkTable::from_reader(csv.as_bytes())?;
        assert_eq!(table.arch[0], "SRAM");
        assert_eq!(table.tech[0], Some(65));
        assert!(table.imc_processor[0]);
        assert_eq!(table.vdd[0].as_deref(), Some("0.6-1.0"));
        assert_eq!(table.tops_a[0], 3.0);
        Ok(())
    }

    #[test]
    fn b_col_is_product() -> Result<()> {
        let csv = csv_with(&[
            &[("B_x", "2"), ("R_C", "3"), ("C_C", "4")],
            &[("B_x", "1.5"), ("R_C", "2"), ("C_C", "0.5")],
            &[("B_x", "1"), ("R_C", ""), ("C_C", "8")],
        ]);
        let table = BenchmarkTable::from_reader(csv.as_bytes())?;
        for row in 0..table.len() {
            let expected = table.b_x[row] * table.r_c[row] * table.c_c[row];
            if expected.is_nan() {
                assert!(table.b_col[row].is_nan());
            } else {
                assert_eq!(table.b_col[row], expected);
            }
        }
        assert_eq!(table.b_col[0], 24.0);
        assert_eq!(table.b_col[1], 1.5);
        assert!(table.b_col[2].is_nan());
        Ok(())
    }

    #[test]
    fn select_by_arch_and_tech() -> Result<()> {
        let csv = csv_with(&[
            &[("Architecture", "SRAM"), ("Tech (nm)", "65")],
            &[("Architecture", "SRAM"), ("Tech (nm)", "28"), ("IMC_Processor", "Y")],
            &[("Architecture", "eNVM"), ("Tech (nm)", "65")],
            &[("Architecture", "SRAM"), ("Tech (nm)", "65"), ("IMC_Processor", "Y")],
            &[("Architecture", "SRAM"), ("Tech (nm)", "")],
            &[("Architecture", "SRAM-like"), ("Tech (nm)", "65")],
        ]);
        let table = BenchmarkTable::from_reader(csv.as_bytes())?;
        assert_eq!(table.select(&Selector::arch("SRAM").with_tech(65)), vec![0, 3]);
        assert_eq!(
            table.select(&Selector::arch("SRAM").with_tech(65).imc_only()),
            vec![3]
        );
        assert_eq!(table.select(&Selector::arch("SRAM")), vec![0, 1, 3, 4]);
        assert_eq!(table.select(&Selector::default().with_tech(65)), vec![0, 2, 3, 5]);
        assert!(table.select(&Selector::arch("Digital")).is_empty());
        Ok(())
    }

    #[test]
    fn gather_follows_rows() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(BenchmarkTable::gather(&values, &[3, 0]), vec![4.0, 1.0]);
    }

    #[test]
    fn missing_column_is_error() {
        let csv = "TOPS/W,Architecture\n1,SRAM\n";
        let err = BenchmarkTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(format!("{:?}", err).contains("missing column"));
    }

    #[test]
    fn ragged_row_is_error() {
        let mut csv = csv_with(&[&[("TOPS/W", "1")]]);
        csv.push_str("1,2,3\n");
        assert!(BenchmarkTable::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn bad_number_is_error() {
        let csv = csv_with(&[&[("TOPS/W", "fast")]]);
        let err = BenchmarkTable::from_reader(csv.as_bytes()).unwrap_err();
        let msg = format!("{:?}", err);
        assert!(msg.contains("TOPS/W"), "{}", msg);
    }

    #[test]
    fn tech_accepts_whole_float() -> Result<()> {
        let csv = csv_with(&[&[("Tech (nm)", "22.0")]]);
        let table = BenchmarkTable::from_reader(csv.as_bytes())?;
        assert_eq!(table.tech[0], Some(22));
        let csv = csv_with(&[&[("Tech (nm)", "22.5")]]);
        assert!(BenchmarkTable::from_reader(csv.as_bytes()).is_err());
        Ok(())
    }

    #[test]
    fn columns_have_equal_length() -> Result<()> {
        let csv = csv_with(&[&[("TOPS", "1")], &[], &[("Year", "2021")]]);
        let table = BenchmarkTable::from_reader(csv.as_bytes())?;
        assert_eq!(table.len(), 3);
        for len in [
            table.tops.len(),
            table.year.len(),
            table.b_col.len(),
            table.tech.len(),
            table.vdd.len(),
            table.cell_type.len(),
            table.imc_processor.len(),
        ] {
            assert_eq!(len, 3);
        }
        Ok(())
    }
}
