//! The seven benchmark figures and the metrics they plot.

use eyre::{eyre, Result};
use itertools::Itertools;
use plotters::style::RGBColor;

use crate::{
    settings::Settings,
    table::{BenchmarkTable, Selector},
};

pub const FIGURE_COUNT: usize = 7;

/// technology figures only look at the SRAM designs
pub const TECH_ARCH: &str = "SRAM";

const TECH_COLORS: &str = "rrggbbcckk";
const TECH_MARKERS: &str = "ososososos";
const ARCH_COLORS: &str = "gbkr";
const ARCH_MARKERS: &str = "odos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log,
}

impl Scale {
    /// whether `value` can be placed on an axis of this scale
    pub fn accepts(self, value: f64) -> bool {
        match self {
            Scale::Linear => value.is_finite(),
            Scale::Log => value.is_finite() && value > 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    TopsPerMm2,
    TopsPerW,
    BPreAdc,
    BAdc,
    Tops,
    /// TOPS / (TOPS/W)
    Power,
}

impl Metric {
    pub fn value(self, table: &BenchmarkTable, row: usize) -> f64 {
        match self {
            Metric::TopsPerMm2 => table.tops_mm2[row],
            Metric::TopsPerW => table.tops_w[row],
            Metric::BPreAdc => table.b_pre_adc[row],
            Metric::BAdc => table.b_adc[row],
            Metric::Tops => table.tops[row],
            Metric::Power => table.tops[row] / table.tops_w[row],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::TopsPerMm2 => "1b-TOPS/mm²",
            Metric::TopsPerW => "1b-TOPS/W",
            Metric::BPreAdc => "B_I(col) (bits)",
            Metric::BAdc => "B_ADC (bits)",
            Metric::Tops => "1b-TOPS",
            Metric::Power => "Power (W)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    pub metric: Metric,
    pub scale: Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// one group per technology node, SRAM rows only
    Technology,
    /// one group per architecture
    Architecture,
}

/// dashed `y = x` guide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLine {
    pub from: f64,
    pub to: f64,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Diamond,
}

impl Marker {
    fn from_code(code: char) -> Marker {
        match code {
            's' => Marker::Square,
            'd' => Marker::Diamond,
            _ => Marker::Circle,
        }
    }
}

pub fn color_from_code(code: char) -> RGBColor {
    match code {
        'r' => RGBColor(255, 0, 0),
        'g' => RGBColor(124, 252, 0),
        'b' => RGBColor(0, 0, 255),
        'c' => RGBColor(0, 255, 255),
        _ => RGBColor(0, 0, 0),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub label: String,
    pub selector: Selector<'a>,
    pub color: RGBColor,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// 1-based, also the file name prefix
    pub index: usize,
    pub name: &'static str,
    pub title: &'static str,
    pub grouping: Grouping,
    pub x: Axis,
    pub y: Axis,
    pub reference: Option<ReferenceLine>,
}

const fn axis(metric: Metric, scale: Scale) -> Axis {
    Axis { metric, scale }
}

pub static CATALOG: [Figure; FIGURE_COUNT] = [
    Figure {
        index: 1,
        name: "1_1b-TOPSpW_vs_1bTOPSpmm2_SRAM",
        title: "Energy-efficiency vs. Compute Density",
        grouping: Grouping::Technology,
        x: axis(Metric::TopsPerMm2, Scale::Log),
        y: axis(Metric::TopsPerW, Scale::Log),
        reference: None,
    },
    Figure {
        index: 2,
        name: "2_1b-TOPSpW_vs_1b-TOPS_SRAM",
        title: "Energy Efficiency vs. Throughput",
        grouping: Grouping::Technology,
        x: axis(Metric::Tops, Scale::Log),
        y: axis(Metric::TopsPerW, Scale::Log),
        reference: None,
    },
    Figure {
        index: 3,
        name: "3_1b-TOPSpW_vs_BIcol_SRAM",
        title: "Energy-efficiency vs. Pre-ADC Information Content",
        grouping: Grouping::Technology,
        x: axis(Metric::BPreAdc, Scale::Linear),
        y: axis(Metric::TopsPerW, Scale::Log),
        reference: None,
    },
    Figure {
        index: 4,
        name: "4_BADC_vs_BIcol_SRAM",
        title: "ADC Precision vs. Pre-ADC Information Content",
        grouping: Grouping::Technology,
        x: axis(Metric::BPreAdc, Scale::Linear),
        y: axis(Metric::BAdc, Scale::Linear),
        reference: Some(ReferenceLine {
            from: 0.0,
            to: 11.0,
            label: "B_ADC = B_I(col)",
        }),
    },
    Figure {
        index: 5,
        name: "5_1b-TOPS_vs_1b-TOPSpW_all",
        title: "Energy-efficiency vs. Throughput for SRAM, eNVM, eDRAM, Digital",
        grouping: Grouping::Architecture,
        x: axis(Metric::Tops, Scale::Log),
        y: axis(Metric::TopsPerW, Scale::Log),
        reference: None,
    },
    Figure {
        index: 6,
        name: "6_1b-TOPSpmm2_vs_1b-TOPSpW_all",
        title: "Energy-efficiency vs. Compute Density for SRAM, eNVM, eDRAM, Digital",
        grouping: Grouping::Architecture,
        x: axis(Metric::TopsPerMm2, Scale::Log),
        y: axis(Metric::TopsPerW, Scale::Log),
        reference: None,
    },
    Figure {
        index: 7,
        name: "7_1b-TOPS_vs_W_all",
        title: "Throughput vs. Power for SRAM, eNVM, eDRAM, and Digital",
        grouping: Grouping::Architecture,
        x: axis(Metric::Power, Scale::Log),
        y: axis(Metric::Tops, Scale::Log),
        reference: None,
    },
];

impl Figure {
    pub fn by_index(index: usize) -> Option<&'static Figure> {
        CATALOG.iter().find(|figure| figure.index == index)
    }

    /// the figures to render, all of them when `indices` is empty
    pub fn resolve(indices: &[usize]) -> Result<Vec<&'static Figure>> {
        if indices.is_empty() {
            return Ok(CATALOG.iter().collect());
        }
        indices
            .iter()
            .unique()
            .map(|&index| {
                Figure::by_index(index).ok_or(eyre!(
                    "no figure {}, expected 1..={}",
                    index,
                    FIGURE_COUNT
                ))
            })
            .collect()
    }

    pub fn groups<'a>(&self, settings: &'a Settings) -> Vec<Group<'a>> {
        match self.grouping {
            Grouping::Technology => settings
                .tech_list
                .iter()
                .zip(TECH_COLORS.chars().cycle())
                .zip(TECH_MARKERS.chars().cycle())
                .map(|((&tech, color), marker)| Group {
                    label: format!("{}nm", tech),
                    selector: Selector::arch(TECH_ARCH).with_tech(tech),
                    color: color_from_code(color),
                    marker: Marker::from_code(marker),
                })
                .collect(),
            Grouping::Architecture => settings
                .arch_groups()
                .zip(ARCH_COLORS.chars().cycle())
                .zip(ARCH_MARKERS.chars().cycle())
                .map(|(((arch, label), color), marker)| Group {
                    label: label.to_string(),
                    selector: Selector::arch(arch),
                    color: color_from_code(color),
                    marker: Marker::from_code(marker),
                })
                .collect(),
        }
    }

    /// the placeable (x, y) points of one group
    pub fn points(&self, table: &BenchmarkTable, group: &Group, imc_only: bool) -> Vec<(f64, f64)> {
        let selector = if imc_only {
            group.selector.imc_only()
        } else {
            group.selector
        };
        table
            .select(&selector)
            .into_iter()
            .map(|row| (self.x.metric.value(table, row), self.y.metric.value(table, row)))
            .filter(|&(x, y)| self.x.scale.accepts(x) && self.y.scale.accepts(y))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use eyre::Result;

    use super::{Figure, Grouping, Marker, Metric, Scale, CATALOG};
    use crate::{
        settings::Settings,
        table::{test::csv_with, BenchmarkTable},
    };

    #[test]
    fn catalog_is_ordered() {
        for (i, figure) in CATALOG.iter().enumerate() {
            assert_eq!(figure.index, i + 1);
            assert!(figure.name.starts_with(&format!("{}_", i + 1)));
        }
        assert!(Figure::by_index(4).and_then(|f| f.reference).is_some());
        assert!(Figure::by_index(0).is_none());
    }

    #[test]
    fn resolve_figures() -> Result<()> {
        assert_eq!(Figure::resolve(&[])?.len(), 7);
        let picked = Figure::resolve(&[3, 1, 3])?;
        assert_eq!(picked.iter().map(|f| f.index).collect::<Vec<_>>(), vec![3, 1]);
        assert!(Figure::resolve(&[8]).is_err());
        Ok(())
    }

    #[test]
    fn tech_groups_follow_settings() -> Result<()> {
        let settings = Settings::from_defaults()?;
        let groups = CATALOG[0].groups(&settings);
        assert_eq!(groups.len(), 10);
        assert_eq!(groups[0].label, "5nm");
        assert_eq!(groups[0].marker, Marker::Circle);
        assert_eq!(groups[1].marker, Marker::Square);
        assert_eq!(groups[0].color, groups[1].color);
        assert_eq!(groups[9].label, "180nm");
        assert!(groups.iter().all(|g| g.selector.arch == Some("SRAM")));
        Ok(())
    }

    #[test]
    fn arch_groups_follow_settings() -> Result<()> {
        let settings = Settings::from_defaults()?;
        let figure = &CATALOG[4];
        assert_eq!(figure.grouping, Grouping::Architecture);
        let groups = figure.groups(&settings);
        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["SRAM-IMC", "eNVM-IMC", "eDRAM-IMC", "Digital"]);
        assert_eq!(groups[1].marker, Marker::Diamond);
        assert_eq!(groups[1].selector.arch, Some("eNVM"));
        assert_eq!(groups[1].selector.tech, None);
        Ok(())
    }

    #[test]
    fn power_is_tops_over_efficiency() -> Result<()> {
        let csv = csv_with(&[&[("TOPS", "10"), ("TOPS/W", "4")]]);
        let table = BenchmarkTable::from_reader(csv.as_bytes())?;
        assert_eq!(Metric::Power.value(&table, 0), 2.5);
        Ok(())
    }

    #[test]
    fn log_axis_drops_unplaceable_points() -> Result<()> {
        let csv = csv_with(&[
            &[("Architecture", "SRAM"), ("Tech (nm)", "65"), ("TOPS/mm2", "1"), ("TOPS/W", "10")],
            &[("Architecture", "SRAM"), ("Tech (nm)", "65"), ("TOPS/mm2", "0"), ("TOPS/W", "10")],
            &[("Architecture", "SRAM"), ("Tech (nm)", "65"), ("TOPS/mm2", ""), ("TOPS/W", "10")],
            &[
                ("Architecture", "SRAM"),
                ("Tech (nm)", "65"),
                ("TOPS/mm2", "2"),
                ("TOPS/W", "20"),
                ("IMC_Processor", "Y"),
            ],
        ]);
        let table = BenchmarkTable::from_reader(csv.as_bytes())?;
        let settings = Settings::from_defaults()?;
        let figure = &CATALOG[0];
        let groups = figure.groups(&settings);
        let nm65 = groups.iter().find(|g| g.label == "65nm").unwrap();
        assert_eq!(figure.points(&table, nm65, false), vec![(1.0, 10.0), (2.0, 20.0)]);
        assert_eq!(figure.points(&table, nm65, true), vec![(2.0, 20.0)]);
        Ok(())
    }

    #[test]
    fn scale_accepts() {
        assert!(Scale::Linear.accepts(0.0));
        assert!(Scale::Linear.accepts(-1.0));
        assert!(!Scale::Linear.accepts(f64::NAN));
        assert!(!Scale::Log.accepts(0.0));
        assert!(!Scale::Log.accepts(f64::INFINITY));
        assert!(Scale::Log.accepts(1e-3));
    }
}
