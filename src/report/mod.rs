//! # 报告输出模块
//!
//! 将分析结果格式化为终端报告：结构概要、目标位点信息、
//! 描述符表格、磁性与定性结论。
//!
//! ## 子模块
//! - `insights`: 基于阈值的定性结论
//! - `export`: CSV 导出
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 调用
//! - 使用 `models/`, `utils/output.rs`
//! - 使用 `tabled` 生成表格

pub mod export;
pub mod insights;

use crate::models::{AnalysisResult, Crystal};
use crate::utils::output;

use colored::Colorize;
use tabled::{Table, Tabled};

pub use insights::{derive_insights, Insight};

/// 描述符表格行
#[derive(Debug, Clone, Tabled)]
struct DescriptorRow {
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "Spin-Up")]
    spin_up: String,
    #[tabled(rename = "Spin-Down")]
    spin_down: String,
}

/// 位点表格行
#[derive(Debug, Clone, Tabled)]
struct SiteRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "SP")]
    element: String,
    #[tabled(rename = "a")]
    a: String,
    #[tabled(rename = "b")]
    b: String,
    #[tabled(rename = "c")]
    c: String,
}

/// 打印完整报告
pub fn print_report(result: &AnalysisResult, crystal: &Crystal, show_sites: bool) {
    output::print_header("ELECTRONIC STRUCTURE ANALYSIS RESULTS");

    println!("{}", "CRYSTAL STRUCTURE:".bold());
    for line in structure_summary(crystal) {
        println!("{}", line);
    }
    if show_sites {
        println!("{}", site_table(crystal));
    }

    println!("\n{}", "TARGET SITE ANALYSIS:".bold());
    println!("Site index: {}", result.site_index);
    println!("Element: {}", result.site_element);
    println!("Fermi energy: {:.4} eV", result.fermi_energy);

    println!(
        "\n{}",
        format!("{}-BAND ELECTRONIC PROPERTIES:", orbital_label(result).to_uppercase()).bold()
    );
    println!("{}", descriptor_table(result));

    println!("\n{}", "MAGNETIC PROPERTIES:".bold());
    println!(
        "{}-electron magnetic moment: {:.4} μB",
        orbital_label(result),
        result.magnetic_moment()
    );

    println!("\n{}", "ANALYSIS INSIGHTS:".bold());
    for insight in derive_insights(result) {
        println!("{} {}", "•".cyan(), insight.message(result.orbital));
    }
}

fn orbital_label(result: &AnalysisResult) -> String {
    result.orbital.to_string()
}

/// 结构概要（化学式、晶格参数、体积）
pub fn structure_summary(crystal: &Crystal) -> Vec<String> {
    let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();

    vec![
        format!("Name: {}", crystal.name),
        format!("Full Formula ({})", crystal.formula()),
        format!("Reduced Formula: {}", crystal.reduced_formula()),
        format!("abc   : {:>12.6} {:>12.6} {:>12.6}", a, b, c),
        format!("angles: {:>12.6} {:>12.6} {:>12.6}", alpha, beta, gamma),
        format!("Volume: {:.4} Å³", crystal.lattice.volume()),
        format!("Sites ({})", crystal.site_count()),
    ]
}

/// 位点表格（分数坐标）
pub fn site_table(crystal: &Crystal) -> Table {
    let rows: Vec<SiteRow> = crystal
        .atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| SiteRow {
            index: i,
            element: atom.element.clone(),
            a: format!("{:.6}", atom.position[0]),
            b: format!("{:.6}", atom.position[1]),
            c: format!("{:.6}", atom.position[2]),
        })
        .collect();

    Table::new(&rows)
}

/// 描述符表格（4 位小数）
pub fn descriptor_table(result: &AnalysisResult) -> Table {
    let rows: Vec<DescriptorRow> = result
        .descriptor_rows()
        .into_iter()
        .map(|(property, pair)| DescriptorRow {
            property,
            spin_up: format!("{:.4}", pair.spin_up),
            spin_down: format!("{:.4}", pair.spin_down),
        })
        .collect();

    Table::new(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice, OrbitalType, SpinPair};

    fn crystal() -> Crystal {
        Crystal::new(
            "PtO",
            Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]),
            vec![
                Atom::new("Pt", [0.0, 0.0, 0.0]),
                Atom::new("O", [0.5, 0.5, 0.5]),
            ],
        )
    }

    #[test]
    fn test_descriptor_table_formatting() {
        let result = AnalysisResult {
            fermi_energy: 0.0,
            site_index: 0,
            site_element: "Pt".to_string(),
            orbital: OrbitalType::D,
            band_centers: SpinPair::new(-2.123456, -1.0),
            band_fillings: SpinPair::new(0.9, 0.85),
            band_skewness: SpinPair::new(0.0, 0.0),
            band_kurtosis: SpinPair::new(3.0, 3.0),
            band_widths: SpinPair::new(1.0, 1.0),
        };

        let table = descriptor_table(&result).to_string();
        assert!(table.contains("Spin-Up"));
        assert!(table.contains("Spin-Down"));
        assert!(table.contains("-2.1235"));
        assert!(table.contains("0.8500"));
        assert!(table.contains("Band Width (eV)"));
    }

    #[test]
    fn test_structure_summary() {
        let lines = structure_summary(&crystal());
        assert_eq!(lines[1], "Full Formula (Pt1 O1)");
        assert_eq!(lines[2], "Reduced Formula: PtO");
        assert_eq!(lines[6], "Sites (2)");

        let table = site_table(&crystal()).to_string();
        assert!(table.contains("0.500000"));
        assert!(table.contains("Pt"));
    }
}
