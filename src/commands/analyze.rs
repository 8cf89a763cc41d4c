//! # 分析流水线
//!
//! 读取 → 校验 → 计算描述符 → 报告（→ 可选 CSV 导出）。
//!
//! ## 失败处理
//! - 读取/校验失败：打印诊断信息，视为已处理，返回 `Ok(())`
//! - 分析或导出失败：向上传递
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `parsers/vasprun.rs`, `analysis/`, `report/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::analysis::BandAnalyzer;
use crate::error::{DbandError, Result};
use crate::models::{AnalysisConfig, AnalysisResult};
use crate::parsers::{parse_vasprun_file, Vasprun};
use crate::report::{self, export};
use crate::utils::{output, progress};

/// 执行分析；读取/校验失败时打印诊断信息后正常返回
pub fn execute(config: &AnalysisConfig) -> Result<()> {
    match run(config) {
        Ok(_) => Ok(()),
        Err(e) if e.is_load_failure() => {
            report_load_failure(&e);
            output::print_warning("Analysis failed. Please check input file and parameters.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// 完整流水线，返回分析结果
pub fn run(config: &AnalysisConfig) -> Result<AnalysisResult> {
    let calculation = load(config)?;

    output::print_info(&format!(
        "Calculating {}-band properties...",
        config.orbital
    ));

    let analyzer = BandAnalyzer::from_config(config);
    let result = analyzer.analyze(&calculation.dos, &calculation.crystal, config.site_index)?;

    report::print_report(&result, &calculation.crystal, config.show_sites);

    if let Some(ref path) = config.output_csv {
        export::to_csv(&result, path)?;
        output::print_success(&format!("Descriptors saved to '{}'", path.display()));
    }

    Ok(result)
}

/// 读取 vasprun.xml 并校验位点索引
pub fn load(config: &AnalysisConfig) -> Result<Vasprun> {
    output::print_info(&format!(
        "Reading VASP data from: {}",
        config.vasprun_path.display()
    ));
    output::print_info(&format!("Analyzing site index: {}", config.site_index));
    output::print_separator();

    let spinner = progress::create_spinner("Parsing vasprun.xml");
    let parsed = parse_vasprun_file(&config.vasprun_path);
    spinner.finish_and_clear();
    let calculation = parsed?;

    output::print_info(&format!(
        "Fermi energy: {:.4} eV",
        calculation.dos.efermi
    ));
    output::print_info(&format!(
        "Total number of sites: {}",
        calculation.crystal.site_count()
    ));
    output::print_info(&format!(
        "Spin channels: {}, energy grid: {} points",
        calculation.dos.spin_count(),
        calculation.dos.energies.len()
    ));
    output::print_info(&format!(
        "Energy windows: full {}, occupied {}",
        config.full_window, config.occupied_window
    ));

    let site = calculation
        .crystal
        .site(config.site_index)
        .ok_or(DbandError::SiteIndexOutOfRange {
            index: config.site_index,
            count: calculation.crystal.site_count(),
        })?;

    output::print_info(&format!("Target site element: {}", site.element));
    output::print_info(&format!(
        "Target site coordinates: [{:.6}, {:.6}, {:.6}]",
        site.position[0], site.position[1], site.position[2]
    ));

    Ok(calculation)
}

fn report_load_failure(err: &DbandError) {
    match err {
        DbandError::SiteIndexOutOfRange { .. } => output::print_error(&format!("Error: {}", err)),
        _ => output::print_error(&format!("Error reading VASP file: {}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::moments::tests::gaussian;
    use crate::models::OrbitalType;
    use crate::parsers::vasprun::tests::{synthetic_vasprun, uniform_grid};
    use crate::report::{derive_insights, Insight};

    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_vasprun(dir: &Path, xml: &str) -> std::path::PathBuf {
        let path = dir.join("vasprun.xml");
        fs::write(&path, xml).unwrap();
        path
    }

    fn two_site_config(dir: &TempDir, site_index: usize) -> AnalysisConfig {
        let grid = uniform_grid(-10.0, 10.0, 201);
        let xml = synthetic_vasprun(
            &["Pt", "O"],
            0.0,
            &grid,
            &|_, _, e| (0.1, gaussian(e, -2.5, 1.0)),
            2,
        );

        AnalysisConfig {
            vasprun_path: write_vasprun(dir.path(), &xml),
            site_index,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_site_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let config = two_site_config(&dir, 161);

        let err = load(&config).unwrap_err();
        assert!(matches!(
            err,
            DbandError::SiteIndexOutOfRange {
                index: 161,
                count: 2
            }
        ));

        // 流水线在校验失败时不进入分析阶段
        let err = run(&config).unwrap_err();
        assert!(err.is_load_failure());

        // 已处理的失败：不向上传递
        assert!(execute(&config).is_ok());
    }

    #[test]
    fn test_missing_file_is_handled() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            vasprun_path: dir.path().join("vasprun.xml"),
            ..AnalysisConfig::default()
        };

        assert!(matches!(
            run(&config).unwrap_err(),
            DbandError::FileNotFound { .. }
        ));
        assert!(execute(&config).is_ok());
    }

    #[test]
    fn test_malformed_file_is_handled() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            vasprun_path: write_vasprun(dir.path(), "<modeling><calculation>"),
            site_index: 0,
            ..AnalysisConfig::default()
        };

        assert!(matches!(
            run(&config).unwrap_err(),
            DbandError::ParseError { .. }
        ));
        assert!(execute(&config).is_ok());
    }

    #[test]
    fn test_valid_site_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            output_csv: Some(dir.path().join("descriptors.csv")),
            ..two_site_config(&dir, 0)
        };

        let result = run(&config).unwrap();
        assert_eq!(result.site_element, "Pt");
        assert_eq!(result.orbital, OrbitalType::D);
        assert!((result.band_centers.spin_up + 2.5).abs() < 1e-3);

        for filling in [result.band_fillings.spin_up, result.band_fillings.spin_down] {
            assert!((0.0..=1.0).contains(&filling));
        }

        let csv = fs::read_to_string(dir.path().join("descriptors.csv")).unwrap();
        assert!(csv.contains("Band Center (eV)"));
    }

    #[test]
    fn test_spin_split_end_to_end() {
        // 单位点：自旋向上峰 -2 eV，自旋向下峰 -1 eV，E_F = 0
        let dir = tempfile::tempdir().unwrap();
        let grid = uniform_grid(-20.0, 20.0, 2001);
        let xml = synthetic_vasprun(
            &["Fe"],
            0.0,
            &grid,
            &|_, spin, e| {
                let mu = if spin == 0 { -2.0 } else { -1.0 };
                (0.0, gaussian(e, mu, 1.0))
            },
            2,
        );
        let config = AnalysisConfig {
            vasprun_path: write_vasprun(dir.path(), &xml),
            site_index: 0,
            ..AnalysisConfig::default()
        };

        let result = run(&config).unwrap();
        assert!((result.band_centers.spin_up + 2.0).abs() < 1e-3);
        assert!((result.band_centers.spin_down + 1.0).abs() < 1e-3);
        assert!((result.average_center() + 1.5).abs() < 1e-3);

        let insights = derive_insights(&result);
        assert!(insights
            .iter()
            .any(|i| matches!(i, Insight::SpinSplitting { splitting } if (splitting - 1.0).abs() < 1e-3)));
        assert!(!insights.iter().any(|i| matches!(
            i,
            Insight::DeepCenter { .. } | Insight::ShallowCenter { .. }
        )));

        let width = config.occupied_window.max - config.occupied_window.min;
        assert!(result.band_widths.spin_up >= 0.0 && result.band_widths.spin_up <= width);
        assert!(result.band_widths.spin_down >= 0.0 && result.band_widths.spin_down <= width);
    }

    #[test]
    fn test_non_spin_polarized_is_analysis_error() {
        let dir = tempfile::tempdir().unwrap();
        let grid = uniform_grid(-10.0, 10.0, 201);
        let xml = synthetic_vasprun(&["Cu"], 0.0, &grid, &|_, _, e| (0.0, gaussian(e, -3.0, 1.0)), 1);
        let config = AnalysisConfig {
            vasprun_path: write_vasprun(dir.path(), &xml),
            site_index: 0,
            ..AnalysisConfig::default()
        };

        let err = execute(&config).unwrap_err();
        assert!(matches!(err, DbandError::MissingSpinChannel { .. }));
        assert!(!err.is_load_failure());
    }
}
