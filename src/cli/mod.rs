//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 参数
//! - `--file`: vasprun.xml 路径
//! - `--site`: 目标位点索引（从 0 开始）
//! - `--orbital`: 轨道类型
//! - `--full-window` / `--occupied-window`: 能量窗口
//! - `--output-csv`: 描述符 CSV 导出
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 转换为 `models/config.rs` 的 AnalysisConfig

use crate::error::{DbandError, Result};
use crate::models::config::{DEFAULT_SITE_INDEX, DEFAULT_VASPRUN_PATH};
use crate::models::{AnalysisConfig, EnergyWindow, OrbitalType};

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// dband - d 带描述符分析
#[derive(Parser, Debug)]
#[command(name = "dband")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Analyze d-band descriptors (center, filling, skewness, kurtosis, width) of one site from VASP vasprun.xml",
    long_about = None
)]
pub struct Cli {
    /// Path to the vasprun.xml file
    #[arg(short, long, default_value = DEFAULT_VASPRUN_PATH)]
    pub file: PathBuf,

    /// Index of the atomic site to analyze (0-indexed)
    #[arg(short, long, default_value_t = DEFAULT_SITE_INDEX)]
    pub site: usize,

    /// Orbital type to project onto
    #[arg(long, value_enum, default_value = "d")]
    pub orbital: OrbitalArg,

    /// Energy window relative to E_F for center, skewness and kurtosis (MIN:MAX, eV)
    #[arg(long, default_value = "-15:15", allow_hyphen_values = true)]
    pub full_window: String,

    /// Energy window relative to E_F for band width (MIN:MAX, eV)
    #[arg(long, default_value = "-15:0", allow_hyphen_values = true)]
    pub occupied_window: String,

    /// Write the descriptors to a CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,

    /// Do not print the per-site structure table
    #[arg(long, default_value_t = false)]
    pub no_structure: bool,
}

/// 轨道类型参数
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OrbitalArg {
    /// s orbitals
    S,
    /// p orbitals (px, py, pz)
    P,
    /// d orbitals (dxy, dyz, dz2, dxz, dx2-y2)
    D,
    /// f orbitals
    F,
}

impl From<OrbitalArg> for OrbitalType {
    fn from(arg: OrbitalArg) -> Self {
        match arg {
            OrbitalArg::S => OrbitalType::S,
            OrbitalArg::P => OrbitalType::P,
            OrbitalArg::D => OrbitalType::D,
            OrbitalArg::F => OrbitalType::F,
        }
    }
}

impl Cli {
    /// 转换为分析配置
    pub fn into_config(self) -> Result<AnalysisConfig> {
        Ok(AnalysisConfig {
            vasprun_path: self.file,
            site_index: self.site,
            orbital: self.orbital.into(),
            full_window: parse_window(&self.full_window)?,
            occupied_window: parse_window(&self.occupied_window)?,
            output_csv: self.output_csv,
            show_sites: !self.no_structure,
        })
    }
}

/// 解析能量窗口字符串 (e.g., "-15:15")
pub fn parse_window(range: &str) -> Result<EnergyWindow> {
    let parts: Vec<&str> = range.split(':').collect();
    if parts.len() != 2 {
        return Err(DbandError::InvalidRange(range.to_string()));
    }

    let min: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| DbandError::InvalidRange(range.to_string()))?;
    let max: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| DbandError::InvalidRange(range.to_string()))?;

    EnergyWindow::new(min, max).map_err(|_| DbandError::InvalidRange(range.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        let w = parse_window("-15:15").unwrap();
        assert_eq!((w.min, w.max), (-15.0, 15.0));

        let w = parse_window(" -15 : 0 ").unwrap();
        assert_eq!((w.min, w.max), (-15.0, 0.0));

        assert!(parse_window("-15-15").is_err());
        assert!(parse_window("0:-15").is_err());
        assert!(parse_window("a:b").is_err());
        assert!(parse_window("1:2:3").is_err());
    }

    #[test]
    fn test_default_arguments() {
        let cli = Cli::try_parse_from(["dband"]).unwrap();
        let config = cli.into_config().unwrap();
        let default = AnalysisConfig::default();

        assert_eq!(config.vasprun_path, default.vasprun_path);
        assert_eq!(config.site_index, 161);
        assert_eq!(config.orbital, OrbitalType::D);
        assert_eq!(config.full_window, default.full_window);
        assert_eq!(config.occupied_window, default.occupied_window);
        assert!(config.output_csv.is_none());
        assert!(config.show_sites);
    }

    #[test]
    fn test_custom_arguments() {
        let cli = Cli::try_parse_from([
            "dband",
            "-f",
            "run/vasprun.xml",
            "-s",
            "3",
            "--orbital",
            "p",
            "--full-window",
            "-10:10",
            "--occupied-window=-8:0",
            "--output-csv",
            "out.csv",
            "--no-structure",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.vasprun_path, PathBuf::from("run/vasprun.xml"));
        assert_eq!(config.site_index, 3);
        assert_eq!(config.orbital, OrbitalType::P);
        assert_eq!(config.full_window.min, -10.0);
        assert_eq!(config.occupied_window.min, -8.0);
        assert_eq!(config.output_csv, Some(PathBuf::from("out.csv")));
        assert!(!config.show_sites);
    }
}
