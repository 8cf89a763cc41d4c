//! # 分析配置
//!
//! 一次分析运行所需的全部参数，显式传入流水线入口。
//!
//! ## 依赖关系
//! - 由 `cli/mod.rs` 的参数转换而来
//! - 被 `commands/analyze.rs` 使用

use crate::models::dos::{EnergyWindow, OrbitalType};
use std::path::PathBuf;

/// 默认输入文件
pub const DEFAULT_VASPRUN_PATH: &str = "./vasprun.xml";

/// 默认位点索引（从 0 开始）
pub const DEFAULT_SITE_INDEX: usize = 161;

/// 能带中心/偏度/峰度使用的宽窗口 (eV)
pub const DEFAULT_FULL_WINDOW: EnergyWindow = EnergyWindow {
    min: -15.0,
    max: 15.0,
};

/// 能带宽度使用的占据态窗口 (eV)
pub const DEFAULT_OCCUPIED_WINDOW: EnergyWindow = EnergyWindow {
    min: -15.0,
    max: 0.0,
};

/// 分析配置
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub vasprun_path: PathBuf,
    pub site_index: usize,
    pub orbital: OrbitalType,
    pub full_window: EnergyWindow,
    pub occupied_window: EnergyWindow,
    /// 可选：描述符 CSV 导出路径
    pub output_csv: Option<PathBuf>,
    /// 报告中是否列出全部位点
    pub show_sites: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            vasprun_path: PathBuf::from(DEFAULT_VASPRUN_PATH),
            site_index: DEFAULT_SITE_INDEX,
            orbital: OrbitalType::D,
            full_window: DEFAULT_FULL_WINDOW,
            occupied_window: DEFAULT_OCCUPIED_WINDOW,
            output_csv: None,
            show_sites: true,
        }
    }
}
