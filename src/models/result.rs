//! # 分析结果数据模型
//!
//! 单个位点的能带描述符（每个自旋通道一组）。
//!
//! ## 依赖关系
//! - 被 `analysis/descriptors.rs` 构造
//! - 被 `report/` 使用

use crate::models::dos::OrbitalType;

/// 按自旋通道成对存放的数值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPair {
    pub spin_up: f64,
    pub spin_down: f64,
}

impl SpinPair {
    pub fn new(spin_up: f64, spin_down: f64) -> Self {
        SpinPair { spin_up, spin_down }
    }

    /// up - down
    pub fn difference(&self) -> f64 {
        self.spin_up - self.spin_down
    }

    pub fn mean(&self) -> f64 {
        (self.spin_up + self.spin_down) / 2.0
    }
}

/// 单个位点的分析结果
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// 费米能级 (eV)
    pub fermi_energy: f64,

    /// 位点索引（从 0 开始）
    pub site_index: usize,

    /// 位点元素
    pub site_element: String,

    /// 分析的轨道类型
    pub orbital: OrbitalType,

    /// 能带中心 (eV)
    pub band_centers: SpinPair,

    /// 能带填充率 [0, 1]
    pub band_fillings: SpinPair,

    /// 偏度
    pub band_skewness: SpinPair,

    /// 峰度
    pub band_kurtosis: SpinPair,

    /// 能带宽度 (eV)
    pub band_widths: SpinPair,
}

impl AnalysisResult {
    /// 磁矩 (μB) = filling(up) - filling(down)
    pub fn magnetic_moment(&self) -> f64 {
        self.band_fillings.difference()
    }

    /// 自旋劈裂 |center(up) - center(down)| (eV)
    pub fn spin_splitting(&self) -> f64 {
        self.band_centers.difference().abs()
    }

    /// 两个自旋通道能带中心的平均值 (eV)
    pub fn average_center(&self) -> f64 {
        self.band_centers.mean()
    }

    /// 表格行：(名称, 数值对)
    pub fn descriptor_rows(&self) -> Vec<(String, SpinPair)> {
        let unit = |name: &str, with_ev: bool| {
            if with_ev {
                format!("Band {} (eV)", name)
            } else {
                format!("Band {}", name)
            }
        };

        vec![
            (unit("Center", true), self.band_centers),
            (unit("Filling", false), self.band_fillings),
            (unit("Skewness", false), self.band_skewness),
            (unit("Kurtosis", false), self.band_kurtosis),
            (unit("Width", true), self.band_widths),
        ]
    }
}
