//! # 态密度矩计算
//!
//! 基于梯形积分的态密度统计量。能量均相对费米能级。
//!
//! ## 定义
//! - 中心: c = ∫Eρ / ∫ρ
//! - n 阶中心矩: m_n = ∫(E - c)^n ρ / ∫ρ
//! - 偏度: m3 / m2^1.5
//! - 峰度: m4 / m2^2（非超额峰度，高斯分布为 3）
//! - 宽度: sqrt(m2)
//! - 填充率: ∫_{E<0} ρ / ∫ρ（全能量范围）
//!
//! ## 依赖关系
//! - 被 `analysis/descriptors.rs` 使用
//! - 使用 `models/dos.rs` 的 EnergyWindow

use crate::models::EnergyWindow;

/// 梯形积分
pub fn trapz(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

/// 窗口内的态密度曲线
#[derive(Debug, Clone)]
pub struct WindowedDos {
    energies: Vec<f64>,
    densities: Vec<f64>,
    norm: f64,
}

impl WindowedDos {
    /// 按窗口截取（两端闭合）
    ///
    /// 窗口内少于两个网格点时返回 None。
    pub fn new(energies: &[f64], densities: &[f64], window: &EnergyWindow) -> Option<Self> {
        let (energies, densities): (Vec<f64>, Vec<f64>) = energies
            .iter()
            .zip(densities.iter())
            .filter(|(e, _)| window.contains(**e))
            .map(|(e, d)| (*e, *d))
            .unzip();

        if energies.len() < 2 {
            return None;
        }

        let norm = trapz(&energies, &densities);
        Some(WindowedDos {
            energies,
            densities,
            norm,
        })
    }

    /// 积分态密度 ∫ρ
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// 积分态密度是否为零（无法归一化）
    pub fn is_degenerate(&self) -> bool {
        let norm = self.norm();
        norm == 0.0 || !norm.is_finite()
    }

    /// 态密度加权平均能量
    pub fn center(&self) -> f64 {
        let weighted: Vec<f64> = self
            .energies
            .iter()
            .zip(self.densities.iter())
            .map(|(e, d)| e * d)
            .collect();
        trapz(&self.energies, &weighted) / self.norm
    }

    /// n 阶中心矩
    pub fn central_moment(&self, n: i32) -> f64 {
        let center = self.center();
        let weighted: Vec<f64> = self
            .energies
            .iter()
            .zip(self.densities.iter())
            .map(|(e, d)| (e - center).powi(n) * d)
            .collect();
        trapz(&self.energies, &weighted) / self.norm
    }

    pub fn skewness(&self) -> f64 {
        self.central_moment(3) / self.central_moment(2).powf(1.5)
    }

    pub fn kurtosis(&self) -> f64 {
        self.central_moment(4) / self.central_moment(2).powi(2)
    }

    pub fn width(&self) -> f64 {
        self.central_moment(2).max(0.0).sqrt()
    }
}

/// 费米能级以下的占据比例
///
/// 全网格积分为零时返回 None。
pub fn filling(energies: &[f64], densities: &[f64]) -> Option<f64> {
    let total = trapz(energies, densities);
    if total == 0.0 || !total.is_finite() {
        return None;
    }

    let (occ_e, occ_d): (Vec<f64>, Vec<f64>) = energies
        .iter()
        .zip(densities.iter())
        .filter(|(e, _)| **e < 0.0)
        .map(|(e, d)| (*e, *d))
        .unzip();

    Some(trapz(&occ_e, &occ_d) / total)
}
