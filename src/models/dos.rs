//! # 态密度 (DOS) 数据模型
//!
//! 存储从 vasprun.xml 读取的费米能级与按 (位点, 自旋, 轨道) 投影的态密度。
//! 所有位点、自旋、轨道共享同一能量网格。
//!
//! ## 依赖关系
//! - 被 `parsers/vasprun.rs` 构造
//! - 被 `analysis/` 使用

use crate::error::{DbandError, Result};

/// 自旋通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    /// 在 vasprun.xml 中的自旋序号（从 0 开始）
    pub fn index(self) -> usize {
        match self {
            Spin::Up => 0,
            Spin::Down => 1,
        }
    }
}

impl std::fmt::Display for Spin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Spin::Up => write!(f, "up"),
            Spin::Down => write!(f, "down"),
        }
    }
}

/// 轨道类型（角量子数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitalType {
    S,
    P,
    D,
    F,
}

impl OrbitalType {
    /// 根据 vasprun.xml 中的列名判断轨道类型
    ///
    /// 例如 `s`, `py`, `dxy`, `dx2`, `x2-y2`, `fy3x2`
    pub fn from_column(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if name == "x2-y2" {
            return Some(OrbitalType::D);
        }
        match name.chars().next()? {
            's' => Some(OrbitalType::S),
            'p' => Some(OrbitalType::P),
            'd' => Some(OrbitalType::D),
            'f' => Some(OrbitalType::F),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrbitalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrbitalType::S => write!(f, "s"),
            OrbitalType::P => write!(f, "p"),
            OrbitalType::D => write!(f, "d"),
            OrbitalType::F => write!(f, "f"),
        }
    }
}

/// 能量窗口 [min, max]（eV，相对费米能级），两端闭合
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyWindow {
    pub min: f64,
    pub max: f64,
}

impl EnergyWindow {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min < max) {
            return Err(DbandError::InvalidRange(format!("{}:{}", min, max)));
        }
        Ok(EnergyWindow { min, max })
    }

    pub fn contains(&self, energy: f64) -> bool {
        energy >= self.min && energy <= self.max
    }
}

impl std::fmt::Display for EnergyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}] eV", self.min, self.max)
    }
}

/// 完整的投影态密度
#[derive(Debug, Clone)]
pub struct CompleteDos {
    /// 费米能级 (eV)
    pub efermi: f64,

    /// 能量网格 (eV, 绝对值，升序)
    pub energies: Vec<f64>,

    /// 轨道列名（不含 energy 列）
    pub orbitals: Vec<String>,

    /// 投影态密度 [site][spin][orbital][grid]
    pub projections: Vec<Vec<Vec<Vec<f64>>>>,
}

impl CompleteDos {
    /// 自旋通道数（1 或 2）
    pub fn spin_count(&self) -> usize {
        self.projections.first().map(|s| s.len()).unwrap_or(0)
    }

    pub fn site_count(&self) -> usize {
        self.projections.len()
    }

    /// 相对费米能级的能量网格
    pub fn shifted_energies(&self) -> Vec<f64> {
        self.energies.iter().map(|e| e - self.efermi).collect()
    }

    /// 某位点、某自旋下指定轨道类型的态密度（各分量求和）
    pub fn orbital_dos(&self, site: usize, spin: Spin, orbital: OrbitalType) -> Result<Vec<f64>> {
        let site_dos = self
            .projections
            .get(site)
            .ok_or(DbandError::SiteIndexOutOfRange {
                index: site,
                count: self.site_count(),
            })?;

        let spin_dos = site_dos
            .get(spin.index())
            .ok_or_else(|| DbandError::MissingSpinChannel {
                spin: spin.to_string(),
            })?;

        let columns: Vec<usize> = self
            .orbitals
            .iter()
            .enumerate()
            .filter(|(_, name)| OrbitalType::from_column(name) == Some(orbital))
            .map(|(i, _)| i)
            .collect();

        if columns.is_empty() {
            return Err(DbandError::MissingOrbital {
                orbital: orbital.to_string(),
            });
        }

        let mut total = vec![0.0; self.energies.len()];
        for &col in &columns {
            for (acc, value) in total.iter_mut().zip(spin_dos[col].iter()) {
                *acc += value;
            }
        }

        Ok(total)
    }
}
