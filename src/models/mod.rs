//! # 数据模型模块
//!
//! 定义晶体结构、态密度、分析配置与分析结果的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `analysis/`, `report/` 和 `commands/` 使用
//! - 子模块: structure, dos, config, result

pub mod config;
pub mod dos;
pub mod result;
pub mod structure;

pub use config::AnalysisConfig;
pub use dos::{CompleteDos, EnergyWindow, OrbitalType, Spin};
pub use result::{AnalysisResult, SpinPair};
pub use structure::{Atom, Crystal, Lattice};
