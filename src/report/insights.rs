//! # 分析结论
//!
//! 根据固定阈值，从分析结果推导定性结论（自旋劈裂、磁性、成键强弱）。
//!
//! ## 依赖关系
//! - 被 `report/mod.rs` 使用
//! - 使用 `models/result.rs`

use crate::models::{AnalysisResult, OrbitalType};

/// 自旋劈裂阈值 (eV)
pub const SPIN_SPLITTING_THRESHOLD: f64 = 0.1;

/// 磁矩阈值 (μB)
pub const MAGNETIC_MOMENT_THRESHOLD: f64 = 0.1;

/// 平均能带中心低于此值：强成键 (eV)
pub const DEEP_CENTER_THRESHOLD: f64 = -2.0;

/// 平均能带中心高于此值：弱成键 (eV)
pub const SHALLOW_CENTER_THRESHOLD: f64 = -1.0;

/// 定性结论
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Insight {
    /// |center(up) - center(down)| 超过阈值
    SpinSplitting { splitting: f64 },
    /// |moment| 超过阈值
    Magnetic { moment: f64 },
    /// 平均能带中心较深
    DeepCenter { average: f64 },
    /// 平均能带中心较浅
    ShallowCenter { average: f64 },
}

impl Insight {
    pub fn message(&self, orbital: OrbitalType) -> String {
        match self {
            Insight::SpinSplitting { splitting } => {
                format!("Significant spin-splitting detected ({:.3} eV)", splitting)
            }
            Insight::Magnetic { moment } => {
                format!(
                    "Magnetic material with {}-band moment: {:.3} μB",
                    orbital, moment
                )
            }
            Insight::DeepCenter { average } => format!(
                "Deep {}-band center ({:.3} eV) suggests strong bonding",
                orbital, average
            ),
            Insight::ShallowCenter { average } => format!(
                "Shallow {}-band center ({:.3} eV) suggests weak bonding",
                orbital, average
            ),
        }
    }
}

/// 推导全部结论（顺序：自旋劈裂、磁性、成键）
pub fn derive_insights(result: &AnalysisResult) -> Vec<Insight> {
    let mut insights = Vec::new();

    let splitting = result.spin_splitting();
    if splitting > SPIN_SPLITTING_THRESHOLD {
        insights.push(Insight::SpinSplitting { splitting });
    }

    let moment = result.magnetic_moment();
    if moment.abs() > MAGNETIC_MOMENT_THRESHOLD {
        insights.push(Insight::Magnetic { moment });
    }

    let average = result.average_center();
    if average < DEEP_CENTER_THRESHOLD {
        insights.push(Insight::DeepCenter { average });
    } else if average > SHALLOW_CENTER_THRESHOLD {
        insights.push(Insight::ShallowCenter { average });
    }

    insights
}
