//! # 命令执行模块
//!
//! 实现分析流水线的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `parsers/`, `analysis/`, `report/`, `models/`, `utils/`
//! - 子模块: analyze

pub mod analyze;

use crate::error::Result;
use crate::models::AnalysisConfig;

/// 执行命令
pub fn run(config: AnalysisConfig) -> Result<()> {
    analyze::execute(&config)
}
