//! # 能带分析模块
//!
//! 从投影态密度计算能带描述符。
//!
//! ## 子模块
//! - `moments`: 梯形积分与统计矩
//! - `descriptors`: 按位点、自旋通道组装描述符
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 使用
//! - 使用 `models/`

pub mod descriptors;
pub mod moments;

pub use descriptors::BandAnalyzer;
