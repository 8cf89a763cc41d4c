//! # 解析器模块
//!
//! 提供 DFT 输出格式的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: vasprun

pub mod vasprun;

pub use vasprun::{parse_vasprun_file, Vasprun};
