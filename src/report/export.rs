//! # 描述符导出
//!
//! 将分析结果写为 CSV（每个描述符一行，外加磁矩）。
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 调用
//! - 使用 `models/result.rs`
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{DbandError, Result};
use crate::models::AnalysisResult;

use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// CSV 记录（字段名即表头）
#[derive(Debug, Serialize)]
struct DescriptorRecord<'a> {
    site_index: usize,
    element: &'a str,
    orbital: String,
    property: String,
    spin_up: String,
    spin_down: String,
}

/// 导出为 CSV 文件
pub fn to_csv(result: &AnalysisResult, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    write_records(result, &mut wtr)?;

    wtr.flush().map_err(|e| DbandError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

fn write_records<W: Write>(result: &AnalysisResult, wtr: &mut csv::Writer<W>) -> Result<()> {
    let record = |property: String, spin_up: String, spin_down: String| DescriptorRecord {
        site_index: result.site_index,
        element: &result.site_element,
        orbital: result.orbital.to_string(),
        property,
        spin_up,
        spin_down,
    };

    for (name, pair) in result.descriptor_rows() {
        wtr.serialize(record(
            name,
            format!("{:.10}", pair.spin_up),
            format!("{:.10}", pair.spin_down),
        ))?;
    }

    // 磁矩不区分自旋，写在 spin_up 列
    wtr.serialize(record(
        "Magnetic Moment (μB)".to_string(),
        format!("{:.10}", result.magnetic_moment()),
        String::new(),
    ))?;

    Ok(())
}
