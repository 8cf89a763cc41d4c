//! # 统一错误处理模块
//!
//! 定义 dband 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分组
//! - 读取/校验错误（Loader 阶段）：打印诊断信息后正常退出
//! - 分析错误与其他错误：以非零状态退出
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// dband 统一错误类型
#[derive(Error, Debug)]
pub enum DbandError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Missing section '{section}' in {path}")]
    MissingSection { section: String, path: String },

    // ─────────────────────────────────────────────────────────────
    // 校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("Site index {index} exceeds number of sites ({count})")]
    SiteIndexOutOfRange { index: usize, count: usize },

    // ─────────────────────────────────────────────────────────────
    // 分析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Spin channel '{spin}' is not present in the DOS (non-spin-polarized calculation?)")]
    MissingSpinChannel { spin: String },

    #[error("No {orbital}-orbital columns in the projected DOS")]
    MissingOrbital { orbital: String },

    #[error("Energy window [{min}, {max}] eV contains fewer than two grid points")]
    EmptyWindow { min: f64, max: f64 },

    #[error("Integrated {orbital}-DOS ({spin}) is zero in window [{min}, {max}] eV")]
    ZeroDensity {
        orbital: String,
        spin: String,
        min: f64,
        max: f64,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid range format: {0} (expected MIN:MAX, e.g. -15:15)")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl DbandError {
    /// 是否属于读取/校验阶段的错误
    ///
    /// 这类错误只打印诊断信息，进程仍以 0 退出。
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            DbandError::FileReadError { .. }
                | DbandError::FileNotFound { .. }
                | DbandError::ParseError { .. }
                | DbandError::MissingSection { .. }
                | DbandError::SiteIndexOutOfRange { .. }
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, DbandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_failure_classification() {
        let out_of_range = DbandError::SiteIndexOutOfRange { index: 161, count: 2 };
        assert!(out_of_range.is_load_failure());
        assert_eq!(
            out_of_range.to_string(),
            "Site index 161 exceeds number of sites (2)"
        );

        let missing = DbandError::MissingSection {
            section: "efermi".to_string(),
            path: "vasprun.xml".to_string(),
        };
        assert!(missing.is_load_failure());

        let spin = DbandError::MissingSpinChannel {
            spin: "down".to_string(),
        };
        assert!(!spin.is_load_failure());
        assert!(!DbandError::InvalidRange("1-2".to_string()).is_load_failure());
    }
}
