//! # dband - 单位点 d 带描述符分析
//!
//! 读取 VASP vasprun.xml，对指定位点的投影态密度计算
//! 能带中心、填充率、偏度、峰度、宽度（分自旋通道），并输出报告。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (流水线：读取 → 分析 → 报告)
//!   │     ├── parsers/   (vasprun.xml 解析)
//!   │     ├── analysis/  (统计矩与描述符)
//!   │     ├── report/    (终端报告与 CSV 导出)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod analysis;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod report;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = cli.into_config().and_then(commands::run) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
