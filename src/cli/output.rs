//! Console output for CLI commands
//!
//! 进度行写到 stdout，错误写到 stderr。结构化日志走 tracing（stderr）。

use colored::Colorize;

/// 打印一行进度
pub fn progress(msg: &str) {
    println!("{}", msg.green());
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{}", msg.red().bold());
}
