//! 应用层：命令行流程、解读编排与终端输出

pub mod cli;
pub mod output;
pub mod reader;
