//! 核心层：牌组、抽牌、提示词与配置

pub mod config;
pub mod deck;
pub mod draw;
pub mod prompt;
