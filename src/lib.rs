//! 通义千问塔罗牌解读
//!
//! 提供命令行塔罗牌解读的基础能力：
//! - 卡牌知识库（分号分隔的 CSV）
//! - 随机抽牌（不放回，30% 概率逆位）
//! - 提示词构建（系统消息 + 用户问题）
//! - 通义千问调用，失败时回退到固定回复
//!
//! # 架构分层
//!
//! - `core`: 核心层，牌组、抽牌、提示词与配置
//! - `infrastructure`: 基础设施层，LLM 与日志
//! - `application`: 应用层，解读流程与终端输出

// 核心层
pub mod core;

// 基础设施层
pub mod infrastructure;

// 应用层
pub mod application;

pub mod errors;

pub use crate::application::output::{CliOutput, ReadingOutput};
pub use crate::application::reader::{Reading, ReadingRequest, TarotReader};
pub use crate::core::config::{AppConfig, SettingValue, TarotSettings};
pub use crate::core::deck::{CardMeaning, Deck};
pub use crate::core::draw::{draw_cards, random_draw, DrawnCard};
pub use crate::core::prompt::{build_messages, prepare_prompt_input, PromptInput};
pub use crate::errors::{describe, ErrorHint, Result, TarotError};
pub use crate::infrastructure::llm::{
    build_model, ChatMessage, ChatModel, FallbackLlm, LlmInput, QwenClient, QwenSettings, Role,
    WithFallback,
};
pub use crate::infrastructure::logger;
