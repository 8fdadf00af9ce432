//! 标准化错误处理
//!
//! 定义塔罗牌解读专用的错误类型，以及面向用户的友好提示

use thiserror::Error;

/// 项目主要错误类型
#[derive(Error, Debug)]
pub enum TarotError {
    /// 配置错误（API 密钥、采样参数等）
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 牌组数据错误
    #[error("Deck error: {0}")]
    DeckError(String),

    /// 输入验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// LLM 服务错误
    #[error("LLM service error: {0}")]
    LlmError(String),

    /// 网络请求错误
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 文件读写错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 未知错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl TarotError {
    /// 错误种类名称，用于提示信息
    pub fn kind(&self) -> &'static str {
        match self {
            TarotError::ConfigError(_) => "ConfigError",
            TarotError::DeckError(_) => "DeckError",
            TarotError::ValidationError(_) => "ValidationError",
            TarotError::LlmError(_) => "LlmError",
            TarotError::NetworkError(_) => "NetworkError",
            TarotError::IoError(_) => "IoError",
            TarotError::Unknown(_) => "Unknown",
        }
    }
}

impl From<csv::Error> for TarotError {
    fn from(err: csv::Error) -> Self {
        TarotError::DeckError(err.to_string())
    }
}

impl From<serde_json::Error> for TarotError {
    fn from(err: serde_json::Error) -> Self {
        TarotError::LlmError(format!("无法解析API响应: {}", err))
    }
}

impl From<reqwest::Error> for TarotError {
    fn from(err: reqwest::Error) -> Self {
        TarotError::NetworkError(err.to_string())
    }
}

/// 项目结果类型别名
pub type Result<T> = std::result::Result<T, TarotError>;

/// 面向用户的错误提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorHint {
    pub headline: String,
    pub hint: String,
}

/// 将错误归类为友好的标题与处理建议
pub fn describe(err: &TarotError) -> ErrorHint {
    let text = err.to_string();

    if let TarotError::IoError(io) = err {
        if io.kind() == std::io::ErrorKind::NotFound {
            return ErrorHint {
                headline: format!("📁 文件未找到: {}", io),
                hint: "💡 请确保所需的数据文件和图片文件存在于正确的路径".to_string(),
            };
        }
    }

    if matches!(err, TarotError::ConfigError(_))
        || text.contains("API")
        || text.to_lowercase().contains("key")
    {
        return ErrorHint {
            headline: format!("🔑 API配置错误: {}", text),
            hint: "💡 请检查.env文件中的DASHSCOPE_API_KEY配置".to_string(),
        };
    }

    ErrorHint {
        headline: format!("❌ {}: {}", err.kind(), text),
        hint: "💡 请检查控制台输出获取更多错误信息".to_string(),
    }
}
