//! 配置管理
//!
//! 命令行参数与环境变量（支持 .env）共同构成运行配置

use std::time::Duration;

use clap::Parser;

use crate::errors::{Result, TarotError};
use crate::infrastructure::llm::QwenSettings;

/// 可选的抽牌数量（3 张聚焦，7 张全面）
pub const SPREAD_SIZES: [usize; 3] = [3, 5, 7];

/// 逆位概率
pub const REVERSE_PROBABILITY: f64 = 0.3;

/// 卡牌图片展示宽度
pub const IMAGE_WIDTH: u32 = 150;

/// 支持的图片格式
pub const SUPPORTED_IMAGE_FORMATS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// DashScope 默认地址
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "🔮 交互式塔罗牌解读（通义千问）")]
pub struct AppConfig {
    // LLM 配置
    /// 通义千问 API 密钥，缺失时使用回退模型
    #[arg(long, env = "DASHSCOPE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "QWEN_MODEL", default_value = "qwen-plus")]
    pub model: String,

    #[arg(long, env = "DASHSCOPE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// 生成文本的随机性
    #[arg(long, env = "QWEN_TEMPERATURE", default_value_t = 0.8)]
    pub temperature: f32,

    /// 采样概率阈值
    #[arg(long, env = "QWEN_TOP_P", default_value_t = 0.8)]
    pub top_p: f32,

    /// 最大生成 token 数
    #[arg(long, env = "QWEN_MAX_TOKENS", default_value_t = 2000)]
    pub max_tokens: u32,

    #[arg(long, env = "QWEN_REPETITION_PENALTY", default_value_t = 1.0)]
    pub repetition_penalty: f32,

    /// 请求超时（秒）
    #[arg(long, env = "QWEN_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    // 牌组配置
    /// 卡牌知识库（分号分隔的 CSV）
    #[arg(long, env = "TAROT_DECK", default_value = "data/tarots.csv")]
    pub deck: String,

    #[arg(long, env = "TAROT_IMAGES", default_value = "images")]
    pub images_dir: String,

    /// 抽牌数量: 3, 5, 7
    #[arg(short = 'n', long = "cards", env = "TAROT_CARDS", default_value_t = 3)]
    pub cards: usize,

    /// 问题或背景，缺省时从标准输入读取
    #[arg(short, long, env = "TAROT_QUESTION")]
    pub question: Option<String>,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if !SPREAD_SIZES.contains(&self.cards) {
            return Err(TarotError::ValidationError(format!(
                "不支持的抽牌数量 {}，可选: {:?}",
                self.cards, SPREAD_SIZES
            )));
        }
        if !(0.0..2.0).contains(&self.temperature) {
            return Err(TarotError::ConfigError(format!(
                "temperature 必须位于 [0, 2) 区间，当前为 {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(TarotError::ConfigError(format!(
                "top_p 必须位于 (0, 1] 区间，当前为 {}",
                self.top_p
            )));
        }
        if self.max_tokens == 0 {
            return Err(TarotError::ConfigError("max_tokens 必须大于 0".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(TarotError::ConfigError(
                "timeout_secs 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }

    /// 构建通义千问设置；密钥缺失时返回配置错误
    pub fn qwen_settings(&self) -> Result<QwenSettings> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(QwenSettings::missing_key_error)?;

        Ok(QwenSettings {
            api_key: api_key.to_string(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            repetition_penalty: self.repetition_penalty,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

/// 配置值
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Sizes(Vec<usize>),
    Probability(f64),
    Width(u32),
    Formats(Vec<&'static str>),
}

/// 塔罗牌常用配置
pub struct TarotSettings;

impl TarotSettings {
    /// 按名称获取配置值，未知键返回 None
    pub fn get(key: &str) -> Option<SettingValue> {
        match key {
            "DEFAULT_CARDS" => Some(SettingValue::Sizes(SPREAD_SIZES.to_vec())),
            "REVERSE_PROBABILITY" => Some(SettingValue::Probability(REVERSE_PROBABILITY)),
            "IMAGE_WIDTH" => Some(SettingValue::Width(IMAGE_WIDTH)),
            "SUPPORTED_IMAGE_FORMATS" => {
                Some(SettingValue::Formats(SUPPORTED_IMAGE_FORMATS.to_vec()))
            }
            _ => None,
        }
    }

    /// 按名称获取配置值，未知键时使用给定默认值
    pub fn get_or(key: &str, default: SettingValue) -> SettingValue {
        Self::get(key).unwrap_or(default)
    }

    /// 图片文件是否为支持的格式
    pub fn is_supported_image(path: &str) -> bool {
        let lower = path.to_lowercase();
        SUPPORTED_IMAGE_FORMATS.iter().any(|ext| lower.ends_with(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let mut full = vec!["test"];
        full.extend_from_slice(args);
        AppConfig::parse_from(full)
    }

    #[test]
    fn test_config_defaults() {
        let config = parse(&["--api-key", "sk-test"]);

        assert_eq!(config.model, "qwen-plus");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.temperature, 0.8);
        assert_eq!(config.top_p, 0.8);
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.cards, 3);
        assert_eq!(config.deck, "data/tarots.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_spread() {
        let config = parse(&["--api-key", "sk-test", "-n", "4"]);
        assert!(matches!(
            config.validate(),
            Err(TarotError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_rejects_bad_sampling() {
        let config = parse(&["--api-key", "sk-test", "--top-p", "0"]);
        assert!(config.validate().is_err());

        let config = parse(&["--api-key", "sk-test", "--temperature", "2.5"]);
        assert!(config.validate().is_err());

        let config = parse(&["--api-key", "sk-test", "--max-tokens", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let config = parse(&["--api-key", "sk-test", "--timeout-secs", "0"]);
        assert!(matches!(config.validate(), Err(TarotError::ConfigError(_))));

        let config = parse(&["--api-key", "sk-test", "--timeout-secs", "1"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_qwen_settings() {
        let config = parse(&["--api-key", " sk-test ", "--model", "qwen-max"]);
        let settings = config.qwen_settings().unwrap();
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.model, "qwen-max");
        assert_eq!(settings.timeout, Duration::from_secs(60));

        let config = parse(&["--api-key", "   "]);
        assert!(matches!(
            config.qwen_settings(),
            Err(TarotError::ConfigError(_))
        ));
    }

    #[test]
    fn test_tarot_settings_lookup() {
        assert_eq!(
            TarotSettings::get("DEFAULT_CARDS"),
            Some(SettingValue::Sizes(vec![3, 5, 7]))
        );
        assert_eq!(
            TarotSettings::get("REVERSE_PROBABILITY"),
            Some(SettingValue::Probability(0.3))
        );
        assert_eq!(TarotSettings::get("NOPE"), None);
        assert_eq!(
            TarotSettings::get_or("NOPE", SettingValue::Width(1)),
            SettingValue::Width(1)
        );
    }

    #[test]
    fn test_supported_image() {
        assert!(TarotSettings::is_supported_image("00-thefool.JPG"));
        assert!(TarotSettings::is_supported_image("x.png"));
        assert!(!TarotSettings::is_supported_image("x.gif"));
    }
}
