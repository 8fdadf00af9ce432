//! LLM 客户端
//!
//! 提供与通义千问（DashScope）的交互能力，以及模型不可用时的回退实现：
//! - `ChatModel`: 统一的对话模型接口
//! - `QwenClient`: DashScope 文本生成 API
//! - `FallbackLlm`: 固定回复的回退模型
//! - `WithFallback`: 主模型调用失败时自动切换到回退模型

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::config::DEFAULT_BASE_URL;
use crate::errors::{Result, TarotError};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    Human,
    #[serde(rename = "assistant")]
    Ai,
}

/// 消息结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }
}

/// 模型输入：单段文本或消息列表
#[derive(Debug, Clone)]
pub enum LlmInput {
    Text(String),
    Messages(Vec<ChatMessage>),
}

impl LlmInput {
    /// 文本输入视为一条用户消息
    pub fn into_messages(self) -> Vec<ChatMessage> {
        match self {
            LlmInput::Text(text) => vec![ChatMessage::human(text)],
            LlmInput::Messages(messages) => messages,
        }
    }
}

impl From<&str> for LlmInput {
    fn from(text: &str) -> Self {
        LlmInput::Text(text.to_string())
    }
}

impl From<String> for LlmInput {
    fn from(text: String) -> Self {
        LlmInput::Text(text)
    }
}

impl From<Vec<ChatMessage>> for LlmInput {
    fn from(messages: Vec<ChatMessage>) -> Self {
        LlmInput::Messages(messages)
    }
}

/// 对话模型接口
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// 根据消息列表生成回复文本
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String>;

    /// 模型类型标识
    fn llm_type(&self) -> &'static str;

    /// 调用模型，返回 AI 消息
    async fn invoke(&self, input: LlmInput) -> Result<ChatMessage> {
        let messages = input.into_messages();
        let text = self.generate(&messages).await?;
        Ok(ChatMessage::ai(text))
    }

    /// 单段文本预测
    async fn predict(&self, text: &str) -> Result<String> {
        self.generate(&[ChatMessage::human(text)]).await
    }

    /// 对多条提示逐一生成回复
    async fn predict_many(&self, prompts: &[String]) -> Result<Vec<String>> {
        let mut results = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            results.push(self.predict(prompt).await?);
        }
        Ok(results)
    }
}

/// 通义千问调用参数
#[derive(Clone)]
pub struct QwenSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub repetition_penalty: f32,
    pub timeout: Duration,
}

impl std::fmt::Debug for QwenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QwenSettings")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .field("repetition_penalty", &self.repetition_penalty)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl QwenSettings {
    /// 使用默认参数创建设置
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "qwen-plus".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.8,
            top_p: 0.8,
            max_tokens: 2000,
            repetition_penalty: 1.0,
            timeout: Duration::from_secs(60),
        }
    }

    /// 从 DASHSCOPE_API_KEY 环境变量读取密钥
    pub fn from_env() -> Result<Self> {
        match std::env::var("DASHSCOPE_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(Self::missing_key_error()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn missing_key_error() -> TarotError {
        TarotError::ConfigError(
            "通义千问API密钥未配置，请提供api_key参数或设置DASHSCOPE_API_KEY环境变量"
                .to_string(),
        )
    }
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput<'a>,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationInput<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Serialize)]
struct GenerationParameters {
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    repetition_penalty: f32,
    result_format: &'static str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    output: Option<GenerationOutput>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
}

#[derive(Deserialize)]
struct GenerationOutput {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// 通义千问客户端
#[derive(Clone)]
pub struct QwenClient {
    settings: QwenSettings,
    http: reqwest::Client,
}

impl QwenClient {
    pub fn new(settings: QwenSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(QwenSettings::missing_key_error());
        }

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        info!("通义千问模型已配置: {}", settings.model);
        Ok(Self { settings, http })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/services/aigc/text-generation/generation",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatModel for QwenClient {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let req = GenerationRequest {
            model: &self.settings.model,
            input: GenerationInput { messages },
            parameters: GenerationParameters {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                max_tokens: self.settings.max_tokens,
                repetition_penalty: self.settings.repetition_penalty,
                result_format: "message",
            },
        };

        debug!("calling qwen with {} messages", messages.len());
        let res = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| TarotError::NetworkError(format!("API调用异常: {}", e)))?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GenerationResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| "未知错误".to_string());
            return Err(TarotError::LlmError(format!(
                "API调用失败: HTTP状态码 {}, 错误信息: {}",
                status.as_u16(),
                message
            )));
        }

        let response: GenerationResponse = serde_json::from_str(&body)?;
        if let Some(request_id) = &response.request_id {
            debug!("qwen request id: {}", request_id);
        }

        let choice = response
            .output
            .and_then(|o| o.choices.into_iter().next())
            .ok_or_else(|| TarotError::LlmError("生成响应失败".to_string()))?;
        if let Some(reason) = &choice.finish_reason {
            debug!("qwen finish reason: {}", reason);
        }

        Ok(choice.message.content)
    }

    fn llm_type(&self) -> &'static str {
        "qwen"
    }
}

/// 回退模型，当主要模型不可用时使用
#[derive(Debug, Clone)]
pub struct FallbackLlm {
    error_message: String,
}

impl FallbackLlm {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
        }
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// 基础回退响应
    pub fn reply(&self) -> String {
        format!(
            "抱歉，AI模型暂时不可用：{}。请稍后重试或检查配置。",
            self.error_message
        )
    }
}

#[async_trait]
impl ChatModel for FallbackLlm {
    async fn generate(&self, _messages: &[ChatMessage]) -> Result<String> {
        Ok(self.reply())
    }

    fn llm_type(&self) -> &'static str {
        "fallback"
    }
}

/// 主模型失败时以错误信息构造回退模型作答
pub struct WithFallback {
    primary: Arc<dyn ChatModel>,
}

impl WithFallback {
    pub fn new(primary: Arc<dyn ChatModel>) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl ChatModel for WithFallback {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        match self.primary.generate(messages).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(
                    "{} model failed, using fallback: {}",
                    self.primary.llm_type(),
                    e
                );
                FallbackLlm::new(e.to_string()).generate(messages).await
            }
        }
    }

    fn llm_type(&self) -> &'static str {
        self.primary.llm_type()
    }
}

/// 根据配置结果构建模型；配置失败时直接使用回退模型
pub fn build_model(settings: Result<QwenSettings>) -> Arc<dyn ChatModel> {
    match settings.and_then(QwenClient::new) {
        Ok(client) => Arc::new(WithFallback::new(Arc::new(client))),
        Err(e) => {
            warn!("通义千问模型配置失败: {}", e);
            Arc::new(FallbackLlm::new(e.to_string()))
        }
    }
}
