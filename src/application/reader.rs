//! 塔罗牌解读流程
//!
//! 抽牌 → 整理含义 → 构建消息 → 调用模型

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::SPREAD_SIZES;
use crate::core::deck::Deck;
use crate::core::draw::{random_draw, DrawnCard};
use crate::core::prompt::{build_messages, prepare_prompt_input, PromptInput};
use crate::errors::{Result, TarotError};
use crate::infrastructure::llm::{ChatModel, LlmInput};

/// 解读请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingRequest {
    pub cards: Vec<DrawnCard>,
    pub context: String,
}

/// 解读结果
#[derive(Debug, Clone)]
pub struct Reading {
    pub cards: Vec<DrawnCard>,
    pub prompt: PromptInput,
    pub interpretation: String,
}

/// 塔罗牌解读器
pub struct TarotReader {
    deck: Deck,
    model: Arc<dyn ChatModel>,
}

impl TarotReader {
    pub fn new(deck: Deck, model: Arc<dyn ChatModel>) -> Self {
        Self { deck, model }
    }

    pub fn model_type(&self) -> &'static str {
        self.model.llm_type()
    }

    /// 解读已抽出的卡牌
    pub async fn analyze(&self, request: ReadingRequest) -> Result<Reading> {
        let context = request.context.trim();
        if context.is_empty() {
            return Err(TarotError::ValidationError(
                "为了获得更精确的解读，请输入您的问题或背景信息。".to_string(),
            ));
        }

        let prompt = prepare_prompt_input(&request.cards, context, &self.deck);
        let messages = build_messages(&prompt);
        debug!("system message:\n{}", messages[0].content);

        info!(
            "🔮 正在揭示牌义: {} cards via {}",
            request.cards.len(),
            self.model.llm_type()
        );
        let answer = self.model.invoke(LlmInput::from(messages)).await?;

        Ok(Reading {
            cards: request.cards,
            prompt,
            interpretation: answer.content,
        })
    }

    /// 从牌组中随机抽取指定数量的牌并解读
    pub async fn draw_and_analyze(&self, num_cards: usize, context: &str) -> Result<Reading> {
        if !SPREAD_SIZES.contains(&num_cards) {
            return Err(TarotError::ValidationError(format!(
                "不支持的抽牌数量 {}，可选: {:?}",
                num_cards, SPREAD_SIZES
            )));
        }
        if context.trim().is_empty() {
            return Err(TarotError::ValidationError(
                "为了获得更精确的解读，请输入您的问题或背景信息。".to_string(),
            ));
        }

        let cards = random_draw(num_cards, self.deck.card_names())?;
        self.analyze(ReadingRequest {
            cards,
            context: context.to_string(),
        })
        .await
    }
}
