//! 提示词构建
//!
//! 将抽出的卡牌与知识库中的含义整理为系统消息和用户消息

use serde::{Deserialize, Serialize};

use crate::core::deck::Deck;
use crate::core::draw::DrawnCard;
use crate::infrastructure::llm::ChatMessage;

/// 系统消息模板
pub const SYSTEM_TEMPLATE: &str = "
你是一位神秘的塔罗牌解读师，拥有深厚的象征学和心理学知识。
请基于提供的含义分析以下塔罗牌（同时考虑它们是否为逆位）：
{card_details}
请特别注意以下几个方面：
- 详细分析每张牌的含义（正位或逆位）。
- 然后根据卡牌提供一个与上下文相关的总体解释：{context}。
- 保持神秘，并基于特定列 {symbolism} 提供与卡牌象征意义相关的解释信息。
- 在解读结束时，总是提供改善或处理当前情况的建议。建议也请基于你的心理学知识。
";

/// 用户消息模板
pub const HUMAN_TEMPLATE: &str = "{context}";

/// 填充模板所需的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptInput {
    pub card_details: String,
    pub context: String,
    pub symbolism: String,
}

fn or_placeholder<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    if text.is_empty() {
        placeholder
    } else {
        text
    }
}

/// 整理每张牌的含义（按正逆位选择）与象征意义
pub fn prepare_prompt_input(cards: &[DrawnCard], context: &str, deck: &Deck) -> PromptInput {
    let mut card_details = Vec::with_capacity(cards.len());
    let mut symbolism = Vec::with_capacity(cards.len());

    for card in cards {
        let position = card.orientation_label();
        match deck.meaning(&card.name) {
            Some(meaning) => {
                let text = if card.is_reversed {
                    or_placeholder(&meaning.reversed, "逆位含义未知")
                } else {
                    or_placeholder(&meaning.upright, "正位含义未知")
                };
                card_details.push(format!("**{}** ({}): {}", card.name, position, text));
                symbolism.push(format!(
                    "**{}**: {}",
                    card.name,
                    or_placeholder(&meaning.symbolism, "象征意义未知")
                ));
            }
            None => {
                card_details.push(format!("**{}** ({}): 含义待解读", card.name, position));
                symbolism.push(format!("**{}**: 象征意义待解读", card.name));
            }
        }
    }

    PromptInput {
        card_details: card_details.join("\n"),
        context: context.to_string(),
        symbolism: symbolism.join("\n"),
    }
}

/// 填充系统消息模板
pub fn render_system_message(input: &PromptInput) -> String {
    // 依次替换，避免字段内容中的占位符被二次展开
    let mut rendered = String::with_capacity(SYSTEM_TEMPLATE.len() + 256);
    let mut rest = SYSTEM_TEMPLATE;
    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start..];
        let field = [
            ("{card_details}", input.card_details.as_str()),
            ("{context}", input.context.as_str()),
            ("{symbolism}", input.symbolism.as_str()),
        ]
        .into_iter()
        .find(|(placeholder, _)| tail.starts_with(placeholder));

        match field {
            Some((placeholder, value)) => {
                rendered.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                rendered.push('{');
                rest = &tail[1..];
            }
        }
    }
    rendered.push_str(rest);
    rendered
}

/// 构建发送给模型的消息：系统消息 + 用户问题
pub fn build_messages(input: &PromptInput) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(render_system_message(input)),
        ChatMessage::human(HUMAN_TEMPLATE.replace("{context}", &input.context)),
    ]
}
