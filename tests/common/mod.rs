//! 测试通用工具
//!
//! 提供测试辅助函数和通用测试工具

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use qwen_tarot::{CardMeaning, ChatMessage, ChatModel, Deck, Result, TarotError};

static INIT: Once = Once::new();

/// 初始化测试环境
pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// 大阿卡纳前几张牌，分号分隔
pub const SAMPLE_CSV: &str = "card;upright;reversed;symbolism\n\
00-thefool.jpg;new beginnings;recklessness;the cliff edge\n\
01-themagician.jpg;manifestation;manipulation;the infinity sign\n\
02-thehighpriestess.jpg;intuition;secrets;the pillars\n\
03-theempress.jpg;abundance;dependence;the wheat field\n\
04-theemperor.jpg;authority;rigidity;the ram heads\n\
05-thehierophant.jpg;tradition;rebellion;the crossed keys\n\
06-thelovers.jpg;union;disharmony;the angel\n";

pub fn sample_deck() -> Deck {
    let mut deck = Deck::default();
    deck.insert(
        "00-thefool.jpg",
        CardMeaning {
            upright: "new beginnings".to_string(),
            reversed: "recklessness".to_string(),
            symbolism: "the cliff edge".to_string(),
        },
    );
    deck
}

/// 写入临时 CSV 文件
pub fn write_deck(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp deck");
    file.write_all(bytes).expect("write temp deck");
    file
}

/// 记录收到的消息并返回固定回复的模型
pub struct RecordingModel {
    pub reply: Result<String>,
    pub seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl RecordingModel {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(TarotError::LlmError(message.to_string())),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for RecordingModel {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        self.seen.lock().unwrap().push(messages.to_vec());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(TarotError::LlmError(e.to_string())),
        }
    }

    fn llm_type(&self) -> &'static str {
        "recording"
    }
}
