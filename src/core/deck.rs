//! 卡牌知识库
//!
//! 从分号分隔、latin-1 编码的 CSV 文件加载卡牌的正位、逆位与象征含义

use std::collections::HashMap;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tracing::{debug, info};

use crate::errors::{Result, TarotError};

/// 知识库必需的列（小写）
pub const REQUIRED_COLUMNS: [&str; 4] = ["card", "upright", "reversed", "symbolism"];

/// 单张卡牌的含义
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardMeaning {
    pub upright: String,
    pub reversed: String,
    pub symbolism: String,
}

/// 牌组
#[derive(Debug, Clone, Default)]
pub struct Deck {
    names: Vec<String>,
    meanings: HashMap<String, CardMeaning>,
}

impl Deck {
    /// 从文件加载牌组
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        // latin-1 内容按 WHATWG 规则以 windows-1252 解码
        let (text, _, _) = WINDOWS_1252.decode(&bytes);
        let deck = Self::from_reader(text.as_bytes())?;

        info!(
            "Knowledge base loaded from {}: {} cards",
            path.display(),
            deck.len()
        );
        Ok(deck)
    }

    /// 从任意 UTF-8 数据源解析牌组
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();
        debug!("deck columns after cleanup: {:?}", headers);

        let missing = validate_columns(&headers, &REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(TarotError::DeckError(format!(
                "Missing columns in CSV file: {}\nAvailable columns: {}",
                missing.join(", "),
                headers.join(", ")
            )));
        }

        let index = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| TarotError::DeckError(format!("Missing column: {}", name)))
        };
        let card_idx = index("card")?;
        let upright_idx = index("upright")?;
        let reversed_idx = index("reversed")?;
        let symbolism_idx = index("symbolism")?;

        let mut deck = Deck::default();
        for record in rdr.records() {
            let record = record?;
            let cell = |i: usize| record.get(i).map(str::trim).unwrap_or_default().to_string();

            let name = cell(card_idx);
            if name.is_empty() {
                continue;
            }

            let meaning = CardMeaning {
                upright: cell(upright_idx),
                reversed: cell(reversed_idx),
                symbolism: cell(symbolism_idx),
            };
            deck.insert(name, meaning);
        }

        if deck.is_empty() {
            return Err(TarotError::DeckError("数据文件为空".to_string()));
        }
        Ok(deck)
    }

    /// 添加卡牌；重名时保留原有顺序并覆盖含义
    pub fn insert(&mut self, name: impl Into<String>, meaning: CardMeaning) {
        let name = name.into();
        if !self.meanings.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.meanings.insert(name, meaning);
    }

    /// 牌组中的全部卡牌名称（按文件顺序，无重复）
    pub fn card_names(&self) -> &[String] {
        &self.names
    }

    pub fn meaning(&self, name: &str) -> Option<&CardMeaning> {
        self.meanings.get(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// 返回缺失的必需列
pub fn validate_columns(headers: &[String], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect()
}
