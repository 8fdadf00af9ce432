//! 抽牌

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::REVERSE_PROBABILITY;
use crate::errors::{Result, TarotError};

/// 抽出的卡牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub name: String,
    #[serde(default)]
    pub is_reversed: bool,
}

impl DrawnCard {
    pub fn upright(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_reversed: false,
        }
    }

    pub fn reversed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_reversed: true,
        }
    }

    /// 正位 / 逆位
    pub fn orientation_label(&self) -> &'static str {
        if self.is_reversed {
            "逆位"
        } else {
            "正位"
        }
    }

    /// 展示用标题，逆位追加 (R)
    pub fn caption(&self) -> String {
        if self.is_reversed {
            format!("{} (R)", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// 不放回地抽取 `num_cards` 张牌，每张独立以 `reverse_probability` 的概率逆位
pub fn draw_cards<R: Rng + ?Sized>(
    num_cards: usize,
    available: &[String],
    reverse_probability: f64,
    rng: &mut R,
) -> Result<Vec<DrawnCard>> {
    if num_cards > available.len() {
        return Err(TarotError::ValidationError(format!(
            "请求的牌数({})超过了可用牌数({})",
            num_cards,
            available.len()
        )));
    }
    if !(0.0..=1.0).contains(&reverse_probability) {
        return Err(TarotError::ValidationError(format!(
            "逆位概率必须位于 [0, 1] 区间，当前为 {}",
            reverse_probability
        )));
    }

    let selected: Vec<String> = available
        .choose_multiple(rng, num_cards)
        .cloned()
        .collect();

    Ok(selected
        .into_iter()
        .map(|name| DrawnCard {
            name,
            is_reversed: rng.gen_bool(reverse_probability),
        })
        .collect())
}

/// 使用线程随机数与默认逆位概率抽牌
pub fn random_draw(num_cards: usize, available: &[String]) -> Result<Vec<DrawnCard>> {
    draw_cards(
        num_cards,
        available,
        REVERSE_PROBABILITY,
        &mut rand::thread_rng(),
    )
}

/// 牌名即图片文件名
pub fn card_image_path(images_dir: impl AsRef<Path>, card_name: &str) -> PathBuf {
    images_dir.as_ref().join(card_name)
}

/// 移除空格与连字符并转小写，生成图片文件名
pub fn format_card_image_name(card_name: &str) -> String {
    let formatted: String = card_name
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();
    format!("{}.jpg", formatted)
}
