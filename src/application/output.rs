//! 输出抽象层
//!
//! 将抽牌结果与解读内容写到标准输出，错误提示写到标准错误

use std::io::Write;
use std::path::PathBuf;

use crate::core::config::TarotSettings;
use crate::core::draw::{card_image_path, DrawnCard};
use crate::errors::{describe, Result, TarotError};

pub const TITLE: &str = "🔮 交互式塔罗牌解读";
pub const CLOSING: &str = "请记住，卡牌提供洞察和反思；您的未来掌握在自己手中。";
const RULE: &str = "---";

/// 输出 trait
pub trait ReadingOutput {
    /// 欢迎信息
    fn banner(&mut self) -> Result<()>;

    /// 展示抽出的卡牌
    fn reveal_cards(&mut self, cards: &[DrawnCard]) -> Result<()>;

    /// 展示解读结果
    fn interpretation(&mut self, text: &str) -> Result<()>;

    /// 展示错误及处理建议
    fn render_error(&mut self, err: &TarotError) -> Result<()>;

    /// 结束语
    fn closing(&mut self) -> Result<()>;
}

/// CLI 输出实现
pub struct CliOutput<W: Write, E: Write = std::io::Stderr> {
    out: W,
    err: E,
    images_dir: PathBuf,
}

impl<W: Write> CliOutput<W> {
    /// 错误提示写到标准错误
    pub fn new(out: W, images_dir: impl Into<PathBuf>) -> Self {
        Self::with_error_writer(out, std::io::stderr(), images_dir)
    }
}

impl<W: Write, E: Write> CliOutput<W, E> {
    pub fn with_error_writer(out: W, err: E, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            out,
            err,
            images_dir: images_dir.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn into_parts(self) -> (W, E) {
        (self.out, self.err)
    }
}

impl<W: Write, E: Write> ReadingOutput for CliOutput<W, E> {
    fn banner(&mut self) -> Result<()> {
        writeln!(self.out, "{}", TITLE)?;
        writeln!(self.out, "欢迎来到您的个性化塔罗牌咨询！")?;
        writeln!(self.out, "{}", RULE)?;
        Ok(())
    }

    fn reveal_cards(&mut self, cards: &[DrawnCard]) -> Result<()> {
        writeln!(self.out, "✨ 您的卡牌已揭晓：")?;
        writeln!(self.out, "{}", RULE)?;
        for card in cards {
            let path = card_image_path(&self.images_dir, &card.name);
            if !TarotSettings::is_supported_image(&card.name) {
                writeln!(
                    self.out,
                    "符号：{} (不支持的图片格式 {})",
                    card.caption(),
                    path.display()
                )?;
            } else if path.is_file() {
                writeln!(self.out, "🃏 {} [{}]", card.caption(), path.display())?;
            } else {
                writeln!(
                    self.out,
                    "符号：{} (在 {} 未找到图片)",
                    card.caption(),
                    path.display()
                )?;
            }
        }
        writeln!(self.out, "{}", RULE)?;
        Ok(())
    }

    fn interpretation(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "📜 解读结果：")?;
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn render_error(&mut self, err: &TarotError) -> Result<()> {
        let hint = describe(err);
        writeln!(self.err, "{}", hint.headline)?;
        writeln!(self.err, "{}", hint.hint)?;
        self.err.flush()?;
        Ok(())
    }

    fn closing(&mut self) -> Result<()> {
        writeln!(self.out, "{}", RULE)?;
        writeln!(self.out, "{}", CLOSING)?;
        self.out.flush()?;
        Ok(())
    }
}
