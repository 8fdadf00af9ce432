//! 命令行流程
//!
//! 加载牌组 → 构建模型 → 读取问题 → 抽牌解读 → 输出

use std::io::Read;

use tracing::{error, info};

use crate::application::output::ReadingOutput;
use crate::application::reader::TarotReader;
use crate::core::config::AppConfig;
use crate::core::deck::Deck;
use crate::errors::{Result, TarotError};
use crate::infrastructure::llm::build_model;

/// 执行一次完整的解读；出错时先输出提示再返回错误
pub async fn run<R: Read>(
    cfg: &AppConfig,
    input: R,
    output: &mut impl ReadingOutput,
) -> Result<()> {
    match execute(cfg, input, output).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("reading failed: {}", e);
            output.render_error(&e)?;
            Err(e)
        }
    }
}

async fn execute<R: Read>(
    cfg: &AppConfig,
    input: R,
    output: &mut impl ReadingOutput,
) -> Result<()> {
    cfg.validate()?;

    let deck = Deck::load(&cfg.deck)?;
    let model = build_model(cfg.qwen_settings());
    info!("using {} model", model.llm_type());
    let reader = TarotReader::new(deck, model);

    output.banner()?;
    let question = match &cfg.question {
        Some(q) => q.clone(),
        None => read_question(input)?,
    };

    let reading = reader.draw_and_analyze(cfg.cards, &question).await?;
    output.reveal_cards(&reading.cards)?;
    output.interpretation(&reading.interpretation)?;
    output.closing()
}

/// 从输入流读取问题，空白内容视为未输入
pub fn read_question<R: Read>(mut input: R) -> Result<String> {
    let mut question = String::new();
    input.read_to_string(&mut question)?;
    let question = question.trim();
    if question.is_empty() {
        return Err(TarotError::ValidationError(
            "为了获得更精确的解读，请输入您的问题或背景信息。".to_string(),
        ));
    }
    Ok(question.to_string())
}
