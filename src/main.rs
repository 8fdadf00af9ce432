use anyhow::Result;
use clap::Parser;
use qwen_tarot::{application::cli, logger, AppConfig, CliOutput};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cfg = AppConfig::parse();
    logger::init(&cfg.log_level);

    let mut output = CliOutput::new(std::io::stdout(), cfg.images_dir.clone());
    if cfg.question.is_none() {
        eprintln!("✍️ 请在这里输入您的问题或背景（Ctrl-D 结束）：");
    }
    cli::run(&cfg, std::io::stdin(), &mut output).await?;
    Ok(())
}
