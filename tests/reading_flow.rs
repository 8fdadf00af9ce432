//! 解读流程测试

mod common;

use std::sync::Arc;

use common::{sample_deck, setup, write_deck, RecordingModel, SAMPLE_CSV};
use qwen_tarot::{
    CliOutput, Deck, DrawnCard, ReadingOutput, ReadingRequest, Role, TarotError, TarotReader,
    WithFallback,
};

#[tokio::test]
async fn test_analyze_sends_system_and_human_messages() {
    setup();
    let model = Arc::new(RecordingModel::answering("愚者邀请你踏上旅程"));
    let reader = TarotReader::new(sample_deck(), model.clone());

    let reading = reader
        .analyze(ReadingRequest {
            cards: vec![DrawnCard::reversed("00-thefool.jpg")],
            context: "  我该换工作吗？ ".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(reading.interpretation, "愚者邀请你踏上旅程");
    assert_eq!(
        reading.prompt.card_details,
        "**00-thefool.jpg** (逆位): recklessness"
    );

    let calls = model.calls();
    assert_eq!(calls.len(), 1);
    let messages = &calls[0];
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert!(messages[0].content.contains("神秘的塔罗牌解读师"));
    assert!(messages[0].content.contains("**00-thefool.jpg**: the cliff edge"));
    assert_eq!(messages[1].role, Role::Human);
    assert_eq!(messages[1].content, "我该换工作吗？");
}

#[tokio::test]
async fn test_model_error_propagates_without_fallback() {
    let reader = TarotReader::new(sample_deck(), Arc::new(RecordingModel::failing("boom")));
    let err = reader
        .analyze(ReadingRequest {
            cards: vec![DrawnCard::upright("00-thefool.jpg")],
            context: "问题".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TarotError::LlmError(_)));
}

#[tokio::test]
async fn test_model_error_with_fallback_still_reads() {
    let primary = Arc::new(RecordingModel::failing("boom"));
    let reader = TarotReader::new(sample_deck(), Arc::new(WithFallback::new(primary)));
    let reading = reader
        .analyze(ReadingRequest {
            cards: vec![DrawnCard::upright("00-thefool.jpg")],
            context: "问题".to_string(),
        })
        .await
        .unwrap();
    assert!(reading.interpretation.contains("boom"));
}

#[tokio::test]
async fn test_draw_and_analyze_full_spread() {
    let file = write_deck(SAMPLE_CSV.as_bytes());
    let deck = Deck::load(file.path()).unwrap();
    let model = Arc::new(RecordingModel::answering("七张牌的全景"));
    let reader = TarotReader::new(deck, model.clone());

    let reading = reader.draw_and_analyze(7, "未来一年").await.unwrap();
    assert_eq!(reading.cards.len(), 7);
    assert_eq!(reading.prompt.card_details.lines().count(), 7);
    assert!(!reading.prompt.card_details.contains("含义待解读"));

    let mut output = CliOutput::new(Vec::new(), "images");
    output.reveal_cards(&reading.cards).unwrap();
    output.interpretation(&reading.interpretation).unwrap();
    output.closing().unwrap();
    let text = String::from_utf8(output.into_inner()).unwrap();
    assert!(text.contains("七张牌的全景"));
    assert_eq!(text.matches("未找到图片").count(), 7);
}
