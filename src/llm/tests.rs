use std::time::Duration;

use super::backend::{TextGenerator, build_generator, non_empty, with_timeout};
use super::config::{LlmConfig, ProviderKind};
use super::error::LlmError;
use super::mistral::first_choice_text;
use super::mock::MockGenerator;

fn config_for(provider: &str) -> LlmConfig {
    LlmConfig {
        provider: provider.to_string(),
        ..LlmConfig::default()
    }
}

#[test]
fn test_provider_kind_parses_case_insensitively() {
    assert_eq!("local".parse::<ProviderKind>().unwrap(), ProviderKind::Local);
    assert_eq!(" OpenAI ".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
    assert_eq!("Mistral".parse::<ProviderKind>().unwrap(), ProviderKind::Mistral);
    assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
    assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
}

#[test]
fn test_unknown_provider_fails_at_construction() {
    let err = build_generator(&config_for("claude-local")).err().unwrap();

    assert!(matches!(err, LlmError::UnknownProvider { ref value } if value == "claude-local"));
    assert!(err.to_string().contains("local, openai, mistral, gemini"));
}

#[test]
fn test_hosted_provider_requires_key() {
    let err = build_generator(&config_for("openai")).err().unwrap();
    assert!(matches!(
        err,
        LlmError::MissingCredential {
            provider: "openai",
            var: "CLAIMCHECK_OPENAI_API_KEY"
        }
    ));

    let config = LlmConfig {
        mistral_api_key: Some("   ".to_string()),
        ..config_for("mistral")
    };
    assert!(matches!(
        build_generator(&config).err().unwrap(),
        LlmError::MissingCredential { provider: "mistral", .. }
    ));
}

#[tokio::test]
async fn test_build_generator_selects_backend() {
    let local = build_generator(&LlmConfig::default()).unwrap();
    assert_eq!(local.name(), "local");

    let gemini = build_generator(&config_for("gemini").with_api_key("g-key")).unwrap();
    assert_eq!(gemini.name(), "gemini");

    let openai = build_generator(&config_for("openai").with_api_key("sk-test")).unwrap();
    assert_eq!(openai.name(), "openai");

    let mistral = build_generator(&config_for("mistral").with_api_key("m-key")).unwrap();
    assert_eq!(mistral.name(), "mistral");
}

#[test]
fn test_api_key_override_targets_selected_provider() {
    let config = config_for("gemini").with_api_key("override");
    assert_eq!(config.gemini_api_key.as_deref(), Some("override"));
    assert_eq!(config.openai_api_key, None);

    let config = LlmConfig::default().with_api_key("ignored");
    assert_eq!(config.openai_api_key, None);
    assert_eq!(config.mistral_api_key, None);
    assert_eq!(config.gemini_api_key, None);
}

#[test]
fn test_defaults_match_generation_settings() {
    let config = LlmConfig::default();
    assert_eq!(config.provider, "local");
    assert_eq!(config.temperature, 0.2);
    assert_eq!(config.max_tokens, 2000);
    assert_eq!(config.timeout, Duration::from_secs(120));
    assert_eq!(config.local_model, "heavy");
}

#[test]
fn test_non_empty_rejects_blank_replies() {
    assert_eq!(non_empty("x", Some("  hi \n".to_string())).unwrap(), "hi");
    assert!(matches!(
        non_empty("x", Some("   ".to_string())),
        Err(LlmError::EmptyResponse { provider: "x" })
    ));
    assert!(non_empty("x", None).is_err());
}

#[test]
fn test_first_choice_text_reads_completion() {
    let completion = serde_json::from_value(serde_json::json!({
        "id": "cmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "mistral-large-latest",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "{\"ok\": true}"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
    .unwrap();

    assert_eq!(first_choice_text(completion).unwrap(), "{\"ok\": true}");
}

#[test]
fn test_first_choice_text_accepts_mistral_finish_reasons() {
    let completion = serde_json::from_value(serde_json::json!({
        "id": "a1b2",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "mistral-small-latest",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "partial", "tool_calls": null, "prefix": false},
            "finish_reason": "model_length"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 2000, "total_tokens": 2010}
    }))
    .unwrap();

    assert_eq!(first_choice_text(completion).unwrap(), "partial");

    let empty = serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
    assert!(matches!(
        first_choice_text(empty),
        Err(LlmError::EmptyResponse { provider: "mistral" })
    ));
}

#[tokio::test]
async fn test_with_timeout_maps_expiry() {
    let err = with_timeout("slow", Duration::from_millis(10), async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, LlmError>(())
    })
    .await
    .unwrap_err();

    assert!(matches!(err, LlmError::Timeout { provider: "slow", .. }));
}

#[tokio::test]
async fn test_mock_generator_serves_script_then_repeats() {
    let generator = MockGenerator::with_replies(vec!["one".to_string(), "two".to_string()]);

    assert_eq!(generator.generate("s", "u1").await.unwrap(), "one");
    assert_eq!(generator.generate("s", "u2").await.unwrap(), "two");
    assert_eq!(generator.generate("s", "u3").await.unwrap(), "two");
    assert_eq!(generator.call_count(), 3);
    assert_eq!(generator.prompts()[0], ("s".to_string(), "u1".to_string()));

    generator.set_fail(true);
    assert!(generator.generate("s", "u4").await.is_err());
}
