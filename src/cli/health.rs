use crate::cli::HealthArgs;
use crate::provider::{CompletionGateway, OpenAiGateway};
use chrono::Utc;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

const PING_TIMEOUT: Duration = Duration::from_secs(5);
const PING_MAX_TOKENS: u32 = 5;

pub async fn execute(args: HealthArgs) -> anyhow::Result<()> {
    let config = args.config.load()?;
    config.validate()?;
    let registry = config.registry()?;
    let key_configured = args.config.has_api_key();

    let (status, error) = if args.offline {
        ("skipped", None)
    } else if !key_configured {
        ("not_configured", None)
    } else {
        match ping(&config, args.config.api_key.as_deref()).await {
            Ok(()) => ("ok", None),
            Err(e) => {
                warn!("Health ping failed: {}", e);
                ("error", Some(e))
            }
        }
    };

    let report = json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "model": config.model,
        "personalities": registry.len(),
        "openai": {
            "keyConfigured": key_configured,
            "status": status,
            "error": error,
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if status == "error" {
        std::process::exit(1);
    }
    Ok(())
}

async fn ping(config: &crate::config::Config, api_key: Option<&str>) -> Result<(), String> {
    let gateway = OpenAiGateway::from_config(config, api_key)
        .map_err(|e| e.to_string())?
        .probe(PING_TIMEOUT, PING_MAX_TOKENS);

    let completion = gateway
        .complete("", "test")
        .await
        .map_err(|e| e.to_string())?;
    info!(
        "Health ping answered by {} in {:?}",
        completion.model, completion.duration
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::provider::stub_server::{StubReply, StubServer, CHAT_OK};

    fn config(server: &StubServer) -> Config {
        Config {
            api_base: server.base.clone(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_ping_sends_single_user_message() {
        let server = StubServer::start(vec![StubReply::Respond(200, CHAT_OK)]).await;
        ping(&config(&server), Some("sk-test")).await.unwrap();

        let sent: serde_json::Value = serde_json::from_str(&server.bodies()[0]).unwrap();
        let messages = sent["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "test");
        assert_eq!(sent["max_tokens"], PING_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_ping_makes_one_attempt() {
        let server = StubServer::start(vec![StubReply::Respond(503, "Service Unavailable")]).await;
        let err = ping(&config(&server), Some("sk-test")).await.unwrap_err();

        assert!(err.contains("503"));
        assert_eq!(server.connections(), 1);
    }
}
