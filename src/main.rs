use clap::Parser;
use moderation_chat::config::LogFormat;
use moderation_chat::core::ConfigProvider;
use moderation_chat::utils::{logger, validation::Validate};
use moderation_chat::{
    ChatError, ChatSession, CliConfig, HttpModerationClient, Rejection, SubmitOutcome,
    TerminalDisplay, TomlConfig, Transcript,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

fn exit_with(e: &ChatError, code: i32) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(code);
}

fn load_provider(config: &CliConfig) -> Result<Box<dyn ConfigProvider>, ChatError> {
    match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let toml = TomlConfig::from_file(path)?;
            toml.validate()?;
            Ok(Box::new(toml))
        }
        None => {
            config.validate()?;
            Ok(Box::new(config.clone()))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    let provider = load_provider(&config).unwrap_or_else(|e| exit_with(&e, 1));
    let client = HttpModerationClient::from_config(provider.as_ref())
        .unwrap_or_else(|e| exit_with(&e, 1));
    tracing::info!("🚀 Connecting to moderation server at {}", client.base_url());

    let transcript = Transcript::with_sink(Arc::new(TerminalDisplay::stdout()));
    let mut session =
        ChatSession::with_poll_interval(Arc::new(client), transcript, provider.poll_interval());
    session.start();

    let exit_code = match config.message.as_deref() {
        Some(message) => {
            run_once(&session, message, Duration::from_secs(config.ready_timeout_secs)).await
        }
        None => {
            run_interactive(&session).await?;
            0
        }
    };

    session.shutdown().await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run_once(session: &ChatSession, message: &str, ready_timeout: Duration) -> i32 {
    if let Err(e) = session.wait_until_ready(ready_timeout).await {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        return 2;
    }

    match session.submit(message).await {
        SubmitOutcome::Completed(entry) if entry.is_error => 1,
        SubmitOutcome::Completed(_) => 0,
        SubmitOutcome::Rejected(reason) => {
            eprintln!("❌ Message was not sent ({:?})", reason);
            1
        }
    }
}

async fn run_interactive(session: &ChatSession) -> std::io::Result<()> {
    println!("Type a message and press Enter to moderate it. /quit exits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }

        session.set_draft(&line);
        match session.submit_draft().await {
            SubmitOutcome::Rejected(Rejection::NotReady) => {
                tracing::debug!("Server not ready, message dropped");
            }
            SubmitOutcome::Rejected(reason) => {
                tracing::debug!("Message dropped: {:?}", reason);
            }
            SubmitOutcome::Completed(_) => {}
        }
    }

    tracing::info!("👋 Leaving chat");
    Ok(())
}
