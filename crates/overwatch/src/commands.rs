//! Overwatch command implementations

use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use overwatch_agent::{AgentSettings, Orchestrator};
use overwatch_config::{self, Config, ToolHostKind, TranscriptKind};
use overwatch_provider::{Completer, OpenRouterProvider};
use overwatch_toolhost::ToolProvider;
use overwatch_transcript::{FileTranscript, MemoryTranscript, TranscriptStore};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Open the transcript store the config selects
async fn open_transcript(config: &Config) -> Result<Arc<dyn TranscriptStore>> {
    Ok(match config.transcript.kind {
        TranscriptKind::Memory => Arc::new(MemoryTranscript::new()),
        TranscriptKind::File => {
            let path = config.transcript_path();
            let store = FileTranscript::open(&path)
                .await
                .with_context(|| format!("Cannot open transcript at {}", path.display()))?;
            Arc::new(store)
        }
    })
}

fn build_completer(config: &Config) -> Completer {
    let provider = OpenRouterProvider::new(
        config.api_key().unwrap_or_default(),
        Some(config.provider.api_base.clone()),
        Some(config.agent.model.clone()),
    )
    .with_timeout(Duration::from_secs(config.provider.timeout_secs));

    Completer::new(Arc::new(provider))
        .with_sampling(config.agent.max_tokens, config.agent.temperature)
}

async fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let transcript = open_transcript(config).await?;
    let tools = overwatch_toolhost::from_config(config);

    Ok(Orchestrator::new(
        build_completer(config),
        tools,
        transcript,
        AgentSettings::from(&config.agent),
    ))
}

/// Initialize config and workspace
pub async fn init_command() -> Result<()> {
    println!("◆ Initializing Overwatch...");
    println!("{}", RULE);

    let config = overwatch_config::init().await?;

    if let Some(parent) = config.transcript_path().parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    println!("Config:    {}", overwatch_config::config_path().display());
    println!("Workspace: {}", config.workspace_path().display());
    println!("\n◆ Overwatch initialized");
    println!("\nNext steps:");
    println!(
        "  1. Add your API key to {} or export {}",
        overwatch_config::config_path().display(),
        overwatch_config::API_KEY_ENV
    );
    println!("     Get one at: https://openrouter.ai/keys");
    println!("  2. Start chatting: overwatch engage -m \"Hello!\"");

    Ok(())
}

/// Chat with the operative
pub async fn engage_command(message: Option<String>) -> Result<()> {
    let config = Config::load().await?;
    if !config.has_api_key() {
        warn!("◆ NO API KEY, REPLIES WILL BE PLACEHOLDERS");
    }

    let agent = build_orchestrator(&config).await?;

    let result = match message {
        Some(msg) => engage_once(&agent, &msg).await,
        None => engage_interactive(&agent).await,
    };

    agent.shutdown().await;
    result
}

async fn engage_once(agent: &Orchestrator, message: &str) -> Result<()> {
    let answer = agent.run_turn(message).await?;
    println!("\n◆ {}", answer);
    Ok(())
}

async fn engage_interactive(agent: &Orchestrator) -> Result<()> {
    println!("◆ Interactive mode (type 'exit' to quit)");
    println!("{}", RULE);

    loop {
        print!("◆ ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        match agent.run_turn(input).await {
            Ok(answer) => println!("\n◆ {}\n", answer),
            Err(e) => println!("\n✗ {}\n", e),
        }
    }

    Ok(())
}

/// Print the conversation transcript
pub async fn history_command() -> Result<()> {
    let config = Config::load().await?;
    let transcript = open_transcript(&config).await?;
    let messages = transcript.list_all().await?;

    if messages.is_empty() {
        println!("No messages");
        return Ok(());
    }

    for m in messages {
        let step = m
            .agent_step
            .map(|s| format!("/{}", s))
            .unwrap_or_default();
        println!(
            "#{} [{}] {}{}: {}",
            m.id,
            m.timestamp.format("%Y-%m-%d %H:%M:%S"),
            m.role,
            step,
            m.content
        );
    }

    Ok(())
}

/// Erase the conversation transcript
pub async fn clear_command() -> Result<()> {
    let config = Config::load().await?;
    let transcript = open_transcript(&config).await?;
    transcript.clear_all().await?;
    info!("◆ TRANSCRIPT CLEARED");
    println!("✓ Transcript cleared");
    Ok(())
}

/// List tools offered by the tool host
pub async fn tools_command() -> Result<()> {
    let config = Config::load().await?;
    let host = overwatch_toolhost::from_config(&config);

    let listed = async {
        host.connect().await?;
        host.list_tools().await
    }
    .await;
    if let Err(e) = host.close().await {
        warn!("◆ TOOL HOST CLOSE FAILED: {}", e);
    }
    let tools = listed.context("Tool host unavailable")?;

    if tools.is_empty() {
        println!("No tools available");
    } else {
        println!("Available tools:");
        for tool in tools {
            println!("  {} - {}", tool.name, tool.description);
        }
    }

    Ok(())
}

/// Show system status
pub async fn status_command() -> Result<()> {
    let config_path = overwatch_config::config_path();

    println!("◆ Overwatch System Status");
    println!("{}", RULE);

    println!(
        "Config:     {} {}",
        config_path.display(),
        if config_path.exists() {
            "[OK]"
        } else {
            "[Missing]"
        }
    );

    let config = Config::load().await?;
    let workspace = config.workspace_path();
    println!(
        "Workspace:  {} {}",
        workspace.display(),
        if workspace.exists() {
            "[OK]"
        } else {
            "[Missing]"
        }
    );
    println!("Model:      {}", config.agent.model);
    println!("Reviewer:   {}", config.agent.reviewer_model);
    println!(
        "API Key:    {}",
        if config.has_api_key() {
            "[Set]"
        } else {
            "[Missing]"
        }
    );
    match config.toolhost.kind {
        ToolHostKind::Mcp => println!(
            "Tool host:  mcp ({} {})",
            config.toolhost.command,
            config.toolhost.args.join(" ")
        ),
        ToolHostKind::Local => println!("Tool host:  local"),
    }
    match config.transcript.kind {
        TranscriptKind::Memory => println!("Transcript: memory"),
        TranscriptKind::File => {
            println!("Transcript: {}", config.transcript_path().display())
        }
    }
    println!("Window:     {} messages", config.agent.context_window);

    println!("\n◆ Ready");

    Ok(())
}
