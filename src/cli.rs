use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::audit_mode::DEFAULT_AUDIT_MODE;
use crate::config_loader::{load_config, ServiceConfig};
use crate::evaluator::{EvaluationRequest, Evaluator};
use crate::generator::GeminiClient;

/// Top-level CLI interface for GEN-SCORE
#[derive(Parser)]
#[command(
    name = "genscore",
    version,
    about = "Score AI responses with a model self-audit and an allow/review/block decision"
)]
pub struct Cli {
    /// Path to a TOML config file (defaults to genscore.toml or $GENSCORE_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (/, /healthz, /test-gemini, /evaluate)
    Serve {
        /// Host/IP to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
    },

    /// Evaluate a single prompt/response pair and print the scored result
    Evaluate {
        #[arg(short, long)]
        prompt: String,
        #[arg(short, long)]
        response: String,
        #[arg(short, long, default_value = DEFAULT_AUDIT_MODE)]
        mode: String,
    },

    /// List models available to the configured key that support generateContent
    Models,

    /// Send a fixed probe prompt to the configured model
    Ping,
}

fn build_client(config: &ServiceConfig) -> anyhow::Result<GeminiClient> {
    GeminiClient::from_config(config).context("failed to build model client")
}

fn build_evaluator(config: &ServiceConfig) -> anyhow::Result<Evaluator> {
    let client = build_client(config)?;
    Ok(Evaluator::new(
        Arc::new(client),
        Duration::from_secs(config.request_timeout_secs),
    ))
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli.config.as_deref()).context("configuration is invalid")?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Commands::Evaluate {
            prompt,
            response,
            mode,
        } => {
            let evaluator = build_evaluator(&config)?;
            let req = EvaluationRequest::new(prompt, response).with_mode(mode);
            let result = evaluator.evaluate(&req).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::Models => {
            let client = build_client(&config)?;
            let models = client.list_models().await.context("listing models failed")?;
            if models.is_empty() {
                println!("No models support generateContent for this key.");
            }
            for model in models {
                match model.display_name {
                    Some(display) => println!("{}\t{}", model.name, display),
                    None => println!("{}", model.name),
                }
            }
            Ok(())
        }
        Commands::Ping => {
            let evaluator = build_evaluator(&config)?;
            let reply = evaluator.ping().await.context("model ping failed")?;
            println!("{}", reply.trim());
            Ok(())
        }
    }
}

async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    let evaluator = Arc::new(build_evaluator(&config)?);
    let app = crate::web::build_router(evaluator, config.cors_permissive);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, model = %config.model, "GEN-SCORE listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_defaults_to_factual_mode() {
        let cli = Cli::try_parse_from(["genscore", "evaluate", "-p", "q", "-r", "a"]).unwrap();
        match cli.command {
            Commands::Evaluate { mode, .. } => assert_eq!(mode, DEFAULT_AUDIT_MODE),
            _ => panic!("expected evaluate"),
        }
    }

    #[test]
    fn serve_accepts_overrides_and_global_config() {
        let cli = Cli::try_parse_from([
            "genscore", "serve", "--port", "9001", "--config", "alt.toml",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("alt.toml"));
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert_eq!(port, Some(9001));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
