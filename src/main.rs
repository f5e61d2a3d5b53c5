//! # sentiment-scale
//!
//! Serves a 7-point sentiment classifier over HTTP, or scores texts from the
//! command line.
//!
//! Configuration comes from `SENTIMENT_*` environment variables (a `.env`
//! file is honoured); command-line flags override them.

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use sentiment_scale::core::ModelConfig;
use sentiment_scale::pipelines::sentiment_analysis_pipeline::{
    sentiment_scale, SentimentAnalysisPipelineBuilder,
};
use sentiment_scale::pipelines::utils::DeviceRequest;
use sentiment_scale::{server, ServiceConfig};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Texts scored by `analyze` when none are given.
const SAMPLE_TEXTS: [&str; 3] = [
    "This movie was absolutely phenomenal! Best film of the decade!",
    "It was okay, nothing special.",
    "Terrible movie. Complete waste of time.",
];

/// Model flags shared by `serve` and `analyze`.
#[derive(Debug, Clone)]
struct ModelArgs {
    model: Option<String>,
    revision: Option<String>,
    device: Option<DeviceRequest>,
    max_length: Option<usize>,
    strict_head: bool,
}

impl ModelArgs {
    /// Layers the flags over the environment-derived config.
    fn apply(self, mut config: ModelConfig) -> ModelConfig {
        if let Some(model) = self.model {
            config.model_id = model;
        }
        if let Some(revision) = self.revision {
            config.revision = revision;
        }
        if let Some(device) = self.device {
            config.device = device;
        }
        if let Some(max_length) = self.max_length {
            config.max_length = max_length;
        }
        if self.strict_head {
            config.allow_untrained_head = false;
        }
        config
    }
}

#[derive(Debug, Clone)]
enum Cmd {
    /// Load the model and serve HTTP
    Serve {
        host: Option<String>,
        port: Option<u16>,
        model: ModelArgs,
    },
    /// Score texts and print the results
    Analyze { model: ModelArgs, texts: Vec<String> },
    /// Print the sentiment scale
    Scale,
}

fn model_args() -> impl Parser<ModelArgs> {
    let model = long("model")
        .help("Hugging Face model id")
        .argument::<String>("ID")
        .optional();
    let revision = long("revision")
        .help("Branch, tag or commit of the model repo")
        .argument::<String>("REV")
        .optional();
    let device = long("device")
        .help("auto, cpu or cuda:N")
        .argument::<String>("DEVICE")
        .parse(|s| s.parse::<DeviceRequest>())
        .optional();
    let max_length = long("max-length")
        .help("Truncate inputs to this many tokens")
        .argument::<usize>("N")
        .guard(|n| *n > 0, "--max-length must be at least 1")
        .optional();
    let strict_head = long("strict-head")
        .help("Refuse checkpoints without a trained 7-way head")
        .switch();
    construct!(ModelArgs {
        model,
        revision,
        device,
        max_length,
        strict_head
    })
}

fn options() -> Cmd {
    let host = long("host")
        .help("Address to bind")
        .argument::<String>("HOST")
        .optional();
    let port = long("port")
        .help("Port to bind")
        .argument::<u16>("PORT")
        .optional();
    let model = model_args();
    let serve = construct!(Cmd::Serve { host, port, model })
        .to_options()
        .command("serve")
        .help("Load the model and serve the HTTP API");

    let model = model_args();
    let texts = positional::<String>("TEXT")
        .help("Texts to analyze")
        .many();
    let analyze = construct!(Cmd::Analyze { model, texts })
        .to_options()
        .command("analyze")
        .help("Analyze texts from the command line");

    let scale = pure(Cmd::Scale)
        .to_options()
        .command("scale")
        .help("Print the 7-point sentiment scale");

    construct!([serve, analyze, scale])
        .to_options()
        .descr("Multi-scale sentiment analysis")
        .run()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = ServiceConfig::from_env();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(config.log_level);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Serve { host, port, model } => {
            let mut config = config;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let model_config = model.apply(config.model.clone());

            let state = server::load_state(model_config).await;
            let address = config.bind_address();
            let listener = tokio::net::TcpListener::bind(&address)
                .await
                .with_context(|| format!("Failed to bind {address}"))?;
            server::serve(listener, state)
                .await
                .context("HTTP server failed")?;
        }
        Cmd::Analyze { model, texts } => {
            let model_config = model.apply(config.model);
            let pipeline = SentimentAnalysisPipelineBuilder::new(model_config)
                .build()
                .await
                .context("Failed to load sentiment model")?;

            let texts = if texts.is_empty() {
                SAMPLE_TEXTS.iter().map(|t| t.to_string()).collect()
            } else {
                texts
            };

            let rule = "-".repeat(80);
            for text in &texts {
                let result = pipeline
                    .analyze(text)
                    .with_context(|| format!("Failed to analyze `{text}`"))?;
                println!("Text: {}", result.text);
                println!("Score: {:+}/3", result.sentiment_score);
                println!("Label: {} {}", result.sentiment_label, result.emoji);
                println!("Confidence: {:.1}%", result.confidence * 100.0);
                println!("{rule}");
            }
        }
        Cmd::Scale => {
            for (score, entry) in sentiment_scale() {
                println!("{score:+} {} {}", entry.emoji, entry.label);
            }
        }
    }

    Ok(())
}
