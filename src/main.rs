use std::error::Error;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use adrenal_sdk::config::API_KEY_ENV;
use adrenal_sdk::{AdrenalClient, AdrenalError, PayloadEncoding, SdkConfig};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adrenal", version, about = "Adrenal AI command-line tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a webhook body against its X-Signature header value
    Verify {
        /// JSON body file, or `-` for stdin
        #[arg(long, default_value = "-")]
        payload: PathBuf,
        /// Hex signature from the X-Signature header
        #[arg(long, short)]
        signature: String,
        /// Webhook secret; defaults to ADRENAL_WEBHOOK_SECRET
        #[arg(long)]
        secret: Option<String>,
        /// Hash the body without whitespace, as JavaScript signers do
        #[arg(long)]
        compact: bool,
    },
    /// Chat with a published chatbot, one message per line on stdin
    Chat {
        publish_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Verify {
            payload,
            signature,
            secret,
            compact,
        } => verify(&payload, &signature, secret, compact),
        Command::Chat { publish_id } => match chat(&publish_id).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("chat failed: {e}");
                ExitCode::from(2)
            }
        },
    }
}

fn verify(payload: &Path, signature: &str, secret: Option<String>, compact: bool) -> ExitCode {
    let result = read_payload(payload).and_then(|body| {
        let encoding = if compact {
            PayloadEncoding::Compact
        } else {
            PayloadEncoding::Spaced
        };
        let config = SdkConfig::default().with_payload_encoding(encoding);
        Ok(check_signature(&body, signature, secret.as_deref(), config)?)
    });

    match &result {
        Ok(true) => println!("valid"),
        Ok(false) => println!("invalid"),
        Err(e) => error!("{e}"),
    }
    ExitCode::from(exit_status(&result))
}

fn check_signature(
    body: &Value,
    signature: &str,
    secret: Option<&str>,
    config: SdkConfig,
) -> Result<bool, AdrenalError> {
    let client = AdrenalClient::with_config(api_key(), config)?;
    Ok(client.verify_webhook(body, signature, secret.map(str::as_bytes))?)
}

/// 0 valid, 1 invalid, 2 unreadable payload or missing secret.
fn exit_status<E>(result: &Result<bool, E>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn read_payload(path: &Path) -> Result<Value, Box<dyn Error>> {
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;
        raw
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn api_key() -> String {
    std::env::var(API_KEY_ENV).unwrap_or_default()
}

async fn chat(publish_id: &str) -> Result<(), Box<dyn Error>> {
    let client = AdrenalClient::with_config(api_key(), SdkConfig::from_env()?)?;
    let mut session = client.chatbot(publish_id).start_session().await?;

    if !session.chatbot().live {
        return Err(AdrenalError::ChatbotNotLive.into());
    }
    for message in session.messages() {
        println!("{}", message.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let mut out = ReplyWriter::new(io::stdout());
        {
            let reply = session.send(&line, |delta| out.write(delta));

            tokio::select! {
                result = reply => match result {
                    Ok(_) => println!(),
                    Err(e) => error!("{e}"),
                },
                _ = signal::ctrl_c() => {
                    println!();
                    info!("reply stopped");
                }
            }
        }

        if let Some(e) = out.error {
            return Err(format!("could not write reply: {e}").into());
        }
    }

    Ok(())
}

/// Writes reply fragments as they arrive. Stops at the first failed write.
struct ReplyWriter<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> ReplyWriter<W> {
    fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn write(&mut self, delta: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self
            .out
            .write_all(delta.as_bytes())
            .and_then(|()| self.out.flush())
        {
            self.error = Some(e);
        }
    }
}
