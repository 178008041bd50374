use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use hr_console_client::{ApiClient, ApiError, Config, MemoryToken, QueryParams, SessionStore, TokenSource, logging};

#[derive(Parser, Debug)]
#[command(name = "hr-console", version, about = "Command-line access to the HR console backend")]
struct Cli {
    /// Overrides HR_API_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// GET a path, optionally with query parameters.
    Get {
        path: String,
        #[arg(short = 'q', long = "param", value_parser = parse_pair)]
        params: Vec<(String, String)>,
    },
    Post { path: String, json: String },
    Put { path: String, json: String },
    Patch { path: String, json: String },
    Delete { path: String },
    /// Multipart upload.
    Upload {
        path: String,
        #[arg(long = "field", value_parser = parse_pair)]
        fields: Vec<(String, String)>,
        /// name=path of a local file
        #[arg(long = "file", value_parser = parse_pair)]
        files: Vec<(String, String)>,
        #[arg(long, default_value = "POST")]
        method: String,
    },
    /// Manage the saved session token.
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Print the public IP writes are tagged with.
    Ip,
}

#[derive(Subcommand, Debug)]
enum TokenAction {
    Set {
        token: String,
        #[arg(long)]
        user: Option<String>,
    },
    Clear,
    Show,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {}", raw))
}

/// Non-2xx write results exit with this code.
const EXIT_REJECTED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(base_url) = cli.base_url.clone() {
        config.api_base_url = base_url;
    }

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Logger already installed: {}", e);
    }
    log::debug!("API base URL: {}", config.api_base_url);

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let session = SessionStore::new(&config.session_path);
    let tokens: Arc<dyn TokenSource> = match &config.auth_token {
        Some(token) => Arc::new(MemoryToken::new(Some(token.clone()))),
        None => Arc::new(session.clone()),
    };
    let api = ApiClient::from_config(config, tokens)?;

    let envelope = match command {
        Command::Get { path, params } => {
            let params: QueryParams = params.into_iter().collect();
            let body = api.get_with_params(&path, &params).await?;
            print_json(&body)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Ip => {
            println!("{}", api.public_ip().await);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Post { path, json } => api.post(&path, &parse_json(&json)?).await?,
        Command::Put { path, json } => api.put(&path, &parse_json(&json)?).await?,
        Command::Patch { path, json } => api.patch(&path, &parse_json(&json)?).await?,
        Command::Delete { path } => api.delete(&path).await?,
        Command::Upload {
            path,
            fields,
            files,
            method,
        } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
            api.upload_with(method, &path, build_form(fields, files).await?).await?
        }
        Command::Token { action } => {
            token_command(action, &session, config)?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    print_json(&envelope)?;
    Ok(if envelope.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_REJECTED)
    })
}

fn token_command(action: TokenAction, session: &SessionStore, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TokenAction::Set { token, user } => {
            session.save(token, user)?;
            println!("Token saved to {}", session.path().display());
        }
        TokenAction::Clear => {
            session.clear()?;
            println!("Token cleared");
        }
        TokenAction::Show => {
            let saved = session.load()?;
            print_json(&serde_json::json!({
                "user": saved.user,
                "saved_at": saved.saved_at,
                "has_token": session.token().is_some(),
                "env_token": config.auth_token.is_some(),
            }))?;
        }
    }
    Ok(())
}

fn parse_json(raw: &str) -> Result<Value, ApiError> {
    serde_json::from_str(raw).map_err(|e| ApiError::Payload(format!("invalid JSON argument: {}", e)))
}

async fn build_form(fields: Vec<(String, String)>, files: Vec<(String, String)>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    for (name, path) in files {
        let path = PathBuf::from(path);
        let bytes = tokio::fs::read(&path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        form = form.part(name, Part::bytes(bytes).file_name(file_name));
    }
    Ok(form)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
