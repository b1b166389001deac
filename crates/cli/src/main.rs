//! Spot Queue CLI - Command-line interface for the queue daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9530";

#[derive(Parser)]
#[command(name = "spotq")]
#[command(about = "Spot Queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "SPOTQUEUE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a queue token for a service
    Issue {
        /// Registered user email
        #[arg(short, long)]
        email: String,

        /// Service name
        #[arg(short, long)]
        service: String,

        /// Current latitude
        #[arg(long)]
        lat: f64,

        /// Current longitude
        #[arg(long)]
        lon: f64,
    },

    /// Refresh a user's location and ETA
    UpdateLocation {
        /// User ID
        user_id: i64,

        /// Current latitude
        #[arg(long)]
        lat: f64,

        /// Current longitude
        #[arg(long)]
        lon: f64,
    },

    /// Mark a user as served and select the next person
    NextPerson {
        /// User ID being served
        user_id: i64,
    },

    /// Register a new user
    Register {
        /// Full name
        #[arg(short, long)]
        name: String,

        /// Email address (must be unique)
        #[arg(short, long)]
        email: String,
    },

    /// Create a service
    AddService {
        /// Service name (must be unique)
        #[arg(short, long)]
        name: String,

        /// Opening time (HH:MM)
        #[arg(long, default_value = "")]
        entry_time: String,

        /// Closing time (HH:MM)
        #[arg(long, default_value = "")]
        end_time: String,

        /// Planned number of counters
        #[arg(short, long, default_value = "1")]
        counters: i64,
    },

    /// Create a counter for a service
    AddCounter {
        /// Counter number within the service
        #[arg(short, long)]
        number: i64,

        /// Service name
        #[arg(short, long)]
        service: String,
    },

    /// List registered users
    Users,

    /// List services
    Services,

    /// List counters
    Counters,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct TokenRow {
    token_number: i64,
    user_id: i64,
    queue_position: i64,
    distance: f64,
    duration: i64,
    reach_out: bool,
    work_status: String,
}

#[derive(Deserialize, Tabled)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
}

#[derive(Deserialize, Tabled)]
struct ServiceRow {
    id: i64,
    service_name: String,
    service_entry_time: String,
    service_end_time: String,
    number_of_counters: i64,
}

#[derive(Deserialize, Tabled)]
struct CounterRow {
    id: i64,
    counter_number: i64,
    service_id: i64,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn print_token(result: serde_json::Value) -> Result<()> {
    let token: TokenRow = serde_json::from_value(result)?;
    let table = Table::new(vec![token]).to_string();
    println!("{}", table);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Issue {
            email,
            service,
            lat,
            lon,
        } => {
            let params = json!({
                "email": email,
                "service_name": service,
                "latitude": lat,
                "longitude": lon,
            });

            let result = call_rpc(&cli.rpc_url, "queue.issueToken.v1", params).await?;

            println!("{}", "✓ Token issued".green().bold());
            println!();
            print_token(result)?;
        }

        Commands::UpdateLocation { user_id, lat, lon } => {
            let params = json!({
                "user_id": user_id,
                "latitude": lat,
                "longitude": lon,
            });

            let result = call_rpc(&cli.rpc_url, "queue.updateLocation.v1", params).await?;

            println!("{}", "✓ Location updated".green().bold());
            println!();
            print_token(result)?;
        }

        Commands::NextPerson { user_id } => {
            let params = json!({ "user_id": user_id });

            let result = call_rpc(&cli.rpc_url, "counter.nextPerson.v1", params).await?;

            if let Some(message) = result.get("message").and_then(|v| v.as_str()) {
                println!("{}", message.cyan().bold());
            }
            if let Some(serving) = result.get("serving").and_then(|v| v.as_i64()) {
                println!("  {} {}", "Now serving user:".bold(), serving);
            }
        }

        Commands::Register { name, email } => {
            let params = json!({
                "name": name,
                "email": email,
            });

            let result = call_rpc(&cli.rpc_url, "user.register.v1", params).await?;
            let user: UserRow = serde_json::from_value(result)?;

            println!("{}", "✓ User registered".green().bold());
            println!();
            println!("{}", Table::new(vec![user]));
        }

        Commands::AddService {
            name,
            entry_time,
            end_time,
            counters,
        } => {
            let params = json!({
                "service_name": name,
                "service_entry_time": entry_time,
                "service_end_time": end_time,
                "number_of_counters": counters,
            });

            let result = call_rpc(&cli.rpc_url, "service.create.v1", params).await?;
            let service: ServiceRow = serde_json::from_value(result)?;

            println!("{}", "✓ Service created".green().bold());
            println!();
            println!("{}", Table::new(vec![service]));
        }

        Commands::AddCounter { number, service } => {
            let params = json!({
                "counter_number": number,
                "service_name": service,
            });

            let result = call_rpc(&cli.rpc_url, "counter.create.v1", params).await?;
            let counter: CounterRow = serde_json::from_value(result)?;

            println!("{}", "✓ Counter created".green().bold());
            println!();
            println!("{}", Table::new(vec![counter]));
        }

        Commands::Users => {
            let result = call_rpc(&cli.rpc_url, "user.list.v1", json!({})).await?;
            let users: Vec<UserRow> = serde_json::from_value(result)?;

            if users.is_empty() {
                println!("{}", "No users registered".yellow());
            } else {
                println!("{}", Table::new(users));
            }
        }

        Commands::Services => {
            let result = call_rpc(&cli.rpc_url, "service.list.v1", json!({})).await?;
            let services: Vec<ServiceRow> = serde_json::from_value(result)?;

            if services.is_empty() {
                println!("{}", "No services configured".yellow());
            } else {
                println!("{}", Table::new(services));
            }
        }

        Commands::Counters => {
            let result = call_rpc(&cli.rpc_url, "counter.list.v1", json!({})).await?;
            let counters: Vec<CounterRow> = serde_json::from_value(result)?;

            if counters.is_empty() {
                println!("{}", "No counters configured".yellow());
            } else {
                println!("{}", Table::new(counters));
            }
        }
    }

    Ok(())
}
