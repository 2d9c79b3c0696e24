use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Client for exercising a running routing gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token for authenticated endpoints
    #[arg(short, long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange username and password for a session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Show the authenticated customer
    Customer,
    /// List the customer's mortgages
    Mortgages,
    /// Show the product of a mortgage
    Product {
        #[arg(short, long)]
        mortgage_id: String,
    },
    /// Read or change the debit instruction of a mortgage
    DebitInstruction {
        #[command(subcommand)]
        action: DebitAction,
    },
}

#[derive(Subcommand)]
enum DebitAction {
    Get {
        #[arg(short, long)]
        mortgage_id: String,
    },
    Put {
        #[arg(short, long)]
        mortgage_id: String,
        /// Day of the month the debit is collected
        #[arg(short, long)]
        day: i32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
    }

    let request = match cli.command {
        Commands::Login { username, password } => client
            .post(format!("{}/login", base))
            .json(&json!({ "username": username, "password": password })),
        Commands::Customer => client.get(format!("{}/customer", base)).headers(headers),
        Commands::Mortgages => client.get(format!("{}/mortgages", base)).headers(headers),
        Commands::Product { mortgage_id } => client
            .get(format!("{}/product", base))
            .query(&[("mortgageId", mortgage_id)])
            .headers(headers),
        Commands::DebitInstruction { action } => match action {
            DebitAction::Get { mortgage_id } => client
                .get(format!("{}/debitinstruction", base))
                .query(&[("mortgageId", mortgage_id)])
                .headers(headers),
            DebitAction::Put { mortgage_id, day } => client
                .put(format!("{}/debitinstruction", base))
                .query(&[("mortgageId", mortgage_id)])
                .headers(headers)
                .json(&json!({ "debInstructSelectedDay": day })),
        },
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if status.is_success() {
        println!("Status: {}", status);
    } else {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if !text.is_empty() => println!("{}", text),
        Err(_) => {}
    }
    Ok(())
}
