use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "modred-cli")]
#[command(about = "Command-line client for the ModredIP backend", long_about = None)]
struct Cli {
    #[arg(short, long, env = "MODRED_API_URL", default_value = "http://localhost:5000")]
    url: String,

    /// ModredIP contract address.
    #[arg(short, long, env = "MODRED_IP_CONTRACT")]
    contract: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check backend health
    Status,
    /// Register an IP asset on Etherlink and Yakoa
    Register {
        #[arg(long)]
        ip_hash: String,
        /// Metadata JSON or URI
        #[arg(long)]
        metadata: String,
        #[arg(long)]
        encrypted: bool,
    },
    /// Mint a license for an IP asset
    MintLicense {
        #[arg(long)]
        token_id: u64,
        #[arg(long)]
        royalty_percentage: u64,
        /// Duration in seconds
        #[arg(long)]
        duration: u64,
        #[arg(long)]
        commercial_use: bool,
        #[arg(long)]
        terms: String,
    },
    /// Pay revenue to an IP asset
    Pay {
        #[arg(long)]
        token_id: u64,
        /// Amount in ether, e.g. 0.01
        #[arg(long)]
        amount: String,
    },
    /// Claim accumulated royalties
    Claim {
        #[arg(long)]
        token_id: u64,
    },
    /// Show one IP asset, or all of them
    Asset { id: Option<u64> },
    /// Show one license, or all of them
    License { id: Option<u64> },
    /// Show Yakoa infringement status for a token
    Infringement { token_id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');
    let contract = || {
        cli.contract
            .clone()
            .ok_or("--contract (or MODRED_IP_CONTRACT) is required for this command")
    };

    let res = match &cli.command {
        Commands::Status => client.get(format!("{}/health", base)).send().await?,
        Commands::Register {
            ip_hash,
            metadata,
            encrypted,
        } => {
            client
                .post(format!("{}/api/register", base))
                .json(&json!({
                    "ipHash": ip_hash,
                    "metadata": metadata,
                    "isEncrypted": encrypted,
                    "modredIpContractAddress": contract()?,
                }))
                .send()
                .await?
        }
        Commands::MintLicense {
            token_id,
            royalty_percentage,
            duration,
            commercial_use,
            terms,
        } => {
            client
                .post(format!("{}/api/license/mint", base))
                .json(&json!({
                    "tokenId": token_id,
                    "royaltyPercentage": royalty_percentage,
                    "duration": duration,
                    "commercialUse": commercial_use,
                    "terms": terms,
                    "modredIpContractAddress": contract()?,
                }))
                .send()
                .await?
        }
        Commands::Pay { token_id, amount } => {
            client
                .post(format!("{}/api/royalty/pay", base))
                .json(&json!({
                    "tokenId": token_id,
                    "amount": amount,
                    "modredIpContractAddress": contract()?,
                }))
                .send()
                .await?
        }
        Commands::Claim { token_id } => {
            client
                .post(format!("{}/api/royalty/claim", base))
                .json(&json!({
                    "tokenId": token_id,
                    "modredIpContractAddress": contract()?,
                }))
                .send()
                .await?
        }
        Commands::Asset { id } => {
            let path = match id {
                Some(id) => format!("{}/api/assets/{}", base, id),
                None => format!("{}/api/assets", base),
            };
            with_contract(client.get(path), &cli.contract).send().await?
        }
        Commands::License { id } => {
            let path = match id {
                Some(id) => format!("{}/api/licenses/{}", base, id),
                None => format!("{}/api/licenses", base),
            };
            with_contract(client.get(path), &cli.contract).send().await?
        }
        Commands::Infringement { token_id } => {
            client
                .get(format!(
                    "{}/api/infringement/contract/{}/{}",
                    base,
                    contract()?,
                    token_id
                ))
                .send()
                .await?
        }
    };

    print_response(res).await
}

fn with_contract(
    req: reqwest::RequestBuilder,
    contract: &Option<String>,
) -> reqwest::RequestBuilder {
    match contract {
        Some(c) => req.query(&[("contract", c)]),
        None => req,
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: backend returned status {}", status);
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
