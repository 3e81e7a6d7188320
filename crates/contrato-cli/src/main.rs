//! Contrato CLI: analyze contract PDFs and browse the contract portfolio.
//!
//! Configuration comes from the environment (or a `.env` file). Uploads need
//! CLOUDINARY_CLOUD_NAME and CLOUDINARY_UPLOAD_PRESET; contract queries need
//! GRAPHQL_ENDPOINT.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use contrato_cli::render::{
    render_action_detail, render_board, render_contract_detail, render_contracts, render_stats,
    render_users,
};
use contrato_cli::{init_tracing, load_analysis, load_contract};
use contrato_client::{AnalysisClient, GraphqlClient};
use contrato_services::{http_workflow, ClientConfig, ErrorMetadata, PortfolioStats, ResultBoard};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "contrato", about = "Contract analysis CLI")]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a contract and print its phase-by-phase breakdown
    Analyze {
        /// Path to the contract PDF
        file: PathBuf,
        /// Show the full detail of this action id
        #[arg(long)]
        action: Option<String>,
    },
    /// Contract records from the GraphQL API
    Contracts {
        #[command(subcommand)]
        sub: ContractCommands,
    },
    /// List users
    Users,
    /// Check evidence against an action's completion criteria
    Milestone {
        /// Analysis JSON saved from `analyze --json`
        analysis: PathBuf,
        /// Action id to verify
        action_id: String,
        /// Free-text evidence, e.g. a description plus a link
        evidence: String,
        /// Overwrite the analysis file with the updated contract
        #[arg(long)]
        write: bool,
    },
    /// Health of the analysis service
    ServiceStatus,
}

#[derive(Subcommand)]
enum ContractCommands {
    /// List all contracts
    List,
    /// Get one contract with milestones, team and documents
    Get {
        /// Contract id, e.g. CTR-2024-001
        id: String,
    },
    /// Portfolio statistics
    Stats,
}

#[derive(Serialize)]
struct StatusReport {
    service: contrato_core::models::ServiceStatus,
    agents: contrato_core::models::AgentStatus,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Analyze { file, action } => {
            let contract = load_contract(&file)?;
            let workflow = http_workflow(&config)?;

            let mut updates = workflow.subscribe();
            let progress = tokio::spawn(async move {
                while updates.changed().await.is_ok() {
                    let snapshot = updates.borrow_and_update().clone();
                    tracing::info!(
                        status = %snapshot.status,
                        file = snapshot.file_name.as_deref().unwrap_or("-"),
                        "Workflow status changed"
                    );
                }
            });

            let result = workflow.submit(contract).await;
            progress.abort();

            let analysis = match result {
                Ok(analysis) => analysis,
                Err(err) => {
                    if let Some(hint) = err.suggested_action() {
                        eprintln!("Hint: {}", hint);
                    }
                    anyhow::bail!("{} ({})", err.client_message(), err.error_code());
                }
            };

            let detail = match action.as_deref() {
                Some(id) => Some(
                    workflow
                        .select_action_by_id(id)
                        .await
                        .with_context(|| format!("No action with id {}", id))?,
                ),
                None => None,
            };

            if cli.json {
                match &detail {
                    Some(detail) => print_json(detail)?,
                    None => print_json(&analysis)?,
                }
            } else {
                if let Some(storage) = workflow.storage_reference().await {
                    println!("Stored at: {}", storage.secure_url);
                }
                println!("{}", render_board(&ResultBoard::new(analysis)));
                if let Some(detail) = detail {
                    println!("\n{}", render_action_detail(&detail));
                }
            }
        }
        Commands::Contracts { sub } => {
            let client = GraphqlClient::new(&config)?;
            match sub {
                ContractCommands::List => {
                    let contracts = client.list_contracts().await?;
                    if cli.json {
                        print_json(&contracts)?;
                    } else {
                        println!("{}", render_contracts(&contracts));
                    }
                }
                ContractCommands::Get { id } => {
                    let detail = client
                        .get_contract(&id)
                        .await?
                        .with_context(|| format!("Contract {} not found", id))?;
                    if cli.json {
                        print_json(&detail)?;
                    } else {
                        println!("{}", render_contract_detail(&detail));
                    }
                }
                ContractCommands::Stats => {
                    let contracts = client.list_contracts().await?;
                    let stats = PortfolioStats::from_contracts(&contracts);
                    if cli.json {
                        print_json(&stats)?;
                    } else {
                        println!("{}", render_stats(&stats));
                    }
                }
            }
        }
        Commands::Users => {
            let users = GraphqlClient::new(&config)?.list_users().await?;
            if cli.json {
                print_json(&users)?;
            } else {
                println!("{}", render_users(&users));
            }
        }
        Commands::Milestone {
            analysis,
            action_id,
            evidence,
            write,
        } => {
            let contract = load_analysis(&analysis)?;
            if contract.find_action(&action_id).is_none() {
                anyhow::bail!("No action with id {} in {}", action_id, analysis.display());
            }

            let client = AnalysisClient::new(&config)?;
            let response = client.check_milestone(&contract, &action_id, &evidence).await?;

            if write {
                if let Some(updated) = &response.updated_contract {
                    let out = serde_json::to_string_pretty(updated).context("Serialize contract")?;
                    std::fs::write(&analysis, out)
                        .with_context(|| format!("Failed to write {}", analysis.display()))?;
                    tracing::info!(path = %analysis.display(), "Updated analysis saved");
                }
            }

            if cli.json {
                print_json(&response)?;
            } else {
                println!("Status: {}", response.status);
                if let Some(message) = &response.agent_response {
                    println!("{}", message);
                }
                if let Some(updated) = response.updated_contract {
                    println!("\n{}", render_board(&ResultBoard::new(updated)));
                }
            }
        }
        Commands::ServiceStatus => {
            let client = AnalysisClient::new(&config)?;
            let (service, agents) =
                tokio::try_join!(client.service_status(), client.agent_status())?;
            if cli.json {
                print_json(&StatusReport { service, agents })?;
            } else {
                println!("{} at {}", service.status, client.base_url());
                if let Some(name) = service.service {
                    println!("Service: {}", name);
                }
                println!("Agents: {} ({} active)", agents.state, agents.agents_active);
            }
        }
    }

    Ok(())
}
