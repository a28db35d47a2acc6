use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use grc_client::{ApiClient, HttpCallDataService, HttpPublisher, TransactionVerifier};
use grc_oplog::{GraphProjection, OperationDraft, OperationLog};
use grc_pipeline::{fakes, PipelineServices, PublishingPipeline, PublishingState};
use grc_protocol::{Indexed, TxStatus, VerifyResponse};
use grc_server::{AppState, GrcServer};
use grc_types::{id, AppConfig};
use serde::Serialize;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let config_path = cli.config;
    let load_config = || -> anyhow::Result<AppConfig> {
        let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    };
    match cli.command {
        Command::Id(args) => cmd_id(args, format),
        Command::Validate(args) => cmd_validate(args, format),
        Command::Serve(args) => cmd_serve(args, load_config()?).await,
        Command::Publish(args) => cmd_publish(args, load_config()?, format).await,
        Command::Calldata(args) => cmd_calldata(args, load_config()?, format).await,
        Command::Verify(args) => cmd_verify(args, load_config()?, format).await,
    }
}

/// Read a JSON array of drafts and append every valid one to a fresh log.
/// The first invalid draft aborts with its position.
pub fn load_operations(path: &Path) -> anyhow::Result<OperationLog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let drafts: Vec<OperationDraft> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {} as a JSON array of operations", path.display()))?;

    let mut log = OperationLog::new();
    for (index, draft) in drafts.into_iter().enumerate() {
        let payload = draft
            .validate()
            .with_context(|| format!("operation #{} is invalid", index + 1))?;
        log.append(payload);
    }
    Ok(log)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_id(args: IdArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ids: Vec<String> = (0..args.count).map(|_| id::generate()).collect();
    match format {
        OutputFormat::Json => print_json(&ids),
        OutputFormat::Text => {
            for id in ids {
                println!("{id}");
            }
            Ok(())
        }
    }
}

fn cmd_validate(args: ValidateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let log = load_operations(&args.ops)?;
    let projection = GraphProjection::from_operations(log.operations());
    if format == OutputFormat::Json {
        return print_json(&projection);
    }

    println!("{} {} operation(s) valid", "✓".green().bold(), log.len().to_string().bold());
    for op in log.operations() {
        println!("  {} {}", op.kind().to_string().cyan(), op.payload.summary());
    }
    print_projection(&projection);
    Ok(())
}

fn print_projection(projection: &GraphProjection) {
    println!("\n{} entities, {} relations", projection.entities.len(), projection.relations.len());
    for entity in projection.entities.values() {
        println!("  {}", entity.id.as_str().yellow().bold());
        for (attribute, value) in &entity.attributes {
            println!("    {} = {} {}", attribute, value.raw_value, value.value_type.to_string().dimmed());
        }
        for rel in projection.relations_from(&entity.id) {
            println!("    -[{}]-> {}", rel.relation_type_id, rel.to_entity_id.as_str().yellow());
        }
    }
    // Edges whose source has no attributes in this log.
    let orphans = projection
        .relations
        .iter()
        .filter(|rel| projection.entity(&rel.from_entity_id).is_none());
    for rel in orphans {
        println!(
            "  {} -[{}]-> {}",
            rel.from_entity_id.as_str().yellow(),
            rel.relation_type_id,
            rel.to_entity_id.as_str().yellow()
        );
    }
}

async fn cmd_serve(args: ServeArgs, config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let mut server = GrcServer::new(state);
    if let Some(bind) = args.bind {
        server = server.with_bind_addr(bind);
    }
    println!("GRC publisher on {}", server.bind_addr().to_string().bold());
    server.serve().await?;
    Ok(())
}

async fn cmd_publish(args: PublishArgs, config: AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let log = load_operations(&args.ops)?;
    let space_id = args
        .space
        .clone()
        .unwrap_or_else(|| config.default_space_id.clone());

    let mut signer = None;
    let services = if args.dry_run {
        let author = config
            .wallet
            .author
            .clone()
            .unwrap_or_else(|| fakes::ZERO_ADDRESS.to_string());
        fakes::dry_run(author)
    } else {
        let api = ApiClient::from_config(&config)?;
        let rpc_signer = Arc::new(grc_client::signer_from_config(&config, api.http().clone())?);
        signer = Some(rpc_signer.clone());
        PipelineServices::new(
            Arc::new(HttpPublisher::new(api.clone())),
            Arc::new(HttpCallDataService::new(api)),
            rpc_signer,
        )
    };

    let state = PublishingState::new(space_id).with_operation_name(args.name.clone());
    let mut pipeline = PublishingPipeline::new(state, services);

    let outcome = if args.no_send {
        match pipeline.publish(log.operations()).await {
            Ok(_) => pipeline.request_call_data().await.map(|_| ()),
            Err(e) => Err(e),
        }
    } else {
        pipeline.publish_all(log.operations()).await.map(|_| ())
    };

    let receipt = match (&outcome, &signer, &pipeline.state().transaction_hash) {
        (Ok(()), Some(signer), Some(hash)) if args.wait => signer.wait_for_receipt(hash).await?,
        _ => None,
    };

    if format == OutputFormat::Json {
        print_json(pipeline.state())?;
    } else {
        print_state(pipeline.state(), outcome.is_ok(), args.dry_run);
        if args.wait {
            match &receipt {
                Some(r) if r.succeeded() => println!("  Receipt: {}", "confirmed".green()),
                Some(_) => println!("  Receipt: {}", "reverted".red()),
                None => println!("  Receipt: {}", "still pending".yellow()),
            }
        }
    }
    outcome?;
    Ok(())
}

fn print_state(state: &PublishingState, ok: bool, dry_run: bool) {
    let mark = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    let label = if dry_run { " (dry run)" } else { "" };
    println!("{mark} {}{label}", state.status);
    println!("  Space: {}", state.space_id.cyan());
    println!("  Step: {}", state.current_step);
    if let Some(cid) = &state.content_id {
        println!("  Content id: {}", cid.yellow());
    }
    if let Some(cd) = &state.call_data {
        println!("  To: {}", cd.to);
        println!("  Data: {} bytes", cd.data.len().saturating_sub(2) / 2);
    }
    if let Some(hash) = &state.transaction_hash {
        println!("  Transaction: {}", hash.yellow().bold());
    }
}

async fn cmd_calldata(args: CalldataArgs, config: AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let network = args.network.unwrap_or(config.network);
    let api = ApiClient::new(
        config.api.base_url(network),
        network,
        std::time::Duration::from_secs(config.api.timeout_secs),
    )?;
    let call_data = HttpCallDataService::new(api)
        .fetch(&args.space, &args.cid, network)
        .await?;

    match format {
        OutputFormat::Json => print_json(&call_data),
        OutputFormat::Text => {
            println!("{} Call data for {} on {}", "✓".green().bold(), args.cid.yellow(), network);
            println!("  To:   {}", call_data.to);
            println!("  Data: {}", call_data.data);
            Ok(())
        }
    }
}

async fn cmd_verify(args: VerifyArgs, config: AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.api.timeout_secs))
        .build()?;
    let verifier: TransactionVerifier = grc_client::verifier_from_config(&config, http);
    let response = verifier.verify(&args.tx, args.space.as_deref()).await?;
    match format {
        OutputFormat::Json => print_json(&response),
        OutputFormat::Text => {
            print_verify(&response);
            Ok(())
        }
    }
}

fn print_verify(response: &VerifyResponse) {
    let status = match response.status {
        TxStatus::Confirmed => "confirmed".green().bold(),
        TxStatus::Failed => "failed".red().bold(),
        TxStatus::Pending => "pending".yellow(),
        TxStatus::Unknown => "unknown".dimmed(),
    };
    let indexed = match response.indexed {
        Indexed::Yes => "yes".green(),
        Indexed::No => "no".yellow(),
        Indexed::Unknown => "unknown".dimmed(),
    };
    println!("Transaction {}", response.tx_hash.yellow());
    println!("  Status:  {status}");
    println!("  Indexed: {indexed}");
    if let Some(space) = &response.space_id {
        println!("  Space:   {space}");
    }
    println!("  {}", response.message);
}
