use std::sync::Arc;

use anyhow::{Context, bail};

use inbox_triage::config::TriageConfig;
use inbox_triage::pipeline::{Archiver, TriagePipeline};
use inbox_triage::provider::{GmailClient, MailProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = TriageConfig::from_env().context("invalid configuration")?;

    let provider: Arc<dyn MailProvider> = Arc::new(GmailClient::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export GMAIL_ACCESS_TOKEN=ya29....");
        eprintln!("  (obtain one via your OAuth flow; this tool does not run one)");
        std::process::exit(1);
    }));

    eprintln!("📬 Inbox Triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Clusters: {}", config.cluster_count);
    eprintln!("   Seed: {}", config.random_seed);
    eprintln!("   Page size: {}\n", config.max_results);

    let pipeline = TriagePipeline::new(Arc::clone(&provider), config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("clusters") => {
            let inbox = pipeline.run().await?;
            for summary in inbox.summaries() {
                println!(
                    "Cluster {} — {} message(s)",
                    summary.cluster_id, summary.count
                );
                for subject in &summary.subjects {
                    println!("  - {subject}");
                }
                if summary.count > summary.subjects.len() {
                    println!("  … and {} more", summary.count - summary.subjects.len());
                }
                println!();
            }
        }
        Some("archive") => {
            let cluster_id: usize = args
                .get(1)
                .context("usage: inbox-triage archive <cluster-id>")?
                .parse()
                .context("cluster id must be a non-negative integer")?;

            // Recompute from scratch — clusters are not persisted between runs.
            let inbox = pipeline.run().await?;
            let archiver = Archiver::new(provider);
            let affected = archiver.archive_cluster(&inbox.index, cluster_id).await?;
            println!("Archived {affected} message(s) from cluster {cluster_id}");
        }
        Some(other) => {
            bail!("unknown command {other:?} (expected `clusters` or `archive <cluster-id>`)");
        }
    }

    Ok(())
}
