use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use proforma_invoice_server::loadgen::csv_source::read_payloads;
use proforma_invoice_server::loadgen::monitor::CPU_SAMPLE_INTERVAL;
use proforma_invoice_server::loadgen::{
    BatchOptions, InvoiceClient, ResourceMonitor, DEFAULT_ENDPOINT,
};

/// Post one invoice per CSV row to the generator and save the returned PDFs.
#[derive(Debug, Parser)]
#[command(name = "invoice-load-csv", version)]
struct Args {
    /// Invoice endpoint URL.
    #[arg(long, env = "INVOICE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    url: String,

    /// CSV file with one invoice per row.
    #[arg(short, long, default_value = "invoice_data.csv")]
    csv: PathBuf,

    /// Directory for the returned PDFs.
    #[arg(short, long, default_value = "generated_invoices")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let monitor = ResourceMonitor::start()?;
    let client = InvoiceClient::new(&args.url)?;
    log::info!("Auto invoice PDF generation started against {}", client.endpoint());

    let payloads = read_payloads(&args.csv)
        .with_context(|| format!("failed to load invoices from {}", args.csv.display()))?;
    let options = BatchOptions {
        output_dir: args.output,
        require_pdf_content_type: true,
    };
    let batch = client.run_batch(payloads, &options).await?;

    let report = monitor.finish(CPU_SAMPLE_INTERVAL).await;
    println!(
        "\nSaved {} of {} invoices ({} failed)",
        batch.saved, batch.attempted, batch.failed
    );
    println!("{}", report);

    Ok(())
}
