use std::path::PathBuf;

use clap::Parser;
use proforma_invoice_server::loadgen::fake::FakeInvoiceGenerator;
use proforma_invoice_server::loadgen::monitor::CPU_SAMPLE_INTERVAL;
use proforma_invoice_server::loadgen::{
    BatchOptions, InvoiceClient, LoadError, ResourceMonitor, DEFAULT_ENDPOINT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Post synthetic invoices to the generator and save the returned PDFs.
#[derive(Debug, Parser)]
#[command(name = "invoice-load-fake", version)]
struct Args {
    /// Invoice endpoint URL.
    #[arg(long, env = "INVOICE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    url: String,

    /// Number of invoices to generate.
    #[arg(short = 'n', long, default_value_t = 50)]
    count: usize,

    /// Directory for the returned PDFs.
    #[arg(short, long, default_value = "invoices")]
    output: PathBuf,

    /// Seed for reproducible payloads.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let monitor = ResourceMonitor::start()?;
    let client = InvoiceClient::new(&args.url)?;
    log::info!("Generating {} invoices against {}", args.count, client.endpoint());

    let payloads = FakeInvoiceGenerator::new(rng)
        .take(args.count)
        .map(|invoice| serde_json::to_value(invoice).map_err(LoadError::from));
    let options = BatchOptions {
        output_dir: args.output,
        require_pdf_content_type: false,
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
