#[actix_web::main]
async fn main() -> std::io::Result<()> {
    proforma_invoice_server::run().await
}
