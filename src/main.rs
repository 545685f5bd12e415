#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    licence_docs_server::run().await
}
