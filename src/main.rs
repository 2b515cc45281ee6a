use std::net::SocketAddr;

use bookstore_api::application::service::BookService;
use bookstore_api::domain::model::store::BookStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookstore_api=info,tower_http=info")),
        )
        .init();

    let addr: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:3000".to_string())
        .parse()?;

    let service = BookService::new(BookStore::seeded());
    bookstore_api::interface::http::run(addr, service).await
}
