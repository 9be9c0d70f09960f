use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8978".to_string());
    let user = std::env::var("MOCK_USER").unwrap_or_else(|_| "cbadmin".to_string());
    let password = std::env::var("MOCK_PASSWORD").unwrap_or_else(|_| "cbadmin".to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, path = mock_server::GQL_PATH, user = %user, "listening");
    mock_server::run(listener, mock_server::app(&user, &password)).await
}
