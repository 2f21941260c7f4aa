#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL and friends
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    if let Err(e) = gradebook_api::server::run().await {
        eprintln!("server error: {}", e);
        std::process::exit(1);
    }
}
