use stc::server::{config::Config, startup};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    startup::init_tracing();

    if let Err(e) = run(&config).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<(), stc::server::error::Error> {
    let (client, db) = startup::connect_to_database(config).await?;

    for name in db.list_collection_names().await? {
        let count = db
            .collection(&name)
            .count_documents(serde_json::Value::Null)
            .await?;
        tracing::info!(collection = %name, documents = count, "Found collection");
    }

    client.close().await
}
