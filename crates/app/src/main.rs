use std::sync::Arc;

use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&settings.app.level))
        .init();

    let db = connect(&settings.server.database).await?;
    let mut builder = engine::Engine::builder().database(db);

    if let Some(mail) = &settings.mail {
        tracing::info!("Found mail settings, relaying through {}", mail.host);
        let mailer = engine::SmtpMailer::new(&mail.smtp())?;
        builder = builder.mailer(Arc::new(mailer));
        if let Some(from) = &mail.from {
            builder = builder.mail_from(from);
        }
    } else {
        tracing::warn!("no mail settings, summary mails are disabled");
    }

    let engine = builder.build().await?;
    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

/// Tracing directive for our crates and the HTTP request spans.
fn log_filter(level: &str) -> String {
    format!("gastosmensais={level},server={level},engine={level},tower_http={level}")
}

async fn connect(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
