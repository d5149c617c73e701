use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;
use voxclone_core::records::PostgresRecordStore;
use voxclone_core::settings::{load_settings, DatabaseConfig, Settings};
use voxclone_core::{CloneAndSpeakRequest, Services};
use voxclone_server::{router, AppState};

fn load(config: &Path) -> Result<Settings> {
    let settings = load_settings(Some(config))?;
    settings.validate()?;
    Ok(settings)
}

pub async fn serve(config: &Path) -> Result<()> {
    let settings = load(config)?;
    let services = Services::from_settings(&settings).await?;
    let app = router(AppState::new(services), &settings.server);

    let listener = TcpListener::bind(settings.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.bind_address))?;
    info!("Listening on {}", settings.server.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("Server error")
}

pub async fn run_once(
    config: &Path,
    sample: PathBuf,
    name: String,
    description: String,
    text: String,
) -> Result<()> {
    let settings = load(config)?;
    let original_filename = sample
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Sample path {sample:?} has no file name"))?
        .to_string();

    let services = Services::from_settings(&settings).await?;
    let mut session = services.records.open_session().await?;

    let request = CloneAndSpeakRequest {
        sample_path: sample,
        original_filename,
        voice_name: name,
        voice_description: description,
        text,
    };
    let (voice, speech) = services
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await?;

    let output = json!({ "voice": voice, "speech": speech });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub async fn reset_db(config: &Path, skip_confirmation: bool) -> Result<()> {
    // Only the database section matters here, so skip full validation
    let settings = load_settings(Some(config))?;

    let DatabaseConfig::Postgres {
        url,
        max_connections,
    } = &settings.database
    else {
        anyhow::bail!("reset-db only applies to a postgres database");
    };
    if url.is_empty() {
        anyhow::bail!("database.url (DATABASE_URL) is not set");
    }

    println!("This will run: DROP TABLE IF EXISTS generated_speech, cloned_voices;");
    println!("WARNING: This permanently deletes every voice and speech record.");
    if !skip_confirmation && !confirm("Are you sure you want to continue? (y/n): ")? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let store = PostgresRecordStore::connect(url, *max_connections).await?;
    store.reset().await?;
    println!("Dropped 'generated_speech' and 'cloned_voices'. They are recreated on next start.");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
