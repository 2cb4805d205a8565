use std::time::Duration;

use anyhow::Result;
use gezin_core::{Backend, GezinConfig, RemoteStore};
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::utils::tui::create_spinner;

const RETRY_DELAY_MS: u64 = 1000;

pub async fn run(config: &GezinConfig, retries: u32) -> Result<()> {
    let session = crate::session(config)?;
    match session.current_user() {
        Some(user) => println!("Logged in as {}", user.username.bold()),
        None => println!("{}", "Not logged in".dimmed()),
    }

    let target = match config.backend {
        Backend::Rest => config.api_url.clone(),
        Backend::Supabase => config.supabase_url.clone().unwrap_or_default(),
    };
    let store = gezin_core::connect(config)?;

    let mut health = store.health_check().await;
    for attempt in 1..=retries {
        if health.ok {
            break;
        }
        let spinner = create_spinner(format!(
            "{} ({attempt}/{retries})",
            health.render()
        ));
        tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
        health = store.health_check().await;
        spinner.finish_and_clear();
    }

    println!("Backend {} {}", target.dimmed(), health.render());

    if !health.ok {
        anyhow::bail!("The backend could not be reached");
    }
    Ok(())
}
