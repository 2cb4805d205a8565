use anyhow::{Context, Result};
use dialoguer::Input;
use gezin_core::GezinConfig;
use gezin_core::auth::Credentials;
use owo_colors::OwoColorize;

pub fn run(config: &GezinConfig, username: Option<String>) -> Result<()> {
    let mut session = crate::session(config)?;

    let username = match username {
        Some(u) => u,
        None => Input::<String>::new()
            .with_prompt("Username")
            .allow_empty(true)
            .interact_text()?,
    };
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let user = session.login(&Credentials::new(username, password))?;
    println!("Logged in as {}", user.username.bold());

    Ok(())
}
