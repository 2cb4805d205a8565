use anyhow::Result;
use gezin_core::GezinConfig;

pub fn run(config: &GezinConfig) -> Result<()> {
    let mut session = crate::session(config)?;

    if !session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }

    session.logout()?;
    println!("Logged out.");
    Ok(())
}
