//! Simplify command - plain-language rewrite of a passage

use anyhow::Result;

pub fn run(text: &str) -> Result<()> {
    let settings = super::open_settings()?;
    let client = super::service_client()?;
    let simplified = client.simplify(text, &settings.settings().api_settings.api_key);
    println!("{}", simplified);
    Ok(())
}
