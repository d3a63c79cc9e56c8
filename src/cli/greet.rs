//! CLI `greet` command: ask the text-generation endpoint for a greeting.

use anyhow::{bail, Result};

use chronos::config::GreetingConfig;
use chronos::greeting::{Greeter, GreetingClient, GreetingState};

pub async fn greet(config: &GreetingConfig, prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        bail!("prompt must not be empty");
    }

    let greeter = Greeter::new(GreetingClient::new(config)?);
    eprintln!("Asking for a greeting...");

    match greeter.fetch(prompt).await {
        GreetingState::Success(text) => {
            println!("{}", text.trim());
            Ok(())
        }
        GreetingState::Error(message) => bail!("{message} (run the command again to retry)"),
        GreetingState::Idle | GreetingState::Loading => bail!("greeting request did not finish"),
    }
}
