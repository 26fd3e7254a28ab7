use anyhow::Result;
use colored::Colorize;

use sherpa_core::chat::MysteryOracle;

use crate::context::AppContext;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let oracle = MysteryOracle::new(ctx.text_generator().await?);
    if let Some(clue) = oracle.reveal_clue().await {
        for line in clue.lines() {
            println!("{}", line.bright_magenta().italic());
        }
    }
    Ok(())
}
