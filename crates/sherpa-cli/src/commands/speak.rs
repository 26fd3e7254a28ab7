use anyhow::{Result, bail};
use colored::Colorize;

use sherpa_core::speech::SpeakOutcome;

use crate::context::AppContext;

pub async fn run(ctx: &AppContext, text: &str) -> Result<()> {
    let (player, output) = ctx.speech_player().await?;

    match player.speak(text, 0).await {
        SpeakOutcome::Played => {
            if let Some(note) = output.played_note() {
                println!("{}", note.bright_black());
            }
            Ok(())
        }
        SpeakOutcome::NoAudio => bail!("speech synthesis returned no audio"),
        SpeakOutcome::Failed(err) => bail!("could not play audio: {err}"),
        SpeakOutcome::Ignored => Ok(()),
    }
}
