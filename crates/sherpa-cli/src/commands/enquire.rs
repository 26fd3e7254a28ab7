use anyhow::{Result, bail};
use colored::Colorize;

use sherpa_core::enquiry::{EnquiryController, Field, SubmitOutcome};

use crate::context::AppContext;

pub struct EnquiryInput {
    pub name: String,
    pub phone: String,
    pub travelers: String,
    pub message: String,
}

/// Fills the form from the command line and submits it once.
pub async fn run(ctx: &AppContext, input: EnquiryInput) -> Result<()> {
    let controller = EnquiryController::new(ctx.enquiry_repository().await?);

    controller.set_field(Field::Name, input.name).await;
    controller.set_field(Field::Phone, input.phone).await;
    controller.set_field(Field::Travelers, input.travelers).await;
    controller.set_field(Field::Message, input.message).await;

    let outcome = controller.submit().await;
    let feedback = controller.feedback().await.unwrap_or_default();

    match outcome {
        SubmitOutcome::Saved => {
            println!("{}", feedback.bright_green());
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            for (field, error) in errors.iter() {
                eprintln!("{} {}", format!("{field}:").red().bold(), error.to_string().red());
            }
            bail!("enquiry not sent: {} field(s) invalid", errors.len())
        }
        SubmitOutcome::Failed => {
            eprintln!("{}", feedback.red());
            bail!("enquiry not sent")
        }
        SubmitOutcome::Ignored => Ok(()),
    }
}
