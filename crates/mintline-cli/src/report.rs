use colored::Colorize;
use mintline_ledger::ConfirmationReceipt;
use mintline_lifecycle::{StepObserver, StepReport, TokenIdentity};

/// Prints one line per confirmed step, plus an explorer link when a base
/// URL is configured.
pub struct ConsoleReporter {
    explorer_url: Option<String>,
}

impl ConsoleReporter {
    pub fn new(explorer_url: Option<String>) -> Self {
        Self { explorer_url }
    }

    fn print_receipt(&self, receipt: &ConfirmationReceipt) {
        match &self.explorer_url {
            Some(base) => println!("    {}", explorer_link(base, receipt).blue().underline()),
            None => println!("    receipt {}", receipt.to_string().dimmed()),
        }
    }
}

impl StepObserver for ConsoleReporter {
    fn token_reused(&self, token: &TokenIdentity) {
        println!(
            "{} Reusing token {}",
            "↺".cyan().bold(),
            token.to_string().yellow()
        );
    }

    fn step_confirmed(&self, report: &StepReport) {
        let check = "✓".green().bold();
        match report {
            StepReport::TokenCreated {
                token, decimals, ..
            } => println!(
                "{check} Created token {} ({decimals} decimals)",
                token.to_string().yellow()
            ),
            StepReport::Minted { amount, holding, .. } => println!(
                "{check} Minted {} units into {}",
                amount.to_string().bold(),
                holding.short_hex().cyan()
            ),
            StepReport::Transferred {
                amount, recipient, ..
            } => println!(
                "{check} Transferred {} unit(s) to {}",
                amount.to_string().bold(),
                recipient.to_string().cyan()
            ),
            StepReport::Burned { amount, holding, .. } => println!(
                "{check} Burned {} units from {}",
                amount.to_string().bold(),
                holding.short_hex().cyan()
            ),
        }
        self.print_receipt(report.receipt());
    }
}

pub fn explorer_link(base: &str, receipt: &ConfirmationReceipt) -> String {
    format!("{}/{}", base.trim_end_matches('/'), receipt)
}
