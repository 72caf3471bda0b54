use clap::Parser;
use tracing::instrument;
use ytj::BusinessId;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Validate and normalize Finnish business ids")]
pub struct Validate {
    /// The business ids to check, e.g. 0112038-9, FI01120389
    #[arg(required = true)]
    ids: Vec<String>,

    /// Only report invalid ids
    #[arg(long, short)]
    quiet: bool,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let mut invalid = 0;

        for raw in &self.ids {
            match BusinessId::normalize(raw) {
                Ok(id) => {
                    if !self.quiet {
                        println!("{raw}\t{}", id.good());
                    }
                }
                Err(e) => {
                    invalid += 1;
                    println!("{raw}\t{}", e.alert());
                }
            }
        }

        if invalid > 0 {
            anyhow::bail!("{invalid} of {} business ids are invalid", self.ids.len());
        }

        Ok(())
    }
}
