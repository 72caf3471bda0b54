use chrono::NaiveDate;
use clap::Parser;
use tracing::instrument;
use ytj::{
    BusinessId, Config, RegistryLookup, TemporalRecordView,
    domain::{NameEntry, source_text},
};

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Display the current registry information of a business")]
pub struct Lookup {
    /// The business id, e.g. 0112038-9 or FI01120389
    id: BusinessId,

    /// Show the name registered in this language (as the registry writes it,
    /// e.g. SV or EN)
    #[arg(long, short)]
    language: Option<String>,

    /// Evaluate the record as of this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Lookup {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let lookup = RegistryLookup::from_config(config)?;

        let Some(record) = lookup.find_by_id(&self.id)? else {
            eprintln!("Business {} not found", self.id);
            std::process::exit(1);
        };

        let view = self.date.map_or_else(
            || TemporalRecordView::today(&record),
            |date| TemporalRecordView::new(&record, date),
        );

        match self.output {
            OutputFormat::Pretty => self.output_pretty(&view),
            OutputFormat::Json => self.output_json(&view)?,
        }

        Ok(())
    }

    fn output_pretty(&self, view: &TemporalRecordView) {
        let record = view.record();

        // Header
        println!("# {}", view.primary_name(self.language.as_deref()));
        println!("{}\n", self.id);

        println!("{}", "Status".muted());
        println!("  As of:         {}", view.date());
        if let Some(registered) = record.registration_date {
            println!("  Registered:    {registered}");
        }
        match view.liquidation_status() {
            Some(kind) => println!("  Liquidation:   {}", kind.alert()),
            None => println!("  Liquidation:   {}", "none".good()),
        }
        let forms = view.active_company_forms();
        if forms.is_empty() {
            println!("  Company form:  {}", "none in force".alert());
        } else {
            for form in forms {
                let kind = form.kind.as_ref().map(ToString::to_string);
                let label = form.name.as_deref().or(kind.as_deref()).unwrap_or("?");
                println!("  Company form:  {}", label.good());
            }
        }

        let names = view.active_names();
        if !names.is_empty() {
            println!("\n{}", "Names".muted());
            for entry in names {
                println!("  • {}", describe(entry));
            }
        }

        let auxiliary_names = view.active_auxiliary_names();
        if !auxiliary_names.is_empty() {
            println!("\n{}", "Auxiliary names".muted());
            for entry in auxiliary_names {
                println!("  • {}", describe(entry));
            }
        }
    }

    fn output_json(&self, view: &TemporalRecordView) -> anyhow::Result<()> {
        use serde_json::json;

        let record = view.record();

        let output = json!({
            "businessId": self.id,
            "date": view.date().to_string(),
            "name": record.name,
            "primaryName": view.primary_name(self.language.as_deref()),
            "names": view.active_names(),
            "auxiliaryNames": view.active_auxiliary_names(),
            "liquidation": view.liquidation_status(),
            "hasActiveCompanyForm": view.has_active_company_form(),
            "companyForms": view.active_company_forms(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn describe(entry: &NameEntry) -> String {
    let mut details = Vec::new();
    if let Some(language) = &entry.language {
        details.push(language.clone());
    }
    if let Some(registered) = entry.registration_date {
        details.push(format!("since {registered}"));
    }
    if let Some(source) = entry.source {
        details.push(source_text(source).to_string());
    }

    if details.is_empty() {
        entry.name.clone()
    } else {
        format!("{} {}", entry.name, format!("({})", details.join(", ")).muted())
    }
}
