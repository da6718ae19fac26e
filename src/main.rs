use anyhow::Result;
use colored::*;
use edinet_metrics::edinet::{
    CategoryFilter, DocCategory, FilingQuery, HttpRegistry, Orchestrator,
};
use edinet_metrics::EdinetConfig;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "edinet-metrics",
    about = "Resolve a company's latest EDINET filing and extract its key financial metrics"
)]
struct Opt {
    /// Filer name to search for, substring match (e.g. トヨタ自動車株式会社)
    company: String,

    /// How many calendar days to scan backward from today
    #[structopt(long, default_value = "60")]
    days_back: u32,

    /// Also query Saturdays and Sundays
    #[structopt(long)]
    include_weekends: bool,

    /// Restrict to given categories (annual, quarterly, semiannual);
    /// default is all three
    #[structopt(long = "category")]
    categories: Vec<DocCategory>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let opt = Opt::from_args();
    let config = EdinetConfig::from_env()?;

    let mut query = FilingQuery::new(&opt.company);
    query.days_back = opt.days_back;
    query.business_days_only = !opt.include_weekends;
    if !opt.categories.is_empty() {
        query.categories = CategoryFilter::only(opt.categories);
    }

    let registry = HttpRegistry::new(&config);
    let orchestrator = Orchestrator::new(registry);

    println!("Searching filings for {}...", opt.company);
    match orchestrator.resolve_and_extract(&query).await {
        Ok(extraction) => {
            let record = &extraction.record;
            println!(
                "{} {} | {} | docID: {}",
                "Located:".green(),
                record.filer_name,
                record.description,
                record.doc_id
            );
            println!("Source representation: {}", extraction.representation);
            for (metric, value) in extraction.metrics.iter() {
                let rendered = if value.is_available() {
                    value.to_string().normal()
                } else {
                    value.to_string().dimmed()
                };
                println!("  {} ({}): {}", metric, metric.japanese_label(), rendered);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), anyhow::Error::new(e));
            std::process::exit(1);
        }
    }
}
