mod db;
mod generate;
mod inspect;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use propgen_core::{OutputFormat, PackageTier, ProposalMode, TemplateStyle};

use crate::db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "propgen-cli")]
#[command(about = "SEO proposal generator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database operations
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run the full pipeline for a stored customer, printing progress as JSON lines
    Generate {
        /// Customer record id
        #[arg(long)]
        customer_id: i64,
        /// Package tier (local, regional, national)
        #[arg(long)]
        tier: PackageTier,
        /// Content mode (concise, detailed)
        #[arg(long, default_value = "concise")]
        mode: ProposalMode,
        /// Template family (classic, modern)
        #[arg(long, default_value = "classic")]
        style: TemplateStyle,
        /// Output format (pdf, html)
        #[arg(long, default_value = "pdf")]
        format: OutputFormat,
        /// Run company research on the premium model
        #[arg(long)]
        prefer_opus: bool,
    },
    /// Render saved proposal content JSON with any template
    Render {
        /// Path to a content JSON document (tagged with `kind`)
        #[arg(long)]
        content: PathBuf,
        /// Optional research JSON used for competitor fallbacks
        #[arg(long)]
        research: Option<PathBuf>,
        #[arg(long, default_value = "classic")]
        style: TemplateStyle,
        #[arg(long, default_value = "pdf")]
        format: OutputFormat,
        /// Destination file; defaults to the standard artifact filename in the current directory
        #[arg(long)]
        output: Option<PathBuf>,
        /// Proposal number printed on the document
        #[arg(long)]
        number: Option<String>,
        #[arg(long, env = "PROPGEN_AGENCY_NAME", default_value = "Propgen Digital")]
        agency: String,
        /// Headless browser used for modern PDFs
        #[arg(long, env = "PROPGEN_CHROME_PATH", default_value = "chromium")]
        browser: PathBuf,
        #[arg(long)]
        no_sandbox: bool,
    },
    /// Print the traffic and revenue projection for a tier
    Project {
        /// Current monthly organic visitors
        #[arg(long)]
        traffic: u64,
        #[arg(long)]
        tier: PackageTier,
        /// Average deal value in pounds
        #[arg(long)]
        deal_value: Option<u64>,
        /// Lead-to-customer rate override (0 < rate <= 1)
        #[arg(long)]
        close_rate: Option<f64>,
    },
    /// Print the search terms an industry label maps to
    Industry {
        label: String,
        /// YAML file extending the built-in table
        #[arg(long, env = "PROPGEN_INDUSTRY_MAP_PATH")]
        map: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => db::run_db_command(command).await?,
        Some(Commands::Generate {
            customer_id,
            tier,
            mode,
            style,
            format,
            prefer_opus,
        }) => {
            let request = propgen_pipeline::GenerationRequest {
                customer_id,
                package_tier: tier,
                proposal_mode: mode,
                template_style: style,
                output_format: format,
                prefer_opus,
            };
            generate::run_generate(request).await?;
        }
        Some(Commands::Render {
            content,
            research,
            style,
            format,
            output,
            number,
            agency,
            browser,
            no_sandbox,
        }) => {
            let args = render::RenderArgs {
                content,
                research,
                style,
                format,
                output,
                number,
                agency,
                browser,
                no_sandbox,
            };
            let path = render::run_render(&args).await?;
            println!("{}", path.display());
        }
        Some(Commands::Project {
            traffic,
            tier,
            deal_value,
            close_rate,
        }) => inspect::print_projection(traffic, tier, deal_value, close_rate)?,
        Some(Commands::Industry { label, map }) => {
            inspect::print_industry(&label, map.as_deref())?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
