use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lw_daemon::pipeline::{self, Feeds};

#[derive(Parser)]
#[command(name = "lw")]
#[command(about = "Watch-list ingestion and disposition-risk CLI", long_about = None)]
struct Cli {
    /// Config file (YAML). Environment overrides apply on top.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Run one ingestion pass (both feeds) and print its report
    Ingest,

    /// Classify one security's escalation risk
    Risk {
        /// Security code
        #[arg(long)]
        code: String,

        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    Status,
    /// Apply SQL migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();
    let cfg = lw_config::Config::load_or_default(cli.config.as_deref())?;

    match cli.cmd {
        Commands::Db { cmd } => match cmd {
            DbCmd::Status => {
                let pool = lw_db::connect_from_env().await?;
                let st = lw_db::status(&pool).await?;
                println!(
                    "ok={} has_securities_table={}",
                    st.ok, st.has_securities_table
                );
            }
            DbCmd::Migrate => {
                let pool = lw_db::connect_from_env().await?;
                lw_db::migrate(&pool).await?;
                println!("migrations applied");
            }
        },

        Commands::Ingest => {
            let pool = lw_db::connect_from_env().await?;
            lw_db::migrate(&pool).await?;
            let feeds = Feeds::from_config(&cfg);
            let report = pipeline::run_pass(&pool, &feeds).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Risk { code, date } => {
            let pool = lw_db::connect_from_env().await?;
            let reference = date.unwrap_or_else(|| Local::now().date_naive());

            let security = lw_db::query::find_security(&pool, &code)
                .await?
                .with_context(|| format!("unknown security '{code}'"))?;

            let dates = lw_db::query::recent_attention_dates(
                &pool,
                &security.code,
                reference,
                lw_risk::HISTORY_CAP,
            )
            .await?;

            let assessment = lw_risk::assess(
                &security.code,
                reference,
                &dates,
                &lw_risk::Thresholds::sane_defaults(),
            );
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
