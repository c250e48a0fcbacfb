use anyhow::{Context, Result};
use recipe_audit::aggregator::RecipeAuditor;
use recipe_audit::canonical_tables::CanonicalTables;
use recipe_audit::cli::{self, Cli, RecipeSource};
use recipe_audit::consistency_checks::CHECK_NAMES;
use recipe_audit::db;
use recipe_audit::recipe_model::Recipe;
use recipe_audit::report::{self, Summary};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn load_recipes(args: &Cli) -> Result<Vec<Recipe>> {
    match args.source()? {
        RecipeSource::File(path) => db::load_recipes_file(&path),
        RecipeSource::Database(url) => {
            let pool = db::connect(&url).await?;
            let recipes = db::fetch_recipes(&pool).await;
            pool.close().await;
            recipes
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let args = cli::parse_args();
    init_logging(args.json_logs);

    info!("Starting recipe consistency audit");

    let config = args.audit_config()?;
    let recipes = load_recipes(&args).await?;

    for name in CHECK_NAMES {
        info!("Running check: {}", name);
    }

    let auditor = RecipeAuditor::new(CanonicalTables::standard(), config);
    let mut findings = auditor.audit_recipes(&recipes);
    report::sort_findings(&mut findings);

    report::write_csv(&args.output, &findings).context("Failed to write audit report")?;

    let summary = Summary::from_findings(recipes.len(), &findings);
    print!(
        "{}",
        report::render_summary(&summary, &findings, &args.output, auditor.config())
    );

    Ok(ExitCode::from(report::exit_status(&findings)))
}
