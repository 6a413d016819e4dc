use anyhow::Result;
use cocktails_to_sqlite::{
    cli::{Cli, Commands, QuerySelection},
    fetch::{fetch_all, read_listings, CacheManager, CocktailClient},
    filter::resolve_queries,
    query::{get_query, query_names, run_report, Report},
    writer::{write_to_sqlite, SqliteWriter},
    LogUi, Phase, Ui, UiApp,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn init_logging(quiet: bool) -> Result<()> {
    let filter =
        EnvFilter::from_default_env().add_directive("cocktails_to_sqlite=info".parse()?);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // The full-screen UI owns the terminal; log lines would tear it
    if quiet {
        builder.with_writer(std::io::sink).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let tui = matches!(cli.command, Commands::Sync { tui: true, .. });
    init_logging(tui)?;

    match cli.command {
        Commands::Sync {
            output_db,
            force,
            fresh,
            cache_dir,
            api_url,
            queries,
            tui,
        } => {
            let start = Instant::now();
            let options = SyncOptions {
                output_db,
                force,
                fresh,
                cache_dir,
                api_url,
                queries,
            };

            if tui {
                let mut ui = UiApp::new()?;
                match sync(&options, &mut ui) {
                    Ok(report) => {
                        ui.finish(&report)?;
                        println!("{}", report);
                    }
                    Err(e) => {
                        ui.restore()?;
                        return Err(e);
                    }
                }
            } else {
                let report = sync(&options, &mut LogUi::new())?;
                println!("{}", report);
            }

            tracing::info!(elapsed_secs = start.elapsed().as_secs_f64(), "Sync finished");
        }

        Commands::Fetch {
            output,
            force,
            api_url,
        } => {
            let cache = CacheManager::new(output)?;
            let client = CocktailClient::new(api_url)?;
            let partitions = fetch_all(&client, &cache, force, &mut LogUi::new())?;
            let drinks: usize = partitions.iter().map(Vec::len).sum();
            println!(
                "{} drinks in {} listings cached in {:?}",
                drinks,
                partitions.len(),
                cache.cache_dir()
            );
        }

        Commands::Load {
            input_dir,
            output_db,
            fresh,
        } => {
            let start = Instant::now();
            let recipes: Vec<_> = read_listings(&input_dir)?.into_iter().flatten().collect();
            let (batch, summary) =
                write_to_sqlite(&recipes, &output_db, fresh, &mut LogUi::new())?;
            println!(
                "Loaded {:?}: {} rows written, {} rejected, {} drinks from {} recipes in {:.1}s",
                output_db,
                summary.inserted,
                summary.failed,
                batch.drinks.len(),
                recipes.len(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Report { db, queries } => {
            let selected = resolve_queries(queries.include, queries.exclude)?;
            let writer = SqliteWriter::open(&db)?;
            println!("{}", run_report(writer.connection(), &selected));
        }

        Commands::Drop { db } => {
            let writer = SqliteWriter::open(&db)?;
            let failures = writer.drop_tables(&mut LogUi::new());
            if failures > 0 {
                tracing::warn!(failures, "Some tables could not be dropped");
            }
        }

        Commands::ListQueries => {
            println!("Available queries:\n");
            for name in query_names() {
                if let Some(query) = get_query(name) {
                    println!("  {:18} {}", name, query.title);
                }
            }
        }
    }

    Ok(())
}

struct SyncOptions {
    output_db: PathBuf,
    force: bool,
    fresh: bool,
    cache_dir: Option<PathBuf>,
    api_url: String,
    queries: QuerySelection,
}

/// Fetch, load and query
fn sync(options: &SyncOptions, ui: &mut impl Ui) -> Result<Report> {
    let selected = resolve_queries(
        options.queries.include.clone(),
        options.queries.exclude.clone(),
    )?;

    ui.set_phase(Phase::Fetching);
    let cache = CacheManager::new(options.cache_dir.clone())?;
    ui.set_info(format!("Cache: {}", cache.cache_dir().display()));
    let client = CocktailClient::new(options.api_url.as_str())?;
    let partitions = fetch_all(&client, &cache, options.force, ui)?;
    let recipes: Vec<_> = partitions.into_iter().flatten().collect();
    ui.log(format!("Fetched {} recipes", recipes.len()));

    let (_, summary) = write_to_sqlite(&recipes, &options.output_db, options.fresh, ui)?;
    ui.set_info(format!(
        "{}: {} rows written, {} rejected",
        options.output_db.display(),
        summary.inserted,
        summary.failed
    ));

    ui.set_phase(Phase::Querying);
    let writer = SqliteWriter::open(&options.output_db)?;
    Ok(run_report(writer.connection(), &selected))
}
