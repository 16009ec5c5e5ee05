use clap::{Parser, Subcommand};
use league_api::client::LeagueApi;
use league_api::{Fixture, League, Standing};
use matchday::aggregate::{MonthGroup, ScheduleMode};
use matchday::config::Config;
use matchday::fetch::{Fetch, FetchState};
use matchday::refresher::PeriodicRefresher;
use matchday::store::{CachePolicy, LeagueStore};
use matchday::viewmodel::{FixtureCard, fixture_card, league_row, table_row};
use matchday::worker::{DataRequest, DataResponse, DataWorker};
use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "matchday")]
#[command(about = "Fixtures, standings and live scores for the association's leagues", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Firestore project backing the app.
    #[arg(long, env = "MATCHDAY_PROJECT", default_value = "matchday-app")]
    project: String,

    /// Override the documents endpoint (emulator or mock).
    #[arg(long, env = "MATCHDAY_DOCUMENTS_URL")]
    documents_url: Option<String>,

    /// Print view models as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the active leagues.
    Leagues,
    /// Show a league table.
    Table {
        league_id: String,
        /// Derive the table from completed fixtures instead of the
        /// published standings.
        #[arg(long)]
        derived: bool,
    },
    /// Show the month-grouped schedule for a league.
    Fixtures {
        league_id: String,
        /// Past results instead of upcoming fixtures.
        #[arg(long)]
        results: bool,
        /// Cap the number of fixtures fetched.
        #[arg(long)]
        limit: Option<u32>,
        /// Keep running and print live score updates.
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let api = match &cli.documents_url {
        Some(url) => LeagueApi::with_documents_url(url.clone()),
        None => LeagueApi::new(&cli.project),
    };
    let store = LeagueStore::new(
        api,
        CachePolicy { ttl: config.cache_ttl, capacity: config.cache_capacity },
    );

    match cli.command {
        Commands::Leagues => {
            let mut store = store;
            let fetch = Fetch::spawn(async move { store.leagues().await });
            let leagues = resolve(fetch.resolved().await)?;
            print_leagues(&leagues, cli.json)?;
        }
        Commands::Table { league_id, derived } => {
            let mut store = store;
            let id = league_id.clone();
            let fetch = Fetch::spawn(async move {
                if derived {
                    store.derived_table(&id).await
                } else {
                    store.standings(&id).await
                }
            });
            let standings = resolve(fetch.resolved().await)?;
            print_table(&league_id, &standings, cli.json)?;
        }
        Commands::Fixtures { league_id, results, limit, watch } => {
            let mode = if results { ScheduleMode::Results } else { ScheduleMode::Upcoming };
            if watch {
                run_watch(store, league_id, mode, config, cli.json).await?;
            } else {
                let mut store = store;
                let id = league_id.clone();
                let fetch =
                    Fetch::spawn(async move { store.schedule(&id, mode, limit).await });
                let months = resolve(fetch.resolved().await)?;
                print_schedule(&months, cli.json)?;
            }
        }
    }

    Ok(())
}

/// Watch mode: the worker owns the store, a refresher re-polls live scores,
/// and responses print as they arrive until Ctrl-C.
async fn run_watch(
    store: LeagueStore,
    league_id: String,
    mode: ScheduleMode,
    config: Config,
    json: bool,
) -> anyhow::Result<()> {
    let (request_tx, request_rx) = mpsc::channel::<DataRequest>(16);
    let (response_tx, mut response_rx) = mpsc::channel::<DataResponse>(16);

    let worker_task = tokio::spawn(DataWorker::new(store, request_rx, response_tx).run());
    let refresher =
        PeriodicRefresher::new(request_tx.clone(), league_id.clone(), config.refresh_interval);
    let refresher_task = tokio::spawn(refresher.run());

    let send = |request: DataRequest| {
        let tx = request_tx.clone();
        async move {
            tx.send(request)
                .await
                .map_err(|_| anyhow::anyhow!("data worker stopped"))
        }
    };
    send(DataRequest::LoadSchedule { league_id: league_id.clone(), mode }).await?;
    send(DataRequest::RefreshLive { league_id: league_id.clone() }).await?;

    loop {
        tokio::select! {
            Some(response) = response_rx.recv() => match response {
                DataResponse::Schedule { months, .. } => print_schedule(&months, json)?,
                DataResponse::LiveUpdated { fixtures, .. } => print_live(&fixtures),
                DataResponse::Error { message } => eprintln!("error: {message}"),
                _ => {}
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    worker_task.abort();
    refresher_task.abort();
    Ok(())
}

fn resolve<T>(state: FetchState<T>) -> anyhow::Result<T> {
    match state {
        FetchState::Success(value) => Ok(value),
        FetchState::Error(message) => Err(anyhow::anyhow!(message)),
        _ => Err(anyhow::anyhow!("request did not complete")),
    }
}

fn print_leagues(leagues: &[League], json: bool) -> anyhow::Result<()> {
    if json {
        let rows: Vec<_> = leagues.iter().map(league_row).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if leagues.is_empty() {
        println!("No active leagues.");
        return Ok(());
    }
    for league in leagues {
        let row = league_row(league);
        println!(
            "{:<16} {:<32} {:<8} {} (div {})",
            row.id, row.name, row.season, row.kind, row.division
        );
    }
    Ok(())
}

fn print_table(league_id: &str, standings: &[Standing], json: bool) -> anyhow::Result<()> {
    if json {
        let rows: Vec<_> = standings.iter().map(table_row).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if standings.is_empty() {
        println!("No table published for {league_id}.");
        return Ok(());
    }
    println!(
        "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>5} {:>4} {:>7}",
        "#", "Team", "P", "W", "D", "L", "GD", "Pts", "Win%"
    );
    for standing in standings {
        let row = table_row(standing);
        println!(
            "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>5} {:>4} {:>7}",
            row.position,
            row.team,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goal_difference,
            row.points,
            row.win_pct
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ScheduleOut {
    month: String,
    fixtures: Vec<FixtureCard>,
}

fn print_schedule(months: &[MonthGroup], json: bool) -> anyhow::Result<()> {
    if json {
        let out: Vec<ScheduleOut> = months
            .iter()
            .map(|group| ScheduleOut {
                month: group.label.clone(),
                fixtures: group.fixtures.iter().map(fixture_card).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if months.is_empty() {
        println!("No fixtures to show.");
        return Ok(());
    }
    for group in months {
        println!("{}", group.label);
        for fixture in &group.fixtures {
            let card = fixture_card(fixture);
            println!(
                "  {:<18} {:>20} {} {:<20} [{}]",
                card.kickoff, card.home, card.score, card.away, card.status
            );
        }
        println!();
    }
    Ok(())
}

fn print_live(fixtures: &[Fixture]) {
    if fixtures.is_empty() {
        println!("No live fixtures right now.");
        return;
    }
    for fixture in fixtures {
        let card = fixture_card(fixture);
        println!("{} {} {} [{}]", card.home, card.score, card.away, card.status);
    }
}
