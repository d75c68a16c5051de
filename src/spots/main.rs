//! One-shot spot search from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tabimap::{
    BoundingBox, Config, OverpassClient, SearchOutcome, SearchRequest, SearchStatus, SortOrder,
    SpotFilter, SpotPipeline, SpotView,
};

#[derive(Parser, Debug)]
#[command(name = "spots")]
#[command(about = "Find tourist spots inside a bounding box")]
struct Args {
    /// Bounding box: "south,west,north,east"
    #[arg(short, long, allow_hyphen_values = true)]
    bbox: Option<BoundingBox>,

    /// Category label (repeatable); the default selection is used when omitted
    #[arg(short, long = "category")]
    categories: Vec<String>,

    /// Keep only spots whose name contains this text
    #[arg(short, long)]
    keyword: Option<String>,

    /// Keep only spots with a website
    #[arg(long)]
    website: bool,

    /// Keep only spots with a Wikipedia article
    #[arg(long)]
    wikipedia: bool,

    /// Keep only spots with opening hours
    #[arg(long)]
    hours: bool,

    /// Order by distance from the centre of the box
    #[arg(long)]
    sort_distance: bool,

    /// Print JSON instead of cards
    #[arg(long)]
    json: bool,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// List the available categories and exit
    #[arg(long)]
    list_categories: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(args.config.as_deref())?;
    let catalog = config.catalog();

    if args.list_categories {
        let defaults = catalog.default_labels();
        for category in catalog.categories() {
            let marker = if defaults.contains(&category.label.as_str()) {
                "*"
            } else {
                " "
            };
            println!(
                "{} {} ({} predicates)",
                marker,
                category.label,
                category.predicates.len()
            );
        }
        return Ok(());
    }

    let bbox = args
        .bbox
        .context("--bbox is required (\"south,west,north,east\")")?;

    let categories = if args.categories.is_empty() {
        catalog
            .default_labels()
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        args.categories
    };

    let request = SearchRequest {
        bbox,
        categories,
        filter: SpotFilter {
            keyword: args.keyword,
            require_website: args.website,
            require_wikipedia: args.wikipedia,
            require_hours: args.hours,
        },
        sort: if args.sort_distance {
            SortOrder::Distance
        } else {
            SortOrder::Response
        },
    };

    info!("Searching {} for {:?}", request.bbox, request.categories);

    let client = OverpassClient::new(&config.overpass)?;
    let pipeline = SpotPipeline::new(&catalog, &client, config.overpass.server_timeout_secs);
    let outcome = pipeline
        .run(&request)
        .await
        .with_context(|| format!("Search failed for {}", request.bbox))?;

    let origin = request.bbox.center();
    let views: Vec<SpotView> = outcome
        .spots()
        .iter()
        .map(|s| SpotView::new(s, Some(origin), &config.search_link))
        .collect();

    if args.json {
        let report = JsonReport::new(&outcome, &views);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match outcome {
        SearchOutcome::EmptySelection => println!("カテゴリを選択してください。"),
        SearchOutcome::NoResults => {
            println!("この範囲には指定カテゴリのスポットが見つかりませんでした。")
        }
        SearchOutcome::Found(_) => {
            println!("{} 箇所のスポットを発見！\n", views.len());
            for view in &views {
                print_card(view);
            }
        }
    }

    Ok(())
}

/// Same `status`/`count`/`spots` shape as the `/v1/spots` response.
#[derive(Serialize)]
struct JsonReport<'a> {
    status: SearchStatus,
    count: usize,
    spots: &'a [SpotView],
}

impl<'a> JsonReport<'a> {
    fn new(outcome: &SearchOutcome, spots: &'a [SpotView]) -> Self {
        Self {
            status: outcome.status(),
            count: spots.len(),
            spots,
        }
    }
}

fn print_card(view: &SpotView) {
    println!("■ {}  [{}]", view.name, view.subtype);
    if !view.detail_labels.is_empty() {
        println!("  {}", view.detail_labels.join(" "));
    }
    if let Some(distance) = view.distance_m {
        println!("  {:.0} m from centre", distance);
    }
    if let Some(url) = &view.search_url {
        println!("  🌏 {}", url);
    }
    println!();
}
