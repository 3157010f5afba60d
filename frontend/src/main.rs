#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use rayon::prelude::*;

use gputile::common::{SpaceIndex, TileSize, GPU_MAX_THREADS};
use gputile::counts::brute_force_count;
use gputile::pprint::{pprint_points, PointPrintStyle};
use gputile::task::TileTask;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Thread budget shared by all tiled dimensions
    #[arg(long, short, default_value_t = GPU_MAX_THREADS)]
    budget: TileSize,

    /// Table style
    #[arg(long, value_enum, default_value_t = PointPrintStyle::Compact)]
    style: PointPrintStyle,

    #[command(subcommand)]
    subcmd: Subcommand,
}

#[derive(clap::Subcommand)]
enum Subcommand {
    #[command(about = "Print the number of tile configurations for a loop band")]
    Size {
        /// Trip counts, innermost loop first
        #[arg(required = true)]
        bounds: Vec<TileSize>,
    },
    #[command(about = "Print the tile configuration at an index")]
    Get {
        index: SpaceIndex,
        /// Trip counts, innermost loop first
        #[arg(required = true)]
        bounds: Vec<TileSize>,
        /// Print the configuration as a JSON record
        #[arg(long)]
        json: bool,
    },
    // Bounds are a comma-separated flag here because the positional list holds the tiles.
    #[command(about = "Print the index of a tile configuration")]
    Rank {
        /// Comma-separated trip counts, innermost loop first
        #[arg(long, value_delimiter = ',', required = true)]
        bounds: Vec<TileSize>,
        /// Tile sizes, innermost loop first
        #[arg(required = true)]
        tiles: Vec<TileSize>,
    },
    #[command(about = "List a range of tile configurations")]
    List {
        /// Trip counts, innermost loop first
        #[arg(required = true)]
        bounds: Vec<TileSize>,
        #[arg(long, default_value_t = 0)]
        start: SpaceIndex,
        #[arg(long, short)]
        limit: Option<u64>,
    },
    #[command(about = "Check the space against nested enumeration and round-trip every index")]
    Check {
        /// Trip counts, innermost loop first
        #[arg(required = true)]
        bounds: Vec<TileSize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    match &args.subcmd {
        Subcommand::Size { bounds } => {
            let task = TileTask::with_budget("size", bounds, args.budget)?;
            println!("{}", task.space().size());
        }
        Subcommand::Get {
            index,
            bounds,
            json,
        } => {
            let task = TileTask::with_budget("get", bounds, args.budget)?;
            let point = task.config(*index)?;
            if *json {
                println!("{}", point.to_json()?);
            } else {
                pprint_points([&point], args.style);
            }
        }
        Subcommand::Rank { bounds, tiles } => {
            let task = TileTask::with_budget("rank", bounds, args.budget)?;
            println!("{}", task.space().rank(tiles)?);
        }
        Subcommand::List {
            bounds,
            start,
            limit,
        } => {
            let task = TileTask::with_budget("list", bounds, args.budget)?;
            let end = match limit {
                Some(l) => start.saturating_add(*l),
                None => SpaceIndex::MAX,
            };
            let points = task.space().iter_range(*start..end).collect::<Vec<_>>();
            pprint_points(&points, args.style);
        }
        Subcommand::Check { bounds } => check(bounds, args.budget)?,
    }
    Ok(())
}

fn check(bounds: &[TileSize], budget: TileSize) -> Result<()> {
    let task = TileTask::with_budget("check", bounds, budget)?;
    let space = task.space();

    let start_time = std::time::Instant::now();
    let expected = brute_force_count(bounds, budget);
    info!("Nested enumeration took {:?}", start_time.elapsed());
    if space.size() != expected {
        bail!(
            "Space size {} does not match nested enumeration count {}",
            space.size(),
            expected
        );
    }

    let start_time = std::time::Instant::now();
    (0..space.size()).into_par_iter().try_for_each(|index| -> Result<()> {
        let tiles = space.unrank(index)?;
        let ranked = space.rank(&tiles)?;
        if ranked != index {
            bail!("Index {} unranked to {:?}, which ranks to {}", index, tiles, ranked);
        }
        Ok(())
    })?;
    info!("Round-tripped {} indices in {:?}", space.size(), start_time.elapsed());

    println!("OK: {} tile configurations", space.size());
    Ok(())
}
