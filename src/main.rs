use std::env;
use std::path::PathBuf;
use std::process;
use lifegrid::config::Settings;
use lifegrid::session::{Session, LAST_GAME};
use lifegrid::{export, pattern, plaintext, Result};

const USAGE: &str = "usage: lifegrid [--config FILE] <pattern> [generations] [--image FILE]";

struct Args {
  config: PathBuf,
  pattern: PathBuf,
  generations: Option<u64>,
  image: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
  let mut config = PathBuf::from("lifegrid.cfg");
  let mut image = None;
  let mut positional = vec![];

  let mut args = env::args().skip(1);
  while let Some(arg) = args.next() {
    match arg.as_str() {
      "--config" => config = PathBuf::from(args.next()?),
      "--image" => image = Some(PathBuf::from(args.next()?)),
      _ => positional.push(arg),
    }
  }

  let mut positional = positional.into_iter();
  let pattern = PathBuf::from(positional.next()?);
  let generations = match positional.next() {
    Some(n) => Some(n.parse().ok()?),
    None => None,
  };
  if positional.next().is_some() {
    return None;
  }
  Some(Args { config, pattern, generations, image })
}

fn run(args: Args) -> Result<()> {
  let settings = Settings::load_or_create(&args.config)?;
  if !settings.debug && env::var_os("RUST_LOG").is_none() {
    log::set_max_level(log::LevelFilter::Info);
  }

  let rule = settings.rule()?;
  let decoded = pattern::load(&args.pattern)?;
  let pattern = decoded.pattern;
  if let Some(own) = pattern.rule.filter(|r| *r != rule) {
    log::warn!("{} declares {}, running under {}", args.pattern.display(), own, rule);
  }
  let name = pattern.name.clone()
    .or_else(|| Some(args.pattern.file_stem()?.to_string_lossy().into_owned()))
    .unwrap_or_else(|| LAST_GAME.to_owned());

  let mut session = Session::new(settings.rows, settings.columns, rule);
  session.place(&pattern);

  session.begin_evolution();
  if !session.live_region().is_empty() {
    let path = settings.library.join(format!("{}.cells", LAST_GAME));
    session.save(LAST_GAME, path)?;
  }

  let mut remaining = args.generations;
  while remaining != Some(0) {
    if session.tick().is_none() {
      break;
    }
    remaining = remaining.map(|n| n - 1);
  }

  let census = session.census();
  let (min, max) = session.population_range();
  log::info!(
    "generation {}: population {} [{}-{}] births {} survivals {} deaths {}",
    session.generation(), census.population, min, max,
    census.births, census.survivals, census.deaths,
  );

  match plaintext::write(session.grid(), session.live_region(), &name) {
    Ok(text) => print!("{}", text),
    Err(lifegrid::Error::EmptyRegion) => log::info!("nothing left alive"),
    Err(e) => return Err(e),
  }

  if let Some(path) = args.image {
    export::save_image(session.grid(), settings.cell_width, path)?;
  }
  Ok(())
}

fn main() {
  let args = match parse_args() {
    Some(args) => args,
    None => {
      eprintln!("{}", USAGE);
      process::exit(2);
    }
  };

  // Settings decide the default level, but their own errors must be logged.
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

  if let Err(e) = run(args) {
    log::error!("{}", e);
    process::exit(1);
  }
}
