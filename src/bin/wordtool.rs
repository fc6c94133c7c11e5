use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use word_info::cache::ResponseCache;
use word_info::remote::RhymeBrainClient;
use word_info::resolver::{RelationKind, RelationResolver};
use word_info::settings::{parse_settings_toml, Settings};

#[derive(Parser)]
#[command(name = "wordtool", about = "Word relation lookups and cache maintenance")]
struct Cli {
    /// Path to a settings TOML file (optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Exact rhymes for a word
    Rhymes {
        word: String,
        /// Output as JSON instead of one word per line
        #[arg(long)]
        json: bool,
    },

    /// Half-rhymes for a word
    HalfRhymes {
        word: String,
        /// Output as JSON instead of one word per line
        #[arg(long)]
        json: bool,
    },

    /// Portmanteaus for a word
    Portmanteaus {
        word: String,
        /// Output as JSON instead of one word per line
        #[arg(long)]
        json: bool,
    },

    /// Drop cached entries for a word (all relation kinds)
    Purge { word: String },
}

fn main() {
    word_info::trace_init::init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(cli.config.as_deref())?;
    let cache_dir = cli
        .cache_dir
        .clone()
        .unwrap_or_else(|| settings.cache.dir.clone());

    match &cli.command {
        Command::Rhymes { word, json } => {
            lookup(&settings, cache_dir, word, RelationKind::Rhymes, *json)
        }
        Command::HalfRhymes { word, json } => {
            lookup(&settings, cache_dir, word, RelationKind::HalfRhymes, *json)
        }
        Command::Portmanteaus { word, json } => {
            lookup(&settings, cache_dir, word, RelationKind::Portmanteaus, *json)
        }
        Command::Purge { word } => {
            let cache = ResponseCache::new(cache_dir);
            for kind in [
                RelationKind::Rhymes,
                RelationKind::HalfRhymes,
                RelationKind::Portmanteaus,
            ] {
                cache.delete(&kind.cache_key(word))?;
            }
            Ok(())
        }
    }
}

fn load_settings(config: Option<&std::path::Path>) -> Result<Settings, Box<dyn std::error::Error>> {
    match config {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(parse_settings_toml(&content)?)
        }
        None => Ok(Settings::default()),
    }
}

fn lookup(
    settings: &Settings,
    cache_dir: PathBuf,
    word: &str,
    kind: RelationKind,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let cache = ResponseCache::new(cache_dir);
    let service = RhymeBrainClient::new(settings.service.base_url.clone());
    let resolver = RelationResolver::new(cache, Box::new(service));

    let words = resolver.resolve(word, kind)?;
    if json {
        println!("{}", serde_json::to_string(&words)?);
    } else {
        for w in &words {
            println!("{w}");
        }
    }
    Ok(())
}
