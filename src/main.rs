//! Windowed entry point for the platformer.
//!
//! Builds a Bevy app with the level, gameplay, and presentation plugins and
//! runs the frame loop until the window closes.
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use ledge::level::{LevelSettings, LevelSource};
use ledge::logging;
use ledge::presentation::PresentationPlugin;
use ledge::systems::GamePlugin;
use ledge::LevelPlugin;

/// Command-line options.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Enable verbose (debug) logging.
    #[arg(short, long)]
    verbose: bool,

    /// Level document to load: a filesystem path or an http(s) URL.
    #[arg(short, long)]
    level: Option<String>,
}

fn parse_level_arg(raw: &str) -> LevelSource {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        LevelSource::Http(raw.to_owned())
    } else {
        LevelSource::File(raw.into())
    }
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut settings = LevelSettings::default();
    if let Some(raw) = args.level.as_deref() {
        settings.source = parse_level_arg(raw);
    }

    // env_logger owns log output; Bevy's LogPlugin would double-install a
    // tracing subscriber.
    App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .insert_resource(settings)
        .add_plugins((LevelPlugin, GamePlugin, PresentationPlugin))
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_parse_as_http_sources() {
        assert_eq!(
            parse_level_arg("https://example.test/level1.json"),
            LevelSource::Http("https://example.test/level1.json".to_owned())
        );
    }

    #[test]
    fn plain_paths_parse_as_file_sources() {
        assert_eq!(
            parse_level_arg("assets/levels/level1.json"),
            LevelSource::File("assets/levels/level1.json".into())
        );
    }
}
