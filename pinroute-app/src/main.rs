use anyhow::{bail, Context};
use clap::Parser;
use pinroute::format_distance;
use pinroute::prelude::*;
use pinroute::runtime::spawners::tokio_impl::TokioSpawner;
use std::io::BufRead;
use std::path::PathBuf;

const USER_AGENT: &str = concat!("pinroute-app/", env!("CARGO_PKG_VERSION"));

const HELP: &str = "\
commands:
  click <lat> <lng>   drop a marker
  search <query>      find a place and drop a marker there
  select <id>         select marker #id
  start | dest        make the selected marker the start / destination
  deselect            drop the selected marker's role
  calc                show the route distance
  route               click the route
  drag <id> <lat> <lng>
  delete | delete-all
  fit                 fit the view to all markers
  guide | close-guide
  quit";

/// Headless pin-and-route session driven from stdin
#[derive(Debug, Parser)]
#[command(name = "pinroute-app", version, after_help = HELP)]
struct Options {
    /// Resolve addresses from a built-in table instead of Nominatim
    #[arg(long = "offline", action = clap::ArgAction::SetTrue)]
    offline: bool,
    /// JSON controller configuration
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Where the onboarding flag is kept
    #[arg(long = "state", value_name = "PATH", default_value_os_t = default_state_path())]
    state: PathBuf,
}

fn default_state_path() -> PathBuf {
    std::env::temp_dir().join("pinroute").join("state.json")
}

fn coordinate(value: Option<&str>) -> anyhow::Result<f64> {
    value
        .context("missing coordinate")?
        .parse()
        .context("coordinate is not a number")
}

fn parse_command(line: &str) -> anyhow::Result<Option<MapEvent>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let event = match command {
        "click" => MapEvent::MapClicked(LatLng::new(
            coordinate(words.next())?,
            coordinate(words.next())?,
        )),
        "search" => MapEvent::SearchSubmitted(words.collect::<Vec<_>>().join(" ")),
        "select" => MapEvent::MarkerClicked(MarkerId(
            words.next().context("missing marker id")?.parse()?,
        )),
        "drag" => MapEvent::MarkerDragged {
            id: MarkerId(words.next().context("missing marker id")?.parse()?),
            position: LatLng::new(coordinate(words.next())?, coordinate(words.next())?),
        },
        "start" => MapEvent::StartPressed,
        "dest" => MapEvent::DestinationPressed,
        "deselect" => MapEvent::DeselectPressed,
        "calc" => MapEvent::CalculatePressed,
        "route" => MapEvent::RouteClicked,
        "delete" => MapEvent::DeletePressed,
        "delete-all" => MapEvent::DeleteAllPressed,
        "fit" => MapEvent::FitMapPressed,
        "guide" => MapEvent::GuideIconPressed,
        "close-guide" => MapEvent::CloseGuidePressed,
        "quit" | "exit" => MapEvent::Shutdown,
        "help" => {
            println!("{}", HELP);
            return Ok(None);
        }
        other => bail!("unknown command {:?}", other),
    };
    Ok(Some(event))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pinroute::init_logging();
    pinroute::runtime::init_runtime(Box::new(TokioSpawner));
    let options = Options::parse();

    let config = match &options.config {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ControllerConfig::default(),
    };
    let (geocoder, search): (Arc<dyn ReverseGeocoder>, Arc<dyn PlaceSearch>) = if options.offline {
        let geocoder = Arc::new(StaticGeocoder::new().with_fallback("Unnamed road, Kraków, Polska"));
        (geocoder.clone() as Arc<dyn ReverseGeocoder>, geocoder as Arc<dyn PlaceSearch>)
    } else {
        let client = Arc::new(NominatimClient::new(USER_AGENT)?);
        (client.clone() as Arc<dyn ReverseGeocoder>, client as Arc<dyn PlaceSearch>)
    };

    let view = config.view.clone();
    let builder = ControllerBuilder::new()
        .with_config(config)
        .with_geocoder(geocoder)
        .with_guide_store(Box::new(FileGuideStore::new(&options.state)));
    let mut session = MapSession::new(
        builder,
        HeadlessSurface::with_view(view.center, view.zoom),
        HeadlessEffects::new(),
    )?
    .with_place_search(search);

    let sender = session.sender();
    std::thread::spawn(move || {
        let _ = sender.unbounded_send(MapEvent::MapIdle);
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Ok(Some(event)) => {
                    let shutdown = event == MapEvent::Shutdown;
                    if sender.unbounded_send(event).is_err() || shutdown {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{:#}", e),
            }
        }
        let _ = sender.unbounded_send(MapEvent::Shutdown);
    });

    println!("{}", HELP);
    session.run().await?;

    let controller = session.controller();
    for marker in controller.markers() {
        let role = controller
            .index_of(marker.id())
            .and_then(|index| controller.roles().role_at(index))
            .map(|role| format!(" [{}]", role))
            .unwrap_or_default();
        println!(
            "{}{} {}: {}",
            marker.id(),
            role,
            marker.position(),
            marker.address().replace("<br>", " ")
        );
    }
    if let Some(distance) = controller.distance() {
        println!("route: {}", format_distance(distance));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults_and_flags() {
        let options = Options::try_parse_from(["pinroute-app"]).unwrap();
        assert!(!options.offline);
        assert_eq!(options.config, None);
        assert_eq!(options.state, default_state_path());

        let options = Options::try_parse_from([
            "pinroute-app",
            "--offline",
            "--config",
            "view.json",
            "--state",
            "/tmp/guide.json",
        ])
        .unwrap();
        assert!(options.offline);
        assert_eq!(options.config, Some(PathBuf::from("view.json")));
        assert_eq!(options.state, PathBuf::from("/tmp/guide.json"));

        assert!(Options::try_parse_from(["pinroute-app", "--bogus"]).is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("click 50.06 19.94").unwrap(),
            Some(MapEvent::MapClicked(LatLng::new(50.06, 19.94)))
        );
        assert_eq!(
            parse_command("search Rynek Główny").unwrap(),
            Some(MapEvent::SearchSubmitted("Rynek Główny".to_string()))
        );
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("click north").is_err());
        assert!(parse_command("teleport").is_err());
    }
}
