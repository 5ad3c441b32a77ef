use std::path::PathBuf;

use clap::Parser;

use realm_viewer::generator::MapConfig;
use realm_viewer::menu::{self, MenuResult};
use realm_viewer::storage;
use realm_viewer::viewer::{self, ViewerExit};

#[derive(Parser, Debug)]
#[command(name = "realm_viewer")]
#[command(about = "Generate and explore procedural realm maps with settlements")]
struct Args {
    /// Map width in tiles
    #[arg(short = 'W', long, default_value = "4000")]
    width: usize,

    /// Map height in tiles
    #[arg(short = 'H', long, default_value = "1000")]
    height: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory for saved maps
    #[arg(long, default_value = "maps")]
    maps_dir: PathBuf,

    /// Load a saved map directly, skipping the setup menu
    #[arg(long)]
    load: Option<PathBuf>,

    /// Skip the setup menu and generate immediately
    #[arg(long)]
    no_menu: bool,
}

fn main() {
    let args = Args::parse();

    let mut config = MapConfig {
        width: args.width,
        height: args.height,
        seed: args.seed,
    };

    // Direct load: failure falls back to the menu instead of exiting, so
    // the user can pick another file.
    if let Some(ref path) = args.load {
        println!("Loading map from {}...", path.display());
        match storage::load_map(path) {
            Ok(map) => {
                println!(
                    "Map '{}' loaded: {}x{} tiles, {} settlements",
                    map.name,
                    map.width,
                    map.height,
                    map.settlements.len()
                );
                let window = viewer::create_window();
                if let ViewerExit::Quit = viewer::run_viewer(window, map, &args.maps_dir) {
                    return;
                }
            }
            Err(e) => eprintln!("Failed to load map: {}", e),
        }
    } else if args.no_menu {
        let mut window = viewer::create_window();
        let map = viewer::generate_with_progress(&mut window, &config);
        if let ViewerExit::Quit = viewer::run_viewer(window, map, &args.maps_dir) {
            return;
        }
    }

    loop {
        let result = match menu::run_menu(config.clone(), &args.maps_dir) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Menu error: {}", e);
                return;
            }
        };

        let (window, map) = match result {
            MenuResult::Quit => return,
            MenuResult::Generate(chosen) => {
                config = chosen;
                let mut window = viewer::create_window();
                let map = viewer::generate_with_progress(&mut window, &config);
                (window, map)
            }
            MenuResult::Load(map) => {
                println!(
                    "Map '{}' loaded: {}x{} tiles, {} settlements",
                    map.name,
                    map.width,
                    map.height,
                    map.settlements.len()
                );
                (viewer::create_window(), map)
            }
        };

        match viewer::run_viewer(window, map, &args.maps_dir) {
            ViewerExit::Quit => return,
            ViewerExit::ToMenu => continue,
        }
    }
}
