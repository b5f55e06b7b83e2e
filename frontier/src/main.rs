use commons::log::{error, info, LevelFilter};
use commons::persistence::Save;
use frontier::args::Args;
use frontier::transfer::FlatBundle;
use frontier::{generate, GenerationError};
use futures::executor::{block_on, ThreadPool};
use futures::task::SpawnExt;
use simple_logger::SimpleLogger;
use std::env;
use std::fs::File;
use std::io::BufWriter;

fn export(bundle: &FlatBundle, path: &str) -> Result<(), GenerationError> {
    let file = File::create(path).map_err(|source| GenerationError::Output {
        path: path.to_string(),
        source,
    })?;
    serde_json::to_writer(BufWriter::new(file), bundle).map_err(|source| {
        GenerationError::Export {
            path: path.to_string(),
            source,
        }
    })
}

fn run(args: Args) -> Result<(), GenerationError> {
    let saved = args.saved_map()?;
    let output = args.output();

    let thread_pool = ThreadPool::new().map_err(GenerationError::Workers)?;
    let request = saved.clone();
    let handle = thread_pool.spawn_with_handle(async move {
        let generation = generate(&request)?;
        FlatBundle::new(&generation, &request.parameters)
    })?;
    let bundle = block_on(handle)?;

    let map_path = format!("{}.map", output);
    saved.save(&map_path)?;
    info!("Saved {}", map_path);

    let json_path = format!("{}.json", output);
    export(&bundle, &json_path)?;
    info!("Exported {}", json_path);
    Ok(())
}

fn main() {
    if let Err(err) = SimpleLogger::new().with_level(LevelFilter::Info).init() {
        eprintln!("Could not start logger: {}", err);
    }

    let result = Args::new(env::args().collect()).and_then(run);
    if let Err(err) = result {
        error!("{}", err);
        std::process::exit(1);
    }
}
