use crate::error::GenerationError;
use crate::parameters::{Parameters, SavedMap};
use commons::persistence::Load;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub enum Args {
    New {
        seed: u32,
        spacing: f32,
        output: String,
    },
    Load {
        path: String,
    },
}

impl Args {
    pub fn new(args: Vec<String>) -> Result<Args, GenerationError> {
        if args.len() > 3 {
            Ok(Args::New {
                seed: args[1]
                    .parse()
                    .map_err(|_| GenerationError::invalid("seed", &args[1]))?,
                spacing: args[2]
                    .parse()
                    .map_err(|_| GenerationError::invalid("spacing", &args[2]))?,
                output: args[3].clone(),
            })
        } else if args.len() == 2 {
            Ok(Args::Load {
                path: args[1].clone(),
            })
        } else {
            Err(GenerationError::invalid(
                "arguments",
                args.iter().skip(1).cloned().collect::<Vec<_>>().join(" "),
            ))
        }
    }

    /// Output path without extension.
    pub fn output(&self) -> String {
        match self {
            Args::New { output, .. } => output.clone(),
            Args::Load { path } => Path::new(path)
                .with_extension("")
                .to_string_lossy()
                .into_owned(),
        }
    }

    pub fn saved_map(&self) -> Result<SavedMap, GenerationError> {
        match self {
            Args::New { seed, spacing, .. } => Ok(SavedMap {
                parameters: Parameters {
                    mesh_seed: *seed,
                    spacing: *spacing,
                    ..Parameters::default()
                },
                ..SavedMap::default()
            }),
            Args::Load { path } => Ok(SavedMap::load(path)?),
        }
    }
}
