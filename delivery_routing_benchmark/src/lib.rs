//! Loads the delivery scenarios used by the tests and benches of `delivery_routing`. A scenario
//! set `name` consists of the map text in `maps/<name>.map` and a list of delivery requests
//! with their optimal cost in `scenarios/<name>.csv`, both relative to a common root.
use csv::ReaderBuilder;
use grid_util::point::Point;
use serde::Deserialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const MAP_DIR: &str = "maps";
const SCENARIO_DIR: &str = "scenarios";

#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse scenario file {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("could not list maps below {}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("unknown benchmark {0}")]
    Unknown(String),
}

/// One delivery request and the cost of a cheapest route for it.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    pub start_x: i32,
    pub start_y: i32,
    pub goal_x: i32,
    pub goal_y: i32,
    pub cost: u64,
}

impl Scenario {
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn goal(&self) -> Point {
        Point::new(self.goal_x, self.goal_y)
    }
}

#[derive(Clone, Debug)]
pub struct Benchmark {
    pub name: String,
    /// Unparsed map text.
    pub map: String,
    pub scenarios: Vec<Scenario>,
}

fn load_benchmark(root: &Path, name: &str) -> Result<Benchmark, BenchmarkError> {
    let map_path = root.join(MAP_DIR).join(format!("{}.map", name));
    let map = fs::read_to_string(&map_path).map_err(|source| BenchmarkError::Io {
        path: map_path.clone(),
        source,
    })?;

    let scenario_path = root.join(SCENARIO_DIR).join(format!("{}.csv", name));
    let csv_error = |source| BenchmarkError::Csv {
        path: scenario_path.clone(),
        source,
    };
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&scenario_path)
        .map_err(csv_error)?;
    let scenarios = csv_reader
        .deserialize()
        .collect::<Result<Vec<Scenario>, _>>()
        .map_err(csv_error)?;

    Ok(Benchmark {
        name: name.to_owned(),
        map,
        scenarios,
    })
}

/// Names of all maps below `root/maps`, sorted. Maps in subdirectories are named by their
/// relative path, e.g. `city/harbour`.
pub fn get_benchmark_names(root: &Path) -> Result<Vec<String>, BenchmarkError> {
    let map_root = root.join(MAP_DIR);
    let mut names = Vec::new();
    for entry in WalkDir::new(&map_root) {
        let entry = entry.map_err(|source| BenchmarkError::Walk {
            path: map_root.clone(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension() != Some(OsStr::new("map")) {
            continue;
        }
        if let Ok(rel_path) = path.with_extension("").strip_prefix(&map_root) {
            let name = rel_path
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

pub fn get_benchmark(root: &Path, name: &str) -> Result<Benchmark, BenchmarkError> {
    if get_benchmark_names(root)?.iter().any(|n| n == name) {
        load_benchmark(root, name)
    } else {
        Err(BenchmarkError::Unknown(name.to_owned()))
    }
}
