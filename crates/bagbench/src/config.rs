//! Suite configuration loaded from a TOML file.
//!
//! ```toml
//! repetitions = 20
//! sweep = [1, 2, 4, 6, 8]
//!
//! [[library]]
//! name = "bags"
//! path = "concurrentBagsSimple.so"
//!
//! [[benchmark]]
//! name = "benchrand_10000"
//! library = "bags"
//! symbol = "benchmark_random"
//! parameters = [100000]
//! ```
//!
//! Relative paths resolve against the directory of the file. `BAGBENCH_BASEDIR`
//! and `BAGBENCH_REPETITIONS` override the file's top-level values.

use crate::errors::{BenchError, BenchResult};
use crate::ffi::MAX_FOREIGN_PARAMETERS;
use crate::measure::Measure;
use crate::plan::{BenchmarkPlan, SweepValue};
use crate::runners::BenchmarkSuite;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const BASEDIR_ENV: &str = "BAGBENCH_BASEDIR";
pub const REPETITIONS_ENV: &str = "BAGBENCH_REPETITIONS";

const DEFAULT_REPETITIONS: usize = 20;
const DEFAULT_SWEEP: [i32; 5] = [1, 2, 4, 6, 8];
const DEFAULT_NUM_ELEMS: i32 = 100000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Root of the `data/` output tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basedir: Option<PathBuf>,
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,
    #[serde(default = "default_sweep")]
    pub sweep: Vec<i32>,
    #[serde(default, rename = "library")]
    pub libraries: Vec<LibraryConfig>,
    #[serde(default, rename = "benchmark")]
    pub benchmarks: Vec<BenchmarkConfig>,
}

/// A shared object exporting benchmark entry points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub name: String,
    pub library: String,
    pub symbol: String,
    #[serde(default)]
    pub parameters: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<Vec<i32>>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_repetitions() -> usize {
    DEFAULT_REPETITIONS
}

fn default_sweep() -> Vec<i32> {
    DEFAULT_SWEEP.to_vec()
}

fn default_enabled() -> bool {
    true
}

impl Default for SuiteConfig {
    /// The thread sweep over the bag and queue workloads.
    ///
    /// Names carry no leading space, so output lands in
    /// `data/benchrand_10000/` and `--only benchrand_10000` selects it.
    fn default() -> Self {
        let bench = |name: &str, library: &str, symbol: &str| BenchmarkConfig {
            name: name.to_string(),
            library: library.to_string(),
            symbol: symbol.to_string(),
            parameters: vec![DEFAULT_NUM_ELEMS],
            repetitions: None,
            sweep: None,
            enabled: true,
        };

        Self {
            basedir: None,
            repetitions: DEFAULT_REPETITIONS,
            sweep: default_sweep(),
            libraries: vec![
                LibraryConfig {
                    name: "bags".to_string(),
                    path: PathBuf::from("concurrentBagsSimple.so"),
                },
                LibraryConfig {
                    name: "queue".to_string(),
                    path: PathBuf::from("queue.so"),
                },
            ],
            benchmarks: vec![
                bench("benchrand_10000", "bags", "benchmark_random"),
                bench("benchrand_10000_queue", "queue", "benchmark_random"),
                bench("bench_add_remove_10000", "bags", "benchmark_add_remove"),
                bench("bench_half_half_10000", "bags", "benchmark_half_half"),
                bench("bench_one_producer_10000", "bags", "benchmark_one_producer"),
                bench("bench_one_consumer_10000", "bags", "benchmark_one_consumer"),
            ],
        }
    }
}

impl SuiteConfig {
    /// Parse a suite from TOML without touching the filesystem
    pub fn from_string(config: &str) -> BenchResult<Self> {
        let suite: SuiteConfig = toml::from_str(config)?;
        Ok(suite)
    }

    /// Load a suite file, resolving relative paths against its directory,
    /// then apply environment overrides and validate.
    pub fn from_path(path: &Path) -> BenchResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BenchError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut suite = Self::from_string(&content)?;
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        suite.resolve_relative_to(root);
        suite.apply_env_overrides()?;
        suite.validate()?;
        Ok(suite)
    }

    /// The default suite rooted at `root`, with overrides applied
    pub fn default_in(root: &Path) -> BenchResult<Self> {
        let mut suite = Self::default();
        suite.resolve_relative_to(root);
        suite.apply_env_overrides()?;
        suite.validate()?;
        Ok(suite)
    }

    pub fn resolve_relative_to(&mut self, root: &Path) {
        let basedir = match self.basedir.take() {
            Some(dir) if dir.is_relative() => root.join(dir),
            Some(dir) => dir,
            None => root.to_path_buf(),
        };
        self.basedir = Some(basedir);
        for lib in self.libraries.iter_mut() {
            if lib.path.is_relative() {
                lib.path = root.join(&lib.path);
            }
        }
    }

    pub fn apply_env_overrides(&mut self) -> BenchResult<()> {
        if let Ok(dir) = env::var(BASEDIR_ENV) {
            self.basedir = Some(PathBuf::from(dir));
        }
        if let Ok(reps) = env::var(REPETITIONS_ENV) {
            self.repetitions = reps.trim().parse().map_err(|_| {
                BenchError::ConfigError(format!(
                    "{} must be a positive integer, got '{}'",
                    REPETITIONS_ENV, reps
                ))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> BenchResult<()> {
        let mut libraries = HashSet::new();
        for lib in &self.libraries {
            if !libraries.insert(lib.name.as_str()) {
                return Err(BenchError::ConfigError(format!(
                    "library '{}' is declared twice",
                    lib.name
                )));
            }
        }

        let mut names = HashSet::new();
        for bench in &self.benchmarks {
            if !names.insert(bench.name.as_str()) {
                return Err(BenchError::ConfigError(format!(
                    "benchmark '{}' is declared twice",
                    bench.name
                )));
            }
            if !libraries.contains(bench.library.as_str()) {
                return Err(BenchError::ConfigError(format!(
                    "benchmark '{}' uses undeclared library '{}'",
                    bench.name, bench.library
                )));
            }
            if bench.parameters.len() > MAX_FOREIGN_PARAMETERS {
                return Err(BenchError::ConfigError(format!(
                    "benchmark '{}' has {} parameters, at most {} are supported",
                    bench.name,
                    bench.parameters.len(),
                    MAX_FOREIGN_PARAMETERS
                )));
            }
            if self.repetitions_for(bench) == 0 {
                return Err(BenchError::ConfigError(format!(
                    "benchmark '{}' needs at least one repetition",
                    bench.name
                )));
            }
            if self.sweep_for(bench).is_empty() {
                return Err(BenchError::ConfigError(format!(
                    "benchmark '{}' has an empty sweep",
                    bench.name
                )));
            }
        }
        Ok(())
    }

    pub fn basedir(&self) -> PathBuf {
        self.basedir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn library(&self, name: &str) -> Option<&LibraryConfig> {
        self.libraries.iter().find(|l| l.name == name)
    }

    pub fn repetitions_for(&self, bench: &BenchmarkConfig) -> usize {
        bench.repetitions.unwrap_or(self.repetitions)
    }

    pub fn sweep_for(&self, bench: &BenchmarkConfig) -> Vec<SweepValue> {
        bench
            .sweep
            .as_deref()
            .unwrap_or(&self.sweep)
            .iter()
            .copied()
            .map(SweepValue)
            .collect()
    }

    /// Enabled benchmarks, narrowed to `only` when it is not empty
    pub fn selected<'a>(&'a self, only: &'a [String]) -> BenchResult<Vec<&'a BenchmarkConfig>> {
        for name in only {
            if !self.benchmarks.iter().any(|b| &b.name == name) {
                return Err(BenchError::ConfigError(format!(
                    "no benchmark named '{}'",
                    name
                )));
            }
        }
        Ok(self
            .benchmarks
            .iter()
            .filter(|b| b.enabled || only.contains(&b.name))
            .filter(|b| only.is_empty() || only.contains(&b.name))
            .collect())
    }

    /// Build plans for the selected benchmarks, binding each one's
    /// measurement through `bind`
    pub fn build_suite<F>(&self, only: &[String], mut bind: F) -> BenchResult<BenchmarkSuite>
    where
        F: FnMut(&BenchmarkConfig, &LibraryConfig) -> anyhow::Result<Box<dyn Measure>>,
    {
        let basedir = self.basedir();
        let mut suite = BenchmarkSuite::default();
        for bench in self.selected(only)? {
            let library = self.library(&bench.library).ok_or_else(|| {
                BenchError::ConfigError(format!(
                    "benchmark '{}' uses undeclared library '{}'",
                    bench.name, bench.library
                ))
            })?;
            let measure = bind(bench, library).map_err(|e| {
                BenchError::ConfigError(format!(
                    "failed to bind '{}' from {}: {:#}",
                    bench.symbol,
                    library.path.display(),
                    e
                ))
            })?;
            suite.push(BenchmarkPlan::new(
                measure,
                bench.parameters.clone(),
                self.repetitions_for(bench),
                self.sweep_for(bench),
                basedir.clone(),
                bench.name.clone(),
            )?);
        }
        Ok(suite)
    }

    pub fn to_toml_string(&self) -> BenchResult<String> {
        toml::to_string_pretty(self).map_err(|e| BenchError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Measurement;
    use serial_test::serial;
    use tempfile::tempdir;

    const SUITE: &str = r#"
basedir = "out"
repetitions = 5
sweep = [1, 2, 4]

[[library]]
name = "bags"
path = "libbags.so"

[[library]]
name = "queue"
path = "/opt/bench/queue.so"

[[benchmark]]
name = "rand"
library = "bags"
symbol = "benchmark_random"
parameters = [100000]

[[benchmark]]
name = "queue_rand"
library = "queue"
symbol = "benchmark_random"
parameters = [5000]
repetitions = 2
sweep = [8, 16]

[[benchmark]]
name = "slow"
library = "bags"
symbol = "benchmark_half_half"
enabled = false
"#;

    fn stub(_: &BenchmarkConfig, _: &LibraryConfig) -> anyhow::Result<Box<dyn Measure>> {
        Ok(Box::new(
            |_: SweepValue, _: &[i32]| -> anyhow::Result<Measurement> { Ok(Measurement::default()) },
        ))
    }

    #[test]
    fn test_parse_suite() {
        let suite = SuiteConfig::from_string(SUITE).unwrap();
        assert_eq!(suite.repetitions, 5);
        assert_eq!(suite.sweep, vec![1, 2, 4]);
        assert_eq!(suite.libraries.len(), 2);
        assert_eq!(suite.benchmarks.len(), 3);

        let queue = &suite.benchmarks[1];
        assert_eq!(suite.repetitions_for(queue), 2);
        assert_eq!(suite.sweep_for(queue), vec![SweepValue(8), SweepValue(16)]);

        let rand = &suite.benchmarks[0];
        assert_eq!(suite.repetitions_for(rand), 5);
        assert_eq!(rand.parameters, vec![100000]);
        assert!(!suite.benchmarks[2].enabled);
        assert!(suite.benchmarks[2].parameters.is_empty());
    }

    #[test]
    fn test_missing_top_level_values_use_defaults() {
        let suite = SuiteConfig::from_string("").unwrap();
        assert_eq!(suite.repetitions, 20);
        assert_eq!(suite.sweep, vec![1, 2, 4, 6, 8]);
        assert!(suite.benchmarks.is_empty());
    }

    #[test]
    #[serial]
    fn test_from_path_resolves_relative_paths() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("suite.toml");
        fs::write(&file, SUITE).unwrap();

        temp_env::with_vars_unset([BASEDIR_ENV, REPETITIONS_ENV], || {
            let suite = SuiteConfig::from_path(&file).unwrap();
            assert_eq!(suite.basedir(), tmp.path().join("out"));
            assert_eq!(suite.library("bags").unwrap().path, tmp.path().join("libbags.so"));
            assert_eq!(
                suite.library("queue").unwrap().path,
                PathBuf::from("/opt/bench/queue.so")
            );
        });
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                (BASEDIR_ENV, Some("/srv/results")),
                (REPETITIONS_ENV, Some("3")),
            ],
            || {
                let suite = SuiteConfig::default_in(Path::new("/work")).unwrap();
                assert_eq!(suite.basedir(), PathBuf::from("/srv/results"));
                assert_eq!(suite.repetitions, 3);
                assert_eq!(
                    suite.library("bags").unwrap().path,
                    PathBuf::from("/work/concurrentBagsSimple.so")
                );
            },
        );
    }

    #[test]
    #[serial]
    fn test_bad_repetitions_override() {
        temp_env::with_var(REPETITIONS_ENV, Some("many"), || {
            let err = SuiteConfig::default_in(Path::new(".")).unwrap_err();
            assert!(matches!(err, BenchError::ConfigError(_)));
        });
    }

    #[test]
    fn test_validate_rejects_unknown_library() {
        let mut suite = SuiteConfig::from_string(SUITE).unwrap();
        suite.benchmarks[0].library = "missing".to_string();
        let err = suite.validate().unwrap_err();
        assert!(err.to_string().contains("undeclared library 'missing'"));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let mut suite = SuiteConfig::from_string(SUITE).unwrap();
        suite.benchmarks[1].name = "rand".to_string();
        assert!(suite.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_too_many_parameters() {
        let mut suite = SuiteConfig::from_string(SUITE).unwrap();
        suite.benchmarks[0].parameters = vec![1, 2, 3, 4];
        assert!(suite.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_repetitions() {
        let mut suite = SuiteConfig::from_string(SUITE).unwrap();
        suite.repetitions = 0;
        assert!(suite.validate().is_err());
    }

    #[test]
    fn test_selection_skips_disabled_unless_named() {
        let suite = SuiteConfig::from_string(SUITE).unwrap();
        let all: Vec<_> = suite.selected(&[]).unwrap().iter().map(|b| b.name.clone()).collect();
        assert_eq!(all, vec!["rand", "queue_rand"]);

        let only = vec!["slow".to_string()];
        let picked: Vec<_> = suite.selected(&only).unwrap().iter().map(|b| b.name.clone()).collect();
        assert_eq!(picked, vec!["slow"]);

        assert!(suite.selected(&["nope".to_string()]).is_err());
    }

    #[test]
    fn test_build_suite_binds_each_selected_benchmark() {
        let suite = SuiteConfig::from_string(SUITE).unwrap();
        let mut bound = Vec::new();
        let plans = suite
            .build_suite(&[], |bench, lib| {
                bound.push((bench.symbol.clone(), lib.name.clone()));
                stub(bench, lib)
            })
            .unwrap();

        assert_eq!(plans.len(), 2);
        assert_eq!(plans.plans()[1].name(), "queue_rand");
        assert_eq!(plans.plans()[1].repetitions(), 2);
        assert_eq!(plans.plans()[1].parameters(), &[5000]);
        assert_eq!(
            bound,
            vec![
                ("benchmark_random".to_string(), "bags".to_string()),
                ("benchmark_random".to_string(), "queue".to_string()),
            ]
        );
    }

    #[test]
    fn test_bind_failure_is_reported() {
        let suite = SuiteConfig::from_string(SUITE).unwrap();
        let err = suite
            .build_suite(&[], |_, _| Err(anyhow::anyhow!("undefined symbol")))
            .unwrap_err();
        assert!(err.to_string().contains("undefined symbol"));
        assert!(err.to_string().contains("benchmark_random"));
    }

    #[test]
    fn test_default_suite_names_are_trimmed() {
        let suite = SuiteConfig::default();
        let plans = suite.build_suite(&[], stub).unwrap();
        let names: Vec<&str> = plans.plans().iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "benchrand_10000",
                "benchrand_10000_queue",
                "bench_add_remove_10000",
                "bench_half_half_10000",
                "bench_one_producer_10000",
                "bench_one_consumer_10000",
            ]
        );
        for plan in plans.plans() {
            assert_eq!(plan.name(), plan.name().trim());
            assert_eq!(plan.parameters(), &[100000]);
            assert_eq!(plan.repetitions(), 20);
        }
    }

    #[test]
    fn test_default_suite_round_trips_through_toml() {
        let suite = SuiteConfig::default();
        suite.validate().unwrap();
        assert_eq!(suite.benchmarks.len(), 6);
        assert_eq!(suite.benchmarks[1].library, "queue");

        let text = suite.to_toml_string().unwrap();
        assert_eq!(SuiteConfig::from_string(&text).unwrap(), suite);
    }
}
