use anyhow::{bail, Context, Result};
use bagbench::config::{BenchmarkConfig, LibraryConfig};
use bagbench::ffi::{
    EntryPoint0, EntryPoint1, EntryPoint2, EntryPoint3, ForeignFn, MAX_FOREIGN_PARAMETERS,
};
use bagbench::{Measure, Measurement, SweepValue};
use libloading::{Library, Symbol};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// An entry point together with the library that keeps its code mapped
pub struct LoadedEntryPoint {
    func: ForeignFn,
    label: String,
    _library: Arc<Library>,
}

impl Measure for LoadedEntryPoint {
    fn measure(&mut self, sweep_value: SweepValue, parameters: &[i32]) -> Result<Measurement> {
        self.func.measure(sweep_value, parameters)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Look up `symbol` with the signature `T`.
///
/// # Safety
///
/// The exported symbol must have signature `T`.
unsafe fn lookup<T: Copy>(lib: &Library, symbol: &str) -> Result<T> {
    let func: Symbol<T> = lib
        .get(symbol.as_bytes())
        .with_context(|| format!("Symbol '{}' not found", symbol))?;
    Ok(*func)
}

/// Resolve `symbol` as an entry point taking `parameter_count` ints after
/// the thread count
fn resolve(lib: &Library, symbol: &str, parameter_count: usize) -> Result<ForeignFn> {
    // SAFETY: benchmark entry points take the thread count and their
    // configured parameters as C ints and return `CBenchResult` by value.
    let func = unsafe {
        match parameter_count {
            0 => ForeignFn::from(lookup::<EntryPoint0>(lib, symbol)?),
            1 => ForeignFn::from(lookup::<EntryPoint1>(lib, symbol)?),
            2 => ForeignFn::from(lookup::<EntryPoint2>(lib, symbol)?),
            3 => ForeignFn::from(lookup::<EntryPoint3>(lib, symbol)?),
            n => bail!(
                "entry points take at most {} parameters, got {}",
                MAX_FOREIGN_PARAMETERS,
                n
            ),
        }
    };
    Ok(func)
}

/// Loads each shared library once and resolves benchmark symbols from it
#[derive(Default)]
pub struct LibraryCache {
    loaded: HashMap<PathBuf, Arc<Library>>,
}

impl LibraryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(&mut self, path: &Path) -> Result<Arc<Library>> {
        if let Some(lib) = self.loaded.get(path) {
            return Ok(lib.clone());
        }
        debug!("Loading {}", path.display());
        // SAFETY: loading runs the library's initializers; benchmark
        // libraries are plain C objects built for this harness.
        let lib = unsafe { Library::new(path) }
            .with_context(|| format!("Failed to load {}", path.display()))?;
        let lib = Arc::new(lib);
        self.loaded.insert(path.to_path_buf(), lib.clone());
        Ok(lib)
    }

    /// Resolve `bench.symbol` from its library as a measurement taking
    /// `bench.parameters.len()` parameters
    pub fn bind(
        &mut self,
        bench: &BenchmarkConfig,
        library: &LibraryConfig,
    ) -> Result<Box<dyn Measure>> {
        if bench.parameters.len() > MAX_FOREIGN_PARAMETERS {
            bail!(
                "entry points take at most {} parameters, got {}",
                MAX_FOREIGN_PARAMETERS,
                bench.parameters.len()
            );
        }
        let lib = self.load(&library.path)?;
        let func = resolve(&lib, &bench.symbol, bench.parameters.len())?;

        debug!(
            "Bound {}::{} with {} parameters",
            library.name,
            bench.symbol,
            bench.parameters.len()
        );
        Ok(Box::new(LoadedEntryPoint {
            func,
            label: format!("{}::{}", library.name, bench.symbol),
            _library: lib,
        }))
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }
}
