//! JSON file price history.
//!
//! Bars are stored as a JSON array of
//! `{timestamp, open, high, low, close, volume}` objects with RFC 3339
//! timestamps, the same shape `Bar` serializes to.

use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::in_memory::filter_range;
use crate::application::ports::{HistoryRequest, PriceHistoryProvider, ProviderError};
use crate::models::{Bar, PriceSeries};

#[derive(Debug, Clone)]
enum Source {
    /// `<dir>/<SYMBOL>.json` per symbol.
    Directory(PathBuf),
    /// One file answers every request.
    File(PathBuf),
}

/// Price history read from JSON files on each fetch.
#[derive(Debug, Clone)]
pub struct JsonFilePriceHistory {
    source: Source,
}

impl JsonFilePriceHistory {
    /// Read `<dir>/<SYMBOL>.json` for each requested symbol.
    #[must_use]
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Directory(dir.into()),
        }
    }

    /// Serve every request from a single bar file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    fn path_for(&self, request: &HistoryRequest) -> Result<PathBuf, ProviderError> {
        match &self.source {
            Source::Directory(dir) => {
                if !is_plain_file_name(request.symbol.as_str()) {
                    return Err(ProviderError::InvalidRequest {
                        reason: format!("symbol {} is not a plain file name", request.symbol),
                    });
                }
                Ok(dir.join(format!("{}.json", request.symbol)))
            }
            Source::File(path) => Ok(path.clone()),
        }
    }
}

/// A single normal path component with no separators of either platform.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    !name.contains(['/', '\\'])
        && !name.contains("..")
        && matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
}

fn read_bars(path: &Path, request: &HistoryRequest) -> Result<Vec<Bar>, ProviderError> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProviderError::NotFound {
                symbol: request.symbol.clone(),
            }
        } else {
            ProviderError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        }
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ProviderError::Malformed {
        reason: format!("{}: {e}", path.display()),
    })
}

impl PriceHistoryProvider for JsonFilePriceHistory {
    fn fetch(&self, request: &HistoryRequest) -> Result<PriceSeries, ProviderError> {
        let path = self.path_for(request)?;
        let bars = read_bars(&path, request)?;
        debug!(
            symbol = %request.symbol,
            path = %path.display(),
            bars = bars.len(),
            "Read bar file"
        );
        let series = PriceSeries::new(request.symbol.clone(), bars)?;
        filter_range(&series, request)
    }
}
