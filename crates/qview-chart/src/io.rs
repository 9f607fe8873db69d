use crate::point::TimeSeriesPoint;
use anyhow::Result;
use std::path::Path;
use tracing::{error, trace};

/// Reads a `.json` array of records from `path`.
///
/// ```rust,no_run
/// # async fn run() -> anyhow::Result<()> {
/// let points = qview_chart::read_points("./buffer/AAPL.json").await?;
/// # Ok(())
/// # }
/// ```
pub async fn read_points(path: impl AsRef<Path>) -> Result<Vec<TimeSeriesPoint>> {
    let path = path.as_ref();
    trace!("reading file at path: \"{}\"", path.display());

    let file = tokio::fs::read(path).await.map_err(|e| {
        error!("failed to read file at \"{}\": {e}", path.display());
        e
    })?;

    let data: Vec<TimeSeriesPoint> = serde_json::from_slice(&file).map_err(|e| {
        error!("failed to deserialize records in \"{}\": {e}", path.display());
        e
    })?;

    trace!("{} records read from \"{}\"", data.len(), path.display());
    Ok(data)
}
