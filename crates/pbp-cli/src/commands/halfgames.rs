//! Halfgames command: possessions in, halfgame rate rows out.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use pbp_core::Possession;
use pbp_stats::halfgames_from_possessions;

use crate::Config;

pub fn run(input: &Path, output: Option<&Path>, config: &Config) -> Result<()> {
    let possessions = read_possessions(input)?;
    if possessions.is_empty() {
        bail!("no possessions found in {}", input.display());
    }
    let halfgames = halfgames_from_possessions(&possessions);

    let path = output.map_or_else(|| config.halfgames_path(), Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for halfgame in &halfgames {
        serde_json::to_writer(&mut writer, halfgame)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    info!(
        possessions = possessions.len(),
        halfgames = halfgames.len(),
        output = %path.display(),
        "aggregation complete",
    );
    Ok(())
}

fn read_possessions(path: &Path) -> Result<Vec<Possession>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut possessions = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let possession: Possession = serde_json::from_str(&line).with_context(|| {
            format!("{}:{}: malformed possession record", path.display(), number + 1)
        })?;
        possessions.push(possession);
    }
    Ok(possessions)
}
