//! Status command for showing the resolved configuration.

use std::io::Write;

use anyhow::Result;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    writeln!(writer, "Possession parser status")?;
    writeln!(writer, "Data directory: {}", config.data_dir.display())?;
    writeln!(
        writer,
        "Possessions output: {}",
        config.possessions_path().display()
    )?;
    writeln!(
        writer,
        "Halfgames output: {}",
        config.halfgames_path().display()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn status_prints_resolved_paths() {
        let config = Config {
            data_dir: "/data".into(),
            ..Config::default()
        };
        let mut output = Vec::new();
        run(&mut output, &config).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Possession parser status
        Data directory: /data
        Possessions output: /data/possessions/possessions.jsonl
        Halfgames output: /data/halfgames/halfgames.jsonl
        ");
    }
}
