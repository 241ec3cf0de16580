//! Lazy JSON-Lines reading and writing.
//!
//! The per-source extraction dumps arrive and leave as one JSON value per
//! line. The reader is an iterator so callers decide how far to read; blank
//! lines are tolerated and skipped.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Open a JSON-Lines file for lazy typed reading.
pub fn open_jsonl<T: DeserializeOwned>(path: &Path) -> Result<JsonLinesReader<T>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(JsonLinesReader {
        lines: BufReader::new(file).lines(),
        path: path.to_path_buf(),
        line_no: 0,
        marker: PhantomData,
    })
}

pub struct JsonLinesReader<T> {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    line_no: u64,
    marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Iterator for JsonLinesReader<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_no += 1;
            match self.lines.next()? {
                Err(err) => {
                    return Some(Err(anyhow::Error::new(err)
                        .context(format!("reading {}", self.path.display()))));
                }
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_str(&line).with_context(|| {
                        format!("parsing {} line {}", self.path.display(), self.line_no)
                    }));
                }
            }
        }
    }
}

/// Buffered one-record-per-line writer. Call [`JsonLinesWriter::finish`] to
/// flush; dropping without it loses buffered tail records on error paths.
pub struct JsonLinesWriter {
    out: BufWriter<File>,
    path: PathBuf,
}

impl JsonLinesWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(JsonLinesWriter {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)
            .with_context(|| format!("writing record to {}", self.path.display()))?;
        self.out
            .write_all(b"\n")
            .with_context(|| format!("writing record to {}", self.path.display()))?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.out
            .flush()
            .with_context(|| format!("flushing {}", self.path.display()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use graphmill_schema::Node;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn writes_and_reads_back_records() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = JsonLinesWriter::create(file.path()).unwrap();
        writer.write(&Node::new("GO:0005575")).unwrap();
        writer.write(&Node::new("HGNC:5")).unwrap();
        writer.finish().unwrap();

        let ids: Vec<String> = open_jsonl::<Node>(file.path())
            .unwrap()
            .map(|node| node.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["GO:0005575", "HGNC:5"]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"id\": \"A:1\"}\n\n   \n{\"id\": \"B:2\"}\n")
            .unwrap();
        let count = open_jsonl::<Node>(file.path()).unwrap().count();
        assert_eq!(count, 2);
    }

    #[test]
    fn parse_errors_carry_the_line_number() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"id\": \"A:1\"}\nnot json\n").unwrap();
        let results: Vec<_> = open_jsonl::<Node>(file.path()).unwrap().collect();
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }
}
