//! Single-pass streaming over one section of a graph document.
//!
//! A graph document is a single JSON object `{"nodes": [...], "edges":
//! [...], ...}` whose arrays are far too large to materialize. The reader
//! here drives `serde_json` with a custom seed: the requested section's
//! elements are handed to a callback one at a time and every other top-level
//! key is skipped without building a value for it. Reading both sections
//! means two passes over the file, which is the deliberate trade: memory
//! stays bounded by a single record.

use anyhow::{Context, Result};
use serde::de::{self, Deserialize, DeserializeOwned, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserializer;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::Path;

/// Stream every element of the top-level array `section`, invoking
/// `handler` per element. Returns the number of elements visited; a missing
/// section yields zero. The first handler error aborts the parse and is
/// returned as-is, so typed errors survive to the caller.
pub fn stream_section<T, F>(path: &Path, section: &str, mut handler: F) -> Result<u64>
where
    T: DeserializeOwned,
    F: FnMut(T) -> Result<()>,
{
    let file =
        File::open(path).with_context(|| format!("opening graph document {}", path.display()))?;
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(file));

    let mut failure: Option<anyhow::Error> = None;
    let outcome = SectionSeed {
        section,
        handler: |item: T| match handler(item) {
            Ok(()) => true,
            Err(err) => {
                failure = Some(err);
                false
            }
        },
        marker: PhantomData,
    }
    .deserialize(&mut deserializer);

    if let Some(err) = failure {
        return Err(err);
    }
    outcome.with_context(|| format!("streaming {:?} from {}", section, path.display()))
}

/// Read one top-level key of a graph document into a materialized value,
/// skipping everything else. Used for the small `build` object; do not point
/// it at `nodes` or `edges`.
pub fn read_section_value(path: &Path, section: &str) -> Result<Option<serde_json::Value>> {
    let file =
        File::open(path).with_context(|| format!("opening graph document {}", path.display()))?;
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(file));
    ValueSectionSeed { section }
        .deserialize(&mut deserializer)
        .with_context(|| format!("reading {:?} from {}", section, path.display()))
}

// ============================================================================
// Seeds
// ============================================================================

struct SectionSeed<'a, T, F> {
    section: &'a str,
    handler: F,
    marker: PhantomData<fn() -> T>,
}

impl<'de, 'a, T, F> DeserializeSeed<'de> for SectionSeed<'a, T, F>
where
    T: Deserialize<'de>,
    F: FnMut(T) -> bool,
{
    type Value = u64;

    fn deserialize<D>(self, deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, 'a, T, F> Visitor<'de> for SectionSeed<'a, T, F>
where
    T: Deserialize<'de>,
    F: FnMut(T) -> bool,
{
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a graph document object")
    }

    fn visit_map<M>(mut self, mut map: M) -> Result<u64, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut count = 0u64;
        while let Some(key) = map.next_key::<String>()? {
            if key == self.section {
                count += map.next_value_seed(ArraySeed {
                    handler: &mut self.handler,
                    marker: PhantomData,
                })?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(count)
    }
}

struct ArraySeed<'a, T, F> {
    handler: &'a mut F,
    marker: PhantomData<fn() -> T>,
}

impl<'de, 'a, T, F> DeserializeSeed<'de> for ArraySeed<'a, T, F>
where
    T: Deserialize<'de>,
    F: FnMut(T) -> bool,
{
    type Value = u64;

    fn deserialize<D>(self, deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, 'a, T, F> Visitor<'de> for ArraySeed<'a, T, F>
where
    T: Deserialize<'de>,
    F: FnMut(T) -> bool,
{
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an array of records")
    }

    fn visit_seq<S>(self, mut seq: S) -> Result<u64, S::Error>
    where
        S: SeqAccess<'de>,
    {
        let mut count = 0u64;
        while let Some(item) = seq.next_element::<T>()? {
            count += 1;
            if !(self.handler)(item) {
                return Err(de::Error::custom("streaming aborted by handler"));
            }
        }
        Ok(count)
    }
}

struct ValueSectionSeed<'a> {
    section: &'a str,
}

impl<'de, 'a> DeserializeSeed<'de> for ValueSectionSeed<'a> {
    type Value = Option<serde_json::Value>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, 'a> Visitor<'de> for ValueSectionSeed<'a> {
    type Value = Option<serde_json::Value>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a graph document object")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut found = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == self.section {
                found = Some(map.next_value::<serde_json::Value>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(found)
    }
}

// ============================================================================
// Tests
// ============================================================================
