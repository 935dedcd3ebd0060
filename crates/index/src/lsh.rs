use hashbrown::{HashMap, HashSet};
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::LshConfig;
use crate::IndexError;

/// MinHash banding index.
///
/// Built once from the full corpus, then queried read-only. Document ids
/// are kept in insertion order and every query answers in that order.
#[derive(Debug, Clone)]
pub struct LshIndex {
    config: LshConfig,
    /// One bucket table per band: band key -> insertion positions.
    buckets: Vec<HashMap<u64, Vec<usize>>>,
    ids: Vec<String>,
    positions: HashMap<String, usize>,
}

impl LshIndex {
    /// Build the index from `(id, signature)` pairs.
    ///
    /// Fails on an invalid configuration, on a signature shorter than
    /// `bands * rows_per_band`, or on a repeated id.
    pub fn build<I, D, S>(config: LshConfig, docs: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (D, S)>,
        D: Into<String>,
        S: AsRef<[u64]>,
    {
        config.validate()?;

        let mut index = Self {
            config,
            buckets: (0..config.bands).map(|_| HashMap::new()).collect(),
            ids: Vec::new(),
            positions: HashMap::new(),
        };

        for (id, signature) in docs {
            index.insert(id.into(), signature.as_ref())?;
        }

        log::info!(
            "lsh index built: documents={} bands={} rows_per_band={} buckets={}",
            index.ids.len(),
            config.bands,
            config.rows_per_band,
            index.bucket_count()
        );

        Ok(index)
    }

    fn insert(&mut self, id: String, signature: &[u64]) -> Result<(), IndexError> {
        let keys = self.band_keys(signature)?;
        if self.positions.contains_key(&id) {
            return Err(IndexError::DuplicateId(id));
        }

        let position = self.ids.len();
        for (table, key) in self.buckets.iter_mut().zip(keys) {
            table.entry(key).or_default().push(position);
        }
        self.positions.insert(id.clone(), position);
        self.ids.push(id);
        Ok(())
    }

    /// Insertion positions of every document sharing at least one bucket
    /// with `signature`, ascending.
    pub fn query_positions(&self, signature: &[u64]) -> Result<Vec<usize>, IndexError> {
        let keys = self.band_keys(signature)?;

        let mut seen: HashSet<usize> = HashSet::new();
        for (table, key) in self.buckets.iter().zip(keys) {
            if let Some(bucket) = table.get(&key) {
                seen.extend(bucket.iter().copied());
            }
        }

        let mut positions: Vec<usize> = seen.into_iter().collect();
        positions.sort_unstable();
        log::debug!("lsh query: candidates={}", positions.len());
        Ok(positions)
    }

    /// Ids of every document sharing at least one bucket with `signature`,
    /// in insertion order.
    pub fn query(&self, signature: &[u64]) -> Result<Vec<&str>, IndexError> {
        Ok(self
            .query_positions(signature)?
            .into_iter()
            .map(|pos| self.ids[pos].as_str())
            .collect())
    }

    /// Like [`LshIndex::query`] but drops `exclude_id` from the answer.
    pub fn query_excluding(
        &self,
        signature: &[u64],
        exclude_id: &str,
    ) -> Result<Vec<&str>, IndexError> {
        let mut ids = self.query(signature)?;
        ids.retain(|id| *id != exclude_id);
        Ok(ids)
    }

    pub fn config(&self) -> &LshConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Document ids in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Total number of non-empty buckets across all bands.
    pub fn bucket_count(&self) -> usize {
        self.buckets.iter().map(HashMap::len).sum()
    }

    fn band_keys(&self, signature: &[u64]) -> Result<Vec<u64>, IndexError> {
        let needed = self.config.signature_len();
        if signature.len() < needed {
            return Err(IndexError::SignatureLength {
                expected: needed,
                got: signature.len(),
            });
        }

        let rows = self.config.rows_per_band;
        let mut scratch = Vec::with_capacity(rows * 8);
        Ok(signature[..needed]
            .chunks_exact(rows)
            .enumerate()
            .map(|(band, chunk)| band_key(band, chunk, &mut scratch))
            .collect())
    }
}

/// Bucket key of one band: xxh3 of the rows' little-endian bytes, seeded
/// with the band index so equal runs in different bands never alias.
#[inline]
fn band_key(band: usize, rows: &[u64], scratch: &mut Vec<u8>) -> u64 {
    scratch.clear();
    for value in rows {
        scratch.extend_from_slice(&value.to_le_bytes());
    }
    xxh3_64_with_seed(scratch, band as u64)
}
