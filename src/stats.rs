//! Chain-length statistics (feature `stats`).

use crate::chained_hash_map::ChainedHashMap;

/// Snapshot of how entries are spread over the bucket array.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    /// Number of stored entries
    pub populated: usize,
    /// Length of the bucket array
    pub capacity: usize,
    /// Buckets holding at least one node
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Average chain length (populated / capacity); growth triggers above 3
    pub average_chain: f64,
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn chain_stats(&self) -> ChainStats {
        let mut occupied_buckets = 0;
        let mut longest_chain = 0;
        for n in self.chain_lengths() {
            if n > 0 {
                occupied_buckets += 1;
            }
            longest_chain = longest_chain.max(n);
        }
        ChainStats {
            populated: self.len(),
            capacity: self.capacity(),
            occupied_buckets,
            longest_chain,
            average_chain: self.len() as f64 / self.capacity() as f64,
        }
    }
}
