use std::io::{self, Read};

/// Number of distinct byte symbols.
pub const ALPHABET_SIZE: usize = 256;

/// Bytes read per call while counting.
pub const CHUNK_SIZE: usize = 4096;

/// Occurrence counts for every byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Counts every byte of `reader` until end of stream.
    pub fn from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut table = Self::new();
        let mut buffer = [0u8; CHUNK_SIZE];
        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            table.add(&buffer[..n]);
        }
        Ok(table)
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.add(data);
        table
    }

    pub fn add(&mut self, data: &[u8]) {
        for &b in data {
            self.counts[b as usize] += 1;
        }
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Symbols with nonzero counts, in ascending symbol order.
    pub fn nonzero(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counts_bytes_across_chunks() {
        let data: Vec<u8> = (0..3 * CHUNK_SIZE + 17).map(|i| (i % 7) as u8).collect();
        let table = FrequencyTable::from_reader(&mut Cursor::new(&data)).unwrap();

        assert_eq!(table.total(), data.len() as u64);
        assert_eq!(table.distinct(), 7);
        let expected_zeros = data.iter().filter(|&&b| b == 0).count() as u64;
        assert_eq!(table.get(0), expected_zeros);
        assert_eq!(table.get(7), 0);
    }

    #[test]
    fn empty_input_has_no_symbols() {
        let table = FrequencyTable::from_reader(&mut Cursor::new(Vec::new())).unwrap();
        assert_eq!(table.total(), 0);
        assert_eq!(table.nonzero().count(), 0);
    }

    #[test]
    fn nonzero_is_in_symbol_order() {
        let table = FrequencyTable::from_bytes(b"zzay");
        let seen: Vec<(u8, u64)> = table.nonzero().collect();
        assert_eq!(seen, vec![(b'a', 1), (b'y', 1), (b'z', 2)]);
    }
}
