use std::io::{self, BufRead};

/// A fixed-size contiguous block of input lines, processed as one unit of
/// work. Never mutated after creation; consumed by exactly one worker.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// `k * chunk_size` for the k-th chunk of the stream (0-indexed)
    pub base_line_offset: u64,
    /// Lines without their terminators, in stream order
    pub lines: Vec<String>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Groups a line source into chunks of exactly `chunk_size` lines, except
/// possibly a shorter final chunk. Lazy: each chunk is materialized and
/// handed off before the next one is read, so memory never holds the whole
/// source. A read error ends the stream after being yielded once.
#[derive(Debug)]
pub struct ChunkReader<R> {
    lines: io::Lines<R>,
    chunk_size: usize,
    next_base: u64,
    failed: bool,
}

impl<R: BufRead> ChunkReader<R> {
    pub fn new(source: R, chunk_size: usize) -> Self {
        Self {
            lines: source.lines(),
            chunk_size: chunk_size.max(1),
            next_base: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for ChunkReader<R> {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let mut lines = Vec::with_capacity(self.chunk_size);
        while lines.len() < self.chunk_size {
            match self.lines.next() {
                Some(Ok(line)) => lines.push(line),
                Some(Err(e)) => {
                    self.failed = true;
                    return Some(Err(e));
                }
                None => break,
            }
        }

        if lines.is_empty() {
            return None;
        }

        let base_line_offset = self.next_base;
        self.next_base += self.chunk_size as u64;
        Some(Ok(Chunk {
            base_line_offset,
            lines,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn collect_chunks(input: &str, chunk_size: usize) -> Vec<Chunk> {
        ChunkReader::new(Cursor::new(input), chunk_size)
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_exact_chunking() {
        let chunks = collect_chunks("a\nb\nc\nd\n", 2);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].base_line_offset, 0);
        assert_eq!(chunks[0].lines, vec!["a", "b"]);
        assert_eq!(chunks[1].base_line_offset, 2);
        assert_eq!(chunks[1].lines, vec!["c", "d"]);
    }

    #[test]
    fn test_final_remainder_chunk() {
        let chunks = collect_chunks("a\nb\nc\n", 2);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].base_line_offset, 2);
        assert_eq!(chunks[1].lines, vec!["c"]);
    }

    #[test]
    fn test_base_offset_uses_chunk_size_stride() {
        let input = (0..7).map(|i| format!("line {}\n", i)).collect::<String>();
        let chunks = collect_chunks(&input, 3);
        let bases: Vec<_> = chunks.iter().map(|c| c.base_line_offset).collect();
        assert_eq!(bases, vec![0, 3, 6]);
    }

    #[test]
    fn test_empty_source_yields_no_chunks() {
        assert!(collect_chunks("", 1000).is_empty());
    }

    #[test]
    fn test_missing_trailing_newline() {
        let chunks = collect_chunks("a\nb", 1000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].lines, vec!["a", "b"]);
    }

    #[test]
    fn test_zero_chunk_size_clamped_to_one() {
        let chunks = collect_chunks("a\nb\n", 0);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].base_line_offset, 1);
    }

    /// Yields its buffered bytes, then fails every subsequent read.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_read_error_ends_stream() {
        let reader = io::BufReader::new(FailingReader {
            data: Cursor::new(b"a\nb\n".to_vec()),
        });
        let mut chunks = ChunkReader::new(reader, 1);

        assert_eq!(chunks.next().unwrap().unwrap().lines, vec!["a"]);
        assert_eq!(chunks.next().unwrap().unwrap().lines, vec!["b"]);
        assert!(chunks.next().unwrap().is_err());
        assert!(chunks.next().is_none());
    }
}
