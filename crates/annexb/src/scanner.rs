//! Access-unit scanning over a seekable Annex B byte source.
//!
//! The scanner reads a bounded window of bytes at an absolute offset and
//! searches it for the next start code. Searching always begins at window
//! index 1 so that the unit's own leading start code never terminates it.
//! Because reads are absolute-offset, the bytes after a located boundary are
//! simply re-read on the next call; no pushback buffer is needed.
//!
//! **Known limitation**: when no start code is found inside the window, the
//! entire window is yielded as a single unit. An access unit larger than the window is therefore silently
//! truncated. Callers must size the window above the largest real unit, or
//! accept truncation as a degraded, non-fatal condition. A `debug!` line is
//! emitted when this happens.

use std::io::{Read, Seek, SeekFrom};

use bytes::Bytes;
use memchr::memmem;
use tracing::{debug, trace};

use crate::error::Result;

/// The 4-byte start code delimiting access units in an Annex B stream.
pub const START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// Default scan window size in bytes.
///
/// Large enough for any access unit a size-limited slice encoder produces.
pub const DEFAULT_WINDOW_SIZE: usize = 64 * 65_535;

/// Scans a seekable byte source for start-code-delimited access units.
///
/// Each call to [`next_unit`](AccessUnitScanner::next_unit) yields one unit
/// including its leading start code, or `None` at end of stream. Units are
/// computed lazily, one at a time; the stream is never materialized as a
/// whole.
pub struct AccessUnitScanner<R> {
    reader: R,
    offset: u64,
    last_offset: u64,
    window: Vec<u8>,
    finder: memmem::Finder<'static>,
}

impl<R: Read + Seek> AccessUnitScanner<R> {
    /// Creates a scanner with the default window size.
    pub fn new(reader: R) -> Self {
        Self::with_window_size(reader, DEFAULT_WINDOW_SIZE)
    }

    /// Creates a scanner with a custom window size.
    ///
    /// The window bounds the largest unit the scanner can yield unbroken
    /// (see the module-level truncation note). Sizes below the start-code
    /// length are clamped to it.
    pub fn with_window_size(reader: R, window_size: usize) -> Self {
        Self {
            reader,
            offset: 0,
            last_offset: 0,
            window: vec![0u8; window_size.max(START_CODE.len())],
            finder: memmem::Finder::new(&START_CODE),
        }
    }

    /// Absolute stream offset of the most recently yielded unit.
    pub fn last_offset(&self) -> u64 {
        self.last_offset
    }

    /// Reads the next access unit, or `Ok(None)` at end of stream.
    ///
    /// The returned bytes include the unit's leading start code and exclude
    /// the next unit's start code. A final window shorter than the start
    /// code (trailing garbage at end of file) is still yielded as a unit.
    pub fn next_unit(&mut self) -> Result<Option<Bytes>> {
        self.reader.seek(SeekFrom::Start(self.offset))?;
        let filled = fill_window(&mut self.reader, &mut self.window)?;
        if filled == 0 {
            return Ok(None);
        }

        self.last_offset = self.offset;
        let window = &self.window[..filled];

        // Index 0 would match this unit's own start code; only a marker at
        // index 1 or later begins the *next* unit.
        let unit = match self.finder.find(&window[1..]) {
            Some(pos) => &window[..pos + 1],
            None => {
                if filled == self.window.len() {
                    debug!(
                        offset = self.last_offset,
                        window = filled,
                        "no start code within scan window, unit may be truncated"
                    );
                }
                window
            }
        };

        self.offset += unit.len() as u64;
        trace!(
            offset = self.last_offset,
            len = unit.len(),
            "access unit"
        );
        Ok(Some(Bytes::copy_from_slice(unit)))
    }
}

impl<R: Read + Seek> Iterator for AccessUnitScanner<R> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_unit().transpose()
    }
}

/// Fills as much of `window` as the reader can provide, tolerating short
/// reads. Returns the number of bytes read; 0 means end of stream.
fn fill_window<R: Read>(reader: &mut R, window: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < window.len() {
        match reader.read(&mut window[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[cfg_attr(all(coverage_nightly, test), coverage(off))]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn stream(payloads: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        for payload in payloads {
            out.extend_from_slice(&START_CODE);
            out.extend_from_slice(payload);
        }
        out
    }

    #[test]
    fn test_yields_each_unit_in_order() {
        let data = stream(&[b"alpha", b"bb", b"c"]);
        let mut scanner = AccessUnitScanner::new(Cursor::new(data));

        let first = scanner.next_unit().unwrap().unwrap();
        assert_eq!(first, [&START_CODE[..], b"alpha"].concat());
        assert_eq!(scanner.last_offset(), 0);

        let second = scanner.next_unit().unwrap().unwrap();
        assert_eq!(second, [&START_CODE[..], b"bb"].concat());
        assert_eq!(scanner.last_offset(), 9);

        let third = scanner.next_unit().unwrap().unwrap();
        assert_eq!(third, [&START_CODE[..], b"c"].concat());

        assert!(scanner.next_unit().unwrap().is_none());
    }

    #[test]
    fn test_unit_length_excludes_next_marker() {
        let data = stream(&[b"xyz", b"rest"]);
        let mut scanner = AccessUnitScanner::new(Cursor::new(data));
        let unit = scanner.next_unit().unwrap().unwrap();
        assert_eq!(unit.len(), START_CODE.len() + 3);
        assert!(!unit.ends_with(&START_CODE));
    }

    #[test]
    fn test_back_to_back_markers_yield_marker_only_unit() {
        // The search must skip index 0, so a unit that is nothing but its
        // own start code is still yielded before the next one.
        let data = stream(&[b"", b"tail"]);
        let mut scanner = AccessUnitScanner::new(Cursor::new(data));
        let unit = scanner.next_unit().unwrap().unwrap();
        assert_eq!(unit.as_ref(), &START_CODE);
        let next = scanner.next_unit().unwrap().unwrap();
        assert_eq!(next, [&START_CODE[..], b"tail"].concat());
    }

    #[test]
    fn test_oversized_unit_is_truncated_to_window() {
        let payload = vec![0xAAu8; 40];
        let data = stream(&[&payload]);
        let mut scanner = AccessUnitScanner::with_window_size(Cursor::new(data.clone()), 16);

        let first = scanner.next_unit().unwrap().unwrap();
        assert_eq!(first.as_ref(), &data[..16]);

        // The remainder keeps coming in window-sized pieces.
        let second = scanner.next_unit().unwrap().unwrap();
        assert_eq!(second.as_ref(), &data[16..32]);
        let third = scanner.next_unit().unwrap().unwrap();
        assert_eq!(third.as_ref(), &data[32..]);
        assert!(scanner.next_unit().unwrap().is_none());
    }

    #[test]
    fn test_final_window_shorter_than_start_code() {
        let data = vec![0x00u8, 0x00, 0x01];
        let mut scanner = AccessUnitScanner::new(Cursor::new(data.clone()));
        let unit = scanner.next_unit().unwrap().unwrap();
        assert_eq!(unit.as_ref(), &data[..]);
        assert!(scanner.next_unit().unwrap().is_none());
    }

    #[test]
    fn test_empty_stream() {
        let mut scanner = AccessUnitScanner::new(Cursor::new(Vec::new()));
        assert!(scanner.next_unit().unwrap().is_none());
    }

    #[test]
    fn test_iterator_adapter_counts_units() {
        let data = stream(&[b"a", b"bb", b"ccc", b"dddd"]);
        let scanner = AccessUnitScanner::new(Cursor::new(data));
        let units: Vec<Bytes> = scanner.map(|r| r.unwrap()).collect();
        assert_eq!(units.len(), 4);
        for unit in &units {
            assert!(unit.starts_with(&START_CODE));
        }
    }

    #[test]
    fn test_concatenated_units_reconstruct_stream() {
        let data = stream(&[b"one", b"two", b"three"]);
        let scanner = AccessUnitScanner::new(Cursor::new(data.clone()));
        let rebuilt: Vec<u8> = scanner
            .map(|r| r.unwrap())
            .flat_map(|b| b.to_vec())
            .collect();
        assert_eq!(rebuilt, data);
    }

    #[test]
    fn test_window_size_clamped_to_start_code_length() {
        let data = stream(&[b"a", b"b"]);
        let mut scanner = AccessUnitScanner::with_window_size(Cursor::new(data), 1);
        // A 1-byte window would never hold a start code; the clamp keeps the
        // scanner making progress.
        let unit = scanner.next_unit().unwrap().unwrap();
        assert_eq!(unit.len(), 4);
    }
}
