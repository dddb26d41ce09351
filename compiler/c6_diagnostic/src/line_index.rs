//! Byte offset to line/column conversion.

/// Start offset of every line in a source file.
///
/// Built with one scan over the source; lookups are a binary search.
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    /// `starts[0] == 0`; `starts[n]` is the byte after the n-th `\n`.
    starts: Vec<u32>,
}

impl LineIndex {
    pub fn build(source: &str) -> Self {
        let mut starts = vec![0u32];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| u32::try_from(i + 1).unwrap_or(u32::MAX)),
        );
        LineIndex { starts }
    }

    /// Number of lines (a trailing newline opens an empty last line).
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: u32) -> u32 {
        let idx = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(idx + 1).unwrap_or(u32::MAX)
    }

    /// 1-based `(line, column)` of `offset`. Columns count characters.
    pub fn line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_of(offset);
        let start = self.starts[(line - 1) as usize] as usize;
        let end = (offset as usize).min(source.len());
        let chars = source.get(start..end).map_or(end - start, |s| s.chars().count());
        (line, u32::try_from(chars + 1).unwrap_or(u32::MAX))
    }

    /// Text of 1-based `line`, without its line terminator.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> &'s str {
        let Some(&start) = self.starts.get((line as usize).wrapping_sub(1)) else {
            return "";
        };
        let end = self
            .starts
            .get(line as usize)
            .map_or(source.len(), |&next| next as usize);
        source
            .get(start as usize..end)
            .unwrap_or_default()
            .trim_end_matches(['\n', '\r'])
    }
}
