use crate::papers::Work;
use crate::vectordb::TextRecord;

use super::session::SessionToken;

/// A window of one work's best text.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub work_index: usize,
    pub chunk_index: usize,
    pub text: String,
    pub title: String,
    pub citations: Option<u64>,
}

impl Chunk {
    /// `{token}-w{work}-c{chunk}`.
    pub fn record_id(&self, token: &SessionToken) -> String {
        format!("{}-w{}-c{}", token, self.work_index, self.chunk_index)
    }

    pub fn into_record(self, token: &SessionToken) -> TextRecord {
        let id = self.record_id(token);
        TextRecord::new(id, self.text, self.title).with_citations(self.citations)
    }
}

/// Splits `text` into windows of `size` characters, each starting `size - overlap`
/// characters after the previous one. The last window ends at the end of the text.
pub fn split_windows(text: &str, size: usize, overlap: usize) -> Vec<&str> {
    if size == 0 {
        return Vec::new();
    }

    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = boundaries.len() - 1;
    if char_count == 0 {
        return Vec::new();
    }

    let step = size.saturating_sub(overlap).max(1);
    let mut windows = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + size).min(char_count);
        windows.push(&text[boundaries[start]..boundaries[end]]);
        if end == char_count {
            break;
        }
        start += step;
    }
    windows
}

/// Chunks every work with usable text; others are skipped.
///
/// Whitespace-only windows are dropped. `work_index` is the work's position in `works`.
pub fn chunk_works(works: &[Work], size: usize, overlap: usize) -> Vec<Chunk> {
    works
        .iter()
        .enumerate()
        .filter_map(|(work_index, work)| work.best_text().map(|text| (work_index, work, text)))
        .flat_map(|(work_index, work, text)| {
            split_windows(text, size, overlap)
                .into_iter()
                .filter(|w| !w.trim().is_empty())
                .enumerate()
                .map(move |(chunk_index, window)| Chunk {
                    work_index,
                    chunk_index,
                    text: window.to_string(),
                    title: work.title.clone(),
                    citations: work.citation_count,
                })
        })
        .collect()
}
