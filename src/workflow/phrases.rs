use std::path::Path;

use anyhow::Context as _;

pub use crate::foundation::core::Phrase;
use crate::foundation::error::CoverResult;

/// Parse a phrase list: one `headline;subtitle` pair per line.
///
/// Fields past the second are ignored; lines without a `;` are skipped.
pub fn parse_phrases(text: &str) -> Vec<Phrase> {
    text.lines()
        .filter(|line| line.contains(';'))
        .map(|line| {
            let mut fields = line.split(';');
            let headline = fields.next().unwrap_or_default().trim();
            let subtitle = fields.next().unwrap_or_default().trim();
            Phrase::new(headline, subtitle)
        })
        .collect()
}

/// Read and parse a phrase file.
pub fn load_phrases(path: impl AsRef<Path>) -> CoverResult<Vec<Phrase>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read phrases '{}'", path.display()))?;
    let phrases = parse_phrases(&text);
    tracing::debug!(count = phrases.len(), path = %path.display(), "loaded phrases");
    Ok(phrases)
}

/// Seeded uniform picker (SplitMix64), so a given seed replays the same sequence.
#[derive(Clone, Copy, Debug)]
pub struct PhrasePicker {
    state: u64,
}

impl PhrasePicker {
    /// Picker whose sequence is fixed by `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Pick one phrase, or `None` from an empty list.
    pub fn pick<'a>(&mut self, phrases: &'a [Phrase]) -> Option<&'a Phrase> {
        if phrases.is_empty() {
            return None;
        }
        let i = ((self.next_f64_01() * phrases.len() as f64) as usize).min(phrases.len() - 1);
        phrases.get(i)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workflow/phrases.rs"]
mod tests;
