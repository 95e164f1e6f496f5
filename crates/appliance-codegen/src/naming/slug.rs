use std::collections::BTreeSet;

const SLUG_LEN: usize = 6;
const LEADING: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const TRAILING: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Issues short identifiers that are unique within one generation run.
///
/// Candidates are drawn from a blake3 output stream keyed by the seed, so the
/// first slug issued for a seed is the same on every run. A candidate already
/// issued is rejected and the next one is read from the same stream.
#[derive(Debug, Clone, Default)]
pub struct SlugLedger {
  issued: BTreeSet<String>,
}

impl SlugLedger {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn assign(&mut self, seed: &str) -> String {
    let mut stream = blake3::Hasher::new().update(seed.as_bytes()).finalize_xof();
    let mut bytes = [0u8; SLUG_LEN];
    loop {
      stream.fill(&mut bytes);
      let candidate = encode(&bytes);
      if self.issued.insert(candidate.clone()) {
        return candidate;
      }
    }
  }

  #[must_use]
  pub fn contains(&self, slug: &str) -> bool {
    self.issued.contains(slug)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.issued.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.issued.is_empty()
  }
}

fn encode(bytes: &[u8]) -> String {
  bytes
    .iter()
    .enumerate()
    .map(|(index, byte)| {
      let alphabet = if index == 0 { LEADING } else { TRAILING };
      char::from(alphabet[usize::from(*byte) % alphabet.len()])
    })
    .collect()
}
