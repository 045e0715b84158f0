//! Letter-frequency ranking of a URL.
//!
//! Aliases are biased toward the letters a URL is made of: the most frequent
//! letters lead the sampling alphabet, the rest of `a`..`z` follows.

/// Number of ranked letters kept ahead of the fallback alphabet.
pub const RANKED_PREFIX_LEN: usize = 6;

/// Size of the sampling alphabet.
pub const ALPHABET_LEN: usize = 26;

/// Letters of a URL ordered by descending frequency.
///
/// Ties are broken by ascending byte value. Holds at most
/// [`RANKED_PREFIX_LEN`] letters, fewer when the URL has fewer distinct ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedAlphabet(Vec<u8>);

impl RankedAlphabet {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sampling alphabet: every lowercase letter exactly once, ranked letters first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool(Vec<u8>);

impl CandidatePool {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ranks the ASCII letters of `url` by how often they occur.
///
/// Case-insensitive; digits, punctuation and non-ASCII characters are ignored.
///
/// # Examples
///
/// ```
/// use url_alias::domain::alias::rank;
///
/// assert_eq!(rank("aabbbc").as_bytes(), b"bac");
/// assert!(rank("1234://").is_empty());
/// ```
pub fn rank(url: &str) -> RankedAlphabet {
    let mut counts = [0usize; ALPHABET_LEN];

    for byte in url.bytes().map(|b| b.to_ascii_lowercase()) {
        if byte.is_ascii_lowercase() {
            counts[usize::from(byte - b'a')] += 1;
        }
    }

    let mut letters: Vec<(u8, usize)> = (b'a'..=b'z')
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .collect();

    // Stable sort on an already ascending sequence keeps ties in byte order.
    letters.sort_by(|a, b| b.1.cmp(&a.1));
    letters.truncate(RANKED_PREFIX_LEN);

    RankedAlphabet(letters.into_iter().map(|(letter, _)| letter).collect())
}

/// Builds the sampling alphabet for `url`.
///
/// The ranked letters come first, followed by the rest of `a`..`z` in
/// alphabetical order.
pub fn candidate_pool(url: &str) -> CandidatePool {
    candidate_pool_from(&rank(url))
}

/// Builds the sampling alphabet from an already computed ranking.
pub fn candidate_pool_from(ranked: &RankedAlphabet) -> CandidatePool {
    let mut seen = [false; ALPHABET_LEN];
    let mut pool = Vec::with_capacity(ALPHABET_LEN);

    for letter in ranked.as_bytes().iter().copied().chain(b'a'..=b'z') {
        let slot = &mut seen[usize::from(letter - b'a')];
        if !*slot {
            *slot = true;
            pool.push(letter);
        }
    }

    CandidatePool(pool)
}
