use async_trait::async_trait;

/// Embedding provider: text in, fixed-length vector out.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    fn dimension(&self) -> usize;
}

/// Deterministic bag-of-words hash embedding.
///
/// Each lowercase word maps to a pseudo-random unit vector seeded from its
/// hash; a text is the normalized sum of its words. Texts sharing words get
/// a positive similarity, which is enough for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    pub const DEFAULT_DIMENSION: usize = 64;

    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut sum = vec![0.0f32; self.dimension];
        let mut words = 0usize;
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            for (slot, value) in sum.iter_mut().zip(stub_embed(&word, self.dimension)) {
                *slot += value;
            }
            words += 1;
        }
        if words == 0 {
            anyhow::bail!("cannot embed blank text");
        }
        normalize(&mut sum);
        Ok(sum)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let mantissa = ((bits >> 32) as u32) >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::cosine_similarity;

    #[tokio::test]
    async fn embeddings_are_deterministic_unit_vectors() {
        let embedder = StubEmbedder::new(32);
        let a = embedder.embed("reset my password").await.unwrap();
        let b = embedder.embed("Reset  my PASSWORD").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        let norm = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn shared_words_score_higher() {
        let embedder = StubEmbedder::new(256);
        let query = embedder.embed("how to reset password").await.unwrap();
        let related = embedder.embed("password reset steps").await.unwrap();
        let unrelated = embedder.embed("quarterly revenue chart").await.unwrap();
        let related = cosine_similarity(&query, &related).unwrap();
        let unrelated = cosine_similarity(&query, &unrelated).unwrap();
        assert!(related > unrelated, "{related} <= {unrelated}");
    }

    #[tokio::test]
    async fn blank_text_fails() {
        assert!(StubEmbedder::default().embed("  ").await.is_err());
    }
}
