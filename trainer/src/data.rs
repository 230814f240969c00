use candle_core::{Device, Result as CandleResult, Tensor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

pub const NUM_FEATURES: usize = 8;

/// Noisy linear regression samples: `y = w·x + b + noise`.
pub struct Dataset {
    features: Vec<[f32; NUM_FEATURES]>,
    targets: Vec<f32>,
}

impl Dataset {
    pub fn synthetic(num_samples: usize, noise: f32, rng: &mut StdRng) -> Self {
        let weights: [f32; NUM_FEATURES] = std::array::from_fn(|_| rng.gen_range(-1.0..1.0));
        let bias: f32 = rng.gen_range(-0.5..0.5);
        let noise = noise.abs();

        let mut features = Vec::with_capacity(num_samples);
        let mut targets = Vec::with_capacity(num_samples);

        for _ in 0..num_samples {
            let x: [f32; NUM_FEATURES] = std::array::from_fn(|_| rng.gen_range(-1.0..1.0));
            let clean = x.iter().zip(weights.iter()).map(|(a, b)| a * b).sum::<f32>() + bias;
            let jitter = if noise > 0.0 {
                rng.gen_range(-noise..noise)
            } else {
                0.0
            };

            features.push(x);
            targets.push(clean + jitter);
        }

        Self { features, targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Shuffles all sample indices and splits off `split` of them for validation.
    pub fn train_val_indices(&self, split: f64, rng: &mut StdRng) -> (Vec<usize>, Vec<usize>) {
        let split = split.clamp(0.0, 0.9);
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);

        let num_val = (self.len() as f64 * split) as usize;
        let train_idx = indices.split_off(num_val);
        (train_idx, indices)
    }

    pub fn batches<'a>(
        &'a self,
        indices: &'a [usize],
        batch_size: usize,
        device: &'a Device,
    ) -> impl Iterator<Item = CandleResult<(Tensor, Tensor)>> + 'a {
        indices.chunks(batch_size.max(1)).map(move |chunk| {
            let mut x = Vec::with_capacity(chunk.len() * NUM_FEATURES);
            let mut y = Vec::with_capacity(chunk.len());
            for &i in chunk {
                x.extend_from_slice(&self.features[i]);
                y.push(self.targets[i]);
            }

            let x = Tensor::from_vec(x, (chunk.len(), NUM_FEATURES), device)?;
            let y = Tensor::from_vec(y, (chunk.len(), 1), device)?;
            Ok((x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_split_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        let dataset = Dataset::synthetic(100, 0.1, &mut rng);
        let (train, val) = dataset.train_val_indices(0.2, &mut rng);

        assert_eq!(train.len(), 80);
        assert_eq!(val.len(), 20);

        let mut all: Vec<usize> = train.iter().chain(val.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = Dataset::synthetic(16, 0.1, &mut StdRng::seed_from_u64(3));
        let b = Dataset::synthetic(16, 0.1, &mut StdRng::seed_from_u64(3));
        assert_eq!(a.targets, b.targets);
    }

    #[test]
    fn test_batches_cover_indices() -> CandleResult<()> {
        let mut rng = StdRng::seed_from_u64(1);
        let dataset = Dataset::synthetic(10, 0.0, &mut rng);
        let indices: Vec<usize> = (0..10).collect();

        let shapes = dataset
            .batches(&indices, 4, &Device::Cpu)
            .map(|batch| batch.map(|(x, y)| (x.dims().to_vec(), y.dims().to_vec())))
            .collect::<CandleResult<Vec<_>>>()?;

        assert_eq!(
            shapes,
            vec![
                (vec![4, NUM_FEATURES], vec![4, 1]),
                (vec![4, NUM_FEATURES], vec![4, 1]),
                (vec![2, NUM_FEATURES], vec![2, 1]),
            ]
        );
        Ok(())
    }
}
