use candle_core::{Device, Result as CandleResult};
use candle_nn::loss::mse;
use candle_nn::Module;

use crate::data::Dataset;
use crate::network::Network;

/// Mean per-batch MSE over `indices`.
pub fn evaluate(
    network: &Network,
    dataset: &Dataset,
    indices: &[usize],
    batch_size: usize,
    device: &Device,
) -> CandleResult<f32> {
    let mut total_loss = 0.0;
    let mut batches = 0;

    for batch in dataset.batches(indices, batch_size, device) {
        let (x, y) = batch?;
        let preds = network.forward(&x)?;
        let loss = mse(&preds, &y)?;

        total_loss += loss.to_vec0::<f32>()?;
        batches += 1;
    }

    Ok(total_loss / batches.max(1) as f32)
}
