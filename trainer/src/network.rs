use candle_core::{Result, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};

use crate::data::NUM_FEATURES;

const HIDDEN_SIZE: usize = 32;

pub struct Network {
    hidden: Linear,
    output: Linear,
}

impl Network {
    pub fn new(vs: &VarBuilder) -> Result<Self> {
        let network = Self {
            hidden: linear(NUM_FEATURES, HIDDEN_SIZE, vs.pp("hidden"))?,
            output: linear(HIDDEN_SIZE, 1, vs.pp("output"))?,
        };

        Ok(network)
    }
}

impl Module for Network {
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x = x.apply(&self.hidden)?.relu()?;
        x.apply(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn test_forward_shape() -> Result<()> {
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let network = Network::new(&vs)?;

        let x = Tensor::zeros((5, NUM_FEATURES), DType::F32, &Device::Cpu)?;
        let y = network.forward(&x)?;
        assert_eq!(y.dims(), &[5, 1]);
        Ok(())
    }
}
