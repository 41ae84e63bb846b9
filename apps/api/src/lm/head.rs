//! MLP relevance head: embedding → probability in (0, 1).
//!
//! Built for the model description only. Relevance decisions come from
//! `matching::relevance`, never from this head.

use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

#[derive(Config, Debug)]
pub struct RelevanceHeadConfig {
    #[config(default = 300)]
    pub input_dim: usize,
    #[config(default = 128)]
    pub hidden_dim: usize,
    #[config(default = 64)]
    pub bottleneck_dim: usize,
    #[config(default = 0.1)]
    pub dropout: f64,
}

impl RelevanceHeadConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RelevanceHead<B> {
        RelevanceHead {
            fc1: LinearConfig::new(self.input_dim, self.hidden_dim).init(device),
            fc2: LinearConfig::new(self.hidden_dim, self.bottleneck_dim).init(device),
            fc3: LinearConfig::new(self.bottleneck_dim, 1).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct RelevanceHead<B: Backend> {
    pub fc1: Linear<B>,
    pub fc2: Linear<B>,
    pub fc3: Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> RelevanceHead<B> {
    /// [batch, input_dim] → [batch, 1]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.dropout.forward(relu(self.fc1.forward(x)));
        let x = self.dropout.forward(relu(self.fc2.forward(x)));
        sigmoid(self.fc3.forward(x))
    }
}
