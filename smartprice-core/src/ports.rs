mod predictor;

pub use predictor::DemandPredictor;
