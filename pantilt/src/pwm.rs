pub mod pca9685;
pub mod servo;
