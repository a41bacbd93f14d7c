pub mod html_renderer;
pub mod json_bank_loader;
pub mod rng_random_source;
