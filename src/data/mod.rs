pub mod dataloader;
pub mod dataset;
pub mod dataset_spec;
pub mod discovery;
pub mod factory;
pub mod image_decoder;
pub mod label_space;
pub mod sampler;
pub mod stego_dataset;
pub mod stego_type;
pub mod transform;
