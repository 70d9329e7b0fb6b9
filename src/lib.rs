// Clipnorm - Audio clip normalization and feature extraction
// Module declarations and public surface

pub mod batch;
pub mod clip;
pub mod error;
pub mod features;
pub mod io;
pub mod normalize;
pub mod stretch;

pub use batch::{normalize_directory, normalize_labeled_dirs, BatchReport};
pub use clip::AudioClip;
pub use error::{AudioError, AudioResult};
pub use features::{extract_features, FeatureConfig, FeatureSet, WindowFunction};
pub use io::{read_wav, write_wav};
pub use normalize::{normalize, normalize_file, NormalizeConfig};
pub use stretch::time_stretch;
