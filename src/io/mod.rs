// WAV file reading and writing

pub mod wav;

pub use wav::{read_wav, write_wav};
