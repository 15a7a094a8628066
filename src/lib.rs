pub mod checker;
pub mod crossmap;
pub mod description;
pub mod mutator;
pub mod normalizer;
pub mod output;
pub mod record;
pub mod sequences;

pub type Sequence = Vec<u8>;
