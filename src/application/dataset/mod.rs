pub mod assembler;
pub mod balancer;
pub mod summary;

pub use assembler::DatasetAssembler;
pub use balancer::{ClassCounts, balance_classes};
pub use summary::DatasetSummary;
