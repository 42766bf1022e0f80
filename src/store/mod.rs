pub mod memory;

pub use memory::PriceStore;
