// Core types shared by the io, recon and cli crates

pub mod cell;
pub mod header;
pub mod table;

pub use cell::CellValue;
pub use table::Table;
