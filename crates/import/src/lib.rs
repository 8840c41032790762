pub mod ezbook;
pub mod kh;

pub use ezbook::{write_csv, ConvertError, Converter, EzTransaction, TransactionKind};
pub use kh::{parse_export, KhTransaction, TsvError};
