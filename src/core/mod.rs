//! Core data types for the stock analyzer
//!
//! Defines fundamental types:
//! - PriceBar: one daily OHLCV record
//! - OptionExpiration / CallQuote: the call side of an option chain
//! - HorizonTarget / HorizonResult: nominal horizons and their matches

pub mod bar;
pub mod option;
pub mod horizon;
pub mod error;

pub use bar::*;
pub use option::*;
pub use horizon::*;
pub use error::*;
