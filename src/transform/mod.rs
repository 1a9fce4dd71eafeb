//! Record transformation: field parsing, pattern dispatch, key raising,
//! and the stock-item mapper that composes them.

pub mod dispatch;
pub mod parsers;
pub mod pipeline;
pub mod raise;
pub mod stockitem;

pub use dispatch::{Rule, RuleSet};
pub use parsers::FieldParser;
pub use raise::{collapse_group, raise_keys, raise_keys_with, GroupMap, GroupPattern, Nested};
pub use stockitem::StockItemMapper;
