//! Stock item record mapping.
//!
//! Composes the dispatch and raising stages with the stock-item rule
//! table: identifier, price, cost, and quantity columns get typed;
//! `modifier_<n>_<field>` columns raise into a `modifiers` list, minus
//! entries that carry no name.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::trace;

use crate::config::Config;
use crate::error::TransformResult;
use crate::parser::RawRecord;
use crate::transform::dispatch::RuleSet;
use crate::transform::parsers::FieldParser;
use crate::transform::raise::{collapse_group, raise_keys_with, GroupPattern, Nested};

/// Top-level key the raised modifier group lands under.
const MODIFIERS_KEY: &str = "modifiers";

/// Maps one stock item row to one output document.
///
/// # Example
/// ```ignore
/// use stockload::{Config, StockItemMapper};
///
/// let mapper = StockItemMapper::new(Config::relaxed())?;
/// let doc = mapper.map(&row)?;
/// ```
#[derive(Debug, Clone)]
pub struct StockItemMapper {
    rules: RuleSet,
    pattern: GroupPattern,
    config: Config,
}

impl StockItemMapper {
    /// Build the mapper with the fixed stock-item rule table.
    pub fn new(config: Config) -> TransformResult<Self> {
        let rules = RuleSet::compile(&[
            (r"^item id$", FieldParser::Integer),
            (r"^modifier_[0-9]+_name$", FieldParser::Text),
            (r"^price$", FieldParser::Price),
            (r"^modifier_[0-9]+_price$", FieldParser::Price),
            (r"^cost$", FieldParser::Price),
            (r"^quantity_on_hand$", FieldParser::Quantity),
        ])?;
        let pattern = GroupPattern::new(r"^(modifier)_([0-9]+)_([a-zA-Z_]+)$")?;

        Ok(Self {
            rules,
            pattern,
            config,
        })
    }

    /// The configuration this mapper runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Transform one raw row into an output document.
    pub fn map(&self, row: &RawRecord) -> TransformResult<Map<String, Value>> {
        let parsed = self.rules.apply(row, &self.config)?;
        let raised = raise_keys_with(&parsed, &self.pattern, |group| {
            if group == "modifier" {
                MODIFIERS_KEY.to_string()
            } else {
                group.to_string()
            }
        })?;

        let mut document = Map::new();
        for (key, nested) in raised {
            match nested {
                Nested::Scalar(value) => {
                    document.insert(key, value);
                }
                Nested::Group(mut group) => {
                    if key == MODIFIERS_KEY {
                        group.retain(|index, fields| {
                            let keep = !self.name_is_null(fields);
                            if !keep {
                                trace!(%index, "dropping null-named modifier");
                            }
                            keep
                        });
                    }
                    let entries = collapse_group(&group);
                    document.insert(
                        key,
                        Value::Array(entries.into_iter().map(Value::Object).collect()),
                    );
                }
            }
        }

        Ok(document)
    }

    /// Whether a modifier entry's `name` field holds the active null
    /// representation. Checks the same [`Config`] the parsers wrote
    /// with, so the test matches whatever they produced.
    fn name_is_null(&self, fields: &IndexMap<String, Value>) -> bool {
        fields
            .get("name")
            .map(|value| self.config.is_null(value))
            .unwrap_or(false)
    }
}
