//! Pattern-keyed parser dispatch.
//!
//! A [`RuleSet`] is an ordered list of (regex, parser) rules applied to a
//! flat record. For each key, rules are tested in declared order and the
//! first match wins; keys matching no rule copy their value through
//! unchanged. Rule sets must therefore be ordered by the integrator so
//! that ambiguous keys resolve deterministically. No two rules should be
//! written to match the same key; if they do, the first listed wins.

use regex::Regex;
use serde_json::{Map, Value};
use tracing::trace;

use crate::config::Config;
use crate::error::{TransformError, TransformResult};
use crate::transform::parsers::FieldParser;

/// One dispatch rule: a compiled key pattern and the parser it selects.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    parser: FieldParser,
}

impl Rule {
    /// Compile a rule from a pattern string.
    pub fn new(pattern: &str, parser: FieldParser) -> TransformResult<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            parser,
        })
    }

    /// Whether this rule's pattern matches a key.
    pub fn matches(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }
}

/// An ordered set of dispatch rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile a rule set from an ordered pattern table.
    pub fn compile(table: &[(&str, FieldParser)]) -> TransformResult<Self> {
        let rules = table
            .iter()
            .map(|(pattern, parser)| Rule::new(pattern, *parser))
            .collect::<TransformResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every field of a record through its first matching rule's
    /// parser. Output preserves input key order. A parser failure carries
    /// the field name in the returned error.
    pub fn apply(&self, record: &Map<String, Value>, config: &Config) -> TransformResult<Map<String, Value>> {
        let mut parsed = Map::new();

        for (key, value) in record {
            match self.rules.iter().find(|rule| rule.matches(key)) {
                Some(rule) => {
                    let typed = rule.parser.apply(value, config).map_err(|source| {
                        TransformError::Field {
                            field: key.clone(),
                            source,
                        }
                    })?;
                    trace!(field = %key, raw = %value, typed = %typed, "mapped field");
                    parsed.insert(key.clone(), typed);
                }
                None => {
                    trace!(field = %key, "passing field through");
                    parsed.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(parsed)
    }
}
