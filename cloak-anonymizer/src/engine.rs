//! Operator registration and span dispatch.
//!
//! Operators are registered by name and selected per span through an
//! operator-config mapping keyed by entity label, with `DEFAULT` as the
//! catch-all. The engines validate every resolved configuration before any
//! `operate` call runs, then splice replacements left to right, recording
//! each replacement's position in the output text so the result feeds
//! straight back into deanonymization.

use crate::error::{AnonymizerError, AnonymizerResult};
use crate::operator::{Operator, OperatorParams, OperatorType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Catch-all entity label in operator-config mappings.
pub const DEFAULT_ENTITY: &str = "DEFAULT";

/// A detected sensitive span in the input text. Offsets are byte offsets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecognizerResult {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

impl RecognizerResult {
    pub fn new(entity_type: impl Into<String>, start: usize, end: usize, score: f32) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
            score,
        }
    }
}

/// Per-span transform metadata, positioned in the *output* text.
///
/// The items an anonymize call returns carry exactly what a later
/// deanonymize call needs to locate and reverse each replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorResult {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub operator: String,
    pub text: String,
}

/// Transformed text plus per-span metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineResult {
    pub text: String,
    pub items: Vec<OperatorResult>,
}

/// Routes an entity label to a named operator with bound parameters.
#[derive(Clone, Debug)]
pub struct OperatorConfig {
    pub operator_name: String,
    pub params: OperatorParams,
}

impl OperatorConfig {
    pub fn new(operator_name: impl Into<String>, params: OperatorParams) -> Self {
        Self {
            operator_name: operator_name.into(),
            params,
        }
    }
}

/// Policy for overlapping detected spans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictResolutionStrategy {
    /// Drop any span intersecting an already-kept earlier span.
    #[default]
    RemoveIntersections,
    /// Assume the caller supplies disjoint spans; overlap is an error.
    None,
}

/// Name-keyed operator registry, fixed to one transform direction.
struct OperatorRegistry {
    direction: OperatorType,
    operators: HashMap<String, Arc<dyn Operator>>,
}

impl OperatorRegistry {
    fn new(direction: OperatorType) -> Self {
        Self {
            direction,
            operators: HashMap::new(),
        }
    }

    fn add(&mut self, operator: Arc<dyn Operator>) -> AnonymizerResult<()> {
        let actual = operator.operator_type();
        if actual != self.direction {
            return Err(AnonymizerError::WrongOperatorType {
                name: operator.operator_name().to_string(),
                expected: self.direction,
                actual,
            });
        }
        self.operators
            .insert(operator.operator_name().to_string(), operator);
        Ok(())
    }

    /// Resolves the operator and configuration for an entity label, falling
    /// back to the `DEFAULT` entry.
    fn resolve<'a>(
        &'a self,
        operators: &'a HashMap<String, OperatorConfig>,
        entity_type: &str,
    ) -> AnonymizerResult<(&'a Arc<dyn Operator>, &'a OperatorConfig)> {
        let config = operators
            .get(entity_type)
            .or_else(|| operators.get(DEFAULT_ENTITY))
            .ok_or_else(|| AnonymizerError::MissingOperatorConfig(entity_type.to_string()))?;
        let operator = self
            .operators
            .get(&config.operator_name)
            .ok_or_else(|| AnonymizerError::UnknownOperator(config.operator_name.clone()))?;
        Ok((operator, config))
    }

    /// Applies resolved operators over sorted, disjoint, bounds-checked
    /// spans. All validation runs before the first `operate`.
    async fn apply(
        &self,
        text: &str,
        spans: &[(String, usize, usize)],
        operators: &HashMap<String, OperatorConfig>,
    ) -> AnonymizerResult<EngineResult> {
        let mut resolved = Vec::with_capacity(spans.len());
        for (entity_type, _, _) in spans {
            let (operator, config) = self.resolve(operators, entity_type)?;
            operator.validate(&config.params)?;
            resolved.push((operator, config));
        }

        let mut out = String::with_capacity(text.len());
        let mut items = Vec::with_capacity(spans.len());
        let mut cursor = 0;
        for ((entity_type, start, end), (operator, config)) in spans.iter().zip(resolved) {
            debug!(
                entity = entity_type.as_str(),
                operator = operator.operator_name(),
                start,
                end,
                "applying operator"
            );
            let replacement = operator.operate(&text[*start..*end], &config.params).await?;
            out.push_str(&text[cursor..*start]);
            let new_start = out.len();
            out.push_str(&replacement);
            items.push(OperatorResult {
                entity_type: entity_type.clone(),
                start: new_start,
                end: out.len(),
                operator: operator.operator_name().to_string(),
                text: replacement,
            });
            cursor = *end;
        }
        out.push_str(&text[cursor..]);

        Ok(EngineResult { text: out, items })
    }
}

fn check_span(text: &str, start: usize, end: usize) -> AnonymizerResult<()> {
    let valid = start <= end
        && end <= text.len()
        && text.is_char_boundary(start)
        && text.is_char_boundary(end);
    if valid {
        Ok(())
    } else {
        Err(AnonymizerError::InvalidSpan { start, end })
    }
}

/// Forward engine: applies anonymizing operators over detected spans.
pub struct AnonymizerEngine {
    registry: OperatorRegistry,
}

impl AnonymizerEngine {
    pub fn new() -> Self {
        Self {
            registry: OperatorRegistry::new(OperatorType::Anonymize),
        }
    }

    /// Registers an anonymizing operator under its own name.
    pub fn add_anonymizer(&mut self, operator: Arc<dyn Operator>) -> AnonymizerResult<()> {
        self.registry.add(operator)
    }

    /// Transforms every detected span, routing each through the operator
    /// configuration for its entity label (or `DEFAULT`).
    pub async fn anonymize(
        &self,
        text: &str,
        analyzer_results: Vec<RecognizerResult>,
        operators: &HashMap<String, OperatorConfig>,
        strategy: ConflictResolutionStrategy,
    ) -> AnonymizerResult<EngineResult> {
        let spans = resolve_conflicts(text, analyzer_results, strategy)?;
        self.registry.apply(text, &spans, operators).await
    }
}

impl Default for AnonymizerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Reverse engine: restores previously transformed spans.
pub struct DeanonymizeEngine {
    registry: OperatorRegistry,
}

impl DeanonymizeEngine {
    pub fn new() -> Self {
        Self {
            registry: OperatorRegistry::new(OperatorType::Deanonymize),
        }
    }

    /// Registers a deanonymizing operator under its own name.
    pub fn add_deanonymizer(&mut self, operator: Arc<dyn Operator>) -> AnonymizerResult<()> {
        self.registry.add(operator)
    }

    /// Reverses each item's span in `text`. Items come from a prior
    /// anonymize result, so overlap is an error rather than a policy.
    pub async fn deanonymize(
        &self,
        text: &str,
        entities: Vec<OperatorResult>,
        operators: &HashMap<String, OperatorConfig>,
    ) -> AnonymizerResult<EngineResult> {
        let mut sorted: Vec<_> = entities
            .into_iter()
            .map(|item| (item.entity_type, item.start, item.end))
            .collect();
        sorted.sort_by_key(|&(_, start, end)| (start, end));

        let mut prev_end = 0;
        for &(_, start, end) in &sorted {
            check_span(text, start, end)?;
            if start < prev_end {
                return Err(AnonymizerError::OverlappingSpans { start, end });
            }
            prev_end = end;
        }

        self.registry.apply(text, &sorted, operators).await
    }
}

impl Default for DeanonymizeEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorts spans, bounds-checks them, and applies the overlap policy.
/// Ties at the same start keep the longer span.
fn resolve_conflicts(
    text: &str,
    mut results: Vec<RecognizerResult>,
    strategy: ConflictResolutionStrategy,
) -> AnonymizerResult<Vec<(String, usize, usize)>> {
    results.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut kept: Vec<(String, usize, usize)> = Vec::with_capacity(results.len());
    for result in results {
        check_span(text, result.start, result.end)?;
        if let Some(&(_, _, prev_end)) = kept.last() {
            if result.start < prev_end {
                match strategy {
                    ConflictResolutionStrategy::RemoveIntersections => {
                        debug!(
                            entity = result.entity_type.as_str(),
                            start = result.start,
                            end = result.end,
                            "dropping intersecting span"
                        );
                        continue;
                    }
                    ConflictResolutionStrategy::None => {
                        return Err(AnonymizerError::OverlappingSpans {
                            start: result.start,
                            end: result.end,
                        });
                    }
                }
            }
        }
        kept.push((result.entity_type, result.start, result.end));
    }
    Ok(kept)
}
