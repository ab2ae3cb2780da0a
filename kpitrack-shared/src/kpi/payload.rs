/// Validation of submitted metric maps
///
/// Create and update requests both carry a JSON object of metric key to value.
/// [`MetricPayload::parse`] turns that object into resolved `(Metric, value)`
/// pairs, rejecting it as a whole if anything is wrong, so nothing is written
/// for a partially valid submission.

use serde_json::{Map, Value as JsonValue};

use crate::models::metric::{Metric, UnknownMetric};

/// Reasons a metric submission is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// No metrics submitted
    #[error("empty metrics")]
    EmptyPayload,

    /// A metric was submitted with an empty string
    #[error("one of the metrics is empty")]
    BlankValue(String),

    /// A metric value was neither a number nor a string
    #[error("metric values must be numbers or text")]
    InvalidValue(String),

    /// A key that is not in the metric registry
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
}

impl From<UnknownMetric> for PayloadError {
    fn from(err: UnknownMetric) -> Self {
        PayloadError::UnknownMetric(err.0)
    }
}

/// Validated metric submission, in submission order
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPayload {
    entries: Vec<(Metric, JsonValue)>,
}

impl MetricPayload {
    /// Validates a raw metric map
    ///
    /// Checks run in this order:
    /// 1. the map is non-empty ([`PayloadError::EmptyPayload`])
    /// 2. no value is the empty string ([`PayloadError::BlankValue`])
    /// 3. every value is a number or a string ([`PayloadError::InvalidValue`])
    /// 4. every key names a registered metric ([`PayloadError::UnknownMetric`])
    pub fn parse(raw: Map<String, JsonValue>) -> Result<Self, PayloadError> {
        if raw.is_empty() {
            return Err(PayloadError::EmptyPayload);
        }

        if let Some((key, _)) = raw.iter().find(|(_, value)| value.as_str() == Some("")) {
            return Err(PayloadError::BlankValue(key.clone()));
        }

        if let Some((key, _)) = raw
            .iter()
            .find(|(_, value)| !(value.is_number() || value.is_string()))
        {
            return Err(PayloadError::InvalidValue(key.clone()));
        }

        let entries = raw
            .into_iter()
            .map(|(key, value)| Ok((key.parse::<Metric>()?, value)))
            .collect::<Result<Vec<_>, PayloadError>>()?;

        Ok(Self { entries })
    }

    /// Resolved `(metric, value)` pairs
    pub fn entries(&self) -> &[(Metric, JsonValue)] {
        &self.entries
    }

    /// Submitted metrics, without values
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.entries.iter().map(|(metric, _)| *metric)
    }

    /// The submission as a JSON object keyed by metric
    pub fn to_json(&self) -> Map<String, JsonValue> {
        self.entries
            .iter()
            .map(|(metric, value)| (metric.key().to_string(), value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_parse_valid_payload() {
        let payload =
            MetricPayload::parse(object(json!({"sales": 100, "traffic": "2k"}))).unwrap();

        assert_eq!(payload.len(), 2);
        assert!(payload.entries().contains(&(Metric::Sales, json!(100))));
        assert!(payload.entries().contains(&(Metric::Traffic, json!("2k"))));
    }

    #[test]
    fn test_parse_empty_payload() {
        assert_eq!(
            MetricPayload::parse(Map::new()),
            Err(PayloadError::EmptyPayload)
        );
    }

    #[test]
    fn test_parse_blank_value() {
        let result = MetricPayload::parse(object(json!({"sales": 10, "mrr": ""})));
        assert_eq!(result, Err(PayloadError::BlankValue("mrr".to_string())));
    }

    #[test]
    fn test_blank_value_reported_before_unknown_key() {
        let result = MetricPayload::parse(object(json!({"customers": 5, "sales": ""})));
        assert_eq!(result, Err(PayloadError::BlankValue("sales".to_string())));
    }

    #[test]
    fn test_parse_unknown_metric() {
        let result = MetricPayload::parse(object(json!({"sales": 10, "customers": 5})));
        assert_eq!(result, Err(PayloadError::UnknownMetric("customers".to_string())));
    }

    #[test]
    fn test_parse_rejects_structured_values() {
        for value in [json!(null), json!([1, 2]), json!({"a": 1}), json!(true)] {
            let result = MetricPayload::parse(object(json!({ "sales": value })));
            assert_eq!(result, Err(PayloadError::InvalidValue("sales".to_string())));
        }
    }

    #[test]
    fn test_zero_is_not_blank() {
        let payload = MetricPayload::parse(object(json!({"cpa": 0, "other_1": "0"}))).unwrap();
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_to_json_echoes_submission() {
        let raw = object(json!({"sales": 100, "pilots": "3"}));
        let payload = MetricPayload::parse(raw.clone()).unwrap();

        assert_eq!(payload.to_json(), raw);
        assert_eq!(
            payload.metrics().collect::<Vec<_>>(),
            vec![Metric::Sales, Metric::Pilots]
        );
    }
}
