use serde::{Deserialize, Serialize};

/// Time bucket size for a cost query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Monthly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Monthly => "MONTHLY",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cost-and-usage request. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuery {
    pub granularity: Granularity,
    pub start: String,
    pub end: String,
}

/// First time bucket of a cost-and-usage response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostResult {
    pub start: String,
    pub end: String,
    /// Decimal string exactly as returned by the API
    pub amount: String,
    /// Currency code (e.g., "USD")
    pub unit: String,
}

/// A configured request: which bucket size to ask for and how to label it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSpec {
    pub granularity: Granularity,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostReport {
    pub label: String,
    pub granularity: Granularity,
    #[serde(flatten)]
    pub result: CostResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_api_names() {
        assert_eq!(Granularity::Daily.as_str(), "DAILY");
        assert_eq!(Granularity::Monthly.to_string(), "MONTHLY");
    }

    #[test]
    fn report_spec_parses_lowercase_granularity() {
        let spec: ReportSpec =
            toml::from_str("granularity = \"monthly\"\nlabel = \"Month to date\"").unwrap();
        assert_eq!(spec.granularity, Granularity::Monthly);
        assert_eq!(spec.label, "Month to date");
    }

    #[test]
    fn cost_report_serializes_flat() {
        let report = CostReport {
            label: "Yesterday".into(),
            granularity: Granularity::Daily,
            result: CostResult {
                start: "2024-03-14".into(),
                end: "2024-03-15".into(),
                amount: "1.5".into(),
                unit: "USD".into(),
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["label"], "Yesterday");
        assert_eq!(json["granularity"], "daily");
        assert_eq!(json["amount"], "1.5");
        assert_eq!(json["start"], "2024-03-14");
    }
}
