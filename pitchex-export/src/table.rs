use pitchex_core::{ResultSink, SessionResult, SinkError, StimulusCategory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, info};

const NOT_PROVIDED: &str = "Not Provided";

/// Where the remote tabular store lives. The API key is read from the
/// environment variable named by `api_key_env`, never from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStoreConfig {
    pub endpoint: String,
    pub base_id: String,
    pub table: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for TableStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.airtable.com/v0".to_string(),
            base_id: String::new(),
            table: "Experiment Results".to_string(),
            api_key_env: "PITCHEX_TABLE_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl TableStoreConfig {
    pub fn records_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.base_id,
            self.table
        )
    }
}

/// Uploads one flat row per session to a REST tabular store.
pub struct TableStoreSink {
    http_client: reqwest::blocking::Client,
    config: TableStoreConfig,
    api_key: String,
}

impl TableStoreSink {
    /// Builds the sink with the key found in `config.api_key_env`.
    pub fn from_env(config: TableStoreConfig) -> Result<Self, SinkError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            SinkError::Unconfigured(format!("environment variable {} is not set", config.api_key_env))
        })?;
        Self::new(config, api_key)
    }

    pub fn new(config: TableStoreConfig, api_key: String) -> Result<Self, SinkError> {
        if config.base_id.is_empty() {
            return Err(SinkError::Unconfigured("table store base_id is empty".to_string()));
        }
        if api_key.is_empty() {
            return Err(SinkError::Unconfigured("table store API key is empty".to_string()));
        }
        let http_client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SinkError::Remote(e.to_string()))?;
        Ok(Self {
            http_client,
            config,
            api_key,
        })
    }
}

impl ResultSink for TableStoreSink {
    fn name(&self) -> &str {
        "table-store"
    }

    fn deliver(&self, result: &SessionResult) -> Result<(), SinkError> {
        let body = json!({ "records": [{ "fields": table_record(result)? }] });
        let url = self.config.records_url();
        debug!(%url, "uploading session result");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| SinkError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(SinkError::Remote(format!("{status}: {error_text}")));
        }
        info!(table = %self.config.table, "results saved to table store");
        Ok(())
    }
}

/// Flattens a result into the text columns of the results table.
pub fn table_record(result: &SessionResult) -> Result<Map<String, Value>, SinkError> {
    let text = |key: &str| -> Value {
        Value::String(
            result
                .participant_field(key)
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
        )
    };

    let mut fields = Map::new();
    fields.insert("Participant_Name".into(), text("name"));
    fields.insert("Age".into(), text("age"));
    fields.insert("Gender".into(), text("gender"));
    fields.insert("Native_Language".into(), text("native_language"));
    fields.insert("Musical_Experience".into(), text("years_musical_experience"));
    fields.insert("Primary_Instrument".into(), text("instrument"));
    for category in StimulusCategory::ALL {
        let threshold = result
            .final_step(category)
            .map_or_else(|| NOT_PROVIDED.to_string(), |s| s.to_string());
        fields.insert(format!("{}_Threshold", category.label()), Value::String(threshold));
        fields.insert(
            format!("{}_Accuracy", category.label()),
            Value::String(format!("{:.1}%", result.accuracy(category))),
        );
    }
    fields.insert(
        "Experiment_Date".into(),
        Value::String(result.started_at.format("%Y-%m-%d").to_string()),
    );
    fields.insert(
        "Complete_Results".into(),
        Value::String(serde_json::to_string_pretty(result)?),
    );
    Ok(fields)
}
