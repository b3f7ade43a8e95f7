//! DynamoDB-backed document store.
//!
//! A scan for `contains(TitleToSearch, "alien")` is sent as:
//!
//! ```text
//! aws dynamodb scan \
//!   --table-name Movies \
//!   --filter-expression "contains(#Title, :Title)" \
//!   --expression-attribute-names '{"#Title": "TitleToSearch"}' \
//!   --expression-attribute-values '{":Title":{"S":"alien"}}'
//! ```
//!
//! Pagination follows `LastEvaluatedKey`. AWS configuration is resolved when
//! a scan is opened, so a bad environment shows up as a failure to open the
//! scan rather than at startup.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, Page, Paginator, ScanFilter, ScanRequest};
use crate::types::RawRecord;

const TITLE_NAME_PLACEHOLDER: &str = "#Title";
const TITLE_VALUE_PLACEHOLDER: &str = ":Title";

type Item = HashMap<String, AttributeValue>;

/// Connection settings for the DynamoDB backend.
///
/// Anything left unset falls back to the default AWS provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamoDbSettings {
    /// AWS region (e.g. "us-east-1")
    pub region: Option<String>,
    /// Endpoint override, for DynamoDB Local
    pub endpoint_url: Option<String>,
    /// Physical table name, when it differs from the logical collection
    pub table_name: Option<String>,
}

/// `DocumentStore` over a DynamoDB table
#[derive(Debug, Clone, Default)]
pub struct DynamoDbStore {
    settings: DynamoDbSettings,
}

impl DynamoDbStore {
    pub fn new(settings: DynamoDbSettings) -> Self {
        Self { settings }
    }

    async fn client(&self) -> StoreResult<Client> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &self.settings.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let config = loader.load().await;
        if config.region().is_none() {
            return Err(StoreError::Config("no AWS region configured".to_string()));
        }

        Ok(Client::new(&config))
    }
}

#[async_trait]
impl DocumentStore for DynamoDbStore {
    fn name(&self) -> &str {
        "dynamodb"
    }

    async fn open_scan(&self, request: ScanRequest) -> StoreResult<Box<dyn Paginator>> {
        let client = self.client().await?;
        let table_name = self
            .settings
            .table_name
            .clone()
            .unwrap_or(request.collection);

        debug!("Opening scan on table {}", table_name);

        Ok(Box::new(DynamoDbPaginator {
            client,
            table_name,
            expression: ScanExpression::from_filter(&request.filter),
            exclusive_start_key: None,
            started: false,
        }))
    }
}

/// Filter expression plus its placeholder bindings
#[derive(Debug, Clone, PartialEq)]
pub struct ScanExpression {
    pub filter_expression: String,
    pub attribute_names: HashMap<String, String>,
    pub attribute_values: HashMap<String, AttributeValue>,
}

impl ScanExpression {
    pub fn from_filter(filter: &ScanFilter) -> Self {
        match filter {
            ScanFilter::Contains { attribute, value } => Self {
                filter_expression: format!(
                    "contains({}, {})",
                    TITLE_NAME_PLACEHOLDER, TITLE_VALUE_PLACEHOLDER
                ),
                attribute_names: HashMap::from([(
                    TITLE_NAME_PLACEHOLDER.to_string(),
                    attribute.clone(),
                )]),
                attribute_values: HashMap::from([(
                    TITLE_VALUE_PLACEHOLDER.to_string(),
                    AttributeValue::S(value.clone()),
                )]),
            },
        }
    }
}

struct DynamoDbPaginator {
    client: Client,
    table_name: String,
    expression: ScanExpression,
    exclusive_start_key: Option<Item>,
    started: bool,
}

#[async_trait]
impl Paginator for DynamoDbPaginator {
    fn has_more_pages(&self) -> bool {
        !self.started || self.exclusive_start_key.is_some()
    }

    async fn next_page(&mut self) -> StoreResult<Page> {
        if !self.has_more_pages() {
            return Err(StoreError::Exhausted);
        }

        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression(&self.expression.filter_expression)
            .set_expression_attribute_names(Some(self.expression.attribute_names.clone()))
            .set_expression_attribute_values(Some(self.expression.attribute_values.clone()))
            .set_exclusive_start_key(self.exclusive_start_key.take())
            .send()
            .await
            .map_err(|e| StoreError::Request(DisplayErrorContext(&e).to_string()))?;

        self.started = true;
        self.exclusive_start_key = output.last_evaluated_key;

        let items: Vec<RawRecord> = output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(item_to_record)
            .collect();

        debug!(
            "Fetched page of {} items from {} (more: {})",
            items.len(),
            self.table_name,
            self.exclusive_start_key.is_some()
        );

        Ok(Page::new(items))
    }
}

/// Translate a DynamoDB item into the backend-agnostic record shape
pub fn item_to_record(item: Item) -> RawRecord {
    item.into_iter()
        .map(|(name, value)| (name, attribute_to_json(value)))
        .collect()
}

fn attribute_to_json(value: AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => Value::Array(list.into_iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(item_to_record(map)),
        AttributeValue::Ss(set) => Value::Array(set.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(set.into_iter().map(number_to_json).collect()),
        AttributeValue::B(blob) => {
            Value::String(String::from_utf8_lossy(blob.as_ref()).into_owned())
        }
        _ => Value::Null,
    }
}

fn number_to_json(n: String) -> Value {
    n.parse::<Number>()
        .map(Value::Number)
        .unwrap_or(Value::String(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Movie, SearchQuery};

    #[test]
    fn test_scan_expression_matches_contains_filter() {
        let filter = ScanFilter::title_contains(&SearchQuery::new("TitleToSearch"));

        let expression = ScanExpression::from_filter(&filter);

        assert_eq!(expression.filter_expression, "contains(#Title, :Title)");
        assert_eq!(
            expression.attribute_names,
            HashMap::from([("#Title".to_string(), "TitleToSearch".to_string())])
        );
        assert_eq!(
            expression.attribute_values,
            HashMap::from([(
                ":Title".to_string(),
                AttributeValue::S("titletosearch".to_string())
            )])
        );
    }

    #[test]
    fn test_item_to_record_decodes_into_movie() {
        let item: Item = HashMap::from([
            ("Title".to_string(), AttributeValue::S("Title 1".to_string())),
            ("Location".to_string(), AttributeValue::S("loc 1".to_string())),
            ("Type".to_string(), AttributeValue::S("kind".to_string())),
        ]);

        let movies = Page::new(vec![item_to_record(item)]).decode().unwrap();

        assert_eq!(movies, vec![Movie::new("Title 1", "loc 1", "kind")]);
    }

    #[test]
    fn test_attribute_conversion() {
        assert_eq!(attribute_to_json(AttributeValue::N("42".to_string())), Value::from(42));
        assert_eq!(attribute_to_json(AttributeValue::Bool(true)), Value::Bool(true));
        assert_eq!(attribute_to_json(AttributeValue::Null(true)), Value::Null);
        assert_eq!(
            attribute_to_json(AttributeValue::L(vec![AttributeValue::S("a".to_string())])),
            Value::Array(vec![Value::String("a".to_string())])
        );
    }

    #[test]
    fn test_number_attribute_that_does_not_parse_stays_a_string() {
        assert_eq!(
            number_to_json("not-a-number".to_string()),
            Value::String("not-a-number".to_string())
        );
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: DynamoDbSettings =
            serde_json::from_str(r#"{"region": "eu-west-1"}"#).unwrap();

        assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
        assert!(settings.endpoint_url.is_none());
        assert!(settings.table_name.is_none());
    }
}
