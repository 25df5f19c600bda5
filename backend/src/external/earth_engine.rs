//! Vegetation index computation on Google Earth Engine
//!
//! The index is computed server side through the REST `value:compute`
//! endpoint. The request carries a serialized expression graph equivalent to:
//! load Sentinel-2, filter by region, date window and cloud cover, map a
//! normalized difference of NIR and red over every scene, take the per-pixel
//! median and average it over the region.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{read_json, SourceError, TokenProvider};
use shared::models::{VegetationIndex, VegetationQuery, CLOUD_PROPERTY};
use shared::types::Coordinates;

const SERVICE: &str = "vegetation index";
const INDEX_BAND: &str = "NDVI";
const MAPPING_VAR: &str = "_MAPPING_VAR_0_0";

/// Earth Engine REST client
#[derive(Clone)]
pub struct EarthEngineClient {
    client: Client,
    base_url: String,
    project: String,
    tokens: Option<TokenProvider>,
}

#[derive(Debug, Deserialize)]
struct ComputeResponse {
    result: Option<f64>,
}

impl EarthEngineClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        project: impl Into<String>,
        tokens: Option<TokenProvider>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project: project.into(),
            tokens,
        }
    }

    /// Whether a project and service account credentials are set
    pub fn is_configured(&self) -> bool {
        !self.project.is_empty() && self.tokens.is_some()
    }

    /// Vegetation index over the 5 km region around a point for the 30 days
    /// ending at `as_of`. Blocks until the scalar is computed or the request
    /// times out.
    pub async fn compute_index(
        &self,
        latitude: f64,
        longitude: f64,
        as_of: NaiveDate,
    ) -> Result<VegetationIndex, SourceError> {
        let tokens = match &self.tokens {
            Some(tokens) if !self.project.is_empty() => tokens,
            _ => return Err(SourceError::unavailable(SERVICE, "Earth Engine is not configured")),
        };
        let access_token = tokens.access_token().await?;

        let query = VegetationQuery::trailing_window(Coordinates::new(latitude, longitude), as_of);
        let url = format!("{}/v1/projects/{}/value:compute", self.base_url, self.project);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&access_token)
            .json(&json!({ "expression": build_expression(&query) }))
            .send()
            .await;

        let data: ComputeResponse = read_json(SERVICE, response).await?;

        let value = data.result.ok_or_else(|| {
            tracing::debug!("No imagery for {:?}", query);
            SourceError::unavailable(SERVICE, "no cloud-free imagery in the window")
        })?;

        VegetationIndex::new(value).ok_or_else(|| {
            SourceError::unavailable(SERVICE, format!("index out of range: {}", value))
        })
    }
}

/// Serialize a vegetation query into an Earth Engine expression graph
pub fn build_expression(query: &VegetationQuery) -> Value {
    let mut graph = ExpressionGraph::default();

    let point = graph.push(invoke(
        "GeometryConstructors.Point",
        json!({ "coordinates": constant(json!([query.center.longitude, query.center.latitude])) }),
    ));
    let region = graph.push(invoke(
        "Geometry.buffer",
        json!({ "geometry": point, "distance": constant(json!(query.radius_meters)) }),
    ));

    let scenes = graph.push(invoke(
        "ImageCollection.load",
        json!({ "id": constant(json!(query.collection)) }),
    ));
    let in_region = graph.push(filter(
        scenes,
        invoke(
            "Filter.intersects",
            json!({ "leftField": constant(json!(".all")), "rightValue": region.clone() }),
        ),
    ));
    let in_window = graph.push(filter(
        in_region,
        invoke(
            "Filter.dateRangeContains",
            json!({
                "leftValue": invoke(
                    "DateRange",
                    json!({
                        "start": constant(json!(query.start_date.to_string())),
                        "end": constant(json!(query.end_date.to_string())),
                    }),
                ),
                "rightField": constant(json!("system:time_start")),
            }),
        ),
    ));
    let clear = graph.push(filter(
        in_window,
        invoke(
            "Filter.lessThan",
            json!({
                "leftField": constant(json!(CLOUD_PROPERTY)),
                "rightValue": constant(json!(query.max_cloud_percent)),
            }),
        ),
    ));

    let per_scene = graph.push_key(invoke(
        "Image.rename",
        json!({
            "input": invoke(
                "Image.normalizedDifference",
                json!({
                    "input": { "argumentReference": MAPPING_VAR },
                    "bandNames": constant(json!([query.nir_band, query.red_band])),
                }),
            ),
            "names": constant(json!([INDEX_BAND])),
        }),
    ));
    let indexed = graph.push(invoke(
        "Collection.map",
        json!({
            "collection": clear,
            "baseAlgorithm": {
                "functionDefinitionValue": {
                    "argumentNames": [MAPPING_VAR],
                    "body": per_scene,
                }
            },
        }),
    ));

    let composite = graph.push(invoke("reduce.median", json!({ "collection": indexed })));
    let stats = graph.push(invoke(
        "Image.reduceRegion",
        json!({
            "image": composite,
            "reducer": invoke("Reducer.mean", json!({})),
            "geometry": region,
            "scale": constant(json!(query.scale_meters)),
        }),
    ));
    let result = graph.push_key(invoke(
        "Dictionary.get",
        json!({ "dictionary": stats, "key": constant(json!(INDEX_BAND)) }),
    ));

    graph.into_expression(result)
}

/// Flat node table of an expression, keyed by insertion index
#[derive(Default)]
struct ExpressionGraph {
    values: Map<String, Value>,
}

impl ExpressionGraph {
    /// Add a node, returning its key
    fn push_key(&mut self, node: Value) -> String {
        let key = self.values.len().to_string();
        self.values.insert(key.clone(), node);
        key
    }

    /// Add a node, returning a reference to it
    fn push(&mut self, node: Value) -> Value {
        let key = self.push_key(node);
        json!({ "valueReference": key })
    }

    fn into_expression(self, result: String) -> Value {
        json!({ "result": result, "values": self.values })
    }
}

fn invoke(function_name: &str, arguments: Value) -> Value {
    json!({
        "functionInvocationValue": {
            "functionName": function_name,
            "arguments": arguments,
        }
    })
}

fn constant(value: Value) -> Value {
    json!({ "constantValue": value })
}

fn filter(collection: Value, filter: Value) -> Value {
    invoke(
        "Collection.filter",
        json!({ "collection": collection, "filter": filter }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> VegetationQuery {
        VegetationQuery::trailing_window(
            Coordinates::new(20.0, 73.78),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
    }

    fn function_names(expression: &Value) -> Vec<String> {
        let mut names = Vec::new();
        collect_names(expression, &mut names);
        names
    }

    fn collect_names(value: &Value, names: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(name)) = map.get("functionName") {
                    names.push(name.clone());
                }
                map.values().for_each(|v| collect_names(v, names));
            }
            Value::Array(items) => items.iter().for_each(|v| collect_names(v, names)),
            _ => {}
        }
    }

    #[test]
    fn test_expression_result_points_at_last_node() {
        let expression = build_expression(&query());
        let result = expression["result"].as_str().unwrap();
        let node = &expression["values"][result];
        assert_eq!(
            node["functionInvocationValue"]["functionName"],
            json!("Dictionary.get")
        );
    }

    #[test]
    fn test_expression_pipeline_steps() {
        let names = function_names(&build_expression(&query()));
        for step in [
            "ImageCollection.load",
            "Filter.intersects",
            "Filter.dateRangeContains",
            "Filter.lessThan",
            "Image.normalizedDifference",
            "Collection.map",
            "reduce.median",
            "Image.reduceRegion",
            "Reducer.mean",
        ] {
            assert!(names.iter().any(|n| n == step), "missing {}", step);
        }
    }

    #[test]
    fn test_expression_constants() {
        let text = build_expression(&query()).to_string();
        assert!(text.contains("\"COPERNICUS/S2\""));
        assert!(text.contains("\"2024-05-31\""));
        assert!(text.contains("\"2024-06-30\""));
        assert!(text.contains("[\"B8\",\"B4\"]"));
        assert!(text.contains("CLOUDY_PIXEL_PERCENTAGE"));
        assert!(text.contains("[73.78,20.0]"));
    }
}
