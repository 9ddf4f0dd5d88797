//! JSON-lines invocation session
//!
//! One request per line:
//! `{"id": 1, "function": "set_brand", "arguments": {"brand_key": "contoso"}}`
//!
//! One response per request, `result` on success or `error` otherwise:
//! `{"id": 1, "function": "set_brand", "result": "Brand set to Contoso Grill"}`

use eyre::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::io::{BufRead, Write};

use super::KernelPlugin;

/// A single function call from the host
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Value>,
    pub function: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arguments: Map<String, Value>,
}

/// `"arguments": null` means no arguments
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map<String, Value>, D::Error> {
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reply written back for every request line
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(request: Request, result: String) -> Self {
        Self {
            id: request.id,
            function: Some(request.function),
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Option<Value>, function: Option<String>, message: String) -> Self {
        Self {
            id,
            function,
            result: None,
            error: Some(message),
        }
    }
}

/// Handle one request line
pub fn handle_line(plugin: &mut dyn KernelPlugin, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Malformed request: {}", e);
            let (id, function) = salvage_ids(line);
            return Response::err(id, function, format!("Malformed request: {}", e));
        }
    };

    match plugin.invoke(&request.function, &request.arguments) {
        Ok(result) => Response::ok(request, result),
        Err(e) => Response::err(request.id, Some(request.function), format!("{:#}", e)),
    }
}

/// Pull `id` and `function` out of a request that failed to deserialize
fn salvage_ids(line: &str) -> (Option<Value>, Option<String>) {
    let Ok(Value::Object(mut fields)) = serde_json::from_str::<Value>(line) else {
        return (None, None);
    };

    let id = fields.remove("id").filter(|id| !id.is_null());
    let function = match fields.remove("function") {
        Some(Value::String(name)) => Some(name),
        _ => None,
    };
    (id, function)
}

/// Serve requests until EOF, returning how many were handled
pub fn run<R: BufRead, W: Write>(plugin: &mut dyn KernelPlugin, mut input: R, mut output: W) -> Result<usize> {
    let mut handled = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = input.read_until(b'\n', &mut buf).context("Failed to read request")?;
        if read == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(plugin, line),
            Err(e) => {
                log::warn!("Request is not valid UTF-8: {}", e);
                Response::err(None, None, format!("Malformed request: {}", e))
            }
        };

        let encoded = serde_json::to_string(&response).context("Failed to encode response")?;
        writeln!(output, "{}", encoded).context("Failed to write response")?;
        output.flush().context("Failed to flush response")?;
        handled += 1;
    }

    log::info!("Session ended after {} request(s)", handled);
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::registry::BrandRegistry;
    use crate::brand::{BrandConfig, BrandTable};
    use crate::plugin::BrandPlugin;
    use std::io::Cursor;

    fn plugin() -> BrandPlugin {
        let table: BrandTable = [
            (
                "contoso".to_string(),
                BrandConfig {
                    name: "Contoso Grill".to_string(),
                    ..Default::default()
                },
            ),
            (
                "fabrikam".to_string(),
                BrandConfig {
                    name: "Fabrikam Bistro".to_string(),
                    ..Default::default()
                },
            ),
        ]
        .into_iter()
        .collect();
        BrandPlugin::new(BrandRegistry::new(table, "contoso"))
    }

    fn run_session(input: &str) -> Vec<Value> {
        run_session_bytes(input.as_bytes())
    }

    fn run_session_bytes(input: &[u8]) -> Vec<Value> {
        let mut plugin = plugin();
        let mut output = Vec::new();
        run(&mut plugin, Cursor::new(input), &mut output).unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_session_keeps_brand_between_calls() {
        let responses = run_session(concat!(
            r#"{"id": 1, "function": "set_brand", "arguments": {"brand_key": "fabrikam"}}"#,
            "\n",
            r#"{"id": 2, "function": "get_brand_name"}"#,
            "\n",
        ));

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"], "Brand set to Fabrikam Bistro");
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"], "Fabrikam Bistro");
    }

    #[test]
    fn test_session_reports_errors_and_continues() {
        let responses = run_session(concat!(
            "this is not json\n",
            "\n",
            r#"{"id": "a", "function": "explode"}"#,
            "\n",
            r#"{"function": "list_brands"}"#,
            "\n",
        ));

        assert_eq!(responses.len(), 3);
        assert!(responses[0]["error"].as_str().unwrap().starts_with("Malformed request"));
        assert_eq!(responses[1]["id"], "a");
        assert!(responses[1]["error"].as_str().unwrap().contains("Unknown function"));
        assert!(responses[2].get("id").is_none());
        assert_eq!(
            responses[2]["result"],
            "Available brands:\n- contoso: Contoso Grill\n- fabrikam: Fabrikam Bistro"
        );
    }

    #[test]
    fn test_session_answers_after_invalid_utf8_line() {
        let mut input = Vec::new();
        input.extend_from_slice(br#"{"id": 1, "function": "get_brand_name"}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"id": 3, "function": "list_brands"}"#);

        let responses = run_session_bytes(&input);

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["result"], "Contoso Grill");
        assert!(responses[1]["error"].as_str().unwrap().starts_with("Malformed request"));
        assert!(responses[1].get("id").is_none());
        assert_eq!(responses[2]["id"], 3);
        assert!(responses[2]["result"].as_str().unwrap().starts_with("Available brands:"));
    }

    #[test]
    fn test_session_null_arguments_are_empty() {
        let responses = run_session(concat!(r#"{"id": 1, "function": "get_brand_name", "arguments": null}"#, "\n"));

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"], "Contoso Grill");
    }

    #[test]
    fn test_session_malformed_request_keeps_id() {
        let responses = run_session(concat!(
            r#"{"id": 7, "function": "set_brand", "arguments": ["fabrikam"]}"#,
            "\n",
            r#"{"id": 8}"#,
            "\n",
        ));

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 7);
        assert_eq!(responses[0]["function"], "set_brand");
        assert!(responses[0]["error"].as_str().unwrap().starts_with("Malformed request"));
        assert_eq!(responses[1]["id"], 8);
        assert!(responses[1].get("function").is_none());
    }

    #[test]
    fn test_session_empty_input() {
        assert!(run_session("").is_empty());
    }
}
