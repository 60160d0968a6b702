use crate::dispatcher::{HandlerRequest, HandlerResponse};
use serde_json::{json, Map, Value};

// Example handler: echoes back what the router matched
pub fn echo_handler(req: &HandlerRequest) -> anyhow::Result<HandlerResponse> {
    let params: Map<String, Value> = req
        .path_params
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
        .collect();

    Ok(HandlerResponse::json(
        200,
        json!({
            "dispatch_id": req.dispatch_id.to_string(),
            "method": req.method.to_string(),
            "path": req.path,
            "route": req.route_pattern,
            "params": params,
        }),
    ))
}
