use flow_lanes::{LayoutOptions, compute_layout_with_options, layout_to_json, parse_flow, parse_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Canvas-side extras that are not layout options.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanvasFlags {
    pretty: Option<bool>,
}

fn build_options(options_json: Option<&str>) -> Result<(LayoutOptions, CanvasFlags), String> {
    let Some(raw) = options_json else {
        return Ok((LayoutOptions::default(), CanvasFlags::default()));
    };
    let options = parse_options(raw).map_err(|error| error.to_string())?;
    // Unknown keys are ignored by both parsers, so the same document feeds both.
    let flags = serde_json::from_str::<CanvasFlags>(raw)
        .or_else(|_| json5::from_str::<CanvasFlags>(raw))
        .unwrap_or_default();
    Ok((options, flags))
}

fn layout_flow_inner(flow_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let (options, flags) = build_options(options_json)?;
    let graph = parse_flow(flow_json).map_err(|error| error.to_string())?;
    let layout = compute_layout_with_options(&graph, &options);
    layout_to_json(&layout, flags.pretty.unwrap_or(false)).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_flow(flow_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    layout_flow_inner(flow_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}
