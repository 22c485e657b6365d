use aresource::{decode, encode};
use serde_json::json;

/// Run the decode command: print the logical value of one piece of storage text.
pub fn run_decode_command(text: String, name: String, json_output: bool) -> Result<(), String> {
    let decoded = decode(Some(text.as_str()), &name).map_err(|e| e.to_string())?;
    let value = decoded.value.unwrap_or_default();

    if json_output {
        let out = json!({
            "value": value,
            "formatted": decoded.formatted,
        });
        let rendered = serde_json::to_string_pretty(&out)
            .map_err(|e| format!("Error serializing to JSON: {}", e))?;
        println!("{}", rendered);
    } else {
        println!("{}", value);
    }
    Ok(())
}

/// Run the encode command: print the storage text for a logical value.
pub fn run_encode_command(text: String) {
    println!("{}", encode(Some(text.as_str())).unwrap_or_default());
}
