use aresource::{AndroidResourceFile, traits::Parser};
use serde::Serialize;
use std::fs::File;
use std::io::Write;

#[derive(Serialize)]
struct DebugUnit<'a> {
    name: Option<&'a str>,
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    translatable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    formatted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct DebugFile<'a> {
    language: Option<&'a str>,
    units: Vec<DebugUnit<'a>>,
}

/// Run the debug command: read a resource file and output its units as JSON.
pub fn run_debug_command(input: String, output: Option<String>) -> Result<(), String> {
    let file = AndroidResourceFile::read_from(&input)
        .map_err(|e| format!("Error reading {}: {}", input, e))?;

    let units = file
        .targets()
        .map(|(unit, decoded)| {
            let (target, formatted, error) = match decoded {
                Ok(d) => (d.value, d.formatted, None),
                Err(e) => (None, false, Some(e.to_string())),
            };
            DebugUnit {
                name: unit.id(),
                text: unit.raw_text(),
                translatable: unit.translatable,
                target,
                formatted,
                error,
            }
        })
        .collect();
    let dump = DebugFile {
        language: file.language.as_deref(),
        units,
    };

    let json = serde_json::to_string_pretty(&dump)
        .map_err(|e| format!("Error serializing to JSON: {}", e))?;

    match output {
        Some(output_path) => {
            File::create(&output_path)
                .and_then(|mut f| f.write_all(json.as_bytes()))
                .map_err(|e| format!("Error writing to {}: {}", output_path, e))?;
            println!("✅ Debug output written to: {}", output_path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
