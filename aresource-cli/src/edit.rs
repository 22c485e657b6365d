use aresource::{AndroidResourceFile, traits::Parser};

/// Run the set command: escape a new value into an existing unit and write
/// the file back (in place unless `output` is given).
pub fn run_set_command(
    input: String,
    key: String,
    value: String,
    output: Option<String>,
) -> Result<(), String> {
    let mut file = AndroidResourceFile::read_from(&input)
        .map_err(|e| format!("Error reading {}: {}", input, e))?;

    file.set_target(&key, Some(value.as_str()))
        .map_err(|e| format!("Error updating {}: {}", key, e))?;

    let out = output.unwrap_or(input);
    file.write_to(&out)
        .map_err(|e| format!("Error writing to {}: {}", out, e))?;
    println!("✅ Updated '{}' in {}", key, out);
    Ok(())
}
