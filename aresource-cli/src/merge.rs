use aresource::{AndroidResourceFile, traits::Parser};

/// Run the merge-base command: attach the base-language strings as sources of
/// a translation and add the units it is missing.
pub fn run_merge_base_command(
    input: String,
    base: String,
    output: Option<String>,
) -> Result<(), String> {
    let base_file = AndroidResourceFile::read_from(&base)
        .map_err(|e| format!("Error reading {}: {}", base, e))?;
    let mut file = AndroidResourceFile::read_from(&input)
        .map_err(|e| format!("Error reading {}: {}", input, e))?;

    let added = file
        .set_base_resource(&base_file)
        .map_err(|e| format!("Error merging {}: {}", base, e))?;

    let out = output.unwrap_or(input);
    file.write_to(&out)
        .map_err(|e| format!("Error writing to {}: {}", out, e))?;
    println!(
        "✅ Added {} missing unit(s) from {} to {}",
        added, base, out
    );
    Ok(())
}
