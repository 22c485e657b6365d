use aresource::AndroidResourceFile;

const TRUNCATE_AT: usize = 50;

fn truncate(value: &str, full: bool) -> String {
    if full || value.chars().count() <= TRUNCATE_AT {
        value.to_string()
    } else {
        let head: String = value.chars().take(TRUNCATE_AT).collect();
        format!("{}...", head)
    }
}

/// Print every unit of a resource file with its decoded value.
///
/// Units that fail to decode are listed with their error; the rest of the
/// file is still shown. Returns the number of failing units.
pub fn print_view(file: &AndroidResourceFile, full: bool) -> usize {
    println!("=== Resource ===");
    if let Some(language) = &file.language {
        println!("Language: {}", language);
    }
    println!("Units: {}", file.len());

    let mut failures = 0;
    for (i, (unit, decoded)) in file.targets().enumerate() {
        println!("\n  Unit {}: {}", i + 1, unit.id().unwrap_or("<unnamed>"));
        if let Some(translatable) = unit.translatable {
            println!("    Translatable: {}", translatable);
        }
        match decoded {
            Ok(decoded) => {
                match decoded.value {
                    Some(value) => println!("    Value: {}", truncate(&value, full)),
                    None => println!("    Value: <none>"),
                }
                if decoded.formatted {
                    println!("    Formatted: yes");
                }
            }
            Err(e) => {
                failures += 1;
                println!("    Error: {}", e);
            }
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        let long = "é".repeat(60);
        let short = truncate(&long, false);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), TRUNCATE_AT + 3);
        assert_eq!(truncate(&long, true), long);
    }
}
