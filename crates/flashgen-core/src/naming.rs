//! Deterministic artifact filenames

/// Backup file for a configuration: `backup-<model>-<flash_type>.bin`
pub fn backup_filename(soc_model: &str, flash_type: &str) -> String {
    format!("backup-{}-{}.bin", soc_model.to_lowercase(), flash_type)
}

/// Composed full-flash image: `openipc-<model>-<flash_type>-<release>-<size>.bin`
pub fn image_filename(soc_model: &str, flash_type: &str, fw_release: &str, flash_size: &str) -> String {
    format!(
        "openipc-{}-{}-{}-{}.bin",
        soc_model.to_lowercase(),
        sanitize(flash_type),
        sanitize(fw_release),
        sanitize(&flash_size.to_lowercase()),
    )
}

// Keeps user supplied parts from escaping the output directory.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '_' { c } else { '-' })
        .collect::<String>()
        .replace("..", "-")
        .trim_matches('.')
        .to_string()
}
