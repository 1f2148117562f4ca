use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~` (Unix or Windows separator) to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    if let Some(rest) = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        return home().join(rest);
    }
    PathBuf::from(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde(" /etc/dynform.json "), PathBuf::from("/etc/dynform.json"));
    }

    #[test]
    fn tilde_prefix_joins_home() {
        let expanded = expand_tilde("~/forms/config.json");
        assert!(expanded.ends_with("forms/config.json"));
        assert!(!expanded.starts_with("~"));
    }
}
