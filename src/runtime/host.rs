//! Host identity: name and platform

/// Current host name, `"unknown"` if the OS does not report one
pub fn hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Operating system identifier (`linux`, `macos`, `windows`, ...)
pub fn platform() -> &'static str {
    std::env::consts::OS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_matches_os_report() {
        let name = hostname();
        assert!(!name.is_empty());

        if let Some(reported) = hostname::get().ok().and_then(|h| h.into_string().ok()) {
            assert_eq!(name, reported.trim());
        }
    }

    #[test]
    fn test_platform_matches_target_os() {
        assert!(!platform().is_empty());
        if cfg!(target_os = "linux") {
            assert_eq!(platform(), "linux");
        }
    }
}
