use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";

/// Where `config.toml` would live, if anywhere.
///
/// Only computes the path; nothing is created. `None` when no base
/// directory can be found, which callers treat as "no config".
pub fn config_path() -> Option<PathBuf> {
    config_path_from(|key| env::var_os(key))
}

fn config_path_from(var: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    // Empty values count as unset, per the XDG base directory rules.
    let var = |key: &str| var(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    let dir = if let Some(base) = var("ISSUE_AGENT_HOME") {
        base.join("config")
    } else if let Some(xdg) = var("XDG_CONFIG_HOME") {
        xdg.join("issue-agent")
    } else {
        var("HOME")?.join(".config").join("issue-agent")
    };

    Some(dir.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> Option<PathBuf> {
        let map: HashMap<String, OsString> =
            vars.iter().map(|(k, v)| (k.to_string(), OsString::from(v))).collect();
        config_path_from(|k| map.get(k).cloned())
    }

    #[test]
    fn agent_home_wins() {
        let p = lookup(&[("ISSUE_AGENT_HOME", "/a"), ("XDG_CONFIG_HOME", "/x"), ("HOME", "/h")]);
        assert_eq!(p, Some(PathBuf::from("/a/config/config.toml")));
    }

    #[test]
    fn falls_back_to_xdg_then_home() {
        assert_eq!(
            lookup(&[("XDG_CONFIG_HOME", "/x"), ("HOME", "/h")]),
            Some(PathBuf::from("/x/issue-agent/config.toml"))
        );
        assert_eq!(
            lookup(&[("XDG_CONFIG_HOME", ""), ("HOME", "/h")]),
            Some(PathBuf::from("/h/.config/issue-agent/config.toml"))
        );
    }

    #[test]
    fn no_home_means_no_config() {
        assert_eq!(lookup(&[]), None);
    }

    #[test]
    fn lookup_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().to_str().unwrap();

        let p = lookup(&[("HOME", home)]).unwrap();

        assert!(!p.exists());
        assert!(!dir.path().join(".config").exists());
    }
}
