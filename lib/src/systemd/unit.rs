use crate::error::{Error, Result};

/// A parsed unit file: sections in file order, each with its directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFile {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub directives: Vec<(String, String)>,
}

impl UnitFile {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Last value of `key` in `section`, matching systemd's override order.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.directives
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.directives
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse the text of a unit file. Quoted values are unquoted.
pub fn parse_unit(contents: &str) -> Result<UnitFile> {
    let mut unit = UnitFile::default();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            unit.sections.push(Section {
                name: name.to_string(),
                directives: Vec::new(),
            });
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(Error::InvalidUnit {
                line: index + 1,
                reason: format!("expected KEY=VALUE, found {line:?}"),
            });
        };
        let Some(section) = unit.sections.last_mut() else {
            return Err(Error::InvalidUnit {
                line: index + 1,
                reason: "directive outside of a section".to_string(),
            });
        };
        section
            .directives
            .push((key.trim().to_string(), unquote(value.trim())));
    }
    Ok(unit)
}

/// Undo [`quote`](super::template::quote) for a value that is entirely
/// wrapped in double quotes. Other values are returned as is.
pub fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::systemd::template::{quote, UnitContext, UnitTemplate};

    #[test]
    fn test_parse_sections_and_directives() {
        let unit = parse_unit(
            "# Managed elsewhere\n[Unit]\nDescription=Demo\nAfter=a.target\nAfter=b.target\n\n[Service]\nExecStart=/bin/demo\n",
        )
        .unwrap();
        assert_eq!(unit.section_names(), vec!["Unit", "Service"]);
        assert_eq!(unit.get("Unit", "Description"), Some("Demo"));
        let after: Vec<_> = unit.section("Unit").unwrap().get_all("After").collect();
        assert_eq!(after, vec!["a.target", "b.target"]);
        assert_eq!(unit.get("Service", "ExecStart"), Some("/bin/demo"));
        assert_eq!(unit.get("Install", "WantedBy"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_unit("[Unit]\nnot a directive\n").unwrap_err();
        assert!(matches!(err, Error::InvalidUnit { line: 2, .. }));

        let err = parse_unit("Description=orphan\n").unwrap_err();
        assert!(matches!(err, Error::InvalidUnit { line: 1, .. }));
    }

    #[test]
    fn test_unquote_reverses_quote() {
        for value in ["/opt/my app/bin", r#"say "hi""#, r"C:\dir", "plain"] {
            assert_eq!(unquote(&quote(value)), value);
        }
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn test_rendered_unit_recovers_options() {
        let mut config = ServiceConfig::new("demo");
        config.options.restart = "on-failure".to_string();
        config.options.kill_signal = "SIGINT".to_string();
        config.options.pid_file = Some("/run/demo app/demo.pid".to_string());

        let template = UnitTemplate::new(None).unwrap();
        let rendered = template
            .render(&UnitContext::new(&config, "/usr/bin/demo".to_string(), true))
            .unwrap();
        let unit = parse_unit(&rendered).unwrap();

        assert_eq!(unit.section_names(), vec!["Unit", "Service", "Install"]);
        assert_eq!(unit.get("Service", "Restart"), Some("on-failure"));
        assert_eq!(unit.get("Service", "KillSignal"), Some("SIGINT"));
        assert_eq!(unit.get("Service", "PIDFile"), Some("/run/demo app/demo.pid"));
        assert_eq!(unit.get("Install", "WantedBy"), Some("multi-user.target"));
    }
}
