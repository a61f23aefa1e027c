use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::markup::{EngineOptions, FenceScan, ToggleMode};

/// How `render` prints the preview.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewFormat {
    /// Preview markup as emitted by the renderer
    Html,
    /// Styled text painted with terminal escapes
    Terminal,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub toggle_mode: Option<ToggleMode>,
    pub fence_scan: Option<FenceScan>,
    pub format: Option<PreviewFormat>,
    pub perf: bool,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; options set in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            toggle_mode: other.toggle_mode.or(self.toggle_mode),
            fence_scan: other.fence_scan.or(self.fence_scan),
            format: other.format.or(self.format),
            perf: self.perf || other.perf,
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }

    /// Encoding policy these flags select.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            toggle_mode: self.toggle_mode.unwrap_or_default(),
            fence_scan: self.fence_scan.unwrap_or_default(),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("textsmith").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("textsmith")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("textsmith").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("textsmith")
                .join("config");
        }
    }

    PathBuf::from(".textsmithrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".textsmithrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# textsmith defaults (saved with --save)".to_string()];
    if let Some(mode) = flags.toggle_mode {
        let mode = match mode {
            ToggleMode::Wrap => "wrap",
            ToggleMode::Unwrap => "unwrap",
        };
        lines.push(format!("--toggle-mode {mode}"));
    }
    if let Some(scan) = flags.fence_scan {
        let scan = match scan {
            FenceScan::Contains => "contains",
            FenceScan::Nearest => "nearest",
        };
        lines.push(format!("--fence-scan {scan}"));
    }
    if let Some(format) = flags.format {
        let format = match format {
            PreviewFormat::Html => "html",
            PreviewFormat::Terminal => "terminal",
        };
        lines.push(format!("--format {format}"));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the persistent flags out of a raw argument list.
///
/// Unknown tokens (subcommands, file names, other flags) are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        let takes_value = matches!(
            name,
            "--toggle-mode" | "--fence-scan" | "--format" | "--render-debug-log"
        );
        let value = if takes_value && inline.is_none() {
            i += 1;
            tokens.get(i).map(String::as_str)
        } else {
            inline
        };
        match (name, value) {
            ("--perf", None) => flags.perf = true,
            ("--toggle-mode", Some(v)) => flags.toggle_mode = parse_toggle_mode(v),
            ("--fence-scan", Some(v)) => flags.fence_scan = parse_fence_scan(v),
            ("--format", Some(v)) => flags.format = parse_format(v),
            ("--render-debug-log", Some(v)) => flags.render_debug_log = Some(PathBuf::from(v)),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_toggle_mode(s: &str) -> Option<ToggleMode> {
    match s {
        "wrap" => Some(ToggleMode::Wrap),
        "unwrap" => Some(ToggleMode::Unwrap),
        _ => None,
    }
}

fn parse_fence_scan(s: &str) -> Option<FenceScan> {
    match s {
        "contains" => Some(FenceScan::Contains),
        "nearest" => Some(FenceScan::Nearest),
        _ => None,
    }
}

fn parse_format(s: &str) -> Option<PreviewFormat> {
    match s {
        "html" => Some(PreviewFormat::Html),
        "terminal" => Some(PreviewFormat::Terminal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "textsmith".to_string(),
            "--toggle-mode".to_string(),
            "unwrap".to_string(),
            "--fence-scan=nearest".to_string(),
            "--perf".to_string(),
            "render".to_string(),
            "--format".to_string(),
            "terminal".to_string(),
            "--render-debug-log=render.log".to_string(),
            "notes.txt".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.toggle_mode, Some(ToggleMode::Unwrap));
        assert_eq!(flags.fence_scan, Some(FenceScan::Nearest));
        assert_eq!(flags.format, Some(PreviewFormat::Terminal));
        assert!(flags.perf);
        assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
    }

    #[test]
    fn test_parse_flag_tokens_ignores_bad_values() {
        let args = vec!["--toggle-mode".to_string(), "sideways".to_string()];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.toggle_mode, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            perf: true,
            toggle_mode: Some(ToggleMode::Unwrap),
            format: Some(PreviewFormat::Html),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            format: Some(PreviewFormat::Terminal),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.perf);
        assert_eq!(merged.toggle_mode, Some(ToggleMode::Unwrap));
        assert_eq!(merged.format, Some(PreviewFormat::Terminal));
    }

    #[test]
    fn test_engine_options_default_to_compatible_behavior() {
        let options = ConfigFlags::default().engine_options();
        assert_eq!(options.toggle_mode, ToggleMode::Wrap);
        assert_eq!(options.fence_scan, FenceScan::Contains);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".textsmithrc");
        let flags = ConfigFlags {
            toggle_mode: Some(ToggleMode::Unwrap),
            fence_scan: Some(FenceScan::Nearest),
            format: Some(PreviewFormat::Terminal),
            perf: true,
            render_debug_log: Some(PathBuf::from("render.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }
}
