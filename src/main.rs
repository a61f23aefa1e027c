//! Textsmith - format text for Discord from the command line.
//!
//! # Usage
//!
//! ```bash
//! textsmith style bold --start 6 --end 11 note.txt
//! textsmith color red --start 0 --end 4 --in-place note.txt
//! textsmith render --format terminal --watch note.txt
//! textsmith palette
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use serde::Serialize;

use textsmith::config::{
    ConfigFlags, PreviewFormat, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use textsmith::markup::palette::{self, BACKGROUND, FOREGROUND};
use textsmith::markup::{FenceScan, Style, ToggleMode};
use textsmith::perf;
use textsmith::preview::{self, terminal};
use textsmith::session::{Message, Notice, NoticeLevel, Session, update};
use textsmith::watcher::FileWatcher;

/// Format text for Discord: markdown styles, ANSI colors and a live preview
#[derive(Parser, Debug)]
#[command(name = "textsmith", version, about, long_about = None)]
struct Cli {
    /// What a repeated style does: nest delimiters or remove them
    #[arg(long, global = true, value_enum)]
    toggle_mode: Option<ToggleMode>,

    /// How to decide whether a selection is already inside an ansi block
    #[arg(long, global = true, value_enum)]
    fence_scan: Option<FenceScan>,

    /// Enable performance logging
    #[arg(long, global = true)]
    perf: bool,

    /// Write render debug events to a file
    #[arg(long, global = true, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the preview of a buffer
    Render {
        /// Source file (stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Preview output format
        #[arg(long, value_enum)]
        format: Option<PreviewFormat>,

        /// Re-render whenever the file changes
        #[arg(short, long, requires = "file")]
        watch: bool,
    },
    /// Apply a style to a selection
    Style {
        #[arg(value_enum)]
        style: Style,

        #[command(flatten)]
        target: EditTarget,
    },
    /// Color a selection with an ANSI palette entry
    Color {
        /// Color name or code, e.g. `red` or `31`
        name: String,

        /// Use the background palette
        #[arg(short, long)]
        background: bool,

        #[command(flatten)]
        target: EditTarget,
    },
    /// List the color palettes
    Palette {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct EditTarget {
    /// Selection start (char offset)
    #[arg(long)]
    start: usize,

    /// Selection end (char offset, exclusive)
    #[arg(long)]
    end: usize,

    /// Source file (stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Write the result back to FILE
    #[arg(short, long, requires = "file")]
    in_place: bool,

    /// Also print the preview of the result
    #[arg(long)]
    preview: bool,

    /// Preview output format for --preview
    #[arg(long, value_enum)]
    format: Option<PreviewFormat>,

    /// Print buffer, preview and notice as JSON
    #[arg(long, conflicts_with_all = ["in_place", "preview"])]
    json: bool,
}

#[derive(Serialize)]
struct EditReport<'a> {
    buffer: String,
    preview: &'a str,
    notice: Option<&'a Notice>,
}

fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => io::read_to_string(io::stdin()).context("Failed to read stdin"),
    }
}

fn print_preview(markup: &str, format: PreviewFormat) -> Result<()> {
    let mut out = io::stdout().lock();
    match format {
        PreviewFormat::Html => writeln!(out, "{markup}")?,
        PreviewFormat::Terminal => {
            terminal::paint(markup, &mut out)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run_edit(effective: &ConfigFlags, target: &EditTarget, action: Message) -> Result<()> {
    let source = read_source(target.file.as_deref())?;
    let session = Session::new(&source, effective.engine_options());
    let session = update(
        session,
        Message::Select {
            start: target.start,
            end: target.end,
        },
    );
    let session = update(session, action);

    let notice = session.notice();
    if let Some(notice) = notice.filter(|n| n.level != NoticeLevel::Success) {
        anyhow::bail!("{}: {}", notice.title, notice.description);
    }
    let buffer = session.buffer.text();

    if target.json {
        let report = EditReport {
            buffer,
            preview: session.preview(),
            notice,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match target.file.as_deref() {
        Some(path) if target.in_place => {
            std::fs::write(path, &buffer)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if let Some(notice) = notice {
                eprintln!("{}: {}", notice.title, notice.description);
            }
        }
        _ => {
            let mut out = io::stdout().lock();
            out.write_all(buffer.as_bytes())?;
            if !buffer.ends_with('\n') {
                writeln!(out)?;
            }
        }
    }

    if target.preview {
        print_preview(session.preview(), preview_format(target.format, effective))?;
    }
    Ok(())
}

/// A format given on the command line wins over saved defaults.
fn preview_format(requested: Option<PreviewFormat>, effective: &ConfigFlags) -> PreviewFormat {
    requested
        .or(effective.format)
        .unwrap_or(PreviewFormat::Html)
}

fn run_render(file: Option<&Path>, format: PreviewFormat, watch: bool) -> Result<()> {
    let source = read_source(file)?;
    print_preview(&preview::render(&source), format)?;
    if !watch {
        return Ok(());
    }

    let path = file.context("--watch needs a file")?;
    let mut watcher =
        FileWatcher::new(path, Duration::from_millis(200)).context("Failed to watch file")?;
    loop {
        if watcher.take_change_ready() {
            match read_source(Some(path)) {
                Ok(source) => {
                    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
                    print_preview(&preview::render(&source), format)?;
                }
                Err(err) => tracing::warn!("reload failed: {err:#}"),
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn run_palette(json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "foreground": &FOREGROUND[..],
            "background": &BACKGROUND[..],
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    for (label, tokens) in [("Text", &FOREGROUND), ("Background", &BACKGROUND)] {
        println!("{label} colors:");
        for token in tokens {
            println!("  {}  {:<8} {}", token.code, token.name, token.display);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    tracing::debug!(?effective, "effective configuration");

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("TEXTSMITH_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            "Failed to initialize render debug log {}: {err}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
        );
    }

    let Some(command) = cli.command else {
        if cli.save || cli.clear {
            return Ok(());
        }
        anyhow::bail!("no command given; try `textsmith --help`");
    };

    match command {
        Command::Render {
            file,
            format,
            watch,
        } => {
            let format = preview_format(format, &effective);
            run_render(file.as_deref(), format, watch)
        }
        Command::Style { style, target } => {
            run_edit(&effective, &target, Message::ApplyStyle(style))
        }
        Command::Color {
            name,
            background,
            target,
        } => {
            let token = palette::lookup(&name, background)?;
            run_edit(
                &effective,
                &target,
                Message::ApplyColor { token, background },
            )
        }
        Command::Palette { json } => run_palette(json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_target(args: &[&str]) -> EditTarget {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Some(Command::Style { target, .. } | Command::Color { target, .. }) => target,
            other => panic!("expected an edit command, got {other:?}"),
        }
    }

    #[test]
    fn test_style_accepts_preview_format_flag() {
        let target = edit_target(&[
            "textsmith", "style", "bold", "--start", "0", "--end", "3", "--preview", "--format",
            "terminal",
        ]);
        assert!(target.preview);
        assert_eq!(target.format, Some(PreviewFormat::Terminal));
        assert_eq!(
            preview_format(target.format, &ConfigFlags::default()),
            PreviewFormat::Terminal
        );
    }

    #[test]
    fn test_color_preview_format_falls_back_to_saved_default() {
        let target = edit_target(&[
            "textsmith", "color", "red", "--start", "0", "--end", "4", "--preview",
        ]);
        assert_eq!(target.format, None);
        let saved = ConfigFlags {
            format: Some(PreviewFormat::Terminal),
            ..ConfigFlags::default()
        };
        assert_eq!(preview_format(target.format, &saved), PreviewFormat::Terminal);
        assert_eq!(
            preview_format(Some(PreviewFormat::Html), &saved),
            PreviewFormat::Html
        );
    }
}
