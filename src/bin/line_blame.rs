use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use line_blame::{
    BlameWidget, Clipboard, Config, Event, HostFacilities, LinkOpener, Notifier,
};

#[derive(Parser)]
#[command(
    name = "line-blame",
    about = "Print the status-bar blame text for one line of a file"
)]
struct BlameArgs {
    /// File to blame
    file: PathBuf,
    /// 1-based line number
    #[arg(short, long, default_value_t = 1)]
    line: u32,
    /// Print the rendered status-bar markup instead of plain text
    #[arg(long)]
    markup: bool,
    /// Resolve and print the commit URL for the line instead of blame text
    #[arg(long)]
    link: bool,
}

/// Host stand-in for a terminal: the "clipboard" and "browser" both print,
/// notifications go to stderr.
struct TerminalHost;

impl Clipboard for TerminalHost {
    fn write(&self, text: &str) {
        println!("{text}");
    }
}

impl Notifier for TerminalHost {
    fn show(&self, message: &str, _duration_ms: u32) {
        eprintln!("{message}");
    }
}

impl LinkOpener for TerminalHost {
    fn open(&self, url: &str) {
        println!("{url}");
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = BlameArgs::parse();
    let config = Config::load()?;

    let host = HostFacilities {
        clipboard: Box::new(TerminalHost),
        notifier: Box::new(TerminalHost),
        opener: Box::new(TerminalHost),
    };

    let file = std::path::absolute(&args.file).unwrap_or(args.file);
    let mut widget = BlameWidget::new(host, config);
    widget.handle_event(Event::ActiveFileChanged(Some(file)));
    widget.handle_event(Event::CursorMoved(args.line));

    if args.link {
        // Opens through the terminal host, which prints the URL; unknown
        // remotes fall back to the shift-click notification on stderr.
        widget.click(false);
    } else if args.markup {
        println!("{}", widget.markup());
    } else {
        println!("{}", widget.text());
    }

    Ok(())
}
