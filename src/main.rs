use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mathviz::{execute, run_window, save_snapshot, DemoKind, Harness, VizConfig};

#[derive(Parser, Debug)]
#[command(name = "mathviz")]
#[command(about = "Interactive math and physics visualizations")]
struct Cli {
    /// Demonstration to run
    #[arg(value_enum, default_value_t = DemoKind::Tesseract)]
    demo: DemoKind,

    /// JSON config file (defaults are used if it does not exist)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print summaries and read commands from stdin without a window
    #[arg(long)]
    headless: bool,

    /// Write the first frame to this PNG and exit
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// List demonstrations and exit
    #[arg(long)]
    list: bool,
}

fn main() -> mathviz::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mathviz=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.list {
        for kind in DemoKind::all() {
            println!("{}", kind.name());
        }
        return Ok(());
    }

    let config = VizConfig::load(cli.config.as_deref())?;
    info!(demo = %cli.demo.name(), seed = config.seed, "starting");
    let mut harness = Harness::new(cli.demo.build(config.seed));

    if let Some(path) = &cli.snapshot {
        save_snapshot(&harness, &config, path)?;
        for line in harness.summary() {
            println!("{}", line);
        }
        println!("saved {}", path.display());
        return Ok(());
    }

    println!("\n{}", harness.title());
    for line in harness.summary() {
        println!("{}", line);
    }
    println!("\n/set /press /select /color /tick /controls /summary /snapshot /export /help /quit\n");

    if cli.headless {
        return headless(&mut harness, &config);
    }

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    run_window(&mut harness, &config, rx)
}

fn headless(harness: &mut Harness, config: &VizConfig) -> mathviz::Result<()> {
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let reply = execute(harness, config, input);
        for line in &reply.lines {
            println!("{}", line);
        }
        if reply.quit {
            break;
        }
    }
    Ok(())
}
