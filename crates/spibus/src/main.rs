use spibus::{app, trace, BusConfig};

const USAGE: &str = "\
Usage:
  spibus replay <trace-file> [handshake-edges]
  spibus demo [text]";

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();

    let result = match command.as_str() {
        "replay" => {
            let Some(path) = args.next() else {
                eprintln!("No trace file given.\n{}", USAGE);
                std::process::exit(1);
            };
            let edges = args.next().map(|s| s.parse::<u32>());
            run_replay(&path, edges)
        }
        "demo" => {
            let text = args.next().unwrap_or_else(|| "Hello X16".to_string());
            run_demo(&text)
        }
        other => {
            if !other.is_empty() {
                eprintln!("Unknown command '{}'.", other);
            }
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run_replay(
    path: &str,
    edges: Option<Result<u32, std::num::ParseIntError>>,
) -> anyhow::Result<()> {
    let config = match edges {
        Some(edges) => BusConfig::builder().handshake_edges(edges?).build(),
        None => BusConfig::default(),
    };
    log::info!("Replaying trace '{}'", path);
    let samples = trace::load_trace(path)?;
    let summary = app::replay(config, &samples);

    println!("samples:      {}", summary.stats.samples);
    println!("rising edges: {}", summary.stats.rising_edges);
    println!("initialized:  {}", summary.initialized);
    println!("exchanges:    {}", summary.stats.bytes_exchanged);
    for (device, byte) in &summary.out_bytes {
        println!("  {:?}: 0x{:02X}", device, byte);
    }
    println!("out byte:     0x{:02X}", summary.out_byte);
    Ok(())
}

fn run_demo(text: &str) -> anyhow::Result<()> {
    let report = app::demo(text)?;
    let typed: Vec<String> = report.typed.iter().map(|b| format!("{:02X}", b)).collect();
    println!("keyboard: {}", typed.join(" "));
    let [sec, min, hour, wday, day, month, year] = report.rtc;
    println!(
        "rtc:      20{:02X}-{:02X}-{:02X} {:02X}:{:02X}:{:02X} (weekday {:X})",
        year, month, day, hour, min, sec, wday
    );
    Ok(())
}
