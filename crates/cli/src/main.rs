use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use rtsp::{AbsoluteControl, Negotiator, RedirectConfig, TransportConfig};

/// Shown instead of negotiating when no address was given.
const NO_ADDRESS: &str = "Error: No URL Entered";

#[derive(Parser)]
#[command(
    name = "rtsp-redirect",
    about = "Resolve the address an RTSP stream is actually delivered from"
)]
struct Args {
    /// Stream address (rtsp://host[:port]/path). Prompted for when omitted.
    address: Option<String>,

    /// Request reverse playback from live instead of the live stream
    #[arg(long, short)]
    playback: bool,

    /// Maximum number of PLAY requests while following redirects
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    max_redirects: u32,

    /// TCP connect timeout in milliseconds (0 waits indefinitely)
    #[arg(long, default_value_t = 10_000)]
    connect_timeout_ms: u64,

    /// Per-response read timeout in milliseconds (0 waits indefinitely)
    #[arg(long, default_value_t = 10_000)]
    read_timeout_ms: u64,

    /// Receive buffer size in bytes; larger responses are rejected
    #[arg(long, default_value_t = 5000, value_parser = clap::value_parser!(u64).range(64..))]
    buffer_size: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// SETUP an absolute a=control: URI instead of the request address
    #[arg(long)]
    use_absolute_control: bool,
}

impl Args {
    fn config(&self) -> RedirectConfig {
        let millis = |ms: u64| (ms > 0).then(|| Duration::from_millis(ms));
        let mut config = RedirectConfig {
            max_redirects: self.max_redirects,
            absolute_control: if self.use_absolute_control {
                AbsoluteControl::Use
            } else {
                AbsoluteControl::Ignore
            },
            transport: TransportConfig {
                connect_timeout: millis(self.connect_timeout_ms),
                read_timeout: millis(self.read_timeout_ms),
                write_timeout: millis(self.read_timeout_ms),
                buffer_size: self.buffer_size as usize,
            },
            ..RedirectConfig::default()
        };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }
}

/// Prompt for an address on stdin.
fn prompt_address() -> io::Result<String> {
    print!("Enter RTSP Address: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();

    let address = match &args.address {
        Some(address) => address.clone(),
        None => match prompt_address() {
            Ok(address) => address,
            Err(e) => {
                eprintln!("Failed to read address: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };
    let address = address.trim();

    if address.is_empty() {
        println!("{}", NO_ADDRESS);
        return ExitCode::FAILURE;
    }

    let negotiator = Negotiator::with_config(args.config());
    tracing::debug!(address, playback = args.playback, "starting negotiation");

    match negotiator.obtain_redirect(address, args.playback) {
        Ok(resolved) => {
            println!("{}", resolved);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}
