use securechat::app::{App, AppConfig, DEFAULT_SCRIPT};
use tracing_subscriber::EnvFilter;

// Main function
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let show_raw = args.iter().skip(1).any(|arg| arg == "--raw");

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("SecureChat two-party E2EE simulation");
        println!("Usage: {} [MESSAGE]...", args[0]);
        println!("  MESSAGE: sent alternately by the first and second participant");
        println!("           (default: {:?})", DEFAULT_SCRIPT);
        println!("  --raw: Show each message's base64 ciphertext");
        println!("  --help, -h: Show this help message");
        println!();
        println!("Configuration (.env or environment):");
        println!("  SECURECHAT_FIRST_NAME, SECURECHAT_SECOND_NAME, SECURECHAT_LOG,");
        println!("  SECURECHAT_SHOW_RAW");
        return Ok(());
    }

    let mut config = AppConfig::load()?;
    config.show_raw |= show_raw;

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut messages: Vec<String> = args.into_iter().skip(1).filter(|arg| arg != "--raw").collect();
    if messages.is_empty() {
        messages = DEFAULT_SCRIPT.iter().map(|s| s.to_string()).collect();
    }

    let app = App::new(config)?;
    for line in app.run_script(&messages).await? {
        println!("{}", line);
    }

    Ok(())
}
