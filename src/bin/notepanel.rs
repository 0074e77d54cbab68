use notepanel::run;
use std::process::exit;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        exit(1);
    }
}
