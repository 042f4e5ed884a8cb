#[tokio::main]
async fn main() {
    if let Err(e) = kiroedu::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
