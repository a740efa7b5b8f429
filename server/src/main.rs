#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    lottery_server::start_server().await;
}
