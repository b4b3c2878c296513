#[tokio::main]
async fn main() {
    pitchboard::start_server().await;
}
