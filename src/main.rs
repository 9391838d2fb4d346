#[tokio::main]
async fn main() {
    court_booking::run().await;
}
