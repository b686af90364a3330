#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cultural_admin::run().await
}
