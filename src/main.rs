use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    greleaser::run().await
}
