use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    prompt_catalog::cli::run().await
}
