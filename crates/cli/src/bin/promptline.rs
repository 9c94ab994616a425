use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    promptline_cli::main_entry().await
}
