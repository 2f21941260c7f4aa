pub async fn handle() -> anyhow::Result<()> {
    crate::server::run().await
}
