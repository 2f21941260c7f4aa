/// Schema DDL kept next to the crate; `gradebook init` applies it in one
/// simple-protocol batch.
const SCHEMA: &str = include_str!("../../../schema.sql");

pub async fn handle() -> anyhow::Result<()> {
    let pool = super::connect_pool().await?;

    sqlx::raw_sql(SCHEMA).execute(&pool).await?;

    println!("Schema applied");
    Ok(())
}
