use knack_proxy_http::{Filter, FindQuery, KnackProxyClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let proxy = KnackProxyClient::from_env()?;
    let object_id = std::env::var("KNACK_OBJECT_ID")?;

    let query = FindQuery::new().filter(Filter::new("field_1", "is", "Kit"));
    match proxy.delete_multiple(&object_id, &query).await? {
        Some(response) => println!("deleted: {response}"),
        None => println!("nothing matched"),
    }

    Ok(())
}
