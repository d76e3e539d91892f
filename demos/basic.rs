use knack_proxy_http::{FieldType, Filter, FindQuery, KnackProxyClient, SortOrder};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let proxy = KnackProxyClient::from_env()?;
    let object_id = std::env::var("KNACK_OBJECT_ID")?;

    let created = proxy
        .create(&object_id, &json!({ "field_1": "Kit" }))
        .await?;
    println!("created {:?}", created.id());

    let page = proxy
        .find(
            &object_id,
            &FindQuery::new()
                .filter(Filter::is("field_1", "Kit"))
                .sort_by("field_1", SortOrder::Asc)
                .rows_per_page(25),
        )
        .await?;

    for record in &page.records {
        println!(
            "{:?}: {}",
            record.id(),
            record.field_value("field_1", FieldType::Raw)
        );
    }

    Ok(())
}
