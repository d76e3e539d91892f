use std::time::{SystemTime, UNIX_EPOCH};

use knack_proxy_http::{FieldType, Filter, FindQuery, KnackProxyClient};
use serde_json::json;

fn load_live_target() -> Option<(KnackProxyClient, String, String)> {
    let client = KnackProxyClient::from_env().ok()?;
    let object_id = std::env::var("KNACK_OBJECT_ID").ok()?;
    let field = std::env::var("KNACK_TEXT_FIELD").ok()?;
    Some((client, object_id, field))
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock must be after epoch")
        .as_millis()
}

#[tokio::test]
async fn live_record_lifecycle() {
    let Some((proxy, object_id, field)) = load_live_target() else {
        eprintln!("skipping live test: KNACK_PROXY_APP_ID/KNACK_OBJECT_ID/KNACK_TEXT_FIELD not set");
        return;
    };

    let marker = format!("live-{}", unique_suffix());
    let created = proxy
        .create(&object_id, &json!({ field.as_str(): marker }))
        .await
        .expect("create must succeed");
    let id = created.id().expect("created record must have an id").to_owned();

    let fetched = proxy
        .find_by_id(&object_id, &id)
        .await
        .expect("find_by_id must succeed");
    assert_eq!(fetched.field_value(&field, FieldType::Raw), json!(marker));

    let renamed = format!("{marker}-renamed");
    proxy
        .update(&object_id, &id, &json!({ field.as_str(): renamed }))
        .await
        .expect("update must succeed");

    let page = proxy
        .find(&object_id, &FindQuery::new().filter(Filter::is(field.as_str(), renamed.as_str())))
        .await
        .expect("find must succeed");
    assert_eq!(page.ids(), vec![id.clone()]);

    let deleted = proxy
        .delete_multiple(&object_id, &FindQuery::new().filter(Filter::is(field.as_str(), renamed.as_str())))
        .await
        .expect("delete_multiple must succeed");
    assert!(deleted.is_some());
}
