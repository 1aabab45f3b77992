//! Seed the catalog with product documents.
//!
//! Reads an array of JSON objects (or the YAML equivalent) and inserts each
//! one as a product. The whole file is parsed and checked before the
//! database is touched.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use shine_store_core::Document;
use shine_store_storefront::db::{self, PgProductStore, ProductStore};

use super::{CommandError, database_url};

/// Insert every product document in `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry is not an
/// object, or a database operation fails.
pub async fn products(file: &Path) -> Result<(), CommandError> {
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| CommandError::Io {
            path: file.display().to_string(),
            source,
        })?;

    let docs = parse_documents(&content, is_yaml(file))?;
    info!(path = %file.display(), count = docs.len(), "Parsed product documents");

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let store = PgProductStore::new(pool);
    let mut inserted = 0_usize;
    for doc in docs {
        let ack = store.insert(doc).await?;
        info!(product_id = %ack.inserted_id, "Inserted product");
        inserted += 1;
    }

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");
    Ok(())
}

fn is_yaml(file: &Path) -> bool {
    file.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Parse a top-level array whose entries must all be objects.
fn parse_documents(content: &str, yaml: bool) -> Result<Vec<Document>, CommandError> {
    let value: Value = if yaml {
        serde_yaml::from_str(content).map_err(|e| CommandError::InvalidSeed(e.to_string()))?
    } else {
        serde_json::from_str(content).map_err(|e| CommandError::InvalidSeed(e.to_string()))?
    };

    let Value::Array(entries) = value else {
        return Err(CommandError::InvalidSeed(
            "expected a top-level array of product objects".to_string(),
        ));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            Value::Object(doc) => Ok(doc),
            other => Err(CommandError::InvalidSeed(format!(
                "entry {i} is not an object: {other}"
            ))),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_json_array() {
        let docs = parse_documents(r#"[{"name": "a", "price": 5}, {"name": "b"}]"#, false).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["price"], json!(5));
    }

    #[test]
    fn test_parse_yaml_array() {
        let yaml = "- name: a\n  price: 5\n  flashSale: true\n- name: b\n";
        let docs = parse_documents(yaml, true).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["flashSale"], json!(true));
    }

    #[test]
    fn test_rejects_non_array_and_non_objects() {
        assert!(matches!(
            parse_documents(r#"{"name": "a"}"#, false),
            Err(CommandError::InvalidSeed(_))
        ));
        assert!(matches!(
            parse_documents(r#"[{"name": "a"}, 3]"#, false),
            Err(CommandError::InvalidSeed(_))
        ));
    }

    #[test]
    fn test_yaml_extension() {
        assert!(is_yaml(Path::new("seed/products.YML")));
        assert!(!is_yaml(Path::new("seed/products.json")));
    }
}
